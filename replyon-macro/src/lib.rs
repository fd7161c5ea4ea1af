use proc_macro::TokenStream;

mod reply_on;

/// Attribute macro declaring how a handler replies to an exception type
///
/// Stack one attribute per mapping. Declaration order is the order the
/// attributes are written, top to bottom. The handler itself is left unchanged;
/// a sibling function `<handler>_reply_mappings()` returns the validated
/// mappings, ready for `ReplyOn::register`.
///
/// Arguments: the exception type, the status code, then optionally
/// `message = "..."` (reply body), `description = "..."` (documentation) and
/// `log = bool` (defaults to `true`).
///
/// # Example
/// ```ignore
/// use replyon::reply_on;
///
/// #[reply_on(UserNotFound, 404, message = "No such user", description = "Unknown user id")]
/// #[reply_on(Exception, 500, log = false)]
/// async fn get_user(Path(id): Path<String>) -> Result<Json<User>, Thrown> {
///     // ...
/// }
///
/// reply_on.register(Method::GET, "/users/{id}", get_user_reply_mappings()?)?;
/// ```
#[proc_macro_attribute]
pub fn reply_on(attr: TokenStream, item: TokenStream) -> TokenStream {
    reply_on::reply_on_attribute(attr, item)
}
