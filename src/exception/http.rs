use super::BoxError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// The error half of a handler's return type
///
/// Any `Error + Send + Sync` converts into `Thrown`, so handlers can use `?` and let
/// the interceptor decide how the failure is replied to. Whatever is not mapped
/// falls back to a plain `500 Internal Server Error`.
///
/// # Example
/// ```
/// use replyon::exception::{Exception, Thrown};
///
/// async fn get_user(id: u32) -> Result<String, Thrown> {
///     if id == 0 {
///         return Err(Exception::new("no such user").into());
///     }
///     Ok(format!("user {id}"))
/// }
/// ```
pub struct Thrown(BoxError);

impl Thrown {
    pub fn from_boxed(error: BoxError) -> Self {
        Self(error)
    }

    pub fn get_ref(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

impl<E> From<E> for Thrown
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self(Box::new(error))
    }
}

impl fmt::Debug for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl IntoResponse for Thrown {
    fn into_response(self) -> Response {
        let mut response =
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        response
            .extensions_mut()
            .insert(UncaughtException(Arc::from(self.0)));
        response
    }
}

/// Response extension carrying the exception a handler failed with
#[derive(Clone)]
pub struct UncaughtException(Arc<dyn Error + Send + Sync>);

impl UncaughtException {
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Debug for UncaughtException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UncaughtException").field(&self.0).finish()
    }
}
