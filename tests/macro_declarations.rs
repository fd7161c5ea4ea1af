use axum::http::StatusCode;
use replyon::exception::{Exception, ExceptionType, Thrown};
use replyon::reply_on;

mod errors {
    #[derive(Debug, thiserror::Error)]
    #[error("user not found")]
    pub struct UserNotFound;
}

use errors::UserNotFound;

#[reply_on(errors::UserNotFound, 404, message = "No such user", description = "Unknown user id", log = false)]
#[reply_on(Exception, 500)]
async fn get_user() -> Result<String, Thrown> {
    Err(UserNotFound.into())
}

#[reply_on(Exception, 503, description = "Maintenance")]
pub fn sync_handler() -> Result<(), Thrown> {
    Ok(())
}

struct UserController;

impl UserController {
    #[reply_on(UserNotFound, 410)]
    async fn remove(&self) -> Result<(), Thrown> {
        Err(UserNotFound.into())
    }
}

#[test]
fn test_stacked_attributes_keep_declaration_order() {
    let mappings = get_user_reply_mappings().unwrap();
    assert_eq!(mappings.len(), 2);

    let first = mappings.get(0).unwrap();
    assert_eq!(first.exception_type(), &ExceptionType::of::<UserNotFound>());
    assert_eq!(first.status(), StatusCode::NOT_FOUND);
    assert_eq!(first.reply_message(), Some("No such user"));
    assert_eq!(first.error_description(), Some("Unknown user id"));
    assert!(!first.log_exception());

    let second = mappings.get(1).unwrap();
    assert!(second.exception_type().is_base());
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(second.reply_message(), None);
    assert!(second.log_exception());
}

#[test]
fn test_optional_arguments_default() {
    let mappings = sync_handler_reply_mappings().unwrap();
    let mapping = mappings.get(0).unwrap();

    assert_eq!(mapping.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(mapping.description(), "Maintenance");
    assert_eq!(mapping.reply_message(), None);
    assert!(mapping.log_exception());
    assert!(sync_handler().is_ok());
}

#[tokio::test]
async fn test_handler_is_left_unchanged() {
    let thrown = get_user().await.unwrap_err();
    assert!(thrown.get_ref().is::<UserNotFound>());

    let thrown = UserController.remove().await.unwrap_err();
    assert!(thrown.get_ref().is::<UserNotFound>());

    let mappings = UserController::remove_reply_mappings().unwrap();
    assert_eq!(mappings.get(0).unwrap().status(), StatusCode::GONE);
}
