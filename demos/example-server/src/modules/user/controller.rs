use crate::modules::user::domain::{CreateUserRequest, EmailTaken, InvalidUser, User, UserNotFound};
use crate::modules::user::service::UserService;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::Method,
    routing::{get, post},
};
use replyon::ReplyOn;
use replyon::exception::{Exception, Thrown};
use replyon::reply_on;
use std::sync::Arc;

#[reply_on(UserNotFound, 404, message = "No such user", description = "The user id is unknown", log = false)]
#[reply_on(Exception, 500, message = "Something went wrong", description = "Unexpected failure")]
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User id")),
    responses((status = 200, description = "The user", body = User))
)]
pub async fn get_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<u64>,
) -> Result<Json<User>, Thrown> {
    let user = service.get(id).await?;
    Ok(Json(user))
}

// EmailTaken is registered as a subtype of InvalidUser; its exact mapping wins
// even though the InvalidUser mapping is declared first.
#[reply_on(InvalidUser, 400, message = "Invalid user", description = "The request failed validation", log = false)]
#[reply_on(EmailTaken, 409, message = "Email already registered", description = "The email is taken", log = false)]
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses((status = 200, description = "The created user", body = User))
)]
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>, Thrown> {
    let user = service.create(req).await?;
    Ok(Json(user))
}

pub fn register_replies(reply_on: &ReplyOn) -> replyon::Result<()> {
    reply_on.register(Method::GET, "/users/{id}", get_user_reply_mappings()?)?;
    reply_on.register(Method::POST, "/users", create_user_reply_mappings()?)?;
    Ok(())
}

pub fn router(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .with_state(service)
}
