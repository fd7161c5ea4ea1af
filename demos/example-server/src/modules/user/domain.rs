use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
#[error("user {0} not found")]
pub struct UserNotFound(pub u64);

/// Rejected user input. Registered as the parent of [`EmailTaken`].
#[derive(Debug, thiserror::Error)]
#[error("invalid user: {0}")]
pub struct InvalidUser(pub String);

#[derive(Debug, thiserror::Error)]
#[error("email {0} is already registered")]
pub struct EmailTaken(pub String);
