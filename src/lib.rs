//! # ReplyOn
//!
//! Declarative exception-to-response mapping for axum handlers.
//!
//! A handler declares, in order, which exception types it answers with which HTTP
//! status code and plain-text body. When the handler fails, the first mapping
//! matching the exception's exact type wins. Failing that, the first mapping whose
//! type is an ancestor of the exception's type wins. Exceptions nothing matches
//! keep the default 500 reply.
//!
//! The same declarations feed the OpenAPI document: each handler operation gets
//! one response entry per declared status code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use replyon::prelude::*;
//! use replyon::reply_on;
//! use utoipa::Modify;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("user {0} not found")]
//! struct UserNotFound(String);
//!
//! // 1. Declare replies on the handler
//! #[reply_on(UserNotFound, 404, message = "No such user", description = "Unknown user id")]
//! #[reply_on(Exception, 500, message = "Try again later", log = true)]
//! async fn get_user(Path(id): Path<String>) -> std::result::Result<String, Thrown> {
//!     Err(UserNotFound(id).into())
//! }
//!
//! #[tokio::main]
//! async fn main() -> replyon::Result<()> {
//!     // 2. Register exception types and handlers
//!     let hierarchy = ExceptionHierarchy::builder()
//!         .register::<UserNotFound>()?
//!         .build();
//!     let reply_on = ReplyOn::new(hierarchy)
//!         .handler(Method::GET, "/users/{id}", get_user_reply_mappings()?)?;
//!
//!     // 3. Install the layer
//!     let app: Router = Router::new()
//!         .route("/users/{id}", axum::routing::get(get_user))
//!         .layer(reply_on.layer());
//!
//!     // 4. Document the replies
//!     let mut openapi = utoipa::openapi::OpenApiBuilder::new().build();
//!     reply_on.documentation().modify(&mut openapi);
//!
//!     // Serve your app...
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod docs;
pub mod error;
pub mod exception;
pub mod interceptor;
pub mod mapping;
pub mod resolver;

// Re-export core types
pub use bootstrap::ReplyOn;
pub use error::{ReplyOnError, Result};

// Re-export macros
pub use replyon_macro::reply_on;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use replyon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bootstrap::ReplyOn;
    pub use crate::config::ReplyOnConfig;
    pub use crate::docs::{InlineSchemaGenerator, ReplyOnExceptionDocs, SchemaGenerator};
    pub use crate::error::{ReplyOnError, Result};
    pub use crate::exception::{Exception, ExceptionHierarchy, ExceptionType, Thrown};
    pub use crate::interceptor::{Interceptor, InterceptorResult, Next};
    pub use crate::mapping::{Mapping, Mappings};
    pub use crate::resolver::{ExceptionResolver, Resolution};
    pub use crate::reply_on;
    pub use async_trait::async_trait;
    pub use axum::{
        Router,
        extract::Path,
        http::{Method, StatusCode},
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
