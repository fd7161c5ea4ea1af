use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplyOnError>;

/// Declaration and registration failures.
///
/// Everything here is a configuration mistake surfaced at startup. Nothing in the
/// request path returns a `ReplyOnError`.
#[derive(Debug, Error)]
pub enum ReplyOnError {
    #[error("Mapping #{position} does not name an exception type")]
    MissingExceptionType { position: usize },

    #[error("'{name}' is not a registered exception type")]
    NotAnException { name: String },

    #[error("Status code {status} is invalid, it must be a value between 100 and 599")]
    InvalidStatusCode { status: u16 },

    #[error("Exception type already registered: {type_name}")]
    DuplicateExceptionType { type_name: String },

    #[error("Cannot register {type_name}: parent type {parent} is not registered")]
    UnknownParent { type_name: String, parent: String },

    #[error("Handler already registered: {method} {path}")]
    DuplicateHandler { method: String, path: String },

    #[error("Invalid HTTP method: {method}")]
    InvalidMethod { method: String },

    #[error("Environment variable {var} is not set")]
    ConfigNotSet { var: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl ReplyOnError {
    pub(crate) fn not_an_exception(name: impl Into<String>) -> Self {
        Self::NotAnException { name: name.into() }
    }
}
