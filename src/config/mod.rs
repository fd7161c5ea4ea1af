//! Declarative reply configuration
//!
//! Mappings can be declared in JSON instead of code. Exception types are named and
//! resolved against the registered [`ExceptionHierarchy`] when the config is
//! applied, so a typo fails at startup.
//!
//! ```json
//! {
//!   "handlers": [
//!     {
//!       "method": "GET",
//!       "path": "/users/{id}",
//!       "replies": [
//!         { "exception": "UserNotFound", "status": 404, "errorDescription": "Unknown user id" },
//!         { "exception": "Exception", "status": 500, "replyMessage": "Try again later", "logException": true }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::{ReplyOnError, Result};
use crate::exception::ExceptionHierarchy;
use crate::mapping::{HandlerKey, MappingDeclaration, Mappings};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming the config file read by [`ReplyOnConfig::from_env`]
pub const CONFIG_ENV: &str = "REPLYON_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyOnConfig {
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerConfig {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub replies: Vec<MappingConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default = "default_log_exception")]
    pub log_exception: bool,
}

fn default_log_exception() -> bool {
    true
}

impl ReplyOnConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ReplyOnError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the file named by `REPLYON_CONFIG`
    pub fn from_env() -> Result<Self> {
        let path = env::var(CONFIG_ENV).map_err(|_| ReplyOnError::ConfigNotSet {
            var: CONFIG_ENV.to_string(),
        })?;
        Self::from_file(path)
    }
}

impl HandlerConfig {
    pub fn key(&self) -> Result<HandlerKey> {
        HandlerKey::parse(&self.method, self.path.clone())
    }

    /// Validate and freeze this handler's replies, in the order written
    pub fn mappings(&self, hierarchy: &ExceptionHierarchy) -> Result<Mappings> {
        let mut builder = Mappings::builder();
        for reply in &self.replies {
            builder = builder.declare(reply.declaration(hierarchy)?);
        }
        builder.build()
    }
}

impl MappingConfig {
    fn declaration(&self, hierarchy: &ExceptionHierarchy) -> Result<MappingDeclaration> {
        let exception_type = match self.exception.as_deref() {
            Some(name) => Some(
                hierarchy
                    .lookup(name)
                    .ok_or_else(|| ReplyOnError::not_an_exception(name))?,
            ),
            None => None,
        };

        let mut declaration =
            MappingDeclaration::new(exception_type, self.status).log_exception(self.log_exception);
        if let Some(message) = &self.reply_message {
            declaration = declaration.reply_message(message.clone());
        }
        if let Some(description) = &self.error_description {
            declaration = declaration.error_description(description.clone());
        }
        Ok(declaration)
    }
}
