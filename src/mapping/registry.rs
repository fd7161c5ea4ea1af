use super::Mappings;
use crate::error::{ReplyOnError, Result};
use axum::extract::MatchedPath;
use axum::http::{Method, Request};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Identifies a handler by method and route template, e.g. `GET /users/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    method: Method,
    path: String,
}

impl HandlerKey {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Build a key from a textual method such as `"get"` or `"POST"`
    pub fn parse(method: &str, path: impl Into<String>) -> Result<Self> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| {
            ReplyOnError::InvalidMethod {
                method: method.to_string(),
            }
        })?;
        Ok(Self::new(method, path))
    }

    /// Key of the route that matched this request
    ///
    /// `None` when the request did not go through an axum router match.
    pub fn from_request<B>(request: &Request<B>) -> Option<Self> {
        request
            .extensions()
            .get::<MatchedPath>()
            .map(|matched| Self::new(request.method().clone(), matched.as_str()))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Mappings of every registered handler
///
/// Filled during bootstrap and only read afterwards.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<HandlerKey, Arc<Mappings>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, key: HandlerKey, mappings: Mappings) -> Result<()> {
        if self.handlers.contains_key(&key) {
            return Err(ReplyOnError::DuplicateHandler {
                method: key.method.to_string(),
                path: key.path,
            });
        }

        tracing::debug!("Registered {} mapping(s) for {}", mappings.len(), key);
        self.handlers.insert(key, Arc::new(mappings));
        Ok(())
    }

    pub fn get(&self, key: &HandlerKey) -> Option<Arc<Mappings>> {
        self.handlers.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Mappings of the handler serving a request with this key
    ///
    /// axum serves `HEAD` with the `GET` handler unless one is routed explicitly, so an
    /// unregistered `HEAD` key falls back to the `GET` entry.
    pub fn lookup(&self, key: &HandlerKey) -> Option<Arc<Mappings>> {
        self.get(key).or_else(|| {
            if key.method != Method::HEAD {
                return None;
            }
            self.get(&HandlerKey::new(Method::GET, key.path.clone()))
        })
    }

    pub fn contains(&self, key: &HandlerKey) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
