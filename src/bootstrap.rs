//! Application wiring
//!
//! [`ReplyOn`] owns the frozen exception hierarchy and the handler registry, and
//! hands out the two consumers of that state: the interceptor layer for the
//! router and the documentation hook for the OpenAPI document.

use crate::config::ReplyOnConfig;
use crate::docs::{InlineSchemaGenerator, ReplyOnExceptionDocs, SchemaGenerator};
use crate::error::Result;
use crate::exception::ExceptionHierarchy;
use crate::interceptor::{Interceptor, ReplyOnExceptionInterceptor, SharedInterceptorLayer};
use crate::mapping::{HandlerKey, HandlerRegistry, Mappings};
use crate::resolver::ExceptionResolver;
use axum::http::Method;
use std::sync::Arc;

/// Exception reply setup for one application
///
/// # Example
///
/// ```rust,no_run
/// use replyon::ReplyOn;
/// use replyon::exception::{Exception, ExceptionHierarchy, Thrown};
/// use replyon::mapping::{Mapping, Mappings};
/// use axum::{Router, http::Method, routing::get};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("user not found")]
/// struct UserNotFound;
///
/// async fn get_user() -> Result<String, Thrown> {
///     Err(UserNotFound.into())
/// }
///
/// # fn main() -> replyon::Result<()> {
/// let hierarchy = ExceptionHierarchy::builder()
///     .register::<UserNotFound>()?
///     .build();
///
/// let reply_on = ReplyOn::new(hierarchy).handler(
///     Method::GET,
///     "/users/{id}",
///     Mappings::builder()
///         .declare(Mapping::on::<UserNotFound>(404).reply_message("No such user"))
///         .build()?,
/// )?;
///
/// let app: Router = Router::new()
///     .route("/users/{id}", get(get_user))
///     .layer(reply_on.layer());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ReplyOn {
    hierarchy: Arc<ExceptionHierarchy>,
    registry: Arc<HandlerRegistry>,
}

impl ReplyOn {
    pub fn new(hierarchy: ExceptionHierarchy) -> Self {
        Self {
            hierarchy: Arc::new(hierarchy),
            registry: Arc::new(HandlerRegistry::new()),
        }
    }

    /// Attach mappings to the handler serving `method` and the route template `path`
    pub fn register(
        &self,
        method: Method,
        path: impl Into<String>,
        mappings: Mappings,
    ) -> Result<()> {
        self.registry.register(HandlerKey::new(method, path), mappings)
    }

    /// Chaining form of [`ReplyOn::register`]
    pub fn handler(
        self,
        method: Method,
        path: impl Into<String>,
        mappings: Mappings,
    ) -> Result<Self> {
        self.register(method, path, mappings)?;
        Ok(self)
    }

    /// Register every handler declared in `config`
    ///
    /// Fails on the first invalid declaration. Handlers registered before the
    /// failure stay registered.
    pub fn load(&self, config: &ReplyOnConfig) -> Result<()> {
        for handler in &config.handlers {
            let key = handler.key()?;
            let mappings = handler.mappings(&self.hierarchy)?;
            self.registry.register(key, mappings)?;
        }
        tracing::info!("Loaded reply mappings for {} handler(s)", config.handlers.len());
        Ok(())
    }

    pub fn resolver(&self) -> ExceptionResolver {
        ExceptionResolver::new(Arc::clone(&self.hierarchy))
    }

    pub fn hierarchy(&self) -> &ExceptionHierarchy {
        &self.hierarchy
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Interceptor resolving handler exceptions against the registry
    pub fn interceptor(&self) -> ReplyOnExceptionInterceptor {
        ReplyOnExceptionInterceptor::new(self.resolver(), Arc::clone(&self.registry))
    }

    /// Layer for `Router::layer`, running only the reply interceptor
    pub fn layer(&self) -> SharedInterceptorLayer {
        self.layer_with(Vec::new())
    }

    /// Layer running `inner` interceptors inside the reply interceptor
    ///
    /// Errors left by the inner interceptors are resolved like handler exceptions.
    pub fn layer_with(&self, inner: Vec<Box<dyn Interceptor>>) -> SharedInterceptorLayer {
        let mut interceptors: Vec<Box<dyn Interceptor>> = Vec::with_capacity(inner.len() + 1);
        interceptors.push(Box::new(self.interceptor()));
        interceptors.extend(inner);
        SharedInterceptorLayer::new(interceptors)
    }

    /// Documentation hook with inline string schemas
    pub fn documentation(&self) -> ReplyOnExceptionDocs {
        self.documentation_with(Arc::new(InlineSchemaGenerator))
    }

    pub fn documentation_with(
        &self,
        schema_generator: Arc<dyn SchemaGenerator>,
    ) -> ReplyOnExceptionDocs {
        ReplyOnExceptionDocs::new(Arc::clone(&self.registry), schema_generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplyOnError;
    use crate::mapping::Mapping;

    #[derive(Debug, thiserror::Error)]
    #[error("user not found")]
    struct UserNotFound;

    fn reply_on() -> ReplyOn {
        ReplyOn::new(
            ExceptionHierarchy::builder()
                .register::<UserNotFound>()
                .unwrap()
                .build(),
        )
    }

    #[test]
    fn test_register_and_duplicate() {
        let reply_on = reply_on();
        let mappings = || {
            Mappings::builder()
                .declare(Mapping::on::<UserNotFound>(404))
                .build()
                .unwrap()
        };

        reply_on.register(Method::GET, "/users/{id}", mappings()).unwrap();
        assert!(reply_on.registry().contains(&HandlerKey::new(Method::GET, "/users/{id}")));

        let duplicate = reply_on.register(Method::GET, "/users/{id}", mappings());
        assert!(matches!(duplicate, Err(ReplyOnError::DuplicateHandler { .. })));
    }

    #[test]
    fn test_load_config() {
        let reply_on = reply_on();
        let config = ReplyOnConfig::from_json(
            r#"{ "handlers": [
                { "method": "GET", "path": "/users/{id}", "replies": [ { "exception": "UserNotFound", "status": 404 } ] },
                { "method": "DELETE", "path": "/users/{id}", "replies": [] }
            ] }"#,
        )
        .unwrap();

        reply_on.load(&config).unwrap();
        assert_eq!(reply_on.registry().len(), 2);

        let mappings = reply_on
            .registry()
            .get(&HandlerKey::new(Method::GET, "/users/{id}"))
            .unwrap();
        assert_eq!(mappings.get(0).unwrap().status().as_u16(), 404);
    }

    #[test]
    fn test_load_rejects_unknown_method() {
        let config = ReplyOnConfig::from_json(
            r#"{ "handlers": [ { "method": "G ET", "path": "/", "replies": [] } ] }"#,
        )
        .unwrap();

        assert!(matches!(
            reply_on().load(&config),
            Err(ReplyOnError::InvalidMethod { .. })
        ));
    }

    #[test]
    fn test_layer_puts_reply_interceptor_outermost() {
        let reply_on = reply_on();
        assert_eq!(reply_on.layer().len(), 1);

        let inner: Vec<Box<dyn Interceptor>> = vec![Box::new(reply_on.interceptor())];
        assert_eq!(reply_on.layer_with(inner).len(), 2);
    }
}
