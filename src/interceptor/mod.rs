use crate::exception::BoxError;
use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use std::future::Future;
use std::pin::Pin;

pub mod layer;
pub mod reply;

pub use layer::{InterceptorMiddleware, SharedInterceptorLayer};
pub use reply::ReplyOnExceptionInterceptor;

/// standard return type for Interceptors
pub type InterceptorResult = Result<Response, InterceptorError>;

/// A type-erased error for interceptors
pub type InterceptorError = BoxError;

pub(crate) type NextFuture = Pin<Box<dyn Future<Output = InterceptorResult> + Send>>;

/// Represents the next handler in the chain
///
/// Its outcome is what the reply interceptor resolves: an `Err` carrying the thrown
/// exception, or a response holding an `UncaughtException` extension.
pub struct Next {
    pub(crate) run: Box<dyn FnOnce(Request<Body>) -> NextFuture + Send>,
}

impl Next {
    /// Create a new Next handler
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Request<Body>) -> NextFuture + Send + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Execute the next handler
    pub async fn run(self, request: Request<Body>) -> InterceptorResult {
        (self.run)(request).await
    }
}

/// The Interceptor trait
///
/// Interceptors can inspect/modify the request before it reaches the handler,
/// and inspect/modify the response, or the error, after the handler returns.
///
/// # Example
/// ```
/// use replyon::interceptor::{Interceptor, InterceptorResult, Next};
/// use replyon::async_trait;
/// use axum::{body::Body, http::Request};
///
/// struct TimingInterceptor;
///
/// #[async_trait]
/// impl Interceptor for TimingInterceptor {
///     async fn intercept(&self, req: Request<Body>, next: Next) -> InterceptorResult {
///         let start = std::time::Instant::now();
///         let res = next.run(req).await;
///         tracing::debug!("handled in {:?}", start.elapsed());
///         res
///     }
/// }
/// ```
#[async_trait]
pub trait Interceptor: Send + Sync + 'static {
    async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult;
}
