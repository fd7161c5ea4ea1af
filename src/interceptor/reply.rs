use crate::exception::UncaughtException;
use crate::interceptor::{Interceptor, InterceptorError, InterceptorResult, Next};
use crate::mapping::{HandlerKey, HandlerRegistry, Mappings};
use crate::resolver::{ExceptionResolver, Resolution};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::error::Error;
use std::sync::Arc;

/// Replies to handler exceptions according to the handler's mappings
///
/// The handler is identified by request method and matched route template. Both
/// an `Err` coming back through the chain and a response carrying an
/// [`UncaughtException`] are resolved. When nothing matches, the outcome is
/// passed on exactly as received.
pub struct ReplyOnExceptionInterceptor {
    resolver: ExceptionResolver,
    registry: Arc<HandlerRegistry>,
}

impl ReplyOnExceptionInterceptor {
    pub fn new(resolver: ExceptionResolver, registry: Arc<HandlerRegistry>) -> Self {
        Self { resolver, registry }
    }

    fn on_error(&self, error: InterceptorError, mappings: Option<&Mappings>) -> InterceptorResult {
        let exception: &(dyn Error + 'static) = &*error;
        let resolution = self.resolver.resolve(Some(exception), mappings);
        match resolution {
            Resolution::Handled(reply) => Ok(reply.into_response()),
            Resolution::Unhandled => Err(error),
        }
    }

    fn on_response(&self, response: Response, mappings: Option<&Mappings>) -> Response {
        let Some(uncaught) = response.extensions().get::<UncaughtException>().cloned() else {
            return response;
        };

        let exception: &(dyn Error + 'static) = uncaught.error();
        match self.resolver.resolve(Some(exception), mappings) {
            Resolution::Handled(reply) => reply.into_response(),
            Resolution::Unhandled => response,
        }
    }
}

#[async_trait]
impl Interceptor for ReplyOnExceptionInterceptor {
    async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult {
        let mappings =
            HandlerKey::from_request(&request).and_then(|key| self.registry.lookup(&key));

        match next.run(request).await {
            Ok(response) => Ok(self.on_response(response, mappings.as_deref())),
            Err(error) => self.on_error(error, mappings.as_deref()),
        }
    }
}
