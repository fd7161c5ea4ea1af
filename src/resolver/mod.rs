//! Exception resolution
//!
//! Selection is two passes over a handler's mappings in declaration order:
//!
//! 1. exact pass: the first mapping whose type is the thrown value's own type;
//! 2. subtype pass: the first mapping whose type is a proper ancestor of it.
//!
//! An exact match always wins, even over an earlier ancestor mapping.

use crate::exception::ExceptionHierarchy;
use crate::mapping::{Mapping, Mappings};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::error::Error;
use std::sync::Arc;

/// Outcome of resolving one exception
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A mapping matched; the exception is consumed and this reply is sent instead
    Handled(ResolvedResponse),
    /// Nothing matched; the exception continues unchanged
    Unhandled,
}

impl Resolution {
    pub fn is_handled(&self) -> bool {
        matches!(self, Resolution::Handled(_))
    }
}

/// The structured reply built from a mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResponse {
    pub status: StatusCode,
    pub body: String,
}

impl IntoResponse for ResolvedResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

/// Per-request exception resolver
///
/// Holds only the frozen type hierarchy, so one instance is shared by every request.
#[derive(Clone, Default)]
pub struct ExceptionResolver {
    hierarchy: Arc<ExceptionHierarchy>,
}

impl ExceptionResolver {
    pub fn new(hierarchy: Arc<ExceptionHierarchy>) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &ExceptionHierarchy {
        &self.hierarchy
    }

    /// Pick the mapping that applies to `exception`, if any
    pub fn select<'m>(
        &self,
        exception: &(dyn Error + 'static),
        mappings: &'m Mappings,
    ) -> Option<&'m Mapping> {
        if let Some(exact) = mappings
            .iter()
            .find(|mapping| mapping.exception_type().is_type_of(exception))
        {
            return Some(exact);
        }

        let lineage = self.hierarchy.lineage(exception);
        mappings
            .iter()
            .find(|mapping| lineage.contains(&mapping.exception_type().id()))
    }

    /// Turn an exception into a reply using the handler's mappings
    ///
    /// A missing exception or missing mappings resolve to [`Resolution::Unhandled`].
    pub fn resolve(
        &self,
        exception: Option<&(dyn Error + 'static)>,
        mappings: Option<&Mappings>,
    ) -> Resolution {
        let (Some(exception), Some(mappings)) = (exception, mappings) else {
            return Resolution::Unhandled;
        };
        let Some(mapping) = self.select(exception, mappings) else {
            return Resolution::Unhandled;
        };

        let body = match mapping.reply_message() {
            Some(message) => message.to_string(),
            None => exception.to_string(),
        };

        if mapping.log_exception() {
            tracing::error!(
                error = exception,
                reply = %body,
                status = mapping.status().as_u16(),
                exception_type = mapping.exception_type().name(),
                "Replying to unhandled exception"
            );
        }

        Resolution::Handled(ResolvedResponse {
            status: mapping.status(),
            body,
        })
    }
}
