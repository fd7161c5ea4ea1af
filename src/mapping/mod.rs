//! Exception-to-response declarations
//!
//! A handler owns an ordered [`Mappings`] list. Declarations are validated when the
//! list is built, before any traffic, and are immutable afterwards.

use crate::error::{ReplyOnError, Result};
use crate::exception::ExceptionType;
use axum::http::StatusCode;
use std::error::Error;

mod registry;

pub use registry::{HandlerKey, HandlerRegistry};

/// Documentation text used when a mapping declares no error description
pub const NO_DESCRIPTION: &str = "No description provided";

/// One validated exception-to-response rule
#[derive(Debug, Clone)]
pub struct Mapping {
    exception_type: ExceptionType,
    status: StatusCode,
    reply_message: Option<String>,
    error_description: Option<String>,
    log_exception: bool,
    declaration_order: usize,
}

impl Mapping {
    /// Start declaring a reply with `status` for exceptions of type `E`
    ///
    /// # Example
    /// ```
    /// use replyon::mapping::{Mapping, Mappings};
    /// use replyon::exception::Exception;
    ///
    /// let mappings = Mappings::builder()
    ///     .declare(Mapping::on::<Exception>(500).log_exception(false))
    ///     .build()?;
    /// assert_eq!(mappings.len(), 1);
    /// # Ok::<(), replyon::ReplyOnError>(())
    /// ```
    pub fn on<E: Error + 'static>(status: u16) -> MappingDeclaration {
        MappingDeclaration::new(Some(ExceptionType::of::<E>()), status)
    }

    pub fn exception_type(&self) -> &ExceptionType {
        &self.exception_type
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reply_message(&self) -> Option<&str> {
        self.reply_message.as_deref()
    }

    pub fn error_description(&self) -> Option<&str> {
        self.error_description.as_deref()
    }

    /// The error description, or [`NO_DESCRIPTION`]
    pub fn description(&self) -> &str {
        self.error_description.as_deref().unwrap_or(NO_DESCRIPTION)
    }

    pub fn log_exception(&self) -> bool {
        self.log_exception
    }

    pub fn declaration_order(&self) -> usize {
        self.declaration_order
    }
}

/// An unvalidated mapping as written by the user
#[derive(Debug, Clone)]
pub struct MappingDeclaration {
    exception_type: Option<ExceptionType>,
    status: u16,
    reply_message: Option<String>,
    error_description: Option<String>,
    log_exception: bool,
}

impl MappingDeclaration {
    /// Untyped entry point, used when exception types are resolved by name
    pub fn new(exception_type: Option<ExceptionType>, status: u16) -> Self {
        Self {
            exception_type,
            status,
            reply_message: None,
            error_description: None,
            log_exception: true,
        }
    }

    /// Reply body; defaults to the exception's own message
    pub fn reply_message(mut self, message: impl Into<String>) -> Self {
        self.reply_message = Some(message.into());
        self
    }

    /// Documentation-only text describing when this reply happens
    pub fn error_description(mut self, description: impl Into<String>) -> Self {
        self.error_description = Some(description.into());
        self
    }

    pub fn log_exception(mut self, log: bool) -> Self {
        self.log_exception = log;
        self
    }

    fn validate(self, position: usize) -> Result<Mapping> {
        let exception_type = self
            .exception_type
            .ok_or(ReplyOnError::MissingExceptionType { position })?;
        let status = validate_status(self.status)?;

        Ok(Mapping {
            exception_type,
            status,
            reply_message: self.reply_message,
            error_description: self.error_description,
            log_exception: self.log_exception,
            declaration_order: position,
        })
    }
}

/// Accepts 100 <= status < 600
pub fn validate_status(status: u16) -> Result<StatusCode> {
    if !(100..600).contains(&status) {
        return Err(ReplyOnError::InvalidStatusCode { status });
    }
    StatusCode::from_u16(status).map_err(|_| ReplyOnError::InvalidStatusCode { status })
}

/// The ordered mapping list of one handler
#[derive(Debug, Clone, Default)]
pub struct Mappings {
    entries: Vec<Mapping>,
}

impl Mappings {
    pub fn builder() -> MappingsBuilder {
        MappingsBuilder::new()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Mappings in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Mapping> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Mappings {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Collects declarations in order and validates them all on [`build`](Self::build)
#[derive(Debug, Default)]
pub struct MappingsBuilder {
    declarations: Vec<MappingDeclaration>,
}

impl MappingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, declaration: MappingDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Validate every declaration; the first invalid one fails the whole list
    pub fn build(self) -> Result<Mappings> {
        let entries = self
            .declarations
            .into_iter()
            .enumerate()
            .map(|(position, declaration)| declaration.validate(position))
            .collect::<Result<Vec<_>>>()?;
        Ok(Mappings { entries })
    }
}
