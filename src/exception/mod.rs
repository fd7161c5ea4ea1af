use std::any::{type_name, TypeId};
use std::error::Error;
use std::fmt;
use std::hash::{Hash, Hasher};

pub mod hierarchy;
pub mod http;

pub use hierarchy::{ExceptionHierarchy, HierarchyBuilder};
pub use http::{Thrown, UncaughtException};

/// A type-erased error as it travels through the interceptor chain
pub type BoxError = Box<dyn Error + Send + Sync>;

/// The base exception type
///
/// Every exception type is a subtype of `Exception`. A mapping declared for
/// `Exception` therefore catches anything a handler throws, while a thrown
/// `Exception` value only matches such a mapping exactly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Exception {
    message: String,
}

impl Exception {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A reference to a concrete exception type.
///
/// Built from a Rust type with [`ExceptionType::of`], so only `Error` types can be
/// named. Two references are equal when they name the same `TypeId`.
#[derive(Clone, Copy)]
pub struct ExceptionType {
    id: TypeId,
    name: &'static str,
    probe: fn(&(dyn Error + 'static)) -> bool,
}

fn probe<E: Error + 'static>(exception: &(dyn Error + 'static)) -> bool {
    exception.is::<E>()
}

impl ExceptionType {
    pub fn of<E: Error + 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
            probe: probe::<E>,
        }
    }

    /// The root of the hierarchy, [`Exception`]
    pub fn base() -> Self {
        Self::of::<Exception>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, e.g. `NotFound` for `app::errors::NotFound`
    pub fn short_name(&self) -> &'static str {
        let path = self.name.split('<').next().unwrap_or(self.name);
        path.rsplit("::").next().unwrap_or(path)
    }

    pub fn is_base(&self) -> bool {
        self.id == TypeId::of::<Exception>()
    }

    /// True when `exception` is exactly of this type
    pub fn is_type_of(&self, exception: &(dyn Error + 'static)) -> bool {
        (self.probe)(exception)
    }
}

impl PartialEq for ExceptionType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ExceptionType {}

impl Hash for ExceptionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExceptionType").field(&self.name).finish()
    }
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
