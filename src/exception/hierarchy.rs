//! Registered exception type hierarchy
//!
//! Rust has no subclassing, so "is-a" relations between error types are declared
//! once at startup and frozen into lookup tables: every registered type carries its
//! precomputed ancestor chain, nearest parent first, always ending at [`Exception`].

use super::{Exception, ExceptionType};
use crate::error::{ReplyOnError, Result};
use std::any::TypeId;
use std::collections::HashMap;
use std::error::Error;

struct Node {
    ty: ExceptionType,
    ancestors: Vec<TypeId>,
}

/// Frozen, read-only exception hierarchy
///
/// # Example
/// ```
/// use replyon::exception::{Exception, ExceptionHierarchy};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("application error")]
/// struct ApplicationError;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("user not found")]
/// struct UserNotFound;
///
/// let hierarchy = ExceptionHierarchy::builder()
///     .register::<ApplicationError>()?
///     .register_subtype::<UserNotFound, ApplicationError>()?
///     .build();
///
/// assert_eq!(hierarchy.lineage(&UserNotFound).len(), 2);
/// # Ok::<(), replyon::ReplyOnError>(())
/// ```
pub struct ExceptionHierarchy {
    nodes: Vec<Node>,
    by_id: HashMap<TypeId, usize>,
    unregistered: Vec<TypeId>,
}

impl ExceptionHierarchy {
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, ty: &ExceptionType) -> bool {
        self.by_id.contains_key(&ty.id())
    }

    pub fn get(&self, id: TypeId) -> Option<ExceptionType> {
        self.by_id.get(&id).map(|&index| self.nodes[index].ty)
    }

    /// Find a registered type by its full type name, or by its short name when
    /// exactly one registered type carries it.
    pub fn lookup(&self, name: &str) -> Option<ExceptionType> {
        if let Some(node) = self.nodes.iter().find(|node| node.ty.name() == name) {
            return Some(node.ty);
        }

        let mut matches = self.nodes.iter().filter(|node| node.ty.short_name() == name);
        match (matches.next(), matches.next()) {
            (Some(node), None) => Some(node.ty),
            _ => None,
        }
    }

    /// Proper ancestors of a type, nearest first.
    ///
    /// Unregistered types hang directly off [`Exception`].
    pub fn ancestors_of(&self, ty: &ExceptionType) -> &[TypeId] {
        match self.by_id.get(&ty.id()) {
            Some(&index) => &self.nodes[index].ancestors,
            None => &self.unregistered,
        }
    }

    /// Proper ancestors of the runtime type of a thrown exception, nearest first.
    pub fn lineage(&self, exception: &(dyn Error + 'static)) -> &[TypeId] {
        self.nodes
            .iter()
            .find(|node| node.ty.is_type_of(exception))
            .map(|node| node.ancestors.as_slice())
            .unwrap_or(&self.unregistered)
    }

    /// True when `ty` derives from `ancestor` without being the same type
    pub fn is_proper_subtype(&self, ty: &ExceptionType, ancestor: &ExceptionType) -> bool {
        self.ancestors_of(ty).contains(&ancestor.id())
    }
}

impl Default for ExceptionHierarchy {
    fn default() -> Self {
        HierarchyBuilder::new().build()
    }
}

/// Builder for an [`ExceptionHierarchy`]
///
/// Parents must be registered before their subtypes. [`Exception`] is always
/// present as the root.
pub struct HierarchyBuilder {
    nodes: Vec<Node>,
    by_id: HashMap<TypeId, usize>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        let root = ExceptionType::of::<Exception>();
        let mut by_id = HashMap::new();
        by_id.insert(root.id(), 0);
        Self {
            nodes: vec![Node {
                ty: root,
                ancestors: Vec::new(),
            }],
            by_id,
        }
    }

    /// Register `E` as a direct subtype of [`Exception`]
    pub fn register<E: Error + 'static>(self) -> Result<Self> {
        self.register_subtype::<E, Exception>()
    }

    /// Register `E` as a direct subtype of the already registered `P`
    pub fn register_subtype<E, P>(mut self) -> Result<Self>
    where
        E: Error + 'static,
        P: Error + 'static,
    {
        let ty = ExceptionType::of::<E>();
        let parent = ExceptionType::of::<P>();

        if self.by_id.contains_key(&ty.id()) {
            return Err(ReplyOnError::DuplicateExceptionType {
                type_name: ty.name().to_string(),
            });
        }

        let parent_index =
            *self
                .by_id
                .get(&parent.id())
                .ok_or_else(|| ReplyOnError::UnknownParent {
                    type_name: ty.name().to_string(),
                    parent: parent.name().to_string(),
                })?;

        let mut ancestors = Vec::with_capacity(self.nodes[parent_index].ancestors.len() + 1);
        ancestors.push(parent.id());
        ancestors.extend_from_slice(&self.nodes[parent_index].ancestors);

        tracing::debug!("Registered exception type {} under {}", ty, parent);

        self.by_id.insert(ty.id(), self.nodes.len());
        self.nodes.push(Node { ty, ancestors });
        Ok(self)
    }

    pub fn build(self) -> ExceptionHierarchy {
        ExceptionHierarchy {
            nodes: self.nodes,
            by_id: self.by_id,
            unregistered: vec![TypeId::of::<Exception>()],
        }
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("application error")]
    struct ApplicationError;

    #[derive(Debug, thiserror::Error)]
    #[error("not found")]
    struct NotFound;

    #[derive(Debug, thiserror::Error)]
    #[error("user not found")]
    struct UserNotFound;

    #[derive(Debug, thiserror::Error)]
    #[error("stray")]
    struct Stray;

    fn hierarchy() -> ExceptionHierarchy {
        ExceptionHierarchy::builder()
            .register::<ApplicationError>()
            .unwrap()
            .register_subtype::<NotFound, ApplicationError>()
            .unwrap()
            .register_subtype::<UserNotFound, NotFound>()
            .unwrap()
            .build()
    }

    #[test]
    fn test_lineage_is_nearest_first() {
        let hierarchy = hierarchy();
        assert_eq!(
            hierarchy.lineage(&UserNotFound),
            &[
                TypeId::of::<NotFound>(),
                TypeId::of::<ApplicationError>(),
                TypeId::of::<Exception>(),
            ]
        );
        assert!(hierarchy.lineage(&Exception::new("root")).is_empty());
    }

    #[test]
    fn test_unregistered_types_derive_from_base() {
        let hierarchy = hierarchy();
        assert_eq!(hierarchy.lineage(&Stray), &[TypeId::of::<Exception>()]);
        assert!(hierarchy.is_proper_subtype(&ExceptionType::of::<Stray>(), &ExceptionType::base()));
        assert!(!hierarchy.contains(&ExceptionType::of::<Stray>()));
    }

    #[test]
    fn test_proper_subtype_excludes_self() {
        let hierarchy = hierarchy();
        let not_found = ExceptionType::of::<NotFound>();
        assert!(!hierarchy.is_proper_subtype(&not_found, &not_found));
        assert!(hierarchy.is_proper_subtype(&ExceptionType::of::<UserNotFound>(), &not_found));
        assert!(!hierarchy.is_proper_subtype(&not_found, &ExceptionType::of::<UserNotFound>()));
    }

    #[test]
    fn test_parent_must_be_registered_first() {
        let result = ExceptionHierarchy::builder().register_subtype::<NotFound, ApplicationError>();
        assert!(matches!(result, Err(ReplyOnError::UnknownParent { .. })));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let result = ExceptionHierarchy::builder()
            .register::<NotFound>()
            .unwrap()
            .register::<NotFound>();
        assert!(matches!(result, Err(ReplyOnError::DuplicateExceptionType { .. })));

        let result = ExceptionHierarchy::builder().register::<Exception>();
        assert!(matches!(result, Err(ReplyOnError::DuplicateExceptionType { .. })));
    }

    #[test]
    fn test_lookup_by_name() {
        let hierarchy = hierarchy();
        assert_eq!(hierarchy.lookup("NotFound"), Some(ExceptionType::of::<NotFound>()));
        assert_eq!(hierarchy.lookup("Exception"), Some(ExceptionType::base()));
        assert_eq!(
            hierarchy.lookup(std::any::type_name::<UserNotFound>()),
            Some(ExceptionType::of::<UserNotFound>())
        );
        assert_eq!(hierarchy.lookup("Stray"), None);
    }
}
