//! Unresolved model unit references
//!
//! A working copy hands out `UnitRef<T>` values for each unit it contains.
//! Its fields are valid only after the owning [`crate::session::ProjectModel`]
//! has loaded it into a `T`.

use std::fmt;
use std::marker::PhantomData;

/// Reference to a model unit that has not been loaded yet
pub struct UnitRef<T> {
    id: String,
    qualified_name: Option<String>,
    _resolves_to: PhantomData<fn() -> T>,
}

impl<T> UnitRef<T> {
    pub fn new(id: impl Into<String>, qualified_name: Option<String>) -> Self {
        UnitRef {
            id: id.into(),
            qualified_name,
            _resolves_to: PhantomData,
        }
    }

    /// Unit identifier inside the working copy
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Qualified name, if the unit has one without loading (domain models do)
    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }
}

// Manual impls so `T` needs no bounds of its own
impl<T> Clone for UnitRef<T> {
    fn clone(&self) -> Self {
        UnitRef {
            id: self.id.clone(),
            qualified_name: self.qualified_name.clone(),
            _resolves_to: PhantomData,
        }
    }
}

impl<T> PartialEq for UnitRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.qualified_name == other.qualified_name
    }
}

impl<T> fmt::Debug for UnitRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitRef")
            .field("id", &self.id)
            .field("qualified_name", &self.qualified_name)
            .finish()
    }
}

impl<T> fmt::Display for UnitRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualified_name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => f.write_str(&self.id),
        }
    }
}
