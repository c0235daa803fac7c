//! Packages and their scopes.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

/// A stable reference to a package stored inside a `Universe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackageId(pub(crate) u32);

impl PackageId {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Name to object mapping of a package. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    entries: BTreeMap<String, ObjectId>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `obj` under `name` unless the name is already taken.
    ///
    /// Returns the object previously declared under `name`, in which case the
    /// scope is left untouched.
    pub fn insert(&mut self, name: &str, obj: ObjectId) -> Option<ObjectId> {
        if let Some(&existing) = self.entries.get(name) {
            return Some(existing);
        }
        self.entries.insert(name.to_owned(), obj);
        None
    }

    pub fn lookup(&self, name: &str) -> Option<ObjectId> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ObjectId)> {
        self.entries.iter().map(|(name, obj)| (name.as_str(), *obj))
    }
}

/// A package, identified by its import path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    path: String,
    name: String,
    scope: Scope,
    imports: Vec<PackageId>,
    complete: bool,
}

impl Package {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            scope: Scope::new(),
            imports: Vec::new(),
            complete: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// Packages imported by this package, sorted by path once the package is
    /// complete.
    pub fn imports(&self) -> &[PackageId] {
        &self.imports
    }

    pub fn set_imports(&mut self, imports: Vec<PackageId>) {
        self.imports = imports;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }
}
