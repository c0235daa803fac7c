//! Append-only intern tables giving back-reference indices their meaning.
use gotypes::types::TypeId;

use crate::error::{FormatError, FormatResult};

/// Which intern table an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    String,
    Package,
    Type,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::String => write!(f, "string"),
            TableKind::Package => write!(f, "package"),
            TableKind::Type => write!(f, "type"),
        }
    }
}

/// An entry of the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeEntry {
    Type(TypeId),
    /// `...T` marker of a trailing parameter. Only valid inside parameter lists.
    Variadic(TypeId),
    /// Slot handed out before the children of a composite type are decoded.
    Reserved,
}

/// An ordered table whose entries are only ever appended (or, for reserved
/// slots, filled in once).
#[derive(Debug, Clone)]
pub struct InternTable<T> {
    kind: TableKind,
    entries: Vec<T>,
}

impl<T> InternTable<T> {
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(kind: TableKind, entries: impl IntoIterator<Item = T>) -> Self {
        Self {
            kind,
            entries: entries.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry and return its index.
    pub fn push(&mut self, entry: T) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Resolve a back-reference read from the stream.
    pub fn get(&self, index: i64) -> FormatResult<&T> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .ok_or(FormatError::IndexOutOfRange {
                table: self.kind,
                index,
                len: self.entries.len(),
            })
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl InternTable<TypeEntry> {
    /// Hand out the next slot before the entry is built.
    pub fn reserve(&mut self) -> usize {
        self.push(TypeEntry::Reserved)
    }

    /// Fill a slot handed out by [`InternTable::reserve`].
    pub fn fill(&mut self, slot: usize, entry: TypeEntry) {
        if let Some(target) = self.entries.get_mut(slot) {
            debug_assert_eq!(*target, TypeEntry::Reserved);
            *target = entry;
        }
    }

    /// Resolve a type back-reference, rejecting slots still under construction.
    pub fn get_type(&self, index: i64) -> FormatResult<TypeEntry> {
        match *self.get(index)? {
            TypeEntry::Reserved => Err(FormatError::IncompleteEntry {
                table: self.kind,
                index: index as usize,
            }),
            entry => Ok(entry),
        }
    }
}
