//! In-memory type-system graph of compiled packages.
//!
//! Everything lives in a [`universe::Universe`] arena: types, declared objects
//! and packages are addressed by small copyable ids, so the graph may contain
//! cycles (a named type referring to itself through a pointer or a method)
//! without shared ownership. The crate also provides exact constant values,
//! synthetic source positions and human readable rendering of types.
//!
//! ```rust
//! use gotypes::{object::Object, position::Pos, types::BasicKind, universe::Universe};
//!
//! let mut universe = Universe::new();
//! let pkg = universe.new_package("example.com/demo", "demo");
//! let int = universe.basic(BasicKind::Int).unwrap();
//! let answer = universe.alloc_object(Object::new_const(Some(pkg), "Answer", Pos::NONE, int, 42i64.into()));
//! assert_eq!(universe.insert(pkg, answer), None);
//! assert_eq!(universe.lookup(pkg, "Answer"), Some(answer));
//! ```
use thiserror::Error;

pub mod constant;
pub mod fmt;
pub mod object;
pub mod package;
pub mod position;
pub mod types;
pub mod universe;

/// Misuse of the type graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// The interface method set was frozen by a completion.
    #[error("cannot add a method to a completed interface")]
    InterfaceComplete,

    /// The underlying type of a named type can only be installed once.
    #[error("the underlying type of this named type is already set")]
    UnderlyingAlreadySet,
}

pub type TypesResult<T> = Result<T, TypesError>;
