//! Predeclared basic types.
//!
//! The order of [`PREDECLARED`] is part of the export data format: the producer
//! numbers these types `0..PREDECLARED.len()` before any other type, so the
//! table must never be reordered.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

/// Kind of a basic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BasicKind {
    Invalid,

    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,

    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,

    /// Placeholder used internally by the producing compiler. Never appears in
    /// well-formed export data but still occupies a predeclared index.
    Any,
}

impl BasicKind {
    /// Returns `true` for the kinds of untyped constants (including `nil`).
    pub const fn is_untyped(&self) -> bool {
        matches!(
            self,
            BasicKind::UntypedBool
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
                | BasicKind::UntypedFloat
                | BasicKind::UntypedComplex
                | BasicKind::UntypedString
                | BasicKind::UntypedNil
        )
    }

    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
        )
    }
}

/// A basic type: its kind plus the name it is spelled with.
///
/// `byte` and `rune` are distinct basic types with kinds `Uint8` and `Int32`;
/// identity only compares kinds, so `byte` and `uint8` are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicType {
    pub kind: BasicKind,
    pub name: &'static str,
}

impl std::fmt::Display for BasicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// An entry of the predeclared type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predeclared {
    Basic(BasicType),
    /// The universe `error` interface type.
    Error,
}

macro_rules! basic {
    ($kind:ident, $name:literal) => {
        Predeclared::Basic(BasicType {
            kind: BasicKind::$kind,
            name: $name,
        })
    };
}

/// Predeclared types in producer order.
pub const PREDECLARED: [Predeclared; 30] = [
    // basic types
    basic!(Bool, "bool"),
    basic!(Int, "int"),
    basic!(Int8, "int8"),
    basic!(Int16, "int16"),
    basic!(Int32, "int32"),
    basic!(Int64, "int64"),
    basic!(Uint, "uint"),
    basic!(Uint8, "uint8"),
    basic!(Uint16, "uint16"),
    basic!(Uint32, "uint32"),
    basic!(Uint64, "uint64"),
    basic!(Uintptr, "uintptr"),
    basic!(Float32, "float32"),
    basic!(Float64, "float64"),
    basic!(Complex64, "complex64"),
    basic!(Complex128, "complex128"),
    basic!(String, "string"),
    // aliases
    basic!(Uint8, "byte"),
    basic!(Int32, "rune"),
    Predeclared::Error,
    // untyped
    basic!(UntypedBool, "untyped bool"),
    basic!(UntypedInt, "untyped int"),
    basic!(UntypedRune, "untyped rune"),
    basic!(UntypedFloat, "untyped float"),
    basic!(UntypedComplex, "untyped complex"),
    basic!(UntypedString, "untyped string"),
    basic!(UntypedNil, "untyped nil"),
    // package unsafe
    basic!(UnsafePointer, "unsafe.Pointer"),
    // only appears in packages with errors
    basic!(Invalid, "invalid type"),
    basic!(Any, "any"),
];

/// Index of the universe `error` type in [`PREDECLARED`].
pub const ERROR_INDEX: usize = 19;
