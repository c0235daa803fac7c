//! Tags of the export data stream.
//!
//! Tags share the integer space with back-reference indices: an index is
//! always non-negative and a tag always negative.
use strum::FromRepr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(i64)]
pub enum Tag {
    // Objects
    Package = -1,
    Const = -2,
    Type = -3,
    Var = -4,
    Func = -5,
    End = -6,

    // Types
    Named = -7,
    Array = -8,
    Slice = -9,
    Variadic = -10,
    Struct = -11,
    Pointer = -12,
    Signature = -13,
    Interface = -14,
    Map = -15,
    Chan = -16,

    // Values
    False = -17,
    True = -18,
    Int64 = -19,
    Float = -20,
    Fraction = -21,
    Complex = -22,
    String = -23,
    Nil = -24,
    Unknown = -25,

    // Type aliases
    Alias = -26,
}

impl Tag {
    #[inline]
    pub const fn value(self) -> i64 {
        self as i64
    }
}
