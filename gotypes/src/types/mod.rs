//! Types module
//!
//! The canonical representation of types handled by this crate. Types live in
//! the [`Universe`](crate::universe::Universe) arena and are addressed by
//! [`TypeId`]; two ids are the same type exactly when they are equal, while
//! [`Universe::identical`](crate::universe::Universe::identical) implements
//! structural identity.
//!
//! - Basic types: the predeclared primitive types (see `basic.rs`).
//! - Composite types: arrays, slices, structs, pointers, signatures,
//!   interfaces, maps, channels and named types (see `composite.rs`).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

pub mod basic;
pub mod composite;

pub use basic::{BasicKind, BasicType};
pub use composite::{
    ArrayType, ChanDir, ChanType, InterfaceType, MapType, NamedType, PointerType, Signature,
    SliceType, StructType,
};

/// A stable reference to a type stored inside a `Universe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A sum-type representing any type that can be stored in the universe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs)]
pub enum Type {
    Basic(BasicType),
    Named(NamedType),
    Array(ArrayType),
    Slice(SliceType),
    Struct(StructType),
    Pointer(PointerType),
    Signature(Signature),
    Interface(InterfaceType),
    Map(MapType),
    Chan(ChanType),
}

macro_rules! type_from {
    ($typ:ty, $lbl:ident) => {
        impl From<$typ> for Type {
            fn from(value: $typ) -> Self {
                Type::$lbl(value)
            }
        }
    };
}

type_from! { BasicType, Basic }
type_from! { NamedType, Named }
type_from! { ArrayType, Array }
type_from! { SliceType, Slice }
type_from! { StructType, Struct }
type_from! { PointerType, Pointer }
type_from! { Signature, Signature }
type_from! { InterfaceType, Interface }
type_from! { MapType, Map }
type_from! { ChanType, Chan }

impl Type {
    pub fn as_basic(&self) -> Option<&BasicType> {
        match self {
            Type::Basic(basic) => Some(basic),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn as_named_mut(&mut self) -> Option<&mut NamedType> {
        match self {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Struct(st) => Some(st),
            _ => None,
        }
    }

    pub fn as_signature(&self) -> Option<&Signature> {
        match self {
            Type::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Type::Interface(iface) => Some(iface),
            _ => None,
        }
    }

    pub fn as_interface_mut(&mut self) -> Option<&mut InterfaceType> {
        match self {
            Type::Interface(iface) => Some(iface),
            _ => None,
        }
    }

    /// Element type of pointers, slices, arrays, maps and channels.
    pub fn elem(&self) -> Option<TypeId> {
        match self {
            Type::Array(t) => Some(t.elem),
            Type::Slice(t) => Some(t.elem),
            Type::Pointer(t) => Some(t.elem),
            Type::Map(t) => Some(t.elem),
            Type::Chan(t) => Some(t.elem),
            _ => None,
        }
    }
}
