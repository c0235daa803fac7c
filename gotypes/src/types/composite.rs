//! Composite types
//!
//! Every composite type refers to its components through [`TypeId`]s and to
//! fields, parameters and methods through [`ObjectId`]s, both resolved against
//! the owning [`Universe`](crate::universe::Universe). Because components are
//! ids rather than owned values, a component may point back at a named type
//! that is still being built.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{TypesError, TypesResult, object::ObjectId, types::TypeId};

/// `[len]elem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayType {
    pub elem: TypeId,
    pub len: i64,
}

/// `[]elem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceType {
    pub elem: TypeId,
}

/// `*elem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerType {
    pub elem: TypeId,
}

/// `map[key]elem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapType {
    pub key: TypeId,
    pub elem: TypeId,
}

/// Direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChanDir {
    SendRecv,
    SendOnly,
    RecvOnly,
}

/// `chan elem`, `chan<- elem` or `<-chan elem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChanType {
    pub dir: ChanDir,
    pub elem: TypeId,
}

/// A struct type. `fields[i]` is a field variable whose tag is `tags[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructType {
    pub fields: Vec<ObjectId>,
    pub tags: Vec<Vec<u8>>,
}

impl StructType {
    pub fn new(fields: Vec<ObjectId>, tags: Vec<Vec<u8>>) -> Self {
        debug_assert_eq!(fields.len(), tags.len(), "one tag per field");
        Self { fields, tags }
    }
}

/// A function signature.
///
/// `recv` is only set for methods. When `variadic` is set the last parameter
/// has a slice type standing for `...elem`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    pub recv: Option<ObjectId>,
    pub params: Vec<ObjectId>,
    pub results: Vec<ObjectId>,
    pub variadic: bool,
}

/// An interface type.
///
/// The method set can be extended until [`InterfaceType::complete`] is called;
/// afterwards it is frozen and sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InterfaceType {
    methods: Vec<ObjectId>,
    complete: bool,
}

impl InterfaceType {
    pub fn new(methods: Vec<ObjectId>) -> Self {
        Self {
            methods,
            complete: false,
        }
    }

    pub fn methods(&self) -> &[ObjectId] {
        &self.methods
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn add_method(&mut self, method: ObjectId) -> TypesResult<()> {
        if self.complete {
            return Err(TypesError::InterfaceComplete);
        }
        self.methods.push(method);
        Ok(())
    }

    /// Freeze the method set. `sort_key` maps a method to its name.
    ///
    /// Returns `true` if this call completed the interface, `false` if it was
    /// already complete.
    pub fn complete<'a>(&mut self, sort_key: impl Fn(ObjectId) -> &'a str) -> bool {
        if self.complete {
            return false;
        }
        self.methods.sort_by(|a, b| sort_key(*a).cmp(sort_key(*b)));
        self.complete = true;
        true
    }
}

/// A declared type: its type name object, underlying type and method set.
///
/// The underlying type is `None` only while the named type is being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    obj: ObjectId,
    underlying: Option<TypeId>,
    methods: Vec<ObjectId>,
}

impl NamedType {
    pub fn new(obj: ObjectId) -> Self {
        Self {
            obj,
            underlying: None,
            methods: Vec::new(),
        }
    }

    pub fn obj(&self) -> ObjectId {
        self.obj
    }

    pub fn underlying(&self) -> Option<TypeId> {
        self.underlying
    }

    pub fn methods(&self) -> &[ObjectId] {
        &self.methods
    }

    pub fn set_underlying(&mut self, underlying: TypeId) -> TypesResult<()> {
        if self.underlying.is_some() {
            return Err(TypesError::UnderlyingAlreadySet);
        }
        self.underlying = Some(underlying);
        Ok(())
    }

    pub fn add_method(&mut self, method: ObjectId) {
        self.methods.push(method);
    }
}
