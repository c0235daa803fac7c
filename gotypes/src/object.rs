//! Declared objects: constants, type names, variables and functions.
//!
//! Struct fields, parameters and results are variables too; they are never
//! inserted into a package scope.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;

use crate::{constant::ConstValue, package::PackageId, position::Pos, types::TypeId};

/// A stable reference to an object stored inside a `Universe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// What an object declares.
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(ObjectKindTag), derive(Hash))]
pub enum ObjectKind {
    Const {
        ty: TypeId,
        value: ConstValue,
    },
    /// `ty` is `None` only while the declared type is being decoded.
    TypeName {
        ty: Option<TypeId>,
    },
    Var {
        ty: TypeId,
        /// Struct field rather than a plain variable or parameter.
        field: bool,
        /// Embedded (anonymous) struct field.
        embedded: bool,
    },
    Func {
        /// Always a [`Type::Signature`](crate::types::Type::Signature).
        sig: TypeId,
    },
}

impl std::fmt::Display for ObjectKindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKindTag::Const => write!(f, "const"),
            ObjectKindTag::TypeName => write!(f, "type"),
            ObjectKindTag::Var => write!(f, "var"),
            ObjectKindTag::Func => write!(f, "func"),
        }
    }
}

/// A named entity declared in (or belonging to) a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Owning package. `None` for universe objects and for fields embedded
    /// through a basic type.
    pub pkg: Option<PackageId>,
    pub name: String,
    pub pos: Pos,
    pub kind: ObjectKind,
}

impl Object {
    pub fn new_const(
        pkg: Option<PackageId>,
        name: impl Into<String>,
        pos: Pos,
        ty: TypeId,
        value: ConstValue,
    ) -> Self {
        Self {
            pkg,
            name: name.into(),
            pos,
            kind: ObjectKind::Const { ty, value },
        }
    }

    pub fn new_type_name(
        pkg: Option<PackageId>,
        name: impl Into<String>,
        pos: Pos,
        ty: Option<TypeId>,
    ) -> Self {
        Self {
            pkg,
            name: name.into(),
            pos,
            kind: ObjectKind::TypeName { ty },
        }
    }

    pub fn new_var(pkg: Option<PackageId>, name: impl Into<String>, pos: Pos, ty: TypeId) -> Self {
        Self {
            pkg,
            name: name.into(),
            pos,
            kind: ObjectKind::Var {
                ty,
                field: false,
                embedded: false,
            },
        }
    }

    pub fn new_field(
        pkg: Option<PackageId>,
        name: impl Into<String>,
        pos: Pos,
        ty: TypeId,
        embedded: bool,
    ) -> Self {
        Self {
            pkg,
            name: name.into(),
            pos,
            kind: ObjectKind::Var {
                ty,
                field: true,
                embedded,
            },
        }
    }

    pub fn new_func(pkg: Option<PackageId>, name: impl Into<String>, pos: Pos, sig: TypeId) -> Self {
        Self {
            pkg,
            name: name.into(),
            pos,
            kind: ObjectKind::Func { sig },
        }
    }

    pub fn tag(&self) -> ObjectKindTag {
        ObjectKindTag::from(&self.kind)
    }

    /// The object's type: the signature for functions, the declared type for
    /// type names.
    pub fn ty(&self) -> Option<TypeId> {
        match &self.kind {
            ObjectKind::Const { ty, .. } | ObjectKind::Var { ty, .. } => Some(*ty),
            ObjectKind::TypeName { ty } => *ty,
            ObjectKind::Func { sig } => Some(*sig),
        }
    }

    pub fn const_value(&self) -> Option<&ConstValue> {
        match &self.kind {
            ObjectKind::Const { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_embedded_field(&self) -> bool {
        matches!(self.kind, ObjectKind::Var { embedded: true, .. })
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Reports whether `name` starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
