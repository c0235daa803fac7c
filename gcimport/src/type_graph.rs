//! Recursive decoding of type descriptions.
//!
//! A type is either a back-reference into the type table or a tag followed by
//! its description. Named types are interned before their underlying type is
//! decoded, which is what lets a type refer to itself. With full tracking,
//! composite types reserve their slot before their components are decoded so
//! that table indices match the order the producer assigned them.
use gotypes::{
    object::{Object, ObjectId, ObjectKind, is_exported},
    package::PackageId,
    position::Pos,
    types::{
        ArrayType, ChanDir, ChanType, InterfaceType, MapType, NamedType, PointerType, Signature,
        SliceType, StructType, Type, TypeId,
    },
};
use log::trace;

use crate::{
    driver::Importer,
    error::{FormatError, FormatResult},
    intern::TypeEntry,
    tags::Tag,
};

/// A decoded parameter list.
pub(crate) struct Params {
    pub vars: Vec<ObjectId>,
    /// The last parameter is `...T`.
    pub variadic: bool,
}

impl Importer<'_> {
    /// Decode a type that may not be a variadic marker.
    ///
    /// `parent` is the package declaring the enclosing named type; `None`
    /// stands for the package being imported.
    pub(crate) fn read_type(&mut self, parent: Option<PackageId>) -> FormatResult<TypeId> {
        match self.read_type_entry(parent)? {
            TypeEntry::Type(ty) => Ok(ty),
            TypeEntry::Variadic(_) | TypeEntry::Reserved => Err(FormatError::StrayVariadic),
        }
    }

    pub(crate) fn read_type_entry(&mut self, parent: Option<PackageId>) -> FormatResult<TypeEntry> {
        if self.depth >= self.config.max_depth {
            return Err(FormatError::DepthLimitExceeded(self.config.max_depth));
        }

        self.depth += 1;
        let entry = self.read_type_inner(parent);
        self.depth -= 1;
        entry
    }

    fn read_type_inner(&mut self, parent: Option<PackageId>) -> FormatResult<TypeEntry> {
        let tag = self.reader.tag_or_index()?;
        if tag >= 0 {
            return self.types.get_type(tag);
        }

        let Some(tag) = Tag::from_repr(tag) else {
            return Err(FormatError::UnexpectedTag {
                context: "type",
                tag,
            });
        };

        if tag == Tag::Named {
            return self.named_type().map(TypeEntry::Type);
        }
        if tag == Tag::Interface {
            return self.interface_type(parent).map(TypeEntry::Type);
        }

        let slot = self.flags.track_all_types.then(|| self.types.reserve());
        let entry = match tag {
            Tag::Array => {
                let len = self.reader.int64()?;
                let elem = self.read_type(parent)?;
                TypeEntry::Type(self.universe.alloc_type(Type::Array(ArrayType { elem, len })))
            }
            Tag::Slice => {
                let elem = self.read_type(parent)?;
                TypeEntry::Type(self.universe.alloc_type(Type::Slice(SliceType { elem })))
            }
            Tag::Variadic => TypeEntry::Variadic(self.read_type(parent)?),
            Tag::Struct => {
                let (fields, tags) = self.field_list(parent)?;
                let st = StructType::new(fields, tags);
                TypeEntry::Type(self.universe.alloc_type(Type::Struct(st)))
            }
            Tag::Pointer => {
                let elem = self.read_type(parent)?;
                TypeEntry::Type(self.universe.alloc_type(Type::Pointer(PointerType { elem })))
            }
            Tag::Signature => {
                let sig = self.signature(None)?;
                TypeEntry::Type(self.universe.alloc_type(Type::Signature(sig)))
            }
            Tag::Map => {
                let key = self.read_type(parent)?;
                let elem = self.read_type(parent)?;
                TypeEntry::Type(self.universe.alloc_type(Type::Map(MapType { key, elem })))
            }
            Tag::Chan => {
                let dir = match self.reader.int()? {
                    1 => ChanDir::RecvOnly,
                    2 => ChanDir::SendOnly,
                    3 => ChanDir::SendRecv,
                    dir => return Err(FormatError::BadChanDir(dir)),
                };
                let elem = self.read_type(parent)?;
                TypeEntry::Type(self.universe.alloc_type(Type::Chan(ChanType { dir, elem })))
            }
            tag => {
                return Err(FormatError::UnexpectedTag {
                    context: "type",
                    tag: tag.value(),
                });
            }
        };

        if let Some(slot) = slot {
            self.types.fill(slot, entry);
        }
        Ok(entry)
    }

    fn named_type(&mut self) -> FormatResult<TypeId> {
        let pos = self.pos()?;
        let (parent, name) = self.qualified_name()?;

        let obj = match self.universe.lookup(parent, &name) {
            Some(obj) => obj,
            None => {
                let obj = self.universe.alloc_object(Object::new_type_name(
                    Some(parent),
                    name.as_str(),
                    pos,
                    None,
                ));
                self.universe.insert(parent, obj);
                obj
            }
        };

        let declared = match &self.universe.object(obj).kind {
            ObjectKind::TypeName { ty } => Some(*ty),
            _ => None,
        };
        let named = match declared {
            Some(None) => {
                let named = self.universe.alloc_type(Type::Named(NamedType::new(obj)));
                self.universe.object_mut(obj).kind = ObjectKind::TypeName { ty: Some(named) };
                named
            }
            Some(Some(ty)) if self.universe.named(ty).is_some() => ty,
            _ => {
                return Err(FormatError::NotANamedType {
                    pkg: self.universe.package(parent).path().to_owned(),
                    name,
                });
            }
        };
        self.types.push(TypeEntry::Type(named));

        // A type already completed by an earlier decode keeps its definition;
        // the description is still consumed.
        let fresh = self
            .universe
            .named(named)
            .is_some_and(|n| n.underlying().is_none());
        trace!("Decoding named type {} (fresh: {})", name, fresh);

        let underlying = self.read_type(Some(parent))?;
        if fresh {
            if let Some(target) = self.universe.named_mut(named) {
                target.set_underlying(underlying)?;
            }
        }

        // Interfaces carry their methods in the underlying type.
        if self.universe.is_interface(underlying) {
            return Ok(named);
        }

        let count = self.reader.int()?;
        for _ in 0..count.max(0) {
            let pos = self.pos()?;
            let name = self.string()?;
            if !is_exported(&name) {
                self.pkg()?;
            }

            let recv = self.param_list()?;
            let sig = self.signature(recv.vars.first().copied())?;
            // go:nointerface pragma
            self.reader.int()?;

            let sig = self.universe.alloc_type(Type::Signature(sig));
            let method = self
                .universe
                .alloc_object(Object::new_func(Some(parent), name, pos, sig));
            if fresh {
                if let Some(target) = self.universe.named_mut(named) {
                    target.add_method(method);
                }
            }
        }

        Ok(named)
    }

    fn interface_type(&mut self, parent: Option<PackageId>) -> FormatResult<TypeId> {
        // Any cycle through an interface goes through a named type defined
        // earlier, so the slot is never referenced while reserved.
        let slot = self.flags.track_all_types.then(|| self.types.reserve());

        if self.reader.int()? != 0 {
            return Err(FormatError::EmbeddedInterface);
        }

        let count = self.reader.int()?;
        let mut methods = Vec::new();
        for _ in 0..count.max(0) {
            methods.push(self.method(parent)?);
        }

        let iface = self
            .universe
            .alloc_type(Type::Interface(InterfaceType::new(methods)));
        self.interfaces.push(iface);
        if let Some(slot) = slot {
            self.types.fill(slot, TypeEntry::Type(iface));
        }
        Ok(iface)
    }

    fn method(&mut self, parent: Option<PackageId>) -> FormatResult<ObjectId> {
        let pos = self.pos()?;
        let (pkg, name, _) = self.field_name(parent)?;
        let sig = self.signature(None)?;
        let sig = self.universe.alloc_type(Type::Signature(sig));
        Ok(self.universe.alloc_object(Object::new_func(pkg, name, pos, sig)))
    }

    fn field_list(
        &mut self,
        parent: Option<PackageId>,
    ) -> FormatResult<(Vec<ObjectId>, Vec<Vec<u8>>)> {
        let count = self.reader.int()?;
        let mut fields = Vec::new();
        let mut tags = Vec::new();
        for _ in 0..count.max(0) {
            let (field, tag) = self.field(parent)?;
            fields.push(field);
            tags.push(tag);
        }
        Ok((fields, tags))
    }

    fn field(&mut self, parent: Option<PackageId>) -> FormatResult<(ObjectId, Vec<u8>)> {
        let pos = self.pos()?;
        let (mut pkg, mut name, alias) = self.field_name(parent)?;
        let ty = self.read_type(parent)?;
        let tag = self.string_bytes()?.into_vec();

        let mut embedded = alias;
        if name.is_empty() {
            // Embedded field: the type must be T or *T for a type name T.
            let base = match self.universe.type_(ty) {
                Type::Pointer(ptr) => ptr.elem,
                _ => ty,
            };
            match self.universe.type_(base) {
                Type::Basic(basic) => {
                    pkg = None;
                    name = basic.name.to_owned();
                }
                Type::Named(named) => {
                    name = self.universe.object(named.obj()).name.clone();
                }
                _ => return Err(FormatError::EmbeddedNotNamed),
            }
            embedded = true;
        }

        let field = Object::new_field(pkg, name, pos, ty, embedded);
        Ok((self.universe.alloc_object(field), tag))
    }

    /// Name, owning package and alias flag of a field or interface method.
    ///
    /// - `""`: the name of the embedded type, exported, owned by the parent.
    /// - `"?"`: the name of the embedded type, unexported; a package follows.
    /// - `"@"`: an explicit alias name follows, then a package if unexported.
    /// - anything else: the literal name, then a package if unexported.
    fn field_name(
        &mut self,
        parent: Option<PackageId>,
    ) -> FormatResult<(Option<PackageId>, String, bool)> {
        let mut name = self.string()?;
        let mut pkg = match parent {
            Some(parent) => parent,
            None => self.current_pkg()?,
        };

        if !self.version.blank_field_package && name == "_" {
            return Ok((Some(pkg), name, false));
        }

        let mut alias = false;
        if name == "?" {
            name.clear();
            pkg = self.pkg()?;
        } else if !name.is_empty() {
            if name == "@" {
                // An empty alias name still counts as unexported.
                name = self.string()?;
                alias = true;
            }
            if !is_exported(&name) {
                pkg = self.pkg()?;
            }
        }

        Ok((Some(pkg), name, alias))
    }

    /// Parameters and results of a function type.
    pub(crate) fn signature(&mut self, recv: Option<ObjectId>) -> FormatResult<Signature> {
        let params = self.param_list()?;
        let results = self.param_list()?;
        Ok(Signature {
            recv,
            params: params.vars,
            results: results.vars,
            variadic: params.variadic,
        })
    }

    /// A parameter list. A negative count introduces unnamed parameters.
    pub(crate) fn param_list(&mut self) -> FormatResult<Params> {
        let count = self.reader.int()?;
        let named = count > 0;
        let count = count.unsigned_abs();

        // Every parameter takes at least one byte.
        if count > self.reader.remaining() as u64 {
            return Err(FormatError::LengthOutOfRange {
                len: count,
                remaining: self.reader.remaining(),
            });
        }

        let mut params = Params {
            vars: Vec::with_capacity(count as usize),
            variadic: false,
        };
        for _ in 0..count {
            let (var, variadic) = self.param(named)?;
            params.vars.push(var);
            params.variadic = variadic;
        }
        Ok(params)
    }

    fn param(&mut self, named: bool) -> FormatResult<(ObjectId, bool)> {
        let (ty, variadic) = match self.read_type_entry(None)? {
            TypeEntry::Variadic(elem) => {
                (self.universe.alloc_type(Type::Slice(SliceType { elem })), true)
            }
            TypeEntry::Type(ty) => (ty, false),
            TypeEntry::Reserved => return Err(FormatError::StrayVariadic),
        };

        let mut pkg = None;
        let mut name = String::new();
        if named {
            name = self.string()?;
            if name.is_empty() {
                return Err(FormatError::UnnamedParameter);
            }
            if name != "_" {
                pkg = Some(self.pkg()?);
            }
            // Cut off compiler-specific parameter numbering.
            match name.find("??") {
                Some(i) if i > 0 => name.truncate(i),
                _ => {}
            }
        }

        // Compiler-specific information.
        self.string_bytes()?;

        let var = Object::new_var(pkg, name, Pos::NONE, ty);
        Ok((self.universe.alloc_object(var), variadic))
    }
}
