//! Package-level declarations.
use gotypes::{
    object::{Object, ObjectId},
    package::PackageId,
    types::Type,
};
use log::{info, trace};

use crate::{
    driver::Importer,
    error::{FormatError, FormatResult},
    tags::Tag,
};

impl Importer<'_> {
    /// Decode the object introduced by `tag`.
    pub(crate) fn object(&mut self, tag: i64) -> FormatResult<()> {
        match Tag::from_repr(tag) {
            Some(Tag::Const) => {
                let pos = self.pos()?;
                let (pkg, name) = self.qualified_name()?;
                let ty = self.read_type(None)?;
                let value = self.value()?;
                self.declare(pkg, Object::new_const(Some(pkg), name, pos, ty, value))
            }
            Some(Tag::Alias) => {
                let pos = self.pos()?;
                let (pkg, name) = self.qualified_name()?;
                let ty = self.read_type(None)?;
                self.declare(pkg, Object::new_type_name(Some(pkg), name, pos, Some(ty)))
            }
            // Only the interning side effect matters.
            Some(Tag::Type) => self.read_type(None).map(drop),
            Some(Tag::Var) => {
                let pos = self.pos()?;
                let (pkg, name) = self.qualified_name()?;
                let ty = self.read_type(None)?;
                self.declare(pkg, Object::new_var(Some(pkg), name, pos, ty))
            }
            Some(Tag::Func) => {
                let pos = self.pos()?;
                let (pkg, name) = self.qualified_name()?;
                let sig = self.signature(None)?;
                let sig = self.universe.alloc_type(Type::Signature(sig));
                self.declare(pkg, Object::new_func(Some(pkg), name, pos, sig))
            }
            _ => Err(FormatError::UnexpectedTag {
                context: "object",
                tag,
            }),
        }
    }

    /// A name followed by its package record.
    pub(crate) fn qualified_name(&mut self) -> FormatResult<(PackageId, String)> {
        let name = self.string()?;
        let pkg = self.pkg()?;
        Ok((pkg, name))
    }

    /// Insert `obj` into the scope of `pkg`.
    ///
    /// Redeclaring a name is only accepted for an object of the same kind and
    /// an identical type, in which case the first declaration stays.
    fn declare(&mut self, pkg: PackageId, obj: Object) -> FormatResult<()> {
        let obj = self.universe.alloc_object(obj);
        let Some(existing) = self.universe.insert(pkg, obj) else {
            trace!("Declared {}", self.universe.fmt_object(obj));
            return Ok(());
        };

        if !self.same_object(obj, existing) {
            return Err(FormatError::InconsistentImport {
                new: self.universe.fmt_object(obj).to_string(),
                old: self.universe.fmt_object(existing).to_string(),
            });
        }

        info!(
            "Ignoring identical redeclaration of {}",
            self.universe.fmt_object(existing)
        );
        Ok(())
    }

    /// Same kind and identical types. Constant values are not compared.
    fn same_object(&self, a: ObjectId, b: ObjectId) -> bool {
        let (a, b) = (self.universe.object(a), self.universe.object(b));
        if a.tag() != b.tag() {
            return false;
        }
        match (a.ty(), b.ty()) {
            (Some(x), Some(y)) => self.universe.identical(x, y),
            (None, None) => true,
            _ => false,
        }
    }
}
