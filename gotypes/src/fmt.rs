//! Human readable rendering of types and objects.
//!
//! Both helpers borrow the [`Universe`] so that ids can be resolved while
//! printing. Named types print by their qualified name and never recurse into
//! their underlying type, which keeps printing of cyclic graphs finite.
use std::fmt::{Display, Formatter, Result, Write};

use crate::{
    constant::Quoted,
    object::{ObjectId, ObjectKind},
    types::{ChanDir, Signature, Type, TypeId},
    universe::Universe,
};

impl Universe {
    /// Build a formatting helper that renders the type `id`.
    pub fn fmt_type(&self, id: TypeId) -> impl Display + '_ {
        struct Fmt<'a> {
            universe: &'a Universe,
            id: TypeId,
        }

        impl Display for Fmt<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result {
                self.universe.write_type(f, self.id)
            }
        }

        Fmt { universe: self, id }
    }

    /// Build a formatting helper that renders the object `id` as a declaration.
    pub fn fmt_object(&self, id: ObjectId) -> impl Display + '_ {
        struct Fmt<'a> {
            universe: &'a Universe,
            id: ObjectId,
        }

        impl Display for Fmt<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result {
                self.universe.write_object(f, self.id)
            }
        }

        Fmt { universe: self, id }
    }

    fn write_qualified(&self, f: &mut dyn Write, obj: ObjectId) -> Result {
        let obj = self.object(obj);
        match obj.pkg {
            Some(pkg) => write!(f, "{}.{}", self.package(pkg).path(), obj.name),
            None => f.write_str(&obj.name),
        }
    }

    fn write_type(&self, f: &mut dyn Write, id: TypeId) -> Result {
        match self.type_(id) {
            Type::Basic(basic) => write!(f, "{}", basic),
            Type::Named(named) => self.write_qualified(f, named.obj()),
            Type::Array(array) => {
                write!(f, "[{}]", array.len)?;
                self.write_type(f, array.elem)
            }
            Type::Slice(slice) => {
                f.write_str("[]")?;
                self.write_type(f, slice.elem)
            }
            Type::Pointer(ptr) => {
                f.write_char('*')?;
                self.write_type(f, ptr.elem)
            }
            Type::Map(map) => {
                f.write_str("map[")?;
                self.write_type(f, map.key)?;
                f.write_char(']')?;
                self.write_type(f, map.elem)
            }
            Type::Chan(chan) => {
                f.write_str(match chan.dir {
                    ChanDir::SendRecv => "chan ",
                    ChanDir::SendOnly => "chan<- ",
                    ChanDir::RecvOnly => "<-chan ",
                })?;
                // chan (<-chan T) must keep its parentheses
                let paren = chan.dir == ChanDir::SendRecv
                    && matches!(self.type_(chan.elem), Type::Chan(c) if c.dir == ChanDir::RecvOnly);
                if paren {
                    f.write_char('(')?;
                }
                self.write_type(f, chan.elem)?;
                if paren {
                    f.write_char(')')?;
                }
                Ok(())
            }
            Type::Struct(st) => {
                f.write_str("struct{")?;
                for (i, (field, tag)) in st.fields.iter().zip(&st.tags).enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    let obj = self.object(*field);
                    if !obj.is_embedded_field() {
                        write!(f, "{} ", obj.name)?;
                    }
                    if let Some(ty) = obj.ty() {
                        self.write_type(f, ty)?;
                    }
                    if !tag.is_empty() {
                        write!(f, " {}", Quoted(tag))?;
                    }
                }
                f.write_char('}')
            }
            Type::Signature(sig) => {
                f.write_str("func")?;
                self.write_signature(f, sig)
            }
            Type::Interface(iface) => {
                f.write_str("interface{")?;
                for (i, method) in iface.methods().iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    let obj = self.object(*method);
                    f.write_str(&obj.name)?;
                    if let Some(sig) = obj.ty().and_then(|t| self.type_(t).as_signature()) {
                        self.write_signature(f, sig)?;
                    }
                }
                f.write_char('}')
            }
        }
    }

    fn write_params(&self, f: &mut dyn Write, params: &[ObjectId], variadic: bool) -> Result {
        f.write_char('(')?;
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let obj = self.object(*param);
            if !obj.name.is_empty() {
                write!(f, "{} ", obj.name)?;
            }
            let Some(ty) = obj.ty() else { continue };
            match self.type_(ty) {
                Type::Slice(slice) if variadic && i + 1 == params.len() => {
                    f.write_str("...")?;
                    self.write_type(f, slice.elem)?;
                }
                _ => self.write_type(f, ty)?,
            }
        }
        f.write_char(')')
    }

    fn write_signature(&self, f: &mut dyn Write, sig: &Signature) -> Result {
        self.write_params(f, &sig.params, sig.variadic)?;
        match sig.results.as_slice() {
            [] => Ok(()),
            [single] if self.object(*single).name.is_empty() => {
                f.write_char(' ')?;
                match self.object(*single).ty() {
                    Some(ty) => self.write_type(f, ty),
                    None => Ok(()),
                }
            }
            results => {
                f.write_char(' ')?;
                self.write_params(f, results, false)
            }
        }
    }

    fn write_object(&self, f: &mut dyn Write, id: ObjectId) -> Result {
        let obj = self.object(id);
        match &obj.kind {
            ObjectKind::Const { ty, value } => {
                f.write_str("const ")?;
                self.write_qualified(f, id)?;
                f.write_char(' ')?;
                self.write_type(f, *ty)?;
                write!(f, " = {}", value)
            }
            ObjectKind::TypeName { ty } => {
                f.write_str("type ")?;
                self.write_qualified(f, id)?;
                let Some(ty) = ty else { return Ok(()) };
                match self.named(*ty) {
                    Some(named) if named.obj() == id => match named.underlying() {
                        Some(underlying) => {
                            f.write_char(' ')?;
                            self.write_type(f, underlying)
                        }
                        None => Ok(()),
                    },
                    _ => {
                        f.write_str(" = ")?;
                        self.write_type(f, *ty)
                    }
                }
            }
            ObjectKind::Var { ty, field, .. } => {
                f.write_str(if *field { "field " } else { "var " })?;
                self.write_qualified(f, id)?;
                f.write_char(' ')?;
                self.write_type(f, *ty)
            }
            ObjectKind::Func { sig } => {
                f.write_str("func ")?;
                let Some(sig) = self.type_(*sig).as_signature() else {
                    return self.write_qualified(f, id);
                };
                if let Some(recv) = sig.recv.and_then(|r| self.object(r).ty()) {
                    f.write_char('(')?;
                    self.write_type(f, recv)?;
                    write!(f, ") {}", obj.name)?;
                } else {
                    self.write_qualified(f, id)?;
                }
                self.write_signature(f, sig)
            }
        }
    }
}
