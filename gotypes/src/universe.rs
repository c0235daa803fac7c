//! The universe: an arena owning every type, object and package.
//!
//! All cross references inside the type graph are ids into the arena, which is
//! what makes cyclic graphs (a named type referring to itself through a pointer,
//! slice, struct field or method signature) representable without reference
//! counting. Slots are append-only: an id stays valid for the lifetime of the
//! universe.
use log::{debug, trace};

use crate::{
    object::{Object, ObjectId, ObjectKind, is_exported},
    package::{Package, PackageId},
    position::Pos,
    types::{
        BasicKind, InterfaceType, NamedType, Signature, Type, TypeId,
        basic::{ERROR_INDEX, PREDECLARED, Predeclared},
    },
};

/// Arena of types, objects and packages.
///
/// A fresh universe already holds the predeclared types at ids
/// `0..PREDECLARED.len()`, in the order export data numbers them.
///
/// Example:
/// ```rust
/// # use gotypes::{universe::Universe, types::BasicKind};
/// let universe = Universe::new();
/// let byte = universe.predeclared()[17];
/// let uint8 = universe.basic(BasicKind::Uint8).unwrap();
/// assert_ne!(byte, uint8);
/// assert!(universe.identical(byte, uint8));
/// assert_eq!(universe.fmt_type(universe.error_type()).to_string(), "error");
/// ```
#[derive(Debug, Clone)]
pub struct Universe {
    types: Vec<Type>,
    objects: Vec<Object>,
    packages: Vec<Package>,
    predeclared: Vec<TypeId>,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    pub fn new() -> Self {
        let mut universe = Self {
            types: Vec::with_capacity(PREDECLARED.len() + 8),
            objects: Vec::new(),
            packages: Vec::new(),
            predeclared: Vec::with_capacity(PREDECLARED.len()),
        };

        for entry in PREDECLARED.iter() {
            let id = match entry {
                Predeclared::Basic(basic) => universe.alloc_type(Type::Basic(*basic)),
                Predeclared::Error => {
                    let obj = universe.alloc_object(Object::new_type_name(
                        None,
                        "error",
                        Pos::NONE,
                        None,
                    ));
                    let ty = universe.alloc_type(Type::Named(NamedType::new(obj)));
                    universe.objects[obj.index()].kind = ObjectKind::TypeName { ty: Some(ty) };
                    ty
                }
            };
            universe.predeclared.push(id);
        }

        universe.install_error_interface();
        universe
    }

    /// interface { Error() string }
    fn install_error_interface(&mut self) {
        let error = self.predeclared[ERROR_INDEX];
        let string = self.predeclared[16];

        let recv = self.alloc_object(Object::new_var(None, "", Pos::NONE, error));
        let result = self.alloc_object(Object::new_var(None, "", Pos::NONE, string));
        let sig = self.alloc_type(Type::Signature(Signature {
            recv: Some(recv),
            params: Vec::new(),
            results: vec![result],
            variadic: false,
        }));
        let method = self.alloc_object(Object::new_func(None, "Error", Pos::NONE, sig));
        let iface = self.alloc_type(Type::Interface(InterfaceType::new(vec![method])));
        self.complete_interface(iface);

        if let Some(named) = self.types[error.index()].as_named_mut() {
            let installed = named.set_underlying(iface);
            debug_assert!(installed.is_ok(), "fresh named type has no underlying type");
        }
    }

    /// The predeclared types, indexed like export data indexes them.
    pub fn predeclared(&self) -> &[TypeId] {
        &self.predeclared
    }

    /// The predeclared type of the given kind (`uint8` rather than `byte`).
    pub fn basic(&self, kind: BasicKind) -> Option<TypeId> {
        self.predeclared
            .iter()
            .copied()
            .find(|id| self.types[id.index()].as_basic().is_some_and(|b| b.kind == kind))
    }

    /// The universe `error` type.
    pub fn error_type(&self) -> TypeId {
        self.predeclared[ERROR_INDEX]
    }

    pub fn alloc_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        trace!("Allocated type slot {}", id.0);
        id
    }

    pub fn type_(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn type_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.index()]
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn named(&self, id: TypeId) -> Option<&NamedType> {
        self.types[id.index()].as_named()
    }

    pub fn named_mut(&mut self, id: TypeId) -> Option<&mut NamedType> {
        self.types[id.index()].as_named_mut()
    }

    pub fn alloc_object(&mut self, obj: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(obj);
        id
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.index()]
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn new_package(&mut self, path: impl Into<String>, name: impl Into<String>) -> PackageId {
        let id = PackageId(self.packages.len() as u32);
        let package = Package::new(path, name);
        debug!(
            "New package {:?} ({}) registered as {}",
            package.path(),
            package.name(),
            id.0
        );
        self.packages.push(package);
        id
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.index()]
    }

    pub fn lookup(&self, pkg: PackageId, name: &str) -> Option<ObjectId> {
        self.package(pkg).scope().lookup(name)
    }

    /// Insert `obj` into the scope of `pkg` under the object's name.
    ///
    /// Returns the previously declared object if the name is already taken.
    pub fn insert(&mut self, pkg: PackageId, obj: ObjectId) -> Option<ObjectId> {
        let name = &self.objects[obj.index()].name;
        self.packages[pkg.index()].scope_mut().insert(name, obj)
    }

    /// Exported objects of `pkg` in name order.
    pub fn exported_objects(&self, pkg: PackageId) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.package(pkg)
            .scope()
            .iter()
            .filter(|(name, _)| is_exported(name))
            .map(|(_, id)| (id, self.object(id)))
    }

    /// Follow named types down to the first non-named type.
    ///
    /// Returns `None` when a named type on the way has no underlying type yet.
    pub fn underlying(&self, mut id: TypeId) -> Option<TypeId> {
        // Chains longer than the arena can only be cycles.
        for _ in 0..=self.types.len() {
            match &self.types[id.index()] {
                Type::Named(named) => id = named.underlying()?,
                _ => return Some(id),
            }
        }
        None
    }

    pub fn is_interface(&self, id: TypeId) -> bool {
        self.underlying(id)
            .is_some_and(|u| self.types[u.index()].is_interface())
    }

    /// Freeze the method set of the interface `id`.
    ///
    /// Returns `true` only if this call completed it; `false` if it was complete
    /// already or `id` is not an interface.
    pub fn complete_interface(&mut self, id: TypeId) -> bool {
        let objects = &self.objects;
        match self.types.get_mut(id.index()) {
            Some(Type::Interface(iface)) => iface.complete(|m| objects[m.index()].name.as_str()),
            _ => false,
        }
    }

    fn same_id(&self, a: ObjectId, b: ObjectId) -> bool {
        let (a, b) = (self.object(a), self.object(b));
        a.name == b.name && (is_exported(&a.name) || a.pkg == b.pkg)
    }

    fn identical_vars(&self, a: &[ObjectId], b: &[ObjectId]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| {
                match (self.object(*x).ty(), self.object(*y).ty()) {
                    (Some(x), Some(y)) => self.identical(x, y),
                    _ => false,
                }
            })
    }

    fn identical_signatures(&self, a: &Signature, b: &Signature) -> bool {
        a.variadic == b.variadic
            && self.identical_vars(&a.params, &b.params)
            && self.identical_vars(&a.results, &b.results)
    }

    fn sorted_methods<'a>(&'a self, methods: &[ObjectId]) -> Vec<(&'a str, ObjectId)> {
        let mut sorted: Vec<_> = methods
            .iter()
            .map(|&m| (self.object(m).name.as_str(), m))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted
    }

    /// Structural type identity.
    ///
    /// Named types are identical only to themselves; basic types compare by
    /// kind; composite types compare component-wise. Every cycle of the graph
    /// goes through a named type, so the recursion terminates.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }

        match (self.type_(a), self.type_(b)) {
            (Type::Basic(x), Type::Basic(y)) => x.kind == y.kind,
            (Type::Array(x), Type::Array(y)) => x.len == y.len && self.identical(x.elem, y.elem),
            (Type::Slice(x), Type::Slice(y)) => self.identical(x.elem, y.elem),
            (Type::Pointer(x), Type::Pointer(y)) => self.identical(x.elem, y.elem),
            (Type::Map(x), Type::Map(y)) => {
                self.identical(x.key, y.key) && self.identical(x.elem, y.elem)
            }
            (Type::Chan(x), Type::Chan(y)) => x.dir == y.dir && self.identical(x.elem, y.elem),
            (Type::Struct(x), Type::Struct(y)) => {
                x.fields.len() == y.fields.len()
                    && x.tags == y.tags
                    && x.fields.iter().zip(&y.fields).all(|(f, g)| {
                        self.object(*f).is_embedded_field() == self.object(*g).is_embedded_field()
                            && self.same_id(*f, *g)
                    })
                    && self.identical_vars(&x.fields, &y.fields)
            }
            (Type::Signature(x), Type::Signature(y)) => self.identical_signatures(x, y),
            (Type::Interface(x), Type::Interface(y)) => {
                let (xm, ym) = (
                    self.sorted_methods(x.methods()),
                    self.sorted_methods(y.methods()),
                );
                xm.len() == ym.len()
                    && xm.iter().zip(&ym).all(|((_, f), (_, g))| {
                        self.same_id(*f, *g)
                            && match (self.object(*f).ty(), self.object(*g).ty()) {
                                (Some(s), Some(t)) => {
                                    match (self.type_(s).as_signature(), self.type_(t).as_signature()) {
                                        (Some(s), Some(t)) => self.identical_signatures(s, t),
                                        _ => false,
                                    }
                                }
                                _ => false,
                            }
                    })
            }
            _ => false,
        }
    }
}
