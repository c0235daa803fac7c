use gotypes::{
    TypesError,
    object::Object,
    position::Pos,
    types::{BasicKind, InterfaceType, NamedType, Signature, Type},
    universe::Universe,
};

fn method(universe: &mut Universe, name: &str, result: BasicKind) -> gotypes::object::ObjectId {
    let result = universe.basic(result).unwrap();
    let result = universe.alloc_object(Object::new_var(None, "", Pos::NONE, result));
    let sig = universe.alloc_type(Type::Signature(Signature {
        recv: None,
        params: Vec::new(),
        results: vec![result],
        variadic: false,
    }));
    universe.alloc_object(Object::new_func(None, name, Pos::NONE, sig))
}

#[test]
fn interfaces_compare_by_method_set() {
    let mut universe = Universe::new();
    let a = method(&mut universe, "Area", BasicKind::Float64);
    let p = method(&mut universe, "Perimeter", BasicKind::Float64);
    let x = universe.alloc_type(Type::Interface(InterfaceType::new(vec![a, p])));

    let p2 = method(&mut universe, "Perimeter", BasicKind::Float64);
    let a2 = method(&mut universe, "Area", BasicKind::Float64);
    let y = universe.alloc_type(Type::Interface(InterfaceType::new(vec![p2, a2])));

    let a3 = method(&mut universe, "Area", BasicKind::Int);
    let z = universe.alloc_type(Type::Interface(InterfaceType::new(vec![a3, p2])));

    assert!(universe.identical(x, y));
    assert!(!universe.identical(x, z));
}

#[test]
fn completed_interfaces_are_frozen() {
    let mut universe = Universe::new();
    let m = method(&mut universe, "M", BasicKind::Bool);
    let n = method(&mut universe, "N", BasicKind::Bool);
    let iface = universe.alloc_type(Type::Interface(InterfaceType::new(vec![n])));

    assert!(universe.complete_interface(iface));
    assert!(!universe.complete_interface(iface));
    let Some(interface) = universe.type_mut(iface).as_interface_mut() else {
        panic!("allocated an interface");
    };
    assert_eq!(interface.add_method(m), Err(TypesError::InterfaceComplete));
}

#[test]
fn named_types_are_only_identical_to_themselves() {
    let mut universe = Universe::new();
    let int = universe.basic(BasicKind::Int).unwrap();
    let pkg = universe.new_package("example.com/units", "units");

    let mut declare = |name: &str| {
        let obj = universe.alloc_object(Object::new_type_name(Some(pkg), name, Pos::NONE, None));
        let mut named = NamedType::new(obj);
        named.set_underlying(int).unwrap();
        assert_eq!(named.set_underlying(int), Err(TypesError::UnderlyingAlreadySet));
        universe.alloc_type(Type::Named(named))
    };
    let meters = declare("Meters");
    let feet = declare("Feet");

    assert!(universe.identical(meters, meters));
    assert!(!universe.identical(meters, feet));
    assert!(!universe.identical(meters, int));
    assert_eq!(universe.underlying(feet), Some(int));
    assert_eq!(universe.fmt_type(feet).to_string(), "example.com/units.Feet");
}

#[test]
fn documentation_layer_sees_exported_names() {
    let mut universe = Universe::new();
    let pkg = universe.new_package("example.com/demo", "demo");
    let string = universe.basic(BasicKind::String).unwrap();
    for name in ["Version", "internal", "Name"] {
        let obj = universe.alloc_object(Object::new_var(Some(pkg), name, Pos::NONE, string));
        assert_eq!(universe.insert(pkg, obj), None);
    }

    let listing: Vec<String> = universe
        .exported_objects(pkg)
        .map(|(id, _)| universe.fmt_object(id).to_string())
        .collect();
    assert_eq!(
        listing,
        [
            "var example.com/demo.Name string",
            "var example.com/demo.Version string",
        ]
    );
}
