mod common;

use common::{BOOL, ExportWriter, FLOAT64, INT, STRING, Session, UNTYPED_FLOAT};
use gcimport::{FormatError, intern::TableKind, tags::Tag};
use gotypes::{
    constant::ConstValue,
    object::ObjectKind,
    types::{ChanDir, Type},
};

/// `type A struct { next *A }`, optionally followed by `var P *A` referring
/// back to the tracked pointer type.
fn linked_list(track_all_types: bool) -> Vec<u8> {
    let mut w = ExportWriter::new(4, false, track_all_types, false);
    w.pkg("demo", "");
    w.tag(Tag::Type.value());
    let a = w.named("A", "demo", "");
    w.composite(Tag::Struct);
    w.int(1);
    w.pos("", 0);
    w.string("next");
    w.pkg("demo", "");
    let ptr = w.composite(Tag::Pointer);
    w.type_ref(a);
    w.string("");
    w.int(0);

    let mut count = 1;
    if let Some(ptr) = ptr {
        w.tag(Tag::Var.value());
        w.string("P");
        w.pkg("demo", "");
        w.type_ref(ptr);
        count += 1;
    }
    w.end(count);
    w.finish()
}

#[test]
fn self_referential_named_type() {
    for track_all_types in [false, true] {
        let mut session = Session::new();
        let pkg = session.import_demo(&linked_list(track_all_types));
        let universe = &session.universe;

        let a = session.type_of(pkg, "A");
        let st = universe.underlying(a).unwrap();
        let fields = &universe.type_(st).as_struct().unwrap().fields;
        assert_eq!(fields.len(), 1);

        let next = universe.object(fields[0]);
        assert_eq!(next.name, "next");
        assert_eq!(next.pkg, Some(pkg));
        let ptr = next.ty().unwrap();
        assert_eq!(universe.type_(ptr).elem(), Some(a));
        assert_eq!(universe.fmt_type(st).to_string(), "struct{next *example.com/demo.A}");

        if track_all_types {
            assert_eq!(session.type_of(pkg, "P"), ptr);
        }
    }
}

#[test]
fn reserved_slots_cannot_be_referenced() {
    let mut w = ExportWriter::new(4, false, true, false);
    w.pkg("demo", "");
    w.tag(Tag::Var.value());
    w.string("V");
    w.pkg("demo", "");
    let slice = w.composite(Tag::Slice).unwrap();
    w.type_ref(slice);
    w.end(1);

    let mut session = Session::new();
    assert_eq!(
        session.import_error(&w.finish()),
        FormatError::IncompleteEntry {
            table: TableKind::Type,
            index: slice as usize,
        }
    );
}

#[test]
fn named_types_carry_methods() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Type.value());
    let celsius = w.named("Celsius", "demo", "");
    w.type_ref(FLOAT64);
    w.int(2);
    for (name, results) in [("String", &[STRING][..]), ("scale", &[FLOAT64][..])] {
        w.pos("", 0);
        w.string(name);
        if name == "scale" {
            w.pkg("demo", "");
        }
        w.named_params("demo", &[("c", celsius)]);
        w.int(0);
        w.unnamed_params(results);
        w.int(0);
    }
    w.end(1);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let universe = &session.universe;
    let celsius = session.type_of(pkg, "Celsius");
    let named = universe.named(celsius).unwrap();
    assert_eq!(named.underlying(), Some(universe.predeclared()[FLOAT64 as usize]));
    assert_eq!(named.methods().len(), 2);

    let string = named.methods()[0];
    assert_eq!(
        universe.fmt_object(string).to_string(),
        "func (example.com/demo.Celsius) String() string"
    );
    let ObjectKind::Func { sig } = universe.object(string).kind else {
        panic!("methods are functions");
    };
    let recv = universe.type_(sig).as_signature().unwrap().recv.unwrap();
    assert_eq!(universe.object(recv).ty(), Some(celsius));
    assert_eq!(universe.object(named.methods()[1]).pkg, Some(pkg));
}

#[test]
fn interfaces_are_completed() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Type.value());
    w.named("Shape", "demo", "");
    w.composite(Tag::Interface);
    w.int(0);
    w.int(2);
    for name in ["Perimeter", "Area"] {
        w.pos("", 0);
        w.string(name);
        w.int(0);
        w.unnamed_params(&[FLOAT64]);
    }
    w.end(1);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let shape = session.type_of(pkg, "Shape");
    let iface = session.universe.underlying(shape).unwrap();
    let interface = session.universe.type_(iface).as_interface().unwrap();
    assert!(interface.is_complete());
    assert!(session.universe.named(shape).unwrap().methods().is_empty());
    assert_eq!(
        session.universe.fmt_type(iface).to_string(),
        "interface{Area() float64; Perimeter() float64}"
    );
    assert!(!session.universe.complete_interface(iface), "completed exactly once");
}

#[test]
fn embedded_interfaces_are_rejected() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Type.value());
    w.named("Shape", "demo", "");
    w.composite(Tag::Interface);
    w.int(1);

    let mut session = Session::new();
    assert_eq!(session.import_error(&w.finish()), FormatError::EmbeddedInterface);
}

#[test]
fn struct_fields_and_embedding() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");

    w.tag(Tag::Type.value());
    let inner = w.named("Inner", "demo", "");
    w.composite(Tag::Struct);
    w.int(0);
    w.int(0);

    w.tag(Tag::Type.value());
    w.named("Outer", "demo", "");
    w.composite(Tag::Struct);
    w.int(5);
    // *Inner
    w.string("");
    w.composite(Tag::Pointer);
    w.type_ref(inner);
    w.string("");
    // int
    w.string("?");
    w.pkg("demo", "");
    w.type_ref(INT);
    w.string("");
    // Name string `json:"name"`
    w.string("Name");
    w.type_ref(STRING);
    w.string("json:\"name\"");
    // hidden bool
    w.string("hidden");
    w.pkg("demo", "");
    w.type_ref(BOOL);
    w.string("");
    // Alias, an embedded alias of int
    w.string("@");
    w.string("Alias");
    w.type_ref(INT);
    w.string("");
    w.int(0);
    w.end(2);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let universe = &session.universe;
    let outer = universe.underlying(session.type_of(pkg, "Outer")).unwrap();
    let st = universe.type_(outer).as_struct().unwrap();

    let fields: Vec<_> = st
        .fields
        .iter()
        .map(|f| {
            let obj = universe.object(*f);
            (obj.name.as_str(), obj.is_embedded_field(), obj.pkg.is_some())
        })
        .collect();
    assert_eq!(
        fields,
        [
            ("Inner", true, true),
            ("int", true, false),
            ("Name", false, true),
            ("hidden", false, true),
            ("Alias", true, true),
        ]
    );
    assert_eq!(st.tags[2], b"json:\"name\"");
    assert_eq!(
        universe.fmt_type(outer).to_string(),
        "struct{*example.com/demo.Inner; int; Name string \"json:\\\"name\\\"\"; hidden bool; int}"
    );
}

#[test]
fn embedded_fields_need_a_type_name() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Var.value());
    w.string("V");
    w.pkg("demo", "");
    w.composite(Tag::Struct);
    w.int(1);
    w.string("");
    w.composite(Tag::Slice);
    w.type_ref(INT);
    w.string("");

    let mut session = Session::new();
    assert_eq!(session.import_error(&w.finish()), FormatError::EmbeddedNotNamed);
}

#[test]
fn variadic_parameters() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Func.value());
    w.string("Printf");
    w.pkg("demo", "");
    w.int(3);
    for (name, variadic) in [("format", false), ("_", false), ("args??2", true)] {
        if variadic {
            w.composite(Tag::Variadic);
            w.type_ref(INT);
        } else {
            w.type_ref(STRING);
        }
        w.string(name);
        if name != "_" {
            w.pkg("demo", "");
        }
        w.string("");
    }
    w.int(0);
    w.end(1);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let universe = &session.universe;
    let printf = universe.lookup(pkg, "Printf").unwrap();
    assert_eq!(
        universe.fmt_object(printf).to_string(),
        "func example.com/demo.Printf(format string, _ string, args ...int)"
    );

    let sig = universe.type_(session.type_of(pkg, "Printf")).as_signature().unwrap();
    assert!(sig.variadic);
    assert!(universe.object(sig.params[1]).pkg.is_none());
    let args = universe.object(sig.params[2]).ty().unwrap();
    assert!(universe.type_(args).is_slice());
}

#[test]
fn stray_variadic_types_are_rejected() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Var.value());
    w.string("V");
    w.pkg("demo", "");
    w.composite(Tag::Variadic);
    w.type_ref(INT);
    w.end(1);

    let mut session = Session::new();
    assert_eq!(session.import_error(&w.finish()), FormatError::StrayVariadic);
}

#[test]
fn unnamed_parameters_must_not_be_empty_names() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Func.value());
    w.string("F");
    w.pkg("demo", "");
    w.int(1);
    w.type_ref(INT);
    w.string("");

    let mut session = Session::new();
    assert_eq!(session.import_error(&w.finish()), FormatError::UnnamedParameter);
}

#[test]
fn channel_directions() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    for (name, dir) in [("Recv", 1), ("Send", 2), ("Both", 3)] {
        w.tag(Tag::Var.value());
        w.string(name);
        w.pkg("demo", "");
        w.composite(Tag::Chan);
        w.int(dir);
        w.type_ref(INT);
    }
    w.tag(Tag::Var.value());
    w.string("Nested");
    w.pkg("demo", "");
    w.composite(Tag::Chan);
    w.int(3);
    w.composite(Tag::Chan);
    w.int(1);
    w.type_ref(INT);
    w.end(4);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let dir = |name: &str| match session.universe.type_(session.type_of(pkg, name)) {
        Type::Chan(chan) => chan.dir,
        other => panic!("{name} is not a channel: {other:?}"),
    };
    assert_eq!(dir("Recv"), ChanDir::RecvOnly);
    assert_eq!(dir("Send"), ChanDir::SendOnly);
    assert_eq!(dir("Both"), ChanDir::SendRecv);
    let nested = session.type_of(pkg, "Nested");
    assert_eq!(session.universe.fmt_type(nested).to_string(), "chan (<-chan int)");

    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Var.value());
    w.string("Bad");
    w.pkg("demo", "");
    w.composite(Tag::Chan);
    w.int(7);
    assert_eq!(session.import_error(&w.finish()), FormatError::BadChanDir(7));
}

#[test]
fn composite_types() {
    let mut w = ExportWriter::new(4, false, true, false);
    w.pkg("demo", "");
    w.tag(Tag::Var.value());
    w.string("Table");
    w.pkg("demo", "");
    w.composite(Tag::Map);
    w.type_ref(STRING);
    w.composite(Tag::Array);
    w.int(4);
    w.type_ref(FLOAT64);

    w.tag(Tag::Var.value());
    w.string("Handler");
    w.pkg("demo", "");
    w.composite(Tag::Signature);
    w.unnamed_params(&[STRING, BOOL]);
    w.unnamed_params(&[common::ERROR]);
    w.end(2);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let fmt = |name: &str| {
        let ty = session.type_of(pkg, name);
        session.universe.fmt_type(ty).to_string()
    };
    assert_eq!(fmt("Table"), "map[string][4]float64");
    assert_eq!(fmt("Handler"), "func(string, bool) error");
}

#[test]
fn constant_values() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    let declare = |w: &mut ExportWriter, name: &str, ty: i64| {
        w.tag(Tag::Const.value());
        w.string(name);
        w.pkg("demo", "");
        w.type_ref(ty);
    };

    declare(&mut w, "Yes", BOOL);
    w.tag(Tag::True.value());
    declare(&mut w, "Answer", INT);
    w.tag(Tag::Int64.value());
    w.int(-42);
    declare(&mut w, "Big", UNTYPED_FLOAT);
    w.tag(Tag::Float.value());
    w.float(1e100);
    declare(&mut w, "Zero", UNTYPED_FLOAT);
    w.tag(Tag::Float.value());
    w.float(0.0);
    declare(&mut w, "Wave", common::UNTYPED_COMPLEX);
    w.tag(Tag::Complex.value());
    w.float(1.5);
    w.float(-2.0);
    declare(&mut w, "Broken", INT);
    w.tag(Tag::Unknown.value());
    w.end(6);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let value = |name: &str| {
        let obj = session.universe.lookup(pkg, name).unwrap();
        session.universe.object(obj).const_value().unwrap().clone()
    };
    assert_eq!(value("Yes"), ConstValue::Bool(true));
    assert_eq!(value("Answer"), ConstValue::from(-42i64));
    let big = value("Big");
    assert!(big.is_int(), "integral floats are integers");
    assert_eq!(big.to_f64(), Some(1e100));
    assert_eq!(value("Zero"), ConstValue::from(0i64));
    assert_eq!(value("Wave").to_string(), "(1.5 + -2i)");
    assert_eq!(value("Broken"), ConstValue::Unknown);
}

#[test]
fn fraction_values_are_rejected() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Const.value());
    w.string("F");
    w.pkg("demo", "");
    w.type_ref(UNTYPED_FLOAT);
    w.tag(Tag::Fraction.value());

    let mut session = Session::new();
    assert_eq!(
        session.import_error(&w.finish()),
        FormatError::UnexpectedTag {
            context: "value",
            tag: Tag::Fraction.value(),
        }
    );
}

#[test]
fn type_names_must_denote_named_types() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Const.value());
    w.string("T");
    w.pkg("demo", "");
    w.type_ref(INT);
    w.tag(Tag::Int64.value());
    w.int(1);
    w.tag(Tag::Type.value());
    w.named("T", "demo", "");
    w.type_ref(INT);
    w.int(0);
    w.end(2);

    let mut session = Session::new();
    assert_eq!(
        session.import_error(&w.finish()),
        FormatError::NotANamedType {
            pkg: "example.com/demo".to_owned(),
            name: "T".to_owned(),
        }
    );
}

#[test]
fn aliases_bind_existing_types() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Alias.value());
    w.string("Byte");
    w.pkg("demo", "");
    w.type_ref(17);
    w.tag(Tag::Alias.value());
    w.string("Byte");
    w.pkg("demo", "");
    w.type_ref(7);
    w.end(2);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let universe = &session.universe;
    let alias = universe.lookup(pkg, "Byte").unwrap();
    assert_eq!(universe.object(alias).ty(), Some(universe.predeclared()[17]));
    assert_eq!(
        universe.fmt_object(alias).to_string(),
        "type example.com/demo.Byte = byte"
    );
}

#[test]
fn empty_alias_names_carry_a_package() {
    let mut w = ExportWriter::compact();
    w.pkg("demo", "");
    w.tag(Tag::Type.value());
    w.named("Wrapper", "demo", "");
    w.composite(Tag::Struct);
    w.int(1);
    w.string("@");
    w.string("");
    w.pkg("demo", "");
    w.type_ref(INT);
    w.string("");
    w.int(0);
    w.end(1);

    let mut session = Session::new();
    let pkg = session.import_demo(&w.finish());
    let universe = &session.universe;
    let st = universe.underlying(session.type_of(pkg, "Wrapper")).unwrap();
    let st = universe.type_(st).as_struct().unwrap();
    let field = universe.object(st.fields[0]);
    assert_eq!(field.name, "int");
    assert!(field.is_embedded_field());
    assert_eq!(field.pkg, None);
}
