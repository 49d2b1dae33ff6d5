use placid::{Case, Inspect, Recorder, Scope, Value};
use pretty_assertions::assert_eq;
use std::cell::RefCell;

#[derive(Inspect)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Inspect)]
struct Meters(f64);

#[derive(Inspect)]
struct Feet(f64);

#[derive(Inspect)]
struct Pair<T>(T, T);

#[derive(Inspect)]
struct Marker;

#[derive(Inspect)]
struct Cached {
    id: u32,
    #[inspect(skip)]
    #[allow(dead_code)]
    scratch: RefCell<Vec<u8>>,
}

#[derive(Inspect)]
enum Shape {
    Circle(f64),
    Rect { w: f64, h: f64 },
    Empty,
}

fn failures_of(body: impl FnOnce(&placid::Expect<'_>)) -> Vec<String> {
    let scope = Scope::new();
    let recorder = Recorder::new();
    Case::new("derived", &scope, body).run(&recorder);
    recorder.messages()
}

#[test]
fn structs_compare_field_by_field() {
    let messages = failures_of(|expect| {
        expect.that(Point { x: 1, y: 2 }).to_equal(Point { x: 1, y: 2 });
        expect.that(Point { x: 1, y: 2 }).to_not_equal(Point { x: 2, y: 1 });
        expect.that(Point { x: 1, y: 2 }).to_not_be_empty();
        expect.that(Marker).to_not_be_empty();
        expect.that(Marker).to_not_be_nil();
    });
    assert!(messages.is_empty(), "{messages:?}");
}

#[test]
fn newtypes_convert_to_their_underlying_value() {
    let messages = failures_of(|expect| {
        expect.that(Meters(2.0)).to_equal(2.0);
        expect.that(Meters(2.0)).to_equal(2);
        expect.that(Meters(2.0)).to_equal(Feet(2.0));
        expect.that(Meters(2.0)).to_not_be_the_same(Feet(2.0));
        expect.that(Meters(0.0)).to_be_empty();
    });
    assert!(messages.is_empty(), "{messages:?}");
}

#[test]
fn enums_carry_variant_names() {
    assert_eq!(Shape::Circle(1.0).to_value().to_string(), "Shape::Circle { 0: 1.0 }");
    assert_eq!(
        Shape::Rect { w: 1.0, h: 2.0 }.to_value().to_string(),
        "Shape::Rect { w: 1.0, h: 2.0 }"
    );
    assert_eq!(Shape::Empty.to_value().to_string(), "Shape::Empty");

    let messages = failures_of(|expect| {
        expect.that(Shape::Circle(1.0)).to_not_equal(Shape::Empty);
        expect.that(Shape::Circle(1.0)).to_be_the_same(Shape::Circle(1.0));
    });
    assert!(messages.is_empty(), "{messages:?}");
}

#[test]
fn generic_and_skipped_fields() {
    assert_eq!(Pair(1u8, 2u8).to_value().to_string(), "Pair { 0: 1, 1: 2 }");
    let cached = Cached {
        id: 7,
        scratch: RefCell::new(vec![1, 2, 3]),
    };
    match cached.to_value() {
        Value::Struct { name, fields } => {
            assert_eq!(name, "Cached");
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].0, "id");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn failure_message_renders_derived_values() {
    assert_eq!(
        failures_of(|expect| {
            expect.that(Point { x: 1, y: 2 }).to_equal(Point { x: 0, y: 0 });
        }),
        vec!["Expected `Point { x: 1, y: 2 }` to equal `Point { x: 0, y: 0 }`"]
    );
}
