//! End-to-end tests: parse → bind → translate → compose over in-memory rows.

use odaq::schema::{PropertyDef, SchemaRegistry, TypeSchema};
use odaq::{
    apply_filter, apply_ordering, compose_filter, compose_ordering, parse_filter, parse_ordering,
    DataType, Record, Row, Value,
};

fn schema() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry
        .define_type(TypeSchema::new(
            "Person",
            vec![
                PropertyDef::required("Id", DataType::Int32),
                PropertyDef::primitive("FirstName", DataType::String),
                PropertyDef::primitive("LastName", DataType::String),
                PropertyDef::primitive("Age", DataType::Int32),
                PropertyDef::primitive("Salary", DataType::Double),
                PropertyDef::primitive("Hired", DataType::DateTime),
                PropertyDef::complex("Address", "Address"),
            ],
        ))
        .unwrap();
    registry
        .define_type(TypeSchema::new(
            "Address",
            vec![
                PropertyDef::primitive("City", DataType::String),
                PropertyDef::primitive("Zip", DataType::String),
            ],
        ))
        .unwrap();
    registry
        .define_type(
            TypeSchema::new(
                "Document",
                vec![PropertyDef::primitive("Title", DataType::String)],
            )
            .open(),
        )
        .unwrap();
    registry
}

fn person(id: i32, first: &str, last: &str, age: i32) -> Row {
    Row::new()
        .with("Id", Value::Int32(id))
        .with("FirstName", Value::String(first.into()))
        .with("LastName", Value::String(last.into()))
        .with("Age", Value::Int32(age))
}

fn ids(rows: &[Row]) -> Vec<i32> {
    rows.iter()
        .map(|r| match r.get("Id") {
            Some(Value::Int32(id)) => id,
            _ => panic!("missing Id"),
        })
        .collect()
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_age_range_filter_end_to_end() {
    let people = vec![
        person(1, "Ann", "Ames", 10),
        person(2, "Ben", "Boone", 30),
        person(3, "Cal", "Cole", 70),
    ];
    let result = compose_filter(people, "Age gt 18 and Age lt 65", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![2]);
}

#[test]
fn test_filter_with_functions() {
    let people = vec![
        person(1, "Ann", "Ames", 10),
        person(2, "Ben", "Boone", 30),
        person(3, "Abe", "Cole", 70),
    ];
    let result = compose_filter(
        people,
        "startswith(FirstName, 'A') and length(LastName) ge 5",
        "Person",
        &schema(),
    )
    .unwrap();
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn test_filter_name_eq_null() {
    let mut nameless = person(1, "x", "y", 20);
    nameless.set("FirstName", Value::Null);
    let people = vec![nameless, person(2, "Ben", "Boone", 30)];

    let result = compose_filter(people, "FirstName eq null", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn test_filter_null_propagation_excludes() {
    let mut nameless = person(1, "x", "y", 20);
    nameless.set("FirstName", Value::Null);
    let people = vec![nameless, person(2, "Ben", "Boone", 30)];

    // Comparison against a null-valued property is unknown, not a match.
    let result = compose_filter(people, "FirstName eq 'Ben'", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![2]);
}

#[test]
fn test_filter_nested_navigation() {
    let lisbon = person(1, "Ann", "Ames", 30).with(
        "Address",
        Value::Record(Row::new().with("City", Value::String("Lisbon".into()))),
    );
    let nowhere = person(2, "Ben", "Boone", 30);
    let result = compose_filter(
        vec![lisbon, nowhere],
        "Address.City eq 'Lisbon'",
        "Person",
        &schema(),
    )
    .unwrap();
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn test_filter_reusable_clause() {
    let clause = parse_filter("Age ge 18", "Person", &schema()).unwrap();
    let adults = apply_filter(vec![person(1, "a", "b", 20)], &clause);
    assert_eq!(adults.len(), 1);
    let minors = apply_filter(vec![person(2, "c", "d", 10)], &clause);
    assert_eq!(minors.len(), 0);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_order_by_multi_key_with_ties() {
    let people = vec![
        person(1, "Ann", "Smith", 30),
        person(2, "Ben", "Smith", 40),
        person(3, "Cal", "Adams", 20),
    ];
    let result = compose_ordering(people, "LastName asc,Age desc", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![3, 2, 1]);
}

#[test]
fn test_order_by_stability_for_fully_equal_keys() {
    // Items equal in every key keep their original relative order.
    let people = vec![
        person(1, "Ann", "Smith", 30),
        person(2, "Ben", "Smith", 30),
        person(3, "Cal", "Smith", 30),
    ];
    let result = compose_ordering(people, "LastName asc,Age desc", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![1, 2, 3]);
}

#[test]
fn test_order_by_nulls_sort_first_ascending() {
    let mut unaged = person(2, "Ben", "Boone", 0);
    unaged.set("Age", Value::Null);
    let people = vec![person(1, "Ann", "Ames", 30), unaged];
    let result = compose_ordering(people, "Age", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![2, 1]);
}

#[test]
fn test_order_by_default_direction_is_ascending() {
    let people = vec![person(1, "a", "b", 30), person(2, "c", "d", 20)];
    let result = compose_ordering(people, "Age", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![2, 1]);
}

#[test]
fn test_order_by_expression_key() {
    let people = vec![
        person(1, "Ann", "Fitzgerald", 30),
        person(2, "Ben", "Li", 20),
    ];
    let result = compose_ordering(people, "length(LastName)", "Person", &schema()).unwrap();
    assert_eq!(ids(&result), vec![2, 1]);
}

#[test]
fn test_filter_then_order_composition() {
    let people = vec![
        person(1, "Ann", "Smith", 30),
        person(2, "Ben", "Smith", 40),
        person(3, "Cal", "Adams", 10),
        person(4, "Dee", "Adams", 25),
    ];
    let registry = schema();
    let clause = parse_filter("Age ge 18", "Person", &registry).unwrap();
    let info = parse_ordering("LastName asc,Age asc", "Person", &registry).unwrap();

    let result = apply_ordering(apply_filter(people, &clause), &info);
    assert_eq!(ids(&result), vec![4, 1, 2]);
}

// =============================================================================
// Open types
// =============================================================================

#[test]
fn test_open_type_dynamic_filter() {
    let docs = vec![
        Row::new()
            .with("Title", Value::String("intro".into()))
            .with("Rating", Value::Int32(5)),
        Row::new()
            .with("Title", Value::String("outro".into()))
            .with("Rating", Value::Int32(2)),
        // No Rating at all: dynamic lookup misses, reads as null, excluded.
        Row::new().with("Title", Value::String("draft".into())),
    ];
    let result = compose_filter(docs, "Rating ge 4", "Document", &schema()).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(
        result[0].get("Title"),
        Some(Value::String("intro".into()))
    );
}

#[test]
fn test_open_type_dynamic_ordering() {
    let docs = vec![
        Row::new()
            .with("Title", Value::String("b".into()))
            .with("Rank", Value::Int32(2)),
        Row::new()
            .with("Title", Value::String("a".into()))
            .with("Rank", Value::Int32(1)),
        Row::new().with("Title", Value::String("unranked".into())),
    ];
    let result = compose_ordering(docs, "Rank desc", "Document", &schema()).unwrap();
    assert_eq!(
        result[0].get("Title"),
        Some(Value::String("b".into()))
    );
    // Missing dynamic key reads null and sorts last under descending.
    assert_eq!(
        result[2].get("Title"),
        Some(Value::String("unranked".into()))
    );
}

#[test]
fn test_same_property_open_vs_closed_type() {
    let registry = schema();
    // Undeclared on a closed type: rejected at bind time.
    assert!(parse_filter("Rating ge 4", "Person", &registry).is_err());
    // Same clause on an open type: compiles, resolution deferred.
    assert!(parse_filter("Rating ge 4", "Document", &registry).is_ok());
}

// =============================================================================
// Error propagation
// =============================================================================

#[test]
fn test_compose_propagates_clause_errors() {
    let people = vec![person(1, "Ann", "Ames", 30)];
    assert!(compose_filter(people.clone(), "Age gt", "Person", &schema()).is_err());
    assert!(compose_filter(people.clone(), "Nope eq 1", "Person", &schema()).is_err());
    assert!(compose_ordering(people, "Address", "Person", &schema()).is_err());
}

#[test]
fn test_typed_literals_end_to_end() {
    let hired = chrono::NaiveDateTime::parse_from_str("2015-03-01T09:00:00", "%Y-%m-%dT%H:%M:%S")
        .unwrap();
    let people = vec![
        person(1, "Ann", "Ames", 30).with("Hired", Value::DateTime(hired)),
        person(2, "Ben", "Boone", 30),
    ];
    let result = compose_filter(
        people,
        "Hired gt datetime'2015-01-01T00:00:00' and year(Hired) eq 2015",
        "Person",
        &schema(),
    )
    .unwrap();
    assert_eq!(ids(&result), vec![1]);
}
