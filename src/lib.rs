//! odaq - an embeddable OData-style query expression compiler.
//!
//! Compiles textual filter and order-by clauses (the `$filter` / `$orderby`
//! expression language found in request URLs) into executable predicates
//! and comparators: lex → parse → bind types against a schema → lower to
//! closures composable onto any queryable source.
//!
//! # Example
//!
//! ```
//! use odaq::schema::{PropertyDef, SchemaRegistry, TypeSchema};
//! use odaq::{compose_filter, DataType, Row, Value};
//!
//! let mut schema = SchemaRegistry::new();
//! schema
//!     .define_type(TypeSchema::new(
//!         "Person",
//!         vec![
//!             PropertyDef::primitive("Name", DataType::String),
//!             PropertyDef::primitive("Age", DataType::Int32),
//!         ],
//!     ))
//!     .unwrap();
//!
//! let people = vec![
//!     Row::new().with("Name", Value::String("Ada".into())).with("Age", Value::Int32(36)),
//!     Row::new().with("Name", Value::String("Bob".into())).with("Age", Value::Int32(17)),
//! ];
//!
//! let adults = compose_filter(people, "Age ge 18", "Person", &schema).unwrap();
//! assert_eq!(adults.len(), 1);
//! ```

pub mod binder;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod schema;
pub mod translate;
pub mod types;

use tracing::debug;

pub use binder::{Binder, BoundNode, ExprType, FilterClause, OrderingExpression, OrderingInfo};
pub use error::{Error, Result};
pub use options::CompileOptions;
pub use schema::{SchemaProvider, SchemaRegistry};
pub use translate::{
    compose_comparator, translate_filter, translate_ordering, Comparator, KeySelector, Predicate,
    SortKey,
};
pub use types::{DataType, Record, Row, Truth, Value};

/// Parses and binds a filter clause against a schema context.
///
/// # Errors
///
/// Returns a lexical, parse, or type error; the clause either fully
/// compiles or is rejected as a whole.
pub fn parse_filter(
    text: &str,
    root_type: &str,
    provider: &dyn SchemaProvider,
) -> Result<FilterClause> {
    parse_filter_with(text, root_type, provider, &CompileOptions::default())
}

/// Parses and binds a filter clause with explicit compilation limits.
///
/// # Errors
///
/// Returns a lexical, parse, or type error; the clause either fully
/// compiles or is rejected as a whole.
pub fn parse_filter_with(
    text: &str,
    root_type: &str,
    provider: &dyn SchemaProvider,
    options: &CompileOptions,
) -> Result<FilterClause> {
    debug!(root_type, clause_len = text.len(), "compiling filter clause");
    let node = parser::parse_filter_expression_with(text, options)?;
    Binder::new(provider, root_type).bind_filter(&node)
}

/// Parses and binds an order-by clause against a schema context.
///
/// # Errors
///
/// Returns a lexical, parse, or type error; the clause either fully
/// compiles or is rejected as a whole.
pub fn parse_ordering(
    text: &str,
    root_type: &str,
    provider: &dyn SchemaProvider,
) -> Result<OrderingInfo> {
    parse_ordering_with(text, root_type, provider, &CompileOptions::default())
}

/// Parses and binds an order-by clause with explicit compilation limits.
///
/// # Errors
///
/// Returns a lexical, parse, or type error; the clause either fully
/// compiles or is rejected as a whole.
pub fn parse_ordering_with(
    text: &str,
    root_type: &str,
    provider: &dyn SchemaProvider,
    options: &CompileOptions,
) -> Result<OrderingInfo> {
    debug!(root_type, clause_len = text.len(), "compiling order-by clause");
    let items = parser::parse_order_by_with(text, options)?;
    Binder::new(provider, root_type).bind_order_by(&items)
}

/// An abstract queryable source supporting predicate and ordering
/// composition.
///
/// Implementations compose lazily where they can; evaluation is the
/// execution engine's concern, not this crate's.
pub trait Queryable: Sized {
    /// Narrows the source to items the predicate admits.
    #[must_use]
    fn filter(self, predicate: Predicate) -> Self;

    /// Orders the source by the given keys; the underlying sort must be
    /// stable so that items equal under every key keep their relative
    /// order.
    #[must_use]
    fn order_by(self, keys: Vec<SortKey>) -> Self;
}

/// Composes a bound filter clause onto a queryable source.
#[must_use]
pub fn apply_filter<Q: Queryable>(source: Q, clause: &FilterClause) -> Q {
    source.filter(translate_filter(clause))
}

/// Composes bound order-by keys onto a queryable source.
#[must_use]
pub fn apply_ordering<Q: Queryable>(source: Q, info: &OrderingInfo) -> Q {
    source.order_by(translate_ordering(info))
}

/// One-shot helper: compiles a filter clause and composes it onto a source.
///
/// # Errors
///
/// Returns a lexical, parse, or type error from clause compilation.
pub fn compose_filter<Q: Queryable>(
    source: Q,
    text: &str,
    root_type: &str,
    provider: &dyn SchemaProvider,
) -> Result<Q> {
    let clause = parse_filter(text, root_type, provider)?;
    Ok(apply_filter(source, &clause))
}

/// One-shot helper: compiles an order-by clause and composes it onto a
/// source.
///
/// # Errors
///
/// Returns a lexical, parse, or type error from clause compilation.
pub fn compose_ordering<Q: Queryable>(
    source: Q,
    text: &str,
    root_type: &str,
    provider: &dyn SchemaProvider,
) -> Result<Q> {
    let info = parse_ordering(text, root_type, provider)?;
    Ok(apply_ordering(source, &info))
}

/// In-memory queryable over rows, used by tests and embedded callers.
impl Queryable for Vec<Row> {
    fn filter(self, predicate: Predicate) -> Self {
        self.into_iter()
            .filter(|row| predicate(row).is_true())
            .collect()
    }

    fn order_by(mut self, keys: Vec<SortKey>) -> Self {
        let comparator = compose_comparator(keys);
        // Vec::sort_by is stable: equal items keep their relative order.
        self.sort_by(|a, b| comparator(a, b));
        self
    }
}
