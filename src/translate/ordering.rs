//! Multi-key comparator composition for order-by clauses.

use std::cmp::Ordering;

use crate::types::{promote_pair, Record, Value};

use super::KeySelector;

/// One translated order-by key: an extractor and its direction.
pub struct SortKey {
    /// Key value extractor.
    pub selector: KeySelector,
    /// Sort direction (true = asc, false = desc).
    pub ascending: bool,
}

/// Composite comparator over two items.
pub type Comparator = Box<dyn Fn(&dyn Record, &dyn Record) -> Ordering + Send + Sync>;

/// Composes order-by keys into a single comparator.
///
/// Keys are compared in listed order, each honoring its own direction; the
/// first difference wins and all-equal yields `Ordering::Equal`, leaving
/// stability to the underlying sort. Nulls sort before any non-null value
/// under ascending order.
#[must_use]
pub fn compose_comparator(keys: Vec<SortKey>) -> Comparator {
    Box::new(move |a, b| {
        for key in &keys {
            let va = (key.selector)(a);
            let vb = (key.selector)(b);
            let ordering = compare_key_values(va, vb);
            let ordering = if key.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    })
}

/// Null-first total order over key values; dynamically-typed incomparable
/// pairs compare equal.
fn compare_key_values(a: Value, b: Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => {
            let (a, b) = promote_pair(a, b);
            a.compare(&b).unwrap_or(Ordering::Equal)
        }
    }
}
