//! Lowering bound trees into executable closures.
//!
//! Translation is a pure structural recursion: each bound node becomes a
//! closure capturing only owned data cloned out of the tree, so translating
//! the same tree twice yields functionally identical artifacts. All failure
//! modes are handled at bind time; evaluation is total and degrades to null
//! instead of erroring.

mod functions;
mod ordering;

pub use ordering::{compose_comparator, Comparator, SortKey};

use crate::binder::{ArithmeticOp, BoundNode, ComparisonOp, FilterClause, LogicalOp, OrderingInfo};
use crate::types::{promote_pair, Record, Truth, Value};

/// Executable filter: evaluates one item to a three-valued boolean.
pub type Predicate = Box<dyn Fn(&dyn Record) -> Truth + Send + Sync>;

/// Executable order-by key extractor.
pub type KeySelector = Box<dyn Fn(&dyn Record) -> Value + Send + Sync>;

/// Internal value-producing closure; predicates and key selectors are
/// thin wrappers over these.
type Evaluator = Box<dyn Fn(&dyn Record) -> Value + Send + Sync>;

/// Lowers a bound filter clause into an executable predicate.
///
/// Only an evaluation to `Bool(true)` admits an item; null and non-boolean
/// dynamic results read as unknown and exclude it.
#[must_use]
pub fn translate_filter(clause: &FilterClause) -> Predicate {
    let eval = lower(&clause.expression);
    Box::new(move |item| Truth::from_value(&eval(item)))
}

/// Lowers bound order-by keys into key selectors with directions.
#[must_use]
pub fn translate_ordering(info: &OrderingInfo) -> Vec<SortKey> {
    info.expressions
        .iter()
        .map(|expr| SortKey {
            selector: lower(&expr.selector),
            ascending: expr.ascending,
        })
        .collect()
}

fn lower(node: &BoundNode) -> Evaluator {
    match node {
        BoundNode::Literal { value, .. } => {
            let value = value.clone();
            Box::new(move |_| value.clone())
        }
        BoundNode::Property { path, .. } => {
            let path = path.clone();
            Box::new(move |item| read_path(item, &path))
        }
        BoundNode::OpenProperty { source, name, .. } => {
            let name = name.clone();
            match source {
                // An absent dynamic property reads as null.
                None => Box::new(move |item| item.try_dynamic(&name).unwrap_or(Value::Null)),
                Some(source) => {
                    let source = lower(source);
                    Box::new(move |item| match source(item) {
                        Value::Record(row) => row.try_dynamic(&name).unwrap_or(Value::Null),
                        _ => Value::Null,
                    })
                }
            }
        }
        BoundNode::Comparison {
            op, left, right, ..
        } => {
            // `eq null` / `ne null` against the null literal are null tests;
            // nulls arising from evaluation propagate instead.
            if matches!(op, ComparisonOp::Eq | ComparisonOp::Ne) {
                let negated = *op == ComparisonOp::Ne;
                match (is_null_literal(left), is_null_literal(right)) {
                    (true, false) => return null_test(lower(right), negated),
                    (false, true) => return null_test(lower(left), negated),
                    _ => {}
                }
            }
            let op = *op;
            let left = lower(left);
            let right = lower(right);
            Box::new(move |item| compare_values(op, left(item), right(item)))
        }
        BoundNode::Logical {
            op, left, right, ..
        } => {
            let op = *op;
            let left = lower(left);
            let right = lower(right);
            Box::new(move |item| {
                let a = Truth::from_value(&left(item));
                match op {
                    LogicalOp::And => {
                        if a == Truth::False {
                            return Value::Bool(false);
                        }
                        a.and(Truth::from_value(&right(item))).to_value()
                    }
                    LogicalOp::Or => {
                        if a == Truth::True {
                            return Value::Bool(true);
                        }
                        a.or(Truth::from_value(&right(item))).to_value()
                    }
                }
            })
        }
        BoundNode::Not { operand, .. } => {
            let operand = lower(operand);
            Box::new(move |item| Truth::from_value(&operand(item)).negate().to_value())
        }
        BoundNode::Negate { operand, .. } => {
            let operand = lower(operand);
            Box::new(move |item| negate_value(operand(item)))
        }
        BoundNode::Arithmetic {
            op, left, right, ..
        } => {
            let op = *op;
            let left = lower(left);
            let right = lower(right);
            Box::new(move |item| arithmetic_values(op, left(item), right(item)))
        }
        BoundNode::FunctionCall { function, args, .. } => {
            let function = *function;
            let args: Vec<Evaluator> = args.iter().map(lower).collect();
            Box::new(move |item| {
                let values: Vec<Value> = args.iter().map(|arg| arg(item)).collect();
                functions::apply(function, &values)
            })
        }
    }
}

fn is_null_literal(node: &BoundNode) -> bool {
    matches!(
        node,
        BoundNode::Literal {
            value: Value::Null,
            ..
        }
    )
}

fn null_test(eval: Evaluator, negated: bool) -> Evaluator {
    Box::new(move |item| Value::Bool(eval(item).is_null() != negated))
}

/// Walks a static dotted path; null or missing intermediates yield null.
fn read_path(item: &dyn Record, path: &[String]) -> Value {
    let mut segments = path.iter();
    let Some(first) = segments.next() else {
        return Value::Null;
    };
    let mut current = item.get(first).unwrap_or(Value::Null);
    for segment in segments {
        current = match current {
            Value::Record(row) => row.get(segment).unwrap_or(Value::Null),
            _ => return Value::Null,
        };
    }
    current
}

fn compare_values(op: ComparisonOp, a: Value, b: Value) -> Value {
    if a.is_null() || b.is_null() {
        return Value::Null;
    }
    let (a, b) = promote_pair(a, b);
    match a.compare(&b) {
        // Dynamically-typed operands of incompatible types.
        None => Value::Null,
        Some(ordering) => {
            use std::cmp::Ordering::{Equal, Greater, Less};
            let result = match op {
                ComparisonOp::Eq => ordering == Equal,
                ComparisonOp::Ne => ordering != Equal,
                ComparisonOp::Lt => ordering == Less,
                ComparisonOp::Le => ordering != Greater,
                ComparisonOp::Gt => ordering == Greater,
                ComparisonOp::Ge => ordering != Less,
            };
            Value::Bool(result)
        }
    }
}

fn negate_value(value: Value) -> Value {
    match value {
        Value::Int32(n) => n.checked_neg().map_or(Value::Null, Value::Int32),
        Value::Int64(n) => n.checked_neg().map_or(Value::Null, Value::Int64),
        Value::Single(f) => Value::Single(-f),
        Value::Double(f) => Value::Double(-f),
        Value::Decimal(d) => Value::Decimal(-d),
        _ => Value::Null,
    }
}

fn arithmetic_values(op: ArithmeticOp, a: Value, b: Value) -> Value {
    if a.is_null() || b.is_null() {
        return Value::Null;
    }
    let (a, b) = promote_pair(a, b);
    match (a, b) {
        (Value::Int32(x), Value::Int32(y)) => {
            let result = match op {
                ArithmeticOp::Add => x.checked_add(y),
                ArithmeticOp::Sub => x.checked_sub(y),
                ArithmeticOp::Mul => x.checked_mul(y),
                ArithmeticOp::Div => x.checked_div(y),
                ArithmeticOp::Mod => x.checked_rem(y),
            };
            result.map_or(Value::Null, Value::Int32)
        }
        (Value::Int64(x), Value::Int64(y)) => {
            let result = match op {
                ArithmeticOp::Add => x.checked_add(y),
                ArithmeticOp::Sub => x.checked_sub(y),
                ArithmeticOp::Mul => x.checked_mul(y),
                ArithmeticOp::Div => x.checked_div(y),
                ArithmeticOp::Mod => x.checked_rem(y),
            };
            result.map_or(Value::Null, Value::Int64)
        }
        (Value::Single(x), Value::Single(y)) => Value::Single(match op {
            ArithmeticOp::Add => x + y,
            ArithmeticOp::Sub => x - y,
            ArithmeticOp::Mul => x * y,
            ArithmeticOp::Div => x / y,
            ArithmeticOp::Mod => x % y,
        }),
        (Value::Double(x), Value::Double(y)) => Value::Double(match op {
            ArithmeticOp::Add => x + y,
            ArithmeticOp::Sub => x - y,
            ArithmeticOp::Mul => x * y,
            ArithmeticOp::Div => x / y,
            ArithmeticOp::Mod => x % y,
        }),
        (Value::Decimal(x), Value::Decimal(y)) => {
            let result = match op {
                ArithmeticOp::Add => x.checked_add(y),
                ArithmeticOp::Sub => x.checked_sub(y),
                ArithmeticOp::Mul => x.checked_mul(y),
                ArithmeticOp::Div => x.checked_div(y),
                ArithmeticOp::Mod => x.checked_rem(y),
            };
            result.map_or(Value::Null, Value::Decimal)
        }
        // Dynamically-typed operands of incompatible types.
        _ => Value::Null,
    }
}
