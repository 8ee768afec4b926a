//! Evaluation of the built-in function registry.
//!
//! Every function null-propagates: any null argument yields null. Dynamic
//! arguments of the wrong runtime type also yield null, mirroring the
//! open-type comparison behavior.

use chrono::{Datelike, Timelike};

use crate::parser::ast::Function;
use crate::types::Value;

/// Applies a built-in function to already-evaluated arguments.
pub(crate) fn apply(function: Function, args: &[Value]) -> Value {
    if args.iter().any(Value::is_null) {
        return Value::Null;
    }
    match function {
        Function::Length => match args[0].as_str() {
            Some(s) => Value::Int32(s.chars().count() as i32),
            None => Value::Null,
        },
        Function::IndexOf => match (args[0].as_str(), args[1].as_str()) {
            (Some(haystack), Some(needle)) => match haystack.find(needle) {
                Some(byte_index) => {
                    Value::Int32(haystack[..byte_index].chars().count() as i32)
                }
                None => Value::Int32(-1),
            },
            _ => Value::Null,
        },
        Function::Substring => substring(args),
        Function::SubstringOf => match (args[0].as_str(), args[1].as_str()) {
            (Some(needle), Some(haystack)) => Value::Bool(haystack.contains(needle)),
            _ => Value::Null,
        },
        Function::StartsWith => match (args[0].as_str(), args[1].as_str()) {
            (Some(s), Some(prefix)) => Value::Bool(s.starts_with(prefix)),
            _ => Value::Null,
        },
        Function::EndsWith => match (args[0].as_str(), args[1].as_str()) {
            (Some(s), Some(suffix)) => Value::Bool(s.ends_with(suffix)),
            _ => Value::Null,
        },
        Function::ToLower => match args[0].as_str() {
            Some(s) => Value::String(s.to_lowercase()),
            None => Value::Null,
        },
        Function::ToUpper => match args[0].as_str() {
            Some(s) => Value::String(s.to_uppercase()),
            None => Value::Null,
        },
        Function::Trim => match args[0].as_str() {
            Some(s) => Value::String(s.trim().to_string()),
            None => Value::Null,
        },
        Function::Concat => match (args[0].as_str(), args[1].as_str()) {
            (Some(a), Some(b)) => Value::String(format!("{a}{b}")),
            _ => Value::Null,
        },
        Function::Replace => match (args[0].as_str(), args[1].as_str(), args[2].as_str()) {
            (Some(s), Some(from), Some(to)) => {
                if from.is_empty() {
                    Value::Null
                } else {
                    Value::String(s.replace(from, to))
                }
            }
            _ => Value::Null,
        },
        Function::Year => date_part(&args[0], |dt| dt.year()),
        Function::Month => date_part(&args[0], |dt| dt.month() as i32),
        Function::Day => date_part(&args[0], |dt| dt.day() as i32),
        Function::Hour => date_part(&args[0], |dt| dt.hour() as i32),
        Function::Minute => date_part(&args[0], |dt| dt.minute() as i32),
        Function::Second => date_part(&args[0], |dt| dt.second() as i32),
        Function::Round => rounding(&args[0], f64::round, rust_decimal::Decimal::round),
        Function::Floor => rounding(&args[0], f64::floor, rust_decimal::Decimal::floor),
        Function::Ceiling => rounding(&args[0], f64::ceil, rust_decimal::Decimal::ceil),
    }
}

/// Character-based substring; out-of-range arguments degrade to null.
fn substring(args: &[Value]) -> Value {
    let Some(s) = args[0].as_str() else {
        return Value::Null;
    };
    let Some(start) = args[1].as_int64() else {
        return Value::Null;
    };
    let count = s.chars().count() as i64;
    if start < 0 || start > count {
        return Value::Null;
    }

    let length = match args.get(2) {
        Some(arg) => match arg.as_int64() {
            Some(len) if len >= 0 && start + len <= count => Some(len),
            _ => return Value::Null,
        },
        None => None,
    };

    let tail = s.chars().skip(start as usize);
    let result: String = match length {
        Some(len) => tail.take(len as usize).collect(),
        None => tail.collect(),
    };
    Value::String(result)
}

fn date_part(value: &Value, part: impl Fn(&chrono::NaiveDateTime) -> i32) -> Value {
    match value {
        Value::DateTime(dt) => Value::Int32(part(dt)),
        _ => Value::Null,
    }
}

fn rounding(
    value: &Value,
    apply_f64: impl Fn(f64) -> f64,
    apply_decimal: impl Fn(&rust_decimal::Decimal) -> rust_decimal::Decimal,
) -> Value {
    match value {
        Value::Decimal(d) => Value::Decimal(apply_decimal(d)),
        other => match other.as_double() {
            Some(f) => Value::Double(apply_f64(f)),
            None => Value::Null,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::String(text.into())
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(apply(Function::Length, &[s("héllo")]), Value::Int32(5));
        assert_eq!(
            apply(Function::IndexOf, &[s("hello"), s("ll")]),
            Value::Int32(2)
        );
        assert_eq!(
            apply(Function::IndexOf, &[s("hello"), s("zz")]),
            Value::Int32(-1)
        );
        assert_eq!(
            apply(Function::SubstringOf, &[s("ell"), s("hello")]),
            Value::Bool(true)
        );
        assert_eq!(
            apply(Function::StartsWith, &[s("hello"), s("he")]),
            Value::Bool(true)
        );
        assert_eq!(
            apply(Function::EndsWith, &[s("hello"), s("lo")]),
            Value::Bool(true)
        );
        assert_eq!(apply(Function::ToUpper, &[s("abc")]), s("ABC"));
        assert_eq!(apply(Function::ToLower, &[s("ABC")]), s("abc"));
        assert_eq!(apply(Function::Trim, &[s("  x  ")]), s("x"));
        assert_eq!(apply(Function::Concat, &[s("ab"), s("cd")]), s("abcd"));
        assert_eq!(
            apply(Function::Replace, &[s("aaa"), s("a"), s("b")]),
            s("bbb")
        );
    }

    #[test]
    fn test_substring_variants() {
        assert_eq!(
            apply(Function::Substring, &[s("hello"), Value::Int32(1)]),
            s("ello")
        );
        assert_eq!(
            apply(
                Function::Substring,
                &[s("hello"), Value::Int32(1), Value::Int32(3)]
            ),
            s("ell")
        );
        // Out of range degrades to null.
        assert_eq!(
            apply(Function::Substring, &[s("hi"), Value::Int32(5)]),
            Value::Null
        );
        assert_eq!(
            apply(
                Function::Substring,
                &[s("hi"), Value::Int32(1), Value::Int32(5)]
            ),
            Value::Null
        );
        assert_eq!(
            apply(Function::Substring, &[s("hi"), Value::Int32(-1)]),
            Value::Null
        );
    }

    #[test]
    fn test_date_parts() {
        let dt = chrono::NaiveDateTime::parse_from_str("2010-12-31T23:59:07", "%Y-%m-%dT%H:%M:%S")
            .unwrap();
        let v = Value::DateTime(dt);
        assert_eq!(apply(Function::Year, &[v.clone()]), Value::Int32(2010));
        assert_eq!(apply(Function::Month, &[v.clone()]), Value::Int32(12));
        assert_eq!(apply(Function::Day, &[v.clone()]), Value::Int32(31));
        assert_eq!(apply(Function::Hour, &[v.clone()]), Value::Int32(23));
        assert_eq!(apply(Function::Minute, &[v.clone()]), Value::Int32(59));
        assert_eq!(apply(Function::Second, &[v]), Value::Int32(7));
    }

    #[test]
    fn test_math_functions() {
        assert_eq!(
            apply(Function::Round, &[Value::Double(2.4)]),
            Value::Double(2.0)
        );
        assert_eq!(
            apply(Function::Floor, &[Value::Double(2.9)]),
            Value::Double(2.0)
        );
        assert_eq!(
            apply(Function::Ceiling, &[Value::Double(2.1)]),
            Value::Double(3.0)
        );
        assert_eq!(
            apply(Function::Floor, &[Value::Decimal("2.9".parse().unwrap())]),
            Value::Decimal("2".parse().unwrap())
        );
    }

    #[test]
    fn test_null_propagation() {
        assert_eq!(apply(Function::Length, &[Value::Null]), Value::Null);
        assert_eq!(
            apply(Function::Concat, &[s("a"), Value::Null]),
            Value::Null
        );
    }

    #[test]
    fn test_dynamic_type_mismatch_yields_null() {
        assert_eq!(apply(Function::Length, &[Value::Int32(3)]), Value::Null);
        assert_eq!(apply(Function::Year, &[s("2010")]), Value::Null);
    }
}
