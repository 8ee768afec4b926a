//! `Value` and `DataType` definitions for odaq.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::Row;

/// Supported primitive data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Single,
    /// 64-bit floating point.
    Double,
    /// Fixed-precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Date and time without offset.
    DateTime,
    /// Globally unique identifier.
    Guid,
    /// Raw byte sequence.
    Binary,
}

impl DataType {
    /// Returns the wire name of the data type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "Edm.Boolean",
            DataType::Int32 => "Edm.Int32",
            DataType::Int64 => "Edm.Int64",
            DataType::Single => "Edm.Single",
            DataType::Double => "Edm.Double",
            DataType::Decimal => "Edm.Decimal",
            DataType::String => "Edm.String",
            DataType::DateTime => "Edm.DateTime",
            DataType::Guid => "Edm.Guid",
            DataType::Binary => "Edm.Binary",
        }
    }

    /// Returns whether this type is numeric.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int32
                | DataType::Int64
                | DataType::Single
                | DataType::Double
                | DataType::Decimal
        )
    }

    /// Returns whether values of this type have a total order.
    ///
    /// Orderable types may appear under `lt`/`le`/`gt`/`ge` and as sort
    /// keys; the rest support equality only.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        self.is_numeric() || matches!(self, DataType::String | DataType::DateTime)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer value.
    Int32(i32),
    /// 64-bit signed integer value.
    Int64(i64),
    /// 32-bit floating point value.
    Single(f32),
    /// 64-bit floating point value.
    Double(f64),
    /// Fixed-precision decimal value.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Date-time value without offset.
    DateTime(NaiveDateTime),
    /// GUID value.
    Guid(Uuid),
    /// Binary value.
    Binary(Vec<u8>),
    /// Nested record, navigated into by dotted property paths.
    Record(Row),
}

impl Value {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the primitive data type of this value.
    ///
    /// Returns `None` for `Null` and for nested records.
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Bool(_) => Some(DataType::Bool),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Single(_) => Some(DataType::Single),
            Value::Double(_) => Some(DataType::Double),
            Value::Decimal(_) => Some(DataType::Decimal),
            Value::String(_) => Some(DataType::String),
            Value::DateTime(_) => Some(DataType::DateTime),
            Value::Guid(_) => Some(DataType::Guid),
            Value::Binary(_) => Some(DataType::Binary),
            Value::Null | Value::Record(_) => None,
        }
    }

    /// Attempts to extract a bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract an i64, widening `Int32`.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int32(i) => Some(i64::from(*i)),
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract an f64, widening the narrower numeric types.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int32(i) => Some(f64::from(*i)),
            Value::Int64(i) => Some(*i as f64),
            Value::Single(f) => Some(f64::from(*f)),
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Compares two values of the same variant.
    ///
    /// Returns `None` if either value is null or the variants differ;
    /// callers widen mixed numeric pairs with [`promote_pair`] first.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Single(a), Value::Single(b)) => a.partial_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Guid(a), Value::Guid(b)) => Some(a.cmp(b)),
            (Value::Binary(a), Value::Binary(b)) => Some(a.cmp(b)),
            // Null, records, or mismatched variants
            _ => None,
        }
    }
}

/// Promotes two runtime values to their widest common numeric type.
///
/// Ladder: `Int32` → `Int64` → `Single` → `Double`; `Decimal` pairs with
/// the integral types only. Non-numeric or unpairable values are returned
/// unchanged (a subsequent [`Value::compare`] yields `None` for them).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn promote_pair(a: Value, b: Value) -> (Value, Value) {
    use Value::{Decimal as Dec, Double, Int32, Int64, Single};

    match (&a, &b) {
        (Int32(x), Int64(_)) => (Int64(i64::from(*x)), b),
        (Int64(_), Int32(y)) => (a, Int64(i64::from(*y))),

        (Int32(x), Single(_)) => (Single(*x as f32), b),
        (Single(_), Int32(y)) => (a, Single(*y as f32)),
        (Int64(x), Single(_)) => (Single(*x as f32), b),
        (Single(_), Int64(y)) => (a, Single(*y as f32)),

        (Int32(x), Double(_)) => (Double(f64::from(*x)), b),
        (Double(_), Int32(y)) => (a, Double(f64::from(*y))),
        (Int64(x), Double(_)) => (Double(*x as f64), b),
        (Double(_), Int64(y)) => (a, Double(*y as f64)),
        (Single(x), Double(_)) => (Double(f64::from(*x)), b),
        (Double(_), Single(y)) => (a, Double(f64::from(*y))),

        (Int32(x), Dec(_)) => (Dec(Decimal::from(*x)), b),
        (Dec(_), Int32(y)) => (a, Dec(Decimal::from(*y))),
        (Int64(x), Dec(_)) => (Dec(Decimal::from(*x)), b),
        (Dec(_), Int64(y)) => (a, Dec(Decimal::from(*y))),

        _ => (a, b),
    }
}

/// Promotes two declared numeric types to their widest common type.
///
/// Returns `None` when the pair has no common numeric type (non-numeric
/// operand, or `Decimal` against a floating type).
#[must_use]
pub fn promote_types(a: DataType, b: DataType) -> Option<DataType> {
    use DataType::{Decimal, Double, Int32, Int64, Single};

    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    if a == b {
        return Some(a);
    }
    match (a, b) {
        (Decimal, Int32 | Int64) | (Int32 | Int64, Decimal) => Some(Decimal),
        (Decimal, _) | (_, Decimal) => None,
        (Double, _) | (_, Double) => Some(Double),
        (Single, _) | (_, Single) => Some(Single),
        (Int64, _) | (_, Int64) => Some(Int64),
        _ => Some(Int32),
    }
}

/// Three-valued boolean used by predicate evaluation.
///
/// `Unknown` arises from null operands and absent open properties; a
/// filter admits an item only when the predicate yields `True`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    /// Interprets an evaluated value in boolean context.
    ///
    /// Non-boolean values (nulls, dynamic values of other types) read as
    /// `Unknown`.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Truth::True,
            Value::Bool(false) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Null-aware conjunction: `unknown and false = false`,
    /// `unknown and true = unknown`.
    #[must_use]
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// Null-aware disjunction: `unknown or true = true`,
    /// `unknown or false = unknown`.
    #[must_use]
    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Null-propagating negation: `not unknown = unknown`.
    #[must_use]
    pub fn negate(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    /// Returns true only for `True`.
    #[must_use]
    pub fn is_true(self) -> bool {
        self == Truth::True
    }

    /// Converts back to a nullable boolean value.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Truth::True => Value::Bool(true),
            Truth::False => Value::Bool(false),
            Truth::Unknown => Value::Null,
        }
    }
}
