//! Bound expression definitions.

use crate::parser::ast::Function;
use crate::types::{DataType, Value};

/// Resolved semantic type of a bound expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprType {
    /// A concrete primitive type.
    Primitive(DataType),
    /// Dynamically typed: resolution deferred to evaluation.
    Open,
    /// A structural (entity/complex) type, named in the schema.
    Entity(String),
    /// The type of the bare `null` literal, compatible with any nullable
    /// operand position.
    Null,
}

impl ExprType {
    /// Returns true for the open (dynamic) marker.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, ExprType::Open)
    }

    /// Returns the primitive data type, if this type is primitive.
    #[must_use]
    pub fn primitive(&self) -> Option<DataType> {
        match self {
            ExprType::Primitive(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprType::Primitive(dt) => f.write_str(dt.name()),
            ExprType::Open => f.write_str("open"),
            ExprType::Entity(name) => f.write_str(name),
            ExprType::Null => f.write_str("null"),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    /// Returns the keyword form of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Le => "le",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Ge => "ge",
        }
    }

    /// Returns true for the ordering comparisons (`lt le gt ge`).
    #[must_use]
    pub fn is_relational(&self) -> bool {
        !matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// Returns the keyword form of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    /// Returns the keyword form of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Mul => "mul",
            ArithmeticOp::Div => "div",
            ArithmeticOp::Mod => "mod",
        }
    }
}

/// Bound expression after semantic analysis.
///
/// Every node's type is computed exactly once, at bind time.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundNode {
    /// Literal value (constant).
    Literal { value: Value, expr_type: ExprType },

    /// Statically resolved property path from the current item.
    Property {
        path: Vec<String>,
        expr_type: ExprType,
    },

    /// Dynamic property lookup on an open type.
    ///
    /// `source` is `None` when the lookup starts at the current item, or
    /// the bound prefix expression when chained off another access.
    OpenProperty {
        source: Option<Box<BoundNode>>,
        name: String,
        expr_type: ExprType, // Always Open
    },

    /// Binary comparison.
    Comparison {
        op: ComparisonOp,
        left: Box<BoundNode>,
        right: Box<BoundNode>,
        expr_type: ExprType, // Bool, or Open
    },

    /// Logical AND/OR.
    Logical {
        op: LogicalOp,
        left: Box<BoundNode>,
        right: Box<BoundNode>,
        expr_type: ExprType, // Bool, or Open
    },

    /// Logical negation.
    Not {
        operand: Box<BoundNode>,
        expr_type: ExprType, // Bool, or Open
    },

    /// Arithmetic negation.
    Negate {
        operand: Box<BoundNode>,
        expr_type: ExprType,
    },

    /// Arithmetic operation over promoted operands.
    Arithmetic {
        op: ArithmeticOp,
        left: Box<BoundNode>,
        right: Box<BoundNode>,
        expr_type: ExprType,
    },

    /// Built-in function call.
    FunctionCall {
        function: Function,
        args: Vec<BoundNode>,
        expr_type: ExprType,
    },
}

impl BoundNode {
    /// Returns the resolved type of this expression.
    #[must_use]
    pub fn expr_type(&self) -> &ExprType {
        match self {
            BoundNode::Literal { expr_type, .. }
            | BoundNode::Property { expr_type, .. }
            | BoundNode::OpenProperty { expr_type, .. }
            | BoundNode::Comparison { expr_type, .. }
            | BoundNode::Logical { expr_type, .. }
            | BoundNode::Not { expr_type, .. }
            | BoundNode::Negate { expr_type, .. }
            | BoundNode::Arithmetic { expr_type, .. }
            | BoundNode::FunctionCall { expr_type, .. } => expr_type,
        }
    }

    /// Creates a literal bound node, deriving its type from the value.
    #[must_use]
    pub fn literal(value: Value) -> Self {
        let expr_type = match value.data_type() {
            Some(dt) => ExprType::Primitive(dt),
            None => ExprType::Null,
        };
        BoundNode::Literal { value, expr_type }
    }

    /// Creates an open dynamic property access.
    #[must_use]
    pub fn open_property(source: Option<BoundNode>, name: impl Into<String>) -> Self {
        BoundNode::OpenProperty {
            source: source.map(Box::new),
            name: name.into(),
            expr_type: ExprType::Open,
        }
    }
}
