//! Abstract syntax tree definitions for filter and order-by clauses.

use crate::types::Value;

/// An untyped expression node produced by the parser.
///
/// Children are held by ownership; the tree is built bottom-up and is
/// well-formed by construction. Every variant records the source position
/// of its introducing token for later error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    /// Binary operation (logical, comparison, or arithmetic).
    Binary {
        op: BinaryOp,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
        position: usize,
    },
    /// Unary operation (`not`, unary minus).
    Unary {
        op: UnaryOp,
        operand: Box<SyntaxNode>,
        position: usize,
    },
    /// Property access, one dotted segment at a time, rooted at [`SyntaxNode::Parameter`].
    Property {
        source: Box<SyntaxNode>,
        name: String,
        position: usize,
    },
    /// Literal value.
    Literal { value: Value, position: usize },
    /// Call to a built-in function.
    Function {
        function: Function,
        args: Vec<SyntaxNode>,
        position: usize,
    },
    /// The implicit current item every clause is evaluated against.
    Parameter,
}

impl SyntaxNode {
    /// Returns the source position of the node's introducing token.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            SyntaxNode::Binary { position, .. }
            | SyntaxNode::Unary { position, .. }
            | SyntaxNode::Property { position, .. }
            | SyntaxNode::Literal { position, .. }
            | SyntaxNode::Function { position, .. } => *position,
            SyntaxNode::Parameter => 0,
        }
    }
}

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Returns the keyword form of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::Lt => "lt",
            BinaryOp::Le => "le",
            BinaryOp::Gt => "gt",
            BinaryOp::Ge => "ge",
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation (`not`).
    Not,
    /// Arithmetic negation (`-`).
    Negate,
}

impl UnaryOp {
    /// Returns the surface form of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Negate => "-",
        }
    }
}

/// The fixed registry of built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Length,
    IndexOf,
    Substring,
    SubstringOf,
    StartsWith,
    EndsWith,
    ToLower,
    ToUpper,
    Trim,
    Concat,
    Replace,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Round,
    Floor,
    Ceiling,
}

impl Function {
    /// Looks a function up by its surface name. Names are case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "length" => Some(Function::Length),
            "indexof" => Some(Function::IndexOf),
            "substring" => Some(Function::Substring),
            "substringof" => Some(Function::SubstringOf),
            "startswith" => Some(Function::StartsWith),
            "endswith" => Some(Function::EndsWith),
            "tolower" => Some(Function::ToLower),
            "toupper" => Some(Function::ToUpper),
            "trim" => Some(Function::Trim),
            "concat" => Some(Function::Concat),
            "replace" => Some(Function::Replace),
            "year" => Some(Function::Year),
            "month" => Some(Function::Month),
            "day" => Some(Function::Day),
            "hour" => Some(Function::Hour),
            "minute" => Some(Function::Minute),
            "second" => Some(Function::Second),
            "round" => Some(Function::Round),
            "floor" => Some(Function::Floor),
            "ceiling" => Some(Function::Ceiling),
            _ => None,
        }
    }

    /// Returns the surface name of this function.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Function::Length => "length",
            Function::IndexOf => "indexof",
            Function::Substring => "substring",
            Function::SubstringOf => "substringof",
            Function::StartsWith => "startswith",
            Function::EndsWith => "endswith",
            Function::ToLower => "tolower",
            Function::ToUpper => "toupper",
            Function::Trim => "trim",
            Function::Concat => "concat",
            Function::Replace => "replace",
            Function::Year => "year",
            Function::Month => "month",
            Function::Day => "day",
            Function::Hour => "hour",
            Function::Minute => "minute",
            Function::Second => "second",
            Function::Round => "round",
            Function::Floor => "floor",
            Function::Ceiling => "ceiling",
        }
    }

    /// Returns the accepted argument count range (min, max).
    #[must_use]
    pub fn arity(&self) -> (usize, usize) {
        match self {
            Function::Length
            | Function::ToLower
            | Function::ToUpper
            | Function::Trim
            | Function::Year
            | Function::Month
            | Function::Day
            | Function::Hour
            | Function::Minute
            | Function::Second
            | Function::Round
            | Function::Floor
            | Function::Ceiling => (1, 1),
            Function::IndexOf
            | Function::SubstringOf
            | Function::StartsWith
            | Function::EndsWith
            | Function::Concat => (2, 2),
            Function::Substring => (2, 3),
            Function::Replace => (3, 3),
        }
    }
}

/// One order-by key: a selector expression and its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    /// Key selector expression.
    pub expr: SyntaxNode,
    /// Sort direction (true = asc, false = desc).
    pub ascending: bool,
}
