//! Semantic analysis: type resolution against a schema provider.

use crate::error::{Error, Result};
use crate::parser::ast::{BinaryOp, Function, OrderByItem, SyntaxNode, UnaryOp};
use crate::schema::{PropertyType, SchemaProvider};
use crate::types::{promote_types, DataType};

use super::expression::{ArithmeticOp, BoundNode, ComparisonOp, ExprType, LogicalOp};

/// Errors that can occur during binding.
#[derive(Debug, Clone)]
pub enum BindError {
    /// Property not declared on a closed type.
    UndeclaredProperty {
        type_name: String,
        property: String,
        position: usize,
    },
    /// Navigation into a value that has no properties.
    InvalidNavigation { property: String, position: usize },
    /// The bare current-item reference used as a value.
    CurrentItemAsValue,
    /// Comparison between types with no common comparable type.
    Incomparable {
        op: &'static str,
        left: String,
        right: String,
        position: usize,
    },
    /// Ordering comparison over a type without a total order.
    NotOrderable {
        op: &'static str,
        operand: String,
        position: usize,
    },
    /// Logical operator over a non-boolean operand.
    NonBoolean {
        op: &'static str,
        actual: String,
        position: usize,
    },
    /// Arithmetic over a non-numeric operand.
    NonNumeric {
        op: &'static str,
        actual: String,
        position: usize,
    },
    /// Arithmetic operands with no common numeric type.
    NoCommonNumericType {
        op: &'static str,
        left: String,
        right: String,
        position: usize,
    },
    /// Function argument incompatible with the declared signature.
    ArgumentType {
        function: &'static str,
        index: usize,
        expected: &'static str,
        actual: String,
        position: usize,
    },
    /// Filter root expression is not boolean-compatible.
    NonBooleanFilter { actual: String },
    /// Order-by key selector is not primitive or open.
    UnorderableKey { actual: String, position: usize },
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindError::UndeclaredProperty {
                type_name,
                property,
                position,
            } => write!(
                f,
                "undeclared property '{property}' on type '{type_name}' (position {position})"
            ),
            BindError::InvalidNavigation { property, position } => write!(
                f,
                "cannot navigate into a primitive value via '{property}' (position {position})"
            ),
            BindError::CurrentItemAsValue => {
                write!(f, "the current item cannot be used as a value")
            }
            BindError::Incomparable {
                op,
                left,
                right,
                position,
            } => write!(
                f,
                "operator '{op}' cannot compare {left} with {right} (position {position})"
            ),
            BindError::NotOrderable {
                op,
                operand,
                position,
            } => write!(
                f,
                "operator '{op}' requires an orderable type, got {operand} (position {position})"
            ),
            BindError::NonBoolean {
                op,
                actual,
                position,
            } => write!(
                f,
                "operator '{op}' requires boolean operands, got {actual} (position {position})"
            ),
            BindError::NonNumeric {
                op,
                actual,
                position,
            } => write!(
                f,
                "operator '{op}' requires a numeric operand, got {actual} (position {position})"
            ),
            BindError::NoCommonNumericType {
                op,
                left,
                right,
                position,
            } => write!(
                f,
                "operator '{op}' has no common numeric type for {left} and {right} (position {position})"
            ),
            BindError::ArgumentType {
                function,
                index,
                expected,
                actual,
                position,
            } => write!(
                f,
                "function '{function}' argument {index} expects {expected}, got {actual} (position {position})"
            ),
            BindError::NonBooleanFilter { actual } => {
                write!(f, "filter expression must be boolean, got {actual}")
            }
            BindError::UnorderableKey { actual, position } => write!(
                f,
                "order-by key must be primitive or open, got {actual} (position {position})"
            ),
        }
    }
}

impl std::error::Error for BindError {}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        Error::Type(err.to_string())
    }
}

/// A bound filter clause: one boolean-compatible (or open) expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub expression: BoundNode,
}

/// One bound order-by key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingExpression {
    /// Key selector expression.
    pub selector: BoundNode,
    /// Sort direction (true = asc, false = desc).
    pub ascending: bool,
}

/// Ordered sequence of order-by keys; the first is the primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingInfo {
    pub expressions: Vec<OrderingExpression>,
}

/// Expected parameter kinds for built-in function signatures.
#[derive(Debug, Clone, Copy)]
enum ParamKind {
    Str,
    Integral,
    Numeric,
    Date,
}

impl ParamKind {
    fn describe(self) -> &'static str {
        match self {
            ParamKind::Str => "Edm.String",
            ParamKind::Integral => "an integral type",
            ParamKind::Numeric => "a numeric type",
            ParamKind::Date => "Edm.DateTime",
        }
    }

    fn accepts(self, data_type: DataType) -> bool {
        match self {
            ParamKind::Str => data_type == DataType::String,
            ParamKind::Integral => matches!(data_type, DataType::Int32 | DataType::Int64),
            ParamKind::Numeric => data_type.is_numeric(),
            ParamKind::Date => data_type == DataType::DateTime,
        }
    }
}

fn parameters(function: Function) -> &'static [ParamKind] {
    use ParamKind::{Date, Integral, Numeric, Str};
    match function {
        Function::Length | Function::ToLower | Function::ToUpper | Function::Trim => &[Str],
        Function::IndexOf
        | Function::SubstringOf
        | Function::StartsWith
        | Function::EndsWith
        | Function::Concat => &[Str, Str],
        Function::Replace => &[Str, Str, Str],
        Function::Substring => &[Str, Integral, Integral],
        Function::Year
        | Function::Month
        | Function::Day
        | Function::Hour
        | Function::Minute
        | Function::Second => &[Date],
        Function::Round | Function::Floor | Function::Ceiling => &[Numeric],
    }
}

fn return_type(function: Function, args: &[BoundNode]) -> ExprType {
    if args.iter().any(|a| a.expr_type().is_open()) {
        return ExprType::Open;
    }
    match function {
        Function::Length
        | Function::IndexOf
        | Function::Year
        | Function::Month
        | Function::Day
        | Function::Hour
        | Function::Minute
        | Function::Second => ExprType::Primitive(DataType::Int32),
        Function::SubstringOf | Function::StartsWith | Function::EndsWith => {
            ExprType::Primitive(DataType::Bool)
        }
        Function::Substring
        | Function::ToLower
        | Function::ToUpper
        | Function::Trim
        | Function::Concat
        | Function::Replace => ExprType::Primitive(DataType::String),
        Function::Round | Function::Floor | Function::Ceiling => {
            match args.first().map(BoundNode::expr_type) {
                Some(ExprType::Primitive(DataType::Decimal)) => {
                    ExprType::Primitive(DataType::Decimal)
                }
                _ => ExprType::Primitive(DataType::Double),
            }
        }
    }
}

fn static_segment(mut path: Vec<String>, name: &str, pt: PropertyType) -> BoundNode {
    path.push(name.to_string());
    let expr_type = match pt {
        PropertyType::Primitive { data_type, .. } => ExprType::Primitive(data_type),
        PropertyType::Complex(target) => ExprType::Entity(target),
    };
    BoundNode::Property { path, expr_type }
}

/// Binder: resolves an untyped syntax tree against a schema context.
///
/// Holds only a borrowed reference to the provider; binding is a pure
/// function of (tree, schema context, root type).
pub struct Binder<'a> {
    provider: &'a dyn SchemaProvider,
    root_type: &'a str,
}

impl<'a> Binder<'a> {
    /// Creates a binder for the given root type.
    #[must_use]
    pub fn new(provider: &'a dyn SchemaProvider, root_type: &'a str) -> Self {
        Binder {
            provider,
            root_type,
        }
    }

    /// Binds a filter expression, requiring a boolean-compatible root.
    ///
    /// # Errors
    ///
    /// Returns a type error when resolution fails or the root expression
    /// is not boolean-compatible.
    pub fn bind_filter(&self, root: &SyntaxNode) -> Result<FilterClause> {
        let expression = self.bind(root)?;
        match expression.expr_type() {
            ExprType::Primitive(DataType::Bool) | ExprType::Open | ExprType::Null => {
                Ok(FilterClause { expression })
            }
            other => Err(BindError::NonBooleanFilter {
                actual: other.to_string(),
            }
            .into()),
        }
    }

    /// Binds order-by keys, requiring each selector to be primitive or open.
    ///
    /// # Errors
    ///
    /// Returns a type error when resolution fails or a selector is
    /// entity-typed.
    pub fn bind_order_by(&self, items: &[OrderByItem]) -> Result<OrderingInfo> {
        let mut expressions = Vec::with_capacity(items.len());
        for item in items {
            let selector = self.bind(&item.expr)?;
            if let ExprType::Entity(name) = selector.expr_type() {
                return Err(BindError::UnorderableKey {
                    actual: name.clone(),
                    position: item.expr.position(),
                }
                .into());
            }
            expressions.push(OrderingExpression {
                selector,
                ascending: item.ascending,
            });
        }
        Ok(OrderingInfo { expressions })
    }

    /// Binds a single expression node.
    ///
    /// # Errors
    ///
    /// Returns a type error when a property, operator, or function cannot
    /// be resolved.
    pub fn bind(&self, node: &SyntaxNode) -> Result<BoundNode> {
        match node {
            SyntaxNode::Literal { value, .. } => Ok(BoundNode::literal(value.clone())),
            SyntaxNode::Property {
                source,
                name,
                position,
            } => self.bind_property(source, name, *position),
            SyntaxNode::Binary {
                op,
                left,
                right,
                position,
            } => self.bind_binary(*op, left, right, *position),
            SyntaxNode::Unary {
                op,
                operand,
                position,
            } => self.bind_unary(*op, operand, *position),
            SyntaxNode::Function {
                function,
                args,
                position,
            } => self.bind_function(*function, args, *position),
            SyntaxNode::Parameter => Err(BindError::CurrentItemAsValue.into()),
        }
    }

    fn bind_property(&self, source: &SyntaxNode, name: &str, position: usize) -> Result<BoundNode> {
        match source {
            SyntaxNode::Parameter => match self.provider.resolve_property(self.root_type, name) {
                Some(pt) => Ok(static_segment(Vec::new(), name, pt)),
                None if self.provider.is_open_type(self.root_type) => {
                    Ok(BoundNode::open_property(None, name))
                }
                None => Err(BindError::UndeclaredProperty {
                    type_name: self.root_type.to_string(),
                    property: name.to_string(),
                    position,
                }
                .into()),
            },
            SyntaxNode::Property { .. } => {
                let bound = self.bind(source)?;
                match bound {
                    BoundNode::Property {
                        path,
                        expr_type: ExprType::Entity(type_name),
                    } => match self.provider.resolve_property(&type_name, name) {
                        Some(pt) => Ok(static_segment(path, name, pt)),
                        None if self.provider.is_open_type(&type_name) => {
                            let prefix = BoundNode::Property {
                                path,
                                expr_type: ExprType::Entity(type_name),
                            };
                            Ok(BoundNode::open_property(Some(prefix), name))
                        }
                        None => Err(BindError::UndeclaredProperty {
                            type_name,
                            property: name.to_string(),
                            position,
                        }
                        .into()),
                    },
                    BoundNode::OpenProperty { .. } => {
                        Ok(BoundNode::open_property(Some(bound), name))
                    }
                    _ => Err(BindError::InvalidNavigation {
                        property: name.to_string(),
                        position,
                    }
                    .into()),
                }
            }
            _ => Err(BindError::InvalidNavigation {
                property: name.to_string(),
                position,
            }
            .into()),
        }
    }

    fn bind_binary(
        &self,
        op: BinaryOp,
        left: &SyntaxNode,
        right: &SyntaxNode,
        position: usize,
    ) -> Result<BoundNode> {
        let l = self.bind(left)?;
        let r = self.bind(right)?;
        match op {
            BinaryOp::And => self.bind_logical(LogicalOp::And, l, r, position),
            BinaryOp::Or => self.bind_logical(LogicalOp::Or, l, r, position),
            BinaryOp::Eq => self.bind_comparison(ComparisonOp::Eq, l, r, position),
            BinaryOp::Ne => self.bind_comparison(ComparisonOp::Ne, l, r, position),
            BinaryOp::Lt => self.bind_comparison(ComparisonOp::Lt, l, r, position),
            BinaryOp::Le => self.bind_comparison(ComparisonOp::Le, l, r, position),
            BinaryOp::Gt => self.bind_comparison(ComparisonOp::Gt, l, r, position),
            BinaryOp::Ge => self.bind_comparison(ComparisonOp::Ge, l, r, position),
            BinaryOp::Add => self.bind_arithmetic(ArithmeticOp::Add, l, r, position),
            BinaryOp::Sub => self.bind_arithmetic(ArithmeticOp::Sub, l, r, position),
            BinaryOp::Mul => self.bind_arithmetic(ArithmeticOp::Mul, l, r, position),
            BinaryOp::Div => self.bind_arithmetic(ArithmeticOp::Div, l, r, position),
            BinaryOp::Mod => self.bind_arithmetic(ArithmeticOp::Mod, l, r, position),
        }
    }

    #[allow(clippy::unused_self)]
    fn bind_logical(
        &self,
        op: LogicalOp,
        left: BoundNode,
        right: BoundNode,
        position: usize,
    ) -> Result<BoundNode> {
        for operand in [&left, &right] {
            match operand.expr_type() {
                ExprType::Primitive(DataType::Bool) | ExprType::Open | ExprType::Null => {}
                other => {
                    return Err(BindError::NonBoolean {
                        op: op.as_str(),
                        actual: other.to_string(),
                        position,
                    }
                    .into())
                }
            }
        }
        let expr_type = if left.expr_type().is_open() || right.expr_type().is_open() {
            ExprType::Open
        } else {
            ExprType::Primitive(DataType::Bool)
        };
        Ok(BoundNode::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
            expr_type,
        })
    }

    #[allow(clippy::unused_self)]
    fn bind_comparison(
        &self,
        op: ComparisonOp,
        left: BoundNode,
        right: BoundNode,
        position: usize,
    ) -> Result<BoundNode> {
        let lt = left.expr_type().clone();
        let rt = right.expr_type().clone();

        if let (ExprType::Primitive(a), ExprType::Primitive(b)) = (&lt, &rt) {
            let common = if a == b {
                Some(*a)
            } else {
                promote_types(*a, *b)
            };
            match common {
                Some(t) => {
                    if op.is_relational() && !t.is_orderable() {
                        return Err(BindError::NotOrderable {
                            op: op.as_str(),
                            operand: t.name().to_string(),
                            position,
                        }
                        .into());
                    }
                }
                None => {
                    return Err(BindError::Incomparable {
                        op: op.as_str(),
                        left: a.name().to_string(),
                        right: b.name().to_string(),
                        position,
                    }
                    .into())
                }
            }
        }
        if matches!(lt, ExprType::Entity(_)) || matches!(rt, ExprType::Entity(_)) {
            return Err(BindError::Incomparable {
                op: op.as_str(),
                left: lt.to_string(),
                right: rt.to_string(),
                position,
            }
            .into());
        }

        let expr_type = if lt.is_open() || rt.is_open() {
            ExprType::Open
        } else {
            ExprType::Primitive(DataType::Bool)
        };
        Ok(BoundNode::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
            expr_type,
        })
    }

    #[allow(clippy::unused_self)]
    fn bind_arithmetic(
        &self,
        op: ArithmeticOp,
        left: BoundNode,
        right: BoundNode,
        position: usize,
    ) -> Result<BoundNode> {
        let lt = left.expr_type().clone();
        let rt = right.expr_type().clone();

        let expr_type = match (&lt, &rt) {
            (ExprType::Open, _) | (_, ExprType::Open) => ExprType::Open,
            (ExprType::Null, ExprType::Null) => ExprType::Null,
            (ExprType::Null, ExprType::Primitive(b)) => {
                if b.is_numeric() {
                    ExprType::Primitive(*b)
                } else {
                    return Err(BindError::NonNumeric {
                        op: op.as_str(),
                        actual: b.name().to_string(),
                        position,
                    }
                    .into());
                }
            }
            (ExprType::Primitive(a), ExprType::Null) => {
                if a.is_numeric() {
                    ExprType::Primitive(*a)
                } else {
                    return Err(BindError::NonNumeric {
                        op: op.as_str(),
                        actual: a.name().to_string(),
                        position,
                    }
                    .into());
                }
            }
            (ExprType::Primitive(a), ExprType::Primitive(b)) => {
                match promote_types(*a, *b) {
                    Some(t) => ExprType::Primitive(t),
                    None => {
                        return Err(BindError::NoCommonNumericType {
                            op: op.as_str(),
                            left: a.name().to_string(),
                            right: b.name().to_string(),
                            position,
                        }
                        .into())
                    }
                }
            }
            _ => {
                return Err(BindError::NonNumeric {
                    op: op.as_str(),
                    actual: if matches!(lt, ExprType::Entity(_)) {
                        lt.to_string()
                    } else {
                        rt.to_string()
                    },
                    position,
                }
                .into())
            }
        };

        Ok(BoundNode::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
            expr_type,
        })
    }

    fn bind_unary(&self, op: UnaryOp, operand: &SyntaxNode, position: usize) -> Result<BoundNode> {
        let bound = self.bind(operand)?;
        match op {
            UnaryOp::Not => {
                let expr_type = match bound.expr_type() {
                    ExprType::Primitive(DataType::Bool) | ExprType::Null => {
                        ExprType::Primitive(DataType::Bool)
                    }
                    ExprType::Open => ExprType::Open,
                    other => {
                        return Err(BindError::NonBoolean {
                            op: "not",
                            actual: other.to_string(),
                            position,
                        }
                        .into())
                    }
                };
                Ok(BoundNode::Not {
                    operand: Box::new(bound),
                    expr_type,
                })
            }
            UnaryOp::Negate => {
                let expr_type = match bound.expr_type() {
                    ExprType::Primitive(dt) if dt.is_numeric() => ExprType::Primitive(*dt),
                    ExprType::Open => ExprType::Open,
                    ExprType::Null => ExprType::Null,
                    other => {
                        return Err(BindError::NonNumeric {
                            op: "-",
                            actual: other.to_string(),
                            position,
                        }
                        .into())
                    }
                };
                Ok(BoundNode::Negate {
                    operand: Box::new(bound),
                    expr_type,
                })
            }
        }
    }

    fn bind_function(
        &self,
        function: Function,
        args: &[SyntaxNode],
        position: usize,
    ) -> Result<BoundNode> {
        let bound_args = args
            .iter()
            .map(|arg| self.bind(arg))
            .collect::<Result<Vec<_>>>()?;

        for (index, (param, arg)) in parameters(function)
            .iter()
            .zip(&bound_args)
            .enumerate()
        {
            let accepted = match arg.expr_type() {
                ExprType::Open | ExprType::Null => true,
                ExprType::Primitive(dt) => param.accepts(*dt),
                ExprType::Entity(_) => false,
            };
            if !accepted {
                return Err(BindError::ArgumentType {
                    function: function.name(),
                    index: index + 1,
                    expected: param.describe(),
                    actual: arg.expr_type().to_string(),
                    position,
                }
                .into());
            }
        }

        let expr_type = return_type(function, &bound_args);
        Ok(BoundNode::FunctionCall {
            function,
            args: bound_args,
            expr_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_filter_expression;
    use crate::schema::{PropertyDef, SchemaRegistry, TypeSchema};

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .define_type(TypeSchema::new(
                "Person",
                vec![
                    PropertyDef::required("Id", DataType::Int32),
                    PropertyDef::primitive("Name", DataType::String),
                    PropertyDef::primitive("Age", DataType::Int32),
                    PropertyDef::primitive("Salary", DataType::Double),
                    PropertyDef::primitive("Birthday", DataType::DateTime),
                    PropertyDef::complex("Address", "Address"),
                ],
            ))
            .unwrap();
        registry
            .define_type(TypeSchema::new(
                "Address",
                vec![PropertyDef::primitive("City", DataType::String)],
            ))
            .unwrap();
        registry
            .define_type(
                TypeSchema::new(
                    "Bag",
                    vec![PropertyDef::primitive("Known", DataType::String)],
                )
                .open(),
            )
            .unwrap();
        registry
    }

    fn bind_filter(text: &str, root: &str) -> Result<FilterClause> {
        let registry = registry();
        let node = parse_filter_expression(text)?;
        Binder::new(&registry, root).bind_filter(&node)
    }

    #[test]
    fn test_bind_comparison_promotes_integers() {
        let clause = bind_filter("Age gt 18", "Person").unwrap();
        let BoundNode::Comparison { expr_type, .. } = &clause.expression else {
            panic!("expected comparison");
        };
        assert_eq!(*expr_type, ExprType::Primitive(DataType::Bool));
    }

    #[test]
    fn test_bind_mixed_numeric_comparison() {
        assert!(bind_filter("Salary gt 18", "Person").is_ok());
        assert!(bind_filter("Age lt 18.5", "Person").is_ok());
    }

    #[test]
    fn test_bind_dotted_path() {
        let clause = bind_filter("Address.City eq 'Lisbon'", "Person").unwrap();
        let BoundNode::Comparison { left, .. } = &clause.expression else {
            panic!("expected comparison");
        };
        assert_eq!(
            **left,
            BoundNode::Property {
                path: vec!["Address".into(), "City".into()],
                expr_type: ExprType::Primitive(DataType::String),
            }
        );
    }

    #[test]
    fn test_undeclared_property_on_closed_type() {
        let err = bind_filter("Nickname eq 'x'", "Person").unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("undeclared property 'Nickname'"));
        assert!(message.contains("Person"));
    }

    #[test]
    fn test_undeclared_property_on_open_type_binds_open() {
        let clause = bind_filter("Anything eq 'x'", "Bag").unwrap();
        assert_eq!(*clause.expression.expr_type(), ExprType::Open);
        let BoundNode::Comparison { left, .. } = &clause.expression else {
            panic!("expected comparison");
        };
        assert!(matches!(
            **left,
            BoundNode::OpenProperty { source: None, .. }
        ));
    }

    #[test]
    fn test_declared_property_on_open_type_binds_static() {
        let clause = bind_filter("Known eq 'x'", "Bag").unwrap();
        assert_eq!(
            *clause.expression.expr_type(),
            ExprType::Primitive(DataType::Bool)
        );
    }

    #[test]
    fn test_incomparable_types() {
        let err = bind_filter("Name eq 18", "Person").unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("eq"));
        assert!(message.contains("Edm.String"));
        assert!(message.contains("Edm.Int32"));
    }

    #[test]
    fn test_relational_requires_orderable() {
        let err = bind_filter("(Age eq 1) lt true", "Person").unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("orderable"));
    }

    #[test]
    fn test_null_literal_compatible_everywhere() {
        assert!(bind_filter("Name eq null", "Person").is_ok());
        assert!(bind_filter("Age eq null", "Person").is_ok());
        assert!(bind_filter("null eq null", "Person").is_ok());
    }

    #[test]
    fn test_arithmetic_types() {
        let clause = bind_filter("Age add 1 gt 10", "Person").unwrap();
        let BoundNode::Comparison { left, .. } = &clause.expression else {
            panic!("expected comparison");
        };
        assert_eq!(*left.expr_type(), ExprType::Primitive(DataType::Int32));

        let clause = bind_filter("Age add 1.5 gt 10", "Person").unwrap();
        let BoundNode::Comparison { left, .. } = &clause.expression else {
            panic!("expected comparison");
        };
        assert_eq!(*left.expr_type(), ExprType::Primitive(DataType::Double));
    }

    #[test]
    fn test_decimal_floating_arithmetic_rejected() {
        let err = bind_filter("Salary add 1M gt 10", "Person").unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("no common numeric type"));
    }

    #[test]
    fn test_string_arithmetic_rejected() {
        let err = bind_filter("Name add 1 eq 2", "Person").unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn test_function_argument_mismatch() {
        let err = bind_filter("length(Age) gt 2", "Person").unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("length"));
        assert!(message.contains("Edm.String"));
    }

    #[test]
    fn test_function_open_argument_accepted() {
        let clause = bind_filter("length(Anything) gt 2", "Bag").unwrap();
        assert_eq!(*clause.expression.expr_type(), ExprType::Open);
    }

    #[test]
    fn test_function_return_types() {
        let clause = bind_filter("substringof('a', Name)", "Person").unwrap();
        assert_eq!(
            *clause.expression.expr_type(),
            ExprType::Primitive(DataType::Bool)
        );

        let clause = bind_filter("year(Birthday) eq 1990", "Person").unwrap();
        let BoundNode::Comparison { left, .. } = &clause.expression else {
            panic!("expected comparison");
        };
        assert_eq!(*left.expr_type(), ExprType::Primitive(DataType::Int32));
    }

    #[test]
    fn test_filter_root_must_be_boolean() {
        let err = bind_filter("Age add 1", "Person").unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("must be boolean"));
    }

    #[test]
    fn test_entity_filter_root_rejected() {
        let err = bind_filter("Address eq null", "Person").unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn test_order_by_entity_key_rejected() {
        let registry = registry();
        let items = crate::parser::parse_order_by("Address").unwrap();
        let err = Binder::new(&registry, "Person")
            .bind_order_by(&items)
            .unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("order-by key"));
    }

    #[test]
    fn test_order_by_binds_directions() {
        let registry = registry();
        let items = crate::parser::parse_order_by("Name asc,Age desc").unwrap();
        let info = Binder::new(&registry, "Person").bind_order_by(&items).unwrap();
        assert_eq!(info.expressions.len(), 2);
        assert!(info.expressions[0].ascending);
        assert!(!info.expressions[1].ascending);
    }

    #[test]
    fn test_binding_is_deterministic() {
        let registry = registry();
        let node = parse_filter_expression("Age gt 18 and startswith(Name, 'A')").unwrap();
        let binder = Binder::new(&registry, "Person");
        let first = binder.bind_filter(&node).unwrap();
        let second = binder.bind_filter(&node).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_navigation_into_primitive_rejected() {
        let err = bind_filter("Name.Length eq 1", "Person").unwrap_err();
        let Error::Type(message) = err else {
            panic!("expected type error");
        };
        assert!(message.contains("cannot navigate"));
    }

    #[test]
    fn test_bind_error_display() {
        let err = BindError::UndeclaredProperty {
            type_name: "Person".into(),
            property: "Nickname".into(),
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "undeclared property 'Nickname' on type 'Person' (position 3)"
        );
    }
}
