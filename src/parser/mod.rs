//! Recursive-descent parser for filter and order-by clauses.
//!
//! Consumes the token stream produced by [`crate::lexer`] and builds an
//! untyped [`SyntaxNode`] tree honoring the operator precedence
//! `or < and < eq/ne < lt/le/gt/ge < add/sub < mul/div/mod < unary`.

pub mod ast;

use crate::error::{Error, Result};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::options::CompileOptions;

use ast::{BinaryOp, Function, OrderByItem, SyntaxNode, UnaryOp};

/// Parses a filter clause into a syntax tree, using default limits.
///
/// # Errors
///
/// Returns a lexical or parse error on invalid clause text.
pub fn parse_filter_expression(text: &str) -> Result<SyntaxNode> {
    parse_filter_expression_with(text, &CompileOptions::default())
}

/// Parses a filter clause into a syntax tree.
///
/// # Errors
///
/// Returns a lexical or parse error on invalid clause text.
pub fn parse_filter_expression_with(text: &str, options: &CompileOptions) -> Result<SyntaxNode> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(tokens, options);
    let expr = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parses an order-by clause into its keys, using default limits.
///
/// # Errors
///
/// Returns a lexical or parse error on invalid clause text.
pub fn parse_order_by(text: &str) -> Result<Vec<OrderByItem>> {
    parse_order_by_with(text, &CompileOptions::default())
}

/// Parses an order-by clause: comma-separated `<expression> [asc|desc]`,
/// ascending by default.
///
/// # Errors
///
/// Returns a lexical or parse error on invalid clause text.
pub fn parse_order_by_with(text: &str, options: &CompileOptions) -> Result<Vec<OrderByItem>> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(tokens, options);
    let mut items = Vec::new();

    loop {
        let expr = parser.parse_expression()?;
        let ascending = match parser.keyword() {
            Some("asc") => {
                parser.advance();
                true
            }
            Some("desc") => {
                parser.advance();
                false
            }
            _ => true,
        };
        items.push(OrderByItem { expr, ascending });

        if items.len() > options.max_order_keys {
            return Err(Error::parse(
                parser.current().position,
                format!("at most {} order-by keys", options.max_order_keys),
                format!("{} keys", items.len()),
            ));
        }

        if parser.current().kind == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect_end()?;
    Ok(items)
}

/// Token-cursor recursive-descent parser.
struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    options: &'a CompileOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, options: &'a CompileOptions) -> Self {
        Parser {
            tokens,
            position: 0,
            options,
            depth: 0,
        }
    }

    fn current(&self) -> &Token {
        // tokenize always appends an End token, so the cursor never runs past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Returns the current token's text when it is an identifier.
    fn keyword(&self) -> Option<&str> {
        let token = self.current();
        if token.kind == TokenKind::Identifier {
            Some(token.text.as_str())
        } else {
            None
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> Error {
        let token = self.current();
        Error::parse(token.position, expected, token.describe())
    }

    fn expect_end(&self) -> Result<()> {
        if self.current().kind == TokenKind::End {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn parse_expression(&mut self) -> Result<SyntaxNode> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(Error::parse(
                self.current().position,
                format!("an expression at most {} levels deep", self.options.max_depth),
                "deeper nesting",
            ));
        }
        let node = self.parse_or();
        self.depth -= 1;
        node
    }

    fn parse_or(&mut self) -> Result<SyntaxNode> {
        let mut left = self.parse_and()?;
        while self.keyword() == Some("or") {
            let position = self.current().position;
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right, position);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<SyntaxNode> {
        let mut left = self.parse_equality()?;
        while self.keyword() == Some("and") {
            let position = self.current().position;
            self.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right, position);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<SyntaxNode> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.keyword() {
                Some("eq") => BinaryOp::Eq,
                Some("ne") => BinaryOp::Ne,
                _ => break,
            };
            let position = self.current().position;
            self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right, position);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<SyntaxNode> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.keyword() {
                Some("lt") => BinaryOp::Lt,
                Some("le") => BinaryOp::Le,
                Some("gt") => BinaryOp::Gt,
                Some("ge") => BinaryOp::Ge,
                _ => break,
            };
            let position = self.current().position;
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right, position);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<SyntaxNode> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.keyword() {
                Some("add") => BinaryOp::Add,
                Some("sub") => BinaryOp::Sub,
                _ => break,
            };
            let position = self.current().position;
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right, position);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<SyntaxNode> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.keyword() {
                Some("mul") => BinaryOp::Mul,
                Some("div") => BinaryOp::Div,
                Some("mod") => BinaryOp::Mod,
                _ => break,
            };
            let position = self.current().position;
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right, position);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<SyntaxNode> {
        if self.keyword() == Some("not") {
            let position = self.current().position;
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(SyntaxNode::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                position,
            });
        }
        if self.current().kind == TokenKind::Minus {
            let position = self.current().position;
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(SyntaxNode::Unary {
                op: UnaryOp::Negate,
                operand: Box::new(operand),
                position,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<SyntaxNode> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Literal(value) => {
                self.advance();
                Ok(SyntaxNode::Literal {
                    value,
                    position: token.position,
                })
            }
            TokenKind::OpenParen => {
                self.advance();
                let expr = self.parse_expression()?;
                if self.current().kind != TokenKind::CloseParen {
                    return Err(self.unexpected("')'"));
                }
                self.advance();
                Ok(expr)
            }
            TokenKind::Identifier => {
                self.advance();
                if self.current().kind == TokenKind::OpenParen {
                    self.parse_function_call(&token)
                } else {
                    self.parse_property_path(&token)
                }
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_function_call(&mut self, name_token: &Token) -> Result<SyntaxNode> {
        let Some(function) = Function::from_name(&name_token.text) else {
            return Err(Error::parse(
                name_token.position,
                "a known function name",
                name_token.text.clone(),
            ));
        };

        self.advance(); // '('
        let mut args = Vec::new();
        if self.current().kind != TokenKind::CloseParen {
            loop {
                args.push(self.parse_expression()?);
                if self.current().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        if self.current().kind != TokenKind::CloseParen {
            return Err(self.unexpected("')'"));
        }
        self.advance();

        let (min, max) = function.arity();
        if args.len() < min || args.len() > max {
            let expected = if min == max {
                format!("{min} argument(s) for '{}'", function.name())
            } else {
                format!("{min} to {max} arguments for '{}'", function.name())
            };
            return Err(Error::parse(
                name_token.position,
                expected,
                format!("{} argument(s)", args.len()),
            ));
        }

        Ok(SyntaxNode::Function {
            function,
            args,
            position: name_token.position,
        })
    }

    fn parse_property_path(&mut self, first: &Token) -> Result<SyntaxNode> {
        let mut node = SyntaxNode::Property {
            source: Box::new(SyntaxNode::Parameter),
            name: first.text.clone(),
            position: first.position,
        };
        while self.current().kind == TokenKind::Dot {
            self.advance();
            let segment = self.current().clone();
            if segment.kind != TokenKind::Identifier {
                return Err(self.unexpected("a property name"));
            }
            self.advance();
            node = SyntaxNode::Property {
                source: Box::new(node),
                name: segment.text,
                position: segment.position,
            };
        }
        Ok(node)
    }
}

fn binary(op: BinaryOp, left: SyntaxNode, right: SyntaxNode, position: usize) -> SyntaxNode {
    SyntaxNode::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        position,
    }
}
