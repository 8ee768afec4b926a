//! Lexer for filter and order-by clause text.
//!
//! Tokenizes an expression string into a flat sequence of position-bearing
//! tokens. Word operators (`eq`, `and`, `not`, ...) are lexed as plain
//! identifiers; the parser gives them meaning by position.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::Value;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier: property segment, function name, or word operator.
    Identifier,
    /// A literal with its parsed value.
    Literal(Value),
    /// Left parenthesis.
    OpenParen,
    /// Right parenthesis.
    CloseParen,
    /// Argument / order-by key separator.
    Comma,
    /// Property path separator.
    Dot,
    /// Unary minus.
    Minus,
    /// End of input.
    End,
}

/// A single token with its raw text and source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    /// Returns the token text, or a printable placeholder for end-of-input.
    #[must_use]
    pub fn describe(&self) -> &str {
        if self.kind == TokenKind::End {
            "end of input"
        } else {
            &self.text
        }
    }
}

/// Lexer over a clause string.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    finished: bool,
}

impl Lexer {
    /// Creates a new lexer for the given clause text.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            finished: false,
        }
    }

    /// Returns the next token from the input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedChar`] on unrecognized input and
    /// [`Error::MalformedLiteral`] on an invalid literal payload.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start = self.position;
        if start >= self.input.len() {
            return Ok(Token {
                kind: TokenKind::End,
                text: String::new(),
                position: start,
            });
        }

        let ch = self.current_char();
        match ch {
            '(' => Ok(self.punctuation(TokenKind::OpenParen)),
            ')' => Ok(self.punctuation(TokenKind::CloseParen)),
            ',' => Ok(self.punctuation(TokenKind::Comma)),
            '.' => Ok(self.punctuation(TokenKind::Dot)),
            '-' => Ok(self.punctuation(TokenKind::Minus)),
            '\'' => self.read_string(start),
            _ if ch.is_ascii_digit() => self.read_number(start),
            _ if ch.is_ascii_alphabetic() || ch == '_' => self.read_identifier(start),
            _ => Err(Error::UnexpectedChar {
                position: start,
                ch,
            }),
        }
    }

    fn punctuation(&mut self, kind: TokenKind) -> Token {
        let position = self.position;
        let text = self.current_char().to_string();
        self.advance();
        Token {
            kind,
            text,
            position,
        }
    }

    fn read_identifier(&mut self, start: usize) -> Result<Token> {
        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.text_from(start);

        // Keyword literals.
        match text.as_str() {
            "true" => return Ok(self.literal(start, text, Value::Bool(true))),
            "false" => return Ok(self.literal(start, text, Value::Bool(false))),
            "null" => return Ok(self.literal(start, text, Value::Null)),
            _ => {}
        }

        // Prefixed literal forms: datetime'...', guid'...', binary'...', X'...'.
        if self.position < self.input.len() && self.current_char() == '\'' {
            match text.as_str() {
                "datetime" => return self.read_prefixed(start, parse_datetime),
                "guid" => return self.read_prefixed(start, parse_guid),
                "binary" | "X" | "x" => return self.read_prefixed(start, parse_binary),
                _ => {}
            }
        }

        Ok(Token {
            kind: TokenKind::Identifier,
            text,
            position: start,
        })
    }

    /// Reads the quoted payload after a literal prefix and parses it.
    fn read_prefixed(
        &mut self,
        start: usize,
        parse: fn(&str, usize) -> Result<Value>,
    ) -> Result<Token> {
        self.advance(); // opening quote
        let payload_start = self.position;
        let payload = self.read_quoted_payload(start)?;
        let value = parse(&payload, payload_start)?;
        Ok(self.literal(start, self.text_from(start), value))
    }

    fn read_string(&mut self, start: usize) -> Result<Token> {
        self.advance(); // opening quote
        let payload = self.read_quoted_payload(start)?;
        Ok(self.literal(start, self.text_from(start), Value::String(payload)))
    }

    /// Consumes characters up to the closing quote, doubling `''` into `'`.
    fn read_quoted_payload(&mut self, start: usize) -> Result<String> {
        let mut s = String::new();
        while self.position < self.input.len() {
            let ch = self.current_char();
            self.advance();
            if ch == '\'' {
                if self.position < self.input.len() && self.current_char() == '\'' {
                    s.push('\'');
                    self.advance();
                } else {
                    return Ok(s);
                }
            } else {
                s.push(ch);
            }
        }
        Err(Error::MalformedLiteral {
            position: start,
            message: "unterminated string literal".into(),
        })
    }

    fn read_number(&mut self, start: usize) -> Result<Token> {
        let mut is_floating = false;

        while self.position < self.input.len() && self.current_char().is_ascii_digit() {
            self.advance();
        }
        if self.position < self.input.len()
            && self.current_char() == '.'
            && self.peek().is_some_and(|c| c.is_ascii_digit())
        {
            is_floating = true;
            self.advance();
            while self.position < self.input.len() && self.current_char().is_ascii_digit() {
                self.advance();
            }
        }
        if self.position < self.input.len() && matches!(self.current_char(), 'e' | 'E') {
            let mark = self.position;
            self.advance();
            if self.position < self.input.len() && matches!(self.current_char(), '+' | '-') {
                self.advance();
            }
            if self.position < self.input.len() && self.current_char().is_ascii_digit() {
                is_floating = true;
                while self.position < self.input.len() && self.current_char().is_ascii_digit() {
                    self.advance();
                }
            } else {
                // not an exponent after all
                self.position = mark;
            }
        }

        let digits = self.text_from(start);

        // Type suffix.
        let suffix = if self.position < self.input.len() {
            match self.current_char() {
                c @ ('L' | 'l' | 'M' | 'm' | 'F' | 'f' | 'D' | 'd') => {
                    self.advance();
                    Some(c.to_ascii_uppercase())
                }
                _ => None,
            }
        } else {
            None
        };

        let malformed = |message: String| Error::MalformedLiteral {
            position: start,
            message,
        };

        let value = match suffix {
            Some('L') => {
                if is_floating {
                    return Err(malformed(format!("invalid integer literal '{digits}L'")));
                }
                let n: i64 = digits
                    .parse()
                    .map_err(|_| malformed(format!("integer literal '{digits}' out of range")))?;
                Value::Int64(n)
            }
            Some('M') => {
                let d: Decimal = digits
                    .parse()
                    .map_err(|_| malformed(format!("invalid decimal literal '{digits}'")))?;
                Value::Decimal(d)
            }
            Some('F') => {
                let f: f32 = digits
                    .parse()
                    .map_err(|_| malformed(format!("invalid floating literal '{digits}'")))?;
                Value::Single(f)
            }
            Some('D') => {
                let f: f64 = digits
                    .parse()
                    .map_err(|_| malformed(format!("invalid floating literal '{digits}'")))?;
                Value::Double(f)
            }
            _ => {
                if is_floating {
                    let f: f64 = digits
                        .parse()
                        .map_err(|_| malformed(format!("invalid floating literal '{digits}'")))?;
                    Value::Double(f)
                } else if let Ok(n) = digits.parse::<i32>() {
                    Value::Int32(n)
                } else {
                    let n: i64 = digits.parse().map_err(|_| {
                        malformed(format!("integer literal '{digits}' out of range"))
                    })?;
                    Value::Int64(n)
                }
            }
        };

        Ok(self.literal(start, self.text_from(start), value))
    }

    fn literal(&self, start: usize, text: String, value: Value) -> Token {
        Token {
            kind: TokenKind::Literal(value),
            text,
            position: start,
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if matches!(&token, Ok(t) if t.kind == TokenKind::End) || token.is_err() {
            self.finished = true;
        }
        Some(token)
    }
}

/// Tokenizes a full clause, including the trailing end-of-input token.
///
/// # Errors
///
/// Returns the first lexical error encountered.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    Lexer::new(text).collect()
}

fn parse_datetime(payload: &str, position: usize) -> Result<Value> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(payload, format) {
            return Ok(Value::DateTime(dt));
        }
    }
    Err(Error::MalformedLiteral {
        position,
        message: format!("invalid datetime literal '{payload}'"),
    })
}

fn parse_guid(payload: &str, position: usize) -> Result<Value> {
    Uuid::parse_str(payload)
        .map(Value::Guid)
        .map_err(|_| Error::MalformedLiteral {
            position,
            message: format!("invalid guid literal '{payload}'"),
        })
}

fn parse_binary(payload: &str, position: usize) -> Result<Value> {
    let malformed = || Error::MalformedLiteral {
        position,
        message: format!("invalid binary literal '{payload}'"),
    };
    if payload.len() % 2 != 0 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    let bytes = payload
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hex = std::str::from_utf8(pair).expect("ascii hex");
            u8::from_str_radix(hex, 16).expect("validated hex digits")
        })
        .collect();
    Ok(Value::Binary(bytes))
}
