// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Condition expressions used by `visible_if`, `enabled_if` and dialog
//! choice `cond` fields.
//!
//! Grammar:
//!
//! ```text
//! expr    := or
//! or      := and (("or" | "||") and)*
//! and     := unary (("and" | "&&") unary)*
//! unary   := ("not" | "!") unary | compare
//! compare := operand (("==" | "!=" | "<" | "<=" | ">" | ">=") operand)?
//! operand := NUMBER | STRING | "true" | "false" | "True" | "False" | "None"
//!          | IDENT ("." IDENT)* | "(" expr ")"
//! ```
//!
//! Strings take single or double quotes. Evaluation looks variables up in a
//! JSON object, following dotted paths into nested objects; a missing
//! variable is `null`. Parentheses and `not` may nest at most
//! [`MAX_DEPTH`] levels deep.

use serde_json::{Map, Value};

/// Deepest allowed nesting of parentheses and `not`.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unterminated string starting at {0}")]
    UnterminatedString(usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected {found} at {pos}, expected {expected}")]
    Unexpected {
        found: String,
        pos: usize,
        expected: &'static str,
    },
    #[error("expression nested deeper than {0} levels at {1}")]
    TooDeep(usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Var(Vec<String>),
    Not(Box<Expr>),
    /// Two or more operands joined by `and`.
    And(Vec<Expr>),
    /// Two or more operands joined by `or`.
    Or(Vec<Expr>),
    Compare(CmpOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Str(String),
    LParen,
    RParen,
    Dot,
    Cmp(CmpOp),
    And,
    Or,
    Not,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Number(n) => format!("number {n}"),
            Token::Str(s) => format!("string '{s}'"),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Cmp(_) => "comparison".to_string(),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::Not => "'not'".to_string(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let start = i;
        let next = chars.get(i + 1).copied();

        let token = match ch {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            '.' => Token::Dot,
            '=' if next == Some('=') => Token::Cmp(CmpOp::Eq),
            '!' if next == Some('=') => Token::Cmp(CmpOp::Ne),
            '!' => Token::Not,
            '<' if next == Some('=') => Token::Cmp(CmpOp::Le),
            '<' => Token::Cmp(CmpOp::Lt),
            '>' if next == Some('=') => Token::Cmp(CmpOp::Ge),
            '>' => Token::Cmp(CmpOp::Gt),
            '&' if next == Some('&') => Token::And,
            '|' if next == Some('|') => Token::Or,
            '"' | '\'' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ch)
                    .ok_or(ExprError::UnterminatedString(start))?;
                let text: String = chars[i + 1..i + 1 + end].iter().collect();
                i += end + 2;
                tokens.push((Token::Str(text), start));
                continue;
            }
            c if c.is_ascii_digit() => {
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let number = text.parse().map_err(|_| ExprError::InvalidNumber(text))?;
                tokens.push((Token::Number(number), start));
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let token = match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    _ => Token::Ident(word),
                };
                tokens.push((token, start));
                continue;
            }
            other => return Err(ExprError::UnexpectedChar { ch: other, pos: start }),
        };

        let two_chars = matches!(
            token,
            Token::Cmp(CmpOp::Eq | CmpOp::Ne | CmpOp::Le | CmpOp::Ge) | Token::And | Token::Or
        );
        i += if two_chars { 2 } else { 1 };
        tokens.push((token, start));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn unexpected(&self, expected: &'static str) -> ExprError {
        match self.tokens.get(self.pos) {
            Some((token, pos)) => ExprError::Unexpected {
                found: token.describe(),
                pos: *pos,
                expected,
            },
            None => ExprError::Unexpected {
                found: "end of input".to_string(),
                pos: self.end,
                expected,
            },
        }
    }

    /// Enter one level of nesting at the current token.
    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let pos = self.tokens.get(self.pos).map_or(self.end, |(_, pos)| *pos);
            return Err(ExprError::TooDeep(MAX_DEPTH, pos));
        }
        Ok(())
    }

    fn or(&mut self) -> Result<Expr, ExprError> {
        let first = self.and()?;
        if self.peek() != Some(&Token::Or) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            items.push(self.and()?);
        }
        Ok(Expr::Or(items))
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        let first = self.unary()?;
        if self.peek() != Some(&Token::And) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            items.push(self.unary()?);
        }
        Ok(Expr::And(items))
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.peek() == Some(&Token::Not) {
            self.descend()?;
            self.pos += 1;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.compare()
    }

    fn compare(&mut self) -> Result<Expr, ExprError> {
        let left = self.operand()?;
        if let Some(Token::Cmp(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            let right = self.operand()?;
            return Ok(Expr::Compare(op, Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn operand(&mut self) -> Result<Expr, ExprError> {
        let token = self.peek().cloned().ok_or_else(|| self.unexpected("a value"))?;
        let expr = match token {
            Token::Number(n) => Expr::Literal(Value::from(n)),
            Token::Str(s) => Expr::Literal(Value::String(s)),
            Token::LParen => {
                self.descend()?;
                self.pos += 1;
                let inner = self.or()?;
                self.depth -= 1;
                if self.peek() != Some(&Token::RParen) {
                    return Err(self.unexpected("')'"));
                }
                inner
            }
            Token::Ident(name) => match name.as_str() {
                "true" | "True" => Expr::Literal(Value::Bool(true)),
                "false" | "False" => Expr::Literal(Value::Bool(false)),
                "None" => Expr::Literal(Value::Null),
                _ => {
                    let mut path = vec![name];
                    while self.tokens.get(self.pos + 1).map(|(t, _)| t) == Some(&Token::Dot) {
                        self.pos += 2;
                        match self.peek() {
                            Some(Token::Ident(part)) => path.push(part.clone()),
                            _ => return Err(self.unexpected("a name after '.'")),
                        }
                    }
                    Expr::Var(path)
                }
            },
            _ => return Err(self.unexpected("a value")),
        };
        self.pos += 1;
        Ok(expr)
    }
}

/// A parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    root: Expr,
}

impl Condition {
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: source.chars().count(),
            depth: 0,
        };
        let root = parser.or()?;
        if parser.pos < parser.tokens.len() {
            return Err(parser.unexpected("end of expression"));
        }
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.root
    }

    /// Evaluate against `vars` and reduce the result to a boolean.
    pub fn evaluate(&self, vars: &Map<String, Value>) -> bool {
        truthy(&eval(&self.root, vars))
    }
}

fn lookup(path: &[String], vars: &Map<String, Value>) -> Value {
    let Some((first, rest)) = path.split_first() else {
        return Value::Null;
    };
    let mut current = vars.get(first);
    for part in rest {
        current = current.and_then(|v| v.get(part));
    }
    current.cloned().unwrap_or(Value::Null)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn compare(op: CmpOp, left: &Value, right: &Value) -> bool {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64().zip(b.as_f64()).and_then(|(a, b)| a.partial_cmp(&b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(std::cmp::Ordering::Equal),
        _ => None,
    };
    match op {
        CmpOp::Eq => ordering == Some(std::cmp::Ordering::Equal) || (ordering.is_none() && left == right),
        CmpOp::Ne => !compare(CmpOp::Eq, left, right),
        CmpOp::Lt => ordering.is_some_and(|o| o.is_lt()),
        CmpOp::Le => ordering.is_some_and(|o| o.is_le()),
        CmpOp::Gt => ordering.is_some_and(|o| o.is_gt()),
        CmpOp::Ge => ordering.is_some_and(|o| o.is_ge()),
    }
}

fn eval(expr: &Expr, vars: &Map<String, Value>) -> Value {
    match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Var(path) => lookup(path, vars),
        Expr::Not(inner) => Value::Bool(!truthy(&eval(inner, vars))),
        Expr::And(items) => Value::Bool(items.iter().all(|e| truthy(&eval(e, vars)))),
        Expr::Or(items) => Value::Bool(items.iter().any(|e| truthy(&eval(e, vars)))),
        Expr::Compare(op, a, b) => Value::Bool(compare(*op, &eval(a, vars), &eval(b, vars))),
    }
}
