//! S-expression reader
//!
//! Token-slice reader over the lexer's output. `()` reads as nil, the
//! quote sigils expand to their two-element list forms, and `;` comments
//! are skipped.

pub mod lexer;

use crate::error::{Error, Result};
use crate::value::Value;
use lexer::{Span, SpannedToken, Token};

/// Reader state over a token slice
pub struct Reader<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
}

const EOF: SpannedToken = SpannedToken {
    token: Token::Eof,
    span: Span { start: 0, end: 0 },
};

impl<'a> Reader<'a> {
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        Reader { tokens, pos: 0 }
    }

    /// Current token, skipping comments
    fn current(&mut self) -> &SpannedToken {
        while matches!(
            self.tokens.get(self.pos).map(|t| &t.token),
            Some(Token::Comment(_))
        ) {
            self.pos += 1;
        }
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    fn advance(&mut self) -> SpannedToken {
        let token = self.current().clone();
        if token.token != Token::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&mut self, message: &str) -> Error {
        let span = self.current().span;
        Error::ReadError {
            message: message.to_string(),
            span: Some((span.start, span.end)),
        }
    }

    pub fn at_eof(&mut self) -> bool {
        self.current().token == Token::Eof
    }

    /// Read one form
    pub fn read_form(&mut self) -> Result<Value> {
        let spanned = self.advance();
        match spanned.token {
            Token::LParen => self.read_list(),
            Token::VecOpen => self.read_vector(),
            Token::Quote => self.read_sugar("quote"),
            Token::Quasiquote => self.read_sugar("quasiquote"),
            Token::Unquote => self.read_sugar("unquote"),
            Token::UnquoteSplicing => self.read_sugar("unquote-splicing"),
            Token::StringLiteral(s) => Ok(Value::Str(s)),
            Token::IntegerLiteral(n) => Ok(Value::Int(n)),
            Token::FloatLiteral(n) => Ok(Value::Float(n)),
            Token::CharLiteral(ch) => Ok(Value::Char(ch)),
            Token::Keyword(name) => Ok(Value::Keyword(name)),
            Token::Symbol(name) => {
                if name == "nil" {
                    Ok(Value::Nil)
                } else {
                    Ok(Value::Symbol(name))
                }
            }
            Token::RParen => {
                self.pos -= 1;
                Err(self.error("unexpected )"))
            }
            Token::Dot => {
                self.pos -= 1;
                Err(self.error("misplaced ."))
            }
            Token::Comment(_) => unreachable!("comments are skipped"),
            Token::Eof => Err(self.error("unexpected end of input")),
        }
    }

    fn read_list(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match &self.current().token {
                Token::RParen => {
                    self.pos += 1;
                    return if items.is_empty() {
                        Ok(Value::Nil)
                    } else {
                        Ok(Value::List(items))
                    };
                }
                Token::Dot if !items.is_empty() => {
                    self.pos += 1;
                    let tail = self.read_form()?;
                    if self.advance().token != Token::RParen {
                        return Err(self.error("expected ) after dotted tail"));
                    }
                    return Ok(Value::DottedList(items, Box::new(tail)));
                }
                Token::Eof => return Err(self.error("unclosed (")),
                _ => items.push(self.read_form()?),
            }
        }
    }

    fn read_vector(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match &self.current().token {
                Token::RParen => {
                    self.pos += 1;
                    return Ok(Value::Vector(items));
                }
                Token::Eof => return Err(self.error("unclosed #(")),
                _ => items.push(self.read_form()?),
            }
        }
    }

    fn read_sugar(&mut self, head: &str) -> Result<Value> {
        let form = self.read_form()?;
        Ok(Value::List(vec![Value::symbol(head), form]))
    }
}

/// Read every top-level form in `input`
pub fn read_all(input: &str) -> Result<Vec<Value>> {
    let tokens = lexer::tokenize(input)?;
    let mut reader = Reader::new(&tokens);
    let mut forms = Vec::new();
    while !reader.at_eof() {
        forms.push(reader.read_form()?);
    }
    Ok(forms)
}

/// Read exactly one form
pub fn read_one(input: &str) -> Result<Value> {
    let tokens = lexer::tokenize(input)?;
    let mut reader = Reader::new(&tokens);
    let form = reader.read_form()?;
    if !reader.at_eof() {
        return Err(reader.error("trailing input after form"));
    }
    Ok(form)
}
