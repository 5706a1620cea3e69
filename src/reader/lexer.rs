//! S-expression tokenization
//!
//! This module handles breaking source text into tokens.

use winnow::error::{ContextError, ErrMode, ModalResult};
use winnow::token::{literal, take_till, take_while};
use winnow::prelude::*;

/// Token types for the s-expression lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    /// `#(` opening a vector
    VecOpen,
    /// `'`
    Quote,
    /// `` ` ``
    Quasiquote,
    /// `,`
    Unquote,
    /// `,@`
    UnquoteSplicing,
    /// `.` in dotted-list position
    Dot,
    StringLiteral(String),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    CharLiteral(char),
    Symbol(String),
    Keyword(String),
    Comment(String),
    Eof,
}

/// A span in the source text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// Token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenize source text, keeping spans
pub fn tokenize(input: &str) -> crate::Result<Vec<SpannedToken>> {
    let mut remaining = input;
    let mut tokens = Vec::new();

    loop {
        let trimmed = remaining.trim_start();
        remaining = trimmed;
        if remaining.is_empty() {
            break;
        }

        let start_pos = input.len() - remaining.len();
        match parse_token(&mut remaining) {
            Ok(token) => {
                let end_pos = input.len() - remaining.len();
                tokens.push(SpannedToken {
                    token,
                    span: Span::new(start_pos, end_pos),
                });
            }
            Err(_) => {
                return Err(crate::Error::ReadError {
                    message: format!(
                        "unexpected character {:?}",
                        remaining.chars().next().unwrap_or(' ')
                    ),
                    span: Some((start_pos, start_pos + 1)),
                });
            }
        }
    }

    tokens.push(SpannedToken {
        token: Token::Eof,
        span: Span::new(input.len(), input.len()),
    });
    Ok(tokens)
}

fn parse_token(input: &mut &str) -> ModalResult<Token> {
    // Ordering matters: multi-character sigils before their prefixes,
    // words last.
    if input.starts_with(';') {
        return parse_comment(input);
    }
    if input.starts_with("#(") {
        *input = &input[2..];
        return Ok(Token::VecOpen);
    }
    if input.starts_with("#\\") {
        return parse_char_literal(input);
    }
    if input.starts_with('"') {
        return parse_string_literal(input);
    }
    if input.starts_with(",@") {
        *input = &input[2..];
        return Ok(Token::UnquoteSplicing);
    }
    let punct = match input.chars().next() {
        Some('(') => Some(Token::LParen),
        Some(')') => Some(Token::RParen),
        Some('\'') => Some(Token::Quote),
        Some('`') => Some(Token::Quasiquote),
        Some(',') => Some(Token::Unquote),
        _ => None,
    };
    if let Some(token) = punct {
        *input = &input[1..];
        return Ok(token);
    }
    parse_word(input)
}

fn parse_comment(input: &mut &str) -> ModalResult<Token> {
    let _ = literal(";").parse_next(input)?;
    let content = take_till(0.., |c| c == '\n').parse_next(input)?;
    Ok(Token::Comment(content.to_string()))
}

fn parse_char_literal(input: &mut &str) -> ModalResult<Token> {
    let _ = literal("#\\").parse_next(input)?;
    let name = take_while(0.., is_word_char).parse_next(input)?;
    match name {
        "space" => Ok(Token::CharLiteral(' ')),
        "newline" => Ok(Token::CharLiteral('\n')),
        "tab" => Ok(Token::CharLiteral('\t')),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(Token::CharLiteral(ch)),
                // `#\(` and friends: the delimiter itself is the character
                (None, _) => {
                    let ch = input
                        .chars()
                        .next()
                        .ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
                    *input = &input[ch.len_utf8()..];
                    Ok(Token::CharLiteral(ch))
                }
                _ => Err(ErrMode::Cut(ContextError::new())),
            }
        }
    }
}

fn parse_string_literal(input: &mut &str) -> ModalResult<Token> {
    let _ = literal("\"").parse_next(input)?;
    let mut content = String::new();

    loop {
        if input.is_empty() {
            return Err(ErrMode::Cut(ContextError::new()));
        }

        if input.starts_with("\\\"") {
            content.push('"');
            *input = &input[2..];
        } else if input.starts_with("\\\\") {
            content.push('\\');
            *input = &input[2..];
        } else if input.starts_with("\\n") {
            content.push('\n');
            *input = &input[2..];
        } else if input.starts_with("\\t") {
            content.push('\t');
            *input = &input[2..];
        } else if input.starts_with('"') {
            *input = &input[1..];
            break;
        } else {
            let c = input.chars().next().unwrap();
            content.push(c);
            *input = &input[c.len_utf8()..];
        }
    }

    Ok(Token::StringLiteral(content))
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '"' | ';' | '\'' | '`' | ',')
}

/// Slurp a maximal word and classify it: number, dot, keyword or symbol
fn parse_word(input: &mut &str) -> ModalResult<Token> {
    let word = take_while(1.., is_word_char).parse_next(input)?;
    if word == "." {
        return Ok(Token::Dot);
    }
    if let Some(name) = word.strip_prefix(':') {
        if !name.is_empty() {
            return Ok(Token::Keyword(name.to_string()));
        }
    }
    if let Ok(n) = word.parse::<i64>() {
        return Ok(Token::IntegerLiteral(n));
    }
    if looks_numeric(word) {
        if let Ok(n) = word.parse::<f64>() {
            return Ok(Token::FloatLiteral(n));
        }
    }
    Ok(Token::Symbol(word.to_string()))
}

/// Guard float parsing so symbols like `inf` or `1+` stay symbols
fn looks_numeric(word: &str) -> bool {
    let body = word.strip_prefix(['+', '-']).unwrap_or(word);
    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit() || c == '.')
}
