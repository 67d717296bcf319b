//! Error values for the two front-end stages.

use crate::token::{Tok, TokKind};
use quill_ast::span::Pos;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Category of lexical error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LexErrorKind {
    /// `//` comment opener with no closing `//`
    UnterminatedComment,
    /// `"` with no closing quote
    UnterminatedString,
    /// Exponent marker without digits, e.g. `1e+`
    MalformedNumber,
    /// `&` or `|` not doubled
    LoneOperator,
    /// Character no rule accepts
    UnexpectedChar,
}

/// Lexical failure, anchored at the start of the offending construct.
///
/// `tokens` holds everything scanned successfully before the failure.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub pos: Pos,
    pub tokens: Vec<Tok>,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, message: impl Into<String>, pos: Pos) -> Self {
        Self {
            kind,
            message: message.into(),
            pos,
            tokens: Vec::new(),
        }
    }

    pub fn line(&self) -> u32 {
        self.pos.line
    }

    pub fn column(&self) -> u32 {
        self.pos.column
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "lexical error at line {}, column {}: {}",
            self.pos.line, self.pos.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

impl Serialize for LexError {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut st = s.serialize_struct("LexError", 5)?;
        st.serialize_field("kind", &self.kind)?;
        st.serialize_field("message", &self.message)?;
        st.serialize_field("line", &self.pos.line)?;
        st.serialize_field("column", &self.pos.column)?;
        st.serialize_field("tokens", &self.tokens)?;
        st.end()
    }
}

/// Category of syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// Found X where a specific kind was required
    UnexpectedToken,
    /// Ran out of input where more was required
    UnexpectedEof,
    /// No declaration, statement, type or expression starts with this token
    UnsupportedSyntax,
    /// Call suffix applied to something other than a bare identifier
    InvalidCallTarget,
    /// Tokens left over after `EOF`
    TrailingInput,
}

/// Syntax failure at the first offending token.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub token: Tok,
}

impl ParseError {
    pub(crate) fn expected(expected: TokKind, found: &Tok) -> Self {
        let kind = if found.kind == TokKind::Eof {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken
        };
        let found_desc = if found.kind == TokKind::Eof {
            "end of input".to_string()
        } else {
            found.kind.name().to_string()
        };
        Self {
            kind,
            message: format!("expected {}, found {}", expected, found_desc),
            token: found.clone(),
        }
    }

    /// Dispatch failure: nothing in the grammar starts with `found` here.
    pub(crate) fn unsupported(what: &str, found: &Tok) -> Self {
        let kind = if found.kind == TokKind::Eof {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnsupportedSyntax
        };
        Self {
            kind,
            message: format!("expected {}", what),
            token: found.clone(),
        }
    }

    pub(crate) fn new(kind: ParseErrorKind, message: impl Into<String>, found: &Tok) -> Self {
        Self {
            kind,
            message: message.into(),
            token: found.clone(),
        }
    }

    pub fn line(&self) -> u32 {
        self.token.pos.line
    }

    pub fn column(&self) -> u32 {
        self.token.pos.column
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "syntax error at line {}, column {}: {}",
            self.token.pos.line, self.token.pos.column, self.message
        )?;
        // `Eof` has no text to quote
        if !self.token.text.is_empty() {
            write!(f, " at '{}'", self.token.text)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut st = s.serialize_struct("ParseError", 3)?;
        st.serialize_field("kind", &self.kind)?;
        st.serialize_field("message", &self.message)?;
        st.serialize_field("offending_token", &self.token)?;
        st.end()
    }
}
