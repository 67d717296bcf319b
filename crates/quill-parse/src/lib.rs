#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod error;
mod lexer;
mod parser;
mod token;

use anyhow::{Context, Result};
use quill_ast::ast::Program;

pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use lexer::Lexer;
pub use parser::parse;
pub use token::{Tok, TokKind};

/// Convert source text into tokens, always ending in exactly one `Eof`.
pub fn tokenize(src: &str) -> Result<Vec<Tok>, LexError> {
    match Lexer::new(src).tokenize() {
        Ok(toks) => {
            tracing::debug!(tokens = toks.len(), "tokenized source");
            Ok(toks)
        }
        Err(e) => {
            tracing::debug!(
                line = e.line(),
                column = e.column(),
                scanned = e.tokens.len(),
                error = %e.message,
                "tokenize failed"
            );
            Err(e)
        }
    }
}

/// Tokenize and parse in one step. `file` only labels the error.
pub fn parse_str(file: &str, src: &str) -> Result<Program> {
    let toks = tokenize(src).with_context(|| format!("failed to tokenize {file}"))?;
    let program = parse(&toks).with_context(|| format!("failed to parse {file}"))?;
    Ok(program)
}
