use crate::error::{LexError, LexErrorKind};
use crate::token::{Tok, TokKind};
use quill_ast::span::Pos;

/// Single forward cursor over the source. One lexer per tokenize call.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.src.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek2(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }

    fn here(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    /// Run to completion. On failure the error carries every token
    /// produced before the failing construct.
    pub fn tokenize(mut self) -> Result<Vec<Tok>, LexError> {
        let mut toks = Vec::new();
        loop {
            match self.next_tok() {
                Ok(tok) => {
                    tracing::trace!(kind = %tok.kind, text = %tok.text, line = tok.pos.line, column = tok.pos.column, "token");
                    let done = tok.kind == TokKind::Eof;
                    toks.push(tok);
                    if done {
                        return Ok(toks);
                    }
                }
                Err(mut e) => {
                    e.tokens = toks;
                    return Err(e);
                }
            }
        }
    }

    /// Skip whitespace and `// ... //` comments.
    fn skip_ws_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            if self.peek() == Some('/') && self.peek2() == Some('/') {
                let start = self.here();
                self.bump();
                self.bump();
                loop {
                    match self.peek() {
                        None => {
                            return Err(LexError::new(
                                LexErrorKind::UnterminatedComment,
                                "unterminated comment",
                                start,
                            ))
                        }
                        Some('/') if self.peek2() == Some('/') => {
                            self.bump();
                            self.bump();
                            break;
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
                continue;
            }
            return Ok(());
        }
    }

    pub fn next_tok(&mut self) -> Result<Tok, LexError> {
        self.skip_ws_and_comments()?;
        let start = self.here();
        let Some(c) = self.peek() else {
            return Ok(Tok::new(TokKind::Eof, "", start));
        };

        if c == '"' {
            return self.string(start);
        }
        if c.is_ascii_digit() {
            return self.number(start);
        }
        if c.is_alphabetic() {
            return Ok(self.ident_or_keyword(start));
        }

        self.bump();

        // 2-char operators first
        let two = match (c, self.peek()) {
            ('=', Some('=')) => Some((TokKind::EqEq, '=')),
            ('!', Some('=')) => Some((TokKind::BangEq, '=')),
            ('<', Some('=')) => Some((TokKind::Le, '=')),
            ('>', Some('=')) => Some((TokKind::Ge, '=')),
            ('&', Some('&')) => Some((TokKind::AndAnd, '&')),
            ('|', Some('|')) => Some((TokKind::OrOr, '|')),
            ('-', Some('>')) => Some((TokKind::Arrow, '>')),
            _ => None,
        };
        if let Some((kind, second)) = two {
            self.bump();
            return Ok(Tok::new(kind, format!("{c}{second}"), start));
        }

        if c == '&' || c == '|' {
            return Err(LexError::new(
                LexErrorKind::LoneOperator,
                format!("unexpected character '{c}' (did you mean '{c}{c}'?)"),
                start,
            ));
        }

        // 1-char punctuation/operators
        if let Some(kind) = TokKind::single(c) {
            return Ok(Tok::new(kind, c.to_string(), start));
        }

        Err(LexError::new(
            LexErrorKind::UnexpectedChar,
            format!("unexpected character '{c}'"),
            start,
        ))
    }

    /// String body is kept verbatim; a backslash only stops the next
    /// character from closing the literal.
    fn string(&mut self, start: Pos) -> Result<Tok, LexError> {
        let mut s = String::new();
        if let Some(open) = self.bump() {
            s.push(open);
        }
        loop {
            let Some(ch) = self.bump() else {
                return Err(LexError::new(
                    LexErrorKind::UnterminatedString,
                    "unterminated string literal",
                    start,
                ));
            };
            s.push(ch);
            match ch {
                '"' => return Ok(Tok::new(TokKind::Str, s, start)),
                '\\' => {
                    if let Some(esc) = self.bump() {
                        s.push(esc);
                    }
                }
                _ => {}
            }
        }
    }

    // digits ('.' digits)? ([eE] [+-]? digits)?
    fn number(&mut self, start: Pos) -> Result<Tok, LexError> {
        let mut s = String::new();
        self.digits(&mut s);

        if self.peek() == Some('.') && matches!(self.peek2(), Some(d) if d.is_ascii_digit()) {
            s.push('.');
            self.bump();
            self.digits(&mut s);
        }

        if let Some(e @ ('e' | 'E')) = self.peek() {
            s.push(e);
            self.bump();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                s.push(sign);
                self.bump();
            }
            if !matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                return Err(LexError::new(
                    LexErrorKind::MalformedNumber,
                    format!("malformed number '{s}': exponent needs at least one digit"),
                    start,
                ));
            }
            self.digits(&mut s);
        }

        Ok(Tok::new(TokKind::Num, s, start))
    }

    fn digits(&mut self, s: &mut String) {
        while let Some(d) = self.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            s.push(d);
            self.bump();
        }
    }

    fn ident_or_keyword(&mut self, start: Pos) -> Tok {
        let mut s = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                s.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        let kind = TokKind::keyword(&s).unwrap_or(TokKind::Ident);
        Tok::new(kind, s, start)
    }
}
