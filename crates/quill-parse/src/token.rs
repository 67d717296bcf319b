use quill_ast::span::Pos;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokKind {
    // literals
    Num,
    Str,
    KwTrue,
    KwFalse,
    // identifiers
    Ident,
    // reserved words
    KwModule,
    KwImport,
    KwAs,
    KwType,
    KwStruct,
    KwConst,
    KwLet,
    KwFn,
    KwInt,
    KwBool,
    KwString,
    KwIf,
    KwElse,
    KwWhile,
    KwReturn,
    // arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    // relational / assignment
    Eq,
    EqEq,
    BangEq,
    Lt,
    Le,
    Gt,
    Ge,
    // logical
    Bang,
    AndAnd,
    OrOr,
    // member access
    Dot,
    // delimiters
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Semicolon,
    Arrow, // -> for return types
    // trivia / eof / error
    /// Never emitted: comments are skipped by the lexer.
    Comment,
    Eof,
    /// Reserved; lexical failures are reported as `LexError` instead.
    Error,
}

impl TokKind {
    /// Stable external name used in messages and serialized output.
    pub fn name(self) -> &'static str {
        match self {
            TokKind::Num => "NUM",
            TokKind::Str => "STRING_LIT",
            TokKind::KwTrue => "TRUE",
            TokKind::KwFalse => "FALSE",
            TokKind::Ident => "ID",
            TokKind::KwModule => "MODULE",
            TokKind::KwImport => "IMPORT",
            TokKind::KwAs => "AS",
            TokKind::KwType => "TYPE",
            TokKind::KwStruct => "STRUCT",
            TokKind::KwConst => "CONST",
            TokKind::KwLet => "LET",
            TokKind::KwFn => "FN",
            TokKind::KwInt => "INT",
            TokKind::KwBool => "BOOL",
            TokKind::KwString => "STRING",
            TokKind::KwIf => "IF",
            TokKind::KwElse => "ELSE",
            TokKind::KwWhile => "WHILE",
            TokKind::KwReturn => "RETURN",
            TokKind::Plus => "PLUS",
            TokKind::Minus => "MINUS",
            TokKind::Star => "MULTIPLY",
            TokKind::Slash => "DIVIDE",
            TokKind::Percent => "MODULO",
            TokKind::Eq => "ASSIGN",
            TokKind::EqEq => "EQUAL",
            TokKind::BangEq => "NOT_EQUAL",
            TokKind::Lt => "LESS_THAN",
            TokKind::Le => "LESS_EQUAL",
            TokKind::Gt => "GREATER_THAN",
            TokKind::Ge => "GREATER_EQUAL",
            TokKind::Bang => "NOT",
            TokKind::AndAnd => "AND",
            TokKind::OrOr => "OR",
            TokKind::Dot => "DOT",
            TokKind::Comma => "COMMA",
            TokKind::LParen => "LPAREN",
            TokKind::RParen => "RPAREN",
            TokKind::LBrace => "LBRACE",
            TokKind::RBrace => "RBRACE",
            TokKind::LBracket => "LBRACKET",
            TokKind::RBracket => "RBRACKET",
            TokKind::Colon => "COLON",
            TokKind::Semicolon => "SEMICOLON",
            TokKind::Arrow => "ARROW",
            TokKind::Comment => "COMMENT",
            TokKind::Eof => "EOF",
            TokKind::Error => "ERROR",
        }
    }

    /// Keyword table lookup: reserved words plus the boolean literals.
    pub fn keyword(text: &str) -> Option<TokKind> {
        let kind = match text {
            "module" => TokKind::KwModule,
            "import" => TokKind::KwImport,
            "as" => TokKind::KwAs,
            "type" => TokKind::KwType,
            "struct" => TokKind::KwStruct,
            "const" => TokKind::KwConst,
            "let" => TokKind::KwLet,
            "fn" => TokKind::KwFn,
            "int" => TokKind::KwInt,
            "bool" => TokKind::KwBool,
            "string" => TokKind::KwString,
            "if" => TokKind::KwIf,
            "else" => TokKind::KwElse,
            "while" => TokKind::KwWhile,
            "return" => TokKind::KwReturn,
            "true" => TokKind::KwTrue,
            "false" => TokKind::KwFalse,
            _ => return None,
        };
        Some(kind)
    }

    /// Single-character operators and delimiters.
    pub fn single(c: char) -> Option<TokKind> {
        let kind = match c {
            '+' => TokKind::Plus,
            '-' => TokKind::Minus,
            '*' => TokKind::Star,
            '/' => TokKind::Slash,
            '%' => TokKind::Percent,
            '=' => TokKind::Eq,
            '<' => TokKind::Lt,
            '>' => TokKind::Gt,
            '!' => TokKind::Bang,
            '.' => TokKind::Dot,
            ',' => TokKind::Comma,
            '(' => TokKind::LParen,
            ')' => TokKind::RParen,
            '{' => TokKind::LBrace,
            '}' => TokKind::RBrace,
            '[' => TokKind::LBracket,
            ']' => TokKind::RBracket,
            ':' => TokKind::Colon,
            ';' => TokKind::Semicolon,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokKind {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tok {
    pub kind: TokKind,
    /// Exact lexeme; empty for `Eof`.
    pub text: String,
    pub pos: Pos,
}

impl Tok {
    pub fn new(kind: TokKind, text: impl Into<String>, pos: Pos) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    pub fn line(&self) -> u32 {
        self.pos.line
    }

    pub fn column(&self) -> u32 {
        self.pos.column
    }

    /// Position just past the last character of this token.
    pub(crate) fn end(&self) -> Pos {
        let mut end = self.pos;
        for c in self.text.chars() {
            if c == '\n' {
                end.line += 1;
                end.column = 1;
            } else {
                end.column += 1;
            }
        }
        end
    }
}

/// Flat `{kind, text, line, column}` shape.
impl Serialize for Tok {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = s.serialize_struct("Tok", 4)?;
        st.serialize_field("kind", &self.kind)?;
        st.serialize_field("text", &self.text)?;
        st.serialize_field("line", &self.pos.line)?;
        st.serialize_field("column", &self.pos.column)?;
        st.end()
    }
}
