//! `lex` and `parse` subcommands.
//!
//! Each command writes its report to `out` and diagnostics to `err`, and
//! returns whether the source was accepted.

use anyhow::{Context, Result};
use clap::ValueEnum;
use quill_ast::ast::Program;
use quill_ast::render::render;
use quill_parse::{parse, tokenize, LexError, ParseError, Tok};
use serde::Serialize;
use std::io::Write;

/// Maximum source file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: usize = 1_000_000;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexFormat {
    Pretty,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseFormat {
    Pretty,
    Json,
    /// Canonical Quill source
    Source,
}

/// JSON document written by `lex --format json`.
#[derive(Serialize)]
struct LexReport<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<&'a [Tok]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a LexError>,
}

/// Failing stage of `parse --format json`.
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Stage {
    Lex,
    Parse,
}

#[derive(Serialize)]
#[serde(untagged)]
enum StageError<'a> {
    Lex(&'a LexError),
    Parse(&'a ParseError),
}

/// JSON document written by `parse --format json`.
#[derive(Serialize)]
struct ParseReport<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    program: Option<&'a Program>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StageError<'a>>,
}

fn write_json<T: Serialize>(doc: &T, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(doc)?)?;
    Ok(())
}

pub fn read_source(path: &str) -> Result<String> {
    let too_big = |len: u64| {
        anyhow::anyhow!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            len
        )
    };
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to read source file '{}'", path))?;
    if meta.len() > MAX_SOURCE_SIZE as u64 {
        return Err(too_big(meta.len()));
    }
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file '{}'", path))?;
    // the file may have grown since the metadata check
    if src.len() > MAX_SOURCE_SIZE {
        return Err(too_big(src.len() as u64));
    }
    Ok(src)
}

fn print_tokens(toks: &[Tok], out: &mut dyn Write) -> Result<()> {
    for t in toks {
        writeln!(
            out,
            "{:15} | {:25} | Line {:3}, Col {:3}",
            t.kind.name(),
            t.text,
            t.line(),
            t.column()
        )?;
    }
    Ok(())
}

fn report_lex_error(e: &LexError, err: &mut dyn Write) -> Result<()> {
    writeln!(err, "error: {}", e)?;
    Ok(())
}

pub fn cmd_lex(
    src: &str,
    format: LexFormat,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool> {
    let result = tokenize(src);
    match (format, result) {
        (LexFormat::Pretty, Ok(toks)) => {
            print_tokens(&toks, out)?;
            Ok(true)
        }
        (LexFormat::Pretty, Err(e)) => {
            // show progress up to the failure
            print_tokens(&e.tokens, out)?;
            report_lex_error(&e, err)?;
            Ok(false)
        }
        (LexFormat::Json, Ok(toks)) => {
            let doc = LexReport {
                success: true,
                tokens: Some(toks.as_slice()),
                error: None,
            };
            write_json(&doc, out)?;
            Ok(true)
        }
        (LexFormat::Json, Err(e)) => {
            let doc = LexReport {
                success: false,
                tokens: None,
                error: Some(&e),
            };
            write_json(&doc, out)?;
            report_lex_error(&e, err)?;
            Ok(false)
        }
    }
}

pub fn cmd_parse(
    src: &str,
    format: ParseFormat,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool> {
    let toks = match tokenize(src) {
        Ok(toks) => toks,
        Err(e) => {
            if format == ParseFormat::Json {
                let doc = ParseReport {
                    success: false,
                    program: None,
                    stage: Some(Stage::Lex),
                    error: Some(StageError::Lex(&e)),
                };
                write_json(&doc, out)?;
            }
            report_lex_error(&e, err)?;
            return Ok(false);
        }
    };

    let program = match parse(&toks) {
        Ok(p) => p,
        Err(e) => {
            if format == ParseFormat::Json {
                let doc = ParseReport {
                    success: false,
                    program: None,
                    stage: Some(Stage::Parse),
                    error: Some(StageError::Parse(&e)),
                };
                write_json(&doc, out)?;
            }
            writeln!(err, "error: {}", e)?;
            return Ok(false);
        }
    };

    match format {
        ParseFormat::Pretty => writeln!(out, "{:#?}", program)?,
        ParseFormat::Json => {
            let doc = ParseReport {
                success: true,
                program: Some(&program),
                stage: None,
                error: None,
            };
            write_json(&doc, out)?;
        }
        ParseFormat::Source => write!(out, "{}", render(&program))?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_lex(src: &str, format: LexFormat) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = cmd_lex(src, format, &mut out, &mut err).unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn run_parse(src: &str, format: ParseFormat) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = cmd_parse(src, format, &mut out, &mut err).unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn pretty_token_table() {
        let (ok, out, err) = run_lex("let x", LexFormat::Pretty);
        assert!(ok);
        assert!(err.is_empty());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("LET             | let "));
        assert!(lines[1].ends_with("| Line   1, Col   5"));
        assert!(lines[2].starts_with("EOF "));
    }

    #[test]
    fn pretty_lex_failure_shows_partial_tokens() {
        let (ok, out, err) = run_lex("let s = \"open", LexFormat::Pretty);
        assert!(!ok);
        assert_eq!(out.lines().count(), 3);
        assert!(err.contains("line 1, column 9"));
    }

    #[test]
    fn json_lex_failure() {
        let (ok, out, _) = run_lex("a & b", LexFormat::Json);
        assert!(!ok);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["kind"], "LoneOperator");
        assert_eq!(v["error"]["tokens"][0]["text"], "a");
    }

    #[test]
    fn parse_source_format_is_canonical() {
        let (ok, out, _) = run_parse("module M;let x:int=1;", ParseFormat::Source);
        assert!(ok);
        assert_eq!(out, "module M;\n\nlet x: int = 1;\n");
    }

    #[test]
    fn parse_json_error_names_offending_token() {
        let (ok, out, err) = run_parse("module M; fn f() { 1(2); }", ParseFormat::Json);
        assert!(!ok);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["stage"], "parse");
        assert_eq!(v["error"]["offending_token"]["kind"], "LPAREN");
        assert_eq!(v["error"]["offending_token"]["column"], 21);
        assert!(err.contains("only identifiers can be called"));
    }

    #[test]
    fn json_reports_omit_unused_fields() {
        let (ok, out, _) = run_lex("x", LexFormat::Json);
        assert!(ok);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["tokens"][1]["kind"], "EOF");
        assert!(v.get("error").is_none());

        let (ok, out, _) = run_parse("module M;", ParseFormat::Json);
        assert!(ok);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["program"]["module"]["name"]["segments"][0], "M");
        assert!(v.get("stage").is_none());

        let (ok, out, _) = run_parse("module M; let s: string = \"x", ParseFormat::Json);
        assert!(!ok);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["stage"], "lex");
        assert_eq!(v["error"]["kind"], "UnterminatedString");
        assert!(v.get("program").is_none());
    }

    #[test]
    fn read_source_checks_size_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.ql");
        let file = std::fs::File::create(&path).unwrap();
        // sparse file: nothing is written, only the length grows
        file.set_len(MAX_SOURCE_SIZE as u64 + 1).unwrap();

        let err = read_source(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("exceeds 1MB limit"), "{err}");

        let ok = dir.path().join("ok.ql");
        std::fs::write(&ok, "module M;").unwrap();
        assert_eq!(read_source(ok.to_str().unwrap()).unwrap(), "module M;");
    }

    #[test]
    fn parse_pretty_dumps_tree() {
        let (ok, out, _) = run_parse("module M; fn main() {}", ParseFormat::Pretty);
        assert!(ok);
        assert!(out.contains("FnDecl"));
        assert!(out.contains("\"main\""));
    }
}
