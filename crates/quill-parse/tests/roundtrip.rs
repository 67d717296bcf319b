//! Rendering a parsed program back to source and parsing it again must
//! give the same tree.

use quill_ast::render::render;
use quill_parse::{parse, tokenize};

const PROGRAMS: &[&str] = &[
    r#"
module Main;

fn sum(a: int, b: int) -> int {
    return a + b;
}
"#,
    r#"
module Geometry;

struct Point {
    x: int,
    y: int
};

const PI: int = 3;

fn distance(p1: Point, p2: Point) -> int {
    let dx: int = p2.x - p1.x;
    let dy: int = p2.y - p1.y;
    return dx * dx + dy * dy;
}
"#,
    r#"
module Control;

fn factorial(n: int) -> int {
    if (n == 0) {
        return 1;
    } else {
        return n * factorial(n - 1);
    }
}

fn count(limit: int) {
    let i: int = 0;
    while (i < limit) {
        i = i + 1;
    }
}
"#,
    r#"
module Utils;

import Math.Advanced as MA;
import System;

type Whole = int;
type Vector = (int)[];
type Grid = Lib.Cell[][];

let global: int = 42;
"#,
    r#"
module Edge;
struct Empty {};
fn f() {}
fn g() -> bool {
    if (a) if (b) x; else y;
    while (!done) step(-1, "s \" q", 6.02e23);
    { }
    a = b = c.d[e(f)] % 2;
    return -(x + y) * !z || p && q != r >= s;
    return;
}
"#,
];

fn assert_round_trip(label: &str, src: &str) {
    let toks = match tokenize(src) {
        Ok(t) => t,
        Err(e) => panic!("{label}: {e}\n{src}"),
    };
    let first = match parse(&toks) {
        Ok(p) => p,
        Err(e) => panic!("{label}: {e}\n{src}"),
    };

    let printed = render(&first);
    let toks2 = tokenize(&printed).expect("rendered source tokenizes");
    let second =
        parse(&toks2).unwrap_or_else(|e| panic!("rendered {label} fails: {e}\n{printed}"));
    assert_eq!(first, second, "{label} changed after rendering:\n{printed}");

    // rendering is a fixed point after one pass
    assert_eq!(render(&second), printed);
}

#[test]
fn rendered_source_reparses_to_same_tree() {
    for (i, src) in PROGRAMS.iter().enumerate() {
        assert_round_trip(&format!("program {i}"), src);
    }
}

#[test]
fn generated_expressions_round_trip() {
    const PREFIXES: &[&str] = &["", "-", "!", "- -", "!-"];
    const ATOMS: &[&str] = &["x", "f(a, 1)", "xs[i + 1]", "p.q", "(a = b)", "g()", "2.5e-3", "\"s\""];
    const SUFFIXES: &[&str] = &["", "[0]", ".len", "[k].v"];
    const OPS: &[&str] = &["=", "||", "&&", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "%"];

    let mut terms = Vec::new();
    for pre in PREFIXES {
        for atom in ATOMS {
            for suf in SUFFIXES {
                terms.push(format!("{pre}{atom}{suf}"));
            }
        }
    }

    let n = terms.len();
    let mut body = String::new();
    for (i, lhs) in terms.iter().enumerate() {
        let op = OPS[i % OPS.len()];
        let mid = &terms[(i * 7 + 3) % n];
        let rhs = &terms[(i * 13 + 5) % n];
        body.push_str(&format!("    y = {lhs} {op} {mid} * {rhs};\n"));
        if i % 4 == 0 {
            body.push_str(&format!("    if ({lhs}) while ({mid}) {rhs}; else return {lhs};\n"));
        }
    }

    let src = format!("module Gen;\n\nfn run() {{\n{body}}}\n");
    assert_round_trip("generated program", &src);
}

#[test]
fn render_is_canonical() {
    let toks = tokenize("module   M ;fn   f( a :int )->int{return a+1;}").unwrap();
    let p = parse(&toks).unwrap();
    assert_eq!(
        render(&p),
        "module M;\n\nfn f(a: int) -> int {\n    return a + 1;\n}\n"
    );
}
