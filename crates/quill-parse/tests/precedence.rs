use quill_ast::ast::{BinOp, Expr, Item, UnOp};
use quill_parse::{parse, tokenize};

fn val(src: &str) -> Expr {
    let toks = tokenize(&format!("module T; const v: int = {src};")).unwrap();
    let p = parse(&toks).unwrap();
    let Item::Const(cd) = &p.items[0] else {
        panic!("expected Const declaration");
    };
    cd.value.clone()
}

fn var(name: &str) -> Box<Expr> {
    Box::new(Expr::Var(name.to_string()))
}

fn bin(op: BinOp, lhs: Box<Expr>, rhs: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Binary { op, lhs, rhs })
}

#[test]
fn arithmetic_relational_equality_logical_layers() {
    // a + b*c == d && e < f || g != h
    let e = val("a + b*c == d && e < f || g != h");
    let Expr::Binary {
        op: BinOp::Or,
        lhs,
        rhs,
    } = e
    else {
        panic!("top should be Or");
    };
    let Expr::Binary {
        op: BinOp::And,
        lhs: and_lhs,
        rhs: and_rhs,
    } = *lhs
    else {
        panic!("lhs should be And");
    };
    assert!(matches!(*and_rhs, Expr::Binary { op: BinOp::Lt, .. }));
    let Expr::Binary {
        op: BinOp::Eq,
        lhs: eq_lhs,
        ..
    } = *and_lhs
    else {
        panic!("expected Eq");
    };
    assert_eq!(
        eq_lhs,
        bin(BinOp::Add, var("a"), bin(BinOp::Mul, var("b"), var("c")))
    );
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::Ne, .. }));
}

#[test]
fn binary_levels_are_left_associative() {
    assert_eq!(
        Box::new(val("a - b - c")),
        bin(BinOp::Sub, bin(BinOp::Sub, var("a"), var("b")), var("c"))
    );
    assert_eq!(
        Box::new(val("a / b % c * d")),
        bin(
            BinOp::Mul,
            bin(BinOp::Mod, bin(BinOp::Div, var("a"), var("b")), var("c")),
            var("d")
        )
    );
    assert_eq!(
        Box::new(val("a == b != c")),
        bin(BinOp::Ne, bin(BinOp::Eq, var("a"), var("b")), var("c"))
    );
}

#[test]
fn assignment_is_right_associative() {
    let e = val("a = b = c + 1");
    let Expr::Assign { target, value } = e else {
        panic!("expected assignment");
    };
    assert_eq!(target, var("a"));
    let Expr::Assign {
        target: inner_target,
        value: inner_value,
    } = *value
    else {
        panic!("expected nested assignment");
    };
    assert_eq!(inner_target, var("b"));
    assert!(matches!(*inner_value, Expr::Binary { op: BinOp::Add, .. }));
}

#[test]
fn assignment_binds_loosest() {
    let e = val("x = a || b");
    let Expr::Assign { value, .. } = e else {
        panic!("expected assignment");
    };
    assert!(matches!(*value, Expr::Binary { op: BinOp::Or, .. }));
}

#[test]
fn assignment_target_is_unrestricted() {
    let e = val("1 + 2 = 3");
    let Expr::Assign { target, .. } = e else {
        panic!("expected assignment");
    };
    assert!(matches!(*target, Expr::Binary { op: BinOp::Add, .. }));
}

#[test]
fn unary_binds_tighter_than_binary() {
    assert_eq!(
        Box::new(val("-a * !b")),
        bin(
            BinOp::Mul,
            Box::new(Expr::Unary {
                op: UnOp::Neg,
                expr: var("a")
            }),
            Box::new(Expr::Unary {
                op: UnOp::Not,
                expr: var("b")
            })
        )
    );
}

#[test]
fn stacked_unary() {
    let e = val("!-!x");
    let Expr::Unary { op: UnOp::Not, expr } = e else {
        panic!("expected Not");
    };
    let Expr::Unary { op: UnOp::Neg, expr } = *expr else {
        panic!("expected Neg");
    };
    assert!(matches!(*expr, Expr::Unary { op: UnOp::Not, .. }));
}

#[test]
fn parens_override_precedence() {
    let e = val("(a + b) * c");
    let Expr::Binary {
        op: BinOp::Mul,
        lhs,
        ..
    } = e
    else {
        panic!("expected Mul");
    };
    assert_eq!(
        *lhs,
        Expr::Paren(bin(BinOp::Add, var("a"), var("b")))
    );
}

#[test]
fn binop_symbols_match_source() {
    let e = val("a % b");
    let Expr::Binary { op, .. } = e else {
        panic!("expected binary");
    };
    assert_eq!(op.symbol(), "%");
}
