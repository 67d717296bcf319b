//! Canonical source rendering for the AST.
//!
//! Node types carry no display behaviour; everything funnels through
//! [`render`], which dispatches on the variant tag and writes Quill source
//! that tokenizes and parses back to an equal tree.

use crate::ast::{Block, Expr, Item, LetDecl, Program, QualifiedId, Stmt, TypeExpr};

const INDENT: &str = "    ";

/// Any node that can be rendered on its own.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Item(&'a Item),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    Type(&'a TypeExpr),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(p: &'a Program) -> Self {
        Node::Program(p)
    }
}

impl<'a> From<&'a Item> for Node<'a> {
    fn from(i: &'a Item) -> Self {
        Node::Item(i)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(s: &'a Stmt) -> Self {
        Node::Stmt(s)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(e: &'a Expr) -> Self {
        Node::Expr(e)
    }
}

impl<'a> From<&'a TypeExpr> for Node<'a> {
    fn from(t: &'a TypeExpr) -> Self {
        Node::Type(t)
    }
}

pub fn render<'a>(node: impl Into<Node<'a>>) -> String {
    let mut p = Printer::default();
    match node.into() {
        Node::Program(prog) => p.program(prog),
        Node::Item(item) => p.item(item),
        Node::Stmt(stmt) => p.stmt(stmt),
        Node::Expr(expr) => p.expr(expr),
        Node::Type(ty) => p.ty(ty),
    }
    p.out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn pad(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn qual(&mut self, q: &QualifiedId) {
        let dotted = q.dotted();
        self.push(&dotted);
    }

    fn program(&mut self, prog: &Program) {
        self.push("module ");
        self.qual(&prog.module.name);
        self.push(";\n");
        for imp in &prog.imports {
            self.push("import ");
            self.qual(&imp.path);
            if let Some(alias) = &imp.alias {
                self.push(" as ");
                self.push(alias);
            }
            self.push(";\n");
        }
        for item in &prog.items {
            self.push("\n");
            self.item(item);
            self.push("\n");
        }
    }

    fn item(&mut self, item: &Item) {
        match item {
            Item::TypeAlias(ta) => {
                self.push("type ");
                self.push(&ta.name);
                self.push(" = ");
                self.ty(&ta.ty);
                self.push(";");
            }
            Item::Struct(sd) => {
                self.push("struct ");
                self.push(&sd.name);
                if sd.fields.is_empty() {
                    self.push(" {};");
                    return;
                }
                self.push(" {\n");
                self.depth += 1;
                for (i, field) in sd.fields.iter().enumerate() {
                    self.pad();
                    self.push(&field.name);
                    self.push(": ");
                    self.ty(&field.ty);
                    if i + 1 < sd.fields.len() {
                        self.push(",");
                    }
                    self.push("\n");
                }
                self.depth -= 1;
                self.pad();
                self.push("};");
            }
            Item::Const(cd) => {
                self.push("const ");
                self.push(&cd.name);
                self.push(": ");
                self.ty(&cd.ty);
                self.push(" = ");
                self.expr(&cd.value);
                self.push(";");
            }
            Item::Fn(fd) => {
                self.push("fn ");
                self.push(&fd.name);
                self.push("(");
                for (i, param) in fd.params.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push(&param.name);
                    self.push(": ");
                    self.ty(&param.ty);
                }
                self.push(")");
                if let Some(ret) = &fd.ret_ty {
                    self.push(" -> ");
                    self.ty(ret);
                }
                self.push(" ");
                self.block(&fd.body);
            }
            Item::Let(ld) => self.let_decl(ld),
        }
    }

    fn let_decl(&mut self, ld: &LetDecl) {
        self.push("let ");
        self.push(&ld.name);
        self.push(": ");
        self.ty(&ld.ty);
        if let Some(value) = &ld.value {
            self.push(" = ");
            self.expr(value);
        }
        self.push(";");
    }

    fn block(&mut self, block: &Block) {
        if block.stmts.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{\n");
        self.depth += 1;
        for stmt in &block.stmts {
            self.pad();
            self.stmt(stmt);
            self.push("\n");
        }
        self.depth -= 1;
        self.pad();
        self.push("}");
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let(ld) => self.let_decl(ld),
            Stmt::Expr(e) => {
                self.expr(e);
                self.push(";");
            }
            Stmt::If { cond, then_, else_ } => {
                self.push("if (");
                self.expr(cond);
                self.push(") ");
                self.stmt(then_);
                if let Some(else_) = else_ {
                    self.push(" else ");
                    self.stmt(else_);
                }
            }
            Stmt::While { cond, body } => {
                self.push("while (");
                self.expr(cond);
                self.push(") ");
                self.stmt(body);
            }
            Stmt::Return(value) => {
                self.push("return");
                if let Some(v) = value {
                    self.push(" ");
                    self.expr(v);
                }
                self.push(";");
            }
            Stmt::Block(b) => self.block(b),
        }
    }

    fn ty(&mut self, ty: &TypeExpr) {
        match ty {
            TypeExpr::Simple(name) => self.push(name),
            TypeExpr::Array(elem) => {
                // a bare function type would swallow the suffix
                if matches!(**elem, TypeExpr::Func { .. }) {
                    self.push("(");
                    self.ty(elem);
                    self.push(")");
                } else {
                    self.ty(elem);
                }
                self.push("[]");
            }
            TypeExpr::Func { params, ret } => {
                self.push("(");
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.ty(p);
                }
                self.push(") -> ");
                self.ty(ret);
            }
        }
    }

    fn expr(&mut self, e: &Expr) {
        match e {
            Expr::Assign { target, value } => {
                self.expr(target);
                self.push(" = ");
                self.expr(value);
            }
            Expr::Binary { op, lhs, rhs } => {
                self.expr(lhs);
                self.push(" ");
                self.push(op.symbol());
                self.push(" ");
                self.expr(rhs);
            }
            Expr::Unary { op, expr } => {
                self.push(op.symbol());
                self.expr(expr);
            }
            Expr::Call { callee, args } => {
                self.push(callee);
                self.push("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(arg);
                }
                self.push(")");
            }
            Expr::Index { array, index } => {
                self.expr(array);
                self.push("[");
                self.expr(index);
                self.push("]");
            }
            Expr::Member { object, member } => {
                self.expr(object);
                self.push(".");
                self.push(member);
            }
            Expr::Num(text) | Expr::Str(text) | Expr::Var(text) => self.push(text),
            Expr::Bool(b) => self.push(if *b { "true" } else { "false" }),
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(inner);
                self.push(")");
            }
        }
    }
}
