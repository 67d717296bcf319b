use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Tok, TokKind};
use quill_ast::ast::{
    BinOp, Block, ConstDecl, Expr, Field, FnDecl, ImportDecl, Item, LetDecl, ModuleDecl, Param,
    Program, QualifiedId, Stmt, StructDecl, TypeAlias, TypeExpr, UnOp,
};
use quill_ast::span::Pos;

type PResult<T> = Result<T, ParseError>;

/// Parse a complete token stream (as produced by `tokenize`) into a `Program`.
pub fn parse(tokens: &[Tok]) -> PResult<Program> {
    let mut p = Parser::new(tokens);
    match p.parse_program() {
        Ok(program) => {
            tracing::debug!(
                tokens = tokens.len(),
                imports = program.imports.len(),
                items = program.items.len(),
                "parsed program"
            );
            Ok(program)
        }
        Err(e) => {
            tracing::debug!(line = e.line(), column = e.column(), error = %e.message, "parse failed");
            Err(e)
        }
    }
}

struct Parser<'t> {
    toks: &'t [Tok],
    pos: usize,
    /// Stands in for a missing trailing `Eof` token.
    eof: Tok,
}

impl<'t> Parser<'t> {
    fn new(toks: &'t [Tok]) -> Self {
        let end = toks.last().map(Tok::end).unwrap_or(Pos::START);
        Self {
            toks,
            pos: 0,
            eof: Tok::new(TokKind::Eof, "", end),
        }
    }

    fn cur(&self) -> &Tok {
        self.toks.get(self.pos).unwrap_or(&self.eof)
    }

    fn bump(&mut self) {
        if self.pos < self.toks.len() {
            self.pos += 1;
        }
    }

    fn at(&self, k: TokKind) -> bool {
        self.cur().kind == k
    }

    fn at_any(&self, ks: &[TokKind]) -> bool {
        ks.contains(&self.cur().kind)
    }

    fn expect(&mut self, k: TokKind) -> PResult<Tok> {
        if self.at(k) {
            let t = self.cur().clone();
            self.bump();
            Ok(t)
        } else {
            Err(ParseError::expected(k, self.cur()))
        }
    }

    fn parse_ident(&mut self) -> PResult<String> {
        Ok(self.expect(TokKind::Ident)?.text)
    }

    // ======= program / module / imports =======

    fn parse_program(&mut self) -> PResult<Program> {
        let module = self.parse_module_decl()?;

        let mut imports = Vec::new();
        while self.at(TokKind::KwImport) {
            imports.push(self.parse_import()?);
        }

        let mut items = Vec::new();
        while !self.at(TokKind::Eof) {
            items.push(self.parse_item()?);
        }
        self.expect(TokKind::Eof)?;

        if let Some(extra) = self.toks.get(self.pos) {
            return Err(ParseError::new(
                ParseErrorKind::TrailingInput,
                "unexpected token after end of input",
                extra,
            ));
        }

        Ok(Program {
            module,
            imports,
            items,
        })
    }

    fn parse_module_decl(&mut self) -> PResult<ModuleDecl> {
        self.expect(TokKind::KwModule)?;
        let name = self.parse_qual_id()?;
        self.expect(TokKind::Semicolon)?;
        Ok(ModuleDecl { name })
    }

    fn parse_qual_id(&mut self) -> PResult<QualifiedId> {
        let mut segments = vec![self.parse_ident()?];
        while self.at(TokKind::Dot) {
            self.bump();
            segments.push(self.parse_ident()?);
        }
        Ok(QualifiedId { segments })
    }

    fn parse_import(&mut self) -> PResult<ImportDecl> {
        self.expect(TokKind::KwImport)?;
        let path = self.parse_qual_id()?;
        let alias = if self.at(TokKind::KwAs) {
            self.bump();
            Some(self.parse_ident()?)
        } else {
            None
        };
        self.expect(TokKind::Semicolon)?;
        Ok(ImportDecl { path, alias })
    }

    // ======= top-level declarations =======

    fn parse_item(&mut self) -> PResult<Item> {
        match self.cur().kind {
            TokKind::KwType => Ok(Item::TypeAlias(self.parse_type_alias()?)),
            TokKind::KwStruct => Ok(Item::Struct(self.parse_struct()?)),
            TokKind::KwConst => Ok(Item::Const(self.parse_const()?)),
            TokKind::KwFn => Ok(Item::Fn(self.parse_fn_decl()?)),
            TokKind::KwLet => Ok(Item::Let(self.parse_let()?)),
            _ => Err(ParseError::unsupported(
                "a declaration (type, struct, const, fn, let)",
                self.cur(),
            )),
        }
    }

    fn parse_type_alias(&mut self) -> PResult<TypeAlias> {
        self.expect(TokKind::KwType)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::Eq)?;
        let ty = self.parse_type()?;
        self.expect(TokKind::Semicolon)?;
        Ok(TypeAlias { name, ty })
    }

    fn parse_struct(&mut self) -> PResult<StructDecl> {
        self.expect(TokKind::KwStruct)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::LBrace)?;

        let mut fields = Vec::new();
        if !self.at(TokKind::RBrace) {
            fields.push(self.parse_field()?);
            while self.at(TokKind::Comma) {
                self.bump();
                fields.push(self.parse_field()?);
            }
        }

        self.expect(TokKind::RBrace)?;
        self.expect(TokKind::Semicolon)?;
        Ok(StructDecl { name, fields })
    }

    fn parse_field(&mut self) -> PResult<Field> {
        let name = self.parse_ident()?;
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(Field { name, ty })
    }

    fn parse_const(&mut self) -> PResult<ConstDecl> {
        self.expect(TokKind::KwConst)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect(TokKind::Eq)?;
        let value = self.parse_expr()?;
        self.expect(TokKind::Semicolon)?;
        Ok(ConstDecl { name, ty, value })
    }

    fn parse_fn_decl(&mut self) -> PResult<FnDecl> {
        self.expect(TokKind::KwFn)?;
        let name = self.parse_ident()?;

        self.expect(TokKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokKind::RParen)?;

        // Optional return type: -> Type
        let ret_ty = if self.at(TokKind::Arrow) {
            self.bump();
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(FnDecl {
            name,
            params,
            ret_ty,
            body,
        })
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        let mut params = Vec::new();

        // Empty param list: ()
        if self.at(TokKind::RParen) {
            return Ok(params);
        }

        params.push(self.parse_param()?);
        while self.at(TokKind::Comma) {
            self.bump();
            params.push(self.parse_param()?);
        }

        Ok(params)
    }

    fn parse_param(&mut self) -> PResult<Param> {
        let name = self.parse_ident()?;
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(Param { name, ty })
    }

    /// `let x: T [= e];`, both as a declaration and as a statement.
    fn parse_let(&mut self) -> PResult<LetDecl> {
        self.expect(TokKind::KwLet)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type()?;
        let value = if self.at(TokKind::Eq) {
            self.bump();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokKind::Semicolon)?;
        Ok(LetDecl { name, ty, value })
    }

    // ======= types =======

    /// `SimpleType ('[' ']')*`. Function types have no syntax here.
    fn parse_type(&mut self) -> PResult<TypeExpr> {
        let mut ty = self.parse_simple_type()?;
        while self.at(TokKind::LBracket) {
            self.bump();
            self.expect(TokKind::RBracket)?;
            ty = TypeExpr::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_simple_type(&mut self) -> PResult<TypeExpr> {
        match self.cur().kind {
            TokKind::KwInt | TokKind::KwBool | TokKind::KwString => {
                let name = self.cur().text.clone();
                self.bump();
                Ok(TypeExpr::Simple(name))
            }
            TokKind::Ident => Ok(TypeExpr::Simple(self.parse_qual_id()?.dotted())),
            TokKind::LParen => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(TokKind::RParen)?;
                Ok(inner)
            }
            _ => Err(ParseError::unsupported(
                "a type (int, bool, string, identifier or '(')",
                self.cur(),
            )),
        }
    }

    // ======= blocks and statements =======

    fn parse_block(&mut self) -> PResult<Block> {
        self.expect(TokKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at_any(&[TokKind::RBrace, TokKind::Eof]) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokKind::RBrace)?;
        Ok(Block { stmts })
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        match self.cur().kind {
            TokKind::KwLet => Ok(Stmt::Let(self.parse_let()?)),
            TokKind::KwIf => self.parse_if(),
            TokKind::KwWhile => self.parse_while(),
            TokKind::KwReturn => self.parse_return(),
            TokKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// `if (cond) stmt [else stmt]`; `else` binds to the nearest `if`.
    fn parse_if(&mut self) -> PResult<Stmt> {
        self.expect(TokKind::KwIf)?;
        self.expect(TokKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokKind::RParen)?;
        let then_ = Box::new(self.parse_stmt()?);
        let else_ = if self.at(TokKind::KwElse) {
            self.bump();
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If { cond, then_, else_ })
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        self.expect(TokKind::KwWhile)?;
        self.expect(TokKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { cond, body })
    }

    fn parse_return(&mut self) -> PResult<Stmt> {
        self.expect(TokKind::KwReturn)?;
        let value = if self.at(TokKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokKind::Semicolon)?;
        Ok(Stmt::Return(value))
    }

    // ======= expressions (precedence climbing) =======
    //
    // Precedence (low -> high):
    //   =              right-assoc
    //   ||
    //   &&
    //   == !=
    //   < <= > >=
    //   + -
    //   * / %
    //   ! -            prefix
    //   () [] .        postfix, chained

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> PResult<Expr> {
        let target = self.parse_or()?;
        if self.at(TokKind::Eq) {
            self.bump();
            let value = self.parse_assign()?;
            return Ok(Expr::Assign {
                target: Box::new(target),
                value: Box::new(value),
            });
        }
        Ok(target)
    }

    /// One left-associative level: `next (op next)*`.
    fn binary_level(
        &mut self,
        ops: &[(TokKind, BinOp)],
        next: fn(&mut Self) -> PResult<Expr>,
    ) -> PResult<Expr> {
        let mut lhs = next(self)?;
        loop {
            let kind = self.cur().kind;
            let Some(&(_, op)) = ops.iter().find(|(k, _)| *k == kind) else {
                break;
            };
            self.bump(); // consume operator
            let rhs = next(self)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        self.binary_level(&[(TokKind::OrOr, BinOp::Or)], Self::parse_and)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        self.binary_level(&[(TokKind::AndAnd, BinOp::And)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        self.binary_level(
            &[(TokKind::EqEq, BinOp::Eq), (TokKind::BangEq, BinOp::Ne)],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> PResult<Expr> {
        self.binary_level(
            &[
                (TokKind::Lt, BinOp::Lt),
                (TokKind::Le, BinOp::Le),
                (TokKind::Gt, BinOp::Gt),
                (TokKind::Ge, BinOp::Ge),
            ],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        self.binary_level(
            &[(TokKind::Plus, BinOp::Add), (TokKind::Minus, BinOp::Sub)],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        self.binary_level(
            &[
                (TokKind::Star, BinOp::Mul),
                (TokKind::Slash, BinOp::Div),
                (TokKind::Percent, BinOp::Mod),
            ],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let op = match self.cur().kind {
            TokKind::Bang => UnOp::Not,
            TokKind::Minus => UnOp::Neg,
            _ => return self.parse_postfix(),
        };
        self.bump();
        let inner = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(inner),
        })
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cur().kind {
                TokKind::LParen => {
                    let callee = match expr {
                        Expr::Var(name) => name,
                        _ => {
                            return Err(ParseError::new(
                                ParseErrorKind::InvalidCallTarget,
                                "only identifiers can be called",
                                self.cur(),
                            ))
                        }
                    };
                    let args = self.parse_call_args()?;
                    expr = Expr::Call { callee, args };
                }
                TokKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokKind::RBracket)?;
                    expr = Expr::Index {
                        array: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokKind::Dot => {
                    self.bump();
                    let member = self.parse_ident()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        member,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        self.expect(TokKind::LParen)?; // we are at '('
        let mut args = Vec::new();
        if !self.at(TokKind::RParen) {
            args.push(self.parse_expr()?);
            while self.at(TokKind::Comma) {
                self.bump();
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let tok = self.cur().clone();
        let expr = match tok.kind {
            TokKind::Ident => Expr::Var(tok.text),
            TokKind::Num => Expr::Num(tok.text),
            TokKind::Str => Expr::Str(tok.text),
            TokKind::KwTrue => Expr::Bool(true),
            TokKind::KwFalse => Expr::Bool(false),
            TokKind::LParen => {
                self.bump(); // '('
                let inner = self.parse_expr()?;
                self.expect(TokKind::RParen)?;
                return Ok(Expr::Paren(Box::new(inner)));
            }
            _ => {
                return Err(ParseError::unsupported(
                    "an expression (identifier, number, string, true, false or '(')",
                    &tok,
                ))
            }
        };
        self.bump();
        Ok(expr)
    }
}
