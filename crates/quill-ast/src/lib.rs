pub mod render;

pub mod span {
    use serde::Serialize;

    /// 1-based line/column of a character in the source.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub struct Pos {
        pub line: u32,
        pub column: u32,
    }

    impl Pos {
        pub const START: Pos = Pos { line: 1, column: 1 };

        pub fn new(line: u32, column: u32) -> Self {
            Self { line, column }
        }
    }
}

pub mod ast {
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Program {
        pub module: ModuleDecl,
        pub imports: Vec<ImportDecl>,
        pub items: Vec<Item>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ModuleDecl {
        pub name: QualifiedId,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ImportDecl {
        pub path: QualifiedId,
        pub alias: Option<String>,
    }

    /// Dotted name such as `Math.Advanced`. Never empty.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct QualifiedId {
        pub segments: Vec<String>,
    }

    impl QualifiedId {
        pub fn dotted(&self) -> String {
            self.segments.join(".")
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Item {
        TypeAlias(TypeAlias),
        Struct(StructDecl),
        Const(ConstDecl),
        Fn(FnDecl),
        Let(LetDecl),
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct TypeAlias {
        pub name: String,
        pub ty: TypeExpr,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct StructDecl {
        pub name: String,
        pub fields: Vec<Field>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Field {
        pub name: String,
        pub ty: TypeExpr,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ConstDecl {
        pub name: String,
        pub ty: TypeExpr,
        pub value: Expr,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FnDecl {
        pub name: String,
        pub params: Vec<Param>,
        pub ret_ty: Option<TypeExpr>,
        pub body: Block,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Param {
        pub name: String,
        pub ty: TypeExpr,
    }

    /// `let` is both a top-level item and a statement.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct LetDecl {
        pub name: String,
        pub ty: TypeExpr,
        pub value: Option<Expr>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum TypeExpr {
        /// `int`, `bool`, `string` or a dotted user type name
        Simple(String),
        Array(Box<TypeExpr>),
        Func {
            // (A, B) -> R
            params: Vec<TypeExpr>,
            ret: Box<TypeExpr>,
        },
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Block {
        pub stmts: Vec<Stmt>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Stmt {
        Let(LetDecl),
        Expr(Expr),
        If {
            cond: Expr,
            then_: Box<Stmt>,
            else_: Option<Box<Stmt>>,
        },
        While {
            cond: Expr,
            body: Box<Stmt>,
        },
        Return(Option<Expr>),
        Block(Block),
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Expr {
        Assign {
            target: Box<Expr>,
            value: Box<Expr>,
        },
        Binary {
            op: BinOp,
            lhs: Box<Expr>,
            rhs: Box<Expr>,
        },
        Unary {
            op: UnOp,
            expr: Box<Expr>,
        },
        /// Callee is always a bare identifier.
        Call {
            callee: String,
            args: Vec<Expr>,
        },
        Index {
            array: Box<Expr>,
            index: Box<Expr>,
        },
        Member {
            object: Box<Expr>,
            member: String,
        },
        /// Exact lexeme, e.g. `6.02e23`
        Num(String),
        /// Lexeme including both quotes
        Str(String),
        Bool(bool),
        Var(String),
        Paren(Box<Expr>),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum UnOp {
        Not,
        Neg,
    }

    impl UnOp {
        pub fn symbol(self) -> &'static str {
            match self {
                UnOp::Not => "!",
                UnOp::Neg => "-",
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BinOp {
        // logical
        Or,
        And,
        // equality
        Eq,
        Ne,
        // relational
        Lt,
        Le,
        Gt,
        Ge,
        // arithmetic
        Add,
        Sub,
        Mul,
        Div,
        Mod,
    }

    impl BinOp {
        pub fn symbol(self) -> &'static str {
            match self {
                BinOp::Or => "||",
                BinOp::And => "&&",
                BinOp::Eq => "==",
                BinOp::Ne => "!=",
                BinOp::Lt => "<",
                BinOp::Le => "<=",
                BinOp::Gt => ">",
                BinOp::Ge => ">=",
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Mod => "%",
            }
        }
    }
}
