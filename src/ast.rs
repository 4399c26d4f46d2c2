//! Abstract syntax tree produced by the [`Parser`](crate::parser::Parser).
//!
//! Expressions carry an [`ExprId`] assigned at construction.  The resolver
//! keys its side table by that id, never by node contents, so two identical
//! references at different positions resolve independently.

use std::rc::Rc;

use crate::token::Token;

/// Stable, unique identity of an expression node within a session.
pub type ExprId = usize;

/// A **literal constant** that appears directly in the source code.
///
/// The parser copies the value out of the token so the tree does not
/// depend on the token payload.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric literal ‑ stored as IEEE‑754 `f64`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    /// `wahr` / `falsch`.
    Bool(bool),

    /// `nichts`.
    Nil,
}

/// An expression node: identity plus shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(id: ExprId, kind: ExprKind) -> Self {
        Self { id, kind }
    }
}

/// Every kind of *expression*.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal constant.
    Literal(LiteralValue),

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr>),

    /// Prefix unary operator expression, e.g. `!bereit` or `-42`.
    Unary {
        /// The operator token (`!` or `-`).
        operator: Token,
        right: Box<Expr>,
    },

    /// Infix arithmetic, comparison or equality expression.
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Short‑circuiting `und` / `oder`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Variable access.
    Variable(Token),

    /// `identifier "=" expression`
    Assign { name: Token, value: Box<Expr> },

    /// Function‑, method‑ or constructor call.
    Call {
        callee: Box<Expr>,
        /// The closing `)` token ‑ retained for error reporting.
        paren: Token,
        arguments: Vec<Expr>,
    },

    /// `object.name`
    Get { object: Box<Expr>, name: Token },

    /// `object.name = value`
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    /// The `dies` keyword inside a method.
    This(Token),

    /// `super.method`
    Super { keyword: Token, method: Token },
}

/// A named function or method: `name "(" params ")" block`.
///
/// Shared behind an `Rc` so every runtime function value created from it
/// (including each bound method) points at one body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,

    /// Parameter name tokens (arity ≤ 255).
    pub params: Vec<Token>,

    pub body: Vec<Stmt>,
}

/// **Abstract‑Syntax‑Tree node** for *statements*.  A program is a sequence
/// of these nodes returned by [`Parser::parse`](crate::parser::Parser::parse).
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Stand‑alone expression terminated by a semicolon.
    Expression(Expr),

    /// `drucke` statement used for output.
    Print(Expr),

    /// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
    Var {
        name: Token,
        initializer: Option<Expr>,
    },

    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt>),

    /// `wenn` / `sonst` conditional.
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// `während` loop.  `für` loops are desugared into this.
    While { condition: Expr, body: Box<Stmt> },

    /// Function declaration ‑ becomes a first‑class callable value.
    Function(Rc<FunctionDecl>),

    /// `zurückgeben` statement inside a function body.
    Return {
        /// The keyword token (for diagnostics).
        keyword: Token,

        /// Absent ⇒ `nichts` is returned.
        value: Option<Expr>,
    },

    /// `klasse Name (< Super)? { methods }`
    Class {
        name: Token,

        /// Always an [`ExprKind::Variable`] when present.
        superclass: Option<Expr>,

        methods: Vec<Rc<FunctionDecl>>,
    },
}
