//! Static resolver pass.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of `HashMap<&str,bool>` tracking declared/defined).
//! 2. Report static errors (redeclaration, forward‑read in initializer, invalid
//!    `zurückgeben` / `dies` / `super`, self‑inheritance).
//! 3. Record, for *each* variable occurrence, whether it’s a local (and at
//!    what distance) or a global, so the interpreter never falls back to
//!    dynamic lookup that would see a later shadowing local.
//!
//! Diagnostics do not stop the walk; they are collected and returned in
//! place of the table.

use crate::ast::{Expr, ExprId, ExprKind, FunctionDecl, Stmt};
use crate::class::{INITIALIZER, SUPER, THIS};
use crate::error::LoxError;
use crate::token::Token;
use log::{debug, info};
use std::collections::HashMap;

/// Expression id → number of scopes between the reference and its binding.
/// Globals have no entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolutionTable {
    depths: HashMap<ExprId, usize>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ExprId, depth: usize) {
        self.depths.insert(id, depth);
    }

    pub fn get(&self, id: ExprId) -> Option<usize> {
        self.depths.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Merge another program's table into this one.
    pub fn extend(&mut self, other: ResolutionTable) {
        self.depths.extend(other.depths);
    }
}

/// What kind of function body are we in?  Used to validate `zurückgeben`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

/// Are we inside a class body, and does it have a superclass?
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Resolver: tracks scopes, enforces static rules, and records binding
/// distances into a [`ResolutionTable`].
pub struct Resolver<'a> {
    scopes: Vec<HashMap<&'a str, bool>>, // false=declared, true=defined
    current_function: FunctionType,
    current_class: ClassType,
    table: ResolutionTable,
    errors: Vec<LoxError>,
}

impl<'a> Default for Resolver<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        info!("Resolver instantiated");
        Resolver {
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            table: ResolutionTable::new(),
            errors: Vec::new(),
        }
    }

    /// Walk all top‑level statements.
    pub fn resolve(&mut self, statements: &'a [Stmt]) -> Result<ResolutionTable, Vec<LoxError>> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        self.resolve_stmts(statements);

        if self.errors.is_empty() {
            info!("Resolved {} local reference(s)", self.table.len());
            Ok(std::mem::take(&mut self.table))
        } else {
            info!("Resolve pass reported {} error(s)", self.errors.len());
            Err(std::mem::take(&mut self.errors))
        }
    }

    fn resolve_stmts(&mut self, statements: &'a [Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(name);
            }

            Stmt::Function(declaration) => {
                // the name is visible inside its own body (recursion)
                self.declare(&declaration.name);
                self.define(&declaration.name);
                self.resolve_function(declaration, FunctionType::Function);
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error(
                        keyword,
                        "Kann nicht von Code auf oberster Ebene zurückgeben.",
                    );
                }
                if let Some(expr) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(
                            keyword,
                            "Kann keinen Wert von einem Initialisierer zurückgeben.",
                        );
                    }
                    self.resolve_expr(expr);
                }
            }
        }
    }

    fn resolve_class(
        &mut self,
        name: &'a Token,
        superclass: Option<&'a Expr>,
        methods: &'a [std::rc::Rc<FunctionDecl>],
    ) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(name);
        self.define(name);

        if let Some(superclass) = superclass {
            if let ExprKind::Variable(superclass_name) = &superclass.kind {
                if superclass_name.lexeme == name.lexeme {
                    self.error(
                        superclass_name,
                        "Eine Klasse kann nicht von sich selbst erben.",
                    );
                }
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass);

            self.begin_scope();
            self.define_implicit(SUPER);
        }

        self.begin_scope();
        self.define_implicit(THIS);

        for method in methods {
            let kind = if method.name.lexeme == INITIALIZER {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Literal(_) => {}

            ExprKind::Grouping(inner) => {
                self.resolve_expr(inner);
            }

            ExprKind::Unary { right, .. } => {
                self.resolve_expr(right);
            }

            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            ExprKind::Variable(name) => {
                let in_own_initializer = self
                    .scopes
                    .last()
                    .is_some_and(|scope| scope.get(name.lexeme.as_str()) == Some(&false));

                if in_own_initializer {
                    self.error(
                        name,
                        "Kann lokale Variable in ihrer eigenen Initialisierung nicht lesen.",
                    );
                }

                self.resolve_local(expr.id, name);
            }

            ExprKind::Assign { name, value } => {
                // RHS first, then bind the target
                self.resolve_expr(value);
                self.resolve_local(expr.id, name);
            }

            ExprKind::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            ExprKind::Get { object, .. } => self.resolve_expr(object),

            ExprKind::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }

            ExprKind::This(keyword) => {
                if self.current_class == ClassType::None {
                    self.error(keyword, "Kann 'dies' nicht außerhalb einer Klasse verwenden.");
                    return;
                }

                self.resolve_local(expr.id, keyword);
            }

            ExprKind::Super { keyword, .. } => {
                match self.current_class {
                    ClassType::None => self.error(
                        keyword,
                        "Kann 'super' nicht außerhalb einer Klasse verwenden.",
                    ),
                    ClassType::Class => self.error(
                        keyword,
                        "Kann 'super' nicht in einer Klasse ohne Oberklasse verwenden.",
                    ),
                    ClassType::Subclass => {}
                }

                self.resolve_local(expr.id, keyword);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function’s parameters + body.
    fn resolve_function(&mut self, function: &'a FunctionDecl, kind: FunctionType) {
        let enclosing = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&function.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &'a Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        let already_declared = scope.contains_key(name.lexeme.as_str());
        scope.insert(name.lexeme.as_str(), false);

        if already_declared {
            self.error(
                name,
                "Bereits eine Variable mit diesem Namen in diesem Gültigkeitsbereich.",
            );
        }
    }

    fn define(&mut self, name: &'a Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.as_str(), true);
        }
    }

    /// Bind `dies` / `super` in the innermost scope.
    fn define_implicit(&mut self, name: &'static str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, true);
        }
    }

    fn error(&mut self, token: &Token, message: &str) {
        debug!("Resolve error at '{}': {}", token.lexeme, message);
        self.errors.push(LoxError::resolve(token, message));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this occurrence as a local at distance `d`, or leave it out
    /// of the table (global) if no scope declares it.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name.lexeme.as_str()) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);
                self.table.insert(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }
}
