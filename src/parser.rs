/*!
Recursive‑descent parser: token stream → [`Stmt`] list.

### Error handling

Syntax errors are *collected*.  After a hard error the parser discards tokens
up to the next statement boundary (`synchronize`) and keeps going, so one
pass reports every independent mistake.  Soft errors (too many arguments,
invalid assignment target) are recorded without unwinding at all.

### Expression identity

Every [`Expr`] gets a fresh [`ExprId`] from a counter owned by the parser.
A session that parses several chunks (the interactive prompt) seeds each new
parser with [`Parser::next_id`] of the previous one so ids never repeat.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| High‑level descent into grammar branches. |
| Error paths                  | `debug`| Context before recording the diagnostic.  |

--------------------------------------------------------------------------------
Grammar (EBNF)
--------------

```text
program        → declaration* EOF ;
declaration    → classDecl | funDecl | varDecl | statement ;
classDecl      → "klasse" IDENT ( "<" IDENT )? "{" function* "}" ;
funDecl        → "funktion" function ;
function       → IDENT "(" parameters? ")" block ;
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → exprStmt | forStmt | ifStmt | printStmt
               | returnStmt | whileStmt | block ;
forStmt        → "für" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
ifStmt         → "wenn" "(" expression ")" statement ( "sonst" statement )? ;
printStmt      → "drucke" expression ";" ;
returnStmt     → "zurückgeben" expression? ";" ;
whileStmt      → "während" "(" expression ")" statement ;
block          → "{" declaration* "}" ;
expression     → assignment ;
assignment     → ( call "." )? IDENT "=" assignment | logic_or ;
logic_or       → logic_and ( "oder" logic_and )* ;
logic_and      → equality ( "und" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | call ;
call           → primary ( "(" arguments? ")" | "." IDENT )* ;
primary        → NUMBER | STRING | "wahr" | "falsch" | "nichts"
               | "(" expression ")" | "super" "." IDENT | "dies" | IDENT ;
```

`für` has no node of its own; it is desugared into `während` inside a block.
*/

use std::rc::Rc;

use crate::ast::{Expr, ExprId, ExprKind, FunctionDecl, LiteralValue, Stmt};
use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Parameter and argument lists are capped at this many entries.
pub const MAX_ARGUMENTS: usize = 255;

/// Top‑level parser over an owned token buffer.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    next_id: ExprId,
    errors: Vec<LoxError>,
}

impl Parser {
    /// Construct a new parser whose expression ids start at 0.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_first_id(tokens, 0)
    }

    /// Construct a parser whose first expression id is `first_id`.
    pub fn with_first_id(mut tokens: Vec<Token>, first_id: ExprId) -> Self {
        info!(
            "Parser created with {} tokens, first expression id {}",
            tokens.len(),
            first_id
        );

        if !matches!(tokens.last(), Some(t) if t.token_type == TokenType::EOF) {
            let line: usize = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::new(TokenType::EOF, "", line));
        }

        Self {
            tokens,
            current: 0,
            next_id: first_id,
            errors: Vec::new(),
        }
    }

    /// The id the next constructed expression would receive.
    pub fn next_id(&self) -> ExprId {
        self.next_id
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.  Returns every statement, or every
    /// diagnostic if at least one was reported.
    pub fn parse(&mut self) -> std::result::Result<Vec<Stmt>, Vec<LoxError>> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        if self.errors.is_empty() {
            info!("Parsed {} statement(s)", statements.len());
            Ok(statements)
        } else {
            info!("Parse finished with {} error(s)", self.errors.len());
            Err(std::mem::take(&mut self.errors))
        }
    }

    // ──────────────────────── declaration rules ───────────────────

    /// Parses one declaration; on a hard error records it, resynchronizes
    /// and yields `None`.
    fn declaration(&mut self) -> Option<Stmt> {
        debug!("Entering declaration");

        let result = if self.matches(TokenType::CLASS) {
            self.class_declaration()
        } else if self.matches(TokenType::FUN) {
            self.function("Funktion").map(|decl| Stmt::Function(Rc::new(decl)))
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                debug!("Parse debug: {}", e);
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Klassenname erwartet.")?;

        let superclass: Option<Expr> = if self.matches(TokenType::LESS) {
            let superclass_name: Token =
                self.consume(TokenType::IDENTIFIER, "Name der Oberklasse erwartet.")?;
            Some(self.expr(ExprKind::Variable(superclass_name)))
        } else {
            None
        };

        self.consume(TokenType::LEFT_BRACE, "'{' vor Klassenkörper erwartet.")?;

        let mut methods: Vec<Rc<FunctionDecl>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(Rc::new(self.function("Methode")?));
        }

        self.consume(TokenType::RIGHT_BRACE, "'}' nach Klassenkörper erwartet.")?;

        debug!(
            "Parsed class '{}' with {} method(s)",
            name.lexeme,
            methods.len()
        );

        Ok(Stmt::Class {
            name,
            superclass,
            methods,
        })
    }

    /// `kind` is `"Funktion"` or `"Methode"`; it only shapes the messages.
    fn function(&mut self, kind: &str) -> Result<FunctionDecl> {
        let name: Token =
            self.consume(TokenType::IDENTIFIER, &format!("{}sname erwartet.", kind))?;

        self.consume(
            TokenType::LEFT_PAREN,
            &format!("'(' nach {}sname erwartet.", kind),
        )?;

        let mut params: Vec<Token> = Vec::new();
        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    let line = self.peek().line;
                    self.report(line, "Kann nicht mehr als 255 Parameter haben.");
                }

                params.push(self.consume(TokenType::IDENTIFIER, "Parametername erwartet.")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "')' nach Parametern erwartet.")?;

        self.consume(
            TokenType::LEFT_BRACE,
            &format!("'{{' vor {}skörper erwartet.", kind),
        )?;
        let body: Vec<Stmt> = self.block()?;

        Ok(FunctionDecl { name, params, body })
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Variablenname erwartet.")?;

        let initializer: Option<Expr> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "';' nach Variablendeklaration erwartet.",
        )?;
        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        debug!("Entering statement");

        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    /// Desugars `für (init; cond; incr) body` into
    /// `{ init; während (cond) { body; incr; } }`.
    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "'(' nach 'für' erwartet.")?;

        let initializer: Option<Stmt> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::SEMICOLON, "';' nach Schleifenbedingung erwartet.")?;

        let increment: Option<Expr> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::RIGHT_PAREN, "')' nach für-Klauseln erwartet.")?;

        let mut body: Stmt = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition: Expr = match condition {
            Some(condition) => condition,
            None => self.expr(ExprKind::Literal(LiteralValue::Bool(true))),
        };

        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let value: Expr = self.expression()?;

        self.consume(TokenType::SEMICOLON, "';' nach Wert erwartet.")?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr: Expr = self.expression()?;
        self.consume(TokenType::SEMICOLON, "';' nach Ausdruck erwartet.")?;
        Ok(Stmt::Expression(expr))
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "'(' nach 'wenn' erwartet.")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "')' nach wenn-Bedingung erwartet.")?;

        let then_branch: Box<Stmt> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "'(' nach 'während' erwartet.")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "')' nach Bedingung erwartet.")?;
        let body: Box<Stmt> = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();
        let value: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "';' nach Rückgabewert erwartet.")?;
        Ok(Stmt::Return { keyword, value })
    }

    /// Statements up to the closing brace.  Broken declarations inside the
    /// block are recorded and skipped.
    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "'}' nach Block erwartet.")?;
        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr: Expr = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals_line: usize = self.previous().line;
            let value: Expr = self.assignment()?;

            match expr.kind {
                ExprKind::Variable(name) => {
                    return Ok(self.expr(ExprKind::Assign {
                        name,
                        value: Box::new(value),
                    }));
                }

                ExprKind::Get { object, name } => {
                    return Ok(self.expr(ExprKind::Set {
                        object,
                        name,
                        value: Box::new(value),
                    }));
                }

                kind => {
                    // Reported, but the left side is kept and parsing goes on.
                    self.report(equals_line, "Ungültiges Zuweisungsziel.");
                    return Ok(Expr::new(expr.id, kind));
                }
            }
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.logical_and()?;

            expr = self.expr(ExprKind::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.equality()?;

            expr = self.expr(ExprKind::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.comparison()?;

        while self.matches(TokenType::BANG_EQUAL) || self.matches(TokenType::EQUAL_EQUAL) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.comparison()?;

            expr = self.binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.term()?;

        while self.matches(TokenType::GREATER)
            || self.matches(TokenType::GREATER_EQUAL)
            || self.matches(TokenType::LESS)
            || self.matches(TokenType::LESS_EQUAL)
        {
            let operator: Token = self.previous().clone();
            let right: Expr = self.term()?;

            expr = self.binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.factor()?;

        while self.matches(TokenType::MINUS) || self.matches(TokenType::PLUS) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.factor()?;

            expr = self.binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.unary()?;

        while self.matches(TokenType::STAR) || self.matches(TokenType::SLASH) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            expr = self.binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            return Ok(self.expr(ExprKind::Unary {
                operator,
                right: Box::new(right),
            }));
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::DOT) {
                let name: Token =
                    self.consume(TokenType::IDENTIFIER, "Eigenschaftsname nach '.' erwartet.")?;

                expr = self.expr(ExprKind::Get {
                    object: Box::new(expr),
                    name,
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments: Vec<Expr> = Vec::new();
        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    let line = self.peek().line;
                    self.report(line, "Kann nicht mehr als 255 Argumente haben.");
                }

                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: Token = self.consume(TokenType::RIGHT_PAREN, "')' nach Argumenten erwartet.")?;

        Ok(self.expr(ExprKind::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        }))
    }

    fn primary(&mut self) -> Result<Expr> {
        let literal: Option<LiteralValue> = match &self.peek().token_type {
            TokenType::FALSE => Some(LiteralValue::Bool(false)),
            TokenType::TRUE => Some(LiteralValue::Bool(true)),
            TokenType::NIL => Some(LiteralValue::Nil),
            TokenType::NUMBER(n) => Some(LiteralValue::Number(*n)),
            TokenType::STRING(s) => Some(LiteralValue::Str(s.clone())),
            _ => None,
        };

        if let Some(literal) = literal {
            self.advance();
            return Ok(self.expr(ExprKind::Literal(literal)));
        }

        if self.matches(TokenType::SUPER) {
            let keyword: Token = self.previous().clone();
            self.consume(TokenType::DOT, "'.' nach 'super' erwartet.")?;
            let method: Token = self.consume(
                TokenType::IDENTIFIER,
                "Name der Oberklassenmethode erwartet.",
            )?;
            return Ok(self.expr(ExprKind::Super { keyword, method }));
        }

        if self.matches(TokenType::THIS) {
            let keyword: Token = self.previous().clone();
            return Ok(self.expr(ExprKind::This(keyword)));
        }

        if self.matches(TokenType::IDENTIFIER) {
            let name: Token = self.previous().clone();
            return Ok(self.expr(ExprKind::Variable(name)));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "')' nach Ausdruck erwartet.")?;

            return Ok(self.expr(ExprKind::Grouping(Box::new(expr))));
        }

        debug!("No expression at {:?}", self.peek().token_type);

        Err(LoxError::parse(self.peek().line, "Ausdruck erwartet."))
    }

    // ────────────────────── utility helpers ───────────────────────

    /// Wrap `kind` in a node carrying the next free id.
    #[inline]
    fn expr(&mut self, kind: ExprKind) -> Expr {
        let id: ExprId = self.next_id;
        self.next_id += 1;
        Expr::new(id, kind)
    }

    #[inline]
    fn binary(&mut self, left: Expr, operator: Token, right: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    /// Record a diagnostic that does not abort the current production.
    fn report(&mut self, line: usize, message: &str) {
        self.errors.push(LoxError::parse(line, message));
    }

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<Token> {
        if self.check(ttype) {
            return Ok(self.advance().clone());
        }

        debug!(
            "Expected token missing at line {}: {}",
            self.peek().line,
            message
        );

        Err(LoxError::parse(self.peek().line, message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => return,
                _ => {}
            }

            self.advance();
        }
    }
}
