use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info, warn};

use crate::ast::{Expr, ExprId, ExprKind, FunctionDecl, LiteralValue, Stmt};
use crate::callable::Callable;
use crate::class::{Class, Instance, INITIALIZER, SUPER, THIS};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::function::{self, Function};
use crate::resolver::ResolutionTable;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.  `zurückgeben` is carried here, not as an
/// error, and is unwrapped by the nearest function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Normal,
    Return(Value),
}

/// Convenient alias for interpreter results.
pub type IResult<T> = Result<T, RuntimeError>;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: ResolutionTable,
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an Interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates an Interpreter whose `drucke` output goes to `out`, and
    /// defines native functions such as `clock`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");

        globals
            .borrow_mut()
            .define("clock", Value::Native(Rc::new(function::clock())));

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: ResolutionTable::new(),
            out,
        }
    }

    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.globals)
    }

    /// Runs a resolved program.  `table` is merged into the distances
    /// already known, so functions from earlier programs keep working.
    pub fn interpret(&mut self, statements: &[Stmt], table: ResolutionTable) -> IResult<()> {
        debug!(
            "Interpreting {} statements with {} resolved reference(s)",
            statements.len(),
            table.len()
        );

        self.locals.extend(table);

        for stmt in statements {
            if let Completion::Return(_) = self.execute(stmt)? {
                // The resolver rejects top‑level returns.
                break;
            }
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    // ───────────────────────────── statements ──────────────────────────────

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> IResult<Completion> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Completion::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                debug!("Printing value: {}", value);
                if let Err(e) = writeln!(self.out, "{}", value) {
                    warn!("Failed to write output: {}", e);
                }
                Ok(Completion::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Completion::Normal)
            }

            Stmt::Block(statements) => {
                let environment = Environment::child_of(&self.environment);
                self.execute_block(statements, environment)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Completion::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Completion::Return(value) = self.execute(body)? {
                        return Ok(Completion::Return(value));
                    }
                }
                Ok(Completion::Normal)
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);
                let function = Function::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));
                Ok(Completion::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Ok(Completion::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                self.define_class(name, superclass.as_ref(), methods)?;
                Ok(Completion::Normal)
            }
        }
    }

    /// Runs `statements` inside `environment`, restoring the current scope on
    /// every exit path.  Stops at the first `Return` completion.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> IResult<Completion> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> IResult<Completion> {
        for stmt in statements {
            if let Completion::Return(value) = self.execute(stmt)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }

    fn define_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> IResult<()> {
        debug!("Defining class '{}'", name.lexeme);

        let superclass: Option<Rc<Class>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let token = match &expr.kind {
                        ExprKind::Variable(superclass_name) => superclass_name.clone(),
                        _ => name.clone(),
                    };
                    return Err(RuntimeError::SuperclassMustBeAClass { token });
                }
            },
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Nil);

        // Methods close over a scope holding `super` when there is one.
        let method_environment = match &superclass {
            Some(superclass) => {
                let environment = Environment::child_of(&self.environment);
                environment
                    .borrow_mut()
                    .define(SUPER, Value::Class(Rc::clone(superclass)));
                environment
            }
            None => Rc::clone(&self.environment),
        };

        let methods: HashMap<String, Rc<Function>> = methods
            .iter()
            .map(|declaration| {
                let function = Function::new(
                    Rc::clone(declaration),
                    Rc::clone(&method_environment),
                    declaration.name.lexeme == INITIALIZER,
                );
                (declaration.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        let class = Class::new(name.lexeme.clone(), superclass, methods);

        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))?;

        info!("Class '{}' defined", name.lexeme);
        Ok(())
    }

    // ───────────────────────────── expressions ─────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> IResult<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),

            ExprKind::Grouping(inner) => self.evaluate(inner),

            ExprKind::Unary { operator, right } => self.evaluate_unary(operator, right),

            ExprKind::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            ExprKind::Logical {
                left,
                operator,
                right,
            } => {
                let left_val = self.evaluate(left)?;

                let short_circuit = if operator.token_type == TokenType::OR {
                    left_val.is_truthy()
                } else {
                    !left_val.is_truthy()
                };

                if short_circuit {
                    Ok(left_val)
                } else {
                    self.evaluate(right)
                }
            }

            ExprKind::Variable(name) => self.look_up_variable(expr.id, name),

            ExprKind::Assign { name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(expr.id) {
                    Some(distance) => {
                        if !Environment::assign_at(
                            &self.environment,
                            distance,
                            &name.lexeme,
                            value.clone(),
                        ) {
                            return Err(RuntimeError::UndefinedVariable {
                                token: name.clone(),
                            });
                        }
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            ExprKind::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_val = self.evaluate(callee)?;

                let mut arg_values = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    arg_values.push(self.evaluate(arg)?);
                }

                self.call_value(&callee_val, paren, arg_values)
            }

            ExprKind::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => Instance::get(&instance, name),
                _ => Err(RuntimeError::NotAnInstance {
                    token: name.clone(),
                }),
            },

            ExprKind::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(RuntimeError::OnlyInstancesHaveFields {
                        token: name.clone(),
                    });
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());
                Ok(value)
            }

            ExprKind::This(keyword) => self.look_up_variable(expr.id, keyword),

            ExprKind::Super { keyword, method } => self.evaluate_super(expr.id, keyword, method),
        }
    }

    /// Evaluates a unary expression.
    fn evaluate_unary(&mut self, op: &Token, expr: &Expr) -> IResult<Value> {
        let right_val = self.evaluate(expr)?;

        match op.token_type {
            TokenType::MINUS => match right_val {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => {
                    debug!("Unary '-' on {}", other.type_name());
                    Err(RuntimeError::type_mismatch(
                        op,
                        format!("Operand von '{}' muss eine Zahl sein.", op.lexeme),
                    ))
                }
            },
            _ => Ok(Value::Bool(!right_val.is_truthy())),
        }
    }

    /// Evaluates a binary expression.
    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> IResult<Value> {
        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;

        match op.token_type {
            TokenType::PLUS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                (a, b) => {
                    debug!("'+' on {} and {}", a.type_name(), b.type_name());
                    Err(RuntimeError::type_mismatch(
                        op,
                        "Operanden müssen zwei Zahlen oder zwei Zeichenketten sein.",
                    ))
                }
            },
            TokenType::MINUS => {
                let (a, b) = number_operands(op, &left_val, &right_val)?;
                Ok(Value::Number(a - b))
            }
            TokenType::STAR => {
                let (a, b) = number_operands(op, &left_val, &right_val)?;
                Ok(Value::Number(a * b))
            }
            // IEEE semantics: x/0 is ±inf or NaN, never an error.
            TokenType::SLASH => {
                let (a, b) = number_operands(op, &left_val, &right_val)?;
                Ok(Value::Number(a / b))
            }
            TokenType::GREATER => {
                let (a, b) = number_operands(op, &left_val, &right_val)?;
                Ok(Value::Bool(a > b))
            }
            TokenType::GREATER_EQUAL => {
                let (a, b) = number_operands(op, &left_val, &right_val)?;
                Ok(Value::Bool(a >= b))
            }
            TokenType::LESS => {
                let (a, b) = number_operands(op, &left_val, &right_val)?;
                Ok(Value::Bool(a < b))
            }
            TokenType::LESS_EQUAL => {
                let (a, b) = number_operands(op, &left_val, &right_val)?;
                Ok(Value::Bool(a <= b))
            }
            TokenType::BANG_EQUAL => Ok(Value::Bool(left_val != right_val)),
            _ => Ok(Value::Bool(left_val == right_val)),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> IResult<Value> {
        let undefined = || RuntimeError::UndefinedVariable {
            token: keyword.clone(),
        };

        let distance = self.locals.get(id).ok_or_else(undefined)?;

        let Some(Value::Class(superclass)) = Environment::get_at(&self.environment, distance, SUPER)
        else {
            return Err(undefined());
        };

        // `dies` lives one scope inside the `super` scope.
        let this_distance = distance.checked_sub(1).ok_or_else(undefined)?;
        let Some(Value::Instance(instance)) =
            Environment::get_at(&self.environment, this_distance, THIS)
        else {
            return Err(undefined());
        };

        let Some(function) = superclass.find_method(&method.lexeme) else {
            return Err(RuntimeError::UndefinedProperty {
                token: method.clone(),
            });
        };

        debug!(
            "super.{} found on '{}'",
            method.lexeme,
            superclass.name()
        );

        Ok(Value::Function(Rc::new(function.bind(instance))))
    }

    /// Resolved references read from their frame; everything else is a global.
    fn look_up_variable(&self, id: ExprId, name: &Token) -> IResult<Value> {
        match self.locals.get(id) {
            Some(distance) => Environment::get_at(&self.environment, distance, &name.lexeme)
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    token: name.clone(),
                }),
            None => self.globals.borrow().get(name),
        }
    }

    /// Invokes a callable (native, user‑defined function, or class).
    fn call_value(&mut self, callee: &Value, paren: &Token, arguments: Vec<Value>) -> IResult<Value> {
        let callable: &dyn Callable = match callee {
            Value::Function(function) => function.as_ref(),
            Value::Native(native) => native.as_ref(),
            Value::Class(class) => class,
            other => {
                debug!("Attempt to call a {}", other.type_name());
                return Err(RuntimeError::NotCallable {
                    token: paren.clone(),
                });
            }
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                token: paren.clone(),
                expected: callable.arity(),
                actual: arguments.len(),
            });
        }

        callable.call(self, arguments)
    }
}

/// Both operands of `op` as numbers, or a type error naming `op`.
fn number_operands(op: &Token, left: &Value, right: &Value) -> IResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::type_mismatch(
            op,
            format!("Operanden von '{}' müssen Zahlen sein.", op.lexeme),
        )),
    }
}
