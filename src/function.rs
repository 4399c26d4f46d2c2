use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::callable::Callable;
use crate::class::{Instance, THIS};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Completion, Interpreter};
use crate::value::Value;

/// A user‑defined function or method: declaration plus the scope it closes
/// over.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
    is_initializer: bool,
}

impl Function {
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// A copy of this method whose closure is a fresh child scope with `dies`
    /// bound to `instance`.  The original closure chain is shared.
    pub fn bind(&self, instance: Rc<RefCell<Instance>>) -> Function {
        let environment = Environment::child_of(&self.closure);
        environment
            .borrow_mut()
            .define(THIS, Value::Instance(instance));

        Function::new(
            Rc::clone(&self.declaration),
            environment,
            self.is_initializer,
        )
    }

    /// The instance a bound initializer was bound to.
    fn bound_instance(&self) -> Value {
        Environment::get_at(&self.closure, 0, THIS).unwrap_or(Value::Nil)
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        debug!("Calling function '{}'", self.name());

        let environment = Environment::child_of(&self.closure);

        {
            let mut frame = environment.borrow_mut();
            for (param, argument) in self.declaration.params.iter().zip(arguments) {
                frame.define(&param.lexeme, argument);
            }
        }

        let completion: Completion = interpreter.execute_block(&self.declaration.body, environment)?;

        if self.is_initializer {
            return Ok(self.bound_instance());
        }

        Ok(match completion {
            Completion::Return(value) => value,
            Completion::Normal => Value::Nil,
        })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

// The closure is left out: it may contain this very function.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .field("is_initializer", &self.is_initializer)
            .finish()
    }
}

/// A function implemented by the host.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> Value,
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, _interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        debug!("Calling native function '{}'", self.name);

        Ok((self.func)(&arguments))
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// `clock()`: seconds since the Unix epoch.
pub fn clock() -> NativeFunction {
    NativeFunction {
        name: "clock",
        arity: 0,
        func: |_args: &[Value]| {
            let millis: i64 = chrono::Utc::now().timestamp_millis();
            Value::Number(millis as f64 / 1000.0)
        },
    }
}
