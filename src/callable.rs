use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Anything a call expression can invoke: user functions, classes (as
/// constructors) and native functions.
///
/// The interpreter checks `arguments.len() == arity()` before calling, so
/// implementations may rely on it.
pub trait Callable {
    fn arity(&self) -> usize;

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError>;
}
