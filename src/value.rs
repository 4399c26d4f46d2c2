use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::function::{Function, NativeFunction};

/// Runtime value: a closed dynamic‑type union.
///
/// Heap objects are shared by `Rc`; cloning a `Value` never copies a
/// function, class or instance.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Rc<Function>),
    Native(Rc<NativeFunction>),
    Class(Rc<Class>),
    Instance(Rc<RefCell<Instance>>),
}

impl Value {
    /// Only `nichts` and `falsch` are falsy; `0` and `""` are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    /// Name of the value's dynamic type, for logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }
}

/// Language equality: same‑typed operands compare natively (`f64 ==`, so
/// `NaN != NaN`), objects compare by identity, mixed types are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            // IEEE comparison, not bitwise: `0/0 == 0/0` is `falsch`.
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nichts"),

            Value::Bool(true) => write!(f, "wahr"),

            Value::Bool(false) => write!(f, "falsch"),

            Value::Number(n) => {
                if *n == 0.0 && n.is_sign_negative() {
                    write!(f, "-0")
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // 3.0 → "3"
                    let mut buf: itoa::Buffer = itoa::Buffer::new();
                    write!(f, "{}", buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::String(s) => write!(f, "{}", s),

            Value::Function(function) => write!(f, "{}", function),

            Value::Native(native) => write!(f, "{}", native),

            Value::Class(class) => write!(f, "{}", class),

            Value::Instance(instance) => write!(f, "{}", instance.borrow()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_nil_and_false_are_falsy() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
    }

    #[test]
    fn mixed_types_are_never_equal() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_ne!(Value::Number(1.0), Value::String("1".into()));
    }

    #[test]
    fn nan_is_not_equal_to_itself() {
        let nan = Value::Number(0.0 / 0.0);

        assert_ne!(nan, nan.clone());
        assert_eq!(Value::Number(0.5), Value::Number(0.5));
    }

    #[test]
    fn numbers_print_without_trailing_zero() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(-0.0).to_string(), "-0");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "wahr");
        assert_eq!(Value::Nil.to_string(), "nichts");
    }
}
