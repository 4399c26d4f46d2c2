//! Chained variable scopes.
//!
//! Each scope is an independently heap‑allocated `Rc<RefCell<Environment>>`:
//! blocks, calls and closures share parents by reference, and a scope lives
//! as long as anything (a running frame or a captured closure) still points
//! at it.

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// A root (global) scope.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Shorthand for a shared child scope of `enclosing`.
    pub fn child_of(enclosing: &Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
            enclosing,
        ))))
    }

    /// Insert or overwrite `name` in this scope.  Redefinition is allowed.
    pub fn define(&mut self, name: &str, value: Value) {
        trace!("define '{}' = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up here, then in each enclosing scope.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(RuntimeError::UndefinedVariable {
                token: name.clone(),
            })
        }
    }

    /// Overwrite the nearest existing binding of `name`.  Never declares.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(RuntimeError::UndefinedVariable {
                token: name.clone(),
            })
        }
    }

    /// Walk `distance` parent links from `env`.
    pub fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut environment: Rc<RefCell<Environment>> = Rc::clone(env);

        for _ in 0..distance {
            let parent = environment.borrow().enclosing.clone()?;
            environment = parent;
        }

        Some(environment)
    }

    /// Read `name` directly from the frame `distance` hops up, without
    /// searching further.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Option<Value> {
        let frame = Self::ancestor(env, distance)?;
        let value = frame.borrow().values.get(name).cloned();
        value
    }

    /// Write `name` into the frame `distance` hops up.  Returns `false` if
    /// the chain is shorter than `distance`.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
    ) -> bool {
        match Self::ancestor(env, distance) {
            Some(frame) => {
                frame.borrow_mut().values.insert(name.to_string(), value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str, line: usize) -> Token {
        Token::new(TokenType::IDENTIFIER, name, line)
    }

    #[test]
    fn get_walks_enclosing_scopes() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::child_of(&global);

        assert_eq!(inner.borrow().get(&ident("a", 1)).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn missing_name_reports_its_token() {
        let env = Environment::new();

        let err = env.get(&ident("fehlt", 7)).unwrap_err();

        assert!(matches!(err, RuntimeError::UndefinedVariable { .. }));
        assert_eq!(err.line(), 7);
    }

    #[test]
    fn assign_updates_nearest_binding_only() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::child_of(&global);
        inner.borrow_mut().define("a", Value::Number(2.0));

        inner
            .borrow_mut()
            .assign(&ident("a", 1), Value::Number(3.0))
            .unwrap();

        assert_eq!(Environment::get_at(&inner, 0, "a"), Some(Value::Number(3.0)));
        assert_eq!(Environment::get_at(&inner, 1, "a"), Some(Value::Number(1.0)));
    }

    #[test]
    fn assign_never_declares() {
        let global = Rc::new(RefCell::new(Environment::new()));
        let inner = Environment::child_of(&global);

        let result = inner.borrow_mut().assign(&ident("neu", 2), Value::Nil);

        assert!(result.is_err());
        assert_eq!(Environment::get_at(&global, 0, "neu"), None);
    }

    #[test]
    fn distance_accessors_skip_shadowing_frames() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("x", Value::String("außen".into()));
        let middle = Environment::child_of(&global);
        middle.borrow_mut().define("x", Value::String("mitte".into()));
        let inner = Environment::child_of(&middle);

        assert_eq!(
            Environment::get_at(&inner, 2, "x"),
            Some(Value::String("außen".into()))
        );

        assert!(Environment::assign_at(&inner, 2, "x", Value::Bool(true)));
        assert_eq!(Environment::get_at(&global, 0, "x"), Some(Value::Bool(true)));
        assert_eq!(
            Environment::get_at(&middle, 0, "x"),
            Some(Value::String("mitte".into()))
        );
        assert!(Environment::ancestor(&inner, 3).is_none());
    }
}
