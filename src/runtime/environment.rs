use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lexer::Token;
use crate::runtime::Value;

/// Variable bindings for one execution context
///
/// Astral has a single flat scope; conditional bodies are spliced into the
/// main stream and run against the same bindings.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    /// Creates an empty environment
    pub fn new() -> Self {
        Environment {
            variables: HashMap::new(),
        }
    }

    /// Binds `name`, replacing any previous value
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Current value of `name`, if bound
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Current value of `name`, failing at `token` when unbound
    pub fn lookup(&self, token: &Token, name: &str) -> Result<Value> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::undefined(token, name))
    }

    /// Updates an existing binding
    pub fn set(&mut self, token: &Token, name: &str, value: Value) -> Result<()> {
        match self.variables.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::undefined(token, name)),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Name, TokenKind};

    fn token(text: &str) -> Token {
        Token::new(TokenKind::Identifier, Name::Default, 0, text.to_string(), 1, 2)
    }

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define("x", Value::Int(42));
        assert_eq!(env.get("x"), Some(&Value::Int(42)));
        assert!(env.exists("x"));
        assert!(!env.exists("y"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_redefine_replaces() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1));
        env.define("x", Value::String("one".into()));
        assert_eq!(env.get("x"), Some(&Value::String("one".into())));
    }

    #[test]
    fn test_set_requires_binding() {
        let mut env = Environment::new();
        let err = env.set(&token("total"), "total", Value::Int(1)).unwrap_err();
        assert!(matches!(err, Error::VariableUndefined { ref name, .. } if name == "total"));

        env.define("total", Value::Int(0));
        env.set(&token("total"), "total", Value::Int(5)).unwrap();
        assert_eq!(env.lookup(&token("total"), "total").unwrap(), Value::Int(5));
    }
}
