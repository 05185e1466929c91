//! Builtin dispatch for Astral
//!
//! The core recognizes builtin names but never implements them. Each builtin
//! domain is served by one [`BuiltinHandler`] registered with the
//! [`BuiltinRegistry`]; the evaluator routes calls through the registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::lexer::{Builtin, BuiltinDomain, Token};
use crate::runtime::Value;

/// Handler for one builtin domain
pub trait BuiltinHandler: Send + Sync {
    /// Domain this handler serves
    fn domain(&self) -> BuiltinDomain;

    /// Executes `builtin` with already-evaluated arguments
    ///
    /// `token` is the call site, for error positions. Method-style calls
    /// (`receiver.size()`) pass the receiver as the first argument.
    fn execute(&self, token: &Token, builtin: Builtin, args: &[Value]) -> Result<Value>;
}

/// Checks that a builtin received exactly `expected` arguments
pub fn expect_arity(token: &Token, builtin: Builtin, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::BuiltinUnexpectedArgument {
            token: Box::new(token.clone()),
            name: builtin.as_str().to_string(),
            expected,
            got: args.len(),
        })
    }
}

/// Builtin handler registry, one handler per domain
#[derive(Clone, Default)]
pub struct BuiltinRegistry {
    handlers: HashMap<BuiltinDomain, Arc<dyn BuiltinHandler>>,
}

impl BuiltinRegistry {
    /// Creates an empty registry; every call fails with `UnknownBuiltin`
    pub fn new() -> Self {
        BuiltinRegistry {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler, replacing any handler for the same domain
    pub fn register<H: BuiltinHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.domain(), Arc::new(handler));
    }

    pub fn has(&self, domain: BuiltinDomain) -> bool {
        self.handlers.contains_key(&domain)
    }

    /// Routes a call to the handler for the builtin's domain
    pub fn dispatch(&self, token: &Token, builtin: Builtin, args: &[Value]) -> Result<Value> {
        match self.handlers.get(&builtin.domain()) {
            Some(handler) => handler.execute(token, builtin, args),
            None => Err(Error::UnknownBuiltin {
                token: Box::new(token.clone()),
                name: builtin.as_str().to_string(),
            }),
        }
    }

    pub fn count(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut domains: Vec<_> = self.handlers.keys().collect();
        domains.sort_by_key(|domain| format!("{:?}", domain));
        f.debug_struct("BuiltinRegistry")
            .field("domains", &domains)
            .finish()
    }
}
