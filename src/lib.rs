//! # Astral - scanner and evaluation core
//!
//! Astral is a small interpreted scripting language. This crate is its front
//! end and evaluation core: it turns source text into classified tokens and
//! then executes them directly, without building a syntax tree.
//!
//! ## Features
//!
//! - **Scanner** - keywords, type names, operators, several hundred builtin
//!   names, decimal/hex/binary/octal literals, strings with escapes and
//!   `${...}` interpolation spans, regex literals, line and block comments
//! - **Expression evaluation** - integers, doubles, booleans and strings,
//!   strictly left-to-right arithmetic, short-circuit boolean logic
//! - **Conditionals** - eager `if`/`elseif`/`else`/`end` that splices the
//!   selected body back into the token stream
//! - **Builtin dispatch** - builtin names are recognized by the scanner and
//!   routed to host-supplied handlers
//!
//! ## Quick Start
//!
//! ```rust
//! use astral::{Interpreter, Value};
//!
//! # fn main() -> astral::Result<()> {
//! let mut interpreter = Interpreter::with_output(Vec::new());
//! interpreter.run("main", r#"
//!     @x = 5 + 3 * 2
//!     if @x > 10
//!         println "big: ${$x}"
//!     end
//! "#)?;
//!
//! // No operator precedence: (5 + 3) * 2
//! assert_eq!(interpreter.env.get("x"), Some(&Value::Int(16)));
//! assert_eq!(String::from_utf8(interpreter.into_output()).unwrap(), "big: 16\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → TokenStream → Interpreter
//!                                        ↑             │
//!                                        └─ splice ────┘ (conditionals)
//! ```
//!
//! - [`Scanner`] - tokenizes source text; never fails
//! - [`TokenStream`] - token buffer with a cursor and mid-stream insertion
//! - [`ExpressionEvaluator`] - evaluates one expression off the stream
//! - [`ConditionalEngine`] - collects a conditional and splices its body
//! - [`Interpreter`] - statement loop, variable bindings and `print`
//! - [`BuiltinRegistry`] - routes builtin calls to [`BuiltinHandler`]s
//!
//! ### Scanning
//!
//! ```rust
//! use astral::{Scanner, TokenKind, Value};
//!
//! let tokens = Scanner::new(0, "@mask = 0xFF").scan_tokens();
//! assert_eq!(tokens[0].kind, TokenKind::DeclVar);
//! assert_eq!(tokens[3].text, "0xFF");
//! assert_eq!(tokens[3].value, Some(Value::Int(255)));
//! ```
//!
//! ### Builtins
//!
//! The core only knows builtin *names*. Hosts supply behavior per domain:
//!
//! ```rust
//! use astral::builtins::{expect_arity, BuiltinHandler, BuiltinRegistry};
//! use astral::lexer::{Builtin, BuiltinDomain, Token};
//! use astral::{Interpreter, Result, Value};
//!
//! struct Strings;
//!
//! impl BuiltinHandler for Strings {
//!     fn domain(&self) -> BuiltinDomain {
//!         BuiltinDomain::Core
//!     }
//!
//!     fn execute(&self, token: &Token, builtin: Builtin, args: &[Value]) -> Result<Value> {
//!         expect_arity(token, builtin, args, 1)?;
//!         match &args[0] {
//!             Value::String(s) => Ok(Value::String(s.to_uppercase())),
//!             other => Ok(other.clone()),
//!         }
//!     }
//! }
//!
//! let mut registry = BuiltinRegistry::new();
//! registry.register(Strings);
//!
//! let mut interpreter = Interpreter::with_output(Vec::new()).with_builtins(registry);
//! interpreter.run("main", "@name = \"ada\".upcase()\nprintln @name").unwrap();
//! assert_eq!(String::from_utf8(interpreter.into_output()).unwrap(), "ADA\n");
//! ```
//!
//! ## Error Handling
//!
//! Every language error carries the token it was detected at. The
//! interpreter renders it against the registered source:
//!
//! ```rust
//! use astral::Interpreter;
//!
//! let mut interpreter = Interpreter::with_output(Vec::new());
//! let err = interpreter.run("main", "@total += 1").unwrap_err();
//!
//! let report = interpreter.render_error(&err);
//! assert!(report.starts_with("Exception: VariableUndefinedError"));
//! assert!(report.contains("Location:  Line 1, Column 2."));
//! ```
//!
//! Recoverable anomalies (unhandled tokens, unknown operators, undefined
//! names inside interpolation) are reported through `tracing` at debug
//! level and never abort evaluation.
//!
//! ## License
//!
//! Licensed under the [MIT License](https://opensource.org/licenses/MIT).

// Allow specific clippy warnings that are intentional design choices
#![allow(clippy::should_implement_trait)] // TokenStream::next is a cursor move, not an Iterator

/// Version of the Astral core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builtins;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod runtime;

// Re-export main types
pub use builtins::{BuiltinHandler, BuiltinRegistry};
pub use diagnostics::SourceRegistry;
pub use error::{Error, Result};
pub use lexer::{Scanner, Token, TokenKind, TokenStream};
pub use runtime::{
    BooleanExpressionBuilder, ConditionalEngine, Environment, ExpressionEvaluator, Interpreter,
    Value,
};
