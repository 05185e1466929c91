//! Runtime execution for Astral programs
//!
//! Evaluation walks the token stream directly: expressions are evaluated as
//! they are read and conditionals splice the selected body back into the
//! stream.

pub mod boolexpr;
pub mod conditional;
mod environment;
pub mod expression;
pub mod interpolation;
mod interpreter;
pub mod value;

pub use boolexpr::{BoolNode, BooleanExpressionBuilder};
pub use conditional::{Branch, Conditional, ConditionalEngine};
pub use environment::Environment;
pub use expression::ExpressionEvaluator;
pub use interpolation::interpolate;
pub use interpreter::Interpreter;
pub use value::Value;
