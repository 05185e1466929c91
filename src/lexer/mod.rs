//! Lexical analysis for Astral
//!
//! Converts source text into classified tokens and provides the mutable
//! token stream the evaluator walks.

pub mod builtin_names;
pub mod names;
mod scanner;
mod stream;
mod token;

pub use builtin_names::{Builtin, BuiltinDomain};
pub use names::{Keyword, Operator, TypeName};
pub use scanner::Scanner;
pub use stream::TokenStream;
pub use token::{FileId, Name, Token, TokenKind};
