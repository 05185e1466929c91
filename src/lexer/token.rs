use serde::{Deserialize, Serialize};

use super::builtin_names::Builtin;
use super::names::{Keyword, Operator, TypeName};
use crate::runtime::Value;

/// Identifier of a registered source file
pub type FileId = usize;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Coarse token class
    pub kind: TokenKind,
    /// Specific name recognized from a closed table, or `Name::Default`
    pub name: Name,
    /// Source file the token was scanned from
    pub file_id: FileId,
    /// Line number where token starts (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
    /// Exact source text consumed for this token
    pub text: String,
    /// Typed value for literal and string tokens
    pub value: Option<Value>,
}

impl Token {
    /// Creates a new token without a literal value
    pub fn new(
        kind: TokenKind,
        name: Name,
        file_id: FileId,
        text: String,
        line: usize,
        column: usize,
    ) -> Self {
        Token {
            kind,
            name,
            file_id,
            line,
            column,
            text,
            value: None,
        }
    }

    /// Attaches a literal value to the token
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Synthetic end-of-file marker positioned at `line`/`column`
    pub fn eof(file_id: FileId, line: usize, column: usize) -> Self {
        Token::new(
            TokenKind::Eof,
            Name::Default,
            file_id,
            String::new(),
            line,
            column,
        )
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Single-quoted regex literal
    pub fn is_regex(&self) -> bool {
        self.name == Name::Regex
    }

    /// The operator this token names, if any
    pub fn operator(&self) -> Option<Operator> {
        match (self.kind, self.name) {
            (TokenKind::Operator, Name::Operator(op)) => Some(op),
            _ => None,
        }
    }

    /// The keyword this token names, if any (conditional keywords included)
    pub fn keyword(&self) -> Option<Keyword> {
        match self.name {
            Name::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Whether this is the conditional keyword `kw`
    pub fn is_conditional(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Conditional && self.name == Name::Keyword(kw)
    }

    /// The builtin this token names, if any
    pub fn builtin(&self) -> Option<Builtin> {
        match self.name {
            Name::Builtin(builtin) => Some(builtin),
            _ => None,
        }
    }

    /// Short description used in diagnostics
    pub fn info(&self) -> String {
        format!(
            "{:?}({:?}) `{}` at {}:{}",
            self.kind,
            self.name,
            self.text.escape_debug(),
            self.line,
            self.column
        )
    }
}

/// Coarse token classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Operator,
    /// Numeric or boolean literal
    Literal,
    /// Double-quoted string or single-quoted regex
    String,
    Comment,
    Newline,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Colon,
    /// `::`
    Qualifier,
    Dot,
    /// `..`
    Range,
    /// `if`, `elseif`, `else`, `end`
    Conditional,
    /// Lambda introducer (`with`)
    Lambda,
    TypeName,
    Question,
    /// Variable sigil (`@` or `$`)
    DeclVar,
    Eof,
}

/// Fine-grained token subkind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Name {
    /// Text not found in any closed table
    Default,
    Keyword(Keyword),
    Operator(Operator),
    Type(TypeName),
    Builtin(Builtin),
    /// Single-quoted regex literal
    Regex,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
