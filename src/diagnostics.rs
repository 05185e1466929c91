//! Source bookkeeping and error rendering
//!
//! Tokens only carry a file id, line and column. The [`SourceRegistry`]
//! keeps the text of every scanned file so an error can be shown with the
//! offending line and a caret under its column.

use crate::error::Error;
use crate::lexer::FileId;

/// A registered source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    lines: Vec<String>,
}

impl SourceFile {
    /// Line `number` (1-indexed), without its terminator
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }
}

/// Maps file ids to source text
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    files: Vec<SourceFile>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under `name` and returns its id
    pub fn register(&mut self, name: impl Into<String>, source: &str) -> FileId {
        self.files.push(SourceFile {
            name: name.into(),
            lines: source.lines().map(str::to_string).collect(),
        });
        self.files.len() - 1
    }

    /// Swaps the text registered under `id`, keeping its name
    pub fn replace(&mut self, id: FileId, source: &str) -> bool {
        match self.files.get_mut(id) {
            Some(file) => {
                file.lines = source.lines().map(str::to_string).collect();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Renders an error report: the error kind, its message, the location, and
/// the offending source line in a fenced block with a caret under the
/// token's column.
///
/// The code block is omitted when the error has no token or its source
/// line is not registered.
pub fn render(error: &Error, sources: &SourceRegistry) -> String {
    let mut report = format!("Exception: {}\n", error.kind_name());

    let message = error.message();
    if !message.is_empty() {
        report.push_str(&format!("Message:   {}\n", message));
    }

    let token = match error.token() {
        Some(token) => token,
        None => return report,
    };

    report.push_str(&format!(
        "Location:  Line {}, Column {}.\n",
        token.line, token.column
    ));

    let line = sources
        .get(token.file_id)
        .and_then(|file| file.line(token.line));
    if let Some(line) = line {
        let caret = format!("{}^", " ".repeat(token.column.saturating_sub(1)));
        report.push_str(&format!("Code:\n```\n{}\n{}\n```\n", line, caret));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Name, Token, TokenKind};

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut sources = SourceRegistry::new();
        assert_eq!(sources.register("a.astral", "one\ntwo"), 0);
        assert_eq!(sources.register("b.astral", ""), 1);
        assert_eq!(sources.get(0).unwrap().line(2), Some("two"));
        assert_eq!(sources.get(0).unwrap().line(0), None);
        assert_eq!(sources.get(1).unwrap().name, "b.astral");
    }

    #[test]
    fn test_replace_keeps_id_and_name() {
        let mut sources = SourceRegistry::new();
        let id = sources.register("<expression>", "1 + 1");
        assert!(sources.replace(id, "2 * 3"));
        assert_eq!(sources.len(), 1);
        assert_eq!(sources.get(id).unwrap().name, "<expression>");
        assert_eq!(sources.get(id).unwrap().line(1), Some("2 * 3"));
        assert!(!sources.replace(7, "x"));
    }

    #[test]
    fn test_render_points_at_column() {
        let mut sources = SourceRegistry::new();
        let id = sources.register("main", "@x = 1\nif 1 print 2 end");
        let token = Token::new(TokenKind::Conditional, Name::Default, id, "if".into(), 2, 4);
        let error = Error::conversion(&token, "guard must be a Boolean");

        let report = render(&error, &sources);
        assert_eq!(
            report,
            "Exception: ConversionError\n\
             Message:   guard must be a Boolean\n\
             Location:  Line 2, Column 4.\n\
             Code:\n\
             ```\n\
             if 1 print 2 end\n   ^\n\
             ```\n"
        );
    }

    #[test]
    fn test_render_without_token() {
        let sources = SourceRegistry::new();
        let error = Error::Io {
            message: "broken pipe".into(),
        };
        let report = render(&error, &sources);
        assert!(report.starts_with("Exception: IoError\n"));
        assert!(!report.contains("Location"));
    }
}
