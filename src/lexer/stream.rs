use super::token::{FileId, Token};

/// Indexable token sequence with a cursor
///
/// The conditional engine splices selected branch bodies back in at the
/// cursor, so the stream grows while it is being consumed. Reading past the
/// last token yields an end-of-file marker instead of panicking.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
    eof: Token,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) => {
                let (line, column) = end_of(last);
                Token::eof(last.file_id, line, column)
            }
            None => Token::eof(FileId::default(), 1, 1),
        };

        TokenStream {
            tokens,
            position: 0,
            eof,
        }
    }

    /// Token under the cursor
    pub fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    /// Token after the cursor
    pub fn peek(&self) -> &Token {
        self.tokens.get(self.position + 1).unwrap_or(&self.eof)
    }

    /// Moves the cursor forward one token
    pub fn next(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Inserts `body` at the cursor so it is consumed next
    pub fn splice(&mut self, body: Vec<Token>) {
        let at = self.position.min(self.tokens.len());
        self.tokens.splice(at..at, body);
    }

    /// Tokens not yet consumed
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.position.min(self.tokens.len())..]
    }
}

/// Line and column just past the last character of `token`
fn end_of(token: &Token) -> (usize, usize) {
    match token.text.rsplit_once('\n') {
        Some((before, after)) => (
            token.line + before.matches('\n').count() + 1,
            after.chars().count() + 1,
        ),
        None => (token.line, token.column + token.text.chars().count()),
    }
}
