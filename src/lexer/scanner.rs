use super::builtin_names::{builtin_method, called_builtin};
use super::names::{
    is_arithmetic_operator_char, is_bitwise_operator_char, is_boolean_operator_char,
    is_large_operator, word_operator, Keyword, Operator, TypeName,
};
use super::token::{FileId, Name, Token, TokenKind};
use crate::runtime::Value;

/// Character-at-a-time scanner for Astral source text
///
/// Scanning never fails: malformed literals produce best-effort values and
/// unterminated strings or comments run to the end of the input.
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Registered id of the file being scanned
    file_id: FileId,
    /// Whether whitespace (newlines included) is dropped between tokens
    skip_whitespace: bool,
    /// Whether quotes and comment markers open strings, regexes and comments
    nested_literals: bool,
    /// Start position of current token
    start: usize,
    start_line: usize,
    start_column: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl Scanner {
    /// Creates a scanner that skips whitespace between tokens
    pub fn new(file_id: FileId, source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            file_id,
            skip_whitespace: true,
            nested_literals: true,
            start: 0,
            start_line: 1,
            start_column: 1,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Creates a scanner that emits whitespace as tokens, so token texts
    /// concatenate back to the source
    pub fn preserving_whitespace(file_id: FileId, source: &str) -> Self {
        Scanner {
            skip_whitespace: false,
            ..Scanner::new(file_id, source)
        }
    }

    /// Creates a scanner for the decoded contents of a string literal
    ///
    /// Whitespace is preserved and `"`, `'`, `#` and `/#` are ordinary
    /// characters, so only sigils, braces and names give the text structure.
    pub fn string_contents(file_id: FileId, source: &str) -> Self {
        Scanner {
            skip_whitespace: false,
            nested_literals: false,
            ..Scanner::new(file_id, source)
        }
    }

    /// Scans the whole source. The end-of-file marker is not included.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        loop {
            if self.skip_whitespace {
                while self.peek().is_whitespace() {
                    self.advance();
                }
            }

            if self.is_at_end() {
                break;
            }

            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token();
        }

        std::mem::take(&mut self.tokens)
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),

            '0' if self.peek() == 'x' => self.scan_radix_literal(16),
            '0' if self.peek() == 'b' => self.scan_radix_literal(2),
            '0' if self.peek() == 'o' => self.scan_radix_literal(8),
            c if c.is_ascii_digit() => self.scan_number(),

            '"' if self.nested_literals => self.scan_string(),
            '\'' if self.nested_literals => self.scan_regex(),

            '#' if self.nested_literals => self.scan_line_comment(),
            '/' if self.nested_literals && self.peek() == '#' => self.scan_block_comment(),

            '@' | '$' => self.add_token(TokenKind::DeclVar, Name::Keyword(Keyword::DeclVar)),
            '\n' => self.add_token(TokenKind::Newline, Name::Default),

            '(' => self.add_token(TokenKind::OpenParen, Name::Default),
            ')' => self.add_token(TokenKind::CloseParen, Name::Default),
            '[' => self.add_token(TokenKind::OpenBracket, Name::Default),
            ']' => self.add_token(TokenKind::CloseBracket, Name::Default),
            '{' => self.add_token(TokenKind::OpenBrace, Name::Default),
            '}' => self.add_token(TokenKind::CloseBrace, Name::Default),
            ',' => self.add_token(TokenKind::Comma, Name::Default),
            '?' => self.add_token(TokenKind::Question, Name::Default),

            '.' => {
                if self.match_char('.') {
                    self.add_token(TokenKind::Range, Name::Default);
                } else {
                    self.add_token(TokenKind::Dot, Name::Default);
                }
            }

            ':' => {
                if self.match_char(':') {
                    self.add_token(TokenKind::Qualifier, Name::Default);
                } else {
                    self.add_token(TokenKind::Colon, Name::Default);
                }
            }

            // Operators, plus any character nothing else claims
            c => self.scan_operator(c),
        }
    }

    fn scan_identifier(&mut self) {
        let is_call = self.start > 0 && self.source[self.start - 1] == '.';

        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = self.lexeme();

        if let Some(keyword) = Keyword::lookup(&text) {
            self.add_keyword(keyword);
        } else if let Some(op) = word_operator(&text) {
            self.add_token(TokenKind::Operator, Name::Operator(op));
        } else if let Some(type_name) = TypeName::lookup(&text) {
            self.add_token(TokenKind::TypeName, Name::Type(type_name));
        } else if let Some(builtin) = builtin_method(&text) {
            self.add_token(TokenKind::Identifier, Name::Builtin(builtin));
        } else if let Some(builtin) = called_builtin(&text).filter(|_| is_call) {
            self.add_token(TokenKind::Identifier, Name::Builtin(builtin));
        } else {
            self.add_token(TokenKind::Identifier, Name::Default);
        }
    }

    fn add_keyword(&mut self, keyword: Keyword) {
        let name = Name::Keyword(keyword);

        if keyword.is_conditional() {
            self.add_token(TokenKind::Conditional, name);
        } else if keyword == Keyword::Lambda {
            self.add_token(TokenKind::Lambda, name);
        } else if keyword.is_boolean() {
            let value = Value::Bool(keyword == Keyword::True);
            self.add_literal(TokenKind::Literal, name, value);
        } else {
            self.add_token(TokenKind::Keyword, name);
        }
    }

    fn scan_number(&mut self) {
        let mut seen_dot = false;

        loop {
            let c = self.peek();
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !seen_dot && self.peek_next() != '.' {
                // A second dot right after the first is the range operator
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = self.lexeme();
        let value = if seen_dot {
            Value::Double(text.parse().unwrap_or(0.0))
        } else {
            Value::Int(parse_integer(&text, 10))
        };

        self.add_literal(TokenKind::Literal, Name::Default, value);
    }

    fn scan_radix_literal(&mut self, radix: u32) {
        self.advance(); // base prefix letter
        let digits_start = self.current;

        while self.peek().is_digit(radix) {
            self.advance();
        }

        let digits: String = self.source[digits_start..self.current].iter().collect();
        let value = Value::Int(parse_integer(&digits, radix));
        self.add_literal(TokenKind::Literal, Name::Default, value);
    }

    fn scan_string(&mut self) {
        let mut value = String::new();

        while !self.is_at_end() {
            let c = self.advance();
            match c {
                '\\' => {
                    if self.is_at_end() {
                        value.push('\\');
                        break;
                    }
                    let escaped = self.advance();
                    value.push(match escaped {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'b' => '\u{8}',
                        'f' => '\u{c}',
                        '\\' => '\\',
                        '"' => '"',
                        other => other,
                    });
                }
                '"' => break,
                '$' if self.peek() == '{' => {
                    self.advance();
                    let span = self.scan_interpolation_span();
                    value.push_str(&span);
                }
                _ => value.push(c),
            }
        }

        self.add_literal(TokenKind::String, Name::Default, Value::String(value));
    }

    /// Captures a `${...}` span verbatim; nested braces keep it open
    fn scan_interpolation_span(&mut self) -> String {
        let mut expression = String::new();
        let mut depth = 1;

        while !self.is_at_end() {
            let c = self.advance();
            if c == '{' {
                depth += 1;
            } else if c == '}' {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            expression.push(c);
        }

        format!("${{{}}}", expression)
    }

    fn scan_regex(&mut self) {
        let mut pattern = String::new();

        while !self.is_at_end() {
            let c = self.advance();
            match c {
                '\\' => {
                    if self.is_at_end() {
                        pattern.push('\\');
                        break;
                    }
                    match self.advance() {
                        'n' => pattern.push('\n'),
                        't' => pattern.push('\t'),
                        'r' => pattern.push('\r'),
                        '\\' => pattern.push('\\'),
                        '/' => pattern.push('/'),
                        other => {
                            pattern.push('\\');
                            pattern.push(other);
                        }
                    }
                }
                '\'' => break,
                _ => pattern.push(c),
            }
        }

        self.add_literal(TokenKind::String, Name::Regex, Value::String(pattern));
    }

    fn scan_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
        self.add_token(TokenKind::Comment, Name::Default);
    }

    fn scan_block_comment(&mut self) {
        self.advance(); // '#'

        while !self.is_at_end() {
            if self.advance() == '#' && self.peek() == '/' {
                self.advance();
                break;
            }
        }
        self.add_token(TokenKind::Comment, Name::Default);
    }

    fn scan_operator(&mut self, c: char) {
        let next = self.peek();

        let arithmetic = next == '='
            && (is_arithmetic_operator_char(c) || is_boolean_operator_char(c));
        let exponent = c == '*' && next == '*';
        let doubled_boolean = next == c && matches!(c, '&' | '|');
        let bitwise = (is_bitwise_operator_char(c) && next == '=')
            || (c == '<' && next == '<')
            || (c == '>' && next == '>');

        if arithmetic || exponent || doubled_boolean || bitwise {
            self.advance();
            if self.peek() == '=' && is_large_operator(&self.lexeme()) {
                self.advance();
            }
        }

        let name = Operator::lookup(&self.lexeme())
            .map(Name::Operator)
            .unwrap_or(Name::Default);
        self.add_token(TokenKind::Operator, name);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn make_token(&self, kind: TokenKind, name: Name) -> Token {
        Token::new(
            kind,
            name,
            self.file_id,
            self.lexeme(),
            self.start_line,
            self.start_column,
        )
    }

    fn add_token(&mut self, kind: TokenKind, name: Name) {
        let token = self.make_token(kind, name);
        self.tokens.push(token);
    }

    fn add_literal(&mut self, kind: TokenKind, name: Name, value: Value) {
        let token = self.make_token(kind, name).with_value(value);
        self.tokens.push(token);
    }
}

/// Best-effort integer conversion: an empty digit run reads as 0 and
/// out-of-range values saturate at `i64::MAX`.
fn parse_integer(digits: &str, radix: u32) -> i64 {
    if digits.is_empty() {
        return 0;
    }
    i64::from_str_radix(digits, radix).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::builtin_names::{Builtin, CoreBuiltin, SysBuiltin};

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(0, source).scan_tokens()
    }

    #[test]
    fn test_simple_assignment() {
        let tokens = scan("@x = 5 + 3");

        for (i, token) in tokens.iter().enumerate() {
            println!("{}: {}", i, token.info());
        }

        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0].kind, TokenKind::DeclVar);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].operator(), Some(Operator::Assign));
        assert_eq!(tokens[3].value, Some(Value::Int(5)));
        assert_eq!(tokens[4].operator(), Some(Operator::Add));
        assert_eq!(tokens[5].value, Some(Value::Int(3)));
    }

    #[test]
    fn test_radix_literals() {
        let tokens = scan("0xFF 0b101 0o17");
        assert_eq!(tokens[0].value, Some(Value::Int(255)));
        assert_eq!(tokens[0].text, "0xFF");
        assert_eq!(tokens[1].value, Some(Value::Int(5)));
        assert_eq!(tokens[2].value, Some(Value::Int(15)));
    }

    #[test]
    fn test_malformed_literals_are_best_effort() {
        let tokens = scan("0x 99999999999999999999");
        assert_eq!(tokens[0].value, Some(Value::Int(0)));
        assert_eq!(tokens[1].value, Some(Value::Int(i64::MAX)));
    }

    #[test]
    fn test_decimal_and_range() {
        let tokens = scan("1.5 1..10");
        assert_eq!(tokens[0].value, Some(Value::Double(1.5)));
        assert_eq!(tokens[1].value, Some(Value::Int(1)));
        assert_eq!(tokens[2].kind, TokenKind::Range);
        assert_eq!(tokens[3].value, Some(Value::Int(10)));
    }

    #[test]
    fn test_second_decimal_point_ends_literal() {
        let tokens = scan("1.2.3");
        assert_eq!(tokens[0].value, Some(Value::Double(1.2)));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].value, Some(Value::Int(3)));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = scan(r#""a\tb\"c\qd""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            tokens[0].value,
            Some(Value::String("a\tb\"cqd".to_string()))
        );
        assert_eq!(tokens[0].text, r#""a\tb\"c\qd""#);
    }

    #[test]
    fn test_interpolation_span_kept_verbatim() {
        let tokens = scan(r#""sum: ${ {a} + $b }!""#);
        assert_eq!(
            tokens[0].value,
            Some(Value::String("sum: ${ {a} + $b }!".to_string()))
        );
    }

    #[test]
    fn test_regex_literal() {
        let tokens = scan(r"'\d+\/x\''");
        assert_eq!(tokens[0].name, Name::Regex);
        assert_eq!(tokens[0].value, Some(Value::String(r"\d+/x\'".to_string())));
    }

    #[test]
    fn test_comments() {
        let tokens = scan("# line\n/# block\n comment #/ 7");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "# line");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text, "/# block\n comment #/");
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_multi_char_operators() {
        let tokens = scan("+= ** **= << <<= >>= && || != == <= >= ! ;");
        let names: Vec<Name> = tokens.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                Name::Operator(Operator::AddAssign),
                Name::Operator(Operator::Exponent),
                Name::Operator(Operator::ExponentAssign),
                Name::Operator(Operator::BitwiseLeftShift),
                Name::Operator(Operator::BitwiseLeftShiftAssign),
                Name::Operator(Operator::BitwiseRightShiftAssign),
                Name::Operator(Operator::And),
                Name::Operator(Operator::Or),
                Name::Operator(Operator::NotEqual),
                Name::Operator(Operator::Equal),
                Name::Operator(Operator::LessThanOrEqual),
                Name::Operator(Operator::GreaterThanOrEqual),
                Name::Operator(Operator::Not),
                Name::Default,
            ]
        );
        assert_eq!(tokens[13].kind, TokenKind::Operator);
    }

    #[test]
    fn test_punctuation() {
        let tokens = scan("a::b c: d.e f..g ?");
        assert_eq!(tokens[1].kind, TokenKind::Qualifier);
        assert_eq!(tokens[4].kind, TokenKind::Colon);
        assert_eq!(tokens[6].kind, TokenKind::Dot);
        assert_eq!(tokens[9].kind, TokenKind::Range);
        assert_eq!(tokens[11].kind, TokenKind::Question);
    }

    #[test]
    fn test_identifier_classification() {
        let tokens = scan("if with true Integer __exec__ upcase x.upcase foo and");
        assert_eq!(tokens[0].kind, TokenKind::Conditional);
        assert_eq!(tokens[1].kind, TokenKind::Lambda);
        assert_eq!(tokens[2].kind, TokenKind::Literal);
        assert_eq!(tokens[2].value, Some(Value::Bool(true)));
        assert_eq!(tokens[3].kind, TokenKind::TypeName);
        assert_eq!(tokens[4].name, Name::Builtin(Builtin::Sys(SysBuiltin::Exec)));
        // Core builtins are only recognized after a dot
        assert_eq!(tokens[5].name, Name::Default);
        assert_eq!(
            tokens[8].name,
            Name::Builtin(Builtin::Core(CoreBuiltin::Upcase))
        );
        assert_eq!(tokens[9].kind, TokenKind::Identifier);
        assert_eq!(tokens[10].name, Name::Operator(Operator::And));
    }

    #[test]
    fn test_whitespace_preserved() {
        let tokens = Scanner::preserving_whitespace(0, "a b\nc").scan_tokens();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", " ", "b", "\n", "c"]);
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[1].name, Name::Default);
        assert_eq!(tokens[3].kind, TokenKind::Newline);
    }

    #[test]
    fn test_string_contents_mode_has_no_nested_literals() {
        let tokens = Scanner::string_contents(0, "it's #1 \"q\" /# ${$x}").scan_tokens();
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, "it's #1 \"q\" /# ${$x}");
        assert!(tokens
            .iter()
            .all(|t| !matches!(t.kind, TokenKind::String | TokenKind::Comment)));
        assert!(tokens.iter().all(|t| !t.is_regex()));
        assert_eq!(tokens[1].text, "'");
        assert_eq!(tokens[4].text, "#");
    }

    #[test]
    fn test_positions() {
        let tokens = scan("@a = 1\n  @b = 2");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[3].line, tokens[3].column), (1, 6));
        assert_eq!((tokens[4].line, tokens[4].column), (2, 3));
    }
}
