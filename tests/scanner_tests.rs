/// Integration tests for the Astral scanner
/// Covers: literal values, classification precedence, positions, text fidelity
use astral::lexer::builtin_names::{
    CoreBuiltin, FileIoBuiltin, ListBuiltin, SysBuiltin, WebClientBuiltin,
};
use astral::lexer::{Builtin, Keyword, Name, Operator, Scanner, Token, TokenKind, TypeName};
use astral::Value;

fn scan(source: &str) -> Vec<Token> {
    Scanner::new(0, source).scan_tokens()
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_numeric_literals() {
    let tokens = scan("42 3.25 0xFF 0b101 0o17 0x");
    let values: Vec<_> = tokens.iter().map(|t| t.value.clone().unwrap()).collect();
    assert_eq!(
        values,
        vec![
            Value::Int(42),
            Value::Double(3.25),
            Value::Int(255),
            Value::Int(5),
            Value::Int(15),
            Value::Int(0),
        ]
    );
    assert_eq!(tokens[2].text, "0xFF");
}

#[test]
fn test_integer_overflow_saturates() {
    let tokens = scan("99999999999999999999");
    assert_eq!(tokens[0].value, Some(Value::Int(i64::MAX)));
}

#[test]
fn test_range_after_integer() {
    let tokens = scan("1..10");
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Literal, TokenKind::Range, TokenKind::Literal]
    );
    assert_eq!(tokens[0].value, Some(Value::Int(1)));
    assert_eq!(tokens[2].value, Some(Value::Int(10)));
}

#[test]
fn test_statement_tokens() {
    let tokens = scan("@x = 5 + 3 * 2");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::DeclVar,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Literal,
            TokenKind::Operator,
            TokenKind::Literal,
            TokenKind::Operator,
            TokenKind::Literal,
        ]
    );
    assert_eq!(tokens[2].operator(), Some(Operator::Assign));
    assert_eq!(tokens[6].operator(), Some(Operator::Multiply));
}

#[test]
fn test_compound_and_shift_operators() {
    let tokens = scan("+= **= <<= >>= && || != %=");
    let ops: Vec<_> = tokens.iter().map(|t| t.operator()).collect();
    assert_eq!(
        ops,
        vec![
            Some(Operator::AddAssign),
            Some(Operator::ExponentAssign),
            Some(Operator::BitwiseLeftShiftAssign),
            Some(Operator::BitwiseRightShiftAssign),
            Some(Operator::And),
            Some(Operator::Or),
            Some(Operator::NotEqual),
            Some(Operator::ModuloAssign),
        ]
    );
}

#[test]
fn test_classification_precedence() {
    let tokens = scan("if with true String and __readfile__ map __exec__ __http_get__ size plain");

    assert_eq!(tokens[0].kind, TokenKind::Conditional);
    assert_eq!(tokens[0].name, Name::Keyword(Keyword::If));
    assert_eq!(tokens[1].kind, TokenKind::Lambda);
    assert_eq!(tokens[2].value, Some(Value::Bool(true)));
    assert_eq!(tokens[3].name, Name::Type(TypeName::String));
    assert_eq!(tokens[4].operator(), Some(Operator::And));
    assert_eq!(
        tokens[5].builtin(),
        Some(Builtin::FileIo(FileIoBuiltin::ReadFile))
    );
    assert_eq!(tokens[6].builtin(), Some(Builtin::List(ListBuiltin::Map)));
    assert_eq!(tokens[7].builtin(), Some(Builtin::Sys(SysBuiltin::Exec)));
    assert_eq!(
        tokens[8].builtin(),
        Some(Builtin::WebClient(WebClientBuiltin::Get))
    );
    // core builtins are only recognized after a dot
    assert_eq!(tokens[9].name, Name::Default);
    assert_eq!(tokens[10].name, Name::Default);
}

#[test]
fn test_called_builtin_after_dot() {
    let tokens = scan("@items.size");
    assert_eq!(tokens[2].kind, TokenKind::Dot);
    assert_eq!(tokens[3].builtin(), Some(Builtin::Core(CoreBuiltin::Size)));
}

#[test]
fn test_strings_and_regex() {
    let tokens = scan(r#""a\tb ${$x}" 'x\/y'"#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, Some(Value::String("a\tb ${$x}".into())));
    assert!(tokens[1].is_regex());
    assert_eq!(tokens[1].value, Some(Value::String("x/y".into())));
}

#[test]
fn test_comments() {
    let tokens = scan("a # line\n/# block\ncomment #/ b");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Identifier,
            TokenKind::Comment,
            TokenKind::Comment,
            TokenKind::Identifier,
        ]
    );
    assert_eq!(tokens[1].text, "# line");
    assert_eq!(tokens[2].text, "/# block\ncomment #/");
}

#[test]
fn test_positions() {
    let tokens = scan("@x = 1\n  println @x");
    let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
    assert_eq!(
        positions,
        vec![(1, 1), (1, 2), (1, 4), (1, 6), (2, 3), (2, 11), (2, 12)]
    );
}

#[test]
fn test_preserving_whitespace_round_trip() {
    let source = "@x = \"hi ${$y}\" # done\n\tif x..y end /# open";
    let tokens = Scanner::preserving_whitespace(0, source).scan_tokens();
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt, source);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Newline));
}

#[test]
fn test_tokens_serialize() {
    let tokens = scan("@n = 0b11 .. \"s\" 'r' x.upcase");
    let json = serde_json::to_string(&tokens).unwrap();
    let restored: Vec<Token> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, tokens);
}
