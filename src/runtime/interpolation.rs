//! String interpolation
//!
//! String literal contents are re-scanned with [`Scanner::string_contents`]
//! and reassembled token by token. A `${ ... }` span whose contents are a
//! variable sigil followed by a name is replaced with that variable's text;
//! everything else is copied through unchanged.

use crate::lexer::{FileId, Scanner, Token, TokenKind};
use crate::runtime::Environment;

/// Expands every `${$name}` span in `text` against `env`
///
/// Unbound names and unsupported span contents are logged at debug level
/// and contribute nothing to the output.
pub fn interpolate(text: &str, file_id: FileId, env: &Environment) -> String {
    let tokens = Scanner::string_contents(file_id, text).scan_tokens();
    let mut output = String::with_capacity(text.len());
    let mut position = 0;

    while position < tokens.len() {
        if opens_span(&tokens, position) {
            position = substitute(&tokens, position + 2, env, &mut output);
            continue;
        }
        output.push_str(&tokens[position].text);
        position += 1;
    }

    output
}

/// The `${ ... }` spans of `text`, verbatim, in order of appearance
pub fn spans(text: &str, file_id: FileId) -> Vec<String> {
    let tokens = Scanner::string_contents(file_id, text).scan_tokens();
    let mut found = Vec::new();
    let mut position = 0;

    while position < tokens.len() {
        if opens_span(&tokens, position) {
            let end = span_end(&tokens, position + 2);
            let span: String = tokens[position..end].iter().map(|t| t.text.as_str()).collect();
            found.push(span);
            position = end;
        } else {
            position += 1;
        }
    }

    found
}

fn opens_span(tokens: &[Token], position: usize) -> bool {
    tokens[position].kind == TokenKind::DeclVar
        && tokens[position].text == "$"
        && tokens
            .get(position + 1)
            .map_or(false, |t| t.kind == TokenKind::OpenBrace)
}

/// Index one past the brace closing a span whose contents start at `position`
fn span_end(tokens: &[Token], mut position: usize) -> usize {
    let mut depth = 1;
    while position < tokens.len() {
        match tokens[position].kind {
            TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseBrace => {
                depth -= 1;
                if depth == 0 {
                    return position + 1;
                }
            }
            _ => {}
        }
        position += 1;
    }
    position
}

/// Writes the substitution for one span and returns the index after it
fn substitute(tokens: &[Token], start: usize, env: &Environment, output: &mut String) -> usize {
    let end = span_end(tokens, start);
    let inner_end = if end > start && tokens[end - 1].kind == TokenKind::CloseBrace {
        end - 1
    } else {
        end
    };

    let mut position = start;
    while position < inner_end {
        let token = &tokens[position];

        if token.kind == TokenKind::DeclVar && position + 1 < inner_end {
            let name = &tokens[position + 1];
            match env.get(&name.text) {
                Some(value) => output.push_str(&value.to_string_value()),
                None => tracing::debug!("Variable undefined: {}", name.info()),
            }
            position += 2;
            continue;
        }

        if !token.text.trim().is_empty() {
            tracing::debug!("Unhandled token in interpolation: {}", token.info());
        }
        position += 1;
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Value;

    #[test]
    fn test_plain_text_is_unchanged() {
        let env = Environment::new();
        let text = "hello,  world (x + 1) # not a comment\n\tnext";
        assert_eq!(interpolate(text, 0, &env), text);
    }

    #[test]
    fn test_substitutes_bound_variables() {
        let mut env = Environment::new();
        env.define("x", Value::Int(5));
        env.define("ratio", Value::Double(0.25));
        env.define("ok", Value::Bool(true));
        env.define("who", Value::String("Ada".into()));

        assert_eq!(interpolate("${$x}", 0, &env), "5");
        assert_eq!(
            interpolate("${$who}: ${$ratio} ${ $ok }!", 0, &env),
            "Ada: 0.25 true!"
        );
    }

    #[test]
    fn test_unbound_variable_contributes_nothing() {
        let env = Environment::new();
        assert_eq!(interpolate("[${$missing}]", 0, &env), "[]");
        assert_eq!(interpolate("[${1 + 2}]", 0, &env), "[]");
    }

    #[test]
    fn test_dollar_without_brace_is_literal() {
        let env = Environment::new();
        assert_eq!(interpolate("cost: $5", 0, &env), "cost: $5");
    }

    #[test]
    fn test_quotes_and_comment_markers_are_plain_text() {
        let mut env = Environment::new();
        env.define("x", Value::Int(5));

        assert_eq!(interpolate("it's ${$x}", 0, &env), "it's 5");
        assert_eq!(interpolate("item #${$x}", 0, &env), "item #5");
        assert_eq!(interpolate("say \"hi ${$x}", 0, &env), "say \"hi 5");
        assert_eq!(interpolate("/# ${$x} #/", 0, &env), "/# 5 #/");
        assert_eq!(spans("it's ${$x}", 0), vec!["${$x}".to_string()]);
    }

    #[test]
    fn test_spans_are_reported_verbatim() {
        assert_eq!(
            spans("a ${$x} b ${ {$y} }", 0),
            vec!["${$x}".to_string(), "${ {$y} }".to_string()]
        );
        assert!(spans("no spans here", 0).is_empty());
    }
}
