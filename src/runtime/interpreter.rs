use std::io::{self, Write};

use crate::builtins::BuiltinRegistry;
use crate::diagnostics::{self, SourceRegistry};
use crate::error::{Error, Result};
use crate::lexer::{FileId, Keyword, Scanner, Token, TokenKind, TokenStream};
use crate::runtime::conditional::ConditionalEngine;
use crate::runtime::expression::ExpressionEvaluator;
use crate::runtime::value::apply_arithmetic;
use crate::runtime::{Environment, Value};

/// Top-level statement loop for Astral programs
///
/// Statements are recognized by their first token:
/// - `@name = expr` and the compound forms `+= -= *= /= **= %=`
/// - `print expr` / `println expr`
/// - `if guard ... elseif guard ... else ... end`
/// - `builtin(args)` or `receiver.builtin(args)` calls, result discarded
///
/// Comments and newlines are skipped; any other token is logged at debug
/// level and skipped. Execution stops at the first error.
pub struct Interpreter<W: Write = io::Stdout> {
    /// Variable bindings, kept across runs
    pub env: Environment,
    builtins: BuiltinRegistry,
    sources: SourceRegistry,
    /// Slot reused by every `evaluate` call
    expression_file: Option<FileId>,
    output: W,
}

impl Interpreter<io::Stdout> {
    /// Creates an interpreter printing to stdout
    pub fn new() -> Self {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter printing to `output`
    pub fn with_output(output: W) -> Self {
        Interpreter {
            env: Environment::new(),
            builtins: BuiltinRegistry::new(),
            sources: SourceRegistry::new(),
            expression_file: None,
            output,
        }
    }

    /// Installs the builtin handlers calls are routed to
    pub fn with_builtins(mut self, builtins: BuiltinRegistry) -> Self {
        self.builtins = builtins;
        self
    }

    /// Registers, scans and runs `source`
    pub fn run(&mut self, name: &str, source: &str) -> Result<()> {
        let file_id = self.sources.register(name, source);
        let tokens = Scanner::new(file_id, source).scan_tokens();
        self.execute(tokens)
    }

    /// Evaluates a single expression against the current bindings
    pub fn evaluate(&mut self, source: &str) -> Result<Value> {
        let file_id = match self.expression_file {
            Some(id) => {
                self.sources.replace(id, source);
                id
            }
            None => {
                let id = self.sources.register("<expression>", source);
                self.expression_file = Some(id);
                id
            }
        };
        let mut stream = TokenStream::new(Scanner::new(file_id, source).scan_tokens());
        ExpressionEvaluator::new(&mut stream, &self.env, &self.builtins).evaluate_expression()
    }

    /// Runs already-scanned tokens
    pub fn execute(&mut self, tokens: Vec<Token>) -> Result<()> {
        let mut stream = TokenStream::new(tokens);

        while !stream.is_at_end() {
            let token = stream.current().clone();

            match token.kind {
                TokenKind::Comment | TokenKind::Newline => stream.next(),
                TokenKind::DeclVar => self.assignment(&mut stream)?,
                TokenKind::Keyword => match token.keyword() {
                    Some(Keyword::Print) => self.print(&mut stream, false)?,
                    Some(Keyword::PrintLn) => self.print(&mut stream, true)?,
                    _ => self.skip(&mut stream, &token),
                },
                TokenKind::Conditional => {
                    ConditionalEngine::new(&mut stream, &self.env, &self.builtins).run()?
                }
                TokenKind::Identifier | TokenKind::String | TokenKind::Literal
                    if starts_call(&stream) =>
                {
                    ExpressionEvaluator::new(&mut stream, &self.env, &self.builtins)
                        .evaluate_expression()?;
                }
                _ => self.skip(&mut stream, &token),
            }
        }

        Ok(())
    }

    /// Renders `error` against the sources this interpreter has run
    pub fn render_error(&self, error: &Error) -> String {
        diagnostics::render(error, &self.sources)
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn skip(&self, stream: &mut TokenStream, token: &Token) {
        tracing::debug!("Unhandled token {}", token.info());
        stream.next();
    }

    fn assignment(&mut self, stream: &mut TokenStream) -> Result<()> {
        stream.next(); // sigil

        let name = stream.current().clone();
        if name.kind != TokenKind::Identifier {
            tracing::debug!("Expected a variable name after sigil: {}", name.info());
            return Ok(());
        }
        stream.next();

        let op_token = stream.current().clone();
        let op = match op_token.operator() {
            Some(op) if op.is_assignment() => op,
            Some(_) => {
                tracing::debug!("Unknown assignment operator `{}`", op_token.text);
                stream.next();
                return Ok(());
            }
            None => {
                tracing::debug!("Expected an assignment operator: {}", op_token.info());
                return Ok(());
            }
        };
        stream.next();

        let value =
            ExpressionEvaluator::new(stream, &self.env, &self.builtins).evaluate_expression()?;

        match op.compound_base() {
            None => self.env.define(name.text, value),
            Some(base) => {
                let current = self.env.lookup(&name, &name.text)?;
                let updated = apply_arithmetic(base, &op_token, current, value)?;
                self.env.set(&name, &name.text, updated)?;
            }
        }

        Ok(())
    }

    fn print(&mut self, stream: &mut TokenStream, newline: bool) -> Result<()> {
        stream.next(); // print / println

        if stream.current().kind == TokenKind::DeclVar
            && stream.peek().kind == TokenKind::Identifier
        {
            let name = stream.peek();
            if !self.env.exists(&name.text) {
                return Err(Error::undefined(name, name.text.as_str()));
            }
        }

        let value =
            ExpressionEvaluator::new(stream, &self.env, &self.builtins).evaluate_expression()?;

        write!(self.output, "{}", value.to_string_value())?;
        if newline {
            writeln!(self.output)?;
        }

        Ok(())
    }
}

/// A builtin call at statement level: `name(` or `receiver.name`
fn starts_call(stream: &TokenStream) -> bool {
    let current = stream.current();
    let next = stream.peek();

    (current.builtin().is_some() && next.kind == TokenKind::OpenParen)
        || next.kind == TokenKind::Dot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (Result<()>, Interpreter<Vec<u8>>) {
        let mut interpreter = Interpreter::with_output(Vec::new());
        let result = interpreter.run("test", source);
        (result, interpreter)
    }

    fn printed(interpreter: Interpreter<Vec<u8>>) -> String {
        String::from_utf8(interpreter.into_output()).unwrap()
    }

    #[test]
    fn test_assignment() {
        let (result, interpreter) = run("@x = 5 + 3 * 2");
        result.unwrap();
        assert_eq!(interpreter.env.get("x"), Some(&Value::Int(16)));
    }

    #[test]
    fn test_compound_assignment() {
        let (result, interpreter) = run("@n = 10\n@n -= 4\n@n *= 2\n@n %= 5");
        result.unwrap();
        assert_eq!(interpreter.env.get("n"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_compound_assignment_requires_binding() {
        let (result, _) = run("@total += 1");
        match result {
            Err(Error::VariableUndefined { name, token }) => {
                assert_eq!(name, "total");
                assert_eq!(token.column, 2);
            }
            other => panic!("expected VariableUndefined, got {:?}", other),
        }
    }

    #[test]
    fn test_print_and_println() {
        let (result, interpreter) = run("@who = \"world\"\nprint \"hello \"\nprintln $who\nprintln 1.5");
        result.unwrap();
        assert_eq!(printed(interpreter), "hello world\n1.5\n");
    }

    #[test]
    fn test_conditional_statement() {
        let source = "@x = 7\nif @x > 5\n  println \"big\"\nelse\n  println \"small\"\nend\nprintln \"done\"";
        let (result, interpreter) = run(source);
        result.unwrap();
        assert_eq!(printed(interpreter), "big\ndone\n");
    }

    #[test]
    fn test_stray_conditional_keyword() {
        let (result, _) = run("else println 1 end");
        assert!(matches!(result, Err(Error::SyntaxError { .. })));
    }

    #[test]
    fn test_unhandled_tokens_are_skipped() {
        let (result, interpreter) = run("# comment\nwhile ; println 2 /# block #/");
        result.unwrap();
        assert_eq!(printed(interpreter), "2\n");
    }

    #[test]
    fn test_error_halts_execution() {
        let (result, interpreter) = run("println 1\n@y = 1 / 0\nprintln 2");
        assert!(matches!(result, Err(Error::DivisionByZero { .. })));
        assert_eq!(printed(interpreter), "1\n");
    }

    #[test]
    fn test_render_error() {
        let (result, interpreter) = run("@flag = 1\nif @flag println 1 end");
        let error = result.unwrap_err();
        let report = interpreter.render_error(&error);
        assert!(report.starts_with("Exception: ConversionError\n"));
        assert!(report.contains("Location:  Line 2, Column 1."));
        assert!(report.ends_with("if @flag println 1 end\n^\n```\n"));
    }

    #[test]
    fn test_evaluate_uses_bindings() {
        let mut interpreter = Interpreter::with_output(Vec::new());
        interpreter.run("main", "@x = 4").unwrap();
        assert_eq!(interpreter.evaluate("$x ** 2").unwrap(), Value::Int(16));
    }

    #[test]
    fn test_evaluate_reuses_one_source_slot() {
        let mut interpreter = Interpreter::with_output(Vec::new());
        interpreter.run("main", "@x = 4").unwrap();
        for _ in 0..5 {
            interpreter.evaluate("$x + 1").unwrap();
        }
        assert_eq!(interpreter.sources().len(), 2);

        let error = interpreter.evaluate("$x +\n true").unwrap_err();
        let report = interpreter.render_error(&error);
        assert!(report.contains("$x +\n"));
        assert_eq!(interpreter.sources().len(), 2);
    }

    #[test]
    fn test_print_requires_bound_variable() {
        let (result, interpreter) = run("println @missing");
        match result {
            Err(Error::VariableUndefined { name, token }) => {
                assert_eq!(name, "missing");
                assert_eq!((token.line, token.column), (1, 10));
            }
            other => panic!("expected VariableUndefined, got {:?}", other),
        }
        assert_eq!(printed(interpreter), "");
    }
}
