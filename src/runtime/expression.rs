use crate::builtins::BuiltinRegistry;
use crate::error::{Error, Result};
use crate::lexer::{Operator, Token, TokenKind, TokenStream};
use crate::runtime::boolexpr::BooleanExpressionBuilder;
use crate::runtime::interpolation::interpolate;
use crate::runtime::value::{apply_arithmetic, apply_relational};
use crate::runtime::{Environment, Value};

/// Evaluates expressions directly off a token stream
///
/// There is no syntax tree: each call consumes the tokens of one expression,
/// starting at the stream cursor, and leaves the cursor on the first token
/// that does not belong to it. Arithmetic and relational operators are
/// applied strictly left to right with no precedence; `5 + 3 * 2` is `16`.
/// Logical operators split the expression into operands and are folded into
/// a [`BooleanExpressionBuilder`], also left to right.
pub struct ExpressionEvaluator<'a> {
    stream: &'a mut TokenStream,
    env: &'a Environment,
    builtins: &'a BuiltinRegistry,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(
        stream: &'a mut TokenStream,
        env: &'a Environment,
        builtins: &'a BuiltinRegistry,
    ) -> Self {
        ExpressionEvaluator {
            stream,
            env,
            builtins,
        }
    }

    /// Evaluates one expression with a fresh boolean builder
    pub fn evaluate_expression(&mut self) -> Result<Value> {
        let mut builder = BooleanExpressionBuilder::new();
        self.evaluate(&mut builder)
    }

    /// Evaluates one expression, folding logical operators into `builder`
    ///
    /// Both sides of a logical operator are always consumed; only the
    /// logical value short-circuits.
    pub fn evaluate(&mut self, builder: &mut BooleanExpressionBuilder) -> Result<Value> {
        let mut result = self.operand(builder)?;

        while let Some(op) = self.stream.current().operator().filter(|op| op.is_logical()) {
            let op_token = self.stream.current().clone();
            self.stream.next();

            if !builder.is_composing() {
                builder.value(result.as_bool(&op_token)?);
            }

            let next = self.operand(builder)?.as_bool(&op_token)?;
            match op {
                Operator::And => builder.and(next),
                Operator::Or => builder.or(next),
                // infix `not` negates what has been built so far
                _ => builder.not(),
            }

            result = Value::Bool(builder.evaluate());
        }

        Ok(result)
    }

    /// A term followed by any chain of arithmetic and relational operators
    fn operand(&mut self, builder: &mut BooleanExpressionBuilder) -> Result<Value> {
        let mut result = self.term()?;

        loop {
            let token = self.stream.current().clone();
            if token.kind != TokenKind::Operator {
                break;
            }

            match token.operator() {
                Some(op) if op.is_logical() => break,
                Some(op) if op.is_arithmetic() => {
                    self.stream.next();
                    let rhs = self.term()?;
                    result = apply_arithmetic(op, &token, result, rhs)?;
                }
                Some(op) if op.is_relational() => {
                    self.stream.next();
                    let rhs = self.term()?;
                    result = apply_relational(op, &token, result, rhs)?;
                    if !builder.is_set() {
                        builder.value(result.as_bool(&token)?);
                    }
                }
                _ => {
                    tracing::debug!("Unknown operator in expression: {}", token.info());
                    self.stream.next();
                    self.term()?;
                }
            }
        }

        Ok(result)
    }

    fn term(&mut self) -> Result<Value> {
        if self.stream.current().kind == TokenKind::DeclVar {
            self.stream.next();
        }

        let token = self.stream.current().clone();
        let value = match token.kind {
            TokenKind::OpenParen => {
                self.stream.next();
                let value = self.evaluate_expression()?;
                self.expect(TokenKind::CloseParen, "`)`")?;
                value
            }
            TokenKind::Identifier => self.identifier(&token)?,
            TokenKind::Operator => self.prefix(&token)?,
            TokenKind::Literal | TokenKind::String => {
                self.stream.next();
                self.literal(&token)?
            }
            TokenKind::Eof => return Err(Error::syntax(&token, "unexpected end of input")),
            kind => {
                return Err(Error::syntax(
                    &token,
                    format!("unexpected {} `{}` in expression", kind, token.text),
                ))
            }
        };

        self.postfix(value)
    }

    fn identifier(&mut self, token: &Token) -> Result<Value> {
        self.stream.next();

        if let Some(builtin) = token.builtin() {
            if self.stream.current().kind == TokenKind::OpenParen {
                let args = self.arguments()?;
                return self.builtins.dispatch(token, builtin, &args);
            }
        }

        match self.env.get(&token.text) {
            Some(value) => Ok(value.clone()),
            None => {
                tracing::debug!("Unbound variable read as 0: {}", token.info());
                Ok(Value::Int(0))
            }
        }
    }

    /// Unary `not`/`!` and unary `-`
    fn prefix(&mut self, token: &Token) -> Result<Value> {
        self.stream.next();

        match token.operator() {
            Some(Operator::Not) => {
                let mut inner = BooleanExpressionBuilder::new();
                let value = self.operand(&mut inner)?;
                inner.value(value.as_bool(token)?);
                inner.not();
                Ok(Value::Bool(inner.evaluate()))
            }
            Some(Operator::Subtract) => match self.term()? {
                Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                Value::Double(d) => Ok(Value::Double(-d)),
                other => Err(Error::conversion(
                    token,
                    format!("cannot negate {}", other.type_name()),
                )),
            },
            _ => Err(Error::syntax(
                token,
                format!("`{}` cannot start an expression", token.text),
            )),
        }
    }

    fn literal(&self, token: &Token) -> Result<Value> {
        match (&token.value, token.kind) {
            (Some(Value::String(raw)), TokenKind::String) if !token.is_regex() => Ok(
                Value::String(interpolate(raw, token.file_id, self.env)),
            ),
            (Some(value), _) => Ok(value.clone()),
            (None, _) => Err(Error::syntax(token, "literal without a value")),
        }
    }

    /// Method-style builtin calls: `receiver.size()`, `receiver.upcase`
    fn postfix(&mut self, mut receiver: Value) -> Result<Value> {
        while self.stream.current().kind == TokenKind::Dot
            && self.stream.peek().kind == TokenKind::Identifier
        {
            let method = self.stream.peek().clone();
            let builtin = match method.builtin() {
                Some(builtin) => builtin,
                None => break,
            };
            self.stream.next();
            self.stream.next();

            let mut args = vec![receiver];
            if self.stream.current().kind == TokenKind::OpenParen {
                args.extend(self.arguments()?);
            }
            receiver = self.builtins.dispatch(&method, builtin, &args)?;
        }

        Ok(receiver)
    }

    /// Parenthesized, comma-separated argument list; cursor is on `(`
    fn arguments(&mut self) -> Result<Vec<Value>> {
        self.stream.next();
        let mut args = Vec::new();

        if self.stream.current().kind == TokenKind::CloseParen {
            self.stream.next();
            return Ok(args);
        }

        loop {
            args.push(self.evaluate_expression()?);
            match self.stream.current().kind {
                TokenKind::Comma => self.stream.next(),
                TokenKind::CloseParen => {
                    self.stream.next();
                    return Ok(args);
                }
                _ => {
                    return Err(Error::syntax(
                        self.stream.current(),
                        "expected `,` or `)` in argument list",
                    ))
                }
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.stream.current().kind == kind {
            self.stream.next();
            Ok(())
        } else {
            Err(Error::syntax(
                self.stream.current(),
                format!("expected {}", what),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;

    fn eval_with(source: &str, env: &Environment) -> Result<Value> {
        let mut stream = TokenStream::new(Scanner::new(0, source).scan_tokens());
        let builtins = BuiltinRegistry::new();
        ExpressionEvaluator::new(&mut stream, env, &builtins).evaluate_expression()
    }

    fn eval(source: &str) -> Result<Value> {
        eval_with(source, &Environment::new())
    }

    #[test]
    fn test_left_to_right_arithmetic() {
        assert_eq!(eval("5 + 3 * 2").unwrap(), Value::Int(16));
        assert_eq!(eval("5 + (3 * 2)").unwrap(), Value::Int(11));
        assert_eq!(eval("2 ** 3 - 1").unwrap(), Value::Int(7));
        assert_eq!(eval("7 % 4").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_relational_and_logical() {
        assert_eq!(eval("1 < 2 and 3 > 4").unwrap(), Value::Bool(false));
        assert_eq!(eval("1 < 2 && 3 > 4 || true").unwrap(), Value::Bool(true));
        assert_eq!(eval("false or true and false").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_unary_terms() {
        assert_eq!(eval("not true").unwrap(), Value::Bool(false));
        assert_eq!(eval("!(1 == 2)").unwrap(), Value::Bool(true));
        assert_eq!(eval("not 1 == 2 and true").unwrap(), Value::Bool(true));
        assert_eq!(eval("-3 + 1").unwrap(), Value::Int(-2));
        assert_eq!(eval("2 * -1.5").unwrap(), Value::Double(-3.0));
    }

    #[test]
    fn test_logical_operand_must_be_boolean() {
        assert!(matches!(eval("1 and true"), Err(Error::ConversionError { .. })));
        assert!(matches!(eval("true or 1"), Err(Error::ConversionError { .. })));
    }

    #[test]
    fn test_variables() {
        let mut env = Environment::new();
        env.define("x", Value::Int(5));
        assert_eq!(eval_with("$x * 2", &env).unwrap(), Value::Int(10));
        assert_eq!(eval_with("@x == 5", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_with("missing + 1", &env).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_cursor_stops_after_expression() {
        let env = Environment::new();
        let builtins = BuiltinRegistry::new();
        let mut stream = TokenStream::new(Scanner::new(0, "1 + 2 @y").scan_tokens());
        let value = ExpressionEvaluator::new(&mut stream, &env, &builtins)
            .evaluate_expression()
            .unwrap();
        assert_eq!(value, Value::Int(3));
        assert_eq!(stream.current().kind, TokenKind::DeclVar);
    }

    #[test]
    fn test_missing_close_paren() {
        assert!(matches!(eval("(1 + 2"), Err(Error::SyntaxError { .. })));
        assert!(matches!(eval(""), Err(Error::SyntaxError { .. })));
    }

    #[test]
    fn test_builtin_without_handler() {
        assert!(matches!(
            eval("__abs__(1)"),
            Err(Error::UnknownBuiltin { .. })
        ));
        assert!(matches!(
            eval("\"abc\".upcase()"),
            Err(Error::UnknownBuiltin { .. })
        ));
    }
}
