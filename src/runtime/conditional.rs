use crate::builtins::BuiltinRegistry;
use crate::error::{Error, Result};
use crate::lexer::{Keyword, Token, TokenStream};
use crate::runtime::expression::ExpressionEvaluator;
use crate::runtime::Environment;

/// One guarded body of a conditional
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// Guard value, evaluated once when the branch was opened
    pub evaluation: bool,
    /// Body tokens, unevaluated
    pub body: Vec<Token>,
}

impl Branch {
    fn new(evaluation: bool) -> Self {
        Branch {
            evaluation,
            body: Vec::new(),
        }
    }
}

/// A fully collected `if ... elseif ... else ... end` construct
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub if_branch: Branch,
    pub else_if_branches: Vec<Branch>,
    /// `else` has no guard; its `evaluation` is always `true`
    pub else_branch: Option<Branch>,
}

impl Conditional {
    /// The branch that runs: `if` when true, else the first true `elseif`,
    /// else the `else` branch if present
    pub fn selected(&self) -> Option<&Branch> {
        if self.if_branch.evaluation {
            return Some(&self.if_branch);
        }
        self.else_if_branches
            .iter()
            .find(|branch| branch.evaluation)
            .or(self.else_branch.as_ref())
    }

    /// Consumes the conditional, returning the body that runs
    pub fn into_selected_body(self) -> Vec<Token> {
        if self.if_branch.evaluation {
            return self.if_branch.body;
        }
        match self.else_if_branches.into_iter().find(|b| b.evaluation) {
            Some(branch) => branch.body,
            None => self.else_branch.map(|b| b.body).unwrap_or_default(),
        }
    }
}

/// Which body the collector is filling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    If,
    ElseIf,
    Else,
}

/// Eager conditional execution over a token stream
///
/// Every guard is evaluated as soon as it is reached; bodies are collected
/// without being interpreted. Nested conditionals inside a body are stored
/// verbatim and only run after the selected body has been spliced back into
/// the stream, immediately after the consumed `end`.
pub struct ConditionalEngine<'a> {
    stream: &'a mut TokenStream,
    env: &'a Environment,
    builtins: &'a BuiltinRegistry,
}

impl<'a> ConditionalEngine<'a> {
    pub fn new(
        stream: &'a mut TokenStream,
        env: &'a Environment,
        builtins: &'a BuiltinRegistry,
    ) -> Self {
        ConditionalEngine {
            stream,
            env,
            builtins,
        }
    }

    /// Collects the conditional at the cursor and splices the selected body
    pub fn run(&mut self) -> Result<()> {
        let conditional = self.collect()?;
        let body = conditional.into_selected_body();
        tracing::debug!("Conditional resolved, splicing {} tokens", body.len());
        if !body.is_empty() {
            self.stream.splice(body);
        }
        Ok(())
    }

    /// Collects the conditional at the cursor, leaving the cursor after `end`
    pub fn collect(&mut self) -> Result<Conditional> {
        let if_token = self.stream.current().clone();
        if !if_token.is_conditional(Keyword::If) {
            return Err(Error::syntax(
                &if_token,
                format!("`{}` without a matching `if`", if_token.text),
            ));
        }
        self.stream.next();

        let mut conditional = Conditional {
            if_branch: Branch::new(self.guard(&if_token)?),
            else_if_branches: Vec::new(),
            else_branch: None,
        };
        let mut target = Target::If;
        let mut depth = 1usize;

        loop {
            let token = self.stream.current().clone();

            if token.is_eof() {
                return Err(Error::syntax(&if_token, "`if` without a matching `end`"));
            }

            if token.is_conditional(Keyword::If) {
                depth += 1;
            } else if token.is_conditional(Keyword::End) {
                if depth == 1 {
                    self.stream.next();
                    break;
                }
                depth -= 1;
            } else if depth == 1 && token.is_conditional(Keyword::Else) {
                if target == Target::Else {
                    return Err(Error::syntax(&token, "second `else` in conditional"));
                }
                self.stream.next();
                conditional.else_branch = Some(Branch::new(true));
                target = Target::Else;
                continue;
            } else if depth == 1 && token.is_conditional(Keyword::ElseIf) {
                if target == Target::Else {
                    return Err(Error::syntax(&token, "`elseif` after `else`"));
                }
                self.stream.next();
                let evaluation = self.guard(&token)?;
                conditional.else_if_branches.push(Branch::new(evaluation));
                target = Target::ElseIf;
                continue;
            }

            let branch = match target {
                Target::If => Some(&mut conditional.if_branch),
                Target::ElseIf => conditional.else_if_branches.last_mut(),
                Target::Else => conditional.else_branch.as_mut(),
            };
            if let Some(branch) = branch {
                branch.body.push(token);
            }
            self.stream.next();
        }

        Ok(conditional)
    }

    /// Evaluates a guard with a fresh builder; it must be boolean
    fn guard(&mut self, keyword: &Token) -> Result<bool> {
        let value = ExpressionEvaluator::new(&mut *self.stream, self.env, self.builtins)
            .evaluate_expression()?;
        value.as_bool(keyword).map_err(|_| {
            Error::conversion(
                keyword,
                format!(
                    "`{}` guard must be a Boolean, got {}",
                    keyword.text,
                    value.type_name()
                ),
            )
        })
    }
}
