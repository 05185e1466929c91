/// Node of a boolean expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum BoolNode {
    Value(bool),
    And(Box<BoolNode>, Box<BoolNode>),
    Or(Box<BoolNode>, Box<BoolNode>),
    Not(Box<BoolNode>),
}

impl BoolNode {
    /// Evaluates the tree with short-circuit semantics
    pub fn evaluate(&self) -> bool {
        match self {
            BoolNode::Value(b) => *b,
            BoolNode::And(left, right) => left.evaluate() && right.evaluate(),
            BoolNode::Or(left, right) => left.evaluate() || right.evaluate(),
            BoolNode::Not(inner) => !inner.evaluate(),
        }
    }
}

/// Incrementally built boolean expression
///
/// The evaluator seeds the root with the first boolean operand and then
/// folds every logical operator into the tree, left to right. Operands are
/// always evaluated by the caller before they reach the builder; only the
/// logical value of the tree short-circuits.
#[derive(Debug, Clone, Default)]
pub struct BooleanExpressionBuilder {
    root: Option<BoolNode>,
    composing: bool,
}

impl BooleanExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a root value has been seeded
    pub fn is_set(&self) -> bool {
        self.root.is_some()
    }

    /// Whether a logical operator has been folded into the tree
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Replaces the tree with a single value
    pub fn value(&mut self, value: bool) {
        self.root = Some(BoolNode::Value(value));
        self.composing = false;
    }

    pub fn and(&mut self, value: bool) {
        self.combine(value, BoolNode::And);
    }

    pub fn or(&mut self, value: bool) {
        self.combine(value, BoolNode::Or);
    }

    /// Negates the current root; an empty builder is left untouched
    pub fn not(&mut self) {
        if let Some(root) = self.root.take() {
            self.root = Some(BoolNode::Not(Box::new(root)));
            self.composing = true;
        }
    }

    /// Current logical value; an empty builder evaluates to `false`
    pub fn evaluate(&self) -> bool {
        self.root.as_ref().map(BoolNode::evaluate).unwrap_or(false)
    }

    pub fn root(&self) -> Option<&BoolNode> {
        self.root.as_ref()
    }

    fn combine(&mut self, value: bool, node: fn(Box<BoolNode>, Box<BoolNode>) -> BoolNode) {
        let right = Box::new(BoolNode::Value(value));
        self.root = Some(match self.root.take() {
            Some(left) => node(Box::new(left), right),
            None => *right,
        });
        self.composing = true;
    }
}
