use crate::query::lexer::Token;
use std::fmt;
use std::mem;

/// Compiled boolean expression tree.
///
/// Long queries compile into trees thousands of levels deep, so every walk
/// over the tree (evaluation, display, drop) uses an explicit stack.
#[derive(Debug, PartialEq, Eq)]
pub enum Expr {
    /// Both sides must match
    And(Box<Expr>, Box<Expr>),
    /// Either side must match
    Or(Box<Expr>, Box<Expr>),
    /// Leaf term, as written in the query
    Value(String),
}

impl Expr {
    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    pub fn value(text: impl Into<String>) -> Self {
        Expr::Value(text.into())
    }

    /// Number of leaf terms in the tree
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Expr::And(l, r) | Expr::Or(l, r) => {
                    pending.push(r);
                    pending.push(l);
                }
                Expr::Value(_) => count += 1,
            }
        }
        count
    }

    /// Detach both children, leaving empty leaves behind
    fn take_children(&mut self) -> Option<(Expr, Expr)> {
        match self {
            Expr::And(l, r) | Expr::Or(l, r) => Some((
                mem::replace(&mut **l, Expr::Value(String::new())),
                mem::replace(&mut **r, Expr::Value(String::new())),
            )),
            Expr::Value(_) => None,
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let Some((l, r)) = self.take_children() {
            pending.push(l);
            pending.push(r);
        }
        // Each popped node is flattened before it goes out of scope
        while let Some(mut node) = pending.pop() {
            if let Some((l, r)) = node.take_children() {
                pending.push(l);
                pending.push(r);
            }
        }
    }
}

/// Piece of the rendered tree still to be written
enum Render<'a> {
    Node(&'a Expr),
    Text(&'static str),
}

fn push_binary<'a>(pending: &mut Vec<Render<'a>>, l: &'a Expr, op: &'static str, r: &'a Expr) {
    pending.push(Render::Text(")"));
    pending.push(Render::Node(r));
    pending.push(Render::Text(op));
    pending.push(Render::Node(l));
    pending.push(Render::Text("("));
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Render::Node(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Render::Text(text) => f.write_str(text)?,
                Render::Node(Expr::Value(text)) => f.write_str(text)?,
                Render::Node(Expr::And(l, r)) => push_binary(&mut pending, l, " AND ", r),
                Render::Node(Expr::Or(l, r)) => push_binary(&mut pending, l, " OR ", r),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

impl Operator {
    fn precedence(self) -> u8 {
        match self {
            Operator::And => 2,
            Operator::Or => 1,
        }
    }
}

/// Entry on the shunting-yard operator stack
#[derive(Debug, Clone, Copy)]
enum StackEntry {
    Op(Operator),
    Group,
}

/// Postfix item produced by the shunting-yard pass
#[derive(Debug)]
enum Postfix<'a> {
    Operand(&'a str),
    Op(Operator),
}

/// Compile a token sequence into an expression tree.
///
/// Returns `None` when there is nothing to match against. Malformed input
/// never fails: operators without an operand on both sides are skipped,
/// and stray parentheses are dropped.
pub fn compile(tokens: &[Token]) -> Option<Expr> {
    let postfix = to_postfix(tokens);
    build_tree(postfix)
}

fn to_postfix(tokens: &[Token]) -> Vec<Postfix<'_>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut after_operand = false;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Value(text) => output.push(Postfix::Operand(text)),
            Token::And | Token::Or => {
                let before_operand = tokens.get(i + 1).is_some_and(Token::starts_operand);
                if !after_operand || !before_operand {
                    tracing::debug!(?token, position = i, "dangling operator ignored");
                    continue;
                }

                let op = if *token == Token::And {
                    Operator::And
                } else {
                    Operator::Or
                };
                while let Some(StackEntry::Op(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(Postfix::Op(*top));
                    stack.pop();
                }
                stack.push(StackEntry::Op(op));
            }
            Token::LParen => stack.push(StackEntry::Group),
            Token::RParen => {
                // An unmatched ')' drains the whole stack and is then ignored
                while let Some(entry) = stack.pop() {
                    match entry {
                        StackEntry::Op(op) => output.push(Postfix::Op(op)),
                        StackEntry::Group => break,
                    }
                }
            }
        }
        after_operand = token.ends_operand();
    }

    // Unclosed '(' barriers are discarded
    while let Some(entry) = stack.pop() {
        if let StackEntry::Op(op) = entry {
            output.push(Postfix::Op(op));
        }
    }

    output
}

fn build_tree(postfix: Vec<Postfix<'_>>) -> Option<Expr> {
    let mut operands: Vec<Expr> = Vec::new();

    for item in postfix {
        match item {
            Postfix::Operand(text) => operands.push(Expr::value(text)),
            Postfix::Op(op) => {
                let right = operands.pop();
                let left = operands.pop();
                match (left, right) {
                    (Some(left), Some(right)) => operands.push(match op {
                        Operator::And => Expr::and(left, right),
                        Operator::Or => Expr::or(left, right),
                    }),
                    (None, Some(only)) => {
                        tracing::debug!(?op, "operator missing left operand ignored");
                        operands.push(only);
                    }
                    _ => tracing::debug!(?op, "operator without operands ignored"),
                }
            }
        }
    }

    // Leftover roots only arise from dropped operators; join them with AND
    let mut roots = operands.into_iter();
    let first = roots.next()?;
    Some(roots.fold(first, Expr::and))
}
