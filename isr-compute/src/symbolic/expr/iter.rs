use super::SymExpr;

/// An iterator that traverses the tree of expressions in left-to-right post-order (i.e.
/// depth-first), without recursion.
///
/// This iterator is created by [`SymExpr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a SymExpr>,
    last_visited: Option<&'a SymExpr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator starting at the given expression.
    pub fn new(expr: &'a SymExpr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a SymExpr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the children of a node have all been visited, which is the case when the
    /// last of them was the last visited expression.
    fn children_done(&self, last_child: Option<&'a SymExpr>) -> bool {
        match (last_child, self.last_visited) {
            (None, _) => true,
            (Some(child), Some(last_visited)) => std::ptr::eq(child, last_visited),
            (Some(_), None) => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a SymExpr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            match expr {
                SymExpr::Primary(_) => return self.visit(),
                SymExpr::Add(children) | SymExpr::Mul(children) => {
                    if self.children_done(children.last()) {
                        return self.visit();
                    }
                    self.stack.extend(children.iter().rev());
                },
                SymExpr::Exp(base, exp) => {
                    if self.children_done(Some(&**exp)) {
                        return self.visit();
                    }
                    self.stack.push(exp);
                    self.stack.push(base);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn post_order() {
        let expr = SymExpr::symbol("a") * (SymExpr::symbol("b") + SymExpr::symbol("c"));
        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(visited, vec!["a", "b", "c", "b + c", "a * (b + c)"]);
    }
}
