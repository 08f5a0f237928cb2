//! Module to simplify expressions.
//!
//! The [`simplify`] function repeatedly applies rewriting rules to an expression, and to each of
//! its children, until no more rules apply. Every rule keeps the relative order of the
//! non-commutative factors of a product.
//!
//! Simplification here only brings expressions into a tidy canonical form (collecting numbers,
//! like terms and like factors). It is not a decision procedure for equality; use
//! [`numeric::is_zero`](super::numeric::is_zero) for that.

pub mod rules;
pub mod step;

use step::Step;
use super::{expr::SymExpr, step_collector::StepCollector};

/// Base implementation of the simplification algorithm.
///
/// Returns the simplified expression, and whether any rule was applied.
fn inner_simplify(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> (SymExpr, bool) {
    let mut expr = expr.clone();
    let mut changed_at_least_once = false;

    loop {
        let mut changed_in_this_pass = false;

        // try to simplify this expression using all rules
        if let Some(new_expr) = rules::all(&expr, step_collector) {
            expr = new_expr;
            changed_in_this_pass = true;
            changed_at_least_once = true;
        }

        // then begin recursing into the expression's children
        match expr {
            SymExpr::Primary(_) => (),
            SymExpr::Add(ref mut children) | SymExpr::Mul(ref mut children) => {
                for child in children.iter_mut() {
                    let (new_child, changed) = inner_simplify(child, step_collector);
                    *child = new_child;
                    // use |= instead of = to not reset these variables to false if already true
                    changed_in_this_pass |= changed;
                    changed_at_least_once |= changed;
                }
            },
            SymExpr::Exp(ref mut base, ref mut exp) => {
                let (new_base, changed_base) = inner_simplify(base, step_collector);
                let (new_exp, changed_exp) = inner_simplify(exp, step_collector);
                **base = new_base;
                **exp = new_exp;
                changed_in_this_pass |= changed_base || changed_exp;
                changed_at_least_once |= changed_base || changed_exp;
            },
        }

        if !changed_in_this_pass {
            break;
        }
    }

    (expr, changed_at_least_once)
}

/// Simplify the given expression.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    inner_simplify(expr, &mut ()).0
}

/// Simplify the given expression, also returning the steps taken by the simplifier. This is
/// useful for debugging.
pub fn simplify_with_steps(expr: &SymExpr) -> (SymExpr, Vec<Step>) {
    let mut steps = Vec::new();
    let expr = inner_simplify(expr, &mut steps).0;
    (expr, steps)
}
