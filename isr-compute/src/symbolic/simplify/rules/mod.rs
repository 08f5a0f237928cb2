//! The simplification rules, grouped by the kind of expression they rewrite.
//!
//! A rule returns `Some(expr)` with the rewritten expression, or `None` if it does not apply. Each
//! rule reports itself to the step collector only when it applies.

pub mod add;
pub mod imaginary;
pub mod multiply;
pub mod power;

use crate::symbolic::step_collector::StepCollector;
use super::{step::Step, SymExpr};

/// Runs `f` on the terms of a sum.
pub(crate) fn do_add<T>(expr: &SymExpr, f: impl Fn(&[SymExpr]) -> Option<T>) -> Option<T> {
    match expr {
        SymExpr::Add(terms) => f(terms),
        _ => None,
    }
}

/// Runs `f` on the factors of a product.
pub(crate) fn do_multiply<T>(expr: &SymExpr, f: impl Fn(&[SymExpr]) -> Option<T>) -> Option<T> {
    match expr {
        SymExpr::Mul(factors) => f(factors),
        _ => None,
    }
}

/// Runs `f` on the base and exponent of a power.
pub(crate) fn do_power<T>(expr: &SymExpr, f: impl Fn(&SymExpr, &SymExpr) -> Option<T>) -> Option<T> {
    match expr {
        SymExpr::Exp(base, exp) => f(base, exp),
        _ => None,
    }
}

/// Applies the first rule that matches the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    add::all(expr, step_collector)
        .or_else(|| multiply::all(expr, step_collector))
        .or_else(|| power::all(expr, step_collector))
        .or_else(|| imaginary::all(expr, step_collector))
}
