//! Simplification rules for powers with integer exponents.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};
use rug::ops::Pow;

/// Exponents above this size are left unevaluated.
const MAX_INTEGER_EXPONENT: u32 = 64;

/// `a^0 = 1`
pub fn power_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.is_literal_zero() {
            Some(SymExpr::one())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if rhs.is_literal_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `0^n = 0`, for positive integers `n`
pub fn power_zero_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.is_literal_zero() && *rhs.as_integer()? > 0 {
            Some(SymExpr::zero())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerZeroLeft);
    Some(opt)
}

/// `1^a = 1`
pub fn power_one_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, _| {
        if lhs.is_literal_one() {
            Some(SymExpr::one())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOneLeft);
    Some(opt)
}

/// `(a^m)^n = a^(m*n)`, for integers `m` and `n`
pub fn power_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let outer = rhs.as_integer()?;
        let SymExpr::Exp(base, inner) = lhs else {
            return None;
        };
        let inner = inner.as_integer()?;
        Some(SymExpr::Exp(base.clone(), Box::new(SymExpr::int(inner.clone() * outer))))
    })?;

    step_collector.push(Step::PowerPower);
    Some(opt)
}

/// Evaluates integer powers of integers.
///
/// `2^3 = 8`
/// `2^-2 = 4^-1`
pub fn integer_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_integer()?;
        let exp = rhs.as_integer()?.to_i32()?;
        let magnitude = exp.unsigned_abs();
        if magnitude > MAX_INTEGER_EXPONENT || exp == -1 || (exp < 0 && base.is_zero()) {
            return None;
        }

        let value = SymExpr::int(base.clone().pow(magnitude));
        if exp < 0 {
            Some(value.recip())
        } else {
            Some(value)
        }
    })?;

    step_collector.push(Step::IntegerPower);
    Some(opt)
}

/// Applies all power rules.
///
/// All power rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    power_zero(expr, step_collector)
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| power_zero_left(expr, step_collector))
        .or_else(|| power_one_left(expr, step_collector))
        .or_else(|| power_power(expr, step_collector))
        .or_else(|| integer_power(expr, step_collector))
}
