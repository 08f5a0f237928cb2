//! Simplification rules for expressions involving multiplication, including combining like
//! factors.
//!
//! None of these rules change the relative order of the non-commutative factors of a product.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{rules::do_multiply, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `a*(b*c) = a*b*c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
            return None;
        }

        let flattened = factors.iter()
            .cloned()
            .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor);
        Some(flattened.downgrade())
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::Flatten);
    Some(opt)
}

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if factors.iter().any(SymExpr::is_literal_zero) {
            Some(SymExpr::zero())
        } else {
            None
        }
    })?;

    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_literal_one())
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// Multiplies all numeric factors of a product into a single reduced fraction, placed in front of
/// the remaining factors.
///
/// `2*a*4^-1*6 = 3*a`
/// `a*(-1)*(-1) = a`
pub fn fold_coefficients(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut value = Rational::from(1);
        let mut numeric = 0;
        let mut rest = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor.as_rational() {
                Some(n) => {
                    value *= n;
                    numeric += 1;
                },
                None => rest.push(factor.clone()),
            }
        }

        let canonical = if value == 1 {
            Vec::new()
        } else {
            SymExpr::rational(value).factors().to_vec()
        };

        // already folded
        if numeric == canonical.len() && factors.starts_with(&canonical) {
            return None;
        }

        let mut new_factors = canonical;
        new_factors.extend(rest);
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::FoldCoefficients);
    Some(opt)
}

/// Returns the base and exponent of a factor. Factors that are not powers have an exponent of 1.
fn base_and_exp(factor: &SymExpr) -> (&SymExpr, SymExpr) {
    match factor {
        SymExpr::Exp(base, exp) => (base, (**exp).clone()),
        factor => (factor, SymExpr::one()),
    }
}

/// Combines like commutative factors by adding their exponents. The combined factor takes the
/// place of the first occurrence.
///
/// `a*a = a^2`
/// `a^2*b*a^-1 = a*b`
/// `(w_n-w)*(w_n-w)^-1 = (w_n-w)^0`
pub fn combine_like_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        // (base, summed exponent) per combinable factor, or `None` for factors that are kept as-is
        let mut groups: Vec<(usize, &SymExpr, SymExpr)> = Vec::new();
        let mut combined = false;
        let mut absorbed = vec![false; factors.len()];

        for (idx, factor) in factors.iter().enumerate() {
            if !factor.is_commutative() || factor.is_rational() {
                continue;
            }

            let (base, exp) = base_and_exp(factor);
            match groups.iter_mut().find(|(_, group_base, _)| *group_base == base) {
                Some((_, _, group_exp)) => {
                    *group_exp += exp;
                    absorbed[idx] = true;
                    combined = true;
                },
                None => groups.push((idx, base, exp)),
            }
        }

        if !combined {
            return None;
        }

        let new_factors = factors.iter()
            .enumerate()
            .filter(|(idx, _)| !absorbed[*idx])
            .map(|(idx, factor)| {
                match groups.iter().find(|(group_idx, _, _)| *group_idx == idx) {
                    Some((_, base, exp)) => {
                        let exp = exp.clone().downgrade();
                        if exp.is_literal_one() {
                            (*base).clone()
                        } else {
                            SymExpr::Exp(Box::new((*base).clone()), Box::new(exp))
                        }
                    },
                    None => factor.clone(),
                }
            })
            .collect::<Vec<_>>();
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules.
///
/// All multiplication rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| multiply_zero(expr, step_collector))
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| fold_coefficients(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
}
