//! Simplification rules for expressions involving addition, including combining like terms.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{rules::do_add, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `a+(b+c) = a+b+c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        if !terms.iter().any(|term| matches!(term, SymExpr::Add(_))) {
            return None;
        }

        let flattened = terms.iter()
            .cloned()
            .fold(SymExpr::Add(Vec::new()), |acc, term| acc + term);
        Some(flattened.downgrade())
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::Flatten);
    Some(opt)
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_literal_zero())
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    step_collector.push(Step::AddZero);
    Some(opt)
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `a-a = 0`
/// etc.
pub fn combine_like_terms(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        // (coefficient, remaining factors) of each distinct term, in order of first appearance
        let mut groups: Vec<(Rational, SymExpr)> = Vec::with_capacity(terms.len());

        // this is O(n^2) worst case, due to scanning the groups for each term
        for term in terms {
            let (coefficient, rest) = term.split_coefficient();
            match groups.iter_mut().find(|(_, group_rest)| *group_rest == rest) {
                Some((group_coefficient, _)) => *group_coefficient += coefficient,
                None => groups.push((coefficient, rest)),
            }
        }

        if groups.len() == terms.len() {
            return None;
        }

        let new_terms = groups.into_iter()
            .filter(|(coefficient, _)| *coefficient != 0)
            .map(|(coefficient, rest)| {
                if rest.is_literal_one() {
                    SymExpr::rational(coefficient)
                } else if coefficient == 1 {
                    rest
                } else {
                    SymExpr::rational(coefficient) * rest
                }
            })
            .collect::<Vec<_>>();
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| add_zero(expr, step_collector))
        .or_else(|| combine_like_terms(expr, step_collector))
}
