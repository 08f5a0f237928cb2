//! Extra terms of the ISR formulation.
//!
//! The ISR formulation of a sum over states only sums over excited states, and treats every
//! summation index as independent of the other states of the expression. A literal sum over states
//! also includes the cases where a summation index is the ground state, or coincides with another
//! state of the same transition moment. Those cases are collected here as extra terms:
//!
//! - `(n, 0)`: the index `n` becomes the ground state, and `w_n` becomes zero.
//! - `(n, f)`: the index `n` becomes the state `f` it shares a transition moment with. A transition
//!   moment `<f|op|f>` created by this is read as the ground state moment `<0|op|0>`.
//!
//! Each extra term is searched for extra terms of its own in the remaining indices. Extra terms of
//! all terms of the expression are then grouped by numerator, and groups that sum to zero after
//! applying the frequency correlations are dropped.

use crate::error::{RecursionLimit, StaticExtraTerms, UnmatchedExcludedCase, UnsupportedTerm};
use crate::matcher::match_term;
use isr_compute::model::{Moment, StateLabel};
use isr_compute::symbolic::{
    fraction::as_numer_denom,
    numeric::is_zero,
    simplify,
    subs::{relabel_states, subs_all},
    Primary,
    StepCollector,
    SymExpr,
};
use isr_compute::MAX_DEPTH;
use isr_error::Error;
use log::debug;

/// A special case of a summation index: the index, and the state it takes.
pub type Case = (StateLabel, StateLabel);

/// An extra term of a single term, and the cases that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraTermStep {
    /// The cases that were applied, from outermost to innermost.
    pub cases: Vec<Case>,

    /// The resulting extra term.
    pub term: SymExpr,
}

/// Returns the special cases of the summation indices in the given term.
fn special_cases(term: &SymExpr, indices: &[StateLabel], excluded: &[Case]) -> Vec<Case> {
    let transition_moments = match_term(term).transition_moments;
    let mut cases: Vec<Case> = Vec::new();
    for index in indices {
        cases.push((index.clone(), StateLabel::ground()));
        for tm in &transition_moments {
            let case = if tm.bra == *index {
                (tm.bra.clone(), tm.ket.clone())
            } else if tm.ket == *index {
                (tm.ket.clone(), tm.bra.clone())
            } else {
                continue;
            };

            let swapped = (case.1.clone(), case.0.clone());
            if !cases.contains(&case) && !cases.contains(&swapped) {
                cases.push(case);
            }
        }
    }

    cases.retain(|case| !excluded.contains(case));
    cases
}

/// Returns true if the expression divides by an expression that is zero.
fn divides_by_zero(expr: &SymExpr) -> bool {
    expr.contains(|sub| match sub {
        SymExpr::Exp(base, exp) => exp.as_integer().map_or(false, |n| *n < 0) && is_zero(base),
        _ => false,
    })
}

/// Applies the case `index = 0` to the term.
fn ground_case(term: &SymExpr, index: &StateLabel) -> Result<SymExpr, Error> {
    let relabeled = relabel_states(term, &[(index.clone(), StateLabel::ground())]);
    let substituted = relabeled.map_primaries(&mut |primary| match primary {
        Primary::TransitionFrequency(state) if state.is_ground() => Some(SymExpr::zero()),
        _ => None,
    });

    if divides_by_zero(&substituted) {
        return Err(Error::spanless(StaticExtraTerms));
    }
    Ok(simplify(&substituted))
}

/// Applies the case `index = other` to the term, turning every transition moment `<other|op|other>`
/// into `<0|op|0>`.
fn coincidence_case(term: &SymExpr, index: &StateLabel, other: &StateLabel) -> SymExpr {
    let relabeled = relabel_states(term, &[(index.clone(), other.clone())]);
    let mut factors = relabeled.factors().to_vec();
    for tm in match_term(&relabeled).transition_moments {
        if tm.bra == *other && tm.ket == *other {
            let [bra, _, ket] = tm.positions;
            factors[bra] = SymExpr::bra(StateLabel::ground());
            factors[ket] = SymExpr::ket(StateLabel::ground());
        }
    }

    simplify(&SymExpr::Mul(factors).downgrade())
}

/// Recursively finds the extra terms of a single term.
fn extra_terms_single_term_inner(
    term: &SymExpr,
    indices: &[StateLabel],
    excluded: &[Case],
    depth: usize,
) -> Result<Vec<(Vec<Case>, SymExpr)>, Error> {
    if depth > MAX_DEPTH {
        return Err(Error::spanless(RecursionLimit { limit: MAX_DEPTH }));
    }
    if !matches!(term, SymExpr::Mul(_)) {
        return Err(Error::spanless(UnsupportedTerm { term: term.to_string() }));
    }

    let mut found: Vec<(Vec<Case>, SymExpr)> = Vec::new();
    for (index, value) in special_cases(term, indices, excluded) {
        let extra = if value.is_ground() {
            ground_case(term, &index)?
        } else {
            coincidence_case(term, &index, &value)
        };
        debug!("extra term for {} = {}: {}", index, value, extra);

        let remaining = indices.iter()
            .filter(|other| **other != index)
            .cloned()
            .collect::<Vec<_>>();
        let nested = if remaining.is_empty() || !matches!(extra, SymExpr::Mul(_)) {
            Vec::new()
        } else {
            extra_terms_single_term_inner(&extra, &remaining, excluded, depth + 1)?
        };

        let case = (index, value);
        found.push((vec![case.clone()], extra));
        for (cases, nested_term) in nested {
            if found.iter().all(|(_, term)| *term != nested_term) {
                let mut key = vec![case.clone()];
                key.extend(cases);
                found.push((key, nested_term));
            }
        }
    }

    Ok(found)
}

/// Finds the extra terms of a single product term, keyed by the cases that produced them.
///
/// Nested extra terms that are equal to an already found term are only reported once.
pub fn extra_terms_single_term(
    term: &SymExpr,
    indices: &[StateLabel],
    excluded: &[Case],
) -> Result<Vec<(Vec<Case>, SymExpr)>, Error> {
    extra_terms_single_term_inner(term, indices, excluded, 0)
}

/// Renames the summation indices left in an extra term to the first summation indices, so that
/// equivalent extra terms from different cases look the same.
fn renumber_indices(term: &SymExpr, cases: &[Case], indices: &[StateLabel]) -> SymExpr {
    if cases.len() == indices.len() {
        return term.clone();
    }

    let left = indices.iter()
        .filter(|index| cases.iter().all(|(case, _)| case != *index));
    let map = left.zip(indices)
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect::<Vec<_>>();
    relabel_states(term, &map)
}

/// Replaces every transition moment between the ground state and a state that is not summed over
/// with a plain [`Moment`].
fn insert_moments(term: &SymExpr, indices: &[StateLabel]) -> SymExpr {
    let mut factors = term.factors().iter().cloned().map(Some).collect::<Vec<_>>();
    for tm in match_term(term).transition_moments {
        let other = if tm.bra.is_ground() && !indices.contains(&tm.ket) {
            tm.ket
        } else if tm.ket.is_ground() && !indices.contains(&tm.bra) {
            tm.bra
        } else {
            continue;
        };

        let [bra, op, ket] = tm.positions;
        let moment = Moment::of(&tm.op, StateLabel::ground(), other);
        factors[bra] = Some(SymExpr::Primary(Primary::Moment(moment)));
        factors[op] = None;
        factors[ket] = None;
    }

    factors.into_iter()
        .flatten()
        .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor)
        .downgrade()
}

/// Returns true if the numerators are equal up to their sign.
fn same_numerator(lhs: &SymExpr, rhs: &SymExpr) -> bool {
    let (lhs_coefficient, lhs_rest) = lhs.split_coefficient();
    let (rhs_coefficient, rhs_rest) = rhs.split_coefficient();
    lhs_rest == rhs_rest && lhs_coefficient.abs() == rhs_coefficient.abs()
}

/// Sums the extra terms that do not cancel.
///
/// The terms are grouped by their numerator, where a numerator and its negation fall into the same
/// group. A group is dropped if its sum is zero after substituting the frequency correlations.
/// The sums of the other groups are returned without the correlations substituted.
pub fn remaining_terms(terms: &[SymExpr], correlations: &[(SymExpr, SymExpr)]) -> SymExpr {
    let mut groups: Vec<(SymExpr, Vec<&SymExpr>)> = Vec::new();
    for term in terms {
        let (numerator, _) = as_numer_denom(term);
        match groups.iter_mut().find(|(key, _)| same_numerator(key, &numerator)) {
            Some((_, members)) => members.push(term),
            None => groups.push((numerator, vec![term])),
        }
    }

    groups.into_iter()
        .map(|(_, members)| {
            members.into_iter()
                .cloned()
                .fold(SymExpr::Add(Vec::new()), |acc, term| acc + term)
                .downgrade()
        })
        .filter(|sum| !is_zero(&simplify(&subs_all(sum, correlations))))
        .fold(SymExpr::Add(Vec::new()), |acc, sum| acc + sum)
        .downgrade()
}

/// Computes the extra terms of a sum-over-states expression, reporting the extra terms found for
/// every term of the expression to the step collector.
pub fn compute_extra_terms(
    expr: &SymExpr,
    indices: &[StateLabel],
    excluded: &[Case],
    correlations: &[(SymExpr, SymExpr)],
    step_collector: &mut dyn StepCollector<ExtraTermStep>,
) -> Result<SymExpr, Error> {
    let arising = expr.terms()
        .iter()
        .flat_map(|term| special_cases(term, indices, &[]))
        .collect::<Vec<_>>();
    if let Some((index, value)) = excluded.iter().find(|case| !arising.contains(case)) {
        return Err(Error::spanless(UnmatchedExcludedCase {
            index: index.to_string(),
            value: value.to_string(),
        }));
    }

    let mut collected = Vec::new();
    for term in expr.terms() {
        for (cases, extra) in extra_terms_single_term(term, indices, excluded)? {
            let renumbered = renumber_indices(&extra, &cases, indices);
            collected.push(insert_moments(&renumbered, indices));
            step_collector.push(ExtraTermStep { cases, term: extra });
        }
    }

    Ok(remaining_terms(&collected, correlations))
}

#[cfg(test)]
mod tests {
    use isr_compute::model::{OneParticleOperator, OperatorKind};
    use pretty_assertions::assert_eq;
    use super::*;

    fn op(comp: &str) -> OneParticleOperator {
        OneParticleOperator::new(comp, OperatorKind::ElectricDipole).unwrap()
    }

    fn tm(from: &str, comp: &str, to: &str) -> SymExpr {
        SymExpr::transition_moment(from, op(comp), to)
    }

    fn moment(comp: &str, to: &str) -> SymExpr {
        SymExpr::Primary(Primary::Moment(Moment::of(&op(comp), StateLabel::ground(), to.into())))
    }

    fn tf(state: &str) -> SymExpr {
        SymExpr::transition_frequency(state)
    }

    fn w(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    fn indices(labels: &[&str]) -> Vec<StateLabel> {
        labels.iter().map(|label| StateLabel::from(*label)).collect()
    }

    #[test]
    fn cases_of_two_photon_term() {
        let term = tm("0", "a", "n") * tm("n", "b", "f") / (tf("n") - w("w"));
        let cases = special_cases(&term, &indices(&["n"]), &[]);
        assert_eq!(cases, vec![
            ("n".into(), StateLabel::ground()),
            ("n".into(), "f".into()),
        ]);

        let excluded = [("n".into(), "f".into())];
        assert_eq!(special_cases(&term, &indices(&["n"]), &excluded).len(), 1);
    }

    #[test]
    fn ground_state_case() {
        let term = tm("0", "a", "n") * tm("n", "b", "0") / (tf("n") - w("w"));
        let found = extra_terms_single_term(&term, &indices(&["n"]), &[]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, vec![("n".into(), StateLabel::ground())]);
        let den = SymExpr::Exp(Box::new(SymExpr::int(-1) * w("w")), Box::new(SymExpr::int(-1)));
        assert_eq!(found[0].1, tm("0", "a", "0") * tm("0", "b", "0") * den);
    }

    #[test]
    fn coincident_state_case() {
        let term = tm("f", "a", "n") * tm("n", "b", "0") / (tf("n") - w("w"));
        let extra = coincidence_case(&term, &"n".into(), &"f".into());
        assert_eq!(extra, tm("0", "a", "0") * tm("f", "b", "0") * (tf("f") - w("w")).recip());
    }

    #[test]
    fn static_expression() {
        let term = tm("0", "a", "n") * tm("n", "b", "0") / tf("n");
        let err = extra_terms_single_term(&term, &indices(&["n"]), &[]).unwrap_err();
        assert!(err.is::<StaticExtraTerms>());
    }

    #[test]
    fn sums_are_not_single_terms() {
        let err = extra_terms_single_term(&(w("a") + w("b")), &indices(&["n"]), &[]).unwrap_err();
        assert!(err.is::<UnsupportedTerm>());
    }

    #[test]
    fn nested_cases() {
        let term = tm("0", "a", "n") * tm("n", "b", "k") * tm("k", "c", "0")
            / ((tf("n") - w("w_o")) * (tf("k") - w("w_2")));
        let found = extra_terms_single_term(&term, &indices(&["n", "k"]), &[]).unwrap();

        let keys = found.iter().map(|(cases, _)| cases.clone()).collect::<Vec<_>>();
        assert!(keys.contains(&vec![("n".into(), "0".into())]));
        assert!(keys.contains(&vec![("n".into(), "k".into())]));
        assert!(keys.contains(&vec![("n".into(), "0".into()), ("k".into(), "0".into())]));
        assert!(keys.contains(&vec![("k".into(), "0".into())]));

        // no two reported terms are equal
        for (idx, (_, term)) in found.iter().enumerate() {
            assert!(found[idx + 1..].iter().all(|(_, other)| other != term));
        }
    }

    #[test]
    fn moments_and_renumbering() {
        let term = tm("0", "a", "0") * tm("0", "b", "k") * tm("k", "c", "f");
        let cases = [("n".into(), StateLabel::ground())];
        let renumbered = renumber_indices(&term, &cases, &indices(&["n", "k"]));
        assert_eq!(renumbered, tm("0", "a", "0") * tm("0", "b", "n") * tm("n", "c", "f"));
        assert_eq!(
            insert_moments(&renumbered, &indices(&["n", "k"])),
            moment("a", "0") * tm("0", "b", "n") * tm("n", "c", "f"),
        );
    }

    #[test]
    fn excluded_case_must_arise() {
        let term = tm("0", "a", "n") * tm("n", "b", "f") / (tf("n") - w("w"));
        let excluded = [("n".into(), "k".into())];
        let err = compute_extra_terms(&term, &indices(&["n"]), &excluded, &[], &mut ()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnmatchedExcludedCase>(),
            Some(&UnmatchedExcludedCase { index: "n".to_owned(), value: "k".to_owned() }),
        );

        let excluded = [("n".into(), "f".into())];
        let extra = compute_extra_terms(&term, &indices(&["n"]), &excluded, &[], &mut ()).unwrap();
        assert_eq!(extra.terms().len(), 1);
    }

    #[test]
    fn negated_numerators_cancel() {
        let numerator = moment("a", "0") * moment("b", "0");
        let terms = [
            numerator.clone() / (SymExpr::int(-1) * w("w")),
            numerator.clone() / w("w"),
        ];
        assert_eq!(remaining_terms(&terms, &[]), SymExpr::zero());

        let terms = [
            numerator.clone() / w("w_o"),
            -numerator / (w("w_1") + w("w_2")),
        ];
        assert_ne!(remaining_terms(&terms, &[]), SymExpr::zero());
        let correlations = [(w("w_o"), w("w_1") + w("w_2"))];
        assert_eq!(remaining_terms(&terms, &correlations), SymExpr::zero());
    }
}
