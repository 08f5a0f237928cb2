//! Structural matching of the non-commutative factors of a single product term.
//!
//! Commutative factors (numbers, frequencies, plain transition moments) may sit anywhere in a
//! product, so matching only looks at the sequence of non-commutative factors. Positions reported
//! by this module are indices into the full factor list of the term.

use isr_compute::model::{OneParticleOperator, StateLabel};
use isr_compute::symbolic::{Primary, SymExpr};

/// A transition moment `<bra|op|ket>` written as three consecutive non-commutative factors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraOpKet {
    /// The positions of the bra, the operator and the ket in the factor list.
    pub positions: [usize; 3],

    /// The state of the bra.
    pub bra: StateLabel,

    /// The operator.
    pub op: OneParticleOperator,

    /// The state of the ket.
    pub ket: StateLabel,
}

/// A ket immediately followed by a bra of the same state, `|n><n|`, marking where a resolvent is
/// inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KetBra {
    /// The positions of the ket and the bra in the factor list.
    pub positions: [usize; 2],

    /// The state of both the ket and the bra.
    pub state: StateLabel,
}

/// The result of matching a term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermMatch {
    /// The transition moments, from left to right.
    pub transition_moments: Vec<BraOpKet>,

    /// The ket-bra pairs, from left to right.
    pub ket_bras: Vec<KetBra>,
}

/// Returns the positions of the non-commutative factors of the term, in order.
pub fn noncommutative_positions(factors: &[SymExpr]) -> Vec<usize> {
    factors.iter()
        .enumerate()
        .filter(|(_, factor)| !factor.is_commutative())
        .map(|(idx, _)| idx)
        .collect()
}

/// Matches the transition moments and ket-bra pairs of a single term in one scan over its
/// non-commutative factors.
///
/// Terms without any transition moment (for example, state-to-state terms that were already
/// rewritten) simply produce an empty list.
pub fn match_term(term: &SymExpr) -> TermMatch {
    let factors = term.factors();
    let positions = noncommutative_positions(factors);
    let primary = |idx: usize| positions.get(idx).and_then(|pos| factors[*pos].as_primary());

    let mut result = TermMatch::default();
    for idx in 0..positions.len() {
        match (primary(idx), primary(idx + 1), primary(idx + 2)) {
            (Some(Primary::Bra(bra)), Some(Primary::Operator(op)), Some(Primary::Ket(ket))) => {
                result.transition_moments.push(BraOpKet {
                    positions: [positions[idx], positions[idx + 1], positions[idx + 2]],
                    bra: bra.clone(),
                    op: op.clone(),
                    ket: ket.clone(),
                });
            },
            (Some(Primary::Ket(ket)), Some(Primary::Bra(bra)), _) if ket == bra => {
                result.ket_bras.push(KetBra {
                    positions: [positions[idx], positions[idx + 1]],
                    state: ket.clone(),
                });
            },
            _ => (),
        }
    }

    result
}

/// Returns the operators of the term, in order of first appearance.
pub fn operators(term: &SymExpr) -> Vec<OneParticleOperator> {
    let mut ops: Vec<OneParticleOperator> = Vec::new();
    for expr in term.post_order_iter() {
        if let Some(Primary::Operator(op)) = expr.as_primary() {
            if !ops.contains(op) {
                ops.push(op.clone());
            }
        }
    }
    ops
}

/// Returns every state that labels a bra or ket of the expression, in order of first appearance.
pub fn states(expr: &SymExpr) -> Vec<StateLabel> {
    let mut states: Vec<StateLabel> = Vec::new();
    for expr in expr.post_order_iter() {
        if let Some(Primary::Bra(state) | Primary::Ket(state)) = expr.as_primary() {
            if !states.contains(state) {
                states.push(state.clone());
            }
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use isr_compute::model::OperatorKind;
    use pretty_assertions::assert_eq;
    use super::*;

    fn op(comp: &str) -> OneParticleOperator {
        OneParticleOperator::new(comp, OperatorKind::ElectricDipole).unwrap()
    }

    #[test]
    fn transition_moments_and_ket_bras() {
        let term = SymExpr::transition_moment("0", op("a"), "n")
            * SymExpr::transition_moment("n", op("b"), "0")
            * (SymExpr::transition_frequency("n") - SymExpr::symbol("w")).recip();
        let matched = match_term(&term);

        assert_eq!(matched.transition_moments.len(), 2);
        assert_eq!(matched.transition_moments[0].bra, StateLabel::ground());
        assert_eq!(matched.transition_moments[0].ket, "n".into());
        assert_eq!(matched.transition_moments[1].positions, [3, 4, 5]);
        assert_eq!(matched.ket_bras, vec![KetBra { positions: [2, 3], state: "n".into() }]);
    }

    #[test]
    fn commutative_factors_in_between() {
        let term = SymExpr::bra("0")
            * SymExpr::symbol("c")
            * SymExpr::Primary(Primary::Operator(op("a")))
            * SymExpr::ket("n")
            * SymExpr::int(2)
            * SymExpr::bra("m");
        let matched = match_term(&term);

        assert_eq!(matched.transition_moments[0].positions, [0, 2, 3]);
        assert!(matched.ket_bras.is_empty());
    }

    #[test]
    fn no_transition_moment() {
        let term = SymExpr::symbol("c") * SymExpr::transition_frequency("n");
        assert_eq!(match_term(&term), TermMatch::default());
    }

    #[test]
    fn collect_operators_and_states() {
        let expr = SymExpr::transition_moment("0", op("a"), "n") * SymExpr::transition_moment("n", op("b"), "f")
            + SymExpr::transition_moment("0", op("b"), "n") * SymExpr::transition_moment("n", op("a"), "f");
        assert_eq!(operators(&expr), vec![op("a"), op("b")]);
        assert_eq!(states(&expr), vec!["0".into(), "n".into(), "f".into()]);
    }
}
