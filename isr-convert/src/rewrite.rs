//! Rewriting of a single sum-over-states term into its ISR formulation.
//!
//! Rewriting happens in two passes over the non-commutative factors of the term:
//!
//! 1. [`insert_isr_transition_moments`] replaces `<0|op` with the adjoint of the modified
//! transition moment `F(op)`, `op|0>` with `F(op)`, and every other operator with the
//! state-to-state modified transition moment `B(op)`.
//! 2. [`insert_matrix`] replaces every ket-bra pair `|n><n|` with the resolvent `(M + r)^-1`, where
//! `(w_n + r)^-1` is the energy denominator of the term that depends on `w_n`. That denominator is
//! removed from the term.
//!
//! The ground state never receives a resolvent; `|0><0|` is left in place.

use crate::error::{
    DuplicateDenominator,
    InvalidDenominator,
    MissingDenominator,
    MultipleTransitionFrequencies,
};
use crate::matcher::{self, noncommutative_positions, KetBra};
use isr_compute::model::{Mtm, OneParticleOperator, S2sMtm};
use isr_compute::symbolic::{simplify, Primary, SymExpr};
use isr_error::Error;
use log::{debug, warn};
use rug::Rational;

/// Rebuilds a product from the remaining factors.
fn rebuild(factors: Vec<Option<SymExpr>>) -> SymExpr {
    factors.into_iter()
        .flatten()
        .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor)
        .downgrade()
}

/// Replaces the one-particle operators of the term with their ISR counterparts.
///
/// Only the given operators are replaced.
pub fn insert_isr_transition_moments(term: &SymExpr, operators: &[OneParticleOperator]) -> SymExpr {
    let mut factors = term.factors().iter().cloned().map(Some).collect::<Vec<_>>();
    let positions = noncommutative_positions(term.factors());
    let is_ground = |factor: &Option<SymExpr>, bra: bool| match factor.as_ref().and_then(SymExpr::as_primary) {
        Some(Primary::Bra(state)) if bra => state.is_ground(),
        Some(Primary::Ket(state)) if !bra => state.is_ground(),
        _ => false,
    };

    let mut changed = false;
    for (idx, &pos) in positions.iter().enumerate() {
        let op = match factors[pos].as_ref().and_then(SymExpr::as_primary) {
            Some(Primary::Operator(op)) if operators.contains(op) => op.clone(),
            _ => continue,
        };
        changed = true;

        let prev = idx.checked_sub(1).map(|idx| positions[idx]);
        let next = positions.get(idx + 1).copied();
        if let Some(prev) = prev.filter(|prev| is_ground(&factors[*prev], true)) {
            factors[prev] = Some(SymExpr::Primary(Primary::Mtm(Mtm::from(&op)).adjoint()));
            factors[pos] = None;
        } else if let Some(next) = next.filter(|next| is_ground(&factors[*next], false)) {
            factors[pos] = Some(SymExpr::Primary(Primary::Mtm(Mtm::from(&op))));
            factors[next] = None;
        } else {
            factors[pos] = Some(SymExpr::Primary(Primary::S2sMtm(S2sMtm::from(&op))));
        }
    }

    if !changed {
        warn!("term contains no transition moment: {}", term);
        return term.clone();
    }

    rebuild(factors)
}

/// A denominator of a term, `base^exp` with a negative integer exponent.
struct Denominator<'a> {
    position: usize,
    base: &'a SymExpr,
    exp: &'a SymExpr,
}

/// Returns the denominators of the factors.
fn denominators(factors: &[SymExpr]) -> Vec<Denominator<'_>> {
    factors.iter()
        .enumerate()
        .filter_map(|(position, factor)| match factor {
            SymExpr::Exp(base, exp) if exp.as_integer().map_or(false, |n| *n < 0) => {
                Some(Denominator { position, base: &**base, exp: &**exp })
            },
            _ => None,
        })
        .collect()
}

/// A denominator `c*w_n + r` that was matched to the ket-bra pair of state `n`.
struct Resolvent {
    /// The position of the denominator in the factor list.
    position: usize,

    /// The coefficient `c` of the transition frequency.
    coefficient: Rational,

    /// The terms of `r`.
    rest: Vec<SymExpr>,
}

/// Splits the denominator into the coefficient of the transition frequency of the ket-bra pair
/// and the remaining terms.
///
/// Returns [`None`] if the denominator does not depend on that transition frequency.
fn split_denominator(ket_bra: &KetBra, den: &Denominator) -> Result<Option<Resolvent>, Error> {
    let is_frequency = |expr: &SymExpr| expr.as_transition_frequency() == Some(&ket_bra.state);
    if !den.base.contains(is_frequency) {
        return Ok(None);
    }

    let invalid = || Error::spanless(InvalidDenominator {
        state: ket_bra.state.to_string(),
        denominator: den.base.to_string(),
    });
    if !den.exp.as_integer().map_or(false, |n| *n == -1) {
        return Err(invalid());
    }

    let mut coefficient = None;
    let mut rest = Vec::new();
    for term in den.base.terms() {
        let (term_coefficient, term_rest) = term.split_coefficient();
        if is_frequency(&term_rest) {
            if coefficient.is_some() {
                return Err(Error::spanless(MultipleTransitionFrequencies {
                    state: ket_bra.state.to_string(),
                    denominator: den.base.to_string(),
                }));
            }
            coefficient = Some(term_coefficient);
        } else if term.contains(is_frequency) {
            return Err(invalid());
        } else {
            rest.push(term.clone());
        }
    }

    match coefficient {
        Some(coefficient) if coefficient != 0 => Ok(Some(Resolvent {
            position: den.position,
            coefficient,
            rest,
        })),
        _ => Err(invalid()),
    }
}

/// Finds the unique denominator of the term that depends on the transition frequency of the
/// ket-bra pair.
fn find_resolvent(ket_bra: &KetBra, dens: &[Denominator]) -> Result<Resolvent, Error> {
    let mut found = None;
    for den in dens {
        if let Some(resolvent) = split_denominator(ket_bra, den)? {
            if found.is_some() {
                return Err(Error::spanless(DuplicateDenominator {
                    state: ket_bra.state.to_string(),
                }));
            }
            found = Some(resolvent);
        }
    }

    found.ok_or_else(|| Error::spanless(MissingDenominator {
        state: ket_bra.state.to_string(),
    }))
}

/// Replaces every ket-bra pair `|n><n|` of an excited state with the resolvent of the response
/// matrix, and removes the matching energy denominator.
///
/// A denominator `c*w_n + r` becomes `1/c * (M + r/c)^-1`.
pub fn insert_matrix(term: &SymExpr) -> Result<SymExpr, Error> {
    let ket_bras = matcher::match_term(term).ket_bras;
    let dens = denominators(term.factors());

    let mut factors = term.factors().iter().cloned().map(Some).collect::<Vec<_>>();
    let mut scale = Rational::from(1);
    let mut claimed = Vec::new();
    for ket_bra in &ket_bras {
        if ket_bra.state.is_ground() {
            debug!("Ground state RI");
            continue;
        }

        let resolvent = find_resolvent(ket_bra, &dens)?;
        if claimed.contains(&resolvent.position) {
            return Err(Error::spanless(MultipleTransitionFrequencies {
                state: ket_bra.state.to_string(),
                denominator: term.factors()[resolvent.position].to_string(),
            }));
        }
        claimed.push(resolvent.position);

        let inverse = resolvent.coefficient.recip();
        let matrix = resolvent.rest.into_iter()
            .map(|term| {
                if inverse == 1 {
                    term
                } else {
                    simplify(&(SymExpr::rational(inverse.clone()) * term))
                }
            })
            .fold(SymExpr::matrix(), |acc, term| acc + term);

        let [ket, bra] = ket_bra.positions;
        factors[ket] = None;
        factors[bra] = Some(matrix.recip());
        factors[resolvent.position] = None;
        scale *= inverse;
    }

    let rewritten = rebuild(factors);
    if scale == 1 {
        Ok(rewritten)
    } else {
        Ok(SymExpr::rational(scale) * rewritten)
    }
}

/// Converts a single sum-over-states term into its ISR formulation.
///
/// If no operators are given, every operator of the term is replaced.
pub fn to_isr_single_term(term: &SymExpr, operators: &[OneParticleOperator]) -> Result<SymExpr, Error> {
    let found;
    let operators: &[OneParticleOperator] = if operators.is_empty() {
        found = matcher::operators(term);
        &found
    } else {
        operators
    };

    insert_matrix(&insert_isr_transition_moments(term, operators))
}
