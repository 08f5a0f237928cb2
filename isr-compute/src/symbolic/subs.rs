//! Substitution of sub-expressions and relabeling of states.
//!
//! Patterns are matched with strict equality. Besides matching whole sub-expressions, a product
//! pattern matches inside a larger product, and a sum pattern matches inside a larger sum:
//!
//! - `a*b` matches `a*c*b`, since `a` and `b` commute with `c`.
//! - `<0|*mu_x` matches `w * <0|*mu_x*|n>`, but not `<0|*|n>*mu_x`.
//! - `a+b` matches `a+c+b`.
//!
//! Substituted expressions are rebuilt with the arithmetic operators, so nested products and sums
//! are flattened into their parents.

use crate::model::StateLabel;
use super::expr::{Primary, SymExpr};

/// A child of a sum or product that is being matched against a pattern.
#[derive(Debug, Clone)]
enum Slot {
    /// A child of the original expression that has not been matched yet.
    Original(SymExpr),

    /// A replacement inserted in place of a match.
    Replaced(SymExpr),
}

impl Slot {
    fn expr(&self) -> &SymExpr {
        match self {
            Self::Original(expr) | Self::Replaced(expr) => expr,
        }
    }

    fn original(&self) -> Option<&SymExpr> {
        match self {
            Self::Original(expr) => Some(expr),
            Self::Replaced(_) => None,
        }
    }
}

/// Finds a distinct unmatched slot for every pattern element among the slots at the given
/// indices, in any order.
fn match_multiset(slots: &[Slot], candidates: &[usize], pattern: &[&SymExpr]) -> Option<Vec<usize>> {
    let mut used = Vec::with_capacity(pattern.len());
    for element in pattern {
        let idx = candidates.iter()
            .copied()
            .find(|idx| !used.contains(idx) && slots[*idx].original() == Some(*element))?;
        used.push(idx);
    }
    Some(used)
}

/// Finds the slots matching a product pattern: the commutative factors of the pattern in any
/// order, and the non-commutative factors of the pattern as a contiguous run of the
/// non-commutative factors of the product.
///
/// Returns the matched slots, with the slot that should receive the replacement first.
fn match_product(slots: &[Slot], pattern: &[SymExpr]) -> Option<Vec<usize>> {
    let (commutative, ordered): (Vec<_>, Vec<_>) = pattern.iter().partition(|f| f.is_commutative());
    let (comm_slots, nc_slots): (Vec<usize>, Vec<usize>) = (0..slots.len())
        .partition(|idx| slots[*idx].expr().is_commutative());

    let mut matched = Vec::with_capacity(pattern.len());
    if !ordered.is_empty() {
        let run = nc_slots.windows(ordered.len())
            .find(|window| {
                window.iter()
                    .zip(&ordered)
                    .all(|(idx, element)| slots[*idx].original() == Some(*element))
            })?;
        matched.extend_from_slice(run);
    }

    matched.extend(match_multiset(slots, &comm_slots, &commutative)?);
    Some(matched)
}

/// Replaces every match of `pattern` among the slots, until there are none left.
fn replace_matches(
    slots: &mut Vec<Slot>,
    new: &SymExpr,
    find: impl Fn(&[Slot]) -> Option<Vec<usize>>,
) {
    while let Some(mut matched) = find(slots) {
        let Some(&target) = matched.first() else {
            return;
        };
        slots[target] = Slot::Replaced(new.clone());

        // remove from the back so that earlier indices stay valid
        matched.sort_unstable();
        for idx in matched.into_iter().rev() {
            if idx != target {
                slots.remove(idx);
            }
        }
    }
}

/// Replaces every occurrence of `old` in `expr` with `new`.
pub fn subs(expr: &SymExpr, old: &SymExpr, new: &SymExpr) -> SymExpr {
    if expr == old {
        return new.clone();
    }

    match expr {
        SymExpr::Primary(_) => expr.clone(),
        SymExpr::Add(terms) => {
            let mut slots = terms.iter().cloned().map(Slot::Original).collect::<Vec<_>>();
            if let SymExpr::Add(pattern) = old {
                let pattern = pattern.iter().collect::<Vec<_>>();
                replace_matches(&mut slots, new, |slots| {
                    let all = (0..slots.len()).collect::<Vec<_>>();
                    match_multiset(slots, &all, &pattern)
                });
            }

            slots.into_iter()
                .map(|slot| match slot {
                    Slot::Original(term) => subs(&term, old, new),
                    Slot::Replaced(term) => term,
                })
                .fold(SymExpr::Add(Vec::new()), |acc, term| acc + term)
                .downgrade()
        },
        SymExpr::Mul(factors) => {
            let mut slots = factors.iter().cloned().map(Slot::Original).collect::<Vec<_>>();
            if let SymExpr::Mul(pattern) = old {
                replace_matches(&mut slots, new, |slots| match_product(slots, pattern));
            }

            slots.into_iter()
                .map(|slot| match slot {
                    Slot::Original(factor) => subs(&factor, old, new),
                    Slot::Replaced(factor) => factor,
                })
                .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor)
                .downgrade()
        },
        SymExpr::Exp(base, exp) => SymExpr::Exp(
            Box::new(subs(base, old, new)),
            Box::new(subs(exp, old, new)),
        ),
    }
}

/// Applies each substitution in turn.
pub fn subs_all(expr: &SymExpr, substitutions: &[(SymExpr, SymExpr)]) -> SymExpr {
    substitutions.iter()
        .fold(expr.clone(), |acc, (old, new)| subs(&acc, old, new))
}

/// Normalizes a substitution `c*s -> new`, where `c` is a rational number and `s` is a leaf, into
/// `s -> new/c`.
fn normalize(old: &SymExpr, new: &SymExpr) -> (SymExpr, SymExpr) {
    let (coefficient, rest) = old.split_coefficient();
    if coefficient != 1 && coefficient != 0 && matches!(rest, SymExpr::Primary(_)) {
        (rest, SymExpr::rational(coefficient.recip()) * new.clone())
    } else {
        (old.clone(), new.clone())
    }
}

/// Applies all substitutions at once, such that the result of one substitution is never matched
/// by another. This makes it possible to swap two symbols.
///
/// A substitution `-w -> x` is treated as `w -> -x`.
pub fn subs_simultaneous(expr: &SymExpr, substitutions: &[(SymExpr, SymExpr)]) -> SymExpr {
    let normalized = substitutions.iter()
        .map(|(old, new)| normalize(old, new))
        .collect::<Vec<_>>();

    // these names cannot be produced by the parser
    let placeholders = (0..normalized.len())
        .map(|idx| SymExpr::symbol(format!("#{}", idx)))
        .collect::<Vec<_>>();

    let hidden = normalized.iter()
        .zip(&placeholders)
        .fold(expr.clone(), |acc, ((old, _), placeholder)| subs(&acc, old, placeholder));
    normalized.iter()
        .zip(&placeholders)
        .fold(hidden, |acc, ((_, new), placeholder)| subs(&acc, placeholder, new))
}

/// Relabels the states of every bra, ket, transition frequency and transition moment at once.
/// States without an entry in `map` keep their label.
pub fn relabel_states(expr: &SymExpr, map: &[(StateLabel, StateLabel)]) -> SymExpr {
    let relabel = |state: &StateLabel| {
        map.iter()
            .find(|(from, _)| from == state)
            .map_or_else(|| state.clone(), |(_, to)| to.clone())
    };

    fn relabel_primary(primary: &Primary, relabel: &impl Fn(&StateLabel) -> StateLabel) -> Primary {
        match primary {
            Primary::Bra(state) => Primary::Bra(relabel(state)),
            Primary::Ket(state) => Primary::Ket(relabel(state)),
            Primary::TransitionFrequency(state) => Primary::TransitionFrequency(relabel(state)),
            Primary::Moment(moment) => Primary::Moment(moment.map_states(relabel)),
            Primary::Adjoint(inner) => Primary::Adjoint(Box::new(relabel_primary(inner, relabel))),
            primary => primary.clone(),
        }
    }

    expr.map_primaries(&mut |primary| Some(SymExpr::Primary(relabel_primary(primary, &relabel))))
}
