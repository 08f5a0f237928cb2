//! Numeric probing of symbolic expressions.
//!
//! Strict equality cannot tell that `(w_n - w)^-1 - (w_n - w)^-1 * (w_n - w) * (w_n - w)^-1` is
//! zero. Instead of implementing a complete simplifier, this module decides such questions by
//! evaluating the scalar part of an expression at random sample points, with every scalar symbol
//! taking a random real value. For the rational functions that appear in response expressions, a
//! nonzero expression vanishing at all sample points is practically impossible.

use crate::consts::{I, ZERO_TOLERANCE};
use crate::primitive::{complex, float};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rug::{ops::Pow, Complex, Float};
use super::expr::{Primary, SymExpr};

/// The number of sample points at which [`is_zero`] evaluates an expression.
pub const SAMPLE_POINTS: u64 = 3;

/// The seed of the first sample point.
const SEED: u64 = 0x5e1f_c0de;

/// Values assigned to the leaves of expressions.
///
/// Leaves without an assigned value receive a random real value in `[0.5, 2.5)` the first time
/// they are evaluated, and keep that value afterwards.
#[derive(Debug, Clone)]
pub struct Ctxt {
    /// The assigned values.
    values: Vec<(Primary, Complex)>,

    /// The source of values for leaves that have not been assigned.
    rng: StdRng,
}

impl Ctxt {
    /// Creates a context whose random values are drawn from the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self { values: Vec::new(), rng: StdRng::seed_from_u64(seed) }
    }

    /// Assigns a value to a leaf, replacing any previous value.
    #[cfg(test)]
    pub fn set(&mut self, primary: Primary, value: Complex) {
        match self.values.iter_mut().find(|(key, _)| *key == primary) {
            Some((_, old)) => *old = value,
            None => self.values.push((primary, value)),
        }
    }

    /// Returns the value of a leaf, assigning a random value if it has none. Returns [`None`] for
    /// non-commutative leaves, which have no scalar value.
    fn value_of(&mut self, primary: &Primary) -> Option<Complex> {
        match primary {
            Primary::Integer(n) => return Some(complex(n)),
            Primary::Symbol(_) if SymExpr::Primary(primary.clone()).is_imaginary_unit() => {
                return Some(I.clone());
            },
            Primary::Adjoint(inner) if inner.is_commutative() => {
                return self.value_of(inner).map(Complex::conj);
            },
            primary if !primary.is_commutative() => return None,
            _ => (),
        }

        if let Some((_, value)) = self.values.iter().find(|(key, _)| key == primary) {
            return Some(value.clone());
        }

        let value = complex(self.rng.gen_range(0.5..2.5));
        self.values.push((primary.clone(), value.clone()));
        Some(value)
    }

    /// Evaluates a commutative expression.
    ///
    /// Returns [`None`] if the expression contains a non-commutative leaf, or a non-positive
    /// power of zero.
    pub fn eval(&mut self, expr: &SymExpr) -> Option<Complex> {
        match expr {
            SymExpr::Primary(primary) => self.value_of(primary),
            SymExpr::Add(terms) => terms.iter()
                .try_fold(complex(0), |acc, term| Some(acc + self.eval(term)?)),
            SymExpr::Mul(factors) => factors.iter()
                .try_fold(complex(1), |acc, factor| Some(acc * self.eval(factor)?)),
            SymExpr::Exp(base, exp) => {
                let base = self.eval(base)?;
                if let Some(n) = exp.as_integer().and_then(|n| n.to_i32()) {
                    if n < 0 && base.is_zero() {
                        return None;
                    }
                    return Some(base.pow(n));
                }

                let exp = self.eval(exp)?;
                if base.is_zero() {
                    return None;
                }
                Some(base.pow(&exp))
            },
        }
    }
}

/// Returns true if both components of the value are finite.
fn is_finite(value: &Complex) -> bool {
    value.real().is_finite() && value.imag().is_finite()
}

/// Returns the magnitude of a complex value as a real number.
fn magnitude(value: &Complex) -> Float {
    float(value.abs_ref())
}

/// Splits a term into its scalar part, and its non-commutative factors in order.
fn split_scalar(term: &SymExpr) -> (SymExpr, Vec<SymExpr>) {
    let (scalar, ordered): (Vec<_>, Vec<_>) = term.factors()
        .iter()
        .cloned()
        .partition(SymExpr::is_commutative);
    (SymExpr::Mul(scalar).downgrade(), ordered)
}

/// Groups the terms of an expression by their non-commutative factors. The scalar parts of terms
/// in the same group are added together.
fn group_terms(expr: &SymExpr) -> Vec<(Vec<SymExpr>, Vec<SymExpr>)> {
    let mut groups: Vec<(Vec<SymExpr>, Vec<SymExpr>)> = Vec::new();
    for term in expr.terms() {
        let (scalar, ordered) = split_scalar(term);
        match groups.iter_mut().find(|(key, _)| *key == ordered) {
            Some((_, scalars)) => scalars.push(scalar),
            None => groups.push((ordered, vec![scalar])),
        }
    }
    groups
}

/// Returns true if the scalars sum to zero in the given context, relative to the size of the
/// individual scalars.
fn sums_to_zero(ctxt: &mut Ctxt, scalars: &[SymExpr]) -> bool {
    let mut sum = complex(0);
    let mut scale = float(0);
    for scalar in scalars {
        let Some(value) = ctxt.eval(scalar) else {
            return false;
        };
        if !is_finite(&value) {
            return false;
        }
        scale = scale.max(&magnitude(&value));
        sum += value;
    }

    magnitude(&sum) <= scale * &*ZERO_TOLERANCE
}

/// Returns true if the expression is zero.
///
/// The terms of the expression are grouped by their sequence of non-commutative factors (compared
/// with strict equality), and the summed scalar coefficient of each group is evaluated at
/// [`SAMPLE_POINTS`] seeded random points. Values that cannot be evaluated, such as divisions by
/// zero, count as nonzero.
pub fn is_zero(expr: &SymExpr) -> bool {
    let groups = group_terms(expr);
    (0..SAMPLE_POINTS).all(|point| {
        let mut ctxt = Ctxt::seeded(SEED + point);
        groups.iter().all(|(_, scalars)| sums_to_zero(&mut ctxt, scalars))
    })
}

/// Returns true if both expressions are equal.
pub fn equivalent(lhs: &SymExpr, rhs: &SymExpr) -> bool {
    is_zero(&(lhs.clone() - rhs.clone()))
}
