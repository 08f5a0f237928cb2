//! A representation of response expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](isr_parser::parser::ast::expr::Expr) type from `isr_parser` mirrors the written
//! notation, which is convenient for parsing and error reporting, but not for rewriting. This
//! module defines [`SymExpr`], which recursively flattens sums and products into lists of terms
//! and factors, normalizing the expression into a sum of products.
//!
//! # Non-commutative factors
//!
//! Bras, kets, operators, ISR operator symbols, response vectors and the response matrix do not
//! commute with each other. Products therefore keep their factors **in the order they were
//! multiplied**, and every operation in this module preserves the relative order of the
//! non-commutative factors of a product. Commutative factors (numbers, frequencies, plain
//! transition moments) may be moved freely.
//!
//! # Strict equality
//!
//! Deciding whether two expressions are mathematically equal requires simplification, and
//! simplification needs to know which terms are equal. To break the cycle, the [`PartialEq`] and
//! [`Eq`] implementations for [`SymExpr`] implement **strict equality**. Two expressions are
//! strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//! [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have equal values.
//! - If both are [`SymExpr::Add`], both expressions must have strictly equal terms, in any order.
//! - If both are [`SymExpr::Mul`], both expressions must have strictly equal commutative factors,
//! in any order, and strictly equal non-commutative factors, in the same order.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality never reports false positives, but `w + w` and `2w` are not strictly equal.
//! Use [`numeric::is_zero`](super::numeric::is_zero) to decide mathematical equality.

mod convert;
mod iter;

pub use convert::from_ast;
pub use iter::ExprIter;

use crate::consts::{IMAGINARY_UNIT, MATRIX};
use crate::model::{Moment, Mtm, OneParticleOperator, ResponseVector, S2sMtm, StateLabel};
use crate::primitive::int;
use isr_parser::parser::{ast::BinOpKind, Precedence};
use rug::{ops::Pow, Integer, Rational};
use std::{cmp::Ordering, fmt, ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single term / factor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An integer, such as `2` or `-1`.
    Integer(Integer),

    /// A real scalar symbol, such as `w` or `gamma`. The symbol `i` is the imaginary unit.
    Symbol(String),

    /// The excitation energy of a state, `w_n`.
    TransitionFrequency(StateLabel),

    /// A transition moment that involves the ground state, as a plain scalar.
    Moment(Moment),

    /// The bra `<n|`.
    Bra(StateLabel),

    /// The ket `|n>`.
    Ket(StateLabel),

    /// A one-particle operator between a bra and a ket.
    Operator(OneParticleOperator),

    /// A modified transition moment.
    Mtm(Mtm),

    /// A state-to-state modified transition moment.
    S2sMtm(S2sMtm),

    /// A response vector.
    ResponseVector(ResponseVector),

    /// The response matrix.
    Matrix(String),

    /// The adjoint of another primary.
    Adjoint(Box<Primary>),
}

impl Primary {
    /// Returns true if this primary commutes with every other primary.
    pub fn is_commutative(&self) -> bool {
        match self {
            Self::Integer(_) | Self::Symbol(_) | Self::TransitionFrequency(_) | Self::Moment(_) => true,
            Self::Bra(_)
                | Self::Ket(_)
                | Self::Operator(_)
                | Self::Mtm(_)
                | Self::S2sMtm(_)
                | Self::ResponseVector(_)
                | Self::Matrix(_) => false,
            Self::Adjoint(inner) => inner.is_commutative(),
        }
    }

    /// Returns the adjoint of this primary. The adjoint of an adjoint is the original primary.
    pub fn adjoint(self) -> Self {
        match self {
            Self::Adjoint(inner) => *inner,
            primary => Self::Adjoint(Box::new(primary)),
        }
    }

    /// If this primary is an adjoint, returns the primary inside it.
    pub fn unadjoint(&self) -> (&Self, bool) {
        match self {
            Self::Adjoint(inner) => (inner, true),
            primary => (primary, false),
        }
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::TransitionFrequency(state) => write!(f, "w_{}", state),
            Self::Moment(moment) => write!(f, "{}", moment),
            Self::Bra(state) => write!(f, "<{}|", state),
            Self::Ket(state) => write!(f, "|{}>", state),
            Self::Operator(op) => write!(f, "{}", op),
            Self::Mtm(mtm) => write!(f, "{}", mtm),
            Self::S2sMtm(mtm) => write!(f, "{}", mtm),
            Self::ResponseVector(vector) => write!(f, "{}", vector),
            Self::Matrix(name) => write!(f, "{}", name),
            Self::Adjoint(inner) => write!(f, "adjoint({})", inner),
        }
    }
}

/// Adds two [`Primary`]s together. If both are integers, the integers are added together.
/// Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Add`].
impl Add<Primary> for Primary {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs + rhs))
            },
            (lhs, rhs) => SymExpr::Add(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// An expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together, in order.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    if matches!(factor.cmp_precedence(self), Ordering::Less) {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                    for factor in iter {
                        if matches!(factor.cmp_precedence(self), Ordering::Less) {
                            write!(f, " * ({})", factor)?;
                        } else {
                            write!(f, " * {}", factor)?;
                        }
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                if matches!(base.cmp_precedence(self), Ordering::Greater) {
                    write!(f, "{}", base)?;
                } else {
                    write!(f, "({})", base)?;
                }
                write!(f, "^")?;
                if matches!(exp.cmp_precedence(self), Ordering::Greater) {
                    write!(f, "{}", exp)
                } else {
                    write!(f, "({})", exp)
                }
            },
        }
    }
}

impl SymExpr {
    /// An integer.
    pub fn int<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(int(n)))
    }

    /// The integer 0.
    pub fn zero() -> Self {
        Self::int(0)
    }

    /// The integer 1.
    pub fn one() -> Self {
        Self::int(1)
    }

    /// A real scalar symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// The imaginary unit `i`.
    pub fn imaginary_unit() -> Self {
        Self::symbol(IMAGINARY_UNIT)
    }

    /// The response matrix `M`.
    pub fn matrix() -> Self {
        Self::Primary(Primary::Matrix(MATRIX.to_owned()))
    }

    /// The transition frequency of the given state.
    pub fn transition_frequency(state: impl Into<StateLabel>) -> Self {
        Self::Primary(Primary::TransitionFrequency(state.into()))
    }

    /// The bra `<state|`.
    pub fn bra(state: impl Into<StateLabel>) -> Self {
        Self::Primary(Primary::Bra(state.into()))
    }

    /// The ket `|state>`.
    pub fn ket(state: impl Into<StateLabel>) -> Self {
        Self::Primary(Primary::Ket(state.into()))
    }

    /// The transition moment `<from|op|to>`, as a product of a bra, an operator and a ket.
    pub fn transition_moment(
        from: impl Into<StateLabel>,
        op: OneParticleOperator,
        to: impl Into<StateLabel>,
    ) -> Self {
        Self::Mul(vec![
            Self::bra(from),
            Self::Primary(Primary::Operator(op)),
            Self::ket(to),
        ])
    }

    /// An exact rational number: an integer, or a numerator multiplied by the reciprocal of the
    /// denominator.
    pub fn rational(value: Rational) -> Self {
        let (numer, denom) = value.into_numer_denom();
        if denom == 1 {
            Self::Primary(Primary::Integer(numer))
        } else if numer == 1 {
            Self::Primary(Primary::Integer(denom)).recip()
        } else {
            Self::Mul(vec![
                Self::Primary(Primary::Integer(numer)),
                Self::Primary(Primary::Integer(denom)).recip(),
            ])
        }
    }

    /// Returns the precedence of the expression.
    fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Primary(_) => None,
            Self::Add(_) => Some(BinOpKind::Add.precedence()),
            Self::Mul(_) => Some(BinOpKind::Mul.precedence()),
            Self::Exp(_, _) => Some(BinOpKind::Exp.precedence()),
        }
    }

    /// Compares the precedence of this expression with the given expression.
    ///
    /// This is used to determine if parentheses are needed when printing.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        match (self.precedence(), other.precedence()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
        }
    }

    /// If the expression is a [`Primary`], returns a reference to it.
    pub fn as_primary(&self) -> Option<&Primary> {
        match self {
            Self::Primary(primary) => Some(primary),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns the contained integer.
    pub fn into_integer(self) -> Option<Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    /// Returns true if the expression is the integer 0.
    pub fn is_literal_zero(&self) -> bool {
        self.as_integer().map_or(false, |n| n.is_zero())
    }

    /// Returns true if the expression is the integer 1.
    pub fn is_literal_one(&self) -> bool {
        self.as_integer().map_or(false, |n| *n == 1)
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns true if the expression is the imaginary unit.
    pub fn is_imaginary_unit(&self) -> bool {
        self.as_symbol() == Some(IMAGINARY_UNIT)
    }

    /// If the expression is a [`Primary::TransitionFrequency`], returns the state it belongs to.
    pub fn as_transition_frequency(&self) -> Option<&StateLabel> {
        match self {
            Self::Primary(Primary::TransitionFrequency(state)) => Some(state),
            _ => None,
        }
    }

    /// If the expression is a number built from integers only, such as `3`, `5^-1` or
    /// `2 * 3^-1`, returns its exact value.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(Rational::from(n)),
            Self::Exp(base, exp) => {
                let base = base.as_integer()?;
                let exp = exp.as_integer()?.to_i32()?;
                if base.is_zero() && exp < 0 {
                    return None;
                }
                let magnitude = Rational::from(base.clone().pow(exp.unsigned_abs()));
                if exp < 0 {
                    Some(magnitude.recip())
                } else {
                    Some(magnitude)
                }
            },
            Self::Mul(factors) => factors.iter()
                .try_fold(Rational::from(1), |acc, factor| Some(acc * factor.as_rational()?)),
            Self::Add(_) | Self::Primary(_) => None,
        }
    }

    /// Returns true if the expression is a number built from integers only.
    pub fn is_rational(&self) -> bool {
        self.as_rational().is_some()
    }

    /// Returns true if the expression commutes with every other expression.
    pub fn is_commutative(&self) -> bool {
        match self {
            Self::Primary(primary) => primary.is_commutative(),
            Self::Add(children) | Self::Mul(children) => children.iter().all(Self::is_commutative),
            Self::Exp(base, exp) => base.is_commutative() && exp.is_commutative(),
        }
    }

    /// Returns the terms of the expression: the children of a [`SymExpr::Add`], or the
    /// expression itself.
    pub fn terms(&self) -> &[SymExpr] {
        match self {
            Self::Add(terms) => terms,
            expr => std::slice::from_ref(expr),
        }
    }

    /// Returns the factors of the expression: the children of a [`SymExpr::Mul`], or the
    /// expression itself.
    pub fn factors(&self) -> &[SymExpr] {
        match self {
            Self::Mul(factors) => factors,
            expr => std::slice::from_ref(expr),
        }
    }

    /// Returns the non-commutative factors of the expression, in order.
    pub fn noncommutative_factors(&self) -> Vec<&SymExpr> {
        self.factors().iter().filter(|factor| !factor.is_commutative()).collect()
    }

    /// Splits the expression into its exact rational coefficient and the product of its
    /// remaining factors, which keep their order.
    ///
    /// - `5` -> `(5, 1)`
    /// - `3*a` -> `(3, a)`
    /// - `1/4*a*b` -> `(1/4, a*b)`
    /// - `a` -> `(1, a)`
    pub fn split_coefficient(&self) -> (Rational, SymExpr) {
        let mut coefficient = Rational::from(1);
        let mut rest = Vec::new();
        for factor in self.factors() {
            match factor.as_rational() {
                Some(value) => coefficient *= value,
                None => rest.push(factor.clone()),
            }
        }
        (coefficient, Self::Mul(rest).downgrade())
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or an [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Raises the expression to the given power. An exponent of `-1` is delegated to
    /// [`SymExpr::recip`].
    pub fn pow(self, exp: SymExpr) -> Self {
        if exp.as_integer().map_or(false, |n| *n == -1) {
            self.recip()
        } else {
            Self::Exp(Box::new(self), Box::new(exp))
        }
    }

    /// Returns the reciprocal of the expression.
    ///
    /// The reciprocal of a product is the product of the reciprocals of its factors, in reverse
    /// order, so that every denominator of a fraction is its own [`SymExpr::Exp`] factor.
    pub fn recip(self) -> Self {
        match self {
            Self::Primary(Primary::Integer(n)) if n == 1 || n == -1 => {
                Self::Primary(Primary::Integer(n))
            },
            Self::Mul(factors) => factors.into_iter()
                .rev()
                .map(Self::recip)
                .fold(Self::Mul(Vec::new()), |acc, factor| acc * factor)
                .downgrade(),
            Self::Exp(base, exp) => {
                let exp = -*exp;
                if exp.is_literal_one() {
                    *base
                } else {
                    Self::Exp(base, Box::new(exp))
                }
            },
            expr => Self::Exp(Box::new(expr), Box::new(Self::int(-1))),
        }
    }

    /// Rebuilds the expression bottom-up, replacing every primary for which `f` returns
    /// `Some(expr)` with that expression. Sums and products are re-flattened with the arithmetic
    /// operators, so the result is in the same canonical form as freshly built expressions.
    pub fn map_primaries(&self, f: &mut impl FnMut(&Primary) -> Option<SymExpr>) -> Self {
        match self {
            Self::Primary(primary) => f(primary).unwrap_or_else(|| self.clone()),
            Self::Add(terms) => terms.iter()
                .map(|term| term.map_primaries(f))
                .fold(Self::Add(Vec::new()), |acc, term| acc + term)
                .downgrade(),
            Self::Mul(factors) => factors.iter()
                .map(|factor| factor.map_primaries(f))
                .fold(Self::Mul(Vec::new()), |acc, factor| acc * factor)
                .downgrade(),
            Self::Exp(base, exp) => Self::Exp(
                Box::new(base.map_primaries(f)),
                Box::new(exp.map_primaries(f)),
            ),
        }
    }

    /// Returns true if any sub-expression satisfies the predicate.
    pub fn contains(&self, mut predicate: impl FnMut(&SymExpr) -> bool) -> bool {
        self.post_order_iter().any(|expr| predicate(expr))
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

/// Returns true if both slices contain the same elements, with the same multiplicities, in any
/// order.
fn same_multiset<T: PartialEq>(lhs: &[T], rhs: &[T]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut used = vec![false; rhs.len()];
    lhs.iter().all(|l| {
        let found = rhs.iter()
            .enumerate()
            .position(|(idx, r)| !used[idx] && l == r);
        match found {
            Some(idx) => {
                used[idx] = true;
                true
            },
            None => false,
        }
    })
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) => same_multiset(lhs, rhs),
            (Self::Mul(lhs), Self::Mul(rhs)) => {
                if lhs.len() != rhs.len() {
                    return false;
                }
                let (lhs_comm, lhs_ordered): (Vec<_>, Vec<_>) = lhs.iter().partition(|f| f.is_commutative());
                let (rhs_comm, rhs_ordered): (Vec<_>, Vec<_>) = rhs.iter().partition(|f| f.is_commutative());
                lhs_ordered == rhs_ordered && same_multiset(&lhs_comm, &rhs_comm)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl From<Primary> for SymExpr {
    fn from(primary: Primary) -> Self {
        Self::Primary(primary)
    }
}

/// Adds two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Add`], in which case both are combined
/// in one list of terms (flattening).
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Adds two [`SymExpr`]s together. The behavior is the same as [`Add`].
impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                *lhs += rhs;
            },
            (Self::Add(terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
            },
            (Self::Add(terms), other) => {
                terms.push(other);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::zero());
                *lhs = owned + rhs;
            },
        }
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except for the case where
/// the operands are a mix of [`Primary`] and / or [`SymExpr::Mul`], in which case both are
/// combined in one list of factors (flattening). The left operand's factors always come first.
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                Self::Primary(Primary::Integer(lhs * rhs))
            },
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Mul(factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
            },
            (Self::Mul(factors), other) => {
                factors.push(other);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::one());
                *lhs = owned * rhs;
            },
        }
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is an integer, in which case the integer is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(int)) => Self::Primary(Primary::Integer(-int)),
            expr => Self::int(-1) * expr,
        }
    }
}

/// Subtracts two [`SymExpr`]s, as `lhs + -1 * rhs`.
impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Divides two [`SymExpr`]s, as `lhs * rhs^-1`.
impl Div for SymExpr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        super::fraction::make_fraction(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::OperatorKind;
    use pretty_assertions::assert_eq;
    use super::*;

    fn mu(comp: &str) -> OneParticleOperator {
        OneParticleOperator::new(comp, OperatorKind::ElectricDipole).unwrap()
    }

    #[test]
    fn products_keep_order() {
        let lhs = SymExpr::transition_moment("0", mu("a"), "n");
        let rhs = SymExpr::transition_moment("n", mu("b"), "0");
        let product = SymExpr::symbol("c") * (lhs * rhs);
        assert_eq!(product.to_string(), "c * <0| * mu_a * |n> * <n| * mu_b * |0>");
    }

    #[test]
    fn strict_equality_commutative() {
        let a = SymExpr::symbol("x") * SymExpr::bra("n") * SymExpr::symbol("y") * SymExpr::ket("n");
        let b = SymExpr::symbol("y") * SymExpr::bra("n") * SymExpr::ket("n") * SymExpr::symbol("x");
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_noncommutative() {
        let a = SymExpr::bra("n") * SymExpr::ket("n");
        let b = SymExpr::ket("n") * SymExpr::bra("n");
        assert_ne!(a, b);
    }

    #[test]
    fn strict_equality_multiplicity() {
        let x = SymExpr::symbol("x");
        let y = SymExpr::symbol("y");
        let a = SymExpr::Add(vec![x.clone(), x.clone(), y.clone()]);
        let b = SymExpr::Add(vec![x.clone(), y.clone(), y.clone()]);
        assert_ne!(a, b);
    }

    #[test]
    fn reciprocal_of_product() {
        let den = (SymExpr::transition_frequency("n") - SymExpr::symbol("w"))
            * (SymExpr::transition_frequency("k") - SymExpr::symbol("w_2"));
        let fraction = SymExpr::one() / den;
        assert_eq!(fraction.factors().len(), 2);
        assert!(fraction.factors().iter().all(|factor| matches!(factor, SymExpr::Exp(..))));
    }

    #[test]
    fn reciprocal_of_reciprocal() {
        let x = SymExpr::symbol("x");
        assert_eq!(x.clone().recip().recip(), x);
        assert_eq!(SymExpr::int(-1).recip(), SymExpr::int(-1));
    }

    #[test]
    fn rational_values() {
        let half = SymExpr::rational(crate::primitive::rational(1, 2));
        assert_eq!(half, SymExpr::int(2).recip());
        assert_eq!(half.as_rational(), Some(crate::primitive::rational(1, 2)));

        let expr = SymExpr::int(-3) * SymExpr::symbol("w") * SymExpr::int(4).recip();
        let (coefficient, rest) = expr.split_coefficient();
        assert_eq!(coefficient, crate::primitive::rational(-3, 4));
        assert_eq!(rest, SymExpr::symbol("w"));
    }

    #[test]
    fn commutativity() {
        assert!(SymExpr::transition_frequency("n").is_commutative());
        assert!(!SymExpr::matrix().is_commutative());
        assert!(!(SymExpr::matrix() + SymExpr::symbol("w")).recip().is_commutative());
        assert!(!SymExpr::Primary(Primary::Bra("0".into()).adjoint()).is_commutative());
    }
}
