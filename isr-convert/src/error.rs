//! Errors raised while converting sum-over-states expressions.
//!
//! None of these errors point into source code; they are raised with [`Error::spanless`].
//!
//! [`Error::spanless`]: isr_error::Error::spanless

use ariadne::Fmt;
use isr_attrs::ErrorKind;
use isr_error::EXPR;

/// An energy denominator contains more than one transition frequency of the states that receive a
/// resolvent.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the denominator `{}` contains more than one transition frequency", denominator),
    help = format!("each denominator may depend on a single transition frequency, such as `w_{}`", state),
)]
pub struct MultipleTransitionFrequencies {
    /// The state whose resolvent was being inserted.
    pub state: String,

    /// The offending denominator.
    pub denominator: String,
}

/// The transition frequency of a state appears in more than one energy denominator of a term.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`w_{}` was found in more than one denominator", state),
    help = format!(
        "a resolvent can only replace a single denominator; combine the denominators of `{}` first",
        state.fg(EXPR),
    ),
)]
pub struct DuplicateDenominator {
    /// The state whose resolvent was being inserted.
    pub state: String,
}

/// A ket-bra pair has no energy denominator that could become its resolvent.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("no denominator contains the transition frequency `w_{}`", state),
    help = format!(
        "the pair `|{0}><{0}|` must be divided by a denominator such as `(w_{0} - w)`",
        state,
    ),
)]
pub struct MissingDenominator {
    /// The state whose resolvent was being inserted.
    pub state: String,
}

/// A denominator contains a transition frequency, but is not a sum or a single frequency raised
/// to the power `-1`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the denominator `{}` of state `{}` cannot be turned into a resolvent", denominator, state),
    help = "denominators must be sums of frequencies, each raised to the power -1",
)]
pub struct InvalidDenominator {
    /// The state whose resolvent was being inserted.
    pub state: String,

    /// The offending denominator.
    pub denominator: String,
}

/// Extra terms were requested for an expression that divides by zero once a summation index
/// becomes the ground state.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "extra terms cannot be determined for static sum-over-states expressions",
    help = "keep the external frequencies symbolic, and substitute their values after conversion",
)]
pub struct StaticExtraTerms;

/// A term of the expression is not a product.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the term `{}` is not a product of transition moments", term),
    help = "every term of a sum-over-states expression must be a product",
)]
pub struct UnsupportedTerm {
    /// The offending term.
    pub term: String,
}

/// A recursive algorithm nested deeper than allowed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("maximum recursion depth of {} exceeded", limit),
    help = "the expression is too deeply nested, or contains too many summation indices",
)]
pub struct RecursionLimit {
    /// The depth that was exceeded.
    pub limit: usize,
}

/// The right-hand side of a response equation has an unexpected shape.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not the right-hand side of a response equation", rhs),
    help = "right-hand sides are a modified transition moment, or a state-to-state modified transition moment contracted with a state or response vector",
)]
pub struct MalformedRightHandSide {
    /// The offending right-hand side.
    pub rhs: String,
}

/// A summation index labels no bra or ket of the expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the summation index `{}` does not appear in the expression", index),
    help = "summation indices must label a bra or ket of the expression",
)]
pub struct SummationIndexNotFound {
    /// The offending index.
    pub index: String,
}

/// An excluded case names an index that is not summed over.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot exclude `{} = {}`, since `{}` is not a summation index", index, value, index),
)]
pub struct InvalidExcludedCase {
    /// The index of the case.
    pub index: String,

    /// The value of the case.
    pub value: String,
}

/// An excluded case never arises as a special case of the expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the excluded case `{} = {}` does not arise in the expression", index, value),
    help = format!(
        "`{}` can only take the ground state or a state it shares a transition moment with",
        index.fg(EXPR),
    ),
)]
pub struct UnmatchedExcludedCase {
    /// The index of the case.
    pub index: String,

    /// The value of the case.
    pub value: String,
}

/// An operator was assigned a frequency, but does not appear in the expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the operator `{}` does not appear in the expression", operator),
)]
pub struct OperatorNotFound {
    /// The offending operator.
    pub operator: String,
}

/// A frequency was given two different values.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the frequency `{}` was given more than once, with different values", symbol),
    help = "give each frequency exactly one value",
)]
pub struct ConflictingFrequency {
    /// The offending frequency.
    pub symbol: String,
}

/// A frequency was given a value, but does not appear in the expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the frequency `{}` does not appear in the expression", symbol),
)]
pub struct UnknownFrequency {
    /// The offending frequency.
    pub symbol: String,
}

/// A final state was given for an expression that does not have one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the expression has no final state `{}`", state),
    help = "final states are states that are neither the ground state nor summed over",
)]
pub struct UnexpectedFinalState {
    /// The given final state.
    pub state: String,
}

/// The expression has a final state, but none was given.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the expression depends on the final state `{}`, but none was given", state),
)]
pub struct MissingFinalState {
    /// The final state of the expression.
    pub state: String,
}
