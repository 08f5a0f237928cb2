//! Error kinds produced while parsing. All of them carry the span of the offending token(s).

use ariadne::Fmt;
use isr_attrs::ErrorKind;
use isr_error::EXPR;
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = "add a closing parenthesis `)` somewhere after this",
)]
pub struct UnclosedParenthesis;

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A transition moment was not written as `<bra|operator|ket>`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "malformed transition moment",
    labels = ["this transition moment", "is not closed properly here"],
    help = format!("write transition moments as {}", "<bra|operator_component|ket>".fg(EXPR)),
)]
pub struct MalformedTransitionMoment;

/// A state label in a bra or ket was neither an integer nor a plain name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid state label", label),
    labels = ["this label"],
    help = "state labels are integers (`0` is the ground state) or names without subscripts",
)]
pub struct InvalidStateLabel {
    /// The label that was found.
    pub label: String,
}
