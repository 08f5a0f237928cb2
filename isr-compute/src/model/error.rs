//! Errors raised while constructing operator symbols.

use ariadne::Fmt;
use isr_attrs::ErrorKind;
use isr_error::EXPR;

/// The number of Cartesian component labels does not match the dimensionality of the operator.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "the {} operator is {}-dimensional, but {} components were specified",
        operator,
        expected,
        found,
    ),
    labels = ["this operator"],
    help = format!("write exactly {} component label(s) after the `_`", expected),
)]
pub struct ComponentCountMismatch {
    /// The name of the operator.
    pub operator: &'static str,

    /// The number of components the operator needs.
    pub expected: usize,

    /// The number of components given.
    pub found: usize,
}

/// No operator is written with the given symbol.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown operator `{}`", symbol),
    labels = ["this operator"],
    help = if suggestions.is_empty() {
        "the available operators are `mu`, `m` and `xi`".to_string()
    } else {
        format!(
            "did you mean {}?",
            suggestions.iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", "),
        )
    },
)]
pub struct UnknownOperator {
    /// The symbol that was written.
    pub symbol: String,

    /// Operators with a similar symbol.
    pub suggestions: Vec<&'static str>,
}
