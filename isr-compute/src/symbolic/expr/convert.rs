//! Conversion from the parsed notation to [`SymExpr`].
//!
//! Numbers become exact integers or rationals. The name `w_X` becomes the transition frequency
//! of state `X` if `X` labels a bra or ket anywhere in the expression, and `i` is the imaginary
//! unit. Every other name is a plain real symbol.

use crate::model::{OneParticleOperator, OperatorKind};
use crate::primitive::{int_from_str, rational_from_decimal};
use isr_error::Error;
use isr_parser::parser::ast::{BinOpKind, Expr as AstExpr, LitSym, Literal, TransitionMoment};
use std::ops::Range;
use super::{Primary, SymExpr};

/// Errors raised while converting the parsed notation.
pub mod error {
    use isr_attrs::ErrorKind;

    /// A number literal could not be read.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("invalid number `{}`", literal),
        labels = ["this number"],
    )]
    pub struct InvalidNumber {
        /// The literal as written.
        pub literal: String,
    }
}

/// Converts a parsed expression into a [`SymExpr`].
pub fn from_ast(expr: &AstExpr) -> Result<SymExpr, Error> {
    let mut states = Vec::new();
    collect_states(expr, &mut states);
    Converter { states }.convert(expr)
}

/// Collects the labels of every bra and ket in the expression.
fn collect_states(expr: &AstExpr, states: &mut Vec<String>) {
    match expr {
        AstExpr::Literal(_) => (),
        AstExpr::TransitionMoment(moment) => {
            for label in [&moment.bra.label, &moment.ket.label] {
                if !states.contains(label) {
                    states.push(label.clone());
                }
            }
        },
        AstExpr::Paren(paren) => collect_states(paren.innermost(), states),
        AstExpr::Neg(neg) => collect_states(&neg.operand, states),
        AstExpr::Binary(bin) => {
            collect_states(&bin.lhs, states);
            collect_states(&bin.rhs, states);
        },
    }
}

/// Attaches the given span to an error raised without one.
fn with_span(mut err: Error, span: Range<usize>) -> Error {
    if err.spans.is_empty() {
        err.spans = vec![span];
    }
    err
}

struct Converter {
    /// Labels of the states appearing in the expression.
    states: Vec<String>,
}

impl Converter {
    fn convert(&self, expr: &AstExpr) -> Result<SymExpr, Error> {
        match expr {
            AstExpr::Literal(Literal::Integer(lit)) => int_from_str(&lit.value)
                .map(|n| SymExpr::Primary(Primary::Integer(n)))
                .ok_or_else(|| Error::new(vec![lit.span.clone()], error::InvalidNumber {
                    literal: lit.value.clone(),
                })),
            AstExpr::Literal(Literal::Float(lit)) => rational_from_decimal(&lit.value)
                .map(SymExpr::rational)
                .ok_or_else(|| Error::new(vec![lit.span.clone()], error::InvalidNumber {
                    literal: lit.value.clone(),
                })),
            AstExpr::Literal(Literal::Symbol(sym)) => Ok(self.symbol(sym)),
            AstExpr::TransitionMoment(moment) => self.transition_moment(moment),
            AstExpr::Paren(paren) => self.convert(paren.innermost()),
            AstExpr::Neg(neg) => Ok(-self.convert(&neg.operand)?),
            AstExpr::Binary(bin) => {
                let lhs = self.convert(&bin.lhs)?;
                let rhs = self.convert(&bin.rhs)?;
                Ok(match bin.op.kind {
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => lhs / rhs,
                    BinOpKind::Exp => lhs.pow(rhs),
                })
            },
        }
    }

    fn symbol(&self, sym: &LitSym) -> SymExpr {
        match (sym.base.as_str(), &sym.subscript) {
            ("w", Some(state)) if self.states.contains(state) => {
                SymExpr::transition_frequency(state.as_str())
            },
            _ => SymExpr::symbol(sym.to_string()),
        }
    }

    fn transition_moment(&self, moment: &TransitionMoment) -> Result<SymExpr, Error> {
        let kind = OperatorKind::lookup(&moment.operator.base)
            .map_err(|err| with_span(err, moment.operator.span.clone()))?;
        let comp = moment.operator.subscript.clone().unwrap_or_default();
        let op = OneParticleOperator::new(comp, kind)
            .map_err(|err| with_span(err, moment.operator.span.clone()))?;

        Ok(SymExpr::transition_moment(
            moment.bra.label.as_str(),
            op,
            moment.ket.label.as_str(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::error::{ComponentCountMismatch, UnknownOperator};
    use isr_parser::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn convert(input: &str) -> Result<SymExpr, Error> {
        from_ast(&parse(input).unwrap())
    }

    fn mu(comp: &str) -> OneParticleOperator {
        OneParticleOperator::new(comp, OperatorKind::ElectricDipole).unwrap()
    }

    #[test]
    fn polarizability_term() {
        let expr = convert("<0|mu_a|n><n|mu_b|0>/(w_n - w)").unwrap();
        let expected = SymExpr::transition_moment("0", mu("a"), "n")
            * SymExpr::transition_moment("n", mu("b"), "0")
            * (SymExpr::transition_frequency("n") - SymExpr::symbol("w")).recip();
        assert_eq!(expr, expected);
    }

    #[test]
    fn frequency_of_unknown_state_is_a_symbol() {
        let expr = convert("<0|mu_a|n> w_1 w_n").unwrap();
        assert!(expr.factors().contains(&SymExpr::symbol("w_1")));
        assert!(expr.factors().contains(&SymExpr::transition_frequency("n")));
    }

    #[test]
    fn decimals_are_exact() {
        let expr = convert("0.5 w_f").unwrap();
        assert_eq!(expr, SymExpr::int(2).recip() * SymExpr::symbol("w_f"));
    }

    #[test]
    fn imaginary_unit() {
        let expr = convert("w + i*gamma").unwrap();
        assert_eq!(expr, SymExpr::symbol("w") + SymExpr::imaginary_unit() * SymExpr::symbol("gamma"));
    }

    #[test]
    fn unknown_operator_points_at_operator() {
        let err = convert("<0|nu_x|n>").unwrap_err();
        assert!(err.is::<UnknownOperator>());
        assert_eq!(err.spans, vec![3..7]);
    }

    #[test]
    fn wrong_component_count() {
        let err = convert("<0|xi_x|n>").unwrap_err();
        assert!(err.is::<ComponentCountMismatch>());
    }
}
