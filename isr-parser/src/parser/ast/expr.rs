use crate::parser::{
    ast::{
        binary::Binary,
        literal::Literal,
        paren::Paren,
        transition_moment::TransitionMoment,
        unary::Neg,
    },
    error::{UnexpectedEof, UnexpectedToken},
    Parse,
    Parser,
    Precedence,
};
use crate::tokenizer::TokenKind;
use isr_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Any expression of the sum-over-states notation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A number or a symbol.
    Literal(Literal),

    /// A transition moment `<bra|operator|ket>`.
    TransitionMoment(TransitionMoment),

    /// A parenthesized expression.
    Paren(Paren),

    /// A negated expression.
    Neg(Neg),

    /// A binary expression.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::TransitionMoment(moment) => moment.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Neg(neg) => neg.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// Parses a single operand: a literal, a transition moment or a parenthesized expression.
    pub fn parse_operand(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_kind() {
            Some(TokenKind::Less) => input.try_parse().map(Expr::TransitionMoment),
            Some(TokenKind::OpenParen) => input.try_parse().map(Expr::Paren),
            Some(TokenKind::Int | TokenKind::Float | TokenKind::Name) => input.try_parse().map(Expr::Literal),
            Some(found) => Err(Error::new(vec![input.peek_span()], UnexpectedToken {
                expected: &[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Name,
                    TokenKind::OpenParen,
                    TokenKind::Less,
                    TokenKind::Sub,
                ],
                found,
            })),
            None => Err(input.error(UnexpectedEof)),
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        Binary::parse_expr(input, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::TransitionMoment(moment) => moment.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Neg(neg) => neg.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        ast::binary::BinOpKind,
        error::{EmptyParenthesis, ExpectedEof, InvalidStateLabel, MalformedTransitionMoment, UnclosedParenthesis},
        parse,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    /// Unwraps a binary expression, panicking with the expression otherwise.
    fn binary(expr: &Expr) -> &Binary {
        match expr {
            Expr::Binary(binary) => binary,
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn polarizability_term() {
        let expr = parse("<0|mu_a|n><n|mu_b|0>/(w_n - w)").unwrap();

        // ((<0|mu_a|n> <n|mu_b|0>) / (w_n - w))
        let div = binary(&expr);
        assert_eq!(div.op.kind, BinOpKind::Div);
        let mul = binary(&div.lhs);
        assert!(mul.op.implicit);

        let Expr::TransitionMoment(first) = mul.lhs.as_ref() else { panic!("expected transition moment") };
        assert_eq!(first.bra.label, "0");
        assert_eq!(first.operator.base, "mu");
        assert_eq!(first.operator.subscript.as_deref(), Some("a"));
        assert_eq!(first.ket.label, "n");

        let Expr::Paren(paren) = div.rhs.as_ref() else { panic!("expected parenthesis") };
        assert_eq!(binary(paren.innermost()).op.kind, BinOpKind::Sub);
        assert_eq!(expr.span(), 0..30);
    }

    #[test]
    fn precedence() {
        let expr = parse("a + b*c^d^e - -f").unwrap();
        assert_eq!(expr.to_string(), "a + b * c^d^e - -f");

        // (a + (b * (c ^ (d ^ e)))) - (-f)
        let sub = binary(&expr);
        assert_eq!(sub.op.kind, BinOpKind::Sub);
        assert!(matches!(sub.rhs.as_ref(), Expr::Neg(_)));
        let add = binary(&sub.lhs);
        assert_eq!(add.op.kind, BinOpKind::Add);
        let mul = binary(&add.rhs);
        assert_eq!(mul.op.kind, BinOpKind::Mul);
        let exp = binary(&mul.rhs);
        assert_eq!(exp.op.kind, BinOpKind::Exp);
        assert_eq!(binary(&exp.rhs).op.kind, BinOpKind::Exp);
    }

    #[test]
    fn negation_binds_weaker_than_exp() {
        let expr = parse("-w^2").unwrap();
        let Expr::Neg(neg) = &expr else { panic!("expected negation") };
        assert_eq!(binary(&neg.operand).op.kind, BinOpKind::Exp);
    }

    #[test]
    fn implicit_multiplication() {
        let expr = parse("2 i gamma").unwrap();
        assert_eq!(expr.to_string(), "2igamma");
        let outer = binary(&expr);
        assert!(outer.op.implicit);
        assert!(binary(&outer.lhs).op.implicit);
    }

    #[test]
    fn braced_subscript() {
        let expr = parse("w_{1} + w_{2}").unwrap();
        assert_eq!(expr.to_string(), "w_1 + w_2");
    }

    #[test]
    fn empty_parenthesis() {
        let err = parse("<0|mu_a|n>/()").unwrap_err();
        assert!(err.is::<EmptyParenthesis>());
        assert_eq!(err.spans, vec![11..13]);
    }

    #[test]
    fn unclosed_parenthesis() {
        let err = parse("1/(w_n - w").unwrap_err();
        assert!(err.is::<UnclosedParenthesis>());
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn malformed_transition_moment() {
        let err = parse("<0|mu_a n>").unwrap_err();
        assert!(err.is::<MalformedTransitionMoment>());
        assert_eq!(err.spans[0], 0..1);
    }

    #[test]
    fn subscripted_state_label() {
        let err = parse("<0|mu_a|w_n>").unwrap_err();
        assert!(err.is::<InvalidStateLabel>());
        assert_eq!(err.spans, vec![8..11]);
    }

    #[test]
    fn trailing_garbage() {
        let err = parse("w_n - w )").unwrap_err();
        assert!(err.is::<ExpectedEof>());
        assert_eq!(err.spans, vec![8..9]);
    }
}
