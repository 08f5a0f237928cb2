use crate::parser::{
    ast::{binary::Binary, expr::Expr},
    token::Sub,
    Parser,
    Precedence,
};
use isr_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A negated expression, such as `-w`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neg {
    /// The negated operand.
    pub operand: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Neg {
    /// Returns the span of the negation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a negation, or an operand if there is no leading `-`.
    ///
    /// Negation binds weaker than exponentiation, so `-w^2` is `-(w^2)`.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        match input.try_parse::<Sub>() {
            Ok(sub) => {
                let operand = Binary::parse_expr(input, Precedence::Neg)?;
                let span = sub.span.start..operand.span().end;
                Ok(Expr::Neg(Self { operand: Box::new(operand), span }))
            },
            Err(_) => Expr::parse_operand(input),
        }
    }
}

impl fmt::Display for Neg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "-{}", self.operand)
    }
}
