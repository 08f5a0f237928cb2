use crate::parser::{
    error::{InvalidStateLabel, MalformedTransitionMoment},
    ast::literal::LitSym,
    token::{Bar, Greater, Less},
    Parse,
    Parser,
};
use crate::tokenizer::TokenKind;
use isr_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The label of a state inside a bra or ket, such as `0`, `n` or `f`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateLabel {
    /// The label as written.
    pub label: String,

    /// The region of the source code that this label was parsed from.
    pub span: Range<usize>,
}

impl Parse for StateLabel {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Int => {
                // `00` and `0` are the same state
                let digits = token.lexeme.trim_start_matches('0');
                Ok(Self {
                    label: if digits.is_empty() { "0".to_owned() } else { digits.to_owned() },
                    span: token.span,
                })
            },
            TokenKind::Name if !token.lexeme.contains('_') => Ok(Self {
                label: token.lexeme.to_owned(),
                span: token.span,
            }),
            _ => Err(Error::new(vec![token.span], InvalidStateLabel {
                label: token.lexeme.to_owned(),
            })),
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A transition moment `<bra|operator|ket>`: the matrix element of a one-particle operator
/// between two states.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransitionMoment {
    /// The state on the bra side.
    pub bra: StateLabel,

    /// The operator, with its Cartesian component as subscript (e.g. `mu_a`).
    pub operator: LitSym,

    /// The state on the ket side.
    pub ket: StateLabel,

    /// The region of the source code that this transition moment was parsed from.
    pub span: Range<usize>,
}

impl TransitionMoment {
    /// Returns the span of the transition moment.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for TransitionMoment {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let less = input.try_parse::<Less>()?;
        let malformed = |input: &Parser| {
            Error::new(vec![less.span.clone(), input.peek_span()], MalformedTransitionMoment)
        };

        let bra = input.try_parse::<StateLabel>()?;
        input.try_parse::<Bar>().map_err(|_| malformed(input))?;
        let operator = input.try_parse::<LitSym>().map_err(|_| malformed(input))?;
        input.try_parse::<Bar>().map_err(|_| malformed(input))?;
        let ket = input.try_parse::<StateLabel>()?;
        let greater = input.try_parse::<Greater>().map_err(|_| malformed(input))?;

        Ok(Self {
            bra,
            operator,
            ket,
            span: less.span.start..greater.span.end,
        })
    }
}

impl fmt::Display for TransitionMoment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}|{}|{}>", self.bra, self.operator, self.ket)
    }
}
