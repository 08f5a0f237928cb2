use crate::parser::{
    ast::{expr::Expr, unary::Neg},
    Associativity,
    Parser,
    Precedence,
};
use crate::tokenizer::TokenKind;
use isr_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Exp,
}

impl BinOpKind {
    /// Returns the precedence of the operator.
    pub fn precedence(self) -> Precedence {
        match self {
            BinOpKind::Add | BinOpKind::Sub => Precedence::Term,
            BinOpKind::Mul | BinOpKind::Div => Precedence::Factor,
            BinOpKind::Exp => Precedence::Exp,
        }
    }

    /// Returns the associativity of the operator.
    pub fn associativity(self) -> Associativity {
        match self {
            BinOpKind::Exp => Associativity::Right,
            _ => Associativity::Left,
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinOpKind::Add => write!(f, "+"),
            BinOpKind::Sub => write!(f, "-"),
            BinOpKind::Mul => write!(f, "*"),
            BinOpKind::Div => write!(f, "/"),
            BinOpKind::Exp => write!(f, "^"),
        }
    }
}

/// A binary operator, explicit or implied by juxtaposition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of operator.
    pub kind: BinOpKind,

    /// Whether the operator was implied by two adjacent operands (always a multiplication).
    pub implicit: bool,

    /// The region of the source code that this operator was parsed from. Empty for implicit
    /// operators.
    pub span: Range<usize>,
}

impl BinOp {
    /// Returns the operator that follows the cursor, without consuming it.
    fn peek(input: &Parser) -> Option<Self> {
        let token = input.peek_token()?;
        let kind = match token.kind {
            TokenKind::Add => BinOpKind::Add,
            TokenKind::Sub => BinOpKind::Sub,
            TokenKind::Mul => BinOpKind::Mul,
            TokenKind::Div => BinOpKind::Div,
            TokenKind::Exp => BinOpKind::Exp,
            kind if kind.starts_operand() => return Some(Self {
                kind: BinOpKind::Mul,
                implicit: true,
                span: token.span.start..token.span.start,
            }),
            _ => return None,
        };
        Some(Self { kind, implicit: false, span: token.span.clone() })
    }
}

/// A binary expression, such as `w_n - w`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses an expression whose binary operators all have at least the given precedence, using
    /// precedence climbing.
    pub fn parse_expr(input: &mut Parser, min: Precedence) -> Result<Expr, Error> {
        let mut lhs = Neg::parse_or_lower(input)?;

        while let Some(op) = BinOp::peek(input) {
            let precedence = op.kind.precedence();
            if precedence < min {
                break;
            }

            if !op.implicit {
                input.next_token()?;
            }

            let rhs_min = match op.kind.associativity() {
                Associativity::Left => precedence.next(),
                Associativity::Right => precedence,
            };
            let rhs = Self::parse_expr(input, rhs_min)?;
            let span = lhs.span().start..rhs.span().end;
            lhs = Expr::Binary(Self {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
                span,
            });
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            _ if self.op.implicit => write!(f, "{}{}", self.lhs, self.rhs),
            BinOpKind::Exp => write!(f, "{}^{}", self.lhs, self.rhs),
            kind => write!(f, "{} {} {}", self.lhs, kind, self.rhs),
        }
    }
}
