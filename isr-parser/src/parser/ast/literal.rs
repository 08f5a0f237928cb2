use crate::parser::{
    error::{UnexpectedEof, UnexpectedToken},
    token::{Float, Int, Name},
    Parse,
    Parser,
};
use crate::tokenizer::TokenKind;
use isr_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitInt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let int = input.try_parse::<Int>()?;
        Ok(Self { value: int.lexeme, span: int.span })
    }
}

impl fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A floating-point literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the floating-point literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitFloat {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let float = input.try_parse::<Float>()?;
        Ok(Self { value: float.lexeme, span: float.span })
    }
}

impl fmt::Display for LitFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol, such as `w`, `gamma`, or a subscripted symbol such as `w_n` or `mu_a`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The part of the name before the subscript.
    pub base: String,

    /// The subscript, without the `_` and without surrounding braces.
    pub subscript: Option<String>,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl LitSym {
    /// Splits a name lexeme into its base and subscript.
    pub fn from_lexeme(lexeme: &str, span: Range<usize>) -> Self {
        match lexeme.split_once('_') {
            Some((base, subscript)) => {
                let subscript = subscript
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .unwrap_or(subscript);
                Self {
                    base: base.to_owned(),
                    subscript: Some(subscript.trim().to_owned()),
                    span,
                }
            },
            None => Self { base: lexeme.to_owned(), subscript: None, span },
        }
    }
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<Name>()?;
        Ok(Self::from_lexeme(&name.lexeme, name.span))
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.subscript {
            Some(subscript) if subscript.chars().all(char::is_alphanumeric) => {
                write!(f, "{}_{}", self.base, subscript)
            },
            Some(subscript) => write!(f, "{}_{{{}}}", self.base, subscript),
            None => write!(f, "{}", self.base),
        }
    }
}

/// A literal value: a number or a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    Integer(LitInt),
    Float(LitFloat),
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_kind() {
            Some(TokenKind::Int) => input.try_parse().map(Literal::Integer),
            Some(TokenKind::Float) => input.try_parse().map(Literal::Float),
            Some(TokenKind::Name) => input.try_parse().map(Literal::Symbol),
            Some(found) => Err(Error::new(vec![input.peek_span()], UnexpectedToken {
                expected: &[TokenKind::Int, TokenKind::Float, TokenKind::Name],
                found,
            })),
            None => Err(input.error(UnexpectedEof)),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => int.fmt(f),
            Literal::Float(float) => float.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn subscripts() {
        let sym = LitSym::from_lexeme("w_{ab}", 0..6);
        assert_eq!(sym.base, "w");
        assert_eq!(sym.subscript.as_deref(), Some("ab"));
        assert_eq!(sym.to_string(), "w_ab");

        let sym = LitSym::from_lexeme("gamma", 0..5);
        assert_eq!(sym.subscript, None);
        assert_eq!(sym.to_string(), "gamma");
    }
}
