pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Input the lexer cannot classify is kept as [`TokenKind::Symbol`] so that the parser can point
/// at it.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn transition_moment() {
        compare_tokens(
            "<0|mu_a|n>",
            [
                (TokenKind::Less, "<"),
                (TokenKind::Int, "0"),
                (TokenKind::Bar, "|"),
                (TokenKind::Name, "mu_a"),
                (TokenKind::Bar, "|"),
                (TokenKind::Name, "n"),
                (TokenKind::Greater, ">"),
            ],
        );
    }

    #[test]
    fn denominator() {
        compare_tokens(
            "(w_n - w_{1} + 0.5i*gamma)",
            [
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "w_n"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Sub, "-"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "w_{1}"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "0.5"),
                (TokenKind::Name, "i"),
                (TokenKind::Mul, "*"),
                (TokenKind::Name, "gamma"),
                (TokenKind::CloseParen, ")"),
            ],
        );
    }

    #[test]
    fn unknown_symbols() {
        let tokens = tokenize_complete("w_f/2 $");
        let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![
            TokenKind::Name,
            TokenKind::Div,
            TokenKind::Int,
            TokenKind::Whitespace,
            TokenKind::Symbol,
        ]);
    }
}
