//! Tokenizer and parser for the textual sum-over-states notation.
//!
//! Expressions are written as sums of products of transition moments and energy denominators:
//!
//! ```text
//! <0|mu_a|n><n|mu_b|0>/(w_n - w - i*gamma) + <0|mu_b|n><n|mu_a|0>/(w_n + w + i*gamma)
//! ```
//!
//! A transition moment `<bra|op_comp|ket>` names the bra and ket states, and the operator with its
//! Cartesian component as subscript. Everything else is ordinary arithmetic over names and
//! numbers, with implicit multiplication between juxtaposed factors.

pub mod parser;
pub mod tokenizer;

pub use parser::{ast::expr::Expr, parse};
