//! Algebraic manipulation of response expressions.
//!
//! # Expression representation
//!
//! Expressions in this module are represented as a tree of [`SymExpr`] nodes. It's similar to the
//! [`isr_parser::parser::ast::Expr`] nodes produced by [`isr_parser`], with the main difference
//! being that [`SymExpr`] nodes **flatten** out the tree structure: `x + (y + z)` is a single
//! [`SymExpr::Add`] node with three children.
//!
//! Unlike numbers in a general computer algebra system, most leaves of a response expression do
//! not commute. Products keep the order in which their factors were multiplied, and no operation
//! in this module reorders the non-commutative factors of a product.
//!
//! ```
//! use isr_compute::symbolic::{expr::from_ast, SymExpr};
//! use isr_parser::parser::{ast::Expr, Parser};
//!
//! let mut parser = Parser::new("<0|mu_x|n><n|mu_y|0>/(w_n - w)");
//! let ast = parser.try_parse_full::<Expr>().unwrap();
//! let expr = from_ast(&ast).unwrap();
//!
//! assert_eq!(expr.noncommutative_factors().len(), 6);
//! assert!(expr.factors().contains(&(SymExpr::transition_frequency("n") - SymExpr::symbol("w")).recip()));
//! ```
//!
//! # Simplification and zero testing
//!
//! [`simplify()`] collects numbers, like terms and like factors, bringing expressions into a tidy
//! canonical form. Deciding whether an expression is zero is done separately, by
//! [`numeric::is_zero`], which evaluates the expression at random sample points.
//!
//! ```
//! use isr_compute::symbolic::{numeric::is_zero, simplify, SymExpr};
//!
//! let w = SymExpr::symbol("w");
//! let expr = w.clone() + w.clone() - SymExpr::int(2) * w;
//! assert_eq!(simplify(&expr), SymExpr::zero());
//! assert!(is_zero(&expr));
//! ```

pub mod expr;
pub mod fraction;
pub mod numeric;
pub mod simplify;
pub mod step_collector;
pub mod subs;

pub use expr::{Primary, SymExpr};
pub use simplify::{simplify, simplify_with_steps};
pub use step_collector::StepCollector;
