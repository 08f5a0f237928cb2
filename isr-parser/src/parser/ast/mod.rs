pub mod binary;
pub mod expr;
pub mod literal;
pub mod paren;
pub mod transition_moment;
pub mod unary;

pub use binary::{BinOp, BinOpKind, Binary};
pub use expr::Expr;
pub use literal::{Literal, LitFloat, LitInt, LitSym};
pub use paren::Paren;
pub use transition_moment::{StateLabel, TransitionMoment};
pub use unary::Neg;
