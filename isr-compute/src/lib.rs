//! Symbolic expressions for molecular response properties.
//!
//! This crate provides the algebraic substrate used to rewrite sum-over-states expressions into
//! their intermediate state representation:
//!
//! - [`model`] defines the symbols that appear in response expressions: state labels, one-particle
//!   operators and their ISR counterparts, and response vectors.
//! - [`symbolic`] defines the expression tree, substitution, simplification and numeric zero
//!   testing.

pub mod consts;
pub mod model;
pub mod primitive;
pub mod symbolic;

/// The maximum depth of the recursive algorithms that walk expressions, used to reject malformed
/// input instead of overflowing the stack.
pub const MAX_DEPTH: usize = 1 << 4;
