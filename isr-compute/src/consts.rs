//! Numeric constants used when probing expressions, and well-known state labels.

use once_cell::sync::Lazy;
use rug::{ops::Pow, Complex, Float};
use super::primitive::{complex, float};

/// The label of the electronic ground state.
pub const GROUND_STATE: &str = "0";

/// The symbol that stands for the imaginary unit.
pub const IMAGINARY_UNIT: &str = "i";

/// The symbol that stands for the response matrix.
pub const MATRIX: &str = "M";

/// The imaginary unit.
pub static I: Lazy<Complex> = Lazy::new(|| complex((0, 1)));

/// Relative tolerance below which a sum of sampled values counts as zero.
pub static ZERO_TOLERANCE: Lazy<Float> = Lazy::new(|| float(10).pow(-60));
