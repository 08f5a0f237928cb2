//! Functions to construct [`Integer`]s, [`Rational`]s, [`Float`]s, and [`Complex`] numbers from
//! various types.

use rug::{Assign, Complex, Float, Integer, Rational};

/// The number of bits of precision to use when evaluating expressions numerically.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string of decimal digits.
///
/// Returns [`None`] if the string contains anything other than digits.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s, 10).ok()
}

/// Creates a [`Rational`] with the given numerator and denominator.
///
/// The denominator must not be zero.
pub fn rational(numer: impl Into<Integer>, denom: impl Into<Integer>) -> Rational {
    Rational::from((numer.into(), denom.into()))
}

/// Creates an exact [`Rational`] from a decimal literal such as `0.25` or `.5`.
///
/// Returns [`None`] if the string is not a decimal literal.
pub fn rational_from_decimal(s: &str) -> Option<Rational> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    let whole = if whole.is_empty() { int(0) } else { int_from_str(whole)? };
    if frac.is_empty() {
        return Some(Rational::from(whole));
    }

    let digits = int_from_str(frac)?;
    let scale = Integer::from(Integer::u_pow_u(10, frac.len() as u32));
    Some(Rational::from(whole) + rational(digits, scale))
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Complex`] with the given value.
pub fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(PRECISION, n)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn decimal_literals() {
        assert_eq!(rational_from_decimal("0.25"), Some(rational(1, 4)));
        assert_eq!(rational_from_decimal(".5"), Some(rational(1, 2)));
        assert_eq!(rational_from_decimal("12.50"), Some(rational(25, 2)));
        assert_eq!(rational_from_decimal("3"), Some(rational(3, 1)));
        assert_eq!(rational_from_decimal("1.x"), None);
    }
}
