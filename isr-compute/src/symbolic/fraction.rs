//! Tools to help manipulate fractions.

use super::expr::SymExpr;

/// Create a [`SymExpr`] representing a fraction with the given numerator and denominator.
///
/// The representation is a [`SymExpr::Mul`] of the numerator and the reciprocal of the
/// denominator (see [`SymExpr::recip`]). A numerator of `1` is left out.
pub fn make_fraction(numerator: SymExpr, denominator: SymExpr) -> SymExpr {
    if numerator.is_literal_one() {
        denominator.recip()
    } else {
        numerator * denominator.recip()
    }
}

/// Splits a single term into its numerator and denominator.
///
/// Factors raised to a negative integer power form the denominator, as do the denominators of
/// rational coefficients. The numerator keeps the remaining factors in order. A sum is returned
/// as its own numerator.
///
/// - `3/4 * a * b^-1` -> `(3 * a, 4 * b)`
/// - `<0|mu_a|n> * (w_n - w)^-1` -> `(<0|mu_a|n>, w_n - w)`
pub fn as_numer_denom(expr: &SymExpr) -> (SymExpr, SymExpr) {
    if matches!(expr, SymExpr::Add(_)) {
        return (expr.clone(), SymExpr::one());
    }

    let (coefficient, rest) = expr.split_coefficient();
    let (coeff_numer, coeff_denom) = coefficient.into_numer_denom();

    let mut numerator = SymExpr::Mul(Vec::new());
    let mut denominator = SymExpr::Mul(Vec::new());
    if coeff_numer != 1 {
        numerator *= SymExpr::int(coeff_numer);
    }
    if coeff_denom != 1 {
        denominator *= SymExpr::int(coeff_denom);
    }

    for factor in rest.factors() {
        match negative_power(factor) {
            Some(base) => denominator *= base,
            None => numerator *= factor.clone(),
        }
    }

    (numerator.downgrade(), denominator.downgrade())
}

/// If the factor is raised to a negative integer power, returns it raised to the opposite power.
fn negative_power(factor: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Exp(base, exp) = factor else {
        return None;
    };

    let exp = exp.as_integer()?;
    if *exp >= 0 {
        return None;
    }

    if *exp == -1 {
        Some((**base).clone())
    } else {
        Some(SymExpr::Exp(base.clone(), Box::new(SymExpr::int(-exp.clone()))))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn numerator_and_denominator() {
        let w = SymExpr::symbol("w");
        let den = SymExpr::transition_frequency("n") - w.clone();
        let term = SymExpr::int(3) * SymExpr::int(4).recip() * w.clone() * den.clone().recip();
        let (numer, denom) = as_numer_denom(&term);
        assert_eq!(numer, SymExpr::int(3) * w);
        assert_eq!(denom, SymExpr::int(4) * den);
    }

    #[test]
    fn negative_sign_stays_in_numerator() {
        let term = -SymExpr::symbol("a") * SymExpr::symbol("b").recip();
        let (numer, denom) = as_numer_denom(&term);
        assert_eq!(numer, -SymExpr::symbol("a"));
        assert_eq!(denom, SymExpr::symbol("b"));
    }
}
