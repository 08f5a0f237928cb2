//! Powers of the imaginary unit.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};

/// `i^n` for integer `n`, reduced by the period of 4: `1`, `i`, `-1` or `-i`.
pub fn reduce_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (turns, reduced) = do_power(expr, |base, exp| {
        if !base.is_imaginary_unit() {
            return None;
        }
        let turns = exp.as_integer()?.mod_u(4);
        let reduced = match turns {
            0 => SymExpr::one(),
            1 => SymExpr::imaginary_unit(),
            2 => SymExpr::int(-1),
            _ => -SymExpr::imaginary_unit(),
        };
        Some((turns, reduced))
    })?;

    step_collector.push(Step::ImaginaryPower(turns));
    Some(reduced)
}

/// Applies all imaginary unit rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    reduce_power(expr, step_collector)
}
