//! Conversion of sum-over-states (SOS) response expressions into the intermediate state
//! representation (ISR).
//!
//! A [`SumOverStates`] holds an SOS expression together with its summation indices. Converting it
//! happens in three stages:
//!
//! 1. [`extra_terms`] finds the terms that appear when a summation index takes the value of the
//!    ground state or of another state of the term, and keeps those that do not cancel.
//! 2. [`to_isr`] rewrites every term: transition moments become modified transition moments, and
//!    every `|n><n|/(w_n - w)` becomes a resolvent of the ISR matrix.
//! 3. [`build_tree`] replaces each resolvent and its right-hand side with a response vector, and
//!    lists the response equations an external solver has to compute.
//!
//! ```
//! use isr_convert::{build_tree, to_isr, SumOverStates};
//!
//! let sos = SumOverStates::parse("<0|mu_a|n><n|mu_b|0>/(w_n - w)", ["n"]).unwrap();
//! let isr = to_isr(&sos, false).unwrap();
//! let tree = build_tree(&isr).unwrap();
//! assert_eq!(tree.vectors.len(), 1);
//! ```

pub mod error;
pub mod extra_terms;
pub mod matcher;
pub mod rewrite;
pub mod sos;
pub mod tree;

pub use extra_terms::ExtraTermStep;
pub use sos::{EvaluationRequest, SumOverStates};
pub use tree::{build_tree, ResponseTree};

use isr_compute::symbolic::{StepCollector, SymExpr};
use isr_error::Error;

fn inner_extra_terms(
    sos: &SumOverStates,
    step_collector: &mut dyn StepCollector<ExtraTermStep>,
) -> Result<SymExpr, Error> {
    extra_terms::compute_extra_terms(
        sos.expr(),
        sos.summation_indices(),
        sos.excluded_cases(),
        sos.correlations(),
        step_collector,
    )
}

/// Returns the extra terms of the expression that do not cancel, with their moments written as
/// ground state moments.
pub fn extra_terms(sos: &SumOverStates) -> Result<SymExpr, Error> {
    inner_extra_terms(sos, &mut ())
}

/// Returns the extra terms of the expression, also returning the extra terms found for each
/// special case before cancellation.
pub fn extra_terms_with_steps(sos: &SumOverStates) -> Result<(SymExpr, Vec<ExtraTermStep>), Error> {
    let mut steps = Vec::new();
    let expr = inner_extra_terms(sos, &mut steps)?;
    Ok((expr, steps))
}

fn inner_to_isr(
    sos: &SumOverStates,
    include_extra_terms: bool,
    step_collector: &mut dyn StepCollector<ExtraTermStep>,
) -> Result<SymExpr, Error> {
    let mut expr = sos.expr().clone();
    if include_extra_terms {
        let extra = inner_extra_terms(sos, step_collector)?;
        if !extra.is_literal_zero() {
            expr = expr + extra;
        }
    }

    let mut converted = SymExpr::Add(Vec::new());
    for term in expr.terms() {
        converted += rewrite::to_isr_single_term(term, sos.operators())?;
    }
    Ok(converted.downgrade())
}

/// Converts the expression into its ISR formulation, optionally adding its extra terms first.
pub fn to_isr(sos: &SumOverStates, include_extra_terms: bool) -> Result<SymExpr, Error> {
    inner_to_isr(sos, include_extra_terms, &mut ())
}

/// Converts the expression into its ISR formulation, also returning the extra terms found for
/// each special case.
pub fn to_isr_with_steps(
    sos: &SumOverStates,
    include_extra_terms: bool,
) -> Result<(SymExpr, Vec<ExtraTermStep>), Error> {
    let mut steps = Vec::new();
    let expr = inner_to_isr(sos, include_extra_terms, &mut steps)?;
    Ok((expr, steps))
}
