use isr_compute::model::{Moment, OneParticleOperator, OperatorKind, StateLabel};
use isr_compute::symbolic::{numeric::equivalent, Primary, SymExpr};
use isr_convert::error::StaticExtraTerms;
use isr_convert::{extra_terms, extra_terms_with_steps, SumOverStates};
use pretty_assertions::assert_eq;

fn moment(comp: &str, to: &str) -> SymExpr {
    let op = OneParticleOperator::new(comp, OperatorKind::ElectricDipole).unwrap();
    SymExpr::Primary(Primary::Moment(Moment::of(&op, StateLabel::ground(), to.into())))
}

#[test]
fn polarizability_terms_cancel() {
    let sos = SumOverStates::parse(
        "<0|mu_a|n><n|mu_b|0>/(w_n - w) + <0|mu_b|n><n|mu_a|0>/(w_n + w)",
        ["n"],
    ).unwrap();
    let (expr, steps) = extra_terms_with_steps(&sos).unwrap();
    assert_eq!(expr, SymExpr::zero());
    assert_eq!(steps.len(), 2);
}

#[test]
fn two_photon_terms_cancel() {
    let sos = SumOverStates::parse(
        "<0|mu_a|n><n|mu_b|f>/(w_n - w_f/2) + <0|mu_b|n><n|mu_a|f>/(w_n - w_f/2)",
        ["n"],
    ).unwrap();
    let (expr, steps) = extra_terms_with_steps(&sos).unwrap();
    assert_eq!(expr, SymExpr::zero());
    assert_eq!(steps.len(), 4);
}

#[test]
fn rixs_terms_survive() {
    let sos = SumOverStates::parse("<f|mu_a|n><n|mu_b|0>/(w_n - w)", ["n"]).unwrap();
    let w = SymExpr::symbol("w");
    let expected = moment("a", "f") * moment("b", "0") / -w.clone()
        + moment("a", "0") * moment("b", "f") / (SymExpr::transition_frequency("f") - w);

    let expr = extra_terms(&sos).unwrap();
    assert_eq!(expr.terms().len(), 2);
    assert!(equivalent(&expr, &expected));
}

#[test]
fn correlations_cancel_terms() {
    // the two ground state terms only cancel once w_2 is known to equal w_1
    let sos = SumOverStates::parse(
        "<0|mu_a|n><n|mu_b|0>/(w_n - w_1) + <0|mu_b|n><n|mu_a|0>/(w_n + w_2)",
        ["n"],
    ).unwrap();
    assert_eq!(extra_terms(&sos).unwrap().terms().len(), 2);

    let sos = sos.with_correlations([(SymExpr::symbol("w_2"), SymExpr::symbol("w_1"))]);
    assert_eq!(extra_terms(&sos).unwrap(), SymExpr::zero());
}

#[test]
fn static_polarizability_fails() {
    let sos = SumOverStates::parse("<0|mu_a|n><n|mu_b|0>/w_n", ["n"]).unwrap();
    assert!(extra_terms(&sos).unwrap_err().is::<StaticExtraTerms>());

    let sos = sos.with_excluded_cases([("n".into(), "0".into())]).unwrap();
    assert_eq!(extra_terms(&sos).unwrap(), SymExpr::zero());
}
