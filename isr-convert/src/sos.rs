//! Sum-over-states expressions and the checks done before evaluating them.

use crate::error::{
    ConflictingFrequency,
    InvalidExcludedCase,
    MissingFinalState,
    OperatorNotFound,
    SummationIndexNotFound,
    UnexpectedFinalState,
    UnknownFrequency,
};
use crate::extra_terms::Case;
use crate::matcher;
use isr_compute::model::{OneParticleOperator, StateLabel};
use isr_compute::symbolic::{expr::from_ast, subs::subs_simultaneous, Primary, SymExpr};
use isr_error::Error;
use itertools::Itertools;
use rug::Rational;

/// A sum-over-states expression, with everything needed to convert it into its ISR formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SumOverStates {
    /// The expression, a sum of products of transition moments and energy denominators.
    expr: SymExpr,

    /// The states that are summed over.
    summation_indices: Vec<StateLabel>,

    /// Values of summation indices that are left out of the sum.
    excluded_cases: Vec<Case>,

    /// Relations between the external frequencies, such as `w_o -> w_1 + w_2`.
    correlations: Vec<(SymExpr, SymExpr)>,

    /// The operators of the expression, in order of first appearance.
    operators: Vec<OneParticleOperator>,
}

impl SumOverStates {
    /// Creates a sum over the given summation indices.
    ///
    /// Every summation index must label a bra or ket of the expression.
    pub fn new<S: Into<StateLabel>>(
        expr: SymExpr,
        summation_indices: impl IntoIterator<Item = S>,
    ) -> Result<Self, Error> {
        let summation_indices = summation_indices.into_iter().map(Into::into).collect::<Vec<_>>();
        let states = matcher::states(&expr);
        if let Some(index) = summation_indices.iter().find(|index| !states.contains(index)) {
            return Err(Error::spanless(SummationIndexNotFound { index: index.to_string() }));
        }

        Ok(Self {
            operators: matcher::operators(&expr),
            expr,
            summation_indices,
            excluded_cases: Vec::new(),
            correlations: Vec::new(),
        })
    }

    /// Parses the expression from its textual notation.
    pub fn parse<S: Into<StateLabel>>(
        source: &str,
        summation_indices: impl IntoIterator<Item = S>,
    ) -> Result<Self, Error> {
        let ast = isr_parser::parse(source)?;
        Self::new(from_ast(&ast)?, summation_indices)
    }

    /// Leaves the given `(index, value)` cases out of the sum.
    pub fn with_excluded_cases(mut self, cases: impl IntoIterator<Item = Case>) -> Result<Self, Error> {
        for (index, value) in cases {
            if !self.summation_indices.contains(&index) {
                return Err(Error::spanless(InvalidExcludedCase {
                    index: index.to_string(),
                    value: value.to_string(),
                }));
            }
            self.excluded_cases.push((index, value));
        }
        Ok(self)
    }

    /// Adds relations between the external frequencies, used to decide whether extra terms
    /// cancel.
    pub fn with_correlations(mut self, correlations: impl IntoIterator<Item = (SymExpr, SymExpr)>) -> Self {
        self.correlations.extend(correlations);
        self
    }

    /// Replaces the expression with the sum over all permutations of the given operators and
    /// their frequencies.
    ///
    /// Each permutation swaps the operators and their frequencies simultaneously. The unpermuted
    /// expression comes first.
    pub fn with_permutations(mut self, pairs: &[(OneParticleOperator, SymExpr)]) -> Result<Self, Error> {
        if let Some((op, _)) = pairs.iter().find(|(op, _)| !self.operators.contains(op)) {
            return Err(Error::spanless(OperatorNotFound { operator: op.to_string() }));
        }

        let operator = |op: &OneParticleOperator| SymExpr::Primary(Primary::Operator(op.clone()));
        self.expr = (0..pairs.len())
            .permutations(pairs.len())
            .map(|perm| {
                let substitutions = pairs.iter()
                    .zip(&perm)
                    .enumerate()
                    .filter(|(from, (_, &to))| *from != to)
                    .flat_map(|(_, ((op, freq), &to))| {
                        let (new_op, new_freq) = &pairs[to];
                        [(operator(op), operator(new_op)), (freq.clone(), new_freq.clone())]
                    })
                    .collect::<Vec<_>>();
                subs_simultaneous(&self.expr, &substitutions)
            })
            .fold(SymExpr::Add(Vec::new()), |acc, term| acc + term)
            .downgrade();
        Ok(self)
    }

    /// The expression.
    pub fn expr(&self) -> &SymExpr {
        &self.expr
    }

    /// The summation indices.
    pub fn summation_indices(&self) -> &[StateLabel] {
        &self.summation_indices
    }

    /// The excluded cases.
    pub fn excluded_cases(&self) -> &[Case] {
        &self.excluded_cases
    }

    /// The frequency correlations.
    pub fn correlations(&self) -> &[(SymExpr, SymExpr)] {
        &self.correlations
    }

    /// The operators of the expression.
    pub fn operators(&self) -> &[OneParticleOperator] {
        &self.operators
    }

    /// The states of the expression that are neither the ground state nor summed over, such as
    /// the final state of an absorption process.
    pub fn final_states(&self) -> Vec<StateLabel> {
        matcher::states(&self.expr)
            .into_iter()
            .filter(|state| !state.is_ground() && !self.summation_indices.contains(state))
            .collect()
    }
}

/// The values a caller wants to evaluate a converted expression at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationRequest {
    /// Values of the external frequencies, by symbol name.
    pub frequencies: Vec<(String, Rational)>,

    /// The final state, for expressions that have one.
    pub final_state: Option<StateLabel>,
}

impl EvaluationRequest {
    /// Checks that the request fits the expression.
    pub fn check(&self, sos: &SumOverStates) -> Result<(), Error> {
        for (idx, (symbol, value)) in self.frequencies.iter().enumerate() {
            let conflicting = self.frequencies[..idx]
                .iter()
                .any(|(other, other_value)| other == symbol && other_value != value);
            if conflicting {
                return Err(Error::spanless(ConflictingFrequency { symbol: symbol.clone() }));
            }

            if !sos.expr().contains(|expr| expr.as_symbol() == Some(symbol.as_str())) {
                return Err(Error::spanless(UnknownFrequency { symbol: symbol.clone() }));
            }
        }

        let final_states = sos.final_states();
        match (&self.final_state, final_states.first()) {
            (Some(state), _) if !final_states.contains(state) => {
                Err(Error::spanless(UnexpectedFinalState { state: state.to_string() }))
            },
            (None, Some(state)) => Err(Error::spanless(MissingFinalState { state: state.to_string() })),
            _ => Ok(()),
        }
    }

    /// Returns the substitutions that set every frequency to its value.
    pub fn substitutions(&self) -> Vec<(SymExpr, SymExpr)> {
        self.frequencies.iter()
            .map(|(symbol, value)| (SymExpr::symbol(symbol.as_str()), SymExpr::rational(value.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use isr_compute::model::OperatorKind;
    use isr_compute::primitive::rational;
    use pretty_assertions::assert_eq;
    use super::*;

    fn op(comp: &str) -> OneParticleOperator {
        OneParticleOperator::new(comp, OperatorKind::ElectricDipole).unwrap()
    }

    fn w(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    fn alpha_term(a: &str, b: &str, freq: SymExpr) -> SymExpr {
        SymExpr::transition_moment("0", op(a), "n")
            * SymExpr::transition_moment("n", op(b), "0")
            / (SymExpr::transition_frequency("n") - freq)
    }

    #[test]
    fn permutation_order() {
        let expr = SymExpr::transition_moment("0", op("a"), "n")
            * SymExpr::transition_moment("n", op("b"), "k")
            * SymExpr::transition_moment("k", op("c"), "0")
            / ((SymExpr::transition_frequency("n") - w("w_1")) * (SymExpr::transition_frequency("k") - w("w_2")));
        let sos = SumOverStates::new(expr.clone(), ["n", "k"])
            .unwrap()
            .with_permutations(&[(op("a"), w("w_o")), (op("b"), w("w_1")), (op("c"), w("w_2"))])
            .unwrap();

        let terms = sos.expr().terms();
        assert_eq!(terms.len(), 6);
        assert_eq!(terms[0], expr);

        // second ordering swaps b and c together with their frequencies
        let swapped = SymExpr::transition_moment("0", op("a"), "n")
            * SymExpr::transition_moment("n", op("c"), "k")
            * SymExpr::transition_moment("k", op("b"), "0")
            / ((SymExpr::transition_frequency("n") - w("w_2")) * (SymExpr::transition_frequency("k") - w("w_1")));
        assert!(isr_compute::symbolic::numeric::equivalent(&terms[1], &swapped));
    }

    #[test]
    fn summation_indices_must_appear() {
        let expr = alpha_term("a", "b", w("w"));
        assert!(SumOverStates::new(expr.clone(), ["n"]).is_ok());

        let err = SumOverStates::new(expr, ["k"]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SummationIndexNotFound>(),
            Some(&SummationIndexNotFound { index: "k".to_owned() }),
        );
    }

    #[test]
    fn excluded_cases_must_name_indices() {
        let sos = SumOverStates::new(alpha_term("a", "b", w("w")), ["n"]).unwrap();
        let err = sos.clone()
            .with_excluded_cases([("f".into(), "0".into())])
            .unwrap_err();
        assert!(err.is::<InvalidExcludedCase>());

        let sos = sos.with_excluded_cases([("n".into(), "0".into())]).unwrap();
        assert_eq!(sos.excluded_cases(), &[("n".into(), "0".into())]);
    }

    #[test]
    fn polarizability_permutations() {
        let sos = SumOverStates::new(alpha_term("a", "b", w("w")), ["n"])
            .unwrap()
            .with_permutations(&[(op("a"), -w("w")), (op("b"), w("w"))])
            .unwrap();
        assert_eq!(sos.expr(), &(alpha_term("a", "b", w("w")) + alpha_term("b", "a", -w("w"))));
        assert_eq!(sos.operators(), &[op("a"), op("b")]);

        let err = sos.with_permutations(&[(op("c"), w("w"))]).unwrap_err();
        assert!(err.is::<OperatorNotFound>());
    }

    #[test]
    fn parse_notation() {
        let sos = SumOverStates::parse("<0|mu_a|n><n|mu_b|f>/(w_n - w_f/2)", ["n"]).unwrap();
        assert_eq!(sos.final_states(), vec![StateLabel::from("f")]);
        assert_eq!(sos.operators(), &[op("a"), op("b")]);
    }

    #[test]
    fn evaluation_checks() {
        let sos = SumOverStates::new(alpha_term("a", "b", w("w")), ["n"]).unwrap();

        let request = EvaluationRequest {
            frequencies: vec![("w".to_owned(), rational(1, 2)), ("w".to_owned(), rational(1, 2))],
            final_state: None,
        };
        assert!(request.check(&sos).is_ok());
        assert_eq!(request.substitutions()[0], (w("w"), SymExpr::int(2).recip()));

        let conflicting = EvaluationRequest {
            frequencies: vec![("w".to_owned(), rational(1, 2)), ("w".to_owned(), rational(1, 3))],
            final_state: None,
        };
        assert!(conflicting.check(&sos).unwrap_err().is::<ConflictingFrequency>());

        let unknown = EvaluationRequest {
            frequencies: vec![("w_o".to_owned(), rational(1, 2))],
            final_state: None,
        };
        assert!(unknown.check(&sos).unwrap_err().is::<UnknownFrequency>());

        let unexpected = EvaluationRequest {
            frequencies: Vec::new(),
            final_state: Some("f".into()),
        };
        assert!(unexpected.check(&sos).unwrap_err().is::<UnexpectedFinalState>());

        let tpa = SumOverStates::parse("<0|mu_a|n><n|mu_b|f>/(w_n - w_f/2)", ["n"]).unwrap();
        let missing = EvaluationRequest::default();
        assert!(missing.check(&tpa).unwrap_err().is::<MissingFinalState>());
        let given = EvaluationRequest { frequencies: Vec::new(), final_state: Some("f".into()) };
        assert!(given.check(&tpa).is_ok());
    }
}
