//! A mock electronic spectrum, and an evaluator for both sum-over-states and ISR expressions on
//! it.
//!
//! In the mock, the excited states are the eigenstates of the ISR matrix, so that:
//!
//! - `M` is diagonal, with the excitation energies on its diagonal.
//! - `F_x[n] = <n|mu_x|0>`.
//! - `B_x[m][n] = <m|mu_x|n> - delta_mn * <0|mu_x|0>`.
//!
//! State labels are numbers: `0` is the ground state and `1..=n` are the excited states.

#![allow(dead_code)]

use isr_compute::model::StateLabel;
use isr_compute::symbolic::{subs::relabel_states, Primary, SymExpr};
use isr_convert::tree::{ResponseVectors, RhsKey, Side};
use isr_convert::{ResponseTree, SumOverStates};
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// A scalar, vector or matrix value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Col(Array1<f64>),
    Row(Array1<f64>),
    Mat(Array2<f64>),
}

impl Value {
    pub fn scalar(&self) -> f64 {
        match self {
            Self::Scalar(value) => *value,
            other => panic!("expected a scalar, got {:?}", other),
        }
    }

    fn scale(self, factor: f64) -> Self {
        match self {
            Self::Scalar(value) => Self::Scalar(value * factor),
            Self::Col(v) => Self::Col(v * factor),
            Self::Row(v) => Self::Row(v * factor),
            Self::Mat(m) => Self::Mat(m * factor),
        }
    }

    fn transpose(self) -> Self {
        match self {
            Self::Scalar(value) => Self::Scalar(value),
            Self::Col(v) => Self::Row(v),
            Self::Row(v) => Self::Col(v),
            Self::Mat(m) => Self::Mat(m.t().to_owned()),
        }
    }

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + b),
            (Self::Col(a), Self::Col(b)) => Self::Col(a + b),
            (Self::Row(a), Self::Row(b)) => Self::Row(a + b),
            (Self::Mat(a), Self::Mat(b)) => Self::Mat(a + b),
            (a, b) => panic!("cannot add {:?} and {:?}", a, b),
        }
    }

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Scalar(a), b) => b.scale(a),
            (a, Self::Scalar(b)) => a.scale(b),
            (Self::Row(a), Self::Col(b)) => Self::Scalar(a.dot(&b)),
            (Self::Col(a), Self::Row(b)) => {
                Self::Mat(a.insert_axis(Axis(1)).dot(&b.insert_axis(Axis(0))))
            },
            (Self::Mat(a), Self::Col(b)) => Self::Col(a.dot(&b)),
            (Self::Row(a), Self::Mat(b)) => Self::Row(a.dot(&b)),
            (Self::Mat(a), Self::Mat(b)) => Self::Mat(a.dot(&b)),
            (a, b) => panic!("cannot multiply {:?} and {:?}", a, b),
        }
    }
}

/// Which states bras and kets index into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    /// Every state, including the ground state.
    Full,

    /// The excited states only.
    Excited,
}

/// The mock spectrum.
#[derive(Debug, Clone)]
pub struct Mock {
    /// The excitation energies. The ground state comes first, at zero.
    pub energies: Array1<f64>,

    /// The symmetric transition dipole matrices, by Cartesian component.
    dipoles: HashMap<String, Array2<f64>>,
}

impl Mock {
    /// Creates a spectrum with well separated excitation energies, so that no frequency used in
    /// the tests hits a pole.
    pub fn new(seed: u64, excited: usize, comps: &[&str]) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let energies = (0..=excited)
            .map(|k| if k == 0 { 0.0 } else { 0.6 * k as f64 + rng.gen_range(0.0..0.1) })
            .collect::<Array1<f64>>();

        let dipoles = comps.iter()
            .map(|comp| {
                let mut matrix = Array2::<f64>::zeros((excited + 1, excited + 1));
                for i in 0..=excited {
                    for j in i..=excited {
                        let value = rng.gen_range(-1.0..1.0);
                        matrix[[i, j]] = value;
                        matrix[[j, i]] = value;
                    }
                }
                (comp.to_string(), matrix)
            })
            .collect();

        Self { energies, dipoles }
    }

    fn excited(&self) -> usize {
        self.energies.len() - 1
    }

    fn dipole(&self, comp: &str) -> &Array2<f64> {
        &self.dipoles[comp]
    }

    fn state(label: &StateLabel) -> usize {
        label.as_str().parse().unwrap_or_else(|_| panic!("unassigned state {}", label))
    }

    fn mtm(&self, comp: &str) -> Array1<f64> {
        self.dipole(comp).slice(s![1.., 0]).to_owned()
    }

    fn s2s_mtm(&self, comp: &str) -> Array2<f64> {
        let dipole = self.dipole(comp);
        &dipole.slice(s![1.., 1..]) - &(Array2::<f64>::eye(self.excited()) * dipole[[0, 0]])
    }

    /// The ISR matrix, diagonal in the excited states.
    fn matrix(&self) -> Array2<f64> {
        Array2::from_diag(&self.energies.slice(s![1..]))
    }

    /// Evaluates a sum-over-states expression by summing over every state of the spectrum,
    /// including the ground state.
    ///
    /// Excluded cases are skipped.
    pub fn eval_sos(&self, sos: &SumOverStates, freqs: &[(&str, f64)], final_state: Option<usize>) -> f64 {
        let mut fixed = Vec::new();
        if let (Some(state), Some(label)) = (final_state, sos.final_states().first()) {
            fixed.push((label.clone(), StateLabel::new(state.to_string())));
        }
        let evaluator = self.evaluator(Space::Full, freqs, None, Vec::new());

        let indices = sos.summation_indices();
        let mut assignment = vec![0; indices.len()];
        let mut total = 0.0;
        loop {
            let mut map = fixed.clone();
            map.extend(indices.iter()
                .zip(&assignment)
                .map(|(index, state)| (index.clone(), StateLabel::new(state.to_string()))));
            let excluded = sos.excluded_cases()
                .iter()
                .any(|case| map.iter().any(|(index, state)| index == &case.0 && state == &case.1));
            if !excluded {
                total += evaluator.eval(&relabel_states(sos.expr(), &map)).scalar();
            }

            // advance the assignment like an odometer
            let Some(digit) = assignment.iter().position(|state| *state < self.excited()) else {
                return total;
            };
            assignment[digit] += 1;
            for lower in &mut assignment[..digit] {
                *lower = 0;
            }
        }
    }

    /// Evaluates a response tree, solving its response equations on the mock.
    pub fn eval_isr(&self, tree: &ResponseTree, freqs: &[(&str, f64)], final_state: Option<(&str, usize)>) -> f64 {
        let map = relabeling(final_state);
        self.evaluator(Space::Excited, freqs, Some(&tree.vectors), map.clone())
            .eval(&relabel_states(&tree.expr, &map))
            .scalar()
    }

    fn evaluator<'a>(
        &'a self,
        space: Space,
        freqs: &'a [(&'a str, f64)],
        vectors: Option<&'a ResponseVectors>,
        map: Vec<(StateLabel, StateLabel)>,
    ) -> Evaluator<'a> {
        Evaluator { mock: self, space, freqs, vectors, map }
    }
}

fn relabeling(final_state: Option<(&str, usize)>) -> Vec<(StateLabel, StateLabel)> {
    final_state.into_iter()
        .map(|(label, state)| (label.into(), StateLabel::new(state.to_string())))
        .collect()
}

struct Evaluator<'a> {
    mock: &'a Mock,
    space: Space,
    freqs: &'a [(&'a str, f64)],
    vectors: Option<&'a ResponseVectors>,

    /// The relabeling applied to the expression, also applied to the response equations.
    map: Vec<(StateLabel, StateLabel)>,
}

impl Evaluator<'_> {
    fn eval_relabeled(&self, expr: &SymExpr) -> Value {
        self.eval(&relabel_states(expr, &self.map))
    }

    fn eval(&self, expr: &SymExpr) -> Value {
        match expr {
            SymExpr::Primary(primary) => self.primary(primary),
            SymExpr::Add(terms) => terms.iter()
                .map(|term| self.eval(term))
                .reduce(Value::add)
                .unwrap_or(Value::Scalar(0.0)),
            SymExpr::Mul(factors) => factors.iter()
                .map(|factor| self.eval(factor))
                .fold(Value::Scalar(1.0), Value::mul),
            SymExpr::Exp(base, exp) => Value::Scalar(self.eval(base).scalar().powf(self.eval(exp).scalar())),
        }
    }

    fn unit(&self, label: &StateLabel) -> Array1<f64> {
        let state = Mock::state(label);
        let (len, idx) = match self.space {
            Space::Full => (self.mock.excited() + 1, state),
            Space::Excited => (self.mock.excited(), state.checked_sub(1).expect("ground state in ISR expression")),
        };
        let mut unit = Array1::zeros(len);
        unit[idx] = 1.0;
        unit
    }

    fn primary(&self, primary: &Primary) -> Value {
        match primary {
            Primary::Integer(n) => Value::Scalar(n.to_f64()),
            Primary::Symbol(name) => {
                let (_, value) = self.freqs.iter()
                    .find(|(symbol, _)| symbol == name)
                    .unwrap_or_else(|| panic!("no value for {}", name));
                Value::Scalar(*value)
            },
            Primary::TransitionFrequency(state) => Value::Scalar(self.mock.energies[Mock::state(state)]),
            Primary::Moment(moment) => {
                let dipole = self.mock.dipole(moment.comp());
                Value::Scalar(dipole[[Mock::state(moment.from_state()), Mock::state(moment.to_state())]])
            },
            Primary::Bra(state) => Value::Row(self.unit(state)),
            Primary::Ket(state) => Value::Col(self.unit(state)),
            Primary::Operator(op) => Value::Mat(self.mock.dipole(op.comp()).clone()),
            Primary::Mtm(mtm) => Value::Col(self.mock.mtm(mtm.comp())),
            Primary::S2sMtm(s2s) => Value::Mat(self.mock.s2s_mtm(s2s.comp())),
            Primary::Matrix(_) => Value::Mat(self.mock.matrix()),
            Primary::ResponseVector(vector) => {
                let equation = self.vectors
                    .and_then(|vectors| vectors.iter().find(|equation| equation.no == vector.no()))
                    .unwrap_or_else(|| panic!("no equation for {}", vector));
                assert_eq!(self.eval_relabeled(&equation.key.gamma).scalar(), 0.0);
                let w = self.eval_relabeled(&equation.key.w).scalar();

                let rhs = match &equation.key.rhs {
                    RhsKey::Mtm { .. } => Value::Col(self.mock.mtm(vector.comp())),
                    RhsKey::S2sMtm { partner, side, .. } => {
                        let s2s = Value::Mat(self.mock.s2s_mtm(vector.comp()));
                        let partner = self.eval_relabeled(&SymExpr::Primary(partner.clone()));
                        match side {
                            Side::Right => s2s.mul(partner),
                            Side::Left => partner.mul(s2s).transpose(),
                        }
                    },
                };
                let Value::Col(rhs) = rhs else { panic!("right-hand side is not a vector") };

                // the mock matrix is diagonal
                let shifted = self.mock.matrix().diag().mapv(|energy| energy - w);
                Value::Col(rhs / shifted)
            },
            Primary::Adjoint(inner) => self.primary(inner).transpose(),
        }
    }
}
