//! The symbols that make up response expressions: state labels, one-particle operators, the
//! ISR operator symbols that replace them, and the response vectors solved for by an external
//! linear-response solver.
//!
//! Every symbol in this module is an immutable value. Operator-carrying symbols validate their
//! Cartesian component against the dimensionality of their [`OperatorKind`] on construction.

pub mod error;

use error::{ComponentCountMismatch, UnknownOperator};
use isr_error::Error;
use levenshtein::levenshtein;
use std::fmt;
use crate::consts::GROUND_STATE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};

/// The label of an electronic state, such as `0`, `n` or `f`.
///
/// The ground state is always labeled `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateLabel(String);

impl StateLabel {
    /// Creates a new state label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label of the ground state.
    pub fn ground() -> Self {
        Self(GROUND_STATE.to_owned())
    }

    /// Returns true if this is the ground state.
    pub fn is_ground(&self) -> bool {
        self.0 == GROUND_STATE
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The symmetry of an operator matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
#[repr(u8)]
pub enum Symmetry {
    /// No symmetry is assumed.
    #[default]
    NoSymmetry = 0,

    /// The operator is Hermitian.
    Hermitian = 1,

    /// The operator is anti-Hermitian.
    AntiHermitian = 2,
}

/// The one-particle operators that can appear in transition moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OperatorKind {
    /// The electric dipole operator `mu`.
    ElectricDipole,

    /// The magnetic dipole operator `m`.
    MagneticDipole,

    /// The diamagnetic magnetizability operator `xi`, a rank-2 tensor.
    DiamagneticMagnetizability,
}

impl OperatorKind {
    /// Every available operator.
    pub const ALL: [Self; 3] = [
        Self::ElectricDipole,
        Self::MagneticDipole,
        Self::DiamagneticMagnetizability,
    ];

    /// The name of the operator, as used by the numeric backends.
    pub fn name(self) -> &'static str {
        match self {
            Self::ElectricDipole => "electric_dipole",
            Self::MagneticDipole => "magnetic_dipole",
            Self::DiamagneticMagnetizability => "diamagnetic_magnetizability",
        }
    }

    /// The symbol used to write the operator, such as `mu` in `mu_x`.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::ElectricDipole => "mu",
            Self::MagneticDipole => "m",
            Self::DiamagneticMagnetizability => "xi",
        }
    }

    /// The symmetry of the operator matrix.
    pub fn symmetry(self) -> Symmetry {
        match self {
            Self::ElectricDipole | Self::DiamagneticMagnetizability => Symmetry::Hermitian,
            Self::MagneticDipole => Symmetry::AntiHermitian,
        }
    }

    /// The number of Cartesian component labels needed to select one element of the operator.
    pub fn dim(self) -> usize {
        match self {
            Self::ElectricDipole | Self::MagneticDipole => 1,
            Self::DiamagneticMagnetizability => 2,
        }
    }

    /// Finds the operator written with the given symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }

    /// Finds the operator with the given name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Finds the operator written with the given symbol or name, returning an error with
    /// suggestions if there is none.
    pub fn lookup(symbol: &str) -> Result<Self, Error> {
        Self::from_symbol(symbol)
            .or_else(|| Self::from_name(symbol))
            .ok_or_else(|| Error::spanless(UnknownOperator {
                symbol: symbol.to_owned(),
                suggestions: Self::suggestions(symbol),
            }))
    }

    /// Returns the symbols of the operators whose symbol or name is close to the given one.
    pub fn suggestions(symbol: &str) -> Vec<&'static str> {
        Self::ALL.into_iter()
            .filter(|kind| levenshtein(kind.symbol(), symbol) < 2 || levenshtein(kind.name(), symbol) < 3)
            .map(Self::symbol)
            .collect()
    }
}

/// Checks that `comp` selects exactly one element of an operator of the given kind.
fn check_components(kind: OperatorKind, comp: &str) -> Result<(), Error> {
    let found = comp.chars().count();
    if found == kind.dim() {
        Ok(())
    } else {
        Err(Error::spanless(ComponentCountMismatch {
            operator: kind.name(),
            expected: kind.dim(),
            found,
        }))
    }
}

/// Implements the accessors shared by every symbol that is tied to one operator component.
macro_rules! operator_symbol {
    ($name:ident) => {
        impl $name {
            /// Creates the symbol for the given Cartesian component of an operator.
            ///
            /// Fails if the number of component labels differs from the dimensionality of the
            /// operator.
            pub fn new(comp: impl Into<String>, op_type: OperatorKind) -> Result<Self, Error> {
                let comp = comp.into();
                check_components(op_type, &comp)?;
                Ok(Self { comp, op_type })
            }

            /// The Cartesian component.
            pub fn comp(&self) -> &str {
                &self.comp
            }

            /// The operator this symbol belongs to.
            pub fn op_type(&self) -> OperatorKind {
                self.op_type
            }

            /// The symmetry of the operator.
            pub fn symmetry(&self) -> Symmetry {
                self.op_type.symmetry()
            }

            /// The dimensionality of the operator.
            pub fn dim(&self) -> usize {
                self.op_type.dim()
            }
        }
    };
}

/// A Cartesian component of a one-particle operator, such as `mu_x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OneParticleOperator {
    comp: String,
    op_type: OperatorKind,
}

operator_symbol!(OneParticleOperator);

impl fmt::Display for OneParticleOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_{}", self.op_type.symbol(), self.comp)
    }
}

/// The modified transition moment `F`, the ISR counterpart of `<0|op` and `op|0>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mtm {
    comp: String,
    op_type: OperatorKind,
}

operator_symbol!(Mtm);

impl fmt::Display for Mtm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "F({})_{}", self.op_type.symbol(), self.comp)
    }
}

/// The state-to-state modified transition moment `B`, the ISR counterpart of an operator
/// between two excited states.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct S2sMtm {
    comp: String,
    op_type: OperatorKind,
}

operator_symbol!(S2sMtm);

impl fmt::Display for S2sMtm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "B({})_{}", self.op_type.symbol(), self.comp)
    }
}

impl From<&OneParticleOperator> for Mtm {
    fn from(op: &OneParticleOperator) -> Self {
        Self { comp: op.comp.clone(), op_type: op.op_type }
    }
}

impl From<&OneParticleOperator> for S2sMtm {
    fn from(op: &OneParticleOperator) -> Self {
        Self { comp: op.comp.clone(), op_type: op.op_type }
    }
}

/// Which kind of ISR operator symbol generated the right-hand side of a response equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MtmKind {
    /// A modified transition moment.
    Mtm,

    /// A state-to-state modified transition moment, contracted with a state or another response
    /// vector.
    S2sMtm,
}

/// The unknown solution of one linear response equation.
///
/// Response vectors with the same number are solutions of the same equation, differing at most
/// in their Cartesian component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResponseVector {
    /// The Cartesian component of the right-hand side.
    comp: String,

    /// The identity number of the response equation.
    no: usize,

    /// The kind of operator symbol on the right-hand side.
    mtm_type: MtmKind,

    /// The operator on the right-hand side.
    op_type: OperatorKind,
}

impl ResponseVector {
    /// Creates the response vector for one component of the right-hand side of equation `no`.
    ///
    /// Fails if the number of component labels differs from the dimensionality of the operator.
    pub fn new(
        comp: impl Into<String>,
        no: usize,
        mtm_type: MtmKind,
        op_type: OperatorKind,
    ) -> Result<Self, Error> {
        let comp = comp.into();
        check_components(op_type, &comp)?;
        Ok(Self { comp, no, mtm_type, op_type })
    }

    /// The Cartesian component.
    pub fn comp(&self) -> &str {
        &self.comp
    }

    /// The identity number of the response equation.
    pub fn no(&self) -> usize {
        self.no
    }

    pub fn mtm_type(&self) -> MtmKind {
        self.mtm_type
    }

    pub fn op_type(&self) -> OperatorKind {
        self.op_type
    }

    /// The symmetry of the operator on the right-hand side.
    pub fn symmetry(&self) -> Symmetry {
        self.op_type.symmetry()
    }
}

impl fmt::Display for ResponseVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X_({}, {})", self.comp, self.no)
    }
}

/// A plain transition moment `<from|op|to>` that involves the ground state, treated as a
/// commutative scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Moment {
    comp: String,
    from_state: StateLabel,
    to_state: StateLabel,
    op_type: OperatorKind,
}

impl Moment {
    /// Creates the transition moment of an operator component between two states.
    pub fn new(
        comp: impl Into<String>,
        from_state: StateLabel,
        to_state: StateLabel,
        op_type: OperatorKind,
    ) -> Result<Self, Error> {
        let comp = comp.into();
        check_components(op_type, &comp)?;
        Ok(Self { comp, from_state, to_state, op_type })
    }

    /// Creates the transition moment for the matrix element of `op` between two states.
    pub fn of(op: &OneParticleOperator, from_state: StateLabel, to_state: StateLabel) -> Self {
        Self {
            comp: op.comp.clone(),
            from_state,
            to_state,
            op_type: op.op_type,
        }
    }

    /// The Cartesian component.
    pub fn comp(&self) -> &str {
        &self.comp
    }

    /// The initial state.
    pub fn from_state(&self) -> &StateLabel {
        &self.from_state
    }

    /// The final state.
    pub fn to_state(&self) -> &StateLabel {
        &self.to_state
    }

    /// The operator.
    pub fn op_type(&self) -> OperatorKind {
        self.op_type
    }

    /// Returns a copy of this moment with every state label passed through `f`.
    pub fn map_states(&self, mut f: impl FnMut(&StateLabel) -> StateLabel) -> Self {
        Self {
            comp: self.comp.clone(),
            from_state: f(&self.from_state),
            to_state: f(&self.to_state),
            op_type: self.op_type,
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}_{}^{}{}",
            self.op_type.symbol(),
            self.comp,
            self.from_state,
            self.to_state,
        )
    }
}
