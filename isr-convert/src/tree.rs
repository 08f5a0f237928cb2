//! Response trees of ISR expressions.
//!
//! An ISR expression contains resolvents `(M - w - i*gamma)^-1` next to modified transition
//! moments. Each such pair is the solution of a linear response equation, and is replaced by a
//! response vector:
//!
//! - `(M - w)^-1 * F` becomes the response vector `X` solving `(M - w) X = F`.
//! - `F^† * (M - w)^-1` becomes `X^†`, where `X` solves the adjoint equation `(M - w)^† X = F`.
//! - `(M - w)^-1 * B * |f>` becomes the response vector solving `(M - w) X = B |f>`. The ket can
//!   also be a response vector found earlier; on the left side, a bra or the adjoint of a response
//!   vector is accepted.
//!
//! The expression is split into a tree whose root is the whole expression, whose inner nodes are
//! the terms, and whose leaves are the response equations found in each term. The tree lives in an
//! arena of nodes that refer to their parent by index. When a leaf is assigned its response vector,
//! the substitution is carried up through all of its ancestors.
//!
//! Response equations that only differ in the Cartesian component of their right-hand side share
//! the same identity number. After every round of substitutions, the tree is rebuilt, since a
//! state-to-state moment next to a freshly created response vector can form a new right-hand side.

use crate::error::{MalformedRightHandSide, RecursionLimit};
use crate::matcher::noncommutative_positions;
use isr_compute::model::{MtmKind, OperatorKind, ResponseVector};
use isr_compute::symbolic::{numeric::equivalent, simplify, subs::subs, Primary, SymExpr};
use isr_compute::MAX_DEPTH;
use isr_error::Error;
use log::{debug, warn};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The side of the resolvent that the right-hand side was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// The right-hand side precedes the resolvent, and the response vector enters as its adjoint.
    Left,

    /// The right-hand side follows the resolvent.
    Right,
}

/// The right-hand side of a response equation, without its Cartesian component.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RhsKey {
    /// A modified transition moment of the given operator.
    Mtm {
        op_type: OperatorKind,
    },

    /// A state-to-state modified transition moment of the given operator, contracted with a state
    /// or another response vector.
    S2sMtm {
        op_type: OperatorKind,
        partner: Primary,
        side: Side,
    },
}

impl RhsKey {
    /// The operator of the right-hand side.
    pub fn op_type(&self) -> OperatorKind {
        match self {
            Self::Mtm { op_type } | Self::S2sMtm { op_type, .. } => *op_type,
        }
    }

    /// The kind of operator symbol of the right-hand side.
    pub fn mtm_type(&self) -> MtmKind {
        match self {
            Self::Mtm { .. } => MtmKind::Mtm,
            Self::S2sMtm { .. } => MtmKind::S2sMtm,
        }
    }
}

/// Identifies a response equation: its right-hand side, frequency and damping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorKey {
    /// The right-hand side.
    pub rhs: RhsKey,

    /// The frequency `w` of the resolvent `(M - w - i*gamma)^-1`.
    pub w: SymExpr,

    /// The damping `gamma` of the resolvent `(M - w - i*gamma)^-1`.
    pub gamma: SymExpr,
}

impl VectorKey {
    /// Returns true if both keys describe the same response equation. Frequencies and dampings
    /// are compared numerically.
    pub fn matches(&self, other: &Self) -> bool {
        self.rhs == other.rhs
            && equivalent(&self.w, &other.w)
            && equivalent(&self.gamma, &other.gamma)
    }
}

/// A response equation and the components of its right-hand side that were requested.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResponseEquation {
    /// The equation.
    pub key: VectorKey,

    /// The identity number shared by every component.
    pub no: usize,

    /// The response vectors, one per component.
    pub vectors: Vec<ResponseVector>,
}

/// Every response equation found in an expression.
///
/// This is what an external solver needs to compute: one solution per identity number, for each
/// listed component.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResponseVectors {
    equations: Vec<ResponseEquation>,
}

impl ResponseVectors {
    /// Returns the response vector for the given component of the equation, creating it if
    /// needed.
    ///
    /// Equations are numbered from 1 in the order they are first seen. Fails if the component
    /// does not fit the operator of the right-hand side.
    pub fn get_or_insert(&mut self, key: VectorKey, comp: &str) -> Result<ResponseVector, Error> {
        let vector = |no: usize| ResponseVector::new(comp, no, key.rhs.mtm_type(), key.rhs.op_type());

        if let Some(equation) = self.equations.iter_mut().find(|equation| equation.key.matches(&key)) {
            if let Some(existing) = equation.vectors.iter().find(|existing| existing.comp() == comp) {
                return Ok(existing.clone());
            }
            let new = vector(equation.no)?;
            equation.vectors.push(new.clone());
            return Ok(new);
        }

        let new = vector(self.equations.len() + 1)?;
        self.equations.push(ResponseEquation {
            no: new.no(),
            vectors: vec![new.clone()],
            key,
        });
        Ok(new)
    }

    /// Returns an iterator over the equations, in order of their identity numbers.
    pub fn iter(&self) -> impl Iterator<Item = &ResponseEquation> {
        self.equations.iter()
    }

    /// The number of distinct response equations.
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    /// Returns true if there are no response equations.
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }
}

/// The result of [`build_tree`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTree {
    /// The expression, with every resolved response equation replaced by its response vector.
    pub expr: SymExpr,

    /// The response equations.
    pub vectors: ResponseVectors,

    /// The resolvents next to which no right-hand side was found. They are left in
    /// [`ResponseTree::expr`].
    pub unresolved: Vec<SymExpr>,
}

/// Returns the right-hand side key of a response equation and the Cartesian component of its
/// operator.
pub fn vector_key(rhs: &SymExpr, side: Side) -> Result<(RhsKey, String), Error> {
    let malformed = || Error::spanless(MalformedRightHandSide { rhs: rhs.to_string() });
    match rhs {
        SymExpr::Primary(primary) => match primary.unadjoint().0 {
            Primary::Mtm(mtm) => Ok((RhsKey::Mtm { op_type: mtm.op_type() }, mtm.comp().to_owned())),
            _ => Err(malformed()),
        },
        SymExpr::Mul(factors) if factors.len() == 2 => {
            let (s2s, partner) = match side {
                Side::Left => (&factors[1], &factors[0]),
                Side::Right => (&factors[0], &factors[1]),
            };
            match (s2s.as_primary(), partner.as_primary()) {
                (Some(Primary::S2sMtm(s2s)), Some(partner)) => Ok((
                    RhsKey::S2sMtm { op_type: s2s.op_type(), partner: partner.clone(), side },
                    s2s.comp().to_owned(),
                )),
                _ => Err(malformed()),
            }
        },
        _ => Err(malformed()),
    }
}

/// Splits the base of a resolvent, `M - w - i*gamma`, into its frequency `w` and damping `gamma`.
pub fn decode_resolvent(base: &SymExpr) -> (SymExpr, SymExpr) {
    let mut w = SymExpr::Add(Vec::new());
    let mut gamma = SymExpr::Add(Vec::new());
    for term in base.terms() {
        if is_matrix(term) {
            continue;
        }

        let factors = term.factors();
        match factors.iter().position(SymExpr::is_imaginary_unit) {
            Some(i) => {
                let rest = factors.iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != i)
                    .map(|(_, factor)| factor.clone())
                    .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor)
                    .downgrade();
                gamma += -rest;
            },
            None => w += -term.clone(),
        }
    }

    (simplify(&w.downgrade()), simplify(&gamma.downgrade()))
}

fn is_matrix(expr: &SymExpr) -> bool {
    matches!(expr.as_primary(), Some(Primary::Matrix(_)))
}

/// If the factor is a resolvent `(M + r)^-1`, returns its base.
fn as_resolvent(factor: &SymExpr) -> Option<&SymExpr> {
    let SymExpr::Exp(base, exp) = factor else {
        return None;
    };
    if exp.as_integer().map_or(false, |n| *n == -1) && base.terms().iter().any(is_matrix) {
        Some(&**base)
    } else {
        None
    }
}

fn is_mtm(primary: &Primary) -> bool {
    matches!(primary.unadjoint().0, Primary::Mtm(_))
}

fn is_s2s(primary: &Primary) -> bool {
    matches!(primary, Primary::S2sMtm(_))
}

/// Returns true if the primary can stand next to a state-to-state moment on the given side of a
/// right-hand side.
fn is_partner(primary: &Primary, side: Side) -> bool {
    match (side, primary) {
        (Side::Right, Primary::Ket(_) | Primary::ResponseVector(_)) => true,
        (Side::Left, Primary::Bra(_)) => true,
        (Side::Left, Primary::Adjoint(inner)) => matches!(**inner, Primary::ResponseVector(_)),
        _ => false,
    }
}

/// A response equation found in a term.
#[derive(Debug, Clone)]
struct ResponseNode {
    /// The key of the equation.
    key: VectorKey,

    /// The Cartesian component of the right-hand side.
    comp: String,

    /// The side of the resolvent the right-hand side was found on.
    side: Side,

    /// Whether the right-hand side is an adjoint modified transition moment.
    adjoint_rhs: bool,
}

#[derive(Debug, Clone)]
enum NodeKind {
    /// The whole expression, or one of its terms.
    Isr,

    /// A response equation.
    Response(ResponseNode),
}

#[derive(Debug, Clone)]
struct Node {
    expr: SymExpr,
    parent: Option<usize>,
    kind: NodeKind,
}

/// A tree of nodes stored in an arena. The root is at index 0.
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,

    /// Resolvents for which no right-hand side was found.
    unresolved: Vec<SymExpr>,
}

impl Tree {
    fn new(expr: SymExpr) -> Self {
        Self {
            nodes: vec![Node { expr, parent: None, kind: NodeKind::Isr }],
            unresolved: Vec::new(),
        }
    }

    fn push(&mut self, expr: SymExpr, parent: usize, kind: NodeKind) -> usize {
        self.nodes.push(Node { expr, parent: Some(parent), kind });
        self.nodes.len() - 1
    }

    fn depth(&self, mut idx: usize) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.nodes[idx].parent {
            depth += 1;
            idx = parent;
        }
        depth
    }

    /// Adds the children of the node at the given index.
    fn build_branches(&mut self, idx: usize, depth: usize) -> Result<(), Error> {
        if depth > MAX_DEPTH {
            return Err(Error::spanless(RecursionLimit { limit: MAX_DEPTH }));
        }

        match self.nodes[idx].expr.clone() {
            SymExpr::Add(terms) => {
                for term in terms {
                    let child = self.push(term, idx, NodeKind::Isr);
                    self.build_branches(child, depth + 1)?;
                }
            },
            SymExpr::Mul(factors) => self.add_response_nodes(idx, &factors)?,
            SymExpr::Primary(_) | SymExpr::Exp(..) => (),
        }
        Ok(())
    }

    /// Finds the response equations among the factors of a term, and adds them as children of
    /// the term's node.
    fn add_response_nodes(&mut self, idx: usize, factors: &[SymExpr]) -> Result<(), Error> {
        let positions = noncommutative_positions(factors);
        let mut claimed = Vec::new();
        for (at, &pos) in positions.iter().enumerate() {
            let Some(base) = as_resolvent(&factors[pos]) else {
                continue;
            };

            // the non-commutative neighbor at the given offset, if it is still free
            let neighbor = |offset: isize| {
                let idx = at.checked_add_signed(offset)?;
                let pos = *positions.get(idx)?;
                if claimed.contains(&pos) {
                    return None;
                }
                factors[pos].as_primary().map(|primary| (pos, primary))
            };

            let found = match (neighbor(-2), neighbor(-1), neighbor(1), neighbor(2)) {
                (_, _, Some((next, f)), _) if is_mtm(f) => Some((Side::Right, vec![next])),
                (_, Some((prev, f)), _, _) if is_mtm(f) => Some((Side::Left, vec![prev])),
                (_, _, Some((next, b)), Some((next2, p))) if is_s2s(b) && is_partner(p, Side::Right) => {
                    Some((Side::Right, vec![next, next2]))
                },
                (Some((prev2, p)), Some((prev, b)), _, _) if is_s2s(b) && is_partner(p, Side::Left) => {
                    Some((Side::Left, vec![prev2, prev]))
                },
                _ => None,
            };

            let Some((side, rhs_positions)) = found else {
                self.unresolved.push(factors[pos].clone());
                continue;
            };
            claimed.extend_from_slice(&rhs_positions);

            let rhs = rhs_positions.iter()
                .map(|pos| factors[*pos].clone())
                .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor)
                .downgrade();
            let expr = match side {
                Side::Left => rhs.clone() * factors[pos].clone(),
                Side::Right => factors[pos].clone() * rhs.clone(),
            };

            let (rhs_key, comp) = vector_key(&rhs, side)?;
            let (w, gamma) = decode_resolvent(base);

            // the adjoint equation has the opposite damping
            let gamma = match side {
                Side::Left => simplify(&-gamma),
                Side::Right => gamma,
            };

            let adjoint_rhs = rhs.as_primary().map_or(false, |primary| primary.unadjoint().1);
            let node = ResponseNode {
                key: VectorKey { rhs: rhs_key, w, gamma },
                comp,
                side,
                adjoint_rhs,
            };
            self.push(expr, idx, NodeKind::Response(node));
        }
        Ok(())
    }

    /// Replaces the expression of a node, and carries the substitution up to the root.
    fn propagate(&mut self, idx: usize, new: SymExpr) {
        let mut old = std::mem::replace(&mut self.nodes[idx].expr, new.clone());
        let mut new = new;
        let mut current = self.nodes[idx].parent;
        while let Some(idx) = current {
            let updated = subs(&self.nodes[idx].expr, &old, &new);
            old = std::mem::replace(&mut self.nodes[idx].expr, updated.clone());
            new = updated;
            current = self.nodes[idx].parent;
        }
    }

    /// Assigns a response vector to every response node. Returns the number of response nodes.
    fn resolve(&mut self, vectors: &mut ResponseVectors) -> Result<usize, Error> {
        let leaves = self.nodes.iter()
            .enumerate()
            .filter_map(|(idx, node)| match &node.kind {
                NodeKind::Response(response) => Some((idx, response.clone())),
                NodeKind::Isr => None,
            })
            .collect::<Vec<_>>();

        for (idx, node) in &leaves {
            let vector = vectors.get_or_insert(node.key.clone(), &node.comp)?;
            let adjoint = match node.side {
                Side::Left => true,
                Side::Right => node.adjoint_rhs,
            };

            let primary = Primary::ResponseVector(vector);
            let new = if adjoint { primary.adjoint() } else { primary };
            self.propagate(*idx, SymExpr::Primary(new));
        }

        Ok(leaves.len())
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, node) in self.nodes.iter().enumerate() {
            write!(f, "{}", "  ".repeat(self.depth(idx)))?;
            match &node.kind {
                NodeKind::Isr => writeln!(f, "{}", node.expr)?,
                NodeKind::Response(response) => writeln!(
                    f,
                    "{} (w = {}, gamma = {})",
                    node.expr,
                    response.key.w,
                    response.key.gamma,
                )?,
            }
        }
        Ok(())
    }
}

/// Replaces every response equation of an ISR expression with a response vector.
///
/// Resolvents without a right-hand side next to them are reported with a warning and listed in
/// [`ResponseTree::unresolved`].
pub fn build_tree(expr: &SymExpr) -> Result<ResponseTree, Error> {
    let mut vectors = ResponseVectors::default();
    let mut expr = expr.clone();
    for round in 0..MAX_DEPTH {
        let mut tree = Tree::new(expr);
        tree.build_branches(0, 0)?;
        debug!("response tree, round {}:\n{}", round + 1, tree);

        if tree.resolve(&mut vectors)? == 0 {
            for resolvent in &tree.unresolved {
                warn!("no invertible factor found next to {}", resolvent);
            }
            let root = tree.nodes.swap_remove(0);
            return Ok(ResponseTree {
                expr: root.expr,
                vectors,
                unresolved: tree.unresolved,
            });
        }
        expr = tree.nodes.swap_remove(0).expr;
    }

    Err(Error::spanless(RecursionLimit { limit: MAX_DEPTH }))
}

#[cfg(test)]
mod tests {
    use isr_compute::model::error::ComponentCountMismatch;
    use isr_compute::model::{Mtm, OneParticleOperator, S2sMtm};
    use pretty_assertions::assert_eq;
    use super::*;

    fn op(comp: &str) -> OneParticleOperator {
        OneParticleOperator::new(comp, OperatorKind::ElectricDipole).unwrap()
    }

    fn mtm(comp: &str) -> SymExpr {
        SymExpr::Primary(Primary::Mtm(Mtm::from(&op(comp))))
    }

    fn mtm_adjoint(comp: &str) -> SymExpr {
        SymExpr::Primary(Primary::Mtm(Mtm::from(&op(comp))).adjoint())
    }

    fn s2s(comp: &str) -> SymExpr {
        SymExpr::Primary(Primary::S2sMtm(S2sMtm::from(&op(comp))))
    }

    fn w(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    fn m() -> SymExpr {
        SymExpr::matrix()
    }

    fn vector(comp: &str, no: usize, mtm_type: MtmKind) -> ResponseVector {
        ResponseVector::new(comp, no, mtm_type, OperatorKind::ElectricDipole).unwrap()
    }

    fn x(comp: &str, no: usize) -> SymExpr {
        SymExpr::Primary(Primary::ResponseVector(vector(comp, no, MtmKind::Mtm)))
    }

    fn x_adjoint(comp: &str, no: usize) -> SymExpr {
        SymExpr::Primary(Primary::ResponseVector(vector(comp, no, MtmKind::Mtm)).adjoint())
    }

    #[test]
    fn decode() {
        let i = SymExpr::imaginary_unit();
        let (freq, damping) = decode_resolvent(&(m() - w("w") - i.clone() * w("g")));
        assert!(equivalent(&freq, &w("w")));
        assert!(equivalent(&damping, &w("g")));

        let (freq, damping) = decode_resolvent(&(m() + w("w") + i * w("g")));
        assert!(equivalent(&freq, &-w("w")));
        assert!(equivalent(&damping, &-w("g")));

        let (freq, damping) = decode_resolvent(&m());
        assert_eq!((freq, damping), (SymExpr::zero(), SymExpr::zero()));
    }

    #[test]
    fn damped_polarizability() {
        let i = SymExpr::imaginary_unit();
        let expr = mtm_adjoint("a") * (m() - w("w") - i.clone() * w("g")).recip() * mtm("b")
            + mtm_adjoint("b") * (m() + w("w") + i * w("g")).recip() * mtm("a");
        let tree = build_tree(&expr).unwrap();

        assert_eq!(tree.expr, mtm_adjoint("a") * x("b", 1) + mtm_adjoint("b") * x("a", 2));
        assert_eq!(tree.vectors.len(), 2);
        assert!(tree.unresolved.is_empty());
    }

    #[test]
    fn damping_separates_equations() {
        let i = SymExpr::imaginary_unit();
        let expr = mtm_adjoint("a") * (m() - w("w") - i.clone() * w("g")).recip() * mtm("b")
            + mtm_adjoint("a") * (m() - w("w") - i * w("h")).recip() * mtm("b")
            + mtm_adjoint("b") * (m() - w("w")).recip() * mtm("a");
        let tree = build_tree(&expr).unwrap();

        assert_eq!(
            tree.expr,
            mtm_adjoint("a") * x("b", 1) + mtm_adjoint("a") * x("b", 2) + mtm_adjoint("b") * x("a", 3),
        );
        let equations = tree.vectors.iter().collect::<Vec<_>>();
        assert_eq!(equations.len(), 3);
        assert!(equations.iter().all(|equation| equivalent(&equation.key.w, &w("w"))));
        assert!(equivalent(&equations[0].key.gamma, &w("g")));
        assert!(equivalent(&equations[1].key.gamma, &w("h")));
        assert!(equivalent(&equations[2].key.gamma, &SymExpr::zero()));
    }

    #[test]
    fn component_must_fit_operator() {
        let key = VectorKey {
            rhs: RhsKey::Mtm { op_type: OperatorKind::ElectricDipole },
            w: w("w"),
            gamma: SymExpr::zero(),
        };
        let mut vectors = ResponseVectors::default();

        let err = vectors.get_or_insert(key.clone(), "xyz").unwrap_err();
        assert!(err.is::<ComponentCountMismatch>());
        assert!(vectors.is_empty());

        let vector = vectors.get_or_insert(key, "x").unwrap();
        assert_eq!((vector.comp(), vector.no()), ("x", 1));
    }

    #[test]
    fn components_share_identity() {
        let expr = mtm_adjoint("a") * m().recip() * mtm("b")
            + mtm_adjoint("b") * m().recip() * mtm("a")
            + mtm_adjoint("a") * (m() - w("w")).recip() * mtm("a");
        let tree = build_tree(&expr).unwrap();

        assert_eq!(
            tree.expr,
            mtm_adjoint("a") * x("b", 1) + mtm_adjoint("b") * x("a", 1) + mtm_adjoint("a") * x("a", 2),
        );

        let equations = tree.vectors.iter().collect::<Vec<_>>();
        assert_eq!(equations[0].vectors, vec![vector("b", 1, MtmKind::Mtm), vector("a", 1, MtmKind::Mtm)]);
        assert_eq!(equations[1].key.rhs, RhsKey::Mtm { op_type: OperatorKind::ElectricDipole });
        assert!(equivalent(&equations[1].key.w, &w("w")));
    }

    #[test]
    fn left_side_is_adjoint() {
        let expr = mtm_adjoint("a") * (m() - w("w")).recip() * s2s("b") * (m() + w("w")).recip() * mtm("c");
        let tree = build_tree(&expr).unwrap();
        assert_eq!(tree.expr, x_adjoint("a", 1) * s2s("b") * x("c", 2));
    }

    #[test]
    fn nested_resolvents() {
        let two = SymExpr::int(2);
        let expr = mtm_adjoint("a") * (m() - w("w")).recip()
            * s2s("b") * (m() + w("w")).recip()
            * s2s("d") * (m() + two * w("w")).recip()
            * mtm("c");
        let tree = build_tree(&expr).unwrap();

        let nested = SymExpr::Primary(Primary::ResponseVector(vector("d", 3, MtmKind::S2sMtm)));
        assert_eq!(tree.expr, x_adjoint("a", 1) * s2s("b") * nested);

        let equation = tree.vectors.iter().nth(2).unwrap();
        assert_eq!(
            equation.key.rhs,
            RhsKey::S2sMtm {
                op_type: OperatorKind::ElectricDipole,
                partner: Primary::ResponseVector(vector("c", 2, MtmKind::Mtm)),
                side: Side::Right,
            },
        );
        assert!(equivalent(&equation.key.w, &-w("w")));
    }

    #[test]
    fn state_partner() {
        let resolvent = (m() - w("w")).recip();
        let solution = Primary::ResponseVector(vector("b", 1, MtmKind::S2sMtm));

        let expr = SymExpr::bra("n") * resolvent.clone() * s2s("b") * SymExpr::ket("f");
        let tree = build_tree(&expr).unwrap();
        assert_eq!(tree.expr, SymExpr::bra("n") * SymExpr::Primary(solution.clone()));

        let expr = SymExpr::bra("f") * s2s("b") * resolvent * SymExpr::ket("n");
        let tree = build_tree(&expr).unwrap();
        assert_eq!(tree.expr, SymExpr::Primary(solution.adjoint()) * SymExpr::ket("n"));
    }

    #[test]
    fn unresolved_resolvent() {
        let resolvent = (m() - w("w")).recip();
        let expr = SymExpr::bra("f") * resolvent.clone() * SymExpr::ket("n");
        let tree = build_tree(&expr).unwrap();
        assert_eq!(tree.expr, expr);
        assert_eq!(tree.unresolved, vec![resolvent]);
        assert!(tree.vectors.is_empty());
    }

    #[test]
    fn malformed_rhs() {
        let err = vector_key(&w("x"), Side::Right).unwrap_err();
        assert!(err.is::<MalformedRightHandSide>());

        let (key, comp) = vector_key(&(SymExpr::bra("f") * s2s("b")), Side::Left).unwrap();
        assert_eq!(comp, "b");
        assert_eq!(key, RhsKey::S2sMtm {
            op_type: OperatorKind::ElectricDipole,
            partner: Primary::Bra("f".into()),
            side: Side::Left,
        });
    }
}
