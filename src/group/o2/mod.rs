//! The orthogonal group $`O(2)`$ of all planar rotations and reflections.

use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log;
use ndarray::{array, Array2, Array4};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::group::dihedral::{restrict_to_dihedral, restrict_to_flip};
use crate::group::factory::{GroupConfig, GroupFactory};
use crate::group::group_error::GroupError;
use crate::group::subgroup::{Embedding, SubgroupId};
use crate::group::{
    regular_angles, restrict_to_cyclic, spectral_directsum, Group, GroupElement, GridKind,
    GroupOrder,
};
use crate::parametrization::{
    cycle_isclose, decode_rotation_matrix, encode_rotation_matrix, normalize_angle, psi, psichi,
    ElementValue, Parametrization, ParametrizationCodec,
};
use crate::representation::clebsch_gordan::{
    coefficients_from_matrix, rotation_product_basis, signed_columns,
};
use crate::representation::registry::RepresentationRegistry;
use crate::representation::{directsum, Field, IrreducibleRepresentation, IrrepId, Representation};

#[cfg(test)]
#[path = "o2_tests.rs"]
mod o2_tests;

// ==================
// Struct definitions
// ==================

/// A structure to manage $`O(2)`$, whose elements $`r_\theta f^s`$ are stored as pairs
/// $`(s, \theta)`$ of a reflection bit $`s \in \{0, 1\}`$ and an angle $`\theta \in [0, 2\pi)`$.
///
/// Combining $`(s_1, \theta_1)`$ with $`(s_2, \theta_2)`$ gives
/// $`(s_1 \oplus s_2, \theta_1 + (-1)^{s_1} \theta_2)`$.
#[derive(Debug)]
pub struct O2 {
    /// The largest rotational frequency whose irreps have been built eagerly.
    maximum_frequency: Cell<usize>,

    angle_threshold: f64,

    matrix_threshold: f64,

    testing_elements: usize,

    registry: RepresentationRegistry,
}

impl O2 {
    pub(crate) fn new(maximum_frequency: usize, config: &GroupConfig) -> Result<Self, GroupError> {
        log::debug!("Constructing O(2) with irreps up to frequency {maximum_frequency}...");
        let group = Self {
            maximum_frequency: Cell::new(0),
            angle_threshold: config.angle_threshold,
            matrix_threshold: config.matrix_threshold,
            testing_elements: config.testing_elements,
            registry: RepresentationRegistry::default(),
        };
        group.irrep(&IrrepId::FlipRot(0, 0))?;
        group.irrep(&IrrepId::FlipRot(1, 0))?;
        group.extend_maximum_frequency(maximum_frequency)?;
        log::debug!("Constructing O(2) with irreps up to frequency {maximum_frequency}... Done.");
        Ok(group)
    }

    pub fn maximum_frequency(&self) -> usize {
        self.maximum_frequency.get()
    }

    /// Builds the irreps of all rotational frequencies up to `maximum_frequency`, if not built
    /// already.
    pub(crate) fn extend_maximum_frequency(
        &self,
        maximum_frequency: usize,
    ) -> Result<(), GroupError> {
        let current = self.maximum_frequency.get();
        if maximum_frequency <= current {
            return Ok(());
        }
        log::debug!(
            "Extending the irreps of O(2) from frequency {current} to {maximum_frequency}..."
        );
        for k in current + 1..=maximum_frequency {
            self.irrep(&IrrepId::FlipRot(1, k))?;
        }
        self.maximum_frequency.set(maximum_frequency);
        log::debug!(
            "Extending the irreps of O(2) from frequency {current} to {maximum_frequency}... Done."
        );
        Ok(())
    }

    /// The reflection $`f`$ along the horizontal axis.
    pub fn reflection(&self) -> GroupElement<'_> {
        GroupElement::from_canonical(self, ElementValue::FlipRadians(1, 0.0))
    }

    /// The standard action of $`O(2)`$ on the plane, *i.e.* the irrep $`(1, 1)`$.
    pub fn standard_representation(&self) -> Result<Rc<IrreducibleRepresentation>, GroupError> {
        self.irrep(&IrrepId::FlipRot(1, 1))
    }

    /// The direct sum of every irrep of rotational frequency at most `max_frequency`, each
    /// repeated once per real constituent.
    pub fn bl_regular_representation(
        &self,
        max_frequency: usize,
    ) -> Result<Rc<Representation>, GroupError> {
        let ids = self.bl_irreps(max_frequency)?;
        spectral_directsum(self, &ids, &format!("regular_{max_frequency}"))
    }

    /// The band-limited representation of $`O(2)`$ on functions over the cosets of the subgroup
    /// `id`, keeping the irreps of rotational frequency at most `max_frequency`.
    ///
    /// Each irrep appears as many times as the trivial irrep of the subgroup appears in its
    /// restriction.
    pub fn bl_quotient_representation(
        &self,
        factory: &GroupFactory,
        max_frequency: usize,
        id: &SubgroupId,
    ) -> Result<Rc<Representation>, GroupError> {
        let id = self.process_subgroup_id(id)?;
        let name = format!("quotient[{id}]_{max_frequency}");
        self.registry.representation_or_try_insert_with(&name, || {
            log::debug!("Building `{name}` of O(2)...");
            let (subgroup, _) = self.build_subgroup(factory, &id)?;
            let trivial = subgroup.trivial_irrep_id();
            let mut blocks = vec![];
            for irrep_id in self.bl_irreps(max_frequency)? {
                let (_, restricted) = self.restrict_irrep(factory, &irrep_id, &id)?;
                let multiplicity = restricted.iter().filter(|sub| **sub == trivial).count();
                let irrep = self.irrep(&irrep_id)?;
                blocks.extend((0..multiplicity).map(|_| irrep.representation().clone()));
            }
            let quotient = directsum(&blocks, None, &name)?;
            log::debug!("Building `{name}` of O(2)... Done.");
            Ok(quotient)
        })
    }

    /// Builds a discretisation grid of `n` rotations only. Random grids are reproducible when a
    /// `seed` is given.
    pub fn grid_so2(
        &self,
        kind: GridKind,
        n: usize,
        seed: Option<u64>,
    ) -> Result<Vec<GroupElement<'_>>, GroupError> {
        let angles = match kind {
            GridKind::Regular => regular_angles(n),
            GridKind::Rand => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                (0..n).map(|_| rng.gen_range(0.0..TAU)).collect()
            }
        };
        Ok(angles
            .into_iter()
            .map(|theta| GroupElement::from_canonical(self, ElementValue::FlipRadians(0, theta)))
            .collect())
    }

    /// The flip and rotational frequencies of a valid irrep identifier.
    fn frequencies_of(id: &IrrepId) -> Result<(u8, usize), GroupError> {
        match id {
            IrrepId::FlipRot(0, 0) => Ok((0, 0)),
            IrrepId::FlipRot(1, k) => Ok((1, *k)),
            _ => Err(GroupError::InvalidIrrepId(format!(
                "{id:?} does not identify an irrep of O(2): the flip frequency must be 0 or 1, \
                and 0 only with rotational frequency 0"
            ))),
        }
    }

    /// The reflection axis and the number of rotations of a canonical subgroup identifier.
    fn subgroup_parts(id: &SubgroupId) -> Result<(Option<f64>, GroupOrder), GroupError> {
        match id {
            SubgroupId::O2 { axis, order } => Ok((axis.map(|a| a.0), *order)),
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "{id} does not identify a subgroup of O(2)"
            ))),
        }
    }
}

// =====================
// Trait implementations
// =====================

impl ParametrizationCodec for O2 {
    fn parametrizations(&self) -> &'static [Parametrization] {
        &[Parametrization::Radians, Parametrization::Mat]
    }

    fn canonical_parametrization(&self) -> Parametrization {
        Parametrization::Radians
    }

    fn to_canonical(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        let (s, theta) = match value {
            ElementValue::FlipRadians(s, theta) if *s <= 1 => (*s, *theta),
            ElementValue::FlipMat(s, mat) if *s <= 1 => {
                (*s, decode_rotation_matrix(mat, self.matrix_threshold)?)
            }
            _ => {
                return Err(GroupError::NotAMember(format!(
                    "`{value:?}` is not a reflection bit in {{0, 1}} followed by a rotation"
                )))
            }
        };
        if !theta.is_finite() {
            return Err(GroupError::NotAMember(format!(
                "the angle {theta} is not finite"
            )));
        }
        Ok(ElementValue::FlipRadians(s, normalize_angle(theta)))
    }

    fn from_canonical(
        &self,
        value: &ElementValue,
        to: Parametrization,
    ) -> Result<ElementValue, GroupError> {
        let (s, theta) = value.as_flip_radians()?;
        match to {
            Parametrization::Radians => Ok(ElementValue::FlipRadians(s, theta)),
            Parametrization::Mat => Ok(ElementValue::FlipMat(s, encode_rotation_matrix(theta))),
            Parametrization::Int => Err(GroupError::InvalidParametrization(
                "O(2) has no integer parametrization".to_string(),
            )),
        }
    }
}

impl Group for O2 {
    fn name(&self) -> String {
        "O(2)".to_string()
    }

    fn is_continuous(&self) -> bool {
        true
    }

    fn is_abelian(&self) -> bool {
        false
    }

    fn order(&self) -> GroupOrder {
        GroupOrder::Inf
    }

    fn rotation_order(&self) -> GroupOrder {
        GroupOrder::Inf
    }

    fn registry(&self) -> &RepresentationRegistry {
        &self.registry
    }

    fn angle_threshold(&self) -> f64 {
        self.angle_threshold
    }

    fn as_dyn(&self) -> &dyn Group {
        self
    }

    fn identity_value(&self) -> ElementValue {
        ElementValue::FlipRadians(0, 0.0)
    }

    fn combine_values(
        &self,
        lhs: &ElementValue,
        rhs: &ElementValue,
    ) -> Result<ElementValue, GroupError> {
        let (s1, theta1) = lhs.as_flip_radians()?;
        let (s2, theta2) = rhs.as_flip_radians()?;
        let theta2 = if s1 == 0 { theta2 } else { -theta2 };
        Ok(ElementValue::FlipRadians(
            s1 ^ s2,
            normalize_angle(theta1 + theta2),
        ))
    }

    /// Rotations are inverted by negating their angle; reflections are involutions.
    fn inverse_value(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        let (s, theta) = value.as_flip_radians()?;
        if s == 0 {
            Ok(ElementValue::FlipRadians(0, normalize_angle(-theta)))
        } else {
            Ok(ElementValue::FlipRadians(s, theta))
        }
    }

    fn equal_values(&self, lhs: &ElementValue, rhs: &ElementValue) -> bool {
        match (lhs.as_flip_radians(), rhs.as_flip_radians()) {
            (Ok((s1, theta1)), Ok((s2, theta2))) => {
                s1 == s2 && cycle_isclose(theta1, theta2, TAU, self.angle_threshold)
            }
            _ => false,
        }
    }

    fn hash_key(&self, value: &ElementValue) -> Vec<i64> {
        value
            .as_flip_radians()
            .map(|(s, theta)| {
                let (sin, cos) = theta.sin_cos();
                vec![
                    i64::from(s),
                    (cos * 1e5).round() as i64,
                    (sin * 1e5).round() as i64,
                ]
            })
            .unwrap_or_default()
    }

    fn repr_value(&self, value: &ElementValue) -> String {
        match value.as_flip_radians() {
            Ok((s, theta)) => {
                let sign = if s == 0 { "+" } else { "-" };
                format!("({sign}, {theta})")
            }
            Err(_) => format!("{value:?}"),
        }
    }

    fn element_values(&self) -> Option<Vec<ElementValue>> {
        None
    }

    fn testing_values(&self) -> Vec<ElementValue> {
        let angles = regular_angles(self.testing_elements);
        [0, 1]
            .into_iter()
            .flat_map(|s| {
                angles
                    .iter()
                    .map(move |theta| ElementValue::FlipRadians(s, *theta))
            })
            .collect()
    }

    fn generator_values(&self) -> Result<Vec<ElementValue>, GroupError> {
        Err(GroupError::Unsupported(
            "O(2) is continuous and has no finite set of generators".to_string(),
        ))
    }

    fn sample_value(&self, rng: &mut dyn RngCore) -> ElementValue {
        ElementValue::FlipRadians(rng.gen_range(0..=1), rng.gen_range(0.0..TAU))
    }

    /// Builds `n` evenly spaced rotations followed by the `n` reflections composed with them, or
    /// `n` random elements.
    fn grid_values(
        &self,
        kind: GridKind,
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ElementValue>, GroupError> {
        Ok(match kind {
            GridKind::Regular => {
                let angles = regular_angles(n);
                [0, 1]
                    .into_iter()
                    .flat_map(|s| {
                        angles
                            .iter()
                            .map(move |theta| ElementValue::FlipRadians(s, *theta))
                    })
                    .collect()
            }
            GridKind::Rand => (0..n).map(|_| self.sample_value(rng)).collect(),
        })
    }

    fn build_irrep(&self, id: &IrrepId) -> Result<IrreducibleRepresentation, GroupError> {
        let (_, k) = Self::frequencies_of(id)?;
        let name = self.name();
        match id {
            IrrepId::FlipRot(0, 0) => IrreducibleRepresentation::from_functions(
                *id,
                &name,
                1,
                Field::Real,
                |_| Ok(Array2::eye(1)),
                |_| Ok(1.0),
            ),
            IrrepId::FlipRot(1, 0) => {
                let sign = |s: u8| if s == 0 { 1.0 } else { -1.0 };
                IrreducibleRepresentation::from_functions(
                    *id,
                    &name,
                    1,
                    Field::Real,
                    move |g| Ok(array![[sign(g.value().as_flip_radians()?.0)]]),
                    move |g| Ok(sign(g.value().as_flip_radians()?.0)),
                )
            }
            _ => {
                let kf = k as f64;
                IrreducibleRepresentation::from_functions(
                    *id,
                    &name,
                    2,
                    Field::Real,
                    move |g| {
                        let (s, theta) = g.value().as_flip_radians()?;
                        Ok(psichi(theta, s, k as i64))
                    },
                    move |g| {
                        let (s, theta) = g.value().as_flip_radians()?;
                        Ok(if s == 0 { 2.0 * (kf * theta).cos() } else { 0.0 })
                    },
                )
            }
        }
    }

    fn trivial_irrep_id(&self) -> IrrepId {
        IrrepId::FlipRot(0, 0)
    }

    fn irrep_ids(&self) -> Option<Vec<IrrepId>> {
        None
    }

    fn bl_irreps(&self, max_frequency: usize) -> Result<Vec<IrrepId>, GroupError> {
        let mut ids = vec![IrrepId::FlipRot(0, 0), IrrepId::FlipRot(1, 0)];
        ids.extend((1..=max_frequency).map(|k| IrrepId::FlipRot(1, k)));
        Ok(ids)
    }

    fn tensor_product_irreps(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
    ) -> Result<Vec<(IrrepId, usize)>, GroupError> {
        let (j, m) = Self::frequencies_of(lhs)?;
        let (l, n) = Self::frequencies_of(rhs)?;
        Ok(match ((j, m), (l, n)) {
            ((0, 0), _) => vec![(*rhs, 1)],
            (_, (0, 0)) => vec![(*lhs, 1)],
            ((1, 0), (1, 0)) => vec![(IrrepId::FlipRot(0, 0), 1)],
            ((1, 0), _) => vec![(*rhs, 1)],
            (_, (1, 0)) => vec![(*lhs, 1)],
            _ if m == n => vec![
                (IrrepId::FlipRot(0, 0), 1),
                (IrrepId::FlipRot(1, 0), 1),
                (IrrepId::FlipRot(1, 2 * m), 1),
            ],
            _ => vec![
                (IrrepId::FlipRot(1, m.abs_diff(n)), 1),
                (IrrepId::FlipRot(1, m + n), 1),
            ],
        })
    }

    fn clebsch_gordan_coeff(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
        target: &IrrepId,
    ) -> Result<Array4<f64>, GroupError> {
        let (j, m) = Self::frequencies_of(lhs)?;
        let (l, n) = Self::frequencies_of(rhs)?;
        let target_frequencies = Self::frequencies_of(target)?;
        let (dm, dn, dj) = (
            self.irrep(lhs)?.size(),
            self.irrep(rhs)?.size(),
            self.irrep(target)?.size(),
        );
        let empty = Array2::zeros((dm * dn, 0));
        let mat = match ((j, m), (l, n)) {
            ((0, 0), _) | (_, (0, 0)) => {
                let other = if (j, m) == (0, 0) { rhs } else { lhs };
                if target == other {
                    Array2::eye(dj)
                } else {
                    empty
                }
            }
            ((1, 0), (1, 0)) => {
                if target_frequencies == (0, 0) {
                    Array2::eye(1)
                } else {
                    empty
                }
            }
            ((1, 0), _) | (_, (1, 0)) => {
                let other = if (j, m) == (1, 0) { rhs } else { lhs };
                if target == other {
                    array![[0.0, -1.0], [1.0, 0.0]]
                } else {
                    empty
                }
            }
            _ => {
                let basis = rotation_product_basis();
                match target_frequencies {
                    (0, 0) if m == n => signed_columns(&basis, &[0], &[]),
                    (1, 0) if m == n => signed_columns(&basis, &[1], &[]),
                    (1, k) if k == m + n => signed_columns(&basis, &[2, 3], &[]),
                    (1, k) if k > 0 && k == m.abs_diff(n) => {
                        let negated: &[usize] = if n > m { &[1] } else { &[] };
                        signed_columns(&basis, &[0, 1], negated)
                    }
                    _ => empty,
                }
            }
        };
        coefficients_from_matrix(mat, dm, dn, dj)
    }

    fn subgroup_trivial_id(&self) -> SubgroupId {
        SubgroupId::o2(None, GroupOrder::Int(1))
    }

    fn subgroup_self_id(&self) -> SubgroupId {
        SubgroupId::o2(Some(0.0), GroupOrder::Inf)
    }

    /// Checks the number of rotations and reduces the axis modulo the angle between distinct
    /// reflection axes.
    fn process_subgroup_id(&self, id: &SubgroupId) -> Result<SubgroupId, GroupError> {
        let invalid = || {
            GroupError::InvalidSubgroupId(format!(
                "the subgroups of O(2) are identified by an optional finite axis and a positive \
                number of rotations or ∞, not {id}"
            ))
        };
        let (axis, order) = Self::subgroup_parts(id)?;
        let period = match order {
            GroupOrder::Int(0) => return Err(invalid()),
            GroupOrder::Int(m) => TAU / m as f64,
            GroupOrder::Inf => TAU,
        };
        let axis = match axis {
            Some(axis) if !axis.is_finite() => return Err(invalid()),
            Some(axis) => {
                let reduced = axis.rem_euclid(period);
                Some(if cycle_isclose(reduced, 0.0, period, self.angle_threshold) {
                    0.0
                } else {
                    reduced
                })
            }
            None => None,
        };
        Ok(SubgroupId::o2(axis, order))
    }

    fn build_subgroup(
        &self,
        factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<(Rc<dyn Group>, Embedding), GroupError> {
        let thresh = self.angle_threshold;
        match Self::subgroup_parts(id)? {
            (Some(axis), GroupOrder::Inf) => {
                let subgroup: Rc<dyn Group> = factory.o2_group(self.maximum_frequency())?;
                Ok((subgroup, Embedding::O2Conjugation { axis }))
            }
            (None, GroupOrder::Inf) => {
                let subgroup: Rc<dyn Group> = factory.so2_group(self.maximum_frequency())?;
                Ok((subgroup, Embedding::SO2InO2))
            }
            (None, GroupOrder::Int(m)) => {
                let subgroup: Rc<dyn Group> = factory.cyclic_group(m)?;
                Ok((subgroup, Embedding::CyclicInO2 { order: m, thresh }))
            }
            (Some(axis), GroupOrder::Int(1)) => {
                let subgroup: Rc<dyn Group> = factory.cyclic_group(2)?;
                Ok((subgroup, Embedding::FlipInO2 { axis, thresh }))
            }
            (Some(axis), GroupOrder::Int(m)) => {
                let subgroup: Rc<dyn Group> = factory.dihedral_group(m)?;
                Ok((
                    subgroup,
                    Embedding::DihedralInO2 {
                        axis,
                        order: m,
                        thresh,
                    },
                ))
            }
        }
    }

    fn combine_subgroups(
        &self,
        factory: &GroupFactory,
        outer: &SubgroupId,
        inner: &SubgroupId,
    ) -> Result<SubgroupId, GroupError> {
        let outer = self.process_subgroup_id(outer)?;
        let (subgroup, _) = self.build_subgroup(factory, &outer)?;
        let inner = subgroup.process_subgroup_id(inner)?;
        let mismatch = || {
            GroupError::InvalidSubgroupId(format!(
                "{inner} does not identify a subgroup of the subgroup {outer} of O(2)"
            ))
        };
        let combined = match (Self::subgroup_parts(&outer)?, inner) {
            ((None, _), SubgroupId::Rotations(order)) => SubgroupId::o2(None, order),
            ((Some(axis), GroupOrder::Int(1)), SubgroupId::Rotations(GroupOrder::Int(m))) => {
                if m == 2 {
                    SubgroupId::o2(Some(axis), GroupOrder::Int(1))
                } else {
                    SubgroupId::o2(None, GroupOrder::Int(1))
                }
            }
            ((Some(axis), GroupOrder::Int(m)), SubgroupId::Dihedral { axis: b, order }) => {
                SubgroupId::o2(
                    b.map(|b| axis + b as f64 * TAU / m as f64),
                    GroupOrder::Int(order),
                )
            }
            ((Some(axis), GroupOrder::Inf), SubgroupId::O2 { axis: b, order }) => {
                SubgroupId::o2(b.map(|b| axis + b.0), order)
            }
            _ => return Err(mismatch()),
        };
        self.process_subgroup_id(&combined)
    }

    fn restrict_irrep_canonical(
        &self,
        factory: &GroupFactory,
        irrep: &IrrepId,
        id: &SubgroupId,
    ) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError> {
        let (j, k) = Self::frequencies_of(irrep)?;
        let size = self.irrep(irrep)?.size();
        match Self::subgroup_parts(id)? {
            (Some(axis), GroupOrder::Inf) => {
                let change_of_basis = if size == 1 {
                    Array2::eye(1)
                } else {
                    psi(axis / 2.0, k as i64)
                };
                Ok((change_of_basis, vec![*irrep]))
            }
            (None, GroupOrder::Inf) => Ok((Array2::eye(size), vec![IrrepId::Rot(k)])),
            (None, GroupOrder::Int(m)) => restrict_to_cyclic(factory, size, k, m),
            (Some(axis), GroupOrder::Int(1)) => Ok(restrict_to_flip(j, k, size, axis)),
            (Some(axis), GroupOrder::Int(m)) => {
                restrict_to_dihedral(factory, j, k, size, axis, m)
            }
        }
    }

    /// Only the subgroups of finite index have a finite transversal: $`SO(2)`$ with
    /// $`\{e, f\}`$ and the conjugated copies of $`O(2)`$ with $`\{e\}`$.
    fn coset_representatives(
        &self,
        _factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<Vec<ElementValue>, GroupError> {
        match Self::subgroup_parts(id)? {
            (None, GroupOrder::Inf) => Ok(vec![
                self.identity_value(),
                ElementValue::FlipRadians(1, 0.0),
            ]),
            (Some(_), GroupOrder::Inf) => Ok(vec![self.identity_value()]),
            _ => Err(GroupError::UnsupportedInduction(format!(
                "the subgroup {id} has infinite index in O(2)"
            ))),
        }
    }
}
