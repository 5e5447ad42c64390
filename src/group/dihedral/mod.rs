//! The dihedral groups $`D_N`$ of the $`N`$ rotations by multiples of $`2\pi / N`$ and the $`N`$
//! reflections composed with them.

use std::f64::consts::TAU;
use std::rc::Rc;

use log;
use ndarray::{array, Array2, Array4};
use rand::{Rng, RngCore};

use crate::group::factory::{GroupConfig, GroupFactory};
use crate::group::group_error::GroupError;
use crate::group::subgroup::{Embedding, SubgroupId};
use crate::group::{restrict_to_cyclic, Group, GridKind, GroupOrder};
use crate::parametrization::{
    chi, cycle_isclose, decode_rotation_matrix, encode_rotation_matrix, psi, psichi,
    ElementValue, Parametrization, ParametrizationCodec,
};
use crate::representation::registry::RepresentationRegistry;
use crate::representation::{Field, IrreducibleRepresentation, IrrepId};


/// A structure to manage the dihedral group $`D_N`$, whose elements $`r^a f^s`$ are stored as
/// pairs $`(s, a)`$ with $`s \in \{0, 1\}`$ and $`a \in [0, N)`$.
#[derive(Debug)]
pub struct DihedralGroup {
    /// The number $`N`$ of rotations in the group.
    n: usize,

    angle_threshold: f64,

    matrix_threshold: f64,

    registry: RepresentationRegistry,
}

impl DihedralGroup {
    /// Constructs $`D_N`$ and builds all of its irreps.
    ///
    /// # Errors
    ///
    /// Errors if `n` is zero.
    pub(crate) fn new(n: usize, config: &GroupConfig) -> Result<Self, GroupError> {
        if n == 0 {
            return Err(GroupError::InvalidArgument(
                "a dihedral group must have a positive number of rotations".to_string(),
            ));
        }
        log::debug!("Constructing D{n}...");
        let group = Self {
            n,
            angle_threshold: config.angle_threshold,
            matrix_threshold: config.matrix_threshold,
            registry: RepresentationRegistry::default(),
        };
        for id in group.all_irrep_ids() {
            group.irrep(&id)?;
        }
        log::debug!("Constructing D{n}... Done.");
        Ok(group)
    }

    /// The number $`N`$ of rotations in the group.
    pub fn n(&self) -> usize {
        self.n
    }

    fn step(&self) -> f64 {
        TAU / self.n as f64
    }

    fn is_nyquist(&self, k: usize) -> bool {
        self.n % 2 == 0 && 2 * k == self.n
    }

    fn all_irrep_ids(&self) -> Vec<IrrepId> {
        let mut ids = vec![IrrepId::FlipRot(0, 0), IrrepId::FlipRot(1, 0)];
        ids.extend((1..).take_while(|k| 2 * k < self.n).map(|k| IrrepId::FlipRot(1, k)));
        if self.n % 2 == 0 {
            ids.push(IrrepId::FlipRot(0, self.n / 2));
            ids.push(IrrepId::FlipRot(1, self.n / 2));
        }
        ids
    }

    /// The flip and rotational frequencies of a valid irrep identifier.
    fn frequencies_of(&self, id: &IrrepId) -> Result<(u8, usize), GroupError> {
        match id {
            IrrepId::FlipRot(j, k)
                if *j <= 1 && (*k == 0 || self.is_nyquist(*k) || (*j == 1 && 2 * k < self.n)) =>
            {
                Ok((*j, *k))
            }
            _ => Err(GroupError::InvalidIrrepId(format!(
                "{id:?} does not identify an irrep of D{}",
                self.n
            ))),
        }
    }

    /// The rotation power of the reflection axis and the number of rotations of a canonical
    /// subgroup identifier.
    fn subgroup_parts(id: &SubgroupId) -> Result<(Option<usize>, usize), GroupError> {
        match id {
            SubgroupId::Dihedral { axis, order } => Ok((*axis, *order)),
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "{id} does not identify a subgroup of a dihedral group"
            ))),
        }
    }
}

impl ParametrizationCodec for DihedralGroup {
    fn parametrizations(&self) -> &'static [Parametrization] {
        &[
            Parametrization::Int,
            Parametrization::Radians,
            Parametrization::Mat,
        ]
    }

    fn canonical_parametrization(&self) -> Parametrization {
        Parametrization::Int
    }

    fn to_canonical(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        let (s, theta, thresh) = match value {
            ElementValue::FlipInt(s, a) if *s <= 1 => {
                return if (0..self.n as i64).contains(a) {
                    Ok(ElementValue::FlipInt(*s, *a))
                } else {
                    Err(GroupError::NotAMember(format!(
                        "the rotation power {a} lies outside [0, {})",
                        self.n
                    )))
                };
            }
            ElementValue::FlipRadians(s, theta) if *s <= 1 => (*s, *theta, self.angle_threshold),
            ElementValue::FlipMat(s, mat) if *s <= 1 => (
                *s,
                decode_rotation_matrix(mat, self.matrix_threshold)?,
                self.matrix_threshold.max(self.angle_threshold),
            ),
            _ => {
                return Err(GroupError::NotAMember(format!(
                    "`{value:?}` is not a reflection bit in {{0, 1}} followed by a rotation"
                )))
            }
        };
        if !theta.is_finite() || !cycle_isclose(theta, 0.0, self.step(), thresh) {
            return Err(GroupError::NotAMember(format!(
                "the angle {theta} is not a multiple of 2π/{}",
                self.n
            )));
        }
        Ok(ElementValue::FlipInt(
            s,
            ((theta / self.step()).round() as i64).rem_euclid(self.n as i64),
        ))
    }

    fn from_canonical(
        &self,
        value: &ElementValue,
        to: Parametrization,
    ) -> Result<ElementValue, GroupError> {
        let (s, a) = value.as_flip_int()?;
        let theta = a as f64 * self.step();
        Ok(match to {
            Parametrization::Int => ElementValue::FlipInt(s, a),
            Parametrization::Radians => ElementValue::FlipRadians(s, theta),
            Parametrization::Mat => ElementValue::FlipMat(s, encode_rotation_matrix(theta)),
        })
    }
}

impl Group for DihedralGroup {
    fn name(&self) -> String {
        format!("D{}", self.n)
    }

    fn is_continuous(&self) -> bool {
        false
    }

    fn is_abelian(&self) -> bool {
        self.n <= 2
    }

    fn order(&self) -> GroupOrder {
        GroupOrder::Int(2 * self.n)
    }

    fn rotation_order(&self) -> GroupOrder {
        GroupOrder::Int(self.n)
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
        ElementValue::FlipInt(0, 0)
    }

    fn combine_values(
        &self,
        lhs: &ElementValue,
        rhs: &ElementValue,
    ) -> Result<ElementValue, GroupError> {
        let (s1, a1) = lhs.as_flip_int()?;
        let (s2, a2) = rhs.as_flip_int()?;
        let a2 = if s1 == 0 { a2 } else { -a2 };
        Ok(ElementValue::FlipInt(
            s1 ^ s2,
            (a1 + a2).rem_euclid(self.n as i64),
        ))
    }

    fn inverse_value(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        let (s, a) = value.as_flip_int()?;
        if s == 0 {
            Ok(ElementValue::FlipInt(0, (-a).rem_euclid(self.n as i64)))
        } else {
            Ok(ElementValue::FlipInt(s, a))
        }
    }

    fn equal_values(&self, lhs: &ElementValue, rhs: &ElementValue) -> bool {
        match (lhs.as_flip_int(), rhs.as_flip_int()) {
            (Ok((s1, a1)), Ok((s2, a2))) => {
                s1 == s2 && a1.rem_euclid(self.n as i64) == a2.rem_euclid(self.n as i64)
            }
            _ => false,
        }
    }

    fn hash_key(&self, value: &ElementValue) -> Vec<i64> {
        value
            .as_flip_int()
            .map(|(s, a)| vec![i64::from(s), a])
            .unwrap_or_default()
    }

    fn repr_value(&self, value: &ElementValue) -> String {
        match value.as_flip_int() {
            Ok((s, a)) => {
                let sign = if s == 0 { "+" } else { "-" };
                format!("({sign}, {a}[2pi/{}])", self.n)
            }
            Err(_) => format!("{value:?}"),
        }
    }

    fn element_values(&self) -> Option<Vec<ElementValue>> {
        Some(
            [0, 1]
                .into_iter()
                .flat_map(|s| (0..self.n as i64).map(move |a| ElementValue::FlipInt(s, a)))
                .collect(),
        )
    }

    fn testing_values(&self) -> Vec<ElementValue> {
        self.element_values().unwrap_or_default()
    }

    fn generator_values(&self) -> Result<Vec<ElementValue>, GroupError> {
        if self.n > 1 {
            Ok(vec![ElementValue::FlipInt(0, 1), ElementValue::FlipInt(1, 0)])
        } else {
            Ok(vec![ElementValue::FlipInt(1, 0)])
        }
    }

    fn sample_value(&self, rng: &mut dyn RngCore) -> ElementValue {
        ElementValue::FlipInt(rng.gen_range(0..=1), rng.gen_range(0..self.n as i64))
    }

    /// Builds `n` evenly spaced rotations followed by the `n` reflections composed with them
    /// (`n` must divide $`N`$), or `n` random elements.
    fn grid_values(
        &self,
        kind: GridKind,
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ElementValue>, GroupError> {
        match kind {
            GridKind::Regular => {
                if n == 0 || self.n % n != 0 {
                    return Err(GroupError::InvalidArgument(format!(
                        "a regular grid of D{} must have a number of rotations dividing {}, not \
                        {n}",
                        self.n, self.n
                    )));
                }
                let ratio = (self.n / n) as i64;
                Ok([0, 1]
                    .into_iter()
                    .flat_map(|s| (0..n as i64).map(move |i| ElementValue::FlipInt(s, i * ratio)))
                    .collect())
            }
            GridKind::Rand => Ok((0..n).map(|_| self.sample_value(rng)).collect()),
        }
    }

    fn build_irrep(&self, id: &IrrepId) -> Result<IrreducibleRepresentation, GroupError> {
        let (j, k) = self.frequencies_of(id)?;
        let step = self.step();
        let name = self.name();
        match (j, k) {
            (0, 0) => IrreducibleRepresentation::from_functions(
                *id,
                &name,
                1,
                Field::Real,
                |_| Ok(Array2::eye(1)),
                |_| Ok(1.0),
            ),
            (1, 0) => IrreducibleRepresentation::from_functions(
                *id,
                &name,
                1,
                Field::Real,
                |g| Ok(array![[parity_sign(i64::from(g.value().as_flip_int()?.0))]]),
                |g| Ok(parity_sign(i64::from(g.value().as_flip_int()?.0))),
            ),
            (_, k) if self.is_nyquist(k) => {
                let j = i64::from(j);
                IrreducibleRepresentation::from_functions(
                    *id,
                    &name,
                    1,
                    Field::Real,
                    move |g| {
                        let (s, a) = g.value().as_flip_int()?;
                        Ok(array![[parity_sign(a + j * i64::from(s))]])
                    },
                    move |g| {
                        let (s, a) = g.value().as_flip_int()?;
                        Ok(parity_sign(a + j * i64::from(s)))
                    },
                )
            }
            (_, k) => {
                let kf = k as f64;
                IrreducibleRepresentation::from_functions(
                    *id,
                    &name,
                    2,
                    Field::Real,
                    move |g| {
                        let (s, a) = g.value().as_flip_int()?;
                        Ok(psichi(a as f64 * step, s, k as i64))
                    },
                    move |g| {
                        let (s, a) = g.value().as_flip_int()?;
                        Ok(if s == 0 {
                            2.0 * (kf * a as f64 * step).cos()
                        } else {
                            0.0
                        })
                    },
                )
            }
        }
    }

    fn trivial_irrep_id(&self) -> IrrepId {
        IrrepId::FlipRot(0, 0)
    }

    fn irrep_ids(&self) -> Option<Vec<IrrepId>> {
        Some(self.all_irrep_ids())
    }

    fn bl_irreps(&self, max_frequency: usize) -> Result<Vec<IrrepId>, GroupError> {
        if max_frequency > self.n / 2 {
            return Err(GroupError::InvalidIrrepId(format!(
                "D{} has no irreps of frequency above {}",
                self.n,
                self.n / 2
            )));
        }
        Ok(self
            .all_irrep_ids()
            .into_iter()
            .filter(|id| id.frequency() <= max_frequency)
            .collect())
    }

    fn tensor_product_irreps(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
    ) -> Result<Vec<(IrrepId, usize)>, GroupError> {
        self.frequencies_of(lhs)?;
        self.frequencies_of(rhs)?;
        Err(GroupError::Unsupported(format!(
            "tensor product decompositions of D{} are not available",
            self.n
        )))
    }

    fn clebsch_gordan_coeff(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
        target: &IrrepId,
    ) -> Result<Array4<f64>, GroupError> {
        self.frequencies_of(target)?;
        self.tensor_product_irreps(lhs, rhs)?;
        Err(GroupError::Unsupported(format!(
            "Clebsch-Gordan coefficients of D{} are not available",
            self.n
        )))
    }

    fn subgroup_trivial_id(&self) -> SubgroupId {
        SubgroupId::dihedral(None, 1)
    }

    fn subgroup_self_id(&self) -> SubgroupId {
        SubgroupId::dihedral(Some(0), self.n)
    }

    /// Checks that the number of rotations divides $`N`$ and reduces the axis modulo the number
    /// of distinct reflection axes.
    fn process_subgroup_id(&self, id: &SubgroupId) -> Result<SubgroupId, GroupError> {
        match id {
            SubgroupId::Dihedral { axis, order } if *order > 0 && self.n % *order == 0 => {
                let ratio = self.n / *order;
                Ok(SubgroupId::dihedral(axis.map(|a| a % ratio), *order))
            }
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "the subgroups of D{} are identified by an optional axis and a number of \
                rotations dividing {}, not {id}",
                self.n, self.n
            ))),
        }
    }

    fn build_subgroup(
        &self,
        factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<(Rc<dyn Group>, Embedding), GroupError> {
        let (axis, order) = Self::subgroup_parts(id)?;
        let ratio = self.n / order;
        match axis {
            None => {
                let subgroup: Rc<dyn Group> = factory.cyclic_group(order)?;
                Ok((subgroup, Embedding::CyclicInDihedral { ratio }))
            }
            Some(axis) if order == 1 => {
                let subgroup: Rc<dyn Group> = factory.cyclic_group(2)?;
                Ok((subgroup, Embedding::FlipInDihedral { axis }))
            }
            Some(axis) => {
                let subgroup: Rc<dyn Group> = factory.dihedral_group(order)?;
                Ok((
                    subgroup,
                    Embedding::DihedralInDihedral {
                        axis,
                        ratio,
                        order: self.n,
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
        let (outer_axis, outer_order) = Self::subgroup_parts(&outer)?;
        let combined = match (outer_axis, inner) {
            (Some(axis), SubgroupId::Rotations(GroupOrder::Int(2))) if outer_order == 1 => {
                SubgroupId::dihedral(Some(axis), 1)
            }
            (_, SubgroupId::Rotations(GroupOrder::Int(m))) => SubgroupId::dihedral(None, m),
            (Some(axis), SubgroupId::Dihedral { axis: inner_axis, order }) => SubgroupId::dihedral(
                inner_axis.map(|b| b * (self.n / outer_order) + axis),
                order,
            ),
            _ => {
                return Err(GroupError::InvalidSubgroupId(format!(
                    "{inner} does not identify a subgroup of the subgroup {outer} of D{}",
                    self.n
                )))
            }
        };
        self.process_subgroup_id(&combined)
    }

    fn restrict_irrep_canonical(
        &self,
        factory: &GroupFactory,
        irrep: &IrrepId,
        id: &SubgroupId,
    ) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError> {
        let (j, k) = self.frequencies_of(irrep)?;
        let size = self.irrep(irrep)?.size();
        let (axis, order) = Self::subgroup_parts(id)?;
        match axis {
            None => restrict_to_cyclic(factory, size, k, order),
            Some(axis) if order == 1 => {
                if self.is_nyquist(k) {
                    let parity = (usize::from(j) + axis) % 2;
                    Ok((Array2::eye(1), vec![IrrepId::Rot(parity)]))
                } else {
                    Ok(restrict_to_flip(j, k, size, axis as f64 * self.step()))
                }
            }
            Some(axis) => {
                if self.is_nyquist(k) {
                    let parity = (usize::from(j) + axis) % 2;
                    let folded = k % order;
                    Ok((
                        Array2::eye(1),
                        vec![IrrepId::FlipRot(parity as u8, folded)],
                    ))
                } else {
                    restrict_to_dihedral(factory, j, k, size, axis as f64 * self.step(), order)
                }
            }
        }
    }
}

// =========
// Functions
// =========

fn parity_sign(exponent: i64) -> f64 {
    if exponent.rem_euclid(2) == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Restricts an irrep of flip frequency `flip` and rotational frequency `frequency` to the
/// reflection group $`\{e, r_\theta f\}`$ with `axis` $`\theta`$, where the irrep acts on
/// $`r_\theta f`$ by [`psichi`]`(theta, 1, frequency)` when two-dimensional.
pub(crate) fn restrict_to_flip(
    flip: u8,
    frequency: usize,
    size: usize,
    axis: f64,
) -> (Array2<f64>, Vec<IrrepId>) {
    if size == 1 {
        (Array2::eye(1), vec![IrrepId::Rot(usize::from(flip))])
    } else {
        (
            psi(axis / 2.0, frequency as i64),
            vec![IrrepId::Rot(0), IrrepId::Rot(1)],
        )
    }
}

/// Restricts an irrep of flip frequency `flip` and rotational frequency `frequency` to the
/// subgroup $`D_M`$ generated by $`r_{2\pi/M}`$ and the reflection $`r_\theta f`$ with `axis`
/// $`\theta`$. One-dimensional irreps must have zero rotational frequency.
pub(crate) fn restrict_to_dihedral(
    factory: &GroupFactory,
    flip: u8,
    frequency: usize,
    size: usize,
    axis: f64,
    m: usize,
) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError> {
    if size == 1 {
        return Ok((Array2::eye(1), vec![IrrepId::FlipRot(flip, 0)]));
    }
    let subgroup = factory.dihedral_group(m)?;
    let mut folded = frequency % m;
    let mut change_of_basis = psi(axis / 2.0, frequency as i64);
    if 2 * folded > m {
        folded = m - folded;
        change_of_basis = change_of_basis.dot(&chi(1));
    }
    let target = IrrepId::FlipRot(1, folded);
    if subgroup.irrep(&target)?.size() == 1 {
        Ok((
            change_of_basis,
            vec![IrrepId::FlipRot(0, folded), IrrepId::FlipRot(1, folded)],
        ))
    } else {
        Ok((change_of_basis, vec![target]))
    }
}
