//! The cyclic groups $`C_N`$ of planar rotations by multiples of $`2\pi / N`$.

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
    cycle_isclose, decode_rotation_matrix, encode_rotation_matrix, psi, ElementValue,
    Parametrization, ParametrizationCodec,
};
use crate::representation::clebsch_gordan::{
    coefficients_from_matrix, rotation_product_basis, signed_columns,
};
use crate::representation::registry::RepresentationRegistry;
use crate::representation::{Field, IrreducibleRepresentation, IrrepId, Representation};


/// A structure to manage the cyclic group $`C_N`$, whose elements $`r^a`$ are stored as their
/// integer powers $`a \in [0, N)`$.
#[derive(Debug)]
pub struct CyclicGroup {
    /// The order $`N`$ of the group.
    n: usize,

    angle_threshold: f64,

    matrix_threshold: f64,

    registry: RepresentationRegistry,
}

impl CyclicGroup {
    /// Constructs $`C_N`$ and builds all of its irreps.
    ///
    /// # Errors
    ///
    /// Errors if `n` is zero.
    pub(crate) fn new(n: usize, config: &GroupConfig) -> Result<Self, GroupError> {
        if n == 0 {
            return Err(GroupError::InvalidArgument(
                "a cyclic group must have a positive order".to_string(),
            ));
        }
        log::debug!("Constructing C{n}...");
        let group = Self {
            n,
            angle_threshold: config.angle_threshold,
            matrix_threshold: config.matrix_threshold,
            registry: RepresentationRegistry::default(),
        };
        for k in 0..=n / 2 {
            group.irrep(&IrrepId::Rot(k))?;
        }
        log::debug!("Constructing C{n}... Done.");
        Ok(group)
    }

    /// The order $`N`$ of the group.
    pub fn n(&self) -> usize {
        self.n
    }

    fn step(&self) -> f64 {
        TAU / self.n as f64
    }

    /// The rotational frequency of a valid irrep identifier.
    fn frequency_of(&self, id: &IrrepId) -> Result<usize, GroupError> {
        match id {
            IrrepId::Rot(k) if *k <= self.n / 2 => Ok(*k),
            _ => Err(GroupError::InvalidIrrepId(format!(
                "{id:?} does not identify an irrep of C{}; valid frequencies are 0..={}",
                self.n,
                self.n / 2
            ))),
        }
    }

    fn is_nyquist(&self, k: usize) -> bool {
        self.n % 2 == 0 && 2 * k == self.n
    }

    /// The representation of $`C_N`$ on functions over the cosets of its subgroup $`C_M`$,
    /// permuting them by left multiplication.
    pub fn quotient_representation(
        &self,
        factory: &GroupFactory,
        m: usize,
    ) -> Result<Representation, GroupError> {
        self.induced_representation(factory, &SubgroupId::cyclic(m), &IrrepId::Rot(0))
    }
}

impl ParametrizationCodec for CyclicGroup {
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
        let (theta, thresh) = match value {
            ElementValue::Int(a) => {
                return if (0..self.n as i64).contains(a) {
                    Ok(ElementValue::Int(*a))
                } else {
                    Err(GroupError::NotAMember(format!(
                        "the power {a} lies outside [0, {})",
                        self.n
                    )))
                };
            }
            ElementValue::Radians(theta) => (*theta, self.angle_threshold),
            ElementValue::Mat(mat) => (
                decode_rotation_matrix(mat, self.matrix_threshold)?,
                self.matrix_threshold.max(self.angle_threshold),
            ),
            _ => {
                return Err(GroupError::NotAMember(format!(
                    "`{value:?}` carries a reflection, which C{} does not contain",
                    self.n
                )))
            }
        };
        if !theta.is_finite() || !cycle_isclose(theta, 0.0, self.step(), thresh) {
            return Err(GroupError::NotAMember(format!(
                "the angle {theta} is not a multiple of 2π/{}",
                self.n
            )));
        }
        Ok(ElementValue::Int(
            ((theta / self.step()).round() as i64).rem_euclid(self.n as i64),
        ))
    }

    fn from_canonical(
        &self,
        value: &ElementValue,
        to: Parametrization,
    ) -> Result<ElementValue, GroupError> {
        let a = value.as_int()?;
        let theta = a as f64 * self.step();
        Ok(match to {
            Parametrization::Int => ElementValue::Int(a),
            Parametrization::Radians => ElementValue::Radians(theta),
            Parametrization::Mat => ElementValue::Mat(encode_rotation_matrix(theta)),
        })
    }
}

impl Group for CyclicGroup {
    fn name(&self) -> String {
        format!("C{}", self.n)
    }

    fn is_continuous(&self) -> bool {
        false
    }

    fn is_abelian(&self) -> bool {
        true
    }

    fn order(&self) -> GroupOrder {
        GroupOrder::Int(self.n)
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
        ElementValue::Int(0)
    }

    fn combine_values(
        &self,
        lhs: &ElementValue,
        rhs: &ElementValue,
    ) -> Result<ElementValue, GroupError> {
        Ok(ElementValue::Int(
            (lhs.as_int()? + rhs.as_int()?).rem_euclid(self.n as i64),
        ))
    }

    fn inverse_value(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        Ok(ElementValue::Int((-value.as_int()?).rem_euclid(self.n as i64)))
    }

    fn equal_values(&self, lhs: &ElementValue, rhs: &ElementValue) -> bool {
        match (lhs.as_int(), rhs.as_int()) {
            (Ok(a), Ok(b)) => a.rem_euclid(self.n as i64) == b.rem_euclid(self.n as i64),
            _ => false,
        }
    }

    fn hash_key(&self, value: &ElementValue) -> Vec<i64> {
        value.as_int().map(|a| vec![a]).unwrap_or_default()
    }

    fn repr_value(&self, value: &ElementValue) -> String {
        match value.as_int() {
            Ok(a) => format!("{a}[2pi/{}]", self.n),
            Err(_) => format!("{value:?}"),
        }
    }

    fn element_values(&self) -> Option<Vec<ElementValue>> {
        Some((0..self.n as i64).map(ElementValue::Int).collect())
    }

    fn testing_values(&self) -> Vec<ElementValue> {
        (0..self.n as i64).map(ElementValue::Int).collect()
    }

    fn generator_values(&self) -> Result<Vec<ElementValue>, GroupError> {
        if self.n > 1 {
            Ok(vec![ElementValue::Int(1)])
        } else {
            Ok(vec![])
        }
    }

    fn sample_value(&self, rng: &mut dyn RngCore) -> ElementValue {
        ElementValue::Int(rng.gen_range(0..self.n as i64))
    }

    /// Builds `n` evenly spaced rotations (`n` must divide $`N`$) or `n` random ones.
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
                        "a regular grid of C{} must have a number of points dividing {}, not {n}",
                        self.n, self.n
                    )));
                }
                let ratio = (self.n / n) as i64;
                Ok((0..n as i64).map(|i| ElementValue::Int(i * ratio)).collect())
            }
            GridKind::Rand => Ok((0..n).map(|_| self.sample_value(rng)).collect()),
        }
    }

    fn build_irrep(&self, id: &IrrepId) -> Result<IrreducibleRepresentation, GroupError> {
        let k = self.frequency_of(id)?;
        let step = self.step();
        let name = self.name();
        if k == 0 {
            IrreducibleRepresentation::from_functions(
                *id,
                &name,
                1,
                Field::Real,
                |_| Ok(Array2::eye(1)),
                |_| Ok(1.0),
            )
        } else if self.is_nyquist(k) {
            let kf = k as f64;
            IrreducibleRepresentation::from_functions(
                *id,
                &name,
                1,
                Field::Real,
                move |g| Ok(array![[(kf * g.value().as_int()? as f64 * step).cos()]]),
                move |g| Ok((kf * g.value().as_int()? as f64 * step).cos()),
            )
        } else {
            let kf = k as f64;
            IrreducibleRepresentation::from_functions(
                *id,
                &name,
                2,
                Field::Complex,
                move |g| Ok(psi(g.value().as_int()? as f64 * step, k as i64)),
                move |g| Ok(2.0 * (kf * g.value().as_int()? as f64 * step).cos()),
            )
        }
    }

    fn trivial_irrep_id(&self) -> IrrepId {
        IrrepId::Rot(0)
    }

    fn irrep_ids(&self) -> Option<Vec<IrrepId>> {
        Some((0..=self.n / 2).map(IrrepId::Rot).collect())
    }

    fn bl_irreps(&self, max_frequency: usize) -> Result<Vec<IrrepId>, GroupError> {
        if max_frequency > self.n / 2 {
            return Err(GroupError::InvalidIrrepId(format!(
                "C{} has no irreps of frequency above {}",
                self.n,
                self.n / 2
            )));
        }
        Ok((0..=max_frequency).map(IrrepId::Rot).collect())
    }

    fn tensor_product_irreps(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
    ) -> Result<Vec<(IrrepId, usize)>, GroupError> {
        let (m, n) = (self.frequency_of(lhs)?, self.frequency_of(rhs)?);
        if m == 0 || n == 0 {
            return Ok(vec![(IrrepId::Rot(m + n), 1)]);
        }
        let sum = if 2 * (m + n) <= self.n {
            m + n
        } else {
            self.n - m - n
        };
        if self.is_nyquist(m) || self.is_nyquist(n) {
            return Ok(vec![(IrrepId::Rot(sum), 1)]);
        }
        let sum_multiplicity = if self.is_nyquist(sum) { 2 } else { 1 };
        if m == n {
            Ok(vec![(IrrepId::Rot(0), 2), (IrrepId::Rot(sum), sum_multiplicity)])
        } else {
            Ok(vec![
                (IrrepId::Rot(m.abs_diff(n)), 1),
                (IrrepId::Rot(sum), sum_multiplicity),
            ])
        }
    }

    fn clebsch_gordan_coeff(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
        target: &IrrepId,
    ) -> Result<Array4<f64>, GroupError> {
        let (m, n, j) = (
            self.frequency_of(lhs)?,
            self.frequency_of(rhs)?,
            self.frequency_of(target)?,
        );
        let (dm, dn, dj) = (
            self.irrep(lhs)?.size(),
            self.irrep(rhs)?.size(),
            self.irrep(target)?.size(),
        );
        let big_n = self.n;
        let mat = if m == 0 || n == 0 {
            if j == m + n {
                Array2::eye(dj)
            } else {
                Array2::zeros((dm * dn, 0))
            }
        } else if self.is_nyquist(m) || self.is_nyquist(n) {
            if j == m + n {
                Array2::eye(dj)
            } else if j + m + n == big_n {
                let negated: &[usize] = if dj > 1 { &[1] } else { &[] };
                signed_columns(&Array2::eye(dj), &(0..dj).collect::<Vec<_>>(), negated)
            } else {
                Array2::zeros((dm * dn, 0))
            }
        } else {
            let basis = rotation_product_basis();
            if j == m + n {
                signed_columns(&basis, &[2, 3], &[])
            } else if j + m + n == big_n {
                signed_columns(&basis, &[2, 3], &[1])
            } else if j + n == m {
                signed_columns(&basis, &[0, 1], &[])
            } else if j + m == n {
                signed_columns(&basis, &[0, 1], &[1])
            } else {
                Array2::zeros((dm * dn, 0))
            }
        };
        coefficients_from_matrix(mat, dm, dn, dj)
    }

    fn subgroup_trivial_id(&self) -> SubgroupId {
        SubgroupId::cyclic(1)
    }

    fn subgroup_self_id(&self) -> SubgroupId {
        SubgroupId::cyclic(self.n)
    }

    fn process_subgroup_id(&self, id: &SubgroupId) -> Result<SubgroupId, GroupError> {
        match id {
            SubgroupId::Rotations(GroupOrder::Int(m)) if *m > 0 && self.n % *m == 0 => Ok(*id),
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "the subgroups of C{} are identified by a positive order dividing {}, not {id}",
                self.n, self.n
            ))),
        }
    }

    fn build_subgroup(
        &self,
        factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<(Rc<dyn Group>, Embedding), GroupError> {
        let m = cyclic_subgroup_order(id)?;
        let subgroup: Rc<dyn Group> = factory.cyclic_group(m)?;
        Ok((
            subgroup,
            Embedding::CyclicInCyclic { ratio: self.n / m },
        ))
    }

    fn combine_subgroups(
        &self,
        factory: &GroupFactory,
        outer: &SubgroupId,
        inner: &SubgroupId,
    ) -> Result<SubgroupId, GroupError> {
        let outer = self.process_subgroup_id(outer)?;
        let subgroup = factory.cyclic_group(cyclic_subgroup_order(&outer)?)?;
        subgroup.process_subgroup_id(inner)
    }

    fn restrict_irrep_canonical(
        &self,
        factory: &GroupFactory,
        irrep: &IrrepId,
        id: &SubgroupId,
    ) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError> {
        let k = self.frequency_of(irrep)?;
        let size = self.irrep(irrep)?.size();
        restrict_to_cyclic(factory, size, k, cyclic_subgroup_order(id)?)
    }
}

fn cyclic_subgroup_order(id: &SubgroupId) -> Result<usize, GroupError> {
    match id {
        SubgroupId::Rotations(GroupOrder::Int(m)) => Ok(*m),
        _ => Err(GroupError::InvalidSubgroupId(format!(
            "{id} does not identify a cyclic subgroup"
        ))),
    }
}
