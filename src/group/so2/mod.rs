//! The group $`SO(2)`$ of all planar rotations.

use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log;
use ndarray::{Array2, Array4};
use rand::{Rng, RngCore};

use crate::group::factory::{GroupConfig, GroupFactory};
use crate::group::group_error::GroupError;
use crate::group::subgroup::{Embedding, SubgroupId};
use crate::group::{
    regular_angles, restrict_to_cyclic, spectral_directsum, Group, GridKind, GroupOrder,
};
use crate::parametrization::{
    cycle_isclose, decode_rotation_matrix, encode_rotation_matrix, normalize_angle, psi,
    ElementValue, Parametrization, ParametrizationCodec,
};
use crate::representation::clebsch_gordan::{
    coefficients_from_matrix, rotation_product_basis, signed_columns,
};
use crate::representation::registry::RepresentationRegistry;
use crate::representation::{Field, IrreducibleRepresentation, IrrepId, Representation};


/// A structure to manage $`SO(2)`$, whose elements $`r_\theta`$ are stored as their angles
/// $`\theta \in [0, 2\pi)`$.
#[derive(Debug)]
pub struct SO2 {
    /// The largest frequency whose irreps have been built eagerly.
    maximum_frequency: Cell<usize>,

    angle_threshold: f64,

    matrix_threshold: f64,

    testing_elements: usize,

    registry: RepresentationRegistry,
}

impl SO2 {
    pub(crate) fn new(maximum_frequency: usize, config: &GroupConfig) -> Result<Self, GroupError> {
        log::debug!("Constructing SO(2) with irreps up to frequency {maximum_frequency}...");
        let group = Self {
            maximum_frequency: Cell::new(0),
            angle_threshold: config.angle_threshold,
            matrix_threshold: config.matrix_threshold,
            testing_elements: config.testing_elements,
            registry: RepresentationRegistry::default(),
        };
        group.irrep(&IrrepId::Rot(0))?;
        group.extend_maximum_frequency(maximum_frequency)?;
        log::debug!("Constructing SO(2) with irreps up to frequency {maximum_frequency}... Done.");
        Ok(group)
    }

    pub fn maximum_frequency(&self) -> usize {
        self.maximum_frequency.get()
    }

    /// Builds the irreps of all frequencies up to `maximum_frequency`, if not built already.
    pub(crate) fn extend_maximum_frequency(
        &self,
        maximum_frequency: usize,
    ) -> Result<(), GroupError> {
        let current = self.maximum_frequency.get();
        if maximum_frequency <= current {
            return Ok(());
        }
        log::debug!(
            "Extending the irreps of SO(2) from frequency {current} to {maximum_frequency}..."
        );
        for k in current + 1..=maximum_frequency {
            self.irrep(&IrrepId::Rot(k))?;
        }
        self.maximum_frequency.set(maximum_frequency);
        log::debug!(
            "Extending the irreps of SO(2) from frequency {current} to {maximum_frequency}... Done."
        );
        Ok(())
    }

    /// The direct sum of every irrep of frequency at most `max_frequency`, each repeated once
    /// per real constituent. It approximates the regular representation on band-limited
    /// functions.
    pub fn bl_regular_representation(
        &self,
        max_frequency: usize,
    ) -> Result<Rc<Representation>, GroupError> {
        let ids = self.bl_irreps(max_frequency)?;
        spectral_directsum(self, &ids, &format!("regular_{max_frequency}"))
    }

    fn frequency_of(id: &IrrepId) -> Result<usize, GroupError> {
        match id {
            IrrepId::Rot(k) => Ok(*k),
            IrrepId::FlipRot(..) => Err(GroupError::InvalidIrrepId(format!(
                "{id:?} does not identify an irrep of SO(2), whose irreps carry a single \
                frequency"
            ))),
        }
    }
}

impl ParametrizationCodec for SO2 {
    fn parametrizations(&self) -> &'static [Parametrization] {
        &[Parametrization::Radians, Parametrization::Mat]
    }

    fn canonical_parametrization(&self) -> Parametrization {
        Parametrization::Radians
    }

    fn to_canonical(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        let theta = match value {
            ElementValue::Radians(theta) => *theta,
            ElementValue::Mat(mat) => decode_rotation_matrix(mat, self.matrix_threshold)?,
            _ => {
                return Err(GroupError::NotAMember(format!(
                    "`{value:?}` does not describe a rotation of SO(2)"
                )))
            }
        };
        if !theta.is_finite() {
            return Err(GroupError::NotAMember(format!(
                "the angle {theta} is not finite"
            )));
        }
        Ok(ElementValue::Radians(normalize_angle(theta)))
    }

    fn from_canonical(
        &self,
        value: &ElementValue,
        to: Parametrization,
    ) -> Result<ElementValue, GroupError> {
        let theta = value.as_radians()?;
        match to {
            Parametrization::Radians => Ok(ElementValue::Radians(theta)),
            Parametrization::Mat => Ok(ElementValue::Mat(encode_rotation_matrix(theta))),
            Parametrization::Int => Err(GroupError::InvalidParametrization(
                "SO(2) has no integer parametrization".to_string(),
            )),
        }
    }
}

impl Group for SO2 {
    fn name(&self) -> String {
        "SO(2)".to_string()
    }

    fn is_continuous(&self) -> bool {
        true
    }

    fn is_abelian(&self) -> bool {
        true
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
        ElementValue::Radians(0.0)
    }

    fn combine_values(
        &self,
        lhs: &ElementValue,
        rhs: &ElementValue,
    ) -> Result<ElementValue, GroupError> {
        Ok(ElementValue::Radians(normalize_angle(
            lhs.as_radians()? + rhs.as_radians()?,
        )))
    }

    fn inverse_value(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        Ok(ElementValue::Radians(normalize_angle(-value.as_radians()?)))
    }

    fn equal_values(&self, lhs: &ElementValue, rhs: &ElementValue) -> bool {
        match (lhs.as_radians(), rhs.as_radians()) {
            (Ok(a), Ok(b)) => cycle_isclose(a, b, TAU, self.angle_threshold),
            _ => false,
        }
    }

    fn hash_key(&self, value: &ElementValue) -> Vec<i64> {
        value
            .as_radians()
            .map(|theta| {
                let (sin, cos) = theta.sin_cos();
                vec![(cos * 1e5).round() as i64, (sin * 1e5).round() as i64]
            })
            .unwrap_or_default()
    }

    fn repr_value(&self, value: &ElementValue) -> String {
        match value.as_radians() {
            Ok(theta) => format!("{theta}"),
            Err(_) => format!("{value:?}"),
        }
    }

    fn element_values(&self) -> Option<Vec<ElementValue>> {
        None
    }

    fn testing_values(&self) -> Vec<ElementValue> {
        regular_angles(self.testing_elements)
            .into_iter()
            .map(ElementValue::Radians)
            .collect()
    }

    fn generator_values(&self) -> Result<Vec<ElementValue>, GroupError> {
        Err(GroupError::Unsupported(
            "SO(2) is continuous and has no finite set of generators".to_string(),
        ))
    }

    fn sample_value(&self, rng: &mut dyn RngCore) -> ElementValue {
        ElementValue::Radians(rng.gen_range(0.0..TAU))
    }

    fn grid_values(
        &self,
        kind: GridKind,
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ElementValue>, GroupError> {
        Ok(match kind {
            GridKind::Regular => regular_angles(n)
                .into_iter()
                .map(ElementValue::Radians)
                .collect(),
            GridKind::Rand => (0..n).map(|_| self.sample_value(rng)).collect(),
        })
    }

    fn build_irrep(&self, id: &IrrepId) -> Result<IrreducibleRepresentation, GroupError> {
        let k = Self::frequency_of(id)?;
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
        } else {
            let kf = k as f64;
            IrreducibleRepresentation::from_functions(
                *id,
                &name,
                2,
                Field::Complex,
                move |g| Ok(psi(g.value().as_radians()?, k as i64)),
                move |g| Ok(2.0 * (kf * g.value().as_radians()?).cos()),
            )
        }
    }

    fn trivial_irrep_id(&self) -> IrrepId {
        IrrepId::Rot(0)
    }

    fn irrep_ids(&self) -> Option<Vec<IrrepId>> {
        None
    }

    fn bl_irreps(&self, max_frequency: usize) -> Result<Vec<IrrepId>, GroupError> {
        Ok((0..=max_frequency).map(IrrepId::Rot).collect())
    }

    fn tensor_product_irreps(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
    ) -> Result<Vec<(IrrepId, usize)>, GroupError> {
        let (m, n) = (Self::frequency_of(lhs)?, Self::frequency_of(rhs)?);
        if m == 0 || n == 0 {
            Ok(vec![(IrrepId::Rot(m + n), 1)])
        } else if m == n {
            Ok(vec![(IrrepId::Rot(0), 2), (IrrepId::Rot(2 * m), 1)])
        } else {
            Ok(vec![
                (IrrepId::Rot(m.abs_diff(n)), 1),
                (IrrepId::Rot(m + n), 1),
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
            Self::frequency_of(lhs)?,
            Self::frequency_of(rhs)?,
            Self::frequency_of(target)?,
        );
        let (dm, dn, dj) = (
            self.irrep(lhs)?.size(),
            self.irrep(rhs)?.size(),
            self.irrep(target)?.size(),
        );
        let mat = if m == 0 || n == 0 {
            if j == m + n {
                Array2::eye(dj)
            } else {
                Array2::zeros((dm * dn, 0))
            }
        } else {
            let basis = rotation_product_basis();
            if j == m + n {
                signed_columns(&basis, &[2, 3], &[])
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
        SubgroupId::Rotations(GroupOrder::Inf)
    }

    fn process_subgroup_id(&self, id: &SubgroupId) -> Result<SubgroupId, GroupError> {
        match id {
            SubgroupId::Rotations(GroupOrder::Int(m)) if *m > 0 => Ok(*id),
            SubgroupId::Rotations(GroupOrder::Inf) => Ok(*id),
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "the subgroups of SO(2) are identified by a positive number of rotations or ∞, \
                not {id}"
            ))),
        }
    }

    fn build_subgroup(
        &self,
        factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<(Rc<dyn Group>, Embedding), GroupError> {
        match id {
            SubgroupId::Rotations(GroupOrder::Int(m)) => {
                let subgroup: Rc<dyn Group> = factory.cyclic_group(*m)?;
                Ok((
                    subgroup,
                    Embedding::CyclicInSO2 {
                        order: *m,
                        thresh: self.angle_threshold,
                    },
                ))
            }
            SubgroupId::Rotations(GroupOrder::Inf) => {
                let subgroup: Rc<dyn Group> = factory.so2_group(self.maximum_frequency())?;
                Ok((subgroup, Embedding::Identity))
            }
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "{id} does not identify a subgroup of SO(2)"
            ))),
        }
    }

    fn combine_subgroups(
        &self,
        _factory: &GroupFactory,
        outer: &SubgroupId,
        inner: &SubgroupId,
    ) -> Result<SubgroupId, GroupError> {
        match self.process_subgroup_id(outer)? {
            SubgroupId::Rotations(GroupOrder::Inf) => self.process_subgroup_id(inner),
            SubgroupId::Rotations(GroupOrder::Int(m)) => match inner {
                SubgroupId::Rotations(GroupOrder::Int(n)) if *n > 0 && m % *n == 0 => Ok(*inner),
                _ => Err(GroupError::InvalidSubgroupId(format!(
                    "{inner} does not identify a subgroup of C{m}"
                ))),
            },
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "{outer} does not identify a subgroup of SO(2)"
            ))),
        }
    }

    fn restrict_irrep_canonical(
        &self,
        factory: &GroupFactory,
        irrep: &IrrepId,
        id: &SubgroupId,
    ) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError> {
        let k = Self::frequency_of(irrep)?;
        let size = self.irrep(irrep)?.size();
        match id {
            SubgroupId::Rotations(GroupOrder::Inf) => Ok((Array2::eye(size), vec![*irrep])),
            SubgroupId::Rotations(GroupOrder::Int(m)) => restrict_to_cyclic(factory, size, k, *m),
            _ => Err(GroupError::InvalidSubgroupId(format!(
                "{id} does not identify a subgroup of SO(2)"
            ))),
        }
    }

    /// Only the whole group has a finite transversal, namely the identity alone.
    fn coset_representatives(
        &self,
        _factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<Vec<ElementValue>, GroupError> {
        match id {
            SubgroupId::Rotations(GroupOrder::Inf) => Ok(vec![self.identity_value()]),
            _ => Err(GroupError::UnsupportedInduction(format!(
                "the subgroup {id} has infinite index in SO(2)"
            ))),
        }
    }
}
