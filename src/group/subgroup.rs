//! Subgroup identifiers and the inclusion and restriction maps between a group and its subgroups.

use std::f64::consts::TAU;
use std::fmt;
use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::group::group_error::GroupError;
use crate::group::{same_group, Group, GroupElement, GroupOrder};
use crate::parametrization::{cycle_isclose, normalize_angle, ElementValue};

#[cfg(test)]
#[path = "subgroup_tests.rs"]
mod subgroup_tests;

// ================
// Enum definitions
// ================

/// An enumerated type for subgroup identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubgroupId {
    /// Variant for the rotation subgroups of $`C_N`$ and $`SO(2)`$, identified by their number
    /// of rotations.
    Rotations(GroupOrder),

    /// Variant for the subgroups of $`O(2)`$. Without an `axis` the subgroup contains no
    /// reflections; otherwise it contains the reflection $`r_\theta f`$ for `axis` $`\theta`$.
    O2 {
        axis: Option<OrderedFloat<f64>>,
        order: GroupOrder,
    },

    /// Variant for the subgroups of $`D_N`$. The `axis` is the rotation power $`a`$ of the
    /// reflection $`r^a f`$ contained in the subgroup, if any.
    Dihedral { axis: Option<usize>, order: usize },
}

impl SubgroupId {
    /// Constructs a subgroup identifier for $`O(2)`$.
    pub fn o2(axis: Option<f64>, order: GroupOrder) -> Self {
        Self::O2 {
            axis: axis.map(OrderedFloat),
            order,
        }
    }

    /// Constructs a subgroup identifier for $`C_N`$.
    pub fn cyclic(order: usize) -> Self {
        Self::Rotations(GroupOrder::Int(order))
    }

    /// Constructs a subgroup identifier for $`D_N`$.
    pub fn dihedral(axis: Option<usize>, order: usize) -> Self {
        Self::Dihedral { axis, order }
    }
}

impl fmt::Display for SubgroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rotations(order) => write!(f, "({order})"),
            Self::O2 { axis, order } => match axis {
                Some(axis) => write!(f, "({:.6}, {order})", axis.0),
                None => write!(f, "(None, {order})"),
            },
            Self::Dihedral { axis, order } => match axis {
                Some(axis) => write!(f, "({axis}, {order})"),
                None => write!(f, "(None, {order})"),
            },
        }
    }
}

/// An enumerated type for the embeddings of subgroups, acting on canonical element values.
#[derive(Clone, Debug, PartialEq)]
pub enum Embedding {
    /// Variant for a group embedded into itself.
    Identity,

    /// Variant for $`C_M \subseteq C_N`$, generated by $`r^{N/M}`$.
    CyclicInCyclic { ratio: usize },

    /// Variant for $`C_M \subset SO(2)`$.
    CyclicInSO2 { order: usize, thresh: f64 },

    /// Variant for $`SO(2) \subset O(2)`$.
    SO2InO2,

    /// Variant for $`C_M \subset O(2)`$.
    CyclicInO2 { order: usize, thresh: f64 },

    /// Variant for the reflection group $`\{e, r_\theta f\} \subset O(2)`$.
    FlipInO2 { axis: f64, thresh: f64 },

    /// Variant for $`D_M \subset O(2)`$, generated by $`r_{2\pi/M}`$ and $`r_\theta f`$.
    DihedralInO2 { axis: f64, order: usize, thresh: f64 },

    /// Variant for $`O(2)`$ conjugated into itself by $`r_{\theta/2}`$, which maps $`f`$ to
    /// $`r_\theta f`$.
    O2Conjugation { axis: f64 },

    /// Variant for $`C_M \subseteq D_N`$, generated by $`r^{N/M}`$.
    CyclicInDihedral { ratio: usize },

    /// Variant for the reflection group $`\{e, r^a f\} \subset D_N`$.
    FlipInDihedral { axis: usize },

    /// Variant for $`D_M \subseteq D_N`$, generated by $`r^{N/M}`$ and $`r^a f`$.
    DihedralInDihedral {
        axis: usize,
        ratio: usize,
        order: usize,
    },
}

impl Embedding {
    /// Maps a canonical subgroup value to the canonical value of its image in the parent group.
    pub fn include_value(&self, value: &ElementValue) -> Result<ElementValue, GroupError> {
        match self {
            Self::Identity => Ok(value.clone()),
            Self::CyclicInCyclic { ratio } => Ok(ElementValue::Int(value.as_int()? * *ratio as i64)),
            Self::CyclicInSO2 { order, .. } => Ok(ElementValue::Radians(normalize_angle(
                value.as_int()? as f64 * TAU / *order as f64,
            ))),
            Self::SO2InO2 => Ok(ElementValue::FlipRadians(0, value.as_radians()?)),
            Self::CyclicInO2 { order, .. } => Ok(ElementValue::FlipRadians(
                0,
                normalize_angle(value.as_int()? as f64 * TAU / *order as f64),
            )),
            Self::FlipInO2 { axis, .. } => match value.as_int()? {
                0 => Ok(ElementValue::FlipRadians(0, 0.0)),
                _ => Ok(ElementValue::FlipRadians(1, *axis)),
            },
            Self::DihedralInO2 { axis, order, .. } => {
                let (s, a) = value.as_flip_int()?;
                Ok(ElementValue::FlipRadians(
                    s,
                    normalize_angle(a as f64 * TAU / *order as f64 + f64::from(s) * axis),
                ))
            }
            Self::O2Conjugation { axis } => {
                let (s, theta) = value.as_flip_radians()?;
                Ok(ElementValue::FlipRadians(
                    s,
                    normalize_angle(theta + f64::from(s) * axis),
                ))
            }
            Self::CyclicInDihedral { ratio } => {
                Ok(ElementValue::FlipInt(0, value.as_int()? * *ratio as i64))
            }
            Self::FlipInDihedral { axis } => match value.as_int()? {
                0 => Ok(ElementValue::FlipInt(0, 0)),
                _ => Ok(ElementValue::FlipInt(1, *axis as i64)),
            },
            Self::DihedralInDihedral { axis, ratio, order } => {
                let (s, b) = value.as_flip_int()?;
                Ok(ElementValue::FlipInt(
                    s,
                    (b * *ratio as i64 + i64::from(s) * *axis as i64).rem_euclid(*order as i64),
                ))
            }
        }
    }

    /// Maps a canonical parent value to the canonical subgroup value it corresponds to, or
    /// `None` if the parent element does not lie in the subgroup.
    pub fn restrict_value(&self, value: &ElementValue) -> Result<Option<ElementValue>, GroupError> {
        match self {
            Self::Identity => Ok(Some(value.clone())),
            Self::CyclicInCyclic { ratio } => {
                let a = value.as_int()?;
                Ok((a % *ratio as i64 == 0).then(|| ElementValue::Int(a / *ratio as i64)))
            }
            Self::CyclicInSO2 { order, thresh } => {
                Ok(rotation_power(value.as_radians()?, *order, *thresh).map(ElementValue::Int))
            }
            Self::SO2InO2 => {
                let (s, theta) = value.as_flip_radians()?;
                Ok((s == 0).then_some(ElementValue::Radians(theta)))
            }
            Self::CyclicInO2 { order, thresh } => {
                let (s, theta) = value.as_flip_radians()?;
                if s != 0 {
                    return Ok(None);
                }
                Ok(rotation_power(theta, *order, *thresh).map(ElementValue::Int))
            }
            Self::FlipInO2 { axis, thresh } => {
                let (s, theta) = value.as_flip_radians()?;
                let target = if s == 0 { 0.0 } else { *axis };
                Ok(cycle_isclose(theta, target, TAU, *thresh)
                    .then_some(ElementValue::Int(i64::from(s))))
            }
            Self::DihedralInO2 {
                axis,
                order,
                thresh,
            } => {
                let (s, theta) = value.as_flip_radians()?;
                Ok(
                    rotation_power(theta - f64::from(s) * axis, *order, *thresh)
                        .map(|a| ElementValue::FlipInt(s, a)),
                )
            }
            Self::O2Conjugation { axis } => {
                let (s, theta) = value.as_flip_radians()?;
                Ok(Some(ElementValue::FlipRadians(
                    s,
                    normalize_angle(theta - f64::from(s) * axis),
                )))
            }
            Self::CyclicInDihedral { ratio } => {
                let (s, a) = value.as_flip_int()?;
                Ok((s == 0 && a % *ratio as i64 == 0)
                    .then(|| ElementValue::Int(a / *ratio as i64)))
            }
            Self::FlipInDihedral { axis } => {
                let (s, a) = value.as_flip_int()?;
                let target = if s == 0 { 0 } else { *axis as i64 };
                Ok((a == target).then_some(ElementValue::Int(i64::from(s))))
            }
            Self::DihedralInDihedral { axis, ratio, order } => {
                let (s, a) = value.as_flip_int()?;
                let rotation = (a - i64::from(s) * *axis as i64).rem_euclid(*order as i64);
                Ok((rotation % *ratio as i64 == 0)
                    .then(|| ElementValue::FlipInt(s, rotation / *ratio as i64)))
            }
        }
    }
}

/// The power $`a \in [0, M)`$ with $`\theta \equiv 2\pi a / M`$, if there is one.
fn rotation_power(theta: f64, order: usize, thresh: f64) -> Option<i64> {
    let step = TAU / order as f64;
    cycle_isclose(theta, 0.0, step, thresh)
        .then(|| ((theta / step).round() as i64).rem_euclid(order as i64))
}

// ==================
// Struct definitions
// ==================

/// A structure to manage a subgroup together with its inclusion into a parent group and the
/// partial restriction back from it.
///
/// For every subgroup element $`s`$, restricting the inclusion of $`s`$ gives back $`s`$, and the
/// subgroup identity is included as the parent identity.
pub struct SubgroupMap<'p> {
    parent: &'p dyn Group,
    subgroup: Rc<dyn Group>,
    id: SubgroupId,
    embedding: Embedding,
}

impl<'p> SubgroupMap<'p> {
    pub(crate) fn new(
        parent: &'p dyn Group,
        subgroup: Rc<dyn Group>,
        id: SubgroupId,
        embedding: Embedding,
    ) -> Self {
        Self {
            parent,
            subgroup,
            id,
            embedding,
        }
    }

    pub fn parent(&self) -> &'p dyn Group {
        self.parent
    }

    pub fn subgroup(&self) -> &dyn Group {
        self.subgroup.as_ref()
    }

    /// Returns a shared handle to the subgroup.
    pub fn subgroup_rc(&self) -> Rc<dyn Group> {
        Rc::clone(&self.subgroup)
    }

    /// The canonical identifier of the subgroup within the parent group.
    pub fn id(&self) -> &SubgroupId {
        &self.id
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Maps a subgroup element to the parent group.
    ///
    /// # Errors
    ///
    /// Errors if `element` does not belong to the subgroup instance of this map.
    pub fn include(&self, element: &GroupElement<'_>) -> Result<GroupElement<'p>, GroupError> {
        if !same_group(element.group(), self.subgroup.as_ref()) {
            return Err(GroupError::GroupMismatch(format!(
                "`{element}` of {} is not an element of the subgroup {}",
                element.group().name(),
                self.subgroup.name()
            )));
        }
        Ok(GroupElement::from_canonical(
            self.parent,
            self.embedding.include_value(element.value())?,
        ))
    }

    /// Maps a parent element to the subgroup, or to `None` if it does not lie in the subgroup.
    ///
    /// # Errors
    ///
    /// Errors if `element` does not belong to the parent group instance of this map.
    pub fn restrict(
        &self,
        element: &GroupElement<'_>,
    ) -> Result<Option<GroupElement<'_>>, GroupError> {
        if !same_group(element.group(), self.parent) {
            return Err(GroupError::GroupMismatch(format!(
                "`{element}` of {} is not an element of the parent group {}",
                element.group().name(),
                self.parent.name()
            )));
        }
        Ok(self
            .embedding
            .restrict_value(element.value())?
            .map(|value| GroupElement::from_canonical(self.subgroup.as_ref(), value)))
    }
}

impl<'p> fmt::Debug for SubgroupMap<'p> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubgroupMap")
            .field("parent", &self.parent.name())
            .field("subgroup", &self.subgroup.name())
            .field("id", &self.id)
            .field("embedding", &self.embedding)
            .finish()
    }
}
