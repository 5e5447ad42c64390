//! Planar symmetry groups: the group contract, group elements and the concrete families.

use std::f64::consts::TAU;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Mul;
use std::rc::Rc;
use std::str::FromStr;

use itertools::Itertools;
use log;
use ndarray::{s, Array2, Array4};
use num_traits::{Inv, Pow};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::group::factory::GroupFactory;
use crate::group::group_error::GroupError;
use crate::group::subgroup::{Embedding, SubgroupId, SubgroupMap};
use crate::parametrization::{chi, ElementValue, Parametrization, ParametrizationCodec};
use crate::representation::registry::RepresentationRegistry;
use crate::representation::{directsum, IrreducibleRepresentation, IrrepId, Representation};

pub mod cyclic;
pub mod dihedral;
pub mod factory;
pub mod group_error;
pub mod o2;
pub mod so2;
pub mod subgroup;


#[cfg(test)]
pub(crate) mod testing;

// ================
// Enum definitions
// ================

/// An enumerated type for the number of elements (or of rotations) of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupOrder {
    /// Variant for a finite count.
    Int(usize),

    /// Variant for a continuum.
    Inf,
}

impl GroupOrder {
    /// Returns the finite count, or `None` for [`GroupOrder::Inf`].
    pub fn to_usize(&self) -> Option<usize> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Inf => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Int(_))
    }
}

impl fmt::Display for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Inf => write!(f, "∞"),
        }
    }
}

/// An enumerated type for the kinds of discretisation grid of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridKind {
    /// Variant for evenly spaced elements.
    Regular,

    /// Variant for elements drawn independently and uniformly.
    Rand,
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Rand => write!(f, "rand"),
        }
    }
}

impl FromStr for GridKind {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "rand" => Ok(Self::Rand),
            _ => Err(GroupError::UnrecognizedGridType(s.to_string())),
        }
    }
}

// =================
// Trait definitions
// =================

/// Trait for planar symmetry groups.
///
/// Implementors provide the group law on values in their canonical parametrization, their irreps
/// and their subgroup lattice. Everything that can be expressed through these, such as element
/// construction, sampling, regular and induced representations, is provided here once for all
/// groups.
///
/// Values handed to the `*_value(s)` methods are always canonical and members of the group.
pub trait Group: ParametrizationCodec + fmt::Debug {
    // ----------------
    // Required methods
    // ----------------

    /// The name of the group, *e.g.* `C4` or `O(2)`.
    fn name(&self) -> String;

    fn is_continuous(&self) -> bool;

    fn is_abelian(&self) -> bool;

    /// The number of elements in the group.
    fn order(&self) -> GroupOrder;

    /// The number of rotations in the group.
    fn rotation_order(&self) -> GroupOrder;

    /// The caches of the representations built for this group.
    fn registry(&self) -> &RepresentationRegistry;

    /// The absolute tolerance used when comparing angles.
    fn angle_threshold(&self) -> f64;

    /// Returns this group as a trait object.
    fn as_dyn(&self) -> &dyn Group;

    fn identity_value(&self) -> ElementValue;

    fn combine_values(
        &self,
        lhs: &ElementValue,
        rhs: &ElementValue,
    ) -> Result<ElementValue, GroupError>;

    fn inverse_value(&self, value: &ElementValue) -> Result<ElementValue, GroupError>;

    fn equal_values(&self, lhs: &ElementValue, rhs: &ElementValue) -> bool;

    /// A key which agrees for equal elements, except possibly for elements straddling a rounding
    /// boundary.
    fn hash_key(&self, value: &ElementValue) -> Vec<i64>;

    fn repr_value(&self, value: &ElementValue) -> String;

    /// All elements of a finite group, or `None` for a continuous group.
    fn element_values(&self) -> Option<Vec<ElementValue>>;

    /// A finite sequence of elements to use for testing.
    fn testing_values(&self) -> Vec<ElementValue>;

    /// A generating set of a finite group.
    ///
    /// # Errors
    ///
    /// Errors for continuous groups, whose generators are infinitesimal.
    fn generator_values(&self) -> Result<Vec<ElementValue>, GroupError>;

    /// Draws an element uniformly at random.
    fn sample_value(&self, rng: &mut dyn RngCore) -> ElementValue;

    /// Builds a discretisation grid of `n` elements.
    fn grid_values(
        &self,
        kind: GridKind,
        n: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ElementValue>, GroupError>;

    /// Constructs the irrep identified by `id`. This is only called on a cache miss.
    fn build_irrep(&self, id: &IrrepId) -> Result<IrreducibleRepresentation, GroupError>;

    fn trivial_irrep_id(&self) -> IrrepId;

    /// All irrep identifiers of a finite group, or `None` for a continuous group.
    fn irrep_ids(&self) -> Option<Vec<IrrepId>>;

    /// The identifiers of all irreps of rotational frequency at most `max_frequency`, in a fixed
    /// order.
    fn bl_irreps(&self, max_frequency: usize) -> Result<Vec<IrrepId>, GroupError>;

    /// The irreps, with multiplicities, into which the tensor product of the irreps `lhs` and
    /// `rhs` decomposes.
    fn tensor_product_irreps(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
    ) -> Result<Vec<(IrrepId, usize)>, GroupError>;

    /// The Clebsch-Gordan coefficients of the irrep `target` in the tensor product of `lhs` and
    /// `rhs`, with shape `(size(lhs), size(rhs), multiplicity, size(target))`.
    fn clebsch_gordan_coeff(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
        target: &IrrepId,
    ) -> Result<Array4<f64>, GroupError>;

    fn subgroup_trivial_id(&self) -> SubgroupId;

    fn subgroup_self_id(&self) -> SubgroupId;

    /// Validates a subgroup identifier and brings it into canonical form.
    fn process_subgroup_id(&self, id: &SubgroupId) -> Result<SubgroupId, GroupError>;

    /// Constructs the subgroup identified by the canonical identifier `id`.
    fn build_subgroup(
        &self,
        factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<(Rc<dyn Group>, Embedding), GroupError>;

    /// The identifier of the subgroup `inner` of the subgroup `outer` of this group, expressed as
    /// a subgroup of this group.
    fn combine_subgroups(
        &self,
        factory: &GroupFactory,
        outer: &SubgroupId,
        inner: &SubgroupId,
    ) -> Result<SubgroupId, GroupError>;

    /// Restricts the irrep `irrep` to the subgroup with the canonical identifier `id`.
    ///
    /// # Returns
    ///
    /// The change of basis $`Q`$ and the subgroup irreps $`\sigma_i`$ such that
    /// $`\rho(\iota(s)) = Q \left(\bigoplus_i \sigma_i(s)\right) Q^{\mathsf{T}}`$.
    fn restrict_irrep_canonical(
        &self,
        factory: &GroupFactory,
        irrep: &IrrepId,
        id: &SubgroupId,
    ) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError>;

    // ----------------
    // Provided methods
    // ----------------

    /// Constructs an element from a value in any supported parametrization.
    ///
    /// # Errors
    ///
    /// Errors if the parametrization is unsupported or the value is not a group member.
    fn element(&self, value: ElementValue) -> Result<GroupElement<'_>, GroupError> {
        let canonical = self.change_param(&value, self.canonical_parametrization())?;
        Ok(GroupElement::from_canonical(self.as_dyn(), canonical))
    }

    fn identity(&self) -> GroupElement<'_> {
        GroupElement::from_canonical(self.as_dyn(), self.identity_value())
    }

    /// Checks whether `value` describes an element of this group. This never fails.
    fn is_element(&self, value: &ElementValue) -> bool {
        self.change_param(value, self.canonical_parametrization())
            .is_ok()
    }

    fn elements(&self) -> Option<Vec<GroupElement<'_>>> {
        self.element_values().map(|values| {
            values
                .into_iter()
                .map(|value| GroupElement::from_canonical(self.as_dyn(), value))
                .collect::<Vec<_>>()
        })
    }

    fn testing_elements(&self) -> Vec<GroupElement<'_>> {
        self.testing_values()
            .into_iter()
            .map(|value| GroupElement::from_canonical(self.as_dyn(), value))
            .collect::<Vec<_>>()
    }

    fn generators(&self) -> Result<Vec<GroupElement<'_>>, GroupError> {
        Ok(self
            .generator_values()?
            .into_iter()
            .map(|value| GroupElement::from_canonical(self.as_dyn(), value))
            .collect::<Vec<_>>())
    }

    fn sample(&self) -> GroupElement<'_> {
        self.sample_with(&mut rand::thread_rng())
    }

    fn sample_with(&self, rng: &mut dyn RngCore) -> GroupElement<'_> {
        GroupElement::from_canonical(self.as_dyn(), self.sample_value(rng))
    }

    /// Builds a discretisation grid of `n` elements. Random grids are reproducible when a `seed`
    /// is given.
    fn grid(
        &self,
        kind: GridKind,
        n: usize,
        seed: Option<u64>,
    ) -> Result<Vec<GroupElement<'_>>, GroupError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(self
            .grid_values(kind, n, &mut rng)?
            .into_iter()
            .map(|value| GroupElement::from_canonical(self.as_dyn(), value))
            .collect::<Vec<_>>())
    }

    /// Retrieves the irrep identified by `id`, building and caching it on first request.
    ///
    /// Repeated requests with the same `id` return the same shared instance.
    fn irrep(&self, id: &IrrepId) -> Result<Rc<IrreducibleRepresentation>, GroupError> {
        self.registry()
            .irrep_or_try_insert_with(id, || self.build_irrep(id))
    }

    /// All irreps built so far, in order of construction.
    fn irreps(&self) -> Vec<Rc<IrreducibleRepresentation>> {
        self.registry().irreps()
    }

    fn trivial_representation(&self) -> Result<Rc<IrreducibleRepresentation>, GroupError> {
        self.irrep(&self.trivial_irrep_id())
    }

    /// The direct sum of the irreps `ids`, each repeated
    /// `size / sum_of_squares_constituents` times.
    fn spectral_regular_representation(
        &self,
        ids: &[IrrepId],
    ) -> Result<Rc<Representation>, GroupError> {
        let name = format!(
            "spectral_regular_[{}]",
            ids.iter().map(|id| id.to_string()).join(";")
        );
        spectral_directsum(self.as_dyn(), ids, &name)
    }

    /// The regular representation of a finite group, in which every element acts by
    /// permuting the basis vectors indexed by the group elements.
    ///
    /// # Errors
    ///
    /// Errors for continuous groups.
    fn regular_representation(&self) -> Result<Rc<Representation>, GroupError> {
        self.registry()
            .representation_or_try_insert_with("regular", || {
                log::debug!("Building the regular representation of {}...", self.name());
                let elements = self.elements().ok_or_else(|| {
                    GroupError::Unsupported(format!(
                        "{} has no finite regular representation",
                        self.name()
                    ))
                })?;
                let order = elements.len();
                let mut blocks = vec![];
                let mut columns = vec![];
                for id in self.irrep_ids().unwrap_or_default() {
                    let irrep = self.irrep(&id)?;
                    let size = irrep.size();
                    let copies = size / irrep.sum_of_squares_constituents();
                    let scale = (size as f64 / order as f64).sqrt();
                    let mats = elements
                        .iter()
                        .map(|g| irrep.evaluate(g))
                        .collect::<Result<Vec<_>, _>>()?;
                    for copy in 0..copies {
                        blocks.push(irrep.representation().clone());
                        for i in 0..size {
                            columns.push(
                                mats.iter().map(|mat| scale * mat[[i, copy]]).collect_vec(),
                            );
                        }
                    }
                }
                let mut change_of_basis = Array2::<f64>::zeros((order, columns.len()));
                for (c, column) in columns.iter().enumerate() {
                    for (r, entry) in column.iter().enumerate() {
                        change_of_basis[[r, c]] = *entry;
                    }
                }
                let regular = directsum(&blocks, Some(change_of_basis), "regular")?;
                log::debug!("Building the regular representation of {}... Done.", self.name());
                Ok(regular)
            })
    }

    /// Constructs the subgroup identified by `id` together with its inclusion and restriction
    /// maps.
    fn subgroup<'a>(
        &'a self,
        factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<SubgroupMap<'a>, GroupError> {
        let id = self.process_subgroup_id(id)?;
        log::debug!("Constructing subgroup {id} of {}...", self.name());
        let (subgroup, embedding) = self.build_subgroup(factory, &id)?;
        log::debug!(
            "Constructing subgroup {id} of {}... Done: {}.",
            self.name(),
            subgroup.name()
        );
        Ok(SubgroupMap::new(self.as_dyn(), subgroup, id, embedding))
    }

    /// Restricts the irrep `irrep` to the subgroup identified by `id`. See
    /// [`Self::restrict_irrep_canonical`].
    fn restrict_irrep(
        &self,
        factory: &GroupFactory,
        irrep: &IrrepId,
        id: &SubgroupId,
    ) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError> {
        let id = self.process_subgroup_id(id)?;
        self.irrep(irrep)?;
        self.restrict_irrep_canonical(factory, irrep, &id)
    }

    /// A left transversal of the subgroup identified by the canonical identifier `id`.
    ///
    /// # Errors
    ///
    /// Errors with [`GroupError::UnsupportedInduction`] if the subgroup has infinite index.
    fn coset_representatives(
        &self,
        factory: &GroupFactory,
        id: &SubgroupId,
    ) -> Result<Vec<ElementValue>, GroupError> {
        let values = self.element_values().ok_or_else(|| {
            GroupError::UnsupportedInduction(format!(
                "no finite transversal of {id} in {} is known",
                self.name()
            ))
        })?;
        let (_, embedding) = self.build_subgroup(factory, id)?;
        let mut representatives: Vec<ElementValue> = vec![];
        for value in values {
            let mut covered = false;
            for representative in representatives.iter() {
                let rel = self.combine_values(&self.inverse_value(representative)?, &value)?;
                if embedding.restrict_value(&rel)?.is_some() {
                    covered = true;
                    break;
                }
            }
            if !covered {
                representatives.push(value);
            }
        }
        Ok(representatives)
    }

    /// The representation of this group induced from the irrep `irrep` of the subgroup
    /// identified by `id`.
    ///
    /// The block $`(i, j)`$ at $`g`$ is $`\sigma(r_i^{-1} g r_j)`$ if $`r_i^{-1} g r_j`$ lies in
    /// the subgroup, and zero otherwise, where $`r_i`$ are the coset representatives.
    fn induced_representation(
        &self,
        factory: &GroupFactory,
        id: &SubgroupId,
        irrep: &IrrepId,
    ) -> Result<Representation, GroupError> {
        let id = self.process_subgroup_id(id)?;
        log::debug!(
            "Inducing {} from irrep {irrep} of subgroup {id}...",
            self.name()
        );
        let representatives = self.coset_representatives(factory, &id)?;
        let inverse_representatives = representatives
            .iter()
            .map(|r| self.inverse_value(r))
            .collect::<Result<Vec<_>, _>>()?;
        let (subgroup, embedding) = self.build_subgroup(factory, &id)?;
        let sub_irrep = subgroup.irrep(irrep)?;
        let block = sub_irrep.size();
        let size = block * representatives.len();
        let name = format!("induced[{id}]_[{irrep}]");

        let induced = Representation::builder()
            .name(name)
            .group_name(self.name())
            .size(size)
            .matrix(move |g: &GroupElement<'_>| {
                let parent = g.group();
                let mut mat = Array2::<f64>::zeros((size, size));
                for (i, r_inv) in inverse_representatives.iter().enumerate() {
                    let left = parent.combine_values(r_inv, g.value())?;
                    for (j, r) in representatives.iter().enumerate() {
                        let rel = parent.combine_values(&left, r)?;
                        if let Some(h) = embedding.restrict_value(&rel)? {
                            let h = GroupElement::from_canonical(subgroup.as_ref(), h);
                            mat.slice_mut(s![i * block..(i + 1) * block, j * block..(j + 1) * block])
                                .assign(&sub_irrep.evaluate(&h)?);
                        }
                    }
                }
                Ok(mat)
            })
            .build()
            .map_err(|err| GroupError::InvalidArgument(err.to_string()))?;
        log::debug!(
            "Inducing {} from irrep {irrep} of subgroup {id}... Done.",
            self.name()
        );
        Ok(induced)
    }

    /// The inner product $`\frac{1}{|G|} \sum_{g} \chi_a(g) \chi_b(g)`$ of the characters of two
    /// representations of a finite group.
    fn character_inner_product(
        &self,
        lhs: &Representation,
        rhs: &Representation,
    ) -> Result<f64, GroupError> {
        let elements = self.elements().ok_or_else(|| {
            GroupError::Unsupported(format!(
                "character sums over the continuous group {} are not available",
                self.name()
            ))
        })?;
        let order = elements.len() as f64;
        elements
            .iter()
            .map(|g| Ok(lhs.character(g)? * rhs.character(g)?))
            .sum::<Result<f64, GroupError>>()
            .map(|total| total / order)
    }
}

/// Builds (or retrieves from the cache of `group`) the direct sum of the irreps `ids`, each
/// repeated `size / sum_of_squares_constituents` times.
pub(crate) fn spectral_directsum(
    group: &dyn Group,
    ids: &[IrrepId],
    name: &str,
) -> Result<Rc<Representation>, GroupError> {
    group.registry().representation_or_try_insert_with(name, || {
        let mut blocks = vec![];
        for id in ids {
            let irrep = group.irrep(id)?;
            let copies = irrep.size() / irrep.sum_of_squares_constituents();
            blocks.extend((0..copies).map(|_| irrep.representation().clone()));
        }
        directsum(&blocks, None, name)
    })
}

/// Builds the evenly spaced rotation angles $`2\pi i / n`$ for $`i = 0, \ldots, n - 1`$.
pub(crate) fn regular_angles(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 * TAU / n as f64).collect_vec()
}

/// Folds the rotational frequency `frequency` onto the irreps of $`C_M`$.
///
/// # Returns
///
/// The change of basis and the irreps of $`C_M`$ restricting an irrep of size `size` whose
/// rotations $`r_\theta`$ act by $`\psi(\theta, k)`$ (or by $`\cos k\theta`$ when one-dimensional).
pub(crate) fn restrict_to_cyclic(
    factory: &GroupFactory,
    size: usize,
    frequency: usize,
    m: usize,
) -> Result<(Array2<f64>, Vec<IrrepId>), GroupError> {
    let subgroup = factory.cyclic_group(m)?;
    let mut folded = frequency % m;
    let mut change_of_basis = Array2::eye(size);
    if 2 * folded > m {
        folded = m - folded;
        if size == 2 {
            change_of_basis = chi(1);
        }
    }
    let sub_irrep = subgroup.irrep(&IrrepId::Rot(folded))?;
    let irreps = std::iter::repeat(IrrepId::Rot(folded))
        .take(size / sub_irrep.size())
        .collect_vec();
    Ok((change_of_basis, irreps))
}

/// Checks whether two group references point to the same group instance.
pub(crate) fn same_group(lhs: &dyn Group, rhs: &dyn Group) -> bool {
    std::ptr::eq(
        lhs as *const dyn Group as *const (),
        rhs as *const dyn Group as *const (),
    )
}

// ==================
// Struct definitions
// ==================

/// An immutable element of a [`Group`].
///
/// The element borrows its group, which therefore outlives it, and stores its value in the
/// canonical parametrization of the group.
#[derive(Clone)]
pub struct GroupElement<'g> {
    group: &'g dyn Group,
    value: ElementValue,
}

impl<'g> GroupElement<'g> {
    /// Wraps a value which is already canonical and a member of `group`.
    pub(crate) fn from_canonical(group: &'g dyn Group, value: ElementValue) -> Self {
        Self { group, value }
    }

    pub fn group(&self) -> &'g dyn Group {
        self.group
    }

    /// The value of this element in the canonical parametrization of its group.
    pub fn value(&self) -> &ElementValue {
        &self.value
    }

    /// Expresses this element in the parametrization `param`.
    pub fn to(&self, param: Parametrization) -> Result<ElementValue, GroupError> {
        self.group.check_parametrization(param)?;
        self.group.from_canonical(&self.value, param)
    }

    /// Combines this element with `other`, this element acting last.
    ///
    /// # Errors
    ///
    /// Errors if the two elements belong to different group instances.
    pub fn try_combine(&self, other: &GroupElement<'_>) -> Result<GroupElement<'g>, GroupError> {
        if !same_group(self.group, other.group) {
            return Err(GroupError::GroupMismatch(format!(
                "cannot combine an element of {} with an element of {}",
                self.group.name(),
                other.group.name()
            )));
        }
        Ok(Self::from_canonical(
            self.group,
            self.group.combine_values(&self.value, &other.value)?,
        ))
    }

    pub fn try_inverse(&self) -> Result<GroupElement<'g>, GroupError> {
        Ok(Self::from_canonical(
            self.group,
            self.group.inverse_value(&self.value)?,
        ))
    }

    /// Raises this element to the integer power `n` by repeated squaring.
    pub fn try_pow(&self, n: i64) -> Result<GroupElement<'g>, GroupError> {
        let base = if n < 0 {
            self.try_inverse()?
        } else {
            self.clone()
        };
        let mut exponent = n.unsigned_abs();
        let mut square = base;
        let mut result = self.group.identity();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.try_combine(&square)?;
            }
            square = square.try_combine(&square)?;
            exponent >>= 1;
        }
        Ok(result)
    }

    pub fn is_identity(&self) -> bool {
        self.group
            .equal_values(&self.value, &self.group.identity_value())
    }
}

impl<'g> fmt::Debug for GroupElement<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GroupElement({}, {})",
            self.group.name(),
            self.group.repr_value(&self.value)
        )
    }
}

impl<'g> fmt::Display for GroupElement<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.group.repr_value(&self.value))
    }
}

impl<'g, 'h> PartialEq<GroupElement<'h>> for GroupElement<'g> {
    fn eq(&self, other: &GroupElement<'h>) -> bool {
        same_group(self.group, other.group) && self.group.equal_values(&self.value, &other.value)
    }
}

impl<'g> Eq for GroupElement<'g> {}

impl<'g> Hash for GroupElement<'g> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.name().hash(state);
        self.group.hash_key(&self.value).hash(state);
    }
}

fn combine_or_panic<'g>(lhs: &GroupElement<'g>, rhs: &GroupElement<'_>) -> GroupElement<'g> {
    lhs.try_combine(rhs).unwrap_or_else(|err| {
        log::error!("{err}");
        panic!("Unable to combine `{lhs}` with `{rhs}`.")
    })
}

// ---
// Mul
// ---
impl<'g> Mul<&'_ GroupElement<'g>> for &GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn mul(self, rhs: &GroupElement<'g>) -> Self::Output {
        combine_or_panic(self, rhs)
    }
}

impl<'g> Mul<&'_ GroupElement<'g>> for GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn mul(self, rhs: &GroupElement<'g>) -> Self::Output {
        &self * rhs
    }
}

impl<'g> Mul<GroupElement<'g>> for GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn mul(self, rhs: GroupElement<'g>) -> Self::Output {
        &self * &rhs
    }
}

impl<'g> Mul<GroupElement<'g>> for &GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn mul(self, rhs: GroupElement<'g>) -> Self::Output {
        self * &rhs
    }
}

// ---
// Inv
// ---
impl<'g> Inv for &GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn inv(self) -> Self::Output {
        self.try_inverse().unwrap_or_else(|err| {
            log::error!("{err}");
            panic!("Unable to invert `{self}`.")
        })
    }
}

impl<'g> Inv for GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn inv(self) -> Self::Output {
        (&self).inv()
    }
}

// ---
// Pow
// ---
impl<'g> Pow<i32> for &GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn pow(self, rhs: i32) -> Self::Output {
        self.try_pow(i64::from(rhs)).unwrap_or_else(|err| {
            log::error!("{err}");
            panic!("Unable to raise `{self}` to the power {rhs}.")
        })
    }
}

impl<'g> Pow<i32> for GroupElement<'g> {
    type Output = GroupElement<'g>;

    fn pow(self, rhs: i32) -> Self::Output {
        (&self).pow(rhs)
    }
}
