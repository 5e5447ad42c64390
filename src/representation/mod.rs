//! Matrix representations of planar groups.

use std::fmt;
use std::rc::Rc;

use derive_builder::Builder;
use itertools::Itertools;
use log;
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::group::factory::GroupFactory;
use crate::group::group_error::GroupError;
use crate::group::subgroup::SubgroupMap;
use crate::group::GroupElement;

pub mod clebsch_gordan;
pub mod registry;


/// The matrix-valued function of a representation.
pub type MatrixFn = Rc<dyn Fn(&GroupElement<'_>) -> Result<Array2<f64>, GroupError>>;

/// The scalar-valued character function of a representation.
pub type CharacterFn = Rc<dyn Fn(&GroupElement<'_>) -> Result<f64, GroupError>>;

// ================
// Enum definitions
// ================

/// An enumerated type for irrep identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IrrepId {
    /// Variant for irreps labelled by a rotational frequency alone ($`C_N`$, $`SO(2)`$).
    Rot(usize),

    /// Variant for irreps labelled by a reflection frequency and a rotational frequency
    /// ($`D_N`$, $`O(2)`$).
    FlipRot(u8, usize),
}

impl IrrepId {
    /// The rotational frequency of the irrep.
    pub fn frequency(&self) -> usize {
        match self {
            Self::Rot(k) | Self::FlipRot(_, k) => *k,
        }
    }

    /// The reflection frequency of the irrep, if it has one.
    pub fn flip_frequency(&self) -> Option<u8> {
        match self {
            Self::Rot(_) => None,
            Self::FlipRot(j, _) => Some(*j),
        }
    }

    /// The conventional name of the irrep, *e.g.* `irrep_2` or `irrep_1,3`.
    pub fn name(&self) -> String {
        format!("irrep_{self}")
    }
}

impl fmt::Display for IrrepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rot(k) => write!(f, "{k}"),
            Self::FlipRot(j, k) => write!(f, "{j},{k}"),
        }
    }
}

/// An enumerated type for the type of a real irrep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Variant for irreps which stay irreducible over the complex numbers.
    Real,

    /// Variant for real irreps which split into two conjugate complex irreps.
    Complex,
}

impl Field {
    /// The number of squared endomorphism basis elements: 1 for [`Field::Real`] and 2 for
    /// [`Field::Complex`].
    pub fn sum_of_squares_constituents(&self) -> usize {
        match self {
            Self::Real => 1,
            Self::Complex => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => write!(f, "R"),
            Self::Complex => write!(f, "C"),
        }
    }
}

// ==================
// Struct definitions
// ==================

/// The decomposition of a representation into irreps: $`\rho(g) = Q \left(\bigoplus_i
/// \sigma_i(g)\right) Q^{\mathsf{T}}`$.
#[derive(Clone, Debug)]
pub struct Decomposition {
    /// The irreps $`\sigma_i`$, in block order.
    pub irreps: Vec<IrrepId>,

    /// The orthogonal change of basis $`Q`$.
    pub change_of_basis: Array2<f64>,
}

/// A structure to manage real matrix representations of a group.
#[derive(Builder, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Representation {
    /// A name for the representation.
    #[builder(setter(into))]
    name: String,

    /// The name of the group being represented.
    #[builder(setter(into))]
    group_name: String,

    /// The dimension of the representation space.
    size: usize,

    /// The matrix of each group element.
    #[builder(setter(custom))]
    matrix: MatrixFn,

    /// The character of each group element. If unset, the trace of [`Self::matrix`] is used.
    #[builder(setter(custom), default = "None")]
    character: Option<CharacterFn>,

    /// The irrep decomposition, if known.
    #[builder(default = "None")]
    decomposition: Option<Decomposition>,
}

impl RepresentationBuilder {
    pub fn matrix(
        &mut self,
        matrix: impl Fn(&GroupElement<'_>) -> Result<Array2<f64>, GroupError> + 'static,
    ) -> &mut Self {
        self.matrix = Some(Rc::new(matrix));
        self
    }

    pub fn character(
        &mut self,
        character: impl Fn(&GroupElement<'_>) -> Result<f64, GroupError> + 'static,
    ) -> &mut Self {
        self.character = Some(Some(Rc::new(character)));
        self
    }

    fn validate(&self) -> Result<(), String> {
        let size = self.size.ok_or("No size found.".to_string())?;
        if size == 0 {
            return Err("A representation must have a positive size.".to_string());
        }
        if let Some(Some(decomposition)) = self.decomposition.as_ref() {
            if decomposition.change_of_basis.shape() != [size, size] {
                return Err(format!(
                    "The change of basis of shape {:?} does not match the size {size}.",
                    decomposition.change_of_basis.shape()
                ));
            }
        }
        Ok(())
    }
}

impl Representation {
    /// Returns a builder to construct a new representation.
    #[must_use]
    pub fn builder() -> RepresentationBuilder {
        RepresentationBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn decomposition(&self) -> Option<&Decomposition> {
        self.decomposition.as_ref()
    }

    fn check_group(&self, element: &GroupElement<'_>) -> Result<(), GroupError> {
        let group_name = element.group().name();
        if group_name == self.group_name {
            Ok(())
        } else {
            Err(GroupError::GroupMismatch(format!(
                "representation `{}` of {} cannot act on an element of {group_name}",
                self.name, self.group_name
            )))
        }
    }

    /// Evaluates the matrix of `element`.
    ///
    /// # Errors
    ///
    /// Errors if `element` belongs to a different group.
    pub fn evaluate(&self, element: &GroupElement<'_>) -> Result<Array2<f64>, GroupError> {
        self.check_group(element)?;
        (self.matrix)(element)
    }

    /// Evaluates the character of `element`.
    pub fn character(&self, element: &GroupElement<'_>) -> Result<f64, GroupError> {
        self.check_group(element)?;
        match self.character.as_ref() {
            Some(character) => character(element),
            None => Ok((self.matrix)(element)?.diag().sum()),
        }
    }

    /// Restricts this representation to a subgroup.
    ///
    /// The restriction of every irrep in the decomposition is looked up with
    /// [`Group::restrict_irrep`](crate::group::Group::restrict_irrep), and the results are
    /// assembled into a single direct sum over the subgroup.
    ///
    /// # Errors
    ///
    /// Errors with [`GroupError::Unsupported`] if the irrep decomposition of this representation
    /// is unknown.
    pub fn restrict(
        &self,
        factory: &GroupFactory,
        map: &SubgroupMap<'_>,
    ) -> Result<Representation, GroupError> {
        if map.parent().name() != self.group_name {
            return Err(GroupError::GroupMismatch(format!(
                "representation `{}` of {} cannot be restricted to a subgroup of {}",
                self.name,
                self.group_name,
                map.parent().name()
            )));
        }
        let decomposition = self.decomposition.as_ref().ok_or_else(|| {
            GroupError::Unsupported(format!(
                "representation `{}` has no irrep decomposition to restrict",
                self.name
            ))
        })?;
        log::debug!("Restricting `{}` to subgroup {}...", self.name, map.id());
        let mut sub_irreps = vec![];
        let mut local_bases = vec![];
        for irrep in decomposition.irreps.iter() {
            let (basis, ids) = map.parent().restrict_irrep(factory, irrep, map.id())?;
            for id in ids {
                sub_irreps.push(map.subgroup().irrep(&id)?.representation().clone());
            }
            local_bases.push(basis);
        }
        let change_of_basis = decomposition.change_of_basis.dot(&block_diag(&local_bases));
        let restricted = directsum(
            &sub_irreps,
            Some(change_of_basis),
            &format!("restrict[{}]_{}", map.id(), self.name),
        )?;
        log::debug!("Restricting `{}` to subgroup {}... Done.", self.name, map.id());
        Ok(restricted)
    }

    /// The tensor product of this representation with `other`, acting by Kronecker products.
    pub fn tensor(&self, other: &Representation) -> Result<Representation, GroupError> {
        if self.group_name != other.group_name {
            return Err(GroupError::GroupMismatch(format!(
                "cannot tensor a representation of {} with a representation of {}",
                self.group_name, other.group_name
            )));
        }
        let (lhs, rhs) = (self.clone(), other.clone());
        let (lhs_chi, rhs_chi) = (self.clone(), other.clone());
        Representation::builder()
            .name(format!("{}⊗{}", self.name, other.name))
            .group_name(self.group_name.clone())
            .size(self.size * other.size)
            .matrix(move |g| Ok(kron(&lhs.evaluate(g)?, &rhs.evaluate(g)?)))
            .character(move |g| Ok(lhs_chi.character(g)? * rhs_chi.character(g)?))
            .build()
            .map_err(|err| GroupError::InvalidArgument(err.to_string()))
    }
}

impl fmt::Debug for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Representation")
            .field("name", &self.name)
            .field("group_name", &self.group_name)
            .field("size", &self.size)
            .field("decomposition", &self.decomposition)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|[{}]:{}", self.group_name, self.name, self.size)
    }
}

/// A structure to manage irreducible representations.
#[derive(Builder, Clone, Debug)]
pub struct IrreducibleRepresentation {
    /// The identifier of the irrep, unique within its group.
    id: IrrepId,

    /// The underlying matrix representation.
    representation: Representation,

    field: Field,

    /// The rotational frequency.
    frequency: usize,

    /// The reflection frequency, for groups containing reflections.
    #[builder(default = "None")]
    flip_frequency: Option<u8>,
}

impl IrreducibleRepresentation {
    /// Returns a builder to construct a new irrep.
    #[must_use]
    pub fn builder() -> IrreducibleRepresentationBuilder {
        IrreducibleRepresentationBuilder::default()
    }

    /// Constructs the irrep `id` of the group called `group_name` from its matrix and character
    /// functions.
    pub(crate) fn from_functions(
        id: IrrepId,
        group_name: &str,
        size: usize,
        field: Field,
        matrix: impl Fn(&GroupElement<'_>) -> Result<Array2<f64>, GroupError> + 'static,
        character: impl Fn(&GroupElement<'_>) -> Result<f64, GroupError> + 'static,
    ) -> Result<Self, GroupError> {
        let representation = Representation::builder()
            .name(id.name())
            .group_name(group_name)
            .size(size)
            .matrix(matrix)
            .character(character)
            .decomposition(Some(Decomposition {
                irreps: vec![id],
                change_of_basis: Array2::eye(size),
            }))
            .build()
            .map_err(|err| GroupError::InvalidIrrepId(err.to_string()))?;
        Self::builder()
            .id(id)
            .representation(representation)
            .field(field)
            .frequency(id.frequency())
            .flip_frequency(id.flip_frequency())
            .build()
            .map_err(|err| GroupError::InvalidIrrepId(err.to_string()))
    }

    pub fn id(&self) -> &IrrepId {
        &self.id
    }

    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn frequency(&self) -> usize {
        self.frequency
    }

    pub fn flip_frequency(&self) -> Option<u8> {
        self.flip_frequency
    }

    pub fn sum_of_squares_constituents(&self) -> usize {
        self.field.sum_of_squares_constituents()
    }

    pub fn name(&self) -> &str {
        self.representation.name()
    }

    pub fn size(&self) -> usize {
        self.representation.size()
    }

    pub fn evaluate(&self, element: &GroupElement<'_>) -> Result<Array2<f64>, GroupError> {
        self.representation.evaluate(element)
    }

    pub fn character(&self, element: &GroupElement<'_>) -> Result<f64, GroupError> {
        self.representation.character(element)
    }
}

impl fmt::Display for IrreducibleRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.representation, self.field)
    }
}

// =========
// Functions
// =========

/// The block-diagonal matrix with the square `blocks` along its diagonal.
pub fn block_diag(blocks: &[Array2<f64>]) -> Array2<f64> {
    let size = blocks.iter().map(|block| block.nrows()).sum::<usize>();
    let mut mat = Array2::<f64>::zeros((size, size));
    let mut offset = 0;
    for block in blocks {
        let n = block.nrows();
        mat.slice_mut(s![offset..offset + n, offset..offset + n])
            .assign(block);
        offset += n;
    }
    mat
}

/// The Kronecker product of two matrices.
pub fn kron(lhs: &Array2<f64>, rhs: &Array2<f64>) -> Array2<f64> {
    let (lr, lc) = lhs.dim();
    let (rr, rc) = rhs.dim();
    let mut mat = Array2::<f64>::zeros((lr * rr, lc * rc));
    for ((i, j), &x) in lhs.indexed_iter() {
        mat.slice_mut(s![i * rr..(i + 1) * rr, j * rc..(j + 1) * rc])
            .assign(&(rhs * x));
    }
    mat
}

/// Checks whether `mat` is a square orthogonal matrix within `thresh`.
pub fn is_orthogonal(mat: &Array2<f64>, thresh: f64) -> bool {
    mat.is_square()
        && approx::abs_diff_eq!(
            mat.t().dot(mat),
            Array2::<f64>::eye(mat.nrows()),
            epsilon = thresh
        )
}

/// Forms the direct sum of `reps`, optionally conjugated by the orthogonal matrix
/// `change_of_basis`: $`g \mapsto Q \left(\bigoplus_i \rho_i(g)\right) Q^{\mathsf{T}}`$.
///
/// The irrep decomposition of the result is known whenever those of all `reps` are.
///
/// # Errors
///
/// Errors if `reps` is empty, mixes groups, or if `change_of_basis` is not orthogonal with the
/// dimension of the direct sum.
pub fn directsum(
    reps: &[Representation],
    change_of_basis: Option<Array2<f64>>,
    name: &str,
) -> Result<Representation, GroupError> {
    let first = reps.first().ok_or_else(|| {
        GroupError::InvalidArgument("cannot form the direct sum of no representations".to_string())
    })?;
    let group_name = first.group_name.clone();
    if let Some(rep) = reps.iter().find(|rep| rep.group_name != group_name) {
        return Err(GroupError::GroupMismatch(format!(
            "cannot sum representations of {group_name} and {}",
            rep.group_name
        )));
    }
    let size = reps.iter().map(|rep| rep.size).sum::<usize>();
    if let Some(basis) = change_of_basis.as_ref() {
        if basis.shape() != [size, size] || !is_orthogonal(basis, 1e-8) {
            return Err(GroupError::InvalidArgument(format!(
                "the change of basis for `{name}` must be an orthogonal {size}×{size} matrix"
            )));
        }
    }

    let decomposition = reps
        .iter()
        .map(|rep| rep.decomposition.clone())
        .collect::<Option<Vec<_>>>()
        .map(|parts| {
            let irreps = parts
                .iter()
                .flat_map(|part| part.irreps.iter().cloned())
                .collect_vec();
            let local = block_diag(
                &parts
                    .iter()
                    .map(|part| part.change_of_basis.clone())
                    .collect_vec(),
            );
            let change_of_basis = match change_of_basis.as_ref() {
                Some(basis) => basis.dot(&local),
                None => local,
            };
            Decomposition {
                irreps,
                change_of_basis,
            }
        });

    let blocks = reps.to_vec();
    let character_blocks = reps.to_vec();
    Representation::builder()
        .name(name)
        .group_name(group_name)
        .size(size)
        .matrix(move |g| {
            let mats = blocks
                .iter()
                .map(|rep| rep.evaluate(g))
                .collect::<Result<Vec<_>, _>>()?;
            let mat = block_diag(&mats);
            Ok(match change_of_basis.as_ref() {
                Some(basis) => basis.dot(&mat).dot(&basis.t()),
                None => mat,
            })
        })
        .character(move |g| {
            character_blocks
                .iter()
                .map(|rep| rep.character(g))
                .sum::<Result<f64, GroupError>>()
        })
        .decomposition(decomposition)
        .build()
        .map_err(|err| GroupError::InvalidArgument(err.to_string()))
}
