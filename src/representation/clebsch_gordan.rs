//! Clebsch-Gordan decompositions of tensor products of irreps.

use std::rc::Rc;

use itertools::Itertools;
use log;
use ndarray::{array, concatenate, Array2, Array4, Axis};

use crate::group::group_error::GroupError;
use crate::group::Group;
use crate::representation::{directsum, is_orthogonal, IrrepId, Representation};

#[cfg(test)]
#[path = "clebsch_gordan_tests.rs"]
mod clebsch_gordan_tests;

/// The decomposition $`\rho_m \otimes \rho_n \cong \bigoplus_j \mu_j \rho_j`$ of the tensor
/// product of two irreps.
#[derive(Clone, Debug)]
pub struct ClebschGordanDecomposition {
    lhs: IrrepId,

    rhs: IrrepId,

    /// The irreps $`\rho_j`$ with their multiplicities $`\mu_j`$.
    irreps: Vec<(IrrepId, usize)>,

    /// The coefficient tensors of each $`\rho_j`$, each of shape
    /// `(size(lhs), size(rhs), multiplicity, size(target))`.
    coefficients: Vec<Array4<f64>>,

    /// The orthogonal matrix $`Q`$ with
    /// $`(\rho_m(g) \otimes \rho_n(g)) Q = Q \bigoplus_j \mu_j \rho_j(g)`$, whose rows are
    /// indexed by $`a \cdot \dim \rho_n + b`$.
    change_of_basis: Array2<f64>,
}

impl ClebschGordanDecomposition {
    pub fn lhs(&self) -> &IrrepId {
        &self.lhs
    }

    pub fn rhs(&self) -> &IrrepId {
        &self.rhs
    }

    pub fn irreps(&self) -> &[(IrrepId, usize)] {
        &self.irreps
    }

    pub fn coefficients(&self) -> &[Array4<f64>] {
        &self.coefficients
    }

    pub fn change_of_basis(&self) -> &Array2<f64> {
        &self.change_of_basis
    }

    /// The irreps of the decomposition, each repeated by its multiplicity.
    pub fn expanded_irreps(&self) -> Vec<IrrepId> {
        self.irreps
            .iter()
            .flat_map(|(id, mult)| std::iter::repeat(*id).take(*mult))
            .collect_vec()
    }
}

/// A structure to compute, check and cache Clebsch-Gordan decompositions of a group.
pub struct ClebschGordanSolver<'g> {
    group: &'g dyn Group,
}

impl<'g> ClebschGordanSolver<'g> {
    pub fn new(group: &'g dyn Group) -> Self {
        Self { group }
    }

    /// The Clebsch-Gordan coefficients of `target` in `lhs ⊗ rhs`.
    ///
    /// # Errors
    ///
    /// Errors if any irrep identifier is invalid, or if the group does not support
    /// Clebsch-Gordan coefficients.
    pub fn coefficients(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
        target: &IrrepId,
    ) -> Result<Array4<f64>, GroupError> {
        let dims = (
            self.group.irrep(lhs)?.size(),
            self.group.irrep(rhs)?.size(),
            self.group.irrep(target)?.size(),
        );
        let coeff = self.group.clebsch_gordan_coeff(lhs, rhs, target)?;
        let (dm, dn, _, dj) = coeff.dim();
        if (dm, dn, dj) != dims {
            return Err(GroupError::Unsupported(format!(
                "Clebsch-Gordan coefficients of shape {:?} found for irreps of sizes {dims:?}",
                coeff.shape()
            )));
        }
        Ok(coeff)
    }

    /// Decomposes `lhs ⊗ rhs` into irreps, caching the result in the registry of the group.
    ///
    /// # Errors
    ///
    /// Errors if the coefficients do not assemble into an orthogonal change of basis of the
    /// full tensor product space.
    pub fn decompose(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
    ) -> Result<Rc<ClebschGordanDecomposition>, GroupError> {
        self.group
            .registry()
            .clebsch_gordan_or_try_insert_with(lhs, rhs, || {
                log::debug!(
                    "Decomposing irrep {lhs} ⊗ irrep {rhs} of {}...",
                    self.group.name()
                );
                let dim = self.group.irrep(lhs)?.size() * self.group.irrep(rhs)?.size();
                let irreps = self.group.tensor_product_irreps(lhs, rhs)?;
                let mut coefficients = vec![];
                let mut blocks = vec![];
                for (target, mult) in irreps.iter() {
                    let coeff = self.coefficients(lhs, rhs, target)?;
                    let (dm, dn, found_mult, dj) = coeff.dim();
                    if found_mult != *mult {
                        return Err(GroupError::Unsupported(format!(
                            "irrep {target} appears {found_mult} times in the coefficients of \
                            {lhs} ⊗ {rhs}, but {mult} times in its decomposition"
                        )));
                    }
                    let block = coeff
                        .as_standard_layout()
                        .into_owned()
                        .into_shape((dm * dn, mult * dj))
                        .map_err(|err| GroupError::Unsupported(err.to_string()))?;
                    blocks.push(block);
                    coefficients.push(coeff);
                }
                let change_of_basis = concatenate(
                    Axis(1),
                    &blocks.iter().map(|block| block.view()).collect_vec(),
                )
                .map_err(|err| GroupError::Unsupported(err.to_string()))?;
                if change_of_basis.shape() != [dim, dim] || !is_orthogonal(&change_of_basis, 1e-8)
                {
                    return Err(GroupError::Unsupported(format!(
                        "the Clebsch-Gordan coefficients of {lhs} ⊗ {rhs} do not form an \
                        orthogonal {dim}×{dim} change of basis"
                    )));
                }
                log::debug!(
                    "Decomposing irrep {lhs} ⊗ irrep {rhs} of {}... Done.",
                    self.group.name()
                );
                Ok(ClebschGordanDecomposition {
                    lhs: *lhs,
                    rhs: *rhs,
                    irreps,
                    coefficients,
                    change_of_basis,
                })
            })
    }

    /// The tensor product `lhs ⊗ rhs` assembled as a direct sum of irreps. It agrees with the
    /// Kronecker product of the two irreps at every element.
    pub fn tensor_product(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
    ) -> Result<Representation, GroupError> {
        let decomposition = self.decompose(lhs, rhs)?;
        let blocks = decomposition
            .expanded_irreps()
            .iter()
            .map(|id| Ok(self.group.irrep(id)?.representation().clone()))
            .collect::<Result<Vec<_>, GroupError>>()?;
        directsum(
            &blocks,
            Some(decomposition.change_of_basis().clone()),
            &format!("irrep_{lhs}⊗irrep_{rhs}"),
        )
    }
}

// =========
// Functions
// =========

/// The orthogonal matrix decomposing the tensor product of two planar rotation blocks
/// $`\psi(\theta, m) \otimes \psi(\theta, n)`$: its first two columns span the difference
/// frequency $`m - n`$ and its last two the sum frequency $`m + n`$.
pub(crate) fn rotation_product_basis() -> Array2<f64> {
    array![
        [1.0, 0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
        [1.0, 0.0, -1.0, 0.0],
    ] / 2.0_f64.sqrt()
}

/// Selects the columns `columns` of `mat`, negating those listed in `negated`.
pub(crate) fn signed_columns(mat: &Array2<f64>, columns: &[usize], negated: &[usize]) -> Array2<f64> {
    let mut selected = mat.select(Axis(1), columns);
    for &c in negated {
        selected.column_mut(c).mapv_inplace(|x| -x);
    }
    selected
}

/// Reshapes a coefficient matrix with rows indexed by $`a \cdot d_n + b`$ and columns indexed by
/// $`c \cdot d_j + d`$ into a coefficient tensor of shape `(dm, dn, multiplicity, dj)`.
pub(crate) fn coefficients_from_matrix(
    mat: Array2<f64>,
    dm: usize,
    dn: usize,
    dj: usize,
) -> Result<Array4<f64>, GroupError> {
    let (rows, cols) = mat.dim();
    if rows != dm * dn || cols % dj != 0 {
        return Err(GroupError::Unsupported(format!(
            "a {rows}×{cols} coefficient matrix does not fit irreps of sizes ({dm}, {dn}, {dj})"
        )));
    }
    mat.as_standard_layout()
        .into_owned()
        .into_shape((dm, dn, cols / dj, dj))
        .map_err(|err| GroupError::Unsupported(err.to_string()))
}
