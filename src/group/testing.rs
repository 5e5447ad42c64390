//! Assertions shared by the tests of the group families.

use approx::assert_abs_diff_eq;
use itertools::Itertools;

use crate::group::factory::GroupFactory;
use crate::group::subgroup::SubgroupId;
use crate::group::{Group, GroupElement};
use crate::representation::clebsch_gordan::ClebschGordanSolver;
use crate::representation::{block_diag, kron, IrrepId};

/// Asserts that restricting `irrep` to the subgroup `id` reproduces the irrep on the image of
/// every testing element of the subgroup.
pub(crate) fn assert_restriction_consistent(
    factory: &GroupFactory,
    group: &dyn Group,
    irrep: &IrrepId,
    id: &SubgroupId,
) {
    let map = group.subgroup(factory, id).unwrap();
    let (change_of_basis, ids) = group.restrict_irrep(factory, irrep, id).unwrap();
    let parent_irrep = group.irrep(irrep).unwrap();
    for s in map.subgroup().testing_elements() {
        let g = map.include(&s).unwrap();
        let blocks = ids
            .iter()
            .map(|id| map.subgroup().irrep(id).unwrap().evaluate(&s).unwrap())
            .collect_vec();
        let restricted = change_of_basis
            .dot(&block_diag(&blocks))
            .dot(&change_of_basis.t());
        assert_abs_diff_eq!(parent_irrep.evaluate(&g).unwrap(), restricted, epsilon = 1e-9);
    }
}

/// Asserts that the Clebsch-Gordan decomposition of `lhs ⊗ rhs` block-diagonalises the
/// Kronecker product of the two irreps at each of `elements`.
pub(crate) fn assert_tensor_product_consistent(
    group: &dyn Group,
    lhs: &IrrepId,
    rhs: &IrrepId,
    elements: &[GroupElement<'_>],
) {
    let solver = ClebschGordanSolver::new(group);
    let decomposition = solver.decompose(lhs, rhs).unwrap();
    let (rho_m, rho_n) = (group.irrep(lhs).unwrap(), group.irrep(rhs).unwrap());
    let q = decomposition.change_of_basis();
    assert_eq!(q.nrows(), rho_m.size() * rho_n.size());
    let product = solver.tensor_product(lhs, rhs).unwrap();
    for g in elements {
        let expected = kron(&rho_m.evaluate(g).unwrap(), &rho_n.evaluate(g).unwrap());
        let blocks = decomposition
            .expanded_irreps()
            .iter()
            .map(|id| group.irrep(id).unwrap().evaluate(g).unwrap())
            .collect_vec();
        assert_abs_diff_eq!(expected.dot(q), q.dot(&block_diag(&blocks)), epsilon = 1e-9);
        assert_abs_diff_eq!(product.evaluate(g).unwrap(), expected, epsilon = 1e-9);
    }
}
