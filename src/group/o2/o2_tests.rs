use std::f64::consts::{PI, TAU};
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use itertools::{iproduct, Itertools};
use ndarray::array;

use crate::group::factory::GroupFactory;
use crate::group::group_error::GroupError;
use crate::group::subgroup::SubgroupId;
use crate::group::testing::{assert_restriction_consistent, assert_tensor_product_consistent};
use crate::group::{Group, GridKind, GroupOrder};
use crate::parametrization::{encode_rotation_matrix, psi, psichi, ElementValue, Parametrization};
use crate::representation::{block_diag, Field, IrrepId};

fn finite_and_continuous_subgroup_ids() -> Vec<SubgroupId> {
    vec![
        SubgroupId::o2(Some(0.0), GroupOrder::Inf),
        SubgroupId::o2(Some(0.7), GroupOrder::Inf),
        SubgroupId::o2(None, GroupOrder::Inf),
        SubgroupId::o2(None, GroupOrder::Int(1)),
        SubgroupId::o2(None, GroupOrder::Int(3)),
        SubgroupId::o2(None, GroupOrder::Int(4)),
        SubgroupId::o2(Some(0.0), GroupOrder::Int(1)),
        SubgroupId::o2(Some(1.3), GroupOrder::Int(1)),
        SubgroupId::o2(Some(0.4), GroupOrder::Int(2)),
        SubgroupId::o2(Some(0.4), GroupOrder::Int(3)),
        SubgroupId::o2(Some(0.2), GroupOrder::Int(5)),
        SubgroupId::o2(Some(0.0), GroupOrder::Int(6)),
    ]
}

#[test]
fn test_o2_metadata() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(3).unwrap();
    assert_eq!(o2.name(), "O(2)");
    assert_eq!(o2.order(), GroupOrder::Inf);
    assert_eq!(o2.rotation_order(), GroupOrder::Inf);
    assert!(o2.is_continuous());
    assert!(!o2.is_abelian());
    assert!(o2.elements().is_none());
    assert_eq!(
        o2.testing_elements().len(),
        2 * factory.config().testing_elements
    );
    assert!(matches!(o2.generators(), Err(GroupError::Unsupported(_))));
    assert_eq!(
        o2.subgroup_trivial_id(),
        SubgroupId::o2(None, GroupOrder::Int(1))
    );
    assert_eq!(
        o2.subgroup_self_id(),
        SubgroupId::o2(Some(0.0), GroupOrder::Inf)
    );
    assert_eq!(o2.reflection().to_string(), "(-, 0)");
}

#[test]
fn test_o2_group_law() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(2).unwrap();
    let f = o2.reflection();
    assert!((&f * &f).is_identity());
    assert_eq!(f.try_inverse().unwrap(), f);

    let r = o2.element(ElementValue::FlipRadians(0, 0.4)).unwrap();
    let rf = &r * &f;
    assert_eq!(rf, o2.element(ElementValue::FlipRadians(1, 0.4)).unwrap());
    assert_eq!(
        &f * &r,
        o2.element(ElementValue::FlipRadians(1, TAU - 0.4)).unwrap()
    );
    assert_eq!(&f * &r * &f, r.try_inverse().unwrap());
    assert!((&rf * &rf).is_identity());
    assert!(r.try_pow(5).unwrap() == o2.element(ElementValue::FlipRadians(0, 2.0)).unwrap());

    let elements = o2.grid(GridKind::Regular, 6, None).unwrap();
    for (g, h) in elements.iter().cartesian_product(elements.iter()) {
        assert!((g * h * h.try_inverse().unwrap()) == *g);
    }

    let samples = o2.grid(GridKind::Rand, 8, Some(11)).unwrap();
    for (g, h, k) in iproduct!(samples.iter(), samples.iter(), samples.iter()) {
        assert!(o2.is_element((g * h).value()));
        assert_eq!((g * h) * k, g * (h * k));
    }
}

#[test]
fn test_o2_parametrizations() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(2).unwrap();
    let g = o2
        .element(ElementValue::FlipMat(1, encode_rotation_matrix(-PI / 2.0)))
        .unwrap();
    match g.value() {
        ElementValue::FlipRadians(s, theta) => {
            assert_eq!(*s, 1);
            assert_abs_diff_eq!(*theta, 1.5 * PI, epsilon = 1e-12);
        }
        other => panic!("Unexpected value `{other:?}`."),
    }
    match g.to(Parametrization::Mat).unwrap() {
        ElementValue::FlipMat(s, mat) => {
            assert_eq!(s, 1);
            assert_abs_diff_eq!(mat, encode_rotation_matrix(1.5 * PI), epsilon = 1e-12);
        }
        other => panic!("Unexpected value `{other:?}`."),
    }
    assert_eq!(o2.element(g.to(Parametrization::Mat).unwrap()).unwrap(), g);

    assert!(matches!(
        g.to(Parametrization::Int),
        Err(GroupError::InvalidParametrization(_))
    ));
    assert!(matches!(
        o2.element(ElementValue::FlipInt(0, 1)),
        Err(GroupError::InvalidParametrization(_))
    ));
    assert!(matches!(
        o2.element(ElementValue::FlipRadians(2, 0.0)),
        Err(GroupError::NotAMember(_))
    ));
    assert!(matches!(
        o2.element(ElementValue::FlipMat(0, array![[0.0, 1.0], [1.0, 0.0]])),
        Err(GroupError::NotAMember(_))
    ));
    assert!(!o2.is_element(&ElementValue::Radians(0.3)));
    assert!(!o2.is_element(&ElementValue::FlipRadians(0, f64::NAN)));
}

#[test]
fn test_o2_irreps() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(3).unwrap();
    assert_eq!(o2.maximum_frequency(), 3);
    assert_eq!(o2.irreps().len(), 5);
    assert!(o2.irreps().iter().all(|irrep| irrep.field() == Field::Real));

    let f = o2.reflection();
    let g = o2.element(ElementValue::FlipRadians(1, 0.9)).unwrap();
    assert_abs_diff_eq!(
        o2.irrep(&IrrepId::FlipRot(1, 0)).unwrap().evaluate(&f).unwrap(),
        array![[-1.0]]
    );
    assert_abs_diff_eq!(
        o2.irrep(&IrrepId::FlipRot(1, 2)).unwrap().evaluate(&g).unwrap(),
        psichi(0.9, 1, 2),
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        o2.irrep(&IrrepId::FlipRot(1, 2)).unwrap().character(&g).unwrap(),
        0.0
    );
    let standard = o2.standard_representation().unwrap();
    assert_eq!(standard.id(), &IrrepId::FlipRot(1, 1));
    assert_abs_diff_eq!(
        standard.evaluate(&f).unwrap(),
        array![[1.0, 0.0], [0.0, -1.0]],
        epsilon = 1e-12
    );
    for id in [IrrepId::FlipRot(0, 1), IrrepId::FlipRot(2, 1), IrrepId::Rot(1)] {
        assert!(matches!(o2.irrep(&id), Err(GroupError::InvalidIrrepId(_))));
    }

    let elements = o2.grid(GridKind::Regular, 8, None).unwrap();
    for irrep in o2.irreps() {
        for (g, h) in elements.iter().cartesian_product(elements.iter()) {
            assert_abs_diff_eq!(
                irrep.evaluate(&(g * h)).unwrap(),
                irrep.evaluate(g).unwrap().dot(&irrep.evaluate(h).unwrap()),
                epsilon = 1e-9
            );
        }
        for g in elements.iter() {
            assert_abs_diff_eq!(
                irrep.character(g).unwrap(),
                irrep.evaluate(g).unwrap().diag().sum(),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn test_o2_maximum_frequency() {
    let factory = GroupFactory::default();
    let o2_a = factory.o2_group(2).unwrap();
    let o2_b = factory.o2_group(4).unwrap();
    assert!(Rc::ptr_eq(&o2_a, &o2_b));
    assert_eq!(o2_a.maximum_frequency(), 4);
    assert_eq!(
        o2_a.registry().irrep_ids(),
        vec![
            IrrepId::FlipRot(0, 0),
            IrrepId::FlipRot(1, 0),
            IrrepId::FlipRot(1, 1),
            IrrepId::FlipRot(1, 2),
            IrrepId::FlipRot(1, 3),
            IrrepId::FlipRot(1, 4),
        ]
    );
    assert!(Rc::ptr_eq(&o2_a, &factory.default_o2_group().unwrap()));
    assert_eq!(
        o2_a.maximum_frequency(),
        factory.config().default_maximum_frequency.max(4)
    );
}

#[test]
fn test_o2_bl_quotient_representation() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(3).unwrap();

    let rotations = SubgroupId::o2(None, GroupOrder::Inf);
    let quotient = o2.bl_quotient_representation(&factory, 3, &rotations).unwrap();
    assert_eq!(quotient.name(), "quotient[(None, ∞)]_3");
    assert_eq!(quotient.size(), 2);
    assert_eq!(
        quotient.decomposition().unwrap().irreps,
        vec![IrrepId::FlipRot(0, 0), IrrepId::FlipRot(1, 0)]
    );
    assert!(Rc::ptr_eq(
        &quotient,
        &o2.bl_quotient_representation(&factory, 3, &rotations).unwrap()
    ));
    let f = o2.reflection();
    assert_abs_diff_eq!(
        quotient.evaluate(&f).unwrap(),
        array![[1.0, 0.0], [0.0, -1.0]],
        epsilon = 1e-12
    );

    let flips = SubgroupId::o2(Some(0.0), GroupOrder::Int(1));
    let quotient = o2.bl_quotient_representation(&factory, 3, &flips).unwrap();
    assert_eq!(quotient.size(), 1 + 2 * 3);
    assert_eq!(
        quotient.decomposition().unwrap().irreps,
        vec![
            IrrepId::FlipRot(0, 0),
            IrrepId::FlipRot(1, 1),
            IrrepId::FlipRot(1, 2),
            IrrepId::FlipRot(1, 3),
        ]
    );

    // Functions on O(2) / O(2) are constant.
    let whole = SubgroupId::o2(Some(0.0), GroupOrder::Inf);
    let quotient = o2.bl_quotient_representation(&factory, 2, &whole).unwrap();
    assert_eq!(quotient.decomposition().unwrap().irreps, vec![IrrepId::FlipRot(0, 0)]);

    // Each irrep appears with the multiplicity of the subgroup trivial irrep in its restriction.
    let dihedral = SubgroupId::o2(Some(0.4), GroupOrder::Int(2));
    let quotient = o2.bl_quotient_representation(&factory, 3, &dihedral).unwrap();
    assert_eq!(
        quotient.decomposition().unwrap().irreps,
        vec![IrrepId::FlipRot(0, 0), IrrepId::FlipRot(1, 2)]
    );

    assert!(matches!(
        o2.bl_quotient_representation(&factory, 3, &SubgroupId::cyclic(2)),
        Err(GroupError::InvalidSubgroupId(_))
    ));
}

#[test]
fn test_o2_bl_regular_representation() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(2).unwrap();
    assert_eq!(
        o2.bl_irreps(0).unwrap(),
        vec![IrrepId::FlipRot(0, 0), IrrepId::FlipRot(1, 0)]
    );
    let regular = o2.bl_regular_representation(2).unwrap();
    assert_eq!(regular.name(), "regular_2");
    assert_eq!(regular.size(), 1 + 1 + 4 + 4);
    assert_eq!(
        regular.decomposition().unwrap().irreps,
        vec![
            IrrepId::FlipRot(0, 0),
            IrrepId::FlipRot(1, 0),
            IrrepId::FlipRot(1, 1),
            IrrepId::FlipRot(1, 1),
            IrrepId::FlipRot(1, 2),
            IrrepId::FlipRot(1, 2),
        ]
    );
    let g = o2.element(ElementValue::FlipRadians(0, 0.6)).unwrap();
    assert_abs_diff_eq!(
        regular.evaluate(&g).unwrap(),
        block_diag(&[
            array![[1.0]],
            array![[1.0]],
            psi(0.6, 1),
            psi(0.6, 1),
            psi(0.6, 2),
            psi(0.6, 2)
        ]),
        epsilon = 1e-12
    );
}

#[test]
fn test_o2_clebsch_gordan() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(6).unwrap();
    assert_eq!(
        o2.tensor_product_irreps(&IrrepId::FlipRot(1, 2), &IrrepId::FlipRot(1, 2))
            .unwrap(),
        vec![
            (IrrepId::FlipRot(0, 0), 1),
            (IrrepId::FlipRot(1, 0), 1),
            (IrrepId::FlipRot(1, 4), 1)
        ]
    );
    assert_eq!(
        o2.tensor_product_irreps(&IrrepId::FlipRot(1, 1), &IrrepId::FlipRot(1, 3))
            .unwrap(),
        vec![(IrrepId::FlipRot(1, 2), 1), (IrrepId::FlipRot(1, 4), 1)]
    );
    assert_eq!(
        o2.tensor_product_irreps(&IrrepId::FlipRot(1, 0), &IrrepId::FlipRot(1, 3))
            .unwrap(),
        vec![(IrrepId::FlipRot(1, 3), 1)]
    );
    assert_eq!(
        o2.tensor_product_irreps(&IrrepId::FlipRot(1, 0), &IrrepId::FlipRot(1, 0))
            .unwrap(),
        vec![(IrrepId::FlipRot(0, 0), 1)]
    );

    let elements = o2.testing_elements();
    let ids = o2.bl_irreps(3).unwrap();
    for (lhs, rhs) in ids.iter().cartesian_product(ids.iter()) {
        assert_tensor_product_consistent(o2.as_ref(), lhs, rhs, &elements);
    }
    assert_eq!(
        o2.clebsch_gordan_coeff(
            &IrrepId::FlipRot(1, 1),
            &IrrepId::FlipRot(1, 2),
            &IrrepId::FlipRot(1, 2)
        )
        .unwrap()
        .shape(),
        [2, 2, 0, 2]
    );
}

#[test]
fn test_o2_process_subgroup_ids() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(2).unwrap();
    let axis_of = |id: SubgroupId| match id {
        SubgroupId::O2 { axis, .. } => axis.map(|a| a.0),
        other => panic!("Unexpected subgroup id `{other}`."),
    };
    let processed = o2
        .process_subgroup_id(&SubgroupId::o2(Some(TAU + 0.5), GroupOrder::Inf))
        .unwrap();
    assert_abs_diff_eq!(axis_of(processed).unwrap(), 0.5, epsilon = 1e-12);
    let processed = o2
        .process_subgroup_id(&SubgroupId::o2(Some(PI / 2.0 + 0.1), GroupOrder::Int(4)))
        .unwrap();
    assert_abs_diff_eq!(axis_of(processed).unwrap(), 0.1, epsilon = 1e-12);
    assert_eq!(
        o2.process_subgroup_id(&SubgroupId::o2(Some(TAU - 1e-12), GroupOrder::Int(3)))
            .unwrap(),
        SubgroupId::o2(Some(0.0), GroupOrder::Int(3))
    );
    assert_eq!(
        o2.process_subgroup_id(&SubgroupId::o2(None, GroupOrder::Int(7)))
            .unwrap(),
        SubgroupId::o2(None, GroupOrder::Int(7))
    );
    for id in [
        SubgroupId::o2(None, GroupOrder::Int(0)),
        SubgroupId::o2(Some(f64::NAN), GroupOrder::Int(2)),
        SubgroupId::cyclic(3),
        SubgroupId::dihedral(Some(0), 2),
    ] {
        assert!(matches!(
            o2.process_subgroup_id(&id),
            Err(GroupError::InvalidSubgroupId(_))
        ));
    }
}

#[test]
fn test_o2_subgroups() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(3).unwrap();
    let names = [
        (SubgroupId::o2(Some(0.3), GroupOrder::Inf), "O(2)"),
        (SubgroupId::o2(None, GroupOrder::Inf), "SO(2)"),
        (SubgroupId::o2(None, GroupOrder::Int(5)), "C5"),
        (SubgroupId::o2(Some(0.3), GroupOrder::Int(1)), "C2"),
        (SubgroupId::o2(Some(0.3), GroupOrder::Int(4)), "D4"),
    ];
    for (id, name) in names {
        assert_eq!(o2.subgroup(&factory, &id).unwrap().subgroup().name(), name);
    }
    let conjugated = o2
        .subgroup(&factory, &SubgroupId::o2(Some(0.3), GroupOrder::Inf))
        .unwrap();
    assert!(std::ptr::eq(
        conjugated.subgroup() as *const dyn Group as *const (),
        Rc::as_ptr(&o2) as *const ()
    ));
    let f = conjugated.subgroup().element(ElementValue::FlipRadians(1, 0.0)).unwrap();
    assert_eq!(
        conjugated.include(&f).unwrap(),
        o2.element(ElementValue::FlipRadians(1, 0.3)).unwrap()
    );

    for id in finite_and_continuous_subgroup_ids() {
        let map = o2.subgroup(&factory, &id).unwrap();
        assert!(map.include(&map.subgroup().identity()).unwrap().is_identity());
        for s in map.subgroup().testing_elements() {
            let g = map.include(&s).unwrap();
            assert_eq!(map.restrict(&g).unwrap().unwrap(), s);
        }
    }

    let so2 = o2
        .subgroup(&factory, &SubgroupId::o2(None, GroupOrder::Inf))
        .unwrap();
    assert!(so2.restrict(&o2.reflection()).unwrap().is_none());
    let flip = o2
        .subgroup(&factory, &SubgroupId::o2(Some(1.3), GroupOrder::Int(1)))
        .unwrap();
    assert!(flip.restrict(&o2.reflection()).unwrap().is_none());
    let reflection = o2.element(ElementValue::FlipRadians(1, 1.3)).unwrap();
    assert_eq!(
        flip.restrict(&reflection).unwrap().unwrap().value(),
        &ElementValue::Int(1)
    );
    let d4 = o2
        .subgroup(&factory, &SubgroupId::o2(Some(0.3), GroupOrder::Int(4)))
        .unwrap();
    let g = o2
        .element(ElementValue::FlipRadians(1, 0.3 + 3.0 * PI / 2.0))
        .unwrap();
    assert_eq!(
        d4.restrict(&g).unwrap().unwrap().value(),
        &ElementValue::FlipInt(1, 3)
    );
}

#[test]
fn test_o2_restrict_irreps() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(4).unwrap();
    for id in finite_and_continuous_subgroup_ids() {
        for irrep in o2.bl_irreps(4).unwrap() {
            assert_restriction_consistent(&factory, o2.as_ref(), &irrep, &id);
        }
    }

    let (change_of_basis, ids) = o2
        .restrict_irrep(
            &factory,
            &IrrepId::FlipRot(1, 3),
            &SubgroupId::o2(None, GroupOrder::Int(4)),
        )
        .unwrap();
    assert_eq!(ids, vec![IrrepId::Rot(1)]);
    assert_abs_diff_eq!(change_of_basis, array![[1.0, 0.0], [0.0, -1.0]]);
    let (_, ids) = o2
        .restrict_irrep(
            &factory,
            &IrrepId::FlipRot(1, 2),
            &SubgroupId::o2(Some(0.0), GroupOrder::Int(1)),
        )
        .unwrap();
    assert_eq!(ids, vec![IrrepId::Rot(0), IrrepId::Rot(1)]);
    let (_, ids) = o2
        .restrict_irrep(
            &factory,
            &IrrepId::FlipRot(1, 2),
            &SubgroupId::o2(None, GroupOrder::Inf),
        )
        .unwrap();
    assert_eq!(ids, vec![IrrepId::Rot(2)]);
    let (_, ids) = o2
        .restrict_irrep(
            &factory,
            &IrrepId::FlipRot(1, 0),
            &SubgroupId::o2(Some(0.4), GroupOrder::Int(3)),
        )
        .unwrap();
    assert_eq!(ids, vec![IrrepId::FlipRot(1, 0)]);
    let (_, ids) = o2
        .restrict_irrep(
            &factory,
            &IrrepId::FlipRot(1, 4),
            &SubgroupId::o2(Some(0.4), GroupOrder::Int(2)),
        )
        .unwrap();
    assert_eq!(ids, vec![IrrepId::FlipRot(0, 0), IrrepId::FlipRot(1, 0)]);
}

#[test]
fn test_o2_restrict_representation() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(3).unwrap();
    let regular = o2.bl_regular_representation(3).unwrap();
    let map = o2
        .subgroup(&factory, &SubgroupId::o2(Some(0.5), GroupOrder::Int(3)))
        .unwrap();
    let restricted = regular.restrict(&factory, &map).unwrap();
    assert_eq!(restricted.group_name(), "D3");
    assert_eq!(restricted.size(), regular.size());
    for s in map.subgroup().elements().unwrap() {
        assert_abs_diff_eq!(
            restricted.evaluate(&s).unwrap(),
            regular.evaluate(&map.include(&s).unwrap()).unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_o2_combine_subgroups() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(2).unwrap();
    let cases = [
        (
            SubgroupId::o2(None, GroupOrder::Inf),
            SubgroupId::cyclic(4),
            SubgroupId::o2(None, GroupOrder::Int(4)),
        ),
        (
            SubgroupId::o2(None, GroupOrder::Int(6)),
            SubgroupId::cyclic(3),
            SubgroupId::o2(None, GroupOrder::Int(3)),
        ),
        (
            SubgroupId::o2(Some(0.5), GroupOrder::Int(1)),
            SubgroupId::cyclic(2),
            SubgroupId::o2(Some(0.5), GroupOrder::Int(1)),
        ),
        (
            SubgroupId::o2(Some(0.5), GroupOrder::Int(1)),
            SubgroupId::cyclic(1),
            SubgroupId::o2(None, GroupOrder::Int(1)),
        ),
        (
            SubgroupId::o2(Some(0.5), GroupOrder::Int(4)),
            SubgroupId::dihedral(Some(1), 2),
            SubgroupId::o2(Some(0.5 + PI / 2.0), GroupOrder::Int(2)),
        ),
        (
            SubgroupId::o2(Some(0.5), GroupOrder::Inf),
            SubgroupId::o2(Some(0.25), GroupOrder::Int(3)),
            SubgroupId::o2(Some(0.75), GroupOrder::Int(3)),
        ),
        (
            SubgroupId::o2(Some(0.5), GroupOrder::Inf),
            SubgroupId::o2(None, GroupOrder::Inf),
            SubgroupId::o2(None, GroupOrder::Inf),
        ),
    ];
    for (outer, inner, expected) in cases {
        let combined = o2.combine_subgroups(&factory, &outer, &inner).unwrap();
        assert_eq!(combined, o2.process_subgroup_id(&expected).unwrap());

        let outer_map = o2.subgroup(&factory, &outer).unwrap();
        let inner_map = outer_map.subgroup().subgroup(&factory, &inner).unwrap();
        let combined_map = o2.subgroup(&factory, &combined).unwrap();
        for s in inner_map.subgroup().testing_elements() {
            let g = outer_map.include(&inner_map.include(&s).unwrap()).unwrap();
            assert!(combined_map.restrict(&g).unwrap().is_some());
        }
    }
    assert!(o2
        .combine_subgroups(
            &factory,
            &SubgroupId::o2(None, GroupOrder::Inf),
            &SubgroupId::dihedral(None, 2)
        )
        .is_err());
}

#[test]
fn test_o2_induced_representations() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(2).unwrap();
    let so2 = SubgroupId::o2(None, GroupOrder::Inf);
    assert_eq!(o2.coset_representatives(&factory, &so2).unwrap().len(), 2);

    let quotient = o2
        .induced_representation(&factory, &so2, &IrrepId::Rot(0))
        .unwrap();
    assert_eq!(quotient.size(), 2);
    assert_abs_diff_eq!(
        quotient.evaluate(&o2.reflection()).unwrap(),
        array![[0.0, 1.0], [1.0, 0.0]]
    );

    let elements = o2.grid(GridKind::Regular, 6, None).unwrap();
    let cases = [
        (so2, IrrepId::Rot(1)),
        (
            SubgroupId::o2(Some(0.3), GroupOrder::Inf),
            IrrepId::FlipRot(1, 1),
        ),
    ];
    for (id, irrep) in cases {
        let induced = o2.induced_representation(&factory, &id, &irrep).unwrap();
        for (g, h) in elements.iter().cartesian_product(elements.iter()) {
            assert_abs_diff_eq!(
                induced.evaluate(&(g * h)).unwrap(),
                induced.evaluate(g).unwrap().dot(&induced.evaluate(h).unwrap()),
                epsilon = 1e-9
            );
        }
    }
    let induced = o2
        .induced_representation(&factory, &so2, &IrrepId::Rot(1))
        .unwrap();
    assert_eq!(induced.size(), 4);
    let r = o2.element(ElementValue::FlipRadians(0, 0.8)).unwrap();
    assert_abs_diff_eq!(
        induced.character(&r).unwrap(),
        4.0 * 0.8_f64.cos(),
        epsilon = 1e-12
    );

    for id in [
        SubgroupId::o2(None, GroupOrder::Int(3)),
        SubgroupId::o2(Some(0.0), GroupOrder::Int(4)),
        SubgroupId::o2(Some(0.0), GroupOrder::Int(1)),
    ] {
        assert!(matches!(
            o2.induced_representation(&factory, &id, &IrrepId::Rot(0)),
            Err(GroupError::UnsupportedInduction(_))
        ));
    }
}

#[test]
fn test_o2_grids() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(1).unwrap();
    let grid = o2.grid(GridKind::Regular, 3, None).unwrap();
    assert_eq!(grid.len(), 6);
    assert!(grid[..3].iter().all(|g| g.value().flip() == Some(0)));
    assert!(grid[3..].iter().all(|g| g.value().flip() == Some(1)));

    let rotations = o2.grid_so2(GridKind::Regular, 4, None).unwrap();
    assert_eq!(rotations.len(), 4);
    assert!(rotations.iter().all(|g| g.value().flip() == Some(0)));
    assert_eq!(
        rotations[1],
        o2.element(ElementValue::FlipRadians(0, PI / 2.0)).unwrap()
    );
    let rand_a = o2.grid_so2(GridKind::Rand, 5, Some(2)).unwrap();
    assert_eq!(rand_a, o2.grid_so2(GridKind::Rand, 5, Some(2)).unwrap());

    let grid_a = o2.grid(GridKind::Rand, 9, Some(5)).unwrap();
    assert_eq!(grid_a, o2.grid(GridKind::Rand, 9, Some(5)).unwrap());
    assert!(grid_a.iter().all(|g| o2.is_element(g.value())));
    assert!(o2.is_element(o2.sample().value()));
}
