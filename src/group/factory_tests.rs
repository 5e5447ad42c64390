use std::rc::Rc;

use crate::group::factory::{GroupConfig, GroupFactory};
use crate::group::group_error::GroupError;
use crate::group::Group;
use crate::parametrization::ElementValue;
use crate::representation::IrrepId;

#[test]
fn test_group_config_builder() {
    let config = GroupConfig::builder().build().unwrap();
    assert_eq!(config, GroupConfig::default());
    assert_eq!(config.angle_threshold, 1e-8);
    assert_eq!(config.matrix_threshold, 1e-6);
    assert_eq!(config.default_maximum_frequency, 6);
    assert_eq!(config.testing_elements, 52);

    let config = GroupConfig::builder()
        .angle_threshold(1e-3)
        .testing_elements(8)
        .build()
        .unwrap();
    assert_eq!(config.angle_threshold, 1e-3);
    assert_eq!(config.testing_elements, 8);
    assert_eq!(config.matrix_threshold, 1e-6);
}

#[test]
fn test_group_factory_memoisation() {
    let factory = GroupFactory::default();
    let c4_a = factory.cyclic_group(4).unwrap();
    let c4_b = factory.cyclic_group(4).unwrap();
    assert!(Rc::ptr_eq(&c4_a, &c4_b));
    assert!(!Rc::ptr_eq(&c4_a, &factory.cyclic_group(5).unwrap()));
    assert!(Rc::ptr_eq(
        &factory.trivial_group().unwrap(),
        &factory.cyclic_group(1).unwrap()
    ));
    assert!(Rc::ptr_eq(
        &factory.dihedral_group(3).unwrap(),
        &factory.dihedral_group(3).unwrap()
    ));
    assert!(Rc::ptr_eq(
        &factory.so2_group(2).unwrap(),
        &factory.default_so2_group().unwrap()
    ));

    // Shared instances share their cached irreps.
    assert!(Rc::ptr_eq(
        &c4_a.irrep(&IrrepId::Rot(1)).unwrap(),
        &c4_b.irrep(&IrrepId::Rot(1)).unwrap()
    ));
    let g = c4_a.element(ElementValue::Int(1)).unwrap();
    let h = c4_b.element(ElementValue::Int(3)).unwrap();
    assert!((&g * &h).is_identity());

    let other = GroupFactory::default();
    assert!(!Rc::ptr_eq(&c4_a, &other.cyclic_group(4).unwrap()));
}

#[test]
fn test_group_factory_continuous_groups() {
    let factory = GroupFactory::default();
    let o2 = factory.o2_group(2).unwrap();
    assert_eq!(o2.maximum_frequency(), 2);
    let upgraded = factory.o2_group(5).unwrap();
    assert!(Rc::ptr_eq(&o2, &upgraded));
    assert_eq!(o2.maximum_frequency(), 5);
    let default = factory.default_o2_group().unwrap();
    assert!(Rc::ptr_eq(&o2, &default));
    assert_eq!(o2.maximum_frequency(), 6);
    assert_eq!(factory.o2_group(0).unwrap().maximum_frequency(), 6);
}

#[test]
fn test_group_factory_config() {
    let config = GroupConfig::builder()
        .angle_threshold(1e-3)
        .testing_elements(5)
        .build()
        .unwrap();
    let factory = GroupFactory::new(config.clone());
    assert_eq!(factory.config(), &config);

    let so2 = factory.so2_group(1).unwrap();
    assert_eq!(so2.testing_elements().len(), 5);
    assert_eq!(so2.angle_threshold(), 1e-3);
    assert_eq!(
        so2.element(ElementValue::Radians(1e-4)).unwrap(),
        so2.identity()
    );
    let c4 = factory.cyclic_group(4).unwrap();
    assert!(c4.is_element(&ElementValue::Radians(std::f64::consts::FRAC_PI_2 + 5e-4)));
}

#[test]
fn test_group_factory_rejections() {
    let factory = GroupFactory::default();
    assert!(matches!(
        factory.cyclic_group(0),
        Err(GroupError::InvalidArgument(_))
    ));
    assert!(matches!(
        factory.dihedral_group(0),
        Err(GroupError::InvalidArgument(_))
    ));
}
