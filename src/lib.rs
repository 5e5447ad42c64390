//! # planargrp: exact algebra of the planar symmetry groups
//!
//! `planargrp` implements the group-theoretical kernel needed to build representations of the
//! symmetry groups of the plane:
//! - the cyclic groups $`C_N`$, the dihedral groups $`D_N`$, $`SO(2)`$ and $`O(2)`$ with their
//!   group laws under several numeric parametrizations,
//! - their irreducible representations, built lazily and cached per group instance,
//! - their subgroup lattices with explicit inclusion and restriction maps, together with the
//!   restriction of irreps to subgroups,
//! - band-limited, regular and induced representations, and
//! - Clebsch-Gordan decompositions of tensor products of irreps.
//!
//! Groups are obtained from a [`group::factory::GroupFactory`], which hands out one shared
//! instance per distinct group so that cached irreps can be compared by identity:
//!
//! ```
//! use planargrp::group::factory::GroupFactory;
//! use planargrp::group::Group;
//! use planargrp::parametrization::ElementValue;
//!
//! let factory = GroupFactory::default();
//! let c4 = factory.cyclic_group(4).unwrap();
//! let a = c4.element(ElementValue::Int(1)).unwrap();
//! let b = c4.element(ElementValue::Int(3)).unwrap();
//! assert!((&a * &b).is_identity());
//! ```
//!
//! Every group and cache is single-threaded: none of the types in this crate are [`Send`] or
//! [`Sync`].

pub mod group;
pub mod io;
pub mod parametrization;
pub mod representation;
