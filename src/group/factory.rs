//! Configuration and memoised construction of group instances.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::group::cyclic::CyclicGroup;
use crate::group::dihedral::DihedralGroup;
use crate::group::group_error::GroupError;
use crate::group::o2::O2;
use crate::group::so2::SO2;

#[cfg(test)]
#[path = "factory_tests.rs"]
mod factory_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

const fn default_angle_threshold() -> f64 {
    1e-8
}
const fn default_matrix_threshold() -> f64 {
    1e-6
}
const fn default_maximum_frequency() -> usize {
    6
}
const fn default_testing_elements() -> usize {
    52
}

/// Structure containing the numerical parameters shared by all groups built by a
/// [`GroupFactory`].
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Absolute tolerance for comparing angles modulo their period.
    #[builder(default = "default_angle_threshold()")]
    #[serde(default = "default_angle_threshold")]
    pub angle_threshold: f64,

    /// Absolute tolerance for the orthonormality and determinant checks of matrix-encoded
    /// elements.
    #[builder(default = "default_matrix_threshold()")]
    #[serde(default = "default_matrix_threshold")]
    pub matrix_threshold: f64,

    /// The maximum rotational frequency of the irreps built eagerly for $`O(2)`$ and $`SO(2)`$.
    #[builder(default = "default_maximum_frequency()")]
    #[serde(default = "default_maximum_frequency")]
    pub default_maximum_frequency: usize,

    /// The number of rotations (and, for $`O(2)`$, of reflections) in the testing elements of
    /// the continuous groups.
    #[builder(default = "default_testing_elements()")]
    #[serde(default = "default_testing_elements")]
    pub testing_elements: usize,
}

impl GroupConfig {
    /// Returns a builder to construct a new configuration.
    #[must_use]
    pub fn builder() -> GroupConfigBuilder {
        GroupConfigBuilder::default()
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            angle_threshold: default_angle_threshold(),
            matrix_threshold: default_matrix_threshold(),
            default_maximum_frequency: default_maximum_frequency(),
            testing_elements: default_testing_elements(),
        }
    }
}

// -------
// Factory
// -------

/// A structure to construct group instances, returning the same shared instance whenever the
/// same group is requested again.
///
/// Identical groups must be the same instance for their cached irreps to be shared, so every
/// group used together should come from a single factory. There is exactly one $`O(2)`$ and one
/// $`SO(2)`$ per factory: requesting either with a larger maximum frequency extends the irreps of
/// the existing instance.
#[derive(Debug, Default)]
pub struct GroupFactory {
    config: GroupConfig,
    cyclic_groups: RefCell<HashMap<usize, Rc<CyclicGroup>>>,
    dihedral_groups: RefCell<HashMap<usize, Rc<DihedralGroup>>>,
    so2_group: RefCell<Option<Rc<SO2>>>,
    o2_group: RefCell<Option<Rc<O2>>>,
}

impl GroupFactory {
    pub fn new(config: GroupConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Retrieves the cyclic group $`C_N`$ of order `n`.
    ///
    /// # Errors
    ///
    /// Errors if `n` is zero.
    pub fn cyclic_group(&self, n: usize) -> Result<Rc<CyclicGroup>, GroupError> {
        if let Some(group) = self.cyclic_groups.borrow().get(&n) {
            return Ok(Rc::clone(group));
        }
        let group = Rc::new(CyclicGroup::new(n, &self.config)?);
        Ok(Rc::clone(
            self.cyclic_groups.borrow_mut().entry(n).or_insert(group),
        ))
    }

    /// Retrieves the dihedral group $`D_N`$ with `n` rotations.
    ///
    /// # Errors
    ///
    /// Errors if `n` is zero.
    pub fn dihedral_group(&self, n: usize) -> Result<Rc<DihedralGroup>, GroupError> {
        if let Some(group) = self.dihedral_groups.borrow().get(&n) {
            return Ok(Rc::clone(group));
        }
        let group = Rc::new(DihedralGroup::new(n, &self.config)?);
        Ok(Rc::clone(
            self.dihedral_groups.borrow_mut().entry(n).or_insert(group),
        ))
    }

    /// Retrieves $`SO(2)`$ with its irreps built up to at least `maximum_frequency`.
    pub fn so2_group(&self, maximum_frequency: usize) -> Result<Rc<SO2>, GroupError> {
        if let Some(group) = self.so2_group.borrow().as_ref() {
            group.extend_maximum_frequency(maximum_frequency)?;
            return Ok(Rc::clone(group));
        }
        let group = Rc::new(SO2::new(maximum_frequency, &self.config)?);
        *self.so2_group.borrow_mut() = Some(Rc::clone(&group));
        Ok(group)
    }

    /// Retrieves $`O(2)`$ with its irreps built up to at least `maximum_frequency`.
    pub fn o2_group(&self, maximum_frequency: usize) -> Result<Rc<O2>, GroupError> {
        if let Some(group) = self.o2_group.borrow().as_ref() {
            group.extend_maximum_frequency(maximum_frequency)?;
            return Ok(Rc::clone(group));
        }
        let group = Rc::new(O2::new(maximum_frequency, &self.config)?);
        *self.o2_group.borrow_mut() = Some(Rc::clone(&group));
        Ok(group)
    }

    /// Retrieves $`O(2)`$ with the default maximum frequency of the configuration.
    pub fn default_o2_group(&self) -> Result<Rc<O2>, GroupError> {
        self.o2_group(self.config.default_maximum_frequency)
    }

    /// Retrieves $`SO(2)`$ with the default maximum frequency of the configuration.
    pub fn default_so2_group(&self) -> Result<Rc<SO2>, GroupError> {
        self.so2_group(self.config.default_maximum_frequency)
    }

    /// Retrieves the trivial group $`C_1`$.
    pub fn trivial_group(&self) -> Result<Rc<CyclicGroup>, GroupError> {
        self.cyclic_group(1)
    }
}
