//! Per-group caches of built representations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::group::group_error::GroupError;
use crate::representation::clebsch_gordan::ClebschGordanDecomposition;
use crate::representation::{IrreducibleRepresentation, IrrepId, Representation};

/// A structure to cache the irreps, named representations and Clebsch-Gordan decompositions of a
/// single group instance.
///
/// Entries are inserted at most once and never replaced, so every request for the same key
/// returns the same shared instance. No borrow is held while a missing entry is being built, so
/// builders may themselves query the registry. The registry is not [`Sync`]: when it is to be
/// read from several threads, it must be fully populated before sharing.
#[derive(Default)]
pub struct RepresentationRegistry {
    irreps: RefCell<IndexMap<IrrepId, Rc<IrreducibleRepresentation>>>,
    representations: RefCell<IndexMap<String, Rc<Representation>>>,
    clebsch_gordan: RefCell<HashMap<(IrrepId, IrrepId), Rc<ClebschGordanDecomposition>>>,
}

impl RepresentationRegistry {
    /// Retrieves the irrep `id` if it has been built.
    pub fn irrep(&self, id: &IrrepId) -> Option<Rc<IrreducibleRepresentation>> {
        self.irreps.borrow().get(id).cloned()
    }

    /// Retrieves the irrep `id`, building and inserting it with `build` if absent.
    ///
    /// The irrep is also registered as a named representation under its conventional name.
    pub fn irrep_or_try_insert_with<F>(
        &self,
        id: &IrrepId,
        build: F,
    ) -> Result<Rc<IrreducibleRepresentation>, GroupError>
    where
        F: FnOnce() -> Result<IrreducibleRepresentation, GroupError>,
    {
        if let Some(irrep) = self.irrep(id) {
            return Ok(irrep);
        }
        let irrep = Rc::new(build()?);
        let irrep = self
            .irreps
            .borrow_mut()
            .entry(*id)
            .or_insert(irrep)
            .clone();
        self.representations
            .borrow_mut()
            .entry(irrep.name().to_string())
            .or_insert_with(|| Rc::new(irrep.representation().clone()));
        Ok(irrep)
    }

    /// All irreps built so far, in order of construction.
    pub fn irreps(&self) -> Vec<Rc<IrreducibleRepresentation>> {
        self.irreps.borrow().values().cloned().collect_vec()
    }

    pub fn irrep_ids(&self) -> Vec<IrrepId> {
        self.irreps.borrow().keys().cloned().collect_vec()
    }

    /// Retrieves the representation called `name` if it has been built.
    pub fn representation(&self, name: &str) -> Option<Rc<Representation>> {
        self.representations.borrow().get(name).cloned()
    }

    /// Retrieves the representation called `name`, building and inserting it with `build` if
    /// absent.
    pub fn representation_or_try_insert_with<F>(
        &self,
        name: &str,
        build: F,
    ) -> Result<Rc<Representation>, GroupError>
    where
        F: FnOnce() -> Result<Representation, GroupError>,
    {
        if let Some(rep) = self.representation(name) {
            return Ok(rep);
        }
        let rep = Rc::new(build()?);
        Ok(self
            .representations
            .borrow_mut()
            .entry(name.to_string())
            .or_insert(rep)
            .clone())
    }

    /// The names of all representations built so far, irreps included.
    pub fn representation_names(&self) -> Vec<String> {
        self.representations.borrow().keys().cloned().collect_vec()
    }

    /// Retrieves the Clebsch-Gordan decomposition of `lhs ⊗ rhs`, building and inserting it with
    /// `build` if absent.
    pub fn clebsch_gordan_or_try_insert_with<F>(
        &self,
        lhs: &IrrepId,
        rhs: &IrrepId,
        build: F,
    ) -> Result<Rc<ClebschGordanDecomposition>, GroupError>
    where
        F: FnOnce() -> Result<ClebschGordanDecomposition, GroupError>,
    {
        let key = (*lhs, *rhs);
        if let Some(cg) = self.clebsch_gordan.borrow().get(&key) {
            return Ok(cg.clone());
        }
        let cg = Rc::new(build()?);
        Ok(self
            .clebsch_gordan
            .borrow_mut()
            .entry(key)
            .or_insert(cg)
            .clone())
    }
}

impl fmt::Debug for RepresentationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepresentationRegistry")
            .field("irreps", &self.irrep_ids())
            .field("representations", &self.representation_names())
            .finish_non_exhaustive()
    }
}
