use std::collections::HashMap;

use crate::atom::Atom;

use super::Shell;

/// Per-element gaussian shells, used to populate atoms whose input did not list shells
/// explicitly.
#[derive(Debug, Default)]
pub struct BasisSet {
    atomic_mapping: HashMap<u32, Vec<Shell>>,
}

impl BasisSet {
    /// Returns the shells of a given atom's element, if the basis set covers it.
    pub fn for_atom(&self, atom: &Atom) -> Option<&[Shell]> {
        self.for_element(atom.ordinal)
    }

    pub fn for_element(&self, ordinal: u32) -> Option<&[Shell]> {
        self.atomic_mapping.get(&ordinal).map(Vec::as_slice)
    }

    /// Create a new basis set given mappings from element number to the shells of that element
    pub(crate) fn new(atomic_mapping: HashMap<u32, Vec<Shell>>) -> Self {
        Self { atomic_mapping }
    }

    pub fn len(&self) -> usize {
        self.atomic_mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atomic_mapping.is_empty()
    }
}
