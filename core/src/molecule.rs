use crate::{atom::Atom, basis::BasisFamily};

/// Represents a molecule
#[derive(Clone, Debug, Default)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Total number of basis functions over all atoms for the given family. Orbital
    /// coefficient vectors and density matrices are indexed in this order.
    pub fn n_basis(&self, family: BasisFamily) -> usize {
        self.atoms
            .iter()
            .map(|atom| family.function_count(atom))
            .sum()
    }

    /// Rescales the contraction coefficients of every gaussian shell so that each
    /// contracted function has unit norm.
    pub fn normalize_shells(&mut self) {
        for shell in self.atoms.iter_mut().flat_map(|atom| &mut atom.shells) {
            shell.normalize();
        }
    }
}

impl FromIterator<Atom> for Molecule {
    fn from_iter<T: IntoIterator<Item = Atom>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
