use nalgebra::Vector3;

use crate::basis::{Shell, Slater};

/// One bohr, in Angstrom.
pub const BOHR: f64 = 0.529177249;
/// Converts Angstrom to bohr (atomic units of length).
pub const ANGSTROM_TO_BOHR: f64 = 1.88972599;

/// Represents an atom in a molecule, together with the basis functions centered on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub(crate) ordinal: u32,
    /// Position in Angstrom
    pub(crate) position: Vector3<f64>,
    /// Point charge used for the electrostatic potential
    pub(crate) charge: f64,
    pub(crate) shells: Vec<Shell>,
    pub(crate) slaters: Vec<Slater>,
}

impl Atom {
    pub fn new(ordinal: u32, position: Vector3<f64>) -> Self {
        Self {
            ordinal,
            position,
            charge: 0.0,
            shells: Vec::new(),
            slaters: Vec::new(),
        }
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_shells(mut self, shells: Vec<Shell>) -> Self {
        self.shells = shells;
        self
    }

    pub fn with_slaters(mut self, slaters: Vec<Slater>) -> Self {
        self.slaters = slaters;
        self
    }

    /// Returns the element number of this atom
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    pub fn slaters(&self) -> &[Slater] {
        &self.slaters
    }

    /// Displacement from this nucleus to `point`, in atomic units.
    #[inline(always)]
    pub(crate) fn displacement(&self, point: &Vector3<f64>) -> Vector3<f64> {
        (point - self.position) * ANGSTROM_TO_BOHR
    }
}
