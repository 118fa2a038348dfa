use serde::{Deserialize, Serialize};

use crate::{basis::BasisFamily, density::DensityMatrix};

/// The program or method that produced a set of molecular orbitals. It fixes which basis
/// function family the orbital coefficients refer to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrbitalSource {
    Gaussian,
    Gamess,
    Hondo,
    Mos,
    Zindo,
    Prddo,
    MoldenSlater,
    Adf,
    ExtendedHuckel,
}

impl OrbitalSource {
    /// The basis family used to evaluate orbitals from this source, `None` if no evaluator
    /// exists for it.
    pub fn basis_family(self) -> Option<BasisFamily> {
        match self {
            Self::Gaussian | Self::Gamess | Self::Hondo => Some(BasisFamily::Gaussian),
            Self::Mos | Self::Zindo | Self::Prddo => Some(BasisFamily::Prddo),
            Self::MoldenSlater => Some(BasisFamily::Slater),
            Self::Adf | Self::ExtendedHuckel => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MolecularOrbital {
    /// Symmetry label as printed by the producing program
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub eigenvalue: f64,
    /// Number of electrons in this orbital: 0, 1 or 2 for restricted, 0 or 1 for
    /// unrestricted wavefunctions
    #[serde(default)]
    pub occupation: f64,
    /// One coefficient per basis function, in global basis order
    pub coefficients: Vec<f64>,
}

impl MolecularOrbital {
    pub fn new(eigenvalue: f64, occupation: f64, coefficients: Vec<f64>) -> Self {
        Self {
            label: String::new(),
            eigenvalue,
            occupation,
            coefficients,
        }
    }

    /// Value of this orbital given the basis function values at a point.
    #[inline]
    pub fn value(&self, chi: &[f64]) -> f64 {
        self.coefficients.iter().zip(chi).map(|(c, x)| c * x).sum()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Spin {
    Alpha,
    Beta,
}

/// Molecular orbitals and optional density matrices read from an electronic structure
/// calculation.
///
/// Orbitals can be addressed through one index over `[alpha 0..Na, beta 0..Nb]`.
#[derive(Clone, Debug)]
pub struct Wavefunction {
    pub(crate) source: OrbitalSource,
    pub(crate) alpha: Vec<MolecularOrbital>,
    /// Present for unrestricted (open shell) wavefunctions only
    pub(crate) beta: Option<Vec<MolecularOrbital>>,
    pub(crate) alpha_density: Option<DensityMatrix>,
    pub(crate) beta_density: Option<DensityMatrix>,
    pub(crate) n_alpha: usize,
    pub(crate) n_beta: usize,
}

impl Wavefunction {
    /// A restricted wavefunction. Electron counts are derived from the occupations.
    pub fn new(source: OrbitalSource, alpha: Vec<MolecularOrbital>) -> Self {
        let n_alpha = alpha.iter().filter(|mo| mo.occupation >= 0.5).count();
        let n_beta = alpha.iter().filter(|mo| mo.occupation >= 1.5).count();

        Self {
            source,
            alpha,
            beta: None,
            alpha_density: None,
            beta_density: None,
            n_alpha,
            n_beta,
        }
    }

    /// Make this an unrestricted wavefunction with separate beta orbitals.
    pub fn with_beta(mut self, beta: Vec<MolecularOrbital>) -> Self {
        self.n_alpha = self.alpha.iter().filter(|mo| mo.occupation >= 0.5).count();
        self.n_beta = beta.iter().filter(|mo| mo.occupation >= 0.5).count();
        self.beta = Some(beta);
        self
    }

    /// Override the electron counts derived from the occupations.
    pub fn with_electron_counts(mut self, n_alpha: usize, n_beta: usize) -> Self {
        self.n_alpha = n_alpha;
        self.n_beta = n_beta;
        self
    }

    /// Attach alpha (and optionally beta) density matrices as printed by the producing program.
    pub fn with_density_matrices(mut self, alpha: DensityMatrix, beta: Option<DensityMatrix>) -> Self {
        self.alpha_density = Some(alpha);
        self.beta_density = beta;
        self
    }

    pub fn source(&self) -> OrbitalSource {
        self.source
    }

    pub fn basis_family(&self) -> Option<BasisFamily> {
        self.source.basis_family()
    }

    pub fn alpha(&self) -> &[MolecularOrbital] {
        &self.alpha
    }

    pub fn beta(&self) -> Option<&[MolecularOrbital]> {
        self.beta.as_deref()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.beta.is_some()
    }

    pub fn n_alpha(&self) -> usize {
        self.n_alpha
    }

    pub fn n_beta(&self) -> usize {
        self.n_beta
    }

    pub fn alpha_density(&self) -> Option<&DensityMatrix> {
        self.alpha_density.as_ref()
    }

    pub fn beta_density(&self) -> Option<&DensityMatrix> {
        self.beta_density.as_ref()
    }

    /// Whether any alpha or beta orbital carries expansion coefficients.
    pub fn has_coefficients(&self) -> bool {
        self.alpha
            .iter()
            .chain(self.beta().unwrap_or_default())
            .any(|mo| !mo.coefficients.is_empty())
    }

    /// Number of alpha plus beta orbitals
    pub fn n_orbitals(&self) -> usize {
        self.alpha.len() + self.beta().map_or(0, <[_]>::len)
    }

    /// Look up an orbital by its index into `[alpha..., beta...]`.
    pub fn orbital(&self, index: usize) -> Option<(Spin, &MolecularOrbital)> {
        match index.checked_sub(self.alpha.len()) {
            None => Some((Spin::Alpha, &self.alpha[index])),
            Some(beta_index) => self
                .beta()
                .and_then(|beta| beta.get(beta_index))
                .map(|mo| (Spin::Beta, mo)),
        }
    }

    pub fn is_alpha(&self, index: usize) -> bool {
        index < self.alpha.len()
    }

    pub fn is_beta(&self, index: usize) -> bool {
        matches!(self.orbital(index), Some((Spin::Beta, _)))
    }
}
