//! Electron and spin density matrices.

use std::ops::Index;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{
    error::GridError,
    orbitals::{MolecularOrbital, Wavefunction},
    utils,
};

/// A symmetric matrix stored as its packed lower triangle. Reads through either
/// triangle return the same element.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DensityMatrix {
    pub fn zeros(size: usize) -> Result<Self, GridError> {
        Ok(Self {
            size,
            data: utils::try_zeroed(size * (size + 1) / 2, "density matrix")?,
        })
    }

    /// Builds the matrix by evaluating `func(i, j)` for every `j <= i`.
    pub fn from_fn(size: usize, mut func: impl FnMut(usize, usize) -> f64) -> Result<Self, GridError> {
        let mut matrix = Self::zeros(size)?;
        for i in 0..size {
            for j in 0..=i {
                matrix.data[Self::packed(i, j)] = func(i, j);
            }
        }
        Ok(matrix)
    }

    /// Reads a matrix given as lower triangular rows: row `i` holds `i + 1` values. Returns
    /// `None` if a row has the wrong length.
    pub fn from_lower_rows(rows: &[Vec<f64>]) -> Option<Self> {
        if rows.iter().enumerate().any(|(i, row)| row.len() != i + 1) {
            return None;
        }

        Some(Self {
            size: rows.len(),
            data: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    const fn packed(i: usize, j: usize) -> usize {
        i * (i + 1) / 2 + j
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (i, j) = if i >= j { (i, j) } else { (j, i) };
        self.data[Self::packed(i, j)]
    }

    /// `chiᵀ D chi`, using the symmetry to visit every off-diagonal pair once.
    pub fn contract(&self, chi: &[f64]) -> f64 {
        debug_assert_eq!(chi.len(), self.size);

        let mut value = 0.0;
        for (i, &chi_i) in chi.iter().enumerate() {
            let row = &self.data[Self::packed(i, 0)..=Self::packed(i, i)];
            value += row[i] * chi_i * chi_i;
            for (j, &chi_j) in chi[..i].iter().enumerate() {
                value += row[j] * chi_i * chi_j * 2.0;
            }
        }
        value
    }

    /// Expands into a full, symmetric nalgebra matrix.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        utils::symmetric_matrix(self.size, |i, j| self.get(i, j))
    }

    fn combine(&self, other: &Self, sign: f64) -> Result<Self, GridError> {
        if other.size != self.size {
            return Err(GridError::DensitySizeMismatch {
                expected: self.size,
                found: other.size,
            });
        }

        Ok(Self {
            size: self.size,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a + sign * b)
                .collect(),
        })
    }
}

impl Index<(usize, usize)> for DensityMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        let (i, j) = if i >= j { (i, j) } else { (j, i) };
        &self.data[Self::packed(i, j)]
    }
}

/// Where density matrices come from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DensitySource {
    /// Build from orbital coefficients and occupations
    #[default]
    Coefficients,
    /// Use the alpha and beta density matrices printed by the producing program
    Matrices,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DensityKind {
    Electron,
    Spin,
}

/// Builds the electron or spin density matrix of a wavefunction over `n_basis` functions.
///
/// From coefficients the electron density is `Σ_k occ_k c_ki c_kj` over all orbitals with
/// positive occupation, alpha and beta orbitals summed separately. The spin density subtracts
/// the beta contribution; for a restricted wavefunction it is built from the singly
/// occupied orbitals. From matrices the electron density is `alpha + beta` (or `alpha`
/// alone) and the spin density `alpha - beta`.
///
/// Every call builds a new matrix from scratch.
pub fn build_density_matrix(
    wavefunction: &Wavefunction,
    n_basis: usize,
    kind: DensityKind,
    source: DensitySource,
) -> Result<DensityMatrix, GridError> {
    let matrix = match source {
        DensitySource::Matrices => from_matrices(wavefunction, n_basis, kind)?,
        DensitySource::Coefficients => from_coefficients(wavefunction, n_basis, kind)?,
    };

    log::debug!(
        "{kind:?} density matrix of dimension {} built from {source:?}",
        matrix.size()
    );
    Ok(matrix)
}

fn from_matrices(
    wavefunction: &Wavefunction,
    n_basis: usize,
    kind: DensityKind,
) -> Result<DensityMatrix, GridError> {
    let alpha = wavefunction
        .alpha_density()
        .ok_or(GridError::MissingDensityMatrix)?;

    if alpha.size() != n_basis {
        return Err(GridError::DensitySizeMismatch {
            expected: n_basis,
            found: alpha.size(),
        });
    }

    match (kind, wavefunction.beta_density()) {
        (DensityKind::Electron, Some(beta)) => alpha.combine(beta, 1.0),
        (DensityKind::Electron, None) => Ok(alpha.clone()),
        (DensityKind::Spin, Some(beta)) => alpha.combine(beta, -1.0),
        (DensityKind::Spin, None) => Err(GridError::MissingBetaDensity),
    }
}

fn from_coefficients(
    wavefunction: &Wavefunction,
    n_basis: usize,
    kind: DensityKind,
) -> Result<DensityMatrix, GridError> {
    if wavefunction.alpha().is_empty() {
        return Err(GridError::MissingDensityMatrix);
    }

    let mut terms: Vec<(f64, &MolecularOrbital)> = Vec::new();
    match (kind, wavefunction.beta()) {
        (DensityKind::Electron, beta) => {
            let beta = beta.unwrap_or_default();
            terms.extend(
                wavefunction
                    .alpha()
                    .iter()
                    .chain(beta)
                    .filter(|mo| mo.occupation > 0.0)
                    .map(|mo| (mo.occupation, mo)),
            );
        }
        (DensityKind::Spin, Some(beta)) => {
            terms.extend(
                wavefunction
                    .alpha()
                    .iter()
                    .filter(|mo| mo.occupation > 0.0)
                    .map(|mo| (mo.occupation, mo)),
            );
            terms.extend(
                beta.iter()
                    .filter(|mo| mo.occupation > 0.0)
                    .map(|mo| (-mo.occupation, mo)),
            );
        }
        (DensityKind::Spin, None) => {
            terms.extend(
                wavefunction
                    .alpha()
                    .iter()
                    .filter(|mo| mo.occupation == 1.0)
                    .map(|mo| (1.0, mo)),
            );
        }
    }

    for (_, mo) in &terms {
        if mo.coefficients.len() != n_basis {
            return Err(GridError::CoefficientCountMismatch {
                expected: n_basis,
                found: mo.coefficients.len(),
            });
        }
    }

    DensityMatrix::from_fn(n_basis, |i, j| {
        terms
            .iter()
            .map(|(weight, mo)| weight * mo.coefficients[i] * mo.coefficients[j])
            .sum()
    })
}
