use serde::Deserialize;

use crate::{
    density::DensityMatrix,
    orbitals::{MolecularOrbital, OrbitalSource, Wavefunction},
};

use super::ConfigError;

/// Orbitals and density matrices as printed by an electronic structure program.
/// Density matrices are given as lower triangular rows.
#[derive(Deserialize)]
pub struct ConfigWavefunction {
    source: OrbitalSource,
    alpha: Vec<MolecularOrbital>,
    #[serde(default)]
    beta: Option<Vec<MolecularOrbital>>,
    #[serde(default)]
    n_alpha: Option<usize>,
    #[serde(default)]
    n_beta: Option<usize>,
    #[serde(default)]
    alpha_density: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    beta_density: Option<Vec<Vec<f64>>>,
}

impl TryFrom<ConfigWavefunction> for Wavefunction {
    type Error = ConfigError;

    fn try_from(value: ConfigWavefunction) -> Result<Self, Self::Error> {
        let mut wavefunction = Wavefunction::new(value.source, value.alpha);
        if let Some(beta) = value.beta {
            wavefunction = wavefunction.with_beta(beta);
        }

        let n_alpha = value.n_alpha.unwrap_or(wavefunction.n_alpha());
        let n_beta = value.n_beta.unwrap_or(wavefunction.n_beta());
        wavefunction = wavefunction.with_electron_counts(n_alpha, n_beta);

        if let Some(rows) = value.alpha_density {
            let alpha = DensityMatrix::from_lower_rows(&rows).ok_or(ConfigError::DensityMatrix("alpha"))?;
            let beta = value
                .beta_density
                .map(|rows| DensityMatrix::from_lower_rows(&rows).ok_or(ConfigError::DensityMatrix("beta")))
                .transpose()?;
            wavefunction = wavefunction.with_density_matrices(alpha, beta);
        }

        Ok(wavefunction)
    }
}
