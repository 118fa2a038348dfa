use std::collections::HashMap;

use serde::Deserialize;
use smallvec::SmallVec;

use crate::basis::{BasisSet, Gaussian, Shell, ShellType};

use super::ConfigError;

/// A basis set in the Basis Set Exchange JSON format, keyed by element number.
#[derive(Deserialize)]
pub struct ConfigBasisSet {
    elements: HashMap<u32, ConfigElectronicConfiguration>,
}

#[derive(Deserialize)]
struct ConfigElectronicConfiguration {
    electron_shells: Vec<ConfigElectronShell>,
}

#[derive(Deserialize)]
struct ConfigElectronShell {
    function_type: String,
    angular_momentum: Vec<i32>,
    exponents: Vec<String>,
    coefficients: Vec<Vec<String>>,
}

impl TryFrom<ConfigBasisSet> for BasisSet {
    type Error = ConfigError;

    fn try_from(value: ConfigBasisSet) -> Result<Self, Self::Error> {
        let mut atomic_mapping = HashMap::with_capacity(value.elements.len());

        for (element, configuration) in value.elements {
            let shells = configuration
                .electron_shells
                .iter()
                .map(ConfigElectronShell::to_shells)
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .flatten()
                .collect();

            atomic_mapping.insert(element, shells);
        }

        Ok(Self::new(atomic_mapping))
    }
}

impl ConfigElectronShell {
    /// Pople style `[0, 1]` entries become one SP shell, everything else one shell per
    /// angular momentum. Coefficients are scaled by the primitive normalization.
    fn to_shells(&self) -> Result<Vec<Shell>, ConfigError> {
        let exponents = self
            .exponents
            .iter()
            .map(|exponent| exponent.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        let coefficients = |index: usize| -> Result<Vec<f64>, ConfigError> {
            self.coefficients
                .get(index)
                .ok_or(ConfigError::MissingCoefficients(index))?
                .iter()
                .map(|c| Ok(c.parse::<f64>()?))
                .collect()
        };

        if self.angular_momentum == [0, 1] {
            let (s, p) = (coefficients(0)?, coefficients(1)?);
            let primitives = itertools::izip!(&exponents, &s, &p).map(|(&exponent, &s, &p)| {
                Gaussian::with_p_coefficient(
                    exponent,
                    s * Gaussian::primitive_norm(exponent, 0),
                    p * Gaussian::primitive_norm(exponent, 1),
                )
            });
            return Ok(vec![Shell::new(ShellType::SP, primitives)]);
        }

        let spherical = self.function_type == "gto_spherical";
        let mut shells = Vec::with_capacity(self.angular_momentum.len());

        for (index, &l) in self.angular_momentum.iter().enumerate() {
            let shell_type = match (l, spherical) {
                (0, _) => ShellType::S,
                (1, _) => ShellType::P,
                (2, true) => ShellType::D5,
                (2, false) => ShellType::D6,
                (3, true) => ShellType::F7,
                (3, false) => ShellType::F10,
                _ => return Err(ConfigError::UnsupportedAngularMomentum(self.angular_momentum.clone())),
            };

            let primitives: SmallVec<[Gaussian; 6]> = exponents
                .iter()
                .zip(coefficients(index)?)
                .map(|(&exponent, coefficient)| {
                    Gaussian::new(exponent, coefficient * Gaussian::primitive_norm(exponent, l))
                })
                .collect();

            shells.push(Shell::new(shell_type, primitives));
        }

        Ok(shells)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn shell(function_type: &str, angular_momentum: Vec<i32>, rows: usize) -> ConfigElectronShell {
        ConfigElectronShell {
            function_type: function_type.to_string(),
            angular_momentum,
            exponents: vec!["2.0".to_string(), "0.5".to_string()],
            coefficients: vec![vec!["0.4".to_string(), "0.6".to_string()]; rows],
        }
    }

    #[test]
    fn pople_shell_becomes_sp() {
        let shells = shell("gto", vec![0, 1], 2).to_shells().unwrap();

        assert_eq!(shells.len(), 1);
        assert_eq!(shells[0].shell_type, ShellType::SP);
        let first = shells[0].primitives[0];
        assert_relative_eq!(first.coefficient, 0.4 * Gaussian::primitive_norm(2.0, 0));
        assert_relative_eq!(first.coefficient_p, 0.4 * Gaussian::primitive_norm(2.0, 1));
    }

    #[test]
    fn spherical_and_cartesian_shells() {
        let spherical = shell("gto_spherical", vec![2, 3], 2).to_shells().unwrap();
        let cartesian = shell("gto_cartesian", vec![2, 3], 2).to_shells().unwrap();

        let types = |shells: &[Shell]| shells.iter().map(|s| s.shell_type).collect::<Vec<_>>();
        assert_eq!(types(&spherical), vec![ShellType::D5, ShellType::F7]);
        assert_eq!(types(&cartesian), vec![ShellType::D6, ShellType::F10]);
    }

    #[test]
    fn basis_set_errors() {
        assert!(matches!(
            shell("gto", vec![4], 1).to_shells(),
            Err(ConfigError::UnsupportedAngularMomentum(_))
        ));
        assert!(matches!(
            shell("gto", vec![0, 1], 1).to_shells(),
            Err(ConfigError::MissingCoefficients(1))
        ));

        let mut bad = shell("gto", vec![0], 1);
        bad.exponents[1] = "0.5x".to_string();
        assert!(matches!(bad.to_shells(), Err(ConfigError::Number(_))));
    }
}
