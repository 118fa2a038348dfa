//! The JSON input model: a molecule with its basis functions and, optionally, the
//! orbitals of an electronic structure calculation.
//!
//! ```json
//! {
//!   "atoms": [{ "ordinal": 1, "position": [0.0, 0.0, 0.0], "charge": 1.0 }],
//!   "basis_set": { "elements": { "1": { "electron_shells": [...] } } },
//!   "wavefunction": { "source": "gaussian", "alpha": [{ "occupation": 2.0, "coefficients": [...] }] },
//!   "normalize": true
//! }
//! ```

mod basis_set;
mod molecule;
mod wavefunction;

use std::io::Read;

use serde::Deserialize;
use thiserror::Error;

pub use basis_set::ConfigBasisSet;
pub use molecule::{ConfigAtom, ConfigShell};
pub use wavefunction::ConfigWavefunction;

use crate::{
    basis::BasisSet,
    molecule::Molecule,
    orbitals::Wavefunction,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("atom {atom} has {found} coordinates, expected x, y, z")]
    Coordinates { atom: usize, found: usize },

    #[error("invalid number in basis set: {0}")]
    Number(#[from] std::num::ParseFloatError),

    #[error("no shell type has {0} basis functions")]
    UnknownShellSize(usize),

    #[error("shell {0} declares neither a type nor a function count")]
    UntypedShell(usize),

    #[error("unsupported angular momentum {0:?} in basis set")]
    UnsupportedAngularMomentum(Vec<i32>),

    #[error("basis set shell has no coefficients for angular momentum index {0}")]
    MissingCoefficients(usize),

    #[error("basis set has no shells for element {ordinal} (atom {atom})")]
    MissingBasis { atom: usize, ordinal: u32 },

    #[error("{0} density matrix is not lower triangular")]
    DensityMatrix(&'static str),
}

/// A full system in a config file.
#[derive(Deserialize)]
pub struct ConfigSystem {
    atoms: Vec<ConfigAtom>,
    #[serde(default)]
    basis_set: Option<ConfigBasisSet>,
    #[serde(default)]
    wavefunction: Option<ConfigWavefunction>,
    /// Normalize the contraction coefficients of explicitly listed shells
    #[serde(default)]
    normalize: bool,
}

/// A molecule ready for evaluation together with its orbitals, if any.
#[derive(Clone, Debug)]
pub struct System {
    pub molecule: Molecule,
    pub wavefunction: Option<Wavefunction>,
}

impl System {
    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        serde_json::from_reader::<_, ConfigSystem>(reader)?.try_into()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<ConfigSystem>(json)?.try_into()
    }
}

impl TryFrom<ConfigSystem> for System {
    type Error = ConfigError;

    fn try_from(value: ConfigSystem) -> Result<Self, Self::Error> {
        let basis_set = value.basis_set.map(BasisSet::try_from).transpose()?;
        if let Some(basis_set) = basis_set.as_ref().filter(|set| !set.is_empty()) {
            log::debug!("basis set covers {} elements", basis_set.len());
        }
        let molecule = molecule::build(value.atoms, basis_set.as_ref(), value.normalize)?;
        let wavefunction = value.wavefunction.map(Wavefunction::try_from).transpose()?;

        log::debug!(
            "loaded {} atoms, wavefunction: {:?}",
            molecule.atoms().len(),
            wavefunction.as_ref().map(Wavefunction::source)
        );

        Ok(Self {
            molecule,
            wavefunction,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        basis::{BasisFamily, ShellType},
        field::{FieldRequest, ScalarField, ScalarKind},
        orbitals::OrbitalSource,
    };

    const HYDROGEN: &str = r#"{
        "atoms": [
            { "ordinal": 1, "position": [0.0, 0.0, 0.0], "charge": 1.0 },
            { "ordinal": 1, "position": [0.0, 0.0, 0.74], "charge": 1.0 }
        ],
        "basis_set": {
            "elements": {
                "1": {
                    "electron_shells": [{
                        "function_type": "gto",
                        "angular_momentum": [0],
                        "exponents": ["3.42525091", "0.62391373", "0.16885540"],
                        "coefficients": [["0.15432897", "0.53532814", "0.44463454"]]
                    }]
                }
            }
        },
        "wavefunction": {
            "source": "gaussian",
            "alpha": [
                { "eigenvalue": -0.578, "occupation": 2.0, "coefficients": [0.5489, 0.5489] },
                { "eigenvalue": 0.671, "occupation": 0.0, "coefficients": [1.2114, -1.2114] }
            ]
        }
    }"#;

    #[test]
    fn hydrogen_from_json() {
        let system = System::from_json_str(HYDROGEN).unwrap();
        let wavefunction = system.wavefunction.as_ref().unwrap();

        assert_eq!(system.molecule.atoms().len(), 2);
        assert_eq!(system.molecule.n_basis(BasisFamily::Gaussian), 2);
        assert_eq!(wavefunction.source(), OrbitalSource::Gaussian);
        assert_eq!(wavefunction.n_alpha(), 1);

        let field = ScalarField::select(
            &system.molecule,
            Some(wavefunction),
            &FieldRequest::new(ScalarKind::ElectronDensity),
        )
        .unwrap()
        .unwrap();
        let at_nucleus = field.evaluate(&mut field.context(), system.molecule.atoms()[0].position());
        assert!(at_nucleus > 0.0);
    }

    #[test]
    fn explicit_shells_are_normalized_on_request() {
        let json = r#"{
            "atoms": [{
                "ordinal": 8,
                "position": [0.0, 0.0, 0.0],
                "shells": [
                    { "functions": 4, "primitives": [
                        { "exponent": 5.0, "coefficient": 0.3, "coefficient_p": 0.2 },
                        { "exponent": 1.0, "coefficient": 0.7, "coefficient_p": 0.9 }
                    ] },
                    { "type": "D5", "primitives": [{ "exponent": 0.8, "coefficient": 1.0 }] }
                ]
            }],
            "normalize": true
        }"#;
        let system = System::from_json_str(json).unwrap();
        let shells = system.molecule.atoms()[0].shells();

        assert_eq!(shells[0].shell_type, ShellType::SP);
        assert_eq!(shells[1].shell_type, ShellType::D5);
        // a single primitive d shell: c² π^1.5 0.25 (2a)^-3.5 = 1
        let expected = (std::f64::consts::PI.powf(1.5) * 0.25 * 1.6f64.powf(-3.5)).sqrt().recip();
        assert_relative_eq!(shells[1].primitives[0].coefficient, expected, epsilon = 1e-12);
        assert!(system.wavefunction.is_none());
    }

    #[test]
    fn unknown_shell_size() {
        let json = r#"{ "atoms": [{ "ordinal": 6, "position": [0, 0, 0],
            "shells": [{ "functions": 2, "primitives": [] }] }] }"#;
        assert!(matches!(
            System::from_json_str(json),
            Err(ConfigError::UnknownShellSize(2))
        ));
    }

    #[test]
    fn bad_coordinates() {
        let json = r#"{ "atoms": [{ "ordinal": 6, "position": [0.0, 1.0] }] }"#;
        assert!(matches!(
            System::from_json_str(json),
            Err(ConfigError::Coordinates { atom: 0, found: 2 })
        ));
    }

    #[test]
    fn missing_element_in_basis_set() {
        let json = r#"{
            "atoms": [{ "ordinal": 6, "position": [0, 0, 0] }],
            "basis_set": { "elements": {} }
        }"#;
        assert!(matches!(
            System::from_json_str(json),
            Err(ConfigError::MissingBasis { atom: 0, ordinal: 6 })
        ));
    }

    #[test]
    fn slater_atoms_with_unrestricted_orbitals() {
        let json = r#"{
            "atoms": [{
                "ordinal": 7,
                "position": [0.0, 0.0, 0.0],
                "slaters": [
                    { "shell": "S", "n": 2, "exponent": 1.9, "norm": [1.2, 1.0, 1.0, 1.0, 1.0] },
                    { "shell": "P", "n": 2, "exponent": 1.9 }
                ]
            }],
            "wavefunction": {
                "source": "prddo",
                "alpha": [{ "occupation": 1.0, "coefficients": [0.0, 1.0, 0.0, 0.0] }],
                "beta": [{ "occupation": 0.0, "coefficients": [0.0, 1.0, 0.0, 0.0] }]
            }
        }"#;
        let system = System::from_json_str(json).unwrap();
        let wavefunction = system.wavefunction.unwrap();

        assert_eq!(system.molecule.n_basis(BasisFamily::Prddo), 4);
        assert!(wavefunction.is_unrestricted());
        assert_eq!((wavefunction.n_alpha(), wavefunction.n_beta()), (1, 0));
        assert_eq!(wavefunction.n_orbitals(), 2);
    }
}
