use nalgebra::Vector3;
use serde::Deserialize;

use crate::{
    atom::Atom,
    basis::{BasisSet, Gaussian, Shell, ShellType, Slater},
    molecule::Molecule,
};

use super::ConfigError;

/// An atom in a config file. Shells listed here take precedence over the basis set.
#[derive(Deserialize)]
pub struct ConfigAtom {
    ordinal: u32,
    /// Angstrom
    position: Vec<f64>,
    #[serde(default)]
    charge: f64,
    #[serde(default)]
    shells: Vec<ConfigShell>,
    #[serde(default)]
    slaters: Vec<Slater>,
}

/// A gaussian shell identified either by its type or, as most program outputs do, by the
/// number of functions it holds.
#[derive(Deserialize)]
pub struct ConfigShell {
    #[serde(rename = "type", default)]
    shell_type: Option<ShellType>,
    #[serde(default)]
    functions: Option<usize>,
    primitives: Vec<Gaussian>,
}

impl ConfigShell {
    fn into_shell(self, index: usize) -> Result<Shell, ConfigError> {
        let shell_type = match (self.shell_type, self.functions) {
            (Some(shell_type), _) => shell_type,
            (None, Some(count)) => {
                ShellType::from_function_count(count).ok_or(ConfigError::UnknownShellSize(count))?
            }
            (None, None) => return Err(ConfigError::UntypedShell(index)),
        };

        Ok(Shell::new(shell_type, self.primitives))
    }
}

pub(super) fn build(
    config_atoms: Vec<ConfigAtom>,
    basis_set: Option<&BasisSet>,
    normalize: bool,
) -> Result<Molecule, ConfigError> {
    let mut atoms = Vec::with_capacity(config_atoms.len());

    for (index, atom) in config_atoms.into_iter().enumerate() {
        let &[x, y, z] = atom.position.as_slice() else {
            return Err(ConfigError::Coordinates {
                atom: index,
                found: atom.position.len(),
            });
        };

        let mut shells = atom
            .shells
            .into_iter()
            .enumerate()
            .map(|(i, shell)| shell.into_shell(i))
            .collect::<Result<Vec<_>, _>>()?;
        if normalize {
            shells.iter_mut().for_each(Shell::normalize);
        }

        let built = Atom::new(atom.ordinal, Vector3::new(x, y, z))
            .with_charge(atom.charge)
            .with_slaters(atom.slaters);

        if shells.is_empty() && built.slaters().is_empty() {
            if let Some(basis_set) = basis_set {
                shells = basis_set
                    .for_atom(&built)
                    .ok_or(ConfigError::MissingBasis {
                        atom: index,
                        ordinal: built.ordinal,
                    })?
                    .to_vec();
            }
        }

        atoms.push(built.with_shells(shells));
    }

    Ok(Molecule::new(atoms))
}
