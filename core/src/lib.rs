pub mod analysis;
pub mod atom;
pub mod basis;
pub mod config;
pub mod density;
pub mod error;
pub mod field;
pub mod grid;
pub mod molecule;
pub mod orbitals;
mod utils;

pub use error::GridError;

/// Small, fully specified systems shared by the unit tests and the benchmarks.
pub mod testing {
    use nalgebra::Vector3;

    use crate::{
        atom::{Atom, BOHR},
        basis::{Gaussian, Shell, ShellType},
        molecule::Molecule,
        orbitals::{MolecularOrbital, OrbitalSource, Wavefunction},
    };

    pub struct TestInstance {
        pub name: String,
        pub molecule: Molecule,
        pub wavefunction: Wavefunction,
    }

    impl TestInstance {
        /// Two hydrogen atoms 1.4 bohr apart on the z axis, one unit s gaussian each and
        /// a single doubly occupied bonding orbital.
        pub fn hydrogen() -> Self {
            let s_shell = || Shell::new(ShellType::S, [Gaussian::new(1.0, 1.0)]);

            let molecule = Molecule::new(vec![
                Atom::new(1, Vector3::zeros())
                    .with_charge(1.0)
                    .with_shells(vec![s_shell()]),
                Atom::new(1, Vector3::new(0.0, 0.0, 1.4 * BOHR))
                    .with_charge(1.0)
                    .with_shells(vec![s_shell()]),
            ]);

            let bonding = MolecularOrbital::new(-0.6, 2.0, vec![0.5, 0.5]);
            let antibonding = MolecularOrbital::new(0.7, 0.0, vec![0.5, -0.5]);

            Self {
                name: "hydrogen".to_string(),
                molecule,
                wavefunction: Wavefunction::new(OrbitalSource::Gaussian, vec![bonding, antibonding]),
            }
        }

        /// One atom carrying every contracted gaussian shell type, and a second atom with a
        /// single s shell. Orbital coefficients follow a fixed, non-trivial pattern.
        pub fn all_shells() -> Self {
            let contraction = |shell_type| {
                Shell::new(
                    shell_type,
                    [
                        Gaussian::with_p_coefficient(3.0, 0.4, 0.3),
                        Gaussian::with_p_coefficient(0.8, 0.6, 0.7),
                    ],
                )
            };

            let heavy = Atom::new(8, Vector3::new(0.1, -0.2, 0.05))
                .with_charge(-0.6)
                .with_shells(
                    [
                        ShellType::S,
                        ShellType::SP,
                        ShellType::P,
                        ShellType::D5,
                        ShellType::D6,
                        ShellType::F7,
                        ShellType::F10,
                    ]
                    .into_iter()
                    .map(contraction)
                    .collect(),
                );
            let light = Atom::new(1, Vector3::new(0.0, 0.76, 0.59))
                .with_charge(0.6)
                .with_shells(vec![contraction(ShellType::S)]);

            let mut molecule = Molecule::new(vec![heavy, light]);
            molecule.normalize_shells();

            let n_basis = molecule.n_basis(crate::basis::BasisFamily::Gaussian);
            let orbital = |seed: f64, occupation: f64| {
                let coefficients = (0..n_basis)
                    .map(|i| ((i as f64 + 1.0) * seed).sin() * 0.3)
                    .collect();
                MolecularOrbital::new(-seed, occupation, coefficients)
            };

            Self {
                name: "all shells".to_string(),
                molecule,
                wavefunction: Wavefunction::new(
                    OrbitalSource::Gaussian,
                    vec![orbital(0.7, 2.0), orbital(1.3, 2.0), orbital(2.1, 1.0), orbital(2.9, 0.0)],
                ),
            }
        }
    }
}
