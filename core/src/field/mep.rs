use nalgebra::Vector3;

use crate::molecule::Molecule;

/// Value returned when the evaluation point sits exactly on a charged nucleus.
pub const SINGULARITY: f64 = 10000.0;

/// Molecular electrostatic potential of the nuclear point charges at `point` (Angstrom),
/// in atomic units: `Σ charge / r`.
///
/// A point exactly on a positively (negatively) charged nucleus returns `+SINGULARITY`
/// (`-SINGULARITY`) immediately. A neutral atom at zero distance contributes nothing.
pub fn electrostatic_potential(molecule: &Molecule, point: &Vector3<f64>) -> f64 {
    let mut potential = 0.0;

    for atom in molecule.atoms() {
        let r2 = atom.displacement(point).norm_squared();

        if r2 == 0.0 {
            if atom.charge() > 0.0 {
                return SINGULARITY;
            } else if atom.charge() < 0.0 {
                return -SINGULARITY;
            }
        } else {
            potential += atom.charge() / r2.sqrt();
        }
    }

    potential
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::atom::{Atom, BOHR};

    fn point_charge(charge: f64) -> Molecule {
        Molecule::new(vec![Atom::new(1, Vector3::zeros()).with_charge(charge)])
    }

    #[test]
    fn singularity_on_charged_nucleus() {
        assert_eq!(electrostatic_potential(&point_charge(1.0), &Vector3::zeros()), 10000.0);
        assert_eq!(electrostatic_potential(&point_charge(-0.3), &Vector3::zeros()), -10000.0);
    }

    #[test]
    fn neutral_nucleus_at_zero_distance_is_skipped() {
        let molecule = Molecule::new(vec![
            Atom::new(2, Vector3::zeros()),
            Atom::new(1, Vector3::new(BOHR, 0.0, 0.0)).with_charge(1.0),
        ]);

        assert_relative_eq!(
            electrostatic_potential(&molecule, &Vector3::zeros()),
            1.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn coulomb_potential_of_unit_charge() {
        let molecule = point_charge(1.0);

        assert_relative_eq!(
            electrostatic_potential(&molecule, &Vector3::new(BOHR, 0.0, 0.0)),
            1.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            electrostatic_potential(&molecule, &Vector3::new(0.0, 2.0 * BOHR, 0.0)),
            0.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn decreases_monotonically_with_distance() {
        let molecule = point_charge(2.0);
        let values: Vec<f64> = (1..20)
            .map(|i| electrostatic_potential(&molecule, &Vector3::new(0.0, 0.0, 5.0 + i as f64)))
            .collect();

        assert!(values.windows(2).all(|pair| pair[1] < pair[0]));
    }
}
