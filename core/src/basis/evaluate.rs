//! Evaluation of basis function ("chi") values at a point.
//!
//! Every routine here writes into a caller-provided slice and allocates nothing, so a
//! single scratch buffer can be reused for every point of a grid scan.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{atom::Atom, molecule::Molecule, utils::int_pow};

use super::{Shell, ShellType, Slater, SlaterShell};

/// The kind of primitive functions the orbital coefficients of a wavefunction refer to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasisFamily {
    /// Contracted gaussian shells
    Gaussian,
    /// Slater primitives expanded per angular shell (PRDDO, ZINDO, MOS output)
    Prddo,
    /// Slater primitives with explicit powers, one function each (Molden output)
    Slater,
}

impl BasisFamily {
    /// Number of basis functions `atom` contributes in this family.
    pub fn function_count(self, atom: &Atom) -> usize {
        match self {
            Self::Gaussian => atom.shells.iter().map(Shell::function_count).sum(),
            Self::Prddo => atom
                .slaters
                .iter()
                .map(|slater| slater.shell.function_count())
                .sum(),
            Self::Slater => atom.slaters.len(),
        }
    }
}

/// Writes the chi values of the basis functions centered on `atom` at `point` (Angstrom)
/// into `chi`, which must hold exactly `family.function_count(atom)` values.
pub fn evaluate_atom(family: BasisFamily, atom: &Atom, point: &Vector3<f64>, chi: &mut [f64]) {
    let written = fill_atom(family, atom, point, chi);
    debug_assert_eq!(written, chi.len(), "chi slice does not match the atom's basis");
}

/// Writes the chi values of every basis function in the molecule at `point`, atom after
/// atom. `chi` must hold `molecule.n_basis(family)` values.
pub fn evaluate_molecule(
    family: BasisFamily,
    molecule: &Molecule,
    point: &Vector3<f64>,
    chi: &mut [f64],
) {
    let mut offset = 0;
    for atom in &molecule.atoms {
        offset += fill_atom(family, atom, point, &mut chi[offset..]);
    }
    debug_assert_eq!(offset, chi.len(), "chi buffer does not match the molecule's basis");
}

fn fill_atom(family: BasisFamily, atom: &Atom, point: &Vector3<f64>, chi: &mut [f64]) -> usize {
    let displacement = atom.displacement(point);
    match family {
        BasisFamily::Gaussian => gaussian_shells(&atom.shells, &displacement, chi),
        BasisFamily::Prddo => prddo_shells(&atom.slaters, &displacement, chi),
        BasisFamily::Slater => slater_primitives(&atom.slaters, &displacement, chi),
    }
}

fn gaussian_shells(shells: &[Shell], displacement: &Vector3<f64>, chi: &mut [f64]) -> usize {
    let (x, y, z) = (displacement.x, displacement.y, displacement.z);
    let r2 = displacement.norm_squared();

    let mut offset = 0;
    for shell in shells {
        let count = shell.function_count();
        let out = &mut chi[offset..offset + count];
        out.fill(0.0);

        match shell.shell_type {
            ShellType::S => {
                for g in &shell.primitives {
                    out[0] += g.coefficient * (-r2 * g.exponent).exp();
                }
            }
            ShellType::SP => {
                for g in &shell.primitives {
                    let radial = (-r2 * g.exponent).exp();
                    out[0] += g.coefficient * radial;
                    out[1] += g.coefficient_p * x * radial;
                    out[2] += g.coefficient_p * y * radial;
                    out[3] += g.coefficient_p * z * radial;
                }
            }
            ShellType::P => {
                for g in &shell.primitives {
                    let radial = g.coefficient * (-r2 * g.exponent).exp();
                    out[0] += x * radial;
                    out[1] += y * radial;
                    out[2] += z * radial;
                }
            }
            ShellType::D5 => {
                for g in &shell.primitives {
                    let radial = g.coefficient * (-r2 * g.exponent).exp();
                    out[0] += 0.288675135 * (2.0 * z * z - x * x - y * y) * radial;
                    out[1] += x * z * radial;
                    out[2] += y * z * radial;
                    out[3] += 0.5 * (x * x - y * y) * radial;
                    out[4] += x * y * radial;
                }
            }
            ShellType::D6 => {
                for g in &shell.primitives {
                    let radial = g.coefficient * (-r2 * g.exponent).exp();
                    out[0] += radial * x * x * 0.57735027;
                    out[1] += radial * y * y * 0.57735027;
                    out[2] += radial * z * z * 0.57735027;
                    out[3] += radial * x * y;
                    out[4] += radial * x * z;
                    out[5] += radial * y * z;
                }
            }
            ShellType::F7 => {
                for g in &shell.primitives {
                    let radial = (-r2 * g.exponent).exp() * g.coefficient;
                    out[0] += radial * z * (5.0 * z * z - 3.0 * r2);
                    out[1] += radial * x * (5.0 * z * z - r2);
                    out[2] += radial * y * (5.0 * z * z - r2);
                    out[3] += radial * z * (x * x - y * y);
                    out[4] += radial * x * y * z;
                    out[5] += radial * (x * x * x - 3.0 * x * y * y);
                    out[6] += radial * (3.0 * x * x * y - y * y * y);
                }
            }
            ShellType::F10 => {
                for g in &shell.primitives {
                    let radial = g.coefficient * (-r2 * g.exponent).exp();
                    out[0] += radial * x * x * x * 0.25819889;
                    out[1] += radial * y * y * y * 0.25819889;
                    out[2] += radial * z * z * z * 0.25819889;
                    out[3] += radial * x * x * y * 0.57735027;
                    out[4] += radial * x * x * z * 0.57735027;
                    out[5] += radial * x * y * y * 0.57735027;
                    out[6] += radial * y * y * z * 0.57735027;
                    out[7] += radial * x * z * z * 0.57735027;
                    out[8] += radial * y * z * z * 0.57735027;
                    out[9] += radial * x * y * z;
                }
            }
        }

        offset += count;
    }

    offset
}

fn prddo_shells(slaters: &[Slater], displacement: &Vector3<f64>, chi: &mut [f64]) -> usize {
    let (x, y, z) = (displacement.x, displacement.y, displacement.z);
    let r2 = displacement.norm_squared();
    let r = r2.sqrt();

    let mut offset = 0;
    for slater in slaters {
        let radial = (-slater.exponent * r).exp();
        let norm = &slater.norm;

        match slater.shell {
            SlaterShell::S => {
                chi[offset] = int_pow(r, slater.n - 1) * radial * norm[0];
            }
            // p components are stored z, x, y
            SlaterShell::P => {
                let radial = int_pow(r, slater.n - 2) * radial * norm[1];
                chi[offset] = z * radial;
                chi[offset + 1] = x * radial;
                chi[offset + 2] = y * radial;
            }
            SlaterShell::D => {
                let radial = int_pow(r, slater.n - 3) * radial;
                chi[offset] = (3.0 * z * z - r2) * norm[3] * radial;
                chi[offset + 1] = x * z * norm[4] * radial;
                chi[offset + 2] = (x * x - y * y) * norm[2] * radial;
                chi[offset + 3] = y * z * norm[4] * radial;
                chi[offset + 4] = x * y * norm[4] * radial;
            }
        }

        offset += slater.shell.function_count();
    }

    offset
}

fn slater_primitives(slaters: &[Slater], displacement: &Vector3<f64>, chi: &mut [f64]) -> usize {
    let (x, y, z) = (displacement.x, displacement.y, displacement.z);
    let r = displacement.norm();

    for (value, slater) in chi.iter_mut().zip(slaters) {
        *value = slater.norm[0]
            * int_pow(x, slater.a as i32)
            * int_pow(y, slater.b as i32)
            * int_pow(z, slater.c as i32)
            * int_pow(r, slater.d as i32)
            * (-slater.exponent * r).exp();
    }

    slaters.len()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::{
        atom::{Atom, BOHR},
        basis::Gaussian,
    };

    const ALL_SHELLS: [ShellType; 7] = [
        ShellType::S,
        ShellType::SP,
        ShellType::P,
        ShellType::D5,
        ShellType::D6,
        ShellType::F7,
        ShellType::F10,
    ];

    fn single_shell_atom(shell_type: ShellType) -> Atom {
        Atom::new(6, Vector3::zeros()).with_shells(vec![Shell::new(
            shell_type,
            [Gaussian::with_p_coefficient(1.0, 1.0, 1.0)],
        )])
    }

    fn chi_at(family: BasisFamily, atom: &Atom, point: Vector3<f64>) -> Vec<f64> {
        let mut chi = vec![f64::NAN; family.function_count(atom)];
        evaluate_atom(family, atom, &point, &mut chi);
        chi
    }

    #[test]
    fn values_at_nucleus_are_finite() {
        for shell_type in ALL_SHELLS {
            let atom = single_shell_atom(shell_type);
            let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::zeros());

            assert_eq!(chi.len(), shell_type.function_count());
            assert!(chi.iter().all(|v| v.is_finite()), "{shell_type:?}: {chi:?}");
        }
    }

    #[test]
    fn s_shell_sums_contraction() {
        let atom = Atom::new(1, Vector3::zeros()).with_shells(vec![Shell::new(
            ShellType::S,
            [Gaussian::new(1.0, 0.25), Gaussian::new(3.0, 0.5)],
        )]);

        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::zeros());
        assert_relative_eq!(chi[0], 0.75);

        // one bohr away
        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::new(BOHR, 0.0, 0.0));
        assert_relative_eq!(chi[0], 0.25 * (-1.0f64).exp() + 0.5 * (-3.0f64).exp(), epsilon = 1e-8);
    }

    #[test]
    fn p_functions_follow_xyz_order() {
        let atom = single_shell_atom(ShellType::P);
        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::new(0.0, BOHR, 0.0));

        assert_relative_eq!(chi[0], 0.0);
        assert_relative_eq!(chi[1], (-1.0f64).exp(), epsilon = 1e-8);
        assert_relative_eq!(chi[2], 0.0);
    }

    #[test]
    fn sp_shell_emits_s_then_p() {
        let atom = Atom::new(6, Vector3::zeros()).with_shells(vec![Shell::new(
            ShellType::SP,
            [Gaussian::with_p_coefficient(1.0, 2.0, 3.0)],
        )]);
        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::new(0.0, 0.0, BOHR));
        let radial = (-1.0f64).exp();

        assert_relative_eq!(chi[0], 2.0 * radial, epsilon = 1e-8);
        assert_relative_eq!(chi[1], 0.0);
        assert_relative_eq!(chi[2], 0.0);
        assert_relative_eq!(chi[3], 3.0 * radial, epsilon = 1e-8);
    }

    #[test]
    fn spherical_d_along_z_is_pure_z2() {
        let atom = single_shell_atom(ShellType::D5);
        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::new(0.0, 0.0, BOHR));

        assert_relative_eq!(chi[0], 0.288675135 * 2.0 * (-1.0f64).exp(), epsilon = 1e-8);
        for value in &chi[1..] {
            assert_relative_eq!(*value, 0.0);
        }
    }

    #[test]
    fn spherical_d_ordering() {
        let atom = single_shell_atom(ShellType::D5);
        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::new(BOHR, BOHR, 0.0));
        let radial = (-2.0f64).exp();

        assert_relative_eq!(chi[0], 0.288675135 * -2.0 * radial, epsilon = 1e-8);
        assert_relative_eq!(chi[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(chi[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(chi[3], 0.0, epsilon = 1e-8);
        assert_relative_eq!(chi[4], radial, epsilon = 1e-8);
    }

    #[test]
    fn cartesian_f_along_x_is_pure_xxx() {
        let atom = single_shell_atom(ShellType::F10);
        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::new(BOHR, 0.0, 0.0));

        assert_relative_eq!(chi[0], 0.25819889 * (-1.0f64).exp(), epsilon = 1e-8);
        for value in &chi[1..] {
            assert_relative_eq!(*value, 0.0);
        }
    }

    #[test]
    fn spherical_f_along_z() {
        let atom = single_shell_atom(ShellType::F7);
        let chi = chi_at(BasisFamily::Gaussian, &atom, Vector3::new(0.0, 0.0, BOHR));

        // z (5z² - 3r²) = 2 at one bohr
        assert_relative_eq!(chi[0], 2.0 * (-1.0f64).exp(), epsilon = 1e-7);
        for value in &chi[1..] {
            assert_relative_eq!(*value, 0.0);
        }
    }

    /// Chi of a diffuse single-primitive shell at (1, 2, 3) bohr, with the
    /// shared radial factor `exp(-0.05 * 14)` divided out.
    fn angular_at_123(shell_type: ShellType) -> Vec<f64> {
        let atom = Atom::new(6, Vector3::zeros())
            .with_shells(vec![Shell::new(shell_type, [Gaussian::new(0.05, 1.0)])]);
        let radial = (-0.7f64).exp();

        chi_at(BasisFamily::Gaussian, &atom, Vector3::new(BOHR, 2.0 * BOHR, 3.0 * BOHR))
            .into_iter()
            .map(|value| value / radial)
            .collect()
    }

    fn assert_components(shell_type: ShellType, expected: &[f64]) {
        let angular = angular_at_123(shell_type);
        assert_eq!(angular.len(), expected.len());
        for (i, (value, expected)) in angular.iter().zip(expected).enumerate() {
            assert!(
                approx::relative_eq!(*value, *expected, max_relative = 1e-6),
                "{shell_type:?}[{i}]: {value} != {expected}"
            );
        }
    }

    #[test]
    fn spherical_d_off_axis_components() {
        assert_components(ShellType::D5, &[0.288675135 * 13.0, 3.0, 6.0, -1.5, 2.0]);
    }

    #[test]
    fn cartesian_d_off_axis_components() {
        let c = 0.57735027;
        assert_components(ShellType::D6, &[c, 4.0 * c, 9.0 * c, 2.0, 3.0, 6.0]);
    }

    #[test]
    fn spherical_f_off_axis_components() {
        // z(5z² - 3r²), x(5z² - r²), y(5z² - r²), z(x² - y²), xyz, x³ - 3xy², 3x²y - y³
        assert_components(ShellType::F7, &[9.0, 31.0, 62.0, -9.0, 6.0, -11.0, -2.0]);
    }

    #[test]
    fn cartesian_f_off_axis_components() {
        let (a, c) = (0.25819889, 0.57735027);
        // xxx yyy zzz xxy xxz xyy yyz xzz yzz xyz
        assert_components(
            ShellType::F10,
            &[a, 8.0 * a, 27.0 * a, 2.0 * c, 3.0 * c, 4.0 * c, 12.0 * c, 9.0 * c, 18.0 * c, 6.0],
        );
    }

    #[test]
    fn molecule_concatenates_atoms_in_order() {
        let first = single_shell_atom(ShellType::P);
        let second = Atom::new(1, Vector3::new(0.0, 0.0, 1.0)).with_shells(vec![Shell::new(
            ShellType::S,
            [Gaussian::new(0.5, 1.0)],
        )]);
        let molecule = Molecule::new(vec![first.clone(), second.clone()]);
        let point = Vector3::new(0.3, -0.1, 0.4);

        let mut chi = vec![0.0; molecule.n_basis(BasisFamily::Gaussian)];
        evaluate_molecule(BasisFamily::Gaussian, &molecule, &point, &mut chi);

        assert_eq!(chi.len(), 4);
        assert_eq!(&chi[..3], chi_at(BasisFamily::Gaussian, &first, point).as_slice());
        assert_eq!(&chi[3..], chi_at(BasisFamily::Gaussian, &second, point).as_slice());
    }

    #[test]
    fn slater_primitive_at_nucleus_uses_zero_to_the_zero() {
        let atom = Atom::new(1, Vector3::zeros())
            .with_slaters(vec![Slater::cartesian([0, 0, 0, 0], 1.3, 0.9)]);
        let chi = chi_at(BasisFamily::Slater, &atom, Vector3::zeros());

        assert_relative_eq!(chi[0], 0.9);
    }

    #[test]
    fn slater_primitive_powers() {
        let atom = Atom::new(1, Vector3::zeros())
            .with_slaters(vec![Slater::cartesian([1, 0, 0, 1], 1.0, 2.0)]);
        let chi = chi_at(BasisFamily::Slater, &atom, Vector3::new(2.0 * BOHR, 0.0, 0.0));

        // x = r = 2 bohr
        assert_relative_eq!(chi[0], 2.0 * 2.0 * 2.0 * (-2.0f64).exp(), epsilon = 1e-7);
    }

    #[test]
    fn prddo_p_shell_is_stored_z_x_y() {
        let atom = Atom::new(6, Vector3::zeros())
            .with_slaters(vec![Slater::shell(SlaterShell::P, 2, 1.0, [1.0; 5])]);
        let chi = chi_at(BasisFamily::Prddo, &atom, Vector3::new(BOHR, 0.0, 0.0));

        assert_eq!(chi.len(), 3);
        assert_relative_eq!(chi[0], 0.0);
        assert_relative_eq!(chi[1], (-1.0f64).exp(), epsilon = 1e-8);
        assert_relative_eq!(chi[2], 0.0);
    }

    #[test]
    fn prddo_d_shell_uses_component_norms() {
        let norm = [1.0, 1.0, 2.0, 3.0, 5.0];
        let atom = Atom::new(26, Vector3::zeros())
            .with_slaters(vec![Slater::shell(SlaterShell::D, 3, 1.0, norm)]);
        let chi = chi_at(BasisFamily::Prddo, &atom, Vector3::new(BOHR, BOHR, 0.0));
        let radial = (-(2.0f64).sqrt()).exp();

        assert_relative_eq!(chi[0], -2.0 * 3.0 * radial, epsilon = 1e-7);
        assert_relative_eq!(chi[2], 0.0, epsilon = 1e-7);
        assert_relative_eq!(chi[4], 5.0 * radial, epsilon = 1e-7);
    }
}
