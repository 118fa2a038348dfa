//! Scalar fields over space: orbital amplitude, electron density, spin density and the
//! molecular electrostatic potential.
//!
//! [`ScalarField::select`] decides once, before any point is evaluated, how a requested
//! [`ScalarKind`] is computed for the basis family of a wavefunction. Per point state lives
//! in an [`EvaluationContext`], so one field can be shared between threads as long as each
//! thread brings its own context.

mod mep;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub use mep::{electrostatic_potential, SINGULARITY};

use crate::{
    basis::{evaluate_molecule, BasisFamily},
    density::{build_density_matrix, DensityKind, DensityMatrix, DensitySource},
    error::GridError,
    molecule::Molecule,
    orbitals::{MolecularOrbital, OrbitalSource, Wavefunction},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarKind {
    /// Amplitude of a single molecular orbital
    OrbitalValue,
    ElectronDensity,
    SpinDensity,
    /// Potential of the nuclear point charges
    ElectrostaticPotential,
}

/// What to compute: the kind of scalar, the orbital for [`ScalarKind::OrbitalValue`] (an
/// index into `[alpha..., beta...]`), and where density matrices come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldRequest {
    pub kind: ScalarKind,
    pub orbital: Option<usize>,
    pub density_source: DensitySource,
}

impl FieldRequest {
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            orbital: None,
            density_source: DensitySource::default(),
        }
    }

    pub fn orbital(index: usize) -> Self {
        Self {
            orbital: Some(index),
            ..Self::new(ScalarKind::OrbitalValue)
        }
    }

    pub fn with_density_source(mut self, density_source: DensitySource) -> Self {
        self.density_source = density_source;
        self
    }
}

/// Scratch buffer for the basis function values at the current point.
#[derive(Clone, Debug, Default)]
pub struct EvaluationContext {
    chi: Vec<f64>,
}

impl EvaluationContext {
    pub fn chi(&self) -> &[f64] {
        &self.chi
    }
}

#[derive(Debug)]
enum Evaluator<'a> {
    /// `Σ_i c_i chi_i`
    Orbital(&'a [f64]),
    /// `chiᵀ D chi`
    Density(DensityMatrix),
    /// `Σ_k w_k (Σ_i c_ki chi_i)²`
    OrbitalSquares(Vec<(f64, &'a [f64])>),
    Electrostatic,
}

/// A point evaluator for one scalar kind over one molecule.
#[derive(Debug)]
pub struct ScalarField<'a> {
    molecule: &'a Molecule,
    kind: ScalarKind,
    /// `None` for the electrostatic potential, which needs no basis functions
    family: Option<BasisFamily>,
    n_basis: usize,
    evaluator: Evaluator<'a>,
}

impl<'a> ScalarField<'a> {
    /// The nuclear electrostatic potential. Needs no orbital data.
    pub fn electrostatic(molecule: &'a Molecule) -> Self {
        Self {
            molecule,
            kind: ScalarKind::ElectrostaticPotential,
            family: None,
            n_basis: 0,
            evaluator: Evaluator::Electrostatic,
        }
    }

    /// Picks the evaluator for `request`.
    ///
    /// Returns `Ok(None)` when a kind other than the electrostatic potential is requested
    /// but there are no orbitals to evaluate, or when ADF orbitals come without coefficients.
    pub fn select(
        molecule: &'a Molecule,
        wavefunction: Option<&'a Wavefunction>,
        request: &FieldRequest,
    ) -> Result<Option<Self>, GridError> {
        if request.kind == ScalarKind::ElectrostaticPotential {
            return Ok(Some(Self::electrostatic(molecule)));
        }

        let Some(wavefunction) = wavefunction.filter(|wfn| !wfn.alpha().is_empty()) else {
            log::warn!("no orbitals available, can't compute {:?}", request.kind);
            return Ok(None);
        };

        // ADF output often lists only eigenvalues and occupations
        if wavefunction.source() == OrbitalSource::Adf && !wavefunction.has_coefficients() {
            log::warn!("ADF orbitals carry no coefficients, can't compute {:?}", request.kind);
            return Ok(None);
        }

        let family = wavefunction
            .basis_family()
            .ok_or(GridError::UnsupportedBasisFamily(wavefunction.source()))?;
        let n_basis = molecule.n_basis(family);

        let evaluator = match request.kind {
            ScalarKind::OrbitalValue => {
                let index = request.orbital.ok_or(GridError::OrbitalNotSelected)?;
                let (spin, orbital) =
                    wavefunction
                        .orbital(index)
                        .ok_or(GridError::MissingOrbital {
                            index,
                            available: wavefunction.n_orbitals(),
                        })?;
                log::debug!("evaluating {spin:?} orbital {index}");
                Evaluator::Orbital(&orbital.coefficients)
            }
            ScalarKind::ElectronDensity if family == BasisFamily::Gaussian => {
                Evaluator::Density(build_density_matrix(
                    wavefunction,
                    n_basis,
                    DensityKind::Electron,
                    request.density_source,
                )?)
            }
            ScalarKind::SpinDensity if family == BasisFamily::Gaussian => {
                if wavefunction.is_unrestricted() {
                    Evaluator::Density(build_density_matrix(
                        wavefunction,
                        n_basis,
                        DensityKind::Spin,
                        request.density_source,
                    )?)
                } else {
                    Evaluator::OrbitalSquares(singly_occupied(wavefunction.alpha()))
                }
            }
            ScalarKind::ElectronDensity => Evaluator::OrbitalSquares(occupied_terms(wavefunction)),
            ScalarKind::SpinDensity => Evaluator::OrbitalSquares(slater_spin_terms(wavefunction)?),
            ScalarKind::ElectrostaticPotential => Evaluator::Electrostatic,
        };

        let coefficient_counts: Vec<usize> = match &evaluator {
            Evaluator::Orbital(coefficients) => vec![coefficients.len()],
            Evaluator::OrbitalSquares(terms) => terms.iter().map(|(_, c)| c.len()).collect(),
            Evaluator::Density(_) | Evaluator::Electrostatic => Vec::new(),
        };
        if let Some(&found) = coefficient_counts.iter().find(|&&count| count != n_basis) {
            return Err(GridError::CoefficientCountMismatch {
                expected: n_basis,
                found,
            });
        }

        log::debug!(
            "selected {:?} evaluator for a {family:?} basis of {n_basis} functions",
            request.kind
        );

        Ok(Some(Self {
            molecule,
            kind: request.kind,
            family: Some(family),
            n_basis,
            evaluator,
        }))
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn family(&self) -> Option<BasisFamily> {
        self.family
    }

    pub fn molecule(&self) -> &'a Molecule {
        self.molecule
    }

    /// A fresh scratch context sized for this field.
    pub fn context(&self) -> EvaluationContext {
        EvaluationContext {
            chi: vec![0.0; self.n_basis],
        }
    }

    /// Value of the field at `point` (Angstrom).
    #[inline]
    pub fn evaluate(&self, context: &mut EvaluationContext, point: &Vector3<f64>) -> f64 {
        match &self.evaluator {
            Evaluator::Electrostatic => electrostatic_potential(self.molecule, point),
            Evaluator::Orbital(coefficients) => dot(coefficients, self.chi(context, point)),
            Evaluator::Density(density) => density.contract(self.chi(context, point)),
            Evaluator::OrbitalSquares(terms) => {
                let chi = self.chi(context, point);
                terms
                    .iter()
                    .map(|(weight, coefficients)| {
                        let value = dot(coefficients, chi);
                        weight * value * value
                    })
                    .sum()
            }
        }
    }

    fn chi<'c>(&self, context: &'c mut EvaluationContext, point: &Vector3<f64>) -> &'c [f64] {
        context.chi.resize(self.n_basis, 0.0);
        if let Some(family) = self.family {
            evaluate_molecule(family, self.molecule, point, &mut context.chi);
        }
        &context.chi
    }
}

#[inline(always)]
fn dot(coefficients: &[f64], chi: &[f64]) -> f64 {
    coefficients.iter().zip(chi).map(|(c, x)| c * x).sum()
}

fn singly_occupied(orbitals: &[MolecularOrbital]) -> Vec<(f64, &[f64])> {
    orbitals
        .iter()
        .filter(|mo| mo.occupation == 1.0)
        .map(|mo| (1.0, mo.coefficients.as_slice()))
        .collect()
}

fn occupied(orbitals: &[MolecularOrbital], sign: f64) -> impl Iterator<Item = (f64, &[f64])> {
    orbitals
        .iter()
        .filter(|mo| mo.occupation > 0.0)
        .map(move |mo| (sign * mo.occupation, mo.coefficients.as_slice()))
}

fn occupied_terms(wavefunction: &Wavefunction) -> Vec<(f64, &[f64])> {
    occupied(wavefunction.alpha(), 1.0)
        .chain(occupied(wavefunction.beta().unwrap_or_default(), 1.0))
        .collect()
}

/// Spin density terms for the Slater families: alpha minus beta if beta orbitals exist,
/// otherwise the singly occupied alpha orbitals of an open shell system.
fn slater_spin_terms(wavefunction: &Wavefunction) -> Result<Vec<(f64, &[f64])>, GridError> {
    match wavefunction.beta() {
        Some(beta) => Ok(occupied(wavefunction.alpha(), 1.0)
            .chain(occupied(beta, -1.0))
            .collect()),
        None if wavefunction.n_alpha() != wavefunction.n_beta() => {
            Ok(singly_occupied(wavefunction.alpha()))
        }
        None => Err(GridError::MissingBetaOrbitals),
    }
}
