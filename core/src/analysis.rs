//! Field evaluation at arbitrary points rather than on a grid.

use nalgebra::Vector3;

use crate::{
    error::GridError,
    field::{FieldRequest, ScalarField, ScalarKind},
    molecule::Molecule,
    orbitals::Wavefunction,
};

/// Field values at a list of points, e.g. the vertices of a surface to be colored.
#[derive(Clone, Debug, PartialEq)]
pub struct PointValues {
    pub kind: ScalarKind,
    pub values: Vec<f64>,
}

impl PointValues {
    /// `(min, max)` of the values, `None` if there are none.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |range, &value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
    }
}

pub fn evaluate_points(field: &ScalarField, points: &[Vector3<f64>]) -> PointValues {
    let mut context = field.context();
    let values = points
        .iter()
        .map(|point| field.evaluate(&mut context, point))
        .collect();

    PointValues {
        kind: field.kind(),
        values,
    }
}

/// Spin density at every nucleus, in atom order. `None` without orbitals.
pub fn atomic_spin_densities(
    molecule: &Molecule,
    wavefunction: Option<&Wavefunction>,
) -> Result<Option<Vec<f64>>, GridError> {
    let request = FieldRequest::new(ScalarKind::SpinDensity);
    let Some(field) = ScalarField::select(molecule, wavefunction, &request)? else {
        return Ok(None);
    };

    let nuclei: Vec<_> = molecule.atoms().iter().map(|atom| *atom.position()).collect();
    Ok(Some(evaluate_points(&field, &nuclei).values))
}
