use thiserror::Error;

use crate::orbitals::OrbitalSource;

/// The error type for every fallible density and grid operation in this crate.
///
/// None of these are fatal to the host process: each one aborts only the single density
/// build or scan that produced it. A cancelled scan is not an error, see
/// [`ScanStatus`](crate::grid::ScanStatus).
#[derive(Error, Debug)]
pub enum GridError {
    /// The lattice step along an axis is `extent / (n - 1)`, so every axis needs two points.
    #[error("grid resolution along {axis} must be at least 2, got {count}")]
    InvalidResolution { axis: char, count: usize },

    #[error("grid cube size must be a positive, finite length, got {0}")]
    InvalidCubeSize(f64),

    /// The number of grid points does not fit in `usize`.
    #[error("a grid with {resolution:?} points per axis has too many points")]
    GridTooLarge { resolution: [usize; 3] },

    #[error("orbitals from {0:?} have no basis-function evaluator")]
    UnsupportedBasisFamily(OrbitalSource),

    /// The density matrix could not be built from the selected data source.
    #[error("density matrix is not available from the selected data source")]
    MissingDensityMatrix,

    #[error("spin density from density matrices requires a beta density matrix")]
    MissingBetaDensity,

    #[error("spin density requires beta orbitals or unequal alpha and beta electron counts")]
    MissingBetaOrbitals,

    #[error("no orbital selected for an orbital value calculation")]
    OrbitalNotSelected,

    #[error("orbital {index} does not exist, {available} orbitals are available")]
    MissingOrbital { index: usize, available: usize },

    #[error("orbital has {found} coefficients but the basis has {expected} functions")]
    CoefficientCountMismatch { expected: usize, found: usize },

    #[error("density matrix has dimension {found} but the basis has {expected} functions")]
    DensitySizeMismatch { expected: usize, found: usize },

    #[error("can't allocate {elements} values for the {what}")]
    Allocation { what: &'static str, elements: usize },

    /// A Fortran-style record length prefix or suffix did not match the expected length.
    #[error("malformed grid file record: expected length {expected}, found {found}")]
    MalformedRecord { expected: i32, found: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
