//! Regular grids over a bounding box and the scan that fills them with scalar field values.

mod bbox;
mod cancel;
mod macu;
mod scanner;
mod sink;

use nalgebra::Vector3;

pub use bbox::{BoundingBox, BoxBuilder, DEFAULT_CUBE_SIZE, DEFAULT_MARGIN};
pub use cancel::{is_cancelled, request_cancellation, CancellationToken};
pub use macu::{read_macu_header, read_macu_slice, MacuHeader, MacuWriter};
pub use scanner::GridScanner;
pub use sink::{GridSink, VolumeSink};

use crate::{error::GridError, field::ScalarKind};

/// A lattice of `nx * ny * nz` points spanning a bounding box, corners included.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    bounds: BoundingBox,
    resolution: [usize; 3],
}

impl GridSpec {
    /// Every axis needs at least two points, the spacing is `extent / (n - 1)`.
    /// The total point count must fit in `usize`.
    pub fn new(bounds: BoundingBox, resolution: [usize; 3]) -> Result<Self, GridError> {
        for (axis, count) in ['x', 'y', 'z'].into_iter().zip(resolution) {
            if count < 2 {
                return Err(GridError::InvalidResolution { axis, count });
            }
        }
        resolution
            .iter()
            .try_fold(1usize, |total, &count| total.checked_mul(count))
            .ok_or(GridError::GridTooLarge { resolution })?;

        Ok(Self { bounds, resolution })
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    /// Points in one z slice
    pub fn slice_len(&self) -> usize {
        self.resolution[0] * self.resolution[1]
    }

    pub fn n_points(&self) -> usize {
        self.resolution.iter().product()
    }

    pub fn origin(&self) -> Vector3<f64> {
        self.bounds.min
    }

    pub fn spacing(&self) -> Vector3<f64> {
        let [nx, ny, nz] = self.resolution;
        self.bounds
            .extent()
            .component_div(&Vector3::new((nx - 1) as f64, (ny - 1) as f64, (nz - 1) as f64))
    }

    /// Position of the lattice point `(i, j, k)`, x index first.
    #[inline]
    pub fn point(&self, i: usize, j: usize, k: usize) -> Vector3<f64> {
        self.origin() + self.spacing().component_mul(&Vector3::new(i as f64, j as f64, k as f64))
    }

    /// Offset of `(i, j, k)` in x-fastest storage.
    #[inline]
    pub fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        let [nx, ny, _] = self.resolution;
        (k * ny + j) * nx + i
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanStatus {
    Completed,
    /// Stopped early through the cancellation token. The values gathered so far are kept.
    Cancelled,
}

/// What a scan computed, how far it got and the value range it saw.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanSummary {
    pub kind: ScalarKind,
    pub status: ScanStatus,
    pub evaluated_points: usize,
    pub total_points: usize,
    pub min: f64,
    pub max: f64,
}

impl ScanSummary {
    pub(crate) fn new(kind: ScalarKind, total_points: usize) -> Self {
        Self {
            kind,
            status: ScanStatus::Completed,
            evaluated_points: 0,
            total_points,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub(crate) fn record(&mut self, value: f64) {
        self.evaluated_points += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub(crate) fn merge(mut self, other: Self) -> Self {
        self.evaluated_points += other.evaluated_points;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self
    }

    /// `(min, max)` of the evaluated values, `None` if nothing was evaluated.
    pub fn range(&self) -> Option<(f64, f64)> {
        (self.evaluated_points > 0).then_some((self.min, self.max))
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ScanStatus::Cancelled
    }
}

/// Dense scalar values on a grid, x fastest then y then z.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    grid: GridSpec,
    values: Vec<f64>,
}

impl Volume {
    pub(crate) fn new(grid: GridSpec, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), grid.n_points());
        Self { grid, values }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn resolution(&self) -> [usize; 3] {
        self.grid.resolution
    }

    pub fn origin(&self) -> Vector3<f64> {
        self.grid.origin()
    }

    pub fn spacing(&self) -> Vector3<f64> {
        self.grid.spacing()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let [nx, ny, nz] = self.grid.resolution;
        (i < nx && j < ny && k < nz).then(|| self.values[self.grid.offset(i, j, k)])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScanResult {
    pub volume: Volume,
    pub summary: ScanSummary,
}
