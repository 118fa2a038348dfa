use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{error::GridError, molecule::Molecule};

use super::GridSpec;

/// Distance every face of the box is pushed out from the outermost atom, in Angstrom
pub const DEFAULT_MARGIN: f64 = 1.5;
/// Edge length of one grid cell used to derive a resolution, in Angstrom
pub const DEFAULT_CUBE_SIZE: f64 = 0.25;

/// An axis aligned box in Angstrom.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl BoundingBox {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn is_normalized(&self) -> bool {
        self.min.iter().zip(self.max.iter()).all(|(lo, hi)| lo <= hi)
    }

    /// Swaps the bounds of every axis where `min > max`. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut swapped = false;
        for axis in 0..3 {
            if self.min[axis] > self.max[axis] {
                std::mem::swap(&mut self.min[axis], &mut self.max[axis]);
                swapped = true;
            }
        }
        swapped
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// `[xmin, xmax, ymin, ymax, zmin, zmax]` as stored in the legacy grid file.
    pub fn to_legacy(&self) -> [f32; 6] {
        [
            self.min.x as f32,
            self.max.x as f32,
            self.min.y as f32,
            self.max.y as f32,
            self.min.z as f32,
            self.max.z as f32,
        ]
    }

    pub fn from_legacy(dim: [f32; 6]) -> Self {
        let [x1, x2, y1, y2, z1, z2] = dim.map(f64::from);
        Self::new(Vector3::new(x1, y1, z1), Vector3::new(x2, y2, z2))
    }
}

/// Builds padded boxes around molecules and derives grid resolutions from a cube size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxBuilder {
    margin: f64,
    cube_size: f64,
}

impl Default for BoxBuilder {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            cube_size: DEFAULT_CUBE_SIZE,
        }
    }
}

impl BoxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_cube_size(mut self, cube_size: f64) -> Self {
        self.cube_size = cube_size;
        self
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn cube_size(&self) -> f64 {
        self.cube_size
    }

    /// The tight box around all nuclei grown by the margin on every side, `None` for a
    /// molecule without atoms.
    pub fn build(&self, molecule: &Molecule) -> Option<BoundingBox> {
        let mut positions = molecule.atoms().iter().map(|atom| atom.position());
        let first = *positions.next()?;

        let (min, max) = positions.fold((first, first), |(min, max), position| {
            (min.inf(position), max.sup(position))
        });
        let margin = Vector3::repeat(self.margin);

        Some(BoundingBox::new(min - margin, max + margin))
    }

    /// `ceil(extent / cube_size) + 1` points per axis.
    ///
    /// The cube size has to be a positive, finite length and every axis count has to fit in
    /// `usize`, otherwise this returns [`GridError::InvalidCubeSize`].
    pub fn resolution(&self, bounds: &BoundingBox) -> Result<[usize; 3], GridError> {
        let cube_size = self.cube_size;
        if !cube_size.is_finite() || cube_size <= 0.0 {
            return Err(GridError::InvalidCubeSize(cube_size));
        }

        let extent = bounds.extent();
        let mut resolution = [0; 3];
        for (count, length) in resolution.iter_mut().zip([extent.x, extent.y, extent.z]) {
            let cells = (length.abs() / cube_size).ceil();
            // `usize::MAX as f64` rounds up, so `<` keeps the cast exact
            if !cells.is_finite() || cells >= usize::MAX as f64 {
                return Err(GridError::InvalidCubeSize(cube_size));
            }
            *count = (cells as usize)
                .checked_add(1)
                .ok_or(GridError::InvalidCubeSize(cube_size))?;
        }

        Ok(resolution)
    }

    /// A grid over `bounds` with the resolution derived from the cube size.
    pub fn grid(&self, bounds: BoundingBox) -> Result<GridSpec, GridError> {
        let bounds = bounds.normalized();
        GridSpec::new(bounds, self.resolution(&bounds)?)
    }
}
