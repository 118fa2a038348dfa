use crate::{error::GridError, utils::try_zeroed};

use super::{GridSpec, Volume};

/// Receives the values of a scan one z slice at a time.
///
/// A slice handed over with `complete == false` was interrupted by cancellation: entries
/// that were not evaluated hold zero and no further slices follow.
pub trait GridSink {
    type Output;

    fn begin(&mut self, _grid: &GridSpec) -> Result<(), GridError> {
        Ok(())
    }

    fn slice(&mut self, k: usize, values: &[f64], complete: bool) -> Result<(), GridError>;

    fn finish(self) -> Result<Self::Output, GridError>;
}

/// Collects every slice into an in-memory [`Volume`].
#[derive(Debug)]
pub struct VolumeSink {
    grid: GridSpec,
    values: Vec<f64>,
}

impl VolumeSink {
    pub fn new(grid: &GridSpec) -> Result<Self, GridError> {
        Ok(Self {
            grid: grid.clone(),
            values: try_zeroed(grid.n_points(), "output volume")?,
        })
    }
}

impl GridSink for VolumeSink {
    type Output = Volume;

    fn slice(&mut self, k: usize, values: &[f64], _complete: bool) -> Result<(), GridError> {
        let start = k * self.grid.slice_len();
        self.values[start..start + values.len()].copy_from_slice(values);
        Ok(())
    }

    fn finish(self) -> Result<Volume, GridError> {
        Ok(Volume::new(self.grid, self.values))
    }
}
