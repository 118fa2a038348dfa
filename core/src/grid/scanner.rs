use std::io::Write;

use crate::{
    error::GridError,
    field::{EvaluationContext, ScalarField, ScalarKind},
    utils::try_zeroed,
};

use super::{
    CancellationToken, GridSink, GridSpec, MacuWriter, ScanResult, ScanStatus, ScanSummary, VolumeSink,
};

type ProgressCallback<'p> = Box<dyn FnMut(usize, usize) + 'p>;

/// Fills a grid with the values of a [`ScalarField`], one z slice at a time.
///
/// The scanner polls its cancellation token before every point. A cancelled scan is not an
/// error: it returns what was evaluated so far with [`ScanStatus::Cancelled`]. The token is
/// cleared when a scan ends, so a request made before a scan starts cancels that scan.
///
/// Because the flag is only cleared at the end, a request that lands after one scan has
/// finished cancels whichever scan runs next on the same token, even if it was meant for
/// the finished one. Scans that must not be stopped by stale requests should get their own
/// token through [`GridScanner::with_cancellation`] instead of sharing the global one.
pub struct GridScanner<'p> {
    cancellation: CancellationToken,
    progress: Option<ProgressCallback<'p>>,
    last: Option<ScanSummary>,
}

impl Default for GridScanner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> GridScanner<'p> {
    /// A scanner listening to the process wide cancellation token.
    pub fn new() -> Self {
        Self::with_cancellation(CancellationToken::global().clone())
    }

    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            progress: None,
            last: None,
        }
    }

    /// Called with `(0, total)` before the first slice and `(nx * ny * (k + 1), total)`
    /// after slice `k` is done. Runs on the scanning thread.
    pub fn on_progress(mut self, progress: impl FnMut(usize, usize) + 'p) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn last_summary(&self) -> Option<&ScanSummary> {
        self.last.as_ref()
    }

    /// `(min, max)` of the last scan
    pub fn last_range(&self) -> Option<(f64, f64)> {
        self.last.as_ref().and_then(ScanSummary::range)
    }

    pub fn last_kind(&self) -> Option<ScalarKind> {
        self.last.as_ref().map(|summary| summary.kind)
    }

    /// Scan into an in-memory volume.
    pub fn scan_volume(&mut self, grid: &GridSpec, field: &ScalarField) -> Result<ScanResult, GridError> {
        let sink = VolumeSink::new(grid)?;
        let (volume, summary) = self.scan(grid, field, sink)?;
        Ok(ScanResult { volume, summary })
    }

    /// Scan straight into a legacy grid file.
    pub fn scan_to_writer<W: Write>(
        &mut self,
        grid: &GridSpec,
        field: &ScalarField,
        writer: W,
    ) -> Result<(W, ScanSummary), GridError> {
        self.scan(grid, field, MacuWriter::new(writer))
    }

    pub fn scan<S: GridSink>(
        &mut self,
        grid: &GridSpec,
        field: &ScalarField,
        sink: S,
    ) -> Result<(S::Output, ScanSummary), GridError> {
        let result = self.run(grid, field, sink);
        self.cancellation.reset();

        let (output, summary) = result?;
        self.last = Some(summary.clone());
        Ok((output, summary))
    }

    fn run<S: GridSink>(
        &mut self,
        grid: &GridSpec,
        field: &ScalarField,
        mut sink: S,
    ) -> Result<(S::Output, ScanSummary), GridError> {
        let [nx, ny, nz] = grid.resolution();
        let total = grid.n_points();
        let mut summary = ScanSummary::new(field.kind(), total);
        let mut slice = try_zeroed(grid.slice_len(), "grid slice")?;
        let mut context = field.context();

        log::info!("scanning {:?} on a {nx}x{ny}x{nz} grid", field.kind());
        sink.begin(grid)?;
        self.report(0, total);

        for k in 0..nz {
            if self.cancellation.is_cancelled() {
                summary.status = ScanStatus::Cancelled;
                break;
            }

            slice.fill(0.0);
            let stats = fill_slice(grid, field, k, &mut slice, &mut context, &self.cancellation);
            let complete = stats.evaluated_points == slice.len();
            summary = summary.merge(stats);
            sink.slice(k, &slice, complete)?;

            if !complete {
                summary.status = ScanStatus::Cancelled;
                break;
            }
            log::trace!("slice {} of {nz} done", k + 1);
            self.report(grid.slice_len() * (k + 1), total);
        }

        match summary.status {
            ScanStatus::Completed => log::info!("scan finished, range {:?}", summary.range()),
            ScanStatus::Cancelled => log::info!(
                "scan cancelled after {} of {total} points",
                summary.evaluated_points
            ),
        }

        Ok((sink.finish()?, summary))
    }

    fn report(&mut self, done: usize, total: usize) {
        if let Some(progress) = self.progress.as_mut() {
            progress(done, total);
        }
    }
}

/// Evaluates slice `k`, stopping at the first point after a cancellation request.
#[cfg(not(feature = "rayon"))]
fn fill_slice(
    grid: &GridSpec,
    field: &ScalarField,
    k: usize,
    slice: &mut [f64],
    context: &mut EvaluationContext,
    cancellation: &CancellationToken,
) -> ScanSummary {
    use itertools::Itertools;

    let [nx, ny, _] = grid.resolution();
    let mut stats = ScanSummary::new(field.kind(), 0);

    for (value, (j, i)) in slice.iter_mut().zip((0..ny).cartesian_product(0..nx)) {
        if cancellation.is_cancelled() {
            break;
        }
        *value = field.evaluate(context, &grid.point(i, j, k));
        stats.record(*value);
    }
    stats
}

/// Evaluates the rows of slice `k` in parallel, one evaluation context per worker.
#[cfg(feature = "rayon")]
fn fill_slice(
    grid: &GridSpec,
    field: &ScalarField,
    k: usize,
    slice: &mut [f64],
    _context: &mut EvaluationContext,
    cancellation: &CancellationToken,
) -> ScanSummary {
    use rayon::prelude::*;

    let [nx, ..] = grid.resolution();
    let empty = || ScanSummary::new(field.kind(), 0);

    slice
        .par_chunks_mut(nx)
        .enumerate()
        .map_init(
            || field.context(),
            |context, (j, row)| {
                let mut stats = empty();
                for (i, value) in row.iter_mut().enumerate() {
                    if cancellation.is_cancelled() {
                        break;
                    }
                    *value = field.evaluate(context, &grid.point(i, j, k));
                    stats.record(*value);
                }
                stats
            },
        )
        .reduce(empty, ScanSummary::merge)
}
