use rayon::prelude::*;

use crate::exec::split::{split_slowest, split_tiles};
use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::{Region, Size};
use crate::grid::partition::PartitionView;
use crate::paste::compositor::{OverlapOutcome, PartitionReport};

/// How the requested output is partitioned and where partitions run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionOpts<const D: usize> {
    /// Run partitions on a rayon thread pool when `true`, in order on the caller otherwise.
    #[serde(default)]
    pub parallel: bool,
    /// Number of slabs for [`split_slowest`]. `0` picks one per worker thread (one when
    /// sequential).
    #[serde(default)]
    pub partitions: usize,
    /// Optional explicit worker thread count.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Tile the output with this size instead of slicing along the slowest axis.
    #[serde(default)]
    pub tile: Option<Size<D>>,
}

impl<const D: usize> Default for ExecutionOpts<D> {
    fn default() -> Self {
        Self {
            parallel: false,
            partitions: 0,
            threads: None,
            tile: None,
        }
    }
}

impl<const D: usize> ExecutionOpts<D> {
    /// Partition `requested` according to these options.
    pub fn partition(&self, requested: Region<D>) -> PasteResult<Vec<Region<D>>> {
        if let Some(tile) = self.tile {
            return split_tiles(requested, tile);
        }
        let pieces = match self.partitions {
            0 if self.parallel => self.threads.unwrap_or_else(rayon::current_num_threads),
            0 => 1,
            n => n,
        };
        Ok(split_slowest(requested, pieces))
    }
}

/// Aggregated counters for one invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PasteReport {
    /// Partitions composited.
    pub partitions: usize,
    pub no_overlap: usize,
    pub full_overlap: usize,
    pub partial_overlap: usize,
    /// Bulk copies issued to the storage provider.
    pub copies_issued: u64,
    /// Destination copies skipped through in-place aliasing.
    pub copies_elided: u64,
}

impl PasteReport {
    fn record<const D: usize>(&mut self, partition: &PartitionReport<D>) {
        self.partitions += 1;
        match partition.outcome {
            OverlapOutcome::NoOverlap => self.no_overlap += 1,
            OverlapOutcome::FullOverlap { .. } => self.full_overlap += 1,
            OverlapOutcome::PartialOverlap { .. } => self.partial_overlap += 1,
        }
        self.copies_issued += u64::from(partition.copies_issued);
        self.copies_elided += u64::from(partition.copies_elided);
    }
}

/// Check that `partitions` stay inside `requested`, are pairwise disjoint, and cover it
/// exactly.
pub fn verify_cover<const D: usize>(
    requested: &Region<D>,
    partitions: &[Region<D>],
) -> PasteResult<()> {
    let mut cells = 0u64;
    for (i, p) in partitions.iter().enumerate() {
        if !requested.contains(p) {
            return Err(PasteError::precondition(format!(
                "partition {p} outside requested output {requested}"
            )));
        }
        if let Some(q) = partitions[..i].iter().find(|q| q.crop(p).is_some()) {
            return Err(PasteError::precondition(format!(
                "partitions {q} and {p} overlap"
            )));
        }
        cells = cells.saturating_add(p.cell_count());
    }
    if cells != requested.cell_count() {
        return Err(PasteError::precondition(format!(
            "partitions cover {cells} cells, requested output {requested} has {}",
            requested.cell_count()
        )));
    }
    Ok(())
}

/// Run `work` once per partition view, sequentially or on a dedicated rayon pool.
///
/// Sequential runs stop at the first failing partition. Parallel runs let every partition
/// finish and return the first error in partition order.
pub fn dispatch<'v, T, F, const D: usize>(
    opts: &ExecutionOpts<D>,
    views: Vec<PartitionView<'v, T, D>>,
    work: F,
) -> PasteResult<PasteReport>
where
    T: Send,
    F: Fn(&mut PartitionView<'v, T, D>) -> PasteResult<PartitionReport<D>> + Sync,
{
    let mut report = PasteReport::default();

    if !opts.parallel {
        for mut view in views {
            report.record(&work(&mut view)?);
        }
        return Ok(report);
    }

    let pool = build_thread_pool(opts.threads)?;
    let results = pool.install(|| {
        views
            .into_par_iter()
            .map(|mut view| work(&mut view))
            .collect::<Vec<_>>()
    });
    for item in results {
        report.record(&item?);
    }
    Ok(report)
}

fn build_thread_pool(threads: Option<usize>) -> PasteResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PasteError::validation(
            "execution 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PasteError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/exec/dispatch.rs"]
mod tests;
