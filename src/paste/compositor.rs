//! Per-partition compositing.
//!
//! Every partition of the requested output is classified against the fixed placement and
//! filled from the destination, the source, or both:
//!
//! 1. no overlap: destination only (elided when the output already aliases the destination),
//! 2. full overlap: source only, the destination is never read,
//! 3. partial overlap: destination background, then the cropped source patch on top.
//!
//! Partitions share nothing but read access to the inputs, so the result does not depend on
//! how the output was split or in which order the partitions ran.

use crate::exec::progress::ProgressSink;
use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::Region;
use crate::grid::buffer::GridView;
use crate::grid::copy::RegionCopy;
use crate::grid::partition::PartitionView;
use crate::paste::placement::PlacementSpec;

/// Where the output's background cells come from for one invocation.
///
/// Resolved once by the caller and never changed while partitions run.
pub enum Backdrop<'a, G: ?Sized> {
    /// Output storage is the destination storage; background cells are already in place.
    InPlace,
    /// Output is separate storage; background cells are copied from this destination grid.
    Copy(&'a G),
}

impl<G: ?Sized> Clone for Backdrop<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: ?Sized> Copy for Backdrop<'_, G> {}

impl<G: ?Sized> Backdrop<'_, G> {
    pub fn in_place_eligible(&self) -> bool {
        matches!(self, Backdrop::InPlace)
    }
}

impl<G: ?Sized> std::fmt::Debug for Backdrop<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backdrop::InPlace => f.write_str("InPlace"),
            Backdrop::Copy(_) => f.write_str("Copy(..)"),
        }
    }
}

/// In-place execution is only legal when it was asked for and output storage may alias the
/// destination for this run.
pub fn resolve_in_place(configured: bool, aliasing_legal: bool) -> bool {
    configured && aliasing_legal
}

/// How one partition relates to the pasted patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapOutcome<const D: usize> {
    /// The patch misses the partition.
    NoOverlap,
    /// The patch covers the whole partition; `source_local` is the partition in source space.
    FullOverlap { source_local: Region<D> },
    /// The patch covers `overlap` (destination space) only; `source_local` is the same cells
    /// in source space.
    PartialOverlap {
        overlap: Region<D>,
        source_local: Region<D>,
    },
}

impl<const D: usize> OverlapOutcome<D> {
    /// Classify `partition` against the destination-space placement of `spec`.
    ///
    /// Fails with [`PasteError::InvalidPlacement`] only when the overlapped source cells have
    /// no `i64` index, which demand propagation rules out beforehand.
    pub fn classify(partition: &Region<D>, spec: &PlacementSpec<D>) -> PasteResult<Self> {
        Self::classify_with(partition, &spec.placement_in_destination(), spec)
    }

    fn classify_with(
        partition: &Region<D>,
        placement: &Region<D>,
        spec: &PlacementSpec<D>,
    ) -> PasteResult<Self> {
        let Some(overlap) = placement.crop(partition) else {
            return Ok(OverlapOutcome::NoOverlap);
        };
        let source_local = spec.to_source(&overlap).ok_or_else(|| {
            PasteError::invalid_placement(format!(
                "source cells for {overlap} leave the i64 index space"
            ))
        })?;
        if overlap == *partition {
            Ok(OverlapOutcome::FullOverlap { source_local })
        } else {
            Ok(OverlapOutcome::PartialOverlap {
                overlap,
                source_local,
            })
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverlapOutcome::NoOverlap => "no_overlap",
            OverlapOutcome::FullOverlap { .. } => "full_overlap",
            OverlapOutcome::PartialOverlap { .. } => "partial_overlap",
        }
    }
}

/// What compositing one partition did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionReport<const D: usize> {
    pub outcome: OverlapOutcome<D>,
    /// Bulk copies issued to the storage provider.
    pub copies_issued: u32,
    /// Destination copies skipped because the output aliases the destination.
    pub copies_elided: u32,
}

/// Composites individual partitions of one invocation.
///
/// Holds only shared borrows; one instance is used by every worker.
pub struct PartitionCompositor<'a, G: ?Sized, S: ?Sized, C, const D: usize> {
    spec: PlacementSpec<D>,
    placement: Region<D>,
    requested: Region<D>,
    backdrop: Backdrop<'a, G>,
    source: &'a S,
    copier: &'a C,
    progress: &'a dyn ProgressSink,
}

impl<'a, G, S, C, const D: usize> PartitionCompositor<'a, G, S, C, D>
where
    G: ?Sized,
    S: ?Sized,
    C: RegionCopy,
{
    /// `spec` must already have passed demand propagation against the same inputs.
    pub fn new(
        spec: &PlacementSpec<D>,
        requested: Region<D>,
        backdrop: Backdrop<'a, G>,
        source: &'a S,
        copier: &'a C,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            spec: *spec,
            placement: spec.placement_in_destination(),
            requested,
            backdrop,
            source,
            copier,
            progress,
        }
    }

    pub fn in_place_eligible(&self) -> bool {
        self.backdrop.in_place_eligible()
    }

    pub fn classify(&self, partition: &Region<D>) -> PasteResult<OverlapOutcome<D>> {
        OverlapOutcome::classify_with(partition, &self.placement, &self.spec)
    }

    /// Fill `output` (one partition of the requested region) and report one unit of progress.
    ///
    /// A partition outside the requested region is a scheduler bug and fails with
    /// [`PasteError::Precondition`] before anything is written.
    pub fn composite<T, U>(
        &self,
        output: &mut PartitionView<'_, T, D>,
    ) -> PasteResult<PartitionReport<D>>
    where
        G: GridView<T, D>,
        S: GridView<U, D>,
        T: Clone,
        U: Clone + Into<T>,
    {
        let partition = output.region();
        if !self.requested.contains(&partition) {
            return Err(PasteError::precondition(format!(
                "partition {partition} outside requested output {}",
                self.requested
            )));
        }

        let outcome = self.classify(&partition)?;
        let mut report = PartitionReport {
            outcome,
            copies_issued: 0,
            copies_elided: 0,
        };

        match outcome {
            OverlapOutcome::NoOverlap => {
                self.copy_backdrop(output, partition, &mut report)?;
            }
            OverlapOutcome::FullOverlap { source_local } => {
                self.copier.copy(self.source, source_local, output, partition)?;
                report.copies_issued += 1;
            }
            OverlapOutcome::PartialOverlap {
                overlap,
                source_local,
            } => {
                self.copy_backdrop(output, partition, &mut report)?;
                self.copier.copy(self.source, source_local, output, overlap)?;
                report.copies_issued += 1;
            }
        }

        tracing::debug!(
            partition = %partition,
            outcome = outcome.label(),
            copies = report.copies_issued,
            elided = report.copies_elided,
            "partition composited"
        );
        self.progress.partition_completed();
        Ok(report)
    }

    fn copy_backdrop<T>(
        &self,
        output: &mut PartitionView<'_, T, D>,
        partition: Region<D>,
        report: &mut PartitionReport<D>,
    ) -> PasteResult<()>
    where
        G: GridView<T, D>,
        T: Clone,
    {
        match self.backdrop {
            Backdrop::InPlace => report.copies_elided += 1,
            Backdrop::Copy(destination) => {
                self.copier.copy(destination, partition, output, partition)?;
                report.copies_issued += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paste/compositor.rs"]
mod tests;
