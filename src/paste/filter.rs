use std::fmt;

use crate::exec::dispatch::{ExecutionOpts, PasteReport, dispatch, verify_cover};
use crate::exec::progress::ProgressSink;
use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::{Index, Region};
use crate::grid::buffer::{Grid, GridView};
use crate::grid::copy::{LineCopy, RegionCopy};
use crate::paste::compositor::{Backdrop, PartitionCompositor, resolve_in_place};
use crate::paste::demand::{DemandRequest, InputBounds, propagate};
use crate::paste::placement::PlacementSpec;

/// Paste a source sub-region onto a destination grid.
///
/// Configure with plain setters, then run [`PasteFilter::paste_into`] (separate output
/// storage) or [`PasteFilter::paste_in_place`] (the destination buffer becomes the output).
/// Each run validates the placement, partitions the requested output, and composites every
/// partition independently.
#[derive(Clone, Debug)]
pub struct PasteFilter<const D: usize, C = LineCopy> {
    placement: PlacementSpec<D>,
    in_place: bool,
    execution: ExecutionOpts<D>,
    copier: C,
}

impl<const D: usize> PasteFilter<D> {
    pub fn new(placement: PlacementSpec<D>) -> Self {
        Self {
            placement,
            in_place: false,
            execution: ExecutionOpts::default(),
            copier: LineCopy,
        }
    }
}

impl<const D: usize> Default for PasteFilter<D> {
    fn default() -> Self {
        Self::new(PlacementSpec::default())
    }
}

impl<const D: usize, C: RegionCopy> PasteFilter<D, C> {
    /// Swap the bulk copy primitive.
    pub fn with_copier<C2: RegionCopy>(self, copier: C2) -> PasteFilter<D, C2> {
        PasteFilter {
            placement: self.placement,
            in_place: self.in_place,
            execution: self.execution,
            copier,
        }
    }

    pub fn placement(&self) -> &PlacementSpec<D> {
        &self.placement
    }

    pub fn set_destination_index(&mut self, index: Index<D>) {
        self.placement.destination_index = index;
    }

    pub fn destination_index(&self) -> Index<D> {
        self.placement.destination_index
    }

    pub fn set_source_region(&mut self, region: Region<D>) {
        self.placement.source_region = region;
    }

    pub fn source_region(&self) -> Region<D> {
        self.placement.source_region
    }

    /// Ask for in-place execution. Only honored by [`PasteFilter::paste_in_place`].
    pub fn set_in_place(&mut self, in_place: bool) {
        self.in_place = in_place;
    }

    pub fn in_place(&self) -> bool {
        self.in_place
    }

    pub fn set_execution(&mut self, execution: ExecutionOpts<D>) {
        self.execution = execution;
    }

    pub fn execution(&self) -> &ExecutionOpts<D> {
        &self.execution
    }

    pub fn copier(&self) -> &C {
        &self.copier
    }

    /// Validate the placement and compute what each input must supply for `requested`.
    pub fn propagate(
        &self,
        requested: Region<D>,
        bounds: &InputBounds<D>,
    ) -> PasteResult<DemandRequest<D>> {
        propagate(requested, &self.placement, bounds)
    }

    /// Composite into `output`, which must have the destination's shape.
    ///
    /// The output is distinct storage, so the destination is always copied for uncovered
    /// cells regardless of the in-place setting.
    #[tracing::instrument(level = "debug", skip_all, fields(requested = %requested))]
    pub fn paste_into<T, U, G, S>(
        &self,
        destination: &G,
        source: &S,
        output: &mut Grid<T, D>,
        requested: Region<D>,
        progress: &dyn ProgressSink,
    ) -> PasteResult<PasteReport>
    where
        G: GridView<T, D> + ?Sized,
        S: GridView<U, D> + ?Sized,
        T: Clone + Send,
        U: Clone + Into<T>,
    {
        let bounds = InputBounds {
            destination: destination.valid_region(),
            source: source.valid_region(),
        };
        let demand = self.propagate(requested, &bounds)?;
        if output.region() != destination.valid_region() {
            return Err(PasteError::validation(format!(
                "output grid {} must match destination grid {}",
                output.region(),
                destination.valid_region()
            )));
        }
        if self.in_place {
            tracing::warn!("in-place requested but output has its own storage; copying");
        }
        self.run(
            demand.destination,
            Backdrop::Copy(destination),
            source,
            output,
            progress,
        )
    }

    /// Composite with the destination buffer reused as the output.
    ///
    /// With in-place enabled, uncovered cells are never touched. With it disabled, the
    /// requested part of the destination is snapshotted first and the regular copy path runs
    /// against the snapshot.
    #[tracing::instrument(level = "debug", skip_all, fields(requested = %requested))]
    pub fn paste_in_place<T, U, S>(
        &self,
        destination: &mut Grid<T, D>,
        source: &S,
        requested: Region<D>,
        progress: &dyn ProgressSink,
    ) -> PasteResult<PasteReport>
    where
        S: GridView<U, D> + ?Sized,
        T: Clone + Send + Sync,
        U: Clone + Into<T>,
    {
        let bounds = InputBounds {
            destination: destination.region(),
            source: source.valid_region(),
        };
        let demand = self.propagate(requested, &bounds)?;

        // Holding `&mut destination` proves no one else observes the buffer.
        if resolve_in_place(self.in_place, true) {
            return self.run(
                demand.destination,
                Backdrop::<Grid<T, D>>::InPlace,
                source,
                destination,
                progress,
            );
        }

        let snapshot = destination.sub_grid(demand.destination)?;
        self.run(
            demand.destination,
            Backdrop::Copy(&snapshot),
            source,
            destination,
            progress,
        )
    }

    fn run<T, U, G, S>(
        &self,
        requested: Region<D>,
        backdrop: Backdrop<'_, G>,
        source: &S,
        output: &mut Grid<T, D>,
        progress: &dyn ProgressSink,
    ) -> PasteResult<PasteReport>
    where
        G: GridView<T, D> + ?Sized,
        S: GridView<U, D> + ?Sized,
        T: Clone + Send,
        U: Clone + Into<T>,
    {
        let partitions = self.execution.partition(requested)?;
        verify_cover(&requested, &partitions)?;
        let views = output.carve(&partitions)?;

        tracing::debug!(
            partitions = partitions.len(),
            in_place = backdrop.in_place_eligible(),
            parallel = self.execution.parallel,
            "compositing"
        );
        progress.begin(partitions.len());

        let compositor = PartitionCompositor::new(
            &self.placement,
            requested,
            backdrop,
            source,
            &self.copier,
            progress,
        );
        let report = dispatch(&self.execution, views, |view| compositor.composite(view))?;
        tracing::debug!(?report, "paste finished");
        Ok(report)
    }
}

impl<const D: usize, C> fmt::Display for PasteFilter<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.placement)?;
        write!(f, "InPlace: {}", self.in_place)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paste/filter.rs"]
mod tests;
