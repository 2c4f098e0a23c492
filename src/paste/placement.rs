use std::fmt;

use crate::foundation::region::{Index, Region, Size};

/// Where the source patch lands: `source_region` of the source grid is pasted with its first
/// cell at `destination_index` in destination space.
///
/// Fixed before any compositing runs and read-only for the whole invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlacementSpec<const D: usize> {
    /// Destination-space index receiving the first source cell.
    pub destination_index: Index<D>,
    /// Sub-region of the source grid to paste, in source-space coordinates.
    pub source_region: Region<D>,
}

impl<const D: usize> PlacementSpec<D> {
    pub fn new(destination_index: Index<D>, source_region: Region<D>) -> Self {
        Self {
            destination_index,
            source_region,
        }
    }

    /// Destination-space region covered by the pasted patch.
    pub fn placement_in_destination(&self) -> Region<D> {
        Region::new(self.destination_index, self.source_region.size)
    }

    /// Offset mapping destination-space indices into source space, `None` when it does not
    /// fit in `i64`.
    pub fn source_offset(&self) -> Option<Index<D>> {
        self.source_region.origin.checked_sub(self.destination_index)
    }

    /// Map a destination-space region inside the placement to the same cells in source space.
    ///
    /// Works from each cell's offset into the placement, so it succeeds even when
    /// [`PlacementSpec::source_offset`] overflows. `None` when `region` is not inside the
    /// placement or the source region does not fit the index space.
    pub fn to_source(&self, region: &Region<D>) -> Option<Region<D>> {
        if !self.placement_in_destination().contains(region)
            || !self.source_region.fits_index_space()
        {
            return None;
        }
        let mut origin = self.source_region.origin;
        for (d, o) in origin.0.iter_mut().enumerate() {
            let step = region.origin.0[d].abs_diff(self.destination_index.0[d]);
            *o = o.checked_add_unsigned(step)?;
        }
        Some(Region::new(origin, region.size))
    }
}

impl<const D: usize> Default for PlacementSpec<D> {
    fn default() -> Self {
        Self::new(Index::zero(), Region::new(Index::zero(), Size([0; D])))
    }
}

impl<const D: usize> fmt::Display for PlacementSpec<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DestinationIndex: {}", self.destination_index)?;
        write!(f, "SourceRegion: {}", self.source_region)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paste/placement.rs"]
mod tests;
