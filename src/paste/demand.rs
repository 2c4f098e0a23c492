use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::Region;
use crate::paste::placement::PlacementSpec;

/// Valid regions of the two input grids, as reported by the storage provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputBounds<const D: usize> {
    pub destination: Region<D>,
    pub source: Region<D>,
}

/// Regions each input must have resident before compositing starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemandRequest<const D: usize> {
    /// Always the requested output region: uncovered cells fall back to destination data.
    pub destination: Region<D>,
    /// Always the full source region of the placement, however little of it the requested
    /// output actually touches.
    pub source: Region<D>,
}

/// Translate a requested output region into input requests, validating the placement.
///
/// Runs once per invocation, before any partition is dispatched. Fails with
/// [`PasteError::InvalidPlacement`] when the source region leaves the source grid, the pasted
/// patch leaves the destination grid, the requested output leaves the destination grid, or
/// any of these regions has cells without an `i64` index.
#[tracing::instrument(level = "debug", skip_all, fields(requested = %requested))]
pub fn propagate<const D: usize>(
    requested: Region<D>,
    spec: &PlacementSpec<D>,
    bounds: &InputBounds<D>,
) -> PasteResult<DemandRequest<D>> {
    let placement = spec.placement_in_destination();
    for (what, region) in [
        ("source grid", &bounds.source),
        ("destination grid", &bounds.destination),
        ("source region", &spec.source_region),
        ("pasted region", &placement),
        ("requested output", &requested),
    ] {
        if !region.fits_index_space() {
            return Err(PasteError::invalid_placement(format!(
                "{what} {region} extends past the i64 index space"
            )));
        }
    }

    if !bounds.source.contains(&spec.source_region) {
        return Err(PasteError::invalid_placement(format!(
            "source region {} exceeds source grid {}",
            spec.source_region, bounds.source
        )));
    }

    if !bounds.destination.contains(&placement) {
        return Err(PasteError::invalid_placement(format!(
            "pasted region {placement} exceeds destination grid {}",
            bounds.destination
        )));
    }

    if !bounds.destination.contains(&requested) {
        return Err(PasteError::invalid_placement(format!(
            "requested output {requested} exceeds destination grid {}",
            bounds.destination
        )));
    }

    let demand = DemandRequest {
        destination: requested,
        source: spec.source_region,
    };
    tracing::debug!(
        destination = %demand.destination,
        source = %demand.source,
        "input demand resolved"
    );
    Ok(demand)
}

#[cfg(test)]
#[path = "../../tests/unit/paste/demand.rs"]
mod tests;
