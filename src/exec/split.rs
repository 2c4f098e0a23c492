use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::{Region, Size};

/// Split `region` into at most `pieces` slabs along its slowest axis with extent > 1.
///
/// Slabs are `ceil(extent / pieces)` long, the last one possibly shorter, so fewer than
/// `pieces` slabs come back when the extent does not divide evenly. `pieces == 0` is treated
/// as 1.
pub fn split_slowest<const D: usize>(region: Region<D>, pieces: usize) -> Vec<Region<D>> {
    if region.is_empty() {
        return vec![region];
    }
    let Some(axis) = (0..D).rev().find(|&d| region.size.0[d] > 1) else {
        return vec![region];
    };

    let extent = region.size.0[axis];
    let pieces = (pieces.max(1) as u64).min(extent);
    let chunk = extent.div_ceil(pieces);

    let mut out = Vec::with_capacity(pieces as usize);
    let mut start = 0u64;
    while start < extent {
        let len = chunk.min(extent - start);
        let mut slab = region;
        slab.origin.0[axis] = slab.origin.0[axis].wrapping_add_unsigned(start);
        slab.size.0[axis] = len;
        out.push(slab);
        start += len;
    }
    out
}

/// Cover `region` with tiles of size `tile`, clipped at the far edges, in storage order.
pub fn split_tiles<const D: usize>(
    region: Region<D>,
    tile: Size<D>,
) -> PasteResult<Vec<Region<D>>> {
    if tile.is_empty() {
        return Err(PasteError::validation(format!(
            "tile size {tile} must be non-zero in every dimension"
        )));
    }
    if region.is_empty() {
        return Ok(vec![region]);
    }

    let mut counts = [0u64; D];
    for d in 0..D {
        counts[d] = region.size.0[d].div_ceil(tile.0[d]);
    }
    let tile_grid = Region::from_arrays([0; D], counts);

    let mut out = Vec::with_capacity(tile_grid.cell_count() as usize);
    for line in tile_grid.lines() {
        for i in 0..tile_grid.line_len() {
            let mut t = line;
            t.0[0] += i as i64;
            let mut piece = region;
            for d in 0..D {
                let offset = t.0[d] as u64 * tile.0[d];
                piece.origin.0[d] = region.origin.0[d].wrapping_add_unsigned(offset);
                piece.size.0[d] = tile.0[d].min(region.size.0[d] - offset);
            }
            out.push(piece);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/exec/split.rs"]
mod tests;
