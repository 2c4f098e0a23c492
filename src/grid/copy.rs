use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::Region;
use crate::grid::buffer::GridView;
use crate::grid::partition::PartitionView;

/// Bulk region copy between a readable grid and a partition of the output.
///
/// `src_region` and `dst_region` must have the same size; cells are converted with
/// `Into` so any source element type assignable to the output element type is accepted.
/// Implementations are shared by every worker of an invocation.
pub trait RegionCopy: Sync {
    fn copy<T, U, G, const D: usize>(
        &self,
        src: &G,
        src_region: Region<D>,
        dst: &mut PartitionView<'_, T, D>,
        dst_region: Region<D>,
    ) -> PasteResult<()>
    where
        G: GridView<U, D> + ?Sized,
        U: Clone + Into<T>;
}

/// Default copy: walks both regions line by line and assigns axis-0 runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineCopy;

impl RegionCopy for LineCopy {
    fn copy<T, U, G, const D: usize>(
        &self,
        src: &G,
        src_region: Region<D>,
        dst: &mut PartitionView<'_, T, D>,
        dst_region: Region<D>,
    ) -> PasteResult<()>
    where
        G: GridView<U, D> + ?Sized,
        U: Clone + Into<T>,
    {
        if src_region.size != dst_region.size {
            return Err(PasteError::precondition(format!(
                "copy from {src_region} to {dst_region}: sizes differ"
            )));
        }
        let len = src_region.line_len();
        for (s, d) in src_region.lines().zip(dst_region.lines()) {
            let from = src.run(&s, len)?;
            let to = dst.run_mut(&d, len)?;
            for (out, cell) in to.iter_mut().zip(from) {
                *out = cell.clone().into();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/copy.rs"]
mod tests;
