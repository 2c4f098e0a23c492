use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::{Index, Region};

/// Read access to grid storage, as consumed by the compositor.
///
/// Implementations must be shareable across worker threads: compositing reads destination and
/// source grids concurrently from every partition.
pub trait GridView<T, const D: usize>: Sync {
    /// Region whose cells are allocated and readable.
    fn valid_region(&self) -> Region<D>;

    /// Borrow `len` contiguous cells along axis 0 starting at `start`.
    ///
    /// Requests that leave [`GridView::valid_region`] fail with a precondition error.
    fn run(&self, start: &Index<D>, len: usize) -> PasteResult<&[T]>;
}

/// Owned N-dimensional grid stored row-major (axis 0 fastest) over a buffered region.
///
/// The buffered region may start at any origin, including negative coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T, const D: usize> {
    pub(crate) region: Region<D>,
    pub(crate) data: Vec<T>,
}

fn storage_len<const D: usize>(region: &Region<D>) -> PasteResult<usize> {
    if D == 0 {
        return Err(PasteError::validation("grids need at least one dimension"));
    }
    if !region.fits_index_space() {
        return Err(PasteError::validation(format!(
            "grid region {region} extends past the i64 index space"
        )));
    }
    usize::try_from(region.cell_count())
        .map_err(|_| PasteError::validation(format!("grid region {region} is too large")))
}

impl<T: Clone, const D: usize> Grid<T, D> {
    /// Allocate a grid over `region` with every cell set to `value`.
    pub fn filled(region: Region<D>, value: T) -> PasteResult<Self> {
        let len = storage_len(&region)?;
        Ok(Self {
            region,
            data: vec![value; len],
        })
    }

    /// Copy of the cells inside `region`, which must lie inside the grid.
    pub fn sub_grid(&self, region: Region<D>) -> PasteResult<Self> {
        if !self.region.contains(&region) {
            return Err(PasteError::precondition(format!(
                "sub-grid {region} outside grid {}",
                self.region
            )));
        }
        let mut data = Vec::with_capacity(storage_len(&region)?);
        let line_len = region.line_len();
        for start in region.lines() {
            let off = self.region.linear_offset(&start);
            data.extend_from_slice(&self.data[off..off + line_len]);
        }
        Ok(Self { region, data })
    }
}

impl<T, const D: usize> Grid<T, D> {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(region: Region<D>, data: Vec<T>) -> PasteResult<Self> {
        let len = storage_len(&region)?;
        if data.len() != len {
            return Err(PasteError::validation(format!(
                "grid region {region} needs {len} cells, got {}",
                data.len()
            )));
        }
        Ok(Self { region, data })
    }

    /// Build a grid by evaluating `f` at every index, in storage order.
    pub fn from_fn(region: Region<D>, mut f: impl FnMut(Index<D>) -> T) -> PasteResult<Self> {
        let len = storage_len(&region)?;
        let mut data = Vec::with_capacity(len);
        let line_len = region.line_len();
        for start in region.lines() {
            for i in 0..line_len {
                data.push(f(Region::step_axis0(start, i)));
            }
        }
        Ok(Self { region, data })
    }

    pub fn region(&self) -> Region<D> {
        self.region
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, index: &Index<D>) -> Option<&T> {
        if !self.region.contains_index(index) {
            return None;
        }
        self.data.get(self.region.linear_offset(index))
    }

    pub fn get_mut(&mut self, index: &Index<D>) -> Option<&mut T> {
        if !self.region.contains_index(index) {
            return None;
        }
        let off = self.region.linear_offset(index);
        self.data.get_mut(off)
    }

    pub fn set(&mut self, index: &Index<D>, value: T) -> PasteResult<()> {
        let region = self.region;
        let cell = self.get_mut(index).ok_or_else(|| {
            PasteError::precondition(format!("index {index} outside grid {region}"))
        })?;
        *cell = value;
        Ok(())
    }

    /// Every cell paired with its index, in storage order.
    pub fn indexed(&self) -> impl Iterator<Item = (Index<D>, &T)> + '_ {
        let line_len = self.region.line_len();
        self.region
            .lines()
            .flat_map(move |start| {
                (0..line_len).map(move |i| Region::step_axis0(start, i))
            })
            .zip(self.data.iter())
    }
}

impl<T: Sync, const D: usize> GridView<T, D> for Grid<T, D> {
    fn valid_region(&self) -> Region<D> {
        self.region
    }

    fn run(&self, start: &Index<D>, len: usize) -> PasteResult<&[T]> {
        if len == 0 {
            return Ok(&[]);
        }
        let run = Region::run_at(*start, len);
        if !self.region.contains(&run) {
            return Err(PasteError::precondition(format!(
                "read of {run} outside grid {}",
                self.region
            )));
        }
        let off = self.region.linear_offset(start);
        Ok(&self.data[off..off + len])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/buffer.rs"]
mod tests;
