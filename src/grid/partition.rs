use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::{Index, Region};
use crate::grid::buffer::Grid;

/// Exclusive write access to the cells of one partition of an output grid.
///
/// Views are produced by [`Grid::carve`]; each holds the axis-0 runs of its partition as
/// disjoint `&mut` slices, so any number of views can be written from different threads.
#[derive(Debug)]
pub struct PartitionView<'a, T, const D: usize> {
    region: Region<D>,
    // One run per line of `region`, in storage order.
    runs: Vec<&'a mut [T]>,
}

impl<'a, T, const D: usize> PartitionView<'a, T, D> {
    pub fn region(&self) -> Region<D> {
        self.region
    }

    /// Mutable run of `len` cells starting at `start`; must stay inside the partition.
    pub fn run_mut(&mut self, start: &Index<D>, len: usize) -> PasteResult<&mut [T]> {
        if len == 0 {
            return Ok(&mut []);
        }
        let run = Region::run_at(*start, len);
        if !self.region.contains(&run) {
            return Err(PasteError::precondition(format!(
                "write of {run} outside partition {}",
                self.region
            )));
        }
        let line = self.region.line_number(start);
        let off = self.region.axis0_offset(start);
        Ok(&mut self.runs[line][off..off + len])
    }

    pub fn get(&self, index: &Index<D>) -> Option<&T> {
        if !self.region.contains_index(index) {
            return None;
        }
        let line = self.region.line_number(index);
        self.runs[line].get(self.region.axis0_offset(index))
    }
}

#[derive(Clone, Copy)]
struct Piece {
    offset: usize,
    len: usize,
    partition: usize,
}

impl<T, const D: usize> Grid<T, D> {
    /// Split the grid's storage into one writable view per partition.
    ///
    /// Fails with a precondition error when a partition leaves the grid or when two
    /// partitions share a cell. Views are returned in the order of `partitions`.
    pub fn carve(&mut self, partitions: &[Region<D>]) -> PasteResult<Vec<PartitionView<'_, T, D>>> {
        let region = self.region;
        for p in partitions {
            if !region.contains(p) {
                return Err(PasteError::precondition(format!(
                    "partition {p} outside output grid {region}"
                )));
            }
        }

        let mut pieces: Vec<Vec<Piece>> = vec![Vec::new(); region.line_count()];
        for (pi, p) in partitions.iter().enumerate() {
            if p.is_empty() {
                continue;
            }
            for start in p.lines() {
                pieces[region.line_number(&start)].push(Piece {
                    offset: region.axis0_offset(&start),
                    len: p.line_len(),
                    partition: pi,
                });
            }
        }

        let mut runs: Vec<Vec<&mut [T]>> = partitions.iter().map(|_| Vec::new()).collect();
        let line_len = region.line_len();
        if line_len > 0 {
            for (line, (slice, line_pieces)) in self
                .data
                .chunks_mut(line_len)
                .zip(pieces.iter_mut())
                .enumerate()
            {
                line_pieces.sort_unstable_by_key(|piece| piece.offset);
                let mut rest = slice;
                let mut cursor = 0usize;
                let mut previous: Option<usize> = None;
                for piece in line_pieces.iter() {
                    if piece.offset < cursor {
                        let other = previous.unwrap_or(piece.partition);
                        return Err(PasteError::precondition(format!(
                            "partitions {} and {} overlap on output line {line}",
                            partitions[other], partitions[piece.partition],
                        )));
                    }
                    let (_, tail) = std::mem::take(&mut rest).split_at_mut(piece.offset - cursor);
                    let (run, tail) = tail.split_at_mut(piece.len);
                    runs[piece.partition].push(run);
                    rest = tail;
                    cursor = piece.offset + piece.len;
                    previous = Some(piece.partition);
                }
            }
        }

        Ok(partitions
            .iter()
            .zip(runs)
            .map(|(&region, runs)| PartitionView { region, runs })
            .collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/partition.rs"]
mod tests;
