//! Integer index-space geometry: indices, sizes and axis-aligned regions of any dimensionality.
//!
//! Axis 0 is the fastest-varying storage axis everywhere in the crate. A "line" is a maximal
//! run of cells along axis 0 inside a region; grids store and copy cells line by line.
//!
//! Region ends are exclusive and may sit one past `i64::MAX`, so bounds are compared in
//! `i128`. Index arithmetic is checked.

use std::fmt;

/// Coordinate of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Index<const D: usize>(#[serde(with = "fixed_array")] pub [i64; D]);

/// Per-dimension extent. A zero component makes the owning region empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size<const D: usize>(#[serde(with = "fixed_array")] pub [u64; D]);

/// Axis-aligned box `[origin, origin + size)` in index space.
///
/// Equality is structural over origin and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region<const D: usize> {
    /// First cell of the region.
    pub origin: Index<D>,
    /// Extent per dimension.
    pub size: Size<D>,
}

impl<const D: usize> Index<D> {
    pub fn new(coords: [i64; D]) -> Self {
        Self(coords)
    }

    pub fn zero() -> Self {
        Self([0; D])
    }

    /// Component-wise sum, `None` on overflow.
    pub fn checked_add(&self, rhs: Index<D>) -> Option<Index<D>> {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = o.checked_add(r)?;
        }
        Some(Self(out))
    }

    /// Component-wise difference, `None` on overflow.
    pub fn checked_sub(&self, rhs: Index<D>) -> Option<Index<D>> {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = o.checked_sub(r)?;
        }
        Some(Self(out))
    }
}

impl<const D: usize> Size<D> {
    pub fn new(extent: [u64; D]) -> Self {
        Self(extent)
    }

    /// `true` when any component is zero.
    pub fn is_empty(&self) -> bool {
        self.0.contains(&0)
    }

    /// Number of cells covered, saturating at `u64::MAX`.
    pub fn cell_count(&self) -> u64 {
        self.0.iter().fold(1u64, |acc, &s| acc.saturating_mul(s))
    }
}

impl<const D: usize> Region<D> {
    pub fn new(origin: Index<D>, size: Size<D>) -> Self {
        Self { origin, size }
    }

    pub fn from_arrays(origin: [i64; D], size: [u64; D]) -> Self {
        Self::new(Index(origin), Size(size))
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn cell_count(&self) -> u64 {
        self.size.cell_count()
    }

    /// Exclusive end coordinate along dimension `d`. Exact for every origin and size.
    pub fn end(&self, d: usize) -> i128 {
        i128::from(self.origin.0[d]) + i128::from(self.size.0[d])
    }

    /// `true` when every cell of the region has an `i64` index.
    ///
    /// Grids and placements are only accepted over regions that fit.
    pub fn fits_index_space(&self) -> bool {
        (0..D).all(|d| self.end(d) <= i128::from(i64::MAX) + 1)
    }

    /// `true` when every cell of `other` lies inside `self`.
    pub fn contains(&self, other: &Region<D>) -> bool {
        (0..D).all(|d| other.origin.0[d] >= self.origin.0[d] && other.end(d) <= self.end(d))
    }

    pub fn contains_index(&self, index: &Index<D>) -> bool {
        (0..D).all(|d| index.0[d] >= self.origin.0[d] && i128::from(index.0[d]) < self.end(d))
    }

    /// Intersection of two regions.
    ///
    /// Returns `None` as soon as one dimension has an overlap length `<= 0`; otherwise the
    /// tight box with origin `max(origins)` and end `min(ends)`.
    pub fn crop(&self, other: &Region<D>) -> Option<Region<D>> {
        let mut origin = [0i64; D];
        let mut size = [0u64; D];
        for d in 0..D {
            let lo = self.origin.0[d].max(other.origin.0[d]);
            let hi = self.end(d).min(other.end(d));
            if hi <= i128::from(lo) {
                return None;
            }
            origin[d] = lo;
            // Bounded by the smaller of the two sizes.
            size[d] = (hi - i128::from(lo)) as u64;
        }
        Some(Region::from_arrays(origin, size))
    }

    /// Shift the origin by `delta`; size is unchanged.
    ///
    /// `None` when the shifted region would leave the `i64` index space.
    pub fn translate(&self, delta: Index<D>) -> Option<Region<D>> {
        let moved = Region::new(self.origin.checked_add(delta)?, self.size);
        moved.fits_index_space().then_some(moved)
    }

    /// Cells per line (extent along axis 0).
    pub fn line_len(&self) -> usize {
        if D == 0 { 0 } else { self.size.0[0] as usize }
    }

    /// Number of axis-0 lines in the region.
    pub fn line_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.size.0.iter().skip(1).map(|&s| s as usize).product()
    }

    /// Ordinal (row-major over dimensions `1..D`) of the line holding `index`.
    ///
    /// `index` must lie inside the region.
    pub(crate) fn line_number(&self, index: &Index<D>) -> usize {
        debug_assert!(self.contains_index(index));
        let mut line = 0usize;
        let mut stride = 1usize;
        for d in 1..D {
            line += index.0[d].abs_diff(self.origin.0[d]) as usize * stride;
            stride *= self.size.0[d] as usize;
        }
        line
    }

    /// Offset of `index` along axis 0, relative to the region origin.
    pub(crate) fn axis0_offset(&self, index: &Index<D>) -> usize {
        index.0[0].abs_diff(self.origin.0[0]) as usize
    }

    /// Row-major linear offset of `index` inside the region.
    pub(crate) fn linear_offset(&self, index: &Index<D>) -> usize {
        self.line_number(index) * self.line_len() + self.axis0_offset(index)
    }

    /// `start` moved `by` cells along axis 0. Exact whenever the result is a cell of a region
    /// that fits the index space.
    pub(crate) fn step_axis0(start: Index<D>, by: usize) -> Index<D> {
        let mut idx = start;
        idx.0[0] = idx.0[0].wrapping_add_unsigned(by as u64);
        idx
    }

    /// Single axis-0 run of `len` cells starting at `start`.
    pub(crate) fn run_at(start: Index<D>, len: usize) -> Region<D> {
        let mut size = [1u64; D];
        if D > 0 {
            size[0] = len as u64;
        }
        Region::new(start, Size(size))
    }

    /// Iterate the first index of every axis-0 line, in storage order.
    pub fn lines(&self) -> Lines<D> {
        Lines {
            region: *self,
            next: if self.is_empty() || D == 0 {
                None
            } else {
                Some(self.origin)
            },
        }
    }
}

/// Iterator returned by [`Region::lines`].
#[derive(Clone, Debug)]
pub struct Lines<const D: usize> {
    region: Region<D>,
    next: Option<Index<D>>,
}

impl<const D: usize> Iterator for Lines<D> {
    type Item = Index<D>;

    fn next(&mut self) -> Option<Index<D>> {
        let current = self.next?;
        let mut idx = current;
        self.next = None;
        for d in 1..D {
            match idx.0[d].checked_add(1) {
                Some(n) if i128::from(n) < self.region.end(d) => {
                    idx.0[d] = n;
                    self.next = Some(idx);
                    break;
                }
                _ => idx.0[d] = self.region.origin.0[d],
            }
        }
        Some(current)
    }
}

fn write_list<V: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[V]) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("]")
}

impl<const D: usize> fmt::Display for Index<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.0)
    }
}

impl<const D: usize> fmt::Display for Size<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.0)
    }
}

impl<const D: usize> fmt::Display for Region<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "origin {} size {}", self.origin, self.size)
    }
}

/// serde support for `[T; D]` with a const-generic length (JSON arrays).
mod fixed_array {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S, T, const D: usize>(v: &[T; D], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        v.as_slice().serialize(s)
    }

    pub(super) fn deserialize<'de, De, T, const D: usize>(d: De) -> Result<[T; D], De::Error>
    where
        De: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let items = Vec::<T>::deserialize(d)?;
        let len = items.len();
        items.try_into().map_err(|_| {
            let expected = format!("{D} components");
            De::Error::invalid_length(len, &expected.as_str())
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/region.rs"]
mod tests;
