use super::*;

fn r2(origin: [i64; 2], size: [u64; 2]) -> Region<2> {
    Region::from_arrays(origin, size)
}

fn total_cells<const D: usize>(parts: &[Region<D>]) -> u64 {
    parts.iter().map(Region::cell_count).sum()
}

#[test]
fn slowest_axis_is_split_into_even_slabs() {
    let parts = split_slowest(r2([0, 0], [10, 10]), 5);
    assert_eq!(parts.len(), 5);
    assert_eq!(parts[0], r2([0, 0], [10, 2]));
    assert_eq!(parts[4], r2([0, 8], [10, 2]));
}

#[test]
fn uneven_extent_yields_shorter_last_slab() {
    let parts = split_slowest(r2([0, 3], [4, 10]), 4);
    assert_eq!(
        parts,
        vec![
            r2([0, 3], [4, 3]),
            r2([0, 6], [4, 3]),
            r2([0, 9], [4, 3]),
            r2([0, 12], [4, 1]),
        ]
    );
    assert_eq!(total_cells(&parts), 40);
}

#[test]
fn extent_one_on_slow_axis_falls_back_to_faster_axis() {
    let parts = split_slowest(r2([0, 0], [6, 1]), 3);
    assert_eq!(
        parts,
        vec![r2([0, 0], [2, 1]), r2([2, 0], [2, 1]), r2([4, 0], [2, 1])]
    );
}

#[test]
fn more_pieces_than_cells_is_capped() {
    let parts = split_slowest(Region::<1>::from_arrays([0], [3]), 16);
    assert_eq!(parts.len(), 3);
}

#[test]
fn zero_pieces_means_one() {
    let r = r2([0, 0], [4, 4]);
    assert_eq!(split_slowest(r, 0), vec![r]);
}

#[test]
fn tiles_cover_region_with_clipped_edges() {
    let parts = split_tiles(r2([1, 1], [5, 3]), Size([2, 2])).unwrap();
    assert_eq!(
        parts,
        vec![
            r2([1, 1], [2, 2]),
            r2([3, 1], [2, 2]),
            r2([5, 1], [1, 2]),
            r2([1, 3], [2, 1]),
            r2([3, 3], [2, 1]),
            r2([5, 3], [1, 1]),
        ]
    );
    assert_eq!(total_cells(&parts), 15);
}

#[test]
fn quadrant_tiles_of_ten_by_ten() {
    let parts = split_tiles(r2([0, 0], [10, 10]), Size([5, 5])).unwrap();
    assert_eq!(parts.len(), 4);
    assert!(parts.iter().all(|p| p.size == Size([5, 5])));
}

#[test]
fn zero_tile_component_is_rejected() {
    assert!(matches!(
        split_tiles(r2([0, 0], [4, 4]), Size([0, 2])),
        Err(PasteError::Validation(_))
    ));
}

#[test]
fn three_dimensional_tiles() {
    let r = Region::<3>::from_arrays([0, 0, 0], [4, 4, 3]);
    let parts = split_tiles(r, Size([3, 2, 2])).unwrap();
    assert_eq!(parts.len(), 2 * 2 * 2);
    assert_eq!(total_cells(&parts), 48);
}
