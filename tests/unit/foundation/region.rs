use super::*;

fn r2(origin: [i64; 2], size: [u64; 2]) -> Region<2> {
    Region::from_arrays(origin, size)
}

#[test]
fn crop_returns_tight_intersection() {
    let a = r2([3, 3], [4, 4]);
    let b = r2([5, 0], [5, 5]);
    assert_eq!(a.crop(&b), Some(r2([5, 3], [2, 2])));
    assert_eq!(b.crop(&a), a.crop(&b));
}

#[test]
fn crop_is_none_when_regions_only_touch() {
    let a = r2([0, 0], [5, 5]);
    let b = r2([5, 0], [5, 5]);
    assert_eq!(a.crop(&b), None);
}

#[test]
fn crop_is_none_when_one_dimension_misses() {
    let a = r2([0, 0], [10, 2]);
    let b = r2([2, 4], [3, 3]);
    assert_eq!(a.crop(&b), None);
}

#[test]
fn crop_with_empty_region_is_none() {
    let a = r2([0, 0], [10, 10]);
    let empty = r2([2, 2], [0, 3]);
    assert_eq!(a.crop(&empty), None);
}

#[test]
fn crop_of_contained_region_is_itself() {
    let outer = Region::<3>::from_arrays([-2, -2, -2], [8, 8, 8]);
    let inner = Region::<3>::from_arrays([0, 1, 2], [2, 3, 1]);
    assert_eq!(outer.crop(&inner), Some(inner));
}

#[test]
fn translate_shifts_origin_only() {
    let r = r2([3, 3], [2, 5]);
    let moved = r.translate(Index([-3, 4]));
    assert_eq!(moved, Some(r2([0, 7], [2, 5])));
}

#[test]
fn translate_refuses_to_leave_index_space() {
    let r = r2([3, 3], [2, 5]);
    assert_eq!(r.translate(Index([i64::MAX, 0])), None);
    // Last cell would be i64::MAX + 1.
    assert_eq!(r.translate(Index([i64::MAX - 3, 0])), None);
    // Last cell is exactly i64::MAX.
    assert_eq!(
        r.translate(Index([i64::MAX - 4, 0])).map(|m| m.origin),
        Some(Index([i64::MAX - 1, 3]))
    );
}

#[test]
fn regions_touching_i64_max_crop_exactly() {
    let top = Region::<1>::from_arrays([i64::MAX - 3], [4]);
    assert!(top.fits_index_space());
    assert_eq!(top.end(0), i128::from(i64::MAX) + 1);
    assert_eq!(top.crop(&top), Some(top));
    assert!(top.contains(&top));
    assert!(top.contains_index(&Index([i64::MAX])));

    let wide = Region::<1>::from_arrays([i64::MAX - 10], [100]);
    assert!(!wide.fits_index_space());
    assert_eq!(wide.crop(&top), Some(top));
}

#[test]
fn lines_stop_at_i64_max() {
    let r = Region::<2>::from_arrays([0, i64::MAX - 1], [1, 2]);
    let lines: Vec<_> = r.lines().collect();
    assert_eq!(lines, vec![Index([0, i64::MAX - 1]), Index([0, i64::MAX])]);
}

#[test]
fn index_arithmetic_is_component_wise() {
    let a = Index([1, -2, 3]);
    let b = Index([4, 5, -6]);
    assert_eq!(a.checked_add(b), Some(Index([5, 3, -3])));
    assert_eq!(a.checked_sub(b), Some(Index([-3, -7, 9])));
    assert_eq!(Index([i64::MIN]).checked_sub(Index([1])), None);
    let big = Index([5_000_000_000_000_000_000]);
    assert_eq!(big.checked_add(big), None);
}

#[test]
fn contains_checks_every_dimension() {
    let outer = r2([0, 0], [10, 10]);
    assert!(outer.contains(&r2([0, 0], [10, 10])));
    assert!(outer.contains(&r2([3, 3], [4, 4])));
    assert!(!outer.contains(&r2([8, 8], [4, 4])));
    assert!(!outer.contains(&r2([-1, 0], [2, 2])));
}

#[test]
fn lines_visit_every_run_in_storage_order() {
    let r = Region::<3>::from_arrays([1, 10, 20], [4, 2, 2]);
    let lines: Vec<_> = r.lines().collect();
    assert_eq!(
        lines,
        vec![
            Index([1, 10, 20]),
            Index([1, 11, 20]),
            Index([1, 10, 21]),
            Index([1, 11, 21]),
        ]
    );
    assert_eq!(r.line_count(), 4);
    assert_eq!(r.line_len(), 4);
}

#[test]
fn lines_of_one_dimensional_region_is_single_run() {
    let r = Region::<1>::from_arrays([5], [7]);
    assert_eq!(r.lines().collect::<Vec<_>>(), vec![Index([5])]);
}

#[test]
fn empty_region_has_no_lines() {
    let r = r2([0, 0], [4, 0]);
    assert!(r.is_empty());
    assert_eq!(r.lines().count(), 0);
    assert_eq!(r.line_count(), 0);
    assert_eq!(r.cell_count(), 0);
}

#[test]
fn linear_offset_is_row_major() {
    let r = r2([2, 3], [5, 4]);
    assert_eq!(r.linear_offset(&Index([2, 3])), 0);
    assert_eq!(r.linear_offset(&Index([6, 3])), 4);
    assert_eq!(r.linear_offset(&Index([2, 4])), 5);
    assert_eq!(r.linear_offset(&Index([6, 6])), 19);
}

#[test]
fn display_is_readable() {
    let r = r2([0, -1], [4, 4]);
    assert_eq!(r.to_string(), "origin [0, -1] size [4, 4]");
}

#[test]
fn json_uses_plain_arrays() {
    let r = r2([3, 3], [4, 4]);
    let json = serde_json::to_string(&r).unwrap();
    assert_eq!(json, r#"{"origin":[3,3],"size":[4,4]}"#);
    let back: Region<2> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
}

#[test]
fn json_rejects_wrong_component_count() {
    let err = serde_json::from_str::<Region<2>>(r#"{"origin":[3,3,3],"size":[4,4]}"#)
        .unwrap_err()
        .to_string();
    assert!(err.contains("2 components"), "{err}");
}
