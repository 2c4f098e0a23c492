use super::*;
use crate::grid::buffer::Grid;

fn r2(origin: [i64; 2], size: [u64; 2]) -> Region<2> {
    Region::from_arrays(origin, size)
}

fn fill_with_origin(view: &mut PartitionView<'_, u32, 2>) -> PasteResult<PartitionReport<2>> {
    let region = view.region();
    let tag = (region.origin.0[0] * 100 + region.origin.0[1]) as u32;
    for start in region.lines() {
        view.run_mut(&start, region.line_len())?.fill(tag);
    }
    Ok(PartitionReport {
        outcome: OverlapOutcome::NoOverlap,
        copies_issued: 1,
        copies_elided: 0,
    })
}

#[test]
fn sequential_and_parallel_dispatch_agree() {
    let requested = r2([0, 0], [12, 9]);
    let parts = split_tiles(requested, Size([5, 4])).unwrap();

    let mut seq = Grid::filled(requested, 0u32).unwrap();
    let seq_report = dispatch(
        &ExecutionOpts::default(),
        seq.carve(&parts).unwrap(),
        fill_with_origin,
    )
    .unwrap();

    let mut par = Grid::filled(requested, 0u32).unwrap();
    let opts = ExecutionOpts {
        parallel: true,
        threads: Some(3),
        ..ExecutionOpts::default()
    };
    let par_report = dispatch(&opts, par.carve(&parts).unwrap(), fill_with_origin).unwrap();

    assert_eq!(seq, par);
    assert_eq!(seq_report, par_report);
    assert_eq!(seq_report.partitions, parts.len());
    assert_eq!(seq_report.no_overlap, parts.len());
    assert_eq!(seq_report.copies_issued, parts.len() as u64);
}

#[test]
fn errors_from_any_partition_surface() {
    let requested = r2([0, 0], [4, 4]);
    let parts = split_slowest(requested, 4);
    for parallel in [false, true] {
        let mut out = Grid::filled(requested, 0u32).unwrap();
        let opts = ExecutionOpts {
            parallel,
            ..ExecutionOpts::default()
        };
        let err = dispatch(&opts, out.carve(&parts).unwrap(), |view| {
            if view.region().origin.0[1] == 2 {
                Err(PasteError::precondition("boom"))
            } else {
                fill_with_origin(view)
            }
        })
        .unwrap_err();
        assert!(matches!(err, PasteError::Precondition(_)));
    }
}

#[test]
fn zero_threads_is_rejected() {
    let requested = r2([0, 0], [2, 2]);
    let mut out = Grid::filled(requested, 0u32).unwrap();
    let opts = ExecutionOpts {
        parallel: true,
        threads: Some(0),
        ..ExecutionOpts::default()
    };
    let err = dispatch(&opts, out.carve(&[requested]).unwrap(), fill_with_origin).unwrap_err();
    assert!(matches!(err, PasteError::Validation(_)), "{err}");
}

#[test]
fn verify_cover_accepts_exact_covers() {
    let requested = r2([2, 2], [6, 6]);
    verify_cover(&requested, &split_slowest(requested, 4)).unwrap();
    verify_cover(&requested, &split_tiles(requested, Size([4, 4])).unwrap()).unwrap();
}

#[test]
fn verify_cover_rejects_gaps_and_strays() {
    let requested = r2([0, 0], [4, 4]);
    let gap = [r2([0, 0], [4, 2])];
    assert!(matches!(
        verify_cover(&requested, &gap),
        Err(PasteError::Precondition(_))
    ));
    let stray = [r2([0, 0], [4, 2]), r2([0, 2], [4, 3])];
    assert!(matches!(
        verify_cover(&requested, &stray),
        Err(PasteError::Precondition(_))
    ));
}

#[test]
fn verify_cover_rejects_overlap_hidden_by_matching_gap() {
    let requested = r2([0, 0], [4, 4]);
    // Rows 0..2 twice, rows 2..4 never: the cell count still adds up to 16.
    let doubled = [r2([0, 0], [4, 2]), r2([0, 0], [4, 2])];
    let err = verify_cover(&requested, &doubled).unwrap_err();
    assert!(matches!(err, PasteError::Precondition(_)), "{err}");
    assert!(err.to_string().contains("overlap"), "{err}");

    let shifted = [r2([0, 0], [4, 3]), r2([0, 2], [4, 1])];
    assert!(matches!(
        verify_cover(&requested, &shifted),
        Err(PasteError::Precondition(_))
    ));
}

#[test]
fn options_choose_partitioning() {
    let requested = r2([0, 0], [8, 8]);
    assert_eq!(
        ExecutionOpts::default().partition(requested).unwrap(),
        vec![requested]
    );

    let slabs = ExecutionOpts {
        partitions: 4,
        ..ExecutionOpts::default()
    };
    assert_eq!(slabs.partition(requested).unwrap().len(), 4);

    let auto_parallel = ExecutionOpts {
        parallel: true,
        threads: Some(2),
        ..ExecutionOpts::default()
    };
    assert_eq!(auto_parallel.partition(requested).unwrap().len(), 2);

    let tiled = ExecutionOpts {
        partitions: 4,
        tile: Some(Size([3, 3])),
        ..ExecutionOpts::<2>::default()
    };
    assert_eq!(tiled.partition(requested).unwrap().len(), 9);
}

#[test]
fn options_parse_with_defaults() {
    let opts: ExecutionOpts<2> =
        serde_json::from_str(r#"{"parallel":true,"tile":[4,4]}"#).unwrap();
    assert!(opts.parallel);
    assert_eq!(opts.partitions, 0);
    assert_eq!(opts.threads, None);
    assert_eq!(opts.tile, Some(Size([4, 4])));
}
