use super::*;
use crate::foundation::region::{Index, Region, Size};

#[test]
fn minimal_config_uses_defaults() {
    let cfg = PasteConfig::<2>::from_json_str(
        r#"{"placement":{"destination_index":[3,3],"source_region":{"origin":[0,0],"size":[4,4]}}}"#,
    )
    .unwrap();
    assert_eq!(cfg.placement.destination_index, Index([3, 3]));
    assert!(!cfg.in_place);
    assert_eq!(cfg.execution, ExecutionOpts::default());
}

#[test]
fn full_config_builds_matching_filter() {
    let cfg = PasteConfig::<3>::from_json_str(
        r#"{
            "placement": {
                "destination_index": [1, 2, 3],
                "source_region": { "origin": [0, 0, 0], "size": [2, 2, 2] }
            },
            "in_place": true,
            "execution": { "parallel": true, "threads": 2, "tile": [4, 4, 1] }
        }"#,
    )
    .unwrap();
    let filter = cfg.into_filter();
    assert!(filter.in_place());
    assert_eq!(filter.destination_index(), Index([1, 2, 3]));
    assert_eq!(
        filter.source_region(),
        Region::from_arrays([0, 0, 0], [2, 2, 2])
    );
    assert_eq!(filter.execution().threads, Some(2));
    assert_eq!(filter.execution().tile, Some(Size([4, 4, 1])));
}

#[test]
fn dimension_mismatch_is_a_serde_error() {
    let err = PasteConfig::<2>::from_json_str(
        r#"{"placement":{"destination_index":[3,3,3],"source_region":{"origin":[0,0],"size":[4,4]}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, PasteError::Serde(_)), "{err}");
}

#[test]
fn pretty_json_parses_back() {
    let cfg = PasteConfig::<2> {
        placement: PlacementSpec::new(Index([5, 6]), Region::from_arrays([1, 1], [2, 3])),
        in_place: true,
        execution: ExecutionOpts {
            partitions: 3,
            ..ExecutionOpts::default()
        },
    };
    let json = cfg.to_json_pretty().unwrap();
    assert_eq!(PasteConfig::<2>::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = PasteConfig::<2>::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"), "{err}");
}
