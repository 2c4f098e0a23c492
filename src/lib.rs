#![forbid(unsafe_code)]
//! N-dimensional paste compositing.
//!
//! A rectangular sub-region of a source grid is composited onto a destination grid at a
//! given index. The requested output is split into disjoint partitions that are filled
//! independently, sequentially or on a rayon pool, with identical results either way.

pub mod config;
pub mod exec;
pub mod foundation;
pub mod grid;
pub mod paste;
pub mod raster;

pub use config::PasteConfig;
pub use exec::dispatch::{ExecutionOpts, PasteReport, dispatch, verify_cover};
pub use exec::progress::{NoProgress, ProgressCounter, ProgressSink};
pub use exec::split::{split_slowest, split_tiles};
pub use foundation::error::{PasteError, PasteResult};
pub use foundation::region::{Index, Region, Size};
pub use grid::buffer::{Grid, GridView};
pub use grid::copy::{LineCopy, RegionCopy};
pub use grid::partition::PartitionView;
pub use paste::compositor::{
    Backdrop, OverlapOutcome, PartitionCompositor, PartitionReport, resolve_in_place,
};
pub use paste::demand::{DemandRequest, InputBounds, propagate};
pub use paste::filter::PasteFilter;
pub use paste::placement::PlacementSpec;
pub use raster::Rgba;
