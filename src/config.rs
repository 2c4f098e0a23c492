use crate::exec::dispatch::ExecutionOpts;
use crate::foundation::error::{PasteError, PasteResult};
use crate::paste::filter::PasteFilter;
use crate::paste::placement::PlacementSpec;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON-facing paste configuration.
///
/// ```json
/// {
///   "placement": {
///     "destination_index": [3, 3],
///     "source_region": { "origin": [0, 0], "size": [4, 4] }
///   },
///   "in_place": true,
///   "execution": { "parallel": true, "tile": [64, 64] }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PasteConfig<const D: usize> {
    pub placement: PlacementSpec<D>,
    #[serde(default)]
    pub in_place: bool,
    #[serde(default)]
    pub execution: ExecutionOpts<D>,
}

impl<const D: usize> PasteConfig<D> {
    pub fn from_json_str(s: &str) -> PasteResult<Self> {
        serde_json::from_str(s).map_err(|e| PasteError::serde(format!("parse paste config: {e}")))
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> PasteResult<Self> {
        serde_json::from_reader(r).map_err(|e| PasteError::serde(format!("parse paste config: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> PasteResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PasteError::validation(format!("open paste config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> PasteResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PasteError::serde(e.to_string()))
    }

    pub fn into_filter(self) -> PasteFilter<D> {
        let mut filter = PasteFilter::new(self.placement);
        filter.set_in_place(self.in_place);
        filter.set_execution(self.execution);
        filter
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
