//! The configuration surface the engine consumes.

use serde::{Deserialize, Serialize};

use crate::content::Encoding;
use crate::granularity::Granularity;

/// Per-annotator settings. Everything defaults to the permissive choice:
/// selection on, symbol granularity, plain string encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether selection is currently permitted at all.
    pub selection_enabled: bool,
    /// The unit selections are snapped to.
    pub granularity: Granularity,
    /// How the text value is decoded from the task payload. Affects only
    /// how the text is produced, never offset semantics.
    pub encoding: Encoding,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selection_enabled: true,
            granularity: Granularity::default(),
            encoding: Encoding::default(),
        }
    }
}
