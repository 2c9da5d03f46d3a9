pub mod annotator;
pub mod content;
pub mod granularity;
pub mod labels;
pub mod materialize;
pub mod offsets;
pub mod regions;
pub mod selection;
pub mod settings;
pub mod tree;

// Re-export key types for easier usage
pub use annotator::Annotator;
pub use content::{ContentError, Encoding, resolve_text};
pub use granularity::{AlignError, Granularity, align};
pub use labels::{Label, LabelState};
pub use materialize::{MaterializedSpan, materialize, materialize_all};
pub use offsets::{OffsetError, Position, resolve_offset, to_global_offset};
pub use regions::serialized::SerializedRegion;
pub use regions::store::{InMemoryRegionStore, RegionStore};
pub use regions::{Attachment, Region, RegionId};
pub use selection::{CaptureError, NormalizedRange, RawRange, RawSelection, capture};
pub use settings::Settings;
pub use tree::{ContentTree, NodeId, NodeKind};
