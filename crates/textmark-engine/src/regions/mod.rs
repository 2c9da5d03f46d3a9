/*!
 * # Regions
 *
 * A region is a persisted annotated span: two global offsets into the text
 * value, the text they covered at capture time, and the label states that
 * were active when it was created. Regions never hold live tree references
 * as their identity — the offsets are the durable coordinates, and the
 * [`Attachment`] records which render pass (epoch) the region was last
 * materialized against, so a re-render makes stale fragments detectable
 * instead of dangling.
 *
 * The collection of regions is owned by a store behind the
 * [`store::RegionStore`] trait — the engine reads and updates regions
 * through that injected interface and never through a shared global.
 */

pub mod serialized;
pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::labels::LabelState;
use crate::tree::NodeId;

/// Stable identifier for a region, preserved across renders and
/// serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(Uuid);

impl RegionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Where a region currently lives in its lifecycle: detached (created, or
/// its render pass is gone), or attached to the marker fragments of one
/// specific epoch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attachment {
    #[default]
    Detached,
    Attached {
        epoch: u64,
        fragments: Vec<NodeId>,
    },
}

/// A persisted annotated span of text plus its associated label state.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
    pub states: Vec<LabelState>,
    attachment: Attachment,
}

impl Region {
    pub(crate) fn new(
        start_offset: usize,
        end_offset: usize,
        text: String,
        states: Vec<LabelState>,
    ) -> Self {
        Self {
            id: RegionId::new(),
            start_offset,
            end_offset,
            text,
            states,
            attachment: Attachment::Detached,
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    /// Whether the region holds live fragments for the given render pass.
    /// Fragments from any other epoch are stale by definition.
    pub fn is_attached(&self, epoch: u64) -> bool {
        matches!(&self.attachment, Attachment::Attached { epoch: e, .. } if *e == epoch)
    }

    pub(crate) fn attach(&mut self, epoch: u64, fragments: Vec<NodeId>) {
        self.attachment = Attachment::Attached { epoch, fragments };
    }

    pub(crate) fn detach(&mut self) {
        self.attachment = Attachment::Detached;
    }

    /// The marker colors this region renders with, drawn from its
    /// selectable label states.
    pub fn active_colors(&self) -> Vec<String> {
        self.states
            .iter()
            .filter(|s| s.is_selectable())
            .flat_map(|s| s.colors())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Label;

    #[test]
    fn new_regions_start_detached() {
        let region = Region::new(0, 4, "text".to_string(), vec![]);
        assert_eq!(region.attachment(), &Attachment::Detached);
        assert!(!region.is_attached(1));
    }

    #[test]
    fn attachment_is_epoch_specific() {
        let mut region = Region::new(0, 4, "text".to_string(), vec![]);
        region.attach(7, vec![]);
        assert!(region.is_attached(7));
        assert!(!region.is_attached(8));

        region.detach();
        assert!(!region.is_attached(7));
    }

    #[test]
    fn active_colors_skip_non_selectable_states() {
        let region = Region::new(
            0,
            4,
            "text".to_string(),
            vec![
                LabelState::Labels {
                    from_name: "sentiment".to_string(),
                    selected: vec![Label::new("positive", "#00ff7f")],
                },
                LabelState::TextArea {
                    from_name: "comment".to_string(),
                    entries: vec!["noted".to_string()],
                },
            ],
        );
        assert_eq!(region.active_colors(), vec!["#00ff7f".to_string()]);
    }
}
