/*!
 * # Annotator Facade
 *
 * `Annotator` ties the pipeline together for a host: it owns the resolved
 * text value, the settings, and the injected region store, and exposes the
 * two entry points the outside world drives —
 *
 * - **capture**: a mouse-up hands over the platform selection; normalized
 *   ranges become persisted regions (skipping exact duplicates), tagged
 *   with whatever label states are currently active.
 * - **rematerialize**: a "content re-rendered" notification hands over the
 *   fresh tree; every stored region is re-resolved from its offsets and
 *   wrapped in live markers.
 *
 * Everything in between (offset mapping, alignment, splitting, wrapping)
 * stays inside the component modules.
 */

use crate::content::{ContentError, resolve_text};
use crate::labels::LabelState;
use crate::materialize::materialize_all;
use crate::offsets::resolve_offset;
use crate::regions::serialized::{SerializedRegion, node_path};
use crate::regions::store::{InMemoryRegionStore, RegionStore};
use crate::regions::{Region, RegionId};
use crate::selection::{self, RawSelection};
use crate::settings::Settings;
use crate::tree::{ContentTree, NodeId};

pub struct Annotator<S: RegionStore = InMemoryRegionStore> {
    text: String,
    settings: Settings,
    store: S,
    active_states: Vec<LabelState>,
}

impl<S: RegionStore> Annotator<S> {
    /// Wraps an already-resolved text value.
    pub fn new(text: impl Into<String>, settings: Settings, store: S) -> Self {
        Self {
            text: text.into(),
            settings,
            store,
            active_states: Vec::new(),
        }
    }

    /// Resolves the text value from a task payload (template interpolation
    /// plus the configured decoding), then wraps it.
    pub fn from_task(
        task: &serde_json::Value,
        source: &str,
        settings: Settings,
        store: S,
    ) -> Result<Self, ContentError> {
        let text = resolve_text(task, source, settings.encoding)?;
        Ok(Self::new(text, settings, store))
    }

    /// Parses a raw task JSON document and resolves the text value from
    /// it. Convenience for hosts holding the payload as bytes on disk.
    pub fn from_task_json(
        json: &str,
        source: &str,
        settings: Settings,
        store: S,
    ) -> anyhow::Result<Self> {
        let task: serde_json::Value = serde_json::from_str(json)?;
        Ok(Self::from_task(&task, source, settings, store)?)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Replaces the set of label states considered active for the next
    /// capture. Only selectable, active states end up on new regions.
    pub fn set_active_states(&mut self, states: Vec<LabelState>) {
        self.active_states = states;
    }

    /// Renders the text value into a fresh tree (a new render pass).
    pub fn render(&self) -> ContentTree {
        ContentTree::render(&self.text)
    }

    /// Handles a mouse-up: normalizes the platform selection and creates a
    /// region per captured range, skipping ranges that duplicate an
    /// existing region's exact offsets. Returns the ids of the regions
    /// created by this capture.
    pub fn capture(&mut self, tree: &mut ContentTree, sel: &mut RawSelection) -> Vec<RegionId> {
        let ranges = selection::capture(tree, &self.text, sel, &self.settings);

        let states: Vec<LabelState> = self
            .active_states
            .iter()
            .filter(|s| s.is_selectable() && s.is_active())
            .cloned()
            .collect();

        let mut created = Vec::new();
        for range in ranges {
            if self
                .store
                .find_region(range.start_offset, range.end_offset)
                .is_some()
            {
                continue;
            }
            let id = self.store.create_region(
                range.start_offset,
                range.end_offset,
                range.text,
                states.clone(),
            );
            created.push(id);
        }
        created
    }

    /// Handles a "content re-rendered" notification: re-resolves every
    /// stored region against the fresh tree and wraps it in live markers.
    pub fn rematerialize(&mut self, tree: &mut ContentTree) {
        materialize_all(tree, &mut self.store);
    }

    /// Interaction lookup for marker fragments: the region owning the node
    /// under the pointer, if any. A region wrapped across several
    /// fragments answers from every one of them; where regions overlap the
    /// most recently applied one wins.
    pub fn region_under(&self, tree: &ContentTree, node: NodeId) -> Option<&Region> {
        let id = tree.region_at(node)?;
        self.store.get(id)
    }

    /// Produces the wire shape for every stored region, deriving node
    /// paths from the given tree where the offsets still resolve.
    pub fn serialize(&self, tree: &ContentTree) -> Vec<SerializedRegion> {
        self.store
            .regions()
            .iter()
            .map(|region| {
                let path_at = |offset| {
                    resolve_offset(tree, offset)
                        .ok()
                        .and_then(|pos| node_path(tree, pos.node))
                        .unwrap_or_default()
                };
                SerializedRegion {
                    start: path_at(region.start_offset),
                    end: path_at(region.end_offset),
                    start_offset: region.start_offset,
                    end_offset: region.end_offset,
                    text: region.text.clone(),
                    normalization: None,
                }
            })
            .collect()
    }

    /// Restores regions from their wire shape. Only the offsets and the
    /// current text value are trusted: node paths are ignored, the covered
    /// text is recomputed, and entries whose offsets no longer fit the
    /// text are skipped with a warning.
    pub fn restore(&mut self, serialized: &[SerializedRegion]) -> Vec<RegionId> {
        let mut restored = Vec::new();
        for entry in serialized {
            if entry.start_offset > entry.end_offset
                || entry.end_offset > self.text.len()
                || !self.text.is_char_boundary(entry.start_offset)
                || !self.text.is_char_boundary(entry.end_offset)
            {
                log::warn!(
                    "skipping saved region {}..{}: does not fit the current text (length {})",
                    entry.start_offset,
                    entry.end_offset,
                    self.text.len()
                );
                continue;
            }
            let text = self.text[entry.start_offset..entry.end_offset].to_string();
            if text != entry.text {
                log::warn!(
                    "saved region {}..{} text differs from the current value; using the current text",
                    entry.start_offset,
                    entry.end_offset
                );
            }
            if self
                .store
                .find_region(entry.start_offset, entry.end_offset)
                .is_some()
            {
                continue;
            }
            restored.push(self.store.create_region(
                entry.start_offset,
                entry.end_offset,
                text,
                Vec::new(),
            ));
        }
        restored
    }
}
