/*!
 * # Selection Capture
 *
 * Reading a platform selection snapshot (zero or more disjoint ranges over
 * tree positions) and normalizing each range into stable coordinates ready
 * for region creation. Normalization is where all the platform mess is
 * absorbed:
 *
 * - a collapsed selection (click without drag) produces nothing,
 * - a drag past the last character parks the end container on a block
 *   wrapper and is clamped back onto real content,
 * - boundaries are snapped to the configured granularity,
 * - text nodes straddling the final boundaries are split so the boundaries
 *   sit on node edges and later marker wrapping never has to split
 *   mid-word,
 * - a range that escapes the annotated content entirely is discarded with
 *   a warning while the remaining ranges still process.
 *
 * After a capture the platform selection is cleared — persisted region
 * markers take over from the transient selection highlight.
 */

use crate::granularity::{AlignError, Granularity, align};
use crate::materialize::split_at_offset;
use crate::offsets::{OffsetError, Position, to_global_offset};
use crate::settings::Settings;
use crate::tree::{ContentTree, NodeKind};

/// One range of a platform selection, as (node, local offset) endpoints.
/// Ranges are reading-ordered: the start does not come after the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRange {
    pub start: Position,
    pub end: Position,
}

impl RawRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// A snapshot of the platform's current (possibly multi-range) selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSelection {
    ranges: Vec<RawRange>,
}

impl RawSelection {
    pub fn new(ranges: Vec<RawRange>) -> Self {
        Self { ranges }
    }

    pub fn single(start: Position, end: Position) -> Self {
        Self {
            ranges: vec![RawRange::new(start, end)],
        }
    }

    pub fn ranges(&self) -> &[RawRange] {
        &self.ranges
    }

    /// True when nothing is effectively selected: no ranges, or only
    /// zero-width ones.
    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(RawRange::is_collapsed)
    }

    /// Drops the selection state, as the platform does once its highlight
    /// is replaced by persisted markers.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

/// A selection range normalized to stable coordinates.
///
/// Invariants: `start_offset <= end_offset` and `text` equals the flat
/// text's `[start_offset, end_offset)` slice after alignment. The `start`
/// and `end` positions describe the boundaries in the tree as it stood
/// after boundary splitting (end-of-earlier-node convention); they are
/// ephemeral and valid only for that tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRange {
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("selection range cannot be normalized: {0}")]
    Normalization(#[from] OffsetError),
}

/// Converts the current selection into normalized ranges, consuming it.
///
/// Returns an empty sequence when selection is disabled or collapsed.
/// Each range is processed independently; failures are logged and skipped.
pub fn capture(
    tree: &mut ContentTree,
    text: &str,
    selection: &mut RawSelection,
    settings: &Settings,
) -> Vec<NormalizedRange> {
    if !settings.selection_enabled {
        return Vec::new();
    }
    if selection.is_collapsed() {
        selection.clear();
        return Vec::new();
    }

    let ranges: Vec<RawRange> = selection.ranges().to_vec();
    let mut normalized = Vec::new();
    for range in &ranges {
        if range.is_collapsed() {
            continue;
        }
        match normalize_range(tree, text, range, settings.granularity) {
            Ok(Some(done)) => normalized.push(done),
            Ok(None) => {}
            Err(err) => log::warn!("discarding selection range: {err}"),
        }
    }
    selection.clear();
    normalized
}

fn normalize_range(
    tree: &mut ContentTree,
    text: &str,
    range: &RawRange,
    granularity: Granularity,
) -> Result<Option<NormalizedRange>, CaptureError> {
    let end = clamp_block_end(tree, range)?;

    let raw_start = to_global_offset(tree, range.start.node, range.start.offset)?;
    let raw_end = to_global_offset(tree, end.node, end.offset)?;
    let (raw_start, raw_end) = if raw_start <= raw_end {
        (raw_start, raw_end)
    } else {
        (raw_end, raw_start)
    };

    let (start_offset, end_offset) = match align(text, raw_start, raw_end, granularity) {
        Ok(aligned) => aligned,
        Err(err @ AlignError::Unsupported(_)) => {
            log::warn!("{err}; keeping the raw selection boundaries");
            (raw_start, raw_end)
        }
    };
    if start_offset == end_offset {
        return Ok(None);
    }

    // Boundary splitting never moves text, so the offsets stay valid; the
    // positions are re-resolved afterwards against the split nodes.
    let start = split_at_offset(tree, start_offset)?;
    let end = split_at_offset(tree, end_offset)?;

    Ok(Some(NormalizedRange {
        start_offset,
        end_offset,
        text: text[start_offset..end_offset].to_string(),
        start,
        end,
    }))
}

/// If the range's end container is a block wrapper (the drag ran past the
/// last character), clamp the end to the last addressable content under
/// the start container's nearest block ancestor.
fn clamp_block_end(tree: &ContentTree, range: &RawRange) -> Result<Position, CaptureError> {
    let end_kind = tree
        .get(range.end.node)
        .ok_or(OffsetError::OutsideRoot)?;
    if end_kind.is_addressable() {
        return Ok(range.end);
    }
    if !matches!(end_kind, NodeKind::Block) {
        return Err(OffsetError::UnaddressableNode.into());
    }

    let block = tree
        .nearest_block(range.start.node)
        .ok_or(OffsetError::OutsideRoot)?;
    let (node, span) = tree
        .last_addressable(block)
        .ok_or(OffsetError::UnaddressableNode)?;
    Ok(Position { node, offset: span })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offsets::resolve_offset;

    fn position(tree: &ContentTree, offset: usize) -> Position {
        resolve_offset(tree, offset).unwrap()
    }

    #[test]
    fn collapsed_selection_yields_nothing() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let at = position(&tree, 3);
        let mut selection = RawSelection::single(at, at);

        let captured = capture(&mut tree, text, &mut selection, &Settings::default());
        assert!(captured.is_empty());
        assert!(selection.ranges().is_empty());
    }

    #[test]
    fn empty_selection_yields_nothing() {
        let text = "abc";
        let mut tree = ContentTree::render(text);
        let mut selection = RawSelection::default();
        let captured = capture(&mut tree, text, &mut selection, &Settings::default());
        assert!(captured.is_empty());
    }

    #[test]
    fn disabled_selection_captures_nothing() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let mut selection =
            RawSelection::single(position(&tree, 4), position(&tree, 9));

        let settings = Settings {
            selection_enabled: false,
            ..Settings::default()
        };
        let captured = capture(&mut tree, text, &mut selection, &settings);
        assert!(captured.is_empty());
        // An ignored selection is left alone.
        assert_eq!(selection.ranges().len(), 1);
    }

    #[test]
    fn captures_text_and_offsets_verbatim() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let mut selection =
            RawSelection::single(position(&tree, 4), position(&tree, 9));

        let captured = capture(&mut tree, text, &mut selection, &Settings::default());
        assert_eq!(captured.len(), 1);
        let range = &captured[0];
        assert_eq!((range.start_offset, range.end_offset), (4, 9));
        assert_eq!(range.text, "quick");
        assert!(selection.ranges().is_empty());
    }

    #[test]
    fn word_granularity_expands_before_capture() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let mut selection =
            RawSelection::single(position(&tree, 5), position(&tree, 8));

        let settings = Settings {
            granularity: Granularity::Word,
            ..Settings::default()
        };
        let captured = capture(&mut tree, text, &mut selection, &settings);
        assert_eq!(captured.len(), 1);
        assert_eq!(
            (captured[0].start_offset, captured[0].end_offset),
            (4, 9)
        );
        assert_eq!(captured[0].text, "quick");
    }

    #[test]
    fn boundaries_end_up_on_node_edges() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let mut selection =
            RawSelection::single(position(&tree, 4), position(&tree, 9));

        let captured = capture(&mut tree, text, &mut selection, &Settings::default());
        let range = &captured[0];

        // After splitting, both boundary positions sit on node edges.
        let start_span = tree.kind(range.start.node).span();
        assert!(range.start.offset == 0 || range.start.offset == start_span);
        let end_span = tree.kind(range.end.node).span();
        assert!(range.end.offset == 0 || range.end.offset == end_span);
        assert_eq!(tree.flat_text(), text);
    }

    #[test]
    fn drag_past_the_end_clamps_to_content() {
        let text = "the quick";
        let mut tree = ContentTree::render(text);
        let start = position(&tree, 4);
        // End container is the block root, as when the drag leaves the text.
        let end = Position {
            node: tree.root(),
            offset: 0,
        };
        let mut selection = RawSelection::single(start, end);

        let captured = capture(&mut tree, text, &mut selection, &Settings::default());
        assert_eq!(captured.len(), 1);
        assert_eq!(
            (captured[0].start_offset, captured[0].end_offset),
            (4, 9)
        );
        assert_eq!(captured[0].text, "quick");
    }

    #[test]
    fn range_escaping_the_root_is_discarded_alone() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let stray = tree.detached_text("elsewhere on the page");
        let escaped = RawRange::new(
            Position {
                node: stray,
                offset: 0,
            },
            Position {
                node: stray,
                offset: 5,
            },
        );
        let fine = RawRange::new(position(&tree, 10), position(&tree, 15));
        let mut selection = RawSelection::new(vec![escaped, fine]);

        let captured = capture(&mut tree, text, &mut selection, &Settings::default());
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].text, "brown");
    }

    #[test]
    fn multi_range_selection_normalizes_each_range() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let first = RawRange::new(position(&tree, 0), position(&tree, 3));
        let second = RawRange::new(position(&tree, 16), position(&tree, 19));
        let mut selection = RawSelection::new(vec![first, second]);

        let captured = capture(&mut tree, text, &mut selection, &Settings::default());
        let texts: Vec<&str> = captured.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["the", "fox"]);
    }

    #[test]
    fn unsupported_granularity_falls_back_to_raw_boundaries() {
        let text = "the quick brown fox";
        let mut tree = ContentTree::render(text);
        let mut selection =
            RawSelection::single(position(&tree, 5), position(&tree, 8));

        let settings = Settings {
            granularity: Granularity::Sentence,
            ..Settings::default()
        };
        let captured = capture(&mut tree, text, &mut selection, &settings);
        assert_eq!(captured.len(), 1);
        assert_eq!(
            (captured[0].start_offset, captured[0].end_offset),
            (5, 8)
        );
    }
}
