/*!
 * # Region Materialization
 *
 * Turning a region's stable offsets back into live highlighted content on
 * a freshly rendered tree. The renderer may have fragmented the text
 * completely differently than the tree the region was captured against;
 * none of that matters, because materialization starts from the offsets
 * alone:
 *
 * 1. resolve both offsets against the current tree,
 * 2. split the text nodes carrying the boundaries so each boundary sits on
 *    a node edge,
 * 3. wrap every addressable node fully contained between the boundaries in
 *    a marker — one fragment per covered text/line-break node,
 * 4. record the fragments on the region together with the tree's epoch.
 *
 * Regions are processed in store insertion order and failures are isolated
 * per region: one region with offsets the current text cannot satisfy is
 * skipped with a warning while every other region still materializes.
 */

use crate::offsets::{OffsetError, Position, resolve_offset};
use crate::regions::store::RegionStore;
use crate::regions::{Region, RegionId};
use crate::tree::{ContentTree, NodeId};

/// The live result of materializing one region: the marker nodes that now
/// wrap its content, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedSpan {
    pub region: RegionId,
    pub fragments: Vec<NodeId>,
}

/// Splits the text node carrying `offset` so the offset coincides with a
/// node edge, and returns the resolved boundary position. A boundary
/// already on an edge (or on a line break, which has no interior) is left
/// untouched. The flat text never changes.
pub fn split_at_offset(
    tree: &mut ContentTree,
    offset: usize,
) -> Result<Position, OffsetError> {
    let position = resolve_offset(tree, offset)?;
    tree.split_text(position.node, position.offset);
    Ok(position)
}

/// Materializes one region against the current tree, returning the marker
/// fragments that now carry it.
pub fn materialize(
    tree: &mut ContentTree,
    region: &Region,
) -> Result<MaterializedSpan, OffsetError> {
    split_at_offset(tree, region.start_offset)?;
    split_at_offset(tree, region.end_offset)?;

    // After splitting, every covered node lies entirely inside the region's
    // interval, so containment alone decides what gets wrapped.
    let mut covered = Vec::new();
    let mut cursor = 0;
    for node in tree.walk() {
        let span = tree.kind(node).span();
        if span == 0 {
            continue;
        }
        let node_start = cursor;
        cursor += span;
        if node_start >= region.start_offset && cursor <= region.end_offset {
            covered.push(node);
        }
    }

    let colors = region.active_colors();
    let fragments = covered
        .into_iter()
        .filter_map(|node| tree.wrap_in_marker(node, region.id(), colors.clone()))
        .collect();

    Ok(MaterializedSpan {
        region: region.id(),
        fragments,
    })
}

/// Materializes every region in the store against `tree`, in insertion
/// order. Each region is processed independently: a failure detaches that
/// region and logs a warning, and the pass continues. Regions already
/// attached to this tree's epoch are left alone, so invoking the pass
/// twice on one render never duplicates markers.
pub fn materialize_all<S: RegionStore>(tree: &mut ContentTree, store: &mut S) {
    let epoch = tree.epoch();
    for region in store.regions_mut() {
        if region.is_attached(epoch) {
            continue;
        }
        match materialize(tree, region) {
            Ok(span) => region.attach(epoch, span.fragments),
            Err(err) => {
                log::warn!("skipping region {}: {err}", region.id());
                region.detach();
            }
        }
    }
}
