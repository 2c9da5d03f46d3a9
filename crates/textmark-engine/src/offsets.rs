/*!
 * # Offset Mapping
 *
 * Bidirectional translation between stable global offsets (byte indices
 * into the flat text value) and concrete tree positions (node + local
 * offset). This is the piece that makes regions durable: the tree a region
 * was captured against is gone by the next render, but its global offsets
 * still mean the same thing, so they can be re-resolved against whatever
 * tree the renderer produced this time.
 *
 * The core correctness property is **invariance to fragmentation**: however
 * the renderer happened to split the text across sibling text nodes,
 * [`to_global_offset`] accumulates the same totals and [`resolve_offset`]
 * lands on the same character. Both are O(tree size) per call, which is
 * acceptable because they run once per region per render, not per
 * character.
 */

use crate::tree::{ContentTree, NodeId};

/// A concrete position in a rendered tree: an addressable node and a byte
/// offset within its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OffsetError {
    #[error("offset {offset} is outside the text (length {len})")]
    OutOfRange { offset: usize, len: usize },
    #[error("node is not part of the annotated content")]
    OutsideRoot,
    #[error("node cannot carry a text offset")]
    UnaddressableNode,
    #[error("local offset {local} exceeds the node's span of {span}")]
    LocalOffsetTooLarge { local: usize, span: usize },
}

/// Converts a (node, local offset) pair into a global offset.
///
/// Walks the tree in reading order accumulating spans until `target` is
/// reached, at which point `local` is added instead of the node's full
/// span. Text nodes contribute their byte length, line-break elements
/// contribute one (so `local` is 0 or 1 when the break itself is the
/// target). The result is identical however the renderer fragmented the
/// text into sibling nodes.
pub fn to_global_offset(
    tree: &ContentTree,
    target: NodeId,
    local: usize,
) -> Result<usize, OffsetError> {
    let kind = tree.get(target).ok_or(OffsetError::OutsideRoot)?;
    if !kind.is_addressable() {
        return Err(OffsetError::UnaddressableNode);
    }
    let span = kind.span();
    if local > span {
        return Err(OffsetError::LocalOffsetTooLarge { local, span });
    }

    let mut total = 0;
    for node in tree.walk() {
        if node == target {
            return Ok(total + local);
        }
        total += tree.kind(node).span();
    }
    // The node exists in the arena but the root traversal never reached it:
    // the selection strayed outside the annotated container.
    Err(OffsetError::OutsideRoot)
}

/// Resolves a global offset back into a concrete tree position.
///
/// Walks the tree in reading order decrementing the remaining offset by
/// each addressable node's span, returning the first node whose span
/// contains what is left. A boundary shared by two adjacent nodes resolves
/// to the end of the earlier one; `offset == text length` therefore clamps
/// to the last valid position instead of failing. Offsets past the end are
/// [`OffsetError::OutOfRange`].
pub fn resolve_offset(tree: &ContentTree, offset: usize) -> Result<Position, OffsetError> {
    let mut remaining = offset;
    let mut total = 0;

    for node in tree.walk() {
        let kind = tree.kind(node);
        if !kind.is_addressable() {
            continue;
        }
        let span = kind.span();
        if remaining <= span {
            return Ok(Position {
                node,
                offset: remaining,
            });
        }
        remaining -= span;
        total += span;
    }

    Err(OffsetError::OutOfRange { offset, len: total })
}
