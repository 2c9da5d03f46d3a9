//! The wire shape regions cross the persistence boundary in.
//!
//! The host schema carries node-path strings alongside the offsets. Paths
//! are derived from whatever tree existed at serialization time, so on
//! restore they are not trusted — only the offsets and the current text
//! value are used to re-resolve (the tree has usually changed shape since).

use serde::{Deserialize, Serialize};

use crate::tree::{ContentTree, NodeId};

/// Serialized form of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedRegion {
    /// Node path of the start container at serialization time. Derived
    /// data; ignored on restore.
    pub start: String,
    /// Node path of the end container. Ignored on restore.
    pub end: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
    /// Host-schema passthrough; the engine neither produces nor consumes
    /// a value here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<String>,
}

/// The slash-separated child-index path from the root to `node`, e.g.
/// `"0/2"`. Empty for the root itself; `None` for detached nodes.
pub fn node_path(tree: &ContentTree, node: NodeId) -> Option<String> {
    let mut indices = Vec::new();
    let mut cursor = node;
    while let Some(parent) = tree.parent(cursor) {
        let idx = tree.children(parent).iter().position(|&c| c == cursor)?;
        indices.push(idx);
        cursor = parent;
    }
    if cursor != tree.root() {
        return None;
    }
    indices.reverse();
    Some(
        indices
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("/"),
    )
}
