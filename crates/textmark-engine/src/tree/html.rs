//! Exporting an annotated tree as HTML.
//!
//! A deterministic serialization of the rendered structure: text is
//! escaped, line breaks become `<br>`, nested blocks become `<p>`, and
//! marker wrappers become `<mark>` elements carrying their region id and
//! first color. Useful for host pages and for eyeballing what a
//! materialization pass actually produced.

use super::{ContentTree, NodeId, NodeKind};

/// Serializes the tree to an HTML fragment. The root block renders its
/// children bare (the host supplies the outer container).
pub fn to_html(tree: &ContentTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        render_node(tree, child, &mut out);
    }
    out
}

fn render_node(tree: &ContentTree, node: NodeId, out: &mut String) {
    match tree.kind(node) {
        NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
        NodeKind::LineBreak => out.push_str("<br>"),
        NodeKind::Block => {
            out.push_str("<p>");
            for &child in tree.children(node) {
                render_node(tree, child, out);
            }
            out.push_str("</p>");
        }
        NodeKind::Marker { region, colors } => {
            out.push_str(&format!("<mark data-region=\"{region}\""));
            if let Some(color) = colors.first() {
                out.push_str(&format!(" style=\"background: {color};\""));
            }
            out.push('>');
            for &child in tree.children(node) {
                render_node(tree, child, out);
            }
            out.push_str("</mark>");
        }
    }
}
