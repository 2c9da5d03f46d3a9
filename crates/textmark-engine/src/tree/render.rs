//! Producing a [`ContentTree`] from a flat text value.
//!
//! The renderer is deliberately minimal: line content becomes text nodes,
//! each `\n` becomes a line-break element, everything hangs under the block
//! root. What matters to the rest of the engine is not the exact shape but
//! that reading order reproduces the flat text — `render_fragmented`
//! exercises that by splitting the same content into arbitrarily small text
//! nodes, the way a real rendering layer might.

use super::ContentTree;

impl ContentTree {
    /// Renders `text` into a fresh tree (new epoch): one text node per line,
    /// line-break elements between lines.
    pub fn render(text: &str) -> Self {
        Self::render_with(text, None)
    }

    /// Renders `text` with every line's content split into text-node
    /// fragments of at most `chunk_len` bytes (never splitting a `char`).
    /// The flat text is identical to [`ContentTree::render`]'s.
    pub fn render_fragmented(text: &str, chunk_len: usize) -> Self {
        Self::render_with(text, Some(chunk_len.max(1)))
    }

    fn render_with(text: &str, chunk_len: Option<usize>) -> Self {
        let mut tree = ContentTree::new();
        let root = tree.root();

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                tree.push_line_break(root);
            }
            match chunk_len {
                None => {
                    if !line.is_empty() {
                        tree.push_text(root, line);
                    }
                }
                Some(width) => {
                    for chunk in chunk_line(line, width) {
                        tree.push_text(root, chunk);
                    }
                }
            }
        }
        tree
    }
}

/// Splits a line into chunks of at most `width` bytes on char boundaries.
fn chunk_line(line: &str, width: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        let mut cut = width.min(rest.len());
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            // width is smaller than the next char; take the whole char
            cut = rest
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(rest.len());
        }
        chunks.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    chunks
}

#[cfg(test)]
mod tests {
    use crate::tree::{ContentTree, NodeKind};

    #[test]
    fn render_round_trips_flat_text() {
        let text = "first line\nsecond line\n\nfourth";
        let tree = ContentTree::render(text);
        assert_eq!(tree.flat_text(), text);
    }

    #[test]
    fn render_uses_line_break_elements_not_characters() {
        let tree = ContentTree::render("ab\ncd");
        let kinds: Vec<&NodeKind> = tree
            .walk()
            .skip(1) // root
            .map(|id| tree.kind(id))
            .collect();
        assert_eq!(
            kinds,
            vec![
                &NodeKind::Text("ab".to_string()),
                &NodeKind::LineBreak,
                &NodeKind::Text("cd".to_string()),
            ]
        );
    }

    #[test]
    fn trailing_newline_renders_a_trailing_break() {
        let tree = ContentTree::render("ab\n");
        assert_eq!(tree.flat_text(), "ab\n");
        assert_eq!(tree.text_len(), 3);
    }

    #[test]
    fn empty_text_renders_an_empty_tree() {
        let tree = ContentTree::render("");
        assert_eq!(tree.flat_text(), "");
        assert_eq!(tree.text_len(), 0);
    }

    #[test]
    fn fragmented_render_preserves_flat_text() {
        let text = "the quick brown fox\njumps over";
        for chunk_len in 1..=8 {
            let tree = ContentTree::render_fragmented(text, chunk_len);
            assert_eq!(tree.flat_text(), text, "chunk_len = {chunk_len}");
        }
    }

    #[test]
    fn fragmentation_respects_char_boundaries() {
        let text = "héllo wörld";
        for chunk_len in 1..=4 {
            let tree = ContentTree::render_fragmented(text, chunk_len);
            assert_eq!(tree.flat_text(), text, "chunk_len = {chunk_len}");
        }
    }

    #[test]
    fn fragmented_render_produces_more_text_nodes() {
        let plain = ContentTree::render("abcdef");
        let split = ContentTree::render_fragmented("abcdef", 2);

        let count = |t: &ContentTree| {
            t.walk()
                .filter(|&id| matches!(t.kind(id), NodeKind::Text(_)))
                .count()
        };
        assert_eq!(count(&plain), 1);
        assert_eq!(count(&split), 3);
    }
}
