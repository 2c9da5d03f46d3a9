//! Snapping selection boundaries to a granularity.
//!
//! Alignment operates on the flat text value with plain string search, not
//! on tree structure; the capturer translates the aligned offsets back into
//! tree positions afterwards. Word boundaries are spaces and newlines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The minimum unit a selection is snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// No adjustment; boundaries stay where the user put them.
    #[default]
    Symbol,
    /// Boundaries expand outward to whole words.
    Word,
    /// Reserved; alignment is not implemented for sentences.
    Sentence,
    /// Reserved; alignment is not implemented for paragraphs.
    Paragraph,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Symbol => "symbol",
            Granularity::Word => "word",
            Granularity::Sentence => "sentence",
            Granularity::Paragraph => "paragraph",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AlignError {
    /// A named outcome distinct from identity alignment, so callers can
    /// tell "aligned to itself" from "alignment not attempted".
    #[error("{0} granularity is not supported yet")]
    Unsupported(Granularity),
}

/// Aligns `[start, end)` to the given granularity within `text`.
///
/// `Symbol` is the identity. `Word` expands the start backward to the
/// character just after the nearest preceding space or newline (or to 0)
/// and the end forward to the character just before the nearest following
/// space or newline (or to the end of text); a found boundary always beats
/// an absent one, and the nearer of space/newline wins. Already-aligned
/// ranges come back unchanged.
pub fn align(
    text: &str,
    start: usize,
    end: usize,
    granularity: Granularity,
) -> Result<(usize, usize), AlignError> {
    match granularity {
        Granularity::Symbol => Ok((start, end)),
        Granularity::Word => Ok(align_word(text, start, end)),
        g @ (Granularity::Sentence | Granularity::Paragraph) => Err(AlignError::Unsupported(g)),
    }
}

fn align_word(text: &str, start: usize, end: usize) -> (usize, usize) {
    let start = start.min(text.len());
    let end = end.min(text.len()).max(start);

    // Backward: the larger of the two candidate indices is nearer, and
    // Option's ordering (None < Some) discards the absent one for free.
    let head = &text[..start];
    let preceding = head.rfind(' ').max(head.rfind('\n'));
    let aligned_start = preceding.map(|i| i + 1).unwrap_or(0);

    // Forward: the smaller found index is nearer; a found index is never
    // lost to an absent one.
    let tail = &text[end..];
    let following = match (tail.find(' '), tail.find('\n')) {
        (Some(space), Some(newline)) => Some(space.min(newline)),
        (space, newline) => space.or(newline),
    };
    let aligned_end = following.map(|i| end + i).unwrap_or(text.len());

    (aligned_start, aligned_end)
}
