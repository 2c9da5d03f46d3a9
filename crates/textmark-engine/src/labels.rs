//! Label-state snapshots attached to regions.
//!
//! The set of control kinds is a closed enumeration with an explicit
//! selectability predicate, so nothing in the engine ever dispatches on a
//! control's name string.

use serde::{Deserialize, Serialize};

/// One selectable label option: a value and the background color its
/// markers render with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub value: String,
    pub background: String,
}

impl Label {
    pub fn new(value: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            background: background.into(),
        }
    }
}

/// A snapshot of one labeling control's state at capture time.
///
/// `from_name` identifies the control instance the state came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum LabelState {
    /// A label group with the labels currently toggled on.
    Labels {
        from_name: String,
        selected: Vec<Label>,
    },
    /// A numeric rating control.
    Rating { from_name: String, value: u8 },
    /// A single/multi choice control.
    Choice {
        from_name: String,
        selected: Vec<String>,
    },
    /// Free-text entries.
    TextArea {
        from_name: String,
        entries: Vec<String>,
    },
}

impl LabelState {
    /// Whether this state variant creates visually tagged spans. Label
    /// groups and ratings do; choices and text areas are per-region form
    /// inputs and do not.
    pub fn is_selectable(&self) -> bool {
        matches!(self, LabelState::Labels { .. } | LabelState::Rating { .. })
    }

    /// Whether the control currently holds a value worth attaching to a
    /// new region.
    pub fn is_active(&self) -> bool {
        match self {
            LabelState::Labels { selected, .. } => !selected.is_empty(),
            LabelState::Rating { value, .. } => *value > 0,
            LabelState::Choice { selected, .. } => !selected.is_empty(),
            LabelState::TextArea { entries, .. } => !entries.is_empty(),
        }
    }

    /// The control instance this state came from.
    pub fn from_name(&self) -> &str {
        match self {
            LabelState::Labels { from_name, .. }
            | LabelState::Rating { from_name, .. }
            | LabelState::Choice { from_name, .. }
            | LabelState::TextArea { from_name, .. } => from_name,
        }
    }

    /// The marker background colors this state contributes.
    pub fn colors(&self) -> Vec<String> {
        match self {
            LabelState::Labels { selected, .. } => {
                selected.iter().map(|l| l.background.clone()).collect()
            }
            _ => Vec::new(),
        }
    }
}
