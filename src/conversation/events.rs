//! Abstract event and output-intent types
//!
//! Raw chat input is translated into UserEvent tags at the boundary (the
//! dispatcher), so transition logic never compares localized label strings.
//! Replies are abstract intents; the presenter owns all transport markup.

use crate::catalog::MediaKind;

/// One labeled choice offered to the user
///
/// `data` is what the transport feeds back when the choice is taken; it
/// round-trips through the dispatcher like typed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub data: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }

    /// A choice whose callback payload is its own label
    pub fn plain(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            data: label.clone(),
            label,
        }
    }
}

/// One user input event, already translated from raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// The add flow was invoked without a kind
    StartFlow,

    /// A kind keyword, either as a flow entry command or a button press
    KindSelected(MediaKind),

    /// Free text (a title, or a password while authenticating)
    Text(String),

    /// The user asked to add the currently shown result
    AddRequested,

    /// Advance to the next search result
    NextResult,

    /// Throw the current flow away and start over
    NewSearch,

    /// A destination callback ("Path: ...")
    PathSelected(String),

    /// Stop, accepted from any active state
    StopRequested,

    /// The authentication entry phrase
    AuthRequested,

    /// List every series in the library
    ListSeries,

    /// Show usage help
    Help,
}

/// One output intent produced by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain explanatory text
    Text(String),

    /// Text with labeled choices attached
    Prompt { text: String, options: Vec<Choice> },

    /// A poster or other media reference
    Media { poster: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_choice_round_trips_label() {
        let choice = Choice::plain("Add");
        assert_eq!(choice.label, "Add");
        assert_eq!(choice.data, "Add");
    }

    #[test]
    fn test_choice_with_payload() {
        let choice = Choice::new("Path: /movies, Free: 2.00 GB", "Path: /movies");
        assert_eq!(choice.data, "Path: /movies");
    }
}
