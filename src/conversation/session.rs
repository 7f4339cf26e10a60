//! Per-user conversation session state

use crate::catalog::{MediaKind, MediaResult, RootFolder};

/// Resting states of the conversation state machine
///
/// Searching and completing are internal steps inside a transition, not
/// states the session can be observed in between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// No flow in progress
    #[default]
    Idle,

    /// Waiting for the user to authenticate
    AwaitingAuth,

    /// Waiting for a free-text title or a kind keyword
    CaptureTitleOrKind,

    /// The movie/serie choice prompt is showing
    ReadChoice,

    /// A search result is showing, awaiting add/next/new/stop
    PresentingResult,

    /// The destination prompt is showing
    AwaitingDestination,
}

/// All mutable state for one user's conversation
///
/// Owned exclusively by that user's worker task; the state machine is the
/// only code that mutates it.
#[derive(Debug, Default)]
pub struct Session {
    pub state: ConversationState,
    pub kind: Option<MediaKind>,
    pub title: Option<String>,
    pub results: Vec<MediaResult>,
    pub cursor: usize,
    pub destination_candidates: Vec<RootFolder>,
    pub chosen_destination: Option<String>,
}

impl Session {
    /// Current result under the cursor, when one exists
    pub fn current_result(&self) -> Option<&MediaResult> {
        self.results.get(self.cursor)
    }

    /// Clear every transient field and return to Idle
    ///
    /// Runs on success, failure, stop, and result exhaustion. Idempotent.
    pub fn clear(&mut self) {
        self.state = ConversationState::Idle;
        self.kind = None;
        self.title = None;
        self.results.clear();
        self.cursor = 0;
        self.destination_candidates.clear();
        self.chosen_destination = None;
    }

    /// True when every transient field is empty
    pub fn is_cleared(&self) -> bool {
        self.state == ConversationState::Idle
            && self.kind.is_none()
            && self.title.is_none()
            && self.results.is_empty()
            && self.cursor == 0
            && self.destination_candidates.is_empty()
            && self.chosen_destination.is_none()
    }
}
