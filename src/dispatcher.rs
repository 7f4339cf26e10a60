//! Raw text to event translation
//!
//! The transport hands over raw strings: typed messages and choice callback
//! payloads look the same. The dispatcher turns them into UserEvent tags in
//! one place, so the state machine never sees localized labels. All phrase
//! and label matching is case-insensitive on trimmed input with an optional
//! leading '/'; the "Path: " payload keeps its case.

use eyre::Result;
use tracing::debug;

use crate::catalog::MediaKind;
use crate::config::EntrypointsConfig;
use crate::conversation::UserEvent;
use crate::transcript::Transcript;

const PATH_PREFIX: &str = "Path: ";

/// Translates raw input into events
///
/// Entry phrases come from the config, labels from the transcript; both are
/// resolved once at construction so a broken transcript fails at startup.
pub struct Dispatcher {
    auth_phrase: String,
    add_phrase: String,
    all_series_phrase: String,
    help_phrase: String,
    movie_label: String,
    serie_label: String,
    add_label: String,
    next_label: String,
    new_label: String,
    stop_label: String,
}

impl Dispatcher {
    pub fn new(entrypoints: &EntrypointsConfig, transcript: &Transcript) -> Result<Self> {
        Ok(Self {
            auth_phrase: entrypoints.auth.to_lowercase(),
            add_phrase: entrypoints.add.to_lowercase(),
            all_series_phrase: entrypoints.all_series.to_lowercase(),
            help_phrase: entrypoints.help.to_lowercase(),
            movie_label: transcript.kind_label(MediaKind::Movie)?.to_lowercase(),
            serie_label: transcript.kind_label(MediaKind::Serie)?.to_lowercase(),
            add_label: transcript.resolve("Add")?.to_lowercase(),
            next_label: transcript.resolve("Next result")?.to_lowercase(),
            new_label: transcript.resolve("New")?.to_lowercase(),
            stop_label: transcript.resolve("Stop")?.to_lowercase(),
        })
    }

    /// Classify one raw input string
    pub fn dispatch(&self, raw: &str) -> UserEvent {
        let trimmed = raw.trim();

        // Destination callbacks carry a case-sensitive path payload
        if let Some(path) = trimmed.strip_prefix(PATH_PREFIX) {
            return UserEvent::PathSelected(path.to_string());
        }

        let normalized = trimmed.strip_prefix('/').unwrap_or(trimmed).to_lowercase();

        let event = if normalized == self.auth_phrase {
            UserEvent::AuthRequested
        } else if normalized == self.add_phrase {
            UserEvent::StartFlow
        } else if normalized == self.all_series_phrase {
            UserEvent::ListSeries
        } else if normalized == self.help_phrase {
            UserEvent::Help
        } else if normalized == "stop" || normalized == self.stop_label {
            UserEvent::StopRequested
        } else if normalized == self.movie_label {
            UserEvent::KindSelected(MediaKind::Movie)
        } else if normalized == self.serie_label {
            UserEvent::KindSelected(MediaKind::Serie)
        } else if normalized == self.add_label {
            UserEvent::AddRequested
        } else if normalized == self.next_label {
            UserEvent::NextResult
        } else if normalized == self.new_label {
            UserEvent::NewSearch
        } else {
            UserEvent::Text(trimmed.to_string())
        };

        debug!(input = %trimmed, event = ?event, "dispatch: classified");
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = r#"
en:
  Movie: "Movie"
  Serie: "Serie"
  Add: "Add"
  Next result: "Next result"
  New: "New"
  Stop: "Stop"
"#;

    fn dispatcher() -> Dispatcher {
        let transcript = Transcript::from_str(TRANSCRIPT, "en").unwrap();
        Dispatcher::new(&EntrypointsConfig::default(), &transcript).unwrap()
    }

    #[test]
    fn test_entry_phrases() {
        let d = dispatcher();
        assert_eq!(d.dispatch("start"), UserEvent::StartFlow);
        assert_eq!(d.dispatch("/start"), UserEvent::StartFlow);
        assert_eq!(d.dispatch("  START  "), UserEvent::StartFlow);
        assert_eq!(d.dispatch("auth"), UserEvent::AuthRequested);
        assert_eq!(d.dispatch("allseries"), UserEvent::ListSeries);
        assert_eq!(d.dispatch("help"), UserEvent::Help);
    }

    #[test]
    fn test_kind_labels() {
        let d = dispatcher();
        assert_eq!(d.dispatch("movie"), UserEvent::KindSelected(MediaKind::Movie));
        assert_eq!(d.dispatch("Serie"), UserEvent::KindSelected(MediaKind::Serie));
    }

    #[test]
    fn test_result_option_labels() {
        let d = dispatcher();
        assert_eq!(d.dispatch("Add"), UserEvent::AddRequested);
        assert_eq!(d.dispatch("next result"), UserEvent::NextResult);
        assert_eq!(d.dispatch("New"), UserEvent::NewSearch);
        assert_eq!(d.dispatch("Stop"), UserEvent::StopRequested);
        assert_eq!(d.dispatch("/stop"), UserEvent::StopRequested);
    }

    #[test]
    fn test_path_payload_keeps_case() {
        let d = dispatcher();
        assert_eq!(
            d.dispatch("Path: /Movies/4K"),
            UserEvent::PathSelected("/Movies/4K".to_string())
        );
    }

    #[test]
    fn test_free_text_passes_through_trimmed() {
        let d = dispatcher();
        assert_eq!(
            d.dispatch("  The Matrix  "),
            UserEvent::Text("The Matrix".to_string())
        );
        // A title that merely contains a label is still free text
        assert_eq!(
            d.dispatch("Add me to the list"),
            UserEvent::Text("Add me to the list".to_string())
        );
    }
}
