//! Conversation state machine
//!
//! Drives one user's add flow: pick movie/series, enter a title, search,
//! page through results, pick a library path, confirm the add. Transitions
//! are keyed on abstract UserEvent tags; every label shown to the user
//! comes from the transcript. Searching and completing run inline within a
//! transition, so the session is never observable mid-call.

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, warn};

use super::events::{Choice, Reply, UserEvent};
use super::session::{ConversationState, Session};
use crate::auth::Authenticator;
use crate::catalog::{CatalogClient, CatalogError, MediaKind, SeriesLister};
use crate::listing::{MESSAGE_LIMIT, chunk_lines, format_bytes, render_series};
use crate::transcript::Transcript;

/// The finite-state controller over one session
///
/// Stateless itself - all mutable state lives in the Session passed into
/// each call, so one machine serves every user.
pub struct ConversationMachine {
    movies: Arc<dyn CatalogClient>,
    series: Arc<dyn CatalogClient>,
    lister: Arc<dyn SeriesLister>,
    transcript: Arc<Transcript>,
    auth: Arc<Authenticator>,
}

impl ConversationMachine {
    pub fn new(
        movies: Arc<dyn CatalogClient>,
        series: Arc<dyn CatalogClient>,
        lister: Arc<dyn SeriesLister>,
        transcript: Arc<Transcript>,
        auth: Arc<Authenticator>,
    ) -> Self {
        Self {
            movies,
            series,
            lister,
            transcript,
            auth,
        }
    }

    /// Process one event against one session
    ///
    /// Returns the output intents to render. Errors are configuration
    /// problems (missing transcript key, unresolved kind, zero root
    /// folders) that the caller logs rather than masks.
    pub async fn handle(&self, user: i64, session: &mut Session, event: UserEvent) -> Result<Vec<Reply>> {
        debug!(user, state = ?session.state, event = ?event, "handle: called");

        // Stop takes precedence over any state-specific input
        if event == UserEvent::StopRequested {
            return self.stop(session);
        }

        if event == UserEvent::Help {
            return Ok(vec![Reply::Text(self.transcript.resolve("Help")?)]);
        }

        if event == UserEvent::AuthRequested {
            return self.begin_auth(user, session);
        }

        // Everything past this point needs an authorized user
        if !self.auth.is_authorized(user) {
            return self.gate_unauthorized(user, session, event);
        }

        // A pre-approved user can arrive here still parked in AwaitingAuth
        if session.state == ConversationState::AwaitingAuth {
            session.state = ConversationState::Idle;
        }

        if event == UserEvent::ListSeries {
            return self.list_series().await;
        }

        match session.state {
            ConversationState::Idle => match event {
                UserEvent::StartFlow | UserEvent::NewSearch => self.start_flow(session, None),
                UserEvent::KindSelected(kind) => self.start_flow(session, Some(kind)),
                _ => {
                    debug!(user, "handle: input outside any flow, ignoring");
                    Ok(Vec::new())
                }
            },

            ConversationState::AwaitingAuth => unreachable!("authorized users never rest in AwaitingAuth"),

            ConversationState::CaptureTitleOrKind => match event {
                UserEvent::Text(title) => {
                    debug!(user, %title, "handle: captured title");
                    session.title = Some(title);
                    if session.kind.is_some() {
                        self.run_search(session).await
                    } else {
                        self.kind_prompt(session)
                    }
                }
                UserEvent::KindSelected(kind) => {
                    session.kind = Some(kind);
                    if session.title.is_some() {
                        self.run_search(session).await
                    } else {
                        self.title_prompt()
                    }
                }
                UserEvent::NewSearch => self.start_flow(session, None),
                _ => self.title_prompt(),
            },

            ConversationState::ReadChoice => match event {
                UserEvent::KindSelected(kind) => {
                    session.kind = Some(kind);
                    if session.title.is_some() {
                        self.run_search(session).await
                    } else {
                        session.state = ConversationState::CaptureTitleOrKind;
                        self.title_prompt()
                    }
                }
                UserEvent::NewSearch => self.start_flow(session, None),
                _ => self.kind_prompt(session),
            },

            ConversationState::PresentingResult => match event {
                UserEvent::AddRequested => self.begin_destination(session).await,
                UserEvent::NextResult => self.next_result(session),
                UserEvent::NewSearch => self.start_flow(session, None),
                // Unrecognized input is rejected by repeating the prompt
                _ => self.present_current(session),
            },

            ConversationState::AwaitingDestination => match event {
                UserEvent::PathSelected(path) => {
                    if session.destination_candidates.iter().any(|f| f.path == path) {
                        session.chosen_destination = Some(path);
                        self.complete_add(session).await
                    } else {
                        warn!(user, %path, "handle: destination not among candidates, re-prompting");
                        self.destination_prompt(session)
                    }
                }
                _ => self.destination_prompt(session),
            },
        }
    }

    /// Resolve the catalog for the session's kind; unset kind fails fast
    fn catalog(&self, kind: Option<MediaKind>) -> Result<(&Arc<dyn CatalogClient>, MediaKind)> {
        match kind {
            Some(MediaKind::Movie) => Ok((&self.movies, MediaKind::Movie)),
            Some(MediaKind::Serie) => Ok((&self.series, MediaKind::Serie)),
            None => Err(eyre::eyre!("cannot resolve a catalog while kind is unset")),
        }
    }

    fn stop(&self, session: &mut Session) -> Result<Vec<Reply>> {
        let replies = vec![Reply::Text(self.transcript.resolve("End")?)];
        session.clear();
        Ok(replies)
    }

    fn begin_auth(&self, user: i64, session: &mut Session) -> Result<Vec<Reply>> {
        if self.auth.is_authorized(user) {
            return Ok(vec![Reply::Text(self.transcript.resolve("Chatid already allowed")?)]);
        }
        session.state = ConversationState::AwaitingAuth;
        Ok(vec![Reply::Text(self.transcript.resolve("Authorize")?)])
    }

    /// Re-prompt until authentication succeeds; a text event while waiting
    /// is treated as a password attempt
    fn gate_unauthorized(&self, user: i64, session: &mut Session, event: UserEvent) -> Result<Vec<Reply>> {
        if session.state == ConversationState::AwaitingAuth
            && let UserEvent::Text(attempt) = &event
        {
            if self.auth.try_password(user, attempt) {
                session.state = ConversationState::Idle;
                return Ok(vec![Reply::Text(self.transcript.resolve("Chatid added")?)]);
            }
            return Ok(vec![Reply::Text(self.transcript.resolve("Wrong password")?)]);
        }

        session.state = ConversationState::AwaitingAuth;
        Ok(vec![Reply::Text(self.transcript.resolve("Authorize")?)])
    }

    fn start_flow(&self, session: &mut Session, kind: Option<MediaKind>) -> Result<Vec<Reply>> {
        session.clear();
        session.kind = kind;
        session.state = ConversationState::CaptureTitleOrKind;
        self.title_prompt()
    }

    fn title_prompt(&self) -> Result<Vec<Reply>> {
        Ok(vec![Reply::Text(self.transcript.resolve("Title")?)])
    }

    fn kind_prompt(&self, session: &mut Session) -> Result<Vec<Reply>> {
        session.state = ConversationState::ReadChoice;
        Ok(vec![Reply::Prompt {
            text: self.transcript.resolve("What is this?")?,
            options: vec![
                Choice::plain(self.transcript.kind_label(MediaKind::Movie)?),
                Choice::plain(self.transcript.kind_label(MediaKind::Serie)?),
                Choice::plain(self.transcript.resolve("New")?),
            ],
        }])
    }

    async fn run_search(&self, session: &mut Session) -> Result<Vec<Reply>> {
        let (catalog, kind) = self.catalog(session.kind)?;
        let title = session
            .title
            .clone()
            .ok_or_else(|| eyre::eyre!("search invoked without a title"))?;

        let results = match catalog.search(&title).await {
            Ok(results) => results,
            Err(e) => return self.backend_failure(session, kind, e),
        };

        if results.is_empty() {
            debug!(%title, %kind, "run_search: no results");
            let replies = vec![Reply::Text(self.transcript.resolve("No results")?)];
            session.clear();
            return Ok(replies);
        }

        debug!(%title, %kind, count = results.len(), "run_search: presenting first result");
        session.results = results;
        session.cursor = 0;
        session.state = ConversationState::PresentingResult;
        self.present_current(session)
    }

    /// Emit the result under the cursor: per-kind header, poster, then the
    /// title line with the option row
    fn present_current(&self, session: &Session) -> Result<Vec<Reply>> {
        let (_, kind) = self.catalog(session.kind)?;
        let item = session
            .current_result()
            .ok_or_else(|| eyre::eyre!("no result under cursor {}", session.cursor))?;

        let mut replies = vec![Reply::Text(self.transcript.resolve_kind(kind, "This")?)];
        if let Some(poster) = &item.poster {
            replies.push(Reply::Media { poster: poster.clone() });
        }
        replies.push(Reply::Prompt {
            text: format!("{} ({})", item.title, item.year),
            options: vec![
                Choice::plain(self.transcript.resolve("Add")?),
                Choice::plain(self.transcript.resolve("Next result")?),
                Choice::plain(self.transcript.resolve("New")?),
                Choice::plain(self.transcript.resolve("Stop")?),
            ],
        });
        Ok(replies)
    }

    /// Advance the cursor; past the last result the flow terminates
    fn next_result(&self, session: &mut Session) -> Result<Vec<Reply>> {
        session.cursor += 1;
        if session.cursor < session.results.len() {
            self.present_current(session)
        } else {
            debug!("next_result: results exhausted");
            let replies = vec![Reply::Text(self.transcript.resolve("Last result")?)];
            session.clear();
            Ok(replies)
        }
    }

    async fn begin_destination(&self, session: &mut Session) -> Result<Vec<Reply>> {
        let (catalog, kind) = self.catalog(session.kind)?;

        let folders = match catalog.root_folders().await {
            Ok(folders) => folders,
            Err(e) => return self.backend_failure(session, kind, e),
        };

        // Zero destinations is a deployment error, not a user-facing outcome
        if folders.is_empty() {
            return Err(eyre::eyre!("{} backend has no root folders configured", kind));
        }

        if folders.len() == 1 {
            debug!(path = %folders[0].path, "begin_destination: single root folder, skipping selection");
            session.chosen_destination = Some(folders[0].path.clone());
            return self.complete_add(session).await;
        }

        session.destination_candidates = folders;
        session.state = ConversationState::AwaitingDestination;
        self.destination_prompt(session)
    }

    fn destination_prompt(&self, session: &Session) -> Result<Vec<Reply>> {
        let options = session
            .destination_candidates
            .iter()
            .map(|f| {
                Choice::new(
                    format!("Path: {}, Free: {}", f.path, format_bytes(f.free_space)),
                    format!("Path: {}", f.path),
                )
            })
            .collect();

        Ok(vec![Reply::Prompt {
            text: self.transcript.resolve("Select a path")?,
            options,
        }])
    }

    /// Membership check then add; every outcome is terminal
    async fn complete_add(&self, session: &mut Session) -> Result<Vec<Reply>> {
        let (catalog, kind) = self.catalog(session.kind)?;
        let remote_id = session
            .current_result()
            .ok_or_else(|| eyre::eyre!("add requested without a result under the cursor"))?
            .remote_id;
        let path = session
            .chosen_destination
            .clone()
            .ok_or_else(|| eyre::eyre!("add requested without a chosen destination"))?;

        let present = match catalog.in_library(remote_id).await {
            Ok(present) => present,
            Err(e) => return self.backend_failure(session, kind, e),
        };
        if present {
            debug!(%remote_id, %kind, "complete_add: already in library");
            let replies = vec![Reply::Text(self.transcript.resolve_kind(kind, "Exist")?)];
            session.clear();
            return Ok(replies);
        }

        let key = match catalog.add_to_library(remote_id, &path).await {
            Ok(true) => {
                debug!(%remote_id, %kind, %path, "complete_add: added");
                "Success"
            }
            Ok(false) => {
                warn!(%remote_id, %kind, "complete_add: backend rejected the add");
                "Failed"
            }
            Err(e) => return self.backend_failure(session, kind, e),
        };

        let replies = vec![Reply::Text(self.transcript.resolve_kind(kind, key)?)];
        session.clear();
        Ok(replies)
    }

    /// A backend failure ends the flow with one "Failed" message; a
    /// configuration failure propagates instead of being masked
    fn backend_failure(&self, session: &mut Session, kind: MediaKind, error: CatalogError) -> Result<Vec<Reply>> {
        if error.is_configuration() {
            session.clear();
            return Err(error.into());
        }
        warn!(%kind, error = %error, "backend call failed, ending flow");
        let replies = vec![Reply::Text(self.transcript.resolve_kind(kind, "Failed")?)];
        session.clear();
        Ok(replies)
    }

    async fn list_series(&self) -> Result<Vec<Reply>> {
        let series = self.lister.list_series().await?;
        let text = render_series(&series);
        Ok(chunk_lines(&text, MESSAGE_LIMIT).into_iter().map(Reply::Text).collect())
    }
}
