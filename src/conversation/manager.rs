//! Per-user conversation workers
//!
//! Each user gets one worker task owning that user's Session, fed through
//! an mpsc mailbox. Events for one user are processed strictly in arrival
//! order; events for different users run concurrently. The session never
//! leaves its worker, so no lock guards conversation state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error};

use super::events::{Reply, UserEvent};
use super::machine::ConversationMachine;
use super::session::Session;
use crate::presenter::Presenter;

const MAILBOX_DEPTH: usize = 32;

/// Owns the worker tasks and routes events to them
pub struct Conversations {
    machine: Arc<ConversationMachine>,
    presenter: Arc<dyn Presenter>,
    workers: Mutex<HashMap<i64, mpsc::Sender<UserEvent>>>,
}

impl Conversations {
    pub fn new(machine: Arc<ConversationMachine>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            machine,
            presenter,
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Queue one event for a user, spawning that user's worker on first use
    ///
    /// Applies backpressure when the user's mailbox is full rather than
    /// dropping events.
    pub async fn dispatch(&self, user: i64, event: UserEvent) {
        let sender = {
            let mut workers = self.workers.lock().await;
            workers
                .entry(user)
                .or_insert_with(|| self.spawn_worker(user))
                .clone()
        };

        if let Err(mpsc::error::SendError(event)) = sender.send(event).await {
            // Worker is gone; drop the stale handle and retry once
            error!(user, "dispatch: worker mailbox closed, respawning");
            let sender = {
                let mut workers = self.workers.lock().await;
                let fresh = self.spawn_worker(user);
                workers.insert(user, fresh.clone());
                fresh
            };
            if sender.send(event).await.is_err() {
                error!(user, "dispatch: respawned worker also unreachable");
            }
        }
    }

    fn spawn_worker(&self, user: i64) -> mpsc::Sender<UserEvent> {
        let (tx, mut rx) = mpsc::channel::<UserEvent>(MAILBOX_DEPTH);
        let machine = self.machine.clone();
        let presenter = self.presenter.clone();

        tokio::spawn(async move {
            debug!(user, "worker: started");
            let mut session = Session::default();

            while let Some(event) = rx.recv().await {
                match machine.handle(user, &mut session, event).await {
                    Ok(replies) => {
                        if let Err(e) = render(presenter.as_ref(), user, &replies).await {
                            error!(user, error = %e, "worker: presenter failed");
                        }
                    }
                    Err(e) => {
                        // Configuration errors surface in the log, not the chat
                        error!(user, error = %e, "worker: transition failed");
                    }
                }
            }
            debug!(user, "worker: mailbox closed, exiting");
        });

        tx
    }
}

async fn render(presenter: &dyn Presenter, user: i64, replies: &[Reply]) -> eyre::Result<()> {
    for reply in replies {
        match reply {
            Reply::Text(text) => presenter.show_text(user, text).await?,
            Reply::Prompt { text, options } => presenter.show_prompt(user, text, options).await?,
            Reply::Media { poster } => presenter.show_media(user, poster).await?,
        }
    }
    Ok(())
}
