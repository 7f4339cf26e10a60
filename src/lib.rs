//! Addarr - conversational front end for Radarr and Sonarr
//!
//! Addarr turns a chat conversation into library additions: a user names a
//! movie or series, pages through catalog search results, picks a library
//! path, and the matching backend performs the add. The conversation core is
//! transport-agnostic; the bundled transport is a line-oriented console.
//!
//! # Core Concepts
//!
//! - **Events In, Intents Out**: raw text becomes abstract UserEvents at the
//!   boundary; the state machine emits abstract Replies a Presenter renders
//! - **One Worker Per User**: each user's session lives in its own task fed
//!   by an mpsc mailbox, so events apply serially without shared locks
//! - **Labels From the Transcript**: every user-facing string resolves from
//!   a localized YAML table, and a missing key fails fast
//!
//! # Modules
//!
//! - [`catalog`] - catalog client trait and the Radarr/Sonarr implementations
//! - [`conversation`] - events, sessions, the state machine, and workers
//! - [`dispatcher`] - raw text to event translation
//! - [`transcript`] - localized label table
//! - [`auth`] - password gate over chat ids
//! - [`listing`] - series list rendering and message chunking
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod dispatcher;
pub mod listing;
pub mod presenter;
pub mod transcript;

// Re-export commonly used types
pub use auth::Authenticator;
pub use catalog::{
    CatalogClient, CatalogError, MediaKind, MediaResult, RadarrClient, RootFolder, SeriesLister, SeriesOverview,
    SonarrClient,
};
pub use config::Config;
pub use conversation::{Choice, ConversationMachine, ConversationState, Conversations, Reply, Session, UserEvent};
pub use dispatcher::Dispatcher;
pub use presenter::{ConsolePresenter, Presenter};
pub use transcript::Transcript;
