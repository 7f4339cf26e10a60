//! Conversation core
//!
//! - [`events`]: abstract input events and output intents
//! - [`session`]: per-user mutable state
//! - [`machine`]: the state machine driving one session
//! - [`manager`]: per-user worker tasks with mpsc mailboxes

pub mod events;
pub mod machine;
pub mod manager;
pub mod session;

pub use events::{Choice, Reply, UserEvent};
pub use machine::ConversationMachine;
pub use manager::Conversations;
pub use session::{ConversationState, Session};
