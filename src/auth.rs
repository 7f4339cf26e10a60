//! Authentication gate
//!
//! The conversation core only gates on a pass/fail check. A chat id is
//! approved either by config or by sending the configured password once;
//! approvals last for the process lifetime.

use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::config::AuthConfig;

/// Tracks which chat ids are approved to use the bot
pub struct Authenticator {
    password: String,
    approved: Mutex<HashSet<i64>>,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            password: config.password.clone(),
            approved: Mutex::new(config.approved_chat_ids.iter().copied().collect()),
        }
    }

    /// The pass/fail check the state machine gates transitions on
    pub fn is_authorized(&self, user: i64) -> bool {
        self.approved.lock().unwrap().contains(&user)
    }

    /// Approve a user on an exact password match
    ///
    /// An empty configured password never matches; that deployment runs on
    /// the approved-chat-ids list alone.
    pub fn try_password(&self, user: i64, attempt: &str) -> bool {
        if !self.password.is_empty() && attempt == self.password {
            info!(user, "authentication succeeded");
            self.approved.lock().unwrap().insert(user);
            true
        } else {
            warn!(user, "authentication attempt rejected");
            false
        }
    }
}
