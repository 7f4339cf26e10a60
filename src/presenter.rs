//! Presenter trait and console implementation
//!
//! The conversation core emits abstract Reply intents; a Presenter renders
//! them for one concrete transport. The console presenter here is what the
//! bundled line-oriented transport uses.

use async_trait::async_trait;
use colored::Colorize;
use eyre::Result;

use crate::conversation::Choice;

/// Renders output intents for one transport
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show plain explanatory text
    async fn show_text(&self, user: i64, text: &str) -> Result<()>;

    /// Show text with labeled choices attached
    async fn show_prompt(&self, user: i64, text: &str, options: &[Choice]) -> Result<()>;

    /// Show a poster or other media reference
    async fn show_media(&self, user: i64, poster: &str) -> Result<()>;
}

/// Prints replies to stdout, one conversation turn at a time
pub struct ConsolePresenter;

#[async_trait]
impl Presenter for ConsolePresenter {
    async fn show_text(&self, user: i64, text: &str) -> Result<()> {
        println!("{} {}", format!("[{}]", user).dimmed(), text);
        Ok(())
    }

    async fn show_prompt(&self, user: i64, text: &str, options: &[Choice]) -> Result<()> {
        println!("{} {}", format!("[{}]", user).dimmed(), text);
        for option in options {
            println!("    {}", format!("[{}]", option.label).bright_cyan());
        }
        Ok(())
    }

    async fn show_media(&self, user: i64, poster: &str) -> Result<()> {
        println!("{} {}", format!("[{}]", user).dimmed(), poster.underline());
        Ok(())
    }
}
