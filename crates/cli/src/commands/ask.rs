//! Ask command handler.
//!
//! One-shot question answering: wire the engine against the configured
//! collaborators, ask, print the reply.

use clap::Args;
use dawaa_chat::ChatEngine;
use dawaa_core::{config::AppConfig, AppResult};

/// Ask a single question and print the reply
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question, in English or Arabic
    pub question: String,

    /// User id owning the conversation session
    #[arg(short, long)]
    pub user: Option<String>,

    /// Output a JSON envelope instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::debug!("Ask command options: {:?}", self);

        let engine = ChatEngine::from_config(config)?;
        let reply = engine.ask(&self.question, self.user.as_deref()).await?;

        if self.json {
            let envelope = serde_json::json!({ "reply": reply });
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        } else {
            println!("{}", reply);
        }

        Ok(())
    }
}
