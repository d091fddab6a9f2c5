//! Chat command handler.
//!
//! Interactive stdin loop over one engine instance, so the multi-turn
//! state machine (confirmations, variant selection, follow-ups) is
//! observable from the terminal.

use std::io::{self, BufRead, Write};

use clap::Args;
use dawaa_chat::ChatEngine;
use dawaa_core::{config::AppConfig, AppResult};

/// Start an interactive conversation
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// User id owning the conversation session
    #[arg(short, long)]
    pub user: Option<String>,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let engine = ChatEngine::from_config(config)?;

        println!("dawaa - ask about any medicine, in English or Arabic.");
        println!("Type 'exit' to quit.\n");

        let stdin = io::stdin();
        let mut line = String::new();

        loop {
            print!("> ");
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            let input = line.trim();
            if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                break;
            }

            let reply = engine.ask(input, self.user.as_deref()).await?;
            println!("{}\n", reply);
        }

        println!("Goodbye!");
        Ok(())
    }
}
