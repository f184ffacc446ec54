//! Interactive console entry point.
//!
//! Wires the real adapters together and runs a line-based chat loop over
//! a single conversation.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use learnpath::adapters::ai::{AnthropicConfig, AnthropicProvider};
use learnpath::adapters::search::{YouTubeConfig, YouTubeSearch};
use learnpath::adapters::storage::{InMemoryPathRepository, InMemorySessionStore};
use learnpath::application::{HandleTurnHandler, TurnCommand};
use learnpath::config::AppConfig;
use learnpath::domain::foundation::ConversationId;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let ai_key = config.ai.anthropic_api_key.clone().unwrap_or_default();
    let provider = AnthropicProvider::new(
        AnthropicConfig::new(ai_key)
            .with_model(config.ai.model.clone())
            .with_timeout(config.ai.timeout()),
    )?;

    let search_key = config.search.youtube_api_key.clone().unwrap_or_default();
    let search =
        YouTubeSearch::new(YouTubeConfig::new(search_key).with_timeout(config.search.timeout()))?;

    let sessions = Arc::new(InMemorySessionStore::with_ttl(config.session.ttl()));
    let paths = Arc::new(InMemoryPathRepository::new());

    let handler = HandleTurnHandler::new(sessions, Arc::new(search), Arc::new(provider), paths)
        .with_max_results(config.search.max_results);

    let conversation_id = ConversationId::new();
    info!(%conversation_id, "starting chat session");
    println!("What would you like to learn? (ctrl-d to quit)");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let response = handler
            .handle(TurnCommand {
                conversation_id,
                user_id: None,
                utterance: line,
            })
            .await?;

        println!("{}", response.prompt_text);

        if let Some(path) = &response.learning_path {
            for stage in &path.stages {
                println!("\n  Stage {}: {}", stage.stage_number, stage.stage_name);
                for video in &stage.videos {
                    println!(
                        "    {}. {} ({}) - {}",
                        video.order, video.title, video.estimated_time, video.url
                    );
                }
            }
            println!();
        } else if let Some(tutorials) = &response.tutorials {
            for (i, candidate) in tutorials.iter().enumerate() {
                println!(
                    "  {}. {} ({}) - {}",
                    i + 1,
                    candidate.title,
                    candidate.duration_label,
                    candidate.url
                );
            }
        }
    }

    Ok(())
}
