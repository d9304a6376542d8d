// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reverie shell` command implementation.
//!
//! Launches an interactive REPL with colored prompt, streaming output,
//! and readline history. Conversation history is partitioned per user
//! and survives restarts through the configured memory tiers.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use reverie_config::model::ReverieConfig;
use reverie_core::types::UserId;
use reverie_core::{LanguageModel, ReverieError, SentimentClassifier};
use reverie_groq::GroqProvider;
use reverie_memory::MemoryManager;
use reverie_sentiment::LexiconClassifier;

use crate::turn::TurnEngine;

/// Runs the `reverie shell` interactive REPL.
///
/// Streams LLM replies directly to stdout, tags each user message with
/// its sentiment, and records every exchange in the memory tiers. Slash
/// commands operate on the current user's history.
pub async fn run_shell(config: ReverieConfig, user: &str) -> Result<(), ReverieError> {
    let provider: Arc<dyn LanguageModel> =
        Arc::new(GroqProvider::new(&config.groq).inspect_err(|_| {
            eprintln!(
                "error: Groq API key required. Set via: config [groq] api_key or GROQ_API_KEY env var"
            );
        })?);

    let classifier: Arc<dyn SentimentClassifier> = Arc::new(LexiconClassifier::new());
    let memory = Arc::new(MemoryManager::from_config(&config.memory));
    info!(
        cache = memory.cache().is_some(),
        durable = memory.durable().is_some(),
        "memory tiers configured"
    );

    let engine = TurnEngine::new(
        provider,
        classifier,
        memory,
        config.agent.system_prompt.clone(),
        config.groq.max_tokens,
        config.groq.temperature,
    );

    let user = UserId::from(user);

    // Set up readline editor.
    let mut rl = DefaultEditor::new()
        .map_err(|e| ReverieError::Internal(format!("failed to initialize readline: {e}")))?;

    // Print welcome message.
    println!("{}", "reverie shell".bold().green());
    println!(
        "Type {} to exit, {} for history, {} to undo, {} to start over.\n",
        "/quit".yellow(),
        "/recent".yellow(),
        "/undo".yellow(),
        "/clear".yellow()
    );

    // REPL loop.
    let prompt = format!("{}> ", "reverie".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Some(handled) = handle_slash_command(&engine, &user, trimmed).await {
                    if let Err(e) = handled {
                        eprintln!("{}: {e}", "error".red());
                    }
                    continue;
                }

                if let Err(e) = handle_message(&engine, &user, trimmed).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Dispatches `/recent`, `/undo`, and `/clear`. Returns `None` for
/// ordinary messages.
async fn handle_slash_command(
    engine: &TurnEngine,
    user: &UserId,
    input: &str,
) -> Option<Result<(), ReverieError>> {
    match input {
        "/recent" => {
            let recent = engine.memory().load_recent(user).await;
            if recent.is_empty() {
                println!("{}", "no conversation history".dimmed());
            }
            for turn in recent {
                println!("{}", turn.timestamp_label.dimmed());
                println!("  {} {}", "you:".bold(), turn.user_message);
                println!("  {} {}", "reverie:".bold(), turn.ai_response);
            }
            Some(Ok(()))
        }
        "/undo" => {
            if engine.memory().delete_last(user).await {
                println!("{}", "last exchange removed".dimmed());
            } else {
                println!("{}", "nothing to remove".dimmed());
            }
            Some(Ok(()))
        }
        "/clear" => {
            engine.memory().clear_all(user).await;
            println!("{}", "conversation history cleared".dimmed());
            Some(Ok(()))
        }
        _ => None,
    }
}

/// Processes one ordinary message: sentiment tag, streamed reply,
/// persistence notice.
async fn handle_message(
    engine: &TurnEngine,
    user: &UserId,
    input: &str,
) -> Result<(), ReverieError> {
    let report = engine
        .run_turn(user, input, &mut |delta| {
            print!("{delta}");
            std::io::Write::flush(&mut std::io::stdout()).ok();
        })
        .await?;

    // Newline after the streamed reply.
    println!();

    if let Some(sentiment) = report.sentiment {
        println!(
            "{}",
            format!("[{} {:.2}]", sentiment.label, sentiment.score).dimmed()
        );
    }

    if report.outcome.fallback_only() {
        eprintln!(
            "{}",
            "(storage unreachable, this exchange is kept for this session only)".yellow()
        );
    }

    Ok(())
}
