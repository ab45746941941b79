// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pulse chat` command implementation.
//!
//! Launches an interactive REPL with colored prompt, streaming output,
//! and readline history. Each invocation creates a new session unless
//! `--session` names one to resume.

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use pulse_agent::{
    ChatAgent, ChatSessionManager, PipelineEvent, PipelineSettings, ResponseOrchestrator,
};
use pulse_config::PulseConfig;
use pulse_core::types::{ChatSession, ReasoningStep, StepStatus};
use pulse_core::{MemoryVault, ProviderAdapter, PulseError, StorageAdapter};
use pulse_gemini::GeminiProvider;
use pulse_memory::CognitiveMemory;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Runs the `pulse chat` interactive REPL.
pub async fn run_chat(config: PulseConfig, session_id: Option<String>) -> Result<(), PulseError> {
    let provider: Arc<dyn ProviderAdapter> =
        Arc::new(GeminiProvider::new(&config).inspect_err(|_| {
            eprintln!(
                "error: Gemini API key required. Set gemini.api_key in pulse.toml or the GEMINI_API_KEY environment variable."
            );
        })?);

    let storage = crate::open_storage(&config).await?;
    let vault: Arc<dyn MemoryVault> = storage.clone();

    let orchestrator = ResponseOrchestrator::new(
        provider,
        CognitiveMemory::new(vault),
        PipelineSettings::from_config(&config),
    );
    let agent = ChatAgent::new(ChatSessionManager::new(storage.clone()), orchestrator);

    let mut session = open_session(&agent, &config, session_id).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| PulseError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", config.assistant.name.bold().green());
    println!("{}", engine_banner(&config).dimmed());
    println!(
        "{}",
        format!("session {} ({})", session.id, session.title).dimmed()
    );
    println!(
        "Type {} for a fresh session, {} to exit.\n",
        "/new".yellow(),
        "/quit".yellow()
    );

    let mut pending_learning: Vec<JoinHandle<()>> = Vec::new();
    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "/quit" | "/exit" => break,
                    "" => continue,
                    "/new" => {
                        session = agent
                            .sessions()
                            .create(&config.assistant.active_model_id)
                            .await?;
                        println!("{}", format!("session {}", session.id).dimmed());
                        continue;
                    }
                    _ => {}
                }
                let _ = rl.add_history_entry(&line);

                let mut printer = StreamPrinter::default();
                match agent
                    .send(&session.id, trimmed, |event| printer.print(event))
                    .await
                {
                    Ok(outcome) => pending_learning.extend(outcome.learning),
                    Err(e) => eprintln!("\n{}: {e}", "error".red()),
                }
                pending_learning.retain(|h| !h.is_finished());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    // Let in-flight learning finish before the database closes.
    for handle in pending_learning {
        let _ = handle.await;
    }
    storage.close().await?;
    info!(session_id = %session.id, "chat ended");
    Ok(())
}

async fn open_session(
    agent: &ChatAgent,
    config: &PulseConfig,
    session_id: Option<String>,
) -> Result<ChatSession, PulseError> {
    let sessions = agent.sessions();
    let Some(id) = session_id else {
        return sessions.create(&config.assistant.active_model_id).await;
    };
    let session = sessions
        .get(&id)
        .await?
        .ok_or_else(|| PulseError::Config(format!("no session with id {id}")))?;
    let history = sessions.messages(&id).await?;
    debug!(session_id = %id, messages = history.len(), "resuming session");
    for message in &history {
        crate::inspect::print_message(message);
    }
    Ok(session)
}

/// One-line summary of the configured engine, e.g. `Qwen 2.5 Coder 7B · 4-bit · GPU · Balanced`.
fn engine_banner(config: &PulseConfig) -> String {
    let assistant = &config.assistant;
    format!(
        "{} · {} · {} · {}",
        pulse_agent::prompt::engine_name(&assistant.active_model_id),
        assistant.quantization,
        if assistant.use_gpu { "GPU" } else { "CPU" },
        assistant.profile
    )
}

/// Renders pipeline events to the terminal as they stream.
#[derive(Default)]
struct StreamPrinter {
    /// Steps already announced as active.
    announced: usize,
    streaming: bool,
    last_rate: Option<u32>,
}

impl StreamPrinter {
    fn print(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Steps(steps) => self.announce(steps),
            PipelineEvent::Token {
                fragment,
                tokens_per_sec,
            } => {
                if !self.streaming {
                    print!("{} ", "pulse>".cyan());
                    self.streaming = true;
                }
                print!("{fragment}");
                let _ = std::io::stdout().flush();
                self.last_rate = Some(*tokens_per_sec);
            }
            PipelineEvent::Complete { sources, .. } => {
                println!();
                let mut footer = self
                    .last_rate
                    .map(|r| format!("{r} tok/s"))
                    .unwrap_or_default();
                if !sources.is_empty() {
                    if !footer.is_empty() {
                        footer.push_str(" · ");
                    }
                    footer.push_str(&format!("personalized from {}", sources.join(", ")));
                }
                if !footer.is_empty() {
                    println!("{}", footer.dimmed());
                }
                println!();
            }
            PipelineEvent::Error(_) => {}
        }
    }

    fn announce(&mut self, steps: &[ReasoningStep]) {
        for step in steps.iter().skip(self.announced) {
            if step.status != StepStatus::Active {
                break;
            }
            println!("{}", format!("  ◦ {}", step.label).dimmed());
            self.announced += 1;
        }
        // Later steps may already be complete by the time a snapshot arrives.
        self.announced = self.announced.max(
            steps
                .iter()
                .take_while(|s| s.status == StepStatus::Complete)
                .count(),
        );
    }
}
