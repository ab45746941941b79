// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only and housekeeping commands: `sessions`, `memory`, `models`, `config`.

use std::sync::Arc;

use colored::Colorize;
use pulse_agent::ChatSessionManager;
use pulse_config::{AVAILABLE_MODELS, PulseConfig};
use pulse_core::types::{ChatMessage, Role};
use pulse_core::{MemoryVault, PulseError};
use pulse_storage::SqliteStorage;

const REDACTED: &str = "********";

pub async fn list_sessions(storage: &Arc<SqliteStorage>, json: bool) -> Result<(), PulseError> {
    let sessions = ChatSessionManager::new(storage.clone()).list().await?;
    if json {
        return print_json(&sessions);
    }
    if sessions.is_empty() {
        println!("no sessions");
        return Ok(());
    }
    for session in sessions {
        println!(
            "{}  {}  {}",
            session.id.yellow(),
            format_millis(session.last_modified).dimmed(),
            session.title
        );
    }
    Ok(())
}

pub async fn show_session(storage: &Arc<SqliteStorage>, id: &str) -> Result<(), PulseError> {
    let sessions = ChatSessionManager::new(storage.clone());
    let session = sessions
        .get(id)
        .await?
        .ok_or_else(|| PulseError::Config(format!("no session with id {id}")))?;

    println!("{} ({})", session.title.bold(), session.model_id.dimmed());
    for message in sessions.messages(id).await? {
        print_message(&message);
    }
    Ok(())
}

pub async fn delete_session(storage: &Arc<SqliteStorage>, id: &str) -> Result<(), PulseError> {
    ChatSessionManager::new(storage.clone()).delete(id).await?;
    println!("deleted session {id}");
    Ok(())
}

pub async fn list_memories(storage: &Arc<SqliteStorage>, json: bool) -> Result<(), PulseError> {
    let entries = storage.load().await?;
    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("memory vault is empty");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{} {:<10} {:.1}  {}",
            format_millis(entry.timestamp).dimmed(),
            entry.kind.to_string().cyan(),
            entry.importance,
            entry.text
        );
    }
    Ok(())
}

pub fn list_models(config: &PulseConfig, json: bool) -> Result<(), PulseError> {
    if json {
        return print_json(&AVAILABLE_MODELS);
    }
    for model in AVAILABLE_MODELS {
        let marker = if model.id == config.assistant.active_model_id
            || model.id == config.assistant.reasoning_model_id
        {
            "*".green()
        } else {
            " ".normal()
        };
        println!(
            "{marker} {:<22} {:<18} {:<10} {:>7}  VRAM {:>7}  {}",
            model.id,
            model.name,
            model.role.to_string(),
            model.size,
            model.vram_required,
            model.description.dimmed()
        );
    }
    Ok(())
}

/// Prints the effective configuration as TOML.
pub fn print_config(config: &PulseConfig) -> Result<(), PulseError> {
    println!("{}", render_config(config)?);
    Ok(())
}

fn render_config(config: &PulseConfig) -> Result<String, PulseError> {
    let mut shown = config.clone();
    if shown.gemini.api_key.is_some() {
        shown.gemini.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| PulseError::Internal(format!("failed to render config: {e}")))
}

pub fn print_message(message: &ChatMessage) {
    let who = match message.role {
        Role::User => "you".green(),
        Role::Assistant => "pulse".cyan(),
        Role::System => "system".magenta(),
    };
    println!("{who}> {}", message.content);

    let mut meta = Vec::new();
    if let Some(rate) = message.tokens_per_sec {
        meta.push(format!("{rate} tok/s"));
    }
    if message.is_personalized {
        meta.push(format!("personalized from {}", message.sources.join(", ")));
    }
    if !meta.is_empty() {
        println!("{}", meta.join(" · ").dimmed());
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), PulseError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| PulseError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
