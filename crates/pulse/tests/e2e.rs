// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the Pulse binary and the complete turn pipeline.
//!
//! Binary tests run `pulse` against an isolated config and temp database.
//! Pipeline tests use the TestHarness. Tests are independent and
//! order-insensitive.

use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;

use pulse_agent::ChatSessionManager;
use pulse_config::model::StorageConfig;
use pulse_core::types::{MemoryEntry, MemoryKind};
use pulse_core::{MemoryVault, StorageAdapter};
use pulse_storage::SqliteStorage;
use pulse_test_utils::{MockReply, TestHarness, DEFAULT_REPLY};

fn pulse(dir: &Path, args: &[&str]) -> Output {
    pulse_with_env(dir, args, &[])
}

fn pulse_with_env(dir: &Path, args: &[&str], vars: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pulse"))
        .arg("--config")
        .arg(dir.join("pulse.toml"))
        .args(args)
        .current_dir(dir)
        .env_clear()
        .env("HOME", dir)
        .envs(vars.iter().copied())
        .output()
        .expect("pulse binary should run")
}

fn write_config(dir: &Path, extra: &str) -> String {
    let db_path = dir.join("pulse.db").to_string_lossy().into_owned();
    std::fs::write(
        dir.join("pulse.toml"),
        format!("[storage]\ndatabase_path = \"{db_path}\"\n{extra}"),
    )
    .unwrap();
    db_path
}

async fn open_storage(db_path: &str) -> Arc<SqliteStorage> {
    let storage = SqliteStorage::new(StorageConfig {
        database_path: db_path.to_string(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();
    Arc::new(storage)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---- Binary: catalog and configuration ----

#[test]
fn models_json_lists_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "");

    let json = stdout_json(&pulse(dir.path(), &["models", "--json"]));
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["qwen-2.5-coder-7b", "phi-3-mini-reasoner"]);
}

#[test]
fn config_command_redacts_key() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[gemini]\napi_key = \"super-secret\"\n");

    let output = pulse(dir.path(), &["config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[gemini]"));
    assert!(!stdout.contains("super-secret"));
}

#[test]
fn env_vars_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[gemini]\nmodel = \"file-model\"\n");

    let output = pulse_with_env(
        dir.path(),
        &["config"],
        &[
            ("PULSE_GEMINI_MODEL", "env-model"),
            ("PULSE_ASSISTANT_USE_COGNITIVE_MEMORY", "false"),
        ],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("model = \"env-model\""), "stdout: {stdout}");
    assert!(stdout.contains("use_cognitive_memory = false"), "stdout: {stdout}");
}

#[test]
fn invalid_config_exits_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[assistant]\nprofle = \"Eco\"\n");

    let output = pulse(dir.path(), &["models"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("profle"), "stderr: {stderr}");
}

#[test]
fn chat_without_api_key_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "");

    let output = pulse(dir.path(), &["chat"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GEMINI_API_KEY"), "stderr: {stderr}");
}

// ---- Binary: stored data ----

#[tokio::test]
async fn sessions_commands_read_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = write_config(dir.path(), "");

    let storage = open_storage(&db_path).await;
    let manager = ChatSessionManager::new(storage.clone());
    let session = manager.create("qwen-2.5-coder-7b").await.unwrap();
    manager
        .record_user_message(&session.id, "Explain the borrow checker")
        .await
        .unwrap();
    storage.close().await.unwrap();
    drop(manager);
    drop(storage);

    let json = stdout_json(&pulse(dir.path(), &["sessions", "list", "--json"]));
    assert_eq!(json[0]["id"], session.id.as_str());
    assert_eq!(json[0]["title"], "Explain the borrow check");

    let shown = pulse(dir.path(), &["sessions", "show", &session.id]);
    assert!(shown.status.success());
    assert!(String::from_utf8_lossy(&shown.stdout).contains("Explain the borrow checker"));

    assert!(pulse(dir.path(), &["sessions", "delete", &session.id]).status.success());
    let json = stdout_json(&pulse(dir.path(), &["sessions", "list", "--json"]));
    assert!(json.as_array().unwrap().is_empty());

    assert!(!pulse(dir.path(), &["sessions", "delete", &session.id]).status.success());
}

#[tokio::test]
async fn memory_list_shows_vault_entries() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = write_config(dir.path(), "");

    let storage = open_storage(&db_path).await;
    storage
        .save(&[MemoryEntry {
            id: "0192a".into(),
            text: "Context: I prefer tabs... -> Learned: Noted...".into(),
            kind: MemoryKind::Preference,
            timestamp: 1_700_000_000_000,
            importance: 1.0,
        }])
        .await
        .unwrap();
    storage.close().await.unwrap();
    drop(storage);

    let json = stdout_json(&pulse(dir.path(), &["memory", "list", "--json"]));
    assert_eq!(json[0]["kind"], "preference");
    assert_eq!(json[0]["importance"], 1.0);
}

// ---- Pipeline through the harness ----

#[tokio::test]
async fn default_mock_response() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness.new_session().await.unwrap();
    let reply = harness.send_message(&session.id, "anything").await.unwrap();
    assert_eq!(reply, DEFAULT_REPLY);
}

#[tokio::test]
async fn harness_isolation() {
    let h1 = TestHarness::builder()
        .with_mock_responses(vec!["from h1".into()])
        .build()
        .await
        .unwrap();
    let h2 = TestHarness::builder()
        .with_mock_responses(vec!["from h2".into()])
        .build()
        .await
        .unwrap();

    let s1 = h1.new_session().await.unwrap();
    let s2 = h2.new_session().await.unwrap();
    assert_eq!(h1.send_message(&s1.id, "hi").await.unwrap(), "from h1");
    assert_eq!(h2.send_message(&s2.id, "hi").await.unwrap(), "from h2");

    assert_eq!(h1.agent.sessions().list().await.unwrap().len(), 1);
    assert_eq!(h2.agent.sessions().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn style_learned_from_code_reply() {
    let reply = format!("```rust\nfn main() {{}}\n```\n{}", "Explanation. ".repeat(15));
    let harness = TestHarness::builder()
        .with_script(vec![MockReply::Fragments(vec![reply])])
        .build()
        .await
        .unwrap();
    let session = harness.new_session().await.unwrap();
    harness
        .send_message(&session.id, "I prefer short examples")
        .await
        .unwrap();

    let memories = harness.memories().await.unwrap();
    assert_eq!(memories.len(), 1);
    assert_eq!(memories[0].kind, MemoryKind::Style);
    assert_eq!(memories[0].importance, 0.6);
}
