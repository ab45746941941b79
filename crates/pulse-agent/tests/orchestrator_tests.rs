// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline behaviour against a scripted provider and an in-memory vault.

use std::sync::Arc;
use std::time::Duration;

use pulse_agent::{PipelineEvent, PipelineSettings, ResponseOrchestrator};
use pulse_config::{PerformanceProfile, PulseConfig};
use pulse_core::types::{ChatMessage, MemoryEntry, MemoryKind, Role, StepStatus, TurnRole};
use pulse_memory::CognitiveMemory;
use pulse_test_utils::{InMemoryVault, MockProvider, MockReply};
use tokio::sync::mpsc;

struct Fixture {
    provider: Arc<MockProvider>,
    vault: Arc<InMemoryVault>,
    orchestrator: ResponseOrchestrator,
}

fn fixture(provider: MockProvider, vault: InMemoryVault, config: &PulseConfig) -> Fixture {
    let provider = Arc::new(provider);
    let vault = Arc::new(vault);
    let orchestrator = ResponseOrchestrator::new(
        provider.clone(),
        CognitiveMemory::new(vault.clone()),
        PipelineSettings::from_config(config),
    );
    Fixture {
        provider,
        vault,
        orchestrator,
    }
}

fn user(content: &str) -> ChatMessage {
    ChatMessage::new("u", Role::User, content, 0)
}

async fn drain(mut rx: mpsc::UnboundedReceiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn snapshots(events: &[PipelineEvent]) -> Vec<Vec<StepStatus>> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Steps(steps) => Some(steps.iter().map(|s| s.status).collect()),
            _ => None,
        })
        .collect()
}

fn stored_entry(text: &str, importance: f64) -> MemoryEntry {
    MemoryEntry {
        id: "0190".into(),
        text: text.into(),
        kind: MemoryKind::Preference,
        timestamp: 0,
        importance,
    }
}

#[tokio::test(start_paused = true)]
async fn steps_progress_through_four_snapshots() {
    let f = fixture(
        MockProvider::with_responses(vec!["done".into()]),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );
    let events = drain(f.orchestrator.spawn(vec![user("Explain RAG")])).await;

    use StepStatus::{Active as A, Complete as C, Pending as P};
    let snaps = snapshots(&events);
    assert_eq!(
        snaps,
        vec![vec![A, P, P], vec![C, A, P], vec![C, C, A], vec![C, C, C]]
    );
    assert_eq!(snaps.iter().filter(|s| s[0] == C).count(), 3);

    for step in 0..3 {
        let statuses: Vec<_> = snaps.iter().map(|s| s[step]).collect();
        assert!(
            !statuses.windows(2).any(|w| w == [P, C]),
            "step {step} skipped active: {statuses:?}"
        );
    }

    let PipelineEvent::Steps(first) = &events[0] else {
        panic!("first event should be a step snapshot");
    };
    assert_eq!(first[0].label, "Intent Decomposition (Phi-3)");
    assert_eq!(first[2].label, "Architecture Refinement (Qwen 7B)");
}

#[tokio::test(start_paused = true)]
async fn stage_holds_use_configured_delays() {
    let f = fixture(MockProvider::new(), InMemoryVault::new(), &PulseConfig::default());
    let start = tokio::time::Instant::now();
    drain(f.orchestrator.spawn(vec![user("hi")])).await;
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn memory_disabled_sends_generic_profile() {
    let mut config = PulseConfig::default();
    config.assistant.use_cognitive_memory = false;
    let f = fixture(
        MockProvider::new(),
        InMemoryVault::with_entries(vec![stored_entry("Context: explain rag... ", 1.0)]),
        &config,
    );

    let events = drain(f.orchestrator.spawn(vec![user("Explain RAG")])).await;

    let Some(PipelineEvent::Complete { sources, .. }) = events.last() else {
        panic!("expected completion, got {events:?}");
    };
    assert!(sources.is_empty());

    let request = f.provider.last_request().await.unwrap();
    assert!(request
        .system_instruction
        .contains("PERSONAL_CONTEXT: Generic profile.\n"));
    assert!(request.system_instruction.contains("Engine: Qwen 2.5 Coder 7B"));
}

#[tokio::test(start_paused = true)]
async fn recalled_memory_personalizes_prompt() {
    let f = fixture(
        MockProvider::new(),
        InMemoryVault::with_entries(vec![
            stored_entry("Context: always use tabs in rust...", 1.0),
            stored_entry("Context: unrelated gardening tips...", 1.0),
        ]),
        &PulseConfig::default(),
    );

    let events = drain(f.orchestrator.spawn(vec![user("Format this rust file")])).await;

    let Some(PipelineEvent::Complete { sources, .. }) = events.last() else {
        panic!("expected completion, got {events:?}");
    };
    assert_eq!(sources, &vec!["Identity Vault".to_string()]);

    let request = f.provider.last_request().await.unwrap();
    assert!(request.system_instruction.contains(
        "PERSONAL_CONTEXT: USER STYLE/PREFS FOUND: Context: always use tabs in rust..."
    ));
    assert!(!request.system_instruction.contains("gardening"));
}

#[tokio::test(start_paused = true)]
async fn unreadable_vault_runs_without_personalization() {
    let vault = InMemoryVault::with_entries(vec![stored_entry("Context: rust tabs", 1.0)]);
    vault.fail_loads(true);
    let f = fixture(MockProvider::new(), vault, &PulseConfig::default());

    let events = drain(f.orchestrator.spawn(vec![user("rust formatting")])).await;
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Complete { sources, .. }) if sources.is_empty()
    ));
}

#[tokio::test(start_paused = true)]
async fn tokens_stream_with_throughput() {
    let f = fixture(
        MockProvider::with_script(vec![MockReply::fragments(["Hel", "lo"])])
            .with_chunk_delay(Duration::from_secs(1)),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );

    let events = drain(f.orchestrator.spawn(vec![user("Say hello")])).await;

    let tokens: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Token {
                fragment,
                tokens_per_sec,
            } => Some((fragment.as_str(), *tokens_per_sec)),
            _ => None,
        })
        .collect();
    // 3 chars / 4 over 1s, then 5 chars / 4 over 2s
    assert_eq!(tokens, vec![("Hel", 1), ("lo", 1)]);

    let completions: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Complete { full_text, .. } => Some(full_text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(completions, vec!["Hello"]);
    assert!(matches!(events[events.len() - 2], PipelineEvent::Steps(_)));
}

#[tokio::test(start_paused = true)]
async fn empty_fragments_are_skipped() {
    let f = fixture(
        MockProvider::with_script(vec![MockReply::fragments(["", "A", ""])]),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );
    let events = drain(f.orchestrator.spawn(vec![user("q")])).await;
    let token_count = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Token { .. }))
        .count();
    assert_eq!(token_count, 1);
}

#[tokio::test(start_paused = true)]
async fn profile_controls_generation_settings() {
    let mut config = PulseConfig::default();
    config.assistant.profile = PerformanceProfile::Performance;
    let f = fixture(MockProvider::new(), InMemoryVault::new(), &config);

    let history = vec![
        user("first"),
        ChatMessage::new("a", Role::Assistant, "reply", 1),
        user("second"),
    ];
    drain(f.orchestrator.spawn(history)).await;

    let request = f.provider.last_request().await.unwrap();
    assert_eq!(request.model, "gemini-3-pro-preview");
    assert_eq!(request.temperature, 0.75);
    assert_eq!(request.thinking_budget, 32_000);
    let roles: Vec<_> = request.turns.iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![TurnRole::User, TurnRole::Model, TurnRole::User]);
}

#[tokio::test(start_paused = true)]
async fn empty_history_still_runs_every_stage() {
    let f = fixture(MockProvider::new(), InMemoryVault::new(), &PulseConfig::default());
    let events = drain(f.orchestrator.spawn(Vec::new())).await;

    assert_eq!(snapshots(&events).len(), 4);
    assert!(matches!(events.last(), Some(PipelineEvent::Complete { .. })));
    assert!(f.provider.last_request().await.unwrap().turns.is_empty());
}

#[tokio::test(start_paused = true)]
async fn mid_stream_failure_is_a_single_terminal_error() {
    let f = fixture(
        MockProvider::with_script(vec![MockReply::FailAfter(
            vec!["par".into()],
            "connection reset".into(),
        )]),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );

    let events = drain(f.orchestrator.spawn(vec![user("q")])).await;

    let errors = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Error(_)))
        .count();
    assert_eq!(errors, 1);
    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Complete { .. })));
    match events.last() {
        Some(PipelineEvent::Error(e)) => assert!(e.to_string().contains("connection reset")),
        other => panic!("expected trailing error, got {other:?}"),
    }
    // Generation never completed, so step 2 stays active.
    assert_eq!(snapshots(&events).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn rejected_request_emits_error_without_tokens() {
    let f = fixture(
        MockProvider::with_script(vec![MockReply::RejectRequest("quota exceeded".into())]),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );
    let events = drain(f.orchestrator.spawn(vec![user("q")])).await;

    assert!(!events.iter().any(|e| matches!(e, PipelineEvent::Token { .. })));
    assert!(matches!(events.last(), Some(PipelineEvent::Error(_))));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[tokio::test(start_paused = true)]
async fn short_response_is_not_learned() {
    let f = fixture(
        MockProvider::with_responses(vec!["x".repeat(100)]),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );
    let (tx, rx) = mpsc::unbounded_channel();
    let learning = f.orchestrator.run(&[user("Explain RAG")], &tx).await;
    drop(tx);
    drain(rx).await;

    assert!(learning.is_none());
    assert!(f.vault.entries().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn long_response_is_learned_once() {
    let response = "y".repeat(200);
    let f = fixture(
        MockProvider::with_responses(vec![response.clone()]),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );
    let (tx, rx) = mpsc::unbounded_channel();
    let learning = f.orchestrator.run(&[user("Explain RAG")], &tx).await;
    drop(tx);
    drain(rx).await;
    learning.expect("learning should start").await.unwrap();

    let entries = f.vault.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].text,
        format!("Context: Explain RAG... -> Learned: {response}...")
    );
    assert_eq!(entries[0].kind, MemoryKind::Knowledge);
    assert_eq!(entries[0].importance, 0.6);
}

#[tokio::test(start_paused = true)]
async fn learning_ignores_memory_toggle_and_swallows_save_failures() {
    let mut config = PulseConfig::default();
    config.assistant.use_cognitive_memory = false;
    let vault = InMemoryVault::new();
    vault.fail_saves(true);
    let f = fixture(
        MockProvider::with_responses(vec!["z".repeat(151)]),
        vault,
        &config,
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let learning = f.orchestrator.run(&[user("I prefer tabs")], &tx).await;
    drop(tx);
    let events = drain(rx).await;

    // Learning still runs with memory injection disabled, and its failure
    // never reaches the event stream.
    learning.expect("learning should start").await.unwrap();
    assert!(matches!(events.last(), Some(PipelineEvent::Complete { .. })));
    assert_eq!(f.vault.save_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropped_receiver_does_not_stop_the_run() {
    let f = fixture(
        MockProvider::with_responses(vec!["w".repeat(200)]),
        InMemoryVault::new(),
        &PulseConfig::default(),
    );
    drop(f.orchestrator.spawn(vec![user("Explain RAG")]));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(f.provider.requests().await.len(), 1);
    assert_eq!(f.vault.entries().await.len(), 1);
}
