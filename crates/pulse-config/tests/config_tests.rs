// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Pulse configuration system.

use std::io::Write;

use pulse_config::diagnostic::ConfigError;
use pulse_config::model::{PerformanceProfile, Quantization};
use pulse_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[assistant]
name = "core"
log_level = "debug"
active_model_id = "qwen-2.5-coder-7b"
reasoning_model_id = "phi-3-mini-reasoner"
quantization = "8-bit"
profile = "Performance"
use_cognitive_memory = false
use_gpu = false

[gemini]
api_key = "g-123"
model = "gemini-test"
base_url = "http://localhost:9999/v1beta"

[storage]
database_path = "/tmp/pulse-test.db"
wal_mode = false

[pipeline]
intent_delay_ms = 10
memory_sync_delay_ms = 5
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.assistant.name, "core");
    assert_eq!(config.assistant.quantization, Quantization::EightBit);
    assert_eq!(config.assistant.profile, PerformanceProfile::Performance);
    assert!(!config.assistant.use_cognitive_memory);
    assert!(!config.assistant.use_gpu);
    assert_eq!(config.gemini.api_key.as_deref(), Some("g-123"));
    assert_eq!(config.gemini.base_url, "http://localhost:9999/v1beta");
    assert_eq!(config.storage.database_path, "/tmp/pulse-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.pipeline.intent_delay_ms, 10);
    assert_eq!(config.pipeline.memory_sync_delay_ms, 5);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.assistant.profile, PerformanceProfile::Balanced);
    assert!(config.assistant.use_cognitive_memory);
    assert!(config.gemini.api_key.is_none());
}

#[test]
fn unknown_key_gets_suggestion_and_span() {
    let toml = "[assistant]\nprofle = \"Eco\"\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("an unknown key error");
    assert_eq!(unknown.0, "profle");
    assert_eq!(unknown.1.as_deref(), Some("profile"));
}

#[test]
fn unknown_section_is_rejected() {
    let err = load_config_from_str("[telemetry]\nenabled = true\n").expect_err("unknown section");
    assert!(err.to_string().contains("telemetry"));
}

#[test]
fn unknown_profile_is_reported() {
    let errors = load_and_validate_str("[assistant]\nprofile = \"Turbo\"\n").expect_err("bad enum");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownVariant { value, .. } if value == "Turbo")),
        "got: {errors:?}"
    );
}

#[test]
fn wrong_type_is_reported() {
    let errors =
        load_and_validate_str("[pipeline]\nintent_delay_ms = \"slow\"\n").expect_err("bad type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("intent_delay_ms"))),
        "got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_parse() {
    let errors = load_and_validate_str("[assistant]\nactive_model_id = \"mistral\"\n")
        .expect_err("unknown model");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn config_file_on_disk_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[assistant]\nprofile = \"Eco\"").unwrap();
    let config = load_and_validate_path(file.path()).expect("valid file");
    assert_eq!(config.assistant.profile, PerformanceProfile::Eco);
}

#[test]
fn config_serializes_to_json() {
    let config = load_config_from_str("").unwrap();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["assistant"]["quantization"], "4-bit");
    assert_eq!(json["assistant"]["profile"], "Balanced");
}
