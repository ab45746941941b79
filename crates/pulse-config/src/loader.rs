// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pulse.toml` > `~/.config/pulse/pulse.toml` > `/etc/pulse/pulse.toml`
//! with environment variable overrides via the `PULSE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PulseConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pulse/pulse.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pulse.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pulse").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pulse/pulse.toml`
/// 3. `~/.config/pulse/pulse.toml`
/// 4. `./pulse.toml`
/// 5. `PULSE_*` environment variables
pub fn load_config() -> Result<PulseConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PulseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PulseConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PulseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PulseConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(PulseConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `PULSE_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys themselves
/// contain underscores: `PULSE_ASSISTANT_USE_COGNITIVE_MEMORY` must become
/// `assistant.use_cognitive_memory`.
fn env_provider() -> Env {
    Env::prefixed("PULSE_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env key to its dotted path. Figment hands the key
/// over in its original case, so it is lowercased first.
fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 4] = ["assistant", "gemini", "storage", "pipeline"];
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
