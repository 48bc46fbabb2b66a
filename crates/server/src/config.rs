use std::{collections::HashMap, fs, time::Duration};

use anyhow::Context;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.api-ninjas.com/v1/quotes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub upstream_url: String,
    pub upstream_api_key: Option<String>,
    pub upstream_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            upstream_url: DEFAULT_UPSTREAM_URL.into(),
            upstream_api_key: None,
            upstream_timeout_seconds: 10,
        }
    }
}

impl Settings {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }
}

/// Defaults, then `server.toml`, then the process environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        if let Err(error) = apply_file(&mut settings, &raw) {
            tracing::warn!(%error, "ignoring unreadable server.toml");
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg =
        toml::from_str::<HashMap<String, String>>(raw).context("server.toml must be flat strings")?;

    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("upstream_url") {
        settings.upstream_url = v.clone();
    }
    if let Some(v) = file_cfg.get("upstream_timeout_seconds") {
        settings.upstream_timeout_seconds = v
            .parse()
            .with_context(|| format!("invalid upstream_timeout_seconds '{v}'"))?;
    }
    Ok(())
}

pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
        settings.server_bind = format!("0.0.0.0:{}", port.trim());
    }
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("UPSTREAM_URL") {
        settings.upstream_url = v;
    }
    if let Some(v) = lookup("APP__UPSTREAM_URL") {
        settings.upstream_url = v;
    }

    if let Some(v) = lookup("NINJA_API_KEY") {
        settings.upstream_api_key = Some(v);
    }
    if let Some(v) = lookup("APP__UPSTREAM_API_KEY") {
        settings.upstream_api_key = Some(v);
    }
    settings.upstream_api_key = settings
        .upstream_api_key
        .take()
        .filter(|key| !key.trim().is_empty());

    if let Some(v) = lookup("APP__UPSTREAM_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.upstream_timeout_seconds = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
