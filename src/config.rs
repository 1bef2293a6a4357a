use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_GROUP_URL: &str = "https://web.telegram.org/a/#-1001234567890";

/// Fixed waits in the automation flow. Documented defaults match the
/// production timings; tests shrink them to near zero.
#[derive(Debug, Clone)]
pub struct Timings {
    /// Gap between clicking the text field and pasting.
    pub click_to_paste: Duration,
    /// Gap between pasting and clicking send.
    pub paste_to_send: Duration,
    /// Time granted to the external bot before searching for its reply.
    pub bot_response: Duration,
    /// Time granted to the UI to open the found file before reading it.
    pub file_open: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            click_to_paste: Duration::from_millis(1000),
            paste_to_send: Duration::from_millis(1000),
            bot_response: Duration::from_millis(5000),
            file_open: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Base path of the local automation backend.
    pub api_base: String,
    /// Messaging group shown in the embedded view.
    pub group_url: String,
    /// Where downloaded result files land.
    pub output_dir: PathBuf,
    pub timings: Timings,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            group_url: DEFAULT_GROUP_URL.to_string(),
            output_dir: PathBuf::from("."),
            timings: Timings::default(),
        }
    }
}

impl AgentConfig {
    /// Defaults overridable through `AGENT_API_BASE`, `AGENT_GROUP_URL` and
    /// `AGENT_OUTPUT_DIR`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(base) = std::env::var("AGENT_API_BASE") {
            if !base.trim().is_empty() {
                cfg.api_base = base.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(url) = std::env::var("AGENT_GROUP_URL") {
            if !url.trim().is_empty() {
                cfg.group_url = url.trim().to_string();
            }
        }
        if let Ok(dir) = std::env::var("AGENT_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                cfg.output_dir = PathBuf::from(dir.trim());
            }
        }
        cfg
    }
}

/// Persists the single API credential across runs, as a small JSON file in
/// the user's config directory.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new() -> Result<Self, AgentError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| AgentError::config("sem diretório de configuração"))?
            .join("lookup-agent");
        Ok(Self {
            path: dir.join("config.json"),
        })
    }

    /// Store rooted at an explicit file path. Tests use this.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Option<String>, AgentError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| AgentError::config(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| AgentError::config(e.to_string()))?;
        Ok(value["api_key"].as_str().map(|s| s.to_string()))
    }

    pub fn save(&self, key: &str) -> Result<(), AgentError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| AgentError::config(e.to_string()))?;
        }
        std::fs::write(
            &self.path,
            serde_json::json!({ "api_key": key }).to_string(),
        )
        .map_err(|e| AgentError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings() {
        let t = Timings::default();
        assert_eq!(t.click_to_paste, Duration::from_millis(1000));
        assert_eq!(t.paste_to_send, Duration::from_millis(1000));
        assert_eq!(t.bot_response, Duration::from_millis(5000));
        assert_eq!(t.file_open, Duration::from_millis(2000));
    }

    // The only test touching process environment; keep it that way so the
    // parallel test runner never races on these variables.
    #[test]
    fn from_env_overrides_every_field() {
        std::env::set_var("AGENT_API_BASE", "http://backend:9000/api/");
        std::env::set_var("AGENT_GROUP_URL", "https://web.telegram.org/a/#-42");
        std::env::set_var("AGENT_OUTPUT_DIR", "/tmp/resultados");

        let cfg = AgentConfig::from_env();

        assert_eq!(cfg.api_base, "http://backend:9000/api");
        assert_eq!(cfg.group_url, "https://web.telegram.org/a/#-42");
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/resultados"));

        std::env::remove_var("AGENT_API_BASE");
        std::env::remove_var("AGENT_GROUP_URL");
        std::env::remove_var("AGENT_OUTPUT_DIR");
    }

    #[test]
    fn credential_store_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("lookup-agent-test-{}", std::process::id()))
            .join("config.json");
        let store = CredentialStore::with_path(path.clone());
        assert!(store.load().unwrap().is_none());

        store.save("chave-123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("chave-123"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
