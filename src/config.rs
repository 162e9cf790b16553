use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::controller::BOT_AVATAR_PATH;
use crate::storage::ensure_parent_dir;
use crate::ui::markup::RenderMode;

pub const DEFAULT_CONFIG_PATH: &str = "config/widget.json";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_WINDOW_TITLE: &str = "Chat";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid server url `{url}`: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the chat backend; requests go to `{server_url}/chat`.
    pub server_url: String,
    pub render_mode: RenderMode,
    /// SQLite file for the session id. In-memory when unset.
    pub session_db: Option<PathBuf>,
    pub window_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            render_mode: RenderMode::default(),
            session_db: None,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    /// Command-line and environment values win over the file.
    pub fn apply_overrides(
        &mut self,
        server_url: Option<String>,
        render_mode: Option<RenderMode>,
        session_db: Option<PathBuf>,
    ) {
        if let Some(server_url) = server_url {
            self.server_url = server_url;
        }
        if let Some(render_mode) = render_mode {
            self.render_mode = render_mode;
        }
        if session_db.is_some() {
            self.session_db = session_db;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidServerUrl {
            url: self.server_url.clone(),
            reason,
        };
        let url = reqwest::Url::parse(&self.server_url).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme `{other}`"))),
        }
    }

    pub fn avatar_url(&self) -> String {
        format!("{}{BOT_AVATAR_PATH}", self.server_url.trim_end_matches('/'))
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> Result<(), ConfigError> {
    ensure_parent_dir(Path::new(path))?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert_eq!(load_config(path.to_str().unwrap()), AppConfig::default());
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_config(path.to_str().unwrap()), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.json");
        fs::write(&path, r#"{ "render_mode": "escaped" }"#).unwrap();

        let config = load_config(path.to_str().unwrap());
        assert_eq!(config.render_mode, RenderMode::Escaped);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("widget.json");
        let path = path.to_str().unwrap();
        let config = AppConfig {
            server_url: "https://chat.example.com".to_string(),
            session_db: Some(PathBuf::from("data/session.db")),
            ..AppConfig::default()
        };

        save_config(path, &config).unwrap();
        assert_eq!(load_config(path), config);
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(None, Some(RenderMode::Escaped), None);

        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.render_mode, RenderMode::Escaped);
        assert_eq!(config.session_db, None);
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.server_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidServerUrl { .. })
        ));

        config.server_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn avatar_url_is_resolved_against_server() {
        let config = AppConfig {
            server_url: "http://localhost:8080/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.avatar_url(),
            "http://localhost:8080/static/assets/xaltanalytics_logo.jpg"
        );
    }
}
