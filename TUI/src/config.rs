//! Runtime tuning constants and user settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::mail::{EmailJsCredentials, EMAILJS_ENDPOINT};
use crate::router::TRANSITION_DELAY;
use crate::theme::Theme;

pub struct Config {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// Fragment change to view swap
    pub transition_delay: Duration,

    /// Lines to scroll per key press
    pub scroll_step: usize,

    /// Width of the chat panel in characters
    pub chat_width: u16,

    /// Height of the home hero scene in rows
    pub hero_height: u16,

    /// Node count of the hero network
    pub hero_density: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            transition_delay: TRANSITION_DELAY,
            scroll_step: 3,
            chat_width: 44,
            hero_height: 14,
            hero_density: 60,
        }
    }
}

impl Config {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Chat slash commands, shown by `/help` and the command hint.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show available commands"),
    ("/goto", "Navigate to a view (home, about, services, projects, journey, contact)"),
    ("/theme", "Toggle dark/light theme"),
    ("/filter", "Filter projects by tag, or clear with no argument"),
    ("/quit", "Exit folio"),
];

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    /// Overrides the Gemini API root, e.g. for a proxy.
    pub gemini_base_url: Option<String>,
    pub emailjs_service_id: Option<String>,
    pub emailjs_template_id: Option<String>,
    pub emailjs_public_key: Option<String>,
    pub emailjs_endpoint: Option<String>,
    pub theme_default: Option<String>,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("folio").join("config.toml"))
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Apply environment overrides through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let slots = [
            ("GEMINI_API_KEY", &mut self.gemini_api_key),
            ("EMAILJS_SERVICE_ID", &mut self.emailjs_service_id),
            ("EMAILJS_TEMPLATE_ID", &mut self.emailjs_template_id),
            ("EMAILJS_PUBLIC_KEY", &mut self.emailjs_public_key),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
        self
    }

    pub fn model(&self) -> String {
        self.gemini_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn gemini_base_url(&self) -> &str {
        self.gemini_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn emailjs_endpoint(&self) -> &str {
        self.emailjs_endpoint.as_deref().unwrap_or(EMAILJS_ENDPOINT)
    }

    pub fn default_theme(&self) -> Option<Theme> {
        self.theme_default.as_deref().and_then(Theme::parse)
    }

    pub fn email_credentials(&self) -> EmailJsCredentials {
        EmailJsCredentials {
            service_id: self.emailjs_service_id.clone(),
            template_id: self.emailjs_template_id.clone(),
            public_key: self.emailjs_public_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_file() {
        let settings = Settings::parse(
            r#"
            gemini_model = "gemini-2.0-flash"
            theme_default = "light"
            "#,
        )
        .unwrap();
        assert_eq!(settings.model(), "gemini-2.0-flash");
        assert_eq!(settings.default_theme(), Some(Theme::Light));
        assert_eq!(settings.gemini_api_key, None);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model(), DEFAULT_MODEL);
        assert_eq!(settings.default_theme(), None);
        assert_eq!(settings.gemini_base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.emailjs_endpoint(), EMAILJS_ENDPOINT);
    }

    #[test]
    fn test_endpoint_overrides() {
        let settings = Settings::parse(
            r#"
            gemini_base_url = "http://localhost:8080/v1beta"
            emailjs_endpoint = "http://localhost:8081/send"
            "#,
        )
        .unwrap();
        assert_eq!(settings.gemini_base_url(), "http://localhost:8080/v1beta");
        assert_eq!(settings.emailjs_endpoint(), "http://localhost:8081/send");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Settings::parse("gemini_model = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("folio-missing-config-dir").join("config.toml");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [("GEMINI_API_KEY", "from-env"), ("EMAILJS_PUBLIC_KEY", "")]
            .into_iter()
            .collect();
        let settings = Settings {
            gemini_api_key: Some("from-file".to_string()),
            emailjs_public_key: Some("pk".to_string()),
            ..Default::default()
        }
        .with_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.gemini_api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.email_credentials().public_key.as_deref(), Some("pk"));
    }
}
