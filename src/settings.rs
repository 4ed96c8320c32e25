use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Environment variable holding the credential for the enhancement service.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Generative model used for enhancements.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the generative service API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Optional request timeout. When `None` the HTTP client default applies.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Location of the preferences file. If `None`, a platform default is
    /// used.
    #[serde(default)]
    pub preferences_path: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write log output to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Initial window size.
    #[serde(default = "default_window_size")]
    pub window_size: (f32, f32),
}

fn default_api_key_env() -> String {
    "API_KEY".into()
}

fn default_model() -> String {
    "gemini-2.5-flash-image-preview".into()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

fn default_window_size() -> (f32, f32) {
    (1200.0, 760.0)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_endpoint(),
            request_timeout_secs: None,
            preferences_path: None,
            debug_logging: false,
            log_file: None,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            window_size: default_window_size(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the preferences file, falling back to the platform config
    /// directory and finally the working directory.
    pub fn preferences_file(&self) -> PathBuf {
        if let Some(path) = &self.preferences_path {
            return PathBuf::from(path);
        }
        dirs_next::config_dir()
            .map(|dir| dir.join("photo_enhancer"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("preferences.json")
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file.as_ref().map(PathBuf::from)
    }
}
