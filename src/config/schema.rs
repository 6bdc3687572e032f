use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Gemini API key. Env vars take precedence over the file.
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_temperature() -> f64 {
    0.7
}

// ── Gateway ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Gateway port (default: 8000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

// ── Generation ───────────────────────────────────────────────────

/// Sampling and transport knobs forwarded to the model API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Total per-request timeout for the remote model call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_top_p() -> f64 {
    0.95
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".civicbot").join("config.toml"),
            api_key: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            gateway: GatewayConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Load `~/.civicbot/config.toml`, creating it with defaults on first run.
    /// Environment variables override file values.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let civicbot_dir = home.join(".civicbot");
        let config_path = civicbot_dir.join("config.toml");

        if !civicbot_dir.exists() {
            fs::create_dir_all(&civicbot_dir).context("Failed to create .civicbot directory")?;
        }

        if config_path.exists() {
            let mut config = Self::load_from(&config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            let mut config = Config::default();
            config.config_path = config_path;
            config.save()?;
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Load a config from an explicit path. Env overrides are NOT applied.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API key: CIVICBOT_API_KEY, then GEMINI_API_KEY, then GOOGLE_API_KEY
        if let Ok(key) = std::env::var("CIVICBOT_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        // Model: CIVICBOT_MODEL
        if let Ok(model) = std::env::var("CIVICBOT_MODEL") {
            if !model.is_empty() {
                self.default_model = model;
            }
        }

        // Bind address: HOST / PORT
        if let Ok(host) = std::env::var("HOST") {
            if !host.is_empty() {
                self.gateway.host = host;
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.gateway.port = port;
            }
        }
    }

    /// Whether any Gemini credential is configured (health endpoint reports this).
    pub fn gemini_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            || std::env::var("GEMINI_API_KEY").is_ok_and(|k| !k.is_empty())
            || std::env::var("GOOGLE_API_KEY").is_ok_and(|k| !k.is_empty())
    }
}
