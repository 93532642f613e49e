use once_cell::sync::OnceCell;
use serde::Deserialize;

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// How a `Cookie` header is rendered once every cookie has been dropped from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCookieHeader {
    /// Emit the bare `Cookie: ` line.
    #[default]
    Keep,
    /// Remove the line from the header list.
    Omit,
}

/// When an operator payload is remembered for the request's host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RememberPolicy {
    /// As soon as the payload deserializes, whether or not a header gets rewritten.
    #[default]
    OnValidPayload,
    /// Only after the `Cookie` header has actually been rewritten.
    OnSuccess,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub empty_cookie_header: EmptyCookieHeader,
    pub remember: RememberPolicy,
    pub log_level: Option<String>,
    pub tab_caption: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            empty_cookie_header: EmptyCookieHeader::Keep,
            remember: RememberPolicy::OnValidPayload,
            log_level: None,
            tab_caption: "Cookies".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Fail to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Fail to deserialize config file {path}: {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| ConfigError::Toml {
            path: path.to_string(),
            source,
        })
    }

    /// Logs why a config could not be loaded and returns the defaults.
    pub fn fall_back(err: ConfigError) -> Self {
        tracing::warn!("{err}");
        tracing::warn!("Fall back to default config");
        AppConfig::default()
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<AppConfig>(content)
    }
}

/// Installs the process-wide config. The first install wins; later ones are ignored.
pub fn set_config(cfg: AppConfig) {
    if CONFIG.set(cfg).is_err() {
        tracing::debug!("config already installed, keeping the first one");
    }
}

/// The process-wide config, or the defaults when none was installed.
pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}
