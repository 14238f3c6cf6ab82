use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    #[validate(nested)]
    pub inventory: InventorySettings,
    #[serde(default)]
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Which classification backend the gate talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// OpenAI-compatible chat-completions gateway
    #[default]
    Gateway,
    /// Remote `{ query } -> { isCarRelated }` validation function
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default)]
    pub backend: ClassifierBackend,
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_classifier_model")]
    pub model: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::default(),
            endpoint: default_classifier_endpoint(),
            api_key: None,
            model: default_classifier_model(),
            timeout_secs: None,
        }
    }
}

fn default_classifier_endpoint() -> String {
    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
}
fn default_classifier_model() -> String {
    crate::services::classifier::DEFAULT_MODEL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Where candidate listings come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    #[default]
    Static,
    Appwrite,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InventorySettings {
    #[serde(default)]
    pub source: InventoryKind,
    /// JSON file of listings for the static source; built-in sample when unset
    pub path: Option<String>,
    /// Documents per Appwrite request
    #[validate(range(min = 1, max = 5000))]
    pub page_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    pub listings_collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CARQUERY__)
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        Self::finish(builder, |name| std::env::var(name).ok())
    }

    /// Load configuration from a custom path, with the same environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from(path.as_ref()));

        Self::finish(builder, |name| std::env::var(name).ok())
    }

    fn finish<F>(builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // e.g., CARQUERY__SERVER__PORT -> server.port
        let settings = builder
            .add_source(
                Environment::with_prefix("CARQUERY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = substitute_env_vars(settings, lookup)?.try_deserialize()?;

        settings
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;

        Ok(settings)
    }
}

/// Apply well-known unprefixed environment variables on top of the config
fn substitute_env_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(database_url) = lookup("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Some(api_key) = lookup("AI_GATEWAY_API_KEY") {
        builder = builder.set_override("classifier.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_defaults_without_sources() {
        let settings: Settings = Config::builder().build().unwrap().try_deserialize().unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.classifier.backend, ClassifierBackend::Gateway);
        assert!(settings.classifier.api_key.is_none());
        assert!(settings.database.is_none());
        assert_eq!(settings.inventory.source, InventoryKind::Static);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("carquery-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[classifier]
backend = "remote"
endpoint = "https://example.com/functions/v1/validate-car-query"
timeout_secs = 3

[database]
url = "postgres://localhost/carquery"

[inventory]
source = "appwrite"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.classifier.backend, ClassifierBackend::Remote);
        assert_eq!(settings.classifier.timeout_secs, Some(3));
        assert_eq!(settings.inventory.source, InventoryKind::Appwrite);
        if std::env::var("DATABASE_URL").is_err() {
            assert_eq!(settings.database.unwrap().url, "postgres://localhost/carquery");
        }
    }

    fn file_builder(contents: &str) -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(contents, config::FileFormat::Toml))
    }

    #[test]
    fn test_well_known_env_vars_override_file() {
        let builder = file_builder(
            r#"
[database]
url = "postgres://file/carquery"
"#,
        );

        let settings = Settings::finish(builder, |name| match name {
            "DATABASE_URL" => Some("postgres://env/carquery".to_string()),
            "AI_GATEWAY_API_KEY" => Some("env-key".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.database.unwrap().url, "postgres://env/carquery");
        assert_eq!(settings.classifier.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_zero_page_limit_is_rejected() {
        let builder = file_builder(
            r#"
[inventory]
source = "appwrite"
page_limit = 0
"#,
        );

        assert!(Settings::finish(builder, |_| None).is_err());
    }
}
