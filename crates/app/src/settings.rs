//! Handles settings for the application. Configuration is read from
//! `depot.toml` when present and overridden by `DEPOT_*` environment
//! variables (`DEPOT_APP__LEVEL=debug`, `DEPOT_ENGINE__SENT_DRIFT=strict`).
use config::{Config, ConfigError, Environment, File};
use engine::EngineSettings;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "depot";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("depot.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub engine: EngineSettings,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(Environment::with_prefix("DEPOT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_urls() {
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::Sqlite("data/depot.db".to_string()).url(),
            "sqlite:data/depot.db?mode=rwc"
        );
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let settings: Settings = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database.url(), "sqlite:depot.db?mode=rwc");
        assert_eq!(settings.engine, EngineSettings::default());
    }
}
