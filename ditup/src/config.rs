//! Layered configuration.
//!
//! Sources, later ones winning: `config/default.toml`,
//! `config/{RUN_MODE}.toml`, then `DITUP__SECTION__KEY` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Database file. Defaults to `~/.ditup/ditup.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Public base url of the API, used in `links` and `Location`.
#[derive(Debug, Deserialize, Clone)]
pub struct UrlConfig {
    pub protocol: String,
    pub host: String,
    #[serde(default)]
    pub path: String,
}

impl UrlConfig {
    pub fn base(&self) -> String {
        format!("{}://{}{}", self.protocol, self.host, self.path)
    }
}

/// Front-end application, target of emailed links.
#[derive(Debug, Deserialize, Clone)]
pub struct AppUrlConfig {
    pub all: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailerConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub from: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    /// Seconds between abandoned-tag sweeps; `0` disables them.
    pub prune_tags_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub url: UrlConfig,
    pub app_url: AppUrlConfig,
    pub mailer: MailerConfig,
    pub auth: AuthConfig,
    pub jobs: JobsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from `config_dir` and the environment.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let layer = |name: &str| config_dir.join(name).to_string_lossy().into_owned();

        let builder = Config::builder()
            .add_source(File::with_name(&layer("default")))
            .add_source(File::with_name(&layer(&run_mode)).required(false))
            .add_source(Environment::with_prefix("DITUP").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// Deterministic configuration for tests: no SMTP, no jobs, cheap hashing.
    pub fn for_test() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            database: DatabaseConfig::default(),
            url: UrlConfig {
                protocol: "http".into(),
                host: "localhost:3000".into(),
                path: String::new(),
            },
            app_url: AppUrlConfig {
                all: "http://localhost:4200".into(),
            },
            mailer: MailerConfig {
                enabled: false,
                host: "localhost".into(),
                port: 25,
                from: "info@ditup.org".into(),
            },
            auth: AuthConfig {
                bcrypt_cost: 4,
            },
            jobs: JobsConfig {
                prune_tags_interval_secs: 0,
            },
            log: LogConfig::default(),
        }
    }

    /// Database file to open.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database
            .path
            .clone()
            .or_else(crate::db::Database::default_path)
    }
}
