use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[logging]
level = "info"  # trace, debug, info, warn, error
json = false

[git]
base_branch = "main"
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitConfig {
    pub base_branch: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub git: GitConfig,
}

/// Get the global config directory: `~/.loco`
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".loco"))
        .ok_or_else(|| anyhow!("Could not find home directory"))
}

impl Config {
    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> Result<PathBuf> {
        let config_path = config_dir()?.join("loco.toml");
        let config_dir = config_path
            .parent()
            .ok_or_else(|| anyhow!("Invalid config path"))?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            tracing::debug!("Created config directory: {}", config_dir.display());
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.loco/loco.toml (auto-created if missing)
    /// 2. Local override: ./loco.toml (workspace, optional)
    /// 3. Environment variables (highest priority)
    pub fn load() -> Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        // Later sources override earlier ones
        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("loco").required(false))
            .add_source(config::Environment::with_prefix("LOCO").separator("__"));

        if let Ok(level) = env::var("LOCO_LOG_LEVEL") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let config = config_builder.build()?;
        let config: Self = config.try_deserialize()?;
        Ok(config)
    }
}
