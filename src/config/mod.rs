mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scoring::ScoringConfig;

const DEFAULT_CONFIG_HEADER: &str = "\
# white-jersey configuration
#
# data_file: /path/to/trip.json   (default: trip.json next to this file)
# Every scoring value is optional and falls back to the value shown.
";

/// Get the config directory path (~/.config/white-jersey/)
///
/// Falls back to the current directory when no home directory is known.
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("white-jersey")
}

/// Get the default config file path (~/.config/white-jersey/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/white-jersey/config.yaml)
///
/// A missing file is not an error: the standard points table applies.
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Pick the trip data file: `--data` wins, then `data_file` from the config
/// (relative paths resolve against the config's directory), then the default.
pub fn resolve_data_path(cli_path: Option<PathBuf>, config: &Config, config_path: &Path) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }
    match &config.data_file {
        Some(file) => {
            let file = PathBuf::from(file);
            if file.is_relative() {
                config_path
                    .parent()
                    .map(|dir| dir.join(&file))
                    .unwrap_or(file)
            } else {
                file
            }
        }
        None => config_path
            .parent()
            .map(|dir| dir.join("trip.json"))
            .unwrap_or_else(crate::store::get_data_path),
    }
}

/// Write a config file holding the standard points table.
///
/// Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists at {}", path.display());
    }
    ensure_parent_dir(path)?;

    let config = Config {
        data_file: None,
        scoring: Some(ScoringConfig::default()),
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize default config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    file.write_all(DEFAULT_CONFIG_HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}
