//! Application paths (settings file, log file).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tree-diagram";
/// Environment override for the config directory
pub const CONFIG_DIR_ENV: &str = "TREE_DIAGRAM_CONFIG_DIR";
/// Settings file written by eframe persistence
pub const SETTINGS_FILE: &str = "tree-diagram.json";
pub const LOG_FILE: &str = "tree-diagram.log";

/// Configuration for overriding default application paths
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Priority: CLI args → ENV var (TREE_DIAGRAM_CONFIG_DIR) → None (use defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from));
        Self { config_dir }
    }
}

/// Get path to a configuration file
///
/// Priority:
/// 1. CLI --config-dir argument
/// 2. TREE_DIAGRAM_CONFIG_DIR environment variable
/// 3. Local folder IF any of our files exist there
/// 4. Platform config directory from dirs-next
///
/// Platform paths:
/// - Linux: ~/.config/tree-diagram/{name}
/// - macOS: ~/Library/Application Support/tree-diagram/{name}
/// - Windows: %APPDATA%\tree-diagram\{name}
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::config_dir()).join(name)
}

/// Get path to a data file (logs)
///
/// Same priority as [`config_file`], falling back to the platform data directory.
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::data_dir()).join(name)
}

/// Create config and data directories if missing
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let config_dir = resolve_dir(config, dirs_next::config_dir());
    let data_dir = resolve_dir(config, dirs_next::data_dir());

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;
    }
    if data_dir != config_dir && !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    }
    Ok(())
}

fn has_local_files(dir: &Path) -> bool {
    [SETTINGS_FILE, LOG_FILE].iter().any(|f| dir.join(f).exists())
}

fn resolve_dir(config: &PathConfig, platform_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(current_dir) = std::env::current_dir()
        && has_local_files(&current_dir)
    {
        return current_dir;
    }

    if let Some(dir) = platform_dir {
        return dir.join(APP_DIR);
    }

    PathBuf::from(".")
}
