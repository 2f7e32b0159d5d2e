//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use liqtar_core::LiqtarConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liqtar")
        .join("config.json")
}

/// Load the config from an explicit path, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LiqtarConfig> {
    if let Some(path) = config_path {
        return Ok(LiqtarConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(LiqtarConfig::from_file(&default_path)?)
    } else {
        Ok(LiqtarConfig::default())
    }
}

/// Write through a temporary file next to `path`, renamed into place on success.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}
