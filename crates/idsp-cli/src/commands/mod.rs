//! Subcommands and the setup they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::debug;

use idsp_core::{Gazetteer, IdspConfig};

/// Vocabulary file overrides.
#[derive(Args, Debug, Clone)]
pub struct VocabularyArgs {
    /// State names, one per line
    #[arg(long)]
    states: Option<PathBuf>,

    /// District names, `STATE<TAB>DISTRICT` or a bare district per line
    #[arg(long)]
    districts: Option<PathBuf>,

    /// Disease names, one per line
    #[arg(long)]
    diseases: Option<PathBuf>,
}

impl VocabularyArgs {
    /// Read the three vocabularies, flags first, then config paths.
    pub fn load(&self, config: &IdspConfig) -> anyhow::Result<Arc<Gazetteer>> {
        let states = self.states.as_deref().unwrap_or(&config.gazetteer.states);
        let districts = self.districts.as_deref().unwrap_or(&config.gazetteer.districts);
        let diseases = self.diseases.as_deref().unwrap_or(&config.gazetteer.diseases);

        let gazetteer = Gazetteer::from_vocabularies(
            &read_vocabulary(states)?,
            &read_vocabulary(districts)?,
            &read_vocabulary(diseases)?,
        )?;

        debug!(
            "Loaded {} states, {} districts, {} diseases",
            gazetteer.states().len(),
            gazetteer.national_districts().len(),
            gazetteer.diseases().len()
        );

        Ok(Arc::new(gazetteer))
    }
}

fn read_vocabulary(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read vocabulary {}", path.display()))
}

/// Per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("idsp")
        .join("config.json")
}

/// Load `-c` if given, else the per-user file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IdspConfig> {
    if let Some(path) = config_path {
        return Ok(IdspConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        return Ok(IdspConfig::from_file(&default_path)?);
    }

    Ok(IdspConfig::default())
}

/// File name of `path`, used as the record source.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a dump as text; invalid UTF-8 from the PDF converter is replaced.
pub fn read_dump(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
