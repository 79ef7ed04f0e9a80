//! Batch configuration loading and parsing

use anyhow::{bail, Context, Result};
use med_decoder::{ExtractConfig, Label, Phase, SessionInfo};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Batch configuration (loaded from a TOML file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    pub output: OutputConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub on_error: OnError,
    /// Optional JSON run summary
    pub summary: Option<PathBuf>,
}

/// What to do when one file fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Log the failure and keep going
    #[default]
    Skip,
    /// Stop the run at the first failure
    Abort,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub phase: Phase,
    pub subject: Label,
    pub session: Label,
}

impl FileEntry {
    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            phase: self.phase.clone(),
            subject: self.subject.clone(),
            session: self.session.clone(),
        }
    }
}

/// Load a batch configuration from a TOML file
///
/// Relative paths are resolved against the directory holding the file.
pub fn load_config(path: &Path) -> Result<BatchConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: BatchConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.resolve_paths(base);
    config.validate()?;

    Ok(config)
}

impl BatchConfig {
    fn resolve_paths(&mut self, base: &Path) {
        self.output.dir = base.join(&self.output.dir);
        if let Some(summary) = &self.output.summary {
            self.output.summary = Some(base.join(summary));
        }
        for file in &mut self.files {
            file.path = base.join(&file.path);
        }
    }

    fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        if self.files.is_empty() {
            bail!("No [[files]] entries in batch configuration");
        }

        // Two entries with the same key would overwrite each other's output
        let mut seen = std::collections::HashMap::new();
        for file in &self.files {
            let key = med_decoder::OutputKey::new(&file.session_info());
            if let Some(previous) = seen.insert(key.clone(), &file.path) {
                bail!(
                    "Output {}.csv produced by both {:?} and {:?}",
                    key,
                    previous,
                    file.path
                );
            }
        }
        Ok(())
    }
}
