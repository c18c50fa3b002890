use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSystemConfig {
    #[serde(rename = "main-mass")]
    pub main_mass: Option<f64>,
    #[serde(rename = "main-frequency")]
    pub main_frequency: Option<f64>,
    #[serde(rename = "main-damping-ratio")]
    pub main_damping_ratio: Option<f64>,
}

/// Bounds are written as two-element arrays, e.g. `mass-ratio = [0.01, 0.25]`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileBoundsConfig {
    #[serde(rename = "mass-ratio")]
    pub mass_ratio: Option<[f64; 2]>,
    #[serde(rename = "damping-ratio")]
    pub damping_ratio: Option<[f64; 2]>,
    #[serde(rename = "frequency-ratio")]
    pub frequency_ratio: Option<[f64; 2]>,
}

/// A `[tool]` table switches the main system over to the tool holder model.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileToolConfig {
    /// mm
    pub length: Option<f64>,
    /// mm
    pub diameter: Option<f64>,
    pub material: Option<String>,
    /// kg
    pub mass: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileBeesConfig {
    pub n: Option<usize>,
    pub m: Option<usize>,
    pub e: Option<usize>,
    pub nep: Option<usize>,
    pub nsp: Option<usize>,
    pub ngh: Option<f64>,
    #[serde(rename = "max-iterations")]
    pub max_iterations: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub algorithm: Option<String>,
    #[serde(rename = "verbose-search")]
    pub verbose_search: Option<bool>,
    pub system: Option<FileSystemConfig>,
    pub tool: Option<FileToolConfig>,
    pub bounds: Option<FileBoundsConfig>,
    pub bees: Option<FileBeesConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
