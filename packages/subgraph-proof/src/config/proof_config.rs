//! Proof run configuration

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigExportV1;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MODEL_EXTENSION: &str = "opb";
pub const PROOF_EXTENSION: &str = "pbp";
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Stream compression applied to both output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    /// Gzip; the written file gets a `.gz` suffix
    #[serde(alias = "gz")]
    Gzip,
}

impl Compression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
        }
    }

    /// Path actually written for a requested output path
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match self {
            Self::None => path.to_path_buf(),
            Self::Gzip => {
                let mut os = path.as_os_str().to_os_string();
                os.push(".gz");
                PathBuf::from(os)
            }
        }
    }
}

/// Configuration for one proof-logging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofConfig {
    /// Where the OPB model goes (before compression suffix)
    pub model_path: PathBuf,
    /// Where the proof log goes (before compression suffix)
    pub proof_path: PathBuf,
    /// `<pattern>_<target>` variable names instead of a dense counter
    pub friendly_names: bool,
    pub compression: Compression,
    /// Dump domains and propagation events as proof comments
    pub super_extra_verbose: bool,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self::from_base("proof")
    }
}

impl ProofConfig {
    /// Derive `<base>.opb` and `<base>.pbp`
    pub fn from_base(base: impl AsRef<str>) -> Self {
        let base = base.as_ref();
        Self {
            model_path: PathBuf::from(format!("{}.{}", base, MODEL_EXTENSION)),
            proof_path: PathBuf::from(format!("{}.{}", base, PROOF_EXTENSION)),
            friendly_names: false,
            compression: Compression::None,
            super_extra_verbose: false,
        }
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn proof_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.proof_path = path.into();
        self
    }

    pub fn friendly_names(mut self, friendly: bool) -> Self {
        self.friendly_names = friendly;
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn super_extra_verbose(mut self, verbose: bool) -> Self {
        self.super_extra_verbose = verbose;
        self
    }

    /// Model file as written to disk
    pub fn model_output_path(&self) -> PathBuf {
        self.compression.output_path(&self.model_path)
    }

    /// Proof file as written to disk
    pub fn proof_output_path(&self) -> PathBuf {
        self.compression.output_path(&self.proof_path)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("model_path", "must not be empty"));
        }
        if self.proof_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("proof_path", "must not be empty"));
        }
        if self.model_path == self.proof_path {
            return Err(ConfigError::invalid(
                "proof_path",
                format!(
                    "model and proof would both be written to '{}'",
                    self.proof_path.display()
                ),
            ));
        }
        Ok(())
    }

    pub fn validated(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let export: ConfigExportV1 = serde_yaml::from_str(&content)?;

        match export.version {
            None => return Err(ConfigError::MissingVersion),
            Some(v) if !SUPPORTED_VERSIONS.contains(&v) => {
                return Err(ConfigError::UnsupportedVersion {
                    found: v,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }

        let mut config = match &export.base {
            Some(base) => Self::from_base(base),
            None => Self::from_base(""),
        };

        if let Some(model_path) = export.model_path {
            config.model_path = PathBuf::from(model_path);
        } else if export.base.is_none() {
            config.model_path = PathBuf::new();
        }

        if let Some(proof_path) = export.proof_path {
            config.proof_path = PathBuf::from(proof_path);
        } else if export.base.is_none() {
            config.proof_path = PathBuf::new();
        }

        if let Some(friendly) = export.friendly_names {
            config.friendly_names = friendly;
        }

        if let Some(compression) = export.compression {
            config.compression = compression;
        }

        if let Some(verbose) = export.super_extra_verbose {
            config.super_extra_verbose = verbose;
        }

        config.validated()
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            base: None,
            model_path: Some(self.model_path.display().to_string()),
            proof_path: Some(self.proof_path.display().to_string()),
            friendly_names: Some(self.friendly_names),
            compression: Some(self.compression),
            super_extra_verbose: Some(self.super_extra_verbose),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}
