//! Configuration I/O (YAML loading)
//!
//! Defines the YAML schema type. Conversion to and from `ProofConfig` lives in
//! proof_config.rs.

use super::proof_config::Compression;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// model_path: run.opb
/// proof_path: run.pbp
/// friendly_names: true
/// compression: gzip
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1); optional so a missing field can be
    /// reported with a dedicated error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Base name for both output files; explicit paths win over it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_names: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_extra_verbose: Option<bool>,
}
