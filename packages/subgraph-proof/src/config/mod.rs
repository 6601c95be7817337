//! Proof logging configuration
//!
//! Two ways to configure a run:
//! - Builder: `ProofConfig::from_base("run").friendly_names(true)`
//! - YAML: `ProofConfig::from_yaml("proof.yaml")` (schema v1)
//!
//! # Examples
//!
//! ```rust,ignore
//! use subgraph_proof::config::{Compression, ProofConfig};
//!
//! let config = ProofConfig::from_base("/tmp/run")
//!     .friendly_names(true)
//!     .compression(Compression::Gzip)
//!     .validated()?;
//! ```

pub mod error;
pub mod io;
pub mod proof_config;

pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
pub use proof_config::{Compression, ProofConfig};
