//! Error types for subgraph-proof
//!
//! Two categories exist. I/O failures on either output stream are fatal and
//! carry the offending path. Contract violations are caller defects (a fact
//! that was never derived, a line that was already forgotten, a variable
//! created twice); they are reported before anything is written so the proof
//! never references a bogus line.

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Proof error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Opening, writing or flushing a model/proof stream failed
    Io,
    /// A registry lookup or state transition the caller was not entitled to
    ContractViolation,
    /// Configuration errors
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::ContractViolation => "contract_violation",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Proof error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct ProofError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ProofError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// I/O failure on the stream backed by `path`
    pub fn io(path: &Path, action: &str, err: std::io::Error) -> Self {
        Self::new(
            ErrorKind::Io,
            format!("error {} '{}': {}", action, path.display(), err),
        )
        .with_source(err)
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContractViolation, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn is_contract_violation(&self) -> bool {
        self.kind == ErrorKind::ContractViolation
    }
}

impl From<crate::config::ConfigError> for ProofError {
    fn from(err: crate::config::ConfigError) -> Self {
        ProofError::config(err.to_string()).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ProofError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_io_error_carries_path() {
        let path = PathBuf::from("/nonexistent/run.opb");
        let err = ProofError::io(
            &path,
            "writing",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(err.kind, ErrorKind::Io);
        let msg = err.to_string();
        assert!(msg.starts_with("[io]"));
        assert!(msg.contains("/nonexistent/run.opb"));
        assert!(err.source().unwrap().to_string().contains("denied"));
    }

    #[test]
    fn test_contract_violation_display() {
        let err = ProofError::contract("no injectivity constraint for target vertex 4");
        assert!(err.is_contract_violation());
        assert_eq!(
            err.to_string(),
            "[contract_violation] no injectivity constraint for target vertex 4"
        );
        assert!(err.source.is_none());
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::Io.as_str(), "io");
        assert_eq!(ErrorKind::ContractViolation.as_str(), "contract_violation");
        assert_eq!(ErrorKind::Config.as_str(), "config");
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(ProofError::contract("missing"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.kind, ErrorKind::ContractViolation);
    }
}
