//! Identifier Registry
//!
//! Assigns stable variable tokens. A token is created exactly once and must
//! exist before any model or proof line mentions it; the same token text is
//! used in both files.

pub mod naming;
pub mod registry;

pub use naming::NamingScheme;
pub use registry::VariableRegistry;
