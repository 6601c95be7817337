//! Core value types: vertices, line numbers, literals and constraint text

pub mod line;
pub mod pb;
pub mod vertex;

pub use line::{Level, LineNumber};
pub use pb::{Literal, PbConstraint, PolishSum};
pub use vertex::NamedVertex;
