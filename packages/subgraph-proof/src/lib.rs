/*
 * Subgraph Proof - certifying proof logging for subgraph solvers
 *
 * Feature-First Layout:
 * - shared/         : Value types (vertices, literals, line numbers)
 * - features/       : Vertical slices (identifiers → model → proof → derivations)
 * - engine/         : The `Proof` facade the solver talks to
 * - infrastructure/ : Output sinks (files, gzip, memory)
 * - config/         : Builder and YAML configuration
 *
 * Output:
 * - OPB model file (`* #variable= V #constraint= C` header)
 * - VeriPB proof log, checkable against the model
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Derivations take whole vertex neighbourhoods
#![allow(clippy::type_complexity)] // Partition and domain slices

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration (builder + YAML)
pub mod config;

/// Engine facade
pub mod engine;

/// Error types
pub mod errors;

/// Feature slices
pub mod features;

/// Output sinks
pub mod infrastructure;

/// Shared models
pub mod shared;

pub use config::{Compression, ProofConfig};
pub use engine::Proof;
pub use errors::{ErrorKind, ProofError, Result};
pub use features::proof::{FactKey, PROOF_BANNER};
pub use infrastructure::{Destination, SharedBuffer};
pub use shared::models::{LineNumber, NamedVertex};
