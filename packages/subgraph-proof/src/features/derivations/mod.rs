//! Derivation Library
//!
//! Each routine writes a readable comment followed by the proof lines that
//! certify one solver fact. Every fact a routine references is resolved
//! before its first line is written, so a missing fact aborts the routine
//! with nothing emitted.
//!
//! ```text
//! derivations
//! ├── search            # branching, backtracking, solutions, incumbents, UNSAT
//! ├── hall              # hall violators, pigeonhole failures
//! ├── incompatibility   # degree and neighbourhood-degree-sequence eliminations
//! ├── paths             # exact-path and distance-3 adjacency strengthening
//! ├── hom_clique        # nested clique sub-proof for homomorphisms
//! └── bounds            # colour, MCS and connectivity bounds, clique non-edges
//! ```

pub mod bounds;
pub mod hall;
pub mod hom_clique;
pub mod incompatibility;
pub mod paths;
pub mod search;

pub use hom_clique::HomCliqueContext;

use crate::shared::models::LineNumber;
use std::fmt::Display;

/// `u <clause>`
pub(crate) fn rup(clause: impl Display) -> String {
    format!("u {}", clause)
}

/// `j <hint> <clause>`
pub(crate) fn justify(hint: LineNumber, clause: impl Display) -> String {
    format!("j {} {}", hint, clause)
}
