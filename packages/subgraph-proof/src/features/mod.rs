//! Feature slices
//!
//! ```text
//! identifiers  → variable names (assignment, binary, connectivity)
//! model        → OPB model constraints, header, connectivity gadgets
//! proof        → line counter, level trail, fact registry, level operations
//! derivations  → search events and "certify this solver fact" routines
//! ```

pub mod derivations;
pub mod identifiers;
pub mod model;
pub mod proof;
