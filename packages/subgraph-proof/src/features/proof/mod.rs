//! Proof Emitter core
//!
//! ## Architecture
//!
//! ```text
//! proof
//! ├── lines     # semantic fact -> live line numbers
//! ├── levels    # current level, high-water mark, lines opened per level
//! ├── log       # proof stream, line counter
//! └── scoping   # level operations on the engine (start / back up / forget)
//! ```

pub mod levels;
pub mod lines;
pub mod log;
pub mod scoping;

pub use levels::LevelTrail;
pub use lines::{FactKey, FactRegistry};
pub use log::{ProofLog, PROOF_BANNER};
