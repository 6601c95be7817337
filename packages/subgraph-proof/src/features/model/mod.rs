//! Model Emitter
//!
//! ```text
//! model
//! ├── writer        # buffered OPB text, constraint counter, header
//! ├── constraints   # domains, injectivity, adjacency, objectives, finalise
//! └── connectivity  # walk / via gadgets for connected subgraph models
//! ```

pub mod connectivity;
pub mod constraints;
pub mod writer;

pub use writer::ModelWriter;
