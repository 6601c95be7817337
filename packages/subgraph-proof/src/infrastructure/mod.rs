//! Output infrastructure (files, gzip, in-memory buffers)

pub mod sink;

pub use sink::{Destination, OutputSink, SharedBuffer};
