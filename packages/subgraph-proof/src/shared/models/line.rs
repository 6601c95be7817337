use std::fmt;

/// Proof level (tied to search depth)
pub type Level = u32;

/// Number of a model constraint or proof line.
///
/// Model constraints are numbered 1..=C; proof lines continue from C + 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineNumber(pub u64);

impl LineNumber {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
