use std::fmt;

/// A vertex index paired with the display name used in proof comments.
///
/// Only `id` reaches the formal grammar (through variable tokens); `name` is
/// carried for readability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedVertex {
    pub id: usize,
    pub name: String,
}

impl NamedVertex {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Vertex whose display name is its index
    pub fn numbered(id: usize) -> Self {
        Self::new(id, id.to_string())
    }
}

impl fmt::Display for NamedVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<(usize, &str)> for NamedVertex {
    fn from((id, name): (usize, &str)) -> Self {
        Self::new(id, name)
    }
}
