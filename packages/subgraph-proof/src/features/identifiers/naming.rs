/// How fresh variables are named; fixed for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    /// Readable names built from vertex names (`p3_t7`, `conn2_4_1`)
    Friendly,
    /// Dense 1-based counter shared by every variable kind
    Dense,
}

impl NamingScheme {
    pub fn from_friendly(friendly: bool) -> Self {
        if friendly {
            Self::Friendly
        } else {
            Self::Dense
        }
    }
}

pub(crate) fn assignment_name(pattern: &str, target: &str) -> String {
    format!("{}_{}", pattern, target)
}

pub(crate) fn walk_name(length: usize, v: usize, w: usize) -> String {
    format!("conn{}_{}_{}", length, v, w)
}

pub(crate) fn via_name(length: usize, v: usize, w: usize, u: usize) -> String {
    format!("conn{}_{}_{}_via_{}", length, v, w, u)
}
