//! Constraint Line Registry
//!
//! Maps the semantic identity of a fact to the line that currently holds it.
//! Each key keeps a stack of lines: re-deriving a fact pushes a new line,
//! forgetting a level pops exactly the lines opened at or above it. A lookup
//! never falls back to a default, so a forgotten or never-derived fact
//! surfaces as a contract violation.

use crate::errors::{ProofError, Result};
use crate::shared::models::LineNumber;
use ahash::AHashMap;
use std::collections::BTreeMap;
use std::fmt;

/// Semantic identity of a model or proof fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactKey {
    /// Pattern vertex p takes some value
    AtLeastOneValue(usize),
    /// Pattern vertex p takes at most one value
    AtMostOneValue(usize),
    /// Target vertex t is used at most once
    Injectivity(usize),
    /// p does not map to t
    Elimination(usize, usize),
    /// If p maps to t then q maps to a neighbour of t in graph pair g
    Adjacency {
        graph: usize,
        p: usize,
        q: usize,
        t: usize,
    },
    /// Binary vertices v and w are not both selected (stored with v <= w)
    NonEdge(usize, usize),
    /// Assignments a and b exclude each other inside a hom-clique sub-proof
    /// (stored with a <= b)
    HomExclusion((usize, usize), (usize, usize)),
    /// Current objective bound line
    Objective,
}

impl FactKey {
    pub fn adjacency(graph: usize, p: usize, q: usize, t: usize) -> Self {
        Self::Adjacency { graph, p, q, t }
    }

    pub fn non_edge(v: usize, w: usize) -> Self {
        if v <= w {
            Self::NonEdge(v, w)
        } else {
            Self::NonEdge(w, v)
        }
    }

    pub fn hom_exclusion(a: (usize, usize), b: (usize, usize)) -> Self {
        if a <= b {
            Self::HomExclusion(a, b)
        } else {
            Self::HomExclusion(b, a)
        }
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtLeastOneValue(p) => write!(f, "at-least-one-value({})", p),
            Self::AtMostOneValue(p) => write!(f, "at-most-one-value({})", p),
            Self::Injectivity(t) => write!(f, "injectivity({})", t),
            Self::Elimination(p, t) => write!(f, "elimination({}, {})", p, t),
            Self::Adjacency { graph, p, q, t } => {
                write!(f, "adjacency(g{}, {}, {}, {})", graph, p, q, t)
            }
            Self::NonEdge(v, w) => write!(f, "non-edge({}, {})", v, w),
            Self::HomExclusion(a, b) => {
                write!(f, "hom-exclusion({}/{}, {}/{})", a.0, a.1, b.0, b.1)
            }
            Self::Objective => f.write_str("objective"),
        }
    }
}

#[derive(Debug, Default)]
pub struct FactRegistry {
    facts: BTreeMap<FactKey, Vec<LineNumber>>,
    owners: AHashMap<LineNumber, Vec<FactKey>>,
}

impl FactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: FactKey, line: LineNumber) {
        self.facts.entry(key).or_default().push(line);
        self.owners.entry(line).or_default().push(key);
    }

    /// Most recent live line for `key`
    pub fn get(&self, key: FactKey) -> Option<LineNumber> {
        self.facts.get(&key).and_then(|lines| lines.last().copied())
    }

    pub fn require(&self, key: FactKey) -> Result<LineNumber> {
        self.get(key)
            .ok_or_else(|| ProofError::contract(format!("no live line for {}", key)))
    }

    pub fn contains(&self, key: FactKey) -> bool {
        self.get(key).is_some()
    }

    /// Drop every registration of the given lines; returns how many keys lost
    /// a line
    pub fn forget(&mut self, lines: impl IntoIterator<Item = LineNumber>) -> usize {
        let mut dropped = 0;
        for line in lines {
            let Some(keys) = self.owners.remove(&line) else {
                continue;
            };
            for key in keys {
                if let Some(stack) = self.facts.get_mut(&key) {
                    stack.retain(|l| *l != line);
                    dropped += 1;
                    if stack.is_empty() {
                        self.facts.remove(&key);
                    }
                }
            }
        }
        dropped
    }

    /// Live lines of every key in `from..=to`, in key order
    pub fn live_in_range(&self, from: FactKey, to: FactKey) -> Vec<(FactKey, LineNumber)> {
        self.facts
            .range(from..=to)
            .filter_map(|(k, lines)| lines.last().map(|l| (*k, *l)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
