//! Level trail
//!
//! Mirrors the solver's backtracking trail: every derived line belongs to the
//! level that was current when it was written. Forgetting level `l` releases
//! every line opened at `l` or deeper, even when the search jumped over
//! intermediate levels.

use crate::shared::models::{Level, LineNumber};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct LevelTrail {
    current: Level,
    high_water: Level,
    opened: BTreeMap<Level, Vec<LineNumber>>,
}

impl LevelTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Level {
        self.current
    }

    pub fn high_water(&self) -> Level {
        self.high_water
    }

    /// Make `level` current (both for opening and for backing up)
    pub fn enter(&mut self, level: Level) {
        self.current = level;
        self.high_water = self.high_water.max(level);
    }

    pub fn record(&mut self, line: LineNumber) {
        self.opened.entry(self.current).or_default().push(line);
    }

    /// Whether a forget of `level` has anything to act on
    pub fn reached(&self, level: Level) -> bool {
        self.high_water >= level
    }

    /// Release every line at `level` or above. `None` when `level` was never
    /// reached, in which case nothing should be written.
    pub fn forget(&mut self, level: Level) -> Option<Vec<LineNumber>> {
        if !self.reached(level) {
            return None;
        }
        let released = self.opened.split_off(&level);
        Some(released.into_values().flatten().collect())
    }

    /// Lines still alive at `level`
    pub fn live_at(&self, level: Level) -> usize {
        self.opened.get(&level).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forget_unreached_level_is_noop() {
        let mut trail = LevelTrail::new();
        trail.enter(1);
        trail.record(LineNumber(4));
        assert_eq!(trail.forget(3), None);
        assert_eq!(trail.forget(3), None);
        assert_eq!(trail.live_at(1), 1);
    }

    #[test]
    fn test_forget_releases_level_and_above() {
        let mut trail = LevelTrail::new();
        trail.record(LineNumber(1));
        trail.enter(1);
        trail.record(LineNumber(2));
        trail.enter(3);
        trail.record(LineNumber(3));
        trail.enter(1);
        trail.record(LineNumber(4));

        let released = trail.forget(1).unwrap();
        assert_eq!(released, vec![LineNumber(2), LineNumber(4), LineNumber(3)]);
        assert_eq!(trail.live_at(0), 1);
    }

    #[test]
    fn test_high_water_never_drops() {
        let mut trail = LevelTrail::new();
        trail.enter(5);
        trail.enter(0);
        assert_eq!(trail.current(), 0);
        assert_eq!(trail.high_water(), 5);
        assert!(trail.reached(4));
    }
}
