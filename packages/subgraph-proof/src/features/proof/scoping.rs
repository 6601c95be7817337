//! Level operations on the engine
//!
//! Search depth maps onto proof levels. Forgetting a level also drops every
//! fact whose line was written at or above it, so nothing can reference a
//! line the checker has already discarded.

use crate::engine::Proof;
use crate::errors::Result;
use crate::shared::models::Level;
use tracing::trace;

impl Proof {
    /// `# level`
    pub fn start_level(&mut self, level: Level) -> Result<()> {
        self.log.enter_level(level)
    }

    /// `# level`, moving down after a backtrack
    pub fn back_up_to_level(&mut self, level: Level) -> Result<()> {
        self.log.enter_level(level)
    }

    /// `w level` if `level` was ever reached, otherwise nothing
    pub fn forget_level(&mut self, level: Level) -> Result<()> {
        if let Some(lines) = self.log.forget_level(level)? {
            let dropped = self.facts.forget(lines);
            trace!(level, dropped, "facts dropped with level");
        }
        Ok(())
    }

    /// `# 0`
    pub fn back_up_to_top(&mut self) -> Result<()> {
        self.log.enter_level(0)
    }

    /// Open a level one deeper than the current one for intermediate lines.
    /// Returns the level to come back to.
    pub(crate) fn open_scratch_level(&mut self) -> Result<Level> {
        let outer = self.log.current_level();
        self.log.enter_level(outer + 1)?;
        Ok(outer)
    }

    /// Return to `outer`; scratch lines stay usable until `discard_scratch_level`
    pub(crate) fn leave_scratch_level(&mut self, outer: Level) -> Result<()> {
        self.log.enter_level(outer)
    }

    pub(crate) fn discard_scratch_level(&mut self, outer: Level) -> Result<()> {
        self.forget_level(outer + 1)
    }
}
