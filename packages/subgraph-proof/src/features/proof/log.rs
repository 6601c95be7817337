//! Proof stream with its line counter
//!
//! ```text
//! pseudo-Boolean proof version 1.0
//! f 12 0                  # axioms 1..=12 come from the model
//! * comment               # no line number
//! # 1                     # no line number
//! u 1 ~x3 1 ~x7 >= 1 ;    # line 13
//! w 1                     # no line number
//! ```

use super::levels::LevelTrail;
use crate::errors::{ProofError, Result};
use crate::infrastructure::OutputSink;
use crate::shared::models::{Level, LineNumber};
use std::fmt::Display;
use tracing::trace;

pub const PROOF_BANNER: &str = "pseudo-Boolean proof version 1.0";

pub struct ProofLog {
    sink: OutputSink,
    line: u64,
    axioms: Option<u64>,
    trail: LevelTrail,
}

impl ProofLog {
    pub fn new(sink: OutputSink) -> Self {
        Self {
            sink,
            line: 0,
            axioms: None,
            trail: LevelTrail::new(),
        }
    }

    /// Write the banner and axiom count; numbering continues after the axioms
    pub fn begin(&mut self, axioms: u64) -> Result<()> {
        if self.axioms.is_some() {
            return Err(ProofError::contract("proof header was already written"));
        }
        self.sink.write_line(PROOF_BANNER)?;
        self.sink.write_line(&format!("f {} 0", axioms))?;
        self.axioms = Some(axioms);
        self.line = axioms;
        Ok(())
    }

    fn ensure_started(&self) -> Result<()> {
        if self.axioms.is_none() {
            return Err(ProofError::contract(
                "proof step before the model was finalised",
            ));
        }
        Ok(())
    }

    /// `* text`
    pub fn comment(&mut self, text: impl Display) -> Result<()> {
        self.ensure_started()?;
        self.sink.write_line(&format!("* {}", text))
    }

    /// Write a line that consumes the next line number
    pub fn derive(&mut self, text: impl Display) -> Result<LineNumber> {
        self.ensure_started()?;
        self.sink.write_line(&text.to_string())?;
        self.line += 1;
        let line = LineNumber(self.line);
        self.trail.record(line);
        Ok(line)
    }

    /// Write a line that does not consume a number (`c ...`)
    pub fn directive(&mut self, text: impl Display) -> Result<()> {
        self.ensure_started()?;
        self.sink.write_line(&text.to_string())
    }

    /// `# level`. Flushes, so an aborted run leaves everything up to the
    /// latest level marker on disk.
    pub fn enter_level(&mut self, level: Level) -> Result<()> {
        self.ensure_started()?;
        self.sink.write_line(&format!("# {}", level))?;
        self.sink.flush()?;
        self.trail.enter(level);
        trace!(level, line = self.line, "proof level");
        Ok(())
    }

    /// `w level`, only if `level` was ever reached; returns the released lines
    pub fn forget_level(&mut self, level: Level) -> Result<Option<Vec<LineNumber>>> {
        self.ensure_started()?;
        if !self.trail.reached(level) {
            return Ok(None);
        }
        self.sink.write_line(&format!("w {}", level))?;
        let released = self.trail.forget(level);
        trace!(level, released = released.as_ref().map_or(0, Vec::len), "forgot level");
        Ok(released)
    }

    pub fn current_line(&self) -> LineNumber {
        LineNumber(self.line)
    }

    pub fn current_level(&self) -> Level {
        self.trail.current()
    }

    /// Lines written by the proof itself (axioms excluded)
    pub fn derived_count(&self) -> u64 {
        self.line - self.axioms.unwrap_or(0)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }

    pub fn close(&mut self) -> Result<()> {
        self.sink.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Compression;
    use crate::infrastructure::{Destination, SharedBuffer};
    use pretty_assertions::assert_eq;

    fn log() -> (ProofLog, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let sink = OutputSink::open(Destination::memory(&buffer)).unwrap();
        (ProofLog::new(sink), buffer)
    }

    #[test]
    fn test_numbering_continues_after_axioms() {
        let (mut log, buffer) = log();
        log.begin(2).unwrap();
        log.comment("hello").unwrap();
        let first = log.derive("u >= 1 ;").unwrap();
        assert_eq!(first, LineNumber(3));
        assert_eq!(log.derived_count(), 1);
        assert_eq!(
            buffer.lines(),
            vec![PROOF_BANNER, "f 2 0", "* hello", "u >= 1 ;"]
        );
    }

    #[test]
    fn test_step_before_begin_rejected() {
        let (mut log, buffer) = log();
        assert!(log.derive("u >= 1 ;").unwrap_err().is_contract_violation());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_forget_unreached_level_writes_nothing() {
        let (mut log, buffer) = log();
        log.begin(0).unwrap();
        assert_eq!(log.forget_level(2).unwrap(), None);
        assert_eq!(log.forget_level(2).unwrap(), None);
        assert_eq!(buffer.lines().len(), 2);
    }

    #[test]
    fn test_markers_do_not_consume_numbers() {
        let (mut log, _buffer) = log();
        log.begin(5).unwrap();
        log.enter_level(1).unwrap();
        let line = log.derive("u 1 ~x1 >= 1 ;").unwrap();
        log.enter_level(0).unwrap();
        let released = log.forget_level(1).unwrap().unwrap();
        assert_eq!(line, LineNumber(6));
        assert_eq!(released, vec![line]);
        assert_eq!(log.current_line(), LineNumber(6));
    }

    #[test]
    fn test_level_marker_reaches_disk_before_close() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.pbp");
        let sink = OutputSink::open(Destination::file(&path, Compression::None)).unwrap();
        let mut log = ProofLog::new(sink);
        log.begin(1).unwrap();
        log.derive("u 1 ~x1 >= 1 ;").unwrap();
        log.enter_level(1).unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            on_disk.lines().collect::<Vec<_>>(),
            [PROOF_BANNER, "f 1 0", "u 1 ~x1 >= 1 ;", "# 1"]
        );
    }

    #[test]
    fn test_double_begin_rejected() {
        let (mut log, _buffer) = log();
        log.begin(1).unwrap();
        assert!(log.begin(1).is_err());
    }
}
