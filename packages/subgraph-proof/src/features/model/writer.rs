//! Buffered OPB model text
//!
//! The header states the final variable and constraint counts, so nothing
//! reaches the sink until `finish` renders header, objective and body in one
//! piece.

use crate::errors::{ProofError, Result};
use crate::shared::models::{LineNumber, PbConstraint};
use std::fmt::{Display, Write};

#[derive(Debug, Default)]
pub struct ModelWriter {
    prelude: String,
    body: String,
    constraints: u64,
    finished: bool,
}

impl ModelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_open(&self) -> Result<()> {
        if self.finished {
            return Err(ProofError::contract("model was already finalised"));
        }
        Ok(())
    }

    pub fn comment(&mut self, text: impl Display) -> Result<()> {
        self.ensure_open()?;
        let _ = writeln!(self.body, "* {}", text);
        Ok(())
    }

    /// Append a constraint; returns its number
    pub fn constraint(&mut self, constraint: &PbConstraint<'_>) -> Result<LineNumber> {
        self.ensure_open()?;
        let _ = writeln!(self.body, "{}", constraint);
        self.constraints += 1;
        Ok(LineNumber(self.constraints))
    }

    /// `min: -1 x.. -1 x.. ;`, replacing any earlier objective
    pub fn minimise<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        self.ensure_open()?;
        self.prelude.clear();
        self.prelude.push_str("min:");
        for name in names {
            let _ = write!(self.prelude, " -1 x{}", name);
        }
        self.prelude.push_str(" ;\n");
        Ok(())
    }

    pub fn constraint_count(&self) -> u64 {
        self.constraints
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Complete model text; the writer accepts nothing afterwards
    pub fn finish(&mut self, variables: usize) -> Result<String> {
        self.ensure_open()?;
        self.finished = true;
        let mut text = String::with_capacity(self.prelude.len() + self.body.len() + 48);
        let _ = writeln!(
            text,
            "* #variable= {} #constraint= {}",
            variables, self.constraints
        );
        text.push_str(&std::mem::take(&mut self.prelude));
        text.push_str(&std::mem::take(&mut self.body));
        Ok(text)
    }
}
