//! Search events
//!
//! Branching and backtracking are recorded as comments plus RUP nogoods over
//! the negated decisions. Solutions and incumbents become `v` and `o`
//! witnesses.

use super::rup;
use crate::engine::Proof;
use crate::errors::Result;
use crate::features::proof::FactKey;
use crate::shared::models::{LineNumber, Literal, NamedVertex, PbConstraint};
use std::fmt::Write;
use tracing::{info, trace};

impl Proof {
    /// `u 1 ~x.. 1 ~x.. >= 1 ;` over the decisions taken so far
    fn decision_nogood(&self, decisions: &[(usize, usize)]) -> Result<String> {
        let mut clause = PbConstraint::new(1);
        for &(p, t) in decisions {
            clause.push(1, Literal::neg(self.variables.assignment(p, t)?));
        }
        Ok(rup(&clause))
    }

    pub fn root_propagation_failed(&mut self) -> Result<()> {
        self.log.comment("root node propagation failed")
    }

    pub fn guessing(&mut self, depth: usize, var: &NamedVertex, val: &NamedVertex) -> Result<()> {
        self.log
            .comment(format_args!("[{}] guessing {}={}", depth, var, val))
    }

    pub fn propagation_failure(
        &mut self,
        decisions: &[(usize, usize)],
        var: &NamedVertex,
        val: &NamedVertex,
    ) -> Result<LineNumber> {
        let nogood = self.decision_nogood(decisions)?;
        self.log.comment(format_args!(
            "[{}] propagation failure on {}={}",
            decisions.len(),
            var,
            val
        ))?;
        self.log.derive(nogood)
    }

    /// Nogood after a branch was exhausted; `was_failure` only changes the
    /// comment
    pub fn incorrect_guess(
        &mut self,
        decisions: &[(usize, usize)],
        was_failure: bool,
    ) -> Result<LineNumber> {
        let nogood = self.decision_nogood(decisions)?;
        let what = if was_failure {
            "incorrect guess"
        } else {
            "backtracking"
        };
        self.log
            .comment(format_args!("[{}] {}", decisions.len(), what))?;
        self.log.derive(nogood)
    }

    /// Nothing to write; the enclosing incorrect guess carries the nogood
    pub fn out_of_guesses(&mut self, decisions: &[(usize, usize)]) -> Result<()> {
        trace!(depth = decisions.len(), "out of guesses");
        Ok(())
    }

    pub fn unit_propagating(&mut self, var: &NamedVertex, val: &NamedVertex) -> Result<()> {
        self.log
            .comment(format_args!("unit propagating {}={}", var, val))
    }

    pub fn post_restart_nogood(&mut self, decisions: &[(usize, usize)]) -> Result<LineNumber> {
        let nogood = self.decision_nogood(decisions)?;
        self.log
            .comment(format_args!("[{}] restart nogood", decisions.len()))?;
        self.log.derive(nogood)
    }

    /// `v x.. x..` for a pattern-to-target solution
    pub fn post_solution(&mut self, decisions: &[(NamedVertex, NamedVertex)]) -> Result<LineNumber> {
        let mut witness = String::from("v");
        let mut comment = String::from("found solution");
        for (var, val) in decisions {
            let _ = write!(witness, " {}", Literal::pos(self.variables.assignment(var.id, val.id)?));
            let _ = write!(comment, " {}={}", var, val);
        }
        self.log.comment(comment)?;
        let line = self.log.derive(witness)?;
        info!(line = line.get(), size = decisions.len(), "solution");
        Ok(line)
    }

    /// `v x.. x..` for a solution over binary vertices
    pub fn post_binary_solution(&mut self, solution: &[usize]) -> Result<LineNumber> {
        let mut witness = String::from("v");
        for &v in solution {
            let _ = write!(witness, " {}", Literal::pos(self.variables.binary(v)?));
        }
        let line = self.log.derive(witness)?;
        info!(line = line.get(), size = solution.len(), "solution");
        Ok(line)
    }

    /// `o` witness over binary vertices plus the zero-in-proof assignments of
    /// a clique encoding; becomes the objective
    pub fn new_binary_incumbent(&mut self, solution: &[(usize, bool)]) -> Result<LineNumber> {
        let mut witness = String::from("o");
        for &(v, selected) in solution {
            let lit = Literal::with_polarity(self.variables.binary(v)?, selected);
            let _ = write!(witness, " {}", lit);
        }
        for &(p, t) in &self.zero_in_proof_objectives {
            let _ = write!(witness, " {}", Literal::neg(self.variables.assignment(p, t)?));
        }
        self.record_incumbent(witness, solution.iter().filter(|(_, s)| *s).count())
    }

    /// `o` witness over assignment variables; becomes the objective
    pub fn new_incumbent(
        &mut self,
        solution: &[(NamedVertex, NamedVertex, bool)],
    ) -> Result<LineNumber> {
        let mut witness = String::from("o");
        for (var, val, holds) in solution {
            let lit = Literal::with_polarity(self.variables.assignment(var.id, val.id)?, *holds);
            let _ = write!(witness, " {}", lit);
        }
        self.record_incumbent(witness, solution.iter().filter(|(_, _, h)| *h).count())
    }

    fn record_incumbent(&mut self, witness: String, size: usize) -> Result<LineNumber> {
        let line = self.log.derive(witness)?;
        self.facts.record(FactKey::Objective, line);
        info!(line = line.get(), size, "new incumbent");
        Ok(line)
    }

    /// `u >= 1 ;` then `c <line> 0`
    pub fn finish_unsat_proof(&mut self) -> Result<LineNumber> {
        self.log.comment("asserting that we've proved unsat")?;
        let line = self.log.derive("u >= 1 ;")?;
        self.log.directive(format_args!("c {} 0", line))?;
        self.log.flush()?;
        info!(line = line.get(), "concluded unsatisfiable");
        Ok(line)
    }

    /// Domain dump, only with super-extra-verbose output
    pub fn show_domains(
        &mut self,
        place: &str,
        domains: &[(NamedVertex, Vec<NamedVertex>)],
    ) -> Result<()> {
        if !self.super_extra_verbose() {
            return Ok(());
        }
        self.log.comment(format_args!("{} domains follow", place))?;
        for (p, values) in domains {
            let mut text = format!("   {} size {} = {{", p, values.len());
            for t in values {
                let _ = write!(text, " {}", t);
            }
            text.push_str(" }");
            self.log.comment(text)?;
        }
        Ok(())
    }

    /// Propagation summary, only with super-extra-verbose output
    pub fn propagated(
        &mut self,
        p: &NamedVertex,
        t: &NamedVertex,
        graph: usize,
        n_values: usize,
        q: &NamedVertex,
    ) -> Result<()> {
        if !self.super_extra_verbose() {
            return Ok(());
        }
        self.log.comment(format_args!(
            "adjacency propagation from {} -> {} in graph pairs {} deleted {} values from {}",
            p, t, graph, n_values, q
        ))
    }
}
