//! Hall violators
//!
//! If k pattern vertices can only use fewer than k target vertices, summing
//! their at-least-one constraints with the injectivity constraints of those
//! targets gives a contradiction.

use crate::engine::Proof;
use crate::errors::Result;
use crate::features::proof::FactKey;
use crate::shared::models::{LineNumber, NamedVertex, PolishSum};
use std::fmt::Write;
use tracing::debug;

impl Proof {
    /// Sum at-least-one(lhs) and injectivity(rhs); `None` when both are empty
    pub fn emit_hall_set_or_violator(
        &mut self,
        lhs: &[NamedVertex],
        rhs: &[NamedVertex],
    ) -> Result<Option<LineNumber>> {
        let mut sum = PolishSum::new();
        for p in lhs {
            sum.add(self.facts.require(FactKey::AtLeastOneValue(p.id))?);
        }
        for t in rhs {
            sum.add(self.facts.require(FactKey::Injectivity(t.id))?);
        }
        if sum.is_empty() {
            return Ok(None);
        }

        let mut comment = String::from("hall set or violator {");
        for p in lhs {
            let _ = write!(comment, " {}", p);
        }
        comment.push_str(" } / {");
        for t in rhs {
            let _ = write!(comment, " {}", t);
        }
        comment.push_str(" }");

        self.log.comment(comment)?;
        self.log.derive(sum).map(Some)
    }

    /// Sum every live at-least-one and injectivity constraint
    pub fn failure_due_to_pattern_bigger_than_target(&mut self) -> Result<Option<LineNumber>> {
        let mut sum = PolishSum::new();
        let domains = self.facts.live_in_range(
            FactKey::AtLeastOneValue(0),
            FactKey::AtLeastOneValue(usize::MAX),
        );
        let targets = self
            .facts
            .live_in_range(FactKey::Injectivity(0), FactKey::Injectivity(usize::MAX));
        sum.add_all(domains.iter().chain(&targets).map(|(_, line)| *line));
        if sum.is_empty() {
            return Ok(None);
        }

        debug!(
            domains = domains.len(),
            targets = targets.len(),
            "pattern bigger than target"
        );
        self.log
            .comment("failure due to the pattern being bigger than the target")?;
        self.log.derive(sum).map(Some)
    }

    pub fn initial_domain_is_empty(&mut self, p: usize) -> Result<()> {
        self.log
            .comment(format_args!("failure due to domain {} being empty", p))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::{finalised_domains, memory_proof};
    use crate::shared::models::{LineNumber, NamedVertex};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hall_violator() {
        let (mut proof, _model, log) = finalised_domains(3, 2);
        let lhs = [NamedVertex::new(0, "a"), NamedVertex::new(2, "c")];
        let rhs = [NamedVertex::new(1, "y")];
        let line = proof.emit_hall_set_or_violator(&lhs, &rhs).unwrap();

        assert_eq!(line, Some(LineNumber(9)));
        assert_eq!(
            log.lines()[2..],
            ["* hall set or violator { a c } / { y }", "p 1 5 + 8 + 0"]
        );
    }

    #[test]
    fn test_empty_hall_set_is_inapplicable() {
        let (mut proof, _model, log) = finalised_domains(1, 1);
        assert_eq!(proof.emit_hall_set_or_violator(&[], &[]).unwrap(), None);
        assert_eq!(log.lines().len(), 2);
    }

    #[test]
    fn test_pattern_bigger_than_target() {
        let (mut proof, _model, log) = finalised_domains(3, 2);
        proof.failure_due_to_pattern_bigger_than_target().unwrap();
        proof.initial_domain_is_empty(2).unwrap();
        assert_eq!(
            log.lines()[2..],
            [
                "* failure due to the pattern being bigger than the target",
                "p 1 3 + 5 + 7 + 8 + 0",
                "* failure due to domain 2 being empty",
            ]
        );
    }

    #[test]
    fn test_pattern_bigger_than_target_without_facts() {
        let (mut proof, _model, _log) = memory_proof(false);
        proof.finalise_model().unwrap();
        assert_eq!(proof.failure_due_to_pattern_bigger_than_target().unwrap(), None);
    }
}
