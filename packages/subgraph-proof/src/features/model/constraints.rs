//! Model construction
//!
//! Domains come first (as variables are created), then injectivity once every
//! variable exists, then structural constraints. Each constraint that later
//! derivations refer to is recorded under its `FactKey`.

use crate::engine::Proof;
use crate::errors::{ProofError, Result};
use crate::features::identifiers::naming;
use crate::features::proof::FactKey;
use crate::infrastructure::OutputSink;
use crate::shared::models::{LineNumber, Literal, PbConstraint};
use tracing::{debug, info};

impl Proof {
    /// Variables for `p -> 0..domain_size` plus its at-least-one and
    /// at-most-one constraints
    pub fn create_cp_variable(
        &mut self,
        p: usize,
        domain_size: usize,
        pattern_name: impl Fn(usize) -> String,
        target_name: impl Fn(usize) -> String,
    ) -> Result<()> {
        self.model.ensure_open()?;
        self.variables.claim_domain(p)?;
        for t in 0..domain_size {
            self.variables.create_assignment(p, t, || {
                naming::assignment_name(&pattern_name(p), &target_name(t))
            })?;
        }

        self.model.comment(format_args!("vertex {} domain", p))?;
        let names = (0..domain_size)
            .map(|t| self.variables.assignment(p, t))
            .collect::<Result<Vec<_>>>()?;
        let at_least_one = self
            .model
            .constraint(&PbConstraint::at_least_one(names.iter().copied()))?;
        let at_most_one = self
            .model
            .constraint(&PbConstraint::at_most_one(names.iter().copied()))?;

        self.facts.record(FactKey::AtLeastOneValue(p), at_least_one);
        self.facts.record(FactKey::AtMostOneValue(p), at_most_one);
        Ok(())
    }

    /// One at-most-one per target vertex over the pattern vertices that have
    /// a variable there
    pub fn create_injectivity_constraints(
        &mut self,
        pattern_size: usize,
        target_size: usize,
    ) -> Result<()> {
        self.model.ensure_open()?;
        for t in 0..target_size {
            self.model.comment(format_args!("injectivity on value {}", t))?;
            let names: Vec<&str> = (0..pattern_size)
                .filter_map(|p| self.variables.try_assignment(p, t))
                .collect();
            let line = self.model.constraint(&PbConstraint::at_most_one(names))?;
            self.facts.record(FactKey::Injectivity(t), line);
        }
        Ok(())
    }

    /// `1 ~x_pt >= 1 ;`, recorded as an elimination
    pub fn create_forbidden_assignment_constraint(&mut self, p: usize, t: usize) -> Result<()> {
        self.model.ensure_open()?;
        let name = self.variables.assignment(p, t)?;
        self.model.comment("forbidden assignment")?;
        let line = self
            .model
            .constraint(&PbConstraint::clause([Literal::neg(name)]))?;
        self.facts.record(FactKey::Elimination(p, t), line);
        Ok(())
    }

    pub fn start_adjacency_constraints_for(&mut self, p: usize, t: usize) -> Result<()> {
        self.model
            .comment(format_args!("adjacency {} maps to {}", p, t))
    }

    /// If `p -> t` then `q` maps to one of `candidates`
    pub fn create_adjacency_constraint(
        &mut self,
        p: usize,
        q: usize,
        t: usize,
        candidates: &[usize],
    ) -> Result<LineNumber> {
        self.model.ensure_open()?;
        let mut constraint = PbConstraint::clause([Literal::neg(self.variables.assignment(p, t)?)]);
        for &u in candidates {
            constraint.push(1, Literal::pos(self.variables.assignment(q, u)?));
        }
        let line = self.model.constraint(&constraint)?;
        self.facts.record(FactKey::adjacency(0, p, q, t), line);
        Ok(line)
    }

    pub fn create_binary_variable(
        &mut self,
        v: usize,
        name: impl FnOnce(usize) -> String,
    ) -> Result<()> {
        self.model.ensure_open()?;
        self.variables.create_binary(v, || name(v))
    }

    /// Objective over binary vertices `0..n`: a `min:` line, or with `bound`
    /// a decision constraint recorded as the objective
    pub fn create_objective(&mut self, n: usize, bound: Option<i64>) -> Result<()> {
        self.model.ensure_open()?;
        let names = (0..n)
            .map(|v| self.variables.binary(v).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        self.write_objective(&names, bound)
    }

    /// Objective over every non-null assignment `0..p x 0..t`
    pub fn create_non_null_decision_bound(
        &mut self,
        p: usize,
        t: usize,
        bound: Option<i64>,
    ) -> Result<()> {
        self.model.ensure_open()?;
        let mut names = Vec::with_capacity(p * t);
        for v in 0..p {
            for w in 0..t {
                names.push(self.variables.assignment(v, w)?.to_string());
            }
        }
        self.write_objective(&names, bound)
    }

    fn write_objective(&mut self, names: &[String], bound: Option<i64>) -> Result<()> {
        match bound {
            Some(bound) => {
                self.model.comment("objective")?;
                let mut constraint = PbConstraint::new(bound);
                for name in names {
                    constraint.push(1, Literal::pos(name));
                }
                let line = self.model.constraint(&constraint)?;
                self.facts.record(FactKey::Objective, line);
            }
            None => self.model.minimise(names.iter().map(String::as_str))?,
        }
        Ok(())
    }

    /// Binary vertices `v` and `w` are not both selected
    pub fn create_non_edge_constraint(&mut self, v: usize, w: usize) -> Result<()> {
        self.model.ensure_open()?;
        let constraint =
            PbConstraint::at_most_one([self.variables.binary(v)?, self.variables.binary(w)?]);
        let line = self.model.constraint(&constraint)?;
        self.facts.record(FactKey::non_edge(v, w), line);
        Ok(())
    }

    /// Binary vertex `i` becomes another name for assignment `encoding[i]`.
    /// `zero_in_proof_objectives` are appended negated to binary incumbents.
    pub fn create_clique_encoding(
        &mut self,
        encoding: &[(usize, usize)],
        zero_in_proof_objectives: &[(usize, usize)],
    ) -> Result<()> {
        for (i, &(p, t)) in encoding.iter().enumerate() {
            self.variables.alias_binary(i, p, t)?;
        }
        for &(p, t) in zero_in_proof_objectives {
            self.variables.assignment(p, t)?;
        }
        self.clique_encoding = true;
        self.zero_in_proof_objectives = zero_in_proof_objectives.to_vec();
        debug!(
            vertices = encoding.len(),
            zero_terms = zero_in_proof_objectives.len(),
            "clique encoding"
        );
        Ok(())
    }

    /// Write the model file, then the proof header
    pub fn finalise_model(&mut self) -> Result<()> {
        self.model.ensure_open()?;
        let destination = self
            .model_destination
            .take()
            .ok_or_else(|| ProofError::contract("model destination already used"))?;
        let mut sink = OutputSink::open(destination)?;

        let variables = self.variables.variable_count();
        let text = self.model.finish(variables)?;
        sink.write_raw(text.as_bytes())?;
        sink.close()?;

        let constraints = self.model.constraint_count();
        self.log.begin(constraints)?;
        info!(
            path = %sink.path().display(),
            variables,
            constraints,
            "model finalised"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::{finalised_domains, memory_proof};
    use crate::features::proof::FactKey;
    use crate::shared::models::LineNumber;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dense_domain() {
        let (mut proof, model, _log) = memory_proof(false);
        proof
            .create_cp_variable(0, 3, |v| v.to_string(), |v| v.to_string())
            .unwrap();
        proof.finalise_model().unwrap();

        assert_eq!(
            model.lines(),
            vec![
                "* #variable= 3 #constraint= 2",
                "* vertex 0 domain",
                "1 x1 1 x2 1 x3 >= 1 ;",
                "-1 x1 -1 x2 -1 x3 >= -1 ;",
            ]
        );
        assert_eq!(proof.fact(FactKey::AtLeastOneValue(0)), Some(LineNumber(1)));
        assert_eq!(proof.fact(FactKey::AtMostOneValue(0)), Some(LineNumber(2)));
    }

    #[test]
    fn test_empty_domain_still_has_two_constraints() {
        let (mut proof, model, _log) = memory_proof(false);
        proof
            .create_cp_variable(0, 0, |v| v.to_string(), |v| v.to_string())
            .unwrap();
        proof.finalise_model().unwrap();
        assert_eq!(
            model.lines(),
            vec![
                "* #variable= 0 #constraint= 2",
                "* vertex 0 domain",
                ">= 1 ;",
                ">= -1 ;",
            ]
        );
    }

    #[test]
    fn test_friendly_names() {
        let (mut proof, model, _log) = memory_proof(true);
        proof
            .create_cp_variable(0, 2, |_| "a".into(), |t| format!("t{}", t))
            .unwrap();
        proof.finalise_model().unwrap();
        assert_eq!(model.lines()[2], "1 xa_t0 1 xa_t1 >= 1 ;");
    }

    #[test]
    fn test_domain_created_twice() {
        let (mut proof, _model, _log) = memory_proof(false);
        proof
            .create_cp_variable(1, 2, |v| v.to_string(), |v| v.to_string())
            .unwrap();
        let err = proof
            .create_cp_variable(1, 2, |v| v.to_string(), |v| v.to_string())
            .unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(proof.constraint_count(), 2);
    }

    #[test]
    fn test_injectivity_and_structure() {
        let (mut proof, model, log) = memory_proof(false);
        for p in 0..2 {
            proof
                .create_cp_variable(p, 2, |v| v.to_string(), |v| v.to_string())
                .unwrap();
        }
        proof.create_injectivity_constraints(2, 2).unwrap();
        proof.create_forbidden_assignment_constraint(1, 1).unwrap();
        proof.start_adjacency_constraints_for(0, 0).unwrap();
        let adjacency = proof.create_adjacency_constraint(0, 1, 0, &[1]).unwrap();
        proof.finalise_model().unwrap();

        assert_eq!(
            model.lines()[7..],
            [
                "* injectivity on value 0",
                "-1 x1 -1 x3 >= -1 ;",
                "* injectivity on value 1",
                "-1 x2 -1 x4 >= -1 ;",
                "* forbidden assignment",
                "1 ~x4 >= 1 ;",
                "* adjacency 0 maps to 0",
                "1 ~x1 1 x4 >= 1 ;",
            ]
        );
        assert_eq!(model.lines()[0], "* #variable= 4 #constraint= 8");
        assert_eq!(adjacency, LineNumber(8));
        assert_eq!(proof.fact(FactKey::Elimination(1, 1)), Some(LineNumber(7)));
        assert_eq!(log.lines(), vec!["pseudo-Boolean proof version 1.0", "f 8 0"]);
        assert_eq!(proof.proof_line(), LineNumber(8));
    }

    #[test]
    fn test_objectives() {
        let (mut proof, model, _log) = memory_proof(false);
        for v in 0..3 {
            proof.create_binary_variable(v, |v| v.to_string()).unwrap();
        }
        proof.create_objective(3, None).unwrap();
        proof.create_non_edge_constraint(2, 0).unwrap();
        proof.create_objective(3, Some(2)).unwrap();
        proof.finalise_model().unwrap();

        assert_eq!(
            model.lines(),
            vec![
                "* #variable= 3 #constraint= 2",
                "min: -1 x1 -1 x2 -1 x3 ;",
                "-1 x3 -1 x1 >= -1 ;",
                "* objective",
                "1 x1 1 x2 1 x3 >= 2 ;",
            ]
        );
        assert_eq!(proof.fact(FactKey::non_edge(0, 2)), Some(LineNumber(1)));
        assert_eq!(proof.fact(FactKey::Objective), Some(LineNumber(2)));
    }

    #[test]
    fn test_non_null_decision_bound() {
        let (mut proof, model, _log) = memory_proof(false);
        for p in 0..2 {
            proof
                .create_cp_variable(p, 2, |v| v.to_string(), |v| v.to_string())
                .unwrap();
        }
        proof.create_non_null_decision_bound(2, 1, Some(1)).unwrap();
        proof.finalise_model().unwrap();
        assert_eq!(model.lines().last().unwrap(), "1 x1 1 x3 >= 1 ;");
    }

    #[test]
    fn test_clique_encoding_aliases_do_not_count() {
        let (mut proof, model, _log) = memory_proof(false);
        proof
            .create_cp_variable(0, 2, |v| v.to_string(), |v| v.to_string())
            .unwrap();
        proof.create_clique_encoding(&[(0, 1), (0, 0)], &[]).unwrap();
        proof.finalise_model().unwrap();

        assert!(proof.has_clique_model());
        assert_eq!(proof.binary_variable(0).unwrap(), "2");
        assert_eq!(model.lines()[0], "* #variable= 2 #constraint= 2");
    }

    #[test]
    fn test_model_closed_after_finalise() {
        let (mut proof, _model, _log) = finalised_domains(1, 1);
        let err = proof.create_forbidden_assignment_constraint(0, 0).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(proof.finalise_model().is_err());
    }

    #[test]
    fn test_unknown_assignment_rejected_before_writing() {
        let (mut proof, _model, _log) = memory_proof(false);
        let err = proof.create_adjacency_constraint(0, 1, 0, &[1]).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(proof.constraint_count(), 0);
    }
}
