//! Degree-based eliminations
//!
//! Mapping p to t forces every neighbour of p onto a neighbour of t. When p
//! has more neighbours than t, summing the adjacency constraints with the
//! injectivity constraints of t's neighbours rules out `x_pt`.

use super::justify;
use crate::engine::Proof;
use crate::errors::Result;
use crate::features::proof::FactKey;
use crate::shared::models::{LineNumber, Literal, NamedVertex, PbConstraint, PolishSum};
use tracing::trace;

impl Proof {
    /// Adjacency sum for `p -> t` over the neighbours of p that still have a
    /// live adjacency fact
    fn live_adjacency_sum(&self, graph: usize, p: usize, neighbours: &[usize], t: usize) -> PolishSum {
        let mut sum = PolishSum::new();
        for &n in neighbours {
            if let Some(line) = self.facts.get(FactKey::adjacency(graph, p, n, t)) {
                sum.add(line);
            }
        }
        sum
    }

    /// Derive `~x_pt` from degrees in graph pair `graph`. `None` when no
    /// neighbour of p has a live adjacency fact.
    pub fn incompatible_by_degrees(
        &mut self,
        graph: usize,
        p: &NamedVertex,
        n_p: &[usize],
        t: &NamedVertex,
        n_t: &[usize],
    ) -> Result<Option<LineNumber>> {
        let mut sum = self.live_adjacency_sum(graph, p.id, n_p, t.id);
        if sum.is_empty() {
            trace!(p = p.id, t = t.id, "no adjacency facts, degree elimination skipped");
            return Ok(None);
        }
        for &n in n_t {
            sum.add(self.facts.require(FactKey::Injectivity(n))?);
        }
        let eliminated =
            PbConstraint::clause([Literal::neg(self.variables.assignment(p.id, t.id)?)])
                .to_string();

        self.log.comment(format_args!(
            "cannot map {} to {} due to degrees in graph pairs {}",
            p, t, graph
        ))?;
        let hint = self.log.derive(sum)?;
        let line = self.log.derive(justify(hint, &eliminated))?;
        self.facts.record(FactKey::Elimination(p.id, t.id), line);
        Ok(Some(line))
    }

    /// Derive `~x_pt` from neighbourhood degree sequences. The sum lives on a
    /// scratch level; only the elimination survives.
    pub fn incompatible_by_nds(
        &mut self,
        graph: usize,
        p: &NamedVertex,
        t: &NamedVertex,
        p_subsequence: &[usize],
        t_subsequence: &[usize],
        t_remaining: &[usize],
    ) -> Result<Option<LineNumber>> {
        let mut sum = self.live_adjacency_sum(graph, p.id, p_subsequence, t.id);
        if sum.is_empty() {
            trace!(p = p.id, t = t.id, "no adjacency facts, nds elimination skipped");
            return Ok(None);
        }

        // injectivity inside the square, all but the last column
        if let Some((_, square)) = t_subsequence.split_last() {
            for &u in square {
                sum.add(self.facts.require(FactKey::Injectivity(u))?);
            }
        }
        // block to the right of the square
        for &n in p_subsequence {
            for &u in t_remaining {
                sum.add(self.facts.require(FactKey::Elimination(n, u))?);
            }
        }
        // last column
        if let Some(&last) = t_subsequence.last() {
            for &n in p_subsequence {
                sum.add(self.facts.require(FactKey::Elimination(n, last))?);
            }
        }
        let eliminated =
            PbConstraint::clause([Literal::neg(self.variables.assignment(p.id, t.id)?)])
                .to_string();

        self.log.comment(format_args!(
            "cannot map {} to {} due to nds in graph pairs {}",
            p, t, graph
        ))?;
        let outer = self.open_scratch_level()?;
        let hint = self.log.derive(sum)?;
        self.leave_scratch_level(outer)?;
        let line = self.log.derive(justify(hint, &eliminated))?;
        self.facts.record(FactKey::Elimination(p.id, t.id), line);
        self.discard_scratch_level(outer)?;
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::memory_proof;
    use crate::engine::Proof;
    use crate::features::proof::FactKey;
    use crate::infrastructure::SharedBuffer;
    use crate::shared::models::{LineNumber, NamedVertex};
    use pretty_assertions::assert_eq;

    /// Path pattern 0 - 1 - 2 into a 3-vertex target where 0 and 2 are
    /// leaves. Constraints: domains 1..=6, injectivity 7..=9.
    fn path_model() -> (Proof, SharedBuffer) {
        let (mut proof, _model, log) = memory_proof(false);
        for p in 0..3 {
            proof
                .create_cp_variable(p, 3, |v| v.to_string(), |v| v.to_string())
                .unwrap();
        }
        proof.create_injectivity_constraints(3, 3).unwrap();
        // 1 -> 0: its neighbours 0 and 2 must map next to target 0, which has only target 1
        proof.create_adjacency_constraint(1, 0, 0, &[1]).unwrap(); // 10
        proof.create_adjacency_constraint(1, 2, 0, &[1]).unwrap(); // 11
        proof.create_forbidden_assignment_constraint(0, 2).unwrap(); // 12
        proof.create_forbidden_assignment_constraint(2, 2).unwrap(); // 13
        proof.finalise_model().unwrap();
        (proof, log)
    }

    #[test]
    fn test_degree_elimination() {
        let (mut proof, log) = path_model();
        let p = NamedVertex::new(1, "b");
        let t = NamedVertex::new(0, "x");
        let line = proof
            .incompatible_by_degrees(0, &p, &[0, 2], &t, &[1])
            .unwrap();

        assert_eq!(line, Some(LineNumber(15)));
        assert_eq!(
            log.lines()[2..],
            [
                "* cannot map b to x due to degrees in graph pairs 0",
                "p 10 11 + 8 + 0",
                "j 14 1 ~x4 >= 1 ;",
            ]
        );
        assert_eq!(proof.fact(FactKey::Elimination(1, 0)), Some(LineNumber(15)));
    }

    #[test]
    fn test_degree_without_adjacency_is_inapplicable() {
        let (mut proof, log) = path_model();
        let line = proof
            .incompatible_by_degrees(
                0,
                &NamedVertex::numbered(0),
                &[1],
                &NamedVertex::numbered(0),
                &[1],
            )
            .unwrap();
        assert_eq!(line, None);
        assert_eq!(log.lines().len(), 2);
        assert_eq!(proof.proof_line(), LineNumber(13));
    }

    #[test]
    fn test_nds_elimination_on_scratch_level() {
        let (mut proof, log) = path_model();
        let line = proof
            .incompatible_by_nds(
                0,
                &NamedVertex::new(1, "b"),
                &NamedVertex::new(0, "x"),
                &[0, 2],
                &[1, 2],
                &[],
            )
            .unwrap();

        assert_eq!(line, Some(LineNumber(15)));
        assert_eq!(
            log.lines()[2..],
            [
                "* cannot map b to x due to nds in graph pairs 0",
                "# 1",
                "p 10 11 + 8 + 12 + 13 + 0",
                "# 0",
                "j 14 1 ~x4 >= 1 ;",
                "w 1",
            ]
        );
        assert_eq!(proof.fact(FactKey::Elimination(1, 0)), Some(LineNumber(15)));
    }

    #[test]
    fn test_nds_missing_elimination_writes_nothing() {
        let (mut proof, log) = path_model();
        let err = proof
            .incompatible_by_nds(
                0,
                &NamedVertex::numbered(1),
                &NamedVertex::numbered(0),
                &[0, 2],
                &[1, 2],
                &[1],
            )
            .unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(log.lines().len(), 2);
    }
}
