//! Clique sub-proof for homomorphisms
//!
//! To rule out `p -> t`, the solver looks for a clique of size k in the
//! neighbourhood of t that the k-clique around p would need. The sub-proof
//! runs on a scratch level: it restates "the clique around p must land in
//! N(t)" as an objective, adds pairwise exclusions between assignments that
//! cannot coexist, lets the clique search (`backtrack_from_binary_variables`,
//! `colour_bound`) refute it, then concludes `~x_pt` back on the outer level.

use super::rup;
use crate::engine::Proof;
use crate::errors::{ProofError, Result};
use crate::features::proof::FactKey;
use crate::shared::models::{Level, LineNumber, Literal, NamedVertex, PbConstraint, PolishSum};
use std::collections::BTreeMap;
use tracing::debug;

/// State of the one open hom-clique sub-proof
#[derive(Debug)]
pub struct HomCliqueContext {
    pub(crate) p: NamedVertex,
    pub(crate) t: NamedVertex,
    /// Level to return to when the sub-proof closes
    pub(crate) outer: Level,
    pub(crate) p_clique: Vec<NamedVertex>,
    /// Clique-search vertex -> target vertex
    pub(crate) t_clique_neighbourhood: BTreeMap<usize, NamedVertex>,
}

impl HomCliqueContext {
    pub(crate) fn target_for(&self, v: usize) -> Result<&NamedVertex> {
        self.t_clique_neighbourhood.get(&v).ok_or_else(|| {
            ProofError::contract(format!(
                "clique vertex {} is not in the neighbourhood of {}",
                v, self.t
            ))
        })
    }

    pub(crate) fn is_for(&self, p: &NamedVertex, t: &NamedVertex) -> bool {
        self.p.id == p.id && self.t.id == t.id
    }
}

impl Proof {
    pub(crate) fn hom_clique_context(&self) -> Result<&HomCliqueContext> {
        self.hom_clique
            .as_ref()
            .ok_or_else(|| ProofError::contract("no hom clique proof is open"))
    }

    fn hom_clique_context_for(&self, p: &NamedVertex, t: &NamedVertex) -> Result<&HomCliqueContext> {
        let context = self.hom_clique_context()?;
        if !context.is_for(p, t) {
            return Err(ProofError::contract(format!(
                "hom clique proof is open for {} -> {}, not {} -> {}",
                context.p, context.t, p, t
            )));
        }
        Ok(context)
    }

    /// `~x_pt | ~x_a.. | ...` as a RUP line
    fn exclusion(&self, assignments: &[(usize, usize)]) -> Result<String> {
        let mut clause = PbConstraint::new(1);
        for &(p, t) in assignments {
            clause.push(1, Literal::neg(self.variables.assignment(p, t)?));
        }
        Ok(rup(&clause))
    }

    /// Open the sub-proof ruling out `p -> t`
    pub fn prepare_hom_clique_proof(
        &mut self,
        p: &NamedVertex,
        t: &NamedVertex,
        size: usize,
    ) -> Result<()> {
        if let Some(open) = &self.hom_clique {
            return Err(ProofError::contract(format!(
                "hom clique proof for {} -> {} is still open",
                open.p, open.t
            )));
        }
        self.variables.assignment(p.id, t.id)?;

        self.log.comment(format_args!(
            "clique of size {} around neighbourhood of {} but not {}",
            size, p, t
        ))?;
        let outer = self.open_scratch_level()?;
        self.hom_clique = Some(HomCliqueContext {
            p: p.clone(),
            t: t.clone(),
            outer,
            p_clique: Vec::new(),
            t_clique_neighbourhood: BTreeMap::new(),
        });
        debug!(p = p.id, t = t.id, size, "hom clique proof opened");
        Ok(())
    }

    /// Objective and pairwise exclusions for the clique around p against
    /// the neighbourhood of t
    pub fn start_hom_clique_proof(
        &mut self,
        p: &NamedVertex,
        p_clique: Vec<NamedVertex>,
        t: &NamedVertex,
        t_clique_neighbourhood: BTreeMap<usize, NamedVertex>,
    ) -> Result<()> {
        self.hom_clique_context_for(p, t)?;
        let targets: Vec<&NamedVertex> = t_clique_neighbourhood.values().collect();

        let mut covers = Vec::with_capacity(p_clique.len());
        for q in &p_clique {
            let mut clause =
                PbConstraint::clause([Literal::neg(self.variables.assignment(p.id, t.id)?)]);
            for u in &targets {
                clause.push(1, Literal::pos(self.variables.assignment(q.id, u.id)?));
            }
            covers.push(rup(&clause));
        }

        // two clique vertices on one target
        let mut injective = Vec::new();
        for (i, a) in p_clique.iter().enumerate() {
            for b in &p_clique[i + 1..] {
                for u in &targets {
                    let key = FactKey::hom_exclusion((a.id, u.id), (b.id, u.id));
                    injective.push((key, self.exclusion(&[(a.id, u.id), (b.id, u.id)])?));
                }
            }
        }

        // one clique vertex on two targets
        let mut functional = Vec::new();
        for a in &p_clique {
            for (i, u) in targets.iter().enumerate() {
                for w in &targets[i + 1..] {
                    let key = FactKey::hom_exclusion((a.id, u.id), (a.id, w.id));
                    functional.push((key, self.exclusion(&[(a.id, u.id), (a.id, w.id)])?));
                }
            }
        }

        self.log.comment("hom clique objective")?;
        let mut objective = PolishSum::new();
        for cover in covers {
            objective.add(self.log.derive(cover)?);
        }
        if !objective.is_empty() {
            let line = self.log.derive(objective)?;
            self.facts.record(FactKey::Objective, line);
        }

        self.log.comment("hom clique non edges for injectivity")?;
        for (key, text) in injective {
            let line = self.log.derive(text)?;
            self.facts.record(key, line);
        }
        self.log.comment("hom clique non edges for variables")?;
        for (key, text) in functional {
            let line = self.log.derive(text)?;
            self.facts.record(key, line);
        }

        if let Some(context) = self.hom_clique.as_mut() {
            context.p_clique = p_clique;
            context.t_clique_neighbourhood = t_clique_neighbourhood;
        }
        Ok(())
    }

    /// Exclusions for clique vertices on targets `t` and `u` that are not
    /// adjacent, conditional on `filter_p -> filter_t`
    pub fn add_hom_clique_non_edge(
        &mut self,
        filter_p: &NamedVertex,
        filter_t: &NamedVertex,
        p_clique: &[NamedVertex],
        t: &NamedVertex,
        u: &NamedVertex,
    ) -> Result<()> {
        self.hom_clique_context()?;
        let mut exclusions = Vec::new();
        for a in p_clique {
            for b in p_clique {
                if a.id == b.id {
                    continue;
                }
                let key = FactKey::hom_exclusion((a.id, t.id), (b.id, u.id));
                let text =
                    self.exclusion(&[(filter_p.id, filter_t.id), (a.id, t.id), (b.id, u.id)])?;
                exclusions.push((key, text));
            }
        }

        self.log
            .comment(format_args!("hom clique non edges for {} {}", t, u))?;
        for (key, text) in exclusions {
            let line = self.log.derive(text)?;
            self.facts.record(key, line);
        }
        Ok(())
    }

    /// Close the sub-proof with `u 1 ~x_pt >= 1 ;` on the outer level
    pub fn finish_hom_clique_proof(
        &mut self,
        p: &NamedVertex,
        t: &NamedVertex,
        size: usize,
    ) -> Result<LineNumber> {
        let outer = self.hom_clique_context_for(p, t)?.outer;
        let conclusion = self.exclusion(&[(p.id, t.id)])?;

        self.log.comment(format_args!(
            "end clique of size {} around neighbourhood of {} but not {}",
            size, p, t
        ))?;
        self.leave_scratch_level(outer)?;
        let line = self.log.derive(conclusion)?;
        self.facts.record(FactKey::Elimination(p.id, t.id), line);
        self.discard_scratch_level(outer)?;
        self.hom_clique = None;
        debug!(p = p.id, t = t.id, line = line.get(), "hom clique proof closed");
        Ok(line)
    }

    /// Nogood for a failed clique-search branch. Inside a hom-clique proof
    /// each chosen vertex may come from any clique member, so one nogood is
    /// written per combination. Returns the number of nogoods.
    pub fn backtrack_from_binary_variables(&mut self, vertices: &[usize]) -> Result<usize> {
        let Some(context) = &self.hom_clique else {
            let mut clause = PbConstraint::new(1);
            for &v in vertices {
                clause.push(1, Literal::neg(self.variables.binary(v)?));
            }
            self.log.derive(rup(&clause))?;
            return Ok(1);
        };

        let root = self.variables.assignment(context.p.id, context.t.id)?;
        let mut choices = Vec::with_capacity(vertices.len());
        for &v in vertices {
            let target = context.target_for(v)?;
            let names = context
                .p_clique
                .iter()
                .map(|q| self.variables.assignment(q.id, target.id))
                .collect::<Result<Vec<_>>>()?;
            choices.push(names);
        }

        if choices.iter().any(Vec::is_empty) {
            return Err(ProofError::contract(format!(
                "hom clique proof for {} -> {} has no clique vertices to backtrack over",
                context.p, context.t
            )));
        }

        let mut nogoods = Vec::new();
        let mut index = vec![0; choices.len()];
        'combinations: loop {
            let mut clause = PbConstraint::clause([Literal::neg(root)]);
            for (names, &i) in choices.iter().zip(&index) {
                clause.push(1, Literal::neg(names[i]));
            }
            nogoods.push(rup(&clause));

            let mut d = choices.len();
            loop {
                if d == 0 {
                    break 'combinations;
                }
                d -= 1;
                index[d] += 1;
                if index[d] < choices[d].len() {
                    break;
                }
                index[d] = 0;
            }
        }

        self.log.comment(format_args!(
            "backtrack inside hom clique proof, depth {}",
            vertices.len()
        ))?;
        let count = nogoods.len();
        for nogood in nogoods {
            self.log.derive(nogood)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::{finalised_domains, memory_proof};
    use crate::features::proof::FactKey;
    use crate::shared::models::NamedVertex;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn v(id: usize) -> NamedVertex {
        NamedVertex::numbered(id)
    }

    /// 3 pattern vertices over 4 targets; x(p, t) = 4p + t + 1
    fn neighbourhood() -> BTreeMap<usize, NamedVertex> {
        BTreeMap::from([(0, v(1)), (1, v(2))])
    }

    #[test]
    fn test_full_sub_proof() {
        let (mut proof, _model, log) = finalised_domains(3, 4);
        proof.start_level(2).unwrap();
        proof.prepare_hom_clique_proof(&v(0), &v(0), 2).unwrap();
        proof
            .start_hom_clique_proof(&v(0), vec![v(1), v(2)], &v(0), neighbourhood())
            .unwrap();
        assert!(proof.fact(FactKey::hom_exclusion((2, 1), (1, 1))).is_some());
        assert!(proof.fact(FactKey::hom_exclusion((1, 2), (1, 1))).is_some());

        let line = proof.finish_hom_clique_proof(&v(0), &v(0), 2).unwrap();
        let lines = log.lines();
        assert_eq!(
            lines[2..8],
            [
                "# 2",
                "* clique of size 2 around neighbourhood of 0 but not 0",
                "# 3",
                "* hom clique objective",
                "u 1 ~x1 1 x6 1 x7 >= 1 ;",
                "u 1 ~x1 1 x10 1 x11 >= 1 ;",
            ]
        );
        assert_eq!(lines[8], "p 11 12 + 0");
        assert_eq!(
            lines[lines.len() - 4..],
            [
                "* end clique of size 2 around neighbourhood of 0 but not 0",
                "# 2",
                "u 1 ~x1 >= 1 ;",
                "w 3",
            ]
        );
        assert_eq!(proof.fact(FactKey::Elimination(0, 0)), Some(line));
        assert!(proof.fact(FactKey::hom_exclusion((2, 1), (1, 1))).is_none());
        assert!(proof.fact(FactKey::Objective).is_none());
        assert_eq!(proof.current_level(), 2);
    }

    #[test]
    fn test_re_entry_rejected() {
        let (mut proof, _model, log) = finalised_domains(2, 2);
        proof.prepare_hom_clique_proof(&v(0), &v(0), 1).unwrap();
        let written = log.lines().len();
        let err = proof.prepare_hom_clique_proof(&v(1), &v(1), 1).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(log.lines().len(), written);
    }

    #[test]
    fn test_finish_without_prepare_rejected() {
        let (mut proof, _model, _log) = finalised_domains(1, 1);
        assert!(proof.finish_hom_clique_proof(&v(0), &v(0), 1).is_err());
        let err = proof
            .add_hom_clique_non_edge(&v(0), &v(0), &[v(0)], &v(0), &v(0))
            .unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_backtrack_outside_sub_proof() {
        let (mut proof, _model, log) = memory_proof(false);
        proof.create_binary_variable(0, |v| v.to_string()).unwrap();
        proof.create_binary_variable(1, |v| v.to_string()).unwrap();
        proof.finalise_model().unwrap();
        assert_eq!(proof.backtrack_from_binary_variables(&[1, 0]).unwrap(), 1);
        assert_eq!(log.lines()[2], "u 1 ~x2 1 ~x1 >= 1 ;");
    }

    #[test]
    fn test_backtrack_expands_inside_sub_proof() {
        let (mut proof, _model, log) = finalised_domains(3, 4);
        proof.prepare_hom_clique_proof(&v(0), &v(0), 2).unwrap();
        proof
            .start_hom_clique_proof(&v(0), vec![v(1), v(2)], &v(0), neighbourhood())
            .unwrap();
        let written = log.lines().len();

        let count = proof.backtrack_from_binary_variables(&[0, 1]).unwrap();
        assert_eq!(count, 4);
        assert_eq!(
            log.lines()[written..],
            [
                "* backtrack inside hom clique proof, depth 2",
                "u 1 ~x1 1 ~x6 1 ~x7 >= 1 ;",
                "u 1 ~x1 1 ~x6 1 ~x11 >= 1 ;",
                "u 1 ~x1 1 ~x10 1 ~x7 >= 1 ;",
                "u 1 ~x1 1 ~x10 1 ~x11 >= 1 ;",
            ]
        );
    }

    #[test]
    fn test_backtrack_without_clique_vertices_rejected() {
        let (mut proof, _model, log) = finalised_domains(2, 3);
        proof.prepare_hom_clique_proof(&v(0), &v(0), 1).unwrap();
        proof
            .start_hom_clique_proof(&v(0), Vec::new(), &v(0), BTreeMap::from([(0, v(1))]))
            .unwrap();
        let written = log.lines().len();

        let err = proof.backtrack_from_binary_variables(&[0]).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(log.lines().len(), written);

        assert_eq!(proof.backtrack_from_binary_variables(&[]).unwrap(), 1);
        assert_eq!(log.lines()[written + 1], "u 1 ~x1 >= 1 ;");
    }

    #[test]
    fn test_add_non_edge() {
        let (mut proof, _model, log) = finalised_domains(3, 4);
        proof.prepare_hom_clique_proof(&v(0), &v(0), 2).unwrap();
        let written = log.lines().len();
        proof
            .add_hom_clique_non_edge(&v(0), &v(0), &[v(1), v(2)], &v(1), &v(3))
            .unwrap();
        assert_eq!(
            log.lines()[written..],
            [
                "* hom clique non edges for 1 3",
                "u 1 ~x1 1 ~x6 1 ~x12 >= 1 ;",
                "u 1 ~x1 1 ~x10 1 ~x8 >= 1 ;",
            ]
        );
        assert!(proof.fact(FactKey::hom_exclusion((2, 3), (1, 1))).is_some());
    }
}
