//! Objective bounds and clique reasoning over binary vertices

use super::rup;
use crate::engine::Proof;
use crate::errors::Result;
use crate::features::proof::FactKey;
use crate::shared::models::{LineNumber, Literal, PbConstraint, PolishSum};
use std::collections::BTreeSet;
use std::fmt::Write;
use tracing::debug;

/// What one colour class adds to the bound
enum Contribution {
    /// A single exclusion line already in the proof
    Existing(LineNumber),
    /// A folded sum that has to be derived first
    Derived(PolishSum),
}

impl Proof {
    /// Pairwise exclusions of a class folded into "at most one member".
    /// `exclusion(i, j)` names the fact excluding members i and j.
    fn class_contribution(
        &self,
        size: usize,
        exclusion: impl Fn(usize, usize) -> FactKey,
    ) -> Result<Option<Contribution>> {
        match size {
            0 | 1 => Ok(None),
            2 => Ok(Some(Contribution::Existing(
                self.facts.require(exclusion(1, 0))?,
            ))),
            _ => {
                let mut sum = PolishSum::starting_with(self.facts.require(exclusion(0, 1))?);
                for i in 2..size {
                    sum.multiply(i as u64);
                    for j in 0..i {
                        sum.add(self.facts.require(exclusion(i, j))?);
                    }
                    sum.divide(i as u64 + 1);
                }
                Ok(Some(Contribution::Derived(sum)))
            }
        }
    }

    /// Colouring bound: each colour class contributes at most one vertex.
    /// Inside a hom-clique proof each class is widened to every clique member
    /// on every target of the class.
    pub fn colour_bound(&mut self, classes: &[Vec<usize>]) -> Result<Option<LineNumber>> {
        let mut plan = Vec::with_capacity(classes.len());
        match &self.hom_clique {
            Some(context) => {
                for class in classes {
                    let mut members = Vec::new();
                    for &c in class {
                        let target = context.target_for(c)?;
                        for q in &context.p_clique {
                            members.push((q, target));
                        }
                    }
                    let mut comment = String::from("colour class [");
                    for (q, target) in &members {
                        let _ = write!(comment, " {}/{}", q, target);
                    }
                    comment.push_str(" ]");

                    let contribution = self.class_contribution(members.len(), |i, j| {
                        let (a, u) = members[i];
                        let (b, w) = members[j];
                        FactKey::hom_exclusion((a.id, u.id), (b.id, w.id))
                    })?;
                    plan.push((Some(comment), contribution));
                }
            }
            None => {
                for class in classes {
                    let contribution = self.class_contribution(class.len(), |i, j| {
                        FactKey::non_edge(class[i], class[j])
                    })?;
                    plan.push((None, contribution));
                }
            }
        }
        if plan.iter().all(|(_, contribution)| contribution.is_none()) {
            return Ok(None);
        }
        let objective = self.facts.require(FactKey::Objective)?;

        let mut header = String::from("bound, ccs");
        for class in classes {
            header.push_str(" [");
            for c in class {
                let _ = write!(header, " {}", c);
            }
            header.push_str(" ]");
        }
        self.log.comment(header)?;

        let mut total = PolishSum::starting_with(objective);
        for (comment, contribution) in plan {
            if let Some(comment) = comment {
                self.log.comment(comment)?;
            }
            match contribution {
                Some(Contribution::Existing(line)) => {
                    total.add(line);
                }
                Some(Contribution::Derived(sum)) => {
                    total.add(self.log.derive(sum)?);
                }
                None => {}
            }
        }
        debug!(classes = classes.len(), addends = total.addends(), "colour bound");
        self.log.derive(total).map(Some)
    }

    /// Bound from (pattern set, target set) partitions: every partition with
    /// fewer targets than pattern vertices leaves at least the difference
    /// unmapped
    pub fn mcs_bound(
        &mut self,
        partitions: &[(BTreeSet<usize>, BTreeSet<usize>)],
    ) -> Result<Option<LineNumber>> {
        let mut sums = Vec::new();
        for (pattern, targets) in partitions {
            if targets.len() >= pattern.len() {
                continue;
            }
            let mut sum = PolishSum::new();
            for &p in pattern {
                sum.add(self.facts.require(FactKey::AtLeastOneValue(p))?);
            }
            for &t in targets {
                sum.add(self.facts.require(FactKey::Injectivity(t))?);
            }
            sums.push(sum);
        }
        if sums.is_empty() {
            return Ok(None);
        }
        let mut total = PolishSum::starting_with(self.facts.require(FactKey::Objective)?);

        self.log.comment("failed bound")?;
        for sum in sums {
            total.add(self.log.derive(sum)?);
        }
        self.log.derive(total).map(Some)
    }

    /// Objective plus every at-most-one constraint, so the objective counts
    /// null assignments. Becomes the new objective.
    pub fn rewrite_mcs_objective(&mut self, pattern_size: usize) -> Result<LineNumber> {
        let mut sum = PolishSum::starting_with(self.facts.require(FactKey::Objective)?);
        for p in 0..pattern_size {
            sum.add(self.facts.require(FactKey::AtMostOneValue(p))?);
        }

        self.log
            .comment("get the objective function to talk about nulls, not non-nulls")?;
        let line = self.log.derive(sum)?;
        self.facts.record(FactKey::Objective, line);
        Ok(line)
    }

    /// `u 1 ~x_v 1 ~x_w >= 1 ;`, recorded as a non-edge
    pub fn create_clique_nonedge(&mut self, v: usize, w: usize) -> Result<LineNumber> {
        let clause = PbConstraint::clause([
            Literal::neg(self.variables.binary(v)?),
            Literal::neg(self.variables.binary(w)?),
        ]);
        let line = self.log.derive(rup(&clause))?;
        self.facts.record(FactKey::non_edge(v, w), line);
        Ok(line)
    }

    /// `y` together with all of `set` is not connected
    pub fn not_connected_in_underlying_graph(
        &mut self,
        set: &[usize],
        y: usize,
    ) -> Result<LineNumber> {
        let mut clause = PbConstraint::clause([Literal::neg(self.variables.binary(y)?)]);
        for &v in set {
            clause.push(1, Literal::neg(self.variables.binary(v)?));
        }
        let text = rup(&clause);
        self.log.derive(text)
    }
}
