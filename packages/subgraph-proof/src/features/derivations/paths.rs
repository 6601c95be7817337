//! Adjacency in derived graphs
//!
//! A derived graph pair `graph` relates p and q when a short path joins them
//! in the pattern. Chaining the base adjacency constraints (graph 0) along
//! that path yields `~x_pt | x_qu1 | ... | x_quk` for the targets u reachable
//! from t, which is recorded as `adjacency(graph, p, q, t)`. Intermediate
//! lines live on a scratch level.

use super::justify;
use crate::engine::Proof;
use crate::errors::Result;
use crate::features::proof::FactKey;
use crate::shared::models::{LineNumber, Literal, NamedVertex, PbConstraint, PolishSum};

impl Proof {
    /// `~x_pt | x_q,u1 | ... ` rendered as text
    fn mapping_implies(
        &self,
        p: usize,
        t: usize,
        q: usize,
        targets: impl IntoIterator<Item = usize>,
    ) -> Result<String> {
        let mut clause = PbConstraint::clause([Literal::neg(self.variables.assignment(p, t)?)]);
        for u in targets {
            clause.push(1, Literal::pos(self.variables.assignment(q, u)?));
        }
        Ok(clause.to_string())
    }

    fn base_adjacency(&self, p: usize, q: usize, t: usize) -> Result<LineNumber> {
        self.facts.require(FactKey::adjacency(0, p, q, t))
    }

    /// Adjacency from paths of length exactly two through `between_p_and_q`.
    /// `two_away_from_t` pairs each target two steps from t with the middle
    /// vertices of those walks; `d_n_t` are the targets reached by enough
    /// walks. `None` when there is nothing to chain.
    pub fn create_exact_path_graphs(
        &mut self,
        graph: usize,
        p: &NamedVertex,
        q: &NamedVertex,
        between_p_and_q: &[NamedVertex],
        t: &NamedVertex,
        n_t: &[NamedVertex],
        two_away_from_t: &[(NamedVertex, Vec<NamedVertex>)],
        d_n_t: &[NamedVertex],
    ) -> Result<Option<LineNumber>> {
        let mut first_hop = PolishSum::new();
        for b in between_p_and_q {
            first_hop.add(self.base_adjacency(p.id, b.id, t.id)?);
        }
        if first_hop.is_empty() {
            return Ok(None);
        }
        for b in between_p_and_q {
            for w in n_t {
                // loops or labels may leave no constraint for b -> w
                if let Some(line) = self.facts.get(FactKey::adjacency(0, b.id, q.id, w.id)) {
                    first_hop.add(line);
                }
            }
        }

        let reach = self.mapping_implies(p.id, t.id, q.id, two_away_from_t.iter().map(|(u, _)| u.id))?;
        let injectivity = self.facts.require(FactKey::Injectivity(t.id))?;
        let reach_not_t = self.mapping_implies(
            p.id,
            t.id,
            q.id,
            two_away_from_t
                .iter()
                .map(|(u, _)| u.id)
                .filter(|&u| u != t.id),
        )?;

        // targets two away from t through too few walks
        let mut too_few = Vec::new();
        for (u, middles) in two_away_from_t {
            if u.id == t.id || d_n_t.iter().any(|d| d.id == u.id) {
                continue;
            }
            let mut sum = PolishSum::new();
            for b in between_p_and_q {
                sum.add(self.base_adjacency(p.id, b.id, t.id)?);
                sum.add(self.base_adjacency(q.id, b.id, u.id)?);
                sum.add(self.facts.require(FactKey::AtMostOneValue(b.id))?);
            }
            for z in middles {
                sum.add(self.facts.require(FactKey::Injectivity(z.id))?);
            }
            let excluded = PbConstraint::clause([
                Literal::neg(self.variables.assignment(p.id, t.id)?),
                Literal::neg(self.variables.assignment(q.id, u.id)?),
            ])
            .to_string();
            too_few.push((sum, excluded));
        }

        let closure = self.mapping_implies(
            p.id,
            t.id,
            q.id,
            d_n_t.iter().map(|u| u.id).filter(|&u| u != t.id),
        )?;

        self.log.comment(format_args!(
            "adjacency {} maps to {} in G^[{}x2] so {} maps one of...",
            p, t, graph, q
        ))?;
        let outer = self.open_scratch_level()?;
        let hops = self.log.derive(first_hop)?;
        let reached = self.log.derive(justify(hops, &reach))?;
        let mut not_t = PolishSum::starting_with(reached);
        not_t.add(injectivity);
        let not_t = self.log.derive(not_t)?;
        let tidied = self.log.derive(justify(not_t, &reach_not_t))?;

        let mut cancel = PolishSum::starting_with(tidied);
        for (sum, excluded) in too_few {
            let counted = self.log.derive(sum)?;
            cancel.add(self.log.derive(justify(counted, &excluded))?);
        }
        let hint = if cancel.addends() > 1 {
            self.log.derive(cancel)?
        } else {
            tidied
        };

        self.leave_scratch_level(outer)?;
        let line = self.log.derive(justify(hint, &closure))?;
        self.facts.record(FactKey::adjacency(graph, p.id, q.id, t.id), line);
        self.discard_scratch_level(outer)?;
        Ok(Some(line))
    }

    /// p and q are adjacent, so the base adjacency constraint already implies
    /// the distance-3 closure
    pub fn create_distance3_graphs_but_actually_distance_1(
        &mut self,
        graph: usize,
        p: &NamedVertex,
        q: &NamedVertex,
        t: &NamedVertex,
        d3_from_t: &[NamedVertex],
    ) -> Result<LineNumber> {
        let hint = self.base_adjacency(p.id, q.id, t.id)?;
        let closure = self.mapping_implies(p.id, t.id, q.id, d3_from_t.iter().map(|u| u.id))?;

        self.log.comment(format_args!(
            "adjacency {} maps to {} in G^3 so by adjacency, {} maps to one of...",
            p, t, q
        ))?;
        let line = self.log.derive(justify(hint, &closure))?;
        self.facts.record(FactKey::adjacency(graph, p.id, q.id, t.id), line);
        Ok(line)
    }

    /// p - via - q
    pub fn create_distance3_graphs_but_actually_distance_2(
        &mut self,
        graph: usize,
        p: &NamedVertex,
        q: &NamedVertex,
        via: &NamedVertex,
        t: &NamedVertex,
        d1_from_t: &[NamedVertex],
        d2_from_t: &[NamedVertex],
        d3_from_t: &[NamedVertex],
    ) -> Result<LineNumber> {
        let mut hops = PolishSum::starting_with(self.base_adjacency(p.id, via.id, t.id)?);
        for u in d1_from_t {
            hops.add(self.base_adjacency(via.id, q.id, u.id)?);
        }
        let within_two = self.mapping_implies(p.id, t.id, q.id, d2_from_t.iter().map(|u| u.id))?;
        let closure = self.mapping_implies(p.id, t.id, q.id, d3_from_t.iter().map(|u| u.id))?;

        self.log.comment(format_args!(
            "adjacency {} maps to {} in G^3 so using vertex {}, {} maps to one of...",
            p, t, via, q
        ))?;
        let outer = self.open_scratch_level()?;
        let hops = self.log.derive(hops)?;
        let hint = self.log.derive(justify(hops, &within_two))?;
        self.leave_scratch_level(outer)?;
        let line = self.log.derive(justify(hint, &closure))?;
        self.facts.record(FactKey::adjacency(graph, p.id, q.id, t.id), line);
        self.discard_scratch_level(outer)?;
        Ok(line)
    }

    /// p - first - second - q
    pub fn create_distance3_graphs(
        &mut self,
        graph: usize,
        p: &NamedVertex,
        q: &NamedVertex,
        first: &NamedVertex,
        second: &NamedVertex,
        t: &NamedVertex,
        d1_from_t: &[NamedVertex],
        d2_from_t: &[NamedVertex],
        d3_from_t: &[NamedVertex],
    ) -> Result<LineNumber> {
        let mut hops = PolishSum::starting_with(self.base_adjacency(p.id, first.id, t.id)?);
        for u in d1_from_t {
            hops.add(self.base_adjacency(first.id, second.id, u.id)?);
        }
        let second_within_two =
            self.mapping_implies(p.id, t.id, second.id, d2_from_t.iter().map(|u| u.id))?;
        let last_hop = d2_from_t
            .iter()
            .map(|u| self.base_adjacency(second.id, q.id, u.id))
            .collect::<Result<Vec<_>>>()?;
        let closure = self.mapping_implies(p.id, t.id, q.id, d3_from_t.iter().map(|u| u.id))?;

        self.log.comment(format_args!(
            "adjacency {} maps to {} in G^3 so using path {} -- {}, {} maps to one of...",
            p, t, first, second, q
        ))?;
        let outer = self.open_scratch_level()?;
        let hops = self.log.derive(hops)?;
        let reached = self.log.derive(justify(hops, &second_within_two))?;
        let mut extended = PolishSum::starting_with(reached);
        extended.add_all(last_hop);
        let hint = self.log.derive(extended)?;
        self.leave_scratch_level(outer)?;
        let line = self.log.derive(justify(hint, &closure))?;
        self.facts.record(FactKey::adjacency(graph, p.id, q.id, t.id), line);
        self.discard_scratch_level(outer)?;
        Ok(line)
    }
}
