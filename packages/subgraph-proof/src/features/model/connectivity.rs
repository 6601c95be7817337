//! Connectivity gadgets for common connected subgraph models
//!
//! Target index `null` is the "unmapped" value. `conn1_v_w` holds iff v and w
//! are adjacent and both mapped; `conn{k}_v_w` (k = 2, 4, ...) holds iff a
//! walk of length at most k exists, defined from layer k/2 through
//! `conn{k}_v_w_via_u`. Walk variables are keyed with v > w.

use crate::engine::Proof;
use crate::errors::Result;
use crate::shared::models::{Literal, PbConstraint};
use tracing::debug;

impl Proof {
    /// `p` pattern vertices, `null` the index of the null value, `adjacent`
    /// the pattern adjacency
    pub fn create_connected_constraints(
        &mut self,
        p: usize,
        null: usize,
        adjacent: impl Fn(usize, usize) -> bool,
    ) -> Result<()> {
        self.model.ensure_open()?;
        for v in 0..p {
            self.variables.assignment(v, null)?;
        }

        self.model
            .comment("selected vertices must be connected, walk 1")?;
        for v in 0..p {
            for w in 0..v {
                let walk = self.variables.create_walk(1, v, w)?.to_string();
                let vars = &self.variables;
                if !adjacent(v, w) {
                    self.model
                        .constraint(&PbConstraint::clause([Literal::neg(&walk)]))?;
                    continue;
                }
                let v_null = vars.assignment(v, null)?;
                let w_null = vars.assignment(w, null)?;
                for clause in [
                    PbConstraint::clause([Literal::neg(&walk), Literal::neg(v_null)]),
                    PbConstraint::clause([Literal::neg(&walk), Literal::neg(w_null)]),
                    PbConstraint::clause([
                        Literal::pos(&walk),
                        Literal::pos(v_null),
                        Literal::pos(w_null),
                    ]),
                ] {
                    self.model.constraint(&clause)?;
                }
            }
        }

        let mut last = None;
        let mut k = 2;
        while k < 2 * null {
            self.create_walk_layer(p, k)?;
            last = Some(k);
            k *= 2;
        }

        self.model
            .comment("if two vertices are used, they must be connected")?;
        for v in 0..p {
            for w in 0..v {
                let vars = &self.variables;
                let mut clause = PbConstraint::clause([
                    Literal::pos(vars.assignment(v, null)?),
                    Literal::pos(vars.assignment(w, null)?),
                ]);
                if let Some(k) = last {
                    clause.push(1, Literal::pos(vars.walk(k, v, w)?));
                }
                self.model.constraint(&clause)?;
            }
        }

        debug!(
            walks = self.variables.walk_count(),
            vias = self.variables.via_count(),
            "connectivity gadgets"
        );
        Ok(())
    }

    fn create_walk_layer(&mut self, p: usize, k: usize) -> Result<()> {
        let half = k / 2;
        self.model.comment(format_args!(
            "selected vertices must be connected, walk {}",
            k
        ))?;

        for v in 0..p {
            for w in 0..v {
                let walk = self.variables.create_walk(k, v, w)?.to_string();
                let vias = (0..p)
                    .filter(|&u| u != v && u != w)
                    .map(|u| Ok((u, self.variables.create_via(k, v, w, u)?.to_string())))
                    .collect::<Result<Vec<(usize, String)>>>()?;

                let vars = &self.variables;
                for (u, via) in &vias {
                    let first = vars.walk(half, v.max(*u), v.min(*u))?;
                    let second = vars.walk(half, w.max(*u), w.min(*u))?;
                    for clause in [
                        PbConstraint::clause([Literal::pos(first), Literal::neg(via)]),
                        PbConstraint::clause([Literal::pos(second), Literal::neg(via)]),
                        PbConstraint::clause([
                            Literal::pos(via),
                            Literal::neg(first),
                            Literal::neg(second),
                        ]),
                    ] {
                        self.model.constraint(&clause)?;
                    }
                }

                let shorter = vars.walk(half, v, w)?;
                let mut defined = PbConstraint::clause([Literal::neg(&walk)]);
                for (_, via) in &vias {
                    defined.push(1, Literal::pos(via));
                }
                defined.push(1, Literal::pos(shorter));
                self.model.constraint(&defined)?;

                for (_, via) in &vias {
                    self.model.constraint(&PbConstraint::clause([
                        Literal::pos(&walk),
                        Literal::neg(via),
                    ]))?;
                }
                self.model.constraint(&PbConstraint::clause([
                    Literal::pos(&walk),
                    Literal::neg(shorter),
                ]))?;
            }
        }
        Ok(())
    }
}
