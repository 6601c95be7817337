//! Append-only variable registry

use super::naming::{self, NamingScheme};
use crate::errors::{ProofError, Result};
use ahash::AHashSet;
use std::collections::{BTreeMap, BTreeSet};

/// All variable tokens of one run.
///
/// Keys:
/// - assignment: (pattern vertex, target vertex)
/// - binary: vertex of a clique-style encoding
/// - walk: (walk length, v, w) with v > w
/// - via: (walk length, v, w, intermediate u)
#[derive(Debug)]
pub struct VariableRegistry {
    scheme: NamingScheme,
    created: usize,
    /// Every token handed out; two keys may never share one
    names: AHashSet<String>,
    domains: BTreeSet<usize>,
    assignments: BTreeMap<(usize, usize), String>,
    binaries: BTreeMap<usize, String>,
    walks: BTreeMap<(usize, usize, usize), String>,
    vias: BTreeMap<(usize, usize, usize, usize), String>,
}

impl VariableRegistry {
    pub fn new(scheme: NamingScheme) -> Self {
        Self {
            scheme,
            created: 0,
            names: AHashSet::new(),
            domains: BTreeSet::new(),
            assignments: BTreeMap::new(),
            binaries: BTreeMap::new(),
            walks: BTreeMap::new(),
            vias: BTreeMap::new(),
        }
    }

    pub fn scheme(&self) -> NamingScheme {
        self.scheme
    }

    /// Number of distinct variables created (aliases excluded)
    pub fn variable_count(&self) -> usize {
        self.created
    }

    fn fresh(&mut self, friendly: impl FnOnce() -> String) -> Result<String> {
        let name = match self.scheme {
            NamingScheme::Friendly => friendly(),
            NamingScheme::Dense => (self.created + 1).to_string(),
        };
        if !self.names.insert(name.clone()) {
            return Err(ProofError::contract(format!(
                "variable name x{} is already taken",
                name
            )));
        }
        self.created += 1;
        Ok(name)
    }

    /// Claim pattern vertex `p` for a domain; a second claim is a defect
    pub fn claim_domain(&mut self, p: usize) -> Result<()> {
        if !self.domains.insert(p) {
            return Err(ProofError::contract(format!(
                "domain variables for pattern vertex {} were already created",
                p
            )));
        }
        Ok(())
    }

    pub fn has_domain(&self, p: usize) -> bool {
        self.domains.contains(&p)
    }

    pub fn create_assignment(
        &mut self,
        p: usize,
        t: usize,
        friendly: impl FnOnce() -> String,
    ) -> Result<()> {
        if self.assignments.contains_key(&(p, t)) {
            return Err(ProofError::contract(format!(
                "variable for {} -> {} already exists",
                p, t
            )));
        }
        let name = self.fresh(friendly)?;
        self.assignments.insert((p, t), name);
        Ok(())
    }

    pub fn assignment(&self, p: usize, t: usize) -> Result<&str> {
        self.try_assignment(p, t).ok_or_else(|| {
            ProofError::contract(format!("no variable for assignment {} -> {}", p, t))
        })
    }

    pub fn try_assignment(&self, p: usize, t: usize) -> Option<&str> {
        self.assignments.get(&(p, t)).map(String::as_str)
    }

    /// Assignment tokens in (pattern, target) order
    pub fn assignments(&self) -> impl Iterator<Item = ((usize, usize), &str)> {
        self.assignments.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn create_binary(&mut self, v: usize, friendly: impl FnOnce() -> String) -> Result<()> {
        if self.binaries.contains_key(&v) {
            return Err(ProofError::contract(format!(
                "binary variable for vertex {} already exists",
                v
            )));
        }
        let name = self.fresh(friendly)?;
        self.binaries.insert(v, name);
        Ok(())
    }

    /// Make binary vertex `v` another name for assignment (p, t)
    pub fn alias_binary(&mut self, v: usize, p: usize, t: usize) -> Result<()> {
        if let Some(existing) = self.binaries.get(&v) {
            return Err(ProofError::contract(format!(
                "binary vertex {} already maps to x{}",
                v, existing
            )));
        }
        let name = self.assignment(p, t)?.to_string();
        self.binaries.insert(v, name);
        Ok(())
    }

    pub fn binary(&self, v: usize) -> Result<&str> {
        self.binaries
            .get(&v)
            .map(String::as_str)
            .ok_or_else(|| ProofError::contract(format!("no binary variable for vertex {}", v)))
    }

    pub fn create_walk(&mut self, length: usize, v: usize, w: usize) -> Result<&str> {
        if !self.walks.contains_key(&(length, v, w)) {
            let name = self.fresh(|| naming::walk_name(length, v, w))?;
            self.walks.insert((length, v, w), name);
        }
        Ok(&self.walks[&(length, v, w)])
    }

    pub fn walk(&self, length: usize, v: usize, w: usize) -> Result<&str> {
        self.try_walk(length, v, w).ok_or_else(|| {
            ProofError::contract(format!(
                "no walk variable of length {} between {} and {}",
                length, v, w
            ))
        })
    }

    pub fn try_walk(&self, length: usize, v: usize, w: usize) -> Option<&str> {
        self.walks.get(&(length, v, w)).map(String::as_str)
    }

    pub fn create_via(&mut self, length: usize, v: usize, w: usize, u: usize) -> Result<&str> {
        if !self.vias.contains_key(&(length, v, w, u)) {
            let name = self.fresh(|| naming::via_name(length, v, w, u))?;
            self.vias.insert((length, v, w, u), name);
        }
        Ok(&self.vias[&(length, v, w, u)])
    }

    pub fn via_count(&self) -> usize {
        self.vias.len()
    }

    pub fn walk_count(&self) -> usize {
        self.walks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_dense_names_are_sequential() {
        let mut reg = VariableRegistry::new(NamingScheme::Dense);
        for t in 0..3 {
            reg.create_assignment(0, t, || unreachable!()).unwrap();
        }
        assert_eq!(reg.assignment(0, 0).unwrap(), "1");
        assert_eq!(reg.assignment(0, 2).unwrap(), "3");
        assert_eq!(reg.variable_count(), 3);
    }

    #[test]
    fn test_dense_counter_shared_across_kinds() {
        let mut reg = VariableRegistry::new(NamingScheme::Dense);
        reg.create_assignment(0, 0, String::new).unwrap();
        reg.create_binary(0, String::new).unwrap();
        let walk = reg.create_walk(1, 1, 0).unwrap().to_string();
        assert_eq!(reg.binary(0).unwrap(), "2");
        assert_eq!(walk, "3");
    }

    #[test]
    fn test_friendly_names() {
        let mut reg = VariableRegistry::new(NamingScheme::Friendly);
        reg.create_assignment(2, 5, || naming::assignment_name("a", "e"))
            .unwrap();
        assert_eq!(reg.assignment(2, 5).unwrap(), "a_e");
        assert_eq!(reg.create_via(4, 3, 1, 2).unwrap(), "conn4_3_1_via_2");
    }

    #[test]
    fn test_missing_assignment_is_contract_violation() {
        let reg = VariableRegistry::new(NamingScheme::Dense);
        let err = reg.assignment(1, 1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ContractViolation);
    }

    #[test]
    fn test_domain_claimed_twice() {
        let mut reg = VariableRegistry::new(NamingScheme::Dense);
        reg.claim_domain(3).unwrap();
        assert!(reg.claim_domain(3).is_err());
        assert!(reg.has_domain(3));
    }

    #[test]
    fn test_alias_does_not_count() {
        let mut reg = VariableRegistry::new(NamingScheme::Dense);
        reg.create_assignment(0, 1, String::new).unwrap();
        reg.alias_binary(0, 0, 1).unwrap();
        assert_eq!(reg.binary(0).unwrap(), "1");
        assert_eq!(reg.variable_count(), 1);
    }

    #[test]
    fn test_second_alias_rejected() {
        let mut reg = VariableRegistry::new(NamingScheme::Dense);
        reg.create_assignment(0, 0, String::new).unwrap();
        reg.create_assignment(0, 1, String::new).unwrap();
        reg.alias_binary(0, 0, 0).unwrap();

        let err = reg.alias_binary(0, 0, 1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ContractViolation);
        assert_eq!(reg.binary(0).unwrap(), "1");
    }

    #[test]
    fn test_friendly_name_collision_rejected() {
        let mut reg = VariableRegistry::new(NamingScheme::Friendly);
        reg.create_assignment(0, 0, || naming::assignment_name("a_b", "c"))
            .unwrap();

        let err = reg
            .create_assignment(1, 1, || naming::assignment_name("a", "b_c"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ContractViolation);
        assert!(reg.try_assignment(1, 1).is_none());
        assert_eq!(reg.variable_count(), 1);
    }
}
