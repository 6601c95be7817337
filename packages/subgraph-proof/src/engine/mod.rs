//! Proof-logging engine
//!
//! One `Proof` owns every registry and both output streams for a run. Its
//! operations are spread over the feature slices as `impl Proof` blocks:
//!
//! ```text
//! features/model        create_cp_variable, create_injectivity_constraints, ..., finalise_model
//! features/proof        start_level, back_up_to_level, forget_level, back_up_to_top
//! features/derivations  search events, hall sets, incompatibility, paths, cliques, bounds
//! ```
//!
//! The proof stream is opened at construction and written incrementally; the
//! model is buffered until `finalise_model`.

use crate::config::ProofConfig;
use crate::errors::Result;
use crate::features::derivations::hom_clique::HomCliqueContext;
use crate::features::identifiers::{NamingScheme, VariableRegistry};
use crate::features::model::ModelWriter;
use crate::features::proof::{FactKey, FactRegistry, ProofLog};
use crate::infrastructure::{Destination, OutputSink};
use crate::shared::models::{Level, LineNumber};
use tracing::{debug, info};

pub struct Proof {
    pub(crate) variables: VariableRegistry,
    pub(crate) facts: FactRegistry,
    pub(crate) model: ModelWriter,
    pub(crate) log: ProofLog,
    /// Taken by `finalise_model`
    pub(crate) model_destination: Option<Destination>,
    /// Some only while a hom-clique sub-proof is open
    pub(crate) hom_clique: Option<HomCliqueContext>,
    pub(crate) clique_encoding: bool,
    pub(crate) zero_in_proof_objectives: Vec<(usize, usize)>,
    super_extra_verbose: bool,
}

impl Proof {
    /// Open a run writing to the files named by `config`
    pub fn open(config: &ProofConfig) -> Result<Self> {
        config.validate()?;
        let model = Destination::file(config.model_path.clone(), config.compression);
        let proof = Destination::file(config.proof_path.clone(), config.compression);
        debug!(compression = config.compression.as_str(), "file destinations");
        Self::with_destinations(config, model, proof)
    }

    /// Open a run with explicit destinations; path and compression settings in
    /// `config` are ignored
    pub fn with_destinations(
        config: &ProofConfig,
        model: Destination,
        proof: Destination,
    ) -> Result<Self> {
        let sink = OutputSink::open(proof)?;
        let scheme = NamingScheme::from_friendly(config.friendly_names);

        info!(
            model = %model.display_path().display(),
            proof = %sink.path().display(),
            naming = ?scheme,
            "opened proof log"
        );

        Ok(Self {
            variables: VariableRegistry::new(scheme),
            facts: FactRegistry::new(),
            model: ModelWriter::new(),
            log: ProofLog::new(sink),
            model_destination: Some(model),
            hom_clique: None,
            clique_encoding: false,
            zero_in_proof_objectives: Vec::new(),
            super_extra_verbose: config.super_extra_verbose,
        })
    }

    pub fn super_extra_verbose(&self) -> bool {
        self.super_extra_verbose
    }

    /// Whether binary variables alias assignment variables
    pub fn has_clique_model(&self) -> bool {
        self.clique_encoding
    }

    /// Number of the last line written (model constraints included)
    pub fn proof_line(&self) -> LineNumber {
        self.log.current_line()
    }

    pub fn constraint_count(&self) -> u64 {
        self.model.constraint_count()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    pub fn current_level(&self) -> Level {
        self.log.current_level()
    }

    /// Live line holding `key`, if any
    pub fn fact(&self, key: FactKey) -> Option<LineNumber> {
        self.facts.get(key)
    }

    /// Token for assignment `p -> t` as written in both files
    pub fn assignment_variable(&self, p: usize, t: usize) -> Result<&str> {
        self.variables.assignment(p, t)
    }

    pub fn binary_variable(&self, v: usize) -> Result<&str> {
        self.variables.binary(v)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.log.flush()
    }

    /// Flush and close the proof stream; later proof steps fail
    pub fn close(&mut self) -> Result<()> {
        debug!(
            lines = self.log.derived_count(),
            facts = self.facts.len(),
            "closing proof log"
        );
        self.log.close()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::memory_proof;
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn test_engine_is_send() {
        assert_send::<Proof>();
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = ProofConfig::from_base("same").proof_path("same.opb");
        let err = Proof::open(&config).err().unwrap();
        assert_eq!(err.kind, crate::errors::ErrorKind::Config);
    }

    #[test]
    fn test_open_creates_proof_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("run");
        let config = ProofConfig::from_base(base.to_string_lossy());
        let mut proof = Proof::open(&config).unwrap();
        proof.close().unwrap();
        assert!(dir.path().join("run.pbp").exists());
        assert!(!dir.path().join("run.opb").exists());
    }

    #[test]
    fn test_fresh_engine_state() {
        let (proof, _model, log) = memory_proof(true);
        assert_eq!(proof.proof_line(), LineNumber(0));
        assert_eq!(proof.variable_count(), 0);
        assert!(!proof.has_clique_model());
        assert!(!proof.super_extra_verbose());
        assert!(log.is_empty());
    }
}
