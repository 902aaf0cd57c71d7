//! Experiment catalog port.
//!
//! Read-only lookup of experiment definitions. Definitions are immutable
//! once loaded and shared across every session of the experiment, so the
//! port hands out `Arc`s.

use std::sync::Arc;

use crate::domain::experiment::ExperimentDefinition;

/// Catalog port for experiment definitions.
pub trait ExperimentCatalog: Send + Sync {
    /// Looks up one experiment by id.
    fn get(&self, experiment_id: &str) -> Option<Arc<ExperimentDefinition>>;

    /// Ordered list of loaded experiment ids.
    fn list(&self) -> Vec<String>;
}
