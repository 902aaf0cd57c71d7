//! Experiment catalog adapters.

mod yaml;

pub use yaml::YamlExperimentCatalog;
