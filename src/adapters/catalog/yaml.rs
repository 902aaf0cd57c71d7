//! YAML experiment catalog.
//!
//! Loads experiment definitions from a directory of YAML files, one file per
//! experiment, file stem = experiment id. A malformed entry is logged and
//! skipped; the load never aborts wholesale, so one bad file cannot take the
//! whole catalog down.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::experiment::ExperimentDefinition;
use crate::ports::ExperimentCatalog;

/// Catalog of experiments loaded from YAML files.
pub struct YamlExperimentCatalog {
    experiments: BTreeMap<String, Arc<ExperimentDefinition>>,
}

impl YamlExperimentCatalog {
    /// Loads every `.yaml`/`.yml` file under `dir`.
    ///
    /// A missing directory yields an empty catalog with a warning, matching
    /// the skip-and-continue policy for individual entries.
    pub fn load_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut experiments = BTreeMap::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "experiments directory not readable");
                return Self { experiments };
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        paths.sort();

        for path in paths {
            let Some(experiment_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match Self::load_file(&path) {
                Ok(definition) => {
                    info!(experiment_id, path = %path.display(), "loaded experiment");
                    experiments.insert(experiment_id.to_string(), Arc::new(definition));
                }
                Err(reason) => {
                    warn!(
                        experiment_id,
                        path = %path.display(),
                        %reason,
                        "skipping malformed experiment definition"
                    );
                }
            }
        }

        Self { experiments }
    }

    /// Builds a catalog from already-finalized definitions (for tests and
    /// embedded setups).
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = (String, ExperimentDefinition)>,
    ) -> Self {
        Self {
            experiments: definitions
                .into_iter()
                .map(|(id, definition)| (id, Arc::new(definition)))
                .collect(),
        }
    }

    /// Number of loaded experiments.
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    fn load_file(path: &Path) -> Result<ExperimentDefinition, String> {
        let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let parsed: ExperimentDefinition =
            serde_yaml::from_str(&contents).map_err(|e| e.to_string())?;
        parsed.finalize().map_err(|e| e.to_string())
    }
}

impl ExperimentCatalog for YamlExperimentCatalog {
    fn get(&self, experiment_id: &str) -> Option<Arc<ExperimentDefinition>> {
        self.experiments.get(experiment_id).cloned()
    }

    fn list(&self) -> Vec<String> {
        self.experiments.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"
name: "Empathy Study"
goals: ["rapport", "context"]
initial_question:
  text: "Tell me about a recent interaction?"
conversation_guidelines:
  exit_criteria: ["8 exchanges completed"]
"#;

    const MISSING_GOALS: &str = r#"
name: "Broken Study"
goals: []
initial_question:
  text: "Hello?"
"#;

    #[test]
    fn loads_valid_definitions_by_file_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empathy_study.yaml"), VALID).unwrap();

        let catalog = YamlExperimentCatalog::load_dir(dir.path());
        assert_eq!(catalog.list(), vec!["empathy_study"]);

        let def = catalog.get("empathy_study").unwrap();
        assert_eq!(def.name, "Empathy Study");
        assert_eq!(def.exit_rules().max_exchanges(), Some(8));
    }

    #[test]
    fn skips_malformed_entries_and_keeps_the_rest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.yaml"), VALID).unwrap();
        fs::write(dir.path().join("broken.yaml"), MISSING_GOALS).unwrap();
        fs::write(dir.path().join("not_yaml.yaml"), ": : :").unwrap();

        let catalog = YamlExperimentCatalog::load_dir(dir.path());
        assert_eq!(catalog.list(), vec!["good"]);
    }

    #[test]
    fn missing_directory_yields_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let catalog = YamlExperimentCatalog::load_dir(&missing);
        assert!(catalog.is_empty());
        assert!(catalog.get("anything").is_none());
    }

    #[test]
    fn ignores_non_yaml_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "not an experiment").unwrap();
        fs::write(dir.path().join("study.yaml"), VALID).unwrap();

        let catalog = YamlExperimentCatalog::load_dir(dir.path());
        assert_eq!(catalog.list(), vec!["study"]);
    }

    #[test]
    fn list_is_ordered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b_study.yaml"), VALID).unwrap();
        fs::write(dir.path().join("a_study.yaml"), VALID).unwrap();

        let catalog = YamlExperimentCatalog::load_dir(dir.path());
        assert_eq!(catalog.list(), vec!["a_study", "b_study"]);
    }
}
