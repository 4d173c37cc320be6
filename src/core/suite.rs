//! Suite configuration: the ordered, named collection of recorded
//! expectation definitions, and its JSON persistence.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;

/// One recorded expectation invocation: a name plus the arguments it was
/// called with.
///
/// Identity for deduplication is the name alone; two definitions with the
/// same name and different kwargs are the "same" expectation, and the later
/// one wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationDefinition {
    /// The registered expectation name.
    pub expectation_type: String,
    /// The recorded arguments, in the order the check declared them.
    pub kwargs: Map<String, Value>,
}

impl ExpectationDefinition {
    /// Creates a definition from a name and an argument map.
    pub fn new(expectation_type: impl Into<String>, kwargs: Map<String, Value>) -> Self {
        Self {
            expectation_type: expectation_type.into(),
            kwargs,
        }
    }
}

/// The ordered collection of expectations attached to one dataset.
///
/// Invariant: at most one definition per distinct `expectation_type`.
/// Appending a name that is already present removes every prior definition
/// with that name and appends the new one at the end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpectationSuite {
    /// A label for the dataset the suite describes.
    pub subject_name: Option<String>,
    /// The recorded definitions, in registration order after deduplication.
    #[serde(rename = "expectations")]
    definitions: Vec<ExpectationDefinition>,
}

impl ExpectationSuite {
    /// Creates an empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty suite labeled with a subject name.
    pub fn named(subject_name: impl Into<String>) -> Self {
        Self {
            subject_name: Some(subject_name.into()),
            definitions: Vec::new(),
        }
    }

    /// The recorded definitions in order.
    pub fn definitions(&self) -> &[ExpectationDefinition] {
        &self.definitions
    }

    /// Number of recorded definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the suite has no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Looks up the definition recorded under a name, if any.
    pub fn get(&self, expectation_type: &str) -> Option<&ExpectationDefinition> {
        self.definitions
            .iter()
            .find(|def| def.expectation_type == expectation_type)
    }

    /// Appends a definition under the dedup invariant: prior definitions
    /// with the same name are dropped and the new one lands at the end.
    pub fn append(&mut self, definition: ExpectationDefinition) {
        let name = definition.expectation_type.clone();
        let before = self.definitions.len();
        self.definitions
            .retain(|def| def.expectation_type != definition.expectation_type);
        if self.definitions.len() < before {
            debug!(expectation.name = %name, "Replacing previously recorded expectation");
        }
        self.definitions.push(definition);
    }

    /// Removes every definition recorded under a name, returning how many
    /// were dropped.
    pub fn remove(&mut self, expectation_type: &str) -> usize {
        let before = self.definitions.len();
        self.definitions
            .retain(|def| def.expectation_type != expectation_type);
        before - self.definitions.len()
    }

    /// Serializes the suite as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a suite from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the suite to a file as pretty-printed JSON.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?)?;
        info!(
            suite.subject = ?self.subject_name,
            suite.expectations = self.definitions.len(),
            path = %path.display(),
            "Saved expectation suite"
        );
        Ok(())
    }

    /// Reads a suite back from a JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let suite = Self::from_json(&fs::read_to_string(path)?)?;
        info!(
            suite.subject = ?suite.subject_name,
            suite.expectations = suite.definitions.len(),
            path = %path.display(),
            "Loaded expectation suite"
        );
        Ok(suite)
    }
}
