pub mod types;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{DescriptorError, Result};
use crate::io::load_yaml;

use self::types::TestDefinition;

/// Shape of the catalog file: `tests: { <testbed>: { <test key>: <definition> } }`.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    tests: Mapping,
}

/// A parsed catalog file, holding the test sections of every testbed.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
    tests: Mapping,
}

impl CatalogFile {
    /// Read a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::ConfigNotFound`] if the file is missing and
    /// a YAML error if it is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let document: CatalogDocument = load_yaml(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            tests: document.tests,
        })
    }

    /// The tests offered by `testbed`, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::UnknownTestbed`] if the file has no
    /// section for the testbed, and a schema or YAML error for malformed
    /// entries.
    pub fn section(&self, testbed: &str) -> Result<Catalog> {
        let path = self.path.as_path();
        let section = self
            .tests
            .get(testbed)
            .ok_or_else(|| DescriptorError::UnknownTestbed(testbed.to_owned()))?;
        let entries = section.as_mapping().ok_or_else(|| {
            DescriptorError::schema(path, format!("tests.{testbed} must be a mapping"))
        })?;

        let mut tests = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let Value::String(key) = key else {
                return Err(DescriptorError::schema(
                    path,
                    format!("tests.{testbed} has a non-string test key"),
                ));
            };
            let mut test: TestDefinition =
                serde_yaml::from_value(value.clone()).map_err(|source| DescriptorError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?;
            test.id = key.clone();
            tests.push(test);
        }

        Ok(Catalog::from_definitions(testbed, tests))
    }
}

/// Read-only set of test definitions offered by one testbed.
///
/// Iteration order is the order of the catalog file (or of the remote
/// listing the catalog was built from).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    testbed: String,
    tests: Vec<TestDefinition>,
}

impl Catalog {
    /// Build a catalog from already-typed definitions.
    ///
    /// Definitions without a `test_type` take their id as type.
    pub fn from_definitions(testbed: impl Into<String>, tests: Vec<TestDefinition>) -> Self {
        let tests = tests
            .into_iter()
            .map(|mut test| {
                if test.test_type.is_empty() {
                    test.test_type = test.id.clone();
                }
                test
            })
            .collect();
        Self {
            testbed: testbed.into(),
            tests,
        }
    }

    pub fn testbed(&self) -> &str {
        &self.testbed
    }

    /// Look up a test by key.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::NotFound`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<&TestDefinition> {
        self.tests
            .iter()
            .find(|t| t.id == key)
            .ok_or_else(|| DescriptorError::NotFound(key.to_owned()))
    }

    /// All `(key, definition)` pairs in catalog order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &TestDefinition)> {
        self.tests.iter().map(|t| (t.id.as_str(), t))
    }

    /// Definitions whose key appears in `intent`, in catalog order.
    ///
    /// Keys in `intent` the catalog does not know are ignored.
    pub fn select<S: AsRef<str>>(&self, intent: &[S]) -> Vec<&TestDefinition> {
        self.tests
            .iter()
            .filter(|t| intent.iter().any(|k| k.as_ref() == t.id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
