//! Declarative conformance suites: a registry plus cases that pair a
//! descriptor and a value with the expected outcome.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DescriptorError;
use crate::registry::TypeRegistry;
use crate::result::{validate_type_no_throw, ValidateResult};
use crate::types::Type;
use crate::value::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub registry: TypeRegistry,
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Case {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub value: serde_json::Value,
    pub expect: Expectation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Expectation {
    Success,
    Error { errors: Vec<ExpectedError> },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedError {
    #[serde(default)]
    pub access_stack: Vec<String>,
    pub message: String,
}

/// A case whose actual outcome differed from its expectation.
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub case: String,
    pub expected: Expectation,
    pub actual: ValidateResult,
}

impl Suite {
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let bytes = std::fs::read(path).map_err(|source| DescriptorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        crate::path_de::from_slice_with_path(&bytes)
    }

    /// Run every case, returning the ones that did not behave as expected.
    pub fn run(&self) -> Vec<Mismatch> {
        self.run_filtered(|_| true)
    }

    pub fn run_filtered(&self, mut keep: impl FnMut(&Case) -> bool) -> Vec<Mismatch> {
        self.cases
            .iter()
            .filter(|&case| keep(case))
            .filter_map(|case| case.check(&self.registry).err())
            .collect()
    }
}

impl Case {
    pub fn check(&self, registry: &TypeRegistry) -> Result<(), Mismatch> {
        let actual = validate_type_no_throw(registry, &self.ty, Value::from(self.value.clone()));
        let matches = match (&self.expect, &actual) {
            (Expectation::Success, ValidateResult::Success { .. }) => true,
            (Expectation::Error { errors: expected }, ValidateResult::Error { errors }) => {
                expected.len() == errors.len()
                    && expected
                        .iter()
                        .zip(errors)
                        .all(|(e, a)| e.access_stack == a.access_stack && e.message == a.message)
            }
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(Mismatch {
                case: self.name.clone(),
                expected: self.expect.clone(),
                actual,
            })
        }
    }
}

/// Every `*.json` suite directly under `dir`, sorted by file name.
pub fn discover(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut suites = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            suites.push(path);
        }
    }
    suites.sort();
    Ok(suites)
}
