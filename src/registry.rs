//! Named type definitions and reference resolution.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DescriptorError, NotFound};
use crate::types::{Type, TypeReference};

/// Definitions keyed by reference target, plus which sources produced each
/// definition. The validator only ever reads `definitions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeRegistry {
    #[serde(alias = "knownTypes")]
    pub definitions: IndexMap<String, Type>,
    pub definition_references: IndexMap<String, Vec<String>>,
}

/// Anything that names a registry entry.
pub trait ReferenceName {
    fn reference_name(&self) -> &str;
}

impl ReferenceName for str {
    fn reference_name(&self) -> &str {
        self
    }
}

impl ReferenceName for String {
    fn reference_name(&self) -> &str {
        self
    }
}

impl ReferenceName for TypeReference {
    fn reference_name(&self) -> &str {
        &self.target
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(src: &str) -> Result<Self, DescriptorError> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DescriptorError> {
        crate::path_de::from_slice_with_path(bytes)
    }

    /// Build a registry straight from a definitions map, without source
    /// bookkeeping.
    pub fn from_definitions<I, K>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        Self {
            definitions: definitions.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            definition_references: IndexMap::new(),
        }
    }

    pub fn lookup_reference<R: ReferenceName + ?Sized>(&self, reference: &R) -> Result<&Type, NotFound> {
        let target = reference.reference_name();
        self.definitions.get(target).ok_or_else(|| NotFound {
            target: target.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    // ————————————————————————————————————————————————————————————————————————
    // MAINTENANCE
    // ————————————————————————————————————————————————————————————————————————

    /// Record the definitions one source produced. Existing entries are
    /// overwritten; `source` is added once to each entry's referrers.
    pub fn register_source<I, K>(&mut self, source: &str, definitions: I)
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        for (name, ty) in definitions {
            let name = name.into();
            let referrers = self.definition_references.entry(name.clone()).or_default();
            if !referrers.iter().any(|r| r == source) {
                referrers.push(source.to_string());
            }
            self.definitions.insert(name, ty);
        }
        tracing::debug!(source, definitions = self.definitions.len(), "registered source");
    }

    /// Forget `source`. Definitions no other source refers to are dropped.
    pub fn release_source(&mut self, source: &str) {
        let mut orphaned = Vec::new();
        for (name, referrers) in self.definition_references.iter_mut() {
            let before = referrers.len();
            referrers.retain(|r| r != source);
            if referrers.is_empty() && before > 0 {
                orphaned.push(name.clone());
            }
        }
        for name in &orphaned {
            self.definition_references.shift_remove(name);
            self.definitions.shift_remove(name);
        }
        tracing::debug!(source, dropped = orphaned.len(), "released source");
    }
}
