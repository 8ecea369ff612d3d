//! Type descriptors, as produced by the extractor and embedded as JSON.
//!
//! The vocabulary is closed: every descriptor is one of the `Type` variants
//! below, tagged by its `"type"` field. Empty collections are omitted on
//! output and default to empty on input.
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Type {
    Any,
    Unknown,
    Undefined,
    Null,
    Void,
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<OrderedFloat<f64>>,
    },
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<bool>,
    },
    /// Literal values are kept as decimal text (`"123"` or `"123n"`).
    #[serde(rename = "bigint")]
    BigInt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Method,
    Object(TypeObject),
    #[serde(alias = "object-reference")]
    TypeReference(TypeReference),
    /// Resolved through the generic bindings in scope, never the registry.
    TypeParameterReference {
        target: String,
    },
    Union {
        #[serde(default)]
        types: Vec<Type>,
    },
    Intersection {
        #[serde(default)]
        types: Vec<Type>,
    },
    Array {
        #[serde(rename = "elementType")]
        element_type: Box<Type>,
    },
    Tuple(TypeTuple),
    /// The extractor could not describe the type.
    Invalid {
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeObject {
    /// Generic parameter names, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_argument_names: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub members: IndexMap<String, Type>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub optional_members: IndexMap<String, Type>,
    /// Base types the value must satisfy as well, usually `type-reference`s.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub target: String,
    /// Bound positionally to the target's `typeArgumentNames`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<Type>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeTuple {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<Type>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub optional_elements: Vec<Type>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotdotdot_element: Option<Box<Type>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Type {
    /// A reference to a registry entry without type arguments.
    pub fn reference(target: impl Into<String>) -> Self {
        Type::TypeReference(TypeReference {
            target: target.into(),
            type_arguments: Vec::new(),
        })
    }

    pub fn from_json_str(src: &str) -> Result<Self, DescriptorError> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, DescriptorError> {
        crate::path_de::from_value_with_path(value)
    }

    /// The `"type"` tag of this descriptor.
    pub fn tag(&self) -> &'static str {
        match self {
            Type::Any => "any",
            Type::Unknown => "unknown",
            Type::Undefined => "undefined",
            Type::Null => "null",
            Type::Void => "void",
            Type::Number { .. } => "number",
            Type::String { .. } => "string",
            Type::Boolean { .. } => "boolean",
            Type::BigInt { .. } => "bigint",
            Type::Method => "method",
            Type::Object(_) => "object",
            Type::TypeReference(_) => "type-reference",
            Type::TypeParameterReference { .. } => "type-parameter-reference",
            Type::Union { .. } => "union",
            Type::Intersection { .. } => "intersection",
            Type::Array { .. } => "array",
            Type::Tuple(_) => "tuple",
            Type::Invalid { .. } => "invalid",
        }
    }

    /// Short human description: the target for references, the tag otherwise.
    pub fn describe(&self) -> &str {
        match self {
            Type::TypeReference(reference) => &reference.target,
            other => other.tag(),
        }
    }
}

impl TypeTuple {
    pub fn min_len(&self) -> usize {
        self.elements.len()
    }

    /// `None` when a rest element makes the tuple unbounded.
    pub fn max_len(&self) -> Option<usize> {
        match self.dotdotdot_element {
            Some(_) => None,
            None => Some(self.elements.len() + self.optional_elements.len()),
        }
    }
}

impl From<TypeReference> for Type {
    fn from(reference: TypeReference) -> Self {
        Type::TypeReference(reference)
    }
}

impl From<TypeObject> for Type {
    fn from(object: TypeObject) -> Self {
        Type::Object(object)
    }
}
