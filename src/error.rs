use serde::Serialize;
use thiserror::Error;

/// One accumulated validation failure, located by its access path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeValidateError {
    pub access_stack: Vec<String>,
    pub message: String,
    #[serde(skip)]
    pub kind: ErrorKind,
}

/// What went wrong at a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The descriptor is the extractor's `invalid` sentinel.
    InvalidDescriptor,
    KindMismatch,
    LiteralMismatch,
    MissingMember,
    UnresolvedReference,
    UnknownTypeParameter,
    UnionExhausted { attempted: Vec<String> },
    /// `max` is `None` for tuples with a rest element.
    TupleArity { min: usize, max: Option<usize> },
}

/// Aggregate failure of the throwing calling convention.
#[derive(Debug, Clone, Error)]
#[error("failed to validate object")]
pub struct ValidateError {
    errors: Vec<TypeValidateError>,
}

/// Returned by the resolver when the registry has no such definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type {target} not found")]
pub struct NotFound {
    pub target: String,
}

/// A descriptor or registry could not be decoded.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("malformed descriptor at {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeValidateError {
    pub fn new(access_stack: &[String], kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            access_stack: access_stack.to_vec(),
            message: message.into(),
            kind,
        }
    }

    /// The access stack rendered as `members.key[2].value`.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in &self.access_stack {
            if !out.is_empty() && !segment.starts_with('[') {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }
}

impl std::fmt::Display for TypeValidateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.access_stack.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path(), self.message)
        }
    }
}

impl ValidateError {
    pub fn new(errors: Vec<TypeValidateError>) -> Self {
        Self { errors }
    }

    /// Every failure, in the order it was found.
    pub fn errors(&self) -> &[TypeValidateError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<TypeValidateError> {
        self.errors
    }
}
