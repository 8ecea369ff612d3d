//! Entry points: turn the engine's error list into the caller's calling
//! convention.
use serde::{Deserialize, Serialize};

use crate::error::{TypeValidateError, ValidateError};
use crate::registry::TypeRegistry;
use crate::types::Type;
use crate::validate::ValidationContext;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateOptions {
    /// Return failures as data instead of an error.
    pub no_throw: bool,
}

/// Outcome of the non-throwing form, serialized as
/// `{"status": "success", "value": ...}` or `{"status": "error", "errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidateResult {
    Success { value: Value },
    Error { errors: Vec<TypeValidateError> },
}

/// What [`validate_type_with`] hands back, depending on `no_throw`.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Value(Value),
    Result(ValidateResult),
}

impl ValidateResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidateResult::Success { .. })
    }

    /// Empty on success.
    pub fn errors(&self) -> &[TypeValidateError] {
        match self {
            ValidateResult::Success { .. } => &[],
            ValidateResult::Error { errors } => errors,
        }
    }

    pub fn into_result(self) -> Result<Value, ValidateError> {
        match self {
            ValidateResult::Success { value } => Ok(value),
            ValidateResult::Error { errors } => Err(ValidateError::new(errors)),
        }
    }
}

impl From<Result<Value, ValidateError>> for ValidateResult {
    fn from(result: Result<Value, ValidateError>) -> Self {
        match result {
            Ok(value) => ValidateResult::Success { value },
            Err(err) => ValidateResult::Error {
                errors: err.into_errors(),
            },
        }
    }
}

fn collect_errors(registry: &TypeRegistry, ty: &Type, value: &Value) -> Vec<TypeValidateError> {
    if let Type::Invalid { reason } = ty {
        tracing::debug!(reason = %reason, "descriptor is invalid, skipping structural checks");
    }
    let mut ctx = ValidationContext::new(registry);
    ctx.validate_object(ty, value);
    let errors = ctx.into_errors();
    tracing::debug!(descriptor = ty.describe(), errors = errors.len(), "validated value");
    errors
}

/// Validate `value` against `ty`, handing the value back untouched on
/// success.
pub fn validate_type(registry: &TypeRegistry, ty: &Type, value: Value) -> Result<Value, ValidateError> {
    let errors = collect_errors(registry, ty, &value);
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ValidateError::new(errors))
    }
}

/// Like [`validate_type`], but failures come back as data.
pub fn validate_type_no_throw(registry: &TypeRegistry, ty: &Type, value: Value) -> ValidateResult {
    validate_type(registry, ty, value).into()
}

pub fn validate_type_with(
    registry: &TypeRegistry,
    ty: &Type,
    value: Value,
    options: &ValidateOptions,
) -> Result<Validated, ValidateError> {
    if options.no_throw {
        Ok(Validated::Result(validate_type_no_throw(registry, ty, value)))
    } else {
        validate_type(registry, ty, value).map(Validated::Value)
    }
}
