//! Runtime structural validation against pre-extracted type descriptors.
//!
//! A [`Type`] describes a shape, a [`TypeRegistry`] holds the named
//! definitions references point to, and [`validate_type`] checks a runtime
//! [`Value`] against both:
//!
//! ```
//! use rutypi::{validate_type, Type, TypeRegistry, Value};
//!
//! let ty = Type::from_json_str(r#"{
//!     "type": "object",
//!     "members": { "key": { "type": "string" } },
//!     "optionalMembers": { "value": { "type": "number" } }
//! }"#).unwrap();
//! let registry = TypeRegistry::new();
//!
//! let value = Value::from(serde_json::json!({ "key": "a" }));
//! assert_eq!(validate_type(&registry, &ty, value.clone()).unwrap(), value);
//!
//! let err = validate_type(&registry, &ty, Value::from(serde_json::json!({ "key": 1 }))).unwrap_err();
//! assert_eq!(err.errors()[0].path(), "key");
//! ```
pub mod error;
#[doc(hidden)]
pub mod fixture;
pub mod path_de;
pub mod registry;
pub mod result;
pub mod types;
pub mod validate;
pub mod value;

pub use error::{DescriptorError, ErrorKind, NotFound, TypeValidateError, ValidateError};
pub use registry::{ReferenceName, TypeRegistry};
pub use result::{
    validate_type, validate_type_no_throw, validate_type_with, ValidateOptions, ValidateResult,
    Validated,
};
pub use types::{Type, TypeObject, TypeReference, TypeTuple};
pub use validate::ValidationContext;
pub use value::Value;
