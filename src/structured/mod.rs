//! Structured output: static schemas, JSON parsing and validation.
//!
//! - [`Schema`]: `const` output contract rendered for the provider and for local checks
//! - [`OutputValidator`]: validate a parsed reply against a schema
//! - [`StructuredOutput`]: parse + validate a formatting-pass reply
//!
//! # Examples
//!
//! ```
//! use tripgen::structured::{OutputValidator, Property, Schema, SchemaNode};
//! use serde_json::json;
//!
//! const FIELDS: &[Property] = &[
//!     Property::required("city", SchemaNode::string("City name")),
//!     Property::optional("nights", SchemaNode::integer("")),
//! ];
//! static STAY: Schema = Schema::new("stay", SchemaNode::object("", FIELDS));
//!
//! let validator = OutputValidator::for_schema(&STAY);
//! let result = validator.validate(&json!({"city": "Lisbon", "nights": 3}));
//!
//! assert!(result.is_valid());
//! ```

pub mod error;
pub mod json_mode;
pub mod schema;
pub mod validator;

pub use error::{SchemaViolation, ValidationError, ValidationResult};
pub use json_mode::{parse_json, StructuredOutput, JSON_MIME_TYPE};
pub use schema::{Property, Schema, SchemaNode};
pub use validator::OutputValidator;
