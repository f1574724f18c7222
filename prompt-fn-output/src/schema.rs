//! The schema capability.
//!
//! A [`Schema`] checks values of one type: it validates values that are
//! already typed (prompt input) and parses raw JSON into typed values (model
//! output, recovered output). [`TypedSchema`] is the serde-backed
//! implementation used throughout prompt-fn.

use prompt_fn_core::ValidationError;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::json_schema::ObjectJsonSchema;

/// Trait for schemas that validate and coerce values of type `T`.
pub trait Schema<T>: Send + Sync {
    /// Validate an already typed value, returning it (possibly normalized).
    fn validate(&self, value: T) -> Result<T, ValidationError>;

    /// Coerce a raw JSON value into `T`, then validate it.
    fn parse(&self, value: JsonValue) -> Result<T, ValidationError>;

    /// JSON schema describing the shape, if one is known.
    ///
    /// Forwarded to generation backends as the target output format.
    fn json_schema(&self) -> Option<JsonValue> {
        None
    }
}

/// Shared schema for dynamic dispatch.
pub type BoxedSchema<T> = Arc<dyn Schema<T>>;

type ValidatorFn<T> = Arc<dyn Fn(T) -> Result<T, ValidationError> + Send + Sync>;

fn normalize_path(path: &str) -> String {
    if path.starts_with('$') {
        path.to_string()
    } else if path.is_empty() {
        "$".to_string()
    } else {
        format!("$.{path}")
    }
}

/// Schema backed by serde deserialization plus refinements.
///
/// Parsing deserializes the JSON value into `T` (so the Rust type is the
/// primary shape), then runs every refinement and validator in the order they
/// were added. The first violation wins.
///
/// # Example
///
/// ```rust
/// use prompt_fn_output::{Schema, SchemaBuilder, TypedSchema};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Sum {
///     result: f64,
/// }
///
/// let schema = TypedSchema::<Sum>::new()
///     .with_schema(SchemaBuilder::new().number("result", "The sum", true).build())
///     .refine("result", "must not be negative", |s| s.result >= 0.0);
///
/// let sum = schema.parse(serde_json::json!({"result": 42})).unwrap();
/// assert_eq!(sum.result, 42.0);
///
/// let err = schema.parse(serde_json::json!({"result": -1})).unwrap_err();
/// assert_eq!(err.path, "$.result");
/// ```
pub struct TypedSchema<T> {
    json_schema: Option<JsonValue>,
    validators: Vec<ValidatorFn<T>>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned + 'static> TypedSchema<T> {
    /// Create a schema with no JSON description and no refinements.
    #[must_use]
    pub fn new() -> Self {
        Self {
            json_schema: None,
            validators: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Attach an object schema description.
    #[must_use]
    pub fn with_schema(self, schema: ObjectJsonSchema) -> Self {
        self.with_json_schema(schema.into())
    }

    /// Attach a raw JSON schema description.
    #[must_use]
    pub fn with_json_schema(mut self, schema: JsonValue) -> Self {
        self.json_schema = Some(schema);
        self
    }

    /// Add a predicate that must hold; `path` is reported on failure.
    #[must_use]
    pub fn refine<F>(mut self, path: &str, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let path = normalize_path(path);
        let message = message.into();
        self.validators.push(Arc::new(move |value: T| {
            if predicate(&value) {
                Ok(value)
            } else {
                Err(ValidationError::new(path.clone(), message.clone()))
            }
        }));
        self
    }

    /// Add a validator that may transform the value or reject it.
    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(T) -> Result<T, ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Number of refinements and validators.
    #[must_use]
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }
}

impl<T: DeserializeOwned + 'static> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedSchema<T> {
    fn clone(&self) -> Self {
        Self {
            json_schema: self.json_schema.clone(),
            validators: self.validators.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedSchema")
            .field("type", &std::any::type_name::<T>())
            .field("json_schema", &self.json_schema)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl<T: DeserializeOwned + 'static> Schema<T> for TypedSchema<T> {
    fn validate(&self, mut value: T) -> Result<T, ValidationError> {
        for validator in &self.validators {
            value = validator(value)?;
        }
        Ok(value)
    }

    fn parse(&self, value: JsonValue) -> Result<T, ValidationError> {
        let typed: T = serde_json::from_value(value)?;
        self.validate(typed)
    }

    fn json_schema(&self) -> Option<JsonValue> {
        self.json_schema.clone()
    }
}
