//! Payload validation
//!
//! Upsert payloads arrive as untyped JSON objects, so validation is declared
//! as data instead of code: a [`RuleSet`] lists the rules per field, and the
//! save operation runs it against every payload field except `id` before
//! anything is written. Failures aggregate into [`ValidationErrors`] and map
//! to a 422 response.
//!
//! ```rust,ignore
//! use crudbase::validation::{Rule, RuleSet};
//!
//! fn validation_rules() -> RuleSet {
//!     RuleSet::none()
//!         .rule("nome", Rule::Required)
//!         .rule("nome", Rule::Length { min: Some(3), max: Some(120) })
//!         .rule("email", Rule::Email)
//!         .rule("valor", Rule::Range { min: Some(0.0), max: None })
//! }
//! ```
//!
//! Rules other than [`Rule::Required`] are skipped when the field is absent
//! or null, matching the usual "validate when present" contract of form
//! backends.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::ApiError;

/// Single broken rule, field name plus a human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Everything that failed in one validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// True when no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All failures, in rule declaration order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Convert to a `Result`, erring when any rule failed.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation_failed(errors.errors.iter().map(ToString::to_string).collect())
    }
}

/// One validation rule over a JSON field value.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Field must be present, non-null, and not a blank string
    Required,
    /// String length bounds, in bytes
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Numeric bounds
    Range { min: Option<f64>, max: Option<f64> },
    /// Value must be a number
    Numeric,
    /// Minimal email shape, `@` and a dot, at most 255 characters
    Email,
}

impl Rule {
    /// Check this rule against a field value. `None` means the field was not
    /// present in the payload.
    fn check(&self, field: &str, value: Option<&Value>) -> Result<(), ValidationError> {
        let value = value.filter(|v| !v.is_null());

        if let Self::Required = self {
            let blank = matches!(value, Some(Value::String(s)) if s.trim().is_empty());
            if value.is_none() || blank {
                return Err(ValidationError::new(field, "This field is required"));
            }
            return Ok(());
        }

        // Rules other than Required only apply when a value was supplied.
        let Some(value) = value else {
            return Ok(());
        };

        match self {
            Rule::Required => Ok(()),
            Rule::Length { min, max } => {
                let Some(s) = value.as_str() else {
                    return Err(ValidationError::new(field, "Must be a string"));
                };
                let len = s.len();
                if let Some(min_len) = min {
                    if len < *min_len {
                        return Err(ValidationError::new(
                            field,
                            format!("Must be at least {min_len} characters"),
                        ));
                    }
                }
                if let Some(max_len) = max {
                    if len > *max_len {
                        return Err(ValidationError::new(
                            field,
                            format!("Must be at most {max_len} characters"),
                        ));
                    }
                }
                Ok(())
            }
            Rule::Range { min, max } => {
                let Some(n) = value.as_f64() else {
                    return Err(ValidationError::new(field, "Must be a number"));
                };
                if let Some(min_val) = min {
                    if n < *min_val {
                        return Err(ValidationError::new(
                            field,
                            format!("Must be at least {min_val}"),
                        ));
                    }
                }
                if let Some(max_val) = max {
                    if n > *max_val {
                        return Err(ValidationError::new(
                            field,
                            format!("Must be at most {max_val}"),
                        ));
                    }
                }
                Ok(())
            }
            Rule::Numeric => {
                if value.as_f64().is_none() {
                    return Err(ValidationError::new(field, "Must be a number"));
                }
                Ok(())
            }
            Rule::Email => {
                let Some(s) = value.as_str() else {
                    return Err(ValidationError::new(field, "Invalid email format"));
                };
                if !s.contains('@') || !s.contains('.') {
                    return Err(ValidationError::new(field, "Invalid email format"));
                }
                if s.len() > 255 {
                    return Err(ValidationError::new(
                        field,
                        "Email must be at most 255 characters",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Ordered list of per-field rules. Built once per resource, checked per
/// request.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, Rule)>,
}

impl RuleSet {
    /// Rule set that accepts everything. The default for resources that do
    /// not declare validation.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Append a rule for a field. The same field may appear multiple times.
    #[must_use]
    pub fn rule(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.rules.push((field.into(), rule));
        self
    }

    /// True when no rules were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against the payload fields. All failures are
    /// collected, not just the first.
    pub fn check(&self, fields: &Map<String, Value>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, rule) in &self.rules {
            if let Err(err) = rule.check(field, fields.get(field)) {
                errors.add(err);
            }
        }
        errors.result()
    }
}
