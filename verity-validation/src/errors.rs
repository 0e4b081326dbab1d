// Validation errors

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// No value was supplied (missing key, JSON `null`, missing query parameter)
    MissingValue,
    /// A value was supplied but the rule does not accept it
    FormatViolation,
    /// A value was supplied but could not be converted to the field type
    BindingFailure,
}

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Error message
    pub message: String,

    /// Rule that failed
    pub constraint: String,

    pub kind: ViolationKind,

    /// Rejected value, rendered as text
    pub value: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom".to_string(),
            kind: ViolationKind::FormatViolation,
            value: None,
        }
    }

    /// Error for a field that has no value at all
    pub fn missing(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message).with_kind(ViolationKind::MissingValue)
    }

    /// Error for a value that could not be converted to the field type
    pub fn binding(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message)
            .with_kind(ViolationKind::BindingFailure)
            .with_constraint("binding")
    }

    /// Set the constraint name
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    /// Set the invalid value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_kind(mut self, kind: ViolationKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Every failure recorded while binding and validating one request
///
/// Failures keep the order in which they were recorded. An empty outcome
/// means the request is accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a failure
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every failure of `other` after the ones already recorded
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.errors.extend(other.errors);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Whether any failure was recorded for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages recorded for `field`, in order
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Distinct failing field names in first-seen order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }

    /// Field name → messages, the shape of the `errors` member of a problem body
    pub fn to_error_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            map.entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        map
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl From<Vec<ValidationError>> for ValidationOutcome {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl From<ValidationError> for ValidationOutcome {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationOutcome {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
