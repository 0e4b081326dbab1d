// Validation traits

use crate::{FieldBinder, Schema, ValidationError, ValidationOutcome};

/// A single constraint on one field value
///
/// Rules hold no per-request state. `value` is `None` when the field was
/// not supplied, and an absent value never passes.
pub trait Rule<T: ?Sized>: Send + Sync {
    /// Constraint identifier recorded on failures
    fn name(&self) -> &'static str;

    /// Check `value`; the error message names `field`
    fn evaluate(&self, field: &str, value: Option<&T>) -> Result<(), ValidationError>;
}

/// Request models built from a request source
pub trait Bind: Sized {
    /// Pull every field out of `binder`; conversion failures stay in the binder
    fn bind(binder: &mut FieldBinder<'_>) -> Self;
}

/// Request models that carry a validation schema
pub trait Validate: Sized + 'static {
    fn schema() -> &'static Schema<Self>;

    /// Run every rule of the schema
    fn validate(&self) -> ValidationOutcome {
        Self::schema().validate(self)
    }
}
