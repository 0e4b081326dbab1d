// Per-model rule schemas

use crate::{Rule, ValidationError, ValidationOutcome};
use std::fmt;
use thiserror::Error;

/// Errors raised while assembling a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field '{0}' already has a rule bound")]
    DuplicateBinding(String),
}

type Check<M> = Box<dyn Fn(&M) -> Result<(), ValidationError> + Send + Sync>;

/// One rule attached to one field of `M`
pub struct FieldBinding<M> {
    field: &'static str,
    rule: &'static str,
    check: Check<M>,
}

impl<M: 'static> FieldBinding<M> {
    pub fn new<T, A, R>(field: &'static str, accessor: A, rule: R) -> Self
    where
        T: ?Sized + 'static,
        A: for<'m> Fn(&'m M) -> Option<&'m T> + Send + Sync + 'static,
        R: Rule<T> + 'static,
    {
        Self {
            field,
            rule: rule.name(),
            check: Box::new(move |model: &M| rule.evaluate(field, accessor(model))),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn rule_name(&self) -> &'static str {
        self.rule
    }

    pub fn evaluate(&self, model: &M) -> Result<(), ValidationError> {
        (self.check)(model)
    }
}

impl<M> fmt::Debug for FieldBinding<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("rule", &self.rule)
            .finish()
    }
}

/// Ordered field bindings for a request model
///
/// Built once per model type and shared; `validate` runs every binding in
/// declaration order and never stops at the first failure.
#[derive(Debug)]
pub struct Schema<M> {
    bindings: Vec<FieldBinding<M>>,
}

impl<M: 'static> Schema<M> {
    pub fn builder() -> SchemaBuilder<M> {
        SchemaBuilder {
            bindings: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &[FieldBinding<M>] {
        &self.bindings
    }

    /// Run every rule against `model`
    pub fn validate(&self, model: &M) -> ValidationOutcome {
        self.validate_with(model, ValidationOutcome::new())
    }

    /// Run every rule against `model`, after the failures already in `outcome`
    ///
    /// Fields that already failed to bind are not evaluated again, so a
    /// value that could not be converted is reported once.
    pub fn validate_with(&self, model: &M, mut outcome: ValidationOutcome) -> ValidationOutcome {
        for binding in &self.bindings {
            if outcome.has_field(binding.field) {
                continue;
            }
            if let Err(error) = binding.evaluate(model) {
                outcome.add(error);
            }
        }
        outcome
    }
}

pub struct SchemaBuilder<M> {
    bindings: Vec<FieldBinding<M>>,
}

impl<M: 'static> SchemaBuilder<M> {
    /// Attach `rule` to `field`, reading the value through `accessor`
    pub fn field<T, A, R>(mut self, field: &'static str, accessor: A, rule: R) -> Self
    where
        T: ?Sized + 'static,
        A: for<'m> Fn(&'m M) -> Option<&'m T> + Send + Sync + 'static,
        R: Rule<T> + 'static,
    {
        self.bindings.push(FieldBinding::new(field, accessor, rule));
        self
    }

    /// Finish the schema; a field may carry at most one rule
    pub fn build(self) -> Result<Schema<M>, SchemaError> {
        for (idx, binding) in self.bindings.iter().enumerate() {
            if self.bindings[..idx].iter().any(|b| b.field == binding.field) {
                return Err(SchemaError::DuplicateBinding(binding.field.to_string()));
            }
        }
        Ok(Schema {
            bindings: self.bindings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LettersOnlyRule, MinimumAgeRule, ViolationKind};

    #[derive(Debug)]
    struct Person {
        name: Option<String>,
        age: Option<i32>,
    }

    fn schema() -> Schema<Person> {
        Schema::<Person>::builder()
            .field("Name", |p| p.name.as_ref(), LettersOnlyRule)
            .field("Age", |p| p.age.as_ref(), MinimumAgeRule::default())
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_model() {
        let person = Person {
            name: Some("Arthur".into()),
            age: Some(42),
        };
        assert!(schema().validate(&person).is_valid());
    }

    #[test]
    fn test_reports_every_failure_in_order() {
        let person = Person {
            name: Some("ArthurDent_42".into()),
            age: Some(16),
        };
        let outcome = schema().validate(&person);
        assert_eq!(outcome.fields(), vec!["Name", "Age"]);
        assert_eq!(outcome.messages("Name").len(), 1);
        assert_eq!(outcome.messages("Age").len(), 1);
    }

    #[test]
    fn test_missing_values_are_invalid() {
        let person = Person {
            name: None,
            age: None,
        };
        let outcome = schema().validate(&person);
        assert_eq!(outcome.len(), 2);
        assert!(outcome.errors().iter().all(|e| e.kind == ViolationKind::MissingValue));
    }

    #[test]
    fn test_binding_failures_are_not_revalidated() {
        let person = Person {
            name: Some("Arthur".into()),
            age: None,
        };
        let prior = ValidationOutcome::from(ValidationError::binding("Age", "not a number"));
        let outcome = schema().validate_with(&person, prior);
        assert_eq!(outcome.messages("Age"), vec!["not a number"]);
        assert_eq!(outcome.len(), 1);
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let result = Schema::<Person>::builder()
            .field("Name", |p| p.name.as_ref(), LettersOnlyRule)
            .field("Name", |p| p.name.as_deref(), LettersOnlyRule)
            .build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateBinding("Name".to_string())
        );
    }

    #[test]
    fn test_binding_metadata() {
        let schema = schema();
        let names: Vec<_> = schema
            .bindings()
            .iter()
            .map(|b| (b.field(), b.rule_name()))
            .collect();
        assert_eq!(names, vec![("Name", "lettersOnly"), ("Age", "minimumAge")]);
    }
}
