// Request models for the demo endpoints

use once_cell::sync::Lazy;
use serde::Serialize;
use verity_validation::{Bind, FieldBinder, LettersOnlyRule, MinimumAgeRule, Schema, Validate};

/// Body of `POST /api/test-user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl Bind for User {
    fn bind(binder: &mut FieldBinder<'_>) -> Self {
        Self {
            name: binder.bind("name", "Name"),
            age: binder.bind("age", "Age"),
        }
    }
}

static USER_SCHEMA: Lazy<Schema<User>> = Lazy::new(|| {
    Schema::<User>::builder()
        .field("Name", |user| user.name.as_ref(), LettersOnlyRule)
        .field("Age", |user| user.age.as_ref(), MinimumAgeRule::default())
        .build()
        .expect("user schema has one rule per field")
});

impl Validate for User {
    fn schema() -> &'static Schema<Self> {
        &USER_SCHEMA
    }
}

/// Query of `POST /api/test-letters-only`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LettersOnlyQuery {
    pub text: Option<String>,
}

impl Bind for LettersOnlyQuery {
    fn bind(binder: &mut FieldBinder<'_>) -> Self {
        Self {
            text: binder.bind("text", "text"),
        }
    }
}

static LETTERS_ONLY_SCHEMA: Lazy<Schema<LettersOnlyQuery>> = Lazy::new(|| {
    Schema::<LettersOnlyQuery>::builder()
        .field("text", |query| query.text.as_ref(), LettersOnlyRule)
        .build()
        .expect("letters-only schema has one rule per field")
});

impl Validate for LettersOnlyQuery {
    fn schema() -> &'static Schema<Self> {
        &LETTERS_ONLY_SCHEMA
    }
}

/// Query of `POST /api/test-of-legal-age`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalAgeQuery {
    pub value: Option<i32>,
}

impl Bind for LegalAgeQuery {
    fn bind(binder: &mut FieldBinder<'_>) -> Self {
        Self {
            value: binder.bind("value", "value"),
        }
    }
}

static LEGAL_AGE_SCHEMA: Lazy<Schema<LegalAgeQuery>> = Lazy::new(|| {
    Schema::<LegalAgeQuery>::builder()
        .field("value", |query| query.value.as_ref(), MinimumAgeRule::default())
        .build()
        .expect("legal-age schema has one rule per field")
});

impl Validate for LegalAgeQuery {
    fn schema() -> &'static Schema<Self> {
        &LEGAL_AGE_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_schema() {
        let user = User {
            name: Some("ArthurDent".into()),
            age: Some(42),
        };
        assert!(user.validate().is_valid());

        let user = User {
            name: Some("ArthurDent_42".into()),
            age: Some(16),
        };
        assert_eq!(user.validate().fields(), vec!["Name", "Age"]);
    }

    #[test]
    fn test_user_serialises_lowercase_keys() {
        let user = User {
            name: Some("Ford".into()),
            age: Some(200),
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            serde_json::json!({"name": "Ford", "age": 200})
        );
    }

    #[test]
    fn test_query_schemas() {
        let text = LettersOnlyQuery { text: None };
        assert_eq!(text.validate().fields(), vec!["text"]);

        let value = LegalAgeQuery { value: Some(18) };
        assert!(value.validate().is_valid());
    }
}
