//! Declarative request validation for Verity
//!
//! Rules are attached to model fields in a [`Schema`]. A [`ValidationPipe`]
//! binds the model from the request, runs every rule and either hands the
//! model to the handler or answers `400 Bad Request` with an RFC 9110
//! problem document listing every failure.
//!
//! # Examples
//!
//! ```
//! use once_cell::sync::Lazy;
//! use verity_validation::{
//!     Bind, FieldBinder, LettersOnlyRule, MinimumAgeRule, Schema, Validate,
//! };
//!
//! struct Visitor {
//!     name: Option<String>,
//!     age: Option<i32>,
//! }
//!
//! impl Bind for Visitor {
//!     fn bind(binder: &mut FieldBinder<'_>) -> Self {
//!         Self {
//!             name: binder.bind("name", "Name"),
//!             age: binder.bind("age", "Age"),
//!         }
//!     }
//! }
//!
//! static VISITOR_SCHEMA: Lazy<Schema<Visitor>> = Lazy::new(|| {
//!     Schema::<Visitor>::builder()
//!         .field("Name", |v| v.name.as_ref(), LettersOnlyRule)
//!         .field("Age", |v| v.age.as_ref(), MinimumAgeRule::default())
//!         .build()
//!         .unwrap()
//! });
//!
//! impl Validate for Visitor {
//!     fn schema() -> &'static Schema<Self> {
//!         &VISITOR_SCHEMA
//!     }
//! }
//!
//! let visitor = Visitor { name: Some("Ford".into()), age: Some(16) };
//! let outcome = visitor.validate();
//! assert_eq!(outcome.fields(), vec!["Age"]);
//! ```

mod binder;
mod errors;
mod pipe;
mod problem;
mod rules;
mod schema;
mod traits;

pub use binder::{BODY_FIELD, FieldBinder, FromField};
pub use errors::{ValidationError, ValidationOutcome, ViolationKind};
pub use pipe::{ValidationPipe, Verdict, validated_body, validated_query};
pub use problem::{
    PROBLEM_JSON, VALIDATION_PROBLEM_TITLE, VALIDATION_PROBLEM_TYPE, ValidationProblemDetails,
};
pub use rules::{LETTERS_ONLY_PATTERN, LettersOnlyRule, MinimumAgeRule};
pub use schema::{FieldBinding, Schema, SchemaBuilder, SchemaError};
pub use traits::{Bind, Rule, Validate};
