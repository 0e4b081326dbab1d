//! Verity - declarative request validation over a small async HTTP stack
//!
//! Field rules are bound to request models; handlers only ever see models
//! that passed every rule. Rejected requests are answered with an RFC 9110
//! problem document listing each failing field.
//!
//! ```
//! # tokio_test::block_on(async {
//! use verity::HttpRequest;
//!
//! let req = HttpRequest::new("POST", "/api/test-of-legal-age?value=16");
//! let res = verity::api::router().route(req).await.unwrap();
//! assert_eq!(res.status, 400);
//! assert_eq!(
//!     res.headers.get("Content-Type").map(String::as_str),
//!     Some("application/problem+json")
//! );
//! # });
//! ```

// Re-export core functionality
pub use verity_core::*;

pub use verity_log as log;

// Re-export optional crates
#[cfg(feature = "config")]
pub use verity_config;

#[cfg(feature = "testing")]
pub use verity_testing;

#[cfg(feature = "validation")]
pub use verity_validation;

/// Demo endpoints exercising the built-in rules
#[cfg(feature = "validation")]
pub mod api;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Application, Error, HttpMethod, HttpRequest, HttpResponse, HttpStatus, Json, Result,
        Route, Router,
    };

    #[cfg(feature = "validation")]
    pub use verity_validation::{
        Bind, FieldBinder, LettersOnlyRule, MinimumAgeRule, Rule, Schema, Validate,
        ValidationOutcome, ValidationPipe, Verdict, validated_body, validated_query,
    };

    #[cfg(feature = "config")]
    pub use verity_config::ServerConfig;
}
