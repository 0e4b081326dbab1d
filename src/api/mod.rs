// Demo API

pub mod handlers;
pub mod models;

pub use models::{LegalAgeQuery, LettersOnlyQuery, User};

use verity_core::{HttpMethod, Router};
use verity_validation::{validated_body, validated_query};

pub const LETTERS_ONLY_PATH: &str = "/api/test-letters-only";
pub const LEGAL_AGE_PATH: &str = "/api/test-of-legal-age";
pub const USER_PATH: &str = "/api/test-user";

/// Routes of the demo API
pub fn router() -> Router {
    Router::new()
        .handle(
            HttpMethod::POST,
            LETTERS_ONLY_PATH,
            validated_query(handlers::letters_only),
        )
        .handle(
            HttpMethod::POST,
            LEGAL_AGE_PATH,
            validated_query(handlers::legal_age),
        )
        .handle(HttpMethod::POST, USER_PATH, validated_body(handlers::user))
}
