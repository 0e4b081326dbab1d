// Demo handlers; they only run for requests that passed validation

use super::models::{LegalAgeQuery, LettersOnlyQuery, User};
use verity_core::{HttpResponse, Result};

/// Echo the validated `text` as plain text
pub async fn letters_only(query: LettersOnlyQuery) -> Result<HttpResponse> {
    Ok(HttpResponse::text(query.text.unwrap_or_default()))
}

/// Echo the validated `value` as a JSON number
pub async fn legal_age(query: LegalAgeQuery) -> Result<HttpResponse> {
    HttpResponse::json(&query.value)
}

/// Echo the validated user
pub async fn user(user: User) -> Result<HttpResponse> {
    HttpResponse::json(&user)
}
