// RFC 9110 problem document for rejected requests

use crate::ValidationOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use verity_core::{Error, HttpResponse};

pub const VALIDATION_PROBLEM_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.5.1";
pub const VALIDATION_PROBLEM_TITLE: &str = "One or more validation errors occurred.";
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Body of a `400 Bad Request` caused by validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationProblemDetails {
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    #[serde(rename = "traceId")]
    pub trace_id: String,

    /// Field name → messages
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationProblemDetails {
    pub fn new(outcome: &ValidationOutcome, trace_id: impl Into<String>) -> Self {
        Self {
            type_uri: VALIDATION_PROBLEM_TYPE.to_string(),
            title: VALIDATION_PROBLEM_TITLE.to_string(),
            status: 400,
            trace_id: trace_id.into(),
            errors: outcome.to_error_map(),
        }
    }

    pub fn into_response(self) -> Result<HttpResponse, Error> {
        let body = serde_json::to_vec(&self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(HttpResponse::new(self.status)
            .with_header("Content-Type", PROBLEM_JSON)
            .with_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn test_problem_body_shape() {
        let outcome = ValidationOutcome::from(ValidationError::new("Age", "too young"));
        let res = ValidationProblemDetails::new(&outcome, "00-abc-def-00")
            .into_response()
            .unwrap();

        assert_eq!(res.status, 400);
        assert_eq!(res.headers.get("Content-Type").map(String::as_str), Some(PROBLEM_JSON));

        let body: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
        let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["errors", "status", "title", "traceId", "type"]);
        assert_eq!(body["type"], VALIDATION_PROBLEM_TYPE);
        assert_eq!(body["title"], VALIDATION_PROBLEM_TITLE);
        assert_eq!(body["status"], 400);
        assert_eq!(body["traceId"], "00-abc-def-00");
        assert_eq!(body["errors"]["Age"][0], "too young");
    }
}
