// Test assertions for HTTP responses
//
// Every failure message includes the response body, which for a rejected
// request is the problem document naming the failing fields.

use crate::TestResponse;
use serde_json::Value;

const PROBLEM_JSON: &str = "application/problem+json";

fn body_of(response: &TestResponse) -> String {
    response
        .body_string()
        .unwrap_or_else(|| format!("<{} bytes>", response.response().body.len()))
}

pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status();
    assert!(
        actual == expected,
        "status {} != expected {}; body: {}",
        actual,
        expected,
        body_of(response)
    );
}

/// Deserialise the body as `T` and compare it with `expected`
pub fn assert_json<T>(response: &TestResponse, expected: &T)
where
    T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    match response.body_json::<T>() {
        Ok(actual) => assert_eq!(&actual, expected, "body: {}", body_of(response)),
        Err(e) => panic!("{}; body: {}", e, body_of(response)),
    }
}

/// Header names compare case-insensitively, values exactly
pub fn assert_header(response: &TestResponse, key: &str, expected: &str) {
    let actual = response.header(key);
    assert!(
        actual == Some(expected),
        "header {} is {:?}, expected {:?}",
        key,
        actual,
        expected
    );
}

pub fn assert_body_contains(response: &TestResponse, needle: &str) {
    let body = body_of(response);
    assert!(body.contains(needle), "{:?} not found in body: {}", needle, body);
}

/// Any 2xx status
pub fn assert_success(response: &TestResponse) {
    let status = response.status();
    assert!(
        (200..300).contains(&status),
        "status {} is not 2xx; body: {}",
        status,
        body_of(response)
    );
}

/// Any 4xx status
pub fn assert_client_error(response: &TestResponse) {
    let status = response.status();
    assert!(
        (400..500).contains(&status),
        "status {} is not 4xx; body: {}",
        status,
        body_of(response)
    );
}

/// Assert a `400` validation problem and return its `errors` member
///
/// Also checks the media type and that `traceId` is present.
pub fn assert_validation_problem(response: &TestResponse) -> serde_json::Map<String, Value> {
    assert_status(response, 400);
    assert_header(response, "Content-Type", PROBLEM_JSON);

    let body: Value = response
        .body_json()
        .unwrap_or_else(|e| panic!("{}; body: {}", e, body_of(response)));
    assert_eq!(body["status"], 400, "body: {}", body);
    assert!(
        body["traceId"].as_str().is_some_and(|id| !id.is_empty()),
        "missing traceId; body: {}",
        body
    );

    match body.get("errors") {
        Some(Value::Object(errors)) => errors.clone(),
        _ => panic!("no errors object; body: {}", body),
    }
}

/// Messages reported for `field` in a validation problem
pub fn problem_messages(errors: &serde_json::Map<String, Value>, field: &str) -> Vec<String> {
    errors
        .get(field)
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
