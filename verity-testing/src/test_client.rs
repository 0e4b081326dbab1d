// Test HTTP Client

use verity_core::{Error, HttpMethod, HttpRequest, HttpResponse, Router, error_response};
use std::collections::HashMap;
use std::sync::Arc;

/// Test HTTP client that drives a router in-process
///
/// Router errors are rendered exactly as the server renders them, so a
/// missing route still yields a `404` response to assert against.
#[derive(Clone)]
pub struct TestClient {
    router: Arc<Router>,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub fn from_shared(router: Arc<Router>) -> Self {
        Self { router }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(HttpMethod::GET, path, None).await
    }

    /// Make a POST request
    pub async fn post(&self, path: &str, body: Vec<u8>) -> TestResponse {
        self.request(HttpMethod::POST, path, Some(body)).await
    }

    /// POST `data` serialised as JSON
    pub async fn post_json<T: serde::Serialize>(&self, path: &str, data: &T) -> TestResponse {
        match TestRequestBuilder::new(HttpMethod::POST, path).json(data) {
            Ok(builder) => self.send(builder).await,
            Err(error) => TestResponse::from_error(error),
        }
    }

    /// Make a request with custom method
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> TestResponse {
        let mut builder = TestRequestBuilder::new(method, path);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.send(builder).await
    }

    /// Send a fully built request
    pub async fn send(&self, builder: TestRequestBuilder) -> TestResponse {
        match self.router.route(builder.build()).await {
            Ok(response) => TestResponse::Success(response),
            Err(error) => TestResponse::from_error(error),
        }
    }
}

/// Builder for test requests
pub struct TestRequestBuilder {
    method: HttpMethod,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    query_params: Vec<(String, String)>,
}

impl TestRequestBuilder {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
            query_params: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Set the body
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Set JSON body
    pub fn json<T: serde::Serialize>(mut self, data: &T) -> Result<Self, Error> {
        self.body = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Add a query parameter; it is percent-encoded into the path
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Build the request
    pub fn build(self) -> HttpRequest {
        let mut path = self.path;
        if !self.query_params.is_empty() {
            if let Ok(encoded) = serde_urlencoded::to_string(&self.query_params) {
                path.push(if path.contains('?') { '&' } else { '?' });
                path.push_str(&encoded);
            }
        }

        let mut req = HttpRequest::new(self.method.as_str(), path).with_body(self.body);
        req.headers = self.headers;
        req
    }
}

/// Response from a test request
#[derive(Debug)]
pub enum TestResponse {
    Success(HttpResponse),
    /// The router failed; `response` is what the server would have sent
    Error { error: Error, response: HttpResponse },
}

impl TestResponse {
    fn from_error(error: Error) -> Self {
        let response = error_response(&error);
        TestResponse::Error { error, response }
    }

    /// The response as it would go over the wire
    pub fn response(&self) -> &HttpResponse {
        match self {
            TestResponse::Success(response) => response,
            TestResponse::Error { response, .. } => response,
        }
    }

    /// Assert the handler produced the response
    pub fn assert_success(&self) -> &HttpResponse {
        match self {
            TestResponse::Success(response) => response,
            TestResponse::Error { error, .. } => {
                panic!("Expected success response, got error: {:?}", error)
            }
        }
    }

    /// Assert the router failed
    pub fn assert_error(&self) -> &Error {
        match self {
            TestResponse::Error { error, .. } => error,
            TestResponse::Success(_) => {
                panic!("Expected error response, got success")
            }
        }
    }

    pub fn status(&self) -> u16 {
        self.response().status
    }

    /// Get the response body as string
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.response().body.clone()).ok()
    }

    /// Get the response body as JSON
    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_slice(&self.response().body)
            .map_err(|e| format!("Serialization error: {}", e))
    }

    /// Header value, ignoring ASCII case of the name
    pub fn header(&self, key: &str) -> Option<&str> {
        self.response()
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
