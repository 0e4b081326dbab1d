// Routing system for HTTP requests

use crate::{Error, HttpMethod, HttpRequest, HttpResponse, trace};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by every handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>;

/// A route handler function type
pub type HandlerFn = Arc<dyn Fn(HttpRequest) -> HandlerFuture + Send + Sync>;

/// Route definition with handler
#[derive(Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    pub handler: HandlerFn,
}

impl Route {
    pub fn new<F, Fut>(method: HttpMethod, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        Self {
            method,
            path: path.into(),
            handler: Arc::new(move |req: HttpRequest| -> HandlerFuture { Box::pin(handler(req)) }),
        }
    }
}

/// Router for managing routes and dispatching requests
#[derive(Clone, Default)]
pub struct Router {
    pub routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Register an already boxed handler
    pub fn handle(mut self, method: HttpMethod, path: &str, handler: HandlerFn) -> Self {
        self.add_route(Route {
            method,
            path: path.to_string(),
            handler,
        });
        self
    }

    /// Register a POST handler
    pub fn post<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        self.add_route(Route::new(HttpMethod::POST, path, handler));
        self
    }

    /// Register a GET handler
    pub fn get<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        self.add_route(Route::new(HttpMethod::GET, path, handler));
        self
    }

    /// Append every route of `other`
    pub fn merge(mut self, other: Router) -> Self {
        self.routes.extend(other.routes);
        self
    }

    /// Find the route that matches the request and run it
    ///
    /// Splits the query string off `request.path`, assigns the trace id and
    /// dispatches. A path that exists under another method yields
    /// `MethodNotAllowed`, an unknown path `RouteNotFound`.
    pub async fn route(&self, mut request: HttpRequest) -> Result<HttpResponse, Error> {
        if let Some(idx) = request.path.find('?') {
            let query = request.path.split_off(idx);
            request.query_params.extend(parse_query_string(&query[1..]));
        }

        if request.trace_id.is_none() {
            request.trace_id = Some(trace::trace_id_for(&request.headers));
        }

        let mut allow: Vec<String> = Vec::new();
        for route in &self.routes {
            let Some(params) = match_path(&route.path, &request.path) else {
                continue;
            };
            if !route.method.as_str().eq_ignore_ascii_case(&request.method) {
                let method = route.method.as_str().to_string();
                if !allow.contains(&method) {
                    allow.push(method);
                }
                continue;
            }

            verity_log::debug!(
                target: "verity::router",
                "{} {} -> {} (trace {})",
                request.method,
                request.path,
                route.path,
                request.trace_id()
            );
            request.path_params = params;
            return (route.handler)(request).await;
        }

        let target = format!("{} {}", request.method, request.path);
        verity_log::debug!(target: "verity::router", "no route for {}", target);
        if !allow.is_empty() {
            Err(Error::MethodNotAllowed { target, allow })
        } else {
            Err(Error::RouteNotFound(target))
        }
    }
}

/// Match a route path pattern against a request path
/// Returns Some(params) if matched, None otherwise
fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(name) = pattern_part.strip_prefix(':') {
            params.insert(name.to_string(), path_part.to_string());
        } else if !pattern_part.eq_ignore_ascii_case(path_part) {
            return None;
        }
    }

    Some(params)
}

/// Decode a query string; `+` and percent escapes are decoded, the last
/// occurrence of a repeated key wins
fn parse_query_string(query: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_router() -> Router {
        Router::new()
            .post("/api/echo", |req: HttpRequest| async move {
                let text = req.query("text").cloned().unwrap_or_default();
                Ok(HttpResponse::text(text))
            })
            .get("/users/:id", |req: HttpRequest| async move {
                Ok(HttpResponse::text(req.param("id").cloned().unwrap_or_default()))
            })
    }

    #[test]
    fn test_match_path_with_param() {
        let params = match_path("/users/:id", "/users/123").unwrap();
        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert!(match_path("/users/:id", "/posts/123").is_none());
        assert!(match_path("/api/test-user", "/API/Test-User").is_some());
    }

    #[test]
    fn test_parse_query_string_decodes() {
        let params = parse_query_string("text=Arthur+Dent&value=%2D1&text=Ford");
        assert_eq!(params.get("text"), Some(&"Ford".to_string()));
        assert_eq!(params.get("value"), Some(&"-1".to_string()));
        assert!(parse_query_string("").is_empty());
    }

    #[tokio::test]
    async fn test_route_dispatches_with_query() {
        let res = echo_router()
            .route(HttpRequest::new("POST", "/api/echo?text=Zaphod"))
            .await
            .unwrap();
        assert_eq!(res.body_str(), Some("Zaphod"));
    }

    #[tokio::test]
    async fn test_route_assigns_trace_id() {
        let router = Router::new().post("/t", |req: HttpRequest| async move {
            Ok(HttpResponse::text(req.trace_id().to_string()))
        });
        let res = router.route(HttpRequest::new("POST", "/t")).await.unwrap();
        assert!(res.body_str().unwrap().starts_with("00-"));
    }

    #[tokio::test]
    async fn test_route_not_found_and_method_not_allowed() {
        let router = echo_router();

        let missing = router.route(HttpRequest::new("POST", "/nope")).await;
        assert!(matches!(missing, Err(Error::RouteNotFound(_))));

        let wrong_method = router.route(HttpRequest::new("GET", "/api/echo")).await;
        match wrong_method {
            Err(Error::MethodNotAllowed { allow, .. }) => assert_eq!(allow, vec!["POST"]),
            other => panic!("expected 405, got {:?}", other.map(|r| r.status)),
        }
    }

    #[tokio::test]
    async fn test_path_params() {
        let res = echo_router()
            .route(HttpRequest::new("GET", "/users/42"))
            .await
            .unwrap();
        assert_eq!(res.body_str(), Some("42"));
    }
}
