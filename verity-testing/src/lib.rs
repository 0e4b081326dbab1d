//! Testing utilities for Verity applications.
//!
//! [`TestClient`] drives a [`Router`](verity_core::Router) in-process, no
//! socket involved, and renders router errors the way the server does. The
//! assertion helpers print the response body when they fail.
//!
//! ```
//! use verity_core::{HttpRequest, HttpResponse, Router};
//! use verity_testing::*;
//!
//! # tokio_test::block_on(async {
//! let router = Router::new().post("/hello", |_req: HttpRequest| async {
//!     Ok(HttpResponse::text("Hello!"))
//! });
//!
//! let client = TestClient::new(router);
//! let response = client.post("/hello", Vec::new()).await;
//! assert_status(&response, 200);
//! assert_eq!(response.body_string(), Some("Hello!".to_string()));
//!
//! assert_status(&client.get("/hello").await, 405);
//! # });
//! ```

mod assertions;
mod test_client;

pub use assertions::*;
pub use test_client::*;
