//! Core library for Verity
//!
//! Request/response types, routing, trace ids and the HTTP server.
//!
//! ```
//! use verity_core::{HttpRequest, HttpResponse, Router};
//!
//! # tokio_test::block_on(async {
//! let router = Router::new().post("/api/echo", |req: HttpRequest| async move {
//!     Ok(HttpResponse::text(req.query("text").cloned().unwrap_or_default()))
//! });
//!
//! let res = router
//!     .route(HttpRequest::new("POST", "/api/echo?text=Trillian"))
//!     .await
//!     .unwrap();
//! assert_eq!(res.body_str(), Some("Trillian"));
//! # });
//! ```

pub mod application;
pub mod error;
pub mod http;
pub mod routing;
pub mod status;
pub mod trace;

pub use application::*;
pub use error::*;
pub use http::*;
pub use routing::{HandlerFn, HandlerFuture, Route, Router};
pub use status::*;
pub use trace::TRACE_PARENT;
