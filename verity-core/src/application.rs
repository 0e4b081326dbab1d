// Application bootstrapper and HTTP server

use crate::{Error, HttpRequest, HttpResponse, Router};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode, body::Incoming as IncomingBody};
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The main application struct
pub struct Application {
    pub router: Arc<Router>,
}

impl Application {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Bind `addr` and serve until the process is interrupted (Ctrl-C)
    pub async fn listen(self, addr: SocketAddr) -> Result<(), Error> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal(tokio::signal::ctrl_c())).await
    }

    /// Serve connections from `listener` until `shutdown` resolves
    ///
    /// Each connection runs on its own task; in-flight connections are not
    /// awaited after shutdown.
    pub async fn serve<S>(self, listener: TcpListener, shutdown: S) -> Result<(), Error>
    where
        S: Future<Output = ()>,
    {
        let local = listener.local_addr()?;
        verity_log::info!(target: "verity::server", "listening on http://{}", local);

        tokio::pin!(shutdown);
        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => break,
            };
            let io = TokioIo::new(stream);
            let router = self.router.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<IncomingBody>| {
                    let router = router.clone();
                    async move { handle_request(req, router).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    verity_log::error!(
                        target: "verity::server",
                        "error serving connection from {}: {}",
                        peer,
                        err
                    );
                }
            });
        }

        verity_log::info!(target: "verity::server", "server on {} stopped", local);
        Ok(())
    }
}

/// Resolve when `signal` fires; a signal that failed to register never resolves
async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        verity_log::error!(
            target: "verity::server",
            "cannot listen for Ctrl-C, serving until killed: {}",
            err
        );
        std::future::pending::<()>().await;
    }
}

/// Handle an incoming HTTP request
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let mut request = HttpRequest::new(req.method().as_str(), target);
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            request.headers.insert(name.to_string(), value.to_string());
        }
    }
    request.body = req.collect().await?.to_bytes().to_vec();

    let response = router
        .route(request)
        .await
        .unwrap_or_else(|err| error_response(&err));

    Ok(into_hyper(response))
}

/// Convert an error that escaped the router into a JSON response
pub fn error_response(err: &Error) -> HttpResponse {
    if err.is_server_error() {
        verity_log::error!(target: "verity::server", "{}", err);
    }
    let response = HttpResponse::new(err.status_code())
        .with_json(&err.to_json())
        .unwrap_or_else(|_| HttpResponse::internal_server_error());

    match err {
        Error::MethodNotAllowed { allow, .. } => response.with_header("Allow", allow.join(", ")),
        _ => response,
    }
}

fn into_hyper(response: HttpResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status);
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(response.body)))
        .unwrap_or_else(|err| {
            verity_log::error!(target: "verity::server", "invalid response: {}", err);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_body() {
        let res = error_response(&Error::RouteNotFound("POST /nope".into()));
        assert_eq!(res.status, 404);
        let body: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
        assert_eq!(body["status"], 404);
        assert!(!res.headers.contains_key("Allow"));
    }

    #[test]
    fn test_method_not_allowed_lists_allow() {
        let res = error_response(&Error::MethodNotAllowed {
            target: "GET /api/test-user".into(),
            allow: vec!["POST".into(), "PUT".into()],
        });
        assert_eq!(res.status, 405);
        assert_eq!(res.headers.get("Allow").map(String::as_str), Some("POST, PUT"));
        let body: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
        assert_eq!(body["status"], 405);
    }

    #[tokio::test]
    async fn test_shutdown_signal() {
        let wait = std::time::Duration::from_millis(50);

        let fired = shutdown_signal(async { Ok::<(), std::io::Error>(()) });
        assert!(tokio::time::timeout(wait, fired).await.is_ok());

        let failed = shutdown_signal(async { Err(std::io::Error::other("no handler")) });
        assert!(tokio::time::timeout(wait, failed).await.is_err());
    }

    #[test]
    fn test_into_hyper_copies_headers() {
        let res = into_hyper(HttpResponse::text("hi"));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_into_hyper_rejects_bad_status() {
        let res = into_hyper(HttpResponse::new(42));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
