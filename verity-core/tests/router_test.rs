//! Integration tests for verity-core routing and server

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use verity_core::*;

fn router() -> Router {
    Router::new()
        .post("/api/echo", |req: HttpRequest| async move {
            Ok(HttpResponse::ok().with_body(req.body))
        })
        .post("/api/fail", |_req: HttpRequest| async move {
            Err(Error::Internal("handler failed".into()))
        })
}

async fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn test_router_keeps_explicit_trace_id() {
    let router = Router::new().post("/t", |req: HttpRequest| async move {
        Ok(HttpResponse::text(req.trace_id().to_string()))
    });
    let mut req = HttpRequest::new("POST", "/t");
    req.trace_id = Some("fixed".into());

    let res = router.route(req).await.unwrap();
    assert_eq!(res.body_str(), Some("fixed"));
}

#[tokio::test]
async fn test_merge_routers() {
    let merged = Router::new().merge(router());
    assert_eq!(merged.routes.len(), 2);
}

#[tokio::test]
async fn test_server_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        Application::new(router())
            .serve(listener, async {
                let _ = stop_rx.await;
            })
            .await
    });

    let echoed = raw_request(
        addr,
        "POST /api/echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
    )
    .await;
    assert!(echoed.starts_with("HTTP/1.1 200"));
    assert!(echoed.ends_with("hello"));

    let failed = raw_request(
        addr,
        "POST /api/fail HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(failed.starts_with("HTTP/1.1 500"));
    assert!(failed.contains("handler failed"));

    let missing = raw_request(
        addr,
        "GET /nowhere HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(missing.starts_with("HTTP/1.1 404"));

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
