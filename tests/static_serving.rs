//! End-to-end tests for the static-resource server over real sockets.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use reqwest::StatusCode;
use resource_server::{ResourceHandler, ResourceServer};

/// Builds the canonical fixture tree: a 12-byte index.html and an empty
/// placeholder image.
fn fixture_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir()
        .join(format!("resource-server-e2e-{}-{}", std::process::id(), name))
        .join("public");
    std::fs::create_dir_all(root.join("img")).unwrap();
    std::fs::write(root.join("index.html"), b"hello world!").unwrap();
    std::fs::write(root.join("img").join("logo.png"), b"").unwrap();
    root
}

/// Starts a server for the fixture tree and waits until it accepts.
async fn start_server(name: &str, port: u16) -> (Arc<ResourceHandler>, SocketAddr) {
    let address: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
    let handler = ResourceHandler::for_directory("/static/", fixture_root(name)).unwrap();
    let server = ResourceServer::bind(address, None, None).unwrap();

    let router = handler.router();
    tokio::spawn(async move {
        let _ = server.serve(router).await;
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    (handler, address)
}

#[tokio::test]
async fn serves_resources_with_sizes_and_types() {
    let (_, address) = start_server("basics", 28391).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{address}/static/index.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/html"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"hello world!");

    let response = client
        .get(format!("http://{address}/static/img/logo.png"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.unwrap().is_empty());

    let response = client
        .get(format!("http://{address}/static/missing.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejects_out_of_context_and_unregistered_methods() {
    let (_, address) = start_server("rejection", 28392).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{address}/elsewhere/index.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        let response = client
            .request(
                reqwest::Method::from_bytes(method.as_str().as_bytes()).unwrap(),
                format!("http://{address}/static/index.html"),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "method {method}"
        );
        assert!(response.bytes().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn options_reflects_runtime_method_registration() {
    let (handler, address) = start_server("options", 28393).await;
    let client = reqwest::Client::new();

    let response = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{address}/static/anything"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain"
    );
    assert_eq!(response.text().await.unwrap(), "GET\nOPTIONS");

    handler.allowed_methods().insert(Method::HEAD);
    let response = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{address}/static/anything"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "GET\nHEAD\nOPTIONS");
}
