//! Start/close lifecycle over a real socket

use mocktree_core::TreeOptions;
use mocktree_http::{start, MiddlewareConfig, ServerError};
use serde_json::{json, Value};
use std::io::Write;

fn quiet() -> MiddlewareConfig {
    MiddlewareConfig::new().tracing(false).request_logging(false)
}

#[tokio::test]
async fn test_start_serve_close() {
    let config = TreeOptions::new()
        .host("127.0.0.1")
        .port(0)
        .data_object(json!({"rootInObject": true}))
        .resolve()
        .unwrap();

    let server = start(config, quiet()).await.unwrap();
    let url = format!("{}/node", server.url());

    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["rootInObject"], json!(true));

    server.close().await.unwrap();
    assert!(reqwest::get(&url).await.is_err());
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"rootInFile": true, "children": [{{"id": "a"}}]}}"#).unwrap();

    let config = TreeOptions::new()
        .host("127.0.0.1")
        .port(0)
        .data_file(file.path())
        .resolve()
        .unwrap();

    let server = start(config, quiet()).await.unwrap();
    let root: Value = reqwest::get(format!("{}/node", server.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["rootInFile"], json!(true));

    let missing = reqwest::get(format!("{}/node/b", server.url())).await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    server.close().await.unwrap();
}

#[tokio::test]
async fn test_second_start_on_bound_port_fails() {
    let options = TreeOptions::new().host("127.0.0.1").data_object(json!({}));

    let first = start(options.clone().port(0).resolve().unwrap(), quiet())
        .await
        .unwrap();
    let port = first.local_addr().port();

    let second = start(options.clone().port(port).resolve().unwrap(), quiet()).await;
    assert!(matches!(second, Err(ServerError::Bind(_))));

    first.close().await.unwrap();

    let third = start(options.port(port).resolve().unwrap(), quiet())
        .await
        .unwrap();
    assert_eq!(third.local_addr().port(), port);
    third.close().await.unwrap();
}

#[tokio::test]
async fn test_unloadable_data_never_binds() {
    let config = TreeOptions::new()
        .host("127.0.0.1")
        .port(0)
        .data_file("/no/such/fileTree.json")
        .resolve()
        .unwrap();

    let result = start(config, quiet()).await;
    assert!(matches!(result, Err(ServerError::Config(_))));
}
