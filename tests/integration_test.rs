//! Integration tests for the IPFS API client
//!
//! These tests drive `IpfsClient` over real HTTP against a mock daemon.

use ipfs_client::{ClientError, FileAddResult, FileUpload, IpfsClient, IpfsConfig};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FOO_HASH: &str = "QmWPyMW2u7J2Zyzut7TcBMT8pG6F2cB4hmZk1vBJFBt1nP";
const BAR_HASH: &str = "QmVjQsMgtRsRKpNM8amTCDRuUPriY8tGswsTpo137jPWwL";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ipfs_client=debug")
        .with_test_writer()
        .try_init();
}

fn client_for(server: &MockServer) -> IpfsClient {
    init_tracing();
    IpfsClient::new(IpfsConfig::with_url(server.uri())).unwrap()
}

/// Add two files and fold the daemon's progress stream
#[tokio::test]
async fn test_files_add_end_to_end() {
    let server = MockServer::start().await;
    let progress = format!(
        "{{\"Name\":\"foo.txt\",\"Bytes\":4}}\n\
         {{\"Name\":\"foo.txt\",\"Hash\":\"{}\"}}\n\
         {{\"Name\":\"bar.txt\",\"Bytes\":1176}}\n\
         {{\"Name\":\"bar.txt\",\"Hash\":\"{}\"}}\n",
        FOO_HASH, BAR_HASH
    );
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .and(query_param("stream-channels", "true"))
        .and(query_param("json", "true"))
        .and(query_param("encoding", "json"))
        .and(query_param("progress", "true"))
        .and(body_string_contains("filename=\"foo.txt\""))
        .and(body_string_contains("filename=\"bar.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(progress))
        .expect(1)
        .mount(&server)
        .await;

    let bar_content = "x".repeat(1176);
    let mut bar_file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut bar_file, bar_content.as_bytes()).unwrap();

    let client = client_for(&server);
    let results = client
        .files_add(&[
            FileUpload::from_bytes("foo.txt", "abcd"),
            FileUpload::from_path("bar.txt", bar_file.path()),
        ])
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![
            FileAddResult {
                path: "foo.txt".to_string(),
                hash: Some(json!(FOO_HASH)),
                size: Some(json!(4)),
            },
            FileAddResult {
                path: "bar.txt".to_string(),
                hash: Some(json!(BAR_HASH)),
                size: Some(json!(1176)),
            },
        ]
    );
    assert_eq!(
        serde_json::to_value(&results).unwrap(),
        json!([
            {"path": "foo.txt", "hash": FOO_HASH, "size": 4},
            {"path": "bar.txt", "hash": BAR_HASH, "size": 1176},
        ])
    );
}

/// Scoped config reads return the bare value
#[tokio::test]
async fn test_config_roundtrip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/config"))
        .and(query_param("arg", "Datastore"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"Key":"Datastore","Value":{"GCPeriod":"1h"}}"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/config/show"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"Datastore":{"GCPeriod":"1h"}}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.config_get("Datastore").await.unwrap(),
        json!({"GCPeriod": "1h"})
    );
    assert_eq!(
        client.config_get("").await.unwrap(),
        json!({"Datastore": {"GCPeriod": "1h"}})
    );
}

/// A temporary config write can be undone with the value read before it
#[tokio::test]
async fn test_config_set_then_restore_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/config"))
        .and(query_param("arg", "Datastore.StorageMax"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"Key":"Datastore.StorageMax","Value":"10GB"}"#),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let previous = client.config_get("Datastore.StorageMax").await.unwrap();
    assert_eq!(previous, json!("10GB"));
    client
        .config_set("Datastore.StorageMax", &json!("20GB"))
        .await
        .unwrap();
    client
        .config_set("Datastore.StorageMax", &previous)
        .await
        .unwrap();

    let queries: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.query().unwrap_or_default().to_string())
        .collect();
    assert!(queries[1].ends_with("&arg=Datastore.StorageMax&arg=%2220GB%22"));
    assert!(queries[2].ends_with("&arg=Datastore.StorageMax&arg=%2210GB%22"));
}

/// Config replace ships the document as a file part
#[tokio::test]
async fn test_config_replace_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/config/replace"))
        .and(body_string_contains("filename=\"new_config.json\""))
        .and(body_string_contains(r#"{"Datastore":{"GCPeriod":"2h"}}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .config_replace(&json!({"Datastore": {"GCPeriod": "2h"}}))
        .await
        .unwrap();
}

/// Raw content reaches the caller's sink untouched
#[tokio::test]
async fn test_files_get_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/cat"))
        .and(query_param("arg", "/ipfs/QmDir/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"Hello and Welcome to IPFS!".to_vec()))
        .mount(&server)
        .await;

    let mut content = Vec::new();
    client_for(&server)
        .files_get("/ipfs/QmDir/readme", &mut content)
        .await
        .unwrap();
    assert_eq!(content, b"Hello and Welcome to IPFS!");
}

/// A daemon error page surfaces as a transport failure
#[tokio::test]
async fn test_daemon_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/block/stat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("blockservice: key not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).block_stat("QmMissing").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(ref m) if m.contains("key not found")));
}

/// A successful status with a non-JSON body is a malformed response
#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).version().await.unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("<html>proxy error</html>"));
}

/// One bad progress line voids the whole add
#[tokio::test]
async fn test_truncated_progress_fails_whole_add() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "{{\"Name\":\"foo.txt\",\"Hash\":\"{}\"}}\n{{\"Name\":\"bar.t",
            FOO_HASH
        )))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .files_add(&[
            FileUpload::from_bytes("foo.txt", "abcd"),
            FileUpload::from_bytes("bar.txt", "efgh"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MalformedLine { line: 2, .. }));
}

/// Concurrent calls share one client
#[tokio::test]
async fn test_concurrent_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/object/stat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"NumLinks":0}"#))
        .expect(8)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.object_stat(&format!("QmObj{}", i)).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap()["NumLinks"], 0);
    }
}
