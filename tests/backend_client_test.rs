use serde_json::json;
use thesis_export::error::TransportError;
use thesis_export::models::{ArtifactKind, PrepareRequest};
use thesis_export::{BackendClient, Config, Metadata, MetadataField, Transport, UploadBlob};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BackendClient {
    let config = Config {
        api_base_url: server.uri(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    BackendClient::new(&config).unwrap()
}

fn sample_request() -> PrepareRequest {
    let mut metadata = Metadata::default();
    metadata.set_field(MetadataField::Title, "Тема").unwrap();
    metadata.set_field(MetadataField::Author, "Автор").unwrap();
    metadata.set_field(MetadataField::Year, "2025").unwrap();
    PrepareRequest {
        session_id: "s1".to_string(),
        order: vec!["B".to_string(), "A".to_string()],
        metadata,
    }
}

#[tokio::test]
async fn upload_sends_multipart_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "s1",
            "files": [
                {"id": "A", "name": "titul.pdf", "type": "pdf"},
                {"id": "B", "name": "thesis.docx", "type": "docx", "size": 2048}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .upload(&[
            UploadBlob::new("titul.pdf", b"%PDF".to_vec()),
            UploadBlob::new("thesis.docx", b"PK".to_vec()),
        ])
        .await
        .unwrap();

    assert_eq!(response.session_id, "s1");
    assert_eq!(response.files.len(), 2);
    assert_eq!(response.files[0].size, 0);
    assert_eq!(response.files[1].size, 2048);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="files"; filename="titul.pdf""#));
    assert!(body.contains(r#"filename="thesis.docx""#));
    assert!(body.contains("application/pdf"));
}

#[tokio::test]
async fn prepare_posts_session_order_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/prepare"))
        .and(body_json(json!({
            "session_id": "s1",
            "order": ["B", "A"],
            "metadata": {"title": "Тема", "author": "Автор", "year": 2025}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "export_id": "exp123",
            "pdf_url": "/api/download/exp123",
            "metadata_url": "/api/metadata/exp123",
            "warnings": ["low scan resolution"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).prepare(&sample_request()).await.unwrap();

    assert_eq!(response.export_id, "exp123");
    assert_eq!(response.warnings, vec!["low scan resolution".to_string()]);
}

#[tokio::test]
async fn error_response_carries_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/prepare"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Session not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).prepare(&sample_request()).await.unwrap_err();

    match err {
        TransportError::Status {
            endpoint,
            status,
            detail,
        } => {
            assert_eq!(endpoint, "/api/prepare");
            assert_eq!(status, 404);
            assert_eq!(detail, "Session not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_without_detail_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/prepare"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client_for(&server).prepare(&sample_request()).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.detail(), "HTTP 500 Internal Server Error");
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/prepare"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = client_for(&server).prepare(&sample_request()).await.unwrap_err();
    assert!(matches!(err, TransportError::Decode { .. }));
}

#[tokio::test]
async fn fetches_artifacts_by_export_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/exp123"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/metadata/exp123"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(br#"{"export_id":"exp123"}"#.to_vec()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let pdf = client.fetch_artifact("exp123", ArtifactKind::Pdf).await.unwrap();
    let sidecar = client
        .fetch_artifact("exp123", ArtifactKind::Sidecar)
        .await
        .unwrap();

    assert_eq!(pdf, b"%PDF-1.7");
    assert_eq!(sidecar, br#"{"export_id":"exp123"}"#);
}

#[tokio::test]
async fn missing_artifact_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metadata/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Metadata not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_artifact("gone", ArtifactKind::Sidecar)
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "Metadata not found");
}

#[tokio::test]
async fn health_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "service": "vkr-export-api",
            "version": "1.0.0"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).health().await.unwrap();
    assert_eq!(status.status, "healthy");
    assert_eq!(status.service.as_deref(), Some("vkr-export-api"));
}

#[tokio::test]
async fn unreachable_backend_is_request_error() {
    let config = Config {
        api_base_url: "http://127.0.0.1:1".to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    let client = BackendClient::new(&config).unwrap();

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, TransportError::Request { .. }));
    assert_eq!(err.status(), None);
}
