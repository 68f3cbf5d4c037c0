use std::path::PathBuf;
use std::time::Duration;

use photopro_engine::{
    clear_all_with_fallback, ClientSettings, CleanupRoute, FailureKind, OperationKind,
    ProcessRequest, ProcessingApi, RemoteFileKind, ReqwestApiClient, UploadFile,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestApiClient {
    ReqwestApiClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

fn upload(dir: &TempDir, name: &str) -> UploadFile {
    let path: PathBuf = dir.path().join(name);
    std::fs::write(&path, "fake image bytes").unwrap();
    UploadFile {
        path,
        name: name.to_string(),
        media_type: Some("image/png".to_string()),
    }
}

#[tokio::test]
async fn convert_posts_multipart_and_parses_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process"))
        .and(body_string_contains("name=\"format\""))
        .and(body_string_contains("webp"))
        .and(body_string_contains("name=\"action\""))
        .and(body_string_contains("convert"))
        .and(body_string_contains("fake image bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "download_url": "/api/download/abc.webp",
            "filename": "abc.webp",
            "width": 800,
            "height": 600,
            "file_size": 4096,
            "format": "WEBP"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = ProcessRequest {
        kind: OperationKind::Convert,
        file: upload(&dir, "photo.png"),
        option: "webp".to_string(),
    };

    let outcome = client_for(&server).process(&request).await.expect("success");
    assert_eq!(outcome.download_url, "/api/download/abc.webp");
    assert_eq!((outcome.width, outcome.height), (800, 600));
    assert_eq!(outcome.file_size, 4096);
    assert_eq!(outcome.format.as_deref(), Some("WEBP"));
    assert_eq!(outcome.scale_factor, None);
}

#[tokio::test]
async fn upscale_sends_model_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process"))
        .and(body_string_contains("name=\"model\""))
        .and(body_string_contains("realesrgan-x4plus"))
        .and(body_string_contains("upscale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "download_url": "/api/download/x_upscaled.png",
            "width": 400,
            "height": 400,
            "file_size": 10,
            "scale_factor": 4,
            "method": "real_esrgan"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = ProcessRequest {
        kind: OperationKind::Upscale,
        file: upload(&dir, "small.png"),
        option: "realesrgan-x4plus".to_string(),
    };
    let outcome = client_for(&server).process(&request).await.unwrap();
    assert_eq!(outcome.scale_factor, Some(4));
    assert_eq!(outcome.method.as_deref(), Some("real_esrgan"));
}

#[tokio::test]
async fn non_2xx_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "boom"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = ProcessRequest {
        kind: OperationKind::Convert,
        file: upload(&dir, "a.png"),
        option: "jpg".to_string(),
    };
    let err = client_for(&server).process(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.message, "Server error: 500");
}

#[tokio::test]
async fn application_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Unsupported file format"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = ProcessRequest {
        kind: OperationKind::Convert,
        file: upload(&dir, "a.png"),
        option: "jpg".to_string(),
    };
    let err = client_for(&server).process(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.message, "Unsupported file format");
}

#[tokio::test]
async fn malformed_body_is_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = ProcessRequest {
        kind: OperationKind::Convert,
        file: upload(&dir, "a.png"),
        option: "jpg".to_string(),
    };
    let err = client_for(&server).process(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn missing_input_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = ProcessRequest {
        kind: OperationKind::Convert,
        file: UploadFile {
            path: PathBuf::from("/definitely/not/here.png"),
            name: "here.png".to_string(),
            media_type: None,
        },
        option: "jpg".to_string(),
    };
    let err = client_for(&server).process(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn upscaler_probe_reads_available_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/real_esrgan_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": true,
            "executable": true,
            "models_available": true
        })))
        .mount(&server)
        .await;

    assert!(client_for(&server).upscaler_available().await.unwrap());
}

#[tokio::test]
async fn list_files_parses_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "files": [
                {"name": "a_upscaled.png", "size": 2048, "url": "/api/download/a_upscaled.png",
                 "type": "upscaled", "width": 400, "height": 300},
                {"name": "b.jpg", "size": 10, "url": "/api/download/b.jpg", "type": "converted",
                 "width": 0, "height": 0},
                {"name": "c.raw", "size": 1, "url": "/api/download/c.raw", "type": "processed"}
            ]
        })))
        .mount(&server)
        .await;

    let files = client_for(&server).list_files().await.unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files[0].kind, RemoteFileKind::Upscaled);
    assert_eq!(files[0].width, Some(400));
    assert_eq!(files[1].kind, RemoteFileKind::Converted);
    assert_eq!(files[2].kind, RemoteFileKind::Processed);
    assert_eq!(files[2].height, None);
}

#[tokio::test]
async fn cleanup_failure_falls_back_to_delete_all() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cleanup"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "busy"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete_all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "deleted_count": 4,
            "message": "deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = clear_all_with_fallback(&client).await.unwrap();
    assert_eq!(report.route, CleanupRoute::DeleteAll);
    assert_eq!(report.deleted_count, 4);
}

#[tokio::test]
async fn cleanup_success_reports_errors_and_skips_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cleanup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "deleted_count": 3,
            "total_files": 4,
            "errors": ["x.png: permission denied"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete_all"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = clear_all_with_fallback(&client_for(&server)).await.unwrap();
    assert_eq!(report.route, CleanupRoute::Cleanup);
    assert_eq!(report.deleted_count, 3);
    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
async fn download_resolves_relative_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3, 4]))
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .download("/api/download/out.png")
        .await
        .unwrap();
    assert_eq!(bytes, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn download_respects_size_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/big.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .mount(&server)
        .await;

    let client = ReqwestApiClient::new(ClientSettings {
        base_url: server.uri(),
        max_download_bytes: 16,
        ..ClientSettings::default()
    })
    .unwrap();
    let err = client.download("/api/download/big.png").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::TooLarge { max_bytes: 16 });
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"success": true, "files": []})),
        )
        .mount(&server)
        .await;

    let client = ReqwestApiClient::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .unwrap();
    let err = client.list_files().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestApiClient::new(ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
