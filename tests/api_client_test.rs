//! Integration tests for the backend API client, backed by mockito

use karya::adapters::api::{HttpPortfolioApi, PortfolioApi};
use karya::config::{secret_from, ApiConfig, RetryConfig};
use karya::domain::errors::ApiError;
use karya::domain::{BlockPayload, ExportScope, JurusanId, KaryaError, SeriesId};

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        token: None,
        timeout_seconds: 5,
        retry: RetryConfig {
            // single attempt keeps error-path tests fast
            max_retries: 1,
            initial_delay_ms: 1,
            max_delay_ms: 10,
            backoff_multiplier: 1.0,
        },
    }
}

fn series_id(id: i64) -> SeriesId {
    SeriesId::new(id).unwrap()
}

const DATASET_BODY: &str = r#"{
    "series": {
        "id": 3,
        "nama": "Demo Day 2024",
        "blocks": [
            {"block_order": 1, "instruksi": "Ceritakan karyamu"},
            {"block_order": 2}
        ]
    },
    "portfolios": [
        {
            "id": 10,
            "judul": "Robot Line Follower",
            "created_at": "2024-05-01T08:00:00Z",
            "thumbnail_url": "https://cdn.example/thumb-10.png",
            "user": {
                "username": "alice",
                "nama": "Alice Wijaya",
                "avatar_url": "https://cdn.example/avatar-alice.png",
                "kelas_nama": "XII RPL 1",
                "jurusan_nama": "RPL",
                "nisn": "0051234567",
                "nis": "2111"
            },
            "content_blocks": [
                {"id": 1, "block_order": 1, "block_type": "text",
                 "payload": {"content": "Robot ini mengikuti garis."}},
                {"id": 2, "block_order": 2, "block_type": "image",
                 "payload": {"url": "https://cdn.example/photo-1.png", "caption": "Prototipe"}},
                {"id": 3, "block_order": 3, "block_type": "hologram",
                 "payload": {"beam": true}}
            ]
        }
    ]
}"#;

#[tokio::test]
async fn test_get_export_preview_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series/3/export/preview")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"portfolio_count": 12, "user_count": 8, "estimated_pages": 12}"#)
        .create_async()
        .await;

    let api = HttpPortfolioApi::new(&api_config(&server.url())).unwrap();
    let preview = api
        .get_export_preview(series_id(3), &ExportScope::new())
        .await
        .unwrap();

    assert_eq!(preview.portfolio_count, 12);
    assert_eq!(preview.user_count, 8);
    assert!(preview.allows_export());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_scope_filters_forwarded_as_query_params() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series/3/export/preview")
        .match_query(mockito::Matcher::UrlEncoded(
            "jurusan_id".into(),
            "7".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"portfolio_count": 1, "user_count": 1, "estimated_pages": 1}"#)
        .create_async()
        .await;

    let api = HttpPortfolioApi::new(&api_config(&server.url())).unwrap();
    let scope = ExportScope::new().with_jurusan(JurusanId::new(7).unwrap());
    api.get_export_preview(series_id(3), &scope).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_token_sent_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series/3/export/preview")
        .match_header("authorization", "Bearer tok-abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"portfolio_count": 1, "user_count": 1, "estimated_pages": 1}"#)
        .create_async()
        .await;

    let mut config = api_config(&server.url());
    config.token = Some(secret_from("tok-abc"));
    let api = HttpPortfolioApi::new(&config).unwrap();
    api.get_export_preview(series_id(3), &ExportScope::new())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_export_dataset_parses_typed_blocks() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/series/3/export")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DATASET_BODY)
        .create_async()
        .await;

    let api = HttpPortfolioApi::new(&api_config(&server.url())).unwrap();
    let dataset = api
        .get_export_dataset(series_id(3), &ExportScope::new())
        .await
        .unwrap();

    assert_eq!(dataset.series.nama, "Demo Day 2024");
    assert_eq!(dataset.series.instruction_for(1), Some("Ceritakan karyamu"));
    assert_eq!(dataset.portfolios.len(), 1);

    let blocks = &dataset.portfolios[0].content_blocks;
    assert!(matches!(blocks[0].payload, BlockPayload::Text { .. }));
    assert!(matches!(blocks[1].payload, BlockPayload::Image { .. }));
    // future variants must fall back, not fail the fetch
    assert!(matches!(blocks[2].payload, BlockPayload::Unknown));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series/9/export")
        .with_status(404)
        .with_body("series not found")
        .expect(1)
        .create_async()
        .await;

    let mut config = api_config(&server.url());
    config.retry.max_retries = 3;
    let api = HttpPortfolioApi::new(&config).unwrap();
    let err = api
        .get_export_dataset(series_id(9), &ExportScope::new())
        .await
        .unwrap_err();

    match err {
        KaryaError::Api(ApiError::ClientError { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("series not found"));
        }
        other => panic!("Expected ClientError, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried_then_surfaces() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series/3/export")
        .with_status(502)
        .with_body("bad gateway")
        .expect(2)
        .create_async()
        .await;

    let mut config = api_config(&server.url());
    config.retry.max_retries = 2;
    let api = HttpPortfolioApi::new(&config).unwrap();
    let err = api
        .get_export_dataset(series_id(3), &ExportScope::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        KaryaError::Api(ApiError::ServerError { status: 502, .. })
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/series/3/export/preview")
        .with_status(401)
        .create_async()
        .await;

    let api = HttpPortfolioApi::new(&api_config(&server.url())).unwrap();
    let err = api
        .get_export_preview(series_id(3), &ExportScope::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        KaryaError::Api(ApiError::AuthenticationFailed(_))
    ));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/series/3/export/preview")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{not json")
        .create_async()
        .await;

    let api = HttpPortfolioApi::new(&api_config(&server.url())).unwrap();
    let err = api
        .get_export_preview(series_id(3), &ExportScope::new())
        .await
        .unwrap_err();

    assert!(matches!(err, KaryaError::Api(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_empty_portfolio_list_is_parsed_not_rejected() {
    // the pipeline, not the client, decides that empty means abort
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/series/3/export")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"series": {"id": 3, "nama": "Kosong", "blocks": []}, "portfolios": []}"#)
        .create_async()
        .await;

    let api = HttpPortfolioApi::new(&api_config(&server.url())).unwrap();
    let dataset = api
        .get_export_dataset(series_id(3), &ExportScope::new())
        .await
        .unwrap();

    assert!(dataset.is_empty());
}
