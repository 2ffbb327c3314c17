//! Gemini provider against a mock HTTP server.

mod common;

use mockito::Matcher;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use common::mock_server::{MockServerFixture, API_KEY};
use tripgen::{ErrorKind, ItineraryParams, PhraseSheetParams, TravelPlanner};

const PHRASES_JSON: &str = r#"{"language": "Portuguese", "phrases": [
    {"english": "Thank you", "translation": "Obrigado", "pronunciation": "oh-bree-GAH-doo"}
]}"#;

#[tokio::test]
async fn phrase_sheet_over_http() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_text(PHRASES_JSON, 1).await;
    let planner = TravelPlanner::new(fixture.client());

    let sheet = planner
        .generate_phrase_sheet(&PhraseSheetParams::new("Lisbon"), &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(sheet.language, "Portuguese");
    assert_eq!(sheet.phrases[0].translation, "Obrigado");
}

#[tokio::test]
async fn request_body_carries_schema_and_mime_type() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", MockServerFixture::path().as_str())
            .match_header("x-goog-api-key", API_KEY)
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .with_status(200)
            .with_body(
                json!({"candidates": [{"content": {"parts": [{"text": PHRASES_JSON}]}}]})
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await
    };

    TravelPlanner::new(fixture.client())
        .generate_phrase_sheet(&PhraseSheetParams::new("Lisbon"), &CancellationToken::new())
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn rate_limit_is_retried_then_classified() {
    let fixture = MockServerFixture::new().await;
    // 1 call + 2 retries, all throttled.
    let mock = fixture
        .mock_error(429, "RESOURCE_EXHAUSTED", "Quota exceeded for requests per minute.", 3)
        .await;

    let err = TravelPlanner::new(fixture.client())
        .generate_phrase_sheet(&PhraseSheetParams::new("Lisbon"), &CancellationToken::new())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert!(!err.user_message().contains("Quota exceeded"));
}

#[tokio::test]
async fn permission_denied_is_not_retried() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error(403, "PERMISSION_DENIED", "Method doesn't allow unregistered callers.", 1)
        .await;

    let err = TravelPlanner::new(fixture.client())
        .generate_itinerary(&ItineraryParams::new("Lisbon", 2), &CancellationToken::new())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Permission);
    assert_eq!(err.context().stage.as_deref(), Some("grounding"));
}

#[tokio::test]
async fn rejected_key_is_a_configuration_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error(400, "INVALID_ARGUMENT", "API key not valid. Please pass a valid API key.", 1)
        .await;

    let err = TravelPlanner::new(fixture.client())
        .generate_phrase_sheet(&PhraseSheetParams::new("Lisbon"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn server_error_body_without_json() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json(500, "upstream exploded", 1).await;

    let err = TravelPlanner::new(fixture.client())
        .generate_phrase_sheet(&PhraseSheetParams::new("Lisbon"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let fixture = MockServerFixture::new().await;
    // Nothing listens on port 9 of the loopback interface.
    let config = fixture.config().with_base_url("http://127.0.0.1:9/v1beta");
    let client = std::sync::Arc::new(tripgen::GenAiClient::from_config(&config).unwrap());

    let err = TravelPlanner::new(client)
        .generate_phrase_sheet(&PhraseSheetParams::new("Lisbon"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}
