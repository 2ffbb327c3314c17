//! Two-phase pipeline behaviour over a scripted provider.

mod common;

use serde_json::json;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use common::{client_with, grounded, rate_limited, text, ScriptedProvider};
use tripgen::operations::schemas::{ITINERARY, PACKING_CHECKLIST};
use tripgen::{ErrorKind, GenerationPipeline, OperationRequest, PipelineStage};

const DEFAULT: &str = "We couldn't build your itinerary right now.";

const ITINERARY_JSON: &str = r#"{
    "destination": "Kyoto",
    "summary": "Temples and gardens.",
    "days": [{"day": 1, "title": "Higashiyama", "activities": [
        {"time": "09:00", "name": "Kiyomizu-dera", "description": "Hillside temple."}
    ]}]
}"#;

fn itinerary_request() -> OperationRequest {
    OperationRequest::new("generate_itinerary", &ITINERARY, "2 days in Kyoto", DEFAULT).grounded()
}

#[tokio::test]
async fn grounding_sources_are_reattached() {
    let provider = ScriptedProvider::new(vec![
        grounded(
            "Kiyomizu-dera opens at 6am.",
            &[
                ("https://kyoto.travel/temples", "Kyoto Travel"),
                ("https://jnto.go.jp/kyoto", "JNTO"),
            ],
        ),
        text(ITINERARY_JSON),
    ]);
    let pipeline = GenerationPipeline::new(client_with(provider.clone()));

    let generation = pipeline
        .run(&itinerary_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        generation.data["sources"],
        json!([
            {"uri": "https://kyoto.travel/temples", "title": "Kyoto Travel"},
            {"uri": "https://jnto.go.jp/kyoto", "title": "JNTO"}
        ])
    );
    assert_eq!(generation.sources.len(), 2);
    assert_eq!(
        generation.stages,
        vec![
            PipelineStage::Idle,
            PipelineStage::Grounding,
            PipelineStage::Formatting,
            PipelineStage::Parsed,
            PipelineStage::Done
        ]
    );
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn non_conforming_reply_is_a_schema_error() {
    let provider = ScriptedProvider::new(vec![
        grounded("notes", &[]),
        text(r#"{"destination": "Kyoto", "days": "two"}"#),
    ]);
    let pipeline = GenerationPipeline::new(client_with(provider.clone()));

    let err = pipeline
        .run(&itinerary_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(err.user_message(), DEFAULT);
    assert_eq!(err.context().stage.as_deref(), Some("formatting"));
    // One grounding call, exactly one formatting call.
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn unparsable_reply_is_a_schema_error() {
    let provider = ScriptedProvider::new(vec![text("Here is your list: socks, passport")]);
    let pipeline = GenerationPipeline::new(client_with(provider.clone()));
    let request = OperationRequest::new("generate_packing_checklist", &PACKING_CHECKLIST, "pack", DEFAULT);

    let err = pipeline.run(&request, &CancellationToken::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_grounding_is_retried_with_backoff() {
    let provider = ScriptedProvider::new(vec![
        rate_limited(),
        grounded("notes", &[("https://a.example", "A")]),
        text(ITINERARY_JSON),
    ]);
    let pipeline = GenerationPipeline::new(client_with(provider.clone()));
    let start = Instant::now();

    let generation = pipeline
        .run(&itinerary_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(generation.sources.len(), 1);
    assert_eq!(provider.calls(), 3);
    assert!(start.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn persistent_rate_limit_surfaces_after_three_calls() {
    let provider = ScriptedProvider::new(vec![rate_limited(), rate_limited(), rate_limited()]);
    let pipeline = GenerationPipeline::new(client_with(provider.clone()));
    let start = Instant::now();

    let err = pipeline
        .run(&itinerary_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.user_message(), ErrorKind::RateLimit.user_message());
    assert_eq!(provider.calls(), 3);
    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(3000) && waited < Duration::from_millis(3100));
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_backoff_stops_the_pipeline() {
    let provider = ScriptedProvider::new(vec![rate_limited(), text(ITINERARY_JSON)]);
    let pipeline = GenerationPipeline::new(client_with(provider.clone()));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let err = pipeline.run(&itinerary_request(), &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn validation_failure_is_not_retried() {
    let provider = ScriptedProvider::new(vec![Err(tripgen::TransportFailure::status(
        400,
        Some("INVALID_ARGUMENT"),
        "Request contains an invalid argument.",
    ))]);
    let pipeline = GenerationPipeline::new(client_with(provider.clone()));

    let err = pipeline
        .run(&itinerary_request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(provider.calls(), 1);
}
