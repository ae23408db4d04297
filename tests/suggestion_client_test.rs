use breakeven_planner::suggestion::{MatchKind, SuggestionClient, WizardStep};
use breakeven_planner::{BusinessPlan, PlannerError, SuggestionConfig};
use httpmock::prelude::*;
use serde_json::json;

const ENDPOINT_PATH: &str = "/product/get_ai_suggestion";

fn sse(chunks: &[&str]) -> String {
    chunks
        .iter()
        .map(|c| format!("data: {}\n\n", json!({ "content": c })))
        .collect()
}

fn client_for(server: &MockServer) -> SuggestionClient {
    let config = SuggestionConfig {
        endpoint: server.url(ENDPOINT_PATH),
        timeout_secs: 10,
    };
    SuggestionClient::new(&config).expect("client builds")
}

#[tokio::test]
async fn test_streams_price_suggestion() {
    let server = MockServer::start_async().await;
    let body = sse(&[
        "Market analysis: similar candles sell for $28-$40.\n",
        "FINAL SUGGESTION: $3",
        "4.99\n",
    ]);

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(ENDPOINT_PATH)
                .json_body(json!({ "step": "price" }));
            then.status(200)
                .header("Content-Type", "text/event-stream")
                .body(body);
        })
        .await;

    let client = client_for(&server);
    let mut updates = Vec::new();
    let suggestion = client
        .fetch_with(WizardStep::Price, |update| {
            updates.push((update.text.to_string(), update.is_final));
        })
        .await
        .expect("suggestion streams");

    mock.assert_async().await;

    assert_eq!(updates.len(), 3);
    assert!(!updates[0].1);
    assert!(!updates[1].1, "a partial amount is not final yet");
    assert!(updates[2].1);

    assert!(suggestion.is_final);
    assert!(suggestion.text.ends_with("FINAL SUGGESTION: $34.99\n"));
    let value = suggestion.value.unwrap();
    assert_eq!(value.value, 34.99);
    assert_eq!(value.kind, MatchKind::FinalSuggestion);
}

#[tokio::test]
async fn test_applies_suggestion_to_plan() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT_PATH);
            then.status(200)
                .header("Content-Type", "text/event-stream")
                .body(sse(&["Rent and payroll come to about $7,400 a month."]));
        })
        .await;

    let suggestion = client_for(&server)
        .fetch(WizardStep::Overhead)
        .await
        .unwrap();
    assert!(!suggestion.is_final);

    let mut plan = BusinessPlan::new(30.0, 12.0, 600.0, 0.0, 500.0, 15_000.0);
    let applied = suggestion.apply_to(&mut plan).unwrap();
    assert_eq!(applied, 7400.0);
    assert_eq!(plan.overhead_costs, 7400.0);
}

#[tokio::test]
async fn test_error_event_fails_request() {
    let server = MockServer::start_async().await;
    let body = format!(
        "{}data: {}\n\n",
        sse(&["Analyzing costs"]),
        json!({ "error": "Rate limit reached" })
    );
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT_PATH);
            then.status(200)
                .header("Content-Type", "text/event-stream")
                .body(body);
        })
        .await;

    let result = client_for(&server).fetch(WizardStep::Cost).await;
    match result {
        Err(PlannerError::Stream(message)) => assert_eq!(message, "Rate limit reached"),
        other => panic!("expected stream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT_PATH);
            then.status(500).body("internal error");
        })
        .await;

    let result = client_for(&server).fetch(WizardStep::Price).await;
    assert!(matches!(result, Err(PlannerError::Endpoint { status: 500 })));
}

#[tokio::test]
async fn test_json_rejection_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT_PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "error": "Invalid step specified" }));
        })
        .await;

    let result = client_for(&server).fetch(WizardStep::TimeHorizon).await;
    match result {
        Err(PlannerError::Stream(message)) => assert_eq!(message, "Invalid step specified"),
        other => panic!("expected stream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_response_without_number() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT_PATH);
            then.status(200)
                .header("Content-Type", "text/event-stream")
                .body(sse(&["I need more detail about your product first."]));
        })
        .await;

    let suggestion = client_for(&server).fetch(WizardStep::SalesVolume).await.unwrap();
    assert!(suggestion.value.is_none());
    assert!(matches!(suggestion.value(), Err(PlannerError::NoSuggestion)));
}
