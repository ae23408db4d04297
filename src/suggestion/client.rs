//! HTTP client for the streaming suggestion endpoint

use futures::StreamExt;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::extractor::ExtractedValue;
use super::step::WizardStep;
use super::stream::{SseDecoder, StreamEvent, SuggestionAccumulator, SuggestionUpdate};
use crate::config::SuggestionConfig;
use crate::error::{PlannerError, Result};
use crate::plan::BusinessPlan;

#[derive(Debug, Serialize)]
struct SuggestionRequest {
    step: WizardStep,
}

/// Non-streaming JSON body the endpoint returns for rejected requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// A completed suggestion
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub step: WizardStep,
    pub text: String,
    pub value: Option<ExtractedValue>,
    /// Whether the text ended with a `FINAL SUGGESTION` amount
    pub is_final: bool,
}

impl Suggestion {
    pub fn value(&self) -> Result<f64> {
        self.value.map(|v| v.value).ok_or(PlannerError::NoSuggestion)
    }

    /// Write the suggested value into the matching plan field
    pub fn apply_to(&self, plan: &mut BusinessPlan) -> Result<f64> {
        let value = self.value()?;
        self.step.apply(plan, value);
        Ok(value)
    }
}

pub struct SuggestionClient {
    client: Client,
    endpoint: String,
}

impl SuggestionClient {
    pub fn new(config: &SuggestionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch(&self, step: WizardStep) -> Result<Suggestion> {
        self.fetch_with(step, |_| {}).await
    }

    /// Request a suggestion and report progress after every content event
    ///
    /// Chunks are processed strictly in arrival order. An `error` event ends
    /// the request with `PlannerError::Stream`.
    pub async fn fetch_with<F>(&self, step: WizardStep, mut on_update: F) -> Result<Suggestion>
    where
        F: FnMut(SuggestionUpdate<'_>),
    {
        info!("Requesting {} suggestion from {}", step, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SuggestionRequest { step })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Endpoint { status: status.as_u16() });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        if is_json {
            let body: ErrorBody = response.json().await?;
            let message = body
                .error
                .unwrap_or_else(|| "endpoint returned JSON instead of a stream".to_string());
            return Err(PlannerError::Stream(message));
        }

        let mut decoder = SseDecoder::new();
        let mut accumulator = SuggestionAccumulator::new();
        let mut chunks = response.bytes_stream();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            debug!("Received {} byte chunk", chunk.len());
            for event in decoder.feed(&chunk) {
                handle_event(event, &mut accumulator, &mut on_update)?;
            }
        }
        if let Some(event) = decoder.finish() {
            handle_event(event, &mut accumulator, &mut on_update)?;
        }
        accumulator.finish();

        let suggestion = Suggestion {
            step,
            value: accumulator.best_value(),
            is_final: accumulator.is_final(),
            text: accumulator.into_text(),
        };
        info!(
            "Received {} suggestion: {:?} (final marker: {})",
            step,
            suggestion.value.map(|v| v.value),
            suggestion.is_final
        );
        Ok(suggestion)
    }
}

fn handle_event<F>(event: StreamEvent, accumulator: &mut SuggestionAccumulator, on_update: &mut F) -> Result<()>
where
    F: FnMut(SuggestionUpdate<'_>),
{
    match event {
        StreamEvent::Error(message) => Err(PlannerError::Stream(message)),
        StreamEvent::Content(delta) => {
            accumulator.push(&delta);
            on_update(SuggestionUpdate {
                delta: &delta,
                text: accumulator.text(),
                is_final: accumulator.is_final(),
            });
            Ok(())
        }
    }
}
