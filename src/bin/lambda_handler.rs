//! AWS Lambda handler serving chart projections
//!
//! Accepts a plan (and optional projection settings) as JSON and returns the
//! summary plus every chart series. Supports Lambda Function URLs for direct
//! HTTP access from the wizard front end.

use breakeven_planner::{BusinessPlan, ProjectionConfig, ProjectionEngine, ProjectionResult};
use chrono::{DateTime, Utc};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{error, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    pub plan: BusinessPlan,

    /// Overrides for the default projection settings
    #[serde(default)]
    pub config: Option<ProjectionConfig>,
}

#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub generated_at: DateTime<Utc>,
    pub execution_time_ms: u64,
    pub result: ProjectionResult,
}

fn cors(builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message }).to_string();
    Ok(cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body))?)
}

fn json_response(body: &ProjectionResponse) -> Result<Response<Body>, Error> {
    Ok(cors(Response::builder())
        .status(200)
        .header("Content-Type", "application/json")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    if event.method().as_str() == "OPTIONS" {
        return Ok(cors(Response::builder()).status(200).body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => return error_response(400, "Request body must contain a plan"),
    };

    let request: ProjectionRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    let config = request.config.unwrap_or_default();
    if let Err(e) = config.validate() {
        return error_response(400, &e.to_string());
    }

    let engine = ProjectionEngine::new(config);
    let result = match engine.project(&request.plan) {
        Ok(result) => result,
        Err(e) => {
            error!("Projection failed for plan {}: {}", request.plan.plan_id, e);
            return error_response(400, &e.to_string());
        }
    };

    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!("Projected plan {} in {} ms", result.plan_id, execution_time_ms);

    json_response(&ProjectionResponse {
        generated_at: Utc::now(),
        execution_time_ms,
        result,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
