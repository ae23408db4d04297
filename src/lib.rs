//! Break-even planner - projection and suggestion toolkit for business-planning wizards
//!
//! This library provides:
//! - Break-even, margin, runway, cost-structure and price-sensitivity series
//! - Cumulative profit and revenue-vs-cost projections
//! - Best-effort numeric extraction from AI-generated suggestion text
//! - A streaming client for the wizard's suggestion endpoint

pub mod config;
pub mod error;
pub mod plan;
pub mod projection;
pub mod scenario;
pub mod suggestion;

// Re-export commonly used types
pub use config::{PlannerConfig, SuggestionConfig};
pub use error::{PlannerError, Result};
pub use plan::BusinessPlan;
pub use projection::{Outcome, ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use scenario::ScenarioRunner;
pub use suggestion::{extract_number, Suggestion, SuggestionClient, WizardStep};
