//! Wizard steps that can request a suggestion, and how one is applied

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::extractor::extract_number;
use crate::error::{PlannerError, Result};
use crate::plan::BusinessPlan;

/// A form field the suggestion endpoint can fill in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Price,
    Cost,
    Overhead,
    StartupCosts,
    MarketingBudget,
    SalesVolume,
    TimeHorizon,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Price,
        WizardStep::Cost,
        WizardStep::Overhead,
        WizardStep::StartupCosts,
        WizardStep::MarketingBudget,
        WizardStep::SalesVolume,
        WizardStep::TimeHorizon,
    ];

    /// Name sent to the suggestion endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Price => "price",
            WizardStep::Cost => "cost",
            WizardStep::Overhead => "overhead",
            WizardStep::StartupCosts => "startup_costs",
            WizardStep::MarketingBudget => "marketing_budget",
            WizardStep::SalesVolume => "sales_volume",
            WizardStep::TimeHorizon => "time_horizon",
        }
    }

    /// Plan field written when a suggestion is accepted
    pub fn field_name(&self) -> &'static str {
        match self {
            WizardStep::Price => "price_per_unit",
            WizardStep::Cost => "cost_per_unit",
            WizardStep::Overhead => "overhead_costs",
            WizardStep::StartupCosts => "startup_costs",
            WizardStep::MarketingBudget => "marketing_budget",
            WizardStep::SalesVolume => "target_volume",
            WizardStep::TimeHorizon => "time_horizon_months",
        }
    }

    pub fn apply(&self, plan: &mut BusinessPlan, value: f64) {
        match self {
            WizardStep::Price => plan.price_per_unit = value,
            WizardStep::Cost => plan.cost_per_unit = value,
            WizardStep::Overhead => plan.overhead_costs = value,
            WizardStep::StartupCosts => plan.startup_costs = value,
            WizardStep::MarketingBudget => plan.marketing_budget = value,
            WizardStep::SalesVolume => plan.target_volume = value,
            WizardStep::TimeHorizon => {
                plan.time_horizon_months = Some(value.round().clamp(0.0, u32::MAX as f64) as u32)
            }
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        WizardStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| PlannerError::InvalidStep(s.to_string()))
    }
}

/// Extract a number from suggestion text and write it into the plan
///
/// Returns the value that was applied.
pub fn apply_suggestion(plan: &mut BusinessPlan, step: WizardStep, text: &str) -> Result<f64> {
    let found = extract_number(text).ok_or(PlannerError::NoSuggestion)?;
    step.apply(plan, found.value);
    info!(
        "Applied {} suggestion {} to {} ({:?})",
        step,
        found.value,
        step.field_name(),
        found.kind
    );
    Ok(found.value)
}
