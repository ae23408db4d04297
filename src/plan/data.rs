//! Business plan record collected by the planning wizard

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// A single business scenario
///
/// Every amount is a plain monthly figure except `startup_costs`, which is
/// the one-off capital needed before the first sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessPlan {
    /// Identifier used when several plans are run as a batch
    #[serde(default)]
    pub plan_id: u32,

    /// Selling price per unit
    pub price_per_unit: f64,

    /// Variable cost (cost of goods) per unit
    pub cost_per_unit: f64,

    /// Target monthly sales volume in units
    pub target_volume: f64,

    /// Monthly overhead (rent, salaries, insurance, ...)
    #[serde(default)]
    pub overhead_costs: f64,

    /// Monthly marketing spend
    #[serde(default)]
    pub marketing_budget: f64,

    /// One-off startup capital
    #[serde(default)]
    pub startup_costs: f64,

    /// Monthly revenue when provided directly instead of price × volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<f64>,

    /// Planning horizon entered on the last wizard step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_horizon_months: Option<u32>,
}

impl BusinessPlan {
    /// Create a plan from the core unit economics
    pub fn new(
        price_per_unit: f64,
        cost_per_unit: f64,
        target_volume: f64,
        overhead_costs: f64,
        marketing_budget: f64,
        startup_costs: f64,
    ) -> Self {
        Self {
            plan_id: 0,
            price_per_unit,
            cost_per_unit,
            target_volume,
            overhead_costs,
            marketing_budget,
            startup_costs,
            monthly_revenue: None,
            time_horizon_months: None,
        }
    }

    /// Monthly revenue, derived from price × volume unless provided
    pub fn monthly_revenue(&self) -> f64 {
        self.monthly_revenue
            .unwrap_or(self.price_per_unit * self.target_volume)
    }

    /// Overhead plus marketing
    pub fn monthly_fixed_costs(&self) -> f64 {
        self.overhead_costs + self.marketing_budget
    }

    /// Cost of goods at target volume
    pub fn monthly_variable_costs(&self) -> f64 {
        self.cost_per_unit * self.target_volume
    }

    pub fn monthly_costs(&self) -> f64 {
        self.monthly_variable_costs() + self.monthly_fixed_costs()
    }

    /// Price per unit minus variable cost per unit
    pub fn contribution_margin(&self) -> f64 {
        self.price_per_unit - self.cost_per_unit
    }

    /// Reject negative, NaN or infinite amounts before any projection runs
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("price_per_unit", self.price_per_unit),
            ("cost_per_unit", self.cost_per_unit),
            ("target_volume", self.target_volume),
            ("overhead_costs", self.overhead_costs),
            ("marketing_budget", self.marketing_budget),
            ("startup_costs", self.startup_costs),
        ];

        for (field, value) in fields {
            check_amount(field, value)?;
        }

        if let Some(revenue) = self.monthly_revenue {
            check_amount("monthly_revenue", revenue)?;
        }

        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlannerError::invalid_plan(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(PlannerError::invalid_plan(
            field,
            format!("must not be negative (got {})", value),
        ));
    }
    Ok(())
}
