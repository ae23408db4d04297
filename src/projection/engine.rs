//! Projection engine turning a business plan into chart series

use log::debug;
use serde::{Deserialize, Serialize};

use super::outcome::Outcome;
use super::series::{
    BreakEvenUnitsChart, Chart, CostSlice, CostStructure, CumulativeProfitChart, CumulativeRow,
    PlanSummary, PriceSensitivityChart, ProjectionResult, RevenueCostPoint, RevenueVsCostChart,
    SeriesPoint,
};
use crate::error::{PlannerError, Result};
use crate::plan::BusinessPlan;

/// Months of operating costs held in reserve on top of startup capital
pub const DEFAULT_RESERVE_MONTHS: f64 = 3.0;

/// Startup costs are spread over one year in the revenue-vs-cost view
pub const DEFAULT_AMORTIZATION_MONTHS: f64 = 12.0;

/// Unit grid used by the revenue-vs-cost view when no break-even exists
const FALLBACK_UNIT_STEP: u64 = 100;

/// Largest point count accepted for any volume, revenue or price axis
pub const MAX_SERIES_POINTS: usize = 1000;

/// Largest monthly horizon accepted (100 years)
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Number of points on the volume axis (0%, 25%, ... of target)
    pub volume_points: usize,

    /// Fraction of target volume between volume points
    pub volume_step_fraction: f64,

    /// Number of points on the revenue-achievement axis
    pub revenue_points: usize,

    /// Fraction of monthly revenue between runway points
    pub revenue_step_fraction: f64,

    /// Price sensitivity spans price × (1 ± band)
    pub price_band: f64,

    /// Dollar step between price sensitivity points
    pub price_step: f64,

    /// Upper bound on price sensitivity points
    pub max_price_points: usize,

    /// Months of operating costs added to startup costs as total investment
    pub reserve_months: f64,

    /// Cumulative profit runs this many times the break-even horizon
    pub horizon_multiplier: f64,

    /// Cumulative profit length when break-even is never reached
    pub fallback_horizon_months: u32,

    /// Upper bound on any monthly series
    pub max_horizon_months: u32,

    /// Months over which startup costs are amortized
    pub amortization_months: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            volume_points: 11,
            volume_step_fraction: 0.25,
            revenue_points: 11,
            revenue_step_fraction: 0.25,
            price_band: 0.2,
            price_step: 5.0,
            max_price_points: 200,
            reserve_months: DEFAULT_RESERVE_MONTHS,
            horizon_multiplier: 1.5,
            fallback_horizon_months: 36,
            max_horizon_months: 600,
            amortization_months: DEFAULT_AMORTIZATION_MONTHS,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.volume_points < 2 || self.revenue_points < 2 {
            return Err(PlannerError::config("volume_points and revenue_points must be at least 2"));
        }
        if self.volume_points > MAX_SERIES_POINTS || self.revenue_points > MAX_SERIES_POINTS {
            return Err(PlannerError::config(format!(
                "volume_points and revenue_points must not exceed {}",
                MAX_SERIES_POINTS
            )));
        }
        let positive = [
            ("volume_step_fraction", self.volume_step_fraction),
            ("revenue_step_fraction", self.revenue_step_fraction),
            ("price_step", self.price_step),
            ("horizon_multiplier", self.horizon_multiplier),
            ("amortization_months", self.amortization_months),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlannerError::config(format!("{} must be positive", name)));
            }
        }
        if !(self.price_band.is_finite() && (0.0..1.0).contains(&self.price_band)) {
            return Err(PlannerError::config("price_band must be in [0, 1)"));
        }
        if !(self.reserve_months.is_finite() && self.reserve_months >= 0.0) {
            return Err(PlannerError::config("reserve_months must not be negative"));
        }
        if self.max_horizon_months == 0 || self.max_price_points == 0 {
            return Err(PlannerError::config("max_horizon_months and max_price_points must be positive"));
        }
        if self.max_horizon_months > MAX_HORIZON_MONTHS {
            return Err(PlannerError::config(format!(
                "max_horizon_months must not exceed {}",
                MAX_HORIZON_MONTHS
            )));
        }
        if self.max_price_points > MAX_SERIES_POINTS {
            return Err(PlannerError::config(format!(
                "max_price_points must not exceed {}",
                MAX_SERIES_POINTS
            )));
        }
        if self.fallback_horizon_months > self.max_horizon_months {
            return Err(PlannerError::config("fallback_horizon_months must not exceed max_horizon_months"));
        }
        Ok(())
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run every chart for a single plan
    pub fn project(&self, plan: &BusinessPlan) -> Result<ProjectionResult> {
        plan.validate()?;

        let summary = self.summary(plan);
        debug!(
            "Projecting plan {}: profit {:.2}/month, break-even in {} months",
            plan.plan_id, summary.monthly_profit, summary.months_to_break_even
        );

        Ok(ProjectionResult {
            plan_id: plan.plan_id,
            break_even_units: self.break_even_units(plan),
            profit_margin: self.profit_margin(plan),
            cash_runway: self.cash_runway(plan),
            cost_structure: self.cost_structure(plan),
            price_sensitivity: self.price_sensitivity(plan),
            cumulative_profit: self.cumulative_profit_from(plan, summary.months_to_break_even),
            revenue_vs_cost: self.revenue_vs_cost(plan),
            summary,
        })
    }

    /// Headline monthly figures and break-even horizon
    pub fn summary(&self, plan: &BusinessPlan) -> PlanSummary {
        let monthly_revenue = plan.monthly_revenue();
        let monthly_costs = plan.monthly_costs();
        let monthly_profit = monthly_revenue - monthly_costs;
        let total_investment = self.total_investment(plan, monthly_costs);

        PlanSummary {
            monthly_revenue,
            monthly_costs,
            monthly_profit,
            total_investment,
            months_to_break_even: Outcome::ratio(total_investment, monthly_profit),
            break_even_units: Outcome::ratio(plan.monthly_fixed_costs(), plan.contribution_margin()),
        }
    }

    /// Monthly profit at 0%..250% of target volume
    pub fn break_even_units(&self, plan: &BusinessPlan) -> BreakEvenUnitsChart {
        let fixed = plan.monthly_fixed_costs();
        let mut chart = Chart::new("Break-Even Unit Volume Analysis", "Monthly Units", "Profit/Loss ($)");

        for volume in self.volume_grid(plan) {
            let revenue = volume * plan.price_per_unit;
            let costs = volume * plan.cost_per_unit + fixed;
            chart.push(volume, revenue - costs);
        }

        let break_even = Outcome::ratio(fixed, plan.contribution_margin())
            .value()
            .map(|units| SeriesPoint::new(units.round(), 0.0));

        BreakEvenUnitsChart { chart, break_even }
    }

    /// Profit margin percentage at 0%..250% of target volume
    ///
    /// Zero revenue is reported as a -100% margin.
    pub fn profit_margin(&self, plan: &BusinessPlan) -> Chart<f64> {
        let fixed = plan.monthly_fixed_costs();
        let mut chart = Chart::new("Profit Margin by Sales Volume", "Monthly Units", "Profit Margin (%)");

        for volume in self.volume_grid(plan) {
            let revenue = volume * plan.price_per_unit;
            let profit = revenue - (volume * plan.cost_per_unit + fixed);
            let margin = if revenue > 0.0 { profit / revenue * 100.0 } else { -100.0 };
            chart.push(volume, margin);
        }

        chart
    }

    /// Months of runway by revenue achievement (0%..250%)
    pub fn cash_runway(&self, plan: &BusinessPlan) -> Chart<Outcome> {
        let burn = plan.monthly_fixed_costs();
        let revenue = plan.monthly_revenue();
        let mut chart = Chart::new(
            "Cash Runway by Revenue Achievement",
            "Revenue Achievement (%)",
            "Months of Runway",
        );

        for i in 0..self.config.revenue_points {
            let achievement = i as f64 * self.config.revenue_step_fraction;
            let cash_flow = revenue * achievement - burn;
            let runway = if cash_flow < 0.0 {
                Outcome::ratio(plan.startup_costs, -cash_flow)
            } else {
                Outcome::Never
            };
            chart.push(achievement * 100.0, runway);
        }

        chart
    }

    /// Monthly cost shares at target volume
    pub fn cost_structure(&self, plan: &BusinessPlan) -> CostStructure {
        let amounts = [
            ("Cost of Goods", plan.monthly_variable_costs()),
            ("Overhead", plan.overhead_costs),
            ("Marketing", plan.marketing_budget),
        ];
        let total: f64 = amounts.iter().map(|(_, amount)| amount).sum();

        let slices = amounts
            .iter()
            .map(|&(label, amount)| CostSlice {
                label: label.to_string(),
                amount,
                share_pct: Outcome::ratio(amount, total).map(|share| share * 100.0),
            })
            .collect();

        CostStructure {
            title: "Monthly Cost Structure".to_string(),
            total,
            slices,
        }
    }

    /// Months to break-even across prices within the configured band
    pub fn price_sensitivity(&self, plan: &BusinessPlan) -> PriceSensitivityChart {
        let price = plan.price_per_unit;
        let step = self.config.price_step;
        let min_price = (price * (1.0 - self.config.price_band)).floor();
        let max_price = (price * (1.0 + self.config.price_band)).ceil();
        // Clamp before casting so huge prices or tiny steps cannot overflow
        let count = (((max_price - min_price) / step).ceil() + 1.0)
            .min(self.config.max_price_points as f64) as usize;

        let monthly_costs = plan.monthly_costs();
        let total_investment = self.total_investment(plan, monthly_costs);
        let mut chart = Chart::new("Price Sensitivity Analysis", "Price Point", "Months to Break-Even");

        for i in 0..count {
            let candidate = min_price + i as f64 * step;
            let profit = candidate * plan.target_volume - monthly_costs;
            chart.push(candidate, Outcome::ratio(total_investment, profit));
        }

        PriceSensitivityChart { chart, current_price: price }
    }

    /// Cumulative costs, revenue and profit month by month
    pub fn cumulative_profit(&self, plan: &BusinessPlan) -> CumulativeProfitChart {
        let months_to_break_even = self.summary(plan).months_to_break_even;
        self.cumulative_profit_from(plan, months_to_break_even)
    }

    fn cumulative_profit_from(&self, plan: &BusinessPlan, months_to_break_even: Outcome) -> CumulativeProfitChart {
        let horizon = self.cumulative_horizon(plan, months_to_break_even);
        let monthly_costs = plan.monthly_costs();
        let monthly_revenue = plan.monthly_revenue();

        let rows = (1..=horizon)
            .map(|month| {
                let cumulative_costs = plan.startup_costs + monthly_costs * month as f64;
                let cumulative_revenue = monthly_revenue * month as f64;
                CumulativeRow {
                    month,
                    cumulative_costs,
                    cumulative_revenue,
                    cumulative_profit: cumulative_revenue - cumulative_costs,
                }
            })
            .collect();

        CumulativeProfitChart {
            title: "Break-Even Analysis Over Time".to_string(),
            months_to_break_even,
            rows,
        }
    }

    /// Revenue against total cost by unit volume, startup costs amortized
    pub fn revenue_vs_cost(&self, plan: &BusinessPlan) -> RevenueVsCostChart {
        let amortized_startup = Outcome::ratio(plan.startup_costs, self.config.amortization_months)
            .value()
            .unwrap_or(plan.startup_costs);
        let fixed = plan.monthly_fixed_costs() + amortized_startup;
        let break_even_units = Outcome::ratio(fixed, plan.contribution_margin());
        let intervals = (self.config.volume_points - 1).max(1) as u64;

        let (step, message) = match break_even_units {
            Outcome::Value(units) => {
                let max_units = (units * 2.0).floor() as u64;
                let message = format!(
                    "You need to sell {:.2} units per month to break even (startup costs amortized over {} months).",
                    units, self.config.amortization_months
                );
                ((max_units / intervals).max(1), message)
            }
            Outcome::Never => (
                FALLBACK_UNIT_STEP,
                "Cannot calculate break-even point: price per unit must be greater than variable costs per unit."
                    .to_string(),
            ),
        };

        let points = (0..=intervals)
            .map(|i| {
                let units = i * step;
                RevenueCostPoint {
                    units,
                    revenue: units as f64 * plan.price_per_unit,
                    costs: units as f64 * plan.cost_per_unit + fixed,
                }
            })
            .collect();

        RevenueVsCostChart {
            title: "Revenue vs. Cost by Volume".to_string(),
            break_even_units,
            message,
            points,
        }
    }

    fn total_investment(&self, plan: &BusinessPlan, monthly_costs: f64) -> f64 {
        plan.startup_costs + monthly_costs * self.config.reserve_months
    }

    fn volume_grid(&self, plan: &BusinessPlan) -> impl Iterator<Item = f64> {
        let step = self.config.volume_step_fraction * plan.target_volume;
        (0..self.config.volume_points).map(move |i| i as f64 * step)
    }

    fn cumulative_horizon(&self, plan: &BusinessPlan, months_to_break_even: Outcome) -> u32 {
        let cap = self.config.max_horizon_months.max(1);
        let months = match months_to_break_even {
            Outcome::Value(months) => {
                (months * self.config.horizon_multiplier).ceil().min(cap as f64) as u32
            }
            Outcome::Never => plan
                .time_horizon_months
                .unwrap_or(self.config.fallback_horizon_months),
        };
        months.max(1).min(cap)
    }
}
