//! Chart series output structures

use serde::{Deserialize, Serialize};

use super::Outcome;

/// A single (x, y) pair on a chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<Y> {
    pub x: f64,
    pub y: Y,
}

impl<Y> SeriesPoint<Y> {
    pub fn new(x: f64, y: Y) -> Self {
        Self { x, y }
    }
}

/// An ordered series with the labels a renderer needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart<Y> {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<SeriesPoint<Y>>,
}

impl<Y> Chart<Y> {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, x: f64, y: Y) {
        self.points.push(SeriesPoint::new(x, y));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Monthly profit by unit volume, with the break-even annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenUnitsChart {
    pub chart: Chart<f64>,
    /// Rounded break-even volume at zero profit, absent when the margin is not positive
    pub break_even: Option<SeriesPoint<f64>>,
}

/// One slice of the monthly cost pie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSlice {
    pub label: String,
    pub amount: f64,
    /// Percentage of total monthly cost
    pub share_pct: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostStructure {
    pub title: String,
    pub total: f64,
    pub slices: Vec<CostSlice>,
}

/// Months to break-even across a band of prices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSensitivityChart {
    pub chart: Chart<Outcome>,
    pub current_price: f64,
}

/// Cumulative position at the end of one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeRow {
    pub month: u32,
    pub cumulative_costs: f64,
    pub cumulative_revenue: f64,
    pub cumulative_profit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeProfitChart {
    pub title: String,
    pub months_to_break_even: Outcome,
    pub rows: Vec<CumulativeRow>,
}

impl CumulativeProfitChart {
    /// First month whose cumulative revenue covers cumulative cost
    pub fn crossover_month(&self) -> Option<u32> {
        self.rows
            .iter()
            .find(|r| r.cumulative_profit >= 0.0)
            .map(|r| r.month)
    }
}

/// Revenue and total cost at one unit volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueCostPoint {
    pub units: u64,
    pub revenue: f64,
    pub costs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueVsCostChart {
    pub title: String,
    /// Monthly units to break even with startup costs amortized
    pub break_even_units: Outcome,
    pub message: String,
    pub points: Vec<RevenueCostPoint>,
}

/// Headline figures shown on the wizard summary page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub monthly_revenue: f64,
    pub monthly_costs: f64,
    pub monthly_profit: f64,
    /// Startup costs plus the operating reserve
    pub total_investment: f64,
    pub months_to_break_even: Outcome,
    pub break_even_units: Outcome,
}

/// Complete projection result for one plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub plan_id: u32,
    pub summary: PlanSummary,
    pub break_even_units: BreakEvenUnitsChart,
    pub profit_margin: Chart<f64>,
    pub cash_runway: Chart<Outcome>,
    pub cost_structure: CostStructure,
    pub price_sensitivity: PriceSensitivityChart,
    pub cumulative_profit: CumulativeProfitChart,
    pub revenue_vs_cost: RevenueVsCostChart,
}
