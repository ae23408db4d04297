//! Projection engine turning business plans into chart series

mod outcome;
mod series;
mod engine;

pub use outcome::Outcome;
pub use series::{
    BreakEvenUnitsChart, Chart, CostSlice, CostStructure, CumulativeProfitChart, CumulativeRow,
    PlanSummary, PriceSensitivityChart, ProjectionResult, RevenueCostPoint, RevenueVsCostChart,
    SeriesPoint,
};
pub use engine::{
    ProjectionEngine, ProjectionConfig, DEFAULT_AMORTIZATION_MONTHS, DEFAULT_RESERVE_MONTHS,
    MAX_HORIZON_MONTHS, MAX_SERIES_POINTS,
};
