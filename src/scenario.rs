//! Scenario runner for batch projections
//!
//! Holds one configured engine and runs it over many plans, or runs one plan
//! under several configurations for side-by-side comparison.

use log::warn;
use rayon::prelude::*;

use crate::error::Result;
use crate::plan::BusinessPlan;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-configured runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ProjectionConfig::default());
/// for result in runner.run_batch(&plans) {
///     println!("{}", result?.summary.months_to_break_even);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn run(&self, plan: &BusinessPlan) -> Result<ProjectionResult> {
        self.engine.project(plan)
    }

    /// Run every plan in parallel, preserving input order
    pub fn run_batch(&self, plans: &[BusinessPlan]) -> Vec<Result<ProjectionResult>> {
        plans
            .par_iter()
            .map(|plan| {
                let result = self.engine.project(plan);
                if let Err(e) = &result {
                    warn!("Plan {} failed: {}", plan.plan_id, e);
                }
                result
            })
            .collect()
    }

    /// Run one plan under several configurations
    pub fn run_scenarios(&self, plan: &BusinessPlan, configs: &[ProjectionConfig]) -> Result<Vec<ProjectionResult>> {
        configs
            .iter()
            .map(|config| ProjectionEngine::new(config.clone()).project(plan))
            .collect()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
