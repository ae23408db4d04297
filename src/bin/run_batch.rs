//! Run projections for a CSV of plans
//!
//! Outputs one summary row per plan for spreadsheet comparison

use anyhow::Context;
use breakeven_planner::{
    plan::load_plans,
    projection::Outcome,
    PlannerConfig, ScenarioRunner,
};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch")]
#[command(about = "Project every plan in a CSV file and write a summary CSV")]
struct BatchArgs {
    /// Input CSV using plan or wizard session field names
    #[arg(default_value = "plans.csv")]
    input: PathBuf,

    #[arg(long, default_value = "plan_summaries.csv")]
    output: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

/// One summary row per plan
#[derive(Debug, Serialize)]
struct SummaryRow {
    plan_id: u32,
    monthly_revenue: Option<f64>,
    monthly_costs: Option<f64>,
    monthly_profit: Option<f64>,
    total_investment: Option<f64>,
    months_to_break_even: Outcome,
    break_even_units: Outcome,
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = BatchArgs::parse();
    let config = PlannerConfig::load(args.config.as_deref())?;

    let start = Instant::now();
    println!("Loading plans from {}...", args.input.display());
    let plans = load_plans(&args.input)
        .with_context(|| format!("Failed to load plans from {}", args.input.display()))?;
    println!("Loaded {} plans in {:?}", plans.len(), start.elapsed());

    let runner = ScenarioRunner::new(config.projection);
    let proj_start = Instant::now();
    let results = runner.run_batch(&plans);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut profitable = 0;
    let mut failed = 0;
    for (plan, result) in plans.iter().zip(results) {
        let row = match result {
            Ok(result) => {
                let summary = result.summary;
                if !summary.months_to_break_even.is_never() {
                    profitable += 1;
                }
                SummaryRow {
                    plan_id: plan.plan_id,
                    monthly_revenue: Some(summary.monthly_revenue),
                    monthly_costs: Some(summary.monthly_costs),
                    monthly_profit: Some(summary.monthly_profit),
                    total_investment: Some(summary.total_investment),
                    months_to_break_even: summary.months_to_break_even,
                    break_even_units: summary.break_even_units,
                    error: None,
                }
            }
            Err(e) => {
                failed += 1;
                SummaryRow {
                    plan_id: plan.plan_id,
                    monthly_revenue: None,
                    monthly_costs: None,
                    monthly_profit: None,
                    total_investment: None,
                    months_to_break_even: Outcome::Never,
                    break_even_units: Outcome::Never,
                    error: Some(e.to_string()),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("\nBatch Summary ({}):", Utc::now().to_rfc3339());
    println!("  Plans:       {}", plans.len());
    println!("  Break even:  {}", profitable);
    println!("  Never:       {}", plans.len() - profitable - failed);
    println!("  Failed:      {}", failed);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
