//! Break-even planner CLI
//!
//! Command-line interface for running projections and working with AI suggestions

use anyhow::{bail, Context};
use breakeven_planner::{
    plan::load_plan_json,
    projection::{CumulativeRow, ProjectionEngine, ProjectionResult},
    suggestion::{extract_number, SuggestionClient, WizardStep},
    BusinessPlan, PlannerConfig,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "breakeven_planner")]
#[command(about = "Break-even projections and AI suggestion parsing for business plans")]
struct Cli {
    /// JSON config file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute every chart series for a plan
    Project {
        /// Plan JSON file; otherwise the plan is built from flags
        #[arg(long)]
        plan: Option<PathBuf>,

        #[command(flatten)]
        inline: PlanArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write the month-by-month cumulative profit table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Extract the suggested number from text (reads stdin when TEXT is omitted)
    Extract { text: Option<String> },

    /// Stream a suggestion for one wizard step
    Suggest {
        /// price, cost, overhead, startup_costs, marketing_budget, sales_volume or time_horizon
        step: WizardStep,

        /// Plan JSON file to update with the suggested value
        #[arg(long)]
        apply_to: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct PlanArgs {
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    cost: Option<f64>,
    #[arg(long)]
    volume: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    overhead: f64,
    #[arg(long, default_value_t = 0.0)]
    marketing: f64,
    #[arg(long, default_value_t = 0.0)]
    startup: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Command::Project { plan, inline, format, csv } => {
            let plan = match plan {
                Some(path) => load_plan_json(&path)
                    .with_context(|| format!("Failed to load plan from {}", path.display()))?,
                None => inline.into_plan()?,
            };
            let engine = ProjectionEngine::new(config.projection);
            let result = engine.project(&plan)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => print_table(&result),
            }

            if let Some(path) = csv {
                write_cumulative_csv(&path, &result.cumulative_profit.rows)?;
                println!("\nCumulative profit written to: {}", path.display());
            }
        }
        Command::Extract { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            match extract_number(&text) {
                Some(found) => println!("{} ({:?})", found.value, found.kind),
                None => bail!("Could not find a suggested amount. Please enter the value manually."),
            }
        }
        Command::Suggest { step, apply_to } => {
            let client = SuggestionClient::new(&config.suggestion)?;
            let mut stdout = io::stdout();

            let suggestion = client
                .fetch_with(step, |update| {
                    print!("{}", update.delta);
                    if let Err(e) = stdout.flush() {
                        warn!("Failed to flush suggestion output: {}", e);
                    }
                })
                .await
                .context("Error getting suggestion. Please try again.")?;
            println!();

            let value = suggestion.value()?;
            println!("\nSuggested {}: {}", step, value);

            if let Some(path) = apply_to {
                let mut plan = load_plan_json(&path)?;
                suggestion.apply_to(&mut plan)?;
                save_plan_json(&path, &plan)?;
                println!("Updated {} in {}", step.field_name(), path.display());
            }
        }
    }

    Ok(())
}

impl PlanArgs {
    fn into_plan(self) -> anyhow::Result<BusinessPlan> {
        let (Some(price), Some(cost), Some(volume)) = (self.price, self.cost, self.volume) else {
            bail!("--price, --cost and --volume are required when --plan is not given");
        };
        let plan = BusinessPlan::new(price, cost, volume, self.overhead, self.marketing, self.startup);
        plan.validate()?;
        Ok(plan)
    }
}

fn print_table(result: &ProjectionResult) {
    let summary = &result.summary;

    println!("Plan {}", result.plan_id);
    println!("======================\n");
    println!("  Monthly Revenue:     ${:.2}", summary.monthly_revenue);
    println!("  Monthly Costs:       ${:.2}", summary.monthly_costs);
    println!("  Monthly Profit:      ${:.2}", summary.monthly_profit);
    println!("  Total Investment:    ${:.2}", summary.total_investment);
    println!("  Months to Break-Even: {}", summary.months_to_break_even);
    println!("  Break-Even Units:     {}", summary.break_even_units);
    println!();

    println!("{:>10} {:>14} {:>10} {:>14}", "Units", "Profit/Loss", "Margin %", "Runway (mo)");
    println!("{}", "-".repeat(51));
    let profits = &result.break_even_units.chart.points;
    let margins = &result.profit_margin.points;
    let runways = &result.cash_runway.points;
    for ((profit, margin), runway) in profits.iter().zip(margins).zip(runways) {
        println!(
            "{:>10.0} {:>14.2} {:>10.1} {:>14}",
            profit.x, profit.y, margin.y, runway.y
        );
    }

    println!("\nCost Structure (total ${:.2}):", result.cost_structure.total);
    for slice in &result.cost_structure.slices {
        println!("  {:<14} ${:>12.2} {:>7}%", slice.label, slice.amount, slice.share_pct);
    }

    println!("\nPrice Sensitivity:");
    for point in &result.price_sensitivity.chart.points {
        println!("  ${:<8.0} {} months", point.x, point.y);
    }

    println!("\n{}", result.revenue_vs_cost.message);
    if let Some(month) = result.cumulative_profit.crossover_month() {
        println!("Cumulative revenue overtakes cumulative cost in month {}", month);
    }
}

fn write_cumulative_csv(path: &Path, rows: &[CumulativeRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn save_plan_json(path: &Path, plan: &BusinessPlan) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    serde_json::to_writer_pretty(&mut file, plan)?;
    writeln!(file)?;
    Ok(())
}
