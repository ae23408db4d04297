//! Load plans from CSV exports of the wizard session or from JSON files

use super::BusinessPlan;
use crate::error::Result;
use csv::Reader;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw CSV row
///
/// Headers may use the plan field names (`price_per_unit`, ...) or the
/// wizard's session names (`price_range`, `cost_of_goods`, ...).
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "plan_id", alias = "PlanID", default)]
    plan_id: u32,
    #[serde(rename = "price_per_unit", alias = "price_range")]
    price: f64,
    #[serde(rename = "cost_per_unit", alias = "cost_of_goods")]
    cost: f64,
    #[serde(rename = "target_volume", alias = "sales_volume")]
    volume: f64,
    #[serde(rename = "overhead_costs", default)]
    overhead: f64,
    #[serde(rename = "marketing_budget", default)]
    marketing: f64,
    #[serde(rename = "startup_costs", default)]
    startup: f64,
    #[serde(rename = "monthly_revenue", default)]
    monthly_revenue: Option<f64>,
    #[serde(rename = "time_horizon_months", alias = "time_horizon", default)]
    time_horizon: Option<u32>,
}

impl CsvRow {
    fn into_plan(self) -> Result<BusinessPlan> {
        let plan = BusinessPlan {
            plan_id: self.plan_id,
            price_per_unit: self.price,
            cost_per_unit: self.cost,
            target_volume: self.volume,
            overhead_costs: self.overhead,
            marketing_budget: self.marketing,
            startup_costs: self.startup,
            monthly_revenue: self.monthly_revenue,
            time_horizon_months: self.time_horizon,
        };
        plan.validate()?;
        Ok(plan)
    }
}

/// Load all plans from a CSV file
pub fn load_plans<P: AsRef<Path>>(path: P) -> Result<Vec<BusinessPlan>> {
    let file = File::open(path.as_ref())?;
    debug!("Loading plans from {}", path.as_ref().display());
    load_plans_from_reader(file)
}

/// Load plans from any reader (e.g., string buffer, request body)
pub fn load_plans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<BusinessPlan>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut plans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        plans.push(row.into_plan()?);
    }

    Ok(plans)
}

/// Load a single plan from a JSON file
pub fn load_plan_json<P: AsRef<Path>>(path: P) -> Result<BusinessPlan> {
    let file = File::open(path.as_ref())?;
    let plan: BusinessPlan = serde_json::from_reader(BufReader::new(file))?;
    plan.validate()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use std::io::Write;

    const CSV: &str = "\
PlanID,price_range,cost_of_goods,sales_volume,overhead_costs,marketing_budget,startup_costs,monthly_revenue,time_horizon
1,45.00,18.50,400,5200,900,30000,,18
2,12.00,4.00,2500,8000,1500,60000,27000,
";

    #[test]
    fn test_load_plans_from_reader() {
        let plans = load_plans_from_reader(CSV.as_bytes()).expect("Failed to load plans");
        assert_eq!(plans.len(), 2);

        let p1 = &plans[0];
        assert_eq!(p1.plan_id, 1);
        assert_eq!(p1.cost_per_unit, 18.5);
        assert_eq!(p1.monthly_revenue, None);
        assert_eq!(p1.time_horizon_months, Some(18));

        let p2 = &plans[1];
        assert_eq!(p2.monthly_revenue, Some(27_000.0));
        assert_eq!(p2.time_horizon_months, None);
    }

    #[test]
    fn test_load_plans_with_field_names() {
        let csv = "\
plan_id,price_per_unit,cost_per_unit,target_volume,overhead_costs,startup_costs,time_horizon_months
9,30.00,11.00,800,4000,12000,24
";
        let plans = load_plans_from_reader(csv.as_bytes()).expect("Failed to load plans");
        assert_eq!(plans.len(), 1);

        let plan = &plans[0];
        assert_eq!(plan.plan_id, 9);
        assert_eq!(plan.price_per_unit, 30.0);
        assert_eq!(plan.cost_per_unit, 11.0);
        assert_eq!(plan.target_volume, 800.0);
        assert_eq!(plan.marketing_budget, 0.0);
        assert_eq!(plan.time_horizon_months, Some(24));
    }

    #[test]
    fn test_negative_row_is_rejected() {
        let csv = "PlanID,price_range,cost_of_goods,sales_volume\n7,10,-2,100\n";
        match load_plans_from_reader(csv.as_bytes()) {
            Err(PlannerError::InvalidPlan { field, .. }) => assert_eq!(field, "cost_per_unit"),
            other => panic!("expected InvalidPlan, got {:?}", other),
        }
    }

    #[test]
    fn test_load_plan_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"price_per_unit": 20, "cost_per_unit": 8, "target_volume": 150, "startup_costs": 5000}}"#
        )
        .unwrap();

        let plan = load_plan_json(file.path()).unwrap();
        assert_eq!(plan.target_volume, 150.0);
        assert_eq!(plan.overhead_costs, 0.0);
        assert_eq!(plan.plan_id, 0);
    }
}
