//! Business plan records and plan loading

mod data;
pub mod loader;

pub use data::BusinessPlan;
pub use loader::{load_plan_json, load_plans, load_plans_from_reader};
