pub mod api_connection;
pub mod cli;
pub mod config;
pub mod meal_plan;
pub mod meal_plan_generator;
pub mod planner;
pub mod preferences;
pub mod raw_input;
pub mod response_sanitizer;
pub mod telemetry;
