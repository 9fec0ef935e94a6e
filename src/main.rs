use anyhow::{anyhow, Context, Result};
use meal_planner::cli::{parse_args, Command};
use meal_planner::config::AppConfig;
use meal_planner::meal_plan::{generate_fallback, normalize, CanonicalMealPlan};
use meal_planner::planner::plan_meals;
use meal_planner::preferences::MealPlanRequest;
use meal_planner::raw_input::{read_raw_response, write_output};
use meal_planner::telemetry;
use tokio::fs;
use tracing::{error, info};

fn describe(plan: &CanonicalMealPlan) {
    if let Some((start, end)) = plan.date_range() {
        info!(
            %start,
            %end,
            days = plan.days.len(),
            meals = plan.meal_count(),
            shopping_items = plan.shopping_list.len(),
            "meal plan ready"
        );
    }
}

async fn load_preferences(path: Option<&std::path::Path>) -> Result<MealPlanRequest> {
    let Some(path) = path else {
        return Ok(MealPlanRequest::default());
    };
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read preferences file '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid preferences in '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();
    let cli_args = parse_args();
    telemetry::init(cli_args.verbose);

    let json = match cli_args.command {
        Command::Normalize { input, seed_date } => {
            let raw = read_raw_response(&input).await?;
            let plan = normalize(raw.as_ref(), seed_date).map_err(|failure| {
                error!(%failure, "normalization failed");
                anyhow!("{}", failure.user_message())
            })?;
            describe(&plan);
            serde_json::to_string_pretty(&plan)?
        }
        Command::Fallback { seed_date } => {
            let plan = generate_fallback(seed_date);
            describe(&plan);
            serde_json::to_string_pretty(&plan)?
        }
        Command::Generate {
            preferences,
            start_date,
        } => {
            let mut request = load_preferences(preferences.as_deref()).await?;
            if start_date.is_some() {
                request.start_date = start_date;
            }
            let outcome = plan_meals(&config, &request).await.map_err(|failure| {
                error!(%failure, "generated meal plan was unusable");
                anyhow!("{}", failure.user_message())
            })?;
            info!(source = ?outcome.source, "plan source");
            describe(&outcome.plan);
            serde_json::to_string_pretty(&outcome)?
        }
    };

    write_output(&json, cli_args.output.as_deref()).await
}
