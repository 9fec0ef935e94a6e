use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Normalize AI meal plans or generate sample plans", long_about = None)]
pub struct Cli {
    /// Write the resulting JSON to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize a raw model response read from a file
    Normalize {
        /// Path to the raw response (JSON, optionally wrapped in markdown or prose)
        #[arg(short, long)]
        input: PathBuf,

        /// Start date used if the response is empty and the sample plan is produced
        #[arg(long)]
        seed_date: Option<NaiveDate>,
    },
    /// Print the deterministic sample plan
    Fallback {
        /// First day of the plan (defaults to today)
        #[arg(long)]
        seed_date: Option<NaiveDate>,
    },
    /// Generate a plan from preferences, using OpenRouter when a key is configured
    Generate {
        /// JSON file with meal plan preferences
        #[arg(short, long)]
        preferences: Option<PathBuf>,

        /// First day of the plan; overrides the preferences file
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalize_with_global_output() {
        let cli = Cli::try_parse_from([
            "meal_planner",
            "normalize",
            "--input",
            "raw.json",
            "--seed-date",
            "2024-01-01",
            "--output",
            "plan.json",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("plan.json")));
        match cli.command {
            Command::Normalize { input, seed_date } => {
                assert_eq!(input, PathBuf::from("raw.json"));
                assert_eq!(seed_date, NaiveDate::from_ymd_opt(2024, 1, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Cli::try_parse_from(["meal_planner", "fallback", "--seed-date", "soon"]).is_err());
    }
}
