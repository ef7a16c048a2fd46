//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use metrika_types::{OutputFormat, WorkoutKind};

#[derive(Parser)]
#[command(name = "metrika")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Personal weight, hydration and activity tracking")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Data directory override
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show today's summary card
    Dashboard,

    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },

    /// Track water intake
    Water {
        #[command(subcommand)]
        command: WaterCommands,
    },

    /// Show the weekly workout summary
    Activity,

    /// Record workouts
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },

    /// Weight and water series over a window
    Report {
        /// Days covered by the report
        #[arg(long, default_value = "30")]
        days: u64,

        /// Export the series to a CSV file
        #[arg(long, short = 'o')]
        export: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set the daily water goal in liters
        #[arg(long)]
        set_water_goal: Option<f64>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set the text recognizer command (empty string to unset)
        #[arg(long)]
        set_recognizer: Option<String>,

        /// Enable/disable the recognition cache
        #[arg(long)]
        set_cache: Option<bool>,

        /// Set the external call timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Set the data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Manage the recognition cache
    Cache {
        /// Clear all cached recognition results
        #[arg(long)]
        clear: bool,

        /// Show cache statistics
        #[arg(long)]
        stats: bool,
    },

    /// Show store availability and authorization state
    Status,
}

#[derive(Subcommand)]
pub enum WeightCommands {
    /// Show the latest weight reading
    Show,

    /// Record a weight in kilograms
    Add {
        /// Weight in kilograms
        kilograms: f64,
    },

    /// Read a weight off a photographed scale display
    Scan {
        /// Path to the photo
        image: PathBuf,

        /// Save without asking for confirmation
        #[arg(long, short = 'y')]
        yes: bool,

        /// Skip the recognition cache (overrides config)
        #[arg(long)]
        no_cache: bool,
    },

    /// Show recorded weights
    History {
        /// Days of history to show
        #[arg(long, default_value = "30")]
        days: u64,
    },
}

#[derive(Subcommand)]
pub enum WaterCommands {
    /// Show today's intake against the goal
    Show,

    /// Record water intake
    Add {
        /// Amount in liters
        #[arg(conflicts_with_all = ["cup", "bottle", "ml"])]
        liters: Option<f64>,

        /// Add one cup (0.25 L)
        #[arg(long, conflicts_with_all = ["bottle", "ml"])]
        cup: bool,

        /// Add one bottle (0.75 L)
        #[arg(long, conflicts_with = "ml")]
        bottle: bool,

        /// Amount in milliliters
        #[arg(long)]
        ml: Option<f64>,
    },

    /// Show daily intake totals
    History {
        /// Days of history to show
        #[arg(long, default_value = "30")]
        days: u64,
    },
}

#[derive(Subcommand)]
pub enum WorkoutCommands {
    /// Record a finished workout ending now
    Add {
        /// Workout kind
        kind: WorkoutKind,

        /// Duration in minutes
        #[arg(long, short = 'm')]
        minutes: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_weight_add() {
        let cli = Cli::parse_from(["metrika", "weight", "add", "72.5"]);
        match cli.command {
            Commands::Weight {
                command: WeightCommands::Add { kilograms },
            } => assert_eq!(kilograms, 72.5),
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_parse_water_quick_add() {
        let cli = Cli::parse_from(["metrika", "water", "add", "--cup"]);
        match cli.command {
            Commands::Water {
                command:
                    WaterCommands::Add {
                        liters,
                        cup,
                        bottle,
                        ml,
                    },
            } => {
                assert!(liters.is_none());
                assert!(cup);
                assert!(!bottle);
                assert!(ml.is_none());
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_water_liters_conflicts_with_cup() {
        let result = Cli::try_parse_from(["metrika", "water", "add", "0.5", "--cup"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_workout_kind() {
        let cli = Cli::parse_from(["metrika", "workout", "add", "running", "-m", "30"]);
        match cli.command {
            Commands::Workout {
                command: WorkoutCommands::Add { kind, minutes },
            } => {
                assert_eq!(kind, WorkoutKind::Running);
                assert_eq!(minutes, 30.0);
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_parse_global_format_flag() {
        let cli = Cli::parse_from(["metrika", "-f", "json", "dashboard"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }
}
