//! Command handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use indicatif::ProgressBar;
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, Commands, WaterCommands, WeightCommands, WorkoutCommands};
use crate::output;
use metrika_app::config::Config;
use metrika_app::export::{export_report_csv, ReportSeries};
use metrika_app::repository::{build_recognizer, open_health_store, open_recognition_cache};
use metrika_app::service::{HealthService, ScanService, BOTTLE_LITERS, CUP_LITERS};
use metrika_domain::HealthStore;
use metrika_types::{
    ConfigError, Error, MetricKind, OutputFormat, Result, StoreError, VisionError, WorkoutKind,
};
use metrika_vision::RecognitionCache;

pub async fn execute(cli: Cli, token: CancellationToken) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(format) = cli.format {
        config.output_format = format;
    }
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }

    match &cli.command {
        Commands::Dashboard => cmd_dashboard(&config, token).await,

        Commands::Weight { command } => match command {
            WeightCommands::Show => cmd_weight_show(&config, token).await,
            WeightCommands::Add { kilograms } => {
                cmd_weight_add(&config, token, *kilograms).await
            }
            WeightCommands::Scan {
                image,
                yes,
                no_cache,
            } => {
                // Cache disabled if: --no-cache OR config.cache_enabled=false
                let use_cache = !no_cache && config.cache_enabled;
                cmd_weight_scan(&config, token, image, *yes, use_cache, cli.verbose).await
            }
            WeightCommands::History { days } => {
                cmd_weight_history(&config, token, *days).await
            }
        },

        Commands::Water { command } => match command {
            WaterCommands::Show => cmd_water_show(&config, token).await,
            WaterCommands::Add {
                liters,
                cup,
                bottle,
                ml,
            } => cmd_water_add(&config, token, *liters, *cup, *bottle, *ml).await,
            WaterCommands::History { days } => cmd_water_history(&config, token, *days).await,
        },

        Commands::Activity => cmd_activity(&config, token).await,

        Commands::Workout { command } => match command {
            WorkoutCommands::Add { kind, minutes } => {
                cmd_workout_add(&config, token, *kind, *minutes).await
            }
        },

        Commands::Report { days, export } => {
            cmd_report(&config, token, *days, export.as_deref()).await
        }

        Commands::Config {
            show,
            set_water_goal,
            set_output,
            set_recognizer,
            set_cache,
            set_timeout,
            set_data_dir,
            reset,
        } => cmd_config(
            *show,
            *set_water_goal,
            *set_output,
            set_recognizer.clone(),
            *set_cache,
            *set_timeout,
            set_data_dir.clone(),
            *reset,
        ),

        Commands::Cache { clear, stats } => cmd_cache(&config, *clear, *stats),

        Commands::Status => cmd_status(&config, token).await,
    }
}

fn health_service(config: &Config, token: CancellationToken) -> Result<HealthService> {
    let store = Arc::new(open_health_store(config)?);
    Ok(HealthService::new(store, config, token))
}

async fn cmd_dashboard(config: &Config, token: CancellationToken) -> Result<()> {
    let service = health_service(config, token)?;
    service.ensure_access(&MetricKind::ALL).await?;

    let summary = service.dashboard().await?;
    output::print_dashboard(config.output_format, &summary)
}

async fn cmd_weight_show(config: &Config, token: CancellationToken) -> Result<()> {
    let service = health_service(config, token)?;
    service.ensure_access(&[MetricKind::BodyMass]).await?;

    let latest = service.latest_weight().await?;
    output::print_latest_weight(config.output_format, latest.as_ref())
}

async fn cmd_weight_add(config: &Config, token: CancellationToken, kilograms: f64) -> Result<()> {
    if kilograms <= 0.0 {
        return Err(Error::InvalidValue(format!(
            "weight must be positive, got {}",
            kilograms
        )));
    }

    let service = health_service(config, token)?;
    service.ensure_access(&[MetricKind::BodyMass]).await?;

    let sample = service.add_weight(kilograms).await?;
    println!(
        "Recorded {:.1} kg at {}",
        sample.value,
        sample.end.with_timezone(&Local).format("%m/%d %H:%M")
    );
    Ok(())
}

async fn cmd_weight_scan(
    config: &Config,
    token: CancellationToken,
    image: &Path,
    yes: bool,
    use_cache: bool,
    verbose: bool,
) -> Result<()> {
    let service = health_service(config, token.clone())?;
    service.ensure_access(&[MetricKind::BodyMass]).await?;

    let cache = if use_cache {
        open_recognition_cache(config)?
    } else {
        None
    };
    let scanner = ScanService::new(build_recognizer(config), cache, token, config.timeout());

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Reading scale display...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = scanner.scan(image).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    if verbose {
        if outcome.from_cache {
            println!("Recognized lines (from cache):");
        } else {
            println!("Recognized lines:");
        }
        for line in &outcome.lines {
            println!("  {}", line.text);
        }
    }

    let candidate = match outcome.candidate {
        Some(candidate) => candidate,
        None => {
            println!("No weight candidate found in {}", image.display());
            return Ok(());
        }
    };

    let kilograms: f64 = candidate.parse().map_err(|_| {
        Error::InvalidValue(format!("unparseable weight candidate: {}", candidate))
    })?;

    println!("Detected weight: {:.1} kg", kilograms);
    if let Some(at) = outcome.captured_at {
        println!(
            "Captured at: {}",
            at.with_timezone(&Local).format("%m/%d %H:%M")
        );
    }

    if !yes {
        println!("\nSave this reading? [y/N]");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let at = outcome.captured_at.unwrap_or_else(Utc::now);
    let sample = service.add_weight_at(kilograms, at).await?;
    println!(
        "Recorded {:.1} kg at {}",
        sample.value,
        sample.end.with_timezone(&Local).format("%m/%d %H:%M")
    );
    Ok(())
}

async fn cmd_weight_history(config: &Config, token: CancellationToken, days: u64) -> Result<()> {
    let service = health_service(config, token)?;
    service.ensure_access(&[MetricKind::BodyMass]).await?;

    let samples = service.history(MetricKind::BodyMass, days).await?;
    output::print_weight_history(config.output_format, days, &samples)
}

async fn cmd_water_show(config: &Config, token: CancellationToken) -> Result<()> {
    let service = health_service(config, token)?;
    service.ensure_access(&[MetricKind::DietaryWater]).await?;

    let summary = service.hydration().await?;
    output::print_hydration(config.output_format, &summary)
}

async fn cmd_water_add(
    config: &Config,
    token: CancellationToken,
    liters: Option<f64>,
    cup: bool,
    bottle: bool,
    ml: Option<f64>,
) -> Result<()> {
    let amount = if cup {
        CUP_LITERS
    } else if bottle {
        BOTTLE_LITERS
    } else if let Some(ml) = ml {
        ml / 1000.0
    } else if let Some(liters) = liters {
        liters
    } else {
        return Err(Error::InvalidValue(
            "specify an amount: liters, --cup, --bottle or --ml".to_string(),
        ));
    };

    if amount <= 0.0 {
        return Err(Error::InvalidValue(format!(
            "water amount must be positive, got {:.3} L",
            amount
        )));
    }

    let service = health_service(config, token)?;
    service.ensure_access(&[MetricKind::DietaryWater]).await?;

    service.add_water(amount).await?;
    let summary = service.hydration().await?;
    println!(
        "Added {:.2} L. Today: {:.2} / {:.2} L ({:.0}%)",
        amount,
        summary.today_liters,
        summary.goal_liters,
        summary.progress() * 100.0
    );
    Ok(())
}

async fn cmd_water_history(config: &Config, token: CancellationToken, days: u64) -> Result<()> {
    let service = health_service(config, token)?;
    service.ensure_access(&[MetricKind::DietaryWater]).await?;

    let totals = service.water_series(days).await?;
    output::print_water_history(config.output_format, days, &totals)
}

async fn cmd_activity(config: &Config, token: CancellationToken) -> Result<()> {
    let service = health_service(config, token)?;
    service
        .ensure_access(&[MetricKind::ActiveEnergy, MetricKind::ExerciseTime])
        .await?;

    let summary = service.weekly_activity().await?;
    output::print_activity(config.output_format, &summary)
}

async fn cmd_workout_add(
    config: &Config,
    token: CancellationToken,
    kind: WorkoutKind,
    minutes: f64,
) -> Result<()> {
    if minutes <= 0.0 {
        return Err(Error::InvalidValue(format!(
            "workout minutes must be positive, got {}",
            minutes
        )));
    }

    let service = health_service(config, token)?;
    service.ensure_access(&[MetricKind::ActiveEnergy]).await?;

    let workout = service.add_workout(kind, minutes).await?;
    println!(
        "Recorded {} workout, {:.0} min",
        workout.kind.label(),
        workout.duration_minutes()
    );
    Ok(())
}

async fn cmd_report(
    config: &Config,
    token: CancellationToken,
    days: u64,
    export: Option<&Path>,
) -> Result<()> {
    let service = health_service(config, token)?;
    service
        .ensure_access(&[MetricKind::BodyMass, MetricKind::DietaryWater])
        .await?;

    let series = ReportSeries {
        weight: service.weight_series(days).await?,
        water: service.water_series(days).await?,
    };

    output::print_report(config.output_format, days, &series)?;

    if let Some(path) = export {
        export_report_csv(path, &series)?;
        println!("\nExported to: {}", path.display());
    }

    Ok(())
}

fn cmd_config(
    show: bool,
    set_water_goal: Option<f64>,
    set_output: Option<OutputFormat>,
    set_recognizer: Option<String>,
    set_cache: Option<bool>,
    set_timeout: Option<u64>,
    set_data_dir: Option<PathBuf>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(goal) = set_water_goal {
        if goal <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "water_goal_liters".to_string(),
                value: goal.to_string(),
            }
            .into());
        }
        config.water_goal_liters = goal;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(command) = set_recognizer {
        if command.trim().is_empty() {
            config.recognizer_command = None;
        } else {
            config.recognizer_command = Some(command);
        }
        modified = true;
    }

    if let Some(cache_enabled) = set_cache {
        config.cache_enabled = cache_enabled;
        modified = true;
    }

    if let Some(timeout_secs) = set_timeout {
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                value: timeout_secs.to_string(),
            }
            .into());
        }
        config.timeout_secs = timeout_secs;
        modified = true;
    }

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn cmd_cache(config: &Config, clear: bool, stats: bool) -> Result<()> {
    if !config.cache_enabled {
        return Err(Error::Vision(VisionError::CacheIo(
            "Recognition cache is disabled. Enable with: metrika config --set-cache true"
                .to_string(),
        )));
    }

    let cache = RecognitionCache::new(config.cache_dir()?)?;

    if clear {
        let count = cache.clear()?;
        println!("Cleared {} cached entries", count);
    }

    if stats || !clear {
        let stats = cache.stats()?;
        println!("{}", stats.display());
    }

    Ok(())
}

async fn cmd_status(config: &Config, token: CancellationToken) -> Result<()> {
    let store = Arc::new(open_health_store(config)?);
    let available = store.is_available();

    println!("Store Status");
    println!("============");
    println!("Available:   {}", if available { "yes" } else { "no" });

    if available {
        let service = HealthService::new(store, config, token);
        match service.ensure_access(&MetricKind::ALL).await {
            Ok(()) => println!("Access:      granted"),
            Err(Error::Store(StoreError::AuthorizationDenied(kinds))) => {
                println!("Access:      denied ({})", kinds);
            }
            Err(e) => return Err(e),
        }
    }

    println!("Data dir:    {}", config.data_dir()?.display());
    println!("Config file: {}", Config::config_path()?.display());
    Ok(())
}
