//! Output formatting module

use chrono::Local;

use metrika_app::export::ReportSeries;
use metrika_domain::service::{ActivitySummary, DashboardSummary, HydrationSummary, WeightReading};
use metrika_types::{DailyTotal, OutputFormat, QuantitySample, Result};

pub fn print_dashboard(output_format: OutputFormat, summary: &DashboardSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(summary)?;
        println!("{}", content);
    } else {
        // Table format
        println!("\nToday");
        println!("=====");
        match &summary.latest_weight {
            Some(reading) => {
                let date_str = reading
                    .recorded_at
                    .with_timezone(&Local)
                    .format("%m/%d %H:%M")
                    .to_string();
                println!("Weight:   {:.1} kg ({})", reading.kilograms, date_str);
            }
            None => println!("Weight:   no record"),
        }
        println!(
            "Water:    {:.2} / {:.2} L ({:.0}%)",
            summary.water.today_liters,
            summary.water.goal_liters,
            summary.water.progress() * 100.0
        );
        println!("Exercise: {:.0} min", summary.exercise_minutes);
        println!("Energy:   {:.0} kcal", summary.active_energy_kcal);
    }

    Ok(())
}

pub fn print_latest_weight(
    output_format: OutputFormat,
    latest: Option<&WeightReading>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&latest)?;
        println!("{}", content);
    } else {
        match latest {
            Some(reading) => {
                let date_str = reading
                    .recorded_at
                    .with_timezone(&Local)
                    .format("%m/%d %H:%M")
                    .to_string();
                println!("Latest weight: {:.1} kg ({})", reading.kilograms, date_str);
            }
            None => println!("No weight recorded yet."),
        }
    }

    Ok(())
}

pub fn print_hydration(output_format: OutputFormat, summary: &HydrationSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(summary)?;
        println!("{}", content);
    } else {
        // Table format
        println!("\nWater Today");
        println!("===========");
        println!("Intake:    {:.2} L", summary.today_liters);
        println!("Goal:      {:.2} L", summary.goal_liters);
        println!("Progress:  {:.0}%", summary.progress() * 100.0);
        println!("Remaining: {:.2} L", summary.remaining_liters());
    }

    Ok(())
}

pub fn print_activity(output_format: OutputFormat, summary: &ActivitySummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(summary)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nWeekly Activity");
    println!("===============");

    if summary.workouts.is_empty() {
        println!("No workouts in the last 7 days.");
        return Ok(());
    }

    println!(
        "{} workouts, {:.0} min, {:.0} kcal",
        summary.count(),
        summary.total_minutes,
        summary.total_kcal
    );
    println!();

    // Header
    println!("{:<12} {:>10} {:>10} {:>14}", "Kind", "Min", "kcal", "Date");
    println!("{}", "-".repeat(49));

    for entry in &summary.workouts {
        let date_str = entry
            .workout
            .start
            .with_timezone(&Local)
            .format("%m/%d %H:%M")
            .to_string();

        println!(
            "{:<12} {:>10.0} {:>10.0} {:>14}",
            entry.workout.kind.label(),
            entry.duration_minutes,
            entry.energy_kcal,
            date_str
        );
    }

    Ok(())
}

pub fn print_weight_history(
    output_format: OutputFormat,
    days: u64,
    samples: &[QuantitySample],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(samples)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nWeight History");
    println!("==============");
    println!("Last {} days: {} readings", days, samples.len());
    println!();

    if samples.is_empty() {
        println!("No weight records in this window.");
        return Ok(());
    }

    // Header
    println!("{:<14} {:>8}", "Date", "kg");
    println!("{}", "-".repeat(23));

    for sample in samples {
        let date_str = sample
            .end
            .with_timezone(&Local)
            .format("%m/%d %H:%M")
            .to_string();
        println!("{:<14} {:>8.1}", date_str, sample.value);
    }

    Ok(())
}

pub fn print_water_history(
    output_format: OutputFormat,
    days: u64,
    totals: &[DailyTotal],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(totals)?;
        println!("{}", content);
        return Ok(());
    }

    let total_liters: f64 = totals.iter().map(|t| t.total).sum();

    println!("\nWater History");
    println!("=============");
    println!("Last {} days: {:.2} L total", days, total_liters);
    println!();

    if totals.is_empty() {
        println!("No water records in this window.");
        return Ok(());
    }

    // Header
    println!("{:<12} {:>8}", "Day", "L");
    println!("{}", "-".repeat(21));

    for total in totals {
        let day_str = total.day.format("%Y-%m-%d").to_string();
        println!("{:<12} {:>8.2}", day_str, total.total);
    }

    Ok(())
}

pub fn print_report(output_format: OutputFormat, days: u64, series: &ReportSeries) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(series)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nReport");
    println!("======");
    println!("Window: {} days", days);
    println!();

    // Weight trend, oldest reading to newest
    if series.weight.is_empty() {
        println!("Weight: no records");
    } else {
        let first = &series.weight[0];
        let last = &series.weight[series.weight.len() - 1];
        if series.weight.len() == 1 {
            println!("Weight: {:.1} kg (1 reading)", last.value);
        } else {
            println!(
                "Weight: {:.1} -> {:.1} kg ({:+.1} kg, {} readings)",
                first.value,
                last.value,
                last.value - first.value,
                series.weight.len()
            );
        }
    }

    // Water totals over the window
    let total: f64 = series.water.iter().map(|t| t.total).sum();
    let logged = series.water.iter().filter(|t| t.total > 0.0).count();
    if logged == 0 {
        println!("Water:  no records");
    } else {
        println!(
            "Water:  {:.2} L over {} logged days (avg {:.2} L/day)",
            total,
            logged,
            total / logged as f64
        );
    }

    Ok(())
}
