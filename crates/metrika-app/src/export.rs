//! CSV export for report series

use std::path::Path;

use chrono::Local;
use serde::Serialize;

use metrika_types::{DailyTotal, Error, QuantitySample, Result};

/// Weight and water series backing the report command
#[derive(Debug, Clone, Serialize)]
pub struct ReportSeries {
    pub weight: Vec<QuantitySample>,
    pub water: Vec<DailyTotal>,
}

/// One flat CSV row; headers come from the field names
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    series: &'a str,
    date: String,
    value: f64,
    unit: &'a str,
}

/// Write both series to one CSV file, weight rows first
pub fn export_report_csv(path: &Path, series: &ReportSeries) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::CsvExport(e.to_string()))?;

    for sample in &series.weight {
        let row = ReportRow {
            series: "weight",
            date: sample
                .end
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            value: sample.value,
            unit: "kg",
        };
        writer
            .serialize(row)
            .map_err(|e| Error::CsvExport(e.to_string()))?;
    }

    for total in &series.water {
        let row = ReportRow {
            series: "water",
            date: total.day.format("%Y-%m-%d").to_string(),
            value: total.total,
            unit: "L",
        };
        writer
            .serialize(row)
            .map_err(|e| Error::CsvExport(e.to_string()))?;
    }

    writer.flush().map_err(|e| Error::CsvExport(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use metrika_types::MetricKind;

    #[test]
    fn test_export_writes_both_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let at = Utc::now();
        let series = ReportSeries {
            weight: vec![QuantitySample::instant(MetricKind::BodyMass, 72.5, at)],
            water: vec![
                DailyTotal {
                    day: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
                    total: 0.0,
                },
                DailyTotal {
                    day: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                    total: 1.5,
                },
            ],
        };

        export_report_csv(&path, &series).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "series,date,value,unit");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("weight,"));
        assert!(lines[1].ends_with(",kg"));
        assert!(content.contains("water,2025-11-03,1.5,L"));
    }

    #[test]
    fn test_export_to_unwritable_path_errors() {
        let series = ReportSeries {
            weight: Vec::new(),
            water: Vec::new(),
        };
        let result = export_report_csv(Path::new("/nonexistent/dir/report.csv"), &series);
        assert!(matches!(result, Err(Error::CsvExport(_))));
    }
}
