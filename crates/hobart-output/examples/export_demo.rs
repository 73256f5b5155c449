//! Demonstration of the export and summary output in hobart-output.

use chrono::NaiveDate;
use hobart_output::{CycleExport, ExportFormat, Exporter, RunSummary, TargetExport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Hobart Export Demo ===\n");

    let date = NaiveDate::from_ymd_opt(2019, 2, 1).ok_or("invalid date")?;
    let cycle = CycleExport {
        strategy: "residual_momentum".to_string(),
        date,
        month: "2019-02".to_string(),
        eligible: 812,
        ranked: 640,
        excluded: 2,
        long: vec!["AAPL".to_string(), "MSFT".to_string()],
        short: vec!["XOM".to_string(), "GE".to_string()],
        targets: vec![
            TargetExport {
                symbol: "AAPL".to_string(),
                weight: 0.5,
            },
            TargetExport {
                symbol: "MSFT".to_string(),
                weight: 0.5,
            },
            TargetExport {
                symbol: "XOM".to_string(),
                weight: -0.5,
            },
            TargetExport {
                symbol: "GE".to_string(),
                weight: -0.5,
            },
        ],
        liquidations: vec!["IBM".to_string()],
    };

    println!("CSV Format:");
    println!("{}", cycle.export_to_string(ExportFormat::Csv)?);

    println!("Pretty JSON Format:");
    println!("{}\n", cycle.export_to_string(ExportFormat::PrettyJson)?);

    let summary = RunSummary::new("residual_momentum", Some(date), Some(date), 1, &[cycle]);
    println!("{}", summary.to_ascii_table());

    Ok(())
}
