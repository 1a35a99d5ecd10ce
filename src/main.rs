// Entry point and high-level CLI flow.
//
// - Option [1] loads and validates the production CSV, printing diagnostics.
// - Option [2] builds the monthly report, exports the tables and chart
//   series, and prints previews of both tables.
// - `--batch` runs [1] then [2] once and exits.
mod charts;
mod config;
mod error;
mod loader;
mod logging;
mod output;
mod reports;
mod types;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use config::{AppConfig, Cli};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::info;
use types::ProductionRecord;

// The last loaded dataset, so reports can be regenerated without reloading.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<ProductionRecord>>,
}

/// `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` on `N` or end of input.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(cfg: &AppConfig) -> Result<()> {
    let (data, load_report) = loader::load_from_path(&cfg.input)
        .with_context(|| format!("failed to load {}", cfg.input.display()))?;
    println!(
        "Processing dataset... ({} rows loaded across {} months)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.months)
    );
    if load_report.undefined_efficiency_rows > 0 {
        println!(
            "Note: {} rows have no positive net input; their efficiency is reported as N/A.",
            util::format_int(load_report.undefined_efficiency_rows)
        );
    }
    println!();
    let mut state = APP_STATE
        .lock()
        .map_err(|_| anyhow::anyhow!("application state lock poisoned"))?;
    state.data = Some(data);
    Ok(())
}

fn handle_generate_reports(cfg: &AppConfig) -> Result<bool> {
    let data = {
        let state = APP_STATE
            .lock()
            .map_err(|_| anyhow::anyhow!("application state lock poisoned"))?;
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(false);
    };

    let report = reports::build_report(&data);
    if report.is_empty() {
        println!("The loaded file has no production rows; totals are zero and averages N/A.\n");
    }
    let files = output::write_report(&cfg.output_dir, &report)
        .with_context(|| format!("failed to write report to {}", cfg.output_dir.display()))?;

    println!("Monthly Production Summary\n");
    output::preview_table_rows(&report.monthly_table, cfg.preview_rows);
    if report.monthly.len() > cfg.preview_rows {
        println!("(Full table exported to {})\n", files.monthly.display());
    }

    for note in report.undefined_efficiency_notes() {
        println!("Note: {}", note);
    }
    println!("Overall Summary\n");
    output::preview_table_rows(&report.overall_table, 2);
    println!("(Exported to {})\n", files.overall.display());

    println!(
        "Total final steel: {} tons",
        util::format_number(report.overall.total.final_steel, 2)
    );
    let chart_ids: Vec<&str> = charts::ChartKind::ALL
        .into_iter()
        .filter(|k| report.charts.contains_key(k))
        .map(|k| k.id())
        .collect();
    println!(
        "Chart series ({}) saved to {}\n",
        chart_ids.join(", "),
        files.charts.display()
    );
    info!(months = report.monthly.len(), "report generated");
    Ok(true)
}

fn run_batch(cfg: &AppConfig) -> Result<()> {
    handle_load(cfg)?;
    handle_generate_reports(cfg)?;
    Ok(())
}

fn run_menu(cfg: &AppConfig) {
    loop {
        println!("Steel Production Report");
        println!("[1] Load the file ({})", cfg.input.display());
        println!("[2] Generate Reports\n");
        let Some(choice) = read_choice() else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Err(e) = handle_load(cfg) {
                    eprintln!("Failed to load file: {:#}\n", e);
                }
            }
            "2" => {
                println!();
                match handle_generate_reports(cfg) {
                    Ok(true) => {
                        if !prompt_back_to_menu() {
                            println!("Exiting the program.");
                            break;
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        eprintln!("Report generation failed: {:#}\n", e);
                    }
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let cfg: AppConfig = Cli::parse().into();
    info!(input = %cfg.input.display(), output_dir = %cfg.output_dir.display(), "starting");

    if cfg.batch {
        run_batch(&cfg)
    } else {
        run_menu(&cfg);
        Ok(())
    }
}
