use crate::error::Result;
use crate::reports::Report;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub const MONTHLY_FILE: &str = "monthly_summary.csv";
pub const OVERALL_FILE: &str = "overall_summary.csv";
pub const CHARTS_FILE: &str = "charts.json";

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFiles {
    pub monthly: PathBuf,
    pub overall: PathBuf,
    pub charts: PathBuf,
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Export both tables and the chart map into `dir`, creating it if needed.
pub fn write_report(dir: &Path, report: &Report) -> Result<WrittenFiles> {
    std::fs::create_dir_all(dir)?;
    let files = WrittenFiles {
        monthly: dir.join(MONTHLY_FILE),
        overall: dir.join(OVERALL_FILE),
        charts: dir.join(CHARTS_FILE),
    };
    write_csv(&files.monthly, &report.monthly_table)?;
    write_csv(&files.overall, &report.overall_table)?;
    write_json(&files.charts, &report.charts)?;
    info!(dir = %dir.display(), months = report.monthly.len(), "report written");
    Ok(files)
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    match render_table(rows, max_rows) {
        Some(table_str) => println!("{}\n", table_str),
        None => println!("(no rows)\n"),
    }
}
