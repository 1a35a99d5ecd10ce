use crate::error::{ReportError, Result};
use crate::types::{ProductionRecord, RawRow, REQUIRED_COLUMNS};
use crate::util::{parse_date_safe, parse_f64_safe};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub months: usize,
    pub undefined_efficiency_rows: usize,
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<(Vec<ProductionRecord>, LoadReport)> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading production data");
    let file = File::open(path)?;
    load_from_reader(file)
}

/// Read a production CSV. The header is validated before any row is parsed and
/// the first malformed row fails the whole dataset.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<ProductionRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    check_columns(&headers)?;

    let mut records = Vec::new();
    let mut raw = StringRecord::new();
    while rdr.read_record(&mut raw)? {
        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let row: RawRow = raw.deserialize(Some(&headers))?;
        records.push(clean_row(row, line)?);
    }

    let months: BTreeSet<_> = records.iter().map(ProductionRecord::month).collect();
    let undefined_efficiency_rows = records.iter().filter(|r| r.efficiency().is_none()).count();
    if records.is_empty() {
        warn!("production file contains no data rows");
    }
    if undefined_efficiency_rows > 0 {
        warn!(
            rows = undefined_efficiency_rows,
            "rows without positive net input; their efficiency is undefined"
        );
    }

    let report = LoadReport {
        total_rows: records.len(),
        months: months.len(),
        undefined_efficiency_rows,
    };
    debug!(?report, "load finished");
    Ok((records, report))
}

fn check_columns(headers: &StringRecord) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReportError::MissingColumns { columns: missing })
    }
}

fn clean_row(row: RawRow, line: u64) -> Result<ProductionRecord> {
    let date = parse_date_safe(row.date.as_deref()).ok_or_else(|| ReportError::InvalidDate {
        line,
        value: row.date.clone().unwrap_or_default(),
    })?;
    // Tonnages are physical quantities: finite and not below zero.
    let number = |column: &'static str, value: &Option<String>| -> Result<f64> {
        let v = parse_f64_safe(value.as_deref()).ok_or_else(|| ReportError::InvalidNumber {
            line,
            column,
            value: value.clone().unwrap_or_default(),
        })?;
        if v < 0.0 {
            return Err(ReportError::NegativeQuantity { line, column, value: v });
        }
        // `-0` reads as negative zero, which would render as `-0.00`.
        Ok(v + 0.0)
    };

    Ok(ProductionRecord {
        date,
        coal: number("Coal", &row.coal)?,
        limestone: number("Limestone", &row.limestone)?,
        iron_ore: number("IronOre", &row.iron_ore)?,
        slag_waste: number("SlagWaste", &row.slag_waste)?,
        coal_waste: number("CoalWaste", &row.coal_waste)?,
        ore_waste: number("OreWaste", &row.ore_waste)?,
        final_steel: number("FinalSteel", &row.final_steel)?,
    })
}
