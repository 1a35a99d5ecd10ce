use crate::charts::{build_charts, ChartSet};
use crate::types::{
    EnrichedRecord, FormattedRow, MonthKey, MonthlyAggregate, OverallSummary, ProductionRecord,
    Statistics, OVERALL_AVERAGE_LABEL, OVERALL_TOTAL_LABEL,
};
use crate::util::{average, average_defined, format_percent, format_tons};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Everything the presentation layer needs from one production file.
#[derive(Debug, Clone)]
pub struct Report {
    pub monthly: Vec<MonthlyAggregate>,
    pub overall: OverallSummary,
    pub monthly_table: Vec<FormattedRow>,
    pub overall_table: Vec<FormattedRow>,
    pub charts: ChartSet,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty()
    }

    /// One line per month whose efficiency mean leaves some rows out.
    pub fn undefined_efficiency_notes(&self) -> Vec<String> {
        self.monthly
            .iter()
            .filter(|m| m.undefined_efficiency_rows > 0)
            .map(|m| {
                format!(
                    "{}: {} of {} rows without positive net input (efficiency {})",
                    m.month,
                    m.undefined_efficiency_rows,
                    m.rows,
                    format_percent(m.stats.efficiency)
                )
            })
            .collect()
    }
}

pub fn build_report(data: &[ProductionRecord]) -> Report {
    let monthly = aggregate_monthly(data);
    if monthly.is_empty() {
        warn!("no production rows; building an empty report");
    }
    let overall = summarize_overall(&monthly);
    Report {
        monthly_table: format_monthly_table(&monthly),
        overall_table: format_overall_table(&overall),
        charts: build_charts(&monthly),
        monthly,
        overall,
    }
}

pub fn enrich(data: &[ProductionRecord]) -> Vec<EnrichedRecord> {
    data.iter().cloned().map(EnrichedRecord::from_record).collect()
}

pub fn aggregate_monthly(data: &[ProductionRecord]) -> Vec<MonthlyAggregate> {
    #[derive(Default)]
    struct Acc {
        tons: [f64; 7],
        eff_sum: f64,
        eff_count: usize,
        rows: usize,
    }

    let mut map: BTreeMap<MonthKey, Acc> = BTreeMap::new();
    for r in enrich(data) {
        let e = map.entry(r.record.month()).or_default();
        let tons = [
            r.record.coal,
            r.record.limestone,
            r.record.iron_ore,
            r.record.slag_waste,
            r.record.coal_waste,
            r.record.ore_waste,
            r.record.final_steel,
        ];
        for (sum, v) in e.tons.iter_mut().zip(tons) {
            *sum += v;
        }
        match r.efficiency {
            Some(eff) => {
                e.eff_sum += eff;
                e.eff_count += 1;
            }
            None => debug!(
                date = %r.record.date,
                total_input = r.total_input,
                total_waste = r.total_waste,
                "efficiency undefined; row left out of the monthly mean"
            ),
        }
        e.rows += 1;
    }

    map.into_iter()
        .map(|(month, acc)| {
            let mean_efficiency = if acc.eff_count == 0 {
                None
            } else {
                Some(acc.eff_sum / acc.eff_count as f64)
            };
            debug!(%month, rows = acc.rows, "aggregated month");
            MonthlyAggregate {
                month,
                stats: Statistics::from_tonnages(acc.tons, mean_efficiency),
                rows: acc.rows,
                undefined_efficiency_rows: acc.rows - acc.eff_count,
            }
        })
        .collect()
}

/// Total and average of each statistic across months. These are second-order
/// aggregates of the monthly figures, not recomputed from rows.
pub fn summarize_overall(monthly: &[MonthlyAggregate]) -> OverallSummary {
    let mut total = [0.0; 7];
    let mut average_tons = [0.0; 7];
    for (i, (t, a)) in total.iter_mut().zip(average_tons.iter_mut()).enumerate() {
        let column: Vec<f64> = monthly.iter().map(|m| m.stats.tonnages()[i]).collect();
        *t = column.iter().fold(0.0, |acc, v| acc + v);
        *a = average(&column);
    }

    let efficiencies: Vec<Option<f64>> = monthly.iter().map(|m| m.stats.efficiency).collect();
    let total_efficiency = efficiencies.iter().flatten().fold(0.0, |acc, v| acc + v);

    OverallSummary {
        total: Statistics::from_tonnages(total, Some(total_efficiency)),
        average: Statistics::from_tonnages(average_tons, average_defined(efficiencies)),
    }
}

fn format_row(label: String, stats: &Statistics) -> FormattedRow {
    FormattedRow {
        date: label,
        coal: format_tons(stats.coal),
        limestone: format_tons(stats.limestone),
        iron_ore: format_tons(stats.iron_ore),
        slag_waste: format_tons(stats.slag_waste),
        coal_waste: format_tons(stats.coal_waste),
        ore_waste: format_tons(stats.ore_waste),
        final_steel: format_tons(stats.final_steel),
        efficiency: format_percent(stats.efficiency),
    }
}

pub fn format_monthly_table(monthly: &[MonthlyAggregate]) -> Vec<FormattedRow> {
    monthly
        .iter()
        .map(|m| format_row(m.month.to_string(), &m.stats))
        .collect()
}

pub fn format_overall_table(overall: &OverallSummary) -> Vec<FormattedRow> {
    vec![
        format_row(OVERALL_TOTAL_LABEL.to_string(), &overall.total),
        format_row(OVERALL_AVERAGE_LABEL.to_string(), &overall.average),
    ]
}
