use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// Header names every production file must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Date",
    "Coal",
    "Limestone",
    "IronOre",
    "SlagWaste",
    "CoalWaste",
    "OreWaste",
    "FinalSteel",
];

pub const OVERALL_TOTAL_LABEL: &str = "Overall Total";
pub const OVERALL_AVERAGE_LABEL: &str = "Overall Average";

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Coal")]
    pub coal: Option<String>,
    #[serde(rename = "Limestone")]
    pub limestone: Option<String>,
    #[serde(rename = "IronOre")]
    pub iron_ore: Option<String>,
    #[serde(rename = "SlagWaste")]
    pub slag_waste: Option<String>,
    #[serde(rename = "CoalWaste")]
    pub coal_waste: Option<String>,
    #[serde(rename = "OreWaste")]
    pub ore_waste: Option<String>,
    #[serde(rename = "FinalSteel")]
    pub final_steel: Option<String>,
}

/// One day of production, all quantities in tons.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRecord {
    pub date: NaiveDate,
    pub coal: f64,
    pub limestone: f64,
    pub iron_ore: f64,
    pub slag_waste: f64,
    pub coal_waste: f64,
    pub ore_waste: f64,
    pub final_steel: f64,
}

impl ProductionRecord {
    pub fn total_input(&self) -> f64 {
        self.coal + self.limestone + self.iron_ore
    }

    pub fn total_waste(&self) -> f64 {
        self.slag_waste + self.coal_waste + self.ore_waste
    }

    /// Final steel as a percentage of net consumed input.
    ///
    /// Returns `None` when the net input is zero or negative, since the ratio
    /// has no physical meaning there.
    pub fn efficiency(&self) -> Option<f64> {
        let net = self.total_input() - self.total_waste();
        if net <= 0.0 {
            return None;
        }
        let eff = self.final_steel / net * 100.0;
        eff.is_finite().then_some(eff)
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// A record with its derived columns attached.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub record: ProductionRecord,
    pub total_input: f64,
    pub total_waste: f64,
    pub efficiency: Option<f64>,
}

impl EnrichedRecord {
    pub fn from_record(record: ProductionRecord) -> Self {
        Self {
            total_input: record.total_input(),
            total_waste: record.total_waste(),
            efficiency: record.efficiency(),
            record,
        }
    }
}

/// Calendar month used as the grouping key. Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The eight statistics reported for a month or for the whole period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub coal: f64,
    pub limestone: f64,
    pub iron_ore: f64,
    pub slag_waste: f64,
    pub coal_waste: f64,
    pub ore_waste: f64,
    pub final_steel: f64,
    pub efficiency: Option<f64>,
}

impl Statistics {
    /// The seven tonnage columns in table order.
    pub fn tonnages(&self) -> [f64; 7] {
        [
            self.coal,
            self.limestone,
            self.iron_ore,
            self.slag_waste,
            self.coal_waste,
            self.ore_waste,
            self.final_steel,
        ]
    }

    pub fn from_tonnages(t: [f64; 7], efficiency: Option<f64>) -> Self {
        Self {
            coal: t[0],
            limestone: t[1],
            iron_ore: t[2],
            slag_waste: t[3],
            coal_waste: t[4],
            ore_waste: t[5],
            final_steel: t[6],
            efficiency,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    pub month: MonthKey,
    /// Tonnages are sums over the month, efficiency is the mean of row efficiencies.
    pub stats: Statistics,
    pub rows: usize,
    /// Rows whose efficiency was undefined and left out of the mean.
    pub undefined_efficiency_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverallSummary {
    pub total: Statistics,
    pub average: Statistics,
}

/// A display row shared by the monthly and the overall table.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct FormattedRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Coal")]
    #[tabled(rename = "Coal")]
    pub coal: String,
    #[serde(rename = "Limestone")]
    #[tabled(rename = "Limestone")]
    pub limestone: String,
    #[serde(rename = "IronOre")]
    #[tabled(rename = "IronOre")]
    pub iron_ore: String,
    #[serde(rename = "SlagWaste")]
    #[tabled(rename = "SlagWaste")]
    pub slag_waste: String,
    #[serde(rename = "CoalWaste")]
    #[tabled(rename = "CoalWaste")]
    pub coal_waste: String,
    #[serde(rename = "OreWaste")]
    #[tabled(rename = "OreWaste")]
    pub ore_waste: String,
    #[serde(rename = "FinalSteel")]
    #[tabled(rename = "FinalSteel")]
    pub final_steel: String,
    #[serde(rename = "Efficiency(%)")]
    #[tabled(rename = "Efficiency(%)")]
    pub efficiency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: (i32, u32, u32), values: [f64; 7]) -> ProductionRecord {
        ProductionRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            coal: values[0],
            limestone: values[1],
            iron_ore: values[2],
            slag_waste: values[3],
            coal_waste: values[4],
            ore_waste: values[5],
            final_steel: values[6],
        }
    }

    #[test]
    fn derives_input_waste_and_efficiency() {
        let r = record((2024, 1, 3), [100.0, 50.0, 30.0, 5.0, 3.0, 2.0, 150.0]);
        assert_eq!(r.total_input(), 180.0);
        assert_eq!(r.total_waste(), 10.0);
        let eff = r.efficiency().unwrap();
        assert!((eff - 150.0 / 170.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn efficiency_is_undefined_without_net_input() {
        let balanced = record((2024, 1, 3), [10.0, 5.0, 5.0, 10.0, 5.0, 5.0, 1.0]);
        assert_eq!(balanced.efficiency(), None);
        let negative = record((2024, 1, 3), [1.0, 1.0, 1.0, 10.0, 0.0, 0.0, 1.0]);
        assert_eq!(negative.efficiency(), None);
    }

    #[test]
    fn month_keys_order_chronologically() {
        let mut keys = vec![
            MonthKey::new(2024, 2),
            MonthKey::new(2023, 12),
            MonthKey::new(2024, 1),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn enriched_record_carries_derived_columns() {
        let r = record((2024, 3, 9), [200.0, 60.0, 40.0, 10.0, 5.0, 5.0, 260.0]);
        let e = EnrichedRecord::from_record(r.clone());
        assert_eq!(e.total_input, 300.0);
        assert_eq!(e.total_waste, 20.0);
        assert_eq!(e.efficiency, r.efficiency());
        assert_eq!(e.record.month(), MonthKey::new(2024, 3));
    }
}
