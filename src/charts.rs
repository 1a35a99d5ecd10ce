// Chart-ready series derived from the monthly grouping.
//
// Rendering is left to whoever consumes `charts.json`; each chart carries its
// month axis, labels and the ordered values to plot.
use crate::types::MonthlyAggregate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    RawMaterials,
    Waste,
    Steel,
    Efficiency,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::RawMaterials,
        ChartKind::Waste,
        ChartKind::Steel,
        ChartKind::Efficiency,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ChartKind::RawMaterials => "raw_materials",
            ChartKind::Waste => "waste",
            ChartKind::Steel => "steel",
            ChartKind::Efficiency => "efficiency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    Line,
    StackedBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: &'static str,
    /// One point per month; `None` where the value is undefined.
    pub values: Vec<Option<f64>>,
    /// Bottom of each bar for stacked charts (the running sum of the series
    /// stacked below). Empty for unstacked charts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub base: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: &'static str,
    pub y_label: &'static str,
    pub style: ChartStyle,
    pub months: Vec<String>,
    pub series: Vec<Series>,
}

pub type ChartSet = BTreeMap<ChartKind, Chart>;

fn line(label: &'static str, values: Vec<f64>) -> Series {
    Series {
        label,
        values: values.into_iter().map(Some).collect(),
        base: Vec::new(),
    }
}

pub fn build_charts(monthly: &[MonthlyAggregate]) -> ChartSet {
    let months: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
    let column = |f: fn(&MonthlyAggregate) -> f64| monthly.iter().map(f).collect::<Vec<f64>>();

    let raw = Chart {
        title: "Monthly Raw Material Consumption",
        y_label: "Tons",
        style: ChartStyle::Line,
        months: months.clone(),
        series: vec![
            line("Coal", column(|m| m.stats.coal)),
            line("Limestone", column(|m| m.stats.limestone)),
            line("Iron Ore", column(|m| m.stats.iron_ore)),
        ],
    };

    // Stacked bottom to top: slag, coal, ore.
    let layers = [
        ("Slag Waste", column(|m| m.stats.slag_waste)),
        ("Coal Waste", column(|m| m.stats.coal_waste)),
        ("Ore Waste", column(|m| m.stats.ore_waste)),
    ];
    let mut offset = vec![0.0; monthly.len()];
    let mut waste_series = Vec::with_capacity(layers.len());
    for (label, values) in layers {
        let base = offset.clone();
        for (o, v) in offset.iter_mut().zip(&values) {
            *o += v;
        }
        waste_series.push(Series {
            label,
            values: values.into_iter().map(Some).collect(),
            base,
        });
    }
    let waste = Chart {
        title: "Monthly Waste Generated",
        y_label: "Tons",
        style: ChartStyle::StackedBar,
        months: months.clone(),
        series: waste_series,
    };

    let steel = Chart {
        title: "Monthly Final Steel Production",
        y_label: "Tons",
        style: ChartStyle::Line,
        months: months.clone(),
        series: vec![line("Final Steel", column(|m| m.stats.final_steel))],
    };

    let efficiency = Chart {
        title: "Monthly Efficiency (%)",
        y_label: "Efficiency %",
        style: ChartStyle::Line,
        months,
        series: vec![Series {
            label: "Efficiency",
            values: monthly.iter().map(|m| m.stats.efficiency).collect(),
            base: Vec::new(),
        }],
    };

    BTreeMap::from([
        (ChartKind::RawMaterials, raw),
        (ChartKind::Waste, waste),
        (ChartKind::Steel, steel),
        (ChartKind::Efficiency, efficiency),
    ])
}
