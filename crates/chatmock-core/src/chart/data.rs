//! Fixed sample tables, one row type per data context.

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;

use super::DataContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRow {
    pub name: &'static str,
    pub value: i64,
    pub target: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceRow {
    pub month: &'static str,
    pub revenue: i64,
    pub expenses: i64,
    pub profit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemographicsRow {
    pub name: &'static str,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevicesRow {
    pub name: &'static str,
    pub desktop: i64,
    pub mobile: i64,
    pub tablet: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelationRow {
    pub x: i64,
    pub y: i64,
}

const SALES: [(&str, i64, i64); 6] = [
    ("Jan", 400, 350),
    ("Feb", 300, 320),
    ("Mar", 500, 450),
    ("Apr", 200, 280),
    ("May", 700, 600),
    ("Jun", 450, 400),
];

const PERFORMANCE: [(&str, i64, i64); 4] = [
    ("Q1", 4000, 2400),
    ("Q2", 3000, 1398),
    ("Q3", 2000, 980),
    ("Q4", 2780, 1908),
];

const DEMOGRAPHICS: [(&str, i64); 4] = [("18-25", 23), ("26-35", 34), ("36-45", 28), ("46-55", 15)];

const DEVICES: [(&str, i64, i64, i64); 4] = [
    ("Q1", 45, 30, 15),
    ("Q2", 40, 35, 18),
    ("Q3", 35, 40, 20),
    ("Q4", 38, 42, 22),
];

const CORRELATION: [(i64, i64); 6] = [(10, 30), (20, 45), (30, 25), (40, 60), (50, 55), (60, 40)];

/// Rows of one chart. Every variant has a fixed column set, so a row can
/// never be missing a key the config points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Sales(Vec<SalesRow>),
    Performance(Vec<PerformanceRow>),
    Demographics(Vec<DemographicsRow>),
    Devices(Vec<DevicesRow>),
    Correlation(Vec<CorrelationRow>),
}

impl ChartData {
    /// The sample table for `context` with per-field jitter applied.
    pub fn sample<R: Rng + ?Sized>(context: DataContext, rng: &mut R) -> Self {
        match context {
            DataContext::Sales => ChartData::Sales(
                SALES
                    .iter()
                    .map(|&(name, value, target)| SalesRow {
                        name,
                        value: value + rng.gen_range(-50..=50),
                        target,
                    })
                    .collect(),
            ),
            DataContext::Performance => ChartData::Performance(
                PERFORMANCE
                    .iter()
                    .map(|&(month, revenue, expenses)| {
                        let revenue = revenue + rng.gen_range(-200..=200);
                        let expenses = expenses + rng.gen_range(-100..=100);
                        PerformanceRow {
                            month,
                            revenue,
                            expenses,
                            profit: revenue - expenses,
                        }
                    })
                    .collect(),
            ),
            DataContext::Demographics => ChartData::Demographics(
                DEMOGRAPHICS
                    .iter()
                    .map(|&(name, value)| DemographicsRow {
                        name,
                        value: value + rng.gen_range(-5..=5),
                    })
                    .collect(),
            ),
            DataContext::Devices => ChartData::Devices(
                DEVICES
                    .iter()
                    .map(|&(name, desktop, mobile, tablet)| DevicesRow {
                        name,
                        desktop: desktop + rng.gen_range(-3..=3),
                        mobile: mobile + rng.gen_range(-3..=3),
                        tablet: tablet + rng.gen_range(-2..=2),
                    })
                    .collect(),
            ),
            DataContext::Correlation => ChartData::Correlation(
                CORRELATION
                    .iter()
                    .map(|&(x, y)| CorrelationRow {
                        x: x + rng.gen_range(-5..=5),
                        y: y + rng.gen_range(-10..=10),
                    })
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ChartData::Sales(rows) => rows.len(),
            ChartData::Performance(rows) => rows.len(),
            ChartData::Demographics(rows) => rows.len(),
            ChartData::Devices(rows) => rows.len(),
            ChartData::Correlation(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every row as `(column, rendered value)` pairs.
    pub fn cells(&self) -> Vec<Vec<(&'static str, String)>> {
        match self {
            ChartData::Sales(rows) => rows
                .iter()
                .map(|r| {
                    vec![
                        ("name", r.name.to_owned()),
                        ("value", r.value.to_string()),
                        ("target", r.target.to_string()),
                    ]
                })
                .collect(),
            ChartData::Performance(rows) => rows
                .iter()
                .map(|r| {
                    vec![
                        ("month", r.month.to_owned()),
                        ("revenue", r.revenue.to_string()),
                        ("expenses", r.expenses.to_string()),
                        ("profit", r.profit.to_string()),
                    ]
                })
                .collect(),
            ChartData::Demographics(rows) => rows
                .iter()
                .map(|r| vec![("name", r.name.to_owned()), ("value", r.value.to_string())])
                .collect(),
            ChartData::Devices(rows) => rows
                .iter()
                .map(|r| {
                    vec![
                        ("name", r.name.to_owned()),
                        ("desktop", r.desktop.to_string()),
                        ("mobile", r.mobile.to_string()),
                        ("tablet", r.tablet.to_string()),
                    ]
                })
                .collect(),
            ChartData::Correlation(rows) => rows
                .iter()
                .map(|r| vec![("x", r.x.to_string()), ("y", r.y.to_string())])
                .collect(),
        }
    }

    /// Sorted union of the column names across all rows.
    pub fn column_names(&self) -> BTreeSet<&'static str> {
        self.cells()
            .iter()
            .flat_map(|row| row.iter().map(|(key, _)| *key))
            .collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
