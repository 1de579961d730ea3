//! Keyword-driven sample charts rendered as markdown tables.
//!
//! A prompt is scanned twice: once for the kind of chart wanted
//! ([`detect_chart_request`]) and once for the kind of data to show
//! ([`detect_data_context`]). The pair picks a fixed sample table, which is
//! jittered and rendered into a ```` ```chart{...} ```` fenced block the web
//! client turns into a live chart.

mod data;
mod detect;
mod render;

use rand::Rng;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use data::{ChartData, CorrelationRow, DemographicsRow, DevicesRow, PerformanceRow, SalesRow};
pub use detect::{detect_chart_request, detect_data_context};
pub use render::{chart_block, render_all_charts, render_chart, render_request};

/// Default palette; only the first colour makes it into the fence attributes.
pub const PALETTE: [&str; 5] = ["#8884d8", "#82ca9d", "#ffc658", "#ff7300", "#00ff7f"];

const DEFAULT_HEIGHT: u32 = 300;
const PIE_HEIGHT: u32 = 350;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Area,
    Scatter,
}

impl ChartKind {
    /// Phrases that ask for this kind explicitly.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ChartKind::Bar => &["bar chart", "bar graph", "column chart", "histogram"],
            ChartKind::Line => &["line chart", "line graph", "trend", "time series"],
            ChartKind::Pie => &["pie chart", "pie graph", "distribution", "percentage"],
            ChartKind::Area => &["area chart", "area graph", "filled chart"],
            ChartKind::Scatter => &["scatter plot", "scatter chart", "correlation", "xy plot"],
        }
    }

    /// Data set used for this kind in the all-charts showcase.
    pub fn showcase_context(self) -> DataContext {
        match self {
            ChartKind::Bar => DataContext::Sales,
            ChartKind::Line => DataContext::Performance,
            ChartKind::Pie => DataContext::Demographics,
            ChartKind::Area => DataContext::Devices,
            ChartKind::Scatter => DataContext::Correlation,
        }
    }

    /// Heading form, e.g. `"Bar"`.
    pub fn heading(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
            ChartKind::Area => "Area",
            ChartKind::Scatter => "Scatter",
        }
    }

    /// Kinds that plot every value series instead of just the first.
    fn plots_all_series(self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::Line | ChartKind::Area)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DataContext {
    #[default]
    Sales,
    Performance,
    Demographics,
    Devices,
    Correlation,
}

impl DataContext {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            DataContext::Sales => &["sales", "revenue", "money", "profit"],
            DataContext::Performance => &["performance", "metrics", "quarterly"],
            DataContext::Demographics => &["age", "demographic", "population"],
            DataContext::Devices => &["device", "platform", "browser"],
            DataContext::Correlation => &["correlation", "relationship", "scatter"],
        }
    }

    fn title(self) -> &'static str {
        match self {
            DataContext::Sales => "Sales Performance",
            DataContext::Performance => "Quarterly Performance",
            DataContext::Demographics => "Age Demographics",
            DataContext::Devices => "Device Usage",
            DataContext::Correlation => "Data Correlation",
        }
    }

    fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            DataContext::Sales => ("Month", "Sales ($)"),
            DataContext::Performance => ("Quarter", "Amount ($)"),
            DataContext::Demographics => ("Age Group", "Percentage"),
            DataContext::Devices => ("Device Type", "Usage (%)"),
            DataContext::Correlation => ("X Values", "Y Values"),
        }
    }

    /// Category (x) column of this context's rows.
    pub fn x_key(self) -> &'static str {
        match self {
            DataContext::Sales | DataContext::Demographics | DataContext::Devices => "name",
            DataContext::Performance => "month",
            DataContext::Correlation => "x",
        }
    }

    /// Value columns of this context's rows, primary series first.
    pub fn series(self) -> &'static [&'static str] {
        match self {
            DataContext::Sales => &["value", "target"],
            DataContext::Performance => &["revenue", "expenses", "profit"],
            DataContext::Demographics => &["value"],
            DataContext::Devices => &["desktop", "mobile", "tablet"],
            DataContext::Correlation => &["y"],
        }
    }
}

/// What the prompt asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRequest {
    Single(ChartKind),
    /// One chart of every kind, each with its showcase data.
    All,
}

/// Display settings carried alongside the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_key: &'static str,
    /// Never empty; the first entry is the primary series.
    pub y_key: Vec<&'static str>,
    pub height: u32,
    pub colors: &'static [&'static str],
}

impl ChartConfig {
    pub fn new(kind: ChartKind, context: DataContext) -> Self {
        let (x_label, y_label) = context.axis_labels();
        let series = context.series();
        let y_key = if kind.plots_all_series() {
            series.to_vec()
        } else {
            series[..1].to_vec()
        };

        let base_title = context.title();
        let title = match kind {
            ChartKind::Pie => base_title.replace("Performance", "Distribution"),
            ChartKind::Line => base_title.replace("Performance", "Trend"),
            ChartKind::Area => base_title.replace("Performance", "Area Analysis"),
            ChartKind::Bar | ChartKind::Scatter => base_title.to_owned(),
        };

        Self {
            title,
            x_label,
            y_label,
            x_key: context.x_key(),
            y_key,
            height: if kind == ChartKind::Pie { PIE_HEIGHT } else { DEFAULT_HEIGHT },
            colors: &PALETTE,
        }
    }

    pub fn primary_y_key(&self) -> &'static str {
        self.y_key[0]
    }
}

/// A chart ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub config: ChartConfig,
}

impl ChartSpec {
    /// Build a chart of `kind` over the jittered sample table for `context`.
    pub fn generate<R: Rng + ?Sized>(kind: ChartKind, context: DataContext, rng: &mut R) -> Self {
        Self {
            kind,
            data: ChartData::sample(context, rng),
            config: ChartConfig::new(kind, context),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
