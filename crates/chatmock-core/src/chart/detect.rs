use strum::IntoEnumIterator;

use super::{ChartKind, ChartRequest, DataContext};

/// Phrases asking for the all-kinds showcase. Checked before anything else.
const SHOWCASE_KEYWORDS: [&str; 7] = [
    "test all charts",
    "show all charts",
    "all chart types",
    "test charts",
    "demo charts",
    "chart examples",
    "all supported charts",
];

/// Generic visualisation words; they fall back to a bar chart.
const GENERIC_KEYWORDS: [&str; 9] = [
    "chart",
    "graph",
    "plot",
    "visualize",
    "visualization",
    "show data",
    "display data",
    "analytics",
    "metrics",
];

/// Decide whether `text` asks for a chart, and which.
pub fn detect_chart_request(text: &str) -> Option<ChartRequest> {
    let text = text.to_lowercase();

    if contains_any(&text, &SHOWCASE_KEYWORDS) {
        return Some(ChartRequest::All);
    }

    if let Some(kind) = ChartKind::iter().find(|kind| contains_any(&text, kind.keywords())) {
        return Some(ChartRequest::Single(kind));
    }

    contains_any(&text, &GENERIC_KEYWORDS).then_some(ChartRequest::Single(ChartKind::Bar))
}

/// Pick the sample data set `text` is most likely about. Defaults to sales.
pub fn detect_data_context(text: &str) -> DataContext {
    let text = text.to_lowercase();
    DataContext::iter()
        .find(|ctx| contains_any(&text, ctx.keywords()))
        .unwrap_or_default()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
