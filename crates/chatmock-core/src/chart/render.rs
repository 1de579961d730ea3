use rand::Rng;
use strum::IntoEnumIterator;

use super::{detect_data_context, ChartKind, ChartRequest, ChartSpec};

/// Height the client assumes when the attribute is omitted.
const CLIENT_DEFAULT_HEIGHT: u32 = 320;

/// Render whatever `request` asks for, using `prompt` to pick the data set.
pub fn render_request<R: Rng + ?Sized>(request: ChartRequest, prompt: &str, rng: &mut R) -> String {
    match request {
        ChartRequest::Single(kind) => {
            let spec = ChartSpec::generate(kind, detect_data_context(prompt), rng);
            render_chart(&spec)
        }
        ChartRequest::All => render_all_charts(rng),
    }
}

/// A single chart wrapped in a short explanation.
pub fn render_chart(spec: &ChartSpec) -> String {
    format!(
        "Here's your {kind} chart visualization:\n\n{block}\n\nThe data above is rendered from a markdown table, so it stays readable even without a chart renderer.",
        kind = spec.kind,
        block = chart_block(spec),
    )
}

/// One chart of every kind, each over its showcase data set.
pub fn render_all_charts<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut doc = vec![
        "# Chart Testing - All Chart Types".to_owned(),
        "Here are examples of all supported chart types using markdown table format:".to_owned(),
        String::new(),
    ];

    for kind in ChartKind::iter() {
        let spec = ChartSpec::generate(kind, kind.showcase_context(), rng);
        doc.push(format!("## {} Chart", kind.heading()));
        doc.push(String::new());
        doc.push(chart_block(&spec));
        doc.push(String::new());
    }

    doc.push("All charts above should render as interactive visualizations.".to_owned());
    doc.join("\n")
}

/// The fenced ```` ```chart{...} ```` block: attribute line, table, closing fence.
pub fn chart_block(spec: &ChartSpec) -> String {
    let mut lines = Vec::with_capacity(spec.data.len() + 4);
    lines.push(format!("```chart{{{}}}", attributes(spec)));
    lines.extend(table_lines(spec));
    lines.push("```".to_owned());
    lines.join("\n")
}

fn attributes(spec: &ChartSpec) -> String {
    let cfg = &spec.config;
    let mut attrs = vec![
        format!("type={}", spec.kind),
        format!("title={}", underscored(&cfg.title)),
        format!("x={}", cfg.x_key),
        format!("y={}", cfg.primary_y_key()),
        format!("xlabel={}", underscored(cfg.x_label)),
        format!("ylabel={}", underscored(cfg.y_label)),
    ];
    if cfg.height != CLIENT_DEFAULT_HEIGHT {
        attrs.push(format!("height={}", cfg.height));
    }
    if let Some(color) = cfg.colors.first() {
        attrs.push(format!("color={color}"));
    }
    attrs.join("|")
}

// The attribute line is a code-fence info string, so it must not contain spaces.
fn underscored(s: &str) -> String {
    s.replace(' ', "_")
}

fn table_lines(spec: &ChartSpec) -> Vec<String> {
    let columns: Vec<&str> = spec.data.column_names().into_iter().collect();
    let rows = spec.data.cells();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("| {} |", columns.join(" | ")));
    lines.push(format!(
        "|{}|",
        columns
            .iter()
            .map(|col| "-".repeat(col.len() + 2))
            .collect::<Vec<_>>()
            .join("|")
    ));

    for row in rows {
        let values: Vec<&str> = columns
            .iter()
            .map(|col| {
                row.iter()
                    .find(|(key, _)| key == col)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or("")
            })
            .collect();
        lines.push(format!("| {} |", values.join(" | ")));
    }
    lines
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chart::{detect_chart_request, DataContext};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pie_chart_request_renders_sorted_sales_table() {
        let prompt = "show me a pie chart";
        let request = detect_chart_request(prompt).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let doc = render_request(request, prompt, &mut rng);

        assert!(doc.contains(
            "```chart{type=pie|title=Sales_Distribution|x=name|y=value|xlabel=Month|ylabel=Sales_($)|height=350|color=#8884d8}"
        ));
        assert!(doc.contains("| name | target | value |\n|------|--------|-------|\n| Jan | 350 | "));
        assert_eq!(doc.matches("```").count(), 2);
    }

    #[test]
    fn table_has_one_line_per_row() {
        let mut rng = StdRng::seed_from_u64(9);
        let spec = ChartSpec::generate(ChartKind::Line, DataContext::Performance, &mut rng);
        let block = chart_block(&spec);
        let lines: Vec<_> = block.lines().collect();

        // fence + header + separator + 4 rows + fence
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "| expenses | month | profit | revenue |");
        assert!(lines[4].starts_with("| ") && lines[4].contains(" | Q2 | "));
        assert_eq!(*lines.last().unwrap(), "```");
    }

    #[test]
    fn showcase_contains_one_block_per_kind() {
        let mut rng = StdRng::seed_from_u64(1);
        let doc = render_all_charts(&mut rng);

        assert_eq!(doc.matches("```chart{").count(), 5);
        for kind in ChartKind::iter() {
            assert!(doc.contains(&format!("```chart{{type={kind}|")), "missing {kind}");
            assert!(doc.contains(&format!("## {} Chart", kind.heading())));
        }
        assert!(doc.contains("| x | y |"));
        assert!(doc.contains("| desktop | mobile | name | tablet |"));
    }

    #[test]
    fn scatter_block_uses_point_keys() {
        let mut rng = StdRng::seed_from_u64(2);
        let spec = ChartSpec::generate(ChartKind::Scatter, DataContext::Correlation, &mut rng);
        let block = chart_block(&spec);
        assert!(block.starts_with("```chart{type=scatter|title=Data_Correlation|x=x|y=y|xlabel=X_Values|ylabel=Y_Values|height=300|"));
    }
}
