//! Conversion of chart specifications to Plotly figure JSON.

use crate::domain::presentation::{ChartSpec, LineDash, Theme};
use serde_json::{Value, json};

fn template(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "plotly_dark",
    }
}

fn dash(dash: LineDash) -> &'static str {
    match dash {
        LineDash::Solid => "solid",
        LineDash::Dot => "dot",
    }
}

/// Builds a `{data, layout}` figure for `Plotly.newPlot`.
///
/// Absent values are emitted as `null`, which Plotly draws as gaps.
pub fn figure(chart: &ChartSpec) -> Value {
    let data: Vec<Value> = chart
        .traces
        .iter()
        .map(|trace| {
            json!({
                "type": "scatter",
                "mode": "lines",
                "name": trace.name,
                "x": trace.dates.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
                "y": trace.values,
                "line": {"color": trace.color},
            })
        })
        .collect();

    let shapes: Vec<Value> = chart
        .reference_lines
        .iter()
        .map(|line| {
            json!({
                "type": "line",
                "xref": "paper",
                "x0": 0,
                "x1": 1,
                "y0": line.y,
                "y1": line.y,
                "line": {"color": line.color, "dash": dash(line.dash)},
            })
        })
        .collect();

    let mut layout = json!({
        "template": template(chart.theme),
        "shapes": shapes,
    });
    if let Some(title) = &chart.title {
        layout["title"] = json!({ "text": title });
    }
    if let Some(x) = &chart.x_axis_title {
        layout["xaxis"] = json!({ "title": { "text": x } });
    }
    if let Some(y) = &chart.y_axis_title {
        layout["yaxis"] = json!({ "title": { "text": y } });
    }

    json!({ "data": data, "layout": layout })
}
