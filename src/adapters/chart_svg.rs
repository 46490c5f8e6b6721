//! Inline SVG rendering of chart specifications.

use crate::domain::presentation::{ChartSpec, LineDash, Theme, Trace};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 360.0;
const PADDING: f64 = 50.0;

struct Palette {
    background: &'static str,
    grid: &'static str,
    text: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            background: "#111111",
            grid: "#444444",
            text: "#f2f5fa",
        },
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Min and max over every plotted value, or `None` if nothing is plottable.
fn value_range(chart: &ChartSpec) -> Option<(f64, f64)> {
    let values = chart
        .traces
        .iter()
        .flat_map(|t| t.values.iter().flatten().copied())
        .chain(chart.reference_lines.iter().map(|l| l.y))
        .filter(|v| v.is_finite());

    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

struct Scale {
    min: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Scale {
    fn new(points: usize, min: f64, max: f64) -> Self {
        let plot_width = WIDTH - 2.0 * PADDING;
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = max - min;
        Self {
            min,
            scale_x: if points > 1 {
                plot_width / (points - 1) as f64
            } else {
                0.0
            },
            scale_y: if range > 0.0 { plot_height / range } else { 1.0 },
        }
    }

    fn x(&self, i: usize) -> f64 {
        PADDING + i as f64 * self.scale_x
    }

    fn y(&self, value: f64) -> f64 {
        HEIGHT - PADDING - (value - self.min) * self.scale_y
    }
}

/// One `points` attribute per unbroken run of present values.
fn trace_segments(trace: &Trace, scale: &Scale) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for (i, value) in trace.values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => {
                current.push(format!("{:.1},{:.1}", scale.x(i), scale.y(*v)));
            }
            _ => {
                if !current.is_empty() {
                    segments.push(current.join(" "));
                    current.clear();
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current.join(" "));
    }
    segments
}

/// Renders `chart` as a standalone `<svg>` element.
pub fn render_chart_svg(chart: &ChartSpec) -> String {
    let colors = palette(chart.theme);
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="100%" role="img"><rect width="{w:.0}" height="{h:.0}" fill="{bg}"/>"#,
        w = WIDTH,
        h = HEIGHT,
        bg = colors.background,
    );

    if let Some(title) = &chart.title {
        svg.push_str(&format!(
            r#"<text x="{:.0}" y="24" fill="{}" font-size="16" text-anchor="middle">{}</text>"#,
            WIDTH / 2.0,
            colors.text,
            escape(title)
        ));
    }

    svg.push_str(&format!(
        r#"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="{c}"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="{c}"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING,
        c = colors.grid,
    ));

    let Some((min, max)) = value_range(chart) else {
        svg.push_str(&format!(
            r#"<text x="{:.0}" y="{:.0}" fill="{}" text-anchor="middle">No data</text></svg>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0,
            colors.text
        ));
        return svg;
    };

    let points = chart.traces.iter().map(|t| t.values.len()).max().unwrap_or(0);
    let scale = Scale::new(points, min, max);

    for line in &chart.reference_lines {
        let dash = match line.dash {
            LineDash::Solid => "",
            LineDash::Dot => r#" stroke-dasharray="2,4""#,
        };
        svg.push_str(&format!(
            r#"<line x1="{:.0}" y1="{y:.1}" x2="{:.0}" y2="{y:.1}" stroke="{}"{}/>"#,
            PADDING,
            WIDTH - PADDING,
            line.color,
            dash,
            y = scale.y(line.y),
        ));
    }

    for trace in &chart.traces {
        for segment in trace_segments(trace, &scale) {
            svg.push_str(&format!(
                r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
                trace.color, segment
            ));
        }
    }

    let label = |x: f64, y: f64, anchor: &str, text: &str| {
        format!(
            r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="11" text-anchor="{}">{}</text>"#,
            x,
            y,
            colors.text,
            anchor,
            escape(text)
        )
    };

    svg.push_str(&label(PADDING - 4.0, scale.y(max) + 4.0, "end", &format!("{:.2}", max)));
    svg.push_str(&label(PADDING - 4.0, scale.y(min) + 4.0, "end", &format!("{:.2}", min)));

    if let Some(dates) = chart.traces.first().map(|t| &t.dates) {
        if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
            let bottom = HEIGHT - PADDING + 16.0;
            svg.push_str(&label(PADDING, bottom, "start", &first.to_string()));
            svg.push_str(&label(WIDTH - PADDING, bottom, "end", &last.to_string()));
        }
    }

    if let Some(x_title) = &chart.x_axis_title {
        svg.push_str(&label(WIDTH / 2.0, HEIGHT - 10.0, "middle", x_title));
    }
    if let Some(y_title) = &chart.y_axis_title {
        svg.push_str(&format!(
            r#"<text x="14" y="{:.0}" fill="{}" font-size="11" text-anchor="middle" transform="rotate(-90 14 {:.0})">{}</text>"#,
            HEIGHT / 2.0,
            colors.text,
            HEIGHT / 2.0,
            escape(y_title)
        ));
    }

    for (i, trace) in chart.traces.iter().enumerate() {
        let y = PADDING + 14.0 * i as f64;
        svg.push_str(&format!(
            r#"<rect x="{:.0}" y="{:.0}" width="10" height="3" fill="{}"/>"#,
            WIDTH - PADDING - 120.0,
            y - 4.0,
            trace.color
        ));
        svg.push_str(&label(WIDTH - PADDING - 106.0, y, "start", &trace.name));
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presentation::ReferenceLine;
    use chrono::NaiveDate;

    fn chart(values: Vec<Option<f64>>) -> ChartSpec {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        ChartSpec {
            section: None,
            title: Some("AAPL Stock Price".into()),
            x_axis_title: Some("Date".into()),
            y_axis_title: Some("Price".into()),
            theme: Theme::Dark,
            traces: vec![Trace {
                name: "Close Price".into(),
                color: "blue",
                dates,
                values,
            }],
            reference_lines: vec![],
        }
    }

    #[test]
    fn renders_title_and_polyline() {
        let svg = render_chart_svg(&chart(vec![Some(1.0), Some(2.0), Some(3.0)]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("AAPL Stock Price"));
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.contains("2024-01-01"));
        assert!(svg.contains("2024-01-03"));
    }

    #[test]
    fn gaps_split_the_line() {
        let svg = render_chart_svg(&chart(vec![Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]));
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn all_missing_renders_placeholder() {
        let svg = render_chart_svg(&chart(vec![None, None]));
        assert!(svg.contains("No data"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn dotted_reference_lines() {
        let mut spec = chart(vec![Some(40.0), Some(60.0)]);
        spec.reference_lines = vec![ReferenceLine {
            y: 70.0,
            color: "red",
            dash: LineDash::Dot,
        }];
        let svg = render_chart_svg(&spec);
        assert!(svg.contains(r#"stroke="red" stroke-dasharray"#));
    }

    #[test]
    fn text_is_escaped() {
        let mut spec = chart(vec![Some(1.0)]);
        spec.title = Some("A&B <x>".into());
        let svg = render_chart_svg(&spec);
        assert!(svg.contains("A&amp;B &lt;x&gt;"));
    }
}
