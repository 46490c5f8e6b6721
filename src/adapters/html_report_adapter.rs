//! HTML report adapter implementing ChartPort.
//!
//! Generates a standalone dark-themed page using Askama templates with inline
//! SVG charts. Nothing is written until [`ChartPort::flush`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::chart_svg::render_chart_svg;
use crate::adapters::plotly;
use crate::domain::error::DashboardError;
use crate::domain::presentation::DashboardView;
use crate::ports::chart_port::ChartPort;

use askama::Template;
use tracing::info;

/// One rendered chart, ready for a template.
pub struct ChartPanel {
    pub heading: Option<String>,
    pub svg: String,
    /// Plotly figure JSON, safe to embed inside a `<script>` element.
    pub figure_json: String,
}

/// Renders every chart of `view` as SVG plus an embeddable Plotly figure.
pub fn chart_panels(view: &DashboardView) -> Vec<ChartPanel> {
    view.charts
        .iter()
        .map(|chart| ChartPanel {
            heading: chart.section.clone(),
            svg: render_chart_svg(chart),
            figure_json: plotly::figure(chart).to_string().replace("</", "<\\/"),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    panels: &'a [ChartPanel],
    errors: &'a [String],
}

pub struct HtmlReportAdapter {
    output_path: PathBuf,
    ticker: Option<String>,
    panels: Vec<ChartPanel>,
    errors: Vec<String>,
}

impl HtmlReportAdapter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ticker: None,
            panels: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Renders the buffered charts and messages to an HTML string.
    pub fn render_html(&self) -> Result<String, DashboardError> {
        let title = match &self.ticker {
            Some(ticker) => format!("{ticker} Stock Dashboard"),
            None => "Stock Dashboard".to_string(),
        };
        let template = ReportTemplate {
            title: &title,
            panels: &self.panels,
            errors: &self.errors,
        };
        template.render().map_err(|e| DashboardError::Render {
            reason: e.to_string(),
        })
    }
}

impl ChartPort for HtmlReportAdapter {
    fn show_charts(&mut self, view: &DashboardView) -> Result<(), DashboardError> {
        self.ticker = Some(view.ticker.clone());
        self.panels = chart_panels(view);
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<(), DashboardError> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DashboardError> {
        let html = self.render_html()?;

        let path = Path::new(&self.output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        info!(path = %path.display(), charts = self.panels.len(), "wrote HTML report");

        Ok(())
    }
}
