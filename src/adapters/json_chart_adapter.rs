//! JSON chart sink: writes the dashboard outcome as one JSON document.

use std::io::Write;

use serde::Serialize;

use crate::domain::error::DashboardError;
use crate::domain::presentation::{ChartSpec, DashboardView};
use crate::ports::chart_port::ChartPort;

#[derive(Serialize)]
struct Document<'a> {
    ticker: Option<&'a str>,
    charts: &'a [ChartSpec],
    errors: &'a [String],
}

pub struct JsonChartAdapter<W: Write> {
    writer: W,
    view: Option<DashboardView>,
    errors: Vec<String>,
}

impl<W: Write> JsonChartAdapter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            view: None,
            errors: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ChartPort for JsonChartAdapter<W> {
    fn show_charts(&mut self, view: &DashboardView) -> Result<(), DashboardError> {
        self.view = Some(view.clone());
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<(), DashboardError> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DashboardError> {
        let doc = Document {
            ticker: self.view.as_ref().map(|v| v.ticker.as_str()),
            charts: self.view.as_ref().map(|v| v.charts.as_slice()).unwrap_or(&[]),
            errors: &self.errors,
        };
        serde_json::to_writer_pretty(&mut self.writer, &doc).map_err(|e| {
            DashboardError::Render {
                reason: e.to_string(),
            }
        })?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
