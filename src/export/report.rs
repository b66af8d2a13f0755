//! Admin report export (PDF snapshot and CSV)

use std::path::PathBuf;

use chrono::NaiveDate;

use super::{csv, pdf, Capture, CaptureOptions, DownloadSink, ExportError, Region};
use crate::models::DownloadEvent;

const PDF_TITLE: &str = "تقرير صناعيو المستقبل";
const CSV_FILENAME: &str = "تقرير تحميلات صناعيو المستقبل.csv";

pub struct ReportExporter<'a> {
    capture: &'a dyn Capture,
    sink: &'a dyn DownloadSink,
}

impl<'a> ReportExporter<'a> {
    pub fn new(capture: &'a dyn Capture, sink: &'a dyn DownloadSink) -> Self {
        Self { capture, sink }
    }

    /// Capture the report region onto A4 pages.
    pub fn export_pdf(&self, date: NaiveDate) -> Result<PathBuf, ExportError> {
        let result = self
            .capture
            .capture(Region::Report, &CaptureOptions::report())
            .and_then(|raster| pdf::a4_report_pdf(&raster, PDF_TITLE))
            .and_then(|bytes| {
                let filename = format!("{} - {}.pdf", PDF_TITLE, date.format("%Y-%m-%d"));
                self.sink.save(&filename, "application/pdf", &bytes)
            });

        if let Err(e) = &result {
            tracing::error!("Error generating PDF report: {}", e);
        }
        result
    }

    /// Write the history as CSV. Nothing is written for an empty history.
    pub fn export_csv(&self, events: &[DownloadEvent]) -> Result<Option<PathBuf>, ExportError> {
        if events.is_empty() {
            tracing::info!("CSV report skipped: no downloads recorded");
            return Ok(None);
        }

        let text = csv::statistics_csv(events);
        self.sink
            .save(CSV_FILENAME, "text/csv;charset=utf-8", text.as_bytes())
            .map(Some)
            .map_err(|e| {
                tracing::error!("Error saving CSV report: {}", e);
                e
            })
    }
}
