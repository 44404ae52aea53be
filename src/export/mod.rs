//! Slide export collaborators.
//!
//! Exports sit outside the chart engine: the raw-data workbook reads chart
//! documents, the PDF job drives a host that renders and captures slides.
//! Both report an `ExportOutcome` instead of propagating errors.

mod pdf;
mod raw_data;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

pub use pdf::{
    A4_LANDSCAPE_HEIGHT_PT, A4_LANDSCAPE_WIDTH_PT, Control, PageSink, PdfExportJob,
    SlideCaptureHost, control_combinations,
};
pub use raw_data::{
    RawDataSheet, RawDataWorkbook, SHEET_NAME_MAX_CHARS, SlideData, WorkbookSink,
    build_raw_data_workbook, export_raw_data, flatten_chart, flatten_slide, write_sheet_csv,
};

#[cfg(feature = "cairo-backend")]
pub use pdf::CairoPdfSink;

/// Result of one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportOutcome {
    Completed { pages: usize },
    /// Stopped by its `CancelToken`; `pages` were already written.
    Cancelled { pages: usize },
    Failed(String),
}

impl ExportOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Shared cancellation flag for an in-flight export.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Lowercase ASCII slug for file names: accents folded, runs of other
/// characters collapsed to one `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_dash = false;
        } else if !prev_dash && !out.is_empty() {
            out.push('-');
            prev_dash = true;
        }
    }
    out.trim_end_matches('-').to_owned()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[must_use]
pub fn pdf_file_name(slug: &str) -> String {
    format!("{slug}-slide-export.pdf")
}

#[must_use]
pub fn raw_data_file_name(slug: &str) -> String {
    format!("{slug}-datos-brutos.xlsx")
}
