use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::core::series::format_number_label;
use crate::core::{ChartConfig, NormalizeOptions, normalize};
use crate::error::{ChartError, ChartResult};

use super::{ExportOutcome, raw_data_file_name, slugify};

/// Workbook sheet names are capped at 31 characters.
pub const SHEET_NAME_MAX_CHARS: usize = 31;

const LABEL_COLUMN: &str = "Label";

/// One slide of the deck as seen by exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

/// Rectangular table flattened from one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDataSheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Sheets serialized to CSV, ready for a workbook writer.
///
/// The sheet contents are CSV text, not xlsx bytes. `file_name` carries the
/// `.xlsx` name the finished file should get, so a `WorkbookSink` must
/// encode the sheets into a spreadsheet before writing under that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataWorkbook {
    /// Target name of the encoded workbook (`<slug>-datos-brutos.xlsx`).
    pub file_name: String,
    /// `(sheet name, csv text)` in slide order.
    pub sheets: Vec<(String, String)>,
}

/// Destination for a finished workbook (a file, a download, a test buffer).
pub trait WorkbookSink {
    fn write_workbook(&mut self, workbook: &RawDataWorkbook) -> ChartResult<()>;
}

/// Flattens one chart: an x-label column plus one column per series.
///
/// Rows follow the chart's display order; a series without a point at a
/// key leaves its cell empty. Zeros are kept even for skip-zero charts.
#[must_use]
pub fn flatten_chart(config: &ChartConfig) -> RawDataSheet {
    let options = NormalizeOptions {
        skip_zero: false,
        ..NormalizeOptions::from_config(config)
    };
    let data = normalize(config, options);

    let header = std::iter::once(LABEL_COLUMN.to_owned())
        .chain(data.series.iter().map(|series| series.label.clone()))
        .collect();

    let rows = data
        .keys
        .iter()
        .map(|&key| {
            let label = data.label_for_key(key).unwrap_or_default().to_owned();
            std::iter::once(label)
                .chain(data.series.iter().map(|series| {
                    series
                        .value_at(key)
                        .map(format_number_label)
                        .unwrap_or_default()
                }))
                .collect()
        })
        .collect();

    RawDataSheet {
        name: config.title.clone(),
        header,
        rows,
    }
}

/// One sheet per chart, with names made workbook-safe and unique.
#[must_use]
pub fn flatten_slide(slide: &SlideData) -> Vec<RawDataSheet> {
    let mut used = IndexSet::new();
    slide
        .charts
        .iter()
        .enumerate()
        .map(|(index, chart)| {
            let mut sheet = flatten_chart(chart);
            let base = sanitize_sheet_name(&sheet.name, index);
            sheet.name = unique_sheet_name(&base, &mut used);
            sheet
        })
        .collect()
}

pub fn write_sheet_csv(sheet: &RawDataSheet) -> ChartResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&sheet.header).map_err(csv_error)?;
    for row in &sheet.rows {
        wtr.write_record(row).map_err(csv_error)?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| ChartError::Export(format!("failed to flush csv writer: {e}")))?;
    String::from_utf8(data)
        .map_err(|e| ChartError::Export(format!("csv output is not valid utf-8: {e}")))
}

pub fn build_raw_data_workbook(slide: &SlideData) -> ChartResult<RawDataWorkbook> {
    let sheets = flatten_slide(slide)
        .iter()
        .map(|sheet| Ok((sheet.name.clone(), write_sheet_csv(sheet)?)))
        .collect::<ChartResult<Vec<_>>>()?;
    Ok(RawDataWorkbook {
        file_name: raw_data_file_name(&slugify(&slide.id)),
        sheets,
    })
}

/// Builds and writes the raw-data workbook for `slide`.
///
/// Failures are logged and reported, never propagated.
pub fn export_raw_data(slide: &SlideData, sink: &mut impl WorkbookSink) -> ExportOutcome {
    let result = build_raw_data_workbook(slide).and_then(|workbook| {
        sink.write_workbook(&workbook)?;
        Ok(workbook)
    });
    match result {
        Ok(workbook) => {
            debug!(
                slide = %slide.id,
                file = %workbook.file_name,
                sheets = workbook.sheets.len(),
                "raw data export written"
            );
            ExportOutcome::Completed {
                pages: workbook.sheets.len(),
            }
        }
        Err(err) => {
            error!(slide = %slide.id, error = %err, "raw data export failed");
            ExportOutcome::Failed(err.to_string())
        }
    }
}

fn csv_error(err: csv::Error) -> ChartError {
    ChartError::Export(format!("failed to write csv record: {err}"))
}

fn sanitize_sheet_name(name: &str, index: usize) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => ' ',
            other => other,
        })
        .collect();
    let trimmed: String = cleaned.trim().chars().take(SHEET_NAME_MAX_CHARS).collect();
    let trimmed = trimmed.trim_end().to_owned();
    if trimmed.is_empty() {
        format!("Sheet{}", index + 1)
    } else {
        trimmed
    }
}

fn unique_sheet_name(base: &str, used: &mut IndexSet<String>) -> String {
    let mut candidate = base.to_owned();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({n})");
        let keep = SHEET_NAME_MAX_CHARS.saturating_sub(suffix.chars().count());
        let head: String = base.chars().take(keep).collect();
        candidate = format!("{}{suffix}", head.trim_end());
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_truncated_and_deduplicated() {
        let mut used = IndexSet::new();
        let long = "Indicadores de liquidez y capital regulatorio";
        let first = unique_sheet_name(&sanitize_sheet_name(long, 0), &mut used);
        let second = unique_sheet_name(&sanitize_sheet_name(long, 1), &mut used);
        assert_eq!(first.chars().count(), SHEET_NAME_MAX_CHARS);
        assert!(second.ends_with(" (2)"));
        assert!(second.chars().count() <= SHEET_NAME_MAX_CHARS);
        assert_ne!(first, second);
    }

    #[test]
    fn empty_or_forbidden_names_fall_back_to_index() {
        assert_eq!(sanitize_sheet_name("[]", 2), "Sheet3");
        assert_eq!(sanitize_sheet_name("Deuda/Capital", 0), "Deuda Capital");
    }
}
