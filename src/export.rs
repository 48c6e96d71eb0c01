//! Spreadsheet export: [`ResultSet`] → one-sheet `.xlsx`.
//!
//! The workbook is built entirely in memory and handed back as bytes; the web
//! layer offers it as a download and nothing touches the disk.

use crate::error::Img2XlsxError;
use crate::output::{ResultSet, COLUMNS};
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

/// File name offered for download.
pub const EXPORT_FILE_NAME: &str = "ocr_translation_results.xlsx";

/// MIME type of the exported workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "OCR Results";

/// Excel refuses cell strings longer than this.
pub const MAX_CELL_CHARS: usize = 32_767;

const COLUMN_WIDTHS: [f64; 3] = [28.0, 60.0, 60.0];

/// Serialise the result table into xlsx bytes.
///
/// Row 0 holds the [`COLUMNS`] headers; each record follows in upload order.
pub fn to_xlsx_bytes(results: &ResultSet) -> Result<Vec<u8>, Img2XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let wrap = Format::new().set_text_wrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }

    for (i, row) in results.rows().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            sheet.write_string_with_format(r, col as u16, clamp_cell(cell), &wrap)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!("Exported {} rows → {} bytes xlsx", results.len(), bytes.len());
    Ok(bytes)
}

/// Truncate to Excel's per-cell character limit.
fn clamp_cell(s: &str) -> &str {
    match s.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemError;
    use crate::output::{ExtractionResult, ResultRecord};

    #[test]
    fn produces_zip_container() {
        let mut set = ResultSet::new();
        set.push(ResultRecord::succeeded(
            "a.png",
            ExtractionResult::new("Exit.", "출구."),
            5,
        ));
        set.push(ResultRecord::failed("b.png", ItemError::NoMatch, 5));
        let bytes = to_xlsx_bytes(&set).expect("export");
        assert!(bytes.starts_with(b"PK"), "xlsx must be a zip archive");
    }

    #[test]
    fn empty_set_still_exports_header() {
        let bytes = to_xlsx_bytes(&ResultSet::new()).expect("export");
        assert!(!bytes.is_empty());
    }

    #[test]
    fn oversized_cells_are_truncated() {
        let long = "가".repeat(MAX_CELL_CHARS + 10);
        let mut set = ResultSet::new();
        set.push(ResultRecord::succeeded(
            "big.png",
            ExtractionResult::new(long.clone(), long),
            1,
        ));
        assert!(to_xlsx_bytes(&set).is_ok());
    }

    #[test]
    fn clamp_cell_counts_chars_not_bytes() {
        let s = "é".repeat(MAX_CELL_CHARS + 1);
        assert_eq!(clamp_cell(&s).chars().count(), MAX_CELL_CHARS);
        assert_eq!(clamp_cell("short"), "short");
    }
}
