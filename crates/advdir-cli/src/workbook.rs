//! Styled Excel export: bold shaded header, row fills alternating per team,
//! and column widths fitted to content.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use advdir_core::{AdvisorRecord, OutputColumns, RunConfig};

use crate::export::{header, is_stdout, row};

const SHEET_NAME: &str = "Advisors";
const HEADER_FILL: u32 = 0x00F2_F2F2;
const PLAIN_FILL: u32 = 0x00FF_FFFF;
const TEAM_FILL: u32 = 0x00F7_FBFF;
const MIN_WIDTH: usize = 10;
const MAX_WIDTH: usize = 60;

/// Workbook path for a run: the CSV path with an `.xlsx` extension, or the
/// default file name when the CSV goes to stdout.
pub(crate) fn workbook_path(csv_path: &Path, config: &RunConfig) -> PathBuf {
    if is_stdout(csv_path) {
        PathBuf::from(config.default_output_file()).with_extension("xlsx")
    } else {
        csv_path.with_extension("xlsx")
    }
}

/// Per record, whether its row gets the team fill. The flag flips each time
/// `team_name` differs from the previous row, starting tinted.
pub(crate) fn team_bands(records: &[AdvisorRecord]) -> Vec<bool> {
    let mut tinted = false;
    let mut current: Option<&str> = None;
    records
        .iter()
        .map(|record| {
            if current != Some(record.team_name.as_str()) {
                current = Some(record.team_name.as_str());
                tinted = !tinted;
            }
            tinted
        })
        .collect()
}

/// Character width of the longest cell in each column plus two, clamped
/// to `10..=60`.
pub(crate) fn column_widths(header: &[&str], rows: &[Vec<&str>]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .map(|(col, title)| {
            let longest = rows
                .iter()
                .filter_map(|cells| cells.get(col))
                .chain(std::iter::once(title))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            (longest + 2).clamp(MIN_WIDTH, MAX_WIDTH)
        })
        .collect()
}

/// Writes `records` as a single styled worksheet at `path`.
pub(crate) fn write_xlsx(
    path: &Path,
    records: &[AdvisorRecord],
    columns: OutputColumns,
) -> Result<(), XlsxError> {
    let header = header(columns);
    let rows: Vec<Vec<&str>> = records.iter().map(|r| row(r, columns)).collect();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::VerticalCenter);
    let plain_format = Format::new()
        .set_background_color(Color::RGB(PLAIN_FILL))
        .set_align(FormatAlign::VerticalCenter);
    let team_format = Format::new()
        .set_background_color(Color::RGB(TEAM_FILL))
        .set_align(FormatAlign::VerticalCenter);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in (0u16..).zip(&header) {
        sheet.write_string_with_format(0, col, *title, &header_format)?;
    }
    for ((row_num, cells), tinted) in (1u32..).zip(&rows).zip(team_bands(records)) {
        let format = if tinted { &team_format } else { &plain_format };
        for (col, value) in (0u16..).zip(cells) {
            sheet.write_string_with_format(row_num, col, *value, format)?;
        }
    }
    for (col, width) in (0u16..).zip(column_widths(&header, &rows)) {
        // Widths are clamped to 60, well inside f64's exact integer range.
        #[allow(clippy::cast_precision_loss)]
        let width = width as f64;
        sheet.set_column_width(col, width)?;
    }

    workbook.save(path)?;
    Ok(())
}
