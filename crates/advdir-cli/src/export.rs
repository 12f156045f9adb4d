//! CSV export of advisor records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use advdir_core::{AdvisorRecord, OutputColumns};

const BASE_COLUMNS: [&str; 5] = ["name", "email", "phone", "team_name", "province"];

/// `true` for the `-` path, which means standard output.
pub(crate) fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub(crate) fn header(columns: OutputColumns) -> Vec<&'static str> {
    let mut header = BASE_COLUMNS.to_vec();
    if columns.city {
        header.push("city");
    }
    if columns.address_hint {
        header.push("address_hint");
    }
    if columns.profile_url {
        header.push("profile_url");
    }
    header
}

pub(crate) fn row(record: &AdvisorRecord, columns: OutputColumns) -> Vec<&str> {
    let mut row = vec![
        record.name.as_str(),
        record.email.as_str(),
        record.phone.as_str(),
        record.team_name.as_str(),
        record.province_code(),
    ];
    if columns.city {
        row.push(&record.city);
    }
    if columns.address_hint {
        row.push(&record.address_hint);
    }
    if columns.profile_url {
        row.push(&record.profile_url);
    }
    row
}

/// Serializes `records` with a header row to `writer`.
pub(crate) fn write_records<W: Write>(
    writer: W,
    records: &[AdvisorRecord],
    columns: OutputColumns,
) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(header(columns))?;
    for record in records {
        csv.write_record(row(record, columns))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `records` to `path`, or to stdout when `path` is `-`.
pub(crate) fn write_csv(
    path: &Path,
    records: &[AdvisorRecord],
    columns: OutputColumns,
) -> anyhow::Result<()> {
    if is_stdout(path) {
        write_records(io::stdout().lock(), records, columns)
    } else {
        write_records(File::create(path)?, records, columns)
    }
}
