//! Tabular input reader.
//!
//! Rows come back in file order. The header row names the columns; empty
//! cells and cells past the end of a short row are missing. Delimited text
//! (CSV/TSV) and spreadsheets (`.xlsx`, `.xlsm`, `.xls`, `.ods`, first sheet)
//! yield the same `Record` values.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::Record;

const BOM: char = '\u{feff}';

#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub delimiter: u8,
}

impl Default for SourceOptions {
    fn default() -> Self { Self { delimiter: b',' } }
}

impl SourceOptions {
    /// Pick a delimiter from the file extension: tab for `.tsv`/`.tab`, comma otherwise.
    pub fn for_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("tsv" | "tab") => Self { delimiter: b'\t' },
            _ => Self::default(),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase)
}

pub fn is_workbook(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("xlsx" | "xlsm" | "xls" | "xlsb" | "ods"))
}

fn header_names<I, S>(cells: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let headers: Vec<String> = cells
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.as_ref();
            let h = if i == 0 { h.trim_start_matches(BOM) } else { h };
            h.trim().to_string()
        })
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(Error::Input("input has no header row".to_string()));
    }
    debug!(columns = headers.len(), "read header row");
    Ok(headers)
}

fn to_record(headers: &[String], cell: impl Fn(usize) -> Option<String>) -> Record {
    let fields = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), cell(i).filter(|v| !v.is_empty())))
        .collect();
    Record::new(fields)
}

/// Read delimited text. Cells that are not valid UTF-8 are decoded lossily;
/// a row the parser cannot read at all is logged and skipped.
pub fn read_records<R: Read>(reader: R, options: &SourceOptions) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = header_names(rdr.byte_headers()?.iter().map(String::from_utf8_lossy))?;

    let mut records = Vec::new();
    for (i, row) in rdr.byte_records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => {
                warn!(row = i + 1, error = %e, "read error; stopping input");
                break;
            }
            Err(e) => {
                warn!(row = i + 1, error = %e, "skip: malformed row");
                continue;
            }
        };
        if std::str::from_utf8(row.as_slice()).is_err() {
            warn!(row = i + 1, line = row.position().map(|p| p.line()), "row is not valid UTF-8; decoding lossily");
        }
        records.push(to_record(&headers, |c| row.get(c).map(|v| String::from_utf8_lossy(v).into_owned())));
    }
    Ok(records)
}

/// Read the first sheet of a spreadsheet. The first row is the header row.
pub fn read_workbook(path: &Path) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Input(format!("{} has no worksheets", path.display())))??;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| Error::Input("input has no header row".to_string()))?;
    let headers = header_names(header_row.iter().map(cell_text))?;
    Ok(rows.map(|row| to_record(&headers, |c| row.get(c).map(cell_text))).collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Open `path` and read it with the reader its extension calls for.
pub fn read_records_from_path(path: &Path, options: &SourceOptions) -> Result<Vec<Record>> {
    if !path.is_file() {
        return Err(Error::NotFound(format!("cannot open {}", path.display())));
    }
    let records = if is_workbook(path) {
        read_workbook(path)?
    } else {
        let file = File::open(path)
            .map_err(|e| Error::NotFound(format!("cannot open {}: {e}", path.display())))?;
        read_records(BufReader::new(file), options)?
    };
    info!(path = %path.display(), rows = records.len(), "loaded input rows");
    Ok(records)
}
