use std::collections::HashSet;
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use engine_logging::{engine_debug, engine_warn};

use crate::decode::decode_text;
use crate::{CellValue, IngestError, KeyedRecord, ParsedTable, TableRows, TableShape};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const CFB_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Container format detected from the leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Zip container (`.xlsx`, `.xlsb`, `.ods`).
    Zip,
    /// OLE compound file (legacy `.xls`).
    Compound,
    /// Anything else is treated as delimited text.
    Delimited,
}

pub fn sniff_format(bytes: &[u8]) -> SourceFormat {
    if bytes.starts_with(ZIP_MAGIC) {
        SourceFormat::Zip
    } else if bytes.starts_with(CFB_MAGIC) {
        SourceFormat::Compound
    } else {
        SourceFormat::Delimited
    }
}

/// Decode the first sheet of a workbook or a CSV buffer into a table.
///
/// Later sheets of a multi-sheet workbook are ignored.
pub fn parse(bytes: &[u8], shape: TableShape) -> Result<ParsedTable, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    let grid = match sniff_format(bytes) {
        SourceFormat::Zip | SourceFormat::Compound => read_workbook_guarded(bytes)?,
        SourceFormat::Delimited => read_delimited(bytes)?,
    };

    build_table(grid, shape)
}

fn read_workbook_guarded(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, IngestError> {
    match panic::catch_unwind(AssertUnwindSafe(|| read_workbook(bytes))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            engine_warn!("Workbook reader panicked: {}", message);
            Err(IngestError::corrupt(format!("workbook reader failed: {message}")))
        }
    }
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| IngestError::corrupt(err.to_string()))?;

    let sheet_count = workbook.sheet_names().len();
    if sheet_count > 1 {
        engine_debug!(
            "Workbook has {} sheets; only the first is read",
            sheet_count
        );
    }

    let range = match workbook.worksheet_range_at(0) {
        None => return Ok(Vec::new()),
        Some(Ok(range)) => range,
        Some(Err(err)) => return Err(IngestError::corrupt(err.to_string())),
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_value).collect())
        .collect())
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Empty,
        Data::Bool(v) => CellValue::Bool(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::DateTimeIso(v) => CellValue::Text(v.clone()),
        Data::DurationIso(v) => CellValue::Text(v.clone()),
    }
}

fn read_delimited(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, IngestError> {
    let decoded = decode_text(bytes).map_err(|err| IngestError::corrupt(err.to_string()))?;
    engine_debug!("Decoded delimited text as {}", decoded.encoding_label);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.text.as_bytes());

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| IngestError::corrupt(err.to_string()))?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

fn build_table(grid: Vec<Vec<CellValue>>, shape: TableShape) -> Result<ParsedTable, IngestError> {
    let mut rows = grid.into_iter().map(trim_trailing_empty);

    // The first row is always the header row, even when it is blank.
    let header_row = rows.next().ok_or(IngestError::EmptyFile)?;
    if header_row.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    let data_rows: Vec<Vec<CellValue>> = rows.filter(|row| !row.is_empty()).collect();
    if data_rows.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    let width = data_rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header_row.len()))
        .max()
        .unwrap_or(0);
    if width == 0 {
        return Err(IngestError::EmptyFile);
    }

    let mut raw_headers: Vec<String> = header_row.iter().map(ToString::to_string).collect();
    raw_headers.resize(width, String::new());

    let table = match shape {
        TableShape::Positional => ParsedTable {
            headers: raw_headers,
            rows: TableRows::Positional(data_rows),
        },
        TableShape::Keyed => {
            let headers = unique_headers(&raw_headers);
            let records = data_rows
                .into_iter()
                .map(|row| {
                    KeyedRecord(
                        headers
                            .iter()
                            .zip(row)
                            .filter(|(_, cell)| !cell.is_empty())
                            .map(|(header, cell)| (header.clone(), cell))
                            .collect(),
                    )
                })
                .collect();
            ParsedTable {
                headers,
                rows: TableRows::Keyed(records),
            }
        }
    };
    Ok(table)
}

fn trim_trailing_empty(mut row: Vec<CellValue>) -> Vec<CellValue> {
    while row.last().is_some_and(CellValue::is_empty) {
        row.pop();
    }
    row
}

/// Blank headers become `__EMPTY`, `__EMPTY_1`, ...; repeats get `_1`, `_2`.
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut used = HashSet::with_capacity(raw.len());
    raw.iter()
        .map(|header| {
            let base = if header.is_empty() {
                "__EMPTY"
            } else {
                header.as_str()
            };
            let mut candidate = base.to_string();
            let mut suffix = 0;
            while used.contains(&candidate) {
                suffix += 1;
                candidate = format!("{base}_{suffix}");
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}
