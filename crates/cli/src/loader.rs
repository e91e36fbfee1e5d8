//! File decoding: CSV, spreadsheets and values-orient JSON into a `Table`.
//!
//! The format is picked from the filename (`csv`, then `xls`, then `json`,
//! substring match, case-insensitive). The first two columns become x and y.
//! Any failure here is a parse failure; the sorter never sees the input.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use polysort::api::{Point, PointSet, PolygonError};
use serde_json::Value;

/// Input formats the loader understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Spreadsheet,
    Json,
}

impl Format {
    pub fn from_filename(name: &str) -> Option<Format> {
        let name = name.to_ascii_lowercase();
        if name.contains("csv") {
            Some(Format::Csv)
        } else if name.contains("xls") {
            Some(Format::Spreadsheet)
        } else if name.contains("json") {
            Some(Format::Json)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    UnsupportedFormat(String),
    Io(std::io::Error),
    Csv(String),
    Spreadsheet(String),
    Json(String),
    TooFewColumns { found: usize },
    NoRows,
    NonNumeric { row: usize, column: usize },
    Points(PolygonError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::UnsupportedFormat(name) => {
                write!(f, "unsupported file type: {} (expected csv, xls/xlsx or json)", name)
            }
            LoadError::Io(e) => write!(f, "reading input: {}", e),
            LoadError::Csv(e) => write!(f, "malformed CSV: {}", e),
            LoadError::Spreadsheet(e) => write!(f, "malformed spreadsheet: {}", e),
            LoadError::Json(e) => write!(f, "malformed JSON: {}", e),
            LoadError::TooFewColumns { found } => {
                write!(f, "need at least two columns for x and y, found {}", found)
            }
            LoadError::NoRows => write!(f, "file contains no data rows"),
            LoadError::NonNumeric { row, column } => {
                write!(f, "row {} column {} is not a finite number", row, column)
            }
            LoadError::Points(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {}

/// One decoded cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Finite numeric value, parsing text cells.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

/// Row-major decoded table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// First two columns as `(x, y)` points, in row order.
    pub fn point_set(&self) -> Result<PointSet, LoadError> {
        if self.rows.is_empty() {
            return Err(LoadError::NoRows);
        }
        if self.columns.len() < 2 {
            return Err(LoadError::TooFewColumns {
                found: self.columns.len(),
            });
        }
        let mut pts = Vec::with_capacity(self.rows.len());
        for (row, cells) in self.rows.iter().enumerate() {
            let coord = |column: usize| {
                cells
                    .get(column)
                    .and_then(Cell::as_f64)
                    .ok_or(LoadError::NonNumeric { row, column })
            };
            pts.push(Point::new(coord(0)?, coord(1)?));
        }
        PointSet::new(pts).map_err(LoadError::Points)
    }
}

/// A decoded upload: display name, full table, and its points.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub name: String,
    /// Last-modified time of the source file, when known.
    pub modified: Option<DateTime<Utc>>,
    pub table: Table,
    pub points: PointSet,
}

impl Dataset {
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Dataset, LoadError> {
        let table = decode(name, bytes)?;
        let points = table.point_set()?;
        Ok(Dataset {
            name: name.to_string(),
            modified: None,
            table,
            points,
        })
    }

    pub fn from_path(path: &Path) -> Result<Dataset, LoadError> {
        let bytes = std::fs::read(path).map_err(LoadError::Io)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        Ok(Dataset::from_bytes(&name, &bytes)?.with_modified(modified))
    }

    pub fn with_modified(mut self, modified: Option<DateTime<Utc>>) -> Dataset {
        self.modified = modified;
        self
    }
}

/// Decode `bytes` according to the format implied by `filename`.
pub fn decode(filename: &str, bytes: &[u8]) -> Result<Table, LoadError> {
    match Format::from_filename(filename) {
        Some(Format::Csv) => decode_csv(bytes),
        Some(Format::Spreadsheet) => decode_spreadsheet(bytes),
        Some(Format::Json) => decode_json(bytes),
        None => Err(LoadError::UnsupportedFormat(filename.to_string())),
    }
}

fn decode_csv(bytes: &[u8]) -> Result<Table, LoadError> {
    let csv_err = |e: PolarsError| LoadError::Csv(e.to_string());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        // infer dtypes from every row; a decimal after many integers still parses
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(csv_err)?;

    let mut columns = Vec::with_capacity(df.width());
    let mut by_column: Vec<Vec<Cell>> = Vec::with_capacity(df.width());
    for series in df.get_columns() {
        columns.push(series.name().to_string());
        let cells = if series.dtype().is_numeric() {
            let cast = series.cast(&DataType::Float64).map_err(csv_err)?;
            let ca = cast.f64().map_err(csv_err)?;
            ca.into_iter()
                .map(|v| v.map_or(Cell::Empty, Cell::Number))
                .collect()
        } else {
            let cast = series.cast(&DataType::String).map_err(csv_err)?;
            let ca = cast.str().map_err(csv_err)?;
            ca.into_iter()
                .map(|v| v.map_or(Cell::Empty, |s| Cell::Text(s.to_string())))
                .collect()
        };
        by_column.push(cells);
    }

    let rows = (0..df.height())
        .map(|i| by_column.iter().map(|col| col[i].clone()).collect())
        .collect();
    Ok(Table { columns, rows })
}

fn decode_spreadsheet(bytes: &[u8]) -> Result<Table, LoadError> {
    let sheet_err = |e: calamine::Error| LoadError::Spreadsheet(e.to_string());
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(sheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Spreadsheet("workbook has no sheets".to_string()))?
        .map_err(sheet_err)?;

    let mut rows_iter = range.rows();
    let columns: Vec<String> = match rows_iter.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, c)| match c {
                Data::Empty => i.to_string(),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };
    let rows = rows_iter
        .map(|r| r.iter().map(spreadsheet_cell).collect())
        .collect();
    Ok(Table { columns, rows })
}

fn spreadsheet_cell(c: &Data) -> Cell {
    match c {
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

/// Values orient: `[[x, y, ...], ...]`, columns named by position.
fn decode_json(bytes: &[u8]) -> Result<Table, LoadError> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| LoadError::Json(e.to_string()))?;
    let Value::Array(raw_rows) = doc else {
        return Err(LoadError::Json("expected a top-level array of rows".to_string()));
    };
    let mut rows: Vec<Vec<Cell>> = raw_rows
        .into_iter()
        .map(|row| match row {
            Value::Array(cells) => cells.into_iter().map(json_cell).collect(),
            scalar => vec![json_cell(scalar)],
        })
        .collect();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, Cell::Empty);
    }
    Ok(Table {
        columns: (0..width).map(|i| i.to_string()).collect(),
        rows,
    })
}

fn json_cell(v: Value) -> Cell {
    match v {
        Value::Null => Cell::Empty,
        Value::Number(n) => n.as_f64().map_or(Cell::Empty, Cell::Number),
        Value::String(s) => Cell::Text(s),
        other => Cell::Text(other.to_string()),
    }
}
