//! Workbook parsing for the vehicle bulk import.
//!
//! Reads `.xlsx` or `.xls` bytes into [`RawVehicleRow`]s by mapping the
//! header row onto the template's column names. Cell values stay loose
//! (text, number, or empty) so the shared validation pipeline produces the
//! same row-numbered errors regardless of ingestion path.

use std::io::Cursor;

use calamine::{DataType, Range, Reader, Xls, Xlsx};
use electo_core::import::RawVehicleRow;
use serde_json::Value;

/// Maximum accepted upload size (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Download name of the example workbook.
pub const TEMPLATE_FILENAME: &str = "plantilla_vehiculos.xlsx";

/// Column names expected in the header row, matching the template.
const COL_LICENSE_PLATE: &str = "license_plate";
const COL_DESCRIPTION: &str = "description";
const COL_CAPACITY: &str = "capacity";

/// Errors raised before row validation starts. Messages are user-facing.
#[derive(Debug, thiserror::Error)]
pub enum ImportFileError {
    #[error("Por favor selecciona un archivo Excel (.xlsx o .xls)")]
    UnsupportedExtension,
    #[error("El archivo no puede superar 10MB")]
    TooLarge,
    #[error("Error al procesar el archivo Excel")]
    Unreadable,
    #[error("No se recibieron vehículos para importar")]
    Empty,
}

/// Parse workbook bytes into raw vehicle rows.
///
/// The first sheet is used. The header row must contain the template's
/// column names; extra columns are ignored and missing ones surface later
/// as per-row validation errors.
pub fn parse_workbook(filename: &str, bytes: &[u8]) -> Result<Vec<RawVehicleRow>, ImportFileError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ImportFileError::TooLarge);
    }

    let lower = filename.to_lowercase();
    let range = if lower.ends_with(".xlsx") {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes)).map_err(|_| ImportFileError::Unreadable)?;
        first_sheet(&mut workbook)?
    } else if lower.ends_with(".xls") {
        let mut workbook: Xls<_> =
            Xls::new(Cursor::new(bytes)).map_err(|_| ImportFileError::Unreadable)?;
        first_sheet(&mut workbook)?
    } else {
        return Err(ImportFileError::UnsupportedExtension);
    };

    rows_from_range(&range)
}

/// Read the first worksheet of an open workbook.
fn first_sheet<R: Reader>(workbook: &mut R) -> Result<Range<DataType>, ImportFileError> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportFileError::Empty)?;
    workbook
        .worksheet_range(&name)
        .ok_or(ImportFileError::Empty)?
        .map_err(|_| ImportFileError::Unreadable)
}

/// Map the header row onto column indices and convert each data row.
fn rows_from_range(range: &Range<DataType>) -> Result<Vec<RawVehicleRow>, ImportFileError> {
    let mut rows = range.rows();
    let header = rows.next().ok_or(ImportFileError::Empty)?;

    let mut plate_idx = None;
    let mut description_idx = None;
    let mut capacity_idx = None;
    for (i, cell) in header.iter().enumerate() {
        if let DataType::String(s) = cell {
            match s.trim().to_lowercase().as_str() {
                COL_LICENSE_PLATE => plate_idx = Some(i),
                COL_DESCRIPTION => description_idx = Some(i),
                COL_CAPACITY => capacity_idx = Some(i),
                _ => {}
            }
        }
    }

    let parsed: Vec<RawVehicleRow> = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, DataType::Empty)))
        .map(|row| RawVehicleRow {
            license_plate: cell_value(row, plate_idx),
            description: cell_value(row, description_idx),
            capacity: cell_value(row, capacity_idx),
        })
        .collect();

    if parsed.is_empty() {
        return Err(ImportFileError::Empty);
    }
    Ok(parsed)
}

/// Convert a cell to a loose JSON value for the validation pipeline.
fn cell_value(row: &[DataType], idx: Option<usize>) -> Value {
    let Some(cell) = idx.and_then(|i| row.get(i)) else {
        return Value::Null;
    };
    match cell {
        DataType::String(s) => Value::String(s.clone()),
        DataType::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        DataType::Int(i) => Value::Number((*i).into()),
        DataType::Bool(b) => Value::Bool(*b),
        _ => Value::Null,
    }
}
