//! Bulk-import row validation for the vehicle fleet.
//!
//! The same rules run on both ingestion paths (JSON batch and uploaded
//! spreadsheet) and again server-side before the insert, so a modified
//! client cannot smuggle invalid rows past the pipeline. Row numbers in
//! error messages are 1-indexed plus the header row: the first data row
//! is "Fila 2".

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// License plates are 3 to 6 uppercase alphanumeric characters.
pub static PLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{3,6}$").expect("plate regex must compile"));

/// National IDs are digits only.
pub static DNI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("dni regex must compile"));

/// A raw row as it arrives from a parsed sheet or the JSON batch body.
///
/// Every field is a loose JSON value because spreadsheet cells carry no
/// schema: a numeric plate column arrives as a number, a blank cell as
/// null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVehicleRow {
    #[serde(default)]
    pub license_plate: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub capacity: Value,
}

/// A row that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidVehicleRow {
    pub license_plate: String,
    pub description: String,
    pub capacity: i32,
    /// 1-indexed-plus-header row number, for duplicate-check reporting.
    #[serde(skip_serializing)]
    pub row: usize,
}

/// Normalize a plate for comparison and storage: trim plus uppercase.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Validate a single row, short-circuiting at the first failing rule.
///
/// `row_num` is the already-offset row number ("Fila 2" is the first data
/// row). The returned error is the complete user-facing message.
pub fn validate_row(row: &RawVehicleRow, row_num: usize) -> Result<ValidVehicleRow, String> {
    let plate_raw = cell_text(&row.license_plate);
    if plate_raw.trim().is_empty() {
        return Err(format!("Fila {row_num}: La patente es requerida"));
    }

    let license_plate = normalize_plate(&plate_raw);
    if !PLATE_RE.is_match(&license_plate) {
        return Err(format!(
            "Fila {row_num}: Formato de patente inválido (ej: ABC123)"
        ));
    }

    let capacity = match cell_int(&row.capacity) {
        Some(n) if n >= 1 => n,
        _ => {
            return Err(format!(
                "Fila {row_num}: La capacidad debe ser un número mayor a 0"
            ))
        }
    };

    let description = cell_text(&row.description).trim().to_string();
    if description.is_empty() {
        return Err(format!("Fila {row_num}: La descripción es requerida"));
    }

    Ok(ValidVehicleRow {
        license_plate,
        description,
        capacity,
        row: row_num,
    })
}

/// Validate a whole batch. Returns the rows that passed and every error
/// message collected in row order. Callers must reject the batch when the
/// error list is non-empty: imports are all-or-nothing.
pub fn validate_rows(rows: &[RawVehicleRow]) -> (Vec<ValidVehicleRow>, Vec<String>) {
    let mut valid = Vec::new();
    let mut errors = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        match validate_row(row, i + 2) {
            Ok(v) => valid.push(v),
            Err(e) => errors.push(e),
        }
    }

    (valid, errors)
}

/// Render a loose cell value as text.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Interpret a loose cell value as an integer.
///
/// Numeric cells are truncated (sheets often store `5` as `5.0`); text
/// cells are parsed after trimming. Anything else is `None`.
fn cell_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i32>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i32))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(plate: Value, description: Value, capacity: Value) -> RawVehicleRow {
        RawVehicleRow {
            license_plate: plate,
            description,
            capacity,
        }
    }

    #[test]
    fn accepts_and_normalizes_a_good_row() {
        let r = row(json!("  abc123 "), json!("Toyota Hilux 2020"), json!(5));
        let valid = validate_row(&r, 2).unwrap();
        assert_eq!(valid.license_plate, "ABC123");
        assert_eq!(valid.description, "Toyota Hilux 2020");
        assert_eq!(valid.capacity, 5);
        assert_eq!(valid.row, 2);
    }

    #[test]
    fn missing_plate_fails_first() {
        // Capacity is also bad, but the plate rule short-circuits.
        let r = row(json!(""), json!("Furgoneta"), json!(0));
        let err = validate_row(&r, 4).unwrap_err();
        assert_eq!(err, "Fila 4: La patente es requerida");
    }

    #[test]
    fn malformed_plate_is_rejected() {
        let r = row(json!("AB-123!"), json!("Furgoneta"), json!(4));
        let err = validate_row(&r, 2).unwrap_err();
        assert_eq!(err, "Fila 2: Formato de patente inválido (ej: ABC123)");

        let too_long = row(json!("ABCD1234"), json!("Furgoneta"), json!(4));
        assert!(validate_row(&too_long, 2).is_err());
    }

    #[test]
    fn numeric_plate_cells_are_accepted() {
        let r = row(json!(123456), json!("Camioneta"), json!("4"));
        let valid = validate_row(&r, 2).unwrap();
        assert_eq!(valid.license_plate, "123456");
        assert_eq!(valid.capacity, 4);
    }

    #[test]
    fn zero_capacity_rejects_the_row_with_its_row_number() {
        let rows = vec![
            row(json!("ABC123"), json!("Toyota Hilux"), json!(5)),
            row(json!("DEF456"), json!("VW Amarok"), json!(0)),
        ];

        let (valid, errors) = validate_rows(&rows);
        assert_eq!(valid.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0], "Fila 3: La capacidad debe ser un número mayor a 0");
    }

    #[test]
    fn float_capacity_cells_are_truncated() {
        let r = row(json!("GHI789"), json!("Minibús"), json!(12.0));
        assert_eq!(validate_row(&r, 2).unwrap().capacity, 12);
    }

    #[test]
    fn blank_description_is_rejected_last() {
        let r = row(json!("JKL012"), json!("   "), json!(3));
        let err = validate_row(&r, 5).unwrap_err();
        assert_eq!(err, "Fila 5: La descripción es requerida");
    }

    #[test]
    fn batch_reports_every_failing_row_in_order() {
        let rows = vec![
            row(json!(""), json!("a"), json!(1)),
            row(json!("OK123"), json!("bus"), json!(2)),
            row(json!("X"), json!("b"), json!(1)),
        ];

        let (valid, errors) = validate_rows(&rows);
        assert_eq!(valid.len(), 1);
        assert_eq!(
            errors,
            vec![
                "Fila 2: La patente es requerida".to_string(),
                "Fila 4: Formato de patente inválido (ej: ABC123)".to_string(),
            ]
        );
    }
}
