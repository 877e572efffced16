//! Example workbook generation for the vehicle bulk import.

use rust_xlsxwriter::{Workbook, XlsxError};

/// Build the downloadable example workbook.
///
/// One sheet named "Vehículos" with the three expected columns and two
/// sample rows, so the parser and the template always agree on headers.
pub fn build_template() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("Vehículos")?;

    sheet.write_string(0, 0, "license_plate")?;
    sheet.write_string(0, 1, "description")?;
    sheet.write_string(0, 2, "capacity")?;

    sheet.write_string(1, 0, "ABC123")?;
    sheet.write_string(1, 1, "Toyota Hilux 2020")?;
    sheet.write_number(1, 2, 5)?;

    sheet.write_string(2, 0, "DEF456")?;
    sheet.write_string(2, 1, "VW Amarok 2019")?;
    sheet.write_number(2, 2, 6)?;

    workbook.save_to_buffer()
}
