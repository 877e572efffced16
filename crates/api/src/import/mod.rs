//! Spreadsheet ingestion for the vehicle bulk import.
//!
//! [`xlsx`] turns an uploaded workbook into raw rows for the shared
//! validation pipeline; [`template`] produces the example workbook users
//! download to fill in.

pub mod template;
pub mod xlsx;

pub use template::build_template;
pub use xlsx::{parse_workbook, ImportFileError, MAX_UPLOAD_BYTES, TEMPLATE_FILENAME};
