use crate::domain::FeatureRecord;
use crate::errors::AppError;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

const HEADERS: [&str; 16] = [
    "Address",
    "Street Address",
    "City",
    "State",
    "Zip Code",
    "Listing Price",
    "Beds",
    "Baths (full)",
    "Baths (half)",
    "Garage Spaces",
    "Size (sq. ft.)",
    "Lot Size (sq. ft.)",
    "Year Built",
    "Link",
    "Description",
    "Notes",
];

fn write_text(ws: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), AppError> {
    ws.write_string(row, col, value)
        .map_err(|e| AppError::XlsxError(format!("Failed to write {}: {}", HEADERS[col as usize], e)))?;
    Ok(())
}

fn write_num(ws: &mut Worksheet, row: u32, col: u16, value: f64) -> Result<(), AppError> {
    ws.write_number(row, col, value)
        .map_err(|e| AppError::XlsxError(format!("Failed to write {}: {}", HEADERS[col as usize], e)))?;
    Ok(())
}

/// One row per collected listing.
pub fn export_listings_xlsx(records: &[FeatureRecord], path: &Path) -> Result<(), AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    for (col, header) in HEADERS.iter().enumerate() {
        write_text(worksheet, 0, col as u16, header)?;
    }

    // Rows
    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;

        write_text(worksheet, r, 0, &record.address)?;
        write_text(worksheet, r, 1, &record.street_address)?;
        write_text(worksheet, r, 2, &record.city)?;
        write_text(worksheet, r, 3, &record.state)?;
        write_text(worksheet, r, 4, &record.zip_code)?;
        write_num(worksheet, r, 5, record.list_price)?;
        write_num(worksheet, r, 6, record.beds as f64)?;
        write_num(worksheet, r, 7, record.baths_full as f64)?;
        write_num(worksheet, r, 8, record.baths_half as f64)?;
        write_num(worksheet, r, 9, record.garage_spaces as f64)?;
        write_num(worksheet, r, 10, record.living_area)?;
        write_num(worksheet, r, 11, record.lot_area)?;
        write_num(worksheet, r, 12, record.year_built as f64)?;
        write_text(worksheet, r, 13, record.link.as_deref().unwrap_or(""))?;
        write_text(worksheet, r, 14, &record.property_description)?;
        write_text(worksheet, r, 15, &record.notes_joined())?;
    }

    workbook
        .save(path)
        .map_err(|e| AppError::XlsxError(format!("Failed to save workbook: {}", e)))
}
