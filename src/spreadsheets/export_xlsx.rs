use crate::api::models::{BlotterRecord, StatusLabel};
use crate::errors::{ResultResp, ServerError};
use crate::responses::xlsx_response;
use rust_xlsxwriter::Workbook;

/// Write the filtered/sorted blotter rows (the same set the screen
/// shows, all pages of it) into a downloadable workbook.
pub fn export_blotters_xlsx(records: &[&BlotterRecord]) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "Case #",
        "Complainant",
        "Respondent",
        "Type",
        "Incident Date",
        "Location",
        "Hearing Date",
        "Status",
        "Filed",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;
        let cells = [
            record.case_number.as_deref().unwrap_or(""),
            record.complainant_name.as_deref().unwrap_or(""),
            record.respondent_name.as_deref().unwrap_or(""),
            record.complaint_type.as_deref().unwrap_or(""),
            record.incident_date.as_deref().unwrap_or(""),
            record.incident_location.as_deref().unwrap_or(""),
            record.hearing_date.as_deref().unwrap_or(""),
            record.status.as_str(),
            record.created_at.as_deref().unwrap_or(""),
        ];

        for (col, value) in cells.iter().enumerate() {
            worksheet.write_string(r, col as u16, *value).map_err(|e| {
                ServerError::XlsxError(format!("Failed to write row {}: {}", r, e))
            })?;
        }
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))?;

    xlsx_response(buffer, "blotter_records.xlsx")
}
