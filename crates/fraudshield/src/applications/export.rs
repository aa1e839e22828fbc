use std::io::Write;

use serde::Serialize;

use super::domain::Application;

/// Flat spreadsheet row for one application.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    submitted_at: String,
    full_name: &'a str,
    email: &'a str,
    phone_number: &'a str,
    status: &'static str,
    risk_score: u8,
    risk_level: &'static str,
    verification_status: &'static str,
    employment_status: &'static str,
    annual_income: u64,
    requested_amount: u64,
}

impl<'a> From<&'a Application> for ExportRow<'a> {
    fn from(application: &'a Application) -> Self {
        Self {
            id: &application.id.0,
            submitted_at: application.submitted_at.to_rfc3339(),
            full_name: &application.applicant.full_name,
            email: &application.applicant.email,
            phone_number: &application.applicant.phone_number,
            status: application.status.label(),
            risk_score: application.risk_score,
            risk_level: application.risk_level().label(),
            verification_status: application.verification_status.label(),
            employment_status: application.financial.employment_status.label(),
            annual_income: application.financial.annual_income,
            requested_amount: application.financial.requested_amount,
        }
    }
}

/// Error raised while producing a spreadsheet export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the applications as CSV, header first. Returns the number of rows.
pub fn write_csv<W: Write>(applications: &[Application], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    if applications.is_empty() {
        csv_writer.write_record(EXPORT_HEADERS)?;
    }
    for application in applications {
        csv_writer.serialize(ExportRow::from(application))?;
    }
    csv_writer.flush()?;
    Ok(applications.len())
}

pub const EXPORT_HEADERS: [&str; 12] = [
    "id",
    "submitted_at",
    "full_name",
    "email",
    "phone_number",
    "status",
    "risk_score",
    "risk_level",
    "verification_status",
    "employment_status",
    "annual_income",
    "requested_amount",
];

/// Download name for an export generated on `date`.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("fraudshield-applications-{}.csv", date.format("%Y-%m-%d"))
}
