//! CSV report of a batch run.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::EnrollmentResult;

pub const CSV_HEADER: &str = "room_name,room_id,device_enrollment_code,status";

/// Written in place of the code, and as the status, for rooms that failed.
pub const FAILED: &str = "FAILED";
pub const SUCCESS: &str = "SUCCESS";

/// Destination for the results of a batch run
pub trait ReportSink {
    fn export(&self, results: &[EnrollmentResult]) -> Result<()>;
}

/// Writes results to a CSV file, replacing any previous file
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvExporter {
    fn export(&self, results: &[EnrollmentResult]) -> Result<()> {
        if results.is_empty() {
            tracing::info!("No data to export to CSV");
            return Ok(());
        }

        std::fs::write(&self.path, render_csv(results))
            .map_err(|e| AppError::Export(format!("{}: {}", self.path.display(), e)))?;

        tracing::info!(
            rows = results.len(),
            path = %self.path.display(),
            "CSV export completed"
        );
        Ok(())
    }
}

/// Render results as CSV text, header included.
pub fn render_csv(results: &[EnrollmentResult]) -> String {
    let mut csv_output = String::from(CSV_HEADER);
    csv_output.push('\n');

    for result in results {
        let code = result.code.as_deref().unwrap_or(FAILED);
        let status = if result.success { SUCCESS } else { FAILED };

        csv_output.push_str(&format!(
            "{},{},{},{}\n",
            escape_field(&result.room_name),
            escape_field(&result.room_id),
            escape_field(code),
            status,
        ));
    }

    csv_output
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Room;

    fn result(id: &str, name: &str, code: Option<&str>) -> EnrollmentResult {
        EnrollmentResult::from_outcome(&Room::new(id, name), code.map(str::to_string))
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pulse-enroll-{}-{}.csv", std::process::id(), name))
    }

    #[test]
    fn test_render_rows() {
        let csv = render_csv(&[
            result("r1", "Lobby", Some("AAA-111")),
            result("r2", "Boardroom", None),
        ]);

        assert_eq!(
            csv,
            "room_name,room_id,device_enrollment_code,status\n\
             Lobby,r1,AAA-111,SUCCESS\n\
             Boardroom,r2,FAILED,FAILED\n"
        );
    }

    #[test]
    fn test_render_quotes_special_fields() {
        let csv = render_csv(&[result("r1", "Lobby, \"East\" wing", Some("X"))]);
        let row = csv.lines().nth(1).expect("Should have a data row");
        assert_eq!(row, "\"Lobby, \"\"East\"\" wing\",r1,X,SUCCESS");
    }

    #[test]
    fn test_export_overwrites_file() {
        let path = temp_path("overwrite");
        std::fs::write(&path, "stale contents that are longer than the new file\n")
            .expect("Should seed file");

        let exporter = CsvExporter::new(&path);
        exporter
            .export(&[result("r1", "Lobby", Some("AAA"))])
            .expect("Should export");

        let written = std::fs::read_to_string(&path).expect("Should read file");
        assert_eq!(written, render_csv(&[result("r1", "Lobby", Some("AAA"))]));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_empty_writes_nothing() {
        let path = temp_path("empty");
        std::fs::remove_file(&path).ok();

        CsvExporter::new(&path).export(&[]).expect("Should succeed");
        assert!(!path.exists());
    }

    #[test]
    fn test_export_reports_io_failure() {
        let path = temp_path("missing-dir").join("nested").join("codes.csv");
        let err = CsvExporter::new(&path)
            .export(&[result("r1", "Lobby", None)])
            .expect_err("Should fail");
        assert!(matches!(err, AppError::Export(_)));
    }
}
