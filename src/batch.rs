//! Batch run: list every room, regenerate its enrollment code, report.
//!
//! Listing failures abort the run. Regeneration failures are isolated to the
//! room they happened on and show up in the report as failed rows.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::export::{ReportSink, FAILED};
use crate::models::EnrollmentResult;
use crate::pulse::EnrollmentApi;

/// Outcome of one complete run, in room order
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub results: Vec<EnrollmentResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.success_count() == self.total()
    }

    /// Process exit status: 0 only when every processed room got a code.
    pub fn exit_code(&self) -> u8 {
        if self.all_succeeded() {
            0
        } else {
            1
        }
    }
}

pub async fn run_batch<A, S>(api: &mut A, sink: &S) -> Result<BatchReport>
where
    A: EnrollmentApi,
    S: ReportSink,
{
    let started_at = Utc::now();

    tracing::info!("Fetching rooms");
    let rooms = api.list_rooms().await?;

    if rooms.is_empty() {
        tracing::info!("No rooms found in the organization");
        return Ok(BatchReport {
            results: Vec::new(),
            started_at,
            finished_at: Utc::now(),
        });
    }

    tracing::info!(count = rooms.len(), "Generating device enrollment codes");

    let total = rooms.len();
    let mut results = Vec::with_capacity(total);

    for (index, room) in rooms.iter().enumerate() {
        if room.id.trim().is_empty() {
            continue;
        }

        tracing::info!(
            room = index + 1,
            total,
            room_name = %room.name,
            room_id = %room.id,
            "Processing room"
        );

        let code = api.regenerate_code(&room.id).await;
        results.push(EnrollmentResult::from_outcome(room, code));
    }

    let report = BatchReport {
        results,
        started_at,
        finished_at: Utc::now(),
    };

    log_summary(&report);
    sink.export(&report.results)?;

    Ok(report)
}

/// Per-room summary followed by the aggregate count.
pub fn log_summary(report: &BatchReport) {
    tracing::info!("DEVICE ENROLLMENT CODES SUMMARY");

    for result in &report.results {
        let mark = if result.success { "✓" } else { "✗" };
        let dec = result.code.as_deref().unwrap_or(FAILED);

        if result.success {
            tracing::info!("{} {} (ID: {}) DEC: {}", mark, result.room_name, result.room_id, dec);
        } else {
            tracing::warn!("{} {} (ID: {}) DEC: {}", mark, result.room_name, result.room_id, dec);
        }
    }

    let elapsed = report.finished_at - report.started_at;
    tracing::info!(
        successful = report.success_count(),
        total = report.total(),
        elapsed_secs = elapsed.num_seconds(),
        "Successfully generated {}/{} device enrollment codes",
        report.success_count(),
        report.total()
    );
}
