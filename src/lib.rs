pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pulse;

pub use batch::{run_batch, BatchReport};
pub use config::Config;
pub use error::{AppError, Result};
pub use export::{CsvExporter, ReportSink};
pub use pulse::{EnrollmentApi, PulseClient};
