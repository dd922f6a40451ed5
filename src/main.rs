//! `pulse-enroll` -- regenerate device enrollment codes for every room of a
//! Pulse organization and write them to a CSV report.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default                             |
//! |-----------------------|----------|-------------------------------------|
//! | `API_KEY`             | yes      | --                                  |
//! | `ORG_ID`              | yes      | --                                  |
//! | `PULSE_BASE_URL`      | no       | `https://api.pulse.neat.no/v1`      |
//! | `RATE_LIMIT_DELAY_MS` | no       | `1000`                              |
//! | `OUTPUT_CSV`          | no       | `neat_device_enrollment_codes.csv`  |
//! | `LOG_FORMAT`          | no       | text (`json` for JSON lines)        |

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pulse_enroll::batch::run_batch;
use pulse_enroll::config::Config;
use pulse_enroll::export::CsvExporter;
use pulse_enroll::pulse::PulseClient;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Enrollment run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Missing or invalid configuration");
            tracing::error!("Please create a .env file with:\nAPI_KEY=your_api_key_here\nORG_ID=your_organization_id_here");
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::info!(
        org_id = %config.org_id,
        base_url = %config.base_url,
        delay_ms = config.rate_limit_delay.as_millis() as u64,
        "Starting device enrollment code generation"
    );

    let mut client = PulseClient::new(&config).context("Failed to initialize Pulse client")?;
    let exporter = CsvExporter::new(&config.output_csv);

    let report = run_batch(&mut client, &exporter)
        .await
        .context("Device enrollment code generation aborted")?;

    if report.total() > 0 {
        tracing::info!(path = %exporter.path().display(), "Results exported");
    }

    Ok(ExitCode::from(report.exit_code()))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "pulse_enroll=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
