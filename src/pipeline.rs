// src/pipeline.rs

use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::error::PipelineError;
use crate::fetch::ResultSource;
use crate::process::{sanitize_records, to_records, SanitizeOptions};
use crate::query::build_query;
use crate::schema::{normalize, write_table, Schema, Table};

/// Driver states, in the order a run can visit them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Fetching,
    Mapping,
    Normalizing,
    Degraded,
    Writing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// Fetch or parse failed; an empty table was written instead.
    Degraded { reason: String },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub path: PathBuf,
    pub rows: usize,
    pub outcome: Outcome,
    pub visited: Vec<Stage>,
}

impl RunReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, Outcome::Degraded { .. })
    }
}

/// Fetch → map → sanitize/normalize → write.
///
/// Anything that goes wrong before writing degrades to an empty table with the
/// candidate header, so a successful return always means the output file exists
/// and parses. Only a write failure is returned as an error.
#[instrument(level = "info", skip_all, fields(out = %config.output_path.display()))]
pub async fn run(config: &Config, source: &dyn ResultSource) -> Result<RunReport, PipelineError> {
    let schema = Schema::candidates();
    let mut visited = vec![Stage::Idle];

    let (table, outcome) = match build_table(config, source, &schema, &mut visited).await {
        Ok(table) => (table, Outcome::Complete),
        Err(e) if e.is_recoverable() => {
            warn!(error = %e, stage = ?visited.last(), "[DEGRADED] falling back to empty table");
            visited.push(Stage::Degraded);
            (
                Table::empty(schema),
                Outcome::Degraded {
                    reason: e.to_string(),
                },
            )
        }
        Err(e) => return Err(e),
    };

    visited.push(Stage::Writing);
    if let Err(e) = write_table(&table, &config.output_path) {
        error!(error = %e, "write failed; no output produced");
        return Err(e);
    }
    visited.push(Stage::Done);

    match &outcome {
        Outcome::Complete => info!(
            "[OK] {} rows → {}",
            table.len(),
            config.output_path.display()
        ),
        Outcome::Degraded { reason } => warn!(
            %reason,
            "[DEGRADED] 0 rows → {}",
            config.output_path.display()
        ),
    }

    Ok(RunReport {
        path: config.output_path.clone(),
        rows: table.len(),
        outcome,
        visited,
    })
}

async fn build_table(
    config: &Config,
    source: &dyn ResultSource,
    schema: &Schema,
    visited: &mut Vec<Stage>,
) -> Result<Table, PipelineError> {
    visited.push(Stage::Fetching);
    let query = build_query(config.limit, config.sample_seed);
    info!(limit = config.limit, seed = config.sample_seed, "fetching sample");
    let raw = source.fetch(&query).await?;

    if !config.pause_after_fetch.is_zero() {
        info!(pause = ?config.pause_after_fetch, "pausing after fetch");
        sleep(config.pause_after_fetch).await;
    }

    visited.push(Stage::Mapping);
    let records = to_records(&raw)?;

    visited.push(Stage::Normalizing);
    let opts = SanitizeOptions {
        keep_newlines: config.keep_newlines,
    };
    let cleaned = sanitize_records(&records, opts);
    Ok(normalize(&cleaned, schema))
}
