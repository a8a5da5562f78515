// src/process/mod.rs
use tracing::{debug, instrument};

pub mod records;
pub mod sanitize;

pub use records::{to_records, Record};
pub use sanitize::{sanitize, SanitizeOptions};

/// Clean every value of every record; keys and record order are unchanged.
#[instrument(level = "debug", skip(records), fields(count = records.len()))]
pub fn sanitize_records(records: &[Record], opts: SanitizeOptions) -> Vec<Record> {
    let cleaned: Vec<Record> = records
        .iter()
        .map(|r| r.map_values(|v| sanitize::clean_text(v, opts)))
        .collect();
    debug!("sanitized records");
    cleaned
}
