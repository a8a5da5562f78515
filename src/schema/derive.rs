// src/schema/derive.rs

use tracing::{debug, instrument};

use super::types::{Schema, Table};
use crate::process::Record;

/// Field whose locator yields the `qid` column.
pub const IDENTIFIER_FIELD: &str = "item";
pub const QID_COLUMN: &str = "qid";

/// Text after the last `/` of an http(s) locator, taken verbatim; anything
/// else unchanged.
///
/// `http://www.wikidata.org/entity/Q42` → `Q42`.
pub fn qid_from_uri(value: &str) -> String {
    if !value.starts_with("http") {
        return value.to_string();
    }
    value.rsplit('/').next().unwrap_or(value).to_string()
}

/// Project records onto `schema`: derive `qid`, default missing columns to
/// `""`, drop columns outside the schema, order as the schema says.
#[instrument(level = "info", skip(records, schema), fields(records = records.len(), columns = schema.len()))]
pub fn normalize(records: &[Record], schema: &Schema) -> Table {
    let mut table = Table::empty(schema.clone());
    for record in records {
        let qid = record.get(IDENTIFIER_FIELD).map(qid_from_uri);
        let cells = schema
            .columns()
            .iter()
            .map(|col| {
                if col == QID_COLUMN {
                    if let Some(q) = &qid {
                        return q.clone();
                    }
                }
                record.get(col).unwrap_or_default().to_string()
            })
            .collect();
        table.push_cells(cells);
    }
    debug!(rows = table.len(), "normalized");
    table
}
