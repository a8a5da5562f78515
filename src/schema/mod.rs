pub mod derive;
pub mod types;
pub mod write;

pub use derive::{normalize, qid_from_uri};
pub use types::{Row, Schema, Table, CANDIDATE_COLUMNS};
pub use write::write_table;
