pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod query;
pub mod schema;

pub use config::Config;
pub use error::{ConfigError, PipelineError};
pub use pipeline::{run, Outcome, RunReport, Stage};
