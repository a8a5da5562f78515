// src/process/records.rs

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::error::PipelineError;
use crate::fetch::RawResult;

/// One parsed result item. Fields the source didn't return are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// New record with `f` applied to every value.
    pub fn map_values<F>(&self, mut f: F) -> Record
    where
        F: FnMut(&str) -> String,
    {
        Record {
            fields: self
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), f(v)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// { "results": { "bindings": [ { "field": { "type": ..., "value": ... } } ] } }
#[derive(Debug, Deserialize)]
struct Envelope {
    results: Results,
}

#[derive(Debug, Deserialize)]
struct Results {
    bindings: Vec<BTreeMap<String, ValueHolder>>,
}

#[derive(Debug, Deserialize)]
struct ValueHolder {
    value: serde_json::Value,
}

impl ValueHolder {
    fn into_scalar(self) -> String {
        match self.value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Parse the result envelope into one `Record` per binding.
#[instrument(level = "info", skip(raw), fields(bytes = raw.0.len()))]
pub fn to_records(raw: &RawResult) -> Result<Vec<Record>, PipelineError> {
    let envelope: Envelope = serde_json::from_str(&raw.0)?;
    let records: Vec<Record> = envelope
        .results
        .bindings
        .into_iter()
        .map(|binding| {
            binding
                .into_iter()
                .map(|(name, holder)| (name, holder.into_scalar()))
                .collect()
        })
        .collect();
    debug!(count = records.len(), "mapped bindings");
    Ok(records)
}
