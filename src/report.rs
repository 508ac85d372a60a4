//! Validation Report
//!
//! The structured output of the validation stage. Every check returns a
//! [`ReportFragment`] and the orchestrator merges them into one
//! [`ValidationReport`], which is persisted as YAML.
use crate::errors::SensorError;
use crate::utils::{read_yaml_file, write_yaml_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of the two sample test for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftEntry {
    pub pvalue: f64,
    pub same_distribution: bool,
}

/// One named entry of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportSection {
    /// Dropped or missing column names.
    Columns(Vec<String>),
    /// Per column drift outcome.
    Drift(BTreeMap<String, DriftEntry>),
}

/// A report section produced by a single check, not yet merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFragment {
    pub key: String,
    pub section: ReportSection,
}

impl ReportFragment {
    pub fn columns(key: &str, columns: Vec<String>) -> Self {
        ReportFragment {
            key: key.to_string(),
            section: ReportSection::Columns(columns),
        }
    }

    pub fn drift(key: &str, entries: BTreeMap<String, DriftEntry>) -> Self {
        ReportFragment {
            key: key.to_string(),
            section: ReportSection::Drift(entries),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    sections: BTreeMap<String, ReportSection>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment. Each key may only be written once per run.
    pub fn merge(&mut self, fragment: ReportFragment) -> Result<(), SensorError> {
        if self.sections.contains_key(&fragment.key) {
            return Err(SensorError::DuplicateReportKey(fragment.key));
        }
        self.sections.insert(fragment.key, fragment.section);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ReportSection> {
        self.sections.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Column list stored under `key`, if that section is a list.
    pub fn columns(&self, key: &str) -> Option<&[String]> {
        match self.sections.get(key) {
            Some(ReportSection::Columns(c)) => Some(c),
            _ => None,
        }
    }

    /// Drift entries stored under `key`, if that section is a drift map.
    pub fn drift(&self, key: &str) -> Option<&BTreeMap<String, DriftEntry>> {
        match self.sections.get(key) {
            Some(ReportSection::Drift(d)) => Some(d),
            _ => None,
        }
    }

    /// Write the report as YAML, creating parent directories.
    pub fn save_report<P: AsRef<Path>>(&self, path: P) -> Result<(), SensorError> {
        write_yaml_file(path, self)
    }

    /// Read a report written by [`ValidationReport::save_report`].
    pub fn load_report<P: AsRef<Path>>(path: P) -> Result<Self, SensorError> {
        read_yaml_file(path)
    }
}
