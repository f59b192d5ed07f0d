use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Column names written as the first line of every saved file.
///
/// `FxiletID` keeps the spelling of existing datasets so files written here
/// stay readable by older tooling.
pub const CSV_HEADER: [&str; 5] = [
    "SiteID",
    "FxiletID",
    "Name",
    "Criticality",
    "RelevantComputerCount",
];

pub const FIELD_COUNT: usize = CSV_HEADER.len();

/// One patch/compliance item belonging to a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixlet {
    pub site_id: i64,
    pub fixlet_id: i64,
    pub name: String,
    pub criticality: String,
    pub relevant_computer_count: u64,
}

impl Fixlet {
    #[must_use]
    pub fn new(
        site_id: i64,
        fixlet_id: i64,
        name: impl Into<String>,
        criticality: impl Into<String>,
        relevant_computer_count: u64,
    ) -> Self {
        Self {
            site_id,
            fixlet_id,
            name: name.into(),
            criticality: criticality.into(),
            relevant_computer_count,
        }
    }

    /// Fields in file column order.
    #[must_use]
    pub fn to_row(&self) -> [String; FIELD_COUNT] {
        [
            self.site_id.to_string(),
            self.fixlet_id.to_string(),
            self.name.clone(),
            self.criticality.clone(),
            self.relevant_computer_count.to_string(),
        ]
    }
}

impl fmt::Display for Fixlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SiteID: {}, FxiletID: {}, Name: {}, Criticality: {}, Computers: {}",
            self.site_id, self.fixlet_id, self.name, self.criticality, self.relevant_computer_count
        )
    }
}

/// What to do with a data row that cannot be decoded into five fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Stop at the first malformed row and drop everything after it.
    Truncate,
    /// Skip the row, report it, and keep reading.
    #[default]
    Skip,
    /// Abort the load with an error.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

/// Records read from disk plus every row that did not make it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub fixlets: Vec<Fixlet>,
    pub rejected: Vec<RejectedRow>,
    /// Set when the `truncate` policy stopped reading early.
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Ndjson,
}
