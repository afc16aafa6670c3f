use serde::{Deserialize, Serialize};

/// Final results of one Top-N run, in the shape the renderers consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub n: usize,
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub sources: Vec<String>,
    pub totals: Totals,
    /// The Top-N values in ascending order.
    pub values: Vec<i64>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Totals {
    pub lines_read: u64,
    pub skipped_lines: u64,
    pub elapsed_seconds: u64,
}

/// A non-fatal problem encountered while reading a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub source: String,
    pub error: String,
}
