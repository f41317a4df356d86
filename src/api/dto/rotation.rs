//! DTO for the manual rotation trigger.

use serde::Serialize;

use crate::application::services::{BatchSummary, LinkRotationResult};

#[derive(Debug, Serialize)]
pub struct RotationRunResponse {
    /// Campaign client in use: `simulate` or `live`.
    pub mode: &'static str,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Ids of running links skipped because no active domain was available.
    pub skipped: Vec<i64>,
    pub results: Vec<LinkRotationResult>,
}

impl RotationRunResponse {
    pub fn new(mode: &'static str, summary: BatchSummary) -> Self {
        Self {
            mode,
            processed: summary.results.len(),
            succeeded: summary.succeeded(),
            failed: summary.failed(),
            skipped: summary.skipped,
            results: summary.results,
        }
    }
}
