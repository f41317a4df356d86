//! DTO for the dashboard counters.

use serde::Serialize;

use crate::domain::repositories::LinkStats;

#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub total_links: i64,
    pub running_links: i64,
    pub stopped_links: i64,
    pub total_runs: i64,
}

impl From<LinkStats> for DashboardStatsResponse {
    fn from(s: LinkStats) -> Self {
        Self {
            total_links: s.total,
            running_links: s.running,
            stopped_links: s.stopped,
            total_runs: s.total_runs,
        }
    }
}
