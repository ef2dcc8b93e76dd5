//! Local reductions over fetched rows

use crate::dashboard::models::{PortfolioStatRow, ProjectSummary};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortfolioTotals {
    pub count: u64,
    pub views: i64,
}

/// Sum of `views`, null counting as zero
pub fn total_views(rows: &[PortfolioStatRow]) -> i64 {
    rows.iter().map(|r| r.views.unwrap_or(0)).sum()
}

/// First `limit` projects; rows are expected newest first
pub fn recent_projects(rows: &[ProjectSummary], limit: usize) -> Vec<ProjectSummary> {
    rows.iter().take(limit).cloned().collect()
}
