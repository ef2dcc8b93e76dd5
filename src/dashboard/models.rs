use crate::supabase::row_id::{deserialize_id, deserialize_opt_id};
use serde::{Deserialize, Serialize};

/// Aggregate counts shown on the admin dashboard; derived, never stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: u64,
    pub total_portfolios: u64,
    pub active_clients: u64,
    pub total_views: i64,
    pub unread_messages: u64,
}

/// `portfolio` column needed for the views sum
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioStatRow {
    #[serde(default)]
    pub views: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// What a dashboard view renders: `{stats, recentProjects, loading, error}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_projects: Vec<ProjectSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardSnapshot {
    pub fn loading() -> Self {
        Self {
            stats: DashboardStats::default(),
            recent_projects: Vec::new(),
            loading: true,
            error: None,
        }
    }
}
