//! Public portfolio catalog

use crate::error::AppError;
use crate::supabase::row_id::deserialize_id;
use crate::supabase::{Order, Select, SupabaseClient};
use serde::{Deserialize, Serialize};

pub const PORTFOLIO: &str = "portfolio";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub views: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Active portfolio items, newest first
pub async fn list_portfolio(client: &SupabaseClient) -> Result<Vec<PortfolioItem>, AppError> {
    client
        .select(
            &Select::from(PORTFOLIO)
                .active_only()
                .order("created_at", Order::Desc),
        )
        .await
}
