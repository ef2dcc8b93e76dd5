use crate::supabase::row_id::deserialize_id;
use serde::{Deserialize, Serialize};

fn default_multiplier() -> f64 {
    1.0
}

/// Project category with a flat starting price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectType {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub base_price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Per-extra-page tier: applies to page counts at or above `page_count`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePrice {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub page_count: i64,
    pub price_per_page: f64,
}

/// Optional add-on with a flat price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePrice {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityPrice {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePrice {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

/// Pre-bundled fixed-price offering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingPackage {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub is_popular: bool,
}

/// The six lookup tables, loaded together
#[derive(Debug, Clone, Default, Serialize)]
pub struct PricingSnapshot {
    pub project_types: Vec<ProjectType>,
    pub feature_prices: Vec<FeaturePrice>,
    pub page_prices: Vec<PagePrice>,
    pub timeline_prices: Vec<TimelinePrice>,
    pub complexity_prices: Vec<ComplexityPrice>,
    pub packages: Vec<PricingPackage>,
}

impl PricingSnapshot {
    pub fn package(&self, id: &str) -> Option<&PricingPackage> {
        self.packages.iter().find(|p| p.id == id)
    }
}

/// Calculator input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub project_type_id: String,
    #[serde(default)]
    pub page_count: i64,
    #[serde(default)]
    pub feature_ids: Vec<String>,
    #[serde(default)]
    pub complexity_id: Option<String>,
    #[serde(default)]
    pub timeline_id: Option<String>,
}

/// Which lookup an unresolved id was meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    ProjectType,
    Feature,
    Complexity,
    Timeline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedId {
    pub kind: LookupKind,
    pub id: String,
}

/// Intermediate figures of a quote
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub page_cost: f64,
    pub feature_cost: f64,
    pub subtotal: f64,
    pub complexity_multiplier: f64,
    pub timeline_multiplier: f64,
    pub total: i64,
    /// Ids that matched nothing and were priced as zero / multiplier 1
    pub unresolved: Vec<UnresolvedId>,
}
