use crate::error::AppError;
use crate::pricing::models::{
    ComplexityPrice, FeaturePrice, PagePrice, PricingPackage, PricingSnapshot, ProjectType,
    TimelinePrice,
};
use crate::supabase::{Order, Select, SupabaseClient};
use tracing::{debug, info};

pub const PROJECT_TYPES: &str = "project_types";
pub const FEATURE_PRICES: &str = "feature_prices";
pub const PAGE_PRICES: &str = "page_prices";
pub const TIMELINE_PRICES: &str = "timeline_prices";
pub const COMPLEXITY_PRICES: &str = "complexity_prices";
pub const PRICING_PACKAGES: &str = "pricing_packages";

/// Load all six lookup tables in parallel
///
/// All-or-nothing: the first failing read aborts the load (the other
/// in-flight reads are dropped) and its message is returned.
pub async fn load_pricing_snapshot(client: &SupabaseClient) -> Result<PricingSnapshot, AppError> {
    debug!("Loading pricing lookup tables");

    let project_types = Select::from(PROJECT_TYPES).active_only();
    let feature_prices = Select::from(FEATURE_PRICES).active_only();
    let page_prices = Select::from(PAGE_PRICES)
        .active_only()
        .order("page_count", Order::Asc);
    let timeline_prices = Select::from(TIMELINE_PRICES).active_only();
    let complexity_prices = Select::from(COMPLEXITY_PRICES).active_only();
    let packages = Select::from(PRICING_PACKAGES).active_only();

    let (project_types, feature_prices, page_prices, timeline_prices, complexity_prices, packages) = tokio::try_join!(
        client.select::<ProjectType>(&project_types),
        client.select::<FeaturePrice>(&feature_prices),
        client.select::<PagePrice>(&page_prices),
        client.select::<TimelinePrice>(&timeline_prices),
        client.select::<ComplexityPrice>(&complexity_prices),
        client.select::<PricingPackage>(&packages),
    )?;

    let snapshot = PricingSnapshot {
        project_types,
        feature_prices,
        page_prices,
        timeline_prices,
        complexity_prices,
        packages,
    };

    info!(
        project_types = snapshot.project_types.len(),
        features = snapshot.feature_prices.len(),
        page_tiers = snapshot.page_prices.len(),
        timelines = snapshot.timeline_prices.len(),
        complexities = snapshot.complexity_prices.len(),
        packages = snapshot.packages.len(),
        "Loaded pricing lookup tables"
    );

    Ok(snapshot)
}
