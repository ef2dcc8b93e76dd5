pub mod chat;
pub mod contact;
pub mod dashboard;
pub mod health;
pub mod portfolio;
pub mod pricing;

use crate::config::Config;
use crate::dashboard::DashboardSnapshot;
use crate::feed::LocalFeed;
use crate::pricing::PricingService;
use crate::supabase::SupabaseClient;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub supabase: SupabaseClient,
    pub pricing: Arc<PricingService>,
    pub dashboard: watch::Receiver<DashboardSnapshot>,
    pub feed: LocalFeed,
}
