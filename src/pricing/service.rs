use crate::error::AppError;
use crate::pricing::calculator::PriceCalculator;
use crate::pricing::loader::load_pricing_snapshot;
use crate::pricing::models::{PriceBreakdown, PricingPackage, PricingSnapshot, QuoteRequest};
use crate::supabase::SupabaseClient;
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tracing::{info, warn};

/// Holds the current pricing snapshot and answers quotes against it
///
/// The snapshot is absent until the first successful load. Reloads swap it
/// atomically; a failed reload leaves the previous snapshot in place.
pub struct PricingService {
    client: SupabaseClient,
    snapshot: ArcSwapOption<PricingSnapshot>,
}

impl PricingService {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client,
            snapshot: ArcSwapOption::empty(),
        }
    }

    /// Service with a preloaded snapshot (CLI one-shots and tests)
    pub fn with_snapshot(client: SupabaseClient, snapshot: PricingSnapshot) -> Self {
        Self {
            client,
            snapshot: ArcSwapOption::from_pointee(snapshot),
        }
    }

    /// Fetch all lookup tables and swap them in
    pub async fn load(&self) -> Result<Arc<PricingSnapshot>, AppError> {
        match load_pricing_snapshot(&self.client).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.snapshot.store(Some(snapshot.clone()));
                info!("Pricing snapshot updated");
                Ok(snapshot)
            }
            Err(e) => {
                if self.is_loaded() {
                    warn!(error = %e, "Pricing reload failed, keeping previous snapshot");
                } else {
                    warn!(error = %e, "Initial pricing load failed");
                }
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.load().is_some()
    }

    pub fn snapshot(&self) -> Result<Arc<PricingSnapshot>, AppError> {
        self.snapshot
            .load_full()
            .ok_or_else(|| AppError::NotReady("pricing data is still loading".to_string()))
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<PriceBreakdown, AppError> {
        let snapshot = self.snapshot()?;
        let breakdown = PriceCalculator::new(&snapshot).calculate_breakdown(request);

        for unresolved in &breakdown.unresolved {
            warn!(
                kind = ?unresolved.kind,
                id = %unresolved.id,
                "Quote references an unknown id, priced as no-op"
            );
        }

        Ok(breakdown)
    }

    pub fn package(&self, id: &str) -> Result<PricingPackage, AppError> {
        let snapshot = self.snapshot()?;
        snapshot
            .package(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("pricing package '{}'", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupabaseConfig;
    use crate::pricing::models::{PricingPackage, ProjectType};

    fn client() -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: "http://127.0.0.1:9".to_string(),
            service_role_key: "test-key".to_string(),
            schema: "public".to_string(),
            timeout_seconds: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_quote_before_load_is_not_ready() {
        let service = PricingService::new(client());
        assert!(!service.is_loaded());

        let result = service.quote(&QuoteRequest::default());
        assert!(matches!(result, Err(AppError::NotReady(_))));
    }

    #[test]
    fn test_quote_and_package_lookup() {
        let snapshot = PricingSnapshot {
            project_types: vec![ProjectType {
                id: "ecommerce".to_string(),
                name: "E-Commerce".to_string(),
                base_price: 5_000_000.0,
                description: None,
            }],
            packages: vec![PricingPackage {
                id: "starter".to_string(),
                name: "Starter".to_string(),
                price: 1_500_000.0,
                description: None,
                features: vec!["5 halaman".to_string()],
                is_popular: false,
            }],
            ..Default::default()
        };
        let service = PricingService::with_snapshot(client(), snapshot);

        let breakdown = service
            .quote(&QuoteRequest {
                project_type_id: "ecommerce".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(breakdown.total, 5_000_000);

        assert_eq!(service.package("starter").unwrap().name, "Starter");
        assert!(matches!(service.package("enterprise"), Err(AppError::NotFound(_))));
    }
}
