use crate::pricing::models::{
    LookupKind, PriceBreakdown, PricingSnapshot, QuoteRequest, UnresolvedId,
};

/// Quote calculator over a loaded lookup snapshot
///
/// Pure: the result depends only on the inputs and the snapshot. Ids that
/// match nothing are priced as zero (or multiplier 1) instead of failing.
pub struct PriceCalculator<'a> {
    snapshot: &'a PricingSnapshot,
}

impl<'a> PriceCalculator<'a> {
    pub fn new(snapshot: &'a PricingSnapshot) -> Self {
        Self { snapshot }
    }

    /// Rounded total for a selection
    pub fn calculate_price(
        &self,
        project_type_id: &str,
        page_count: i64,
        feature_ids: &[String],
        complexity_id: &str,
        timeline_id: &str,
    ) -> i64 {
        self.breakdown(project_type_id, page_count, feature_ids, complexity_id, timeline_id)
            .total
    }

    pub fn calculate_breakdown(&self, request: &QuoteRequest) -> PriceBreakdown {
        self.breakdown(
            &request.project_type_id,
            request.page_count,
            &request.feature_ids,
            request.complexity_id.as_deref().unwrap_or(""),
            request.timeline_id.as_deref().unwrap_or(""),
        )
    }

    fn breakdown(
        &self,
        project_type_id: &str,
        page_count: i64,
        feature_ids: &[String],
        complexity_id: &str,
        timeline_id: &str,
    ) -> PriceBreakdown {
        let mut unresolved = Vec::new();

        let base_price = match self
            .snapshot
            .project_types
            .iter()
            .find(|t| t.id == project_type_id)
        {
            Some(project_type) => project_type.base_price,
            None => {
                unresolved.push(UnresolvedId {
                    kind: LookupKind::ProjectType,
                    id: project_type_id.to_string(),
                });
                0.0
            }
        };

        let page_cost = self.page_cost(page_count);

        let mut feature_cost = 0.0;
        for feature_id in feature_ids {
            match self.snapshot.feature_prices.iter().find(|f| &f.id == feature_id) {
                Some(feature) => feature_cost += feature.price,
                None => unresolved.push(UnresolvedId {
                    kind: LookupKind::Feature,
                    id: feature_id.clone(),
                }),
            }
        }

        let subtotal = base_price + page_cost + feature_cost;

        let complexity_multiplier = if complexity_id.is_empty() {
            1.0
        } else {
            match self
                .snapshot
                .complexity_prices
                .iter()
                .find(|c| c.id == complexity_id)
            {
                Some(complexity) => complexity.multiplier,
                None => {
                    unresolved.push(UnresolvedId {
                        kind: LookupKind::Complexity,
                        id: complexity_id.to_string(),
                    });
                    1.0
                }
            }
        };

        let timeline_multiplier = if timeline_id.is_empty() {
            1.0
        } else {
            match self
                .snapshot
                .timeline_prices
                .iter()
                .find(|t| t.id == timeline_id)
            {
                Some(timeline) => timeline.multiplier,
                None => {
                    unresolved.push(UnresolvedId {
                        kind: LookupKind::Timeline,
                        id: timeline_id.to_string(),
                    });
                    1.0
                }
            }
        };

        // Complexity first, then timeline
        let mut total = subtotal;
        total *= complexity_multiplier;
        total *= timeline_multiplier;

        PriceBreakdown {
            base_price,
            page_cost,
            feature_cost,
            subtotal,
            complexity_multiplier,
            timeline_multiplier,
            total: total.round() as i64,
            unresolved,
        }
    }

    /// Extra pages beyond the largest tier at or below `page_count`
    fn page_cost(&self, page_count: i64) -> f64 {
        if page_count <= 0 {
            return 0.0;
        }

        let mut tiers: Vec<_> = self.snapshot.page_prices.iter().collect();
        tiers.sort_by(|a, b| b.page_count.cmp(&a.page_count));

        tiers
            .into_iter()
            .filter(|tier| tier.page_count >= 0)
            .find(|tier| tier.page_count <= page_count)
            .map(|tier| (page_count - tier.page_count) as f64 * tier.price_per_page)
            .unwrap_or(0.0)
    }
}
