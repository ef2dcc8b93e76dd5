pub mod calculator;
pub mod loader;
pub mod models;
pub mod service;

pub use calculator::PriceCalculator;
pub use loader::load_pricing_snapshot;
pub use models::{PriceBreakdown, PricingPackage, PricingSnapshot, QuoteRequest};
pub use service::PricingService;
