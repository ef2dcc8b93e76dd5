pub mod aggregate;
pub mod fetcher;
pub mod live;
pub mod models;

pub use fetcher::{DashboardFetcher, WatchedTable};
pub use live::DashboardHandle;
pub use models::{DashboardSnapshot, DashboardStats, ProjectSummary};
