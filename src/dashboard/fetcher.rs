use crate::config::DashboardConfig;
use crate::dashboard::aggregate::{recent_projects, total_views, PortfolioTotals};
use crate::dashboard::models::{DashboardSnapshot, DashboardStats, PortfolioStatRow, ProjectSummary};
use crate::error::AppError;
use crate::supabase::{Order, Select, SupabaseClient};
use tracing::debug;

const VIEWS_PAGE_SIZE: usize = 1000;

/// Tables the dashboard aggregates and watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchedTable {
    Portfolio,
    Projects,
    Clients,
    ContactSubmissions,
}

impl WatchedTable {
    pub const ALL: [WatchedTable; 4] = [
        WatchedTable::Portfolio,
        WatchedTable::Projects,
        WatchedTable::Clients,
        WatchedTable::ContactSubmissions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WatchedTable::Portfolio => "portfolio",
            WatchedTable::Projects => "projects",
            WatchedTable::Clients => "clients",
            WatchedTable::ContactSubmissions => "contact_submissions",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectTotals {
    pub count: u64,
    pub recent: Vec<ProjectSummary>,
}

/// Re-derives each dashboard aggregate from a fresh read of its table
#[derive(Debug, Clone)]
pub struct DashboardFetcher {
    client: SupabaseClient,
    settings: DashboardConfig,
}

impl DashboardFetcher {
    pub fn new(client: SupabaseClient, settings: DashboardConfig) -> Self {
        Self { client, settings }
    }

    /// Row count plus the `views` sum, paged so `max-rows` cannot cut it short
    pub async fn portfolio(&self) -> Result<PortfolioTotals, AppError> {
        let table = WatchedTable::Portfolio.name();
        let count = self.client.count(&Select::from(table).columns("id")).await?;

        let mut views: i64 = 0;
        let mut seen: usize = 0;
        while (seen as u64) < count {
            let rows: Vec<PortfolioStatRow> = self
                .client
                .select(
                    &Select::from(table)
                        .columns("views")
                        .order("id", Order::Asc)
                        .limit(VIEWS_PAGE_SIZE)
                        .offset(seen),
                )
                .await?;
            if rows.is_empty() {
                break;
            }
            seen += rows.len();
            views += total_views(&rows);
        }

        Ok(PortfolioTotals { count, views })
    }

    pub async fn projects(&self) -> Result<ProjectTotals, AppError> {
        let table = WatchedTable::Projects.name();
        let limit = self.settings.recent_projects_limit;

        let all = Select::from(table).columns("id");
        let newest = Select::from(table)
            .order("created_at", Order::Desc)
            .limit(limit);

        let (count, rows) = tokio::try_join!(
            self.client.count(&all),
            self.client.select::<ProjectSummary>(&newest),
        )?;

        Ok(ProjectTotals {
            count,
            recent: recent_projects(&rows, limit),
        })
    }

    pub async fn active_clients(&self) -> Result<u64, AppError> {
        self.client
            .count(
                &Select::from(WatchedTable::Clients.name())
                    .columns("id")
                    .eq("status", &self.settings.active_client_status),
            )
            .await
    }

    pub async fn unread_messages(&self) -> Result<u64, AppError> {
        self.client
            .count(
                &Select::from(WatchedTable::ContactSubmissions.name())
                    .columns("id")
                    .neq_or_null("status", &self.settings.archived_message_status),
            )
            .await
    }

    /// Initial fan-out across all four tables
    pub async fn fetch_all(&self) -> Result<DashboardSnapshot, AppError> {
        debug!("Fetching all dashboard aggregates");

        let (portfolio, projects, active_clients, unread_messages) = tokio::try_join!(
            self.portfolio(),
            self.projects(),
            self.active_clients(),
            self.unread_messages(),
        )?;

        Ok(DashboardSnapshot {
            stats: DashboardStats {
                total_projects: projects.count,
                total_portfolios: portfolio.count,
                active_clients,
                total_views: portfolio.views,
                unread_messages,
            },
            recent_projects: projects.recent,
            loading: false,
            error: None,
        })
    }

    /// Recompute only the aggregates that depend on `table`
    pub async fn refresh(&self, table: WatchedTable, snapshot: &mut DashboardSnapshot) -> Result<(), AppError> {
        debug!(table = table.name(), "Recomputing dashboard aggregate");

        match table {
            WatchedTable::Portfolio => {
                let totals = self.portfolio().await?;
                snapshot.stats.total_portfolios = totals.count;
                snapshot.stats.total_views = totals.views;
            }
            WatchedTable::Projects => {
                let totals = self.projects().await?;
                snapshot.stats.total_projects = totals.count;
                snapshot.recent_projects = totals.recent;
            }
            WatchedTable::Clients => {
                snapshot.stats.active_clients = self.active_clients().await?;
            }
            WatchedTable::ContactSubmissions => {
                snapshot.stats.unread_messages = self.unread_messages().await?;
            }
        }
        Ok(())
    }
}
