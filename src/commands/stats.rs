use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use miraidev::dashboard::{DashboardFetcher, DashboardSnapshot};
use miraidev::supabase::SupabaseClient;
use std::path::Path;

/// Execute the stats command
///
/// One fan-out fetch of the dashboard aggregates, no live updates.
pub async fn execute(config_path: &Path, json: bool) -> Result<()> {
    let cfg = super::load(config_path)?;
    let client = SupabaseClient::new(&cfg.supabase)?;

    let snapshot = DashboardFetcher::new(client, cfg.dashboard.clone())
        .fetch_all()
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("MiraiDev Dashboard");
    println!("==================\n");
    display_stats(&snapshot);
    println!();
    display_recent_projects(&snapshot);

    Ok(())
}

fn display_stats(snapshot: &DashboardSnapshot) {
    let stats = &snapshot.stats;
    println!("  {}: {}", "Projects".cyan(), stats.total_projects);
    println!("  {}: {}", "Portfolio items".cyan(), stats.total_portfolios);
    println!("  {}: {}", "Portfolio views".cyan(), stats.total_views);
    println!("  {}: {}", "Active clients".cyan(), stats.active_clients);
    println!(
        "  {}: {}",
        "Unread messages".cyan(),
        if stats.unread_messages > 0 {
            stats.unread_messages.to_string().yellow()
        } else {
            stats.unread_messages.to_string().normal()
        }
    );
}

fn display_recent_projects(snapshot: &DashboardSnapshot) {
    if snapshot.recent_projects.is_empty() {
        println!("{}", "No projects yet".dimmed());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("PROJECT").fg(Color::Cyan),
        Cell::new("STATUS").fg(Color::Cyan),
        Cell::new("CREATED").fg(Color::Cyan),
    ]);

    for project in &snapshot.recent_projects {
        table.add_row(vec![
            Cell::new(project.title.as_deref().unwrap_or(&project.id)),
            Cell::new(project.status.as_deref().unwrap_or("-")),
            Cell::new(project.created_at.as_deref().unwrap_or("-")),
        ]);
    }

    println!("{}", "Recent projects".bold());
    println!("{table}");
}
