use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use miraidev::pricing::{load_pricing_snapshot, PriceBreakdown, PricingService, QuoteRequest};
use miraidev::supabase::SupabaseClient;
use std::path::Path;

/// Execute the quote command
///
/// Loads the lookup tables once and prices a single request.
pub async fn execute(config_path: &Path, request: QuoteRequest, json: bool) -> Result<()> {
    let cfg = super::load(config_path)?;
    let client = SupabaseClient::new(&cfg.supabase)?;

    let snapshot = load_pricing_snapshot(&client).await?;
    let service = PricingService::with_snapshot(client, snapshot);
    let breakdown = service.quote(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!("{}", breakdown_table(&breakdown));

    if !breakdown.unresolved.is_empty() {
        println!();
        println!("{}", "Unknown ids (priced as zero / multiplier 1):".yellow());
        for unresolved in &breakdown.unresolved {
            println!("  {:?}: {}", unresolved.kind, unresolved.id);
        }
    }

    Ok(())
}

fn breakdown_table(breakdown: &PriceBreakdown) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("COMPONENT").fg(Color::Cyan),
        Cell::new("AMOUNT").fg(Color::Cyan),
    ]);

    table.add_row(vec![Cell::new("Base price"), Cell::new(format_rupiah(breakdown.base_price))]);
    table.add_row(vec![Cell::new("Extra pages"), Cell::new(format_rupiah(breakdown.page_cost))]);
    table.add_row(vec![Cell::new("Features"), Cell::new(format_rupiah(breakdown.feature_cost))]);
    table.add_row(vec![Cell::new("Subtotal"), Cell::new(format_rupiah(breakdown.subtotal))]);
    table.add_row(vec![
        Cell::new("Complexity"),
        Cell::new(format!("× {}", breakdown.complexity_multiplier)),
    ]);
    table.add_row(vec![
        Cell::new("Timeline"),
        Cell::new(format!("× {}", breakdown.timeline_multiplier)),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Green),
        Cell::new(format_rupiah(breakdown.total as f64)).fg(Color::Green),
    ]);

    table
}

/// Format as `Rp 3.366.000`
fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}
