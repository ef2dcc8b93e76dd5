use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use miraidev::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // The server configures logging from its own config; one-shot commands stay quiet
    if !matches!(command, cli::Commands::Start) {
        init_tracing("warn", "text");
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Quote {
            project_type,
            pages,
            features,
            complexity,
            timeline,
            json,
        } => {
            let request = miraidev::pricing::QuoteRequest {
                project_type_id: project_type,
                page_count: pages,
                feature_ids: features,
                complexity_id: Some(complexity).filter(|c| !c.is_empty()),
                timeline_id: Some(timeline).filter(|t| !t.is_empty()),
            };
            commands::quote::execute(&args.config, request, json).await?;
        }
        cli::Commands::Stats { json } => {
            commands::stats::execute(&args.config, json).await?;
        }
        cli::Commands::Version => {
            println!("MiraiDev v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
