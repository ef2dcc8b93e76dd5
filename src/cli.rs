use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "miraidev", version, about = "MiraiDev pricing and dashboard API")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server (default)
    Start,

    /// Test configuration and Supabase connectivity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Price a project against the live lookup tables
    Quote {
        /// Project type id
        #[arg(short = 't', long)]
        project_type: String,

        /// Number of pages
        #[arg(short, long, default_value = "0")]
        pages: i64,

        /// Feature id (repeatable)
        #[arg(short, long = "feature")]
        features: Vec<String>,

        /// Complexity level id
        #[arg(long, default_value = "")]
        complexity: String,

        /// Timeline option id
        #[arg(long, default_value = "")]
        timeline: String,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print current dashboard stats
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_start() {
        let cli = Cli {
            config: PathBuf::from("config.toml"),
            command: None,
        };

        assert!(matches!(cli.get_command(), Commands::Start));
    }

    #[test]
    fn test_cli_parsing_quote() {
        let args = vec![
            "miraidev", "quote", "-t", "pt-1", "--pages", "7", "-f", "f-1", "-f", "f-2",
            "--complexity", "c-1",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Quote {
                project_type,
                pages,
                features,
                complexity,
                timeline,
                json,
            } => {
                assert_eq!(project_type, "pt-1");
                assert_eq!(pages, 7);
                assert_eq!(features, vec!["f-1", "f-2"]);
                assert_eq!(complexity, "c-1");
                assert!(timeline.is_empty());
                assert!(!json);
            }
            _ => panic!("Expected Quote command"),
        }
    }

    #[test]
    fn test_cli_parsing_config_show_with_global_config() {
        let args = vec!["miraidev", "config", "show", "--config", "/etc/miraidev.toml"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/miraidev.toml"));
        match cli.get_command() {
            Commands::Config { action } => assert!(matches!(action, ConfigCommands::Show)),
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_quote_requires_project_type() {
        assert!(Cli::try_parse_from(vec!["miraidev", "quote", "--pages", "3"]).is_err());
    }
}
