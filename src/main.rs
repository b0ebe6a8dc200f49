use clap::{Parser, Subcommand};
use colored::*;
use std::io::Read;
use std::path::PathBuf;

mod api;
mod config;
mod errors;
mod logging;
mod models;
mod server;
mod sync;

use crate::config::settings::{mask_token, Settings};
use crate::models::category::AssetCategory;
use crate::models::issue::InboundEvent;
use crate::sync::handler::{validate_email, AssetSyncHandler};

#[derive(Parser)]
#[command(name = "asset-sync")]
#[command(version)]
#[command(about = "Sync Snipe-IT asset serials into Jira issues", long_about = None)]
struct Cli {
    /// Debug level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: logging::LogFormat,

    /// TOML config file (default: ~/.asset-sync/config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook receiver
    Serve {
        /// Address to listen on (overrides BIND_ADDRESS)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Handle a single webhook event and print the response
    Handle {
        /// Event file, either the raw webhook JSON or {"body": "..."}. Reads stdin if omitted
        file: Option<PathBuf>,
    },

    /// Show the serials that would be written for an email, without updating Jira
    Lookup {
        /// (e.g., jane.doe@example.com)
        email: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display current configuration (with masked secrets)
    Show,

    /// Validate configuration by testing API connections
    Validate,

    /// Get the path to the config file
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_format);

    let config_file = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve { bind } => handle_serve(config_file, bind).await,

        Commands::Handle { file } => handle_event(config_file, file).await,

        Commands::Lookup { email } => handle_lookup(config_file, &email).await,

        Commands::Config { action } => handle_config(config_file, action).await,
    };

    if let Err(e) = result {
        eprintln!("\n{}", format!("{:#}", e).red());
        std::process::exit(1);
    }
}

fn load_settings(config_file: Option<&std::path::Path>) -> anyhow::Result<Settings> {
    Settings::load(config_file).map_err(|e| anyhow::anyhow!("{}", e))
}

fn build_handler(settings: &Settings) -> anyhow::Result<AssetSyncHandler> {
    AssetSyncHandler::new(settings).map_err(|e| anyhow::anyhow!("{}", e))
}

async fn handle_serve(config_file: Option<&std::path::Path>, bind: Option<String>) -> anyhow::Result<()> {
    let settings = load_settings(config_file)?;
    let handler = build_handler(&settings)?;

    let bind_address = bind.unwrap_or_else(|| settings.bind_address.clone());
    server::serve(handler, &bind_address).await
}

async fn handle_event(config_file: Option<&std::path::Path>, file: Option<PathBuf>) -> anyhow::Result<()> {
    use anyhow::Context;

    let input = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read event from stdin")?;
            buffer
        }
    };

    let settings = load_settings(config_file)?;
    let handler = build_handler(&settings)?;

    let response = handler.handle(&InboundEvent::from_input(&input)).await;
    println!("{}", serde_json::to_string(&response)?);

    if !response.is_success() {
        anyhow::bail!("Handler returned {}: {}", response.status_code, response.message());
    }

    Ok(())
}

async fn handle_lookup(config_file: Option<&std::path::Path>, email: &str) -> anyhow::Result<()> {
    let settings = load_settings(config_file)?;
    let handler = build_handler(&settings)?;

    let email = validate_email(Some(email), handler.email_domain())
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", format!("Looking up assets for {}...", email).cyan().bold());
    println!();

    let summary = handler.lookup_assets(&email).await;

    for category in AssetCategory::ALL {
        println!(
            "  {} {}",
            format!("{} [{}, {}]:", category, category.id(), category.jira_field()).bold(),
            summary.get(category).bright_white()
        );
    }

    Ok(())
}

async fn handle_config(config_file: Option<&std::path::Path>, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = load_settings(config_file)?;

            println!("{}", "Current Configuration".cyan().bold());
            println!();

            println!("{}", "[snipe-it]".bold());
            println!("  {} {}", "api_url:".dimmed(), settings.snipe_it_api_url.bright_white());
            println!("  {} {}", "api_token:".dimmed(), mask_token(&settings.snipe_it_api_token).yellow());

            println!();
            println!("{}", "[jira]".bold());
            println!("  {} {}", "api_url:".dimmed(), settings.jira_api_url.bright_white());
            println!("  {} {}", "api_token:".dimmed(), mask_token(&settings.jira_api_token).yellow());

            println!();
            println!("{}", "[handler]".bold());
            println!("  {} {}", "email_domain:".dimmed(), settings.email_domain.bright_white());
            println!("  {} {}s", "request_timeout:".dimmed(), settings.request_timeout_secs.to_string().bright_white());
            println!("  {} {}", "bind_address:".dimmed(), settings.bind_address.bright_white());

            Ok(())
        }

        ConfigAction::Validate => {
            println!("{}", "Validating configuration...".cyan().bold());
            println!();

            let settings = load_settings(config_file)?;
            let handler = build_handler(&settings)?;

            print!("{}", "  Testing Snipe-IT connection... ".dimmed());
            std::io::Write::flush(&mut std::io::stdout())?;
            report_check(handler.snipe_it().check_connection().await, "Snipe-IT")?;

            print!("{}", "  Testing Jira connection... ".dimmed());
            std::io::Write::flush(&mut std::io::stdout())?;
            report_check(handler.jira().check_connection().await, "Jira")?;

            println!();
            println!("{}", "✓ All validations passed!".green().bold());

            Ok(())
        }

        ConfigAction::Path => {
            let config_path = match config_file {
                Some(path) => path.to_path_buf(),
                None => Settings::config_path().map_err(|e| anyhow::anyhow!("{}", e))?,
            };
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn report_check(result: errors::Result<()>, system: &str) -> anyhow::Result<()> {
    match result {
        Ok(()) => {
            println!("{}", "✓".green().bold());
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            println!();
            println!("{}", format!("  {} connection failed: {}", system, e).red());
            Err(anyhow::anyhow!("{} validation failed", system))
        }
    }
}
