//! mws-lookup - Amazon product dimensions by ASIN or product URL
//!
//! Serves lookups as an HTTP-triggered function or runs them from the shell.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lambda_http::{run, service_fn, Request};
use mws_lookup::commands::LookupCommand;
use mws_lookup::config::{Config, OutputFormat};
use mws_lookup::http::handle_request;
use mws_lookup::mws::{MwsClient, Region};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mws-lookup",
    version,
    about = "Amazon product dimensions by ASIN or product URL",
    long_about = "Looks up a product through the MWS Products API and returns its title, item and package dimensions, and full-size image."
)]
struct Cli {
    /// MWS marketplace region
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Override the MWS endpoint (e.g., http://localhost:9000)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "MWS_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Report not-found and upstream failures with 404/502
    #[arg(long, global = true)]
    strict_status: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve lookups as an HTTP-triggered function
    Serve,

    /// Look up a product by ASIN or amazon.com URL
    #[command(alias = "l")]
    Lookup {
        /// ASIN or product URL (defaults to the configured query)
        query: Option<String>,
    },

    /// List supported regions
    Regions,
}

fn init_logging(verbose: bool, serve: bool) {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    // The function runtime stamps every line already
    if serve {
        subscriber.without_time().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, matches!(cli.command, Commands::Serve));

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.proxy.is_some() {
        config.proxy = cli.proxy;
    }
    if cli.endpoint.is_some() {
        config.endpoint = cli.endpoint;
    }
    if cli.strict_status {
        config.strict_status = true;
    }

    match cli.command {
        Commands::Serve => {
            warn_missing_credentials(&config);
            info!("Serving lookups against {}", config.base_url());

            let client = MwsClient::new(&config)?;
            let command = LookupCommand::new(config);

            run(service_fn(|event: Request| handle_request(event, &command, &client)))
                .await
                .map_err(|e| anyhow::anyhow!("Function runtime failed: {}", e))?;
        }

        Commands::Lookup { query } => {
            warn_missing_credentials(&config);

            let query = query.unwrap_or_else(|| config.default_query.clone());
            let cmd = LookupCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Regions => {
            println!("Supported MWS regions:\n");
            println!("{:<6} {:<34} {:<16}", "Code", "Endpoint", "Marketplace");
            println!("{:-<6} {:-<34} {:-<16}", "", "", "");

            for region in Region::all() {
                println!(
                    "{:<6} {:<34} {:<16}",
                    region.to_string(),
                    region.mws_host(),
                    region.marketplace_id()
                );
            }
        }
    }

    Ok(())
}

fn warn_missing_credentials(config: &Config) {
    let missing = config.credentials.missing_fields();
    if !missing.is_empty() {
        warn!("Missing MWS credentials: {}", missing.join(", "));
    }
}
