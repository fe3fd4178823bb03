//! Stormpath CLI - inspect and manage a Stormpath tenant
//!
//! Credentials come from `--api-key-id`/`--api-key-secret`, the
//! `STORMPATH_API_KEY_ID`/`STORMPATH_API_KEY_SECRET` environment variables, or
//! the `[credentials]` table of the configuration file, in that order.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};

use stormpath_client::{Client, CreateDirectory};
use stormpath_common::{
    API_KEY_ID_ENV, API_KEY_SECRET_ENV, ApiKeyPair, Application, Config, ResourceStatus, Tenant,
};

mod config;
mod display;

use config::FileConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL for the API endpoint
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API key id (or set STORMPATH_API_KEY_ID env var)
    #[arg(long, global = true, env = API_KEY_ID_ENV)]
    api_key_id: Option<String>,

    /// API key secret (or set STORMPATH_API_KEY_SECRET env var)
    #[arg(long, global = true, env = API_KEY_SECRET_ENV, hide_env_values = true)]
    api_key_secret: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the tenant the credentials belong to
    Tenant,
    /// List every application in the tenant
    Applications,
    /// List every directory in the tenant
    Directories,
    /// Create an application
    CreateApplication {
        /// Application name
        #[arg(long)]
        name: String,

        /// Application description
        #[arg(long, default_value = "")]
        description: String,

        /// Create the application disabled
        #[arg(long)]
        disabled: bool,

        /// Also create a directory for the application, optionally named
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        create_directory: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_config(args: &Args, file: &FileConfig) -> Config {
    let mut config = Config::default();

    if let Some(base_url) = args.base_url.as_ref().or(file.base_url.as_ref()) {
        config = config.with_base_url(base_url);
    }

    if let Some(timeout) = args.timeout.or(file.timeout_seconds) {
        config = config.with_timeout(timeout);
    }

    config
}

fn build_keypair(args: &Args, file: &FileConfig) -> Result<ApiKeyPair> {
    let file_credentials = file.credentials.as_ref();

    let id = args
        .api_key_id
        .clone()
        .or_else(|| file_credentials.map(|c| c.id.clone()))
        .with_context(|| format!("API key id must be provided via --api-key-id, {API_KEY_ID_ENV} or the config file"))?;

    let secret = args
        .api_key_secret
        .clone()
        .or_else(|| file_credentials.map(|c| c.secret.clone()))
        .with_context(|| format!("API key secret must be provided via --api-key-secret, {API_KEY_SECRET_ENV} or the config file"))?;

    Ok(ApiKeyPair::new(id, secret))
}

fn create_directory_option(value: Option<String>) -> CreateDirectory {
    match value {
        None => CreateDirectory::No,
        Some(name) if name.is_empty() => CreateDirectory::Yes,
        Some(name) => CreateDirectory::Named(name),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let file = FileConfig::load(args.config.as_deref())?;
    let config = build_config(&args, &file);
    let keypair = build_keypair(&args, &file)?;
    debug!("Using {config:?}");

    let client = Client::new(keypair, config)
        .await
        .context("Failed to connect to Stormpath")?;

    match args.command {
        Command::Tenant => {
            let tenant: &Tenant = client.tenant();
            if args.json {
                println!("{}", serde_json::to_string_pretty(tenant)?);
            } else {
                display::display_tenant(tenant);
            }
        }
        Command::Applications => {
            let apps = client.list_applications().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&apps)?);
            } else {
                display::display_applications(&apps);
            }
        }
        Command::Directories => {
            let dirs = client.list_directories().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&dirs)?);
            } else {
                display::display_directories(&dirs);
            }
        }
        Command::CreateApplication {
            name,
            description,
            disabled,
            create_directory,
        } => {
            let status = if disabled {
                ResourceStatus::Disabled
            } else {
                ResourceStatus::Enabled
            };
            let app = Application::builder()
                .name(name)
                .description(description)
                .status(status)
                .build();

            let created = client
                .create_application(&app, create_directory_option(create_directory))
                .await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&created)?);
            } else {
                display::display_created(&created);
            }
        }
    }

    Ok(())
}
