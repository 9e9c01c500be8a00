use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ga4_client::{Ga4Client, Scope};
use ga4_types::PropertyId;
use prtd_analytics::{
    dimensions, explorations, health, monitor, report, validate, viewers, PropertyClient,
    ReportSource, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "prtd-analytics")]
#[command(about = "GA4 setup, validation and monitoring for PRTD deal tracking")]
struct Args {
    /// Path to a TOML config file (defaults to ./prtd-analytics.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log API calls and internal steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register the PRTD custom dimensions on the property
    Dimensions {
        /// List existing custom dimensions instead
        #[arg(short, long)]
        list: bool,
    },
    /// Validate that tracking data is arriving as expected
    Validate,
    /// Watch realtime data and save a session report
    Monitor {
        /// Session length in minutes
        #[arg(default_value = "30")]
        duration: u64,
        /// Seconds between checks
        #[arg(default_value = "30")]
        interval: u64,
    },
    /// Score tracking health and alert on problems
    Health {
        #[command(subcommand)]
        mode: Option<HealthMode>,
    },
    /// Show deal performance, conversions and realtime activity
    Tracking,
    /// Show content engagement data
    Engagement,
    /// Write exploration templates and the manual setup guide
    Explorations,
    /// Walk through creating the explorations in the GA4 UI
    Guide,
    /// Check that templates and tracking files are in place
    Verify,
}

#[derive(Subcommand, Debug)]
enum HealthMode {
    /// Check on a fixed interval until Ctrl+C
    Continuous {
        /// Minutes between checks
        #[arg(default_value = "60")]
        interval_minutes: u64,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// The configured property, or `None` after telling the user how to set it.
fn property(settings: &Settings) -> Option<PropertyId> {
    let property = settings.property();
    if property.is_none() {
        println!("❌ GA4_PROPERTY_ID environment variable not set!");
        println!("Set it with: export GA4_PROPERTY_ID=your_property_id");
    }
    property
}

/// Build a client bound to the configured property. Prints the reason and
/// returns `None` when it cannot be built.
fn connect(settings: &Settings, scope: Scope) -> Option<PropertyClient> {
    let property = property(settings)?;

    if !settings.credentials_path.exists() {
        println!(
            "❌ Credentials file not found: {}",
            settings.credentials_path.display()
        );
        println!("Download your service account key and set GOOGLE_APPLICATION_CREDENTIALS");
        return None;
    }

    let client = Ga4Client::builder()
        .credentials_file(&settings.credentials_path)
        .scopes([scope])
        .timeout(settings.request_timeout())
        .build();

    match client {
        Ok(client) => {
            debug!(
                "Authenticated as {} for property {}",
                client.service_account_email(),
                property
            );
            Some(PropertyClient::new(client, property))
        }
        Err(e) => {
            println!("❌ Failed to initialize GA4 client: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = Settings::load(args.config.as_deref())?;
    debug!("Loaded settings: output_dir={}", settings.output_dir.display());

    match args.command {
        Command::Verify => {
            explorations::run_verify(&settings);
        }
        Command::Explorations => {
            if let Some(property) = property(&settings) {
                explorations::run_explorations(&settings.templates_dir, &property)?;
            }
        }
        Command::Guide => {
            if let Some(property) = property(&settings) {
                explorations::run_guide(&property)?;
            }
        }
        Command::Dimensions { list } => {
            let Some(admin) = connect(&settings, Scope::AnalyticsEdit) else {
                std::process::exit(1);
            };
            let id = admin.property().as_str().to_string();

            if list {
                dimensions::run_list(&admin, &id).await;
            } else if !dimensions::run_setup(&admin, &id).await {
                std::process::exit(1);
            }
        }
        Command::Tracking => {
            let Some(source) = connect(&settings, Scope::AnalyticsReadonly) else {
                std::process::exit(1);
            };
            viewers::run_tracking(&source).await;
        }
        Command::Engagement => {
            let Some(source) = connect(&settings, Scope::AnalyticsReadonly) else {
                std::process::exit(1);
            };
            viewers::run_engagement(&source).await;
        }
        command => {
            if let Some(source) = connect(&settings, Scope::AnalyticsReadonly) {
                run_reporting(command, &source, &settings).await?;
            }
        }
    }

    Ok(())
}

/// Commands that only read reports.
async fn run_reporting(
    command: Command,
    source: &PropertyClient,
    settings: &Settings,
) -> Result<()> {
    match command {
        Command::Validate => {
            let results = validate::run_validation(source).await;
            println!("{}", validate::render_summary(&results));

            let path = report::save_report(
                &settings.output_dir,
                "analytics-validation",
                &Local::now(),
                &results,
            )?;
            println!("\n📁 Detailed results saved to: {}", path.display());
        }
        Command::Monitor { duration, interval } => {
            monitor::run_monitor(source, &settings.output_dir, duration, interval).await?;
        }
        Command::Health { mode: None } => {
            health::command::run_once(source, &settings.output_dir, &settings.email).await?;
        }
        Command::Health {
            mode: Some(HealthMode::Continuous { interval_minutes }),
        } => {
            health::command::run_continuous(
                source,
                &settings.output_dir,
                &settings.email,
                Duration::from_secs(interval_minutes * 60),
            )
            .await?;
        }
        _ => {}
    }
    Ok(())
}
