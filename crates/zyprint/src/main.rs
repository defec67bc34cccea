use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::{ConnectionRegistry, Discovery, PrinterService};
use domain::PrintRequest;
use infrastructure::{PrinterSettings, TcpScanner, TransportFactory, bonded_source};

#[derive(Parser, Debug)]
#[command(author, version, about = "Thermal receipt printer toolkit", long_about = None)]
struct Args {
    /// Path to config directory (defaults to the crate's config/ in a checkout)
    #[arg(long)]
    config_dir: Option<String>,

    /// Override the raw-print TCP port
    #[arg(long)]
    port: Option<u16>,

    /// Dial this RFCOMM channel instead of looking up the serial-port service
    #[arg(long)]
    channel: Option<u8>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List bonded wireless printers, plus network printers when a range is given
    Discover {
        /// /24 range to scan, e.g. 192.168.1 or 192.168.1.0/24
        #[arg(long)]
        range: Option<String>,
    },
    /// Scan a /24 range for hosts answering on the raw-print port
    Scan { range: String },
    /// Print plain text
    PrintText { identifier: String, text: String },
    /// Print a receipt template given as JSON
    PrintReceipt {
        identifier: String,
        /// Inline JSON template
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,
        /// Path to a JSON template
        #[arg(long)]
        file: Option<String>,
    },
    /// Connect, send the status inquiry and report the result
    Status { identifier: String },
}

fn config_dir(args: &Args) -> String {
    if let Some(dir) = &args.config_dir {
        return dir.clone();
    }
    let dev_base = "crates/zyprint";
    if std::path::Path::new(dev_base).exists() {
        format!("{}/config", dev_base)
    } else {
        "config".to_string()
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn receipt_request(json: Option<String>, file: Option<String>) -> Result<PrintRequest> {
    let source = match (json, file) {
        (Some(json), _) => json,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read receipt template {}", path))?,
        (None, None) => anyhow::bail!("Either --json or --file is required"),
    };
    Ok(PrintRequest::receipt_from_str(&source)?)
}

async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,zyprint=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config_dir = config_dir(&args);
    info!("📂 Config directory: {}", config_dir);

    let mut settings = PrinterSettings::load(&config_dir)?;
    if let Some(port) = args.port {
        settings.network.port = port;
    }
    if let Some(channel) = args.channel {
        settings.bluetooth.channel = Some(channel);
    }
    settings.validate()?;

    let registry = Arc::new(ConnectionRegistry::new(TransportFactory::connectors(
        &settings,
    )));
    let discovery = Discovery::new(bonded_source()).with_scanner(Arc::new(TcpScanner::new(
        &settings.network,
        &settings.scan,
    )));
    let service = PrinterService::new(registry, discovery);

    let outcome = execute(&service, args.command).await;
    service.shutdown().await;
    outcome
}

async fn execute(service: &PrinterService, command: Command) -> Result<()> {
    match command {
        Command::Discover { range } => {
            let printers = service.discover_all(range.as_deref()).await;
            info!("🔍 Found {} printer(s)", printers.len());
            print_json(&serde_json::to_value(printers)?)
        }
        Command::Scan { range } => {
            let printers = service.discover_network(Some(&range)).await?;
            print_json(&serde_json::to_value(printers)?)
        }
        Command::PrintText { identifier, text } => {
            let kind = service.connect(&identifier).await?;
            service
                .print(&identifier, &PrintRequest::text(text))
                .await?;
            print_json(&json!({ "printed": true, "transport": kind.as_str() }))
        }
        Command::PrintReceipt {
            identifier,
            json,
            file,
        } => {
            let request = receipt_request(json, file)?;
            let kind = service.connect(&identifier).await?;
            service.print(&identifier, &request).await?;
            print_json(&json!({ "printed": true, "transport": kind.as_str() }))
        }
        Command::Status { identifier } => {
            if let Err(e) = service.connect(&identifier).await {
                warn!(identifier = %identifier, error = %e, "Connect failed, reporting offline");
            }
            let status = service.status(&identifier).await;
            print_json(&serde_json::to_value(status)?)
        }
    }
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run()) {
        eprintln!("\n❌ CRITICAL ERROR: {:?}", e);
        std::process::exit(1);
    }
}
