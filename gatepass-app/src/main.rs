//! Gatepass CLI
//!
//! Redeems a single-use code, either given directly (the URL-parameter
//! channel) or decoded from an image of a QR code, and writes the unlocked
//! content to a local sandboxed page.
//!
//! Usage:
//!   gatepass --base-url https://gate.example --code WALKUP-123
//!   gatepass --base-url https://gate.example --image ./photo.jpg

use anyhow::{Context, Result, bail};
use clap::Parser;
use gatepass_acquire::local_detector;
use gatepass_api::{ApiClient, ApiConfig};
use gatepass_app::{ConsoleSink, FileSurface, RedeemFlow, SandboxPolicy, fingerprint_device};
use gatepass_types::DeviceId;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "gatepass")]
#[command(about = "Redeem a single-use code for gated content")]
struct Args {
    /// Base URL of the redemption backend
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Opaque code or redeem URL (the ?c=... channel)
    #[arg(short, long)]
    code: Option<String>,

    /// Image file containing a QR code
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Device identifier; fingerprinted from this machine when omitted
    #[arg(short, long)]
    device_id: Option<String>,

    /// Where the unlocked content page is written
    #[arg(short, long, default_value = "gatepass-content.html")]
    output: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let device = match &args.device_id {
        Some(id) => DeviceId::new(id.clone()),
        None => fingerprint_device(),
    };
    info!("Device id: {}", device);

    let api = ApiClient::new(ApiConfig::with_base_url(&args.base_url))?;
    let flow = RedeemFlow::new(api, device, Arc::new(ConsoleSink));
    let mut surface = FileSurface::new(&args.output, SandboxPolicy::strict());

    let content_id = if let Some(code) = &args.code {
        flow.redeem_param(code, &mut surface).await?
    } else if let Some(path) = &args.image {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("qr.png")
            .to_string();
        let detector = local_detector();
        flow.redeem_image(&bytes, &filename, detector.as_deref(), &mut surface)
            .await?
    } else {
        bail!("nothing to redeem: pass --code or --image");
    };

    info!("Content {} written to {}", content_id, args.output.display());
    Ok(())
}
