//! DataWedge Demo - Main entry point

mod session;

use session::{format_availability, DemoSession};

use clap::{Parser, Subcommand};
use datawedge_foundation::{Platform, PluginConfig};
use datawedge_plugin::{
    AvailabilityOptions, Bridge, ConfigureProfileOptions, DataWedge, InitializeOptions,
    SimulatedBridge,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// DataWedge demo - drive the DataWedge plugin from the terminal
#[derive(Parser, Debug)]
#[command(name = "datawedge-demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Use the simulated Zebra device instead of the platform probe
    #[arg(short, long)]
    simulate: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the plugin and print the effective profile
    Initialize {
        /// Profile name (falls back to config)
        #[arg(short, long)]
        profile: Option<String>,

        /// Intent action scans are delivered with
        #[arg(long)]
        intent_action: Option<String>,
    },
    /// Query DataWedge and scanner availability
    Availability {
        /// Query timeout in milliseconds
        #[arg(short, long)]
        timeout_ms: Option<u64>,
    },
    /// Check whether DataWedge is ready
    Ready,
    /// Check whether a scanner is present
    Scanner,
    /// Create or update a profile
    Configure {
        /// Profile name
        profile: String,

        /// Deliver scans as keystrokes instead of intents
        #[arg(long)]
        keystroke: bool,
    },
    /// Print scan events as they arrive
    Listen {
        /// Number of scans to inject in simulate mode
        #[arg(short, long, default_value = "3")]
        count: usize,
    },
    /// Scripted walkthrough of the demo screen
    Session {
        /// Profile name
        #[arg(short, long, default_value = session::DEMO_PROFILE)]
        profile: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config = PluginConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}", e);
        PluginConfig::default()
    });

    let simulator = args
        .simulate
        .then(|| Arc::new(SimulatedBridge::new(&config)));
    let datawedge = Arc::new(match &simulator {
        Some(sim) => {
            let bridge: Arc<dyn Bridge> = sim.clone();
            DataWedge::with_platform(Platform::Android, Some(bridge), &config)
        }
        None => DataWedge::from_config(&config, None),
    });
    info!(platform = %datawedge.platform(), native = datawedge.is_native(), "DataWedge ready");

    match args.command {
        Command::Initialize {
            profile,
            intent_action,
        } => {
            let mut options = InitializeOptions::new();
            if let Some(profile) = profile {
                options = options.profile_name(profile);
            }
            if let Some(action) = intent_action {
                options = options.intent_action(action);
            }
            print_json(&datawedge.initialize(Some(options)).await?)?;
        }
        Command::Availability { timeout_ms } => {
            let options = timeout_ms.map(AvailabilityOptions::with_timeout_ms);
            let result = datawedge.get_availability(options).await?;
            println!("{}", format_availability(&result));
            print_json(&result)?;
        }
        Command::Ready => {
            print_json(&datawedge.is_ready().await?)?;
        }
        Command::Scanner => {
            print_json(&datawedge.has_scanner().await?)?;
        }
        Command::Configure { profile, keystroke } => {
            let options = ConfigureProfileOptions::new(profile)
                .barcode_enabled(true)
                .keystroke_enabled(keystroke)
                .intent_enabled(!keystroke);
            print_json(&datawedge.configure_profile(options).await?)?;
        }
        Command::Listen { count } => {
            let unsubscribe = datawedge
                .on_scan_result(|scan| {
                    println!(
                        "{} ({})",
                        scan.data,
                        scan.label_type.as_deref().unwrap_or("no type")
                    );
                })
                .await?;

            match &simulator {
                Some(sim) => {
                    for i in 0..count {
                        sim.scan(&format!("SIM-{:04}", i + 1), None);
                    }
                }
                None => {
                    println!("Listening for scans. Press Ctrl+C to stop.");
                    tokio::signal::ctrl_c().await?;
                }
            }

            unsubscribe.remove();
        }
        Command::Session { profile } => {
            run_session(datawedge, simulator, profile).await;
        }
    }

    Ok(())
}

/// 데모 화면 시나리오: initialize → availability → attach → scan → configure → detach
async fn run_session(
    datawedge: Arc<DataWedge>,
    simulator: Option<Arc<SimulatedBridge>>,
    profile: String,
) {
    let mut session = DemoSession::new(datawedge).with_profile(profile);

    session.initialize().await;
    session.get_availability().await;
    session.attach_scanner().await;

    if let Some(sim) = &simulator {
        if session.start_scanning().await {
            sim.scan("4006381333931", Some("LABEL-TYPE-EAN13"));
            sim.scan("https://www.zebra.com", Some("LABEL-TYPE-QRCODE"));
            session.stop_scanning().await;
        }
    } else {
        // 실기기: 사용자가 트리거를 누를 시간
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    session.configure_profile(true).await;
    session.detach_scanner();

    println!("Profile: {}", session.profile_name());
    if let Some(init) = session.init_result() {
        println!("Intent action: {}", init.intent_action);
    }
    if let Some(availability) = session.availability() {
        println!("{}", format_availability(availability));
    }
    println!("{}", session.status_message());
    println!();
    println!("Scans ({}):", session.scans().len());
    for entry in session.scans() {
        println!(
            "  {} {} ({})",
            entry.timestamp.format("%H:%M:%S"),
            entry.scan.data,
            entry.scan.label_type.as_deref().unwrap_or("no type")
        );
    }
    println!();
    println!("Log:");
    for line in session.logs() {
        println!("  {}", line);
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
