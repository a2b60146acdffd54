//! weatherdash: terminal weather dashboard
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the providers into the dashboard, and runs the event loop:
//! refresh timer, console commands, provider completions and graceful
//! shutdown.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use weatherdash::config::AppConfig;
use weatherdash::console::{self, Command};
use weatherdash::engine::{Dashboard, Event, Services, Settings};
use weatherdash::http::{HttpJsonClient, JsonSource};
use weatherdash::location::{BoundedLocator, IpGeolocator, LocationResolver};
use weatherdash::providers::{CitySearcher, Nominatim, OpenMeteo};
use weatherdash::reference::{CityTable, GregorianAlmanac};
use weatherdash::render::TerminalSink;

const BANNER: &str = r#"
 __      __          _   _             ___          _
 \ \    / /__ __ _  | |_| |_  ___ _ _ |   \ __ _ __| |_
  \ \/\/ / -_) _` | |  _| ' \/ -_) '_|| |) / _` (_-< ' \
   \_/\_/\___\__,_|  \__|_||_\___|_|  |___/\__,_/__/_||_|
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_or_default("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        default_city = %cfg.location.default_name,
        refresh_secs = cfg.ui.refresh_interval_secs,
        ip_order = ?cfg.providers.ip_order,
        "weatherdash starting up"
    );

    // -- Initialise components -------------------------------------------

    let source: Arc<dyn JsonSource> = Arc::new(
        HttpJsonClient::new(
            &cfg.providers.user_agent,
            Duration::from_secs(cfg.providers.http_timeout_secs),
        )
        .context("Failed to build HTTP client")?,
    );

    let services = Services {
        weather: Arc::new(OpenMeteo::new(source.clone(), cfg.providers.weather_url.clone())),
        searcher: Arc::new(CitySearcher::new(
            Box::new(Nominatim::new(cfg.providers.search_url.clone(), cfg.providers.search_limit)),
            source.clone(),
        )),
        table: CityTable::builtin(),
        almanac: Box::new(GregorianAlmanac),
    };

    let ip = IpGeolocator::from_names(&cfg.providers.ip_order, source);
    if ip.is_empty() {
        warn!("No usable IP geolocation providers configured");
    }
    let resolver = Arc::new(LocationResolver::new(
        Box::new(BoundedLocator::from_config(&cfg.device)),
        ip,
        CityTable::builtin(),
    ));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut dash = Dashboard::new(
        TerminalSink::new(std::io::stdout()),
        services,
        Settings::from(&cfg.ui),
        cfg.location.default_location(),
        tx,
    );

    println!("{}", console::HELP);
    dash.start(Some(resolver));

    // -- Main loop -------------------------------------------------------

    let period = Duration::from_secs(cfg.ui.refresh_interval_secs.max(1));
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(interval_secs = period.as_secs(), "Entering main loop. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = interval.tick() => dash.handle(Event::Tick),
            Some(event) = rx.recv() => dash.handle(event),
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match console::parse(&line) {
                    Ok(Command::Dispatch(event)) => dash.handle(event),
                    Ok(Command::Submit(text)) => {
                        let text = text.unwrap_or_else(|| dash.session().search_input.clone());
                        dash.handle(Event::SubmitSearch(text));
                    }
                    Ok(Command::Help) => println!("{}", console::HELP),
                    Ok(Command::Quit) => break,
                    Err(e) => println!("{e}"),
                },
                Ok(None) => {
                    info!("Console closed; dashboard keeps refreshing");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(location = %dash.session().location, "weatherdash shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber. Logs go to stderr; stdout is the
/// dashboard.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weatherdash=info"));

    let json_logging = std::env::var("WEATHERDASH_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
