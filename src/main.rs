use clap::Parser;
use rusty_metlink::{render_starting, Layout, PollConfig, PollCycle, UreqTransport};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[cfg(feature = "display")]
use rusty_metlink::LedMatrixRenderer;
#[cfg(not(feature = "display"))]
use rusty_metlink::ConsoleRenderer;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg(feature = "display")]
const PANEL_WIDTH: u32 = 64;
#[cfg(feature = "display")]
const PANEL_HEIGHT: u32 = 32;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_timer(ChronoLocal::new("%H:%M:%S".to_string()))
        .with_writer(std::io::stderr)
        .init();
}

// Console mode (without LED matrix)
#[cfg(not(feature = "display"))]
fn main() {
    init_logging();
    let config = PollConfig::parse();

    info!(
        route = %config.route_filter,
        destination = %config.destination_filter,
        "Metlink console mode (run with --features display on RPi)"
    );

    let mut renderer = ConsoleRenderer::stdout();
    render_starting(&mut renderer, &Layout::TFT);

    let transport = UreqTransport::new(&config.endpoint_url, HTTP_TIMEOUT);
    PollCycle::new(config, transport, renderer, Layout::TFT).run()
}

// Full mode with LED display (RPi)
#[cfg(feature = "display")]
fn main() {
    init_logging();
    let mut config = PollConfig::parse();

    let mut renderer = match LedMatrixRenderer::new(PANEL_WIDTH, PANEL_HEIGHT, "regular") {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Failed to initialize display: {}", e);
            eprintln!("Make sure you're running on a Raspberry Pi with proper permissions.");
            std::process::exit(1);
        }
    };

    let (width, height) = renderer.dimensions();
    info!(width, height, "Display initialized");

    // Only keep as many arrivals as the panel can show
    let fit = Layout::LED_MATRIX.records_that_fit(height as i32);
    if config.capacity > fit {
        info!(requested = config.capacity, fit, "Limiting capacity to panel size");
        config.capacity = fit;
    }
    render_starting(&mut renderer, &Layout::LED_MATRIX);

    let transport = UreqTransport::new(&config.endpoint_url, HTTP_TIMEOUT);
    PollCycle::new(config, transport, renderer, Layout::LED_MATRIX).run()
}
