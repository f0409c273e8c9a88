use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use coupon_widget::{
    AppState, DEFAULT_ISS_BASE_URL, DEFAULT_TIMEZONE, IssCouponSource, build_router,
    graceful_shutdown,
};

const DEFAULT_LOG_FILTER: &str = "coupon_widget=debug,tower_http=debug";

/// Serves bond coupon widgets backed by the Moscow Exchange ISS API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the widgets from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The base URL of the ISS API.
    #[arg(long, default_value = DEFAULT_ISS_BASE_URL)]
    iss_base_url: String,

    /// The canonical timezone that decides which day is today, e.g. "Europe/Moscow".
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// How long to wait for the ISS API before giving up, in seconds.
    #[arg(long, default_value_t = 10)]
    fetch_timeout_secs: u64,

    /// File to write debug logs to, in addition to stdout.
    #[arg(long)]
    log_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_logging(args.log_path.as_deref())?;

    let coupon_source = IssCouponSource::new(
        &args.iss_base_url,
        Duration::from_secs(args.fetch_timeout_secs),
    )
    .inspect_err(|error| tracing::error!("Could not create the ISS client: {error}"))?;
    let app_state = AppState::new(Arc::new(coupon_source), &args.timezone)
        .inspect_err(|error| tracing::error!("Could not create the app state: {error}"))?;

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));

    tracing::info!(
        "HTTP server listening on {addr}, fetching coupons from {}",
        args.iss_base_url
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging(log_path: Option<&Path>) -> Result<(), std::io::Error> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(LevelFilter::INFO);

    let debug_log = match log_path {
        Some(log_path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged when they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
