use anyhow::{Context, Result};
use axum::{
    routing::get,
    Router,
};
use clap::Parser;
use common::aggregate::PopulationTable;
use dotenvy::dotenv;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use crate::handlers::*;
use crate::loader::load_table;

mod error;
mod handlers;
mod loader;

#[derive(Parser, Debug)]
#[clap(name = "backend", about = "usa population trends backend")]
struct Opt {
    #[clap(short = 'l', long = "log", default_value = "debug")]
    log_level: String,

    #[clap(short = 'a', long = "addr", default_value = "::1")]
    addr: String,

    #[clap(short = 'p', long = "port", default_value = "8080")]
    port: u16,

    #[clap(long = "static-dir", default_value = "./dist")]
    static_dir: String,

    /// Population csv, overridden by DATA_PATH.
    #[clap(short = 'd', long = "data", default_value = "./data/us-population-2010-2019.csv")]
    data: String,

    /// Write logs to a daily rolling file in this directory instead of stdout.
    #[clap(long = "log-dir")]
    log_dir: Option<String>,

    #[clap(long = "json-logs")]
    json_logs: bool,
}

/// State shared by every handler. The table is read only once it's loaded.

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<PopulationTable>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let opt = Opt::parse();
    let _guard = init_logging(&opt);

    let data_path = std::env::var("DATA_PATH").unwrap_or(opt.data.clone());
    let table = load_table(Path::new(&data_path))?;
    let state = AppState { table: Arc::new(table) };
    let app = router(state, Path::new(&opt.static_dir));

    let mut port = opt.port;
    if let Ok(port_env) = std::env::var("PORT") {
        port = port_env
            .parse::<u16>()
            .with_context(|| format!("PORT must be a port number, got {}", port_env))?;
    }

    let sock_addr = SocketAddr::from((
        IpAddr::from_str(opt.addr.as_str()).unwrap_or(IpAddr::V6(Ipv6Addr::LOCALHOST)),
        port,
    ));

    info!("listening on http://{}", sock_addr);

    let listener = tokio::net::TcpListener::bind(&sock_addr)
        .await
        .with_context(|| format!("couldn't bind to {}", sock_addr))?;
    axum::serve(listener, app).await.context("server stopped unexpectedly")
}

/// Builds the api routes, with the compiled frontend served for everything else
/// so client side routes resolve to the app.

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let index_path = PathBuf::from(static_dir).join("index.html");
    Router::new()
        .route("/api/years", get(years))
        .route("/api/palettes", get(palettes))
        .route("/api/changes/{year}", get(changes))
        .route("/api/populations/{year}", get(populations))
        .route("/api/heatmap", get(heat_map))
        .route("/api/metrics/{year}", get(metrics))
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index_path)))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Sets up the global subscriber. `RUST_LOG` wins over `--log` when it's set.
///
/// The returned guard flushes the log file on drop, so it has to live as long
/// as the server does.

fn init_logging(opt: &Opt) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},hyper=info,mio=info", opt.log_level)));

    let (writer, guard) = match &opt.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "backend.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    if opt.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    guard
}
