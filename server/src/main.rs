use anyhow::Result;
use axum::Router;
use clap::Parser;
use rankdex::Bm25Params;
use rankdex_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Records file, one `title<TAB>description` per line
    #[arg(long, default_value = "./records.tsv")]
    records: String,
    /// BM25 length-normalization strength
    #[arg(long, default_value_t = 0.75)]
    b: f32,
    /// BM25 term-frequency saturation constant
    #[arg(long, default_value_t = 1.75)]
    k: f32,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let params = Bm25Params::new(args.b, args.k)?;
    let app: Router = build_app(&args.records, params)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
