//! cite-server binary - CSL bibliography formatting service

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cite_server::{ServiceConfig, context::DEFAULT_BODY_LIMIT, server};

#[derive(Parser, Debug)]
#[command(name = "cite-server")]
#[command(about = "Render CSL bibliographies to HTML over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(short = 'P', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// English locale XML file to use instead of the bundled locales-en-US.xml
    #[arg(long, env = "CITE_SERVER_LOCALE_FILE", value_name = "PATH")]
    locale_file: Option<PathBuf>,

    /// Maximum request body size in bytes
    #[arg(long, env = "CITE_SERVER_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    body_limit: usize,

    /// Log citation engine warnings such as unresolved items
    #[arg(long)]
    engine_warnings: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cite_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(host = %args.host, port = args.port, "Starting citeproc service");

    let config = ServiceConfig {
        port: args.port,
        host: args.host,
        locale_file: args.locale_file,
        body_limit: args.body_limit,
        engine_warnings: args.engine_warnings,
    };

    server::run_server(config).await?;

    Ok(())
}
