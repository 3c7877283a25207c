//! ClauseWise web server.
//!
//! Loads the four inference pipelines once at startup, then serves the
//! single-page UI: document upload + analysis, general legal chat, and a
//! cosmetic logo upload. All state is in-memory and scoped to the process.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clausewise_ai::{EntityTagger, ExtractiveQa, NliClassifier, Seq2SeqSimplifier};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod analyze;
mod error;
mod page;
mod routes;
mod session;
mod state;

use state::{AppState, Inference};

#[derive(Parser, Debug)]
#[command(name = "clausewise")]
#[command(about = "ClauseWise AI legal document analyzer")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the model subdirectories (qa/, simplifier/, ner/, classifier/)
    #[arg(long, default_value = "models", env = "CLAUSEWISE_MODELS")]
    models_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(models = %args.models_dir.display(), "loading inference pipelines");
    let inference = Inference {
        qa: Arc::new(ExtractiveQa::load(&args.models_dir.join("qa"))?),
        simplifier: Arc::new(Seq2SeqSimplifier::load(&args.models_dir.join("simplifier"))?),
        ner: Arc::new(EntityTagger::load(&args.models_dir.join("ner"))?),
        classifier: Arc::new(NliClassifier::load(&args.models_dir.join("classifier"))?),
    };

    let app = routes::router(AppState::new(inference));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!(%addr, version = env!("CARGO_PKG_VERSION"), "clausewise listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
