use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use interview_coach::{create_router, AppState, Clip, Config, HttpCapabilityClient, SubmissionOrchestrator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "interview-coach", version, about = "Feedback on recorded interview answers")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config/interview-coach")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Analyze one local clip and print the outcome as JSON
    Analyze {
        path: PathBuf,
        /// Media type of the clip; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let client = HttpCapabilityClient::new(cfg.service.connect_timeout())
        .context("Failed to create HTTP client")?;
    let orchestrator = SubmissionOrchestrator::from_config(Arc::new(client), &cfg);

    match cli.command {
        Command::Serve => serve(&cfg, orchestrator).await,
        Command::Analyze { path, mime } => analyze(&orchestrator, &path, mime).await,
    }
}

async fn serve(cfg: &Config, orchestrator: SubmissionOrchestrator) -> Result<()> {
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Worst-case submission latency: {:?}", orchestrator.max_latency());

    let state = AppState::new(orchestrator, cfg.service.http.max_upload_bytes);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

async fn analyze(orchestrator: &SubmissionOrchestrator, path: &Path, mime: Option<String>) -> Result<()> {
    let mime = match mime.or_else(|| guess_mime(path).map(str::to_string)) {
        Some(mime) => mime,
        None => bail!("Cannot infer media type of {}; pass --mime", path.display()),
    };

    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    info!("Analyzing {} ({} bytes, {})", path.display(), data.len(), mime);

    let outcome = orchestrator.submit(Clip::new(data, &mime)).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "webm" => "video/webm",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "aiff" | "aif" => "audio/aiff",
        _ => return None,
    };
    Some(mime)
}
