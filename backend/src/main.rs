use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

/// Rebuilds point logs from provider shot and bounce events.
#[derive(Debug, clap::Parser)]
struct Args {
    /// Session file, or folder of session files
    #[arg(long, env = "POINTLOG_INPUT")]
    input: std::path::PathBuf,

    /// Folder receiving one point log per session
    #[arg(long, env = "POINTLOG_OUTPUT", default_value = "pointlogs/")]
    output: std::path::PathBuf,

    /// JSON file overriding engine calibration constants
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[arg(long, value_enum, default_value_t = backend::storage::OutputFormat::Both)]
    format: backend::storage::OutputFormat,

    /// Only reconstruct these sessions
    #[arg(long)]
    session: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), backend::Error> {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("backend") || meta.target().contains("analysis")
        }));
    tracing::subscriber::set_global_default(registry).expect("tracing subscriber already set");

    let args = <Args as clap::Parser>::parse();

    tracing::info!("Starting...");

    let config = backend::load_config(args.config.as_deref()).await?;
    let mut sessions = backend::load_sessions(&args.input).await?;
    if !args.session.is_empty() {
        sessions.retain(|s| args.session.contains(&s.session_id));
    }
    tracing::info!("Loaded {} sessions", sessions.len());

    let storage = backend::storage::FileStorage::new(args.output, args.format);
    let summary = backend::tasks::run_all(config, sessions, Box::new(storage)).await;

    tracing::info!(
        "Completed: {} stored, {} failed",
        summary.stored.len(),
        summary.failed.len()
    );

    summary.check()
}
