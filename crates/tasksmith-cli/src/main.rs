//! tasksmith: HTTP service that turns a goal into a Gemini-generated task
//! plan.

mod config;
mod serve;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use tasksmith_core::model::TextModel;
use tasksmith_core::plan::RetryPolicy;
use tasksmith_gemini::GeminiClient;

use config::ResolvedConfig;
use serve::AppState;

#[derive(Parser)]
#[command(name = "tasksmith", about = "Goal-to-task-plan HTTP service backed by Gemini")]
struct Cli {
    /// Address to bind (use 0.0.0.0 to expose beyond localhost)
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on (overrides the PORT env var and config file)
    #[arg(long)]
    port: Option<u16>,

    /// Gemini model name (overrides the config file)
    #[arg(long)]
    model: Option<String>,

    /// Directory holding the static frontend assets
    #[arg(long, default_value = "frontend")]
    frontend_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let resolved = ResolvedConfig::resolve(cli.port, cli.model.as_deref())?;

    // A missing key is not fatal: the server runs and reports the missing
    // configuration per request instead.
    let model: Option<Arc<dyn TextModel>> = match &resolved.api_key {
        Some(key) => {
            tracing::info!(model = %resolved.model, "Gemini client configured");
            Some(Arc::new(GeminiClient::new(key.clone(), resolved.model.clone())))
        }
        None => {
            tracing::warn!(
                "no API key found (GOOGLE_API_KEY / GEMINI_API_KEY / config file); \
                 /api/generate-plan will fail until one is configured"
            );
            None
        }
    };

    let state = Arc::new(AppState {
        model,
        retry: RetryPolicy::default(),
        frontend_dir: cli.frontend_dir,
    });

    serve::run_serve(state, &cli.bind, resolved.port).await
}
