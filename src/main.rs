//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use interview_coach::adapters::llm::{AgentChatAdapter, MockLlmAdapter};
use interview_coach::adapters::persistence::HistoryJson;
use interview_coach::adapters::ui::tui::TuiInputPort;
use interview_coach::ports::{HistoryPort, InputPort, LlmPort};
use interview_coach::shared::config::AppConfig;
use interview_coach::usecases::CoachService;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    interview_coach::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        AppConfig::default()
    });
    let user_id = cfg.user_id_or_default();

    // --- LLM backend ---
    let llm: Arc<dyn LlmPort> = match cfg.api_url() {
        Some(url) => {
            info!(url, timeout = ?cfg.request_timeout_or_default(), "using agent-chat backend");
            Arc::new(
                AgentChatAdapter::new(url, cfg.request_timeout_or_default())
                    .map_err(|e| anyhow::anyhow!("{}", e))?,
            )
        }
        None => {
            warn!("COACH_API_URL not set, using mock coach");
            Arc::new(MockLlmAdapter::new())
        }
    };

    // --- History ---
    let history_path = cfg.history_path();
    info!(path = %history_path.display(), "history file");
    let history_impl = HistoryJson::new(&history_path);
    history_impl
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let history: Arc<dyn HistoryPort> = Arc::new(history_impl);

    // --- Services ---
    let coach = Arc::new(match cfg.rng_seed {
        Some(seed) => {
            info!(seed, "fallback selection seeded");
            CoachService::with_rng(llm, history, StdRng::seed_from_u64(seed))
        }
        None => CoachService::new(llm, history),
    });

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        coach,
        user_id,
        cfg.history_limit_or_default(),
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
