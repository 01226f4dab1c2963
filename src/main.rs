use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use rostra::application::services::{
    AnalysisWorker, CoachingService, FeatureExtractor, ScoringConfig, ScoringEngine,
};
use rostra::config::Settings;
use rostra::domain::DrillLibrary;
use rostra::infrastructure::audio::{PcmAcousticAnalyzer, WhisperApiEngine};
use rostra::infrastructure::llm::OpenAiClient;
use rostra::infrastructure::observability::{init_tracing, TracingConfig};
use rostra::infrastructure::persistence::PgSessionRepository;
use rostra::infrastructure::queue::RedisJobQueue;
use rostra::infrastructure::storage::AudioStoreFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().map_err(anyhow::Error::msg)?;
    init_tracing(TracingConfig::default());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database.url)
        .await?;
    let sessions = Arc::new(PgSessionRepository::new(pool));

    let queue = Arc::new(
        RedisJobQueue::connect(&settings.queue.redis_url, settings.queue.queue_name.clone())
            .await?,
    );

    let audio_store = AudioStoreFactory::create(&settings.storage)?;

    let transcription = Arc::new(WhisperApiEngine::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        Some(settings.transcription.model.clone()),
    ));

    let coaching = match &settings.coaching.openai_api_key {
        Some(api_key) => {
            let library = Arc::new(DrillLibrary::load(Path::new(
                &settings.coaching.drill_library_path,
            ))?);
            tracing::info!(
                version = library.version(),
                drills = library.len(),
                "Drill library loaded"
            );
            let llm = Arc::new(OpenAiClient::new(
                api_key.clone(),
                None,
                settings.coaching.openai_model.clone(),
            ));
            Some(Arc::new(CoachingService::new(llm, library)))
        }
        None => {
            tracing::warn!("No OpenAI API key configured; coaching disabled");
            None
        }
    };

    let feature_extractor = FeatureExtractor::new(Some(Arc::new(PcmAcousticAnalyzer)));
    let scoring_engine = ScoringEngine::new(ScoringConfig::default());

    let running = Arc::new(AtomicBool::new(true));
    tokio::spawn({
        let running = Arc::clone(&running);
        async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received; finishing current job");
            running.store(false, Ordering::SeqCst);
        }
    });

    let worker = AnalysisWorker::new(
        queue,
        sessions,
        audio_store,
        transcription,
        feature_extractor,
        scoring_engine,
        coaching,
        Duration::from_secs_f64(settings.queue.poll_interval_sec),
        running,
    );

    worker.run().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
