//! services/notifier/src/bin/trivia_notifier.rs

use notifier_lib::{
    adapters::{ConsoleGateway, JsonFileSettings, OpenTdbAdapter},
    app::{
        commands::{self, Command, Flow},
        AppState, SetupOutcome, TriviaCoordinator,
    },
    config::{Config, GatewayKind},
    error::AppError,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trivia_core::cache::QuestionCache;
use trivia_core::ports::NotificationGateway;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting trivia notifier...");

    // --- 2. Initialize Service Adapters ---
    let source = Arc::new(OpenTdbAdapter::new(
        config.trivia_api_url.clone(),
        config.http_timeout,
    )?);
    let settings = Arc::new(JsonFileSettings::new(config.settings_path.clone()));
    info!("Settings stored at {}", settings.path().display());

    let console = Arc::new(ConsoleGateway::new(config.timings));
    let gateway: Arc<dyn NotificationGateway> = match config.gateway {
        GatewayKind::Console => console.clone() as Arc<dyn NotificationGateway>,
        GatewayKind::Desktop => desktop_gateway(&config)?,
    };

    // --- 3. Build the Coordinator ---
    let interval = TriviaCoordinator::load_interval(settings.as_ref()).await;
    info!("Polling every {} minutes.", interval.minutes());
    let app_state = AppState {
        source,
        gateway: gateway.clone(),
        settings,
        cache: QuestionCache::new(config.cache_capacity),
        timings: config.timings,
        dedup_capacity: config.dedup_capacity,
    };
    let coordinator = TriviaCoordinator::new(app_state, interval);

    // --- 4. Route Notification Responses ---
    let responses = gateway.responses().await?;
    let listener = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.listen(responses).await })
    };

    // --- 5. Request Permission & Start Polling ---
    if coordinator.setup().await == SetupOutcome::PermissionDenied {
        info!("Running without notifications until restart.");
    }

    // --- 6. Console Loop ---
    let answers = match config.gateway {
        GatewayKind::Console => Some(console.as_ref()),
        GatewayKind::Desktop => {
            info!("Answer questions from the desktop notification.");
            None
        }
    };
    let result = run_console(&coordinator, answers).await;

    coordinator.shutdown().await;
    listener.abort();
    info!("Trivia notifier stopped.");
    result
}

async fn run_console(
    coordinator: &TriviaCoordinator,
    answers: Option<&ConsoleGateway>,
) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            // stdin closed; keep polling until interrupted.
            tokio::signal::ctrl_c().await?;
            return Ok(());
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        match commands::execute(command, coordinator, answers).await {
            Ok(Flow::Quit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => warn!("{}", e),
        }
    }
}

#[cfg(all(feature = "desktop", unix, not(target_os = "macos")))]
fn desktop_gateway(config: &Config) -> Result<Arc<dyn NotificationGateway>, AppError> {
    Ok(Arc::new(notifier_lib::adapters::DesktopGateway::new(
        config.timings,
    )))
}

#[cfg(not(all(feature = "desktop", unix, not(target_os = "macos"))))]
fn desktop_gateway(_config: &Config) -> Result<Arc<dyn NotificationGateway>, AppError> {
    Err(AppError::Internal(
        "desktop notifications need the `desktop` feature on a freedesktop platform".to_string(),
    ))
}
