//! # Roster Bot Main Entry Point
//!
//! Initializes logging, loads configuration, opens the roster (merging any
//! pending import), starts the recurring poll scheduler and the keep-alive
//! server, and runs the Telegram dispatcher.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_bot::bot::handlers::BotHandler;
use roster_bot::bot::AppContext;
use roster_bot::config::Config;
use roster_bot::platform::{ChatPlatform, TelegramPlatform};
use roster_bot::roster::{import_on_startup, RosterStore};
use roster_bot::services::health::HealthService;
use roster_bot::services::scheduler::{PollScheduler, PresetRunner};
use roster_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let presets = config.presets()?;

    info!("Starting Roster Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Roster: {}, HTTP Port: {}, Page size: {}",
        config.roster_file.display(),
        config.http_port,
        config.mention_page_size
    );

    // Open roster
    let store = Arc::new(RosterStore::open(&config.roster_file));
    import_on_startup(&store, &config.import_file);
    let stats = store.stats();
    log_system_event(
        "roster ready",
        Some(&format!("{} chats, {} members", stats.chats, stats.members)),
    );

    let bot = Bot::new(&config.telegram_bot_token);
    let platform: Arc<dyn ChatPlatform> = Arc::new(TelegramPlatform::new(bot.clone()));

    // Recurring polls
    let runner = config.poll_chat_id.map(|chat_id| {
        Arc::new(PresetRunner::new(
            platform.clone(),
            store.clone(),
            chat_id,
            config.schedule_timezone,
            config.mention_page_size,
        ))
    });

    let mut scheduler = match &runner {
        Some(runner) if !presets.is_empty() => {
            match PollScheduler::new(runner.clone(), presets.clone()).await {
                Ok(mut scheduler) => {
                    if let Err(e) = scheduler.start().await {
                        tracing::error!("Failed to start poll scheduler: {}", e);
                    }
                    Some(scheduler)
                }
                Err(e) => {
                    tracing::error!("Failed to create poll scheduler: {}", e);
                    return Err(anyhow::anyhow!("Failed to create poll scheduler: {}", e));
                }
            }
        }
        _ => {
            log_system_event("poll scheduler disabled", Some("no POLL_CHAT_ID or presets"));
            None
        }
    };

    let ctx = Arc::new(AppContext {
        platform,
        store: store.clone(),
        page_size: config.mention_page_size,
        mention_all_admin_only: config.mention_all_admin_only,
        presets,
        runner,
    });
    let handler = BotHandler::new(ctx);

    // Keep-alive server
    let health_service = HealthService::new(store);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Keep-alive server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Keep-alive server error: {}", e);
        }
    });

    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Keep-alive task error: {}", e);
            }
        }
    }

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.stop().await {
            tracing::warn!("Error stopping poll scheduler: {}", e);
        }
    }

    info!("Application stopped");
    Ok(())
}
