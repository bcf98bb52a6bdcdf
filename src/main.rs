use std::sync::Arc;

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use config::Config;
use services::stats_service::{self, StatsSource};

/// Read-only state shared by the message handler and the daily timer
pub struct BotState {
    pub config: Config,
    pub source: Arc<dyn StatsSource>,
}

struct Handler {
    state: Arc<BotState>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg, &self.state).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!("Could not listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("thm_stats_bot=debug,serenity=warn")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Parsing config");
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Couldn't load config: {}", e);
            return;
        }
    };
    info!(
        "Tracking {} users ({:?}), daily stats to channel {}",
        config.users.len(),
        config.metric,
        config.channel_id
    );

    let token = config.token.clone();
    let source = stats_service::source_from_config(&config);
    let state = Arc::new(BotState { config, source });

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    info!("Bot loading...");
    let mut client = match Client::builder(&token, intents)
        .event_handler(Handler { state: state.clone() })
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    tokio::spawn(services::schedule_service::run_daily(client.http.clone(), state.clone()));

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        info!("Shutdown signal received, closing Discord connection");
        shard_manager.shutdown_all().await;
    });

    info!("Bot is now running. Press CTRL-C to exit.");
    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
