use std::sync::Arc;

use chrono::{DateTime, Local};
use serenity::http::Http;
use serenity::model::id::ChannelId;
use tracing::{error, info};

use crate::services::{render_service, stats_service};
use crate::utils::{format_wait, next_fire_time};
use crate::BotState;

/// Post the daily summary at `config.daily_time` every day, forever
pub async fn run_daily(http: Arc<Http>, state: Arc<BotState>) {
    info!("Starting timer for daily stats at {}", state.config.daily_time.format("%H:%M"));

    let mut last_fired: Option<DateTime<Local>> = None;
    loop {
        let now = Local::now();
        let next = next_fire_time(&now, last_fired.as_ref(), state.config.daily_time);
        let wait = (next - now).to_std().unwrap_or_default();
        info!("Next daily stats in {} ({})", format_wait(wait), next.format("%Y-%m-%d %H:%M %Z"));

        // sleep runs on the monotonic clock and may wake before the wall clock reaches `next`
        tokio::time::sleep(wait).await;
        last_fired = Some(next);

        if let Err(e) = post_daily_stats(&http, state.config.channel_id, &state).await {
            error!("Failed to post daily stats: {}", e);
        }
    }
}

pub async fn post_daily_stats(http: &Http, channel_id: ChannelId, state: &BotState) -> Result<(), String> {
    info!("Starting daily stats");
    let summary = stats_service::daily_summary(state.source.as_ref(), &state.config.users).await;

    channel_id
        .send_message(http, render_service::create_summary_message(&summary))
        .await
        .map_err(|e| e.to_string())?;

    info!("Posted daily stats for {} users to {}", summary.fields.len(), channel_id);
    Ok(())
}
