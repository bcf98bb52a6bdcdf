use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::{render_service, stats_service};
use crate::BotState;

pub async fn execute(ctx: &Context, msg: &Message, state: &BotState, username: &str) -> Result<(), String> {
    let summary = stats_service::user_summary(state.source.as_ref(), username).await;

    msg.channel_id
        .send_message(ctx, render_service::create_summary_message(&summary))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
