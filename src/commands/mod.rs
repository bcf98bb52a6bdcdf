pub mod stats;

use std::time::Instant;

use serenity::model::channel::Message;
use serenity::model::id::UserId;
use serenity::prelude::Context;
use tracing::{debug, error};

use crate::BotState;

/// A recognised chat command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Stats { username: &'a str },
}

/// Parse `<prefix>stats <username>`. Anything else, including the wrong
/// number of arguments, is not a command.
pub fn parse_command<'a>(content: &'a str, prefix: &str) -> Option<Command<'a>> {
    if !content.starts_with(prefix) {
        return None;
    }

    let mut parts = content.split_whitespace();
    let name = parts.next()?.strip_prefix(prefix)?;
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("stats", [username]) => Some(Command::Stats { username: *username }),
        _ => None,
    }
}

/// Only human authors other than the bot itself can run commands
pub fn should_handle(author_is_bot: bool, author_id: UserId, self_id: UserId) -> bool {
    !author_is_bot && author_id != self_id
}

pub async fn handle_message(ctx: &Context, msg: &Message, state: &BotState) {
    let self_id = ctx.cache.current_user().id;
    if !should_handle(msg.author.bot, msg.author.id, self_id) {
        return;
    }

    let Some(command) = parse_command(&msg.content, &state.config.prefix) else {
        return;
    };

    let start_time = Instant::now();
    let result = match command {
        Command::Stats { username } => stats::execute(ctx, msg, state, username).await,
    };

    // Errors only go to the log, never back to the channel
    if let Err(e) = result {
        error!("Error executing command {:?}: {}", command, e);
    }

    debug!("Time to process: {:?}", start_time.elapsed());
}
