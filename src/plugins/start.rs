//! Start and help command plugins.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;

use crate::bot::dispatcher::{AppState, ThrottledBot};

use super::Command;

/// Handle the /start command.
pub async fn start_command(
    bot: ThrottledBot,
    msg: Message,
    _state: AppState,
) -> anyhow::Result<()> {
    let text = "<b>Hermes channel relay</b>\n\n\
                I relay posts from a source channel to a target channel, \
                running each post through the configured content filters.\n\n\
                Use /help to list the available commands and /status to see \
                the current relay state.";

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle the /help command.
pub async fn help_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}
