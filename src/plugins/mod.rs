//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()`

pub mod admin;
pub mod start;
pub mod status;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::dispatcher::AppState;

/// All bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,

    #[command(description = "Show help")]
    Help,

    #[command(description = "Show relay status and statistics")]
    Status,

    #[command(description = "Enable forwarding")]
    Enable,

    #[command(description = "Disable forwarding")]
    Disable,

    #[command(description = "Set relay mode: forward or copy")]
    Mode(String),

    #[command(description = "Set the source channel")]
    Setsource(String),

    #[command(description = "Set the target channel")]
    Settarget(String),

    #[command(description = "Add an admin user id")]
    Addadmin(String),

    #[command(description = "Add a blacklist word")]
    Blacklistadd(String),

    #[command(description = "Remove a blacklist word")]
    Blacklistdel(String),

    #[command(description = "Clear the duplicate-message memory")]
    Clearmemory,
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start::start_command))
        .branch(case![Command::Help].endpoint(start::help_command))
        .branch(case![Command::Status].endpoint(status::status_command))
        .branch(case![Command::Enable].endpoint(admin::enable_command))
        .branch(case![Command::Disable].endpoint(admin::disable_command))
        .branch(case![Command::Mode(args)].endpoint(admin::mode_command))
        .branch(case![Command::Setsource(args)].endpoint(admin::setsource_command))
        .branch(case![Command::Settarget(args)].endpoint(admin::settarget_command))
        .branch(case![Command::Addadmin(args)].endpoint(admin::addadmin_command))
        .branch(case![Command::Blacklistadd(args)].endpoint(admin::blacklistadd_command))
        .branch(case![Command::Blacklistdel(args)].endpoint(admin::blacklistdel_command))
        .branch(case![Command::Clearmemory].endpoint(admin::clearmemory_command))
}

/// Whether the sender of `msg` may run admin commands.
pub fn is_authorized(msg: &Message, state: &AppState) -> bool {
    msg.from
        .as_ref()
        .is_some_and(|user| state.is_admin(user.id.0))
}
