//! Message dispatcher setup.
//!
//! Builds the dispatcher with the channel-post relay handler and the
//! admin command handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::events;
use crate::pipeline::Pipeline;
use crate::plugins;
use crate::settings::SettingsStore;
use crate::stats::RelayStats;
use crate::translate::Translator;

/// Bot type with Throttle adaptor for automatic API rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
///
/// Owns every piece of mutable relay state; nothing lives in globals.
#[derive(Clone)]
pub struct AppState {
    /// Settings document store (in-memory mirror + JSON file).
    pub settings: Arc<SettingsStore>,

    /// The filter pipeline with its dedup cache, rate window and delay
    /// gate.
    pub pipeline: Arc<Pipeline>,

    /// Relay statistics.
    pub stats: Arc<RelayStats>,

    /// Best-effort translation client.
    pub translator: Arc<Translator>,

    /// Owner user IDs from the environment (bypass the settings admin
    /// list).
    pub owner_ids: Vec<u64>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(settings: Arc<SettingsStore>, owner_ids: Vec<u64>) -> Self {
        let dedup_capacity = settings.snapshot().dedup_capacity;

        Self {
            pipeline: Arc::new(Pipeline::new(dedup_capacity)),
            stats: Arc::new(RelayStats::new()),
            translator: Arc::new(Translator::new()),
            settings,
            owner_ids,
        }
    }

    /// Check if a user may run admin commands.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id) || self.settings.snapshot().is_admin_user(user_id)
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Channel posts feed the relay; regular messages carry admin commands.
    let channel_handler =
        Update::filter_channel_post().endpoint(events::relay::channel_post_handler);

    let message_handler = Update::filter_message().branch(plugins::command_handler());

    dptree::entry()
        .branch(channel_handler)
        .branch(message_handler)
}
