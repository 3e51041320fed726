//! Hermes - Telegram channel relay bot
//!
//! Relays posts from a source channel to a target channel through a
//! configurable filter pipeline.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `settings` - Runtime settings document (JSON file + in-memory mirror)
//! - `pipeline` - Filter pipeline: dedup cache, rate limiter, delay gate
//! - `transform` - Copy-mode content transforms
//! - `language` / `translate` - Detection and best-effort translation
//! - `bot` - Core bot functionality (with Throttle for API rate limiting)
//! - `events` - Channel-post relay handler
//! - `scheduler` - Autoposting background loop
//! - `plugins` - Admin command handlers (extensible)
//! - `stats` / `utils` - Counters and helpers

mod bot;
mod config;
mod events;
mod language;
mod pipeline;
mod plugins;
mod scheduler;
mod settings;
mod stats;
mod transform;
mod translate;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::dispatcher::AppState;
use config::Config;
use settings::SettingsStore;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // Initialize logging with sensible defaults
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hermes=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Hermes relay bot...");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    // Load the settings document
    let store = Arc::new(SettingsStore::load(config.settings_path.as_str()));
    {
        let s = store.snapshot();
        info!(
            "Settings loaded (source: {:?}, target: {:?}, forwarding: {})",
            s.source_channel, s.target_channel, s.forwarding_enabled
        );
    }

    // Initialize bot with Throttle for automatic rate limiting.
    // This respects Telegram's API limits independently of the relay's
    // own per-minute message cap.
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    // Get bot info
    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }

    // Build shared state and start the autoposting scheduler
    let state = AppState::new(store, config.owner_ids.clone());
    let _autopost = scheduler::spawn(bot.clone(), state.clone());

    // Build dispatcher
    let dispatcher = bot::build_dispatcher(bot.clone(), state);

    // Run the bot
    bot::run(&config, dispatcher, bot).await;

    Ok(())
}
