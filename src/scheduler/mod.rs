//! Autoposting scheduler.
//!
//! Independent background loop that periodically sends the configured
//! scheduled posts to the target channel. It shares nothing with the
//! relay pipeline beyond the settings store and the outbound send
//! primitive.

use std::time::Duration;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::parse_channel;

/// How often the scheduler re-checks the post list.
const TICK: Duration = Duration::from_secs(30);

/// Spawn the scheduler loop.
pub fn spawn(bot: ThrottledBot, state: AppState) -> JoinHandle<()> {
    tokio::spawn(run_loop(bot, state))
}

async fn run_loop(bot: ThrottledBot, state: AppState) {
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!("Autopost scheduler started");

    loop {
        ticker.tick().await;

        let settings = state.settings.snapshot();
        if !settings.autopost_enabled || settings.scheduled_posts.is_empty() {
            continue;
        }

        let Some(target) = parse_channel(&settings.target_channel) else {
            continue;
        };

        let now = Utc::now();
        for (index, post) in settings.scheduled_posts.iter().enumerate() {
            if !post.is_due(now) {
                continue;
            }

            match bot
                .send_message(target.clone(), post.text.clone())
                .parse_mode(ParseMode::Html)
                .await
            {
                Ok(_) => {
                    info!("Sent scheduled post #{index}");
                    let persisted = state.settings.update(|s| {
                        if let Some(p) = s.scheduled_posts.get_mut(index) {
                            p.last_sent = Some(now);
                        }
                    });
                    if let Err(e) = persisted {
                        warn!("Failed to persist scheduled post state: {e}");
                    }
                }
                Err(e) => {
                    warn!("Failed to send scheduled post #{index}: {e}");
                }
            }
        }
    }
}
