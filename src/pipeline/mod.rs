//! Message-forwarding decision pipeline.
//!
//! An ordered chain of predicates evaluated against each inbound channel
//! post, short-circuiting at the first rejection. The order is a cost
//! ordering: cheap flag checks run first so the expensive checks
//! (duplicate hashing, language detection) are skipped for messages a
//! cheaper predicate already rejected.
//!
//! Only three stages carry state: the rate limiter and duplicate cache
//! record admissions, and the delay gate stalls (never rejects). All
//! other predicates are pure functions of the message view and the
//! settings snapshot.

pub mod dedup;
pub mod delay;
pub mod filters;
pub mod rate_limit;
pub mod view;

use std::fmt;
use std::time::Duration;

use chrono::Timelike;

pub use dedup::DedupCache;
pub use delay::DelayGate;
pub use rate_limit::RateLimiter;
pub use view::{ContentHash, MediaKind, MessageView};

use crate::settings::Settings;

/// Outcome of the pipeline for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    Reject(RejectReason),
}

impl Verdict {
    #[allow(dead_code)]
    pub fn is_admit(&self) -> bool {
        matches!(self, Verdict::Admit)
    }
}

/// The stage that rejected a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ForwardingDisabled,
    OutsideWorkingHours,
    RateLimited,
    OverCharLimit,
    MediaKindBlocked,
    Blacklisted,
    NotWhitelisted,
    ForwardedOrigin,
    Duplicate,
    LanguageBlocked,
    ContainsLinks,
    HasInlineKeyboard,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ForwardingDisabled => "forwarding disabled",
            Self::OutsideWorkingHours => "outside working hours",
            Self::RateLimited => "rate limit reached",
            Self::OverCharLimit => "over character limit",
            Self::MediaKindBlocked => "media kind blocked",
            Self::Blacklisted => "contains blacklisted word",
            Self::NotWhitelisted => "contains no whitelisted word",
            Self::ForwardedOrigin => "forwarded from another source",
            Self::Duplicate => "duplicate content",
            Self::LanguageBlocked => "blocked by language filter",
            Self::ContainsLinks => "contains links",
            Self::HasInlineKeyboard => "carries inline buttons",
        };
        f.write_str(text)
    }
}

/// The filter pipeline and its stateful helpers, constructed once at
/// startup and shared by handle.
pub struct Pipeline {
    dedup: DedupCache,
    rate: RateLimiter,
    delay: DelayGate,
}

impl Pipeline {
    pub fn new(dedup_capacity: u64) -> Self {
        Self {
            dedup: DedupCache::new(dedup_capacity),
            rate: RateLimiter::new(),
            delay: DelayGate::new(),
        }
    }

    /// The duplicate cache, for the admin full-clear and status report.
    pub fn dedup(&self) -> &DedupCache {
        &self.dedup
    }

    /// Decide whether `view` is relayed, under the given settings
    /// snapshot. May suspend on the delay gate; never errors.
    pub async fn evaluate(&self, view: &MessageView, settings: &Settings) -> Verdict {
        let hour = chrono::Local::now().hour();
        self.evaluate_at(view, settings, hour).await
    }

    async fn evaluate_at(&self, view: &MessageView, settings: &Settings, hour: u32) -> Verdict {
        use RejectReason::*;

        // 1. Global switch.
        if !settings.forwarding_enabled {
            return Verdict::Reject(ForwardingDisabled);
        }

        // 2. Working hours.
        if !filters::within_working_hours(settings, hour) {
            return Verdict::Reject(OutsideWorkingHours);
        }

        // 3. Rate limit; admission is recorded here even when a later
        // stage rejects the message.
        if !self
            .rate
            .check(settings.rate_limit_enabled, settings.messages_per_minute)
        {
            return Verdict::Reject(RateLimited);
        }

        // 4. Character limit.
        if filters::exceeds_char_limit(settings, view.text.as_deref()) {
            return Verdict::Reject(OverCharLimit);
        }

        // 5. Delay gate: stalls, never rejects.
        self.delay
            .enforce(
                settings.delay_enabled,
                Duration::from_secs(settings.delay_seconds),
            )
            .await;

        // 6. Media-kind allow map.
        if !settings.is_media_kind_allowed(view.kind) {
            return Verdict::Reject(MediaKindBlocked);
        }

        let text = view.text.as_deref();

        // 7. Blacklist.
        if settings.blacklist_enabled
            && let Some(t) = text
            && filters::contains_any(t, &settings.blacklist)
        {
            return Verdict::Reject(Blacklisted);
        }

        // 8. Whitelist.
        if settings.whitelist_enabled && !filters::whitelist_permits(text, &settings.whitelist) {
            return Verdict::Reject(NotWhitelisted);
        }

        // 9. Forwarded origin.
        if settings.forwarded_filter_enabled && view.is_forwarded {
            return Verdict::Reject(ForwardedOrigin);
        }

        // 10. Duplicate content.
        if settings.duplicate_filter_enabled
            && let Some(hash) = view.content_hash()
            && !self.dedup.check_and_record(hash)
        {
            return Verdict::Reject(Duplicate);
        }

        // 11. Language.
        if !filters::language_permits(settings, text) {
            return Verdict::Reject(LanguageBlocked);
        }

        // 12. Link presence.
        if settings.link_filter_enabled
            && let Some(t) = text
            && crate::transform::links::contains_links(t)
        {
            return Verdict::Reject(ContainsLinks);
        }

        // 13. Inline buttons.
        if settings.inline_button_filter_enabled && view.has_inline_keyboard {
            return Verdict::Reject(HasInlineKeyboard);
        }

        Verdict::Admit
    }
}

#[cfg(test)]
mod tests {
    use super::view::text_view;
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(1000)
    }

    /// Settings with every optional filter off, so single filters can be
    /// switched on per test.
    fn open_settings() -> Settings {
        Settings {
            blacklist_enabled: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn disabled_forwarding_rejects_everything() {
        let settings = Settings {
            forwarding_enabled: false,
            ..open_settings()
        };
        let verdict = pipeline()
            .evaluate(&text_view("anything at all"), &settings)
            .await;
        assert_eq!(verdict, Verdict::Reject(RejectReason::ForwardingDisabled));
    }

    #[tokio::test]
    async fn default_settings_admit_plain_text() {
        let verdict = pipeline()
            .evaluate(&text_view("hello there"), &Settings::default())
            .await;
        assert_eq!(verdict, Verdict::Admit);
    }

    #[tokio::test]
    async fn blacklisted_word_rejects() {
        let settings = Settings {
            blacklist_enabled: true,
            blacklist: vec!["spam".to_string()],
            ..open_settings()
        };
        let verdict = pipeline()
            .evaluate(&text_view("this is spam content"), &settings)
            .await;
        assert_eq!(verdict, Verdict::Reject(RejectReason::Blacklisted));
    }

    #[tokio::test]
    async fn whitelist_rejects_unlisted_text() {
        let settings = Settings {
            whitelist_enabled: true,
            whitelist: vec!["news".to_string()],
            ..open_settings()
        };
        let p = pipeline();
        assert!(p.evaluate(&text_view("daily news digest"), &settings).await.is_admit());
        assert_eq!(
            p.evaluate(&text_view("sports digest"), &settings).await,
            Verdict::Reject(RejectReason::NotWhitelisted)
        );
    }

    #[tokio::test]
    async fn duplicate_content_rejects_second_occurrence() {
        let settings = Settings {
            duplicate_filter_enabled: true,
            ..open_settings()
        };
        let p = pipeline();
        assert!(p.evaluate(&text_view("Hello"), &settings).await.is_admit());
        assert_eq!(
            p.evaluate(&text_view("Hello"), &settings).await,
            Verdict::Reject(RejectReason::Duplicate)
        );
    }

    #[tokio::test]
    async fn message_without_hashable_content_passes_duplicate_filter() {
        let settings = Settings {
            duplicate_filter_enabled: true,
            ..open_settings()
        };
        let view = MessageView {
            kind: MediaKind::Location,
            text: None,
            media_unique_id: None,
            poll_content: None,
            is_forwarded: false,
            has_inline_keyboard: false,
        };
        let p = pipeline();
        assert!(p.evaluate(&view, &settings).await.is_admit());
        assert!(p.evaluate(&view, &settings).await.is_admit());
    }

    #[tokio::test]
    async fn rate_limit_caps_admissions() {
        let settings = Settings {
            rate_limit_enabled: true,
            messages_per_minute: 2,
            ..open_settings()
        };
        let p = pipeline();
        assert!(p.evaluate(&text_view("one"), &settings).await.is_admit());
        assert!(p.evaluate(&text_view("two"), &settings).await.is_admit());
        assert_eq!(
            p.evaluate(&text_view("three"), &settings).await,
            Verdict::Reject(RejectReason::RateLimited)
        );
    }

    #[tokio::test]
    async fn rate_slot_is_consumed_before_later_rejections() {
        // The rate limiter records its admission at stage 3; a message a
        // later stage rejects still occupies a window slot.
        let settings = Settings {
            rate_limit_enabled: true,
            messages_per_minute: 1,
            blacklist_enabled: true,
            blacklist: vec!["spam".to_string()],
            ..open_settings()
        };
        let p = pipeline();
        assert_eq!(
            p.evaluate(&text_view("spam here"), &settings).await,
            Verdict::Reject(RejectReason::Blacklisted)
        );
        assert_eq!(
            p.evaluate(&text_view("clean text"), &settings).await,
            Verdict::Reject(RejectReason::RateLimited)
        );
    }

    #[tokio::test]
    async fn char_limit_boundary_is_inclusive() {
        let settings = Settings {
            char_limit_enabled: true,
            char_limit_count: 5,
            ..open_settings()
        };
        let p = pipeline();
        assert!(p.evaluate(&text_view("12345"), &settings).await.is_admit());
        assert_eq!(
            p.evaluate(&text_view("123456"), &settings).await,
            Verdict::Reject(RejectReason::OverCharLimit)
        );
    }

    #[tokio::test]
    async fn blocked_media_kind_rejects() {
        let mut settings = open_settings();
        settings.media_filters.insert(MediaKind::Photo, false);

        let mut view = text_view("caption");
        view.kind = MediaKind::Photo;
        view.media_unique_id = Some("AQADBAAD".to_string());

        assert_eq!(
            pipeline().evaluate(&view, &settings).await,
            Verdict::Reject(RejectReason::MediaKindBlocked)
        );
    }

    #[tokio::test]
    async fn forwarded_origin_rejects_when_enabled() {
        let settings = Settings {
            forwarded_filter_enabled: true,
            ..open_settings()
        };
        let mut view = text_view("forwarded text");
        view.is_forwarded = true;
        assert_eq!(
            pipeline().evaluate(&view, &settings).await,
            Verdict::Reject(RejectReason::ForwardedOrigin)
        );
    }

    #[tokio::test]
    async fn link_filter_rejects_urls() {
        let settings = Settings {
            link_filter_enabled: true,
            ..open_settings()
        };
        assert_eq!(
            pipeline()
                .evaluate(&text_view("see https://example.com"), &settings)
                .await,
            Verdict::Reject(RejectReason::ContainsLinks)
        );
    }

    #[tokio::test]
    async fn inline_keyboard_rejects_when_enabled() {
        let settings = Settings {
            inline_button_filter_enabled: true,
            ..open_settings()
        };
        let mut view = text_view("buy now");
        view.has_inline_keyboard = true;
        assert_eq!(
            pipeline().evaluate(&view, &settings).await,
            Verdict::Reject(RejectReason::HasInlineKeyboard)
        );
    }

    #[tokio::test]
    async fn working_hours_reject_outside_window() {
        let settings = Settings {
            working_hours_enabled: true,
            working_hours_start: 22,
            working_hours_end: 6,
            ..open_settings()
        };
        let p = pipeline();
        let view = text_view("overnight post");
        assert!(p.evaluate_at(&view, &settings, 23).await.is_admit());
        assert!(p.evaluate_at(&view, &settings, 2).await.is_admit());
        assert_eq!(
            p.evaluate_at(&view, &settings, 10).await,
            Verdict::Reject(RejectReason::OutsideWorkingHours)
        );
    }

    #[tokio::test]
    async fn rejection_before_dedup_does_not_record_hash() {
        // A message rejected by the character limit never reaches the
        // duplicate stage, so the same content is admitted later.
        let strict = Settings {
            char_limit_enabled: true,
            char_limit_count: 3,
            duplicate_filter_enabled: true,
            ..open_settings()
        };
        let relaxed = Settings {
            duplicate_filter_enabled: true,
            ..open_settings()
        };
        let p = pipeline();
        assert_eq!(
            p.evaluate(&text_view("too long"), &strict).await,
            Verdict::Reject(RejectReason::OverCharLimit)
        );
        assert!(p.evaluate(&text_view("too long"), &relaxed).await.is_admit());
    }
}
