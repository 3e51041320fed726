//! Best-effort translation client.
//!
//! Talks to the public Google translate endpoint. Strictly best-effort:
//! any failure (network, timeout, unexpected payload) returns the
//! original text, and the request carries an explicit timeout so a stuck
//! call cannot stall the dispatch loop.

use anyhow::{Context, anyhow};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Translator {
    http: reqwest::Client,
}

impl Translator {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self { http }
    }

    /// Translate `text` from `source` ("auto" for detection) to `target`.
    /// Returns the original text on any failure.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        if text.is_empty() {
            return text.to_string();
        }

        match self.request(text, source, target).await {
            Ok(translated) if !translated.is_empty() => {
                debug!("Translated {} chars to {}", text.chars().count(), target);
                translated
            }
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!("Translation failed, keeping original text: {e}");
                text.to_string()
            }
        }
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("translate request failed")?
            .error_for_status()
            .context("translate endpoint returned an error status")?;

        let payload: Value = response.json().await.context("invalid translate payload")?;

        // The payload is a nested array; the first element lists segment
        // pairs of [translated, original, ...].
        let segments = payload
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("unexpected translate payload shape"))?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(part) = segment.get(0).and_then(Value::as_str) {
                translated.push_str(part);
            }
        }

        Ok(translated)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}
