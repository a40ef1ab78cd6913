use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::constants::STATUS_DISMISS_AFTER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    #[serde(rename = "type")]
    pub kind: StatusKind,
    pub text: String,
}

/// Transient banner; a message disappears once its display window has passed.
#[derive(Debug, Clone)]
pub struct StatusBanner {
    current: Option<(StatusMessage, Instant)>,
    dismiss_after: Duration,
}

impl Default for StatusBanner {
    fn default() -> Self {
        StatusBanner::new(STATUS_DISMISS_AFTER)
    }
}

impl StatusBanner {
    pub fn new(dismiss_after: Duration) -> Self {
        StatusBanner {
            current: None,
            dismiss_after,
        }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(StatusKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(StatusKind::Error, text.into());
    }

    fn show(&mut self, kind: StatusKind, text: String) {
        self.current = Some((StatusMessage { kind, text }, Instant::now() + self.dismiss_after));
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        match &self.current {
            Some((message, expires_at)) if Instant::now() < *expires_at => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn message_expires_after_delay() {
        let mut banner = StatusBanner::default();
        banner.error("Failed to load events");

        assert_eq!(banner.current().map(|m| m.kind), Some(StatusKind::Error));

        tokio::time::advance(Duration::from_millis(4_900)).await;
        assert!(banner.current().is_some());

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(banner.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_restarts_window() {
        let mut banner = StatusBanner::new(Duration::from_secs(1));
        banner.error("first");
        tokio::time::advance(Duration::from_millis(800)).await;
        banner.success("second");
        tokio::time::advance(Duration::from_millis(800)).await;

        assert_eq!(banner.current().map(|m| m.text.as_str()), Some("second"));
    }
}
