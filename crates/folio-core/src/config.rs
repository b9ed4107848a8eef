#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field has a default matching the shipped page, so an empty JSON
//! object (or no config at all) yields the stock behavior. Millisecond
//! fields are stored as integers for JSON and read back as [`Duration`].

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a [`PageConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("recipient address {0:?} is not an email address")]
    Recipient(String),
    #[error("trail_length must be at least 1")]
    TrailLength,
    #[error("frame_interval_ms must be at least 1")]
    FrameInterval,
    #[error("toast_visible_ms ({visible}) must not be shorter than toast_enter_ms ({enter})")]
    ToastTimeline { enter: u64, visible: u64 },
}

/// Tunables for the page controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Recipient of the contact form `mailto:` hand-off.
    pub recipient: String,
    /// Notification text for an invalid submission.
    pub invalid_message: String,
    /// Notification text after the mail client hand-off.
    pub success_message: String,
    /// Button label while the send is pending.
    pub sending_label: String,
    /// Simulated send latency before the hand-off.
    pub send_delay_ms: u64,
    /// How long a failed field keeps its error marker.
    pub marker_revert_ms: u64,

    pub toast_enter_ms: u64,
    pub toast_visible_ms: u64,
    pub toast_exit_ms: u64,

    /// A section becomes current once `scroll_y >= offset_top - active_offset`.
    pub active_offset: f64,
    /// A section is revealed once its viewport top is above
    /// `viewport_height - reveal_margin`.
    pub reveal_margin: f64,
    /// Delay between consecutive intersection reveals in one batch.
    pub reveal_stagger_ms: u64,

    pub navbar_scrolled_threshold: f64,
    pub navbar_hide_threshold: f64,
    pub parallax_rate: f64,

    pub smooth_scroll_ms: u64,
    /// Space left above a smooth-scroll target for the fixed navbar.
    pub smooth_scroll_offset: f64,
    /// Animation frame cadence.
    pub frame_interval_ms: u64,

    pub hero_title_html: String,
    pub typing_start_ms: u64,
    pub typing_speed_ms: u64,

    pub trail_length: usize,
    pub trail_lifetime_ms: u64,

    pub overlay_fade_delay_ms: u64,
    pub overlay_remove_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            recipient: "aesam9997@gmail.com".to_owned(),
            invalid_message: "Please fill in all fields correctly!".to_owned(),
            success_message: "Thank you! Your email client should open shortly.".to_owned(),
            sending_label: r#"<i class="fas fa-spinner fa-spin"></i> Sending..."#.to_owned(),
            send_delay_ms: 1500,
            marker_revert_ms: 500,
            toast_enter_ms: 100,
            toast_visible_ms: 4000,
            toast_exit_ms: 300,
            active_offset: 200.0,
            reveal_margin: 200.0,
            reveal_stagger_ms: 100,
            navbar_scrolled_threshold: 100.0,
            navbar_hide_threshold: 200.0,
            parallax_rate: -0.3,
            smooth_scroll_ms: 1000,
            smooth_scroll_offset: 80.0,
            frame_interval_ms: 16,
            hero_title_html: r#"Hi, I'm <span class="highlight">Ali Esam Ali Abdelazim</span>"#
                .to_owned(),
            typing_start_ms: 800,
            typing_speed_ms: 80,
            trail_length: 10,
            trail_lifetime_ms: 500,
            overlay_fade_delay_ms: 1200,
            overlay_remove_ms: 500,
        }
    }
}

impl PageConfig {
    /// Parse a JSON object, filling absent fields with defaults, then validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let recipient = self.recipient.trim();
        if recipient.is_empty() || !recipient.contains('@') {
            return Err(ConfigError::Recipient(self.recipient.clone()));
        }
        if self.trail_length == 0 {
            return Err(ConfigError::TrailLength);
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::FrameInterval);
        }
        if self.toast_visible_ms < self.toast_enter_ms {
            return Err(ConfigError::ToastTimeline {
                enter: self.toast_enter_ms,
                visible: self.toast_visible_ms,
            });
        }
        Ok(())
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    pub fn marker_revert(&self) -> Duration {
        Duration::from_millis(self.marker_revert_ms)
    }

    pub fn toast_enter(&self) -> Duration {
        Duration::from_millis(self.toast_enter_ms)
    }

    pub fn toast_visible(&self) -> Duration {
        Duration::from_millis(self.toast_visible_ms)
    }

    pub fn toast_exit(&self) -> Duration {
        Duration::from_millis(self.toast_exit_ms)
    }

    /// Total time a notification spends in the document.
    pub fn toast_lifetime(&self) -> Duration {
        self.toast_visible() + self.toast_exit()
    }

    pub fn reveal_stagger(&self) -> Duration {
        Duration::from_millis(self.reveal_stagger_ms)
    }

    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn typing_start(&self) -> Duration {
        Duration::from_millis(self.typing_start_ms)
    }

    pub fn typing_speed(&self) -> Duration {
        Duration::from_millis(self.typing_speed_ms)
    }

    pub fn trail_lifetime(&self) -> Duration {
        Duration::from_millis(self.trail_lifetime_ms)
    }

    pub fn overlay_fade_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_fade_delay_ms)
    }

    pub fn overlay_remove(&self) -> Duration {
        Duration::from_millis(self.overlay_remove_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PageConfig::from_json(r#"{"send_delay_ms": 10, "trail_length": 3}"#).unwrap();
        assert_eq!(config.send_delay(), Duration::from_millis(10));
        assert_eq!(config.trail_length, 3);
        assert_eq!(config.recipient, "aesam9997@gmail.com");
    }

    #[test]
    fn default_toast_lifetime_is_4300ms() {
        assert_eq!(
            PageConfig::default().toast_lifetime(),
            Duration::from_millis(4300)
        );
    }

    #[test]
    fn malformed_json_is_error() {
        let err = PageConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn unknown_field_is_error() {
        let err = PageConfig::from_json(r#"{"recipent": "x@y.z"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn recipient_without_at_is_rejected() {
        let err = PageConfig::from_json(r#"{"recipient": "nobody"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Recipient(ref r) if r == "nobody"));
    }

    #[test]
    fn toast_leaving_before_entering_is_rejected() {
        let err = PageConfig::from_json(r#"{"toast_enter_ms": 500, "toast_visible_ms": 200}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ToastTimeline {
                enter: 500,
                visible: 200
            }
        ));
        assert!(PageConfig::from_json(r#"{"toast_enter_ms": 200, "toast_visible_ms": 200}"#).is_ok());
    }

    #[test]
    fn zero_trail_length_is_rejected() {
        let err = PageConfig::from_json(r#"{"trail_length": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::TrailLength));
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        let err = PageConfig::from_json(r#"{"frame_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::FrameInterval));
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(
            ConfigError::TrailLength.to_string(),
            "trail_length must be at least 1"
        );
    }
}
