//! The application-facing rich presence description.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::types::PartyPrivacy;

/// Byte limit for status, image text, party and secret fields.
pub const MAX_TEXT_BYTES: usize = 128;

/// Byte limit for image asset keys.
pub const MAX_IMAGE_KEY_BYTES: usize = 32;

/// What to show on the user's profile.
///
/// Every string field is optional; `None` and `Some("")` both mean "omitted".
/// Timestamps are Unix epoch seconds with `0` meaning unset, and a party is
/// shown only when `party_size` and `party_max` are non-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Presence {
    /// What the player is currently doing (max 128 bytes).
    pub state: Option<String>,
    /// Further detail about the activity (max 128 bytes).
    pub details: Option<String>,
    /// Activity start, epoch seconds. Renders as "elapsed".
    pub start_timestamp: i64,
    /// Activity end, epoch seconds. Renders as "remaining".
    pub end_timestamp: i64,
    /// Large image asset key (max 32 bytes).
    pub large_image_key: Option<String>,
    /// Large image tooltip (max 128 bytes).
    pub large_image_text: Option<String>,
    /// Small image asset key (max 32 bytes).
    pub small_image_key: Option<String>,
    /// Small image tooltip (max 128 bytes).
    pub small_image_text: Option<String>,
    /// Party identifier (max 128 bytes).
    pub party_id: Option<String>,
    /// Current party size. Values above `i32::MAX` are sent as `i32::MAX`.
    pub party_size: u32,
    /// Maximum party size. Values above `i32::MAX` are sent as `i32::MAX`.
    pub party_max: u32,
    /// Who may join the party.
    pub party_privacy: PartyPrivacy,
    /// Unique match identifier (max 128 bytes).
    pub match_secret: Option<String>,
    /// Secret handed to users who ask to join (max 128 bytes).
    pub join_secret: Option<String>,
    /// Secret handed to users who ask to spectate (max 128 bytes).
    pub spectate_secret: Option<String>,
    /// Whether this session is an in-game instance.
    pub instance: bool,
}

impl Presence {
    /// An empty presence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state line.
    #[must_use]
    pub fn state(mut self, s: impl Into<String>) -> Self {
        self.state = Some(s.into());
        self
    }

    /// Set the details line.
    #[must_use]
    pub fn details(mut self, s: impl Into<String>) -> Self {
        self.details = Some(s.into());
        self
    }

    /// Set the start timestamp (epoch seconds).
    #[must_use]
    pub const fn start_timestamp(mut self, ts: i64) -> Self {
        self.start_timestamp = ts;
        self
    }

    /// Set the start timestamp to the current time.
    #[must_use]
    pub fn with_start_now(self) -> Self {
        self.start_timestamp(unix_now())
    }

    /// Set the end timestamp (epoch seconds).
    #[must_use]
    pub const fn end_timestamp(mut self, ts: i64) -> Self {
        self.end_timestamp = ts;
        self
    }

    /// Set the large image key and tooltip.
    #[must_use]
    pub fn large_image(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.large_image_key = Some(key.into());
        self.large_image_text = Some(text.into());
        self
    }

    /// Set the small image key and tooltip.
    #[must_use]
    pub fn small_image(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.small_image_key = Some(key.into());
        self.small_image_text = Some(text.into());
        self
    }

    /// Set the party identifier and its current/maximum size.
    #[must_use]
    pub fn party(mut self, id: impl Into<String>, size: u32, max: u32) -> Self {
        self.party_id = Some(id.into());
        self.party_size = size;
        self.party_max = max;
        self
    }

    /// Set the party privacy.
    #[must_use]
    pub const fn party_privacy(mut self, privacy: PartyPrivacy) -> Self {
        self.party_privacy = privacy;
        self
    }

    /// Set the match secret.
    #[must_use]
    pub fn match_secret(mut self, s: impl Into<String>) -> Self {
        self.match_secret = Some(s.into());
        self
    }

    /// Set the join secret.
    #[must_use]
    pub fn join_secret(mut self, s: impl Into<String>) -> Self {
        self.join_secret = Some(s.into());
        self
    }

    /// Set the spectate secret.
    #[must_use]
    pub fn spectate_secret(mut self, s: impl Into<String>) -> Self {
        self.spectate_secret = Some(s.into());
        self
    }

    /// Mark the presence as an in-game instance.
    #[must_use]
    pub const fn instance(mut self, instance: bool) -> Self {
        self.instance = instance;
        self
    }

    /// Check every string field against the native byte limits.
    ///
    /// Marshaling never truncates or rejects oversized fields on its own; the
    /// native library clips them. Call this to reject them up front instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldTooLong`] for the first field over its limit.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("state", &self.state, MAX_TEXT_BYTES),
            ("details", &self.details, MAX_TEXT_BYTES),
            ("large_image_key", &self.large_image_key, MAX_IMAGE_KEY_BYTES),
            ("large_image_text", &self.large_image_text, MAX_TEXT_BYTES),
            ("small_image_key", &self.small_image_key, MAX_IMAGE_KEY_BYTES),
            ("small_image_text", &self.small_image_text, MAX_TEXT_BYTES),
            ("party_id", &self.party_id, MAX_TEXT_BYTES),
            ("match_secret", &self.match_secret, MAX_TEXT_BYTES),
            ("join_secret", &self.join_secret, MAX_TEXT_BYTES),
            ("spectate_secret", &self.spectate_secret, MAX_TEXT_BYTES),
        ];
        for (field, value, max) in fields {
            let len = value.as_deref().map_or(0, str::len);
            if len > max {
                return Err(Error::FieldTooLong { field, len, max });
            }
        }
        Ok(())
    }
}

/// Current time in epoch seconds.
fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
