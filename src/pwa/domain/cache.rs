//! On-device cache namespace, usage and status types.

use super::PwaDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const BYTE_STEP: u64 = 1024;

/// Name of a cache namespace owned by the application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheName(String);

impl CacheName {
    /// Creates a validated cache name.
    ///
    /// # Errors
    ///
    /// Returns [`PwaDomainError::EmptyCacheName`] when the name is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, PwaDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(PwaDomainError::EmptyCacheName);
        }
        Ok(Self(normalized))
    }

    /// Returns the cache name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Raw storage figures reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEstimate {
    /// Bytes currently used.
    pub usage: u64,
    /// Bytes available to the origin, when reported.
    pub quota: Option<u64>,
}

/// Cache usage snapshot produced for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheUsageEstimate {
    bytes: u64,
    quota: Option<u64>,
    human_readable: String,
}

impl CacheUsageEstimate {
    /// Builds an estimate from platform figures.
    #[must_use]
    pub fn from_storage(estimate: StorageEstimate) -> Self {
        Self {
            bytes: estimate.usage,
            quota: estimate.quota,
            human_readable: format_bytes(estimate.usage),
        }
    }

    /// Returns used bytes.
    #[must_use]
    pub const fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Returns the quota, when reported.
    #[must_use]
    pub const fn quota(&self) -> Option<u64> {
        self.quota
    }

    /// Returns the usage formatted for display, e.g. `1.5 MB`.
    #[must_use]
    pub fn human_readable(&self) -> &str {
        &self.human_readable
    }
}

/// Formats a byte count with binary units and one decimal place.
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "fixed-point formatting truncates to tenths on purpose"
)]
pub fn format_bytes(bytes: u64) -> String {
    let mut unit_index = 0_usize;
    let mut scale = 1_u64;
    while unit_index + 1 < BYTE_UNITS.len() && bytes >= scale.saturating_mul(BYTE_STEP) {
        scale = scale.saturating_mul(BYTE_STEP);
        unit_index += 1;
    }

    let unit = BYTE_UNITS.get(unit_index).copied().unwrap_or("B");
    if unit_index == 0 {
        return format!("{bytes} {unit}");
    }

    let whole = bytes / scale;
    let tenths = (bytes % scale).saturating_mul(10) / scale;
    format!("{whole}.{tenths} {unit}")
}

/// Cache status surfaced to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Nothing has happened to the cache yet.
    #[default]
    Idle,
    /// The agent refreshed cached content.
    Updated,
    /// The app shell is cached for offline use.
    Ready,
    /// Every application cache was deleted.
    Cleared,
}

impl CacheStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Updated => "updated",
            Self::Ready => "ready",
            Self::Cleared => "cleared",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0 B")]
    #[case(1023, "1023 B")]
    #[case(1024, "1.0 KB")]
    #[case(1536, "1.5 KB")]
    #[case(5 * 1024 * 1024, "5.0 MB")]
    #[case(3 * 1024 * 1024 * 1024 + 512 * 1024 * 1024, "3.5 GB")]
    fn formats_byte_counts(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_bytes(bytes), expected);
    }

    #[test]
    fn estimate_carries_formatted_usage() {
        let estimate = CacheUsageEstimate::from_storage(StorageEstimate {
            usage: 2048,
            quota: Some(1 << 30),
        });

        assert_eq!(estimate.bytes(), 2048);
        assert_eq!(estimate.human_readable(), "2.0 KB");
        assert_eq!(estimate.quota(), Some(1 << 30));
    }

    #[test]
    fn cache_name_rejects_blank_values() {
        assert_eq!(CacheName::new(" "), Err(PwaDomainError::EmptyCacheName));
        assert_eq!(
            CacheName::new(" letz-static-v1 ").map(|name| name.as_str().to_owned()),
            Ok("letz-static-v1".to_owned())
        );
    }
}
