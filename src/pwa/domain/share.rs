//! Share payloads exchanged with the platform share surface.

use serde::{Deserialize, Serialize};

/// Content offered to, or received from, the platform share flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SharePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl SharePayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into());
        self
    }

    /// Sets the text body.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = non_blank(text.into());
        self
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = non_blank(url.into());
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the text body.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the field copied when native sharing is unavailable: the URL,
    /// else the text.
    #[must_use]
    pub fn clipboard_text(&self) -> Option<&str> {
        self.url().or_else(|| self.text())
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_prefers_url_over_text() {
        let payload = SharePayload::new()
            .with_title("T")
            .with_text("Join us")
            .with_url("https://x");

        assert_eq!(payload.clipboard_text(), Some("https://x"));
    }

    #[test]
    fn clipboard_falls_back_to_text() {
        let payload = SharePayload::new().with_title("T").with_text("Join us");

        assert_eq!(payload.clipboard_text(), Some("Join us"));
    }

    #[test]
    fn title_alone_has_nothing_to_copy() {
        let payload = SharePayload::new().with_title("T").with_url("  ");

        assert_eq!(payload.clipboard_text(), None);
    }
}
