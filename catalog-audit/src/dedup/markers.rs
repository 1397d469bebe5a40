//! Fulfillment-channel marker detection (stage 1)
//!
//! Shadow listings are usually named after their sibling plus a channel
//! marker: `A-1` / `A-1-FBM`, `Widget Pro` / `Widget Pro (MFN)`. Markers are
//! matched as whole tokens so `FBAR-22` or `Mfnx` never count.

use catalog_common::FulfillmentChannel;

/// Characters that separate tokens in SKUs and item names
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '_' | '.' | '/' | '(' | ')' | '[' | ']' | ',' | '|')
}

/// Split text into non-empty tokens
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|t| !t.is_empty())
}

/// Configured set of channel marker tokens
#[derive(Debug, Clone)]
pub struct ChannelMarkers {
    /// Uppercase marker tokens
    markers: Vec<String>,
}

impl Default for ChannelMarkers {
    fn default() -> Self {
        Self::new(&["FBA", "FBM", "MFN", "AFN"])
    }
}

impl ChannelMarkers {
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Self {
        Self {
            markers: markers
                .iter()
                .map(|m| m.as_ref().trim().to_ascii_uppercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    fn is_marker(&self, token: &str) -> bool {
        self.markers.iter().any(|m| m.eq_ignore_ascii_case(token))
    }

    /// Whether any token of `text` is a channel marker
    pub fn contains_marker(&self, text: &str) -> bool {
        tokens(text).any(|t| self.is_marker(t))
    }

    /// Tokens of `text` with markers removed, joined by `joiner`
    pub fn strip(&self, text: &str, joiner: &str) -> String {
        tokens(text)
            .filter(|t| !self.is_marker(t))
            .collect::<Vec<_>>()
            .join(joiner)
    }

    /// Comparison key for a SKU: markers and separators removed, uppercase
    ///
    /// `A-1-FBM`, `A1_fbm` and `A-1` all map to `A1`.
    pub fn sku_key(&self, sku: &str) -> String {
        self.strip(sku, "").to_uppercase()
    }

    /// Comparison key for an item name: markers removed, lowercase, single spaces
    pub fn name_key(&self, name: &str) -> String {
        self.strip(name, " ").to_lowercase()
    }

    /// Channel implied by a marker in `text`, if any
    ///
    /// The first marker wins. Markers outside the built-in vocabulary mark a
    /// listing as a channel variant without implying which channel.
    pub fn channel_hint(&self, text: &str) -> Option<FulfillmentChannel> {
        tokens(text)
            .filter(|t| self.is_marker(t))
            .map(|t| FulfillmentChannel::parse(t))
            .find(|c| *c != FulfillmentChannel::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_requires_whole_token() {
        let markers = ChannelMarkers::default();
        assert!(markers.contains_marker("A-1-FBM"));
        assert!(markers.contains_marker("Widget Pro (mfn)"));
        assert!(markers.contains_marker("SKU_FBA_22"));
        assert!(!markers.contains_marker("FBAR-22"));
        assert!(!markers.contains_marker("Widget Pro"));
    }

    #[test]
    fn test_sku_key_ignores_separators_and_markers() {
        let markers = ChannelMarkers::default();
        assert_eq!(markers.sku_key("A-1-FBM"), "A1");
        assert_eq!(markers.sku_key("a1_fbm"), "A1");
        assert_eq!(markers.sku_key("A-1"), "A1");
        assert_eq!(markers.sku_key("FBA"), "");
    }

    #[test]
    fn test_name_key() {
        let markers = ChannelMarkers::default();
        assert_eq!(markers.name_key("Widget Pro - FBM"), "widget pro");
        assert_eq!(markers.name_key("Widget  Pro"), "widget pro");
    }

    #[test]
    fn test_channel_hint() {
        let markers = ChannelMarkers::default();
        assert_eq!(markers.channel_hint("A-1-FBA"), Some(FulfillmentChannel::Fba));
        assert_eq!(markers.channel_hint("A-1-AFN"), Some(FulfillmentChannel::Fba));
        assert_eq!(markers.channel_hint("A-1-MFN"), Some(FulfillmentChannel::Fbm));
        assert_eq!(markers.channel_hint("A-1"), None);

        let custom = ChannelMarkers::new(&["SHADOW"]);
        assert!(custom.contains_marker("A-1-SHADOW"));
        assert_eq!(custom.channel_hint("A-1-SHADOW"), None);
    }
}
