//! Shared identifiers and the narrow collaborator interfaces the render/form pipeline consumes.
//!
//! Nothing in here has dependencies: assets, message catalogs and similar services are owned by
//! the host application, the pipeline only sees these traits.

use std::collections::HashMap;
use std::fmt;

/// Optional asset capabilities, queried instead of layering sub-traits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetCapability {
    /// The asset can be served with a content checksum in its URL.
    Checksummed,
    /// The asset is a stylesheet and may be linked from `<head>`.
    Stylesheet,
}

/// A resource the pipeline can reference from generated markup.
pub trait Asset: fmt::Debug {
    /// Client-facing URL for the asset.
    fn client_url(&self) -> String;

    /// True when the content behind `client_url` never changes, so clients may cache it forever.
    fn is_invariant(&self) -> bool;

    fn supports(&self, _capability: AssetCapability) -> bool {
        false
    }
}

/// Asset with a fixed URL, used by hosts that resolve URLs up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticAsset {
    url: String,
    invariant: bool,
    capabilities: Vec<AssetCapability>,
}

impl StaticAsset {
    pub fn new(url: impl Into<String>, invariant: bool) -> Self {
        Self {
            url: url.into(),
            invariant,
            capabilities: Vec::new(),
        }
    }

    pub fn stylesheet(url: impl Into<String>, invariant: bool) -> Self {
        Self::new(url, invariant).with_capability(AssetCapability::Stylesheet)
    }

    pub fn with_capability(mut self, capability: AssetCapability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }
}

impl Asset for StaticAsset {
    fn client_url(&self) -> String {
        self.url.clone()
    }

    fn is_invariant(&self) -> bool {
        self.invariant
    }

    fn supports(&self, capability: AssetCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Localized message lookup.
pub trait Messages {
    fn contains(&self, key: &str) -> bool;

    /// Formats the message stored under `key`, substituting `%s` placeholders with `args` in
    /// order. Unknown keys format as `[[missing key: key]]`.
    fn format(&self, key: &str, args: &[&str]) -> String;
}

/// Message catalog backed by a plain map; keys are case-insensitive.
#[derive(Clone, Debug, Default)]
pub struct MapMessages {
    entries: HashMap<String, String>,
}

impl MapMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, pattern: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), pattern.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: MapMessages) {
        self.entries.extend(other.entries);
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for MapMessages {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut messages = MapMessages::new();
        for (key, value) in iter {
            messages.insert(key, value);
        }
        messages
    }
}

impl Messages for MapMessages {
    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    fn format(&self, key: &str, args: &[&str]) -> String {
        let Some(pattern) = self.entries.get(&key.to_ascii_lowercase()) else {
            return format!("[[missing key: {key}]]");
        };
        substitute(pattern, args)
    }
}

fn substitute(pattern: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut args = args.iter();
    let mut rest = pattern;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        match tail.as_bytes().first() {
            Some(b's') => {
                if let Some(arg) = args.next() {
                    out.push_str(arg);
                }
                rest = &tail[1..];
            }
            Some(b'%') => {
                out.push('%');
                rest = &tail[1..];
            }
            _ => {
                out.push('%');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_substitutes_placeholders_in_order() {
        let messages: MapMessages = [(
            "minimum-string-length",
            "You must provide at least %s characters for %s.",
        )]
        .into_iter()
        .collect();
        assert_eq!(
            messages.format("Minimum-String-Length", &["3", "Email"]),
            "You must provide at least 3 characters for Email."
        );
    }

    #[test]
    fn format_keeps_literal_percent_and_missing_args() {
        let messages: MapMessages = [("pct", "100%% of %s and %s"), ("odd", "50% off")]
            .into_iter()
            .collect();
        assert_eq!(messages.format("pct", &["a"]), "100% of a and ");
        assert_eq!(messages.format("odd", &[]), "50% off");
    }

    #[test]
    fn unknown_key_is_flagged() {
        let messages = MapMessages::new();
        assert!(!messages.contains("required"));
        assert_eq!(messages.format("required", &[]), "[[missing key: required]]");
    }

    #[test]
    fn static_asset_capabilities() {
        let css = StaticAsset::stylesheet("/assets/app.css", true);
        assert!(css.supports(AssetCapability::Stylesheet));
        assert!(!css.supports(AssetCapability::Checksummed));
        assert!(css.is_invariant());
        assert_eq!(css.client_url(), "/assets/app.css");
    }
}
