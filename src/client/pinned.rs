//! Process-lifetime client override cell.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::client::resolver::is_client_label;

/// Holds the client identity pinned by the first request carrying an override.
///
/// There is no invalidation: once set, the value is served until the process
/// exits. Two concurrent first writes race and the last one stored wins.
#[derive(Debug, Default)]
pub struct ClientOverride {
    pinned: ArcSwapOption<String>,
}

impl ClientOverride {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pinned identity, if any.
    pub fn get(&self) -> Option<Arc<String>> {
        self.pinned.load_full()
    }

    /// Pin `value` unless something is pinned already.
    ///
    /// Returns true if this call stored the value. Values that are not a
    /// single DNS label are ignored.
    pub fn capture(&self, value: &str) -> bool {
        if !is_client_label(value) {
            tracing::warn!(client = %value, "Ignoring malformed client override");
            return false;
        }
        if self.pinned.load().is_some() {
            return false;
        }
        self.pinned.store(Some(Arc::new(value.to_string())));
        tracing::info!(client = %value, "Client identity pinned for server lifetime");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_capture_wins() {
        let cell = ClientOverride::new();
        assert!(cell.get().is_none());

        assert!(cell.capture("centurylink"));
        assert!(!cell.capture("toshiba"));
        assert_eq!(cell.get().as_deref().map(String::as_str), Some("centurylink"));
    }

    #[test]
    fn test_empty_override_ignored() {
        let cell = ClientOverride::new();
        assert!(!cell.capture(""));
        assert!(cell.get().is_none());
    }

    #[test]
    fn test_malformed_override_not_pinned() {
        let cell = ClientOverride::new();
        for bad in ["evil.com/", "x@evil.com/", "127.0.0.1:22#"] {
            assert!(!cell.capture(bad), "value {bad}");
        }
        assert!(cell.get().is_none());

        assert!(cell.capture("centurylink"));
    }
}
