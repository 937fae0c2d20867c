//! Host → client identity resolution.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::client::ClientOverride;

/// Identity used when nothing else matches.
pub const DEFAULT_CLIENT: &str = "toshiba";

/// Identity for opal hosts and requests without a Host header.
pub const OPAL_CLIENT: &str = "opal";

/// A deployment variant token, e.g. `toshiba` or `centurylink`.
pub type ClientIdentity = String;

/// Exact hostname → client identity.
#[derive(Debug, Clone, Default)]
pub struct HostMapping {
    hosts: HashMap<String, ClientIdentity>,
}

impl HostMapping {
    pub fn new(hosts: &BTreeMap<String, String>) -> Self {
        Self {
            hosts: hosts
                .iter()
                .map(|(host, client)| (host.to_ascii_lowercase(), client.clone()))
                .collect(),
        }
    }

    pub fn get(&self, host: &str) -> Option<&str> {
        self.hosts.get(&host.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Resolves the client identity of a request.
///
/// Precedence, highest first:
/// 1. the pinned override, if any request ever supplied one
/// 2. this request's override (pinned as a side effect); values that are not
///    a single DNS label are ignored
/// 3. `opal` when the host is absent or contains "opal"
/// 4. the host mapping
/// 5. [`DEFAULT_CLIENT`]
#[derive(Debug, Clone)]
pub struct ClientResolver {
    mapping: Arc<HostMapping>,
    pinned: Arc<ClientOverride>,
}

impl ClientResolver {
    pub fn new(mapping: HostMapping) -> Self {
        Self {
            mapping: Arc::new(mapping),
            pinned: Arc::new(ClientOverride::new()),
        }
    }

    /// Pin `value` for the lifetime of the resolver.
    pub fn capture(&self, value: &str) -> bool {
        self.pinned.capture(value)
    }

    pub fn resolve(&self, host: Option<&str>, query_override: Option<&str>) -> ClientIdentity {
        if let Some(pinned) = self.pinned.get() {
            return pinned.as_ref().clone();
        }

        if let Some(value) = query_override.filter(|v| is_client_label(v)) {
            self.pinned.capture(value);
            return value.to_string();
        }

        let hostname = host.map(strip_port).filter(|h| !h.is_empty());
        match hostname {
            None => OPAL_CLIENT.to_string(),
            Some(h) if h.to_ascii_lowercase().contains(OPAL_CLIENT) => OPAL_CLIENT.to_string(),
            Some(h) => self
                .mapping
                .get(h)
                .unwrap_or(DEFAULT_CLIENT)
                .to_string(),
        }
    }
}

/// Replace `opal` with [`DEFAULT_CLIENT`] for consumers that need a concrete variant.
pub fn concrete(client: ClientIdentity) -> ClientIdentity {
    if client == OPAL_CLIENT {
        DEFAULT_CLIENT.to_string()
    } else {
        client
    }
}

/// A client identity is a single DNS label: ASCII letters, digits and `-`.
pub fn is_client_label(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals keep their colons.
    if let Some(end) = host.strip_prefix('[').and_then(|rest| rest.find(']')) {
        return &host[..end + 2];
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
