use std::collections::HashMap;
use std::path::PathBuf;

use super::keys;

/// A flat, named key/value store the backend options are read from.
///
/// Empty values are treated exactly like absent ones, so implementations may
/// return `Some("")` and callers never have to care.
pub trait SettingsSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`get`](Self::get) but filters out blank values.
    fn value(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

/// Reads the live process environment on every lookup.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl SettingsSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Two sources stacked: `upper` wins whenever it holds a non-empty value.
#[derive(Clone, Debug)]
pub struct Layered<A, B> {
    pub upper: A,
    pub lower: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(upper: A, lower: B) -> Self {
        Self { upper, lower }
    }
}

impl<A: SettingsSource, B: SettingsSource> SettingsSource for Layered<A, B> {
    fn get(&self, key: &str) -> Option<String> {
        self.upper.value(key).or_else(|| self.lower.get(key))
    }
}

/// Process-wide values resolved once at startup.
#[derive(Clone, Debug)]
pub struct Defaults {
    pub host: String,
    pub port: u16,
    pub mcp_config: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            mcp_config: None,
        }
    }
}

impl Defaults {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SettingsSource for Defaults {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            keys::HOST => Some(self.host.clone()),
            keys::PORT => Some(self.port.to_string()),
            keys::MCP_CONFIG_PATH => self
                .mcp_config
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn upper_layer_wins_unless_blank() {
        let layered = Layered::new(
            map(&[(keys::MODEL, "opus"), (keys::CWD, "")]),
            map(&[(keys::MODEL, "haiku"), (keys::CWD, "/srv")]),
        );
        assert_eq!(layered.value(keys::MODEL).as_deref(), Some("opus"));
        assert_eq!(layered.value(keys::CWD).as_deref(), Some("/srv"));
        assert_eq!(layered.value(keys::MAX_TURNS), None);
    }

    #[test]
    fn defaults_expose_manifest_path() {
        let defaults = Defaults {
            mcp_config: Some(PathBuf::from("/etc/mcp.json")),
            ..Defaults::default()
        };
        assert_eq!(defaults.value(keys::MCP_CONFIG_PATH).as_deref(), Some("/etc/mcp.json"));
        assert_eq!(defaults.value(keys::PORT).as_deref(), Some("8888"));
        assert_eq!(defaults.address(), "127.0.0.1:8888");
    }
}
