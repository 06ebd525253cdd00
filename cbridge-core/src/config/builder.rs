use std::path::PathBuf;
use tracing::{error, info, warn};

use super::keys;
use super::options::{BackendOptions, ExtraArgs};
use super::settings::SettingsSource;
use crate::error::ConfigError;

pub const DEFAULT_PERMISSION_MODE: &str = "bypassPermissions";

/// Turns a [`SettingsSource`] into [`BackendOptions`].
///
/// Nothing is cached: every [`build`](Self::build) re-reads the source and
/// re-checks that the MCP manifest exists on disk.
pub struct ConfigBuilder<'a, S: SettingsSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: SettingsSource + ?Sized> ConfigBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn build(&self) -> Result<BackendOptions, ConfigError> {
        let permission_mode = self
            .source
            .value(keys::PERMISSION_MODE)
            .unwrap_or_else(|| DEFAULT_PERMISSION_MODE.to_string());

        let max_turns = self.source.value(keys::MAX_TURNS).and_then(|raw| {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    warn!("Invalid {}={:?}; ignoring", keys::MAX_TURNS, raw);
                    None
                }
            }
        });

        let mcp_config = self.manifest_path()?;

        Ok(BackendOptions {
            permission_mode,
            allowed_tools: tool_list(self.source.value(keys::ALLOWED_TOOLS)),
            disallowed_tools: tool_list(self.source.value(keys::DISALLOWED_TOOLS)),
            model: self.source.value(keys::MODEL),
            max_turns,
            cwd: self.source.value(keys::CWD).map(PathBuf::from),
            mcp_config: Some(mcp_config),
            system_prompt: self.source.value(keys::SYSTEM_PROMPT),
            extra_args: self
                .source
                .value(keys::EXTRA_ARGS)
                .map(|raw| ExtraArgs::parse(&raw))
                .unwrap_or_default(),
        })
    }

    fn manifest_path(&self) -> Result<PathBuf, ConfigError> {
        let Some(raw) = self.source.value(keys::MCP_CONFIG_PATH) else {
            error!("{} is not set", keys::MCP_CONFIG_PATH);
            return Err(ConfigError::ManifestPathNotSet);
        };
        let path = PathBuf::from(raw);
        if !path.exists() {
            error!("MCP config file not found at {}", path.display());
            return Err(ConfigError::ManifestNotFound(path));
        }
        info!("Using MCP config: {}", path.display());
        Ok(path)
    }
}

/// Comma separated names, trimmed, blanks and repeats dropped, order kept.
fn tool_list(raw: Option<String>) -> Vec<String> {
    let mut tools: Vec<String> = Vec::new();
    for name in raw.iter().flat_map(|r| r.split(',')).map(str::trim) {
        if !name.is_empty() && !tools.iter().any(|t| t == name) {
            tools.push(name.to_string());
        }
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn manifest() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mcpServers": {{}}}}"#).unwrap();
        file
    }

    #[test]
    fn minimal_settings_use_defaults() {
        let file = manifest();
        let path = file.path().to_string_lossy().into_owned();
        let source = settings(&[(keys::MCP_CONFIG_PATH, path.as_str())]);

        let options = ConfigBuilder::new(&source).build().unwrap();
        assert_eq!(options.permission_mode, DEFAULT_PERMISSION_MODE);
        assert!(options.allowed_tools.is_empty());
        assert!(options.disallowed_tools.is_empty());
        assert_eq!(options.model, None);
        assert_eq!(options.max_turns, None);
        assert_eq!(options.cwd, None);
        assert_eq!(options.system_prompt, None);
        assert!(options.extra_args.is_empty());
        assert_eq!(options.mcp_config.as_deref(), Some(file.path()));
    }

    #[test]
    fn every_setting_is_applied() {
        let file = manifest();
        let path = file.path().to_string_lossy().into_owned();
        let source = settings(&[
            (keys::MCP_CONFIG_PATH, path.as_str()),
            (keys::PERMISSION_MODE, "acceptEdits"),
            (keys::ALLOWED_TOOLS, " Read, Write ,,Read,mcp__img"),
            (keys::DISALLOWED_TOOLS, "Bash"),
            (keys::MODEL, "sonnet"),
            (keys::MAX_TURNS, " 7 "),
            (keys::CWD, "/tmp/work"),
            (keys::EXTRA_ARGS, "debug,settings=x.json"),
        ]);

        let options = ConfigBuilder::new(&source).build().unwrap();
        assert_eq!(options.permission_mode, "acceptEdits");
        assert_eq!(options.allowed_tools, vec!["Read", "Write", "mcp__img"]);
        assert_eq!(options.disallowed_tools, vec!["Bash"]);
        assert_eq!(options.model.as_deref(), Some("sonnet"));
        assert_eq!(options.max_turns, Some(7));
        assert_eq!(options.cwd, Some(PathBuf::from("/tmp/work")));
        assert_eq!(options.extra_args.get("debug"), Some(&None));
        assert_eq!(
            options.extra_args.get("settings"),
            Some(&Some("x.json".to_string()))
        );
    }

    #[test]
    fn bad_max_turns_is_ignored() {
        let file = manifest();
        let path = file.path().to_string_lossy().into_owned();
        for raw in ["abc", "0", "-3", "2.5"] {
            let source = settings(&[(keys::MCP_CONFIG_PATH, path.as_str()), (keys::MAX_TURNS, raw)]);
            let options = ConfigBuilder::new(&source).build().unwrap();
            assert_eq!(options.max_turns, None, "{raw}");
        }
    }

    #[test]
    fn missing_manifest_path_is_fatal() {
        let source = settings(&[(keys::MODEL, "sonnet"), (keys::MCP_CONFIG_PATH, "")]);
        assert_eq!(
            ConfigBuilder::new(&source).build(),
            Err(ConfigError::ManifestPathNotSet)
        );
    }

    #[test]
    fn nonexistent_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let source = settings(&[(keys::MCP_CONFIG_PATH, &*missing.to_string_lossy())]);
        assert_eq!(
            ConfigBuilder::new(&source).build(),
            Err(ConfigError::ManifestNotFound(missing))
        );
    }

    #[test]
    fn manifest_is_rechecked_on_every_build() {
        let file = manifest();
        let path = file.path().to_path_buf();
        let source = settings(&[(keys::MCP_CONFIG_PATH, &*path.to_string_lossy())]);
        let builder = ConfigBuilder::new(&source);

        assert!(builder.build().is_ok());
        drop(file);
        assert_eq!(builder.build(), Err(ConfigError::ManifestNotFound(path)));
    }
}
