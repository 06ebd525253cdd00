use std::path::PathBuf;

/// Free-form extra CLI arguments, in the order they were declared.
///
/// A `None` value means the flag is passed bare, which is distinct from
/// passing it with an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtraArgs(Vec<(String, Option<String>)>);

impl ExtraArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses `key=value,flag,other=x`. Items are trimmed and empty items skipped.
    pub fn parse(raw: &str) -> Self {
        let mut args = Self::new();
        for pair in raw.split(',') {
            if pair.trim().is_empty() {
                continue;
            }
            match pair.split_once('=') {
                Some((k, v)) => args.insert(k.trim(), Some(v.trim().to_string())),
                None => args.insert(pair.trim(), None),
            }
        }
        args
    }
}

/// Everything one backend conversation is opened with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackendOptions {
    pub permission_mode: String,
    pub allowed_tools: Vec<String>,
    pub disallowed_tools: Vec<String>,
    pub model: Option<String>,
    pub max_turns: Option<u32>,
    pub cwd: Option<PathBuf>,
    /// MCP server manifest handed to the backend. Required before a session opens.
    pub mcp_config: Option<PathBuf>,
    pub system_prompt: Option<String>,
    pub extra_args: ExtraArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_args_keep_bare_flags_distinct() {
        let args = ExtraArgs::parse("a=1, b ,c=,, d = two words ");
        let collected: Vec<_> = args.iter().collect();
        assert_eq!(
            collected,
            vec![
                ("a", Some("1")),
                ("b", None),
                ("c", Some("")),
                ("d", Some("two words")),
            ]
        );
    }

    #[test]
    fn extra_args_later_duplicate_replaces_value() {
        let args = ExtraArgs::parse("debug,debug=verbose");
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("debug"), Some(&Some("verbose".to_string())));
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let args = ExtraArgs::parse("settings=a=b");
        assert_eq!(args.get("settings"), Some(&Some("a=b".to_string())));
    }
}
