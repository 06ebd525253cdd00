use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tokio_stream::wrappers::LinesStream;
use tracing::debug;

use super::{AgentBackend, BackendError, ConversationEvent, EventStream};
use crate::config::BackendOptions;

/// Lines of CLI stderr kept for the error message of a failed run.
const STDERR_TAIL_LINES: usize = 20;

/// Talks to the Claude Code CLI in `stream-json` mode, one child process per
/// conversation.
#[derive(Clone, Debug, Default)]
pub struct ClaudeCli {
    cli_path: Option<PathBuf>,
}

impl ClaudeCli {
    /// Locates `claude` on `PATH` or in the usual install directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses exactly this executable.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            cli_path: Some(path.into()),
        }
    }

    pub fn locate(&self) -> Result<PathBuf, BackendError> {
        if let Some(path) = &self.cli_path {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(BackendError::CliNotFound {
                    searched: path.display().to_string(),
                })
            };
        }

        let binary = format!("claude{}", std::env::consts::EXE_SUFFIX);
        let mut candidates: Vec<PathBuf> = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).map(|dir| dir.join(&binary)).collect())
            .unwrap_or_default();
        if let Some(home) = dirs::home_dir() {
            for dir in [".npm-global/bin", ".local/bin", "node_modules/.bin", ".yarn/bin"] {
                candidates.push(home.join(dir).join(&binary));
            }
        }
        candidates.push(PathBuf::from("/usr/local/bin").join(&binary));

        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| BackendError::CliNotFound {
                searched: format!("{binary} on PATH and common install locations"),
            })
    }
}

/// Command line for one `--print` run of the CLI.
pub fn build_args(prompt: &str, options: &BackendOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--output-format".into(), "stream-json".into(), "--verbose".into()];

    if let Some(system_prompt) = &options.system_prompt {
        args.push("--system-prompt".into());
        args.push(system_prompt.into());
    }
    if !options.allowed_tools.is_empty() {
        args.push("--allowedTools".into());
        args.push(options.allowed_tools.join(",").into());
    }
    if let Some(max_turns) = options.max_turns {
        args.push("--max-turns".into());
        args.push(max_turns.to_string().into());
    }
    if !options.disallowed_tools.is_empty() {
        args.push("--disallowedTools".into());
        args.push(options.disallowed_tools.join(",").into());
    }
    if let Some(model) = &options.model {
        args.push("--model".into());
        args.push(model.into());
    }
    if !options.permission_mode.is_empty() {
        args.push("--permission-mode".into());
        args.push((&options.permission_mode).into());
    }
    if let Some(mcp_config) = &options.mcp_config {
        args.push("--mcp-config".into());
        args.push(mcp_config.into());
    }
    for (flag, value) in options.extra_args.iter() {
        args.push(format!("--{flag}").into());
        if let Some(value) = value {
            args.push(value.into());
        }
    }

    // Prompts may start with '-', so end option parsing first.
    args.push("--print".into());
    args.push("--".into());
    args.push(prompt.into());
    args
}

#[async_trait]
impl AgentBackend for ClaudeCli {
    async fn open_conversation(
        &self,
        prompt: &str,
        options: &BackendOptions,
    ) -> Result<EventStream, BackendError> {
        let cli = self.locate()?;
        let mut command = Command::new(&cli);
        command
            .args(build_args(prompt, options))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }

        debug!("Spawning {}", cli.display());
        let mut child = command.spawn().map_err(BackendError::Spawn)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BackendError::Runtime("CLI stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BackendError::Runtime("CLI stderr unavailable".to_string()))?;
        let stderr_task = tokio::spawn(stderr_tail(stderr));

        // `child` moves into the stream so dropping the stream kills the process.
        let events = async_stream::stream! {
            let mut lines = LinesStream::new(BufReader::new(stdout).lines());
            while let Some(line) = lines.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(BackendError::Io(e));
                        return;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str::<ConversationEvent>(trimmed) {
                    Ok(event) => yield Ok(event),
                    Err(source) => {
                        yield Err(BackendError::Decode { line: trimmed.to_string(), source });
                        return;
                    }
                }
            }

            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    let stderr = stderr_task.await.unwrap_or_default();
                    yield Err(BackendError::Process { exit_code: status.code(), stderr });
                }
                Err(e) => yield Err(BackendError::Io(e)),
            }
        };

        Ok(Box::pin(events))
    }
}

async fn stderr_tail(stderr: ChildStderr) -> String {
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!("[claude] {}", line);
        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    Vec::from(tail).join("\n")
}
