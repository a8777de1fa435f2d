//! Output directory and the external unfolder/translator.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info, Level};

use mindoo_net::net::Net;

use crate::errors::{EngineError, ToolError};

/// Commands of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub unfolder: String,
    pub translator: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            unfolder: "ecofolder".to_string(),
            translator: "mci2asp".to_string(),
        }
    }
}

/// Source of continuation prefixes for the Pi_1 extender.
pub trait PrefixTools {
    /// Unfold `net` from its current initial marking and return the prefix
    /// facts under identifier namespace `namespace`.
    fn continuation(&mut self, net: &Net, namespace: &str) -> Result<String, EngineError>;
}

/// Run-keyed output directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
    toolchain: Toolchain,
}

impl Workspace {
    /// Recreate `<root>/<net stem>` and return it as the workspace.
    pub fn create(root: &Path, net_path: &Path, toolchain: Toolchain) -> Result<Self, EngineError> {
        let stem = net_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "net".to_string());
        let dir = root.join(stem);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| EngineError::io(&dir, e))?;
        }
        std::fs::create_dir_all(&dir).map_err(|e| EngineError::io(&dir, e))?;
        debug!(dir = %dir.display(), "workspace created");
        Ok(Self { dir, toolchain })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn write_artifact(&self, name: &str, text: &str) -> Result<PathBuf, EngineError> {
        let path = self.path(name);
        std::fs::write(&path, text).map_err(|e| EngineError::io(&path, e))?;
        Ok(path)
    }

    /// Write `net` to `working.ll` and unfold it into `mci_name`.
    ///
    /// Unfolder diagnostics go to the log at `level`.
    pub fn build_prefix(&self, net: &Net, mci_name: &str, level: Level) -> Result<PathBuf, EngineError> {
        let ll = self.write_artifact("working.ll", &net.to_text())?;
        let mci = self.path(mci_name);
        let output = run_tool(
            &self.toolchain.unfolder,
            Command::new(&self.toolchain.unfolder)
                .arg("-data")
                .arg(&ll)
                .arg("-m")
                .arg(&mci),
        )?;
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            if level == Level::INFO {
                info!(target: "unfolder", "{line}");
            } else {
                debug!(target: "unfolder", "{line}");
            }
        }
        Ok(mci)
    }

    /// Translate a prefix file to facts, optionally under a namespace.
    pub fn translate(&self, mci: &Path, namespace: Option<&str>) -> Result<String, EngineError> {
        let mut cmd = Command::new(&self.toolchain.translator);
        cmd.arg(mci);
        if let Some(ns) = namespace {
            cmd.arg(ns);
        }
        let output = run_tool(&self.toolchain.translator, &mut cmd)?;
        String::from_utf8(output.stdout).map_err(|e| {
            EngineError::Contract(format!("{} printed non-UTF-8 facts: {e}", self.toolchain.translator))
        })
    }
}

impl PrefixTools for Workspace {
    fn continuation(&mut self, net: &Net, namespace: &str) -> Result<String, EngineError> {
        let mci = self.build_prefix(net, "working.mci", Level::DEBUG)?;
        self.translate(&mci, Some(namespace))
    }
}

fn run_tool(tool: &str, cmd: &mut Command) -> Result<Output, EngineError> {
    debug!(?cmd, "running {tool}");
    let output = cmd.output().map_err(|source| ToolError::Spawn {
        tool: tool.to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            status: output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string()),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_recreates_directory_named_after_net() {
        let root = tempfile::tempdir().unwrap();
        let net = root.path().join("philo.ll_net");
        let first = Workspace::create(root.path(), &net, Toolchain::default()).unwrap();
        first.write_artifact("stale.txt", "old").unwrap();
        let second = Workspace::create(root.path(), &net, Toolchain::default()).unwrap();
        assert_eq!(second.dir(), root.path().join("philo"));
        assert!(second.dir().is_dir());
        assert!(!second.path("stale.txt").exists());
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::create(
            root.path(),
            Path::new("n.ll"),
            Toolchain {
                unfolder: "mindoo-no-such-unfolder".into(),
                translator: "mindoo-no-such-translator".into(),
            },
        )
        .unwrap();
        let err = ws.translate(Path::new("main.mci"), None).unwrap_err();
        assert!(matches!(err, EngineError::Tool(ToolError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_reports_status_and_stderr() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::create(
            root.path(),
            Path::new("n.ll"),
            Toolchain {
                unfolder: "false".into(),
                translator: "false".into(),
            },
        )
        .unwrap();
        match ws.translate(Path::new("main.mci"), Some("w0")) {
            Err(EngineError::Tool(ToolError::Failed { tool, status, .. })) => {
                assert_eq!(tool, "false");
                assert_eq!(status, "1");
            }
            other => panic!("expected tool failure, got {other:?}"),
        }
    }
}
