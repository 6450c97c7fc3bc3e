use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured outcome of one git invocation. A non-zero exit is an ordinary
/// result here; callers decide what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code_display(&self) -> String {
        self.code.map_or("signal".to_string(), |c| c.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Git {
    exe: PathBuf,
}

impl Git {
    /// Find `git` on the search path. A missing binary is fatal for the run.
    pub fn locate() -> Result<Git> {
        let exe = which::which("git")
            .context("cannot find 'git' command; make sure Git is installed")?;
        debug!(exe = %exe.display(), "located git");
        Ok(Git::at(exe))
    }

    pub fn at(exe: impl Into<PathBuf>) -> Git {
        Git { exe: exe.into() }
    }

    /// Run `git <args>` in `dir`. Returns `Err` only when the process could
    /// not be run at all.
    pub fn run(&self, dir: &Path, args: &[&str]) -> Result<CommandResult> {
        let mut cmd = Command::new(&self.exe);
        cmd.args(args)
            .current_dir(dir)
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Keep discovery from climbing out of `dir` into an enclosing repo.
        if let Some(parent) = dir.parent() {
            cmd.env("GIT_CEILING_DIRECTORIES", parent);
        }

        let output = cmd
            .output()
            .with_context(|| format!("failed to run git {:?} in {}", args, dir.display()))?;

        let result = CommandResult {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            dir = %dir.display(),
            args = %args.join(" "),
            code = %result.code_display(),
            "git finished\nSTDOUT:\n{}\nSTDERR:\n{}",
            result.stdout.trim_end(),
            result.stderr.trim_end()
        );

        Ok(result)
    }
}
