#![cfg(test)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestEnv {
    _dir: TempDir,
    root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir
            .path()
            .canonicalize()
            .expect("failed to canonicalize temp dir");
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run git in `dir` with a fixed identity, panicking on failure.
    pub fn git(&self, dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("LC_ALL", "C")
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@test.com")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@test.com")
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// A repository with one empty commit and a clean working tree.
    pub fn create_repo(&self, name: &str) -> PathBuf {
        let repo_path = self.root.join(name);
        std::fs::create_dir_all(&repo_path).unwrap();

        self.git(&repo_path, &["init"]);
        self.git(&repo_path, &["commit", "--allow-empty", "-m", "initial"]);

        repo_path
    }

    pub fn create_bare_remote(&self, name: &str) -> PathBuf {
        let remote_path = self.root.join(name);
        std::fs::create_dir_all(&remote_path).unwrap();
        self.git(&remote_path, &["init", "--bare"]);
        remote_path
    }

    /// Add `remote_name` pointing at a fresh bare repo and push HEAD to it.
    pub fn add_pushed_remote(&self, repo: &Path, remote_name: &str, bare_name: &str) -> PathBuf {
        let remote_path = self.create_bare_remote(bare_name);
        let url = remote_path.to_string_lossy().to_string();
        self.git(repo, &["remote", "add", remote_name, &url]);
        self.git(repo, &["push", "-u", remote_name, "HEAD"]);
        remote_path
    }

    pub fn commit_file(&self, repo: &Path, file: &str, contents: &str) {
        std::fs::write(repo.join(file), contents).unwrap();
        self.git(repo, &["add", file]);
        self.git(repo, &["commit", "-m", &format!("add {}", file)]);
    }

    pub fn write_file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }
}
