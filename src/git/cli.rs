use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, warn};

use crate::domain::PullMode;
use crate::error::{FlowtestError, Result};
use crate::git::{command, Git2Inspector, Repository};

/// Runs the `git` executable inside a working directory.
pub struct GitCli {
    working_dir: PathBuf,
    git: PathBuf,
}

impl GitCli {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            git: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable instead of the one on `PATH`
    #[cfg(test)]
    fn with_git(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = git.into();
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn run(&self, args: &[String]) -> Result<Output> {
        debug!(args = ?args, dir = %self.working_dir.display(), "Running git command");

        let output = Command::new(&self.git)
            .args(args)
            .current_dir(&self.working_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(args = ?args, stderr = %stderr, "Git command failed");
        }

        Ok(output)
    }

    fn run_checked(&self, args: &[String]) -> Result<Output> {
        let output = self.run(args)?;

        if !output.status.success() {
            return Err(FlowtestError::CommandFailed {
                command: args.join(" "),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }

    fn stdout_of(&self, args: &[String]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn tree_path(&self, path: &str) -> PathBuf {
        self.working_dir.join(path)
    }
}

impl Repository for GitCli {
    fn version(&self) -> Result<String> {
        Ok(self.stdout_of(&command::version())?.trim().to_string())
    }

    fn init(&self, trunk: &str) -> Result<()> {
        fs::create_dir_all(&self.working_dir)?;
        self.run_checked(&command::init())?;
        self.run_checked(&command::set_initial_branch(trunk))?;
        Ok(())
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.run_checked(&command::set_config(key, value))?;
        Ok(())
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<()> {
        self.run_checked(&command::add_remote(remote, url))?;
        Ok(())
    }

    fn write_file(&self, path: &str, content: &str, append: bool) -> Result<()> {
        let target = self.tree_path(path);
        debug!(path = %target.display(), append, "Writing working tree file");

        if append {
            let mut file = OpenOptions::new().create(true).append(true).open(target)?;
            file.write_all(content.as_bytes())?;
        } else {
            fs::write(target, content)?;
        }
        Ok(())
    }

    fn copy_script(&self, path: &str, content: &str) -> Result<()> {
        let target = self.tree_path(path);
        fs::write(&target, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }

    fn stage(&self, paths: &[String]) -> Result<()> {
        self.run_checked(&command::stage(paths))?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run_checked(&command::commit(message))?;
        Ok(())
    }

    fn create_branch(&self, name: &str, from: &str) -> Result<()> {
        self.run_checked(&command::create_branch(name, from))?;
        Ok(())
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.run_checked(&command::checkout(name))?;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
        self.run_checked(&command::push(remote, branch, set_upstream))?;
        Ok(())
    }

    fn merge_no_ff(&self, branch: &str, message: &str) -> Result<()> {
        self.run_checked(&command::merge_no_ff(branch, message))?;
        Ok(())
    }

    fn pull(&self, remote: &str, branch: &str, mode: PullMode) -> Result<()> {
        self.run_checked(&command::pull(remote, branch, mode))?;
        Ok(())
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.run_checked(&command::delete_remote_branch(remote, name))?;
        Ok(())
    }

    fn delete_local_branch(&self, name: &str, force: bool) -> Result<()> {
        self.run_checked(&command::delete_local_branch(name, force))?;
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.run_checked(&command::create_tag(name, message))?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.run_checked(&command::push_tag(remote, name))?;
        Ok(())
    }

    fn fetch_prune(&self, remote: &str) -> Result<()> {
        self.run_checked(&command::fetch_prune(remote))?;
        Ok(())
    }

    fn stale_branches(&self, remote: &str) -> Result<Vec<String>> {
        Git2Inspector::open(&self.working_dir)?.stale_branches(remote)
    }

    fn log_graph(&self) -> Result<String> {
        self.stdout_of(&command::log_graph())
    }
}
