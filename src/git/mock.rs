use crate::domain::PullMode;
use crate::error::{FlowtestError, Result};
use crate::git::{command, Repository};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Mock repository for testing without actual git operations
///
/// Every call is recorded as one line: `git <args>` for git invocations,
/// `write <path>` / `append <path>` / `script <path>` for working tree files.
pub struct MockRepository {
    calls: Mutex<Vec<String>>,
    files: Mutex<BTreeMap<String, String>>,
    fail_on: Option<String>,
    stale: Vec<String>,
    version: String,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            calls: Mutex::new(Vec::new()),
            files: Mutex::new(BTreeMap::new()),
            fail_on: None,
            stale: Vec::new(),
            version: "git version 2.39.2".to_string(),
        }
    }

    /// Fail the first recorded call starting with `prefix`
    pub fn fail_on(mut self, prefix: impl Into<String>) -> Self {
        self.fail_on = Some(prefix.into());
        self
    }

    /// Branches reported as stale by [Repository::stale_branches]
    pub fn with_stale_branches(mut self, branches: &[&str]) -> Self {
        self.stale = branches.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Every call recorded so far, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Index of the first recorded call equal to `call`
    pub fn position(&self, call: &str) -> Option<usize> {
        lock(&self.calls).iter().position(|c| c == call)
    }

    /// Current content of a working tree file
    pub fn file(&self, path: &str) -> Option<String> {
        lock(&self.files).get(path).cloned()
    }

    fn record(&self, call: String) -> Result<()> {
        let failing = self
            .fail_on
            .as_deref()
            .is_some_and(|prefix| call.starts_with(prefix));

        lock(&self.calls).push(call.clone());

        if failing {
            return Err(FlowtestError::CommandFailed {
                command: call,
                code: Some(1),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn git(&self, args: Vec<String>) -> Result<()> {
        self.record(format!("git {}", args.join(" ")))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn version(&self) -> Result<String> {
        Ok(self.version.clone())
    }

    fn init(&self, trunk: &str) -> Result<()> {
        self.git(command::init())?;
        self.git(command::set_initial_branch(trunk))
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.git(command::set_config(key, value))
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<()> {
        self.git(command::add_remote(remote, url))
    }

    fn write_file(&self, path: &str, content: &str, append: bool) -> Result<()> {
        let verb = if append { "append" } else { "write" };
        self.record(format!("{} {}", verb, path))?;

        let mut files = lock(&self.files);
        let entry = files.entry(path.to_string()).or_default();
        if !append {
            entry.clear();
        }
        entry.push_str(content);
        Ok(())
    }

    fn copy_script(&self, path: &str, content: &str) -> Result<()> {
        self.record(format!("script {}", path))?;
        lock(&self.files).insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn stage(&self, paths: &[String]) -> Result<()> {
        self.git(command::stage(paths))
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(command::commit(message))
    }

    fn create_branch(&self, name: &str, from: &str) -> Result<()> {
        self.git(command::create_branch(name, from))
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.git(command::checkout(name))
    }

    fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
        self.git(command::push(remote, branch, set_upstream))
    }

    fn merge_no_ff(&self, branch: &str, message: &str) -> Result<()> {
        self.git(command::merge_no_ff(branch, message))
    }

    fn pull(&self, remote: &str, branch: &str, mode: PullMode) -> Result<()> {
        self.git(command::pull(remote, branch, mode))
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.git(command::delete_remote_branch(remote, name))
    }

    fn delete_local_branch(&self, name: &str, force: bool) -> Result<()> {
        self.git(command::delete_local_branch(name, force))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.git(command::create_tag(name, message))
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.git(command::push_tag(remote, name))
    }

    fn fetch_prune(&self, remote: &str) -> Result<()> {
        self.git(command::fetch_prune(remote))
    }

    fn stale_branches(&self, _remote: &str) -> Result<Vec<String>> {
        Ok(self.stale.clone())
    }

    fn log_graph(&self) -> Result<String> {
        self.git(command::log_graph())?;
        Ok("* abc1234 (HEAD -> master) Merge echo-script into master".to_string())
    }
}
