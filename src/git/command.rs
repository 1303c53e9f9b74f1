//! Argument vectors for every git invocation the workflow makes.
//!
//! Executing, recording and rendering all start from these so the three
//! [Repository](super::Repository) implementations agree on what is run.

use crate::domain::PullMode;

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

pub fn version() -> Vec<String> {
    args(&["--version"])
}

pub fn init() -> Vec<String> {
    args(&["init"])
}

/// Points the unborn HEAD at `trunk`, regardless of `init.defaultBranch`.
pub fn set_initial_branch(trunk: &str) -> Vec<String> {
    args(&["symbolic-ref", "HEAD", &format!("refs/heads/{}", trunk)])
}

pub fn set_config(key: &str, value: &str) -> Vec<String> {
    args(&["config", key, value])
}

pub fn add_remote(remote: &str, url: &str) -> Vec<String> {
    args(&["remote", "add", remote, url])
}

pub fn stage(paths: &[String]) -> Vec<String> {
    let mut argv = args(&["add", "--"]);
    argv.extend(paths.iter().cloned());
    argv
}

pub fn commit(message: &str) -> Vec<String> {
    args(&["commit", "-m", message])
}

pub fn create_branch(name: &str, from: &str) -> Vec<String> {
    args(&["checkout", "-b", name, from])
}

pub fn checkout(name: &str) -> Vec<String> {
    args(&["checkout", name])
}

pub fn push(remote: &str, branch: &str, set_upstream: bool) -> Vec<String> {
    if set_upstream {
        args(&["push", "-u", remote, branch])
    } else {
        args(&["push", remote, branch])
    }
}

pub fn merge_no_ff(branch: &str, message: &str) -> Vec<String> {
    args(&["merge", "--no-ff", "-m", message, branch])
}

/// `--ff` and `--no-edit` keep a merge pull independent of `pull.ff` and of
/// any configured editor.
pub fn pull(remote: &str, branch: &str, mode: PullMode) -> Vec<String> {
    match mode {
        PullMode::Merge => args(&["pull", "--no-rebase", "--ff", "--no-edit", remote, branch]),
        PullMode::Rebase => args(&["pull", "--rebase", remote, branch]),
    }
}

pub fn delete_remote_branch(remote: &str, name: &str) -> Vec<String> {
    args(&["push", remote, "--delete", name])
}

pub fn delete_local_branch(name: &str, force: bool) -> Vec<String> {
    args(&["branch", if force { "-D" } else { "-d" }, name])
}

pub fn create_tag(name: &str, message: &str) -> Vec<String> {
    args(&["tag", "-a", name, "-m", message])
}

pub fn push_tag(remote: &str, name: &str) -> Vec<String> {
    args(&["push", remote, "tag", name])
}

pub fn fetch_prune(remote: &str) -> Vec<String> {
    args(&["fetch", "--prune", remote])
}

pub fn log_graph() -> Vec<String> {
    args(&["log", "--graph", "--decorate", "--oneline", "--all"])
}
