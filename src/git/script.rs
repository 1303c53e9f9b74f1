use std::sync::{Mutex, MutexGuard};

use crate::domain::PullMode;
use crate::error::Result;
use crate::git::{command, Repository};

const HEREDOC_DELIMITER: &str = "FLOWTEST_EOF";

/// Shell variable holding the version tag computed at script run time.
const VERSION_TAG_VAR: &str = "$VERSION_TAG";

/// Renders every operation as a line of POSIX shell instead of running it.
///
/// Running the rendered script performs the same git invocations as
/// [GitCli](super::GitCli), each followed by `|| exit`.
#[derive(Default)]
pub struct ScriptRepository {
    lines: Mutex<Vec<String>>,
}

impl ScriptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete script, shebang included
    pub fn into_script(self) -> String {
        let lines = match self.lines.into_inner() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut script = String::from("#!/bin/sh\n# Generated by flowtest. Every step aborts the run on failure.\n");
        for line in lines {
            script.push_str(&line);
            script.push('\n');
        }
        script
    }

    fn lines(&self) -> MutexGuard<'_, Vec<String>> {
        match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn push_line(&self, line: impl Into<String>) {
        self.lines().push(line.into());
    }

    fn git(&self, args: &[String]) -> Result<()> {
        let rendered: Vec<String> = args.iter().map(|a| shell_quote(a)).collect();
        self.push_line(format!("git {} || exit", rendered.join(" ")));
        Ok(())
    }
}

/// Quote a single shell word.
///
/// Plain words stay bare, a lone `$NAME` is double-quoted so it expands,
/// anything else is single-quoted.
pub fn shell_quote(arg: &str) -> String {
    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@=,+%".contains(c));
    if is_plain {
        return arg.to_string();
    }

    if let Some(var) = arg.strip_prefix('$') {
        if !var.is_empty() && var.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return format!("\"{}\"", arg);
        }
    }

    format!("'{}'", arg.replace('\'', r"'\''"))
}

impl Repository for ScriptRepository {
    fn version(&self) -> Result<String> {
        Ok("$(git --version)".to_string())
    }

    fn version_tag(&self) -> Result<String> {
        self.push_line(
            "VERSION_TAG=$(git --version | sed -E 's/^git version ([0-9]+\\.[0-9]+(\\.[0-9]+)?).*/git-\\1/') || exit",
        );
        Ok(VERSION_TAG_VAR.to_string())
    }

    fn begin_stage(&self, number: usize, title: &str) -> Result<()> {
        self.push_line("");
        self.push_line(format!("# {}. {}", number, title));
        Ok(())
    }

    fn init(&self, trunk: &str) -> Result<()> {
        self.git(&command::init())?;
        self.git(&command::set_initial_branch(trunk))
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.git(&command::set_config(key, value))
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<()> {
        self.git(&command::add_remote(remote, url))
    }

    fn write_file(&self, path: &str, content: &str, append: bool) -> Result<()> {
        let redirect = if append { ">>" } else { ">" };
        match content.strip_suffix('\n') {
            Some(body) => {
                self.push_line(format!(
                    "cat {} {} <<'{}' || exit",
                    redirect,
                    shell_quote(path),
                    HEREDOC_DELIMITER
                ));
                self.push_line(body);
                self.push_line(HEREDOC_DELIMITER);
            }
            None => {
                self.push_line(format!(
                    "printf '%s' {} {} {} || exit",
                    shell_quote(content),
                    redirect,
                    shell_quote(path)
                ));
            }
        }
        Ok(())
    }

    fn copy_script(&self, path: &str, _content: &str) -> Result<()> {
        self.push_line(format!("cp \"$0\" {} || exit", shell_quote(path)));
        Ok(())
    }

    fn stage(&self, paths: &[String]) -> Result<()> {
        self.git(&command::stage(paths))
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&command::commit(message))
    }

    fn create_branch(&self, name: &str, from: &str) -> Result<()> {
        self.git(&command::create_branch(name, from))
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.git(&command::checkout(name))
    }

    fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
        self.git(&command::push(remote, branch, set_upstream))
    }

    fn merge_no_ff(&self, branch: &str, message: &str) -> Result<()> {
        self.git(&command::merge_no_ff(branch, message))
    }

    fn pull(&self, remote: &str, branch: &str, mode: PullMode) -> Result<()> {
        self.git(&command::pull(remote, branch, mode))
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.git(&command::delete_remote_branch(remote, name))
    }

    fn delete_local_branch(&self, name: &str, force: bool) -> Result<()> {
        self.git(&command::delete_local_branch(name, force))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.git(&command::create_tag(name, message))
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.git(&command::push_tag(remote, name))
    }

    fn fetch_prune(&self, remote: &str) -> Result<()> {
        self.git(&command::fetch_prune(remote))
    }

    /// Emits a loop that finds gone upstreams at run time; nothing is known
    /// to be stale while rendering.
    fn stale_branches(&self, _remote: &str) -> Result<Vec<String>> {
        self.push_line(
            "git for-each-ref --format='%(refname:short) %(upstream:track)' refs/heads | \
             while read -r branch track; do \
             if [ \"$track\" = \"[gone]\" ]; then git branch -D \"$branch\" || exit; fi; \
             done || exit",
        );
        Ok(Vec::new())
    }

    fn log_graph(&self) -> Result<String> {
        self.git(&command::log_graph())?;
        Ok(String::new())
    }
}
