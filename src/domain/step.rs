use crate::domain::{Branch, TagName};

/// Whether a working-tree write replaces the file or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Append,
}

/// One operation of a workflow with all of its literal inputs.
///
/// Remote-facing steps do not name the remote; the runner supplies the one
/// it was configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `git init` with `trunk` as the initial branch
    Init { trunk: String },
    /// Set a repository-local git config value
    SetConfig { key: String, value: String },
    AddRemote { url: String },
    WriteFile {
        path: String,
        content: String,
        mode: WriteMode,
    },
    /// Store the workflow itself, rendered as a shell script
    CopyScript { path: String },
    Stage { paths: Vec<String> },
    Commit { message: String },
    /// Create `branch` from `from` and switch to it
    CreateBranch { branch: Branch, from: String },
    Checkout { name: String },
    Push { branch: String, set_upstream: bool },
    /// Non-fast-forward merge of `branch` into the current branch
    MergeNoFf { branch: String, message: String },
    /// Pull `from` into `branch` following the branch's sync policy
    Sync { branch: String, from: String },
    /// Delete the branch on the remote, then locally
    DeleteBranch { name: String },
    Tag { name: TagName, message: String },
    PushTag { name: TagName },
    /// Delete local branches whose upstream disappeared from the remote
    Prune,
    /// Print the decorated commit graph
    Log,
}

impl Step {
    /// Short human readable label used in progress output.
    pub fn describe(&self) -> String {
        match self {
            Step::Init { trunk } => format!("init repository on {}", trunk),
            Step::SetConfig { key, value } => format!("set {}={}", key, value),
            Step::AddRemote { url } => format!("add remote {}", url),
            Step::WriteFile { path, mode, .. } => match mode {
                WriteMode::Create => format!("write {}", path),
                WriteMode::Append => format!("append to {}", path),
            },
            Step::CopyScript { path } => format!("copy workflow script to {}", path),
            Step::Stage { paths } => format!("stage {}", paths.join(" ")),
            Step::Commit { message } => format!("commit '{}'", message),
            Step::CreateBranch { branch, from } => {
                format!("create branch {} from {}", branch.name, from)
            }
            Step::Checkout { name } => format!("checkout {}", name),
            Step::Push {
                branch,
                set_upstream,
            } => {
                if *set_upstream {
                    format!("push {} with upstream", branch)
                } else {
                    format!("push {}", branch)
                }
            }
            Step::MergeNoFf { branch, .. } => format!("merge --no-ff {}", branch),
            Step::Sync { branch, from } => format!("sync {} with {}", branch, from),
            Step::DeleteBranch { name } => format!("delete branch {}", name),
            Step::Tag { name, .. } => format!("tag {}", tag_label(name)),
            Step::PushTag { name } => format!("push tag {}", tag_label(name)),
            Step::Prune => "prune branches gone from the remote".to_string(),
            Step::Log => "show history".to_string(),
        }
    }
}

fn tag_label(name: &TagName) -> &str {
    match name {
        TagName::Literal(name) => name,
        TagName::GitVersion => "<git version>",
    }
}
