/// How a branch is brought up to date with the trunk.
///
/// Branches that have been pushed are shared, so their history is never
/// rewritten: they merge the trunk in. Branches that only exist locally can
/// be rebased onto the trunk instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Pushed to the remote at least once
    Tracked,
    /// Never pushed
    Untracked,
}

/// The flavour of `git pull` used to synchronize a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullMode {
    Merge,
    Rebase,
}

impl SyncPolicy {
    pub fn pull_mode(&self) -> PullMode {
        match self {
            SyncPolicy::Tracked => PullMode::Merge,
            SyncPolicy::Untracked => PullMode::Rebase,
        }
    }
}

/// Represents a git branch together with its sync policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub policy: SyncPolicy,
}

impl Branch {
    /// A branch that will be pushed with upstream tracking right away
    pub fn tracked(name: impl Into<String>) -> Self {
        Branch {
            name: name.into(),
            policy: SyncPolicy::Tracked,
        }
    }

    /// A branch that stays local until explicitly pushed
    pub fn untracked(name: impl Into<String>) -> Self {
        Branch {
            name: name.into(),
            policy: SyncPolicy::Untracked,
        }
    }

    /// Record that the branch now has an upstream on the remote.
    pub fn mark_tracked(&mut self) {
        self.policy = SyncPolicy::Tracked;
    }

    pub fn is_tracked(&self) -> bool {
        self.policy == SyncPolicy::Tracked
    }
}
