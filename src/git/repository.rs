use crate::error::Result;
use git2::{BranchType, ErrorCode, Repository as Git2Repo};
use std::path::Path;

/// Read-only structured queries over a repository through `git2`.
///
/// Used where the workflow needs facts about refs rather than command output.
pub struct Git2Inspector {
    repo: Git2Repo,
}

impl Git2Inspector {
    /// Open the repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::open(path)?;

        Ok(Git2Inspector { repo })
    }

    /// Local branches configured to track `remote` whose upstream ref no
    /// longer exists.
    ///
    /// A branch without upstream configuration is never stale: it was simply
    /// never pushed.
    pub fn stale_branches(&self, remote: &str) -> Result<Vec<String>> {
        let mut stale = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;

            let refname = match branch.get().name() {
                Some(refname) => refname.to_string(),
                None => continue,
            };

            let upstream_remote = match self.repo.branch_upstream_remote(&refname) {
                Ok(buf) => buf.as_str().map(str::to_string),
                Err(e) if e.code() == ErrorCode::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            if upstream_remote.as_deref() != Some(remote) {
                continue;
            }

            match branch.upstream() {
                Ok(_) => {}
                Err(e) if e.code() == ErrorCode::NotFound => {
                    if let Some(name) = branch.name()? {
                        stale.push(name.to_string());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        stale.sort();
        Ok(stale)
    }
}
