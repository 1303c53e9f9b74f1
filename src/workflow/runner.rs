use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::{Branch, Step, TagName, WriteMode};
use crate::error::{FlowtestError, Result};
use crate::git::Repository;
use crate::ui;
use crate::workflow::plan::{Plan, Stage};

/// What a completed run did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Number of stages that ran to completion
    pub stages_completed: usize,
    /// Tags created, in creation order
    pub tags: Vec<String>,
    /// Local branches removed by pruning
    pub pruned: Vec<String>,
    /// Output of the final log stage
    pub log: Option<String>,
}

/// Executes a [Plan] step by step against a [Repository].
///
/// The runner is the only place that knows which branches exist and how each
/// one is synchronized. It stops at the first failing step; nothing already
/// done is undone.
pub struct Runner<'a, R: Repository> {
    repo: &'a R,
    remote: String,
    script: String,
    progress: bool,
    branches: BTreeMap<String, Branch>,
    version_tag: Option<String>,
    report: RunReport,
}

impl<'a, R: Repository> Runner<'a, R> {
    pub fn new(repo: &'a R, remote: impl Into<String>) -> Self {
        Runner {
            repo,
            remote: remote.into(),
            script: String::new(),
            progress: true,
            branches: BTreeMap::new(),
            version_tag: None,
            report: RunReport::default(),
        }
    }

    /// Content stored by [Step::CopyScript]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// Turn console progress output on or off
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Run every stage of `plan` in order.
    pub fn run(mut self, plan: &Plan) -> Result<RunReport> {
        for stage in &plan.stages {
            self.run_stage(stage)
                .map_err(|e| e.in_stage(stage.number, &stage.title))?;
            self.report.stages_completed += 1;
        }
        Ok(self.report)
    }

    fn run_stage(&mut self, stage: &Stage) -> Result<()> {
        info!(stage = stage.number, title = %stage.title, "Starting stage");
        if self.progress {
            ui::display_stage(stage.number, &stage.title);
        }
        self.repo.begin_stage(stage.number, &stage.title)?;

        for step in &stage.steps {
            debug!(step = %step.describe(), "Running step");
            self.run_step(step)?;
            if self.progress {
                ui::display_step(&step.describe());
            }
        }
        Ok(())
    }

    fn run_step(&mut self, step: &Step) -> Result<()> {
        let repo = self.repo;
        let remote = self.remote.clone();
        let remote = remote.as_str();

        match step {
            Step::Init { trunk } => {
                repo.init(trunk)?;
                self.branches
                    .insert(trunk.clone(), Branch::tracked(trunk.clone()));
            }
            Step::SetConfig { key, value } => repo.set_config(key, value)?,
            Step::AddRemote { url } => repo.add_remote(remote, url)?,
            Step::WriteFile {
                path,
                content,
                mode,
            } => repo.write_file(path, content, *mode == WriteMode::Append)?,
            Step::CopyScript { path } => repo.copy_script(path, &self.script)?,
            Step::Stage { paths } => repo.stage(paths)?,
            Step::Commit { message } => repo.commit(message)?,
            Step::CreateBranch { branch, from } => {
                self.known(from)?;
                repo.create_branch(&branch.name, from)?;
                self.branches.insert(branch.name.clone(), branch.clone());
            }
            Step::Checkout { name } => {
                self.known(name)?;
                repo.checkout(name)?;
            }
            Step::Push {
                branch,
                set_upstream,
            } => {
                self.known(branch)?;
                repo.push(remote, branch, *set_upstream)?;
                if let Some(b) = self.branches.get_mut(branch) {
                    b.mark_tracked();
                }
            }
            Step::MergeNoFf { branch, message } => {
                self.known(branch)?;
                repo.merge_no_ff(branch, message)?;
            }
            Step::Sync { branch, from } => {
                let mode = self.known(branch)?.policy.pull_mode();
                debug!(branch = %branch, from = %from, mode = ?mode, "Synchronizing branch");
                repo.pull(remote, from, mode)?;
            }
            Step::DeleteBranch { name } => {
                let tracked = self.known(name)?.is_tracked();
                if tracked {
                    repo.delete_remote_branch(remote, name)?;
                }
                repo.delete_local_branch(name, false)?;
                self.branches.remove(name);
            }
            Step::Tag { name, message } => {
                let name = self.resolve_tag(name)?;
                if self.branches.contains_key(&name) {
                    return Err(FlowtestError::TagCollision(name));
                }
                repo.create_tag(&name, message)?;
                self.report.tags.push(name);
            }
            Step::PushTag { name } => {
                let name = self.resolve_tag(name)?;
                repo.push_tag(remote, &name)?;
            }
            Step::Prune => {
                repo.fetch_prune(remote)?;
                for name in repo.stale_branches(remote)? {
                    repo.delete_local_branch(&name, true)?;
                    self.branches.remove(&name);
                    self.report.pruned.push(name);
                }
            }
            Step::Log => {
                let graph = repo.log_graph()?;
                if self.progress {
                    ui::display_log(&graph);
                }
                self.report.log = Some(graph);
            }
        }
        Ok(())
    }

    fn known(&self, name: &str) -> Result<&Branch> {
        self.branches
            .get(name)
            .ok_or_else(|| FlowtestError::UnknownBranch(name.to_string()))
    }

    /// The version tag is resolved once and reused for its push.
    fn resolve_tag(&mut self, name: &TagName) -> Result<String> {
        match name {
            TagName::Literal(name) => Ok(name.clone()),
            TagName::GitVersion => {
                if let Some(existing) = &self.version_tag {
                    return Ok(existing.clone());
                }
                let resolved = self.repo.version_tag()?;
                self.version_tag = Some(resolved.clone());
                Ok(resolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::git::MockRepository;
    use crate::workflow::plan::{self, MERGED_BRANCHES};

    fn run_default(repo: &MockRepository) -> Result<RunReport> {
        let plan = plan::build(&Config::default());
        Runner::new(repo, "origin")
            .with_script("#!/bin/sh\n")
            .with_progress(false)
            .run(&plan)
    }

    fn single_stage(steps: Vec<Step>) -> Plan {
        Plan {
            stages: vec![Stage {
                number: 1,
                title: "test".to_string(),
                steps,
            }],
        }
    }

    #[test]
    fn test_full_plan_completes() {
        let repo = MockRepository::new();
        let report = run_default(&repo).unwrap();

        assert_eq!(report.stages_completed, 10);
        assert_eq!(
            report.tags,
            vec!["git-2.39.2", "license", "copyright", "collaborators", "echo-script"]
        );
        assert!(report.pruned.is_empty());
        assert!(report.log.is_some());
        assert_eq!(repo.file("flowtest.sh").as_deref(), Some("#!/bin/sh\n"));
    }

    #[test]
    fn test_tags_created_after_branch_deleted_everywhere() {
        let repo = MockRepository::new();
        run_default(&repo).unwrap();

        for name in MERGED_BRANCHES {
            let remote_delete = repo
                .position(&format!("git push origin --delete {}", name))
                .unwrap();
            let local_delete = repo.position(&format!("git branch -d {}", name)).unwrap();
            let tag = repo
                .calls()
                .iter()
                .position(|c| c.starts_with(&format!("git tag -a {} ", name)))
                .unwrap();
            assert!(remote_delete < local_delete && local_delete < tag, "{}", name);
        }
    }

    #[test]
    fn test_sync_policy_follows_push_history() {
        let repo = MockRepository::new();
        run_default(&repo).unwrap();
        let calls = repo.calls();

        let pulls: Vec<&String> = calls.iter().filter(|c| c.starts_with("git pull")).collect();
        assert_eq!(
            pulls,
            vec![
                "git pull --no-rebase --ff --no-edit origin master",
                "git pull --rebase origin master",
                "git pull --no-rebase --ff --no-edit origin master",
            ]
        );

        let rebase = repo.position("git pull --rebase origin master").unwrap();
        let first_push = repo.position("git push -u origin collaborators").unwrap();
        assert!(rebase < first_push);
        assert!(!calls.contains(&"git push origin collaborators".to_string()));
    }

    #[test]
    fn test_version_tag_resolved_once() {
        let repo = MockRepository::new().with_version("git version 2.45.1");
        run_default(&repo).unwrap();
        assert!(repo.position("git tag -a git-2.45.1 -m Repository created").is_some());
        assert!(repo.position("git push origin tag git-2.45.1").is_some());
    }

    #[test]
    fn test_first_failure_aborts_run() {
        let repo = MockRepository::new().fail_on("git merge --no-ff -m Merge branch 'copyright'");
        let err = run_default(&repo).unwrap_err();

        match &err {
            FlowtestError::Stage { number, source, .. } => {
                assert_eq!(*number, 6);
                assert!(matches!(**source, FlowtestError::CommandFailed { .. }));
            }
            other => panic!("unexpected error: {}", other),
        }

        let calls = repo.calls();
        assert!(calls.last().unwrap().starts_with("git merge --no-ff"));
        assert!(repo.position("git push origin --delete copyright").is_none());
        assert!(repo.position("git pull --rebase origin master").is_none());
    }

    #[test]
    fn test_tag_colliding_with_live_branch_is_rejected() {
        let repo = MockRepository::new();
        let plan = single_stage(vec![
            Step::Init {
                trunk: "master".to_string(),
            },
            Step::CreateBranch {
                branch: Branch::tracked("license"),
                from: "master".to_string(),
            },
            Step::Tag {
                name: TagName::literal("license"),
                message: "too early".to_string(),
            },
        ]);

        let err = Runner::new(&repo, "origin")
            .with_progress(false)
            .run(&plan)
            .unwrap_err();
        assert!(err.to_string().contains("collide"));
        assert!(repo.calls().iter().all(|c| !c.starts_with("git tag")));
    }

    #[test]
    fn test_unknown_branch_is_rejected() {
        let repo = MockRepository::new();
        let plan = single_stage(vec![Step::Checkout {
            name: "nowhere".to_string(),
        }]);

        let err = Runner::new(&repo, "origin")
            .with_progress(false)
            .run(&plan)
            .unwrap_err();
        assert!(err.to_string().contains("Unknown branch: nowhere"));
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_local_only_branch_is_not_deleted_remotely() {
        let repo = MockRepository::new();
        let plan = single_stage(vec![
            Step::Init {
                trunk: "master".to_string(),
            },
            Step::CreateBranch {
                branch: Branch::untracked("scratch"),
                from: "master".to_string(),
            },
            Step::Checkout {
                name: "master".to_string(),
            },
            Step::DeleteBranch {
                name: "scratch".to_string(),
            },
        ]);

        Runner::new(&repo, "origin")
            .with_progress(false)
            .run(&plan)
            .unwrap();
        assert!(repo.position("git branch -d scratch").is_some());
        assert!(repo.calls().iter().all(|c| !c.contains("--delete")));
    }

    #[test]
    fn test_prune_deletes_stale_branches() {
        let repo = MockRepository::new().with_stale_branches(&["old-feature"]);
        let report = run_default(&repo).unwrap();

        assert_eq!(report.pruned, vec!["old-feature"]);
        let fetch = repo.position("git fetch --prune origin").unwrap();
        let delete = repo.position("git branch -D old-feature").unwrap();
        assert!(fetch < delete);
    }
}
