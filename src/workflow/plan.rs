//! The fixed sequence of stages the workflow demonstrates.

use crate::config::Config;
use crate::domain::{Branch, Step, TagName, WriteMode};

pub const README: &str = "README.md";
pub const SCRIPT: &str = "flowtest.sh";
pub const HELLO: &str = "hello.sh";
pub const COLLABORATORS: &str = "COLLABORATORS";
pub const LICENSE: &str = "LICENSE";
pub const COPYRIGHT: &str = "COPYRIGHT";

/// Branches that end up merged into the trunk, in merge order
pub const MERGED_BRANCHES: [&str; 4] = ["license", "copyright", "collaborators", "echo-script"];

const README_CONTENT: &str = "# flowtest

Demonstrates a branching workflow:

- the trunk is always shippable;
- pushed branches are synchronized with the trunk by merging;
- local-only branches are synchronized with the trunk by rebasing;
- finished branches are merged with --no-ff, deleted, and replaced by an
  annotated tag of the same name.
";

const HELLO_V1: &str = "#!/bin/sh\necho hello\n";
const HELLO_V2: &str = "#!/bin/sh\necho hello $@\n";
const HELLO_V3: &str = "#!/bin/sh\n# say hello to every argument\necho hello $@\n";

const LICENSE_CONTENT: &str = "Licensed under the Apache License, Version 2.0.\n";
const COPYRIGHT_CONTENT: &str = "Copyright (c) the flowtest authors.\n";

/// A numbered group of steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub number: usize,
    pub title: String,
    pub steps: Vec<Step>,
}

/// An ordered list of stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub stages: Vec<Stage>,
}

impl Plan {
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.stages.iter().flat_map(|stage| stage.steps.iter())
    }
}

fn write(path: &str, content: &str) -> Step {
    Step::WriteFile {
        path: path.to_string(),
        content: content.to_string(),
        mode: WriteMode::Create,
    }
}

fn append(path: &str, content: &str) -> Step {
    Step::WriteFile {
        path: path.to_string(),
        content: content.to_string(),
        mode: WriteMode::Append,
    }
}

fn stage(paths: &[&str]) -> Step {
    Step::Stage {
        paths: paths.iter().map(|p| p.to_string()).collect(),
    }
}

fn commit(message: &str) -> Step {
    Step::Commit {
        message: message.to_string(),
    }
}

fn checkout(name: &str) -> Step {
    Step::Checkout {
        name: name.to_string(),
    }
}

fn push(branch: &str, set_upstream: bool) -> Step {
    Step::Push {
        branch: branch.to_string(),
        set_upstream,
    }
}

fn sync(branch: &str, trunk: &str) -> Step {
    Step::Sync {
        branch: branch.to_string(),
        from: trunk.to_string(),
    }
}

/// Steps shared by every branch that gets merged: merge into the trunk with
/// a visible merge commit, publish the trunk, then swap the branch for a tag.
/// The branch is gone everywhere before the tag is created.
pub fn finish_branch(name: &str, trunk: &str) -> Vec<Step> {
    vec![
        checkout(trunk),
        Step::MergeNoFf {
            branch: name.to_string(),
            message: format!("Merge branch '{}' into {}", name, trunk),
        },
        push(trunk, false),
        Step::DeleteBranch {
            name: name.to_string(),
        },
        Step::Tag {
            name: TagName::literal(name),
            message: format!("Branch '{}' merged into {}", name, trunk),
        },
        Step::PushTag {
            name: TagName::literal(name),
        },
    ]
}

/// A branch created from the trunk, pushed, given one file, and merged back
fn short_lived_branch(name: &str, path: &str, content: &str, trunk: &str) -> Vec<Step> {
    let mut steps = vec![
        Step::CreateBranch {
            branch: Branch::tracked(name),
            from: trunk.to_string(),
        },
        push(name, true),
        write(path, content),
        stage(&[path]),
        commit(&format!("Add {}", path)),
        push(name, false),
    ];
    steps.extend(finish_branch(name, trunk));
    steps
}

/// Build the full workflow for `config`.
pub fn build(config: &Config) -> Plan {
    let trunk = config.trunk.as_str();
    let mut stages = Vec::new();

    let mut init = vec![Step::Init {
        trunk: trunk.to_string(),
    }];
    init.extend(config.git_config.iter().map(|(key, value)| Step::SetConfig {
        key: key.clone(),
        value: value.clone(),
    }));
    init.extend([
        Step::AddRemote {
            url: config.remote_url.clone(),
        },
        write(README, README_CONTENT),
        Step::CopyScript {
            path: SCRIPT.to_string(),
        },
        stage(&[README, SCRIPT]),
        commit("Initial commit"),
        push(trunk, true),
        Step::Tag {
            name: TagName::GitVersion,
            message: "Repository created".to_string(),
        },
        Step::PushTag {
            name: TagName::GitVersion,
        },
    ]);
    stages.push(("Initialize the repository", init));

    stages.push((
        "Start tracked branch echo-script",
        vec![
            Step::CreateBranch {
                branch: Branch::tracked("echo-script"),
                from: trunk.to_string(),
            },
            push("echo-script", true),
            write(HELLO, HELLO_V1),
            stage(&[HELLO]),
            commit("Add hello.sh"),
            push("echo-script", false),
        ],
    ));

    stages.push((
        "Start untracked branch collaborators",
        vec![
            Step::CreateBranch {
                branch: Branch::untracked("collaborators"),
                from: trunk.to_string(),
            },
            write(COLLABORATORS, "legdba\n"),
            stage(&[COLLABORATORS]),
            commit("Add legdba to collaborators"),
        ],
    ));

    stages.push((
        "Merge branch license",
        short_lived_branch("license", LICENSE, LICENSE_CONTENT, trunk),
    ));

    stages.push((
        "Synchronize tracked branch echo-script",
        vec![
            checkout("echo-script"),
            write(HELLO, HELLO_V2),
            stage(&[HELLO]),
            commit("Pass arguments to hello"),
            push("echo-script", false),
            sync("echo-script", trunk),
        ],
    ));

    stages.push((
        "Merge branch copyright",
        short_lived_branch("copyright", COPYRIGHT, COPYRIGHT_CONTENT, trunk),
    ));

    let mut collaborators = vec![
        checkout("collaborators"),
        append(COLLABORATORS, "vbo\n"),
        stage(&[COLLABORATORS]),
        commit("Add vbo to collaborators"),
        sync("collaborators", trunk),
        push("collaborators", true),
    ];
    collaborators.extend(finish_branch("collaborators", trunk));
    stages.push(("Rebase and merge untracked branch collaborators", collaborators));

    let mut echo_script = vec![
        checkout("echo-script"),
        write(HELLO, HELLO_V3),
        stage(&[HELLO]),
        commit("Document hello.sh"),
        push("echo-script", false),
        sync("echo-script", trunk),
        push("echo-script", false),
    ];
    echo_script.extend(finish_branch("echo-script", trunk));
    stages.push(("Merge tracked branch echo-script", echo_script));

    stages.push(("Prune branches deleted on the remote", vec![Step::Prune]));
    stages.push(("Show history", vec![Step::Log]));

    Plan {
        stages: stages
            .into_iter()
            .enumerate()
            .map(|(i, (title, steps))| Stage {
                number: i + 1,
                title: title.to_string(),
                steps,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(plan: &Plan, wanted: &Step) -> usize {
        plan.steps()
            .position(|s| s == wanted)
            .unwrap_or_else(|| panic!("step not in plan: {:?}", wanted))
    }

    #[test]
    fn test_ten_stages_in_order() {
        let plan = build(&Config::default());
        assert_eq!(plan.stages.len(), 10);
        for (i, stage) in plan.stages.iter().enumerate() {
            assert_eq!(stage.number, i + 1);
            assert!(!stage.steps.is_empty());
        }
        assert_eq!(plan.stages[8].steps, vec![Step::Prune]);
        assert_eq!(plan.stages[9].steps, vec![Step::Log]);
    }

    #[test]
    fn test_four_no_ff_merges() {
        let plan = build(&Config::default());
        let merged: Vec<&str> = plan
            .steps()
            .filter_map(|s| match s {
                Step::MergeNoFf { branch, .. } => Some(branch.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(merged, MERGED_BRANCHES.to_vec());
    }

    #[test]
    fn test_tag_follows_branch_deletion() {
        let plan = build(&Config::default());
        for name in MERGED_BRANCHES {
            let deleted = index_of(
                &plan,
                &Step::DeleteBranch {
                    name: name.to_string(),
                },
            );
            let tagged = plan
                .steps()
                .position(|s| matches!(s, Step::Tag { name: TagName::Literal(n), .. } if n == name))
                .unwrap();
            assert!(deleted < tagged, "{} tagged before deletion", name);
        }
    }

    #[test]
    fn test_collaborators_stays_local_until_synced() {
        let plan = build(&Config::default());
        let created = plan
            .steps()
            .position(|s| matches!(s, Step::CreateBranch { branch, .. } if branch.name == "collaborators"))
            .unwrap();
        let synced = index_of(&plan, &sync("collaborators", "master"));
        let first_push = index_of(&plan, &push("collaborators", true));
        assert!(created < synced && synced < first_push);

        assert!(matches!(
            &plan.stages[2].steps[0],
            Step::CreateBranch { branch, .. } if !branch.is_tracked()
        ));
    }

    #[test]
    fn test_git_config_applied_after_init() {
        let plan = build(&Config::default());
        let init = &plan.stages[0].steps;
        assert!(matches!(&init[0], Step::Init { trunk } if trunk == "master"));
        assert!(init[1..5].iter().all(|s| matches!(s, Step::SetConfig { .. })));
    }

    #[test]
    fn test_custom_trunk_is_used_everywhere() {
        let config = Config {
            trunk: "main".to_string(),
            ..Config::default()
        };
        let plan = build(&config);
        assert!(plan.steps().all(|s| match s {
            Step::Sync { from, .. } | Step::CreateBranch { from, .. } => from == "main",
            Step::Checkout { name } => name != "master",
            _ => true,
        }));
    }

    #[test]
    fn test_final_hello_has_comment_then_echo() {
        let lines: Vec<&str> = HELLO_V3.lines().collect();
        assert_eq!(lines.last(), Some(&"echo hello $@"));
        assert!(lines[lines.len() - 2].starts_with('#'));
    }
}
