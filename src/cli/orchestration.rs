//! Main workflow orchestration logic
//!
//! Resolves configuration, checks the working directory, and either renders
//! or runs the workflow. `main` only parses arguments and reports results.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{self, Config};
use crate::error::{FlowtestError, Result};
use crate::git::GitCli;
use crate::ui;
use crate::workflow::{self, plan, RunReport, Runner};

/// Arguments for the workflow
///
/// Mirrors the CLI flags without depending on clap, so the workflow can be
/// called programmatically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Overrides the configured remote URL
    pub remote_url: Option<String>,

    /// Overrides the configured working directory
    pub workdir: Option<PathBuf>,

    /// Render the workflow as a shell script instead of running it
    pub dry_run: bool,

    /// Print stage and step progress
    pub progress: bool,
}

/// Result of a successful workflow invocation
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    /// The shell script a dry run produced
    Rendered(String),

    /// What a real run did
    Completed(RunReport),
}

/// Apply command line overrides on top of the loaded configuration.
pub fn resolve_config(args: &WorkflowArgs) -> Result<Config> {
    let mut config = config::load_config(args.config_path.as_deref())?;

    if let Some(url) = &args.remote_url {
        config.remote_url = url.clone();
    }
    if let Some(workdir) = &args.workdir {
        config.workdir = workdir.clone();
    }

    if config.remote_url.trim().is_empty() {
        return Err(FlowtestError::config("remote_url must not be empty"));
    }
    if config.trunk.trim().is_empty() {
        return Err(FlowtestError::config("trunk must not be empty"));
    }
    Ok(config)
}

/// The demonstration repository is always created from scratch.
pub fn ensure_fresh_workdir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        return Err(FlowtestError::workdir(format!(
            "{} exists and is not a directory",
            path.display()
        )));
    }
    if fs::read_dir(path)?.next().is_some() {
        return Err(FlowtestError::workdir(format!(
            "{} is not empty",
            path.display()
        )));
    }
    Ok(())
}

/// Main workflow
///
/// 1. Resolve configuration
/// 2. Build the plan and render it as a script
/// 3. For a dry run, return the script
/// 4. Otherwise check the working directory and run every stage with git
pub fn run_workflow(args: WorkflowArgs) -> Result<WorkflowResult> {
    let config = resolve_config(&args)?;
    run_with_config(&config, args.dry_run, args.progress)
}

/// Same as [run_workflow] with an already resolved configuration
pub fn run_with_config(config: &Config, dry_run: bool, progress: bool) -> Result<WorkflowResult> {
    let plan = plan::build(config);
    let script = workflow::render_script(&plan, &config.remote)?;

    if dry_run {
        return Ok(WorkflowResult::Rendered(script));
    }

    ensure_fresh_workdir(&config.workdir)?;
    if progress {
        ui::display_status(&format!(
            "Building {} against {}",
            config.workdir.display(),
            config.remote_url
        ));
    }
    info!(
        workdir = %config.workdir.display(),
        remote = %config.remote_url,
        "Running workflow"
    );

    let git = GitCli::new(&config.workdir);
    let report = Runner::new(&git, config.remote.clone())
        .with_script(script)
        .with_progress(progress)
        .run(&plan)?;

    Ok(WorkflowResult::Completed(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_workdir_is_fresh() {
        let dir = TempDir::new().unwrap();
        assert!(ensure_fresh_workdir(&dir.path().join("new")).is_ok());
        assert!(ensure_fresh_workdir(dir.path()).is_ok());
    }

    #[test]
    fn test_non_empty_workdir_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "x").unwrap();
        let err = ensure_fresh_workdir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is not empty"));

        let err = ensure_fresh_workdir(&dir.path().join("README.md")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flowtest.toml");
        fs::write(&path, "remote_url = \"from-file\"\ntrunk = \"main\"\n").unwrap();

        let args = WorkflowArgs {
            config_path: Some(path.to_string_lossy().to_string()),
            remote_url: Some("from-flag".to_string()),
            workdir: Some(PathBuf::from("elsewhere")),
            ..WorkflowArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.remote_url, "from-flag");
        assert_eq!(config.trunk, "main");
        assert_eq!(config.workdir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_empty_remote_is_rejected() {
        let args = WorkflowArgs {
            remote_url: Some("  ".to_string()),
            ..WorkflowArgs::default()
        };
        assert!(matches!(resolve_config(&args), Err(FlowtestError::Config(_))));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let workdir = dir.path().join("flowtest");
        let config = Config {
            workdir: workdir.clone(),
            ..Config::default()
        };

        let result = run_with_config(&config, true, false).unwrap();
        match result {
            WorkflowResult::Rendered(script) => assert!(script.starts_with("#!/bin/sh")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!workdir.exists());
    }
}
