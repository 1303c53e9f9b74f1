use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flowtest::cli::orchestration::{self, WorkflowArgs, WorkflowResult};
use flowtest::ui;

#[derive(clap::Parser)]
#[command(
    name = "flowtest",
    version,
    about = "Build a demonstration repository for a merge/rebase/tag branching workflow"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Remote repository URL to publish to")]
    remote_url: Option<String>,

    #[arg(short, long, help = "Directory the repository is created in")]
    workdir: Option<PathBuf>,

    #[arg(long, help = "Print the workflow as a shell script without running it")]
    dry_run: bool,

    #[arg(short, long, help = "Log every git invocation")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("flowtest=debug")
    } else {
        EnvFilter::new("flowtest=warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let workflow_args = WorkflowArgs {
        config_path: args.config,
        remote_url: args.remote_url,
        workdir: args.workdir,
        dry_run: args.dry_run,
        progress: !args.dry_run,
    };

    match orchestration::run_workflow(workflow_args) {
        Ok(WorkflowResult::Rendered(script)) => {
            print!("{}", script);
        }
        Ok(WorkflowResult::Completed(report)) => {
            ui::display_summary(&report);
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}
