//! The branching workflow: which stages run, and how they are executed.

pub mod plan;
pub mod runner;

pub use plan::{Plan, Stage};
pub use runner::{RunReport, Runner};

use crate::error::Result;
use crate::git::ScriptRepository;

/// Render `plan` as the shell script that would perform it.
///
/// The plan is run through the same [Runner] as a real run, so branch
/// policies resolve identically.
pub fn render_script(plan: &Plan, remote: &str) -> Result<String> {
    let script = ScriptRepository::new();
    Runner::new(&script, remote)
        .with_progress(false)
        .run(plan)?;
    Ok(script.into_script())
}
