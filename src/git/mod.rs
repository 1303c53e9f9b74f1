//! Git operations abstraction layer
//!
//! The workflow runner drives git exclusively through the [Repository] trait.
//! The implementations are:
//!
//! - [cli::GitCli]: runs the real `git` executable in a working directory,
//!   using [repository::Git2Inspector] for structured queries
//! - [script::ScriptRepository]: renders every operation as a shell line
//! - [mock::MockRepository]: records invocations for testing
//!
//! All three derive their argument vectors from [command], so a rendered
//! script runs exactly what [cli::GitCli] would.

pub mod cli;
pub mod command;
pub mod mock;
pub mod repository;
pub mod script;

pub use cli::GitCli;
pub use mock::MockRepository;
pub use repository::Git2Inspector;
pub use script::ScriptRepository;

use crate::domain::{tag, PullMode};
use crate::error::Result;

/// Common git operation trait for abstraction
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`. Methods take `&self`; recording
/// implementations keep their state behind a lock.
///
/// ## Error Handling
///
/// Every method returns [crate::error::Result<T>]. A git process exiting with
/// a non-zero status maps to [crate::error::FlowtestError::CommandFailed].
pub trait Repository: Send + Sync {
    /// Raw output of `git --version`
    fn version(&self) -> Result<String>;

    /// Name of the tag that records which git version built the repository
    fn version_tag(&self) -> Result<String> {
        tag::version_tag_name(&self.version()?)
    }

    /// Marks the beginning of a stage. Only renderers care.
    fn begin_stage(&self, _number: usize, _title: &str) -> Result<()> {
        Ok(())
    }

    /// Create a repository whose unborn HEAD is `trunk`
    fn init(&self, trunk: &str) -> Result<()>;

    fn set_config(&self, key: &str, value: &str) -> Result<()>;

    fn add_remote(&self, remote: &str, url: &str) -> Result<()>;

    /// Write or append to a file relative to the working tree root
    fn write_file(&self, path: &str, content: &str, append: bool) -> Result<()>;

    /// Store the workflow script itself in the working tree
    fn copy_script(&self, path: &str, content: &str) -> Result<()>;

    fn stage(&self, paths: &[String]) -> Result<()>;

    fn commit(&self, message: &str) -> Result<()>;

    /// Create `name` starting at `from` and switch to it
    fn create_branch(&self, name: &str, from: &str) -> Result<()>;

    fn checkout(&self, name: &str) -> Result<()>;

    fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<()>;

    /// Merge `branch` into the current branch, always creating a merge commit
    fn merge_no_ff(&self, branch: &str, message: &str) -> Result<()>;

    /// Pull `branch` from `remote` into the current branch
    fn pull(&self, remote: &str, branch: &str, mode: PullMode) -> Result<()>;

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()>;

    fn delete_local_branch(&self, name: &str, force: bool) -> Result<()>;

    /// Create an annotated tag at HEAD
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;

    /// Fetch from `remote`, dropping remote-tracking refs that no longer exist
    fn fetch_prune(&self, remote: &str) -> Result<()>;

    /// Local branches whose configured upstream on `remote` is gone
    fn stale_branches(&self, remote: &str) -> Result<Vec<String>>;

    /// Decorated commit graph of every ref, for display only
    fn log_graph(&self) -> Result<String>;
}
