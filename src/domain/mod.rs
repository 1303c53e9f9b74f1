//! Domain logic - branches, tags and the steps of a workflow, independent of
//! how git is actually invoked

pub mod branch;
pub mod step;
pub mod tag;

pub use branch::{Branch, PullMode, SyncPolicy};
pub use step::{Step, WriteMode};
pub use tag::TagName;
