pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod ui;
pub mod workflow;

pub use error::{FlowtestError, Result};
