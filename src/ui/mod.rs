//! User interface module.
//!
//! flowtest never prompts; everything here is output. Formatting lives in
//! [formatter] and is re-exported for convenience.

pub mod formatter;

pub use formatter::{
    display_error, display_log, display_stage, display_status, display_step, display_success,
    display_summary, format_summary,
};
