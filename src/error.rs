use thiserror::Error;

/// Unified error type for flowtest operations
#[derive(Error, Debug)]
pub enum FlowtestError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Command `git {command}` failed with exit code {}: {stderr}", exit_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Stage {number} ({title}) failed: {source}")]
    Stage {
        number: usize,
        title: String,
        #[source]
        source: Box<FlowtestError>,
    },

    #[error("Tag '{0}' would collide with a live branch of the same name")]
    TagCollision(String),

    #[error("Unknown branch: {0}")]
    UnknownBranch(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Working directory error: {0}")]
    Workdir(String),

    #[error("Cannot parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

/// Convenience type alias for Results in flowtest
pub type Result<T> = std::result::Result<T, FlowtestError>;

impl FlowtestError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        FlowtestError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        FlowtestError::Version(msg.into())
    }

    /// Create a working directory error with context
    pub fn workdir(msg: impl Into<String>) -> Self {
        FlowtestError::Workdir(msg.into())
    }

    /// Wrap an error with the stage that produced it
    pub fn in_stage(self, number: usize, title: impl Into<String>) -> Self {
        FlowtestError::Stage {
            number,
            title: title.into(),
            source: Box::new(self),
        }
    }
}
