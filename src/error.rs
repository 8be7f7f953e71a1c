use std::process::ExitCode;

/// Errors that cause steer to exit with a specific code.
#[derive(Debug, thiserror::Error)]
pub enum ExitError {
    #[error("config error: {0}")]
    Config(String),

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("{0}")]
    Other(String),
}

impl ExitError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::from(2),
            Self::NotFound { .. } => ExitCode::from(3),
            Self::Other(_) => ExitCode::from(1),
        }
    }
}

impl From<crate::intent::ConfigError> for ExitError {
    fn from(err: crate::intent::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
