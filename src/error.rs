use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop a run before any file is moved
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("target path {path} {reason}")]
    TargetPath { path: PathBuf, reason: String },

    #[error("failed to read user input: {0}")]
    Prompt(String),
}

impl OrganizeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn prompt(err: impl std::fmt::Display) -> Self {
        Self::Prompt(err.to_string())
    }

    /// True for errors caused by a bad configuration file
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type OrganizeResult<T> = std::result::Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = OrganizeError::config("missing rule \"images\"");
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "configuration error: missing rule \"images\""
        );
    }

    #[test]
    fn test_target_path_error_display() {
        let err = OrganizeError::TargetPath {
            path: PathBuf::from("/nope"),
            reason: "does not exist".to_string(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "target path /nope does not exist");
    }

    #[test]
    fn test_prompt_error_display() {
        let err = OrganizeError::prompt("not a terminal");
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "failed to read user input: not a terminal");
    }
}
