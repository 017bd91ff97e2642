//! Custom error types for manifest loading, subprocess execution, and
//! asset downloads.
use std::path::PathBuf;
use thiserror::Error;

use crate::exec::CommandStatus;

/// Main error type for release tool operations.
#[derive(Error, Debug)]
pub enum ReleaseToolError {
    // Manifest errors
    #[error("manifest file not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest is not valid JSON: {0}")]
    ManifestParse(#[from] serde_json::Error),

    #[error("manifest must be a JSON object mapping asset names to paths")]
    ManifestNotAMapping,

    #[error("manifest entry \"{0}\" must map to a file path string")]
    ManifestEntryNotAString(String),

    #[error("path references ${0} but it is not set in the environment")]
    MissingEnvVar(&'static str),

    // Subprocess errors
    #[error("failed to run {program}: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    CommandFailed {
        command: String,
        status: CommandStatus,
    },

    // Download errors
    #[error("GET {url} returned status {status}")]
    DownloadFailed { url: String, status: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        let err = ReleaseToolError::ManifestNotFound(PathBuf::from(
            "uploads.json",
        ));
        assert_eq!(err.to_string(), "manifest file not found: uploads.json");

        let err =
            ReleaseToolError::ManifestEntryNotAString("module.tgz".into());
        assert_eq!(
            err.to_string(),
            "manifest entry \"module.tgz\" must map to a file path string"
        );

        let err = ReleaseToolError::DownloadFailed {
            url: "https://example.com/a.tgz".into(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "GET https://example.com/a.tgz returned status 404"
        );
    }

    #[test]
    fn command_failed_includes_status() {
        let err = ReleaseToolError::CommandFailed {
            command: "git tag v1.0".into(),
            status: CommandStatus::new(Some(128)),
        };
        assert_eq!(err.to_string(), "git tag v1.0 exited with exit code 128");
    }
}
