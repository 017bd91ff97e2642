//! Loading and resolution of upload/download manifests.
//!
//! A manifest is a UTF-8 file holding a single JSON object that maps
//! release-asset file names to local file-system paths, e.g.
//! `{"module.tgz": "$CTP7_MOD_ROOT/build/module.tgz"}`. Download
//! destinations may reference the `CTP7_MOD_ROOT` environment variable;
//! upload paths are always used verbatim.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ReleaseToolError;

/// Environment variable substituted into download destination paths.
pub const MOD_ROOT_VAR: &str = "CTP7_MOD_ROOT";

/// One manifest entry: a release-asset name and its local file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub path: String,
}

/// Ordered mapping of asset names to local paths, read once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ReleaseToolError> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReleaseToolError::ManifestNotFound(path.to_path_buf())
            } else {
                ReleaseToolError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&text)
    }

    /// Parse manifest text as a strict JSON object of string keys to
    /// string values. Entry order is preserved.
    pub fn parse(text: &str) -> Result<Self, ReleaseToolError> {
        let value: serde_json::Value = serde_json::from_str(text)?;

        let Some(object) = value.as_object() else {
            return Err(ReleaseToolError::ManifestNotAMapping);
        };

        let mut entries = Vec::with_capacity(object.len());

        for (key, value) in object {
            let Some(path) = value.as_str() else {
                return Err(ReleaseToolError::ManifestEntryNotAString(
                    key.clone(),
                ));
            };

            entries.push(ManifestEntry {
                name: key.clone(),
                path: path.to_string(),
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a download destination by replacing the `$CTP7_MOD_ROOT`
/// placeholder with the supplied root. Paths without the placeholder pass
/// through untouched; a placeholder with no root available is an error.
pub fn resolve_destination(
    path: &str,
    mod_root: Option<&str>,
) -> Result<PathBuf, ReleaseToolError> {
    let token = format!("${MOD_ROOT_VAR}");

    if !path.contains(&token) {
        return Ok(PathBuf::from(path));
    }

    let Some(root) = mod_root else {
        return Err(ReleaseToolError::MissingEnvVar(MOD_ROOT_VAR));
    };

    Ok(PathBuf::from(path.replace(&token, root)))
}
