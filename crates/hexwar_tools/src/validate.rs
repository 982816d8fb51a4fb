//! Data validation utilities.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use hexwar_core::data::EnvironmentData;
use tracing::{debug, warn};

use crate::error::{Result, ToolError};

/// Environment files that loaded cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Loaded definitions by id.
    pub environments: BTreeMap<String, EnvironmentData>,
}

impl ValidationReport {
    /// Number of files checked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// No files were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

/// Validate all RON environment files in a directory.
///
/// Files are read in name order. Every failing file is reported, not just
/// the first.
///
/// # Errors
///
/// Returns [`ToolError::Io`] if the directory cannot be listed and
/// [`ToolError::Invalid`] if any file fails to parse, fails range checks
/// or reuses an id.
pub fn validate_data_directory(path: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();
    let mut failures = Vec::new();

    for file in ron_files(path)? {
        let label = file.display().to_string();
        let text = std::fs::read_to_string(&file).map_err(|source| ToolError::Io {
            path: label.clone(),
            source,
        })?;
        match EnvironmentData::from_ron(&label, &text) {
            Ok(data) => {
                if report.environments.contains_key(&data.id) {
                    warn!(path = %label, id = %data.id, "duplicate environment id");
                    failures.push(format!("{label}: duplicate id '{}'", data.id));
                } else {
                    debug!(path = %label, id = %data.id, "environment loaded");
                    report.environments.insert(data.id.clone(), data);
                }
            }
            Err(e) => {
                warn!(path = %label, error = %e, "environment rejected");
                failures.push(e.to_string());
            }
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(ToolError::Invalid { failures })
    }
}

fn ron_files(path: &Path) -> Result<Vec<PathBuf>> {
    let io_error = |source| ToolError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_error)? {
        let file = entry.map_err(io_error)?.path();
        if file.extension().is_some_and(|ext| ext == "ron") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}
