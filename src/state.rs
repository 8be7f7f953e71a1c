//! Project state snapshot loading.

use std::path::Path;

use anyhow::Context;

use crate::intent::ProjectState;

/// Read a JSON project snapshot. A missing file is an uninitialized project.
pub fn load_state(path: &Path) -> anyhow::Result<ProjectState> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no state file, treating project as uninitialized");
        return Ok(ProjectState::default());
    }
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}
