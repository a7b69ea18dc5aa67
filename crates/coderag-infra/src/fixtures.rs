//! Fixture discovery and review-folder scanning.
//!
//! Fixtures live at `<root>/<kind>/<language>/<origin>/<n>.<ext>`. Review
//! runs write one folder per fixture file; the judge later scans for those
//! folders and reads their stage artifacts back.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use coderag_core::review::JudgeArtifacts;
use coderag_types::review::FixtureSet;

/// Directory holding one fixture set.
pub fn fixture_dir(root: &Path, set: &FixtureSet) -> PathBuf {
    root.join(set.kind.as_str())
        .join(&set.language)
        .join(set.origin.dir_name())
}

/// Regular files of a fixture set, ordered by natural numeric stem
/// (`1.py, 2.py, 10.py`). Non-numeric stems sort after numeric ones.
pub async fn discover(root: &Path, set: &FixtureSet) -> io::Result<Vec<PathBuf>> {
    let dir = fixture_dir(root, set);
    let mut entries = tokio::fs::read_dir(&dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort_by(|a, b| natural_cmp(a, b));
    tracing::debug!(dir = %dir.display(), count = files.len(), "discovered fixtures");
    Ok(files)
}

fn numeric_stem(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

fn natural_cmp(a: &Path, b: &Path) -> Ordering {
    match (numeric_stem(a), numeric_stem(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// All directories under `root` (inclusive) whose name contains `cot`, sorted.
pub async fn find_review_dirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        if dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains("cot"))
        {
            found.push(dir.clone());
        }

        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                pending.push(entry.path());
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Read the stage artifacts present in a review folder.
///
/// Missing files are skipped and logged; other IO errors propagate.
pub async fn read_judge_artifacts(dir: &Path) -> io::Result<JudgeArtifacts> {
    let mut artifacts = JudgeArtifacts::default();

    for stage in JudgeArtifacts::STAGES {
        let path = dir.join(stage.artifact_name());
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => artifacts.insert(stage, text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "missing review artifact");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(artifacts)
}
