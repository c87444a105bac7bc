use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

pub fn set_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("No such directory: {}", path.display()));
    }
    if !path.is_dir() {
        return Err(anyhow!("Not a directory: {}", path.display()));
    }
    std::env::set_current_dir(path)
        .with_context(|| format!("failed to change directory to {}", path.display()))
}

pub fn search_folder<F>(folder: &Path, validator: F) -> Option<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    validator(folder).then(|| folder.to_path_buf())
}

/// Collects every directory below `root`, down to `max_depth` levels, that
/// satisfies `validator`. Order follows directory iteration.
pub fn search_subfolders<F>(root: &Path, validator: F, max_depth: usize) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut results = Vec::new();
    let entries = fs::read_dir(root)
        .with_context(|| format!("failed to read directory {}", root.display()))?;
    collect_matches(entries, &validator, 1, max_depth, &mut results);
    Ok(results)
}

fn collect_matches<F>(
    entries: fs::ReadDir,
    validator: &F,
    depth: usize,
    max_depth: usize,
    results: &mut Vec<PathBuf>,
) where
    F: Fn(&Path) -> bool,
{
    if depth > max_depth {
        return;
    }

    for entry in entries.flatten() {
        let child = entry.path();
        if !child.is_dir() {
            continue;
        }
        if validator(&child) {
            results.push(child.clone());
        }
        if depth < max_depth {
            match fs::read_dir(&child) {
                Ok(nested) => collect_matches(nested, validator, depth + 1, max_depth, results),
                Err(err) => {
                    debug!(target: "djanbee.os", path = %child.display(), %err, "skipping unreadable directory");
                }
            }
        }
    }
}

pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}
