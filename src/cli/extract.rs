use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use url::Url;

use crate::TRACING_TARGET_EXTRACT;

/// Outcome of [write_files].
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Summary {
    pub extracted: usize,
    pub skipped: usize,
}

/// Removes `output` and everything below it, if it exists.
pub async fn clear(output: &Path) -> anyhow::Result<()> {
    match tokio::fs::remove_dir_all(output).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e)
            .with_context(|| format!("failed to remove output directory {}", output.display())),
        _ => Ok(()),
    }
}

/// Writes each `(source, content)` pair below `output`.
///
/// Sources with a query component, and sources that do not name a file, are
/// skipped. Missing content is written as an empty file.
pub async fn write_files(files: &[(&str, Option<&str>)], output: &Path) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();

    for &(source, content) in files {
        let Some(relative) = output_path(source) else {
            tracing::debug!(target: TRACING_TARGET_EXTRACT, source, "skipped");
            summary.skipped += 1;
            continue;
        };

        let path = output.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        tokio::fs::write(&path, content.unwrap_or_default())
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::debug!(
            target: TRACING_TARGET_EXTRACT,
            source,
            path = %path.display(),
            embedded = content.is_some(),
            "extracted"
        );
        summary.extracted += 1;
    }

    Ok(summary)
}

/// Maps a source identifier to a relative path, or `None` if it should be skipped.
///
/// URLs contribute their path component; anything else is used as a path.
/// `.` components are dropped and `..` never climbs above the root.
pub fn output_path(source: &str) -> Option<PathBuf> {
    if source.contains('?') {
        return None;
    }

    let parsed = Url::parse(source).ok().filter(|url| !url.cannot_be_a_base());
    let path = match &parsed {
        Some(url) => url.path(),
        None => source,
    };

    let mut components = Vec::new();
    for component in path.split(['/', '\\']) {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            component => components.push(component),
        }
    }

    if components.is_empty() {
        None
    } else {
        Some(components.iter().collect())
    }
}
