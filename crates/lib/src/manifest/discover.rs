//! Manifest discovery.

use std::cmp::Ordering;
use std::path::PathBuf;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::consts::MANIFEST_SUFFIX;

use super::EvalError;

/// Every manifest under `roots`, in evaluation order.
///
/// Within a directory, manifests come before anything found in its
/// subdirectories; siblings are ordered by file name. Hidden directories are
/// skipped. A root may itself be a manifest file.
pub fn discover_manifests(roots: &[PathBuf]) -> Result<Vec<PathBuf>, EvalError> {
  let mut manifests = Vec::new();

  for root in roots {
    let walker = WalkDir::new(root)
      .follow_links(true)
      .sort_by(files_first)
      .into_iter()
      .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
      let entry = entry?;
      if entry.file_type().is_file() && is_manifest(&entry) {
        debug!(path = %entry.path().display(), "discovered manifest");
        manifests.push(entry.into_path());
      }
    }
  }

  Ok(manifests)
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
  a.file_type()
    .is_dir()
    .cmp(&b.file_type().is_dir())
    .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_hidden(entry: &DirEntry) -> bool {
  entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn is_manifest(entry: &DirEntry) -> bool {
  entry
    .file_name()
    .to_str()
    .is_some_and(|name| name.len() > MANIFEST_SUFFIX.len() && name.ends_with(MANIFEST_SUFFIX))
}
