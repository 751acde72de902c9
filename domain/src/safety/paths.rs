//! Path resolution for tool arguments and the path rules.

use std::path::{Component, Path, PathBuf};

/// Resolve `raw` against `working_dir` and normalize `.` / `..` lexically.
///
/// The filesystem is never consulted, so the result is stable for paths
/// that do not exist yet (e.g. the target of a write).
pub fn resolve_path(working_dir: &Path, raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw.is_empty() {
        return normalize(working_dir);
    }
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        normalize(candidate)
    } else {
        normalize(&working_dir.join(candidate))
    }
}

/// Follow symlinks in the longest existing ancestor of `path`, then
/// re-append the components that do not exist yet.
///
/// `path` must already be absolute and normalized. When no ancestor can be
/// resolved the path comes back unchanged.
pub fn resolve_existing(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Remove `.` components and fold `..` into its parent.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        let wd = Path::new("/work/app");
        assert_eq!(resolve_path(wd, "src/main.rs"), PathBuf::from("/work/app/src/main.rs"));
        assert_eq!(resolve_path(wd, "./a/../b.txt"), PathBuf::from("/work/app/b.txt"));
        assert_eq!(resolve_path(wd, ""), PathBuf::from("/work/app"));
    }

    #[test]
    fn test_parent_escapes_working_dir() {
        let wd = Path::new("/work/app");
        assert_eq!(resolve_path(wd, "../other/x"), PathBuf::from("/work/other/x"));
        assert_eq!(resolve_path(wd, "../../../.."), PathBuf::from("/"));
    }

    #[test]
    fn test_resolve_existing_keeps_missing_tail() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::create_dir(root.join("src")).unwrap();

        assert_eq!(
            resolve_existing(&root.join("src/new/file.rs")),
            root.join("src/new/file.rs")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_existing_follows_symlinked_ancestor() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join("real/inner")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        assert_eq!(
            resolve_existing(&root.join("link/inner/out.txt")),
            root.join("real/inner/out.txt")
        );
    }

    #[test]
    fn test_absolute_is_normalized() {
        let wd = Path::new("/work/app");
        assert_eq!(resolve_path(wd, "/etc/./ssh/../hosts"), PathBuf::from("/etc/hosts"));
    }
}
