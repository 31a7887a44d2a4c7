//! Path resolution
//!
//! Pure path arithmetic for the virtual tree. Client paths are always
//! absolute with forward separators; store paths are re-rooted under the
//! session root after `.` and `..` segments collapse, so a request can
//! never climb above the root. No filesystem is consulted.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// A requested path resolved against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Protocol-visible path, rooted at `/`.
    pub client_path: String,
    /// Backing path, confined under the session root.
    pub store_path: PathBuf,
}

/// Resolves `requested` against the session `cwd` and re-roots the result
/// under `root`.
pub fn resolve(root: &Path, cwd: &str, requested: &str) -> ResolvedPath {
    let client_path = resolve_client_path(cwd, requested);
    let store_path = to_store_path(root, &client_path);
    ResolvedPath {
        client_path,
        store_path,
    }
}

/// Normalizes a requested path to an absolute client path. Backslashes are
/// treated as separators so Windows clients resolve the same way.
pub(crate) fn resolve_client_path(cwd: &str, requested: &str) -> String {
    let requested = requested.replace('\\', "/");

    let joined = if requested.starts_with('/') {
        requested
    } else {
        format!("{}/{}", cwd.trim_end_matches('/'), requested)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn to_store_path(root: &Path, client_path: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in client_path.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

/// Collision-resistant identifier for temporary transfer names.
pub fn unique_name() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/ftp")
    }

    #[test]
    fn relative_paths_join_the_cwd() {
        let resolved = resolve(&root(), "/inbox", "data.bin");
        assert_eq!(resolved.client_path, "/inbox/data.bin");
        assert_eq!(resolved.store_path, PathBuf::from("/srv/ftp/inbox/data.bin"));
    }

    #[test]
    fn absolute_paths_ignore_the_cwd() {
        let resolved = resolve(&root(), "/inbox", "/outbox/data.bin");
        assert_eq!(resolved.client_path, "/outbox/data.bin");
        assert_eq!(resolved.store_path, PathBuf::from("/srv/ftp/outbox/data.bin"));
    }

    #[test]
    fn parent_traversal_cannot_escape_the_root() {
        for requested in ["../../etc/passwd", "/../etc/passwd", "a/../../../../x"] {
            let resolved = resolve(&root(), "/", requested);
            assert!(
                resolved.store_path.starts_with(root()),
                "{} escaped to {}",
                requested,
                resolved.store_path.display()
            );
        }
    }

    #[test]
    fn traversal_collapses_before_rooting() {
        let resolved = resolve(&root(), "/a/b", "../c");
        assert_eq!(resolved.client_path, "/a/c");
        assert_eq!(resolved.store_path, PathBuf::from("/srv/ftp/a/c"));
    }

    #[test]
    fn backslashes_normalize_to_forward_separators() {
        let resolved = resolve(&root(), "/", "dir\\file.txt");
        assert_eq!(resolved.client_path, "/dir/file.txt");
    }

    #[test]
    fn dot_segments_and_empty_segments_collapse() {
        let resolved = resolve(&root(), "/", "./a//b/./c");
        assert_eq!(resolved.client_path, "/a/b/c");
    }

    #[test]
    fn empty_request_resolves_to_the_cwd() {
        let resolved = resolve(&root(), "/inbox", "");
        assert_eq!(resolved.client_path, "/inbox");
    }

    #[test]
    fn resolution_is_idempotent() {
        let first = resolve(&root(), "/inbox", "a/../b/c.txt");
        let second = resolve(&root(), "/inbox", &first.client_path);
        assert_eq!(first, second);
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve(&root(), "/in", "x/y.bin");
        let b = resolve(&root(), "/in", "x/y.bin");
        assert_eq!(a, b);
    }

    #[test]
    fn unique_names_do_not_collide() {
        let a = unique_name();
        let b = unique_name();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
