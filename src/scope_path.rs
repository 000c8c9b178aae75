use std::path::Path;

pub fn normalize(path: &str) -> String {
    let mut normalized = path.trim().replace('\\', "/");
    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

fn is_windows_style(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic()
}

/// True when `path` equals `root` or lies beneath it. Comparison is textual on
/// normalized separators; drive-letter paths compare case-insensitively.
pub fn is_within_scope(path: &str, root: &str) -> bool {
    let path = normalize(path);
    let root = normalize(root);

    if root == "/" {
        return path.starts_with('/');
    }

    if is_windows_style(&root) || cfg!(windows) {
        let path_lower = path.to_ascii_lowercase();
        let root_lower = root.to_ascii_lowercase();
        return path_lower == root_lower || path_lower.starts_with(&(root_lower + "/"));
    }

    path == root || path.starts_with(&(root + "/"))
}

/// Containment check on real paths; both sides are canonicalized when they
/// exist so `a/../b` and symlinked spellings compare equal.
pub fn path_within(path: &Path, root: &Path) -> bool {
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    is_within_scope(&path.to_string_lossy(), &root.to_string_lossy())
}
