use std::cmp::Ordering;
use std::fs::{self, Metadata};
use std::path::Path;

use crate::error::{AppError, IoResultExt};
use crate::models::file_entry::{DirectoryEntry, DirectorySummary, EntryKind, EntryProperties};

#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub show_hidden: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { show_hidden: true }
    }
}

pub fn list_directory(path: &Path) -> Result<Vec<DirectoryEntry>, AppError> {
    list_directory_with(path, ListOptions::default())
}

/// Lists the immediate children of `path`, folders first, each group sorted
/// case-insensitively by name.
pub fn list_directory_with(
    path: &Path,
    options: ListOptions,
) -> Result<Vec<DirectoryEntry>, AppError> {
    let metadata = fs::metadata(path).at(path)?;
    if !metadata.is_dir() {
        return Err(AppError::NotFound(path.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(path).at(path)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry in {}: {err}", path.display());
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if !options.show_hidden && name.starts_with('.') {
            continue;
        }
        entries.push(build_entry(&entry.path(), name));
    }

    sort_entries(&mut entries);
    log::debug!("listed {} entries in {}", entries.len(), path.display());
    Ok(entries)
}

fn build_entry(path: &Path, name: String) -> DirectoryEntry {
    // Follows symlinks; a dangling link falls back to an unsized file entry.
    let metadata = fs::metadata(path).ok();
    let is_directory = metadata.as_ref().is_some_and(Metadata::is_dir);

    let extension = if is_directory {
        None
    } else {
        Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().to_string())
    };
    let mime_type = extension
        .as_ref()
        .and_then(|ext| mime_guess::from_ext(ext).first())
        .map(|m| m.to_string());

    let size_bytes = match &metadata {
        Some(m) if !is_directory => Some(m.len()),
        _ => None,
    };

    DirectoryEntry {
        path: path.to_path_buf(),
        name,
        extension,
        mime_type,
        size_bytes,
        modified_at: metadata.as_ref().and_then(modified_rfc3339),
        is_directory,
    }
}

fn modified_rfc3339(metadata: &Metadata) -> Option<String> {
    metadata
        .modified()
        .ok()
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339())
}

pub fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        // Distinct non-UTF-8 names can share a lossy display name.
        .then_with(|| a.path.cmp(&b.path))
}

pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(compare_entries);
}

/// Case-insensitive substring match on entry names. An empty query keeps all.
pub fn filter_entries(entries: &[DirectoryEntry], query: &str) -> Vec<DirectoryEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

pub fn summarize(entries: &[DirectoryEntry]) -> DirectorySummary {
    let folders = entries.iter().filter(|e| e.is_directory).count();
    DirectorySummary {
        folders,
        files: entries.len() - folders,
    }
}

pub fn entry_properties(path: &Path) -> Result<EntryProperties, AppError> {
    let metadata = fs::metadata(path).at(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    let kind = if metadata.is_dir() {
        EntryKind::Folder
    } else {
        EntryKind::File
    };
    let size_bytes = (kind == EntryKind::File).then(|| metadata.len());

    Ok(EntryProperties {
        name,
        path: path.to_path_buf(),
        kind,
        size_bytes,
        size_display: size_bytes.map(format_size).unwrap_or_else(|| "-".to_string()),
        modified_at: modified_rfc3339(&metadata),
    })
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::fs::File;
    use std::path::PathBuf;

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_folders_first_then_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("B.txt"), vec![0u8; 10]).unwrap();
        fs::create_dir(dir.path().join("a_folder")).unwrap();
        fs::write(dir.path().join("A.txt"), vec![0u8; 5]).unwrap();

        let result = list_directory(dir.path()).unwrap();

        assert_eq!(names(&result), vec!["a_folder", "A.txt", "B.txt"]);
        assert!(result[0].is_directory);
        assert_eq!(result[0].kind_label(), "Folder");
        assert_eq!(result[0].size_bytes, None);
        assert_eq!(result[1].size_bytes, Some(5));
        assert_eq!(result[2].size_bytes, Some(10));
        assert_eq!(result[2].kind_label(), "File");
    }

    #[test]
    fn test_relisting_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "Alpha", "alpha", "beta.md", "Gamma.rs"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("Docs")).unwrap();

        let first = list_directory(dir.path()).unwrap();
        let second = list_directory(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            names(&first),
            vec!["Docs", "Alpha", "alpha", "beta.md", "Gamma.rs", "zeta"]
        );
    }

    #[test]
    fn test_names_match_children() {
        let dir = tempfile::tempdir().unwrap();
        let expected: BTreeSet<String> = ["one", "two.txt", ".hidden", "sub"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        File::create(dir.path().join("one")).unwrap();
        File::create(dir.path().join("two.txt")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let listed: BTreeSet<String> = list_directory(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_hidden_entries_can_be_skipped() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join(".dotfile")).unwrap();
        File::create(dir.path().join("visible")).unwrap();

        let result = list_directory_with(dir.path(), ListOptions { show_hidden: false }).unwrap();
        assert_eq!(names(&result), vec!["visible"]);
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_directory(&dir.path().join("nope"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_file_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap();
        assert!(matches!(list_directory(&file), Err(AppError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_access_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; nothing to assert there.
        let readable_anyway = fs::read_dir(&locked).is_ok();
        let result = list_directory(&locked);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable_anyway {
            assert!(matches!(result, Err(AppError::Access(_))));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_has_no_size() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();
        fs::write(dir.path().join("real.txt"), "hello world").unwrap();

        let result = list_directory(dir.path()).unwrap();
        assert_eq!(names(&result), vec!["dangling", "real.txt"]);
        assert!(!result[0].is_directory);
        assert_eq!(result[0].size_bytes, None);
        assert_eq!(result[1].size_bytes, Some(11));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_stay_distinct_and_ordered() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join(OsStr::from_bytes(b"a\xfe"));
        let second = dir.path().join(OsStr::from_bytes(b"a\xff"));
        File::create(&second).unwrap();
        File::create(&first).unwrap();

        let listed = list_directory(dir.path()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, listed[1].name);
        assert_eq!(listed[0].path, first);
        assert_eq!(listed[1].path, second);
        assert_eq!(list_directory(dir.path()).unwrap(), listed);
    }

    #[test]
    fn test_metadata_populated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test.txt"), "hello world").unwrap();

        let result = list_directory(dir.path()).unwrap();
        let file = &result[0];
        assert_eq!(file.extension.as_deref(), Some("txt"));
        assert_eq!(file.mime_type.as_deref(), Some("text/plain"));
        assert!(file.modified_at.is_some());
        assert_eq!(file.path, dir.path().join("test.txt"));
    }

    #[test]
    fn test_filter_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Reports")).unwrap();
        File::create(dir.path().join("report.pdf")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let entries = list_directory(dir.path()).unwrap();
        let matched = filter_entries(&entries, "REPORT");
        assert_eq!(names(&matched), vec!["Reports", "report.pdf"]);
        assert_eq!(filter_entries(&entries, "  ").len(), 3);

        let summary = summarize(&entries);
        assert_eq!(summary, DirectorySummary { folders: 1, files: 2 });
    }

    #[test]
    fn test_entry_properties() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.bin");
        fs::write(&file, vec![1u8; 2048]).unwrap();

        let props = entry_properties(&file).unwrap();
        assert_eq!(props.name, "data.bin");
        assert_eq!(props.kind, EntryKind::File);
        assert_eq!(props.size_bytes, Some(2048));
        assert_eq!(props.size_display, "2.00 KB");

        let folder = entry_properties(dir.path()).unwrap();
        assert_eq!(folder.kind, EntryKind::Folder);
        assert_eq!(folder.size_display, "-");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(1024u64.pow(5)), "1.00 PB");
    }

    fn synthetic(name: &str, is_directory: bool) -> DirectoryEntry {
        DirectoryEntry {
            path: PathBuf::from(name),
            name: name.to_string(),
            extension: None,
            mime_type: None,
            size_bytes: None,
            modified_at: None,
            is_directory,
        }
    }

    proptest! {
        #[test]
        fn sorted_order_is_partitioned_and_independent_of_input_order(
            items in proptest::collection::btree_map("[a-zA-Z0-9_.]{1,12}", any::<bool>(), 0..40)
        ) {
            let mut forward: Vec<DirectoryEntry> =
                items.iter().map(|(n, d)| synthetic(n, *d)).collect();
            let mut backward: Vec<DirectoryEntry> = forward.iter().rev().cloned().collect();
            sort_entries(&mut forward);
            sort_entries(&mut backward);

            prop_assert_eq!(&forward, &backward);

            let first_file = forward.iter().position(|e| !e.is_directory).unwrap_or(forward.len());
            prop_assert!(forward[first_file..].iter().all(|e| !e.is_directory));
            for pair in forward.windows(2) {
                if pair[0].is_directory == pair[1].is_directory {
                    prop_assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
                }
            }
        }
    }
}
