use crate::error::{AppError, IoResultExt};
use crate::models::operation::{BatchReport, OperationRecord, OperationType};
use crate::scope_path::path_within;
use crate::shell::safety::{validate_entry_name, validate_not_protected};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Guards shared by every mutating operation.
#[derive(Debug, Clone, Copy)]
pub struct FileOpPolicy {
    pub protect_system_paths: bool,
}

impl Default for FileOpPolicy {
    fn default() -> Self {
        Self {
            protect_system_paths: true,
        }
    }
}

pub fn create_dir(
    parent: &Path,
    name: &str,
    policy: FileOpPolicy,
) -> Result<OperationRecord, AppError> {
    validate_entry_name(name)?;
    let target = parent.join(name);
    validate_not_protected(&target, policy.protect_system_paths)?;

    fs::create_dir(&target).at(&target)?;
    log::info!("created folder {}", target.display());
    Ok(OperationRecord::new(OperationType::CreateDir, target, None))
}

/// Renames `source` to `new_name` inside the same parent directory.
pub fn rename(
    source: &Path,
    new_name: &str,
    policy: FileOpPolicy,
) -> Result<OperationRecord, AppError> {
    validate_entry_name(new_name)?;
    validate_not_protected(source, policy.protect_system_paths)?;

    fs::symlink_metadata(source).at(source)?;
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    let destination = parent.join(new_name);
    ensure_vacant(&destination)?;

    fs::rename(source, &destination).at(source)?;
    log::info!("renamed {} -> {}", source.display(), destination.display());
    Ok(OperationRecord::new(
        OperationType::Rename,
        source.to_path_buf(),
        Some(destination),
    ))
}

pub fn copy_items(sources: &[PathBuf], dest_dir: &Path, policy: FileOpPolicy) -> Result<BatchReport, AppError> {
    transfer_items(sources, dest_dir, policy, OperationType::Copy)
}

pub fn move_items(sources: &[PathBuf], dest_dir: &Path, policy: FileOpPolicy) -> Result<BatchReport, AppError> {
    transfer_items(sources, dest_dir, policy, OperationType::Move)
}

fn transfer_items(
    sources: &[PathBuf],
    dest_dir: &Path,
    policy: FileOpPolicy,
    op: OperationType,
) -> Result<BatchReport, AppError> {
    let metadata = fs::metadata(dest_dir).at(dest_dir)?;
    if !metadata.is_dir() {
        return Err(AppError::NotFound(dest_dir.to_path_buf()));
    }
    validate_not_protected(dest_dir, policy.protect_system_paths)?;

    let mut report = BatchReport::default();
    for src in sources {
        match transfer_one(src, dest_dir, policy, op) {
            Ok(record) => report.record(record),
            Err(err) => {
                log::warn!("{op} failed for {}: {err}", src.display());
                report.fail(src.clone(), err);
            }
        }
    }
    Ok(report)
}

fn transfer_one(
    src: &Path,
    dest_dir: &Path,
    policy: FileOpPolicy,
    op: OperationType,
) -> Result<OperationRecord, AppError> {
    if op == OperationType::Move {
        validate_not_protected(src, policy.protect_system_paths)?;
    }
    let file_name = src
        .file_name()
        .ok_or_else(|| AppError::General(format!("invalid source path: {}", src.display())))?;
    fs::symlink_metadata(src).at(src)?;
    let dest = dest_dir.join(file_name);

    // Follows symlinks, as copy_path does.
    let src_is_dir = fs::metadata(src).is_ok_and(|m| m.is_dir());
    if src_is_dir && path_within(dest_dir, src) {
        return Err(AppError::General(format!(
            "cannot {op} {} into itself",
            src.display()
        )));
    }
    ensure_vacant(&dest)?;

    match op {
        OperationType::Move => move_path(src, &dest)?,
        _ => copy_path(src, &dest)?,
    }
    log::info!("{op} {} -> {}", src.display(), dest.display());
    Ok(OperationRecord::new(op, src.to_path_buf(), Some(dest)))
}

fn move_path(src: &Path, dest: &Path) -> Result<(), AppError> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if is_cross_device(&err) => {
            copy_path(src, dest)?;
            remove_path(src)
        }
        Err(err) => Err(AppError::from_io(err, src)),
    }
}

fn is_cross_device(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices
}

fn copy_path(src: &Path, dest: &Path) -> Result<(), AppError> {
    if fs::metadata(src).at(src)?.is_dir() {
        copy_dir_recursive(src, dest)
    } else {
        fs::copy(src, dest).at(src)?;
        Ok(())
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), AppError> {
    fs::create_dir(dest).at(dest)?;
    for entry in fs::read_dir(src).at(src)? {
        let entry = entry.at(src)?;
        let child = entry.path();
        let dest_child = dest.join(entry.file_name());
        if !fs::metadata(&child).at(&child)?.is_dir() {
            fs::copy(&child, &dest_child).at(&child)?;
            continue;
        }
        // A linked folder is copied as a real folder unless it points back up
        // the tree being copied.
        if entry.file_type().at(&child)?.is_symlink() && path_within(src, &child) {
            return Err(AppError::General(format!(
                "symlink loop at {}",
                child.display()
            )));
        }
        copy_dir_recursive(&child, &dest_child)?;
    }
    Ok(())
}

fn remove_path(path: &Path) -> Result<(), AppError> {
    let metadata = fs::symlink_metadata(path).at(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).at(path)
    } else {
        fs::remove_file(path).at(path)
    }
}

fn ensure_vacant(dest: &Path) -> Result<(), AppError> {
    if fs::symlink_metadata(dest).is_ok() {
        return Err(AppError::NameConflict(dest.to_path_buf()));
    }
    Ok(())
}

/// Permanently removes each path. Folders are removed with their contents.
pub fn delete_items(paths: &[PathBuf], policy: FileOpPolicy) -> BatchReport {
    let mut report = BatchReport::default();
    for path in paths {
        let result = validate_not_protected(path, policy.protect_system_paths)
            .and_then(|()| remove_path(path));
        match result {
            Ok(()) => {
                log::info!("deleted {}", path.display());
                report.record(OperationRecord::new(OperationType::Delete, path.clone(), None));
            }
            Err(err) => {
                log::warn!("delete failed for {}: {err}", path.display());
                report.fail(path.clone(), err);
            }
        }
    }
    report
}

fn trash_error(err: trash::Error, path: &Path) -> AppError {
    match &err {
        trash::Error::Os { code, .. } => {
            return AppError::from_io(io::Error::from_raw_os_error(*code), path)
        }
        trash::Error::CouldNotAccess { .. } => return AppError::Access(path.to_path_buf()),
        trash::Error::TargetedRoot => return AppError::Protected(path.to_path_buf()),
        _ => {}
    }
    let mut cause = std::error::Error::source(&err);
    while let Some(inner) = cause {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            return AppError::from_io(io::Error::new(io_err.kind(), io_err.to_string()), path);
        }
        cause = inner.source();
    }
    AppError::Io {
        path: path.to_path_buf(),
        source: io::Error::other(err.to_string()),
    }
}

/// Moves each path to the platform trash.
pub fn trash_items(paths: &[PathBuf], policy: FileOpPolicy) -> BatchReport {
    let mut report = BatchReport::default();
    for path in paths {
        let result = validate_not_protected(path, policy.protect_system_paths)
            .and_then(|()| fs::symlink_metadata(path).at(path).map(|_| ()))
            .and_then(|()| {
                trash::delete(path).map_err(|e| trash_error(e, path))
            });
        match result {
            Ok(()) => {
                log::info!("trashed {}", path.display());
                report.record(OperationRecord::new(OperationType::Trash, path.clone(), None));
            }
            Err(err) => {
                log::warn!("trash failed for {}: {err}", path.display());
                report.fail(path.clone(), err);
            }
        }
    }
    report
}
