use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AppError;
use crate::models::file_entry::{DirectoryEntry, DirectorySummary, EntryProperties};
use crate::models::operation::{BatchReport, OperationRecord};
use crate::models::preview::Preview;
use crate::models::thumbnail::Thumbnail;
use crate::services::launcher::Launcher;
use crate::services::{file_service, listing_service, preview_service};
use crate::state::{ClipboardMode, Session};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "path", rename_all = "snake_case")]
pub enum OpenOutcome {
    Navigated(PathBuf),
    Launched(PathBuf),
}

pub fn refresh(session: &Session) -> Result<Vec<DirectoryEntry>, AppError> {
    listing_service::list_directory_with(session.current_dir(), session.list_options())
}

pub fn search(session: &Session, query: &str) -> Result<Vec<DirectoryEntry>, AppError> {
    let entries = refresh(session)?;
    Ok(listing_service::filter_entries(&entries, query))
}

pub fn directory_summary(session: &Session) -> Result<DirectorySummary, AppError> {
    Ok(listing_service::summarize(&refresh(session)?))
}

pub fn properties(path: &Path) -> Result<EntryProperties, AppError> {
    listing_service::entry_properties(path)
}

/// Folders become the current directory; anything else goes to the default app.
pub fn open_entry(
    session: &mut Session,
    path: &Path,
    launcher: &dyn Launcher,
) -> Result<OpenOutcome, AppError> {
    if path.is_dir() {
        let current = session.navigate_to(path)?;
        return Ok(OpenOutcome::Navigated(current.to_path_buf()));
    }
    if !path.exists() {
        return Err(AppError::NotFound(path.to_path_buf()));
    }
    launcher.launch(path)?;
    Ok(OpenOutcome::Launched(path.to_path_buf()))
}

pub fn create_folder(session: &mut Session, name: &str) -> Result<OperationRecord, AppError> {
    let record = file_service::create_dir(session.current_dir(), name, session.file_policy())?;
    session.journal_record(&record);
    Ok(record)
}

pub fn rename_item(
    session: &mut Session,
    path: &Path,
    new_name: &str,
) -> Result<OperationRecord, AppError> {
    let record = file_service::rename(path, new_name, session.file_policy())?;
    session.journal_record(&record);
    Ok(record)
}

pub fn delete_items(session: &mut Session, paths: &[PathBuf], permanent: bool) -> BatchReport {
    let report = if permanent {
        file_service::delete_items(paths, session.file_policy())
    } else {
        file_service::trash_items(paths, session.file_policy())
    };
    session.journal_report(&report);
    report
}

/// Applies the clipboard to the current directory. The clipboard is emptied
/// even when some items fail.
pub fn paste(session: &mut Session) -> Result<BatchReport, AppError> {
    let Some(clipboard) = session.take_clipboard() else {
        return Ok(BatchReport::default());
    };
    let dest = session.current_dir().to_path_buf();
    let policy = session.file_policy();
    let report = match clipboard.mode {
        ClipboardMode::Copy => file_service::copy_items(&clipboard.paths, &dest, policy)?,
        ClipboardMode::Cut => file_service::move_items(&clipboard.paths, &dest, policy)?,
    };
    session.journal_report(&report);
    Ok(report)
}

pub fn thumbnail(session: &mut Session, path: &Path, size: Option<u32>) -> Thumbnail {
    let size = size.unwrap_or(session.config.thumbnail_size);
    session.thumbnails.get(path, size)
}

pub fn preview(session: &Session, path: &Path) -> Preview {
    preview_service::preview(path, session.config.preview_bytes)
}
