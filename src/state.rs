use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{AppError, IoResultExt};
use crate::models::operation::{BatchReport, OperationRecord};
use crate::services::file_service::FileOpPolicy;
use crate::services::listing_service::ListOptions;
use crate::services::thumbnail_service::ThumbnailCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Copy,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipboard {
    pub paths: Vec<PathBuf>,
    pub mode: ClipboardMode,
}

/// Back/forward stacks around the current directory.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    current: PathBuf,
    back: Vec<PathBuf>,
    forward: Vec<PathBuf>,
}

impl NavigationHistory {
    pub fn new(start: PathBuf) -> Self {
        Self {
            current: start,
            back: Vec::new(),
            forward: Vec::new(),
        }
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn visit(&mut self, path: PathBuf) {
        if path == self.current {
            return;
        }
        let previous = std::mem::replace(&mut self.current, path);
        self.back.push(previous);
        self.forward.clear();
    }

    pub fn back(&mut self) -> Option<&Path> {
        let target = self.back.pop()?;
        let previous = std::mem::replace(&mut self.current, target);
        self.forward.push(previous);
        Some(&self.current)
    }

    pub fn forward(&mut self) -> Option<&Path> {
        let target = self.forward.pop()?;
        let previous = std::mem::replace(&mut self.current, target);
        self.back.push(previous);
        Some(&self.current)
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}

/// Transient state of one file-manager window.
pub struct Session {
    pub config: Config,
    pub history: NavigationHistory,
    pub clipboard: Option<Clipboard>,
    pub journal: Vec<OperationRecord>,
    pub thumbnails: ThumbnailCache,
}

impl Session {
    pub fn new(start: &Path, config: Config) -> Result<Self, AppError> {
        let start = resolve_directory(start)?;
        Ok(Self {
            thumbnails: ThumbnailCache::from_config(&config),
            config,
            history: NavigationHistory::new(start),
            clipboard: None,
            journal: Vec::new(),
        })
    }

    pub fn current_dir(&self) -> &Path {
        self.history.current()
    }

    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            show_hidden: self.config.show_hidden,
        }
    }

    pub fn file_policy(&self) -> FileOpPolicy {
        FileOpPolicy {
            protect_system_paths: self.config.protect_system_paths,
        }
    }

    pub fn navigate_to(&mut self, path: &Path) -> Result<&Path, AppError> {
        let resolved = resolve_directory(path)?;
        log::debug!("navigate to {}", resolved.display());
        self.history.visit(resolved);
        Ok(self.history.current())
    }

    pub fn go_back(&mut self) -> Option<&Path> {
        self.history.back()
    }

    pub fn go_forward(&mut self) -> Option<&Path> {
        self.history.forward()
    }

    /// Moves to the parent directory; at the filesystem root nothing changes.
    pub fn go_up(&mut self) -> Option<&Path> {
        let parent = self.history.current().parent()?.to_path_buf();
        self.history.visit(parent);
        Some(self.history.current())
    }

    pub fn go_home(&mut self) -> Result<&Path, AppError> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::General("could not resolve home directory".to_string()))?;
        self.navigate_to(&home)
    }

    pub fn copy(&mut self, paths: Vec<PathBuf>) {
        self.clipboard = Some(Clipboard {
            paths,
            mode: ClipboardMode::Copy,
        });
    }

    pub fn cut(&mut self, paths: Vec<PathBuf>) {
        self.clipboard = Some(Clipboard {
            paths,
            mode: ClipboardMode::Cut,
        });
    }

    pub fn take_clipboard(&mut self) -> Option<Clipboard> {
        self.clipboard.take()
    }

    pub(crate) fn journal_report(&mut self, report: &BatchReport) {
        self.journal.extend(report.completed.iter().cloned());
    }

    pub(crate) fn journal_record(&mut self, record: &OperationRecord) {
        self.journal.push(record.clone());
    }
}

fn resolve_directory(path: &Path) -> Result<PathBuf, AppError> {
    let metadata = fs::metadata(path).at(path)?;
    if !metadata.is_dir() {
        return Err(AppError::NotFound(path.to_path_buf()));
    }
    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}
