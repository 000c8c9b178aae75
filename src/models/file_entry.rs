use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Folder,
    File,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Folder => "Folder",
            Self::File => "File",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Exact location, including the raw file name.
    pub path: PathBuf,
    /// Display name. Lossily decoded, so two non-UTF-8 names may render the
    /// same; `path` is what identifies the entry.
    pub name: String,
    pub extension: Option<String>,
    pub mime_type: Option<String>,
    /// Only set for non-directories whose length could be read.
    pub size_bytes: Option<u64>,
    pub modified_at: Option<String>,
    pub is_directory: bool,
}

impl DirectoryEntry {
    pub fn kind(&self) -> EntryKind {
        if self.is_directory {
            EntryKind::Folder
        } else {
            EntryKind::File
        }
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind().label()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySummary {
    pub folders: usize,
    pub files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryProperties {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size_bytes: Option<u64>,
    pub size_display: String,
    pub modified_at: Option<String>,
}
