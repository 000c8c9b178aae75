use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Copy,
    Move,
    Rename,
    Delete,
    Trash,
    CreateDir,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Move => write!(f, "move"),
            Self::Rename => write!(f, "rename"),
            Self::Delete => write!(f, "delete"),
            Self::Trash => write!(f, "trash"),
            Self::CreateDir => write!(f, "create_dir"),
        }
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" => Ok(Self::Copy),
            "move" => Ok(Self::Move),
            "rename" => Ok(Self::Rename),
            "delete" => Ok(Self::Delete),
            "trash" => Ok(Self::Trash),
            "create_dir" => Ok(Self::CreateDir),
            _ => Err(format!("unknown operation type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub operation_id: String,
    pub operation_type: OperationType,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub executed_at: String,
}

impl OperationRecord {
    pub fn new(operation_type: OperationType, source: PathBuf, destination: Option<PathBuf>) -> Self {
        Self {
            operation_id: uuid::Uuid::new_v4().to_string(),
            operation_type,
            source,
            destination,
            executed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailedItem {
    pub path: PathBuf,
    pub error: AppError,
}

/// Outcome of a multi-item operation. Items are applied in order; a failure
/// does not undo items already applied.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub completed: Vec<OperationRecord>,
    pub failed: Vec<FailedItem>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub(crate) fn record(&mut self, record: OperationRecord) {
        self.completed.push(record);
    }

    pub(crate) fn fail(&mut self, path: PathBuf, error: AppError) {
        self.failed.push(FailedItem { path, error });
    }

    /// Collapses the report to its first failure, if any.
    pub fn into_result(mut self) -> Result<Vec<OperationRecord>, AppError> {
        if self.failed.is_empty() {
            Ok(self.completed)
        } else {
            Err(self.failed.remove(0).error)
        }
    }
}
