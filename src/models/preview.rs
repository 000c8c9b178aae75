use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    Directory,
    Image { path: PathBuf },
    Text { content: String, truncated: bool },
    Unavailable { reason: String },
}
