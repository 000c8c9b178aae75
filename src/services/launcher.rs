use std::path::Path;

use crate::error::{AppError, IoResultExt};

/// Hands a file to the host's default application.
pub trait Launcher {
    fn launch(&self, path: &Path) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, path: &Path) -> Result<(), AppError> {
        // Detached: neither exit status nor completion is observed.
        open::that_detached(path).at(path)?;
        log::info!("launched {}", path.display());
        Ok(())
    }
}

pub fn open_with_default_app(path: &Path) -> Result<(), AppError> {
    SystemLauncher.launch(path)
}
