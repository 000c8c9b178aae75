pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub(crate) mod scope_path;
pub mod services;
pub mod shell;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use models::file_entry::{DirectoryEntry, EntryKind};
pub use models::thumbnail::{Bitmap, Thumbnail};
pub use services::listing_service::list_directory;
pub use services::thumbnail_service::ThumbnailCache;
pub use state::Session;

/// Installs the process logger. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
