pub mod file_entry;
pub mod operation;
pub mod preview;
pub mod thumbnail;
