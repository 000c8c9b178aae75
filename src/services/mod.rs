pub mod file_service;
pub mod launcher;
pub mod listing_service;
pub mod preview_service;
pub mod thumbnail_service;
pub mod worker;
