use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use crate::models::preview::Preview;
use crate::services::thumbnail_service::is_image_file;

pub const DEFAULT_PREVIEW_BYTES: usize = 10_000;

pub fn preview(path: &Path, max_bytes: usize) -> Preview {
    match fs::metadata(path) {
        Ok(m) if m.is_dir() => return Preview::Directory,
        Ok(_) => {}
        Err(err) => {
            return Preview::Unavailable {
                reason: err.to_string(),
            }
        }
    }

    if is_image_file(path) {
        return Preview::Image {
            path: path.to_path_buf(),
        };
    }

    match read_head(path, max_bytes) {
        Ok((bytes, truncated)) => Preview::Text {
            content: String::from_utf8_lossy(&bytes).into_owned(),
            truncated,
        },
        Err(err) => {
            log::debug!("preview unavailable for {}: {err}", path.display());
            Preview::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}

fn read_head(path: &Path, max_bytes: usize) -> std::io::Result<(Vec<u8>, bool)> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(max_bytes.min(64 * 1024));
    // One extra byte tells us whether anything was cut off.
    file.take((max_bytes as u64).saturating_add(1)).read_to_end(&mut buf)?;
    let truncated = buf.len() > max_bytes;
    buf.truncate(max_bytes);
    Ok((buf, truncated))
}
