use std::sync::Arc;

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub enum Thumbnail {
    Image(Arc<Bitmap>),
    Placeholder(Arc<Bitmap>),
}

impl Thumbnail {
    pub fn bitmap(&self) -> &Arc<Bitmap> {
        match self {
            Self::Image(b) | Self::Placeholder(b) => b,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}
