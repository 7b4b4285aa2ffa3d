/// Byte size and pixel dimensions of one image, filled in as the resolver learns them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageInfo {
    /// Total byte length of the source, when known
    pub size_bytes: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageInfo {
    #[must_use]
    pub fn new(size_bytes: u64, width: u32, height: u32) -> Self {
        ImageInfo {
            size_bytes: Some(size_bytes),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Pixel dimensions once both are known
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn set_dimensions(&mut self, (width, height): (u32, u32)) {
        self.width = Some(width);
        self.height = Some(height);
    }
}
