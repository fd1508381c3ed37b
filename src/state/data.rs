//! Shared data structures for the game state
//!
//! These structs represent the data model that flows between
//! the loaders and the board UI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A self-contained encoded image (no reference back to where it came from)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type of `bytes` (e.g. "image/png")
    pub mime: String,
    /// The encoded file contents
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// PNG produced by re-encoding a decoded pixel buffer
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new("image/png", bytes)
    }

    pub fn is_svg(&self) -> bool {
        self.mime == "image/svg+xml"
    }

    /// Render as a `data:` URL
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// One frame on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub source: EncodedImage,
    /// Filename only (e.g. "hermione.png"), used as alt text
    pub display_name: String,
    /// Whether the frame currently shows its picture
    pub revealed: bool,
}

impl ImageEntry {
    /// New entries always start hidden
    pub fn new(source: EncodedImage, display_name: impl Into<String>) -> Self {
        Self {
            source,
            display_name: display_name.into(),
            revealed: false,
        }
    }
}
