//! Export of the finished scene as a PNG file.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, RgbaImage};

use crate::error::{EditorError, Result};

/// A rendered, PNG-encoded scene ready to be downloaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name for the download.
    pub file_name: String,

    /// PNG file contents.
    pub png: Vec<u8>,
}

impl Export {
    /// Encodes an image losslessly as PNG.
    pub fn encode(file_name: impl Into<String>, image: &RgbaImage) -> Result<Self> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(EditorError::Encode)?;
        Ok(Self {
            file_name: file_name.into(),
            png,
        })
    }

    /// Returns the PNG as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }

    /// Writes the PNG to `path`.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, &self.png)?;
        Ok(())
    }
}

impl std::fmt::Debug for Export {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Export")
            .field("file_name", &self.file_name)
            .field("len", &self.png.len())
            .finish()
    }
}
