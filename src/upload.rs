//! File intake for the upload surface.
//!
//! Both drag-and-drop and the file picker deliver a list of files; the
//! first file wins and the rest are ignored.

use tracing::debug;

/// A file handed over by the upload surface.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as reported by the browser or file system.
    pub name: String,

    /// MIME type, possibly empty when unknown.
    pub mime: String,

    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// An event raised by the upload surface.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// Files dropped onto the surface.
    Drop(Vec<SelectedFile>),
    /// Files chosen through the file picker.
    Input(Vec<SelectedFile>),
}

impl UploadEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::Drop(_) => "drop",
            Self::Input(_) => "input",
        }
    }

    fn into_files(self) -> Vec<SelectedFile> {
        match self {
            Self::Drop(files) | Self::Input(files) => files,
        }
    }
}

/// The upload surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    accept: String,
}

impl Default for FileUpload {
    fn default() -> Self {
        Self::new()
    }
}

impl FileUpload {
    /// Creates an upload surface accepting `image/*`.
    pub fn new() -> Self {
        Self::with_accept("image/*")
    }

    /// Creates an upload surface with a custom picker filter.
    pub fn with_accept(accept: impl Into<String>) -> Self {
        Self {
            accept: accept.into(),
        }
    }

    /// The filter handed to the file picker. Dropped files are not filtered.
    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// Picks the file to edit from an upload event.
    ///
    /// Returns `None` when the event carries no files.
    pub fn handle(&self, event: UploadEvent) -> Option<SelectedFile> {
        let kind = event.kind();
        let files = event.into_files();
        debug!(kind, count = files.len(), "upload event");

        let file = files.into_iter().next()?;
        debug!(kind, name = %file.name, mime = %file.mime, "file selected");
        Some(file)
    }
}
