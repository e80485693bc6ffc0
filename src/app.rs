//! Page shell: shows the upload surface until a photo is chosen, then the
//! editor until the user starts over.

use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::editor::ImageEditor;
use crate::error::Result;
use crate::upload::{FileUpload, SelectedFile, UploadEvent};

/// What the page is currently showing.
pub enum View {
    Upload,
    Editing(Box<ImageEditor>),
}

/// The photo editor page.
///
/// ```
/// use hat_editor::{App, EditorConfig};
///
/// let app = App::new(EditorConfig::default());
/// assert!(!app.is_editing());
/// ```
pub struct App {
    config: EditorConfig,
    upload: FileUpload,
    view: View,
}

impl App {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            upload: FileUpload::new(),
            view: View::Upload,
        }
    }

    pub fn upload(&self) -> &FileUpload {
        &self.upload
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.view, View::Editing(_))
    }

    pub fn editor(&self) -> Option<&ImageEditor> {
        match &self.view {
            View::Editing(editor) => Some(editor.as_ref()),
            View::Upload => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut ImageEditor> {
        match &mut self.view {
            View::Editing(editor) => Some(editor.as_mut()),
            View::Upload => None,
        }
    }

    /// Opens an editor on `file`.
    ///
    /// If the file cannot be decoded the page stays where it was.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<()> {
        info!(name = %file.name, mime = %file.mime, "file received");
        match ImageEditor::open(&file, self.config.clone()) {
            Ok(editor) => {
                self.view = View::Editing(Box::new(editor));
                Ok(())
            }
            Err(err) => {
                warn!(name = %file.name, error = %err, "cannot open file");
                Err(err)
            }
        }
    }

    /// Routes an upload event. Events without files are ignored.
    pub fn handle_upload(&mut self, event: UploadEvent) -> Result<()> {
        match self.upload.handle(event) {
            Some(file) => self.select_file(file),
            None => Ok(()),
        }
    }

    /// Discards the current photo and returns to the upload surface.
    pub fn reset(&mut self) {
        if self.is_editing() {
            info!("starting over with a new photo");
        }
        self.view = View::Upload;
    }
}
