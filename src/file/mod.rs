// src/file/mod.rs
use anyhow::{Result, Context, anyhow};
use eframe::egui;
use std::path::Path;
use std::sync::Arc;
use std::fs;

// Extensions offered by the file picker. Only a hint, nothing is rejected.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "dcm"];

#[derive(Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("Invalid file path: {}", path.display()))?;

        Ok(Self::new(name, bytes))
    }

    // Native drops usually only carry a path, web drops carry the bytes
    pub fn from_dropped(dropped: &egui::DroppedFile) -> Result<Self> {
        if let Some(bytes) = &dropped.bytes {
            let name = if dropped.name.is_empty() {
                "upload".to_string()
            } else {
                dropped.name.clone()
            };
            return Ok(Self::new(name, bytes.clone()));
        }

        match &dropped.path {
            Some(path) => Self::from_path(path),
            None => Err(anyhow!("Dropped item has neither a path nor contents")),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        let extension = Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("dcm") => "application/dicom",
            _ => "application/octet-stream",
        }
    }
}
