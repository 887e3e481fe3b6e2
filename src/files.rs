//! File references captured by upload slots.
//!
//! Only the display name of a picked file is ever persisted. The handle lives
//! for the duration of one command so a preview can be produced, and is gone
//! on the next page mount.
use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// Content family, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Other,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "heic") => FileKind::Image,
            Some("pdf") => FileKind::Pdf,
            _ => FileKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Other => "other",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub size: u64,
    pub kind: FileKind,
}

/// A picked file: the name that gets persisted plus an optional live handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub handle: Option<FileHandle>,
}

impl FileRef {
    /// Reference restored from the draft, where only the name survives.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
        }
    }
}

/// Turns a user-supplied source into a [`FileRef`].
pub trait FilePicker {
    fn pick(&self, source: &str) -> Result<FileRef>;
}

/// Picks regular files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFilePicker;

impl FilePicker for FsFilePicker {
    fn pick(&self, source: &str) -> Result<FileRef> {
        let path = PathBuf::from(source.trim());
        let meta = fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
        if !meta.is_file() {
            return Err(anyhow!("{} is not a regular file", path.display()));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
        let kind = FileKind::from_path(&path);
        tracing::debug!(file = %name, size = meta.len(), kind = %kind, "file picked");
        Ok(FileRef {
            name,
            handle: Some(FileHandle {
                path,
                size: meta.len(),
                kind,
            }),
        })
    }
}

/// What the upload widget can show for a picked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Image bytes were read in full.
    Image { bytes: usize },
    /// Non-image files only show an icon.
    Icon,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preview::Image { bytes } => write!(f, "image preview ({bytes} bytes)"),
            Preview::Icon => f.write_str("document"),
        }
    }
}

/// Start reading a preview on a background thread.
///
/// The receiver resolves independently of any submission; dropping it simply
/// discards the result.
pub fn load_preview(handle: &FileHandle) -> Receiver<Result<Preview>> {
    let (tx, rx) = mpsc::channel();
    let path = handle.path.clone();
    let kind = handle.kind;
    thread::spawn(move || {
        let result = match kind {
            FileKind::Image => fs::read(&path)
                .map(|bytes| Preview::Image { bytes: bytes.len() })
                .with_context(|| format!("read preview {}", path.display())),
            FileKind::Pdf | FileKind::Other => Ok(Preview::Icon),
        };
        // The receiver may already be gone.
        let _ = tx.send(result);
    });
    rx
}
