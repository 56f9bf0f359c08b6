//! The history-backed image store.
//!
//! [`ImageStore`] owns at most one editing session and is the only way to
//! observe or change the image being edited. A session holds:
//!
//! - `original`: the buffer as decoded, fixed for the life of the session
//! - `current`: the live buffer
//! - a [`History`] of snapshots for undo/redo
//! - `source_path`: the file backing the session
//!
//! ## State machine
//!
//! ```text
//!            load ok                    apply / undo / redo / reset / load ok
//!  Empty ────────────▶ Loaded ◀──────────────────────────────────────┐
//!                        └────────────────────────────────────────────┘
//! ```
//!
//! ## Transitions
//!
//! | Call | Effect |
//! |---|---|
//! | `load` | new session: `original = current = decoded`, stacks cleared |
//! | `apply_operation` | push `current` to undo, clear redo, `current = filter(current)` |
//! | `undo` | push `current` to redo, pop undo into `current` |
//! | `redo` | push `current` to undo, pop redo into `current` |
//! | `reset_to_original` | `current = original`, both stacks cleared (cannot be undone) |
//!
//! Every failing call leaves the session exactly as it was: validation and
//! decoding happen before anything is replaced.
//!
//! Snapshots are [`ImageBuffer`] clones, which share pixels, so the history
//! never deep-copies an image.
//!
//! ## Concurrency
//!
//! Every mutating method takes `&mut self`, so one operation runs at a time
//! and undo/redo/reset can never interleave with an in-flight edit. To edit
//! off the interactive thread, move the whole store to that thread (or guard
//! it with a `Mutex`); nothing inside it is shared.

use crate::buffer::ImageBuffer;
use crate::config::EditorConfig;
use crate::history::{History, HistoryError};
use crate::imaging::{
    Codec, CodecError, Operation, Quality, RustCodec, SUPPORTED_EXTENSIONS, SaveFormat,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

impl LoadError {
    fn from_codec(path: &Path, err: CodecError) -> Self {
        match err {
            CodecError::Io(source) => Self::Unreadable {
                path: path.to_path_buf(),
                source,
            },
            other => Self::Decode {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    #[error("No image loaded")]
    NoImageLoaded,
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("No image loaded")]
    NoImageLoaded,
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
    #[error("Write failed: {0}")]
    IoFailed(#[from] std::io::Error),
}

impl From<CodecError> for SaveError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(e) => Self::IoFailed(e),
            CodecError::UnsupportedFormat(f) => Self::UnsupportedFormat(f),
            other => Self::EncodeFailed(other.to_string()),
        }
    }
}

/// Snapshot of what the store holds, for status display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub has_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Size in bytes of the backing file, when it exists on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl ImageInfo {
    /// `(width, height)`, or `None` when nothing is loaded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.has_image.then_some((self.width, self.height))
    }
}

struct Session {
    original: ImageBuffer,
    current: ImageBuffer,
    history: History<ImageBuffer>,
    source_path: PathBuf,
}

/// Owns the editing session. See the [module docs](self).
pub struct ImageStore<C: Codec = RustCodec> {
    codec: C,
    session: Option<Session>,
    max_history: Option<usize>,
    jpeg_quality: Quality,
}

impl ImageStore<RustCodec> {
    /// Store backed by the production codec, configured from `config`.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_config(RustCodec::new(), config)
    }
}

impl<C: Codec> ImageStore<C> {
    /// Empty store with unlimited history.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            session: None,
            max_history: None,
            jpeg_quality: Quality::default(),
        }
    }

    pub fn with_config(codec: C, config: &EditorConfig) -> Self {
        Self {
            max_history: config.history.max_depth,
            jpeg_quality: Quality::new(config.save.jpeg_quality),
            ..Self::new(codec)
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Undo cap applied to sessions started by this store.
    pub fn max_history(&self) -> Option<usize> {
        self.max_history
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Decode `path` and start a fresh session on it.
    ///
    /// Any previous session (and its history) is discarded, but only once the
    /// new image has decoded successfully.
    pub fn load(&mut self, path: &Path) -> Result<ImageInfo, LoadError> {
        let decoded = self
            .codec
            .decode(path)
            .map_err(|e| LoadError::from_codec(path, e))?;

        info!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "loaded image"
        );
        self.session = Some(Session {
            original: decoded.clone(),
            current: decoded,
            history: History::with_max_depth(self.max_history),
            source_path: path.to_path_buf(),
        });
        Ok(self.info())
    }

    /// Validate `op`, run it on the current buffer and record the previous one.
    pub fn apply_operation(&mut self, op: &Operation) -> Result<(), OperationError> {
        let session = self.session.as_mut().ok_or(OperationError::NoImageLoaded)?;
        let filter = op.validate().map_err(OperationError::InvalidParams)?;

        let result = ImageBuffer::new(filter.apply(session.current.as_image()));
        let previous = std::mem::replace(&mut session.current, result);
        session.history.record(previous);

        debug!(
            operation = %op,
            undo = session.history.undo_len(),
            "applied operation"
        );
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let session = self.session.as_mut().ok_or(HistoryError::NothingToUndo)?;
        session.history.undo(&mut session.current)?;
        debug!(
            undo = session.history.undo_len(),
            redo = session.history.redo_len(),
            "undo"
        );
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let session = self.session.as_mut().ok_or(HistoryError::NothingToRedo)?;
        session.history.redo(&mut session.current)?;
        debug!(
            undo = session.history.undo_len(),
            redo = session.history.redo_len(),
            "redo"
        );
        Ok(())
    }

    /// Go back to the image as loaded. Clears both stacks, so this cannot be undone.
    pub fn reset_to_original(&mut self) -> Result<(), OperationError> {
        let session = self.session.as_mut().ok_or(OperationError::NoImageLoaded)?;
        session.current = session.original.clone();
        session.history.clear();
        debug!("reset to original");
        Ok(())
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Encode the current buffer to `dest`. History and source path are untouched.
    pub fn save(&self, dest: &Path, format: SaveFormat) -> Result<(), SaveError> {
        let session = self.session.as_ref().ok_or(SaveError::NoImageLoaded)?;
        self.codec.encode(&session.current, dest, format)?;
        info!(path = %dest.display(), format = format.extension(), "saved image");
        Ok(())
    }

    /// Save to `dest` in the format its extension names, then make `dest` the
    /// file backing this session.
    pub fn save_as(&mut self, dest: &Path) -> Result<(), SaveError> {
        if self.session.is_none() {
            return Err(SaveError::NoImageLoaded);
        }
        let format = self.format_for(dest)?;
        self.save(dest, format)?;
        if let Some(session) = self.session.as_mut() {
            session.source_path = dest.to_path_buf();
        }
        Ok(())
    }

    /// Overwrite the file backing this session.
    pub fn save_to_source(&self) -> Result<(), SaveError> {
        let session = self.session.as_ref().ok_or(SaveError::NoImageLoaded)?;
        let format = self.format_for(&session.source_path)?;
        self.save(&session.source_path, format)
    }

    fn format_for(&self, path: &Path) -> Result<SaveFormat, SaveError> {
        SaveFormat::from_path(path, self.jpeg_quality).ok_or_else(|| {
            SaveError::UnsupportedFormat(format!(
                "{} (expected one of: {})",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            ))
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// The live buffer. Cloning is cheap; the store keeps its own reference.
    pub fn current_image(&self) -> Option<ImageBuffer> {
        self.session.as_ref().map(|s| s.current.clone())
    }

    pub fn original_image(&self) -> Option<ImageBuffer> {
        self.session.as_ref().map(|s| s.original.clone())
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.source_path.as_path())
    }

    pub fn info(&self) -> ImageInfo {
        let Some(session) = &self.session else {
            return ImageInfo::default();
        };
        let path = &session.source_path;
        ImageInfo {
            has_image: true,
            source_path: Some(path.clone()),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            width: session.current.width(),
            height: session.current.height(),
            channels: session.current.channels(),
            file_size: std::fs::metadata(path).ok().map(|m| m.len()),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.history.undo_len())
    }

    pub fn redo_depth(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.history.redo_len())
    }

    pub fn can_undo(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.history.can_redo())
    }
}
