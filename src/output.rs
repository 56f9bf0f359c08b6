//! CLI output formatting.
//!
//! # Status Line
//!
//! Every shell command answers with one status line in the same three-part
//! shape, so the session state is always visible after an edit:
//!
//! ```text
//! Blur applied (intensity: 5) | photo.jpg | 1920 × 1080
//! Nothing to undo | photo.jpg | 1920 × 1080
//! No image loaded | None | N/A
//! ```
//!
//! # Info
//!
//! ```text
//! File: photo.jpg
//!     Path: /home/me/photo.jpg
//!     Dimensions: 1920 × 1080
//!     Channels: 3
//!     Size: 512.4 KB
//! ```
//!
//! # Batch
//!
//! ```text
//! a.jpg → out/a.jpg
//! b.jpg: Cannot decode b.jpg: ...
//! Processed 2 files, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `String` or `Vec<String>`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::BatchOutcome;
use crate::imaging::Operation;
use crate::store::ImageInfo;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// `W × H`, the way dimensions are shown everywhere.
pub fn format_dimensions(width: u32, height: u32) -> String {
    format!("{width} × {height}")
}

/// Bytes as kilobytes with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Status line
// ============================================================================

/// Human message for a successfully applied operation.
pub fn operation_message(op: &Operation) -> String {
    match op {
        Operation::Grayscale => "Grayscale applied".to_string(),
        Operation::Blur { intensity } => format!("Blur applied (intensity: {intensity})"),
        Operation::EdgeDetect => "Edge detection applied".to_string(),
        Operation::Brightness { delta } => format!("Brightness: {delta}"),
        Operation::Contrast { factor } => format!("Contrast: {factor:.1}"),
        Operation::Rotate { degrees } => format!("Rotated {degrees}°"),
        Operation::Flip { axis } => format!("Flipped {axis}"),
        Operation::Resize { width, height } => format!("Resized to {width}×{height}"),
    }
}

/// `"<message> | <file> | <W × H>"`.
pub fn format_status(message: &str, info: &ImageInfo) -> String {
    let file = info.file_name.as_deref().unwrap_or("None");
    let dims = info
        .dimensions()
        .map(|(w, h)| format_dimensions(w, h))
        .unwrap_or_else(|| "N/A".to_string());
    format!("{message} | {file} | {dims}")
}

// ============================================================================
// Info
// ============================================================================

pub fn format_info(info: &ImageInfo) -> Vec<String> {
    if !info.has_image {
        return vec!["No image loaded".to_string()];
    }
    let mut lines = vec![format!(
        "File: {}",
        info.file_name.as_deref().unwrap_or("None")
    )];
    if let Some(path) = &info.source_path {
        lines.push(format!("    Path: {}", path.display()));
    }
    lines.push(format!(
        "    Dimensions: {}",
        format_dimensions(info.width, info.height)
    ));
    lines.push(format!("    Channels: {}", info.channels));
    if let Some(bytes) = info.file_size {
        lines.push(format!("    Size: {}", format_file_size(bytes)));
    }
    lines
}

pub fn print_info(info: &ImageInfo) {
    for line in format_info(info) {
        println!("{}", line);
    }
}

// ============================================================================
// History
// ============================================================================

/// Undo/redo depths and the configured cap.
pub fn format_history(undo: usize, redo: usize, max_depth: Option<usize>) -> Vec<String> {
    let limit = match max_depth {
        Some(n) => n.to_string(),
        None => "unlimited".to_string(),
    };
    vec![
        format!("Undo steps: {undo}"),
        format!("Redo steps: {redo}"),
        format!("Limit: {limit}"),
    ]
}

// ============================================================================
// Batch
// ============================================================================

pub fn format_batch(outcomes: &[BatchOutcome]) -> Vec<String> {
    let mut lines = Vec::with_capacity(outcomes.len() + 1);
    let mut failed = 0;
    for outcome in outcomes {
        let input = file_label(&outcome.input);
        match &outcome.result {
            Ok(dest) => lines.push(format!("{input} → {}", dest.display())),
            Err(e) => {
                failed += 1;
                lines.push(format!("{input}: {e}"));
            }
        }
    }
    let noun = if outcomes.len() == 1 { "file" } else { "files" };
    lines.push(format!(
        "Processed {} {noun}, {failed} failed",
        outcomes.len()
    ));
    lines
}

pub fn print_batch(outcomes: &[BatchOutcome]) {
    for line in format_batch(outcomes) {
        println!("{}", line);
    }
}
