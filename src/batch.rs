//! Parallel batch editing.
//!
//! Applies the same operation list to many files. Every input gets its own
//! [`ImageStore`], so stores are never shared between threads; rayon only
//! distributes independent load → apply → save jobs across the pool.
//!
//! Failures are per file: one unreadable input does not stop the others.
//! The caller gets a [`BatchOutcome`] per input, in input order. Inputs
//! whose output path was already claimed by an earlier input fail with
//! [`BatchError::DuplicateOutput`] and are never loaded.

use crate::config::EditorConfig;
use crate::imaging::{Codec, Operation, Quality, SaveFormat};
use crate::store::{ImageStore, LoadError, OperationError, SaveError};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{operation}: {source}")]
    Operation {
        operation: String,
        source: OperationError,
    },
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("output {} already claimed by an earlier input", .0.display())]
    DuplicateOutput(PathBuf),
}

/// Result of one input file.
#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    /// Path written on success.
    pub result: Result<PathBuf, BatchError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Where an input's result goes, and in which format.
///
/// An explicit `format` wins; otherwise the input's own extension is kept
/// when it is writable, and PNG is used when it is not (e.g. TIFF input).
pub fn output_path(input: &Path, out_dir: &Path, format: Option<SaveFormat>, quality: Quality) -> (PathBuf, SaveFormat) {
    let format = format
        .or_else(|| SaveFormat::from_path(input, quality))
        .unwrap_or(SaveFormat::Png);
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    (out_dir.join(format!("{stem}.{}", format.extension())), format)
}

/// Run the batch with the production codec.
pub fn run_batch(
    inputs: &[PathBuf],
    ops: &[Operation],
    out_dir: &Path,
    format: Option<SaveFormat>,
    config: &EditorConfig,
) -> Vec<BatchOutcome> {
    run_batch_with(&crate::imaging::RustCodec::new(), inputs, ops, out_dir, format, config)
}

/// Run the batch with any shareable codec.
pub fn run_batch_with<C: Codec + Sync>(
    codec: &C,
    inputs: &[PathBuf],
    ops: &[Operation],
    out_dir: &Path,
    format: Option<SaveFormat>,
    config: &EditorConfig,
) -> Vec<BatchOutcome> {
    let quality = Quality::new(config.save.jpeg_quality);
    let mut claimed = HashSet::new();
    let plans: Vec<(&PathBuf, PathBuf, SaveFormat, bool)> = inputs
        .iter()
        .map(|input| {
            let (dest, format) = output_path(input, out_dir, format, quality);
            let first = claimed.insert(dest.clone());
            (input, dest, format, first)
        })
        .collect();

    plans
        .into_par_iter()
        .map(|(input, dest, format, first)| {
            let result = if first {
                process_one(codec, input, ops, &dest, format, config).map(|()| dest)
            } else {
                Err(BatchError::DuplicateOutput(dest))
            };
            match &result {
                Ok(dest) => debug!(input = %input.display(), output = %dest.display(), "batch item done"),
                Err(e) => warn!(input = %input.display(), error = %e, "batch item failed"),
            }
            BatchOutcome {
                input: input.clone(),
                result,
            }
        })
        .collect()
}

fn process_one<C: Codec>(
    codec: &C,
    input: &Path,
    ops: &[Operation],
    dest: &Path,
    format: SaveFormat,
    config: &EditorConfig,
) -> Result<(), BatchError> {
    let mut store = ImageStore::with_config(codec, config);
    store.load(input)?;
    for op in ops {
        store
            .apply_operation(op)
            .map_err(|source| BatchError::Operation {
                operation: op.to_string(),
                source,
            })?;
    }
    store.save(dest, format)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::codec::tests::{MockCodec, gradient};

    fn mock_with(paths: &[&str]) -> MockCodec {
        paths
            .iter()
            .fold(MockCodec::new(), |codec, p| codec.with_file(p, gradient(40, 20)))
    }

    #[test]
    fn output_path_keeps_writable_extension() {
        let (dest, format) = output_path(
            Path::new("/in/photo.jpg"),
            Path::new("/out"),
            None,
            Quality::new(90),
        );
        assert_eq!(dest, PathBuf::from("/out/photo.jpg"));
        assert_eq!(format, SaveFormat::Jpeg(Quality::new(90)));
    }

    #[test]
    fn output_path_falls_back_to_png() {
        let (dest, format) = output_path(
            Path::new("/in/scan.tiff"),
            Path::new("/out"),
            None,
            Quality::default(),
        );
        assert_eq!(dest, PathBuf::from("/out/scan.png"));
        assert_eq!(format, SaveFormat::Png);
    }

    #[test]
    fn output_path_explicit_format_wins() {
        let (dest, _) = output_path(
            Path::new("/in/photo.jpg"),
            Path::new("/out"),
            Some(SaveFormat::Bmp),
            Quality::default(),
        );
        assert_eq!(dest, PathBuf::from("/out/photo.bmp"));
    }

    #[test]
    fn batch_applies_ops_to_every_input() {
        let codec = mock_with(&["/in/a.png", "/in/b.png"]);
        let inputs = vec![PathBuf::from("/in/a.png"), PathBuf::from("/in/b.png")];
        let ops = vec![Operation::Rotate { degrees: 90 }, Operation::Grayscale];

        let outcomes = run_batch_with(
            &codec,
            &inputs,
            &ops,
            Path::new("/out"),
            None,
            &EditorConfig::default(),
        );

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(BatchOutcome::is_ok));
        assert_eq!(outcomes[0].input, PathBuf::from("/in/a.png"));
        assert_eq!(codec.written("/out/a.png").unwrap().dimensions(), (20, 40));
        assert_eq!(codec.written("/out/b.png").unwrap().dimensions(), (20, 40));
    }

    #[test]
    fn batch_failures_are_per_file() {
        let codec = mock_with(&["/in/a.png"]);
        let inputs = vec![PathBuf::from("/in/missing.png"), PathBuf::from("/in/a.png")];

        let outcomes = run_batch_with(
            &codec,
            &inputs,
            &[Operation::Grayscale],
            Path::new("/out"),
            None,
            &EditorConfig::default(),
        );

        assert!(matches!(outcomes[0].result, Err(BatchError::Load(_))));
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn batch_reports_invalid_operation() {
        let codec = mock_with(&["/in/a.png"]);
        let outcomes = run_batch_with(
            &codec,
            &[PathBuf::from("/in/a.png")],
            &[Operation::Blur { intensity: 99 }],
            Path::new("/out"),
            None,
            &EditorConfig::default(),
        );

        match &outcomes[0].result {
            Err(BatchError::Operation { operation, source }) => {
                assert_eq!(operation, "blur 99");
                assert!(matches!(source, OperationError::InvalidParams(_)));
            }
            other => panic!("expected operation error, got {other:?}"),
        }
        assert!(codec.written("/out/a.png").is_none());
    }

    #[test]
    fn colliding_outputs_fail_the_later_input() {
        let codec = MockCodec::new()
            .with_file("/in/a.jpg", gradient(40, 20))
            .with_file("/in/a.png", gradient(10, 10))
            .with_file("/in/b.png", gradient(10, 10));
        let inputs = vec![
            PathBuf::from("/in/a.jpg"),
            PathBuf::from("/in/a.png"),
            PathBuf::from("/in/b.png"),
        ];

        let outcomes = run_batch_with(
            &codec,
            &inputs,
            &[Operation::Grayscale],
            Path::new("/out"),
            Some(SaveFormat::Png),
            &EditorConfig::default(),
        );

        assert_eq!(
            outcomes[0].result.as_ref().unwrap(),
            &PathBuf::from("/out/a.png")
        );
        assert!(matches!(
            &outcomes[1].result,
            Err(BatchError::DuplicateOutput(dest)) if dest == Path::new("/out/a.png")
        ));
        assert!(outcomes[2].is_ok());
        // The first claimant's pixels are the ones on disk
        assert_eq!(codec.written("/out/a.png").unwrap().dimensions(), (40, 20));
    }

    #[test]
    fn default_formats_can_collide_too() {
        let codec = mock_with(&["/in/scan.tiff", "/in/scan.png"]);
        let inputs = vec![PathBuf::from("/in/scan.tiff"), PathBuf::from("/in/scan.png")];

        let outcomes = run_batch_with(
            &codec,
            &inputs,
            &[],
            Path::new("/out"),
            None,
            &EditorConfig::default(),
        );

        assert!(outcomes[0].is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(BatchError::DuplicateOutput(_))
        ));
    }

    #[test]
    fn batch_with_no_ops_copies() {
        let codec = mock_with(&["/in/a.png"]);
        let outcomes = run_batch_with(
            &codec,
            &[PathBuf::from("/in/a.png")],
            &[],
            Path::new("/out"),
            Some(SaveFormat::Bmp),
            &EditorConfig::default(),
        );
        assert_eq!(
            outcomes[0].result.as_ref().unwrap(),
            &PathBuf::from("/out/a.bmp")
        );
        assert_eq!(codec.written("/out/a.bmp").unwrap(), gradient(40, 20));
    }
}
