//! # Image Studio
//!
//! A small image editor built around one idea: the editing session is a value
//! plus a history of previous values. Every edit produces a new image, the
//! old one goes onto the undo stack, and undo/redo just move snapshots
//! between stacks.
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────── shell / batch / CLI ────────────┐
//!            │                                             │
//!   Codec ◄──┤  ImageStore ── History<ImageBuffer>         ├──► Display
//!  (decode,  │      │                                      │   (preview)
//!   encode)  │      └── Operation → Filter → filters::*    │
//!            └─────────────────────────────────────────────┘
//! ```
//!
//! The [`store`] is the only component with real invariants. Everything else
//! is a collaborator: the [`imaging`] codec reads and writes files, the filter
//! library turns one buffer into another, the [`display`] shows results, and
//! the [`shell`] turns text into store calls.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | History-backed image store: session lifecycle, operations, undo/redo/reset, save |
//! | [`history`] | Generic linear undo/redo stacks with an optional depth cap |
//! | [`buffer`] | `ImageBuffer`, the immutable, cheaply clonable pixel value |
//! | [`imaging`] | Codec trait, operation catalogue, filter library, parameter types |
//! | [`display`] | Display adapter trait and the PNG preview renderer |
//! | [`shell`] | Line-command parser and interactive editing session |
//! | [`batch`] | Same operations over many files, in parallel |
//! | [`config`] | `image-studio.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Whole-Image Snapshots
//!
//! History stores full buffers rather than inverse operations. Blur and edge
//! detection have no inverse, so snapshots are the only uniform way to undo
//! every operation. `ImageBuffer` shares its pixels behind an `Arc`, so a
//! snapshot that is moved between stacks is never copied. Memory grows with
//! every edit; `history.max_depth` caps it when that matters.
//!
//! ## Validate, Then Apply
//!
//! An [`imaging::Operation`] carries raw numbers from the user. It is turned
//! into an [`imaging::Filter`] before anything touches the image, so an
//! out-of-range parameter fails with the session exactly as it was.
//!
//! ## One Owner, No Locks
//!
//! Mutating store methods take `&mut self`. The borrow checker already
//! forbids an undo racing an in-flight edit, so the store has no locking.
//! Batch work gets parallelism by giving each file its own store.

pub mod batch;
pub mod buffer;
pub mod config;
pub mod display;
pub mod history;
pub mod imaging;
pub mod output;
pub mod shell;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
