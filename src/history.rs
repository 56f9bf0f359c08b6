//! Linear undo/redo history over whole-value snapshots.
//!
//! [`History`] keeps two stacks, most-recent-last:
//!
//! ```text
//! undo: [s0, s1, s2]   current   redo: [r1, r0]
//!                 ^ popped by undo         ^ popped by redo
//! ```
//!
//! - [`History::record`] pushes the pre-edit value and drops the redo stack:
//!   redo history never survives a fresh edit.
//! - [`History::undo`] / [`History::redo`] swap `current` with the top of the
//!   respective stack, moving the displaced value onto the other stack.
//!
//! Depth is unbounded unless a cap is given, in which case the oldest undo
//! snapshot is discarded once the cap is exceeded.

use std::collections::VecDeque;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: VecDeque<T>,
    redo_stack: Vec<T>,
    max_depth: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> History<T> {
    pub fn unbounded() -> Self {
        Self::with_max_depth(None)
    }

    /// `None` keeps every snapshot; `Some(n)` keeps the `n` most recent.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the value as it was before an edit.
    pub fn record(&mut self, previous: T) {
        self.undo_stack.push_back(previous);
        if self.max_depth.is_some_and(|max| self.undo_stack.len() > max) {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Step back one edit. On failure `current` is left untouched.
    pub fn undo(&mut self, current: &mut T) -> Result<(), HistoryError> {
        let previous = self
            .undo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToUndo)?;
        self.redo_stack.push(std::mem::replace(current, previous));
        Ok(())
    }

    /// Re-apply the most recently undone edit. On failure `current` is left untouched.
    pub fn redo(&mut self, current: &mut T) -> Result<(), HistoryError> {
        let next = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        self.undo_stack.push_back(std::mem::replace(current, next));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_then_undo_restores_previous() {
        let mut h = History::unbounded();
        let mut current = 1;
        h.record(current);
        current = 2;

        h.undo(&mut current).unwrap();
        assert_eq!(current, 1);
        assert_eq!(h.undo_len(), 0);
        assert_eq!(h.redo_len(), 1);
    }

    #[test]
    fn redo_reapplies_undone_value() {
        let mut h = History::unbounded();
        let mut current = 1;
        h.record(current);
        current = 2;
        h.undo(&mut current).unwrap();

        h.redo(&mut current).unwrap();
        assert_eq!(current, 2);
        assert_eq!(h.undo_len(), 1);
        assert_eq!(h.redo_len(), 0);
    }

    #[test]
    fn record_clears_redo() {
        let mut h = History::unbounded();
        let mut current = 1;
        h.record(current);
        current = 2;
        h.undo(&mut current).unwrap();
        assert!(h.can_redo());

        h.record(current);
        assert!(!h.can_redo());
        assert_eq!(h.undo_len(), 1);
    }

    #[test]
    fn undo_on_empty_fails_without_change() {
        let mut h: History<i32> = History::unbounded();
        let mut current = 7;
        assert_eq!(h.undo(&mut current), Err(HistoryError::NothingToUndo));
        assert_eq!(current, 7);
        assert_eq!(h.redo_len(), 0);
    }

    #[test]
    fn redo_on_empty_fails_without_change() {
        let mut h: History<i32> = History::unbounded();
        let mut current = 7;
        assert_eq!(h.redo(&mut current), Err(HistoryError::NothingToRedo));
        assert_eq!(current, 7);
        assert_eq!(h.undo_len(), 0);
    }

    #[test]
    fn n_undos_walk_back_to_start() {
        let mut h = History::unbounded();
        let mut current = 0;
        for next in 1..=5 {
            h.record(current);
            current = next;
        }
        assert_eq!(h.undo_len(), 5);

        for _ in 0..5 {
            h.undo(&mut current).unwrap();
        }
        assert_eq!(current, 0);
        assert_eq!(h.undo_len(), 0);
        assert_eq!(h.redo_len(), 5);
    }

    #[test]
    fn max_depth_discards_oldest() {
        let mut h = History::with_max_depth(Some(2));
        let mut current = 0;
        for next in 1..=4 {
            h.record(current);
            current = next;
        }
        assert_eq!(h.undo_len(), 2);

        h.undo(&mut current).unwrap();
        h.undo(&mut current).unwrap();
        assert_eq!(current, 2);
        assert!(!h.can_undo());
    }

    #[test]
    fn capped_history_keeps_most_recent_in_order() {
        let mut h = History::with_max_depth(Some(3));
        let mut current = 0;
        for next in 1..=1000 {
            h.record(current);
            current = next;
        }
        assert_eq!(h.undo_len(), 3);

        let mut seen = Vec::new();
        while h.undo(&mut current).is_ok() {
            seen.push(current);
        }
        assert_eq!(seen, vec![999, 998, 997]);
        assert_eq!(h.redo_len(), 3);
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut h = History::unbounded();
        let mut current = 0;
        h.record(current);
        current = 1;
        h.record(current);
        current = 2;
        h.undo(&mut current).unwrap();

        h.clear();
        assert_eq!(h.undo_len(), 0);
        assert_eq!(h.redo_len(), 0);
    }
}
