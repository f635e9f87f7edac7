//! Bounded linear undo history.
//!
//! Frames are kept oldest first with a cursor on the frame currently shown.
//! Pushing after an undo discards the frames ahead of the cursor; there is no
//! redo. Once the history exceeds its capacity the oldest frame is evicted and
//! the cursor shifts with it, so it keeps pointing at the same frame.

use std::collections::VecDeque;

use crate::consts::HISTORY_CAPACITY;

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

#[derive(Debug, Clone)]
pub struct History<T> {
    frames: VecDeque<T>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl<T> History<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A history retaining at most `capacity` frames (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { frames: VecDeque::with_capacity(capacity + 1), cursor: None, capacity }
    }

    /// Record a new frame and make it current.
    pub fn push(&mut self, frame: T) {
        if let Some(cursor) = self.cursor {
            self.frames.truncate(cursor + 1);
        }
        self.frames.push_back(frame);
        let mut cursor = self.frames.len() - 1;
        if self.frames.len() > self.capacity {
            self.frames.pop_front();
            cursor -= 1;
        }
        self.cursor = Some(cursor);
    }

    /// Step back one frame and return it for display.
    ///
    /// Returns `None` without moving when already at the oldest frame (or
    /// empty); the drawing engine treats that as a request to clear.
    pub fn undo(&mut self) -> Option<&T> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.frames.get(cursor - 1)
            }
            _ => None,
        }
    }

    /// Whether [`Self::undo`] would restore an earlier frame.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// The frame currently shown.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.frames.get(c))
    }

    /// Index of the current frame, `None` when empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frame at `index`, oldest first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.frames.get(index)
    }
}
