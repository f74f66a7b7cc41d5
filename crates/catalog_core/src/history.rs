use std::sync::{Mutex, PoisonError};

use crate::url_codec::strip_question_mark;

/// The navigation location the browse view reads on mount and writes on every
/// filter change. Queries are exchanged without a leading `?`.
pub trait NavigationHistory: Send + Sync {
    fn current(&self) -> String;
    fn push(&self, query: &str);
    fn replace(&self, query: &str);
}

#[derive(Debug)]
struct HistoryStack {
    entries: Vec<String>,
    cursor: usize,
}

/// In-process history stack with back/forward, used by the CLI and tests.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<HistoryStack>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Mutex::new(HistoryStack {
                entries: vec![strip_question_mark(initial).to_string()],
                cursor: 0,
            }),
        }
    }

    /// Moves one entry back and returns the new location, if there is one.
    pub fn back(&self) -> Option<String> {
        let mut stack = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if stack.cursor == 0 {
            return None;
        }
        stack.cursor -= 1;
        Some(stack.entries[stack.cursor].clone())
    }

    pub fn forward(&self) -> Option<String> {
        let mut stack = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if stack.cursor + 1 >= stack.entries.len() {
            return None;
        }
        stack.cursor += 1;
        Some(stack.entries[stack.cursor].clone())
    }

    pub fn entries(&self) -> Vec<String> {
        let stack = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        stack.entries.clone()
    }
}

impl NavigationHistory for MemoryHistory {
    fn current(&self) -> String {
        let stack = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        stack.entries[stack.cursor].clone()
    }

    fn push(&self, query: &str) {
        let mut stack = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let keep = stack.cursor + 1;
        stack.entries.truncate(keep);
        stack.entries.push(strip_question_mark(query).to_string());
        stack.cursor = stack.entries.len() - 1;
    }

    fn replace(&self, query: &str) {
        let mut stack = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let cursor = stack.cursor;
        stack.entries[cursor] = strip_question_mark(query).to_string();
    }
}
