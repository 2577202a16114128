//! Host navigation history seam
//!
//! The browser implementation lives in crm-web; [`MemoryHistory`] backs the
//! CLI and the tests with a real back/forward stack.

use parking_lot::Mutex;

/// Host navigation history (paths include the base prefix)
pub trait HistoryDriver: Send + Sync {
    /// Path currently displayed by the host
    fn current_path(&self) -> String;

    /// Add a history entry (user-driven transitions)
    fn push(&self, path: &str);

    /// Overwrite the current entry (corrections, never a new back-stack entry)
    fn replace(&self, path: &str);
}

/// Kind of history write, recorded by [`MemoryHistory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOp {
    Push(String),
    Replace(String),
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
    ops: Vec<HistoryOp>,
}

/// In-process history stack with browser semantics:
/// a push truncates any forward entries.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<Stack>,
}

impl MemoryHistory {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Stack {
                entries: vec![initial_path.into()],
                index: 0,
                ops: Vec::new(),
            }),
        }
    }

    /// Step back one entry; returns the new current path, or `None` at the start
    pub fn back(&self) -> Option<String> {
        let mut stack = self.inner.lock();
        if stack.index == 0 {
            return None;
        }
        stack.index -= 1;
        Some(stack.entries[stack.index].clone())
    }

    /// Step forward one entry; returns the new current path, or `None` at the end
    pub fn forward(&self) -> Option<String> {
        let mut stack = self.inner.lock();
        if stack.index + 1 >= stack.entries.len() {
            return None;
        }
        stack.index += 1;
        Some(stack.entries[stack.index].clone())
    }

    /// Number of entries in the back/forward stack
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Every push/replace issued so far, oldest first
    pub fn ops(&self) -> Vec<HistoryOp> {
        self.inner.lock().ops.clone()
    }

    pub fn push_count(&self) -> usize {
        self.inner
            .lock()
            .ops
            .iter()
            .filter(|op| matches!(op, HistoryOp::Push(_)))
            .count()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HistoryDriver for MemoryHistory {
    fn current_path(&self) -> String {
        let stack = self.inner.lock();
        stack.entries[stack.index].clone()
    }

    fn push(&self, path: &str) {
        let mut stack = self.inner.lock();
        let next = stack.index + 1;
        stack.entries.truncate(next);
        stack.entries.push(path.to_string());
        stack.index = next;
        stack.ops.push(HistoryOp::Push(path.to_string()));
    }

    fn replace(&self, path: &str) {
        let mut stack = self.inner.lock();
        let index = stack.index;
        stack.entries[index] = path.to_string();
        stack.ops.push(HistoryOp::Replace(path.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_forward() {
        let history = MemoryHistory::new("/");
        history.push("/leads");
        history.push("/leads/CRM-LEAD-1");
        assert_eq!(history.len(), 3);

        assert_eq!(history.back().as_deref(), Some("/leads"));
        assert_eq!(history.current_path(), "/leads");
        assert_eq!(history.forward().as_deref(), Some("/leads/CRM-LEAD-1"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push("/leads");
        history.push("/deals");
        history.back();
        history.push("/contacts");

        assert_eq!(history.len(), 3);
        assert_eq!(history.forward(), None);
        assert_eq!(history.back().as_deref(), Some("/leads"));
    }

    #[test]
    fn test_replace_does_not_grow_stack() {
        let history = MemoryHistory::new("/deals/missing");
        history.replace("/deals");
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_path(), "/deals");
        assert_eq!(history.ops(), vec![HistoryOp::Replace("/deals".to_string())]);
        assert_eq!(history.push_count(), 0);
    }
}
