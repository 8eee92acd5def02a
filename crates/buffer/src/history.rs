use super::Position;

/// Recorded buffer mutation for undo/redo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `text` was inserted at `before`, ending at `after`
    Insert {
        before: Position,
        after: Position,
        text: String,
    },
    /// `text` was removed from the span `[before, after)`
    Delete {
        before: Position,
        after: Position,
        text: String,
    },
}

impl Operation {
    /// Get inverse operation
    pub fn inverse(&self) -> Operation {
        match self {
            Operation::Insert {
                before,
                after,
                text,
            } => Operation::Delete {
                before: *before,
                after: *after,
                text: text.clone(),
            },
            Operation::Delete {
                before,
                after,
                text,
            } => Operation::Insert {
                before: *before,
                after: *after,
                text: text.clone(),
            },
        }
    }

    /// Start of the affected span
    pub fn before(&self) -> Position {
        match self {
            Operation::Insert { before, .. } | Operation::Delete { before, .. } => *before,
        }
    }

    /// End of the affected span
    pub fn after(&self) -> Position {
        match self {
            Operation::Insert { after, .. } | Operation::Delete { after, .. } => *after,
        }
    }

    /// Inserted or deleted text
    pub fn text(&self) -> &str {
        match self {
            Operation::Insert { text, .. } | Operation::Delete { text, .. } => text,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Insert { .. } => "insert",
            Operation::Delete { .. } => "delete",
        }
    }
}

/// Edit history for undo/redo
#[derive(Debug, Clone)]
pub struct History {
    /// Operation stack for undo
    undo_stack: Vec<Operation>,
    /// Operation stack for redo
    redo_stack: Vec<Operation>,
    /// Maximum undo depth, 0 for unbounded
    max_size: usize,
}

impl History {
    /// Create a new history
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// Create history with specified size
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record operation to history
    pub fn push(&mut self, op: Operation) {
        // New edits invalidate everything that was undone
        self.redo_stack.clear();
        self.undo_stack.push(op);

        if self.max_size > 0 && self.undo_stack.len() > self.max_size {
            let dropped = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..dropped);
            log::debug!("History limit {} reached, dropped oldest entry", self.max_size);
        }
    }

    /// Undo last operation
    ///
    /// Returns the inverse operation the caller has to apply.
    pub fn undo(&mut self) -> Option<Operation> {
        let op = self.undo_stack.pop()?;
        let inverse = op.inverse();
        self.redo_stack.push(op);
        Some(inverse)
    }

    /// Redo undone operation
    pub fn redo(&mut self) -> Option<Operation> {
        let op = self.redo_stack.pop()?;
        // Original operation, not the inverse
        self.undo_stack.push(op.clone());
        Some(op)
    }

    /// Check if undo is possible
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is possible
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Change the undo depth, trimming the oldest entries if needed
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        if max_size > 0 && self.undo_stack.len() > max_size {
            let dropped = self.undo_stack.len() - max_size;
            self.undo_stack.drain(..dropped);
        }
    }

    /// Clear history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
