//! Snapshot undo/redo history.

/// Named snapshots of a state, newest last.
#[derive(Debug, Clone)]
pub struct UndoStack<S> {
    undo: Vec<(String, S)>,
    redo: Vec<(String, S)>,
    limit: usize,
}

/// Commands kept by default.
pub const DEFAULT_UNDO_LIMIT: usize = 64;

impl<S> Default for UndoStack<S> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl<S> UndoStack<S> {
    /// An empty history holding at most `limit` commands.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state from before command `name`. Clears the redo list.
    pub fn record(&mut self, name: &str, before: S) {
        self.redo.clear();
        self.undo.push((name.to_string(), before));
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
    }

    /// Swap `current` for the state before the last command.
    pub fn undo(&mut self, current: S) -> Result<(String, S), S> {
        match self.undo.pop() {
            Some((name, before)) => {
                self.redo.push((name.clone(), current));
                Ok((name, before))
            }
            None => Err(current),
        }
    }

    /// Swap `current` for the state after the last undone command.
    pub fn redo(&mut self, current: S) -> Result<(String, S), S> {
        match self.redo.pop() {
            Some((name, after)) => {
                self.undo.push((name.clone(), current));
                Ok((name, after))
            }
            None => Err(current),
        }
    }

    /// True if there is a command to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// True if there is a command to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Names of undoable commands, oldest first.
    pub fn undo_names(&self) -> impl Iterator<Item = &str> {
        self.undo.iter().map(|(name, _)| name.as_str())
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
