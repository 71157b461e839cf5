// FIFO buffer between command intake and program execution

use std::collections::VecDeque;

/// Pending direction commands, executed in insertion order
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: VecDeque<i32>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. Range checks are up to the caller.
    pub fn enqueue(&mut self, value: i32) {
        self.commands.push_back(value);
    }

    /// Take the oldest command, `None` once the queue is exhausted
    pub fn dequeue(&mut self) -> Option<i32> {
        self.commands.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pending commands, oldest first
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.commands.iter().copied()
    }
}

impl Extend<i32> for CommandQueue {
    fn extend<I: IntoIterator<Item = i32>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}
