//! Call frames and the locals spill region
//!
//! Both structures are allocated once and reused across every top-level
//! invocation; individual invocations only push and pop within them. The
//! depth cursor and the spill high-water mark are the invariants the whole
//! reentrancy story rests on: a nested invocation tracks its own exit depth
//! and never pops a frame belonging to an outer one.

use crate::error::VmError;
use crate::value::Word;

/// Maximum call-frame depth
pub const MAX_STACK_DEPTH: usize = 32;
/// Capacity of the locals spill region, in words
pub const LOCALSTACK_SIZE: usize = 4096;

/// Saved caller context, pushed on call and popped on return
#[derive(Debug, Clone, Copy)]
pub struct StackFrame {
    /// Caller's statement index
    pub statement: isize,
    /// Caller's function table index, None at the bottom of an invocation
    pub function: Option<usize>,
    /// Caller's temporary-string high-water mark
    pub string_mark: usize,
}

/// Fixed-depth frame stack
#[derive(Debug)]
pub struct CallStack {
    frames: Vec<StackFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: Vec::with_capacity(MAX_STACK_DEPTH),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, frame: StackFrame) -> Result<(), VmError> {
        if self.frames.len() == MAX_STACK_DEPTH {
            return Err(VmError::StackOverflow);
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<StackFrame, VmError> {
        self.frames.pop().ok_or(VmError::StackUnderflow)
    }

    /// Innermost-to-outermost view, for diagnostics
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Fatal-error cleanup: subsequent invocations start clean
    pub fn reset(&mut self) {
        self.frames.clear();
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Spill region holding a callee's parameter-window contents while the
/// callee's own locals occupy that window
#[derive(Debug)]
pub struct LocalsStack {
    words: Vec<Word>,
}

impl LocalsStack {
    pub fn new() -> Self {
        LocalsStack {
            words: Vec::with_capacity(LOCALSTACK_SIZE),
        }
    }

    /// Current high-water mark in words
    pub fn used(&self) -> usize {
        self.words.len()
    }

    /// Save a parameter window, advancing the high-water mark
    pub fn save(&mut self, window: &[Word]) -> Result<(), VmError> {
        if self.words.len() + window.len() > LOCALSTACK_SIZE {
            return Err(VmError::LocalsOverflow);
        }
        self.words.extend_from_slice(window);
        Ok(())
    }

    /// Restore the most recent `count` words, retreating the mark
    pub fn restore(&mut self, count: usize) -> Result<Vec<Word>, VmError> {
        if count > self.words.len() {
            return Err(VmError::LocalsUnderflow);
        }
        Ok(self.words.split_off(self.words.len() - count))
    }

    /// Fatal-error cleanup
    pub fn reset(&mut self) {
        self.words.clear();
    }
}

impl Default for LocalsStack {
    fn default() -> Self {
        Self::new()
    }
}
