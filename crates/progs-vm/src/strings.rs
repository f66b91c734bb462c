//! String table and temporary strings
//!
//! String-valued registers hold signed references: non-negative values index
//! the static table loaded with the image, negative values index temporary
//! strings minted at runtime (string concatenation). Temporaries live on a
//! stack; each call frame records the high-water mark on entry and the
//! interpreter truncates back to it when the frame leaves, so a callee's
//! temporaries never outlive its activation.

use crate::error::VmError;

/// Signed string reference as stored in a register
pub type StringRef = i32;

#[derive(Debug, Clone)]
pub struct StringTable {
    statics: Vec<String>,
    temps: Vec<String>,
}

impl StringTable {
    /// Build from the image's static table. Entry 0 should be the empty
    /// string so that a zero register is a valid null string.
    pub fn new(statics: Vec<String>) -> Self {
        StringTable {
            statics,
            temps: Vec::new(),
        }
    }

    pub fn get(&self, r: StringRef) -> Result<&str, VmError> {
        let s = if r >= 0 {
            self.statics.get(r as usize)
        } else {
            self.temps.get((-r - 1) as usize)
        };
        s.map(String::as_str).ok_or(VmError::BadStringRef(r))
    }

    /// Mint a temporary string, returning its (negative) reference
    pub fn alloc_temp(&mut self, s: String) -> StringRef {
        self.temps.push(s);
        -(self.temps.len() as i32)
    }

    /// Concatenate two strings into a new temporary
    pub fn concat(&mut self, a: StringRef, b: StringRef) -> Result<StringRef, VmError> {
        let joined = format!("{}{}", self.get(a)?, self.get(b)?);
        Ok(self.alloc_temp(joined))
    }

    /// Current temporary high-water mark
    pub fn mark(&self) -> usize {
        self.temps.len()
    }

    /// Release all temporaries minted since `mark`
    pub fn release(&mut self, mark: usize) {
        self.temps.truncate(mark);
    }

    /// Drop every temporary (fatal-error cleanup)
    pub fn clear_temps(&mut self) {
        self.temps.clear();
    }
}
