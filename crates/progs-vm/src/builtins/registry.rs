//! Native function registry
//!
//! Hosts register natives by name; registration appends a descriptor to the
//! image's function table so bytecode can reach the native through an
//! ordinary function reference. Provides O(1) lookup by both name and id.

use crate::error::VmError;
use crate::progs::Arity;
use crate::vm::Vm;
use std::collections::HashMap;

/// Type signature for native functions.
///
/// A native reads its arguments from the parameter window, writes its
/// result into the reserved return slot, and may reentrantly call
/// [`Vm::invoke`].
pub type NativeFn = fn(&mut Vm) -> Result<(), VmError>;

/// Metadata for a single registered native
#[derive(Clone)]
pub struct BuiltinMetadata {
    pub name: String,
    pub func: NativeFn,
    pub arity: Arity,
}

/// Registry of all native functions
pub struct BuiltinRegistry {
    name_to_id: HashMap<String, usize>,
    functions: Vec<BuiltinMetadata>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        BuiltinRegistry {
            name_to_id: HashMap::new(),
            functions: Vec::new(),
        }
    }

    /// Register a native function, returning its id.
    ///
    /// # Panics
    /// Panics if the name is already registered; duplicate registration is
    /// a host programming error, not a runtime fault.
    pub fn register(&mut self, name: &str, arity: Arity, func: NativeFn) -> usize {
        if self.name_to_id.contains_key(name) {
            panic!("builtin '{}' already registered", name);
        }
        let id = self.functions.len();
        self.name_to_id.insert(name.to_string(), id);
        self.functions.push(BuiltinMetadata {
            name: name.to_string(),
            func,
            arity,
        });
        id
    }

    #[inline]
    pub fn get_fn(&self, id: usize) -> Option<NativeFn> {
        self.functions.get(id).map(|m| m.func)
    }

    pub fn get(&self, id: usize) -> Option<&BuiltinMetadata> {
        self.functions.get(id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}
