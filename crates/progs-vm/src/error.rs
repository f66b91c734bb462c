//! Error types for the interpreter
//!
//! Every variant is fatal to the current invocation: dispatch aborts, the
//! call stack is forced back to depth zero, and the error surfaces to the
//! host. Whether that kills the surrounding session is the host's call.

use thiserror::Error;

/// Runtime faults raised during bytecode execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// Call-frame push at maximum stack depth
    #[error("stack overflow")]
    StackOverflow,

    /// Call-frame pop with no frames on the stack
    #[error("stack underflow")]
    StackUnderflow,

    /// Locals spill region has no room for the callee's parameter window
    #[error("locals stack overflow")]
    LocalsOverflow,

    /// Locals spill restore would retreat below zero
    #[error("locals stack underflow")]
    LocalsUnderflow,

    /// Call through a zero or out-of-range function reference
    #[error("NULL function call")]
    NullFunctionCall,

    /// Statement references an opcode the engine does not implement
    #[error("bad opcode {0}")]
    BadOpcode(u16),

    /// Absolute or indirect jump target outside the statement array
    #[error("invalid jump destination {0}")]
    InvalidJumpDestination(usize),

    /// Entity index outside the entity table
    #[error("entity {0} out of bounds")]
    OutOfBoundsEntity(i32),

    /// Write-addressing of entity 0 while the null-is-invalid policy is set
    #[error("assignment to world entity")]
    WorldEntityWrite,

    /// Field offset outside the per-entity field block
    #[error("invalid field {0} in entity")]
    InvalidField(u32),

    /// Flat pointer outside the global/entity address space
    #[error("pointer {0} outside the program address space")]
    OutOfBoundsPointer(usize),

    /// String reference with no table entry
    #[error("invalid string reference {0}")]
    BadStringRef(i32),

    /// Divide or modulo by zero not resolved by the fault policy
    #[error("division by zero")]
    DivisionByZero,

    /// Instruction ceiling exceeded
    #[error("runaway loop error")]
    RunawayLoop,

    /// Instruction pointer desynchronized from the statement array.
    /// Indicates an engine bug, not a bytecode bug.
    #[error("internal error: statement pointer {pc} out of sync")]
    InternalInconsistency { pc: isize },
}
