//! progs virtual machine
//!
//! A register-machine bytecode interpreter for compiled game-logic
//! programs. An external loader produces a [`ProgramImage`] — statements,
//! function table, initial global register file, string table, and the
//! per-entity field layout — and the interpreter executes it against a
//! flat, typed address space shared by globals and entity fields.
//!
//! # Architecture
//!
//! - Untagged 32-bit register slots; each opcode imposes the type
//!   (float/int/unsigned/vector/quaternion/string/entity/function/pointer)
//! - A fixed-depth call stack with a spill region for the words a callee's
//!   parameter window overwrites
//! - A fetch-decode-execute loop with typed opcodes, running until the
//!   call depth returns to its value at invocation start
//! - Native "builtin" functions dispatched through a registry, free to
//!   reentrantly invoke the interpreter
//! - A check-before-divide fault policy that turns divide/modulo-by-zero
//!   into defined sentinel results instead of host traps
//!
//! # Modules
//!
//! - `opcode`: instruction set definitions
//! - `progs`: the loader-facing program image
//! - `value`: register words and vector/quaternion helpers
//! - `memory`: the flat global/entity-field arena
//! - `strings`: static string table and runtime temporaries
//! - `vm`: the execution engine
//! - `builtins`: native-function registry and calling convention
//! - `fault`: divide/modulo-by-zero policy
//! - `debug`: disassembly and state dumps
//! - `error`: runtime fault taxonomy

pub mod builtins;
pub mod debug;
pub mod error;
mod fault;
pub mod memory;
pub mod opcode;
pub mod progs;
pub mod strings;
pub mod value;
pub mod vm;

// Re-export main types
pub use builtins::{BuiltinRegistry, NativeFn};
pub use error::VmError;
pub use opcode::Opcode;
pub use progs::{
    Arity, FunctionBody, FunctionDescriptor, ProgramImage, StateSlots, Statement, MAX_PARMS,
    OFS_PARM0, OFS_RETURN, PARAM_WORDS, RESERVED_GLOBALS,
};
pub use value::Word;
pub use vm::{ExecPolicy, Vm, LOCALSTACK_SIZE, MAX_STACK_DEPTH};
