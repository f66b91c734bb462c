//! Native ("builtin") function support
//!
//! Builtin implementations live in the host; this module only defines the
//! dispatch contract: the registry, the function-pointer signature, and the
//! calling convention helpers exposed on [`Vm`](crate::vm::Vm)
//! (`arg_count`, `param_word`, `set_return`, ...).

pub mod registry;

pub use registry::{BuiltinMetadata, BuiltinRegistry, NativeFn};
