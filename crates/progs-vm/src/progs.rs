//! Program image: the loader-facing data model
//!
//! An external loader/relocator produces a populated [`ProgramImage`] —
//! statements, function table, initial register file, string table, and the
//! entity layout — and hands it to the interpreter. Everything here is
//! consumed read-mostly; the only post-load mutation is builtin registration
//! appending native function descriptors.

use serde::{Deserialize, Serialize};

/// Offset of the null global
pub const OFS_NULL: usize = 0;
/// Offset of the reserved return-value slot
pub const OFS_RETURN: usize = 1;
/// Offset of the first parameter window slot
pub const OFS_PARM0: usize = 4;
/// Words per parameter slot
pub const PARAM_WORDS: usize = 3;
/// Maximum parameter slots per call
pub const MAX_PARMS: usize = 8;

/// First global offset available to program-defined data
pub const RESERVED_GLOBALS: usize = OFS_PARM0 + MAX_PARMS * PARAM_WORDS;

/// Flat offset of parameter slot `i`
#[inline]
pub fn parm_offset(i: usize) -> usize {
    OFS_PARM0 + i * PARAM_WORDS
}

/// One bytecode instruction: opcode plus three operand offsets.
///
/// Operands are positions in the flat register space; branch and
/// immediate-indexed opcodes reinterpret the raw `u16` as a signed `i16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub op: u16,
    pub a: u16,
    pub b: u16,
    pub c: u16,
}

impl Statement {
    pub fn new(op: crate::opcode::Opcode, a: u16, b: u16, c: u16) -> Self {
        Statement {
            op: op as u16,
            a,
            b,
            c,
        }
    }

    /// Operand B as a signed branch offset / immediate index
    #[inline]
    pub fn b_signed(&self) -> i16 {
        self.b as i16
    }

    /// Operand A as a signed branch offset
    #[inline]
    pub fn a_signed(&self) -> i16 {
        self.a as i16
    }

    /// Operand C as a signed immediate index
    #[inline]
    pub fn c_signed(&self) -> i16 {
        self.c as i16
    }
}

/// Parameter count discipline of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    /// Exactly this many parameters
    Fixed(u8),
    /// At least this many fixed leading parameters, the rest variadic
    Variadic(u8),
}

impl Arity {
    /// Number of positionally-copied leading parameters
    pub fn fixed_count(self) -> usize {
        match self {
            Arity::Fixed(n) | Arity::Variadic(n) => n as usize,
        }
    }
}

/// Where a function's body lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionBody {
    /// Bytecode function entered at this statement index
    Bytecode { entry: usize },
    /// Native function dispatched through the builtin registry
    Native { builtin: usize },
}

/// One entry in the function table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub body: FunctionBody,
    pub arity: Arity,
    /// Declared word size of each parameter (1, 3, or 4)
    pub param_words: [u8; MAX_PARMS],
    /// Total words in the parameter window this function claims
    pub locals: usize,
    /// Base offset of the parameter window in the global register file
    pub parm_start: usize,
}

impl FunctionDescriptor {
    /// Descriptor for a native function; natives own no parameter window.
    pub fn native(name: impl Into<String>, arity: Arity, builtin: usize) -> Self {
        FunctionDescriptor {
            name: name.into(),
            body: FunctionBody::Native { builtin },
            arity,
            param_words: [PARAM_WORDS as u8; MAX_PARMS],
            locals: 0,
            parm_start: 0,
        }
    }
}

/// Well-known global and field offsets used by the STATE opcode pair.
/// Resolved by the loader from the program's symbol table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSlots {
    /// Global holding the current "self" entity reference
    pub self_global: usize,
    /// Global holding the current game time (float)
    pub time_global: usize,
    /// Entity field for the next think time
    pub nextthink_field: usize,
    /// Entity field for the animation frame
    pub frame_field: usize,
    /// Entity field for the think function reference
    pub think_field: usize,
}

/// A loaded, relocated program ready for execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramImage {
    pub statements: Vec<Statement>,
    pub functions: Vec<FunctionDescriptor>,
    /// Initial contents of the global register file (raw words)
    pub globals: Vec<u32>,
    /// Static string table; reference 0 must be the empty string
    pub strings: Vec<String>,
    /// Words of field storage per entity
    pub entity_fields: usize,
    /// Entity table capacity; entity 0 is the reserved "world"
    pub entity_count: usize,
    pub state_slots: StateSlots,
}

impl ProgramImage {
    /// Minimal image with the reserved globals present and an empty string
    /// table entry 0. Mostly a scaffold for loaders and tests.
    pub fn empty(entity_fields: usize, entity_count: usize) -> Self {
        ProgramImage {
            statements: Vec::new(),
            functions: Vec::new(),
            globals: vec![0; RESERVED_GLOBALS],
            strings: vec![String::new()],
            entity_fields,
            entity_count,
            state_slots: StateSlots::default(),
        }
    }
}
