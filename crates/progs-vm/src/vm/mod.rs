//! Virtual machine execution engine
//!
//! [`Vm::invoke`] is the sole entry point: it pushes a frame for the target
//! function and runs the fetch-decode-execute cycle until the call-stack
//! depth drops back to where it was at invocation start. Builtins run
//! natively inside a cycle and may reentrantly call `invoke` on another
//! function; each invocation tracks its own exit depth, so an inner
//! invocation can never pop a frame belonging to an outer one.

use crate::builtins::{BuiltinRegistry, NativeFn};
use crate::error::VmError;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::progs::{
    parm_offset, Arity, FunctionBody, FunctionDescriptor, ProgramImage, Statement, MAX_PARMS,
    OFS_RETURN, PARAM_WORDS,
};
use crate::strings::{StringRef, StringTable};
use crate::value::Word;

mod execution;
mod frame;
mod result;

pub use frame::{CallStack, LocalsStack, StackFrame, LOCALSTACK_SIZE, MAX_STACK_DEPTH};

use result::ExecutionResult;

/// Default instruction ceiling per invocation
pub const DEFAULT_INSTRUCTION_LIMIT: u64 = 1_000_000;

/// Poison pattern for freshly-claimed locals in deadbeef mode
const DEADBEEF: u32 = 0xdead_beef;

/// Host-settable execution switches, each independently togglable
#[derive(Debug, Clone)]
pub struct ExecPolicy {
    /// Validate entity/field addressing and absolute jump destinations
    pub bounds_check: bool,
    /// Sanitize divide/modulo-by-zero into defined sentinel results
    pub fault_checks: bool,
    /// Reject write-addressing of entity 0 ("world")
    pub null_bad: bool,
    /// Poison a callee's parameter window with 0xdeadbeef on entry, to
    /// surface uninitialized-read bugs
    pub deadbeef_locals: bool,
    /// Instruction ceiling per invocation
    pub instruction_limit: u64,
    /// Disable the instruction ceiling entirely
    pub unlimited: bool,
    /// Log every dispatched statement
    pub trace: bool,
}

impl Default for ExecPolicy {
    fn default() -> Self {
        ExecPolicy {
            bounds_check: true,
            fault_checks: false,
            null_bad: false,
            deadbeef_locals: false,
            instruction_limit: DEFAULT_INSTRUCTION_LIMIT,
            unlimited: false,
            trace: false,
        }
    }
}

/// The interpreter
pub struct Vm {
    image: ProgramImage,
    pub memory: Memory,
    pub strings: StringTable,
    pub policy: ExecPolicy,

    stack: CallStack,
    locals: LocalsStack,
    registry: BuiltinRegistry,

    /// Current statement index; -1 before the first pre-increment
    pc: isize,
    /// Function table index of the executing function
    current_function: Option<usize>,
    /// Temporary-string high-water mark at the current frame's entry
    string_mark: usize,
    /// Actual argument count of the most recent call opcode
    argc: usize,
}

impl Vm {
    /// Take ownership of a loaded image and set up the runtime state
    pub fn new(image: ProgramImage) -> Self {
        let memory = Memory::new(&image.globals, image.entity_fields, image.entity_count);
        let strings = StringTable::new(image.strings.clone());
        Vm {
            image,
            memory,
            strings,
            policy: ExecPolicy::default(),
            stack: CallStack::new(),
            locals: LocalsStack::new(),
            registry: BuiltinRegistry::new(),
            pc: -1,
            current_function: None,
            string_mark: 0,
            argc: 0,
        }
    }

    pub fn image(&self) -> &ProgramImage {
        &self.image
    }

    /// Register a native function and append its descriptor to the function
    /// table, returning the new function index.
    pub fn register_builtin(
        &mut self,
        name: &str,
        arity: Arity,
        func: NativeFn,
    ) -> usize {
        let builtin = self.registry.register(name, arity, func);
        self.image
            .functions
            .push(FunctionDescriptor::native(name, arity, builtin));
        self.image.functions.len() - 1
    }

    pub fn call_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn locals_used(&self) -> usize {
        self.locals.used()
    }

    /// Execute a function to completion.
    ///
    /// On a fatal fault the diagnostic state dump is logged, the call stack
    /// and spill region are forced back to empty so the next invocation
    /// starts clean, and the fault is returned. Function index 0 is the
    /// reserved null function.
    pub fn invoke(&mut self, fnum: usize) -> Result<(), VmError> {
        match self.invoke_inner(fnum) {
            Ok(()) => Ok(()),
            Err(fault) => {
                log::error!("program error: {fault}\n{}", self.dump_state());
                self.stack.reset();
                self.locals.reset();
                self.strings.clear_temps();
                self.current_function = None;
                self.string_mark = 0;
                Err(fault)
            }
        }
    }

    fn invoke_inner(&mut self, fnum: usize) -> Result<(), VmError> {
        if fnum == 0 || fnum >= self.image.functions.len() {
            return Err(VmError::NullFunctionCall);
        }
        match self.image.functions[fnum].body {
            FunctionBody::Native { builtin } => {
                // no frame; the native reads the parameter window directly
                let func = self
                    .registry
                    .get_fn(builtin)
                    .ok_or(VmError::NullFunctionCall)?;
                func(self)
            }
            FunctionBody::Bytecode { .. } => {
                let exit_depth = self.stack.depth();
                self.enter_function(fnum)?;
                self.run(exit_depth)
            }
        }
    }

    /// The interpretation main loop
    fn run(&mut self, exit_depth: usize) -> Result<(), VmError> {
        let mut profile: u64 = 0;

        loop {
            // offset applied by every control-flow opcode assumes this
            self.pc += 1;

            profile += 1;
            if profile > self.policy.instruction_limit && !self.policy.unlimited {
                return Err(VmError::RunawayLoop);
            }

            let st = usize::try_from(self.pc)
                .ok()
                .and_then(|idx| self.image.statements.get(idx))
                .copied()
                .ok_or(VmError::InternalInconsistency { pc: self.pc })?;

            if self.policy.trace {
                log::trace!("{:>6}: {}", self.pc, crate::debug::disassemble(&st));
            }

            let op = Opcode::from_u16(st.op).ok_or(VmError::BadOpcode(st.op))?;

            match self.execute_statement(op, st)? {
                ExecutionResult::Continue => {}
                ExecutionResult::Returned => {
                    if self.stack.depth() == exit_depth {
                        return Ok(());
                    }
                }
            }
        }
    }

    // ===== frame discipline =====

    /// Push a frame and set up the callee's parameter window
    pub(crate) fn enter_function(&mut self, fnum: usize) -> Result<(), VmError> {
        let f = self.image.functions[fnum].clone();
        let entry = match f.body {
            FunctionBody::Bytecode { entry } => entry,
            FunctionBody::Native { .. } => return Err(VmError::NullFunctionCall),
        };

        self.stack.push(StackFrame {
            statement: self.pc,
            function: self.current_function,
            string_mark: self.string_mark,
        })?;
        self.string_mark = self.strings.mark();
        self.current_function = Some(fnum);
        // offset the loop's pre-increment so execution lands on the entry
        self.pc = entry as isize - 1;

        // save off the locals the callee is about to step on
        let window = self.memory.read_span(f.parm_start, f.locals)?;
        self.locals.save(&window)?;

        if self.policy.deadbeef_locals {
            self.memory
                .fill_span(f.parm_start, f.locals, Word::from_raw(DEADBEEF))?;
        }

        self.copy_parameters(&f)
    }

    fn copy_parameters(&mut self, f: &FunctionDescriptor) -> Result<(), VmError> {
        let mut o = f.parm_start;
        match f.arity {
            Arity::Fixed(n) => {
                for i in 0..n as usize {
                    let words = f.param_words[i] as usize;
                    self.memory.copy_span(parm_offset(i), o, words)?;
                    o += words;
                }
            }
            Arity::Variadic(n) => {
                let n = n as usize;
                let argc_slot = o;
                let argv_slot = o + 1;
                o += 2;
                for i in 0..n {
                    let words = f.param_words[i] as usize;
                    self.memory.copy_span(parm_offset(i), o, words)?;
                    o += words;
                }
                let argv = o;
                // remaining actuals land in the variadic region, zero-filled
                // up to the maximum parameter slot count
                for i in n..self.argc.min(MAX_PARMS) {
                    self.memory.copy_span(parm_offset(i), o, PARAM_WORDS)?;
                    o += PARAM_WORDS;
                }
                for _ in self.argc.max(n)..MAX_PARMS {
                    self.memory.fill_span(o, PARAM_WORDS, Word::ZERO)?;
                    o += PARAM_WORDS;
                }
                self.memory
                    .set_word(argc_slot, Word::from_i32(self.argc as i32))?;
                self.memory
                    .set_word(argv_slot, Word::from_i32(argv as i32))?;
            }
        }
        Ok(())
    }

    /// Pop a frame, releasing the callee's temporaries and restoring the
    /// spilled parameter window
    pub(crate) fn leave_function(&mut self) -> Result<(), VmError> {
        let fnum = self.current_function.ok_or(VmError::StackUnderflow)?;
        let (parm_start, locals) = {
            let f = &self.image.functions[fnum];
            (f.parm_start, f.locals)
        };

        self.strings.release(self.string_mark);
        let frame = self.stack.pop()?;
        self.pc = frame.statement;
        self.current_function = frame.function;
        self.string_mark = frame.string_mark;

        let window = self.locals.restore(locals)?;
        self.memory.write_span(parm_start, &window)
    }

    // ===== operand access =====

    #[inline]
    pub(crate) fn op_a(&self, st: &Statement) -> Result<Word, VmError> {
        self.memory.word(st.a as usize)
    }

    #[inline]
    pub(crate) fn op_b(&self, st: &Statement) -> Result<Word, VmError> {
        self.memory.word(st.b as usize)
    }

    #[inline]
    pub(crate) fn op_c(&self, st: &Statement) -> Result<Word, VmError> {
        self.memory.word(st.c as usize)
    }

    #[inline]
    pub(crate) fn set_c(&mut self, st: &Statement, w: Word) -> Result<(), VmError> {
        self.memory.set_word(st.c as usize, w)
    }

    #[inline]
    pub(crate) fn set_b(&mut self, st: &Statement, w: Word) -> Result<(), VmError> {
        self.memory.set_word(st.b as usize, w)
    }

    pub(crate) fn get_string(&self, r: StringRef) -> Result<&str, VmError> {
        self.strings.get(r)
    }

    // ===== builtin calling convention =====

    /// Actual argument count of the call that reached the current builtin
    pub fn arg_count(&self) -> usize {
        self.argc
    }

    /// First word of parameter slot `i`
    pub fn param_word(&self, i: usize) -> Result<Word, VmError> {
        self.memory.word(parm_offset(i))
    }

    pub fn param_vec3(&self, i: usize) -> Result<[f32; 3], VmError> {
        self.memory.vec3(parm_offset(i))
    }

    /// String argument in parameter slot `i`
    pub fn param_string(&self, i: usize) -> Result<&str, VmError> {
        self.strings.get(self.param_word(i)?.as_string())
    }

    pub fn return_word(&self) -> Result<Word, VmError> {
        self.memory.word(OFS_RETURN)
    }

    pub fn set_return(&mut self, w: Word) -> Result<(), VmError> {
        self.memory.set_word(OFS_RETURN, w)
    }

    pub fn set_return_vec3(&mut self, v: [f32; 3]) -> Result<(), VmError> {
        self.memory.set_vec3(OFS_RETURN, v)
    }

    // ===== diagnostics =====

    pub(crate) fn pc(&self) -> isize {
        self.pc
    }

    pub(crate) fn current_function_index(&self) -> Option<usize> {
        self.current_function
    }

    pub(crate) fn call_stack(&self) -> &CallStack {
        &self.stack
    }
}
