//! Call and return instruction execution
//!
//! A call resolves the function reference in operand A. Bytecode bodies
//! push a frame and continue in the same loop; native bodies run inside the
//! current cycle with no frame at all, reading arguments and writing their
//! result through the parameter-window convention. A native is free to
//! reentrantly invoke the interpreter.

use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::{FunctionBody, Statement, OFS_RETURN, PARAM_WORDS};
use crate::value::Word;
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

impl Vm {
    pub(crate) fn execute_functions(
        &mut self,
        op: Opcode,
        st: &Statement,
    ) -> Result<ExecutionResult, VmError> {
        use Opcode::*;
        match op {
            Call0 | Call1 | Call2 | Call3 | Call4 | Call5 | Call6 | Call7 | Call8 => {
                self.argc = op.call_arg_count().unwrap_or(0);

                let fref = self.op_a(st)?.as_func() as usize;
                if fref == 0 || fref >= self.image().functions.len() {
                    return Err(VmError::NullFunctionCall);
                }
                match self.image().functions[fref].body {
                    FunctionBody::Bytecode { .. } => {
                        self.enter_function(fref)?;
                    }
                    FunctionBody::Native { builtin } => {
                        let func = self
                            .registry
                            .get_fn(builtin)
                            .ok_or(VmError::NullFunctionCall)?;
                        func(self)?;
                    }
                }
                Ok(ExecutionResult::Continue)
            }

            Done | Return => {
                let from = st.a as usize;
                if st.a == 0 {
                    self.memory.fill_span(OFS_RETURN, PARAM_WORDS, Word::ZERO)?;
                } else if from != OFS_RETURN {
                    self.memory.copy_span(from, OFS_RETURN, PARAM_WORDS)?;
                }
                self.leave_function()?;
                Ok(ExecutionResult::Returned)
            }

            _ => unreachable!("non-call opcode in call handler"),
        }
    }
}
