//! Boolean logic instruction execution
//!
//! The float forms use the bit-pattern truthiness test so that negative
//! zero is false. Both operands are always evaluated; short-circuiting is
//! the compiler's job, not the interpreter's.

use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::value::{self, Word};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

impl Vm {
    pub(crate) fn execute_logic(
        &mut self,
        op: Opcode,
        st: &Statement,
    ) -> Result<ExecutionResult, VmError> {
        match op {
            Opcode::And => {
                let r = self.op_a(st)?.nonzero_float() && self.op_b(st)?.nonzero_float();
                self.set_c(st, Word::from_bool(r))?;
            }
            Opcode::Or => {
                let r = self.op_a(st)?.nonzero_float() || self.op_b(st)?.nonzero_float();
                self.set_c(st, Word::from_bool(r))?;
            }
            Opcode::NotF => {
                let r = !self.op_a(st)?.nonzero_float();
                self.set_c(st, Word::from_bool(r))?;
            }
            Opcode::NotV => {
                let r = value::vec3_is_zero(self.memory.vec3(st.a as usize)?);
                self.set_c(st, Word::from_bool(r))?;
            }
            Opcode::NotQ => {
                let r = value::quat_is_zero(self.memory.quat(st.a as usize)?);
                self.set_c(st, Word::from_bool(r))?;
            }
            Opcode::NotS => {
                let r = self.op_a(st)?.as_string();
                let empty = r == 0 || self.get_string(r)?.is_empty();
                self.set_c(st, Word::from_bool(empty))?;
            }
            Opcode::NotI => {
                let r = self.op_a(st)?.as_u32() == 0;
                self.set_c(st, Word::from_bool(r))?;
            }
            Opcode::AndI => {
                let r = self.op_a(st)?.as_u32() != 0 && self.op_b(st)?.as_u32() != 0;
                self.set_c(st, Word::from_bool(r))?;
            }
            Opcode::OrI => {
                let r = self.op_a(st)?.as_u32() != 0 || self.op_b(st)?.as_u32() != 0;
                self.set_c(st, Word::from_bool(r))?;
            }

            _ => unreachable!("non-logic opcode in logic handler"),
        }
        Ok(ExecutionResult::Continue)
    }
}
