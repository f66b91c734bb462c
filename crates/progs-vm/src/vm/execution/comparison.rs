//! Comparison instruction execution
//!
//! Float ordering results are stored as floats and equality results as
//! integers, which is what the compilers emitting this bytecode expect.
//! String comparison is a table lookup followed by byte comparison;
//! ordering is lexicographic.

use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::value::{self, Word};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;
use std::cmp::Ordering;

impl Vm {
    pub(crate) fn execute_comparison(
        &mut self,
        op: Opcode,
        st: &Statement,
    ) -> Result<ExecutionResult, VmError> {
        use Opcode::*;
        match op {
            GeF | LeF | GtF | LtF => {
                let a = self.op_a(st)?.as_f32();
                let b = self.op_b(st)?.as_f32();
                let r = match op {
                    GeF => a >= b,
                    LeF => a <= b,
                    GtF => a > b,
                    _ => a < b,
                };
                self.set_c(st, Word::from_f32(r as u32 as f32))?;
            }
            EqF | NeF => {
                let a = self.op_a(st)?.as_f32();
                let b = self.op_b(st)?.as_f32();
                let r = if op == EqF { a == b } else { a != b };
                self.set_c(st, Word::from_bool(r))?;
            }

            EqI | NeI | LeI | GeI | LtI | GtI => {
                let a = self.op_a(st)?.as_i32();
                let b = self.op_b(st)?.as_i32();
                let r = match op {
                    EqI => a == b,
                    NeI => a != b,
                    LeI => a <= b,
                    GeI => a >= b,
                    LtI => a < b,
                    _ => a > b,
                };
                self.set_c(st, Word::from_bool(r))?;
            }

            LeU | GeU | LtU | GtU => {
                let a = self.op_a(st)?.as_u32();
                let b = self.op_b(st)?.as_u32();
                let r = match op {
                    LeU => a <= b,
                    GeU => a >= b,
                    LtU => a < b,
                    _ => a > b,
                };
                self.set_c(st, Word::from_bool(r))?;
            }

            EqV | NeV => {
                let eq = value::vec3_compare(
                    self.memory.vec3(st.a as usize)?,
                    self.memory.vec3(st.b as usize)?,
                );
                self.set_c(st, Word::from_bool(if op == EqV { eq } else { !eq }))?;
            }
            EqQ | NeQ => {
                let eq = value::quat_compare(
                    self.memory.quat(st.a as usize)?,
                    self.memory.quat(st.b as usize)?,
                );
                self.set_c(st, Word::from_bool(if op == EqQ { eq } else { !eq }))?;
            }

            EqS | NeS | LeS | GeS | LtS | GtS => {
                let a = self.op_a(st)?.as_string();
                let b = self.op_b(st)?.as_string();
                let cmp = self.get_string(a)?.cmp(self.get_string(b)?);
                let r = match op {
                    EqS => cmp == Ordering::Equal,
                    NeS => cmp != Ordering::Equal,
                    LeS => cmp != Ordering::Greater,
                    GeS => cmp != Ordering::Less,
                    LtS => cmp == Ordering::Less,
                    _ => cmp == Ordering::Greater,
                };
                self.set_c(st, Word::from_bool(r))?;
            }

            _ => unreachable!("non-comparison opcode in comparison handler"),
        }
        Ok(ExecutionResult::Continue)
    }
}
