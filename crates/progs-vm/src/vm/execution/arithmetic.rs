//! Arithmetic instruction execution
//!
//! Integer arithmetic wraps (two's-complement, as the legacy bytecode
//! expects). Division and modulo go through the fault policy: a zero
//! divisor either synthesizes the defined sentinel result or faults,
//! depending on [`ExecPolicy::fault_checks`](crate::vm::ExecPolicy).

use crate::error::VmError;
use crate::fault;
use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::value::{self, Word};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

impl Vm {
    pub(crate) fn execute_arithmetic(
        &mut self,
        op: Opcode,
        st: &Statement,
    ) -> Result<ExecutionResult, VmError> {
        match op {
            Opcode::AddF => {
                let r = self.op_a(st)?.as_f32() + self.op_b(st)?.as_f32();
                self.set_c(st, Word::from_f32(r))?;
            }
            Opcode::AddI => {
                let r = self.op_a(st)?.as_i32().wrapping_add(self.op_b(st)?.as_i32());
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::AddU => {
                let r = self.op_a(st)?.as_u32().wrapping_add(self.op_b(st)?.as_u32());
                self.set_c(st, Word::from_u32(r))?;
            }
            Opcode::AddV => {
                let r = value::vec3_add(self.memory.vec3(st.a as usize)?, self.memory.vec3(st.b as usize)?);
                self.memory.set_vec3(st.c as usize, r)?;
            }
            Opcode::AddQ => {
                let r = value::quat_add(self.memory.quat(st.a as usize)?, self.memory.quat(st.b as usize)?);
                self.memory.set_quat(st.c as usize, r)?;
            }
            Opcode::AddS => {
                let a = self.op_a(st)?.as_string();
                let b = self.op_b(st)?.as_string();
                let r = self.strings.concat(a, b)?;
                self.set_c(st, Word::from_i32(r))?;
            }

            Opcode::SubF => {
                let r = self.op_a(st)?.as_f32() - self.op_b(st)?.as_f32();
                self.set_c(st, Word::from_f32(r))?;
            }
            Opcode::SubI => {
                let r = self.op_a(st)?.as_i32().wrapping_sub(self.op_b(st)?.as_i32());
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::SubU => {
                let r = self.op_a(st)?.as_u32().wrapping_sub(self.op_b(st)?.as_u32());
                self.set_c(st, Word::from_u32(r))?;
            }
            Opcode::SubV => {
                let r = value::vec3_sub(self.memory.vec3(st.a as usize)?, self.memory.vec3(st.b as usize)?);
                self.memory.set_vec3(st.c as usize, r)?;
            }
            Opcode::SubQ => {
                let r = value::quat_sub(self.memory.quat(st.a as usize)?, self.memory.quat(st.b as usize)?);
                self.memory.set_quat(st.c as usize, r)?;
            }

            Opcode::MulF => {
                let r = self.op_a(st)?.as_f32() * self.op_b(st)?.as_f32();
                self.set_c(st, Word::from_f32(r))?;
            }
            Opcode::MulI => {
                let r = self.op_a(st)?.as_i32().wrapping_mul(self.op_b(st)?.as_i32());
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::MulU => {
                let r = self.op_a(st)?.as_u32().wrapping_mul(self.op_b(st)?.as_u32());
                self.set_c(st, Word::from_u32(r))?;
            }
            Opcode::MulV => {
                // dot product: the scalar result of v * v
                let r = value::vec3_dot(self.memory.vec3(st.a as usize)?, self.memory.vec3(st.b as usize)?);
                self.set_c(st, Word::from_f32(r))?;
            }
            Opcode::MulFV => {
                let r = value::vec3_scale(self.memory.vec3(st.b as usize)?, self.op_a(st)?.as_f32());
                self.memory.set_vec3(st.c as usize, r)?;
            }
            Opcode::MulVF => {
                let r = value::vec3_scale(self.memory.vec3(st.a as usize)?, self.op_b(st)?.as_f32());
                self.memory.set_vec3(st.c as usize, r)?;
            }
            Opcode::MulQ => {
                let r = value::quat_mult(self.memory.quat(st.a as usize)?, self.memory.quat(st.b as usize)?);
                self.memory.set_quat(st.c as usize, r)?;
            }
            Opcode::MulFQ => {
                let r = value::quat_scale(self.memory.quat(st.b as usize)?, self.op_a(st)?.as_f32());
                self.memory.set_quat(st.c as usize, r)?;
            }
            Opcode::MulQF => {
                let r = value::quat_scale(self.memory.quat(st.a as usize)?, self.op_b(st)?.as_f32());
                self.memory.set_quat(st.c as usize, r)?;
            }
            Opcode::ConjQ => {
                let r = value::quat_conj(self.memory.quat(st.a as usize)?);
                self.memory.set_quat(st.c as usize, r)?;
            }

            Opcode::DivF => {
                let a = self.op_a(st)?;
                let b = self.op_b(st)?;
                let r = if b.as_f32() == 0.0 && self.policy.fault_checks {
                    fault::float_div_by_zero(a, b)
                } else {
                    Word::from_f32(a.as_f32() / b.as_f32())
                };
                self.set_c(st, r)?;
            }
            Opcode::DivI => {
                let a = self.op_a(st)?;
                let b = self.op_b(st)?.as_i32();
                let r = if b == 0 {
                    if !self.policy.fault_checks {
                        return Err(VmError::DivisionByZero);
                    }
                    fault::int_div_by_zero(a)
                } else {
                    Word::from_i32(a.as_i32().wrapping_div(b))
                };
                self.set_c(st, r)?;
            }
            Opcode::DivU => {
                // never a recognized fault pattern
                let b = self.op_b(st)?.as_u32();
                if b == 0 {
                    return Err(VmError::DivisionByZero);
                }
                let r = self.op_a(st)?.as_u32() / b;
                self.set_c(st, Word::from_u32(r))?;
            }
            Opcode::ModF => {
                let a = self.op_a(st)?.as_f32() as i32;
                let b = self.op_b(st)?.as_f32() as i32;
                let r = if b == 0 {
                    if !self.policy.fault_checks {
                        return Err(VmError::DivisionByZero);
                    }
                    fault::mod_by_zero()
                } else {
                    Word::from_f32(a.wrapping_rem(b) as f32)
                };
                self.set_c(st, r)?;
            }
            Opcode::ModI => {
                let b = self.op_b(st)?.as_i32();
                let r = if b == 0 {
                    if !self.policy.fault_checks {
                        return Err(VmError::DivisionByZero);
                    }
                    fault::mod_by_zero()
                } else {
                    Word::from_i32(self.op_a(st)?.as_i32().wrapping_rem(b))
                };
                self.set_c(st, r)?;
            }
            Opcode::ModU => {
                let b = self.op_b(st)?.as_u32();
                let r = if b == 0 {
                    if !self.policy.fault_checks {
                        return Err(VmError::DivisionByZero);
                    }
                    fault::mod_by_zero()
                } else {
                    Word::from_u32(self.op_a(st)?.as_u32() % b)
                };
                self.set_c(st, r)?;
            }

            Opcode::ConvIF => {
                let r = self.op_a(st)?.as_i32() as f32;
                self.set_c(st, Word::from_f32(r))?;
            }
            Opcode::ConvFI => {
                let r = self.op_a(st)?.as_f32() as i32;
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::ConvIU => {
                let r = self.op_a(st)?.as_i32() as u32;
                self.set_c(st, Word::from_u32(r))?;
            }
            Opcode::ConvUI => {
                let r = self.op_a(st)?.as_u32() as i32;
                self.set_c(st, Word::from_i32(r))?;
            }

            _ => unreachable!("non-arithmetic opcode in arithmetic handler"),
        }
        Ok(ExecutionResult::Continue)
    }
}
