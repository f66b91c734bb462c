//! Bitwise instruction execution
//!
//! The float variants truncate both operands to integers and store the
//! result back as a float, matching the legacy single-numeric-type
//! bytecode. Shift counts are masked to the word width.

use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::value::Word;
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

impl Vm {
    pub(crate) fn execute_bitwise(
        &mut self,
        op: Opcode,
        st: &Statement,
    ) -> Result<ExecutionResult, VmError> {
        match op {
            Opcode::BitAndF => {
                let r = (self.op_a(st)?.as_f32() as i32) & (self.op_b(st)?.as_f32() as i32);
                self.set_c(st, Word::from_f32(r as f32))?;
            }
            Opcode::BitOrF => {
                let r = (self.op_a(st)?.as_f32() as i32) | (self.op_b(st)?.as_f32() as i32);
                self.set_c(st, Word::from_f32(r as f32))?;
            }
            Opcode::BitXorF => {
                let r = (self.op_a(st)?.as_f32() as i32) ^ (self.op_b(st)?.as_f32() as i32);
                self.set_c(st, Word::from_f32(r as f32))?;
            }
            Opcode::BitNotF => {
                let r = !(self.op_a(st)?.as_f32() as i32);
                self.set_c(st, Word::from_f32(r as f32))?;
            }
            Opcode::ShlF => {
                let r = (self.op_a(st)?.as_f32() as i32)
                    .wrapping_shl(self.op_b(st)?.as_f32() as i32 as u32);
                self.set_c(st, Word::from_f32(r as f32))?;
            }
            Opcode::ShrF => {
                let r = (self.op_a(st)?.as_f32() as i32)
                    .wrapping_shr(self.op_b(st)?.as_f32() as i32 as u32);
                self.set_c(st, Word::from_f32(r as f32))?;
            }

            Opcode::BitAndI => {
                let r = self.op_a(st)?.as_i32() & self.op_b(st)?.as_i32();
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::BitOrI => {
                let r = self.op_a(st)?.as_i32() | self.op_b(st)?.as_i32();
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::BitXorI => {
                let r = self.op_a(st)?.as_i32() ^ self.op_b(st)?.as_i32();
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::BitNotI => {
                let r = !self.op_a(st)?.as_i32();
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::ShlI => {
                let r = self
                    .op_a(st)?
                    .as_i32()
                    .wrapping_shl(self.op_b(st)?.as_u32());
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::ShrI => {
                // arithmetic shift
                let r = self
                    .op_a(st)?
                    .as_i32()
                    .wrapping_shr(self.op_b(st)?.as_u32());
                self.set_c(st, Word::from_i32(r))?;
            }
            Opcode::ShrU => {
                // logical shift
                let r = self
                    .op_a(st)?
                    .as_u32()
                    .wrapping_shr(self.op_b(st)?.as_u32());
                self.set_c(st, Word::from_u32(r))?;
            }

            _ => unreachable!("non-bitwise opcode in bitwise handler"),
        }
        Ok(ExecutionResult::Continue)
    }
}
