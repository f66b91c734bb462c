//! Load, store, and addressing instruction execution
//!
//! Entity/field addressing (`ADDRESS`, `LOAD*`) honors the bounds-checking
//! policy. The indexed `LOADB`/`STOREB` families and `LEA` compute flat
//! pointers with no entity/field validation at all, faithfully reproducing
//! the legacy engine's unchecked fast path; escaping the arena itself still
//! faults through the checked accessor.

use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::value::Word;
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

/// Flat pointer from two register values, legacy wrap-around semantics
#[inline]
fn indexed(base: Word, index: i32) -> usize {
    base.as_i32().wrapping_add(index) as u32 as usize
}

impl Vm {
    pub(crate) fn execute_memory(
        &mut self,
        op: Opcode,
        st: &Statement,
    ) -> Result<ExecutionResult, VmError> {
        use Opcode::*;
        match op {
            Store => {
                let w = self.op_a(st)?;
                self.set_b(st, w)?;
            }
            StoreV => self.memory.copy_span(st.a as usize, st.b as usize, 3)?,
            StoreQ => self.memory.copy_span(st.a as usize, st.b as usize, 4)?,

            StoreP => {
                let ptr = self.op_b(st)?.as_u32() as usize;
                let w = self.op_a(st)?;
                self.memory.set_word(ptr, w)?;
            }
            StorePV => {
                let ptr = self.op_b(st)?.as_u32() as usize;
                self.memory.copy_span(st.a as usize, ptr, 3)?;
            }
            StorePQ => {
                let ptr = self.op_b(st)?.as_u32() as usize;
                self.memory.copy_span(st.a as usize, ptr, 4)?;
            }

            Address => {
                let ent = self.op_a(st)?.as_entity();
                let field = self.op_b(st)?.as_u32();
                if self.policy.bounds_check {
                    self.memory.check_entity_index(ent)?;
                    if ent == 0 && self.policy.null_bad {
                        return Err(VmError::WorldEntityWrite);
                    }
                    self.memory.check_field(field, 1)?;
                }
                let ofs = self.memory.entity_offset(ent, field);
                self.set_c(st, Word::from_u32(ofs as u32))?;
            }
            AddressG => {
                // address of a global is its operand offset
                self.set_c(st, Word::from_u32(st.a as u32))?;
            }

            Load | LoadV | LoadQ => {
                let span = match op {
                    LoadV => 3,
                    LoadQ => 4,
                    _ => 1,
                };
                let ent = self.op_a(st)?.as_entity();
                let field = self.op_b(st)?.as_u32();
                if self.policy.bounds_check {
                    self.memory.check_entity(ent, field, span)?;
                }
                let ofs = self.memory.entity_offset(ent, field);
                self.memory.copy_span(ofs, st.c as usize, span)?;
            }

            LoadB | LoadBV | LoadBQ => {
                let span = match op {
                    LoadBV => 3,
                    LoadBQ => 4,
                    _ => 1,
                };
                let ptr = indexed(self.op_a(st)?, self.op_b(st)?.as_i32());
                self.memory.copy_span(ptr, st.c as usize, span)?;
            }
            LoadBI | LoadBIV | LoadBIQ => {
                let span = match op {
                    LoadBIV => 3,
                    LoadBIQ => 4,
                    _ => 1,
                };
                let ptr = indexed(self.op_a(st)?, st.b_signed() as i32);
                self.memory.copy_span(ptr, st.c as usize, span)?;
            }

            StoreB | StoreBV | StoreBQ => {
                let span = match op {
                    StoreBV => 3,
                    StoreBQ => 4,
                    _ => 1,
                };
                let ptr = indexed(self.op_b(st)?, self.op_c(st)?.as_i32());
                self.memory.copy_span(st.a as usize, ptr, span)?;
            }
            StoreBI | StoreBIV | StoreBIQ => {
                let span = match op {
                    StoreBIV => 3,
                    StoreBIQ => 4,
                    _ => 1,
                };
                let ptr = indexed(self.op_b(st)?, st.c_signed() as i32);
                self.memory.copy_span(st.a as usize, ptr, span)?;
            }

            Lea => {
                let ptr = indexed(self.op_a(st)?, self.op_b(st)?.as_i32());
                self.set_c(st, Word::from_u32(ptr as u32))?;
            }
            LeaI => {
                let ptr = indexed(self.op_a(st)?, st.b_signed() as i32);
                self.set_c(st, Word::from_u32(ptr as u32))?;
            }

            Move => {
                self.memory
                    .copy_span(st.a as usize, st.c as usize, st.b as usize)?;
            }
            MoveP => {
                let src = self.op_a(st)?.as_u32() as usize;
                let dst = self.op_c(st)?.as_u32() as usize;
                let count = self.op_b(st)?.as_u32() as usize;
                self.memory.copy_span(src, dst, count)?;
            }

            _ => unreachable!("non-memory opcode in memory handler"),
        }
        Ok(ExecutionResult::Continue)
    }
}
