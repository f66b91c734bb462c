//! Control flow and entity-state instruction execution
//!
//! Branch offsets are applied minus one so the loop's unconditional
//! pre-increment lands execution exactly on the target. Absolute and
//! indirect jumps validate the destination when the bounds policy is on.

use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::value::Word;
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

impl Vm {
    pub(crate) fn execute_control(
        &mut self,
        op: Opcode,
        st: &Statement,
    ) -> Result<ExecutionResult, VmError> {
        use Opcode::*;
        match op {
            IfNot | If | IfBe | IfB | IfAe | IfA => {
                let a = self.op_a(st)?;
                let taken = match op {
                    IfNot => a.as_u32() == 0,
                    If => a.as_u32() != 0,
                    IfBe => a.as_i32() <= 0,
                    IfB => a.as_i32() < 0,
                    IfAe => a.as_i32() >= 0,
                    _ => a.as_i32() > 0,
                };
                if taken {
                    self.branch(st.b_signed());
                }
            }
            Goto => {
                self.branch(st.a_signed());
            }
            Jump => {
                let dest = self.op_a(st)?.as_u32() as usize;
                self.jump_absolute(dest)?;
            }
            JumpB => {
                // destination table lookup through a computed pointer
                let ptr = (st.a as i32).wrapping_add(self.op_b(st)?.as_i32()) as u32 as usize;
                let dest = self.memory.word(ptr)?.as_u32() as usize;
                self.jump_absolute(dest)?;
            }

            State | StateF => {
                let slots = self.image().state_slots;
                let self_ent = self.memory.word(slots.self_global)?.as_entity();
                if self.policy.bounds_check {
                    self.memory.check_entity_index(self_ent)?;
                }
                let time = self.memory.word(slots.time_global)?.as_f32();
                let interval = if op == StateF {
                    self.op_c(st)?.as_f32()
                } else {
                    0.1
                };
                let frame = self.op_a(st)?;
                let think = self.op_b(st)?;

                let nextthink = self.memory.entity_offset(self_ent, slots.nextthink_field as u32);
                let frame_ofs = self.memory.entity_offset(self_ent, slots.frame_field as u32);
                let think_ofs = self.memory.entity_offset(self_ent, slots.think_field as u32);
                self.memory.set_word(nextthink, Word::from_f32(time + interval))?;
                self.memory.set_word(frame_ofs, frame)?;
                self.memory.set_word(think_ofs, think)?;
            }

            _ => unreachable!("non-control opcode in control handler"),
        }
        Ok(ExecutionResult::Continue)
    }

    /// Relative branch; the -1 offsets the loop's pre-increment
    fn branch(&mut self, offset: i16) {
        self.pc += offset as isize - 1;
    }

    fn jump_absolute(&mut self, dest: usize) -> Result<(), VmError> {
        if self.policy.bounds_check && dest >= self.image().statements.len() {
            return Err(VmError::InvalidJumpDestination(dest));
        }
        self.pc = dest as isize - 1;
        Ok(())
    }
}
