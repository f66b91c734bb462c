//! Execution diagnostics
//!
//! Rendering for single statements and for the whole interpreter state.
//! `dump_state` is what the host sees when an invocation dies: the faulting
//! statement, its operand words in every useful view, and the call stack
//! from outermost to innermost.

use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::value::Word;
use crate::vm::Vm;
use std::fmt::Write;

/// Render one statement as `MNEMONIC a b c`
pub fn disassemble(st: &Statement) -> String {
    match Opcode::from_u16(st.op) {
        Some(op) => format!("{:<10} {:5} {:5} {:5}", op.mnemonic(), st.a, st.b, st.c),
        None => format!("BAD[{}]    {:5} {:5} {:5}", st.op, st.a, st.b, st.c),
    }
}

fn operand_views(w: Word) -> String {
    format!(
        "0x{:08x} ({:e}, {})",
        w.raw(),
        w.as_f32(),
        w.as_i32()
    )
}

impl Vm {
    /// Render the current statement, its operands, and the call stack
    pub fn dump_state(&self) -> String {
        let mut out = String::new();

        let fname = self
            .current_function_index()
            .and_then(|i| self.image().functions.get(i))
            .map(|f| f.name.as_str())
            .unwrap_or("<none>");
        let _ = writeln!(out, "function: {}", fname);

        let pc = self.pc();
        match usize::try_from(pc)
            .ok()
            .and_then(|idx| self.image().statements.get(idx))
        {
            Some(st) => {
                let _ = writeln!(out, "statement {}: {}", pc, disassemble(st));
                for (label, ofs) in [("a", st.a), ("b", st.b), ("c", st.c)] {
                    match self.memory.word(ofs as usize) {
                        Ok(w) => {
                            let _ = writeln!(out, "  {} @{:<5} = {}", label, ofs, operand_views(w));
                        }
                        Err(_) => {
                            let _ = writeln!(out, "  {} @{:<5} = <out of bounds>", label, ofs);
                        }
                    }
                }
            }
            None => {
                let _ = writeln!(out, "statement {}: <out of range>", pc);
            }
        }

        let _ = writeln!(out, "call stack ({} deep):", self.call_stack().depth());
        for (depth, frame) in self.call_stack().frames().iter().enumerate() {
            let name = frame
                .function
                .and_then(|i| self.image().functions.get(i))
                .map(|f| f.name.as_str())
                .unwrap_or("<top>");
            let _ = writeln!(
                out,
                "  #{} {} (statement {})",
                depth, name, frame.statement
            );
        }

        out
    }
}
