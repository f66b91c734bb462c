//! Statement execution handlers, grouped by opcode family

mod arithmetic;
mod bitwise;
mod comparison;
mod control;
mod functions;
mod logic;
mod memory;

use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::Statement;
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

impl Vm {
    /// Dispatch one decoded statement
    pub(crate) fn execute_statement(
        &mut self,
        op: Opcode,
        st: Statement,
    ) -> Result<ExecutionResult, VmError> {
        use Opcode::*;
        match op {
            // Arithmetic and conversions
            AddF | AddV | AddQ | AddS | AddI | AddU | SubF | SubV | SubQ | SubI | SubU | MulF
            | MulV | MulFV | MulVF | MulQ | MulFQ | MulQF | MulI | MulU | ConjQ | DivF | DivI
            | DivU | ModF | ModI | ModU | ConvIF | ConvFI | ConvIU | ConvUI => {
                self.execute_arithmetic(op, &st)
            }

            // Bitwise and shifts
            BitAndF | BitOrF | BitXorF | BitNotF | ShlF | ShrF | BitAndI | BitOrI | BitXorI
            | BitNotI | ShlI | ShrI | ShrU => self.execute_bitwise(op, &st),

            // Comparisons
            EqF | NeF | LeF | GeF | LtF | GtF | EqI | NeI | LeI | GeI | LtI | GtI | LeU | GeU
            | LtU | GtU | EqV | NeV | EqQ | NeQ | EqS | NeS | LeS | GeS | LtS | GtS => {
                self.execute_comparison(op, &st)
            }

            // Boolean logic
            And | Or | NotF | NotV | NotQ | NotS | NotI | AndI | OrI => {
                self.execute_logic(op, &st)
            }

            // Loads, stores, addressing, block copies
            Store | StoreV | StoreQ | StoreP | StorePV | StorePQ | Address | AddressG | Load
            | LoadV | LoadQ | LoadB | LoadBV | LoadBQ | LoadBI | LoadBIV | LoadBIQ | StoreB
            | StoreBV | StoreBQ | StoreBI | StoreBIV | StoreBIQ | Lea | LeaI | Move | MoveP => {
                self.execute_memory(op, &st)
            }

            // Branches, jumps, entity state
            IfNot | If | IfBe | IfB | IfAe | IfA | Goto | Jump | JumpB | State | StateF => {
                self.execute_control(op, &st)
            }

            // Calls and returns
            Call0 | Call1 | Call2 | Call3 | Call4 | Call5 | Call6 | Call7 | Call8 | Done
            | Return => self.execute_functions(op, &st),
        }
    }
}
