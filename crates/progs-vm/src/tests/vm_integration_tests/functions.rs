//! Call and return discipline: frames, parameter copying, variadics,
//! builtins, and reentrant invocation

use super::helpers::{st, ProgramBuilder};
use crate::error::VmError;
use crate::opcode::Opcode;
use crate::progs::{parm_offset, Arity, MAX_PARMS, OFS_RETURN};
use crate::value::Word;
use crate::vm::Vm;

#[test]
fn test_fixed_arity_call() {
    let mut b = ProgramBuilder::new();
    let p = b.alloc(2);
    let mut words = [0u8; MAX_PARMS];
    words[0] = 1;
    words[1] = 1;
    let callee = b.function_with(
        "add2",
        Arity::Fixed(2),
        words,
        2,
        p as usize,
        vec![
            st(Opcode::AddF, p, p + 1, OFS_RETURN as u16),
            st(Opcode::Return, OFS_RETURN as u16, 0, 0),
        ],
    );
    let fref = b.add_i32(callee as i32);
    let x = b.add_f32(2.0);
    let y = b.add_f32(3.0);
    let out = b.add_f32(0.0);
    let main = b.function(
        "main",
        vec![
            st(Opcode::Store, x, parm_offset(0) as u16, 0),
            st(Opcode::Store, y, parm_offset(1) as u16, 0),
            st(Opcode::Call2, fref, 0, 0),
            st(Opcode::Store, OFS_RETURN as u16, out, 0),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().as_f32(), 5.0);
    assert_eq!(vm.call_depth(), 0);
    assert_eq!(vm.locals_used(), 0);
}

#[test]
fn test_recursion_spills_and_restores_locals() {
    // sum(n) = n > 0 ? n + sum(n - 1) : 0
    let mut b = ProgramBuilder::new();
    let p = b.alloc(2); // [n, n - 1]
    let one = b.add_i32(1);
    let zero3 = b.alloc(3);
    let fref = b.alloc(1);
    let mut words = [0u8; MAX_PARMS];
    words[0] = 1;
    let sum = b.function_with(
        "sum",
        Arity::Fixed(1),
        words,
        2,
        p as usize,
        vec![
            st(Opcode::IfA, p, 2, 0),
            st(Opcode::Return, zero3, 0, 0),
            st(Opcode::SubI, p, one, p + 1),
            st(Opcode::Store, p + 1, parm_offset(0) as u16, 0),
            st(Opcode::Call1, fref, 0, 0),
            // n survived the recursive call via the locals spill
            st(Opcode::AddI, p, OFS_RETURN as u16, OFS_RETURN as u16),
            st(Opcode::Return, OFS_RETURN as u16, 0, 0),
        ],
    );
    b.set_global(fref, Word::from_i32(sum as i32));
    let n = b.add_i32(5);
    let out = b.add_i32(0);
    // DONE with a zero operand wipes the return slot, so capture it first
    let main = b.function(
        "main",
        vec![
            st(Opcode::Store, n, parm_offset(0) as u16, 0),
            st(Opcode::Call1, fref, 0, 0),
            st(Opcode::Store, OFS_RETURN as u16, out, 0),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().as_i32(), 15);
    assert_eq!(vm.call_depth(), 0);
    assert_eq!(vm.locals_used(), 0);
}

#[test]
fn test_unbounded_recursion_overflows_call_stack() {
    let mut b = ProgramBuilder::new();
    let fref = b.alloc(1);
    let f = b.function(
        "forever",
        vec![st(Opcode::Call0, fref, 0, 0), st(Opcode::Done, 0, 0, 0)],
    );
    b.set_global(fref, Word::from_i32(f as i32));
    let mut vm = b.build();

    assert_eq!(vm.invoke(f), Err(VmError::StackOverflow));
    assert_eq!(vm.call_depth(), 0);
}

#[test]
fn test_oversized_locals_overflow_spill_region() {
    let mut b = ProgramBuilder::new();
    let fref = b.alloc(1);
    let p = b.alloc(3000);
    let f = b.function_with(
        "greedy",
        Arity::Fixed(0),
        [0; MAX_PARMS],
        3000,
        p as usize,
        vec![st(Opcode::Call0, fref, 0, 0), st(Opcode::Done, 0, 0, 0)],
    );
    b.set_global(fref, Word::from_i32(f as i32));
    let mut vm = b.build();

    // the second activation cannot spill another 3000 words
    assert_eq!(vm.invoke(f), Err(VmError::LocalsOverflow));
    assert_eq!(vm.locals_used(), 0);
}

#[test]
fn test_leave_restores_callers_window() {
    let mut b = ProgramBuilder::new();
    let scratch = b.add_i32(123);
    let junk = b.add_i32(999);
    let callee = b.function_with(
        "clobber",
        Arity::Fixed(0),
        [0; MAX_PARMS],
        1,
        scratch as usize,
        vec![
            st(Opcode::Store, junk, scratch, 0),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let fref = b.add_i32(callee as i32);
    let main = b.function(
        "main",
        vec![st(Opcode::Call0, fref, 0, 0), st(Opcode::Done, 0, 0, 0)],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(scratch as usize).unwrap().as_i32(), 123);
}

#[test]
fn test_variadic_call_convention() {
    let mut b = ProgramBuilder::new();
    // argc + argv + two fixed words + (8 - 2) three-word variadic slots
    let p = b.alloc(2 + 2 + 6 * 3);
    let zero = b.add_i32(0);
    let argc_out = b.add_i32(0);
    let arg0_out = b.add_i32(0);
    let arg2_out = b.add_i32(0);
    let mut words = [0u8; MAX_PARMS];
    words[0] = 1;
    words[1] = 1;
    let callee = b.function_with(
        "variadic",
        Arity::Variadic(2),
        words,
        2 + 2 + 6 * 3,
        p as usize,
        vec![
            st(Opcode::Store, p, argc_out, 0),
            st(Opcode::Store, p + 2, arg0_out, 0),
            // args past the fixed ones are reached through the argv pointer
            st(Opcode::LoadB, p + 1, zero, arg2_out),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let fref = b.add_i32(callee as i32);
    let a0 = b.add_i32(10);
    let a1 = b.add_i32(20);
    let a2 = b.add_i32(30);
    let main = b.function(
        "main",
        vec![
            st(Opcode::Store, a0, parm_offset(0) as u16, 0),
            st(Opcode::Store, a1, parm_offset(1) as u16, 0),
            st(Opcode::Store, a2, parm_offset(2) as u16, 0),
            st(Opcode::Call3, fref, 0, 0),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    // two fixed parameters and three actual arguments: the callee sees the
    // total actual count
    assert_eq!(vm.memory.word(argc_out as usize).unwrap().as_i32(), 3);
    assert_eq!(vm.memory.word(arg0_out as usize).unwrap().as_i32(), 10);
    assert_eq!(vm.memory.word(arg2_out as usize).unwrap().as_i32(), 30);
}

#[test]
fn test_call_through_null_reference() {
    let mut b = ProgramBuilder::new();
    let fref = b.add_i32(0);
    let main = b.function(
        "main",
        vec![st(Opcode::Call0, fref, 0, 0), st(Opcode::Done, 0, 0, 0)],
    );
    let mut vm = b.build();

    assert_eq!(vm.invoke(main), Err(VmError::NullFunctionCall));
    assert_eq!(vm.invoke(0), Err(VmError::NullFunctionCall));
}

fn square(vm: &mut Vm) -> Result<(), VmError> {
    let x = vm.param_word(0)?.as_f32();
    vm.set_return(Word::from_f32(x * x))
}

#[test]
fn test_builtin_call() {
    let mut b = ProgramBuilder::new();
    let bref = b.alloc(1);
    let x = b.add_f32(3.0);
    let out = b.add_f32(0.0);
    let main = b.function(
        "main",
        vec![
            st(Opcode::Store, x, parm_offset(0) as u16, 0),
            st(Opcode::Call1, bref, 0, 0),
            st(Opcode::Store, OFS_RETURN as u16, out, 0),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();
    let id = vm.register_builtin("square", Arity::Fixed(1), square);
    vm.memory
        .set_word(bref as usize, Word::from_i32(id as i32))
        .unwrap();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().as_f32(), 9.0);
}

fn report_argc(vm: &mut Vm) -> Result<(), VmError> {
    vm.set_return(Word::from_i32(vm.arg_count() as i32))
}

#[test]
fn test_builtin_sees_call_arg_count() {
    let mut b = ProgramBuilder::new();
    let bref = b.alloc(1);
    let out = b.add_i32(0);
    let main = b.function(
        "main",
        vec![
            st(Opcode::Call2, bref, 0, 0),
            st(Opcode::Store, OFS_RETURN as u16, out, 0),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();
    let id = vm.register_builtin("report_argc", Arity::Variadic(0), report_argc);
    vm.memory
        .set_word(bref as usize, Word::from_i32(id as i32))
        .unwrap();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().as_i32(), 2);
}

fn trampoline(vm: &mut Vm) -> Result<(), VmError> {
    let f = vm.param_word(0)?.as_func() as usize;
    vm.invoke(f)
}

#[test]
fn test_builtin_reenters_interpreter() {
    let mut b = ProgramBuilder::new();
    let bref = b.alloc(1);
    let c42 = b.add_i32(42);
    b.alloc(2); // return copy reads three words starting at c42
    let inner = b.function(
        "inner",
        vec![
            st(Opcode::Store, c42, OFS_RETURN as u16, 0),
            st(Opcode::Return, OFS_RETURN as u16, 0, 0),
        ],
    );
    let inner_ref = b.add_i32(inner as i32);
    let c7 = b.add_i32(7);
    let out1 = b.add_i32(0);
    let out2 = b.add_i32(0);
    let main = b.function(
        "main",
        vec![
            st(Opcode::Store, inner_ref, parm_offset(0) as u16, 0),
            st(Opcode::Call1, bref, 0, 0),
            st(Opcode::Store, OFS_RETURN as u16, out1, 0),
            st(Opcode::Store, c7, out2, 0),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();
    let id = vm.register_builtin("trampoline", Arity::Fixed(1), trampoline);
    vm.memory
        .set_word(bref as usize, Word::from_i32(id as i32))
        .unwrap();

    vm.invoke(main).unwrap();
    // control resumed at the statement after the call
    assert_eq!(vm.memory.word(out1 as usize).unwrap().as_i32(), 42);
    assert_eq!(vm.memory.word(out2 as usize).unwrap().as_i32(), 7);
    assert_eq!(vm.call_depth(), 0);
    assert_eq!(vm.locals_used(), 0);
}

#[test]
fn test_deadbeef_poisons_fresh_locals() {
    let mut b = ProgramBuilder::new();
    let p = b.alloc(2);
    let out = b.add_i32(0);
    let callee = b.function_with(
        "reads_uninit",
        Arity::Fixed(0),
        [0; MAX_PARMS],
        2,
        p as usize,
        vec![st(Opcode::Store, p, out, 0), st(Opcode::Done, 0, 0, 0)],
    );
    let fref = b.add_i32(callee as i32);
    let main = b.function(
        "main",
        vec![st(Opcode::Call0, fref, 0, 0), st(Opcode::Done, 0, 0, 0)],
    );
    let mut vm = b.build();
    vm.policy.deadbeef_locals = true;

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().raw(), 0xdead_beef);
    // the window itself was restored on leave
    assert_eq!(vm.memory.word(p as usize).unwrap().raw(), 0);
}
