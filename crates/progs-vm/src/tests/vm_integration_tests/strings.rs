//! String opcodes and temporary-string lifetime

use super::helpers::{st, ProgramBuilder};
use crate::error::VmError;
use crate::opcode::Opcode;

#[test]
fn test_concat_makes_a_readable_temporary() {
    let mut b = ProgramBuilder::new();
    let s1 = b.add_string_global("foo");
    let s2 = b.add_string_global("bar");
    let expected = b.add_string_global("foobar");
    let r = b.alloc(1);
    let eq_out = b.alloc(1);
    let main = b.function(
        "main",
        vec![
            st(Opcode::AddS, s1, s2, r),
            st(Opcode::EqS, r, expected, eq_out),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(eq_out as usize).unwrap().as_i32(), 1);

    // the frame that minted the temporary has left, taking it along
    let temp_ref = vm.memory.word(r as usize).unwrap().as_string();
    assert!(temp_ref < 0);
    assert_eq!(vm.strings.get(temp_ref), Err(VmError::BadStringRef(temp_ref)));
}

#[test]
fn test_callee_temporaries_released_on_return() {
    let mut b = ProgramBuilder::new();
    let s1 = b.add_string_global("foo");
    let s2 = b.add_string_global("bar");
    let expected = b.add_string_global("foobar");
    let r = b.alloc(1);
    let callee_r = b.alloc(1);
    let eq_out = b.alloc(1);

    let callee = b.function(
        "callee",
        vec![
            st(Opcode::AddS, s2, s1, callee_r),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let fref = b.add_i32(callee as i32);
    let main = b.function(
        "main",
        vec![
            st(Opcode::AddS, s1, s2, r),
            st(Opcode::Call0, fref, 0, 0),
            // the caller's temporary outlives the callee's activation
            st(Opcode::EqS, r, expected, eq_out),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let stale = b.function(
        "stale",
        vec![
            st(Opcode::EqS, callee_r, expected, eq_out),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(eq_out as usize).unwrap().as_i32(), 1);

    // the callee's reference went stale the moment it returned
    let stale_ref = vm.memory.word(callee_r as usize).unwrap().as_string();
    assert_eq!(vm.invoke(stale), Err(VmError::BadStringRef(stale_ref)));
}

#[test]
fn test_lexicographic_comparison() {
    let mut b = ProgramBuilder::new();
    let abc = b.add_string_global("abc");
    let abd = b.add_string_global("abd");
    let abc2 = b.add_string_global("abc");
    let out = b.alloc(4);
    let main = b.function(
        "main",
        vec![
            st(Opcode::LtS, abc, abd, out),
            st(Opcode::GtS, abc, abd, out + 1),
            st(Opcode::EqS, abc, abc2, out + 2),
            st(Opcode::GeS, abd, abc, out + 3),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().as_i32(), 1);
    assert_eq!(vm.memory.word(out as usize + 1).unwrap().as_i32(), 0);
    // distinct references to equal bytes still compare equal
    assert_eq!(vm.memory.word(out as usize + 2).unwrap().as_i32(), 1);
    assert_eq!(vm.memory.word(out as usize + 3).unwrap().as_i32(), 1);
}

#[test]
fn test_string_truthiness() {
    let mut b = ProgramBuilder::new();
    let null_ref = b.add_i32(0); // reference 0 is the empty string
    let nonempty = b.add_string_global("x");
    let out = b.alloc(2);
    let main = b.function(
        "main",
        vec![
            st(Opcode::NotS, null_ref, 0, out),
            st(Opcode::NotS, nonempty, 0, out + 1),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().as_i32(), 1);
    assert_eq!(vm.memory.word(out as usize + 1).unwrap().as_i32(), 0);
}

#[test]
fn test_fatal_fault_drops_temporaries() {
    let mut b = ProgramBuilder::new();
    let s1 = b.add_string_global("leak");
    let zero = b.add_i32(0);
    let r = b.alloc(1);
    let main = b.function(
        "main",
        vec![
            st(Opcode::AddS, s1, s1, r),
            st(Opcode::DivU, s1, zero, r),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();

    assert_eq!(vm.invoke(main), Err(VmError::DivisionByZero));
    assert_eq!(vm.strings.mark(), 0);
}
