//! Arithmetic, conversion, comparison, and divide-fault behavior

use super::helpers::{eval_binop, eval_binop_f, st, try_eval_binop, ProgramBuilder};
use crate::error::VmError;
use crate::opcode::Opcode;
use crate::value::Word;

const FLOAT_MAX_BITS: u32 = 0x7f7f_ffff;
const FLOAT_MIN_BITS: u32 = 0xff7f_ffff;

#[test]
fn test_float_arithmetic() {
    assert_eq!(eval_binop_f(Opcode::AddF, 1.5, 2.25), 3.75);
    assert_eq!(eval_binop_f(Opcode::SubF, 1.0, 4.0), -3.0);
    assert_eq!(eval_binop_f(Opcode::MulF, 3.0, -2.0), -6.0);
    assert_eq!(eval_binop_f(Opcode::DivF, 7.0, 2.0), 3.5);
}

#[test]
fn test_integer_arithmetic_wraps() {
    let max = Word::from_i32(i32::MAX);
    let one = Word::from_i32(1);
    assert_eq!(eval_binop(Opcode::AddI, max, one).as_i32(), i32::MIN);

    let min = Word::from_i32(i32::MIN);
    assert_eq!(eval_binop(Opcode::SubI, min, one).as_i32(), i32::MAX);

    // the one division that would trap natively
    let neg_one = Word::from_i32(-1);
    assert_eq!(eval_binop(Opcode::DivI, min, neg_one).as_i32(), i32::MIN);
    assert_eq!(eval_binop(Opcode::ModI, min, neg_one).as_i32(), 0);
}

#[test]
fn test_unsigned_arithmetic() {
    let a = Word::from_u32(0xffff_fff0);
    let b = Word::from_u32(0x20);
    assert_eq!(eval_binop(Opcode::AddU, a, b).as_u32(), 0x10);
    assert_eq!(eval_binop(Opcode::DivU, a, b).as_u32(), 0xffff_fff0 / 0x20);
    // unsigned comparison sees the high bit as magnitude
    assert_eq!(eval_binop(Opcode::GtU, a, b).as_i32(), 1);
    assert_eq!(eval_binop(Opcode::GtI, a, b).as_i32(), 0);
}

#[test]
fn test_float_modulo_truncates() {
    assert_eq!(eval_binop_f(Opcode::ModF, 7.9, 2.0), 1.0);
    assert_eq!(eval_binop_f(Opcode::ModF, -7.0, 3.0), -1.0);
}

#[test]
fn test_conversions() {
    let mut b = ProgramBuilder::new();
    let f = b.add_f32(-3.7);
    let i = b.add_i32(42);
    let big = b.add_raw(0x8000_0000);
    let out = b.alloc(3);
    let main = b.function(
        "main",
        vec![
            st(Opcode::ConvFI, f, 0, out),
            st(Opcode::ConvIF, i, 0, out + 1),
            st(Opcode::ConvUI, big, 0, out + 2),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();
    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.word(out as usize).unwrap().as_i32(), -3);
    assert_eq!(vm.memory.word(out as usize + 1).unwrap().as_f32(), 42.0);
    assert_eq!(vm.memory.word(out as usize + 2).unwrap().as_i32(), i32::MIN);
}

#[test]
fn test_float_div_by_zero_sentinels() {
    let pos = Word::from_f32(1.0);
    let neg = Word::from_f32(-1.0);
    let zero = Word::from_f32(0.0);

    let r = try_eval_binop(Opcode::DivF, pos, zero, true).unwrap();
    assert_eq!(r.raw(), FLOAT_MAX_BITS);
    let r = try_eval_binop(Opcode::DivF, neg, zero, true).unwrap();
    assert_eq!(r.raw(), FLOAT_MIN_BITS);
    // zero over zero comes out positive
    let r = try_eval_binop(Opcode::DivF, zero, zero, true).unwrap();
    assert_eq!(r.raw(), FLOAT_MAX_BITS);

    // with sanitizing off the IEEE result stands
    let r = try_eval_binop(Opcode::DivF, pos, zero, false).unwrap();
    assert_eq!(r.as_f32(), f32::INFINITY);
    let r = try_eval_binop(Opcode::DivF, zero, zero, false).unwrap();
    assert!(r.as_f32().is_nan());
}

#[test]
fn test_int_div_by_zero_saturates() {
    let zero = Word::from_i32(0);
    let r = try_eval_binop(Opcode::DivI, Word::from_i32(9), zero, true).unwrap();
    assert_eq!(r.as_i32(), i32::MAX);
    let r = try_eval_binop(Opcode::DivI, Word::from_i32(-9), zero, true).unwrap();
    assert_eq!(r.as_i32(), i32::MIN);

    // modulo by zero sanitizes to zero, all widths
    for op in [Opcode::ModI, Opcode::ModU, Opcode::ModF] {
        let r = try_eval_binop(op, Word::from_i32(9), zero, true).unwrap();
        assert_eq!(r.raw(), 0);
    }
}

#[test]
fn test_div_by_zero_faults_without_sanitizing() {
    let zero = Word::from_i32(0);
    assert_eq!(
        try_eval_binop(Opcode::DivI, Word::from_i32(9), zero, false),
        Err(VmError::DivisionByZero)
    );
    assert_eq!(
        try_eval_binop(Opcode::ModI, Word::from_i32(9), zero, false),
        Err(VmError::DivisionByZero)
    );
    // unsigned division faults regardless of policy
    assert_eq!(
        try_eval_binop(Opcode::DivU, Word::from_u32(9), zero, true),
        Err(VmError::DivisionByZero)
    );
}

#[test]
fn test_vector_operations() {
    let mut b = ProgramBuilder::new();
    let va = b.add_vec3([1.0, 2.0, 3.0]);
    let vb = b.add_vec3([4.0, 5.0, 6.0]);
    let scale = b.add_f32(2.0);
    let sum = b.alloc(3);
    let dot = b.alloc(1);
    let scaled = b.alloc(3);
    let main = b.function(
        "main",
        vec![
            st(Opcode::AddV, va, vb, sum),
            st(Opcode::MulV, va, vb, dot),
            st(Opcode::MulFV, scale, va, scaled),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();
    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.vec3(sum as usize).unwrap(), [5.0, 7.0, 9.0]);
    assert_eq!(vm.memory.word(dot as usize).unwrap().as_f32(), 32.0);
    assert_eq!(vm.memory.vec3(scaled as usize).unwrap(), [2.0, 4.0, 6.0]);
}

#[test]
fn test_vector_compare_checks_every_component() {
    let mut b = ProgramBuilder::new();
    let va = b.add_vec3([1.0, 2.0, 3.0]);
    let vb = b.add_vec3([1.0, 2.0, 99.0]);
    let vc = b.add_vec3([1.0, 2.0, 3.0]);
    let out = b.alloc(2);
    let main = b.function(
        "main",
        vec![
            st(Opcode::EqV, va, vb, out),
            st(Opcode::EqV, va, vc, out + 1),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();
    vm.invoke(main).unwrap();
    // differing only in the third component is still unequal
    assert_eq!(vm.memory.word(out as usize).unwrap().as_i32(), 0);
    assert_eq!(vm.memory.word(out as usize + 1).unwrap().as_i32(), 1);
}

#[test]
fn test_quaternion_hamilton_product() {
    // i * j = k, layout is [x, y, z, w]
    let mut b = ProgramBuilder::new();
    let qi = b.add_quat([1.0, 0.0, 0.0, 0.0]);
    let qj = b.add_quat([0.0, 1.0, 0.0, 0.0]);
    let prod = b.alloc(4);
    let conj = b.alloc(4);
    let main = b.function(
        "main",
        vec![
            st(Opcode::MulQ, qi, qj, prod),
            st(Opcode::ConjQ, qi, 0, conj),
            st(Opcode::Done, 0, 0, 0),
        ],
    );
    let mut vm = b.build();
    vm.invoke(main).unwrap();
    assert_eq!(vm.memory.quat(prod as usize).unwrap(), [0.0, 0.0, 1.0, 0.0]);
    assert_eq!(vm.memory.quat(conj as usize).unwrap(), [-1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_float_ordering_result_is_float() {
    let r = eval_binop(Opcode::LtF, Word::from_f32(1.0), Word::from_f32(2.0));
    assert_eq!(r.as_f32(), 1.0);
    let r = eval_binop(Opcode::GeF, Word::from_f32(1.0), Word::from_f32(2.0));
    assert_eq!(r.as_f32(), 0.0);
    // equality is stored as an integer
    let r = eval_binop(Opcode::EqF, Word::from_f32(2.0), Word::from_f32(2.0));
    assert_eq!(r.as_i32(), 1);
}

#[test]
fn test_bitwise_float_forms_truncate() {
    assert_eq!(eval_binop_f(Opcode::BitAndF, 6.9, 3.9), 2.0);
    assert_eq!(eval_binop_f(Opcode::BitOrF, 4.0, 1.0), 5.0);
    assert_eq!(eval_binop_f(Opcode::ShlF, 1.0, 3.0), 8.0);
}

#[test]
fn test_integer_shifts() {
    let r = eval_binop(Opcode::ShrI, Word::from_i32(-8), Word::from_i32(1));
    assert_eq!(r.as_i32(), -4);
    let r = eval_binop(Opcode::ShrU, Word::from_i32(-8), Word::from_i32(1));
    assert_eq!(r.as_u32(), 0x7fff_fffc);
}
