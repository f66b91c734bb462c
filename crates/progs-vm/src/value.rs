//! Register value representation
//!
//! A register slot is a raw 32-bit word; the executing opcode decides how to
//! read it (float, signed, unsigned, string/function/entity reference, or
//! flat pointer). Vectors occupy 3 consecutive slots and quaternions 4;
//! copy and compare treat the group atomically, arithmetic is componentwise.

use serde::{Deserialize, Serialize};

/// One register slot: an untagged 32-bit word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word(u32);

/// Bit pattern of negative zero, falsy alongside positive zero
const NEG_ZERO: u32 = 0x8000_0000;

impl Word {
    pub const ZERO: Word = Word(0);

    #[inline]
    pub fn from_raw(bits: u32) -> Self {
        Word(bits)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Word(v.to_bits())
    }

    #[inline]
    pub fn from_i32(v: i32) -> Self {
        Word(v as u32)
    }

    #[inline]
    pub fn from_u32(v: u32) -> Self {
        Word(v)
    }

    #[inline]
    pub fn from_bool(v: bool) -> Self {
        Word(v as u32)
    }

    #[inline]
    pub fn as_f32(self) -> f32 {
        f32::from_bits(self.0)
    }

    #[inline]
    pub fn as_i32(self) -> i32 {
        self.0 as i32
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Entity reference view (index into the entity table)
    #[inline]
    pub fn as_entity(self) -> i32 {
        self.0 as i32
    }

    /// Function reference view (index into the function table)
    #[inline]
    pub fn as_func(self) -> u32 {
        self.0
    }

    /// String reference view (non-negative static, negative temporary)
    #[inline]
    pub fn as_string(self) -> i32 {
        self.0 as i32
    }

    /// Truthiness of a float register. Denormal-safe test on the bit
    /// pattern: both `0.0` and `-0.0` are false.
    #[inline]
    pub fn nonzero_float(self) -> bool {
        self.0 != 0 && self.0 != NEG_ZERO
    }

    /// Sign bit of the word, for float fault sentinels
    #[inline]
    pub fn sign_bit(self) -> u32 {
        self.0 & NEG_ZERO
    }
}

// ===== componentwise vector/quaternion helpers =====

pub fn vec3_add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vec3_sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn vec3_dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn vec3_scale(v: [f32; 3], s: f32) -> [f32; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn vec3_compare(a: [f32; 3], b: [f32; 3]) -> bool {
    a[0] == b[0] && a[1] == b[1] && a[2] == b[2]
}

pub fn vec3_is_zero(v: [f32; 3]) -> bool {
    v[0] == 0.0 && v[1] == 0.0 && v[2] == 0.0
}

pub fn quat_add(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]]
}

pub fn quat_sub(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]]
}

pub fn quat_scale(q: [f32; 4], s: f32) -> [f32; 4] {
    [q[0] * s, q[1] * s, q[2] * s, q[3] * s]
}

/// Hamilton product, layout `[x, y, z, w]`
pub fn quat_mult(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let (ax, ay, az, aw) = (a[0], a[1], a[2], a[3]);
    let (bx, by, bz, bw) = (b[0], b[1], b[2], b[3]);
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by + ay * bw + az * bx - ax * bz,
        aw * bz + az * bw + ax * by - ay * bx,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

pub fn quat_conj(q: [f32; 4]) -> [f32; 4] {
    [-q[0], -q[1], -q[2], q[3]]
}

pub fn quat_compare(a: [f32; 4], b: [f32; 4]) -> bool {
    a[0] == b[0] && a[1] == b[1] && a[2] == b[2] && a[3] == b[3]
}

pub fn quat_is_zero(q: [f32; 4]) -> bool {
    q[0] == 0.0 && q[1] == 0.0 && q[2] == 0.0 && q[3] == 0.0
}
