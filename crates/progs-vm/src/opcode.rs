//! Opcode definitions for the progs interpreter
//!
//! A statement is an opcode plus three operand offsets (A, B, C) into the
//! flat register space; branch opcodes reinterpret operands as statement
//! offsets. Opcodes are typed: each numeric type (float, signed, unsigned,
//! vector, quaternion, string) gets its own variants where the semantics
//! differ. Variants whose bit-level behavior is identical share one opcode
//! (entity/function/pointer equality is integer equality, pointer ordering
//! is unsigned ordering).
//!
//! Discriminants are grouped by family with gaps, so related instructions
//! stay adjacent when new ones are added.

use std::fmt;

/// Virtual machine instruction opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Opcode {
    // ===== Arithmetic =====
    /// Float add: C = A + B
    AddF = 0,
    /// Vector add, componentwise
    AddV = 1,
    /// Quaternion add, componentwise
    AddQ = 2,
    /// String concatenation: C = temp string A..B
    AddS = 3,
    /// Integer add
    AddI = 4,
    /// Unsigned add
    AddU = 5,
    /// Float subtract
    SubF = 6,
    /// Vector subtract, componentwise
    SubV = 7,
    /// Quaternion subtract, componentwise
    SubQ = 8,
    /// Integer subtract
    SubI = 9,
    /// Unsigned subtract
    SubU = 10,

    /// Float multiply
    MulF = 16,
    /// Vector dot product: C.float = A . B
    MulV = 17,
    /// Scale vector B by float A
    MulFV = 18,
    /// Scale vector A by float B
    MulVF = 19,
    /// Quaternion multiply (Hamilton product)
    MulQ = 20,
    /// Scale quaternion B by float A
    MulFQ = 21,
    /// Scale quaternion A by float B
    MulQF = 22,
    /// Integer multiply
    MulI = 23,
    /// Unsigned multiply
    MulU = 24,
    /// Quaternion conjugate: C = conj(A)
    ConjQ = 25,

    /// Float divide (fault policy applies on zero divisor)
    DivF = 32,
    /// Integer divide (fault policy applies on zero divisor)
    DivI = 33,
    /// Unsigned divide (zero divisor always faults)
    DivU = 34,
    /// Float modulo, through integer truncation
    ModF = 35,
    /// Integer modulo
    ModI = 36,
    /// Unsigned modulo
    ModU = 37,

    // ===== Bitwise =====
    /// Float-truncating bitwise and: C.float = (int)A & (int)B
    BitAndF = 48,
    /// Float-truncating bitwise or
    BitOrF = 49,
    /// Float-truncating bitwise xor
    BitXorF = 50,
    /// Float-truncating bitwise not
    BitNotF = 51,
    /// Float-truncating shift left
    ShlF = 52,
    /// Float-truncating shift right
    ShrF = 53,
    /// Integer bitwise and
    BitAndI = 54,
    /// Integer bitwise or
    BitOrI = 55,
    /// Integer bitwise xor
    BitXorI = 56,
    /// Integer bitwise not
    BitNotI = 57,
    /// Shift left (integer and unsigned)
    ShlI = 58,
    /// Arithmetic shift right
    ShrI = 59,
    /// Logical shift right
    ShrU = 60,

    // ===== Comparison =====
    /// Float equality
    EqF = 64,
    /// Float inequality
    NeF = 65,
    /// Float <=
    LeF = 66,
    /// Float >=
    GeF = 67,
    /// Float <
    LtF = 68,
    /// Float >
    GtF = 69,
    /// Integer equality (also entity/function/unsigned/pointer)
    EqI = 70,
    /// Integer inequality (also entity/function/unsigned/pointer)
    NeI = 71,
    /// Signed <=
    LeI = 72,
    /// Signed >=
    GeI = 73,
    /// Signed <
    LtI = 74,
    /// Signed >
    GtI = 75,
    /// Unsigned <= (also pointers)
    LeU = 76,
    /// Unsigned >=
    GeU = 77,
    /// Unsigned <
    LtU = 78,
    /// Unsigned >
    GtU = 79,
    /// Vector equality, componentwise
    EqV = 80,
    /// Vector inequality
    NeV = 81,
    /// Quaternion equality, componentwise
    EqQ = 82,
    /// Quaternion inequality
    NeQ = 83,
    /// String equality (byte comparison)
    EqS = 84,
    /// String inequality
    NeS = 85,
    /// Lexicographic string <=
    LeS = 86,
    /// Lexicographic string >=
    GeS = 87,
    /// Lexicographic string <
    LtS = 88,
    /// Lexicographic string >
    GtS = 89,

    // ===== Logic =====
    /// Boolean and on floats; negative zero is false
    And = 96,
    /// Boolean or on floats; negative zero is false
    Or = 97,
    /// Boolean not on a float
    NotF = 98,
    /// Boolean not on a vector (true if all components zero)
    NotV = 99,
    /// Boolean not on a quaternion
    NotQ = 100,
    /// Boolean not on a string (true if null ref or empty)
    NotS = 101,
    /// Boolean not on an integer (also entity/function/pointer)
    NotI = 102,
    /// Boolean and on integers
    AndI = 103,
    /// Boolean or on integers
    OrI = 104,

    // ===== Conversion =====
    /// Integer to float
    ConvIF = 112,
    /// Float to integer (truncating)
    ConvFI = 113,
    /// Integer to unsigned
    ConvIU = 114,
    /// Unsigned to integer
    ConvUI = 115,

    // ===== Load / store =====
    /// One-word register copy: B = A (all scalar types)
    Store = 128,
    /// Three-word register copy
    StoreV = 129,
    /// Four-word register copy
    StoreQ = 130,
    /// Store through pointer: *(B as offset) = A
    StoreP = 131,
    /// Store vector through pointer
    StorePV = 132,
    /// Store quaternion through pointer
    StorePQ = 133,
    /// Entity field address: C = flat offset of field B in entity A
    Address = 134,
    /// Global address: C = A (the operand offset itself)
    AddressG = 135,
    /// Load entity field: C = entity[A].field[B]
    Load = 136,
    /// Load three-word entity field
    LoadV = 137,
    /// Load four-word entity field
    LoadQ = 138,

    /// Indexed load: C = *(A + B), no field bounds policy
    LoadB = 144,
    /// Indexed three-word load
    LoadBV = 145,
    /// Indexed four-word load
    LoadBQ = 146,
    /// Immediate-indexed load: C = *(A + sext(b))
    LoadBI = 147,
    /// Immediate-indexed three-word load
    LoadBIV = 148,
    /// Immediate-indexed four-word load
    LoadBIQ = 149,
    /// Indexed store: *(B + C) = A
    StoreB = 150,
    /// Indexed three-word store
    StoreBV = 151,
    /// Indexed four-word store
    StoreBQ = 152,
    /// Immediate-indexed store: *(B + sext(c)) = A
    StoreBI = 153,
    /// Immediate-indexed three-word store
    StoreBIV = 154,
    /// Immediate-indexed four-word store
    StoreBIQ = 155,
    /// Load effective address: C = A + B
    Lea = 156,
    /// Load effective address, immediate index: C = A + sext(b)
    LeaI = 157,
    /// Block copy, immediate count: C[0..b] = A[0..b]
    Move = 158,
    /// Block copy through pointers, register count: *C[0..B] = *A[0..B]
    MoveP = 159,

    // ===== Control flow =====
    /// Branch by sext(b) if A is zero
    IfNot = 160,
    /// Branch by sext(b) if A is non-zero
    If = 161,
    /// Branch if A <= 0 (signed)
    IfBe = 162,
    /// Branch if A < 0
    IfB = 163,
    /// Branch if A >= 0
    IfAe = 164,
    /// Branch if A > 0
    IfA = 165,
    /// Unconditional branch by sext(a)
    Goto = 166,
    /// Absolute jump to statement A's value
    Jump = 167,
    /// Indirect jump through computed pointer a + B
    JumpB = 168,

    /// Call with 0 arguments
    Call0 = 176,
    /// Call with 1 argument
    Call1 = 177,
    /// Call with 2 arguments
    Call2 = 178,
    /// Call with 3 arguments
    Call3 = 179,
    /// Call with 4 arguments
    Call4 = 180,
    /// Call with 5 arguments
    Call5 = 181,
    /// Call with 6 arguments
    Call6 = 182,
    /// Call with 7 arguments
    Call7 = 183,
    /// Call with 8 arguments
    Call8 = 184,
    /// Return from the program's entry function
    Done = 185,
    /// Return A (a PARAM_WORDS span) into the reserved return slot
    Return = 186,

    // ===== Entity state =====
    /// Stamp self's frame/think fields, nextthink = time + 0.1
    State = 192,
    /// Stamp self's frame/think fields, nextthink = time + C
    StateF = 193,
}

impl Opcode {
    /// Decode an opcode from its statement encoding
    pub fn from_u16(op: u16) -> Option<Self> {
        use Opcode::*;
        Some(match op {
            0 => AddF,
            1 => AddV,
            2 => AddQ,
            3 => AddS,
            4 => AddI,
            5 => AddU,
            6 => SubF,
            7 => SubV,
            8 => SubQ,
            9 => SubI,
            10 => SubU,
            16 => MulF,
            17 => MulV,
            18 => MulFV,
            19 => MulVF,
            20 => MulQ,
            21 => MulFQ,
            22 => MulQF,
            23 => MulI,
            24 => MulU,
            25 => ConjQ,
            32 => DivF,
            33 => DivI,
            34 => DivU,
            35 => ModF,
            36 => ModI,
            37 => ModU,
            48 => BitAndF,
            49 => BitOrF,
            50 => BitXorF,
            51 => BitNotF,
            52 => ShlF,
            53 => ShrF,
            54 => BitAndI,
            55 => BitOrI,
            56 => BitXorI,
            57 => BitNotI,
            58 => ShlI,
            59 => ShrI,
            60 => ShrU,
            64 => EqF,
            65 => NeF,
            66 => LeF,
            67 => GeF,
            68 => LtF,
            69 => GtF,
            70 => EqI,
            71 => NeI,
            72 => LeI,
            73 => GeI,
            74 => LtI,
            75 => GtI,
            76 => LeU,
            77 => GeU,
            78 => LtU,
            79 => GtU,
            80 => EqV,
            81 => NeV,
            82 => EqQ,
            83 => NeQ,
            84 => EqS,
            85 => NeS,
            86 => LeS,
            87 => GeS,
            88 => LtS,
            89 => GtS,
            96 => And,
            97 => Or,
            98 => NotF,
            99 => NotV,
            100 => NotQ,
            101 => NotS,
            102 => NotI,
            103 => AndI,
            104 => OrI,
            112 => ConvIF,
            113 => ConvFI,
            114 => ConvIU,
            115 => ConvUI,
            128 => Store,
            129 => StoreV,
            130 => StoreQ,
            131 => StoreP,
            132 => StorePV,
            133 => StorePQ,
            134 => Address,
            135 => AddressG,
            136 => Load,
            137 => LoadV,
            138 => LoadQ,
            144 => LoadB,
            145 => LoadBV,
            146 => LoadBQ,
            147 => LoadBI,
            148 => LoadBIV,
            149 => LoadBIQ,
            150 => StoreB,
            151 => StoreBV,
            152 => StoreBQ,
            153 => StoreBI,
            154 => StoreBIV,
            155 => StoreBIQ,
            156 => Lea,
            157 => LeaI,
            158 => Move,
            159 => MoveP,
            160 => IfNot,
            161 => If,
            162 => IfBe,
            163 => IfB,
            164 => IfAe,
            165 => IfA,
            166 => Goto,
            167 => Jump,
            168 => JumpB,
            176 => Call0,
            177 => Call1,
            178 => Call2,
            179 => Call3,
            180 => Call4,
            181 => Call5,
            182 => Call6,
            183 => Call7,
            184 => Call8,
            185 => Done,
            186 => Return,
            192 => State,
            193 => StateF,
            _ => return None,
        })
    }

    /// Fixed argument count for the call family, None otherwise
    pub fn call_arg_count(self) -> Option<usize> {
        let op = self as u16;
        let base = Opcode::Call0 as u16;
        if (base..=Opcode::Call8 as u16).contains(&op) {
            Some((op - base) as usize)
        } else {
            None
        }
    }

    /// Assembler-style mnemonic
    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            AddF => "ADD_F",
            AddV => "ADD_V",
            AddQ => "ADD_Q",
            AddS => "ADD_S",
            AddI => "ADD_I",
            AddU => "ADD_U",
            SubF => "SUB_F",
            SubV => "SUB_V",
            SubQ => "SUB_Q",
            SubI => "SUB_I",
            SubU => "SUB_U",
            MulF => "MUL_F",
            MulV => "MUL_V",
            MulFV => "MUL_FV",
            MulVF => "MUL_VF",
            MulQ => "MUL_Q",
            MulFQ => "MUL_FQ",
            MulQF => "MUL_QF",
            MulI => "MUL_I",
            MulU => "MUL_U",
            ConjQ => "CONJ_Q",
            DivF => "DIV_F",
            DivI => "DIV_I",
            DivU => "DIV_U",
            ModF => "MOD_F",
            ModI => "MOD_I",
            ModU => "MOD_U",
            BitAndF => "BITAND_F",
            BitOrF => "BITOR_F",
            BitXorF => "BITXOR_F",
            BitNotF => "BITNOT_F",
            ShlF => "SHL_F",
            ShrF => "SHR_F",
            BitAndI => "BITAND_I",
            BitOrI => "BITOR_I",
            BitXorI => "BITXOR_I",
            BitNotI => "BITNOT_I",
            ShlI => "SHL_I",
            ShrI => "SHR_I",
            ShrU => "SHR_U",
            EqF => "EQ_F",
            NeF => "NE_F",
            LeF => "LE_F",
            GeF => "GE_F",
            LtF => "LT_F",
            GtF => "GT_F",
            EqI => "EQ_I",
            NeI => "NE_I",
            LeI => "LE_I",
            GeI => "GE_I",
            LtI => "LT_I",
            GtI => "GT_I",
            LeU => "LE_U",
            GeU => "GE_U",
            LtU => "LT_U",
            GtU => "GT_U",
            EqV => "EQ_V",
            NeV => "NE_V",
            EqQ => "EQ_Q",
            NeQ => "NE_Q",
            EqS => "EQ_S",
            NeS => "NE_S",
            LeS => "LE_S",
            GeS => "GE_S",
            LtS => "LT_S",
            GtS => "GT_S",
            And => "AND",
            Or => "OR",
            NotF => "NOT_F",
            NotV => "NOT_V",
            NotQ => "NOT_Q",
            NotS => "NOT_S",
            NotI => "NOT_I",
            AndI => "AND_I",
            OrI => "OR_I",
            ConvIF => "CONV_IF",
            ConvFI => "CONV_FI",
            ConvIU => "CONV_IU",
            ConvUI => "CONV_UI",
            Store => "STORE",
            StoreV => "STORE_V",
            StoreQ => "STORE_Q",
            StoreP => "STOREP",
            StorePV => "STOREP_V",
            StorePQ => "STOREP_Q",
            Address => "ADDRESS",
            AddressG => "ADDRESS_G",
            Load => "LOAD",
            LoadV => "LOAD_V",
            LoadQ => "LOAD_Q",
            LoadB => "LOADB",
            LoadBV => "LOADB_V",
            LoadBQ => "LOADB_Q",
            LoadBI => "LOADBI",
            LoadBIV => "LOADBI_V",
            LoadBIQ => "LOADBI_Q",
            StoreB => "STOREB",
            StoreBV => "STOREB_V",
            StoreBQ => "STOREB_Q",
            StoreBI => "STOREBI",
            StoreBIV => "STOREBI_V",
            StoreBIQ => "STOREBI_Q",
            Lea => "LEA",
            LeaI => "LEAI",
            Move => "MOVE",
            MoveP => "MOVEP",
            IfNot => "IFNOT",
            If => "IF",
            IfBe => "IFBE",
            IfB => "IFB",
            IfAe => "IFAE",
            IfA => "IFA",
            Goto => "GOTO",
            Jump => "JUMP",
            JumpB => "JUMPB",
            Call0 => "CALL0",
            Call1 => "CALL1",
            Call2 => "CALL2",
            Call3 => "CALL3",
            Call4 => "CALL4",
            Call5 => "CALL5",
            Call6 => "CALL6",
            Call7 => "CALL7",
            Call8 => "CALL8",
            Done => "DONE",
            Return => "RETURN",
            State => "STATE",
            StateF => "STATE_F",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
