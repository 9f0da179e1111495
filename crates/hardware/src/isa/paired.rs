//! Paired-single extended-opcode constants.
//!
//! Every paired-single instruction lives under primary opcode 4. The
//! arithmetic, estimate, select and sum instructions are A-form with a
//! 5-bit extended opcode; the moves and merges are X-form with a 10-bit
//! extended opcode. The low five bits of every X-form value here (8 or 16)
//! collide with no A-form value, which is what lets dispatch try the
//! A-form table first.

/// Primary opcode shared by all paired-single instructions.
pub const OPCD: u32 = 4;

/// A-form (5-bit) extended opcodes.
pub mod xo5 {
    pub const PS_SUM0: u32 = 10;
    pub const PS_SUM1: u32 = 11;
    pub const PS_MULS0: u32 = 12;
    pub const PS_MULS1: u32 = 13;
    pub const PS_MADDS0: u32 = 14;
    pub const PS_MADDS1: u32 = 15;
    pub const PS_DIV: u32 = 18;
    pub const PS_SUB: u32 = 20;
    pub const PS_ADD: u32 = 21;
    pub const PS_SEL: u32 = 23;
    pub const PS_RES: u32 = 24;
    pub const PS_MUL: u32 = 25;
    pub const PS_RSQRTE: u32 = 26;
    pub const PS_MSUB: u32 = 28;
    pub const PS_MADD: u32 = 29;
    pub const PS_NMSUB: u32 = 30;
    pub const PS_NMADD: u32 = 31;
}

/// X-form (10-bit) extended opcodes.
pub mod xo10 {
    pub const PS_NEG: u32 = 40;
    pub const PS_MR: u32 = 72;
    pub const PS_NABS: u32 = 136;
    pub const PS_ABS: u32 = 264;
    pub const PS_MERGE00: u32 = 528;
    pub const PS_MERGE01: u32 = 560;
    pub const PS_MERGE10: u32 = 592;
    pub const PS_MERGE11: u32 = 624;
}
