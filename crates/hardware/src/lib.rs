//! Espresso paired-single floating-point execution core.
//!
//! This crate implements the paired-single (two-lane single-precision SIMD)
//! portion of an interpreter for the Espresso family of 32-bit big-endian
//! PowerPC processors. It provides the following:
//! 1. **Arch:** FPR lane views, FPSCR with sticky exception discipline, and the condition register.
//! 2. **FPU:** Scalar single-lane kernels (arith, FMA, reciprocal estimates) with per-lane exception gating.
//! 3. **Interp:** Paired-single orchestrators, move/merge/select ops, and the instruction registry.
//! 4. **ISA:** Opcode-4 field extraction and extended-opcode constants.
//!
//! Callers must pin the host floating-point environment to
//! round-to-nearest-even (see `core::units::fpu::fenv`) before executing
//! instructions through this core.

/// Common types (traps).
pub mod common;
/// CPU core (architectural state, execution units, interpreter).
pub mod core;
/// Instruction set (field extraction, paired-single opcodes).
pub mod isa;

/// Per-thread architectural state: FPRs, FPSCR, CR.
pub use crate::core::arch::ThreadState;
/// Interpreter dispatch table; install ops with [`register_paired_singles`].
pub use crate::core::interp::{register_paired_singles, InstructionTable};
/// Decoded instruction word.
pub use crate::isa::instruction::Instruction;
