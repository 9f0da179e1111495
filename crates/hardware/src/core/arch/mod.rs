//! Architectural state of one emulated hardware thread.
//!
//! This module aggregates the register state the paired-single core reads
//! and writes. It performs the following:
//! 1. **FPR file:** 32 paired-single floating-point registers with coherent lane views.
//! 2. **FPSCR:** Floating-point status and control with the sticky exception discipline.
//! 3. **CR:** The condition register, mirrored into by record-form instructions.

/// Condition register.
pub mod cr;
/// Floating-point register lane views.
pub mod fpr;
/// Floating-point status and control register.
pub mod fpscr;

use serde::{Deserialize, Serialize};

pub use cr::Cr;
pub use fpr::Fpr;
pub use fpscr::Fpscr;

/// Architectural state owned exclusively by one emulated thread.
///
/// The interpreter mutates this in place; within a single instruction there
/// is no concurrency and no suspension point. Serialization support exists
/// so an embedding emulator can snapshot and restore thread state.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ThreadState {
    /// Floating-point registers `f0`-`f31`.
    pub fpr: [Fpr; 32],
    /// Floating-point status and control register.
    pub fpscr: Fpscr,
    /// Condition register.
    pub cr: Cr,
}

impl ThreadState {
    /// Creates a thread state with all registers cleared.
    pub fn new() -> Self {
        Self::default()
    }
}
