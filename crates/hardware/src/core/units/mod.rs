//! Execution units.

/// Floating-point unit (paired-single kernels, NaN plumbing, host FP environment).
pub mod fpu;
