//! Host floating-point environment control.
//!
//! The kernels lean on the host FPU for the actual arithmetic, which makes
//! the host environment a per-thread resource with two obligations:
//!
//! 1. The rounding mode must be round-to-nearest-even before any
//!    instruction executes ([`set_round_to_nearest`]).
//! 2. Narrowings that are not part of an instruction's arithmetic output
//!    (the Sum-Low insert of the `frC` scalar) must not leak
//!    `FE_INEXACT`/`FE_OVERFLOW` into sticky state
//!    ([`InexactOverflowGuard`]).

use std::os::raw::c_int;

// The `libc` crate does not expose the C99 <fenv.h> API, so the bindings are
// declared directly against the host's libc implementation.
const FE_TONEAREST: c_int = 0;
/// Host `FE_INEXACT` flag bit, for callers that need to manipulate the raw
/// host floating-point environment directly (e.g. test harnesses).
pub const FE_INEXACT: c_int = 0x20;
/// Host `FE_OVERFLOW` flag bit, for callers that need to manipulate the raw
/// host floating-point environment directly (e.g. test harnesses).
pub const FE_OVERFLOW: c_int = 0x08;

extern "C" {
    fn feclearexcept(excepts: c_int) -> c_int;
    fn fegetround() -> c_int;
    fn fesetround(round: c_int) -> c_int;
    fn fetestexcept(excepts: c_int) -> c_int;
}

/// Clears the given host floating-point exception flags.
///
/// Exposed for callers outside this crate (e.g. integration tests) that need
/// to manipulate the raw host floating-point environment directly, since the
/// `libc` crate does not expose this C99 `<fenv.h>` API.
pub fn clear_exceptions(excepts: c_int) -> c_int {
    unsafe { feclearexcept(excepts) }
}

/// Tests the given host floating-point exception flags.
///
/// Exposed for callers outside this crate (e.g. integration tests) that need
/// to manipulate the raw host floating-point environment directly, since the
/// `libc` crate does not expose this C99 `<fenv.h>` API.
pub fn test_exceptions(excepts: c_int) -> c_int {
    unsafe { fetestexcept(excepts) }
}

/// Pins the host rounding mode to round-to-nearest-even.
///
/// Embedders call this once per host thread before executing instructions.
/// Returns false if the host rejected the mode change.
pub fn set_round_to_nearest() -> bool {
    unsafe { fesetround(FE_TONEAREST) == 0 }
}

/// Returns true if the host rounding mode is round-to-nearest-even.
pub fn round_to_nearest_active() -> bool {
    unsafe { fegetround() == FE_TONEAREST }
}

/// Saved `FE_INEXACT` / `FE_OVERFLOW` state around an internal narrowing.
///
/// [`InexactOverflowGuard::restore`] clears only the flags that were clear
/// at save time, so a flag raised by the instruction's own arithmetic
/// before the guard survives unchanged.
pub struct InexactOverflowGuard {
    inexact: bool,
    overflow: bool,
}

impl InexactOverflowGuard {
    /// Samples the current host flag state.
    pub fn save() -> Self {
        unsafe {
            Self {
                inexact: fetestexcept(FE_INEXACT) != 0,
                overflow: fetestexcept(FE_OVERFLOW) != 0,
            }
        }
    }

    /// Clears any flag the guarded narrowing raised that was not already set.
    pub fn restore(self) {
        unsafe {
            if !self.inexact {
                feclearexcept(FE_INEXACT);
            }
            if !self.overflow {
                feclearexcept(FE_OVERFLOW);
            }
        }
    }
}
