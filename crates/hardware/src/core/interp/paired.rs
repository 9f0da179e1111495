//! Paired-single instruction handlers.
//!
//! Every arithmetic handler follows the same discipline: snapshot the
//! FPSCR, run the scalar kernel once per lane, commit the register only if
//! BOTH lanes produced a value, refresh FPRF from the widened lane-0 result
//! when lane 0 produced one, then recompute the FPSCR summary bits against
//! the snapshot. A lane suppressed by an enabled exception therefore
//! suppresses the whole register write, including the other lane's, while
//! every sticky bit that fired stays set.
//!
//! The moves, merges and select are bit-level reshuffles: they leave FPSCR
//! and FPRF untouched and only run the record-form CR mirror.

use crate::core::arch::ThreadState;
use crate::core::units::fpu::fenv::InexactOverflowGuard;
use crate::core::units::fpu::nan_handling::{
    extend_float, extend_float_nan_bits, is_signalling_nan, truncate_double, truncate_double_bits,
};
use crate::core::units::fpu::{arith_single, fma_single, recip_single, PsOp};
use crate::isa::instruction::Instruction;

use super::update_float_condition_register;

const SIGN_BIT: u32 = 0x8000_0000;

/// Paired arithmetic: one kernel per lane, both-or-neither commit.
fn arith_generic<const SLOT_B0: usize, const SLOT_B1: usize>(
    state: &mut ThreadState,
    instr: Instruction,
    op: PsOp,
) {
    let old = state.fpscr.value();

    let d0 = arith_single::<0, SLOT_B0>(state, instr, op);
    let d1 = arith_single::<1, SLOT_B1>(state, instr, op);
    if let (Some(d0), Some(d1)) = (d0, d1) {
        let frd = instr.frd();
        state.fpr[frd].set_paired0(extend_float(d0));
        state.fpr[frd].set_paired1(d1);
    }

    if let Some(d0) = d0 {
        state.fpscr.update_fprf(extend_float(d0));
    }
    state.fpscr.update_summary(old);

    if instr.rc() {
        update_float_condition_register(state);
    }
}

pub(super) fn ps_add(state: &mut ThreadState, instr: Instruction) {
    arith_generic::<0, 1>(state, instr, PsOp::Add)
}

pub(super) fn ps_sub(state: &mut ThreadState, instr: Instruction) {
    arith_generic::<0, 1>(state, instr, PsOp::Sub)
}

pub(super) fn ps_mul(state: &mut ThreadState, instr: Instruction) {
    arith_generic::<0, 1>(state, instr, PsOp::Mul)
}

pub(super) fn ps_div(state: &mut ThreadState, instr: Instruction) {
    arith_generic::<0, 1>(state, instr, PsOp::Div)
}

/// Multiply with the `frC` scalar broadcast from slot 0.
pub(super) fn ps_muls0(state: &mut ThreadState, instr: Instruction) {
    arith_generic::<0, 0>(state, instr, PsOp::Mul)
}

/// Multiply with the `frC` scalar broadcast from slot 1.
pub(super) fn ps_muls1(state: &mut ThreadState, instr: Instruction) {
    arith_generic::<1, 1>(state, instr, PsOp::Mul)
}

/// Paired fused multiply-add, parameterized like the arithmetic ops.
fn fma_generic<
    const SUBTRACT: bool,
    const NEGATE: bool,
    const SLOT_C0: usize,
    const SLOT_C1: usize,
>(
    state: &mut ThreadState,
    instr: Instruction,
) {
    let old = state.fpscr.value();

    let d0 = fma_single::<SUBTRACT, NEGATE, 0, SLOT_C0>(state, instr);
    let d1 = fma_single::<SUBTRACT, NEGATE, 1, SLOT_C1>(state, instr);
    if let (Some(d0), Some(d1)) = (d0, d1) {
        let frd = instr.frd();
        state.fpr[frd].set_paired0(extend_float(d0));
        state.fpr[frd].set_paired1(d1);
    }

    if let Some(d0) = d0 {
        state.fpscr.update_fprf(extend_float(d0));
    }
    state.fpscr.update_summary(old);

    if instr.rc() {
        update_float_condition_register(state);
    }
}

pub(super) fn ps_madd(state: &mut ThreadState, instr: Instruction) {
    fma_generic::<false, false, 0, 1>(state, instr)
}

pub(super) fn ps_madds0(state: &mut ThreadState, instr: Instruction) {
    fma_generic::<false, false, 0, 0>(state, instr)
}

pub(super) fn ps_madds1(state: &mut ThreadState, instr: Instruction) {
    fma_generic::<false, false, 1, 1>(state, instr)
}

pub(super) fn ps_msub(state: &mut ThreadState, instr: Instruction) {
    fma_generic::<true, false, 0, 1>(state, instr)
}

pub(super) fn ps_nmadd(state: &mut ThreadState, instr: Instruction) {
    fma_generic::<false, true, 0, 1>(state, instr)
}

pub(super) fn ps_nmsub(state: &mut ThreadState, instr: Instruction) {
    fma_generic::<true, true, 0, 1>(state, instr)
}

/// Cross-lane sum: `frA` slot 0 plus `frB` slot 1, result into `SLOT`,
/// the other lane filled from `frC`.
fn sum_generic<const SLOT: usize>(state: &mut ThreadState, instr: Instruction) {
    let old = state.fpscr.value();

    if let Some(d) = arith_single::<0, 1>(state, instr, PsOp::Add) {
        state.fpscr.update_fprf(extend_float(d));
        let frc = instr.frc();
        let frd = instr.frd();
        if SLOT == 0 {
            let c1 = state.fpr[frc].bits1();
            state.fpr[frd].set_paired0(extend_float(d));
            state.fpr[frd].set_bits1(c1);
        } else {
            let c0 = state.fpr[frc].paired0();
            let ps0 = if c0.is_nan() {
                truncate_double(c0)
            } else {
                // This narrowing is not part of the instruction's
                // arithmetic output; the sum's own inexact/overflow state
                // must survive it unchanged.
                let guard = InexactOverflowGuard::save();
                let narrowed = c0 as f32;
                guard.restore();
                narrowed
            };
            state.fpr[frd].set_paired0(extend_float(ps0));
            state.fpr[frd].set_paired1(d);
        }
    }

    state.fpscr.update_summary(old);

    if instr.rc() {
        update_float_condition_register(state);
    }
}

pub(super) fn ps_sum0(state: &mut ThreadState, instr: Instruction) {
    sum_generic::<0>(state, instr)
}

pub(super) fn ps_sum1(state: &mut ThreadState, instr: Instruction) {
    sum_generic::<1>(state, instr)
}

/// Reciprocal (`SQRT = false`) and reciprocal-square-root (`SQRT = true`)
/// estimates, per lane, with the shared suppression rule.
fn recip_generic<const SQRT: bool>(state: &mut ThreadState, instr: Instruction) {
    let frb = instr.frb();
    let b0 = state.fpr[frb].paired0();
    let b1 = extend_float(state.fpr[frb].paired1());

    let old = state.fpscr.value();

    let d0 = recip_single::<SQRT>(&mut state.fpscr, b0);
    if let Some(d0) = d0 {
        state.fpscr.update_fprf(extend_float(d0));
    }
    let d1 = recip_single::<SQRT>(&mut state.fpscr, b1);

    if let (Some(d0), Some(d1)) = (d0, d1) {
        let frd = instr.frd();
        state.fpr[frd].set_paired0(extend_float(d0));
        state.fpr[frd].set_paired1(d1);
    }

    state.fpscr.update_summary(old);

    if instr.rc() {
        update_float_condition_register(state);
    }
}

pub(super) fn ps_res(state: &mut ThreadState, instr: Instruction) {
    recip_generic::<false>(state, instr)
}

pub(super) fn ps_rsqrte(state: &mut ThreadState, instr: Instruction) {
    recip_generic::<true>(state, instr)
}

/// Sign transforms applied by the move instructions.
#[derive(Clone, Copy)]
enum MoveMode {
    Direct,
    Negate,
    Absolute,
    NegAbsolute,
}

/// Register move with optional sign manipulation.
///
/// Operates on the 32-bit forms of both lanes. A signalling NaN in slot 0
/// must survive as a signalling NaN, so that path narrows and re-widens at
/// the bit level; anything else narrows through a real conversion because
/// excess double precision has to round, not chop.
fn move_generic(state: &mut ThreadState, instr: Instruction, mode: MoveMode) {
    let src = state.fpr[instr.frb()];
    let ps0_snan = is_signalling_nan(src.paired0());
    let b0 = if ps0_snan {
        truncate_double_bits(src.bits0())
    } else {
        (src.paired0() as f32).to_bits()
    };
    let b1 = src.bits1();

    let (d0, d1) = match mode {
        MoveMode::Direct => (b0, b1),
        MoveMode::Negate => (b0 ^ SIGN_BIT, b1 ^ SIGN_BIT),
        MoveMode::Absolute => (b0 & !SIGN_BIT, b1 & !SIGN_BIT),
        MoveMode::NegAbsolute => (b0 | SIGN_BIT, b1 | SIGN_BIT),
    };

    let frd = instr.frd();
    if ps0_snan {
        state.fpr[frd].set_bits0(extend_float_nan_bits(d0));
    } else {
        state.fpr[frd].set_paired0(f32::from_bits(d0) as f64);
    }
    state.fpr[frd].set_bits1(d1);

    if instr.rc() {
        update_float_condition_register(state);
    }
}

pub(super) fn ps_mr(state: &mut ThreadState, instr: Instruction) {
    move_generic(state, instr, MoveMode::Direct)
}

pub(super) fn ps_neg(state: &mut ThreadState, instr: Instruction) {
    move_generic(state, instr, MoveMode::Negate)
}

pub(super) fn ps_abs(state: &mut ThreadState, instr: Instruction) {
    move_generic(state, instr, MoveMode::Absolute)
}

pub(super) fn ps_nabs(state: &mut ThreadState, instr: Instruction) {
    move_generic(state, instr, MoveMode::NegAbsolute)
}

/// Lane merge: `TAKE1_A` selects slot 1 of `frA` for the output slot 0,
/// `TAKE1_B` selects slot 1 of `frB` for the output slot 1.
///
/// A slot-0 read destined for the output slot 0 rounds unless it is a
/// signalling NaN; a slot-0 read destined for the output slot 1 always
/// truncates the mantissa. The asymmetry is architectural.
fn merge_generic<const TAKE1_A: bool, const TAKE1_B: bool>(
    state: &mut ThreadState,
    instr: Instruction,
) {
    let a = state.fpr[instr.fra()];
    let b = state.fpr[instr.frb()];

    let d0 = if TAKE1_A {
        a.paired1()
    } else if is_signalling_nan(a.paired0()) {
        truncate_double(a.paired0())
    } else {
        a.paired0() as f32
    };

    let d1 = if TAKE1_B {
        b.paired1()
    } else {
        truncate_double(b.paired0())
    };

    let frd = instr.frd();
    state.fpr[frd].set_paired0(extend_float(d0));
    state.fpr[frd].set_paired1(d1);

    if instr.rc() {
        update_float_condition_register(state);
    }
}

pub(super) fn ps_merge00(state: &mut ThreadState, instr: Instruction) {
    merge_generic::<false, false>(state, instr)
}

pub(super) fn ps_merge01(state: &mut ThreadState, instr: Instruction) {
    merge_generic::<false, true>(state, instr)
}

pub(super) fn ps_merge10(state: &mut ThreadState, instr: Instruction) {
    merge_generic::<true, false>(state, instr)
}

pub(super) fn ps_merge11(state: &mut ThreadState, instr: Instruction) {
    merge_generic::<true, true>(state, instr)
}

/// Per-lane select: `frD.lane = frA.lane >= 0 ? frC.lane : frB.lane`.
///
/// The comparison is single-precision and any NaN compares false, so NaN
/// selects the `frB` lane. No FPSCR effects.
pub(super) fn ps_sel(state: &mut ThreadState, instr: Instruction) {
    let a = state.fpr[instr.fra()];
    let b = state.fpr[instr.frb()];
    let c = state.fpr[instr.frc()];

    let a0 = a.paired0() as f32;
    let a1 = a.paired1();

    let d0 = if a0 >= 0.0 { c.paired0() as f32 } else { b.paired0() as f32 };
    let d1 = if a1 >= 0.0 { c.paired1() } else { b.paired1() };

    let frd = instr.frd();
    state.fpr[frd].set_paired0(d0 as f64);
    state.fpr[frd].set_paired1(d1);

    if instr.rc() {
        update_float_condition_register(state);
    }
}
