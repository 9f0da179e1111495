//! Interpreter dispatch for the paired-single extension.
//!
//! Instructions are looked up by primary opcode 4 plus extended opcode:
//! the A-form (5-bit XO) table is consulted first, then the X-form
//! (10-bit XO) table. Each entry carries the mnemonic for diagnostics and
//! a flag telling acceleration backends whether they must route the op
//! back through this interpreter rather than lowering it to host SIMD.

/// Paired-single instruction handlers.
mod paired;

use std::collections::HashMap;

use log::debug;

use crate::common::Trap;
use crate::core::arch::ThreadState;
use crate::isa::instruction::Instruction;
use crate::isa::paired::{xo10, xo5, OPCD};

/// An installed instruction handler.
pub type InstrHandler = fn(&mut ThreadState, Instruction);

/// One dispatch table entry.
pub struct Entry {
    /// Mnemonic, for diagnostics and disassembly.
    pub mnemonic: &'static str,
    /// The handler to run.
    pub handler: InstrHandler,
    /// True when a JIT backend must fall back to this interpreter because
    /// a bit-exact host lowering is impractical.
    pub interpreter_fallback: bool,
}

/// The interpreter's dispatch table.
#[derive(Default)]
pub struct InstructionTable {
    a_form: HashMap<u32, Entry>,
    x_form: HashMap<u32, Entry>,
}

impl InstructionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn register_a(&mut self, xo: u32, entry: Entry) {
        self.a_form.insert(xo, entry);
    }

    fn register_x(&mut self, xo: u32, entry: Entry) {
        self.x_form.insert(xo, entry);
    }

    /// Number of installed entries.
    pub fn len(&self) -> usize {
        self.a_form.len() + self.x_form.len()
    }

    /// True when no entries are installed.
    pub fn is_empty(&self) -> bool {
        self.a_form.is_empty() && self.x_form.is_empty()
    }

    /// Looks up the entry for an instruction word, if any.
    ///
    /// A-form extended opcodes never collide with the low five bits of an
    /// X-form extended opcode, so trying the A-form table first is safe.
    pub fn lookup(&self, instr: Instruction) -> Option<&Entry> {
        if instr.opcd() != OPCD {
            return None;
        }
        self.a_form
            .get(&instr.xo5())
            .or_else(|| self.x_form.get(&instr.xo10()))
    }

    /// Executes one instruction word against `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Trap::IllegalInstruction`] when the word has no entry.
    pub fn execute(&self, state: &mut ThreadState, word: u32) -> Result<(), Trap> {
        let instr = Instruction(word);
        match self.lookup(instr) {
            Some(entry) => {
                (entry.handler)(state, instr);
                Ok(())
            }
            None => Err(Trap::IllegalInstruction(word)),
        }
    }
}

/// Mirrors the FPSCR summary nibble (FX, FEX, VX, OX) into CR field 1.
pub(crate) fn update_float_condition_register(state: &mut ThreadState) {
    let summary = state.fpscr.value() >> 28;
    state.cr.set_field(1, summary);
}

/// Installs every paired-single instruction into `table`.
pub fn register_paired_singles(table: &mut InstructionTable) {
    fn entry(mnemonic: &'static str, handler: InstrHandler) -> Entry {
        Entry {
            mnemonic,
            handler,
            interpreter_fallback: false,
        }
    }
    fn fallback(mnemonic: &'static str, handler: InstrHandler) -> Entry {
        Entry {
            mnemonic,
            handler,
            interpreter_fallback: true,
        }
    }

    table.register_a(xo5::PS_ADD, entry("ps_add", paired::ps_add));
    table.register_a(xo5::PS_SUB, entry("ps_sub", paired::ps_sub));
    table.register_a(xo5::PS_MUL, entry("ps_mul", paired::ps_mul));
    table.register_a(xo5::PS_DIV, entry("ps_div", paired::ps_div));
    table.register_a(xo5::PS_MULS0, entry("ps_muls0", paired::ps_muls0));
    table.register_a(xo5::PS_MULS1, entry("ps_muls1", paired::ps_muls1));
    table.register_a(xo5::PS_MADD, entry("ps_madd", paired::ps_madd));
    table.register_a(xo5::PS_MADDS0, entry("ps_madds0", paired::ps_madds0));
    table.register_a(xo5::PS_MADDS1, entry("ps_madds1", paired::ps_madds1));
    table.register_a(xo5::PS_MSUB, entry("ps_msub", paired::ps_msub));
    table.register_a(xo5::PS_NMADD, entry("ps_nmadd", paired::ps_nmadd));
    table.register_a(xo5::PS_NMSUB, entry("ps_nmsub", paired::ps_nmsub));
    table.register_a(xo5::PS_SUM0, entry("ps_sum0", paired::ps_sum0));
    table.register_a(xo5::PS_SUM1, entry("ps_sum1", paired::ps_sum1));
    table.register_a(xo5::PS_RES, fallback("ps_res", paired::ps_res));
    table.register_a(xo5::PS_RSQRTE, fallback("ps_rsqrte", paired::ps_rsqrte));
    table.register_a(xo5::PS_SEL, fallback("ps_sel", paired::ps_sel));

    table.register_x(xo10::PS_MR, entry("ps_mr", paired::ps_mr));
    table.register_x(xo10::PS_NEG, entry("ps_neg", paired::ps_neg));
    table.register_x(xo10::PS_ABS, entry("ps_abs", paired::ps_abs));
    table.register_x(xo10::PS_NABS, entry("ps_nabs", paired::ps_nabs));
    table.register_x(xo10::PS_MERGE00, entry("ps_merge00", paired::ps_merge00));
    table.register_x(xo10::PS_MERGE01, entry("ps_merge01", paired::ps_merge01));
    table.register_x(xo10::PS_MERGE10, entry("ps_merge10", paired::ps_merge10));
    table.register_x(xo10::PS_MERGE11, entry("ps_merge11", paired::ps_merge11));

    debug!("installed {} paired-single instructions", table.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::instruction::{encode_a, encode_x};

    #[test]
    fn test_all_ops_installed() {
        let mut table = InstructionTable::new();
        register_paired_singles(&mut table);
        assert_eq!(table.len(), 25);
    }

    #[test]
    fn test_lookup_resolves_both_forms() {
        let mut table = InstructionTable::new();
        register_paired_singles(&mut table);

        let add = Instruction(encode_a(0, 1, 2, 0, xo5::PS_ADD, false));
        assert_eq!(table.lookup(add).unwrap().mnemonic, "ps_add");

        let merge = Instruction(encode_x(0, 1, 2, xo10::PS_MERGE01, false));
        assert_eq!(table.lookup(merge).unwrap().mnemonic, "ps_merge01");
    }

    #[test]
    fn test_unknown_word_traps() {
        let mut table = InstructionTable::new();
        register_paired_singles(&mut table);
        let mut state = ThreadState::new();

        // Primary opcode 4 with an unused extended opcode.
        let word = encode_x(0, 1, 2, 999, false);
        assert_eq!(
            table.execute(&mut state, word),
            Err(Trap::IllegalInstruction(word))
        );

        // A different primary opcode never dispatches here.
        let word = 0x7C00_0000;
        assert!(table.execute(&mut state, word).is_err());
    }

    #[test]
    fn test_estimates_and_select_marked_for_fallback() {
        let mut table = InstructionTable::new();
        register_paired_singles(&mut table);
        for (xo, expect) in [
            (xo5::PS_RES, true),
            (xo5::PS_RSQRTE, true),
            (xo5::PS_SEL, true),
            (xo5::PS_ADD, false),
        ] {
            let instr = Instruction(encode_a(0, 0, 0, 0, xo, false));
            assert_eq!(table.lookup(instr).unwrap().interpreter_fallback, expect);
        }
    }
}
