//! Per-instruction IR construction (§4.D) — the largest single component.
//! `build_function` walks the decoded instruction stream once, in order,
//! threading a small amount of scratch state (the last compare/test/bit
//! test) the same way `cicasm`'s assembler pass threads its running
//! address/section state through a single linear walk. Each instruction
//! contributes an `Asm` comment plus zero or more semantic statements; the
//! whole run is then peephole-coalesced (`peephole::coalesce`) before being
//! handed back as the function's single `BasicBlock`.

mod address;
mod call;
mod condition;
mod peephole;
mod translate;

use std::collections::HashMap;

use crate::decoder::{DecodedFunction, RawInsn};
use crate::errors::DecompileError;
use crate::ir::*;
use crate::options::Options;

use address::FrameState;

/// Scratch state threaded across the instruction walk (§4.D). Each field
/// holds only the *most recent* flag-setting instruction's operands;
/// consumption order and priority are `condition::synthesize_condition`'s
/// concern, not this struct's.
#[derive(Default)]
pub(crate) struct Scratch {
    /// `(lhs, rhs, is_test)` from the last `cmp`/`test`.
    pub last_cmp: Option<(Expr, Expr, bool)>,
    /// `(value, bit_index)` from the last `bt`.
    pub last_bt: Option<(Expr, Expr)>,
    /// Name of the XMM register last zeroed by a self-`xorps`/`pxor`
    /// (§4.D, §4.G), consumed by `translate::xmm::translate_xmm_mov`.
    pub last_zeroed_xmm: Option<String>,
    /// Last literal moved into each register by a `mov reg, imm`, keyed by
    /// the register's decoded name (e.g. `"edx"`, `"r8d"`) — consumed by
    /// the call-site `memset` heuristic (§4.D). Cleared whenever the
    /// register is overwritten by anything other than another literal
    /// `mov`, and whenever a `call` passes through (volatile registers).
    pub last_const_regs: std::collections::BTreeMap<String, i64>,
}

pub(crate) struct BuildCtx<'a> {
    pub scratch: Scratch,
    pub frame: FrameState,
    pub labels: &'a HashMap<u64, Label>,
    pub options: &'a Options,
}

/// Builds a [`FunctionIR`] from a decoded instruction stream and its
/// branch-label map. `FunctionIR::new` seeds the stable `p1..p4`
/// parameters from the MS x64 integer calling convention (§4.B GLOSSARY,
/// §3 `Parameter`); the caller is expected to trim unused trailing
/// parameters itself if it wants to (the core does not — see SPEC_FULL
/// Non-goals).
pub(crate) fn build_function(
    decoded: &DecodedFunction,
    labels: &HashMap<u64, Label>,
    options: &Options,
) -> Result<FunctionIR, DecompileError> {
    let mut function = FunctionIR::new(options.function_name.clone(), options.base_address, decoded.entry_address);

    let mut ctx = BuildCtx {
        scratch: Scratch::default(),
        frame: FrameState::default(),
        labels,
        options,
    };

    let epilogue_start = detect_epilogue_start(&decoded.instructions, decoded.uses_frame_pointer);
    let prologue_len = if decoded.uses_frame_pointer {
        if decoded.local_size > 0 {
            3
        } else {
            2
        }
    } else {
        0
    };

    let mut stmts = Vec::new();
    for (idx, insn) in decoded.instructions.iter().enumerate() {
        let suppressed = options.detect_prologue
            && (idx < prologue_len || epilogue_start.is_some_and(|start| idx >= start && idx < decoded.instructions.len() - 1));

        if let Some(label) = ctx.labels.get(&insn.ip) {
            stmts.push(Stmt::Label(label.clone()));
        }
        stmts.push(Stmt::Asm(insn.text.clone()));

        if suppressed {
            continue;
        }
        stmts.extend(translate::dispatch(insn, &mut ctx));
    }

    if decoded.uses_frame_pointer {
        function.tags.insert("uses_frame_pointer".to_string(), "true".to_string());
    }
    if decoded.local_size > 0 {
        function.tags.insert("local_size".to_string(), format!("0x{:X}", decoded.local_size));
    }
    if decoded.uses_peb {
        function.tags.insert("uses_peb".to_string(), "true".to_string());
    }

    function.locals.extend(ctx.frame.collected);
    function.blocks[0].statements = peephole::coalesce(stmts);

    function
        .validate_labels()
        .map_err(DecompileError::invariant)?;

    Ok(function)
}

fn is_single_register(insn: &RawInsn, want: zydis::Register) -> bool {
    use crate::decoder::OperandKind;
    matches!(insn.operands.first().map(|o| &o.kind), Some(OperandKind::Register(r, _)) if *r == want)
}

fn is_dest_register(insn: &RawInsn, want: zydis::Register) -> bool {
    use crate::decoder::OperandKind;
    matches!(insn.operands.first().map(|o| &o.kind), Some(OperandKind::Register(r, _)) if *r == want)
}

fn is_reg_reg(insn: &RawInsn, dst: zydis::Register, src: zydis::Register) -> bool {
    use crate::decoder::OperandKind;
    let d = insn.operands.first().map(|o| &o.kind);
    let s = insn.operands.get(1).map(|o| &o.kind);
    matches!(d, Some(OperandKind::Register(r, _)) if *r == dst) && matches!(s, Some(OperandKind::Register(r, _)) if *r == src)
}

/// Finds the first instruction index of the canonical epilogue
/// (`[mov rsp, rbp | add rsp, imm] pop rbp` immediately before the
/// function's `ret`), so the driver can suppress its semantic emission the
/// same way it suppresses the prologue.
fn detect_epilogue_start(instructions: &[RawInsn], uses_frame_pointer: bool) -> Option<usize> {
    if !uses_frame_pointer {
        return None;
    }
    let ret_idx = instructions.iter().position(RawInsn::is_ret)?;
    if ret_idx == 0 {
        return None;
    }
    let pop_idx = ret_idx - 1;
    if !(instructions[pop_idx].mnemonic == "pop" && is_single_register(&instructions[pop_idx], zydis::Register::RBP)) {
        return None;
    }
    let mut start = pop_idx;
    if start > 0 {
        let before = &instructions[start - 1];
        let is_mov_rsp_rbp = before.mnemonic == "mov" && is_reg_reg(before, zydis::Register::RSP, zydis::Register::RBP);
        let is_add_rsp_imm = before.mnemonic == "add" && is_dest_register(before, zydis::Register::RSP);
        if is_mov_rsp_rbp || is_add_rsp_imm {
            start -= 1;
        }
    }
    Some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::assign_labels;
    use crate::decoder::decode_function;

    #[test]
    fn trivial_prologue_epilogue_emits_no_frame_statements() {
        // push rbp; mov rbp, rsp; xor eax, eax; pop rbp; ret
        let bytes = [0x55, 0x48, 0x89, 0xE5, 0x31, 0xC0, 0x5D, 0xC3];
        let decoded = decode_function(&bytes, 0x1400_0000_0, None).unwrap();
        let labels = assign_labels(&decoded.instructions);
        let options = Options::default();
        let function = build_function(&decoded, &labels, &options).unwrap();

        let semantic_count = function
            .block()
            .statements
            .iter()
            .filter(|s| !matches!(s, Stmt::Asm(_)))
            .count();
        // one Assign for `xor eax, eax`, one Return for `ret`
        assert_eq!(semantic_count, 2);
    }
}
