//! The SSE zero/copy idioms the peephole pass coalesces into `memset`/
//! `memcpy` (§4.D, §4.G): `xorps reg,reg` / `pxor reg,reg` records the
//! self-zeroed register in `Scratch::last_zeroed_xmm`; a subsequent single
//! `movups`/`movaps`/`movdqu` store of that same register becomes
//! `memset(addr, 0, 16)` directly, consuming (clearing) the scratch flag —
//! a run of ≥2 such stores is then visible to `builder::peephole` as a
//! zero-store run only through the statements' own address arithmetic, not
//! through the (already-cleared) scratch flag. Any other shape of these
//! instructions — a genuine two-operand XOR, a register load, a
//! register-to-register move — falls back to the generic `load_store`
//! translation.

use crate::decoder::{OperandKind, RawInsn};
use crate::ir::*;

use super::super::address::{operand_lvalue, register_name};
use super::super::BuildCtx;
use super::load_store;

pub(crate) fn translate_xorps_pxor(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    if let (Some(OperandKind::Register(dst, _)), Some(OperandKind::Register(src, _))) =
        (insn.operands.first().map(|o| &o.kind), insn.operands.get(1).map(|o| &o.kind))
    {
        if dst == src {
            ctx.scratch.last_zeroed_xmm = Some(register_name(*dst));
            return vec![Stmt::Pseudo("zero xmm".to_string())];
        }
    }
    vec![Stmt::Pseudo(insn.mnemonic.clone())]
}

pub(crate) fn translate_xmm_mov(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    if let (Some(OperandKind::Memory(_)), Some(OperandKind::Register(src, _))) =
        (insn.operands.first().map(|o| &o.kind), insn.operands.get(1).map(|o| &o.kind))
    {
        let zeroed = ctx.scratch.last_zeroed_xmm.as_deref() == Some(register_name(*src).as_str());
        if zeroed {
            ctx.scratch.last_zeroed_xmm = None;
            let addr = operand_lvalue(insn, 0, &mut ctx.frame);
            return vec![call_stmt(memset_call(addr_of(addr), u_const(0, 8), u_const(16, 64)))];
        }
    }

    // Any other shape of `movups`/`movaps`/`movdqu` that overwrites the
    // zeroed register (a reload from memory, a move from another xmm
    // register) invalidates the idiom the same way `translate::dispatch`'s
    // generic write-tracking does for every other mnemonic.
    if let Some(OperandKind::Register(dst, _)) = insn.operands.first().map(|o| &o.kind) {
        if ctx.scratch.last_zeroed_xmm.as_deref() == Some(register_name(*dst).as_str()) {
            ctx.scratch.last_zeroed_xmm = None;
        }
    }

    load_store::translate(insn, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::assign_labels;
    use crate::decoder::decode_function;
    use crate::options::Options;

    fn ctx(options: &Options, labels: &std::collections::HashMap<u64, Label>) -> BuildCtx<'_> {
        BuildCtx {
            scratch: crate::builder::Scratch::default(),
            frame: crate::builder::address::FrameState::default(),
            labels,
            options,
        }
    }

    #[test]
    fn self_xorps_records_the_zeroed_register_and_emits_a_pseudo() {
        // xorps xmm0, xmm0
        let bytes = [0x0F, 0x57, 0xC0];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = assign_labels(&decoded.instructions);
        let options = Options::default();
        let mut c = ctx(&options, &labels);
        let stmts = translate_xorps_pxor(&decoded.instructions[0], &mut c);
        assert_eq!(stmts, vec![Stmt::Pseudo("zero xmm".to_string())]);
        assert_eq!(c.scratch.last_zeroed_xmm.as_deref(), Some("xmm0"));
    }

    #[test]
    fn movups_storing_the_zeroed_register_becomes_a_memset_call_and_clears_the_flag() {
        // movups [rdi], xmm0
        let bytes = [0x0F, 0x11, 0x07];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = assign_labels(&decoded.instructions);
        let options = Options::default();
        let mut c = ctx(&options, &labels);
        c.scratch.last_zeroed_xmm = Some("xmm0".to_string());
        let stmts = translate_xmm_mov(&decoded.instructions[0], &mut c);
        assert_eq!(
            stmts,
            vec![call_stmt(memset_call(addr_of(reg("rdi")), u_const(0, 8), u_const(16, 64)))]
        );
        assert_eq!(c.scratch.last_zeroed_xmm, None);
    }

    #[test]
    fn reloading_the_zeroed_register_from_memory_clears_the_flag() {
        // xorps xmm0, xmm0 ; movups xmm0, [rsi] ; movups [rdi], xmm0
        let bytes = [0x0F, 0x57, 0xC0, 0x0F, 0x10, 0x06, 0x0F, 0x11, 0x07];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = assign_labels(&decoded.instructions);
        let options = Options::default();
        let mut c = ctx(&options, &labels);

        translate_xorps_pxor(&decoded.instructions[0], &mut c);
        assert_eq!(c.scratch.last_zeroed_xmm.as_deref(), Some("xmm0"));

        super::dispatch(&decoded.instructions[1], &mut c);
        assert_eq!(c.scratch.last_zeroed_xmm, None);

        let stmts = translate_xmm_mov(&decoded.instructions[2], &mut c);
        assert!(matches!(stmts.as_slice(), [Stmt::Store(..)]));
    }
}
