//! Dispatches a decoded instruction to the translator for its family
//! (§4.D), mirroring `cicasm`'s `instruction_encoders/{arithmetic,bitwise,
//! control_flow,load_store,misc,stack}.rs` split — one file per instruction
//! family rather than one giant match arm.

mod arithmetic;
mod bitwise;
mod control_flow;
mod load_store;
mod misc;
mod stack;
mod xmm;

use crate::decoder::{OperandKind, RawInsn};
use crate::ir::Stmt;

use super::address::register_name;
use super::{call, BuildCtx};

pub(crate) fn dispatch(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let is_xmm_zero_idiom = matches!(insn.mnemonic.as_str(), "xorps" | "pxor" | "movups" | "movaps" | "movdqu");

    let stmts = if let Some(stmt) = call::translate_rep_string_op(insn) {
        vec![stmt]
    } else if insn.is_setcc() {
        control_flow::translate_setcc(insn, ctx)
    } else if insn.is_cmovcc() {
        control_flow::translate_cmovcc(insn, ctx)
    } else if insn.is_conditional_jump() {
        control_flow::translate_jcc(insn, ctx)
    } else {
        match insn.mnemonic.as_str() {
            "mov" | "movzx" | "movsx" | "movsxd" | "lea" => load_store::translate(insn, ctx),
            "push" | "pop" | "leave" => stack::translate(insn, ctx),
            "ret" => control_flow::translate_ret(insn, ctx),
            "jmp" => control_flow::translate_jmp(insn, ctx),
            "call" => control_flow::translate_call(insn, ctx),
            "add" | "sub" | "imul" | "mul" | "div" | "idiv" | "inc" | "dec" | "neg" => {
                arithmetic::translate(insn, ctx)
            }
            "cmp" => arithmetic::translate_cmp(insn, ctx),
            "and" | "or" | "xor" | "not" | "shl" | "shr" | "sar" => bitwise::translate(insn, ctx),
            "test" => bitwise::translate_test(insn, ctx),
            "bt" => bitwise::translate_bt(insn, ctx),
            "xorps" | "pxor" => xmm::translate_xorps_pxor(insn, ctx),
            "movups" | "movaps" | "movdqu" => xmm::translate_xmm_mov(insn, ctx),
            "nop" => vec![],
            other => misc::translate_fallback(other),
        }
    };

    // Any other instruction that overwrites the register `last_zeroed_xmm`
    // names invalidates the zero-store idiom (§4.D); `xorps`/`pxor`/
    // `movups`/`movaps`/`movdqu` manage the flag themselves above.
    if !is_xmm_zero_idiom {
        if let Some(OperandKind::Register(dst, _)) = insn.operands.first().map(|o| &o.kind) {
            if ctx.scratch.last_zeroed_xmm.as_deref() == Some(register_name(*dst).as_str()) {
                ctx.scratch.last_zeroed_xmm = None;
            }
        }
    }

    track_last_const_regs(insn, ctx);

    stmts
}

/// Feeds `Scratch::last_const_regs`, the call-site `memset` heuristic's
/// memory of the most recent literal moved into each register (§4.D): a
/// literal `mov reg, imm` records it, any other write to that register
/// clears it, and a `call` clears everything (the callee may clobber any
/// volatile register).
fn track_last_const_regs(insn: &RawInsn, ctx: &mut BuildCtx) {
    if insn.is_call() {
        ctx.scratch.last_const_regs.clear();
        return;
    }
    let Some(OperandKind::Register(dst, _)) = insn.operands.first().map(|o| &o.kind) else {
        return;
    };
    let dst_name = register_name(*dst);
    let literal = (insn.mnemonic == "mov")
        .then(|| insn.operands.get(1).map(|o| &o.kind))
        .flatten()
        .and_then(|kind| match kind {
            OperandKind::Immediate(imm) if !imm.is_relative => Some(imm.value),
            _ => None,
        });
    match literal {
        Some(value) => {
            ctx.scratch.last_const_regs.insert(dst_name, value);
        }
        None => {
            ctx.scratch.last_const_regs.remove(&dst_name);
        }
    }
}
