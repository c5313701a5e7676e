//! `ret`/`jmp`/`call`/`jcc`/`setcc`/`cmovcc` (§4.D).

use crate::decoder::RawInsn;
use crate::ir::*;

use super::super::address::{operand_lvalue, operand_rvalue};
use super::super::condition::synthesize_condition;
use super::super::{call, BuildCtx};

pub(crate) fn translate_ret(_insn: &RawInsn, _ctx: &mut BuildCtx) -> Vec<Stmt> {
    vec![Stmt::Return(Some(Box::new(reg("rax"))))]
}

pub(crate) fn translate_jmp(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    match insn.near_branch_target().and_then(|t| ctx.labels.get(&t)) {
        Some(label) => vec![Stmt::Goto(label.clone())],
        None => {
            let target = operand_lvalue(insn, 0, &mut ctx.frame);
            vec![Stmt::Pseudo(format!("jmp {target:?}"))]
        }
    }
}

/// RAX always aliases to `ret`, and every call site captures into it
/// (§4.D "call", §4.D "Call target resolution" — "Return side effect").
/// The call always carries the four integer argument registers as its
/// argument list; pass 1 renames them to `p1..p4` along with every other
/// read of those registers, so a resolved import prints as
/// `ret = kernelbase!CreateFileW(p1, p2, p3, p4);`.
///
/// Before building that generic call, check the `memset` heuristic (§4.D
/// "memset heuristic at a call site"): `rcx` is always the call's first
/// argument already, so `dst == p1` holds whenever `rcx` still carries a
/// pointer-looking value; what actually gates the heuristic is `edx`
/// holding a small recorded literal (−255..=255, covering zero) and `r8d`
/// holding any recorded literal at all (a size). Any doubt — either
/// register's last literal unknown — falls back to the plain call.
pub(crate) fn translate_call(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    if let Some(stmt) = try_memset_heuristic(ctx) {
        return vec![stmt];
    }

    let target = call::resolve_call_target(insn, &mut ctx.frame, ctx.options);
    let Expr::Call(call_target, _) = target else {
        unreachable!("resolve_call_target always builds an Expr::Call")
    };
    let call_expr = Expr::Call(call_target, vec![reg("rcx"), reg("rdx"), reg("r8"), reg("r9")]);
    vec![Stmt::Assign(Box::new(reg("rax")), Box::new(call_expr))]
}

fn try_memset_heuristic(ctx: &mut BuildCtx) -> Option<Stmt> {
    let value = *ctx.scratch.last_const_regs.get("edx")?;
    if !(-255..=255).contains(&value) {
        return None;
    }
    let size = *ctx.scratch.last_const_regs.get("r8d")?;
    Some(call_stmt(memset_call(reg("rcx"), i_const(value, 8), i_const(size, 64))))
}

pub(crate) fn translate_jcc(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let cond = synthesize_condition(&insn.mnemonic, &ctx.scratch);
    match insn.near_branch_target().and_then(|t| ctx.labels.get(&t)) {
        Some(label) => vec![Stmt::IfGoto(Box::new(cond), label.clone())],
        None => vec![Stmt::Pseudo(format!("{} <unresolved target>", insn.mnemonic))],
    }
}

pub(crate) fn translate_setcc(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let dst = operand_lvalue(insn, 0, &mut ctx.frame);
    let cond = synthesize_condition(&insn.mnemonic, &ctx.scratch);
    vec![Stmt::Assign(Box::new(dst), Box::new(cond))]
}

pub(crate) fn translate_cmovcc(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let dst = operand_lvalue(insn, 0, &mut ctx.frame);
    let current = operand_rvalue(insn, 0, &mut ctx.frame);
    let src = operand_rvalue(insn, 1, &mut ctx.frame);
    let cond = synthesize_condition(&insn.mnemonic, &ctx.scratch);
    vec![Stmt::Assign(Box::new(dst), Box::new(ternary(cond, src, current)))]
}
