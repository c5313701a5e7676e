//! `add`/`sub`/`imul`/`mul`/`div`/`idiv`/`inc`/`dec`/`neg`/`cmp` (§4.D).

use crate::decoder::RawInsn;
use crate::ir::*;

use super::super::address::{operand_lvalue, operand_rvalue};
use super::super::BuildCtx;

pub(crate) fn translate(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    match insn.mnemonic.as_str() {
        "add" | "sub" if insn.operands.len() >= 2 => two_operand(insn, ctx),
        "imul" if insn.operands.len() >= 2 => two_operand(insn, ctx),
        "inc" | "dec" => inc_dec(insn, ctx),
        "neg" => {
            let dst = operand_lvalue(insn, 0, &mut ctx.frame);
            let value = operand_rvalue(insn, 0, &mut ctx.frame);
            vec![Stmt::Assign(Box::new(dst), Box::new(neg(value)))]
        }
        // single-operand `mul`/`div`/`idiv`/`imul` touch the rax:rdx pair
        // in ways a single `Assign` can't express faithfully; left as a
        // labelled pseudo-statement rather than a guessed-at approximation.
        _ => vec![Stmt::Pseudo(format!("{} (rax:rdx)", insn.mnemonic))],
    }
}

fn two_operand(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let dst = operand_lvalue(insn, 0, &mut ctx.frame);
    let lhs = operand_rvalue(insn, 0, &mut ctx.frame);
    let rhs = operand_rvalue(insn, 1, &mut ctx.frame);
    let op = match insn.mnemonic.as_str() {
        "add" => BinOp::Add,
        "sub" => BinOp::Sub,
        "imul" => BinOp::Mul,
        _ => unreachable!("two_operand only called for add/sub/imul"),
    };
    vec![Stmt::Assign(Box::new(dst), Box::new(Expr::BinOp(op, Box::new(lhs), Box::new(rhs))))]
}

fn inc_dec(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let dst = operand_lvalue(insn, 0, &mut ctx.frame);
    let value = operand_rvalue(insn, 0, &mut ctx.frame);
    let width = value_bits(&value);
    let one = u_const(1, width);
    let made = match insn.mnemonic.as_str() {
        "inc" => add(value, one),
        "dec" => sub(value, one),
        _ => unreachable!(),
    };
    vec![Stmt::Assign(Box::new(dst), Box::new(made))]
}

fn value_bits(e: &Expr) -> u32 {
    match e {
        Expr::Const(_, b) | Expr::UConst(_, b) => *b,
        _ => 32,
    }
}

/// `cmp lhs, rhs` never produces a visible statement of its own — it only
/// records scratch state consumed by a later `jcc`/`setcc`/`cmovcc`
/// (§4.D condition synthesis) — except for the optional debug annotation
/// controlled by `Options::comment_compare`.
pub(crate) fn translate_cmp(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let lhs = operand_rvalue(insn, 0, &mut ctx.frame);
    let rhs = operand_rvalue(insn, 1, &mut ctx.frame);
    ctx.scratch.last_cmp = Some((lhs.clone(), rhs.clone(), false));

    if ctx.options.comment_compare {
        vec![Stmt::Pseudo(format!("compare {lhs:?}, {rhs:?}"))]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_function;
    use crate::options::Options;
    use std::collections::HashMap;

    fn ctx_for<'a>(labels: &'a HashMap<u64, Label>, options: &'a Options) -> BuildCtx<'a> {
        BuildCtx {
            scratch: crate::builder::Scratch::default(),
            frame: crate::builder::address::FrameState::default(),
            labels,
            options,
        }
    }

    #[test]
    fn add_reg_reg_builds_binop_add() {
        // add eax, ecx
        let bytes = [0x01, 0xC8];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = HashMap::new();
        let options = Options::default();
        let mut ctx = ctx_for(&labels, &options);
        let stmts = translate(&decoded.instructions[0], &mut ctx);
        assert_eq!(
            stmts,
            vec![Stmt::Assign(Box::new(reg("eax")), Box::new(add(reg("eax"), reg("ecx"))))]
        );
    }

    #[test]
    fn cmp_sets_scratch_and_emits_nothing_by_default() {
        // cmp eax, ecx
        let bytes = [0x39, 0xC8];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = HashMap::new();
        let options = Options::default();
        let mut ctx = ctx_for(&labels, &options);
        let stmts = translate_cmp(&decoded.instructions[0], &mut ctx);
        assert!(stmts.is_empty());
        assert_eq!(ctx.scratch.last_cmp, Some((reg("eax"), reg("ecx"), false)));
    }
}
