//! `and`/`or`/`xor`/`not`/`shl`/`shr`/`sar`/`test`/`bt` (§4.D).

use crate::decoder::RawInsn;
use crate::ir::*;

use super::super::address::{operand_lvalue, operand_rvalue};
use super::super::BuildCtx;

pub(crate) fn translate(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let dst = operand_lvalue(insn, 0, &mut ctx.frame);

    if insn.mnemonic == "not" {
        let value = operand_rvalue(insn, 0, &mut ctx.frame);
        return vec![Stmt::Assign(Box::new(dst), Box::new(not(value)))];
    }

    let lhs = operand_rvalue(insn, 0, &mut ctx.frame);
    let rhs = operand_rvalue(insn, 1, &mut ctx.frame);
    let op = match insn.mnemonic.as_str() {
        "and" => BinOp::And,
        "or" => BinOp::Or,
        "xor" => BinOp::Xor,
        "shl" => BinOp::Shl,
        "shr" => BinOp::Shr,
        "sar" => BinOp::Sar,
        other => unreachable!("bitwise::translate called for unsupported mnemonic {other}"),
    };
    vec![Stmt::Assign(Box::new(dst), Box::new(Expr::BinOp(op, Box::new(lhs), Box::new(rhs))))]
}

/// `test lhs, rhs` sets the same scratch slot `cmp` does, flagged as a test
/// so `condition::synthesize_condition` only honors `z`/`nz` off it.
pub(crate) fn translate_test(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let lhs = operand_rvalue(insn, 0, &mut ctx.frame);
    let rhs = operand_rvalue(insn, 1, &mut ctx.frame);
    ctx.scratch.last_cmp = Some((lhs.clone(), rhs.clone(), true));

    if ctx.options.comment_compare {
        vec![Stmt::Pseudo(format!("test {lhs:?}, {rhs:?}"))]
    } else {
        vec![]
    }
}

/// `bt value, bit_index` records the tested bit for a following `jb`/`jnb`
/// (§4.D condition synthesis priority).
pub(crate) fn translate_bt(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let value = operand_rvalue(insn, 0, &mut ctx.frame);
    let bit = operand_rvalue(insn, 1, &mut ctx.frame);
    ctx.scratch.last_bt = Some((value, bit));
    vec![]
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
    fn self_xor_builds_xor_binop_for_later_simplification() {
        // xor eax, eax
        let bytes = [0x31, 0xC0];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = HashMap::new();
        let options = Options::default();
        let mut ctx = ctx_for(&labels, &options);
        let stmts = translate(&decoded.instructions[0], &mut ctx);
        assert_eq!(
            stmts,
            vec![Stmt::Assign(Box::new(reg("eax")), Box::new(xor(reg("eax"), reg("eax"))))]
        );
    }
}
