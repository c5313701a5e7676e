//! `mov`/`movzx`/`movsx`/`movsxd`/`lea` (§4.D).

use crate::decoder::RawInsn;
use crate::ir::*;

use super::super::address::{operand_lvalue, operand_rvalue, operand_width_bits};
use super::super::BuildCtx;

pub(crate) fn translate(insn: &RawInsn, ctx: &mut BuildCtx) -> Vec<Stmt> {
    let dst = operand_lvalue(insn, 0, &mut ctx.frame);
    let dst_bits = operand_width_bits(insn, 0);

    let value = match insn.mnemonic.as_str() {
        // `lea` never dereferences its memory operand — its second operand
        // is always an address expression, which is exactly what
        // `operand_lvalue` builds for a memory operand.
        "lea" => operand_lvalue(insn, 1, &mut ctx.frame),
        "movzx" => {
            let src = operand_rvalue(insn, 1, &mut ctx.frame);
            Expr::Cast(Box::new(src), Type::u(dst_bits), CastKind::ZeroExtend)
        }
        "movsx" | "movsxd" => {
            let src = operand_rvalue(insn, 1, &mut ctx.frame);
            Expr::Cast(Box::new(src), Type::i(dst_bits), CastKind::SignExtend)
        }
        _ => operand_rvalue(insn, 1, &mut ctx.frame),
    };

    vec![emit_assign_or_store(insn, dst, value)]
}

/// `mov`'s destination can itself be memory; route through `Store` rather
/// than `Assign` when it is, since `Assign`'s LHS is defined over registers
/// and locals only (§3).
fn emit_assign_or_store(insn: &RawInsn, dst: Expr, value: Expr) -> Stmt {
    use crate::decoder::OperandKind;
    match insn.operands.first().map(|o| &o.kind) {
        Some(OperandKind::Memory(mem)) => {
            Stmt::Store(Box::new(dst), Box::new(value), Type::u(insn.operand_width.max(8)), mem.segment_override)
        }
        _ => Stmt::Assign(Box::new(dst), Box::new(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::assign_labels;
    use crate::decoder::decode_function;
    use crate::options::Options;

    #[test]
    fn mov_reg_reg_translates_to_assign() {
        // mov eax, ecx
        let bytes = [0x89, 0xC8];
        let decoded = decode_function(&bytes, 0, None).unwrap();
        let labels = assign_labels(&decoded.instructions);
        let options = Options::default();
        let mut ctx = BuildCtx {
            scratch: crate::builder::Scratch::default(),
            frame: crate::builder::address::FrameState::default(),
            labels: &labels,
            options: &options,
        };
        let stmts = translate(&decoded.instructions[0], &mut ctx);
        assert_eq!(stmts, vec![Stmt::Assign(Box::new(reg("eax")), Box::new(reg("ecx")))]);
    }
}
