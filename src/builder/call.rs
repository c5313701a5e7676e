//! Call-target resolution and the `rep` string-op memset/memcpy idiom
//! (§4.D, §4.G). The import-name collaborator is consulted for both direct
//! and indirect calls, since a direct near call can itself target an IAT
//! thunk at a fixed address.

use crate::decoder::{OperandKind, RawInsn};
use crate::ir::*;
use crate::options::Options;

use super::address::{operand_address, register_name, FrameState};

pub(crate) fn resolve_call_target(insn: &RawInsn, frame: &mut FrameState, options: &Options) -> Expr {
    if let Some(target) = insn.near_branch_target() {
        let name = options
            .resolve_import_name
            .resolve(target)
            .unwrap_or_else(|| format!("sub_{target:X}"));
        return Expr::Call(CallTarget::Symbol(name), vec![]);
    }

    match insn.operands.first().map(|o| &o.kind) {
        Some(OperandKind::Register(r, _)) => {
            Expr::Call(CallTarget::Indirect(Box::new(reg(register_name(*r)))), vec![])
        }
        Some(OperandKind::Memory(mem)) => {
            // `base` is the address the call operand itself refers to — for
            // a RIP-relative IAT slot, that's the slot's own address, which
            // is what a PE-aware resolver keys its table on (it has no way
            // to know the pointer value stored there at analysis time).
            let base = operand_address(mem, insn, frame);
            if let Expr::UConst(value, _) = base {
                if let Some(name) = options.resolve_import_name.resolve(value) {
                    return Expr::Call(CallTarget::Symbol(name), vec![]);
                }
            }
            let deref = Expr::Load(Box::new(base), Type::pointer(Type::Void), mem.segment_override);
            Expr::Call(CallTarget::Indirect(Box::new(deref)), vec![])
        }
        _ => Expr::Call(
            CallTarget::Indirect(Box::new(Expr::Intrinsic("unrepresentable_call_target".to_string(), vec![]))),
            vec![],
        ),
    }
}

/// Recognizes `rep stosb/stosw/stosd/stosq` and `rep movsb/movsw/movsd/movsq`
/// as the compiler-emitted memset/memcpy idiom, the same shape the peephole
/// pass (`builder::peephole`) coalesces from individual stores — except here
/// the source is a single instruction rather than a run of them.
pub(crate) fn translate_rep_string_op(insn: &RawInsn) -> Option<Stmt> {
    if !insn.is_rep {
        return None;
    }
    match insn.mnemonic.as_str() {
        "stosb" | "stosw" | "stosd" | "stosq" => Some(call_stmt(memset_call(
            reg("rdi"),
            reg("al"),
            reg("rcx"),
        ))),
        "movsb" | "movsw" | "movsd" | "movsq" => Some(call_stmt(memcpy_call(
            reg("rdi"),
            reg("rsi"),
            reg("rcx"),
        ))),
        _ => None,
    }
}
