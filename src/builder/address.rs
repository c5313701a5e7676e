//! Address-expression construction (§4.D): turns a decoded operand into an
//! `Expr`, special-casing the three address shapes the spec singles out —
//! the PEB access (`gs:[0x60]`), RIP-relative data references, and
//! `rbp`-relative locals — before falling back to the general
//! `base + index*scale + disp` builder.

use zydis::Register;

use crate::decoder::{MemBase, MemoryRef, OperandKind, RawInsn};
use crate::ir::*;

/// Accumulates the local-variable frame as `rbp`-relative operands are
/// discovered, so every reference to the same displacement resolves to the
/// same named local (§4.D, §3 `LocalVar`).
#[derive(Default)]
pub(crate) struct FrameState {
    by_disp: std::collections::BTreeMap<i64, String>,
    pub collected: Vec<LocalVar>,
}

impl FrameState {
    fn local_for_disp(&mut self, disp: i64, ty: Type) -> Expr {
        if let Some(name) = self.by_disp.get(&disp) {
            return Expr::Local(name.clone());
        }
        let name = if disp < 0 {
            format!("local_{:X}", (-disp) as u64)
        } else {
            format!("arg_home_{:X}", disp as u64)
        };
        self.by_disp.insert(disp, name.clone());
        self.collected.push(LocalVar {
            name: name.clone(),
            ty,
            initializer: None,
        });
        Expr::Local(name)
    }
}

/// Lowercase register name used for `Expr::Reg`, e.g. `"rax"`, `"edi"`.
pub(crate) fn register_name(reg_val: Register) -> String {
    format!("{reg_val:?}").to_ascii_lowercase()
}

fn type_for_width(bits: u32) -> Type {
    Type::u(if bits == 0 { 32 } else { bits })
}

/// Builds the address `Expr` a memory operand refers to (never wraps it in
/// a `Load` — callers decide lvalue vs. rvalue use).
pub(crate) fn operand_address(mem: &MemoryRef, raw: &RawInsn, frame: &mut FrameState) -> Expr {
    if mem.segment_override == Segment::Gs
        && mem.has_displacement
        && mem.displacement == 0x60
        && matches!(mem.base, MemBase::None)
        && mem.index.is_none()
    {
        return Expr::Intrinsic("peb".to_string(), vec![]);
    }

    if let MemBase::Reg(r) = mem.base {
        if r == Register::RBP && mem.index.is_none() {
            return Expr::AddrOf(Box::new(
                frame.local_for_disp(mem.displacement, type_for_width(raw.operand_width)),
            ));
        }
    }

    if matches!(mem.base, MemBase::Rip) {
        let next_ip = raw.ip.wrapping_add(raw.length as u64);
        let target = next_ip.wrapping_add(mem.displacement as u64);
        return u_const(target, 64);
    }

    let mut addr = match mem.base {
        MemBase::Reg(r) => Some(reg(register_name(r))),
        _ => None,
    };

    if let Some(idx) = mem.index {
        let idx_expr = reg(register_name(idx));
        let scaled = if mem.scale > 1 {
            mul(idx_expr, u_const(mem.scale as u64, 64))
        } else {
            idx_expr
        };
        addr = Some(match addr {
            Some(a) => add(a, scaled),
            None => scaled,
        });
    }

    if mem.has_displacement && mem.displacement != 0 {
        let disp_expr = if mem.displacement < 0 {
            Expr::Const(mem.displacement, 64)
        } else {
            u_const(mem.displacement as u64, 64)
        };
        addr = Some(match addr {
            Some(a) => add(a, disp_expr),
            None => disp_expr,
        });
    }

    let base_addr = addr.unwrap_or_else(|| u_const(0, 64));
    match mem.segment_override {
        Segment::None => base_addr,
        seg => add(Expr::SegmentBase(seg), base_addr),
    }
}

/// The operand as an lvalue: a plain register, or the address a memory
/// operand resolves to (for use as a `Store` target).
pub(crate) fn operand_lvalue(insn: &RawInsn, idx: usize, frame: &mut FrameState) -> Expr {
    match insn.operands.get(idx).map(|o| &o.kind) {
        Some(OperandKind::Register(r, _)) => reg(register_name(*r)),
        Some(OperandKind::Memory(mem)) => operand_address(mem, insn, frame),
        _ => Expr::Intrinsic("unrepresentable_operand".to_string(), vec![]),
    }
}

/// The operand as an rvalue: a register read, a dereferenced memory load,
/// or an immediate constant.
pub(crate) fn operand_rvalue(insn: &RawInsn, idx: usize, frame: &mut FrameState) -> Expr {
    match insn.operands.get(idx).map(|o| &o.kind) {
        Some(OperandKind::Register(r, w)) => {
            let _ = w;
            reg(register_name(*r))
        }
        Some(OperandKind::Memory(mem)) => {
            let addr = operand_address(mem, insn, frame);
            if matches!(addr, Expr::Intrinsic(ref name, _) if name == "peb") {
                addr
            } else {
                Expr::Load(Box::new(addr), type_for_width(insn.operand_width), mem.segment_override)
            }
        }
        Some(OperandKind::Immediate(imm)) => {
            let bits = if insn.operand_width == 0 { 32 } else { insn.operand_width };
            if imm.value < 0 {
                Expr::Const(imm.value, bits)
            } else {
                Expr::UConst(imm.value as u64, bits)
            }
        }
        _ => Expr::Intrinsic("unrepresentable_operand".to_string(), vec![]),
    }
}

pub(crate) fn operand_width_bits(insn: &RawInsn, idx: usize) -> u32 {
    match insn.operands.get(idx).map(|o| &o.kind) {
        Some(OperandKind::Register(_, w)) => *w,
        _ if insn.operand_width != 0 => insn.operand_width,
        _ => 32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_rbp_offset_resolves_to_the_same_local() {
        let mut frame = FrameState::default();
        let a = frame.local_for_disp(-0x18, Type::u(32));
        let b = frame.local_for_disp(-0x18, Type::u(32));
        assert_eq!(a, b);
        assert_eq!(frame.collected.len(), 1);
    }
}
