//! The decode-until-`ret` driver (§4.B): turns a flat byte buffer into an
//! ordered instruction stream plus the handful of structural facts the
//! builder needs up front (frame-pointer use, local-frame size, PEB access).
//!
//! Grounded in `cicasm`'s `assembler/mod.rs`, which walks its AST once in
//! instruction order and threads a small amount of running state (the
//! current section/address) through the walk — here the running state is
//! the prologue/PEB detection instead.

mod backend;

use tracing::{debug, trace};

use crate::errors::DecompileError;
use crate::ir::Segment;

pub(crate) use backend::{MemBase, MemoryRef, OperandKind, RawInsn};
use backend::DecoderBackend;

/// The result of the decode pass: the linear instruction stream plus facts
/// the builder consults while translating it (§4.B).
pub(crate) struct DecodedFunction {
    pub entry_address: u64,
    pub instructions: Vec<RawInsn>,
    pub uses_frame_pointer: bool,
    pub local_size: u64,
    pub uses_peb: bool,
}

/// Decodes `bytes` (loaded at `base_address`) into a [`DecodedFunction`].
///
/// Decoding is purely linear: it walks instructions in stream order and
/// stops at the first `ret`/`retf`, never following a branch. A function
/// with no `ret` within `bytes` (truncated input, or `max_bytes` cutting it
/// short) decodes to its full instruction run with no error — the builder
/// then produces whatever body it can, matching the "recovered locally"
/// policy documented on [`DecompileError`].
pub(crate) fn decode_function(
    bytes: &[u8],
    base_address: u64,
    max_bytes: Option<usize>,
) -> Result<DecodedFunction, DecompileError> {
    let backend = DecoderBackend::new().map_err(|source| DecompileError::Decode {
        ip: base_address,
        source,
    })?;

    let limit = max_bytes.unwrap_or(bytes.len()).min(bytes.len());
    let window = &bytes[..limit];

    let mut instructions = backend.decode_all(window, base_address);
    if let Some(ret_idx) = instructions.iter().position(RawInsn::is_ret) {
        instructions.truncate(ret_idx + 1);
    }
    debug!(count = instructions.len(), entry = %format_args!("0x{base_address:X}"), "decoded instruction stream");

    let (uses_frame_pointer, local_size) = detect_prologue(&instructions);
    let uses_peb = detect_peb_access(&instructions);

    Ok(DecodedFunction {
        entry_address: base_address,
        instructions,
        uses_frame_pointer,
        local_size,
        uses_peb,
    })
}

/// Recognizes the canonical MSVC prologue, with or without a frame pointer
/// (§4.B): `push rbp; mov rbp, rsp[; sub rsp, imm]`, or — for a leaf frame
/// that never sets up `rbp` — a leading `sub rsp, imm` on its own. Returns
/// `(uses_frame_pointer, local_size)`; `local_size` is `0` when no
/// `sub rsp, imm` is found, or when its immediate fails the "IMM > 0 and a
/// multiple of 8" filter (not a real local-frame allocation).
fn detect_prologue(instructions: &[RawInsn]) -> (bool, u64) {
    let is_push_rbp = instructions
        .first()
        .is_some_and(|i| i.mnemonic == "push" && is_single_register(i, zydis::Register::RBP));
    let is_mov_rbp_rsp = instructions
        .get(1)
        .is_some_and(|i| i.mnemonic == "mov" && is_reg_reg(i, zydis::Register::RBP, zydis::Register::RSP));
    let uses_frame_pointer = is_push_rbp && is_mov_rbp_rsp;

    let sub_rsp_idx = if uses_frame_pointer { 2 } else { 0 };
    let local_size = instructions
        .get(sub_rsp_idx)
        .filter(|i| i.mnemonic == "sub" && is_dest_register(i, zydis::Register::RSP))
        .and_then(immediate_operand)
        .filter(|&v| v > 0 && v % 8 == 0)
        .map(|v| v as u64)
        .unwrap_or(0);

    trace!(uses_frame_pointer, local_size, "detected prologue");
    (uses_frame_pointer, local_size)
}

/// Flags any `mov`-from-`gs:[0x60]` in the stream, the canonical x64 PEB
/// access (§4.B, §4.D `peb_local`).
fn detect_peb_access(instructions: &[RawInsn]) -> bool {
    instructions.iter().any(|insn| {
        insn.operands.iter().any(|op| match &op.kind {
            OperandKind::Memory(mem) => {
                mem.segment_override == Segment::Gs && mem.has_displacement && mem.displacement == 0x60
            }
            _ => false,
        })
    })
}

fn is_single_register(insn: &RawInsn, reg: zydis::Register) -> bool {
    matches!(insn.operands.first().map(|o| &o.kind), Some(OperandKind::Register(r, _)) if *r == reg)
}

fn is_dest_register(insn: &RawInsn, reg: zydis::Register) -> bool {
    matches!(insn.operands.first().map(|o| &o.kind), Some(OperandKind::Register(r, _)) if *r == reg)
}

fn is_reg_reg(insn: &RawInsn, dst: zydis::Register, src: zydis::Register) -> bool {
    let d = insn.operands.first().map(|o| &o.kind);
    let s = insn.operands.get(1).map(|o| &o.kind);
    matches!(d, Some(OperandKind::Register(r, _)) if *r == dst)
        && matches!(s, Some(OperandKind::Register(r, _)) if *r == src)
}

fn immediate_operand(insn: &RawInsn) -> Option<i64> {
    insn.operands.iter().find_map(|o| match &o.kind {
        OperandKind::Immediate(imm) => Some(imm.value),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rbp_frame_prologue_with_locals() {
        // push rbp; mov rbp, rsp; sub rsp, 0x20; ... ; ret
        let bytes = [
            0x55, 0x48, 0x89, 0xE5, 0x48, 0x83, 0xEC, 0x20, 0xC3,
        ];
        let f = decode_function(&bytes, 0x1400_0000_0, None).expect("decodes");
        assert!(f.uses_frame_pointer);
        assert_eq!(f.local_size, 0x20);
    }

    #[test]
    fn leaf_function_has_no_frame_pointer() {
        // xor eax, eax; ret
        let bytes = [0x31, 0xC0, 0xC3];
        let f = decode_function(&bytes, 0x1400_0000_0, None).expect("decodes");
        assert!(!f.uses_frame_pointer);
        assert_eq!(f.local_size, 0);
    }

    #[test]
    fn detects_leaf_frame_local_size_with_no_rbp() {
        // sub rsp, 0x28; ... ; ret
        let bytes = [0x48, 0x83, 0xEC, 0x28, 0xC3];
        let f = decode_function(&bytes, 0x1400_0000_0, None).expect("decodes");
        assert!(!f.uses_frame_pointer);
        assert_eq!(f.local_size, 0x28);
    }

    #[test]
    fn rejects_a_sub_rsp_immediate_that_is_not_a_multiple_of_eight() {
        // sub rsp, 3; ret
        let bytes = [0x48, 0x83, 0xEC, 0x03, 0xC3];
        let f = decode_function(&bytes, 0x1400_0000_0, None).expect("decodes");
        assert!(!f.uses_frame_pointer);
        assert_eq!(f.local_size, 0);
    }

    #[test]
    fn detects_peb_access_via_gs_segment() {
        // mov rax, gs:[0x60]; ret
        let bytes = [0x65, 0x48, 0x8B, 0x04, 0x25, 0x60, 0x00, 0x00, 0x00, 0xC3];
        let f = decode_function(&bytes, 0x1400_0000_0, None).expect("decodes");
        assert!(f.uses_peb);
    }

    #[test]
    fn stream_truncates_at_first_ret() {
        // ret; nop  -- the nop must never appear in the decoded stream
        let bytes = [0xC3, 0x90];
        let f = decode_function(&bytes, 0x1400_0000_0, None).expect("decodes");
        assert_eq!(f.instructions.len(), 1);
        assert!(f.instructions[0].is_ret());
    }
}
