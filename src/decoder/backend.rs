//! The private `DecoderBackend` (§4.G): wraps `zydis::Decoder` and hides its
//! types behind a small normalized record. Nothing outside this module ever
//! names a `zydis` type directly — the rest of the crate only sees
//! [`RawInsn`]/[`OperandInfo`].
//!
//! Grounded in `examples/zyantific-zydis-rs/src/decoder.rs` (`Decoder::new`,
//! `instruction_iterator`) and that crate's own `examples/simple.rs` /
//! `examples/pattern.rs`, which pair a `Decoder` with a `Formatter` and walk
//! `insn.operands[0..insn.operand_count]` matching on `OperandType`.

use zydis::register::ZydisRegisterMethods;
use zydis::{AddressWidth, Decoder, Formatter, FormatterStyle, MachineMode, OperandType, Register};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemBase {
    Reg(Register),
    Rip,
    None,
}

#[derive(Debug, Clone)]
pub(crate) struct MemoryRef {
    pub base: MemBase,
    pub index: Option<Register>,
    pub scale: u8,
    pub has_displacement: bool,
    pub displacement: i64,
    /// `gs:`/`fs:`/none, read off the instruction's segment-override
    /// attributes rather than a per-operand field.
    pub segment_override: crate::ir::Segment,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ImmediateRef {
    pub value: i64,
    pub is_relative: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum OperandKind {
    Register(Register, u32),
    Memory(MemoryRef),
    Immediate(ImmediateRef),
    Pointer,
    Unused,
}

#[derive(Debug, Clone)]
pub(crate) struct OperandInfo {
    pub kind: OperandKind,
}

/// A decoded instruction, normalized away from `zydis`'s own types.
#[derive(Debug, Clone)]
pub(crate) struct RawInsn {
    pub ip: u64,
    pub length: u8,
    /// Lowercase mnemonic keyword, e.g. `"mov"`, `"jz"`, `"setz"`,
    /// `"cmovnz"`. Derived from the formatted instruction text rather than a
    /// `zydis::Mnemonic` variant match, so the builder's instruction-class
    /// dispatch (`src/builder/translate`) never needs to enumerate every
    /// conditional-jump/setcc/cmovcc mnemonic by its raw enum name.
    pub mnemonic: String,
    /// The full formatted "mnemonic operands" text, used verbatim for the
    /// `Asm(...)` comment line (§4.D step 2).
    pub text: String,
    pub operands: Vec<OperandInfo>,
    /// Effective operand width in bits, used as the default element type
    /// width for memory accesses when no narrower hint is available.
    pub operand_width: u32,
    pub is_rep: bool,
}

impl RawInsn {
    pub fn is_ret(&self) -> bool {
        self.mnemonic == "ret" || self.mnemonic == "retf"
    }

    pub fn is_conditional_jump(&self) -> bool {
        self.mnemonic.starts_with('j') && self.mnemonic != "jmp"
    }

    pub fn is_unconditional_jump(&self) -> bool {
        self.mnemonic == "jmp"
    }

    pub fn is_call(&self) -> bool {
        self.mnemonic == "call"
    }

    pub fn is_setcc(&self) -> bool {
        self.mnemonic.starts_with("set")
    }

    pub fn is_cmovcc(&self) -> bool {
        self.mnemonic.starts_with("cmov")
    }

    /// Absolute target of a near branch/call whose sole operand is a
    /// relative immediate, or `None` for an indirect branch.
    pub fn near_branch_target(&self) -> Option<u64> {
        match self.operands.first().map(|o| &o.kind) {
            Some(OperandKind::Immediate(imm)) if imm.is_relative => {
                let next_ip = self.ip.wrapping_add(self.length as u64);
                Some(next_ip.wrapping_add(imm.value as u64))
            }
            _ => None,
        }
    }
}

pub(crate) struct DecoderBackend {
    decoder: Decoder,
    formatter: Formatter,
}

impl DecoderBackend {
    pub fn new() -> Result<DecoderBackend, zydis::Status> {
        let decoder = Decoder::new(MachineMode::LONG_64, AddressWidth::_64)?;
        let formatter = Formatter::new(FormatterStyle::Intel)?;
        Ok(DecoderBackend { decoder, formatter })
    }

    /// Decodes every instruction in `bytes` (interpreted as starting at
    /// `base`), in order, never running past `bytes.len()`.
    pub fn decode_all(&self, bytes: &[u8], base: u64) -> Vec<RawInsn> {
        let mut out = Vec::new();
        for (insn, ip) in self.decoder.instruction_iterator(bytes, base) {
            let text = self
                .formatter
                .format_instruction(&insn, 200, ip, None)
                .unwrap_or_default();
            let mnemonic = text
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();

            let segment_override = if insn.attributes.contains(zydis::InstructionAttributes::HAS_SEGMENT_GS) {
                crate::ir::Segment::Gs
            } else if insn.attributes.contains(zydis::InstructionAttributes::HAS_SEGMENT_FS) {
                crate::ir::Segment::Fs
            } else {
                crate::ir::Segment::None
            };

            let mut operands = Vec::with_capacity(insn.operand_count as usize);
            for idx in 0..insn.operand_count as usize {
                let op = &insn.operands[idx];
                let kind = match op.ty {
                    OperandType::REGISTER => OperandKind::Register(op.reg, op.reg.get_width64() as u32),
                    OperandType::MEMORY => {
                        let base = if op.mem.base == Register::RIP {
                            MemBase::Rip
                        } else if op.mem.base == Register::NONE {
                            MemBase::None
                        } else {
                            MemBase::Reg(op.mem.base)
                        };
                        let index = if op.mem.index == Register::NONE {
                            None
                        } else {
                            Some(op.mem.index)
                        };
                        OperandKind::Memory(MemoryRef {
                            base,
                            index,
                            scale: op.mem.scale,
                            has_displacement: op.mem.disp.has_displacement,
                            displacement: op.mem.disp.displacement,
                            segment_override,
                        })
                    }
                    OperandType::IMMEDIATE => OperandKind::Immediate(ImmediateRef {
                        value: op.imm.value as i64,
                        is_relative: op.imm.is_relative,
                    }),
                    OperandType::POINTER => OperandKind::Pointer,
                    _ => OperandKind::Unused,
                };
                operands.push(OperandInfo { kind });
            }

            out.push(RawInsn {
                ip,
                length: insn.length,
                mnemonic,
                text,
                operands,
                operand_width: insn.operand_width as u32,
                is_rep: insn.attributes.contains(zydis::InstructionAttributes::HAS_REP)
                    || insn.attributes.contains(zydis::InstructionAttributes::HAS_REPE),
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_trivial_prologue_epilogue() {
        let backend = DecoderBackend::new().expect("decoder backend initializes");
        // push rbp; mov rbp, rsp; pop rbp; ret
        let bytes = [0x55u8, 0x48, 0x89, 0xE5, 0x5D, 0xC3];
        let insns = backend.decode_all(&bytes, 0x1400_0000_0);
        assert_eq!(insns.len(), 4);
        assert_eq!(insns[0].mnemonic, "push");
        assert_eq!(insns[1].mnemonic, "mov");
        assert_eq!(insns[2].mnemonic, "pop");
        assert!(insns[3].is_ret());
    }
}
